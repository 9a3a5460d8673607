// File: crates/candle-core/src/series.rs
// Summary: Series model: ordered data points with optional OHLC payloads or marker nodes.
// Notes:
// - Ids are assigned by `ChartState` when a series or point is inserted; values
//   built by hand carry default ids until then.

use crate::bar::Bar;

slotmap::new_key_type! {
    /// Identity of a series inside a `ChartState`.
    pub struct SeriesId;
}

/// Identity of a data point; unique across all series of one `ChartState`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub(crate) u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SeriesRole {
    /// Rendered as candlesticks; at most one per chart.
    Primary,
    /// Rendered as a plain line plus whatever marker nodes its points carry.
    #[default]
    Overlay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerShape {
    TriangleUp,
    TriangleDown,
    Dot,
}

/// Generic node an overlay point brings along (e.g. a buy/sell arrow).
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub shape: MarkerShape,
    pub style_class: String,
}

impl Marker {
    pub fn new(shape: MarkerShape, style_class: impl Into<String>) -> Self {
        Self { shape, style_class: style_class.into() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    pub(crate) id: PointId,
    pub x: f64,
    /// Representative value; for bars this is the open price.
    pub y: f64,
    pub bar: Option<Bar>,
    pub marker: Option<Marker>,
}

impl DataPoint {
    pub fn xy(x: f64, y: f64) -> Self {
        Self { id: PointId::default(), x, y, bar: None, marker: None }
    }

    pub fn from_bar(bar: Bar) -> Self {
        Self { id: PointId::default(), x: bar.x, y: bar.open, bar: Some(bar), marker: None }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn id(&self) -> PointId { self.id }

    /// Value the overlay line passes through: the close when a bar is present.
    pub fn line_value(&self) -> f64 {
        self.bar.map(|b| b.close).unwrap_or(self.y)
    }
}

#[derive(Clone, Debug)]
pub struct Series {
    pub(crate) id: SeriesId,
    pub name: String,
    pub role: SeriesRole,
    pub style_class: Option<String>,
    pub(crate) points: Vec<DataPoint>,
}

impl Series {
    pub fn new(name: impl Into<String>, role: SeriesRole) -> Self {
        Self { id: SeriesId::default(), name: name.into(), role, style_class: None, points: Vec::new() }
    }

    pub fn primary(name: impl Into<String>) -> Self { Self::new(name, SeriesRole::Primary) }

    pub fn overlay(name: impl Into<String>) -> Self { Self::new(name, SeriesRole::Overlay) }

    pub fn from_bars(name: impl Into<String>, bars: impl IntoIterator<Item = Bar>) -> Self {
        Self::primary(name).with_points(bars.into_iter().map(DataPoint::from_bar))
    }

    pub fn with_points(mut self, points: impl IntoIterator<Item = DataPoint>) -> Self {
        self.points.extend(points);
        self
    }

    pub fn with_style_class(mut self, class: impl Into<String>) -> Self {
        self.style_class = Some(class.into());
        self
    }

    pub fn id(&self) -> SeriesId { self.id }
    pub fn is_primary(&self) -> bool { self.role == SeriesRole::Primary }
    pub fn points(&self) -> &[DataPoint] { &self.points }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    pub fn position_of(&self, id: PointId) -> Option<usize> {
        self.points.iter().position(|p| p.id == id)
    }

    /// X distance between the first two points, if there are two.
    pub fn bar_period(&self) -> Option<f64> {
        match self.points.as_slice() {
            [a, b, ..] => Some(b.x - a.x),
            _ => None,
        }
    }
}
