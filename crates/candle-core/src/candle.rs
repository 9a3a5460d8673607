// File: crates/candle-core/src/candle.rs
// Summary: Candle visual node: high-low line, body rectangle, style tags, lifecycle state.

use crate::bar::BarSummary;
use crate::geometry::{LineSegment, Rect};
use crate::lifecycle::NodeState;
use crate::series::{PointId, SeriesId};
use crate::types::{DEFAULT_CANDLE_WIDTH, INTRINSIC_WIDTH, MIN_CLOSE_OFFSET};

/// Body direction in the node's local frame.
///
/// `Bullish` iff the clamped close offset is positive. On an axis where pixels
/// grow with price that is a close above the open; on a screen y axis (pixels
/// grow downward) it is the reverse, hence the `open-above-close` tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    pub fn from_close_offset(close_offset: f64) -> Self {
        if close_offset > 0.0 { Direction::Bullish } else { Direction::Bearish }
    }

    pub fn style_class(self) -> &'static str {
        match self {
            Direction::Bullish => "open-above-close",
            Direction::Bearish => "close-above-open",
        }
    }
}

#[derive(Clone, Debug)]
pub struct CandleVisual {
    pub(crate) series: SeriesId,
    pub(crate) point: PointId,
    series_class: String,
    data_class: String,
    intrinsic_width: f64,

    close_offset: f64,
    direction: Direction,
    line: LineSegment,
    body: Rect,
    layout: (f64, f64),

    root_classes: Vec<String>,
    line_classes: Vec<String>,
    body_classes: Vec<String>,

    pub(crate) state: NodeState,
    pub(crate) opacity: f64,
    pub(crate) visible: bool,
    tooltip: Option<BarSummary>,
}

impl CandleVisual {
    pub fn new(series_class: impl Into<String>, data_class: impl Into<String>) -> Self {
        let mut node = Self {
            series: SeriesId::default(),
            point: PointId::default(),
            series_class: series_class.into(),
            data_class: data_class.into(),
            intrinsic_width: DEFAULT_CANDLE_WIDTH,
            close_offset: MIN_CLOSE_OFFSET,
            direction: Direction::Bullish,
            line: LineSegment::default(),
            body: Rect::default(),
            layout: (0.0, 0.0),
            root_classes: Vec::new(),
            line_classes: Vec::new(),
            body_classes: Vec::new(),
            state: NodeState::Absent,
            opacity: 1.0,
            visible: true,
            tooltip: None,
        };
        node.update_style_classes();
        node
    }

    pub fn with_intrinsic_width(mut self, width: f64) -> Self {
        self.intrinsic_width = width;
        self
    }

    pub fn set_series_and_data_classes(&mut self, series_class: impl Into<String>, data_class: impl Into<String>) {
        self.series_class = series_class.into();
        self.data_class = data_class.into();
        self.update_style_classes();
    }

    /// Recompute geometry from offsets relative to the open-price pixel.
    /// A `width` of `-1` selects the intrinsic width.
    pub fn update(&mut self, close_offset: f64, high_offset: f64, low_offset: f64, width: f64) {
        let close_offset = if close_offset == 0.0 { MIN_CLOSE_OFFSET } else { close_offset };
        self.close_offset = close_offset;
        self.direction = Direction::from_close_offset(close_offset);
        self.update_style_classes();

        self.line = LineSegment { start_y: high_offset, end_y: low_offset };
        let width = if width == INTRINSIC_WIDTH { self.intrinsic_width } else { width };
        self.body = match self.direction {
            Direction::Bullish => Rect::new(-width / 2.0, 0.0, width, close_offset),
            Direction::Bearish => Rect::new(-width / 2.0, close_offset, width, -close_offset),
        };
    }

    pub fn update_tooltip(&mut self, summary: BarSummary) {
        self.tooltip = Some(summary);
    }

    pub(crate) fn relocate(&mut self, x: f64, y: f64) {
        self.layout = (x, y);
    }

    fn update_style_classes(&mut self) {
        let dir = self.direction.style_class();
        let tagged = |base: &str, dir: Option<&str>| {
            let mut v = vec![base.to_string(), self.series_class.clone(), self.data_class.clone()];
            v.extend(dir.map(str::to_string));
            v
        };
        self.root_classes = tagged("candlestick-candle", None);
        self.line_classes = tagged("candlestick-line", Some(dir));
        self.body_classes = tagged("candlestick-bar", Some(dir));
    }

    pub fn series_id(&self) -> SeriesId { self.series }
    pub fn point_id(&self) -> PointId { self.point }
    pub fn close_offset(&self) -> f64 { self.close_offset }
    pub fn direction(&self) -> Direction { self.direction }
    pub fn is_bullish(&self) -> bool { self.direction == Direction::Bullish }
    pub fn line(&self) -> LineSegment { self.line }
    pub fn body(&self) -> Rect { self.body }
    pub fn layout(&self) -> (f64, f64) { self.layout }
    pub fn root_classes(&self) -> &[String] { &self.root_classes }
    pub fn line_classes(&self) -> &[String] { &self.line_classes }
    pub fn body_classes(&self) -> &[String] { &self.body_classes }
    pub fn state(&self) -> NodeState { self.state }
    pub fn opacity(&self) -> f64 { self.opacity }
    pub fn is_visible(&self) -> bool { self.visible }
    pub fn tooltip(&self) -> Option<&BarSummary> { self.tooltip.as_ref() }

    /// Bounding box of line and body in chart pixels.
    pub fn bounds(&self) -> Rect {
        let (lo, hi) = (self.line.start_y.min(self.line.end_y), self.line.start_y.max(self.line.end_y));
        let line = Rect::from_ltrb(0.0, lo, 0.0, hi);
        line.union(&self.body).translate(self.layout.0, self.layout.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_close_offset_is_clamped_bullish() {
        let mut c = CandleVisual::new("series0", "data0");
        c.update(0.0, -5.0, 5.0, 10.0);
        assert_eq!(c.close_offset(), 0.01);
        assert!(c.is_bullish());
        assert_eq!(c.body(), Rect::new(-5.0, 0.0, 10.0, 0.01));
    }

    #[test]
    fn bearish_body_sits_above_anchor() {
        let mut c = CandleVisual::new("series0", "data3");
        c.update(-8.0, -12.0, 4.0, 6.0);
        assert_eq!(c.direction(), Direction::Bearish);
        assert_eq!(c.body(), Rect::new(-3.0, -8.0, 6.0, 8.0));
        assert_eq!(c.line(), LineSegment { start_y: -12.0, end_y: 4.0 });
        assert_eq!(
            c.body_classes(),
            ["candlestick-bar", "series0", "data3", "close-above-open"]
        );
        assert_eq!(c.root_classes(), ["candlestick-candle", "series0", "data3"]);
    }

    #[test]
    fn sentinel_width_uses_intrinsic() {
        let mut c = CandleVisual::new("series0", "data0").with_intrinsic_width(9.0);
        c.update(3.0, -1.0, 6.0, -1.0);
        assert_eq!(c.body().width, 9.0);
        assert_eq!(c.body().x, -4.5);
        assert_eq!(c.line_classes()[3], "open-above-close");
    }

    #[test]
    fn reclassing_keeps_direction_tag() {
        let mut c = CandleVisual::new("series0", "data0");
        c.update(-2.0, -3.0, 1.0, 4.0);
        c.set_series_and_data_classes("series0", "data7");
        assert_eq!(c.line_classes(), ["candlestick-line", "series0", "data7", "close-above-open"]);
    }

    #[test]
    fn bounds_follow_layout_anchor() {
        let mut c = CandleVisual::new("series0", "data0");
        c.update(4.0, -6.0, 8.0, 10.0);
        c.relocate(100.0, 50.0);
        assert_eq!(c.bounds(), Rect::from_ltrb(95.0, 44.0, 105.0, 58.0));
    }
}
