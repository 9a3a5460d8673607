// File: crates/candle-core/src/path.rs
// Summary: Per-series overlay polyline, cleared and rebuilt on every layout pass.

use crate::series::SeriesId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathElement {
    MoveTo(f64, f64),
    LineTo(f64, f64),
}

impl PathElement {
    pub fn point(&self) -> (f64, f64) {
        match *self {
            PathElement::MoveTo(x, y) | PathElement::LineTo(x, y) => (x, y),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SeriesPath {
    pub(crate) series: SeriesId,
    style_classes: Vec<String>,
    elements: Vec<PathElement>,
    pub(crate) visible: bool,
}

impl SeriesPath {
    /// Style classes follow the series' position: the primary series' path is the average line.
    pub fn new(series: SeriesId, series_index: usize, primary: bool) -> Self {
        let mut style_classes = Vec::with_capacity(2);
        if primary {
            style_classes.push("candlestick-average-line".to_string());
        }
        style_classes.push(format!("candlestick-series-{series_index}"));
        Self { series, style_classes, elements: Vec::new(), visible: true }
    }

    pub fn with_extra_class(mut self, class: Option<&str>) -> Self {
        self.style_classes.extend(class.map(str::to_string));
        self
    }

    pub fn clear(&mut self) { self.elements.clear(); }

    pub fn push(&mut self, x: f64, y: f64) {
        let el = if self.elements.is_empty() { PathElement::MoveTo(x, y) } else { PathElement::LineTo(x, y) };
        self.elements.push(el);
    }

    pub fn series_id(&self) -> SeriesId { self.series }
    pub fn elements(&self) -> &[PathElement] { &self.elements }
    pub fn style_classes(&self) -> &[String] { &self.style_classes }
    pub fn is_visible(&self) -> bool { self.visible }
    pub fn is_empty(&self) -> bool { self.elements.is_empty() }
}
