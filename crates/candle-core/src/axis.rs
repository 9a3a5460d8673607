// File: crates/candle-core/src/axis.rs
// Summary: Axis transform contract plus a linear implementation with pan/zoom hooks and tick helpers.

use chrono::{DateTime, Utc};

/// Domain-to-pixel mapping supplied by the host.
pub trait AxisTransform {
    fn to_pixel(&self, value: f64) -> f64;
    /// Currently visible domain range as `(lower, upper)`.
    fn visible_range(&self) -> (f64, f64);
}

/// Linear axis mapping `[lower, upper]` onto `[px_start, px_end]`.
///
/// A screen y axis usually runs `px_start = bottom`, `px_end = top` so larger
/// prices land higher up.
#[derive(Clone, Debug)]
pub struct LinearAxis {
    pub label: String,
    pub lower: f64,
    pub upper: f64,
    pub px_start: f64,
    pub px_end: f64,
}

impl LinearAxis {
    pub fn new(label: impl Into<String>, lower: f64, upper: f64, px_start: f64, px_end: f64) -> Self {
        Self { label: label.into(), lower, upper, px_start, px_end }
    }

    pub fn set_range(&mut self, lower: f64, upper: f64) {
        self.lower = lower;
        self.upper = upper;
    }

    pub fn set_pixels(&mut self, px_start: f64, px_end: f64) {
        self.px_start = px_start;
        self.px_end = px_end;
    }

    pub fn from_pixel(&self, px: f64) -> f64 {
        let pspan = self.px_end - self.px_start;
        if pspan.abs() < 1e-12 { return self.lower; }
        self.lower + (px - self.px_start) / pspan * (self.upper - self.lower)
    }

    /// Shift the visible range by a pixel distance along the axis.
    pub fn pan_px(&mut self, d_px: f64) {
        let pspan = self.px_end - self.px_start;
        if pspan.abs() < 1e-12 { return; }
        let delta = d_px / pspan * (self.upper - self.lower);
        self.lower -= delta;
        self.upper -= delta;
    }

    /// Zoom around the domain value under `cursor_px`; `factor > 1` zooms in.
    pub fn zoom_at(&mut self, cursor_px: f64, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) { return; }
        let pivot = self.from_pixel(cursor_px);
        self.lower = pivot - (pivot - self.lower) / factor;
        self.upper = pivot + (self.upper - pivot) / factor;
    }

    /// `steps` evenly spaced values across the visible range.
    pub fn ticks(&self, steps: usize) -> Vec<f64> { linspace(self.lower, self.upper, steps) }
}

impl AxisTransform for LinearAxis {
    #[inline]
    fn to_pixel(&self, value: f64) -> f64 {
        let span = (self.upper - self.lower).max(1e-12);
        self.px_start + (value - self.lower) / span * (self.px_end - self.px_start)
    }

    fn visible_range(&self) -> (f64, f64) { (self.lower, self.upper) }
}

pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 { return vec![start, end]; }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

/// UTC `MM-dd HH:mm` label for an epoch-seconds tick.
pub fn format_time_tick(epoch_secs: f64) -> String {
    if !epoch_secs.is_finite() { return String::new(); }
    DateTime::<Utc>::from_timestamp(epoch_secs.floor() as i64, 0)
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
