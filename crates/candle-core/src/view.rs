// File: crates/candle-core/src/view.rs
// Summary: Visible window state: data bounds, y autoscale over the visible x range, scroll zoom, pan, time frames.

use crate::axis::LinearAxis;
use crate::state::ChartState;

/// Navigation presets for the price pane. `All` spans the whole data set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeFrame {
    H1,
    H6,
    H12,
    D1,
    D7,
    D14,
    D30,
    All,
}

impl TimeFrame {
    pub const PRESETS: [TimeFrame; 8] = [
        TimeFrame::H1,
        TimeFrame::H6,
        TimeFrame::H12,
        TimeFrame::D1,
        TimeFrame::D7,
        TimeFrame::D14,
        TimeFrame::D30,
        TimeFrame::All,
    ];

    pub fn seconds(self) -> Option<i64> {
        const H: i64 = 3600;
        match self {
            TimeFrame::H1 => Some(H),
            TimeFrame::H6 => Some(H * 6),
            TimeFrame::H12 => Some(H * 12),
            TimeFrame::D1 => Some(H * 24),
            TimeFrame::D7 => Some(H * 24 * 7),
            TimeFrame::D14 => Some(H * 24 * 14),
            TimeFrame::D30 => Some(H * 24 * 30),
            TimeFrame::All => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeFrame::H1 => "1H",
            TimeFrame::H6 => "6H",
            TimeFrame::H12 => "12H",
            TimeFrame::D1 => "1D",
            TimeFrame::D7 => "7D",
            TimeFrame::D14 => "14D",
            TimeFrame::D30 => "30D",
            TimeFrame::All => "ALL",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ViewState {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self { x_min, x_max, y_min, y_max }
    }

    /// Bounds over every point; bars contribute their low and high.
    pub fn from_state(state: &ChartState) -> Self {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for s in state.series() {
            for p in s.points() {
                x_min = x_min.min(p.x);
                x_max = x_max.max(p.x);
                let (lo, hi) = p.bar.map(|b| (b.low, b.high)).unwrap_or((p.y, p.y));
                y_min = y_min.min(lo);
                y_max = y_max.max(hi);
            }
        }
        if !x_min.is_finite() || !x_max.is_finite() || !y_min.is_finite() || !y_max.is_finite() {
            return Self { x_min: 0.0, x_max: 1.0, y_min: 0.0, y_max: 1.0 };
        }
        if (x_max - x_min).abs() < 1e-9 { x_max = x_min + 1.0; }
        if (y_max - y_min).abs() < 1e-9 { y_max = y_min + 1.0; }
        Self { x_min, x_max, y_min, y_max }
    }

    /// Fit y to the representative values of points inside the visible x window,
    /// padded by a tenth of the amplitude. Returns false when nothing is visible.
    pub fn autoscale_y_visible(&mut self, state: &ChartState) -> bool {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for s in state.series() {
            for p in s.points().iter().filter(|p| p.x >= self.x_min && p.x <= self.x_max) {
                lo = lo.min(p.y);
                hi = hi.max(p.y);
            }
        }
        if !lo.is_finite() || !hi.is_finite() {
            return false;
        }
        let amplitude = hi - lo;
        self.y_min = lo - amplitude * 0.1;
        self.y_max = hi + amplitude * 0.1;
        true
    }

    /// Mouse-wheel zoom: moves the lower x bound by a twentieth of the span.
    /// Negative deltas widen the window, positive deltas narrow it.
    pub fn scroll_zoom(&mut self, delta_y: f64) {
        let step = (self.x_max - self.x_min) / 20.0;
        self.x_min -= step * if delta_y < 0.0 { 1.0 } else { -1.0 };
    }

    pub fn pan_by_pixels(&mut self, dx: f64, plot_width: f64) {
        let plot_w = plot_width.max(1.0);
        let wx = -dx / plot_w * (self.x_max - self.x_min);
        self.x_min += wx;
        self.x_max += wx;
    }

    /// Shift the window by whole frames (`-1` for the `<` button, `1` for `>`).
    pub fn shift_frames(&mut self, frames: i32) {
        let span = self.x_max - self.x_min;
        self.x_min += span * frames as f64;
        self.x_max += span * frames as f64;
    }

    /// X window ending at `max_ts` for a preset; `All` spans `[min_ts, max_ts]`.
    pub fn frame(&mut self, tf: TimeFrame, min_ts: i64, max_ts: i64) {
        let start = tf.seconds().map(|s| max_ts - s).unwrap_or(min_ts);
        self.x_min = start as f64;
        self.x_max = max_ts as f64;
    }

    pub fn apply_to(&self, x_axis: &mut LinearAxis, y_axis: &mut LinearAxis) {
        x_axis.set_range(self.x_min, self.x_max);
        y_axis.set_range(self.y_min, self.y_max);
    }
}
