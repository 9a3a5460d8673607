// File: crates/candle-core/src/bar.rs
// Summary: OHLC bar payload carried by primary-series data points.

use crate::error::{ChartError, ChartResult};

/// One time-indexed price observation. Bars are replaced, never mutated in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub x: f64, // time/index (displayed on X)
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub const fn new(x: f64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self { x, open, high, low, close }
    }

    /// Try to construct a bar enforcing OHLC invariants:
    /// l <= min(o,c) and h >= max(o,c), and every value finite.
    pub fn try_new(x: f64, open: f64, high: f64, low: f64, close: f64) -> ChartResult<Self> {
        if ![x, open, high, low, close].iter().all(|v| v.is_finite()) {
            return Err(ChartError::InvalidBar("non-finite value"));
        }
        if low > open.min(close) { return Err(ChartError::InvalidBar("low above min(open,close)")); }
        if high < open.max(close) { return Err(ChartError::InvalidBar("high below max(open,close)")); }
        Ok(Self { x, open, high, low, close })
    }
}

/// Values shown when hovering a candle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarSummary {
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
}

impl From<&Bar> for BarSummary {
    fn from(b: &Bar) -> Self {
        Self { open: b.open, close: b.close, high: b.high, low: b.low }
    }
}

impl std::fmt::Display for BarSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "O: {:.4}\nC: {:.4}\nH: {:.4}\nL: {:.4}", self.open, self.close, self.high, self.low)
    }
}
