// File: crates/candle-core/src/config.rs
// Summary: Controller options (animation policy, display mode, candle sizing).

use crate::types::{CANDLE_WIDTH_SCALE, DEFAULT_CANDLE_WIDTH};

/// Whether candle bodies are drawn or only the plain price line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Candles,
    Line,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartConfig {
    /// Fade candles in and out when points are added or removed.
    pub animated: bool,
    pub display_mode: DisplayMode,
    /// `K` in `K / (visible amplitude / bar period)`.
    pub candle_width_scale: f64,
    /// Intrinsic body width used whenever no width can be derived.
    pub default_candle_width: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            animated: false,
            display_mode: DisplayMode::Candles,
            candle_width_scale: CANDLE_WIDTH_SCALE,
            default_candle_width: DEFAULT_CANDLE_WIDTH,
        }
    }
}
