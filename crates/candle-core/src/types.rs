// File: crates/candle-core/src/types.rs
// Summary: Shared constants (candle sizing, fade timing) and plot insets.

use std::time::Duration;

/// Pixel constant `K` in `K / (visible amplitude / bar period)`.
pub const CANDLE_WIDTH_SCALE: f64 = 500.0;
/// Intrinsic candle body width in pixels, used when no width can be derived.
pub const DEFAULT_CANDLE_WIDTH: f64 = 7.0;
/// Width sentinel passed to `CandleVisual::update` meaning "use the intrinsic width".
pub const INTRINSIC_WIDTH: f64 = -1.0;
/// A close offset of exactly zero is replaced by this value so the body never collapses.
pub const MIN_CLOSE_OFFSET: f64 = 0.01;
/// Enter and exit fade duration.
pub const FADE_DURATION: Duration = Duration::from_millis(500);

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(24, 72, 24, 56)
    }
}

/// Which way the price axis sits; the original pane keeps it on the right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Side {
    Left,
    #[default]
    Right,
}
