// File: crates/candle-core/src/downsample.rs
// Summary: Bar decimation so a time window never feeds more than a fixed number of candles.

use crate::bar::Bar;

/// Default cap on candles handed to the chart for one window.
pub const MAX_TICKS: usize = 400;

/// Smallest stride `k` with `count / k <= max_ticks`.
pub fn stride_for(count: usize, max_ticks: usize) -> usize {
    let max_ticks = max_ticks.max(1);
    let mut k = 1;
    while count / k > max_ticks {
        k += 1;
    }
    k
}

/// Keep bars with `min_ts <= x <= max_ts`, taking every k-th one (first included).
/// Input is assumed sorted by x.
pub fn decimate(bars: &[Bar], min_ts: f64, max_ts: f64, max_ticks: usize) -> Vec<Bar> {
    let in_window = bars.iter().filter(|b| b.x >= min_ts && b.x <= max_ts).count();
    let k = stride_for(in_window, max_ticks);
    bars.iter()
        .skip_while(|b| b.x < min_ts)
        .take_while(|b| b.x <= max_ts)
        .step_by(k)
        .copied()
        .collect()
}
