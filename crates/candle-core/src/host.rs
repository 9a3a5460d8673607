// File: crates/candle-core/src/host.rs
// Summary: Render-host capability interface driven by `ChartState` change notifications.

use crate::series::{DataPoint, Series};
use crate::state::ChartState;

/// Something that mirrors a `ChartState` into visuals.
///
/// `ChartState` calls the `on_*` hooks synchronously, in mutation order, after
/// the change has been applied. The host's frame loop calls `layout_pass` once
/// after any hook that changes visible geometry.
pub trait RenderHost {
    fn on_series_added(&mut self, series: &Series, series_index: usize);
    fn on_series_removed(&mut self, series: &Series);
    fn on_data_item_added(&mut self, series: &Series, item_index: usize, item: &DataPoint);
    fn on_data_item_removed(&mut self, item: &DataPoint, series: &Series);
    fn layout_pass(&mut self, state: &ChartState);
}
