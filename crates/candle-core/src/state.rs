// File: crates/candle-core/src/state.rs
// Summary: Observable series collection; owns series and bars, notifies render hosts on change.

use std::cell::RefCell;
use std::rc::Weak;

use slotmap::SlotMap;
use tracing::{trace, warn};

use crate::bar::Bar;
use crate::error::{ChartError, ChartResult};
use crate::host::RenderHost;
use crate::series::{DataPoint, PointId, Series, SeriesId};

#[derive(Default)]
pub struct ChartState {
    series: SlotMap<SeriesId, Series>,
    order: Vec<SeriesId>,
    next_point: u64,
    observers: Vec<Weak<RefCell<dyn RenderHost>>>,
}

impl ChartState {
    pub fn new() -> Self { Self::default() }

    /// Register a host for change notifications. Dropped hosts are pruned lazily.
    pub fn subscribe(&mut self, host: Weak<RefCell<dyn RenderHost>>) {
        self.observers.retain(|w| w.strong_count() > 0);
        self.observers.push(host);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.iter().filter(|w| w.strong_count() > 0).count()
    }

    pub fn len(&self) -> usize { self.order.len() }
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    /// Series in insertion order.
    pub fn series(&self) -> impl Iterator<Item = &Series> + '_ {
        self.order.iter().filter_map(move |id| self.series.get(*id))
    }

    pub fn get(&self, id: SeriesId) -> Option<&Series> { self.series.get(id) }

    pub fn primary(&self) -> Option<&Series> { self.series().find(|s| s.is_primary()) }

    pub fn add_series(&mut self, mut series: Series) -> ChartResult<SeriesId> {
        if series.is_primary() && self.primary().is_some() {
            return Err(ChartError::PrimaryAlreadySet);
        }
        for p in &mut series.points {
            p.id = self.alloc_point();
        }
        let id = self.series.insert_with_key(|key| {
            series.id = key;
            series
        });
        self.order.push(id);
        let index = self.order.len() - 1;
        trace!(index, points = self.series[id].len(), "series added");
        self.notify(|host| host.on_series_added(&self.series[id], index));
        Ok(id)
    }

    pub fn remove_series(&mut self, id: SeriesId) -> ChartResult<Series> {
        let series = self.series.remove(id).ok_or(ChartError::UnknownSeries)?;
        self.order.retain(|s| *s != id);
        trace!(points = series.len(), "series removed");
        self.notify(|host| host.on_series_removed(&series));
        Ok(series)
    }

    pub fn push_point(&mut self, id: SeriesId, point: DataPoint) -> ChartResult<PointId> {
        let len = self.series.get(id).ok_or(ChartError::UnknownSeries)?.len();
        self.insert_point(id, len, point)
    }

    pub fn insert_point(&mut self, id: SeriesId, index: usize, mut point: DataPoint) -> ChartResult<PointId> {
        let len = self.series.get(id).ok_or(ChartError::UnknownSeries)?.len();
        if index > len {
            return Err(ChartError::IndexOutOfRange { index, len });
        }
        let pid = self.alloc_point();
        point.id = pid;
        self.series[id].points.insert(index, point);
        self.notify(|host| {
            let series = &self.series[id];
            host.on_data_item_added(series, index, &series.points[index])
        });
        Ok(pid)
    }

    pub fn remove_point(&mut self, id: SeriesId, point: PointId) -> ChartResult<DataPoint> {
        let series = self.series.get_mut(id).ok_or(ChartError::UnknownSeries)?;
        let index = series.position_of(point).ok_or(ChartError::UnknownPoint)?;
        let item = series.points.remove(index);
        self.notify(|host| host.on_data_item_removed(&item, &self.series[id]));
        Ok(item)
    }

    /// Swap in a new bar for an existing point. Geometry follows on the next layout pass.
    pub fn replace_bar(&mut self, id: SeriesId, point: PointId, bar: Bar) -> ChartResult<()> {
        let series = self.series.get_mut(id).ok_or(ChartError::UnknownSeries)?;
        let index = series.position_of(point).ok_or(ChartError::UnknownPoint)?;
        let p = &mut series.points[index];
        p.y = bar.open;
        p.bar = Some(bar);
        Ok(())
    }

    fn alloc_point(&mut self) -> PointId {
        self.next_point += 1;
        PointId(self.next_point)
    }

    fn notify(&self, f: impl Fn(&mut dyn RenderHost)) {
        for weak in &self.observers {
            let Some(host) = weak.upgrade() else { continue };
            match host.try_borrow_mut() {
                Ok(mut h) => f(&mut *h),
                Err(_) => warn!("render host is busy; change notification dropped"),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl RenderHost for Recorder {
        fn on_series_added(&mut self, series: &Series, series_index: usize) {
            self.events.push(format!("series+ {} @{series_index}", series.name));
        }
        fn on_series_removed(&mut self, series: &Series) {
            self.events.push(format!("series- {}", series.name));
        }
        fn on_data_item_added(&mut self, _series: &Series, item_index: usize, _item: &DataPoint) {
            self.events.push(format!("item+ @{item_index}"));
        }
        fn on_data_item_removed(&mut self, _item: &DataPoint, _series: &Series) {
            self.events.push("item-".into());
        }
        fn layout_pass(&mut self, _state: &ChartState) {}
    }

    fn subscribed(state: &mut ChartState) -> Rc<RefCell<Recorder>> {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        let host: Rc<RefCell<dyn RenderHost>> = rec.clone();
        state.subscribe(Rc::downgrade(&host));
        rec
    }

    #[test]
    fn hooks_fire_in_mutation_order() {
        let mut state = ChartState::new();
        let rec = subscribed(&mut state);
        let sid = state.add_series(Series::overlay("o")).expect("add");
        let pid = state.push_point(sid, DataPoint::xy(0.0, 1.0)).expect("push");
        state.insert_point(sid, 0, DataPoint::xy(-1.0, 1.0)).expect("insert");
        state.remove_point(sid, pid).expect("remove");
        state.remove_series(sid).expect("remove series");
        assert_eq!(rec.borrow().events, ["series+ o @0", "item+ @0", "item+ @0", "item-", "series- o"]);
    }

    #[test]
    fn busy_host_misses_the_change() {
        let mut state = ChartState::new();
        let rec = subscribed(&mut state);
        let sid = {
            let _held = rec.borrow_mut();
            state.add_series(Series::overlay("o")).expect("add")
        };
        state.push_point(sid, DataPoint::xy(0.0, 1.0)).expect("push");
        assert_eq!(rec.borrow().events, ["item+ @0"]);
        assert_eq!(state.get(sid).expect("series").points().len(), 1);
    }
}
