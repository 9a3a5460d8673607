// File: crates/candle-core/src/controller.rs
// Summary: Chart controller: mirrors ChartState into candle nodes, overlay paths and markers;
// runs the layout pass, enter/exit fades and click selection.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::animation::{Animator, Completion, FadeTask, NodeKey};
use crate::axis::AxisTransform;
use crate::bar::{Bar, BarSummary};
use crate::candle::CandleVisual;
use crate::config::{ChartConfig, DisplayMode};
use crate::host::RenderHost;
use crate::lifecycle::NodeState;
use crate::path::SeriesPath;
use crate::series::{DataPoint, Marker, PointId, Series, SeriesId};
use crate::state::ChartState;
use crate::types::INTRINSIC_WIDTH;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputButton {
    Primary,
    Secondary,
    Middle,
}

pub type SelectFn = Box<dyn FnMut(&Bar, InputButton)>;

/// Time source used to stamp fades at the moment of the change that starts them.
pub type Clock = Box<dyn Fn() -> Instant>;

/// A data point's own marker node, attached as-is and positioned at its pixel (x, y).
#[derive(Clone, Debug)]
pub struct MarkerVisual {
    series: SeriesId,
    point: PointId,
    marker: Marker,
    layout: (f64, f64),
}

impl MarkerVisual {
    pub fn series_id(&self) -> SeriesId { self.series }
    pub fn point_id(&self) -> PointId { self.point }
    pub fn marker(&self) -> &Marker { &self.marker }
    pub fn layout(&self) -> (f64, f64) { self.layout }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TreeEntry {
    Candle(NodeKey),
    Path(SeriesId),
    Marker(PointId),
}

/// One render-tree child, in paint order.
#[derive(Clone, Copy, Debug)]
pub enum RenderItem<'a> {
    Candle(&'a CandleVisual),
    Path(&'a SeriesPath),
    Marker(&'a MarkerVisual),
}

pub struct ChartController<X, Y> {
    config: ChartConfig,
    x_axis: X,
    y_axis: Y,
    nodes: SlotMap<NodeKey, CandleVisual>,
    node_by_point: FxHashMap<PointId, NodeKey>,
    series_index: FxHashMap<SeriesId, usize>,
    paths: FxHashMap<SeriesId, SeriesPath>,
    markers: FxHashMap<PointId, MarkerVisual>,
    tree: Vec<TreeEntry>,
    /// Points already gone from the state whose nodes are still fading out.
    exiting: FxHashMap<NodeKey, DataPoint>,
    last_width: f64,
    animator: Animator,
    clock: Clock,
    on_select: SelectFn,
}

impl<X: AxisTransform, Y: AxisTransform> ChartController<X, Y> {
    pub fn new(x_axis: X, y_axis: Y, config: ChartConfig) -> Self {
        Self {
            config,
            x_axis,
            y_axis,
            nodes: SlotMap::with_key(),
            node_by_point: FxHashMap::default(),
            series_index: FxHashMap::default(),
            paths: FxHashMap::default(),
            markers: FxHashMap::default(),
            tree: Vec::new(),
            exiting: FxHashMap::default(),
            last_width: INTRINSIC_WIDTH,
            animator: Animator::new(),
            clock: Box::new(Instant::now),
            on_select: Box::new(|_, _| {}),
        }
    }

    /// Build a controller for `state`, replay its current series and subscribe to its changes.
    pub fn attach(x_axis: X, y_axis: Y, config: ChartConfig, state: &mut ChartState) -> Rc<RefCell<Self>>
    where
        X: 'static,
        Y: 'static,
    {
        let mut controller = Self::new(x_axis, y_axis, config);
        for (index, series) in state.series().enumerate() {
            controller.on_series_added(series, index);
        }
        let rc = Rc::new(RefCell::new(controller));
        let host: Rc<RefCell<dyn RenderHost>> = rc.clone();
        state.subscribe(Rc::downgrade(&host));
        rc
    }

    // ---- host-facing settings ----------------------------------------------

    pub fn config(&self) -> &ChartConfig { &self.config }
    pub fn display_mode(&self) -> DisplayMode { self.config.display_mode }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.config.display_mode = mode;
        let candles = mode == DisplayMode::Candles;
        for node in self.nodes.values_mut() {
            node.visible = candles;
        }
        for path in self.paths.values_mut() {
            if path.style_classes().iter().any(|c| c == "candlestick-average-line") {
                path.visible = !candles;
            }
        }
    }

    pub fn set_animated(&mut self, animated: bool) { self.config.animated = animated; }

    /// Replace the time source fades are stamped with (`Instant::now` by default).
    pub fn set_clock(&mut self, clock: impl Fn() -> Instant + 'static) {
        self.clock = Box::new(clock);
    }

    pub fn set_on_select(&mut self, f: impl FnMut(&Bar, InputButton) + 'static) {
        self.on_select = Box::new(f);
    }

    pub fn x_axis(&self) -> &X { &self.x_axis }
    pub fn y_axis(&self) -> &Y { &self.y_axis }
    pub fn x_axis_mut(&mut self) -> &mut X { &mut self.x_axis }
    pub fn y_axis_mut(&mut self) -> &mut Y { &mut self.y_axis }

    // ---- inspection ---------------------------------------------------------

    /// Render tree children in paint order.
    pub fn render_items(&self) -> impl Iterator<Item = RenderItem<'_>> + '_ {
        self.tree.iter().filter_map(move |e| match e {
            TreeEntry::Candle(k) => self.nodes.get(*k).map(RenderItem::Candle),
            TreeEntry::Path(s) => self.paths.get(s).map(RenderItem::Path),
            TreeEntry::Marker(p) => self.markers.get(p).map(RenderItem::Marker),
        })
    }

    pub fn candles(&self) -> impl Iterator<Item = &CandleVisual> + '_ { self.nodes.values() }
    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn tree_len(&self) -> usize { self.tree.len() }
    pub fn pending_animations(&self) -> usize { self.animator.len() }

    pub fn candle_for(&self, point: PointId) -> Option<&CandleVisual> {
        self.node_by_point.get(&point).and_then(|k| self.nodes.get(*k))
    }

    pub fn path_for(&self, series: SeriesId) -> Option<&SeriesPath> { self.paths.get(&series) }
    pub fn marker_for(&self, point: PointId) -> Option<&MarkerVisual> { self.markers.get(&point) }

    /// Body width the next layout pass applies, with the intrinsic-width fallback resolved.
    pub fn effective_candle_width(&self, state: &ChartState) -> f64 {
        let w = self.candle_width(state);
        if w == INTRINSIC_WIDTH { self.config.default_candle_width } else { w }
    }

    // ---- animation ----------------------------------------------------------

    /// Advance fades to `now`. Returns true while any fade is still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        for step in self.animator.tick(now) {
            let Some(node) = self.nodes.get_mut(step.node) else { continue };
            node.opacity = step.opacity;
            let target = match step.completed {
                Some(Completion::MarkVisible) => NodeState::Visible,
                Some(Completion::Detach) => NodeState::Removed,
                None => continue,
            };
            match node.state.transition(target) {
                Ok(state) => node.state = state,
                Err(e) => {
                    warn!(%e, "fade completion ignored");
                    continue;
                }
            }
            if target == NodeState::Removed {
                self.detach(step.node);
            }
        }
        !self.animator.is_empty()
    }

    // ---- selection ----------------------------------------------------------

    /// Hit-test shown candles at a chart pixel, topmost first, and fire the selection callback.
    pub fn select_at(&mut self, state: &ChartState, px: f64, py: f64, button: InputButton) -> bool {
        if self.config.display_mode != DisplayMode::Candles {
            return false;
        }
        let hit = self.tree.iter().rev().find_map(|e| match e {
            TreeEntry::Candle(k) => self
                .nodes
                .get(*k)
                .filter(|n| n.visible && matches!(n.state, NodeState::Entering | NodeState::Visible))
                .filter(|n| n.bounds().contains(px, py))
                .map(|n| n.point),
            _ => None,
        });
        match hit {
            Some(point) => self.select_point(state, point, button),
            None => false,
        }
    }

    /// Fire the selection callback for a primary-series point that carries a bar.
    pub fn select_point(&mut self, state: &ChartState, point: PointId, button: InputButton) -> bool {
        let bar = state
            .primary()
            .and_then(|s| s.points().iter().find(|p| p.id() == point))
            .and_then(|p| p.bar);
        match bar {
            Some(bar) => {
                (self.on_select)(&bar, button);
                true
            }
            None => false,
        }
    }

    // ---- internals ----------------------------------------------------------

    fn candle_width(&self, state: &ChartState) -> f64 {
        let Some(period) = state.primary().and_then(Series::bar_period) else {
            trace!("fewer than two primary points; intrinsic candle width");
            return INTRINSIC_WIDTH;
        };
        let (lower, upper) = self.x_axis.visible_range();
        let amplitude = upper - lower;
        if !(amplitude.is_finite() && amplitude > 0.0 && period.is_finite() && period > 0.0) {
            trace!(amplitude, period, "degenerate axis range or bar period; intrinsic candle width");
            return INTRINSIC_WIDTH;
        }
        let width = self.config.candle_width_scale / (amplitude / period);
        if width.is_finite() && width > 0.0 { width } else { INTRINSIC_WIDTH }
    }

    fn create_candle(&mut self, series: &Series, item_index: usize, item: &DataPoint) {
        let series_index = self.series_index.get(&series.id()).copied().unwrap_or_default();
        let (series_class, data_class) = (format!("series{series_index}"), format!("data{item_index}"));
        if let Some(node) = self.node_by_point.get(&item.id()).and_then(|k| self.nodes.get_mut(*k)) {
            node.set_series_and_data_classes(series_class, data_class);
            return;
        }

        let mut node = CandleVisual::new(series_class, data_class).with_intrinsic_width(self.config.default_candle_width);
        node.series = series.id();
        node.point = item.id();
        node.visible = self.config.display_mode == DisplayMode::Candles;
        node.state = NodeState::on_add(self.config.animated);
        if self.config.animated {
            node.opacity = 0.0;
        }
        let key = self.nodes.insert(node);
        self.node_by_point.insert(item.id(), key);

        // Candles stay beneath every overlay path and marker.
        let slot = self.tree.iter().position(|e| !matches!(e, TreeEntry::Candle(_))).unwrap_or(self.tree.len());
        self.tree.insert(slot, TreeEntry::Candle(key));

        if self.config.animated {
            self.animator.start(FadeTask::enter(key, (self.clock)()));
        }
    }

    fn retire_candle(&mut self, item: &DataPoint) {
        let Some(key) = self.node_by_point.remove(&item.id()) else {
            debug!(point = ?item.id(), "no candle for removed point");
            return;
        };
        let Some(node) = self.nodes.get_mut(key) else { return };
        let next = node.state.on_remove(self.config.animated);
        match node.state.transition(next) {
            Ok(state) => node.state = state,
            Err(e) => {
                warn!(%e, "candle removal ignored");
                return;
            }
        }
        match next {
            NodeState::Exiting => {
                let task = FadeTask::exit(key, (self.clock)(), node.opacity);
                self.animator.start(task);
                self.exiting.insert(key, item.clone());
            }
            _ => self.detach(key),
        }
    }

    fn detach(&mut self, key: NodeKey) {
        // Cancels a pending enter fade so no completion fires for a detached node.
        self.animator.cancel(key);
        self.exiting.remove(&key);
        self.nodes.remove(key);
        self.tree.retain(|e| *e != TreeEntry::Candle(key));
    }

    fn attach_marker(&mut self, series: &Series, item: &DataPoint) {
        let Some(marker) = item.marker.clone() else { return };
        let visual = MarkerVisual { series: series.id(), point: item.id(), marker, layout: (0.0, 0.0) };
        if self.markers.insert(item.id(), visual).is_none() {
            self.tree.push(TreeEntry::Marker(item.id()));
        }
    }

    fn detach_marker(&mut self, point: PointId) {
        if self.markers.remove(&point).is_some() {
            self.tree.retain(|e| *e != TreeEntry::Marker(point));
        }
    }

    fn bring_path_to_front(&mut self, series: SeriesId) {
        let entry = TreeEntry::Path(series);
        if let Some(pos) = self.tree.iter().position(|e| *e == entry) {
            self.tree.remove(pos);
            self.tree.push(entry);
        }
    }
}

impl<X: AxisTransform, Y: AxisTransform> RenderHost for ChartController<X, Y> {
    fn on_series_added(&mut self, series: &Series, series_index: usize) {
        debug!(series_index, points = series.len(), primary = series.is_primary(), "series added");
        self.series_index.insert(series.id(), series_index);
        for (j, item) in series.points().iter().enumerate() {
            if series.is_primary() {
                self.create_candle(series, j, item);
            } else {
                self.attach_marker(series, item);
            }
        }
        let mut path =
            SeriesPath::new(series.id(), series_index, series.is_primary()).with_extra_class(series.style_class.as_deref());
        if series.is_primary() {
            path.visible = self.config.display_mode == DisplayMode::Line;
        }
        if self.paths.insert(series.id(), path).is_none() {
            self.tree.push(TreeEntry::Path(series.id()));
        }
    }

    fn on_series_removed(&mut self, series: &Series) {
        debug!(points = series.len(), primary = series.is_primary(), "series removed");
        for item in series.points() {
            if series.is_primary() {
                self.retire_candle(item);
            } else {
                self.detach_marker(item.id());
            }
        }
        self.paths.remove(&series.id());
        self.series_index.remove(&series.id());
        self.tree.retain(|e| *e != TreeEntry::Path(series.id()));
    }

    fn on_data_item_added(&mut self, series: &Series, item_index: usize, item: &DataPoint) {
        if !series.is_primary() {
            self.attach_marker(series, item);
            return;
        }
        self.create_candle(series, item_index, item);
        // The average line is always drawn on top.
        self.bring_path_to_front(series.id());
    }

    fn on_data_item_removed(&mut self, item: &DataPoint, series: &Series) {
        if series.is_primary() {
            self.retire_candle(item);
        } else {
            self.detach_marker(item.id());
        }
    }

    fn layout_pass(&mut self, state: &ChartState) {
        if state.is_empty() && self.exiting.is_empty() {
            return;
        }
        // Nodes fading out after their series went away keep the last width.
        let width = match state.primary() {
            Some(_) => self.candle_width(state),
            None => self.last_width,
        };
        self.last_width = width;
        let candles = self.config.display_mode == DisplayMode::Candles;

        for series in state.series() {
            let primary = series.is_primary();
            let mut path = self.paths.get_mut(&series.id());
            if let Some(p) = path.as_deref_mut() {
                p.clear();
                if primary {
                    p.visible = !candles;
                }
            }

            for item in series.points() {
                let x = self.x_axis.to_pixel(item.x);
                let y = self.y_axis.to_pixel(item.y);

                if primary {
                    if let Some(node) = self.node_by_point.get(&item.id()).and_then(|k| self.nodes.get_mut(*k)) {
                        place_candle(&self.x_axis, &self.y_axis, node, item, width, candles);
                    }
                } else if let Some(m) = self.markers.get_mut(&item.id()) {
                    m.layout = (x, y);
                }

                if let Some(p) = path.as_deref_mut() {
                    p.push(x, self.y_axis.to_pixel(item.line_value()));
                }
            }
        }

        for (key, item) in &self.exiting {
            if let Some(node) = self.nodes.get_mut(*key) {
                place_candle(&self.x_axis, &self.y_axis, node, item, width, candles);
            }
        }
    }
}

/// Offsets relative to the point's open-price pixel, anchor at its (x, y).
fn place_candle<X: AxisTransform, Y: AxisTransform>(
    x_axis: &X,
    y_axis: &Y,
    node: &mut CandleVisual,
    item: &DataPoint,
    width: f64,
    shown: bool,
) {
    let x = x_axis.to_pixel(item.x);
    let y = y_axis.to_pixel(item.y);
    match item.bar {
        Some(bar) => {
            let close = y_axis.to_pixel(bar.close);
            let high = y_axis.to_pixel(bar.high);
            let low = y_axis.to_pixel(bar.low);
            node.update(close - y, high - y, low - y, width);
            node.update_tooltip(BarSummary::from(&bar));
            node.visible = shown;
        }
        None => node.visible = false,
    }
    node.relocate(x, y);
}
