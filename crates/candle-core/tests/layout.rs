// File: crates/candle-core/tests/layout.rs
// Purpose: Layout pass geometry: candle width derivation, offsets, fallbacks, overlay paths, display modes.

use candle_core::{
    Bar, ChartConfig, ChartController, ChartState, DataPoint, Direction, DisplayMode, LinearAxis, Marker, MarkerShape,
    PathElement, RenderHost, Series,
};

/// Axes where pixel == value, so offsets read directly as price differences.
fn identity_axes(x: (f64, f64)) -> (LinearAxis, LinearAxis) {
    (LinearAxis::new("X", x.0, x.1, x.0, x.1), LinearAxis::new("Y", 0.0, 1.0, 0.0, 1.0))
}

#[test]
fn two_bar_example_width_and_direction() {
    let mut state = ChartState::new();
    let (x, y) = identity_axes((1.0, 2.0));
    let chart = ChartController::attach(x, y, ChartConfig::default(), &mut state);
    let sid = state
        .add_series(Series::from_bars(
            "price",
            [Bar::new(1.0, 25.0, 32.0, 16.0, 20.0), Bar::new(2.0, 26.0, 33.0, 22.0, 30.0)],
        ))
        .expect("add");

    let mut c = chart.borrow_mut();
    c.layout_pass(&state);
    assert_eq!(c.effective_candle_width(&state), 500.0);

    let points = state.get(sid).expect("series").points();
    let first = c.candle_for(points[0].id()).expect("candle 1");
    assert_eq!(first.close_offset(), -5.0);
    assert_eq!(first.direction(), Direction::Bearish);
    assert_eq!(first.body().width, 500.0);
    assert_eq!(first.body().x, -250.0);
    assert_eq!(first.line().start_y, 7.0);
    assert_eq!(first.line().end_y, -9.0);
    assert_eq!(first.layout(), (1.0, 25.0));
    assert_eq!(first.tooltip().map(|t| t.close), Some(20.0));

    let second = c.candle_for(points[1].id()).expect("candle 2");
    assert_eq!(second.close_offset(), 4.0);
    assert_eq!(second.direction(), Direction::Bullish);
    assert_eq!(second.body().height, 4.0);
}

#[test]
fn width_is_positive_and_finite_for_increasing_bars() {
    for (n, span) in [(2usize, 1.0), (10, 9.0), (500, 120.0), (3, 1e-6)] {
        let mut state = ChartState::new();
        let bars = (0..n).map(|i| Bar::new(i as f64, 10.0, 12.0, 9.0, 11.0));
        state.add_series(Series::from_bars("p", bars)).expect("add");
        let (x, y) = identity_axes((0.0, span));
        let mut c = ChartController::new(x, y, ChartConfig::default());
        c.on_series_added(state.primary().expect("primary"), 0);
        c.layout_pass(&state);
        let w = c.effective_candle_width(&state);
        assert!(w.is_finite() && w > 0.0, "n={n} span={span} w={w}");
        assert!(c.candles().all(|n| n.body().width == w));
    }
}

#[test]
fn single_point_falls_back_to_intrinsic_width() {
    let mut state = ChartState::new();
    let (x, y) = identity_axes((0.0, 10.0));
    let cfg = ChartConfig { default_candle_width: 9.0, ..ChartConfig::default() };
    let chart = ChartController::attach(x, y, cfg, &mut state);
    state.add_series(Series::from_bars("p", [Bar::new(3.0, 10.0, 12.0, 9.0, 11.0)])).expect("add");

    let mut c = chart.borrow_mut();
    c.layout_pass(&state);
    assert_eq!(c.effective_candle_width(&state), 9.0);
    let node = c.candles().next().expect("one candle");
    assert_eq!(node.body().width, 9.0);
    assert_eq!(node.body().x, -4.5);
}

#[test]
fn degenerate_range_or_period_falls_back() {
    // zero-width visible range
    let mut state = ChartState::new();
    state
        .add_series(Series::from_bars("p", [Bar::new(0.0, 1.0, 2.0, 0.5, 1.5), Bar::new(1.0, 1.0, 2.0, 0.5, 1.5)]))
        .expect("add");
    let mut c = ChartController::new(
        LinearAxis::new("X", 4.0, 4.0, 0.0, 100.0),
        LinearAxis::new("Y", 0.0, 10.0, 0.0, 100.0),
        ChartConfig::default(),
    );
    c.on_series_added(state.primary().expect("primary"), 0);
    c.layout_pass(&state);
    assert_eq!(c.effective_candle_width(&state), 7.0);
    assert!(c.candles().all(|n| n.body().width == 7.0));

    // inverted range
    c.x_axis_mut().set_range(10.0, 0.0);
    c.layout_pass(&state);
    assert_eq!(c.effective_candle_width(&state), 7.0);

    // bars out of order give a negative period
    c.x_axis_mut().set_range(0.0, 10.0);
    assert_eq!(c.effective_candle_width(&state), 50.0);
    let mut state = ChartState::new();
    state
        .add_series(Series::from_bars("p", [Bar::new(5.0, 1.0, 2.0, 0.5, 1.5), Bar::new(4.0, 1.0, 2.0, 0.5, 1.5)]))
        .expect("add");
    assert_eq!(c.effective_candle_width(&state), 7.0);
}

#[test]
fn overlay_paths_have_one_point_per_item_in_x_order() {
    let mut state = ChartState::new();
    let (x, y) = identity_axes((0.0, 4.0));
    let chart = ChartController::attach(x, y, ChartConfig::default(), &mut state);
    let price = state
        .add_series(Series::from_bars(
            "price",
            [Bar::new(0.0, 10.0, 12.0, 9.0, 11.0), Bar::new(1.0, 11.0, 15.0, 10.0, 14.0)],
        ))
        .expect("price");
    let sma = state
        .add_series(Series::overlay("sma").with_points((0..4).map(|i| DataPoint::xy(i as f64, 20.0 + i as f64))))
        .expect("sma");

    let mut c = chart.borrow_mut();
    c.layout_pass(&state);

    let sma_path = c.path_for(sma).expect("sma path");
    assert_eq!(sma_path.elements().len(), 4);
    assert!(matches!(sma_path.elements()[0], PathElement::MoveTo(..)));
    assert!(sma_path.elements()[1..].iter().all(|e| matches!(e, PathElement::LineTo(..))));
    assert!(sma_path.elements().windows(2).all(|w| w[0].point().0 < w[1].point().0));

    // primary line follows closes
    let price_path = c.path_for(price).expect("price path");
    assert_eq!(price_path.elements(), [PathElement::MoveTo(0.0, 11.0), PathElement::LineTo(1.0, 14.0)]);

    // rebuilt, not appended, on the next pass
    c.layout_pass(&state);
    assert_eq!(c.path_for(sma).expect("sma path").elements().len(), 4);
    drop(c);

    state.push_point(sma, DataPoint::xy(4.0, 30.0)).expect("push");
    chart.borrow_mut().layout_pass(&state);
    assert_eq!(chart.borrow().path_for(sma).expect("sma path").elements().len(), 5);
}

#[test]
fn primary_point_without_bar_renders_on_the_line_only() {
    let mut state = ChartState::new();
    let (x, y) = identity_axes((0.0, 2.0));
    let chart = ChartController::attach(x, y, ChartConfig::default(), &mut state);
    let sid = state
        .add_series(Series::primary("p").with_points([
            DataPoint::from_bar(Bar::new(0.0, 10.0, 12.0, 9.0, 11.0)),
            DataPoint::xy(1.0, 13.0),
        ]))
        .expect("add");
    let mut c = chart.borrow_mut();
    c.layout_pass(&state);

    let bare = state.get(sid).expect("series").points()[1].id();
    let node = c.candle_for(bare).expect("node exists");
    assert!(!node.is_visible());
    assert_eq!(node.layout(), (1.0, 13.0));
    let path = c.path_for(sid).expect("path");
    assert_eq!(path.elements()[1], PathElement::LineTo(1.0, 13.0));
}

#[test]
fn display_mode_swaps_candles_and_average_line() {
    let mut state = ChartState::new();
    let (x, y) = identity_axes((0.0, 2.0));
    let chart = ChartController::attach(x, y, ChartConfig::default(), &mut state);
    let sid = state
        .add_series(Series::from_bars("p", [Bar::new(0.0, 10.0, 12.0, 9.0, 11.0), Bar::new(1.0, 1.0, 2.0, 0.5, 1.5)]))
        .expect("add");
    let overlay = state.add_series(Series::overlay("o").with_points([DataPoint::xy(0.0, 1.0)])).expect("overlay");

    let mut c = chart.borrow_mut();
    c.layout_pass(&state);
    assert_eq!(c.display_mode(), DisplayMode::Candles);
    assert!(c.candles().all(|n| n.is_visible()));
    assert!(!c.path_for(sid).expect("path").is_visible());
    assert!(c.path_for(overlay).expect("path").is_visible());

    c.set_display_mode(DisplayMode::Line);
    assert!(c.candles().all(|n| !n.is_visible()));
    assert!(c.path_for(sid).expect("path").is_visible());
    c.layout_pass(&state);
    assert!(c.candles().all(|n| !n.is_visible()));
    assert!(c.path_for(overlay).expect("path").is_visible());
}

#[test]
fn replaced_bar_shows_on_next_pass() {
    let mut state = ChartState::new();
    let (x, y) = identity_axes((0.0, 2.0));
    let chart = ChartController::attach(x, y, ChartConfig::default(), &mut state);
    let sid = state
        .add_series(Series::from_bars("p", [Bar::new(0.0, 10.0, 12.0, 9.0, 11.0), Bar::new(1.0, 11.0, 13.0, 10.0, 12.0)]))
        .expect("add");
    let pid = state.get(sid).expect("series").points()[1].id();
    chart.borrow_mut().layout_pass(&state);
    assert!(chart.borrow().candle_for(pid).expect("node").is_bullish());

    state.replace_bar(sid, pid, Bar::new(1.0, 12.0, 13.0, 8.0, 9.0)).expect("replace");
    chart.borrow_mut().layout_pass(&state);
    let c = chart.borrow();
    let node = c.candle_for(pid).expect("node");
    assert_eq!(node.direction(), Direction::Bearish);
    assert_eq!(node.close_offset(), -3.0);
    assert_eq!(node.layout(), (1.0, 12.0));
}

#[test]
fn markers_are_attached_and_positioned() {
    let mut state = ChartState::new();
    let (x, y) = identity_axes((0.0, 10.0));
    let chart = ChartController::attach(x, y, ChartConfig::default(), &mut state);
    let ops = state
        .add_series(Series::overlay("operations").with_points([
            DataPoint::xy(2.0, 40.0).with_marker(Marker::new(MarkerShape::TriangleUp, "buy")),
            DataPoint::xy(5.0, 45.0),
        ]))
        .expect("add");
    let points: Vec<_> = state.get(ops).expect("series").points().iter().map(|p| p.id()).collect();

    let mut c = chart.borrow_mut();
    c.layout_pass(&state);
    assert_eq!(c.node_count(), 0);
    let m = c.marker_for(points[0]).expect("marker");
    assert_eq!(m.layout(), (2.0, 40.0));
    assert_eq!(m.marker().style_class, "buy");
    assert!(c.marker_for(points[1]).is_none());
}

#[test]
fn empty_state_is_a_no_op() {
    let state = ChartState::new();
    let (x, y) = identity_axes((0.0, 1.0));
    let mut c = ChartController::new(x, y, ChartConfig::default());
    c.layout_pass(&state);
    assert_eq!(c.render_items().count(), 0);
}
