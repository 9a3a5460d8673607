// File: crates/candle-render-skia/tests/smoke.rs
// Purpose: End-to-end render smoke tests: PNG output, RGBA buffer shape, candle and fade pixels.

use std::time::{Duration, Instant};

use candle_core::{Bar, ChartConfig, ChartController, ChartState, DataPoint, LinearAxis, Marker, MarkerShape, Series};
use candle_render_skia::{RenderOptions, SkiaRenderer, Theme};

fn chart(renderer: &SkiaRenderer, config: ChartConfig) -> (ChartState, std::rc::Rc<std::cell::RefCell<ChartController<LinearAxis, LinearAxis>>>) {
    let mut x = LinearAxis::new("Time", 0.0, 4.0, 0.0, 1.0);
    let mut y = LinearAxis::new("Price", 0.0, 100.0, 1.0, 0.0);
    renderer.fit_axes(&mut x, &mut y);
    let mut state = ChartState::new();
    let chart = ChartController::attach(x, y, config, &mut state);
    state
        .add_series(Series::from_bars(
            "price",
            [
                Bar::new(1.0, 40.0, 70.0, 30.0, 60.0),
                Bar::new(2.0, 60.0, 65.0, 20.0, 30.0),
                Bar::new(3.0, 30.0, 55.0, 25.0, 50.0),
            ],
        ))
        .expect("price");
    state
        .add_series(Series::overlay("signals").with_points([
            DataPoint::xy(1.0, 35.0).with_marker(Marker::new(MarkerShape::TriangleUp, "buy")),
            DataPoint::xy(3.0, 52.0),
        ]))
        .expect("overlay");
    chart.borrow_mut().layout_pass(&state);
    (state, chart)
}

fn pixel(px: &[u8], stride: usize, x: f64, y: f64) -> [u8; 4] {
    let i = y as usize * stride + x as usize * 4;
    [px[i], px[i + 1], px[i + 2], px[i + 3]]
}

#[test]
fn render_smoke_png() {
    let renderer = SkiaRenderer::new(RenderOptions::default());
    let (_state, chart) = chart(&renderer, ChartConfig::default());

    let out = std::path::PathBuf::from("target/test_out/candles_smoke.png");
    renderer.render_to_png(&*chart.borrow(), &out).expect("render should succeed");
    let meta = std::fs::metadata(&out).expect("output exists");
    assert!(meta.len() > 0, "png should be non-empty");

    let bytes = renderer.render_to_png_bytes(&*chart.borrow()).expect("render bytes");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");
}

#[test]
fn rgba_buffer_shows_candle_colors() {
    let opts = RenderOptions { draw_labels: false, ..RenderOptions::default() };
    let renderer = SkiaRenderer::new(opts);
    let (_state, chart) = chart(&renderer, ChartConfig::default());
    let c = chart.borrow();
    let (px, w, h, stride) = renderer.render_to_rgba8(&*c).expect("rgba render");
    assert_eq!(w as usize * h as usize * 4, px.len());
    assert_eq!(stride, w as usize * 4);
    assert_eq!(px[3], 255);

    let theme = Theme::dark();
    let bg = theme.background;
    assert_eq!(pixel(&px, stride, 1.0, 1.0), [bg.r(), bg.g(), bg.b(), 255]);

    // each candle's body centre carries its direction color
    for node in c.candles() {
        let (x, y) = node.layout();
        let body = node.body().translate(x, y);
        let color = theme.candle(node.direction().style_class());
        let got = pixel(&px, stride, body.x + body.width / 2.0, body.y + body.height / 2.0);
        assert_eq!(got, [color.r(), color.g(), color.b(), 255], "candle at x={x}");
    }
}

#[test]
fn fading_candle_blends_with_background() {
    let opts = RenderOptions { draw_labels: false, ..RenderOptions::default() };
    let renderer = SkiaRenderer::new(opts);
    let (_state, chart) = chart(&renderer, ChartConfig { animated: true, ..ChartConfig::default() });
    let mut c = chart.borrow_mut();
    c.tick(Instant::now() + Duration::from_millis(250));

    let (px, _, _, stride) = renderer.render_to_rgba8(&*c).expect("rgba render");
    let theme = Theme::dark();
    let node = c.candles().next().expect("candle");
    assert!(node.opacity() > 0.0 && node.opacity() < 1.0);
    let (x, y) = node.layout();
    let body = node.body().translate(x, y);
    let full = theme.candle(node.direction().style_class());
    let got = pixel(&px, stride, body.x + body.width / 2.0, body.y + body.height / 2.0);
    assert_ne!(got[..3], [full.r(), full.g(), full.b()]);
    assert_ne!(got[..3], [theme.background.r(), theme.background.g(), theme.background.b()]);
}
