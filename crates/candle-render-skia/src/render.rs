// File: crates/candle-render-skia/src/render.rs
// Summary: Headless rendering pipeline: grid, axes, candles, overlay paths and markers to RGBA or PNG.

use anyhow::{Context, Result};
use skia_safe as skia;
use tracing::debug;

use candle_core::axis::{format_time_tick, linspace};
use candle_core::types::{Insets, Side};
use candle_core::{AxisTransform, CandleVisual, ChartController, LinearAxis, MarkerShape, MarkerVisual, PathElement, RenderItem, SeriesPath};

use crate::theme::Theme;

/// Default surface width in pixels.
pub const WIDTH: i32 = 1024;
/// Default surface height in pixels.
pub const HEIGHT: i32 = 640;

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    pub insets: Insets,
    pub theme: Theme,
    /// Tick labels; off in golden tests to avoid font variance.
    pub draw_labels: bool,
    pub price_axis: Side,
    pub time_ticks: usize,
    pub price_ticks: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            insets: Insets::default(),
            theme: Theme::dark(),
            draw_labels: true,
            price_axis: Side::Right,
            time_ticks: 8,
            price_ticks: 6,
        }
    }
}

/// Plot area in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

pub struct SkiaRenderer {
    opts: RenderOptions,
}

impl SkiaRenderer {
    pub fn new(opts: RenderOptions) -> Self { Self { opts } }

    pub fn options(&self) -> &RenderOptions { &self.opts }

    pub fn plot_rect(&self) -> PlotRect {
        let ins = self.opts.insets;
        PlotRect {
            left: ins.left as f32,
            top: ins.top as f32,
            right: (self.opts.width - ins.right as i32) as f32,
            bottom: (self.opts.height - ins.bottom as i32) as f32,
        }
    }

    /// Point both axes at the plot area so controller geometry lands in surface pixels.
    pub fn fit_axes(&self, x: &mut LinearAxis, y: &mut LinearAxis) {
        let p = self.plot_rect();
        x.set_pixels(p.left as f64, p.right as f64);
        y.set_pixels(p.bottom as f64, p.top as f64);
    }

    /// Render to a tightly packed RGBA8 buffer: `(pixels, width, height, row_bytes)`.
    pub fn render_to_rgba8<X: AxisTransform, Y: AxisTransform>(
        &self,
        chart: &ChartController<X, Y>,
    ) -> Result<(Vec<u8>, u32, u32, usize)> {
        let mut surface = self.paint(chart)?;
        let info = skia::ImageInfo::new(
            (self.opts.width, self.opts.height),
            skia::ColorType::RGBA8888,
            skia::AlphaType::Unpremul,
            None,
        );
        let stride = self.opts.width as usize * 4;
        let mut pixels = vec![0u8; stride * self.opts.height as usize];
        if !surface.read_pixels(&info, &mut pixels, stride, (0, 0)) {
            anyhow::bail!("reading back raster pixels failed");
        }
        Ok((pixels, self.opts.width as u32, self.opts.height as u32, stride))
    }

    pub fn render_to_png_bytes<X: AxisTransform, Y: AxisTransform>(&self, chart: &ChartController<X, Y>) -> Result<Vec<u8>> {
        let mut surface = self.paint(chart)?;
        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
        Ok(data.as_bytes().to_vec())
    }

    /// Render the chart to a PNG at `output_png_path`.
    pub fn render_to_png<X: AxisTransform, Y: AxisTransform>(
        &self,
        chart: &ChartController<X, Y>,
        output_png_path: impl AsRef<std::path::Path>,
    ) -> Result<()> {
        let path = output_png_path.as_ref();
        let bytes = self.render_to_png_bytes(chart)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    fn paint<X: AxisTransform, Y: AxisTransform>(&self, chart: &ChartController<X, Y>) -> Result<skia::Surface> {
        let mut surface = skia::surfaces::raster_n32_premul((self.opts.width, self.opts.height))
            .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
        let canvas = surface.canvas();
        let theme = &self.opts.theme;
        let plot = self.plot_rect();

        canvas.clear(theme.background);
        draw_grid(canvas, plot, theme);
        draw_axes(canvas, plot, self.opts.price_axis, theme);
        if self.opts.draw_labels {
            draw_time_labels(canvas, plot, chart.x_axis(), self.opts.time_ticks, theme);
            draw_price_labels(canvas, plot, chart.y_axis(), self.opts.price_ticks, self.opts.price_axis, theme);
        }

        canvas.save();
        canvas.clip_rect(skia::Rect::from_ltrb(plot.left, plot.top, plot.right, plot.bottom), skia::ClipOp::Intersect, true);
        let mut painted = 0usize;
        for item in chart.render_items() {
            match item {
                RenderItem::Candle(node) => draw_candle(canvas, node, theme),
                RenderItem::Path(path) => draw_path(canvas, path, theme),
                RenderItem::Marker(marker) => draw_marker(canvas, marker, theme),
            }
            painted += 1;
        }
        canvas.restore();
        debug!(painted, width = self.opts.width, height = self.opts.height, "frame painted");
        Ok(surface)
    }
}

// ---- helpers ----------------------------------------------------------------

fn draw_grid(canvas: &skia::Canvas, p: PlotRect, theme: &Theme) {
    let mut paint = skia::Paint::default();
    paint.set_color(theme.grid);
    paint.set_anti_alias(true);
    paint.set_stroke_width(1.0);

    for x in linspace(p.left as f64, p.right as f64, 10) {
        canvas.draw_line((x as f32, p.top), (x as f32, p.bottom), &paint);
    }
    for y in linspace(p.top as f64, p.bottom as f64, 6) {
        canvas.draw_line((p.left, y as f32), (p.right, y as f32), &paint);
    }
}

fn draw_axes(canvas: &skia::Canvas, p: PlotRect, side: Side, theme: &Theme) {
    let mut paint = skia::Paint::default();
    paint.set_color(theme.axis_line);
    paint.set_anti_alias(true);
    paint.set_stroke_width(1.5);

    canvas.draw_line((p.left, p.bottom), (p.right, p.bottom), &paint);
    let x = match side {
        Side::Left => p.left,
        Side::Right => p.right,
    };
    canvas.draw_line((x, p.top), (x, p.bottom), &paint);
}

fn label_paint(theme: &Theme) -> (skia::Paint, skia::Font) {
    let mut paint = skia::Paint::default();
    paint.set_color(theme.axis_label);
    paint.set_anti_alias(true);
    let mut font = skia::Font::default();
    font.set_size(12.0);
    (paint, font)
}

fn draw_time_labels<X: AxisTransform>(canvas: &skia::Canvas, p: PlotRect, x_axis: &X, steps: usize, theme: &Theme) {
    let (paint, font) = label_paint(theme);
    let (lo, hi) = x_axis.visible_range();
    for v in linspace(lo, hi, steps) {
        let px = x_axis.to_pixel(v) as f32;
        let text = format_time_tick(v);
        let (w, _) = font.measure_str(&text, Some(&paint));
        canvas.draw_str(&text, (px - w / 2.0, p.bottom + 18.0), &font, &paint);
    }
}

fn draw_price_labels<Y: AxisTransform>(canvas: &skia::Canvas, p: PlotRect, y_axis: &Y, steps: usize, side: Side, theme: &Theme) {
    let (paint, font) = label_paint(theme);
    let (lo, hi) = y_axis.visible_range();
    for v in linspace(lo, hi, steps) {
        let py = y_axis.to_pixel(v) as f32;
        let text = format!("{v:.2}");
        let (w, _) = font.measure_str(&text, Some(&paint));
        let x = match side {
            Side::Left => p.left - w - 6.0,
            Side::Right => p.right + 6.0,
        };
        canvas.draw_str(&text, (x, py + 4.0), &font, &paint);
    }
}

fn faded(color: skia::Color, opacity: f64) -> skia::Color {
    let a = (color.a() as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
    color.with_a(a)
}

fn draw_candle(canvas: &skia::Canvas, node: &CandleVisual, theme: &Theme) {
    if !node.is_visible() || node.opacity() <= 0.0 {
        return;
    }
    let color = faded(theme.candle(node.direction().style_class()), node.opacity());
    let (x, y) = node.layout();
    let line = node.line();

    let mut wick = skia::Paint::default();
    wick.set_anti_alias(true);
    wick.set_style(skia::paint::Style::Stroke);
    wick.set_stroke_width(1.0);
    wick.set_color(color);
    canvas.draw_line((x as f32, (y + line.start_y) as f32), (x as f32, (y + line.end_y) as f32), &wick);

    let mut body = skia::Paint::default();
    body.set_anti_alias(true);
    body.set_style(skia::paint::Style::Fill);
    body.set_color(color);
    let b = node.body().translate(x, y);
    let rect = skia::Rect::from_xywh(b.x as f32, b.y as f32, b.width as f32, (b.height as f32).max(1.0));
    canvas.draw_rect(rect, &body);
}

fn draw_path(canvas: &skia::Canvas, series_path: &SeriesPath, theme: &Theme) {
    if !series_path.is_visible() || series_path.elements().len() < 2 {
        return;
    }
    let mut path = skia::Path::new();
    for el in series_path.elements() {
        match *el {
            PathElement::MoveTo(x, y) => path.move_to((x as f32, y as f32)),
            PathElement::LineTo(x, y) => path.line_to((x as f32, y as f32)),
        };
    }

    let mut stroke = skia::Paint::default();
    stroke.set_anti_alias(true);
    stroke.set_style(skia::paint::Style::Stroke);
    stroke.set_stroke_width(2.0);
    stroke.set_color(theme.stroke(series_path.style_classes()));
    canvas.draw_path(&path, &stroke);
}

fn draw_marker(canvas: &skia::Canvas, marker: &MarkerVisual, theme: &Theme) {
    const SIZE: f32 = 6.0;
    let (x, y) = marker.layout();
    let (x, y) = (x as f32, y as f32);

    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(theme.marker(&marker.marker().style_class));

    match marker.marker().shape {
        MarkerShape::Dot => {
            canvas.draw_circle((x, y), SIZE * 0.6, &paint);
        }
        MarkerShape::TriangleUp | MarkerShape::TriangleDown => {
            let dir = if marker.marker().shape == MarkerShape::TriangleUp { 1.0 } else { -1.0 };
            let mut path = skia::Path::new();
            path.move_to((x, y));
            path.line_to((x - SIZE, y + dir * SIZE * 1.6));
            path.line_to((x + SIZE, y + dir * SIZE * 1.6));
            path.close();
            canvas.draw_path(&path, &paint);
        }
    }
}
