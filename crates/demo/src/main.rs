// File: crates/demo/src/main.rs
// Summary: Demo loads OHLC CSV into a ChartState, drives the controller through add/remove fades
// and writes PNG frames (candles, line mode, animation steps).

use anyhow::{Context, Result};
use candle_core::downsample::MAX_TICKS;
use candle_core::{
    decimate, Bar, BarSummary, ChartConfig, ChartController, ChartState, DataPoint, DisplayMode, InputButton,
    LinearAxis, RenderHost, Series, TimeFrame, ViewState,
};
use candle_render_skia::{theme, RenderOptions, SkiaRenderer};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SMA_PERIOD: usize = 20;
const FRAME_STEP: Duration = Duration::from_millis(125);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Accept path from CLI or fall back to sample filename (supports .csv/.cvs swap)
    let mut args = std::env::args().skip(1);
    let raw = args
        .next()
        .unwrap_or_else(|| "binanceus_CRVUSDT_6h_2023-09-13_to_2025-01-21.cvs".to_string());
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("target/out"));
    let theme_name = args.next().unwrap_or_else(|| "dark".to_string());

    let (path, used_alt) = resolve_path(&raw)?;
    info!(path = %path.display(), used_alt, "using input file");

    let bars = load_ohlc_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
    if bars.len() < 2 {
        anyhow::bail!("need at least two bars, got {}; check headers/delimiter", bars.len());
    }
    info!(bars = bars.len(), "loaded candles");

    // Window: the last 30 days (or everything for index-based data), capped to MAX_TICKS candles.
    let (min_ts, max_ts) = (bars[0].x as i64, bars[bars.len() - 1].x as i64);
    let tf = if max_ts - min_ts > 30 * 24 * 3600 { TimeFrame::D30 } else { TimeFrame::All };
    let mut view = ViewState::new(0.0, 1.0, 0.0, 1.0);
    view.frame(tf, min_ts, max_ts);
    let shown = decimate(&bars, view.x_min, view.x_max, MAX_TICKS);
    info!(timeframe = tf.label(), shown = shown.len(), "window selected");

    let opts = RenderOptions { theme: theme::find(&theme_name), ..RenderOptions::default() };
    let renderer = SkiaRenderer::new(opts);

    // Hold back the newest bar so it can be added with a fade later.
    let (held, initial) = match shown.split_last() {
        Some((last, rest)) if rest.len() >= 2 => (*last, rest.to_vec()),
        _ => anyhow::bail!("window holds fewer than three bars"),
    };

    let mut state = ChartState::new();
    let price = state.add_series(Series::from_bars("price", initial.iter().copied()))?;
    let sma = state.add_series(Series::overlay("sma").with_style_class("sma").with_points(sma_points(&shown, SMA_PERIOD)))?;

    view = ViewState::from_state(&state);
    view.x_max = held.x;
    view.autoscale_y_visible(&state);
    let (mut x, mut y) = (LinearAxis::new("Time", 0.0, 1.0, 0.0, 1.0), LinearAxis::new("Price", 0.0, 1.0, 1.0, 0.0));
    view.apply_to(&mut x, &mut y);
    renderer.fit_axes(&mut x, &mut y);

    let chart = ChartController::attach(x, y, ChartConfig { animated: true, ..ChartConfig::default() }, &mut state);
    chart.borrow_mut().set_on_select(|bar, button| {
        info!(?button, x = bar.x, "selected\n{}", BarSummary::from(bar));
    });

    // Frames advance a simulated clock; fades are stamped from it too.
    let now = Rc::new(Cell::new(Instant::now()));
    let clock = now.clone();
    chart.borrow_mut().set_clock(move || clock.get());
    let mut frame = 0usize;

    // Initial fade-in of every candle.
    frame = run_frames(&renderer, &chart, &state, &out_dir, &path, "enter", frame, &now)?;

    // One new bar arriving.
    state.push_point(price, DataPoint::from_bar(held))?;
    frame = run_frames(&renderer, &chart, &state, &out_dir, &path, "push", frame, &now)?;

    // Oldest bar leaving.
    let oldest = state.get(price).and_then(|s| s.points().first()).map(|p| p.id());
    if let Some(oldest) = oldest {
        state.remove_point(price, oldest)?;
        frame = run_frames(&renderer, &chart, &state, &out_dir, &path, "remove", frame, &now)?;
    }

    // Click the newest candle at its body centre.
    {
        let mut c = chart.borrow_mut();
        let hit = c
            .candle_for(state.get(price).and_then(|s| s.points().last()).map(|p| p.id()).unwrap_or_default())
            .map(|n| {
                let (x, y) = n.layout();
                let b = n.body().translate(x, y);
                (b.x + b.width / 2.0, b.y + b.height / 2.0)
            });
        match hit {
            Some((px, py)) if c.select_at(&state, px, py, InputButton::Primary) => {}
            _ => warn!("no candle under the newest bar"),
        }
    }

    // Same data as a plain line.
    {
        let mut c = chart.borrow_mut();
        c.set_display_mode(DisplayMode::Line);
        c.layout_pass(&state);
        let out = out_name_with(&out_dir, &path, "line");
        renderer.render_to_png(&*c, &out)?;
        info!(out = %out.display(), "wrote");
    }

    state.remove_series(sma)?;
    info!(frames = frame, "done");
    Ok(())
}

/// Lay out and render frames until every fade has completed.
#[allow(clippy::too_many_arguments)]
fn run_frames<X, Y>(
    renderer: &SkiaRenderer,
    chart: &Rc<RefCell<ChartController<X, Y>>>,
    state: &ChartState,
    out_dir: &Path,
    input: &Path,
    label: &str,
    mut frame: usize,
    now: &Cell<Instant>,
) -> Result<usize>
where
    X: candle_core::AxisTransform,
    Y: candle_core::AxisTransform,
{
    loop {
        let mut c = chart.borrow_mut();
        c.layout_pass(state);
        let out = out_name_with(out_dir, input, &format!("{label}_{frame:03}"));
        renderer.render_to_png(&*c, &out)?;
        frame += 1;
        now.set(now.get() + FRAME_STEP);
        if !c.tick(now.get()) {
            c.layout_pass(state);
            let out = out_name_with(out_dir, input, &format!("{label}_{frame:03}"));
            renderer.render_to_png(&*c, &out)?;
            info!(label, frames = frame + 1, out = %out.display(), "animation settled");
            return Ok(frame + 1);
        }
    }
}

/// Simple moving average of closes, one point per bar once the window is full.
fn sma_points(bars: &[Bar], period: usize) -> Vec<DataPoint> {
    if period == 0 {
        return Vec::new();
    }
    bars.windows(period)
        .map(|w| DataPoint::xy(w[period - 1].x, w.iter().map(|b| b.close).sum::<f64>() / period as f64))
        .collect()
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

/// Produce output file name like <out_dir>/chart_<stem>_<suffix>.png
fn out_name_with(out_dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("chart");
    let short = stem.split('_').take(3).collect::<Vec<_>>().join("_");
    if short.is_empty() {
        out_dir.join(format!("chart_{suffix}.png"))
    } else {
        out_dir.join(format!("chart_{short}_{suffix}.png"))
    }
}

/// Load Binance-like OHLC CSV into bars; rows breaking OHLC invariants are skipped.
fn load_ohlc_csv(path: &Path) -> Result<Vec<Bar>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect::<Vec<_>>();
    info!(?headers, "csv headers");

    let idx = |names: &[&str]| -> Option<usize> { headers.iter().position(|h| names.contains(&h.as_str())) };

    // Common Binance headers
    let i_time = idx(&["time", "timestamp", "open_time", "date", "datetime"]);
    let i_open = idx(&["open", "o"]);
    let i_high = idx(&["high", "h"]);
    let i_low = idx(&["low", "l"]);
    let i_close = idx(&["close", "c", "adj_close", "close_price"]);

    if i_open.is_none() || i_high.is_none() || i_low.is_none() || i_close.is_none() {
        warn!("could not find one of open/high/low/close columns");
    }

    let mut out = Vec::new();
    let mut row_index = 0_f64;
    let mut skipped = 0usize;

    for rec in rdr.records() {
        let rec = rec?;
        let parse = |i: Option<usize>| -> Option<f64> { i.and_then(|ix| rec.get(ix)).and_then(|s| s.trim().parse::<f64>().ok()) };

        // x-value: epoch seconds when a time column parses, else the row index
        let t = i_time.and_then(|ix| rec.get(ix)).and_then(parse_time_to_f64).unwrap_or(row_index);
        row_index += 1.0;

        if let (Some(o), Some(h), Some(l), Some(c)) = (parse(i_open), parse(i_high), parse(i_low), parse(i_close)) {
            match Bar::try_new(t, o, h, l, c) {
                Ok(bar) => out.push(bar),
                Err(_) => skipped += 1,
            }
        }
    }
    if skipped > 0 {
        warn!(skipped, "rows violating OHLC invariants were skipped");
    }
    Ok(out)
}

fn parse_time_to_f64(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let n = s.parse::<i64>().ok()?;
    if n > 10_i64.pow(12) {
        return Some(n as f64 / 1000.0); // epoch ms -> sec
    }
    Some(n as f64)
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}
