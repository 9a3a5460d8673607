// File: crates/candle-render-skia/src/lib.rs
// Summary: Skia renderer crate; CPU raster surfaces painting a ChartController's render tree.

pub mod render;
pub mod theme;

pub use render::{RenderOptions, SkiaRenderer};
pub use theme::Theme;
