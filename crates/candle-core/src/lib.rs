// File: crates/candle-core/src/lib.rs
// Summary: Core library entry point; candlestick layout, node lifecycle and fade animation
// synchronized with an observable series collection.

pub mod animation;
pub mod axis;
pub mod bar;
pub mod candle;
pub mod config;
pub mod controller;
pub mod downsample;
pub mod error;
pub mod geometry;
pub mod host;
pub mod lifecycle;
pub mod path;
pub mod series;
pub mod state;
pub mod types;
pub mod view;

pub use axis::{AxisTransform, LinearAxis};
pub use bar::{Bar, BarSummary};
pub use candle::{CandleVisual, Direction};
pub use config::{ChartConfig, DisplayMode};
pub use controller::{ChartController, Clock, InputButton, MarkerVisual, RenderItem};
pub use downsample::decimate;
pub use error::{ChartError, ChartResult};
pub use host::RenderHost;
pub use lifecycle::NodeState;
pub use path::{PathElement, SeriesPath};
pub use series::{DataPoint, Marker, MarkerShape, PointId, Series, SeriesId, SeriesRole};
pub use state::ChartState;
pub use view::{TimeFrame, ViewState};
