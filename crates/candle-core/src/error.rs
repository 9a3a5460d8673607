// File: crates/candle-core/src/error.rs
// Summary: Error type for chart state mutations and node lifecycle.

use crate::lifecycle::NodeState;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ChartError {
    #[error("invalid bar: {0}")]
    InvalidBar(&'static str),
    #[error("unknown series")]
    UnknownSeries,
    #[error("unknown data point")]
    UnknownPoint,
    #[error("chart already has a primary series")]
    PrimaryAlreadySet,
    #[error("index {index} out of range for series of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("illegal node transition {from:?} -> {to:?}")]
    InvalidTransition { from: NodeState, to: NodeState },
}

pub type ChartResult<T> = Result<T, ChartError>;
