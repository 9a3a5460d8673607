// File: crates/candle-core/src/lifecycle.rs
// Summary: Visual-node lifecycle state machine (absent -> entering -> visible -> exiting -> removed).

use crate::error::{ChartError, ChartResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NodeState {
    #[default]
    Absent,
    Entering,
    Visible,
    Exiting,
    Removed,
}

impl NodeState {
    /// State a freshly added node enters.
    pub fn on_add(animated: bool) -> Self {
        if animated { NodeState::Entering } else { NodeState::Visible }
    }

    /// State a node moves to when its data point goes away.
    /// An entering node skips the exit fade and is removed outright.
    pub fn on_remove(self, animated: bool) -> Self {
        match self {
            NodeState::Visible if animated => NodeState::Exiting,
            NodeState::Exiting => NodeState::Exiting,
            _ => NodeState::Removed,
        }
    }

    pub fn can_transition(self, to: NodeState) -> bool {
        use NodeState::*;
        matches!(
            (self, to),
            (Absent, Entering)
                | (Absent, Visible)
                | (Entering, Visible)
                | (Entering, Removed)
                | (Visible, Exiting)
                | (Visible, Removed)
                | (Exiting, Removed)
        )
    }

    pub fn transition(self, to: NodeState) -> ChartResult<NodeState> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(ChartError::InvalidTransition { from: self, to })
        }
    }

    /// Whether the node is still part of the render tree.
    pub fn is_attached(self) -> bool {
        matches!(self, NodeState::Entering | NodeState::Visible | NodeState::Exiting)
    }
}
