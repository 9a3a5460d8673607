// File: crates/candle-core/src/animation.rs
// Summary: Fade tasks (start, duration, target, continuation) advanced by a per-frame tick.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::geometry::clamp;
use crate::types::FADE_DURATION;

slotmap::new_key_type! {
    /// Key of a candle node owned by the controller.
    pub struct NodeKey;
    pub struct FadeId;
}

/// What the controller does once a fade finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    MarkVisible,
    Detach,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeTask {
    pub node: NodeKey,
    pub started_at: Instant,
    pub duration: Duration,
    pub from: f64,
    pub to: f64,
    pub on_complete: Completion,
}

impl FadeTask {
    pub fn enter(node: NodeKey, now: Instant) -> Self {
        Self { node, started_at: now, duration: FADE_DURATION, from: 0.0, to: 1.0, on_complete: Completion::MarkVisible }
    }

    pub fn exit(node: NodeKey, now: Instant, from: f64) -> Self {
        Self { node, started_at: now, duration: FADE_DURATION, from, to: 0.0, on_complete: Completion::Detach }
    }

    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() { return 1.0; }
        let elapsed = now.saturating_duration_since(self.started_at);
        clamp(elapsed.as_secs_f64() / self.duration.as_secs_f64(), 0.0, 1.0)
    }

    pub fn value(&self, now: Instant) -> f64 {
        self.from + (self.to - self.from) * self.progress(now)
    }

    pub fn is_finished(&self, now: Instant) -> bool { self.progress(now) >= 1.0 }
}

/// Result of advancing one task.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeStep {
    pub node: NodeKey,
    pub opacity: f64,
    pub completed: Option<Completion>,
}

/// Active fades, at most one per node.
#[derive(Default)]
pub struct Animator {
    tasks: SlotMap<FadeId, FadeTask>,
    by_node: FxHashMap<NodeKey, FadeId>,
}

impl Animator {
    pub fn new() -> Self { Self::default() }

    /// Start a fade, replacing any fade already running on the same node.
    pub fn start(&mut self, task: FadeTask) -> FadeId {
        self.cancel(task.node);
        let id = self.tasks.insert(task);
        self.by_node.insert(task.node, id);
        id
    }

    pub fn cancel(&mut self, node: NodeKey) -> Option<FadeTask> {
        let id = self.by_node.remove(&node)?;
        self.tasks.remove(id)
    }

    pub fn task_for(&self, node: NodeKey) -> Option<&FadeTask> {
        self.by_node.get(&node).and_then(|id| self.tasks.get(*id))
    }

    pub fn is_animating(&self, node: NodeKey) -> bool { self.by_node.contains_key(&node) }
    pub fn len(&self) -> usize { self.tasks.len() }
    pub fn is_empty(&self) -> bool { self.tasks.is_empty() }

    /// Advance every task to `now`; finished tasks are dropped and reported once.
    pub fn tick(&mut self, now: Instant) -> Vec<FadeStep> {
        let mut steps = Vec::with_capacity(self.tasks.len());
        let mut done = Vec::new();
        for (id, task) in self.tasks.iter() {
            let finished = task.is_finished(now);
            steps.push(FadeStep {
                node: task.node,
                opacity: task.value(now),
                completed: finished.then_some(task.on_complete),
            });
            if finished {
                done.push((id, task.node));
            }
        }
        for (id, node) in done {
            self.tasks.remove(id);
            self.by_node.remove(&node);
        }
        steps
    }
}
