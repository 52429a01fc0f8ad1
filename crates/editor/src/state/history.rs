//! Snapshot undo/redo stacks
//!
//! The top of `undo_stack` is always the snapshot of the live scene once the
//! history is ready; the bottom entry is the oldest state undo can reach.
//! Loads performed while [`HistoryMode::Replaying`] are never recorded.

use serde::{Deserialize, Serialize};
use shared::Snapshot;
use tracing::{debug, trace};

/// Default bound on each stack
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// What happens to the redo stack when a new state is recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedoPolicy {
    /// Linear history: a new edit drops the redo branch
    #[default]
    Discard,
    /// Keep redo entries across new edits
    Keep,
}

/// Recording state of the history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Uninitialized,
    Ready,
    Replaying,
}

/// Bounded undo/redo snapshot stacks with replay suppression
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    initial_state: Option<Snapshot>,
    mode: HistoryMode,
    max_entries: usize,
    redo_policy: RedoPolicy,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, RedoPolicy::default())
    }
}

impl History {
    /// Uninitialized history keeping at most `max_entries` per stack
    pub fn new(max_entries: usize, redo_policy: RedoPolicy) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            initial_state: None,
            mode: HistoryMode::Uninitialized,
            max_entries: max_entries.max(1),
            redo_policy,
        }
    }

    /// Current recording state
    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    /// Initialized and not replaying
    pub fn is_ready(&self) -> bool {
        self.mode == HistoryMode::Ready
    }

    /// Undo entries, oldest first; the last one is the live scene
    pub fn undo_stack(&self) -> &[Snapshot] {
        &self.undo_stack
    }

    /// Redo entries, oldest first; the last one is redone next
    pub fn redo_stack(&self) -> &[Snapshot] {
        &self.redo_stack
    }

    /// Baseline that reset returns to
    pub fn initial_state(&self) -> Option<&Snapshot> {
        self.initial_state.as_ref()
    }

    /// Snapshot of the live scene as history sees it
    pub fn current(&self) -> Option<&Snapshot> {
        self.undo_stack.last()
    }

    /// Undo needs something above the oldest retained entry
    pub fn can_undo(&self) -> bool {
        self.is_ready() && self.undo_stack.len() > 1
    }

    /// Redo has an entry to apply
    pub fn can_redo(&self) -> bool {
        self.is_ready() && !self.redo_stack.is_empty()
    }

    /// Start (or restart) history from a baseline scene
    pub fn init(&mut self, baseline: Snapshot) {
        debug!("History initialized ({} bytes baseline)", baseline.as_str().len());
        self.undo_stack = vec![baseline.clone()];
        self.redo_stack = Vec::new();
        self.initial_state = Some(baseline);
        self.mode = HistoryMode::Ready;
    }

    /// Adopt stacks recovered from storage. The oldest undo entry becomes the
    /// baseline. Returns the snapshot the scene must show, or `None` when the
    /// recovered undo stack is empty (nothing is changed then).
    pub fn restore(&mut self, undo: Vec<Snapshot>, redo: Vec<Snapshot>) -> Option<Snapshot> {
        let baseline = undo.first()?.clone();
        let top = undo.last()?.clone();
        debug!(
            "History restored: {} undo, {} redo entries",
            undo.len(),
            redo.len()
        );
        self.undo_stack = undo;
        self.redo_stack = redo;
        self.initial_state = Some(baseline);
        self.mode = HistoryMode::Ready;
        self.trim();
        Some(top)
    }

    /// Append the state produced by a mutation. Ignored unless ready.
    pub fn record(&mut self, snapshot: Snapshot) -> bool {
        match self.mode {
            HistoryMode::Ready => {}
            HistoryMode::Replaying => {
                trace!("Skipping snapshot recorded during replay");
                return false;
            }
            HistoryMode::Uninitialized => {
                trace!("Skipping snapshot before init");
                return false;
            }
        }

        if self.undo_stack.last() == Some(&snapshot) {
            trace!("Snapshot identical to current state, not recorded");
            return false;
        }

        self.undo_stack.push(snapshot);
        self.trim();
        if self.redo_policy == RedoPolicy::Discard && !self.redo_stack.is_empty() {
            debug!("Discarding {} redo entries", self.redo_stack.len());
            self.redo_stack.clear();
        }
        trace!("Recorded snapshot, undo depth {}", self.undo_stack.len());
        true
    }

    /// Move the current state to the redo stack and return the state to load
    pub fn undo(&mut self) -> Option<Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let current = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        self.trim();
        trace!(
            "Undo: depth {} / redo {}",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        self.undo_stack.last().cloned()
    }

    /// Move the newest undone state back onto the undo stack and return it
    pub fn redo(&mut self) -> Option<Snapshot> {
        if !self.is_ready() {
            return None;
        }
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(next.clone());
        self.trim();
        trace!(
            "Redo: depth {} / redo {}",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        Some(next)
    }

    /// Collapse history to the baseline and return it
    pub fn reset(&mut self) -> Option<Snapshot> {
        if self.mode == HistoryMode::Uninitialized {
            return None;
        }
        let initial = self.initial_state.clone()?;
        self.undo_stack = vec![initial.clone()];
        self.redo_stack.clear();
        debug!("History reset to baseline");
        Some(initial)
    }

    /// Suppress recording until [`History::leave_replay`]
    pub fn enter_replay(&mut self) {
        if self.mode == HistoryMode::Ready {
            self.mode = HistoryMode::Replaying;
        }
    }

    /// Resume recording after a replayed load
    pub fn leave_replay(&mut self) {
        if self.mode == HistoryMode::Replaying {
            self.mode = HistoryMode::Ready;
        }
    }

    /// Drop the entries farthest from the live scene once a stack exceeds
    /// `max_entries`
    fn trim(&mut self) {
        for stack in [&mut self.undo_stack, &mut self.redo_stack] {
            if stack.len() > self.max_entries {
                let excess = stack.len() - self.max_entries;
                stack.drain(..excess);
            }
        }
    }
}
