//! Init, undo/redo/reset, and design restore

use shared::{Color, Snapshot};
use tracing::{debug, info, warn};

use super::handoff::DesignHandoff;
use super::persistence::{KeyValueStore, StoreError, REDO_STACK_KEY, UNDO_STACK_KEY};
use super::EditorState;

impl<S: KeyValueStore> EditorState<S> {
    /// Mount the canvas: construct an empty scene, recover persisted history
    /// if enabled, then apply a pending design handoff if one was left.
    pub fn init(&mut self, width: f64, height: f64, background: Color) {
        self.scene.initialize(width, height, background);

        let restored = self.settings.history.restore_on_init && self.restore_history();
        if !restored {
            match self.scene.snapshot() {
                Some(baseline) => self.history.init(baseline),
                None => warn!("Cannot capture baseline; history stays uninitialized"),
            }
        }

        if let Some(handoff) = self.bridge.take_handoff() {
            self.restore_design(handoff);
        }
    }

    /// Adopt persisted stacks; the newest undo entry becomes the live scene
    fn restore_history(&mut self) -> bool {
        let undo = self.bridge.load_stack(UNDO_STACK_KEY);
        let redo = self.bridge.load_stack(REDO_STACK_KEY);
        let Some(top) = self.history.restore(undo, redo) else {
            return false;
        };
        self.replay_load(Some(&top));
        info!(
            "Restored history: {} undo / {} redo entries",
            self.history.undo_stack().len(),
            self.history.redo_stack().len()
        );
        true
    }

    /// Step back one state. No-op when only the baseline is left.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo() else {
            debug!("Nothing to undo");
            return false;
        };
        self.replay_load(Some(&previous));
        self.flush();
        true
    }

    /// Re-apply the newest undone state. No-op when nothing was undone.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo() else {
            debug!("Nothing to redo");
            return false;
        };
        self.replay_load(Some(&next));
        self.flush();
        true
    }

    /// Reload the baseline, collapse both stacks, and delete the persisted ones
    pub fn reset(&mut self) -> bool {
        let Some(initial) = self.history.reset() else {
            debug!("Reset ignored: history not initialized");
            return false;
        };
        self.replay_load(Some(&initial));
        self.clear_persisted();
        info!("Canvas reset to initial state");
        true
    }

    /// Load a handed-off design and make it the new history baseline
    pub fn restore_design(&mut self, handoff: DesignHandoff) -> bool {
        if !self.is_initialized() {
            debug!("restore_design ignored: canvas not initialized");
            return false;
        }

        let mut canvas = handoff.canvas;
        if let Some(background) = handoff.background_color {
            canvas.background = background;
        }
        let snapshot = match Snapshot::capture(&canvas) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Cannot restore design: {e}");
                return false;
            }
        };

        if !self.replay_load(Some(&snapshot)) {
            return false;
        }
        self.designs = handoff.designs;
        self.apparel = handoff.apparel;

        if let Some(baseline) = self.scene.snapshot() {
            self.history.init(baseline);
            self.flush();
        }
        info!("Restored design ({} objects)", self.scene.scene().len());
        true
    }

    /// Park the current design in the handoff slot before navigating away
    pub fn save_handoff(&mut self) -> Result<(), StoreError> {
        let mut handoff = DesignHandoff::new(self.scene.scene().clone());
        handoff.designs = self.designs.clone();
        handoff.background_color = Some(self.scene.scene().background);
        handoff.apparel = self.apparel.clone();
        self.bridge.write_handoff(&handoff)
    }
}
