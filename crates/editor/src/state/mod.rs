//! Editor state: scene store, history, and persistence wired together.
//!
//! [`EditorState`] is the history manager. Every mutating scene operation goes
//! through it so the resulting snapshot lands on the undo stack and both
//! stacks are mirrored to storage.

pub mod handoff;
pub mod history;
pub mod persistence;
pub mod scene;
pub mod selection;
pub mod settings;

mod edit_ops;
mod history_ops;
mod image_loads;

use ab_glyph::FontArc;
use shared::Snapshot;
use tracing::{debug, warn};

pub use handoff::{DesignHandoff, DESIGN_STATE_KEY};
pub use history::{History, HistoryMode, RedoPolicy};
pub use image_loads::LoadTicket;
pub use persistence::{
    KeyValueStore, MemoryStore, PersistenceBridge, StoreError, REDO_STACK_KEY, UNDO_STACK_KEY,
};
#[cfg(not(target_arch = "wasm32"))]
pub use persistence::FileStore;
pub use scene::SceneState;
pub use settings::EditorSettings;

use crate::export::Download;
use image_loads::PendingImages;

/// Combined editor state for one canvas
pub struct EditorState<S: KeyValueStore> {
    pub(crate) scene: SceneState,
    pub(crate) history: History,
    pub(crate) bridge: PersistenceBridge<S>,
    pub(crate) settings: EditorSettings,
    pub(crate) pending_images: PendingImages,
    pub(crate) downloads: Vec<Download>,
    /// Application-level design records carried through handoffs
    pub(crate) designs: Vec<serde_json::Value>,
    pub(crate) apparel: Option<String>,
    /// Glyph source for raster exports
    pub(crate) font: Option<FontArc>,
}

impl<S: KeyValueStore> EditorState<S> {
    /// Editor over `store`; the canvas stays uninitialized until `init`
    pub fn new(store: S, settings: EditorSettings) -> Self {
        let history = History::new(
            settings.history.max_entries,
            settings.history.redo_policy,
        );
        Self {
            scene: SceneState::new(),
            history,
            bridge: PersistenceBridge::new(store),
            settings,
            pending_images: PendingImages::default(),
            downloads: Vec::new(),
            designs: Vec::new(),
            apparel: None,
            font: None,
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    /// Undo/redo stacks
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Storage mirror of the stacks and handoff slot
    pub fn bridge(&self) -> &PersistenceBridge<S> {
        &self.bridge
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn apparel(&self) -> Option<&str> {
        self.apparel.as_deref()
    }

    pub fn set_apparel(&mut self, apparel: Option<String>) {
        self.apparel = apparel;
    }

    pub fn designs(&self) -> &[serde_json::Value] {
        &self.designs
    }

    pub fn set_designs(&mut self, designs: Vec<serde_json::Value>) {
        self.designs = designs;
    }

    /// The canvas has been initialized
    pub fn is_initialized(&self) -> bool {
        self.scene.is_initialized() && self.history.mode() != HistoryMode::Uninitialized
    }

    /// Give back the underlying store (e.g. to simulate a reload)
    pub fn into_store(self) -> S {
        self.bridge.into_store()
    }

    /// Record the live scene after a mutation and mirror the stacks.
    /// Does nothing while replaying.
    pub(crate) fn commit(&mut self) -> bool {
        let Some(snapshot) = self.scene.snapshot() else {
            return false;
        };
        if self.history.record(snapshot) {
            self.flush();
            true
        } else {
            false
        }
    }

    /// Load a snapshot without recording it
    pub(crate) fn replay_load(&mut self, snapshot: Option<&Snapshot>) -> bool {
        self.history.enter_replay();
        let loaded = self.scene.load_scene(snapshot);
        // Loads notify like any other change; the replay mode swallows it
        self.commit();
        self.history.leave_replay();
        loaded
    }

    /// Mirror both stacks to storage; failures only cost durability
    pub(crate) fn flush(&mut self) {
        if let Err(e) = self
            .bridge
            .save_stack(UNDO_STACK_KEY, self.history.undo_stack())
        {
            warn!("Failed to persist {UNDO_STACK_KEY}: {e}");
        }
        if let Err(e) = self
            .bridge
            .save_stack(REDO_STACK_KEY, self.history.redo_stack())
        {
            warn!("Failed to persist {REDO_STACK_KEY}: {e}");
        }
    }

    /// Remove both persisted stacks
    pub(crate) fn clear_persisted(&mut self) {
        for key in [UNDO_STACK_KEY, REDO_STACK_KEY] {
            if let Err(e) = self.bridge.clear_stack(key) {
                warn!("Failed to clear {key}: {e}");
            }
        }
        debug!("Persisted history cleared");
    }
}
