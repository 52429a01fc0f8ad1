//! One-shot editor state handoff across a navigation (e.g. a login redirect).
//!
//! The slot is written when the user leaves mid-edit and consumed the next
//! time the editor mounts: [`PersistenceBridge::take_handoff`] deletes the
//! entry before returning it, so a handoff is never applied twice.

use serde::{Deserialize, Serialize};
use shared::{Color, Scene};
use tracing::{debug, info, warn};

use super::persistence::{KeyValueStore, PersistenceBridge, StoreError};

/// Storage key of the handoff slot
pub const DESIGN_STATE_KEY: &str = "designState";

/// Editor state carried across a navigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignHandoff {
    /// Application-level design records, carried through untouched
    #[serde(default)]
    pub designs: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    /// Selected product/apparel the design is placed on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apparel: Option<String>,
    pub canvas: Scene,
}

impl DesignHandoff {
    pub fn new(canvas: Scene) -> Self {
        Self {
            designs: Vec::new(),
            background_color: None,
            apparel: None,
            canvas,
        }
    }
}

impl<S: KeyValueStore> PersistenceBridge<S> {
    /// Store a handoff, replacing any unconsumed one
    pub fn write_handoff(&mut self, handoff: &DesignHandoff) -> Result<(), StoreError> {
        if let Ok(Some(_)) = self.read_raw(DESIGN_STATE_KEY) {
            debug!("Replacing unconsumed design handoff");
        }
        let json = serde_json::to_string(handoff)?;
        self.write_raw(DESIGN_STATE_KEY, &json)?;
        info!(
            "Design handoff saved ({} objects, {} designs)",
            handoff.canvas.len(),
            handoff.designs.len()
        );
        Ok(())
    }

    /// Consume the handoff: the slot is deleted whether or not it parses
    pub fn take_handoff(&mut self) -> Option<DesignHandoff> {
        let json = match self.read_raw(DESIGN_STATE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read design handoff: {e}");
                return None;
            }
        };

        if let Err(e) = self.remove_raw(DESIGN_STATE_KEY) {
            // Without the delete the handoff could be applied twice
            warn!("Failed to delete design handoff, ignoring it: {e}");
            return None;
        }

        match serde_json::from_str(&json) {
            Ok(handoff) => {
                info!("Design handoff consumed");
                Some(handoff)
            }
            Err(e) => {
                warn!("Discarding corrupt design handoff: {e}");
                None
            }
        }
    }

    pub fn has_handoff(&self) -> bool {
        matches!(self.read_raw(DESIGN_STATE_KEY), Ok(Some(_)))
    }
}
