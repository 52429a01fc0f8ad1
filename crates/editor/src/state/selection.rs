use shared::ObjectId;

/// Active object on the canvas (single selection)
#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    active: Option<ObjectId>,
}

impl SelectionState {
    /// Currently selected object
    pub fn active(&self) -> Option<&ObjectId> {
        self.active.as_ref()
    }

    /// Check if an object is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    /// Select an object (replaces previous selection)
    pub fn select(&mut self, id: ObjectId) {
        self.active = Some(id);
    }

    /// Clear selection. Returns whether something was selected.
    pub fn clear(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Nothing is selected
    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }
}
