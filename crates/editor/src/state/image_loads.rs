//! Deferred image loads
//!
//! ADD_IMAGE only registers a ticket. The scene changes when the host reports
//! the load through [`EditorState::complete_image`]. Tickets are never
//! cancelled: a load finishing after UNDO or RESET still lands on the scene
//! that is current at that moment.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use shared::ObjectId;
use tracing::{debug, info, warn};

use super::persistence::KeyValueStore;
use super::scene::{ImageInfo, ImageLoadError, ImageLoader};
use super::EditorState;

/// Handle for one outstanding image load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadTicket(pub u64);

#[derive(Debug, Clone)]
pub(crate) struct PendingLoad {
    pub(crate) ticket: LoadTicket,
    pub(crate) url: String,
    pub(crate) cross_origin: bool,
}

#[derive(Debug, Default)]
pub(crate) struct PendingImages {
    queue: VecDeque<PendingLoad>,
    next_ticket: u64,
}

impl PendingImages {
    fn push(&mut self, url: String, cross_origin: bool) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.queue.push_back(PendingLoad {
            ticket,
            url,
            cross_origin,
        });
        ticket
    }

    fn take(&mut self, ticket: LoadTicket) -> Option<PendingLoad> {
        let index = self.queue.iter().position(|p| p.ticket == ticket)?;
        self.queue.remove(index)
    }

    fn pop_front(&mut self) -> Option<PendingLoad> {
        self.queue.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}

impl<S: KeyValueStore> EditorState<S> {
    /// Start loading an image. Returns `None` if the canvas is not mounted.
    pub fn request_image(&mut self, url: impl Into<String>) -> Option<LoadTicket> {
        if !self.is_initialized() {
            debug!("add_image ignored: canvas not initialized");
            return None;
        }
        let url = url.into();
        let ticket = self
            .pending_images
            .push(url.clone(), self.settings.images.cross_origin);
        info!("Requested image {url} (ticket {})", ticket.0);
        Some(ticket)
    }

    /// Pending load URL for a ticket, if it is still outstanding
    pub fn pending_url(&self, ticket: LoadTicket) -> Option<&str> {
        self.pending_images
            .queue
            .iter()
            .find(|p| p.ticket == ticket)
            .map(|p| p.url.as_str())
    }

    /// Some image load is still waiting for its result
    pub fn has_pending_images(&self) -> bool {
        self.pending_images.len() > 0
    }

    /// Report a finished load: the image is appended to the current scene
    /// and recorded as one history step.
    pub fn complete_image(
        &mut self,
        ticket: LoadTicket,
        info: ImageInfo,
    ) -> Result<Option<ObjectId>, ImageLoadError> {
        let Some(load) = self.pending_images.take(ticket) else {
            debug!("Unknown image ticket {}", ticket.0);
            return Ok(None);
        };
        let margin = self.settings.images.margin;
        let placed = self
            .scene
            .place_image(load.url, info, load.cross_origin, margin)?;
        if placed.is_some() {
            self.commit();
        }
        Ok(placed)
    }

    /// Report a failed load. Neither the scene nor history changes.
    pub fn fail_image(&mut self, ticket: LoadTicket, reason: &str) -> bool {
        match self.pending_images.take(ticket) {
            Some(load) => {
                warn!("Image {} failed to load: {reason}", load.url);
                true
            }
            None => false,
        }
    }

    /// Drive every outstanding load through `loader`, in request order
    pub fn resolve_images(&mut self, loader: &dyn ImageLoader) -> Vec<Result<ObjectId, ImageLoadError>> {
        let mut results = Vec::new();
        while let Some(load) = self.pending_images.pop_front() {
            let outcome = loader.load(&load.url, load.cross_origin).and_then(|info| {
                let margin = self.settings.images.margin;
                self.scene
                    .place_image(load.url.clone(), info, load.cross_origin, margin)
            });
            match outcome {
                Ok(Some(id)) => {
                    self.commit();
                    results.push(Ok(id));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("{e}");
                    results.push(Err(e));
                }
            }
        }
        results
    }
}
