//! Browser bindings for the canvas editor.
//!
//! History is mirrored to `window.localStorage`; image loads and downloads
//! are handed to the page, which owns `Image` elements and anchors.

use std::collections::VecDeque;
use std::str::FromStr;

use wasm_bindgen::prelude::*;

use canvas_editor_lib::command::{execute_command, execute_json, CommandResponse, EditorCommand};
use canvas_editor_lib::export::Download;
use canvas_editor_lib::state::{
    EditorSettings, EditorState, KeyValueStore, LoadTicket, StoreError,
};
use shared::Color;

fn js_message(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

fn console_warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

/// `KeyValueStore` over the browser's `localStorage`
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    pub fn from_window() -> Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StoreError::Unavailable(js_message(e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(js_message(e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // setItem only throws on QuotaExceededError
        self.storage
            .set_item(key, value)
            .map_err(|_| StoreError::QuotaExceeded {
                key: key.to_string(),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StoreError::Unavailable(js_message(e)))
    }
}

/// A finished export, ready to be offered as a file download
#[wasm_bindgen]
pub struct WasmDownload {
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl WasmDownload {
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.mime.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.bytes.as_slice())
    }
}

impl From<Download> for WasmDownload {
    fn from(d: Download) -> Self {
        Self {
            file_name: d.file_name,
            mime: d.mime,
            bytes: d.bytes,
        }
    }
}

fn response_json(response: &CommandResponse) -> Result<String, JsError> {
    serde_json::to_string(response).map_err(|e| JsError::new(&e.to_string()))
}

/// One canvas editor bound to the page's `localStorage`
#[wasm_bindgen]
pub struct CanvasEditor {
    inner: EditorState<LocalStorageStore>,
    outbox: VecDeque<Download>,
}

#[wasm_bindgen]
impl CanvasEditor {
    /// Create an editor. `settings_json` overrides the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<CanvasEditor, JsError> {
        let settings = match settings_json {
            Some(json) => EditorSettings::from_json(&json)
                .map_err(|e| JsError::new(&format!("Invalid settings: {e}")))?,
            None => EditorSettings::default(),
        };
        let store = LocalStorageStore::from_window().map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self {
            inner: EditorState::new(store, settings),
            outbox: VecDeque::new(),
        })
    }

    /// Mount the canvas once the surrounding UI is ready
    pub fn init(&mut self, width: f64, height: f64, background: &str) -> Result<(), JsError> {
        let background =
            Color::from_str(background).map_err(|e| JsError::new(&e.to_string()))?;
        self.inner.init(width, height, background);
        Ok(())
    }

    /// Execute one JSON command; returns the JSON response
    pub fn execute(&mut self, command_json: &str) -> Result<String, JsError> {
        let response =
            execute_json(&mut self.inner, command_json).map_err(|e| JsError::new(&e.to_string()))?;
        if !response.success {
            if let Some(error) = &response.error {
                console_warn(error);
            }
        }
        response_json(&response)
    }

    /// The page finished loading the image for `ticket`
    pub fn complete_image(&mut self, ticket: u32, width: u32, height: u32) -> Result<String, JsError> {
        let response = execute_command(
            &mut self.inner,
            EditorCommand::CompleteImage {
                ticket: LoadTicket(u64::from(ticket)),
                width,
                height,
            },
        );
        response_json(&response)
    }

    /// The page failed to load the image for `ticket`
    pub fn fail_image(&mut self, ticket: u32, reason: &str) -> bool {
        console_warn(&format!("Image load failed: {reason}"));
        self.inner.fail_image(LoadTicket(u64::from(ticket)), reason)
    }

    /// URL the page should load for `ticket`
    pub fn pending_image_url(&self, ticket: u32) -> Option<String> {
        self.inner
            .pending_url(LoadTicket(u64::from(ticket)))
            .map(str::to_string)
    }

    /// Font file bytes used for text in raster exports
    pub fn set_font(&mut self, bytes: &[u8]) -> Result<(), JsError> {
        self.inner
            .set_export_font(bytes.to_vec())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Next queued download, oldest first
    pub fn pop_download(&mut self) -> Option<WasmDownload> {
        self.outbox.extend(self.inner.take_downloads());
        self.outbox.pop_front().map(WasmDownload::from)
    }

    /// Undo would change the canvas
    pub fn can_undo(&self) -> bool {
        self.inner.history().can_undo()
    }

    /// Redo would change the canvas
    pub fn can_redo(&self) -> bool {
        self.inner.history().can_redo()
    }

    /// Live scene as JSON, for rendering by the page
    pub fn scene_json(&self) -> Result<String, JsError> {
        serde_json::to_string(self.inner.scene().scene()).map_err(|e| JsError::new(&e.to_string()))
    }
}
