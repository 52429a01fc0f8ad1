//! JSON command protocol.
//!
//! Each UI event handler maps to one [`EditorCommand`]. Commands are plain
//! serde records tagged by `command`, so the CLI script runner, the wasm
//! bindings, and tests all drive the editor the same way.

use serde::{Deserialize, Serialize};
use shared::{Color, Point2D, PropertyChange, ShapeKind, TextOptions};

use crate::export::Download;
use crate::state::scene::{drawable_display_name, DrawingMode, ImageInfo};
use crate::state::{DesignHandoff, EditorState, KeyValueStore, LoadTicket};

/// A command dispatched to the editor
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Mount the canvas. Missing fields fall back to the configured canvas.
    Init {
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        height: Option<f64>,
        #[serde(default)]
        background: Option<Color>,
    },
    /// Load a handed-off design and re-baseline history on it
    RestoreDesign { design: DesignHandoff },
    AddShape {
        shape: ShapeKind,
        #[serde(default)]
        stroke: Color,
        #[serde(default = "default_fill")]
        fill: Color,
    },
    AddText {
        text: String,
        #[serde(default)]
        color: Color,
        #[serde(default)]
        options: TextOptions,
    },
    /// Edit one property of the selected object
    SetProperty {
        prop: String,
        value: serde_json::Value,
    },
    /// Start an image load; the response carries the ticket
    AddImage { url: String },
    /// Host reports a finished image load
    CompleteImage {
        ticket: LoadTicket,
        width: u32,
        height: u32,
    },
    /// Host reports a failed image load
    FailImage {
        ticket: LoadTicket,
        #[serde(default)]
        reason: String,
    },
    SetDrawingMode {
        mode: DrawingMode,
        #[serde(default)]
        color: Color,
        #[serde(default = "default_brush_width")]
        width: f64,
    },
    /// Commit a free-hand stroke in canvas coordinates
    FinishStroke { points: Vec<Point2D> },
    Select { id: String },
    ClearSelection,
    DeleteSelection,
    SetBackground { color: Color },
    ExportRaster {
        #[serde(default = "default_multiplier")]
        multiplier: f64,
    },
    ExportSvg,
    ExportJson,
    /// Park the current design in the handoff slot
    SaveHandoff,
    Undo,
    Redo,
    Reset,
    /// List objects and history depth
    Inspect,
}

fn default_fill() -> Color {
    Color::WHITE
}

fn default_brush_width() -> f64 {
    5.0
}

fn default_multiplier() -> f64 {
    1.0
}

/// Malformed command input
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Invalid command JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Invalid commands JSON: {0}")]
    InvalidBatch(#[source] serde_json::Error),
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn download_json(download: Option<&Download>) -> serde_json::Value {
    match download {
        Some(d) => serde_json::json!({
            "file_name": d.file_name,
            "mime": d.mime,
            "size": d.bytes.len(),
        }),
        None => serde_json::Value::Null,
    }
}

/// Execute a single command on the editor.
pub fn execute_command<S: KeyValueStore>(
    editor: &mut EditorState<S>,
    cmd: EditorCommand,
) -> CommandResponse {
    match cmd {
        EditorCommand::Init {
            width,
            height,
            background,
        } => {
            let canvas = editor.settings().canvas.clone();
            editor.init(
                width.unwrap_or(canvas.width),
                height.unwrap_or(canvas.height),
                background.unwrap_or(canvas.background),
            );
            CommandResponse::ok_with_data(serde_json::json!({
                "objects": editor.scene().scene().len(),
                "undo": editor.history().undo_stack().len(),
                "redo": editor.history().redo_stack().len(),
            }))
        }

        EditorCommand::RestoreDesign { design } => {
            let restored = editor.restore_design(design);
            CommandResponse::ok_with_data(serde_json::json!({ "restored": restored }))
        }

        EditorCommand::AddShape { shape, stroke, fill } => {
            let id = editor.add_shape(shape, stroke, fill);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        EditorCommand::AddText {
            text,
            color,
            options,
        } => {
            let id = editor.add_text(text, color, &options);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        EditorCommand::SetProperty { prop, value } => {
            let change = match PropertyChange::from_prop(&prop, value) {
                Ok(change) => change,
                Err(e) => return CommandResponse::err(format!("Invalid property {prop}: {e}")),
            };
            let changed = editor.set_property(&change);
            CommandResponse::ok_with_data(serde_json::json!({ "changed": changed }))
        }

        EditorCommand::AddImage { url } => {
            let ticket = editor.request_image(url);
            CommandResponse::ok_with_data(serde_json::json!({ "ticket": ticket }))
        }

        EditorCommand::CompleteImage {
            ticket,
            width,
            height,
        } => match editor.complete_image(ticket, ImageInfo { width, height }) {
            Ok(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        EditorCommand::FailImage { ticket, reason } => {
            let dropped = editor.fail_image(ticket, &reason);
            CommandResponse::ok_with_data(serde_json::json!({ "dropped": dropped }))
        }

        EditorCommand::SetDrawingMode { mode, color, width } => {
            let applied = editor.set_drawing_mode(mode, color, width);
            CommandResponse::ok_with_data(serde_json::json!({ "applied": applied }))
        }

        EditorCommand::FinishStroke { points } => {
            let id = editor.finish_stroke(&points);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        EditorCommand::Select { id } => {
            let selected = editor.select(&id);
            CommandResponse::ok_with_data(serde_json::json!({ "selected": selected }))
        }

        EditorCommand::ClearSelection => {
            editor.clear_selection();
            CommandResponse::ok()
        }

        EditorCommand::DeleteSelection => {
            let removed = editor.delete_selection();
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        EditorCommand::SetBackground { color } => {
            let changed = editor.set_background(color);
            CommandResponse::ok_with_data(serde_json::json!({ "changed": changed }))
        }

        EditorCommand::ExportRaster { multiplier } => match editor.export_raster(multiplier) {
            Ok(_) => CommandResponse::ok_with_data(serde_json::json!({
                "download": download_json(editor.pending_downloads().last()),
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        EditorCommand::ExportSvg => {
            editor.export_svg();
            CommandResponse::ok_with_data(serde_json::json!({
                "download": download_json(editor.pending_downloads().last()),
            }))
        }

        EditorCommand::ExportJson => match editor.export_json() {
            Ok(_) => CommandResponse::ok_with_data(serde_json::json!({
                "download": download_json(editor.pending_downloads().last()),
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        EditorCommand::SaveHandoff => match editor.save_handoff() {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        EditorCommand::Undo => {
            let success = editor.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        EditorCommand::Redo => {
            let success = editor.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        EditorCommand::Reset => {
            let success = editor.reset();
            CommandResponse::ok_with_data(serde_json::json!({ "reset": success }))
        }

        EditorCommand::Inspect => {
            let scene = editor.scene();
            let objects: Vec<serde_json::Value> = scene
                .scene()
                .objects
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "id": d.id,
                        "type": d.shape.type_name(),
                        "name": drawable_display_name(d),
                        "selected": scene.active_id() == Some(&d.id),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "object_count": objects.len(),
                "objects": objects,
                "background": scene.scene().background,
                "drawing_mode": scene.drawing_mode(),
                "history_mode": format!("{:?}", editor.history().mode()),
                "undo": editor.history().undo_stack().len(),
                "redo": editor.history().redo_stack().len(),
                "pending_images": editor.has_pending_images(),
            }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json<S: KeyValueStore>(
    editor: &mut EditorState<S>,
    json: &str,
) -> Result<CommandResponse, CommandError> {
    let cmd: EditorCommand = serde_json::from_str(json).map_err(CommandError::InvalidJson)?;
    Ok(execute_command(editor, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch<S: KeyValueStore>(
    editor: &mut EditorState<S>,
    json: &str,
) -> Result<Vec<CommandResponse>, CommandError> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(CommandError::InvalidBatch)?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(editor, cmd))
        .collect())
}
