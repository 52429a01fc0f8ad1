//! Headless canvas editor: replays a JSON command script against a
//! file-backed history store and writes exports to an output directory.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use canvas_editor_lib::command::{execute_command, EditorCommand};
use canvas_editor_lib::state::scene::FileImageLoader;
use canvas_editor_lib::state::{EditorSettings, EditorState, FileStore};
use tracing::{info, warn};

#[derive(Debug, Default)]
struct Args {
    commands: Option<PathBuf>,
    store: Option<PathBuf>,
    out: Option<PathBuf>,
    settings: Option<PathBuf>,
    defer_images: bool,
    init_settings: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canvas_editor=info,canvas_editor_lib=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;

    if args.init_settings {
        let path = EditorSettings::default()
            .save()
            .context("Failed to write default settings")?;
        println!("{}", path.display());
        return Ok(());
    }

    let settings = match &args.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings {}", path.display()))?;
            EditorSettings::from_json(&json)
                .with_context(|| format!("Invalid settings {}", path.display()))?
        }
        None => EditorSettings::load(),
    };

    let Some(script) = &args.commands else {
        bail!("usage: canvas-editor --commands <script.json> [--store <dir>] [--out <dir>] [--settings <file>] [--defer-images] | --init-settings");
    };
    let commands = read_script(script)?;

    let store = open_store(&args, &settings)?;
    info!("Using history store at {}", store.dir().display());
    let out_dir = args.out.clone().unwrap_or_else(|| PathBuf::from("."));

    let font_path = settings.export.font_path.clone();
    let mut editor = EditorState::new(store, settings);
    if let Some(path) = font_path {
        let bytes =
            std::fs::read(&path).with_context(|| format!("Failed to read font {path}"))?;
        editor
            .set_export_font(bytes)
            .with_context(|| format!("Invalid font {path}"))?;
    }
    for (index, cmd) in commands.into_iter().enumerate() {
        let response = execute_command(&mut editor, cmd);
        if !args.defer_images && editor.has_pending_images() {
            for result in editor.resolve_images(&FileImageLoader) {
                if let Err(e) = result {
                    warn!("Command {index}: {e}");
                }
            }
        }
        for download in editor.take_downloads() {
            let path = out_dir.join(&download.file_name);
            write_download(&path, &download.bytes)?;
            info!("Wrote {} ({} bytes)", path.display(), download.bytes.len());
        }
        println!(
            "{}",
            serde_json::to_string(&response).context("Failed to serialize response")?
        );
    }

    Ok(())
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .map(PathBuf::from)
                .with_context(|| format!("{name} expects a path"))
        };
        match arg.as_str() {
            "--commands" => args.commands = Some(value("--commands")?),
            "--store" => args.store = Some(value("--store")?),
            "--out" => args.out = Some(value("--out")?),
            "--settings" => args.settings = Some(value("--settings")?),
            "--defer-images" => args.defer_images = true,
            "--init-settings" => args.init_settings = true,
            other => bail!("Unknown argument {other}"),
        }
    }
    Ok(args)
}

fn read_script(path: &Path) -> Result<Vec<EditorCommand>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read command script {}", path.display()))?;
    let commands: Vec<EditorCommand> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid command script {}", path.display()))?;
    info!("Loaded {} commands from {}", commands.len(), path.display());
    Ok(commands)
}

/// `--store`, then the settings override, then the platform data dir
fn open_store(args: &Args, settings: &EditorSettings) -> Result<FileStore> {
    if let Some(dir) = &args.store {
        return Ok(FileStore::new(dir));
    }
    if let Some(dir) = &settings.storage.dir {
        return Ok(FileStore::new(dir));
    }
    FileStore::in_data_dir().context("No data directory available; pass --store <dir>")
}

fn write_download(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
