// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::logic::image_export::{self, DEFAULT_IMAGE_NAME};
use crate::logic::track_file::{self, DEFAULT_TRACK_NAME, TRACK_EXTENSION, ensure_extension};
use crate::logic::updater::{self, CURRENT_VERSION, ReleaseInfo, StagedUpdate};
use crate::models::{BlockPos, ControlPoint};
use crate::ui::components::canvas::{self, CanvasEvent, CanvasModel, CanvasMsg};
use crate::ui::components::control_panel::ControlPanelMsg;

const NOTHING_TO_EXPORT: &str = "There is nothing to export.";

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Curve editor state.
    pub canvas: CanvasModel,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
    /// Newer release waiting for the user's decision.
    pub update_offer: Option<ReleaseInfo>,
    /// Set once the window should close (after launching the updater).
    pub quit_requested: bool,
}

/// Keyboard shortcuts handled by the root update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    ExportTrack,
    ImportTrack,
    ExportImage,
    Clear,
    ToggleTangents,
    ToggleMirror,
    Undo,
    Redo,
}

/// Application messages routed through the update function.
#[derive(Debug)]
pub enum Msg {
    Canvas(CanvasMsg),
    Panel(ControlPanelMsg),
    Shortcut(Shortcut),
    TrackLoaded {
        path: PathBuf,
        result: Result<Vec<ControlPoint>, String>,
    },
    TrackSaved(Result<PathBuf, String>),
    ImageSaved(Result<PathBuf, String>),
    DialogCancelled(&'static str),
    UpdateCheckFinished(Result<Option<ReleaseInfo>, String>),
    AcceptUpdate,
    DismissUpdate,
    UpdateStaged(Result<StagedUpdate, String>),
    DismissError,
}

/// Commands represent side-effects executed between frames.
#[derive(Debug)]
pub enum Command {
    PickTrackFile,
    LoadTrack(PathBuf),
    SaveTrack(Vec<ControlPoint>),
    SaveImage {
        blocks: HashSet<BlockPos>,
        highlighted: HashSet<BlockPos>,
    },
    CheckForUpdates { repo: String },
    DownloadUpdate(ReleaseInfo),
}

/// Commands to run once the main window is up.
pub fn startup_commands(config: &AppConfig, track: Option<PathBuf>) -> Vec<Command> {
    let mut cmds = Vec::new();
    if config.check_for_updates {
        cmds.push(Command::CheckForUpdates {
            repo: config.update_repo.clone(),
        });
    } else {
        log::info!("Startup update check disabled");
    }
    if let Some(path) = track {
        cmds.push(Command::LoadTrack(path));
    }
    cmds
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::Canvas(m) => forward_to_canvas(model, m),
        Msg::Panel(m) => match m {
            ControlPanelMsg::WidthChanged(width) => {
                forward_to_canvas(model, CanvasMsg::SetCurveWidth(width))
            }
            ControlPanelMsg::ZoomChanged(zoom) => forward_to_canvas(model, CanvasMsg::SetZoom(zoom)),
            ControlPanelMsg::ToggleTangents => forward_to_canvas(model, CanvasMsg::ToggleTangents),
            ControlPanelMsg::ImportTrack => request_import(model, cmds),
            ControlPanelMsg::ExportTrack => request_track_export(model, cmds),
            ControlPanelMsg::ExportImage => request_image_export(model, cmds),
            ControlPanelMsg::Undo => forward_to_canvas(model, CanvasMsg::Undo),
            ControlPanelMsg::Redo => forward_to_canvas(model, CanvasMsg::Redo),
            ControlPanelMsg::Clear => forward_to_canvas(model, CanvasMsg::Clear),
            ControlPanelMsg::LockChanged(locked) => {
                forward_to_canvas(model, CanvasMsg::SetLocked(locked))
            }
            ControlPanelMsg::ClearHighlights => {
                forward_to_canvas(model, CanvasMsg::ClearHighlights)
            }
        },
        Msg::Shortcut(shortcut) => {
            // Every shortcut is disabled while the track is locked.
            if model.canvas.locked() {
                return;
            }
            match shortcut {
                Shortcut::ExportTrack => request_track_export(model, cmds),
                Shortcut::ImportTrack => request_import(model, cmds),
                Shortcut::ExportImage => request_image_export(model, cmds),
                Shortcut::Clear => forward_to_canvas(model, CanvasMsg::Clear),
                Shortcut::ToggleTangents => forward_to_canvas(model, CanvasMsg::ToggleTangents),
                Shortcut::ToggleMirror => forward_to_canvas(model, CanvasMsg::ToggleMirror),
                Shortcut::Undo => forward_to_canvas(model, CanvasMsg::Undo),
                Shortcut::Redo => forward_to_canvas(model, CanvasMsg::Redo),
            }
        }
        Msg::TrackLoaded { path, result } => match result {
            Ok(points) if points.is_empty() => surface_event(
                model,
                format!("No control points found in {}.", path.display()),
                true,
            ),
            Ok(points) => {
                let count = points.len();
                let event = canvas::update(&mut model.canvas, CanvasMsg::ReplacePoints(points));
                match event {
                    Some(event) => surface_event(model, event.message, event.is_error),
                    None => surface_event(
                        model,
                        format!("Loaded {count} control points from {}", display_name(&path)),
                        false,
                    ),
                }
            }
            Err(err) => surface_event(model, format!("Failed to load track:\n\n{err}"), true),
        },
        Msg::TrackSaved(result) => match result {
            Ok(path) => surface_event(model, format!("Track saved: {}", path.display()), false),
            Err(err) => surface_event(model, format!("Failed to save track:\n\n{err}"), true),
        },
        Msg::ImageSaved(result) => match result {
            Ok(path) => surface_event(model, format!("Image saved: {}", path.display()), false),
            Err(err) => surface_event(model, format!("Failed to export image:\n\n{err}"), true),
        },
        Msg::DialogCancelled(message) => surface_event(model, message.to_string(), false),
        Msg::UpdateCheckFinished(result) => match result {
            Ok(Some(release)) => {
                log::info!("Release {} is available", release.version);
                model.status = Some(format!("Version {} is available.", release.version));
                model.update_offer = Some(release);
            }
            Ok(None) => log::info!("Running the latest version ({CURRENT_VERSION})"),
            Err(err) => log::warn!("Update check failed: {err}"),
        },
        Msg::AcceptUpdate => {
            if let Some(release) = model.update_offer.take() {
                model.status = Some(format!("Downloading version {}…", release.version));
                cmds.push(Command::DownloadUpdate(release));
            }
        }
        Msg::DismissUpdate => model.update_offer = None,
        Msg::UpdateStaged(result) => match result {
            Ok(staged) if staged.restart_required => {
                model.status = Some("Update downloaded. Restarting…".into());
                model.quit_requested = true;
            }
            Ok(staged) => surface_event(
                model,
                format!(
                    "Update downloaded to {}. Replace {} with it to finish updating.",
                    staged.staged.display(),
                    staged.current_exe.display()
                ),
                false,
            ),
            Err(err) => surface_event(model, format!("Update failed:\n\n{err}"), true),
        },
        Msg::DismissError => model.error = None,
    }
}

/// Execute a command synchronously and return the resulting message.
pub fn run_command(cmd: Command) -> Msg {
    match cmd {
        Command::PickTrackFile => {
            let file = rfd::FileDialog::new()
                .set_title("Import track")
                .add_filter("Minecraft track", &[TRACK_EXTENSION])
                .pick_file();
            match file {
                Some(path) => load_track_from(path),
                None => Msg::DialogCancelled("Import cancelled."),
            }
        }
        Command::LoadTrack(path) => load_track_from(path),
        Command::SaveTrack(points) => {
            let file = rfd::FileDialog::new()
                .set_title("Export track")
                .add_filter("Minecraft track", &[TRACK_EXTENSION])
                .set_file_name(DEFAULT_TRACK_NAME)
                .save_file();
            match file {
                Some(path) => save_track_to(ensure_extension(path, TRACK_EXTENSION), &points),
                None => Msg::DialogCancelled("Export cancelled."),
            }
        }
        Command::SaveImage {
            blocks,
            highlighted,
        } => {
            let file = rfd::FileDialog::new()
                .set_title("Export PNG")
                .add_filter("PNG image", &["png"])
                .set_file_name(DEFAULT_IMAGE_NAME)
                .save_file();
            match file {
                Some(path) => save_image_to(ensure_extension(path, "png"), &blocks, &highlighted),
                None => Msg::DialogCancelled("Export cancelled."),
            }
        }
        Command::CheckForUpdates { repo } => Msg::UpdateCheckFinished(
            updater::check_for_update(&repo, CURRENT_VERSION).map_err(|e| format!("{e:#}")),
        ),
        Command::DownloadUpdate(release) => Msg::UpdateStaged(
            updater::download_and_stage(&release).map_err(|e| format!("{e:#}")),
        ),
    }
}

fn load_track_from(path: PathBuf) -> Msg {
    let result = track_file::load_track(&path).map_err(|e| format!("{e:#}"));
    Msg::TrackLoaded { path, result }
}

fn save_track_to(path: PathBuf, points: &[ControlPoint]) -> Msg {
    Msg::TrackSaved(
        track_file::save_track(&path, points)
            .map(|_| path)
            .map_err(|e| format!("{e:#}")),
    )
}

fn save_image_to(path: PathBuf, blocks: &HashSet<BlockPos>, highlighted: &HashSet<BlockPos>) -> Msg {
    Msg::ImageSaved(
        image_export::save_png(&path, blocks, highlighted)
            .map(|_| path)
            .map_err(|e| format!("{e:#}")),
    )
}

fn forward_to_canvas(model: &mut AppModel, msg: CanvasMsg) {
    if let Some(CanvasEvent { message, is_error }) = canvas::update(&mut model.canvas, msg) {
        surface_event(model, message, is_error);
    }
}

fn request_import(model: &mut AppModel, cmds: &mut Vec<Command>) {
    if model.canvas.locked() {
        surface_event(model, "Unlock the track before importing.".into(), false);
        return;
    }
    cmds.push(Command::PickTrackFile);
}

fn request_track_export(model: &mut AppModel, cmds: &mut Vec<Command>) {
    if model.canvas.curve().is_empty() {
        surface_event(model, NOTHING_TO_EXPORT.into(), true);
        return;
    }
    cmds.push(Command::SaveTrack(model.canvas.curve().points().to_vec()));
}

fn request_image_export(model: &mut AppModel, cmds: &mut Vec<Command>) {
    if model.canvas.blocks().is_empty() {
        surface_event(model, NOTHING_TO_EXPORT.into(), true);
        return;
    }
    cmds.push(Command::SaveImage {
        blocks: model.canvas.blocks().clone(),
        highlighted: model.canvas.highlighted().clone(),
    });
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}
