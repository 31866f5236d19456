// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Top-level egui application shell for the track planner.
//! Handles layout, keyboard shortcuts, modals, and the command worker pool.

pub mod components;

use eframe::egui::{self, Key, KeyboardShortcut, Modifiers};

use crate::app::{AppContext, track_argument};
use crate::logic::updater::CURRENT_VERSION;
use crate::mvu::{self, AppModel, Command, Msg, Shortcut};
use crate::ui::components::{canvas, control_panel};

/// Single-key shortcuts, matched without modifiers.
const KEY_SHORTCUTS: [(Key, Shortcut); 6] = [
    (Key::S, Shortcut::ExportTrack),
    (Key::O, Shortcut::ImportTrack),
    (Key::P, Shortcut::ExportImage),
    (Key::C, Shortcut::Clear),
    (Key::T, Shortcut::ToggleTangents),
    (Key::M, Shortcut::ToggleMirror),
];

/// Main window: owns the model and feeds commands to background workers.
pub struct CurveApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl CurveApp {
    /// Build the main window from the application context and queue the
    /// startup commands (update check, track passed on the command line).
    pub fn new(cc: &eframe::CreationContext<'_>, context: &AppContext) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().clamp(2, 4))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let egui_ctx = cc.egui_ctx.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd);
                    if msg_tx.send(msg).is_err() {
                        break;
                    }
                    egui_ctx.request_repaint();
                }
            });
        }

        let mut app = Self {
            model: AppModel::default(),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        };
        let track = track_argument(context.args());
        app.dispatch(mvu::startup_commands(context.config(), track));
        app
    }

    fn dispatch(&mut self, commands: Vec<Command>) {
        for cmd in commands {
            if self.cmd_tx.send(cmd).is_ok() {
                self.model.pending_commands += 1;
            }
        }
    }
}

impl eframe::App for CurveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pull messages produced by the command workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        self.collect_shortcuts(ctx);

        // Pointer messages depend on arrival order.
        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            self.dispatch(commands);
        }

        if self.model.quit_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("Ice Road Planner");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::widgets::global_theme_preference_switch(ui);
                    ui.label(
                        egui::RichText::new(format!("v{CURRENT_VERSION}"))
                            .small()
                            .color(egui::Color32::from_gray(110)),
                    );
                });
            });
            ui.add_space(2.0);
        });

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::SidePanel::left("control_panel")
            .resizable(false)
            .default_width(230.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let msgs = control_panel::view(ui, &self.model.canvas);
                    self.inbox.extend(msgs.into_iter().map(Msg::Panel));
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let msgs = canvas::view(ui, &self.model.canvas);
                self.inbox.extend(msgs.into_iter().map(Msg::Canvas));
            });

        self.render_update_modal(ctx);
        self.render_error_modal(ctx);

        if !self.inbox.is_empty() {
            ctx.request_repaint();
        }
    }
}

impl CurveApp {
    /// Translate key presses into shortcut messages.
    fn collect_shortcuts(&mut self, ctx: &egui::Context) {
        let shortcuts = ctx.input_mut(|input| {
            let mut found = Vec::new();
            let redo = [
                KeyboardShortcut::new(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z),
                KeyboardShortcut::new(Modifiers::COMMAND, Key::Y),
            ];
            if redo.iter().any(|s| input.consume_shortcut(s)) {
                found.push(Shortcut::Redo);
            }
            if input.consume_shortcut(&KeyboardShortcut::new(Modifiers::COMMAND, Key::Z)) {
                found.push(Shortcut::Undo);
            }
            for (key, shortcut) in KEY_SHORTCUTS {
                if input.consume_key(Modifiers::NONE, key) {
                    found.push(shortcut);
                }
            }
            found
        });
        self.inbox.extend(shortcuts.into_iter().map(Msg::Shortcut));
    }

    /// Status text on the left, block count and cursor position on the right.
    fn render_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(text) = &self.model.status {
                ui.label(egui::RichText::new(text).color(egui::Color32::from_gray(110)));
            }
            if self.model.pending_commands > 0 {
                ui.add(egui::Spinner::new().size(14.0)).on_hover_text(format!(
                    "{} task(s) running in background",
                    self.model.pending_commands
                ));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(block) = self.model.canvas.cursor() {
                    ui.monospace(format!("X: {}  Z: {}", block.x, block.z));
                    ui.separator();
                }
                ui.label(control_panel::block_summary(&self.model.canvas));
            });
        });
    }

    /// Offer a newer release with its notes.
    fn render_update_modal(&mut self, ctx: &egui::Context) {
        let Some(release) = &self.model.update_offer else {
            return;
        };
        let mut msgs = Vec::new();

        egui::Window::new("Update available")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Version {} is available. You are running {CURRENT_VERSION}.",
                    release.version
                ));
                if !release.notes.trim().is_empty() {
                    ui.add_space(6.0);
                    egui::ScrollArea::vertical()
                        .max_height(220.0)
                        .show(ui, |ui| ui.label(release.notes.trim()));
                }
                if !release.page_url.is_empty() {
                    ui.hyperlink_to("Release page", &release.page_url);
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let update_label =
                        format!("{} Update now", egui_phosphor::regular::DOWNLOAD_SIMPLE);
                    if ui.button(update_label).clicked() {
                        msgs.push(Msg::AcceptUpdate);
                    }
                    if ui.button("Later").clicked() {
                        msgs.push(Msg::DismissUpdate);
                    }
                });
            });

        self.inbox.extend(msgs);
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }
}
