// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Process bootstrap: owns the application context, opens the main window and
//! blocks in the egui event loop until it closes.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};

use eframe::egui;
use egui_phosphor::Variant;
use thiserror::Error;

use crate::config::AppConfig;
use crate::logic::track_file::is_track_path;
use crate::logic::updater::CURRENT_VERSION;
use crate::ui::CurveApp;

/// Identifier handed to eframe (used for its storage directory).
pub const APP_ID: &str = "Minecraft Curve Generator";

static CONTEXT_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Failures that prevent the application from starting or running.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("an application context is already active in this process")]
    ContextAlreadyActive,
    #[error("invalid lifecycle transition from {from:?} to {to:?}")]
    InvalidTransition { from: Lifecycle, to: Lifecycle },
    #[error("event loop failed: {0}")]
    EventLoop(#[from] eframe::Error),
}

/// Process-wide application state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Running,
    Terminated,
}

impl Lifecycle {
    /// Move to `to` if that transition is allowed from the current state.
    ///
    /// `Uninitialized -> Terminated` covers a context closed without ever
    /// reaching the event loop.
    pub fn advance(self, to: Lifecycle) -> Result<Lifecycle, StartupError> {
        use Lifecycle::*;
        match (self, to) {
            (Uninitialized, Running) | (Running, Terminated) | (Uninitialized, Terminated) => {
                Ok(to)
            }
            (from, to) => Err(StartupError::InvalidTransition { from, to }),
        }
    }
}

/// Exclusive claim on the process-wide context slot; released on drop.
#[derive(Debug)]
struct ContextClaim;

impl ContextClaim {
    fn acquire() -> Result<Self, StartupError> {
        CONTEXT_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ContextClaim)
            .map_err(|_| StartupError::ContextAlreadyActive)
    }
}

impl Drop for ContextClaim {
    fn drop(&mut self) {
        CONTEXT_ACTIVE.store(false, Ordering::Release);
    }
}

/// The single application context. Passed explicitly to the main window.
#[derive(Debug)]
pub struct AppContext {
    args: Vec<OsString>,
    config: AppConfig,
    lifecycle: Lifecycle,
    claim: Option<ContextClaim>,
}

impl AppContext {
    /// Claim the context slot for this process.
    ///
    /// # Errors
    ///
    /// [`StartupError::ContextAlreadyActive`] while another context is alive.
    pub fn new(args: Vec<OsString>, config: AppConfig) -> Result<Self, StartupError> {
        let claim = ContextClaim::acquire()?;
        log::debug!("Application context created with {} argument(s)", args.len());
        Ok(Self {
            args,
            config,
            lifecycle: Lifecycle::Uninitialized,
            claim: Some(claim),
        })
    }

    /// Arguments exactly as the process received them.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn enter_event_loop(&mut self) -> Result<(), StartupError> {
        self.transition(Lifecycle::Running)
    }

    /// Terminate the context and release the process-wide slot.
    pub fn close(&mut self) -> Result<(), StartupError> {
        self.transition(Lifecycle::Terminated)?;
        self.claim = None;
        Ok(())
    }

    fn transition(&mut self, to: Lifecycle) -> Result<(), StartupError> {
        self.lifecycle = self.lifecycle.advance(to)?;
        log::info!("Lifecycle: {:?}", self.lifecycle);
        Ok(())
    }
}

/// A single positional `.mtrack` path after the program name, if present.
pub fn track_argument(args: &[OsString]) -> Option<PathBuf> {
    match args {
        [_, path] => Some(PathBuf::from(path)).filter(|p| is_track_path(p)),
        _ => None,
    }
}

/// Window title including the running version.
pub fn window_title() -> String {
    format!("Minecraft Ice Road Planner - v{CURRENT_VERSION}")
}

/// Run the application to completion and map the outcome to a process exit
/// status. Blocks for the lifetime of the event loop.
pub fn run(args: Vec<OsString>) -> ExitCode {
    ExitCode::from(exit_status(launch(args, AppConfig::from_env())))
}

/// `0` after a normal return from the event loop, `1` on any startup or
/// event loop failure (which is logged and printed to stderr).
fn exit_status(outcome: Result<(), StartupError>) -> u8 {
    match outcome {
        Ok(()) => {
            log::info!("Event loop finished");
            0
        }
        Err(err) => {
            log::error!("Application failed: {err}");
            eprintln!("{APP_ID}: {err}");
            1
        }
    }
}

fn launch(args: Vec<OsString>, config: AppConfig) -> Result<(), StartupError> {
    let mut context = AppContext::new(args, config)?;
    let options = native_options(context.config());
    context.enter_event_loop()?;

    let outcome = eframe::run_native(
        APP_ID,
        options,
        Box::new(|cc| {
            // Register Phosphor icon font.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(CurveApp::new(cc, &context)))
        }),
    );

    context.close()?;
    outcome.map_err(StartupError::from)
}

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(window_title())
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    }
}
