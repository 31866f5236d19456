// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod logic;
mod models;
mod mvu;
mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    app::run(std::env::args_os().collect())
}
