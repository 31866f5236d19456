// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Side-effecting operations: track files, image export and release updates.

pub mod image_export;
pub mod track_file;
pub mod updater;
