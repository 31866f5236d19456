// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Editor components structured for MVU-style updates.

pub mod canvas;
pub mod control_panel;
