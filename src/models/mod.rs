// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Domain layer: curve geometry, block rasterization, history and view mapping.
//! Nothing here talks to egui widgets or the filesystem.

pub mod control_point;
pub mod curve;
pub mod history;
pub mod viewport;

pub use control_point::ControlPoint;
pub use curve::BlockPos;
