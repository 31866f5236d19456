// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Mapping between canvas-local screen pixels and block grid coordinates.

use eframe::egui::{Pos2, Rect, Vec2, vec2};

use crate::models::curve::BlockPos;

pub const MIN_ZOOM: i32 = 2;
pub const MAX_ZOOM: i32 = 40;
pub const DEFAULT_ZOOM: i32 = 10;

/// Pan/zoom state of the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Grid coordinate shown at the canvas' top-left corner.
    pub offset: Vec2,
    zoom: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: vec2(500.0, 500.0),
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Viewport {
    /// Screen pixels per block.
    pub fn zoom(&self) -> i32 {
        self.zoom
    }

    fn scale(&self) -> f32 {
        self.zoom as f32
    }

    /// Set the zoom level, clamped to the supported range. Returns the applied value.
    pub fn set_zoom(&mut self, zoom: i32) -> i32 {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom
    }

    pub fn zoom_by(&mut self, steps: i32) -> i32 {
        self.set_zoom(self.zoom.saturating_add(steps))
    }

    /// Move the view so content follows a pointer drag of `screen_delta` pixels.
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.offset -= screen_delta / self.scale();
    }

    pub fn screen_to_grid(&self, screen: Pos2) -> Pos2 {
        (screen.to_vec2() / self.scale() + self.offset).to_pos2()
    }

    pub fn grid_to_screen(&self, grid: Pos2) -> Pos2 {
        ((grid.to_vec2() - self.offset) * self.scale()).to_pos2()
    }

    /// Screen-space scale of a grid-space vector such as a tangent.
    pub fn grid_vec_to_screen(&self, v: Vec2) -> Vec2 {
        v * self.scale()
    }

    pub fn screen_vec_to_grid(&self, v: Vec2) -> Vec2 {
        v / self.scale()
    }

    /// Screen rectangle covered by a block.
    pub fn block_rect(&self, block: BlockPos) -> Rect {
        let min = self.grid_to_screen(Pos2::new(block.x as f32, block.z as f32));
        Rect::from_min_size(min, Vec2::splat(self.scale()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn screen_and_grid_round_trip() {
        let view = Viewport::default();
        let grid = view.screen_to_grid(pos2(25.0, 40.0));
        assert_eq!(grid, pos2(502.5, 504.0));
        assert_eq!(view.grid_to_screen(grid), pos2(25.0, 40.0));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = Viewport::default();
        assert_eq!(view.set_zoom(100), MAX_ZOOM);
        assert_eq!(view.set_zoom(-3), MIN_ZOOM);
        assert_eq!(view.zoom_by(3), MIN_ZOOM + 3);
    }

    #[test]
    fn pan_moves_offset_against_drag() {
        let mut view = Viewport::default();
        view.pan(vec2(20.0, -10.0));
        assert_eq!(view.offset, vec2(498.0, 501.0));
    }

    #[test]
    fn block_rect_matches_zoom() {
        let view = Viewport::default();
        let rect = view.block_rect(BlockPos::new(501, 500));
        assert_eq!(rect.min, pos2(10.0, 0.0));
        assert_eq!(rect.size(), vec2(10.0, 10.0));
    }
}
