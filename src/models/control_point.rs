// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Control point domain model: a curve knot with its two tangent handles.

use eframe::egui::{Pos2, Vec2};

/// Default length of a freshly placed tangent, in blocks.
const DEFAULT_TANGENT: Vec2 = Vec2::new(20.0, 0.0);

/// A single knot of the track curve.
///
/// Tangents are stored relative to `pos`, in grid units.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlPoint {
    pub pos: Pos2,
    pub in_tangent: Vec2,
    pub out_tangent: Vec2,
    /// When set, editing one tangent mirrors the other.
    pub mirrored: bool,
}

impl ControlPoint {
    pub fn new(pos: Pos2) -> Self {
        Self {
            pos,
            in_tangent: -DEFAULT_TANGENT,
            out_tangent: DEFAULT_TANGENT,
            mirrored: true,
        }
    }

    /// Absolute grid position of the incoming handle.
    pub fn in_handle(&self) -> Pos2 {
        self.pos + self.in_tangent
    }

    /// Absolute grid position of the outgoing handle.
    pub fn out_handle(&self) -> Pos2 {
        self.pos + self.out_tangent
    }

    pub fn set_in_tangent(&mut self, tangent: Vec2) {
        self.in_tangent = tangent;
        if self.mirrored {
            self.out_tangent = -tangent;
        }
    }

    pub fn set_out_tangent(&mut self, tangent: Vec2) {
        self.out_tangent = tangent;
        if self.mirrored {
            self.in_tangent = -tangent;
        }
    }

    pub fn toggle_mirrored(&mut self) {
        self.mirrored = !self.mirrored;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    #[test]
    fn new_point_has_horizontal_mirrored_tangents() {
        let cp = ControlPoint::new(pos2(3.0, 4.0));
        assert_eq!(cp.in_tangent, vec2(-20.0, 0.0));
        assert_eq!(cp.out_tangent, vec2(20.0, 0.0));
        assert!(cp.mirrored);
        assert_eq!(cp.in_handle(), pos2(-17.0, 4.0));
        assert_eq!(cp.out_handle(), pos2(23.0, 4.0));
    }

    #[test]
    fn mirrored_point_flips_opposite_tangent() {
        let mut cp = ControlPoint::new(pos2(0.0, 0.0));
        cp.set_in_tangent(vec2(-5.0, 2.0));
        assert_eq!(cp.out_tangent, vec2(5.0, -2.0));

        cp.set_out_tangent(vec2(1.0, 1.0));
        assert_eq!(cp.in_tangent, vec2(-1.0, -1.0));
    }

    #[test]
    fn unmirrored_point_keeps_tangents_independent() {
        let mut cp = ControlPoint::new(pos2(0.0, 0.0));
        cp.toggle_mirrored();
        cp.set_out_tangent(vec2(7.0, 7.0));
        assert_eq!(cp.in_tangent, vec2(-20.0, 0.0));
        assert_eq!(cp.out_tangent, vec2(7.0, 7.0));
    }
}
