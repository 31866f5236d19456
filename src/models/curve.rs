// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Piecewise cubic Bézier track and its block rasterization.
//! Everything here works in grid units and is free of UI state.

use std::collections::HashSet;

use eframe::egui::{Pos2, Vec2, pos2};

use crate::models::control_point::ControlPoint;

/// Fewest samples taken along any segment.
const MIN_SEGMENT_STEPS: usize = 20;
const MAX_SEGMENT_STEPS: usize = 10_000;

/// One cell of the Minecraft block grid (horizontal plane).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    pub x: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Block containing a grid position.
    pub fn containing(pos: Pos2) -> Self {
        Self::new(pos.x.floor() as i32, pos.y.floor() as i32)
    }

    pub fn center(&self) -> Pos2 {
        pos2(self.x as f32 + 0.5, self.z as f32 + 0.5)
    }
}

/// Bézier control polygon of the span between two neighbouring control points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub p0: Pos2,
    pub p1: Pos2,
    pub p2: Pos2,
    pub p3: Pos2,
}

impl Segment {
    pub fn between(start: &ControlPoint, end: &ControlPoint) -> Self {
        Self {
            p0: start.pos,
            p1: start.out_handle(),
            p2: end.in_handle(),
            p3: end.pos,
        }
    }

    pub fn point_at(&self, t: f32) -> Pos2 {
        let u = 1.0 - t;
        let v = self.p0.to_vec2() * (u * u * u)
            + self.p1.to_vec2() * (3.0 * u * u * t)
            + self.p2.to_vec2() * (3.0 * u * t * t)
            + self.p3.to_vec2() * (t * t * t);
        v.to_pos2()
    }

    pub fn derivative_at(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * u * u)
            + (self.p2 - self.p1) * (6.0 * u * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }

    /// Sample count proportional to the control polygon length, capped.
    pub fn steps(&self) -> usize {
        let length =
            self.p0.distance(self.p1) + self.p1.distance(self.p2) + self.p2.distance(self.p3);
        ((length / 2.0) as usize).clamp(MIN_SEGMENT_STEPS, MAX_SEGMENT_STEPS)
    }

    /// Evenly spaced `(t, point)` samples including both endpoints.
    pub fn samples(&self) -> impl Iterator<Item = (f32, Pos2)> + '_ {
        let steps = self.steps();
        (0..=steps).map(move |j| {
            let t = j as f32 / steps as f32;
            (t, self.point_at(t))
        })
    }
}

/// Nearest curve sample to some target, as found by [`Curve::closest_sample`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveHit {
    pub distance: f32,
    pub segment: usize,
    pub t: f32,
}

/// Ordered list of control points forming the track.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curve {
    points: Vec<ControlPoint>,
}

impl Curve {
    #[cfg(test)]
    pub fn from_points(points: Vec<ControlPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn point_mut(&mut self, index: usize) -> Option<&mut ControlPoint> {
        self.points.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn set_points(&mut self, points: Vec<ControlPoint>) {
        self.points = points;
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn remove(&mut self, index: usize) -> Option<ControlPoint> {
        (index < self.points.len()).then(|| self.points.remove(index))
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points
            .windows(2)
            .map(|pair| Segment::between(&pair[0], &pair[1]))
    }

    /// Find the sample whose projected position lies nearest `target`.
    ///
    /// `project` maps grid positions into the space `target` lives in (usually
    /// screen space), so the distance is measured in that space.
    pub fn closest_sample(
        &self,
        project: impl Fn(Pos2) -> Pos2,
        target: Pos2,
    ) -> Option<CurveHit> {
        let mut best: Option<CurveHit> = None;
        for (segment, seg) in self.segments().enumerate() {
            for (t, point) in seg.samples() {
                let distance = project(point).distance(target);
                if best.is_none_or(|b| distance < b.distance) {
                    best = Some(CurveHit {
                        distance,
                        segment,
                        t,
                    });
                }
            }
        }
        best
    }

    /// Insert a new point on segment `segment` at parameter `t`, keeping the
    /// segment shape roughly intact. Returns the index of the inserted point.
    pub fn split_segment(&mut self, segment: usize, t: f32) -> Option<usize> {
        if segment + 1 >= self.points.len() {
            return None;
        }
        let seg = Segment::between(&self.points[segment], &self.points[segment + 1]);
        let u = 1.0 - t;

        let mut direction = seg.derivative_at(t);
        let length = direction.length();
        if length > 0.001 {
            direction = direction / length;
        }
        let chord = seg.p0.distance(seg.p3);

        let mut inserted = ControlPoint::new(seg.point_at(t));
        inserted.out_tangent = direction * chord * t * 0.5;
        inserted.in_tangent = -direction * chord * u * 0.5;

        self.points[segment].out_tangent *= t;
        self.points[segment + 1].in_tangent *= u;

        self.points.insert(segment + 1, inserted);
        Some(segment + 1)
    }

    /// Add a point at whichever end of the track lies closer to `pos`.
    /// Returns the index of the new point.
    pub fn extend(&mut self, pos: Pos2) -> usize {
        let point = ControlPoint::new(pos);
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            self.points.push(point);
            return 0;
        };

        if pos.distance(first.pos) < pos.distance(last.pos) {
            self.points.insert(0, point);
            0
        } else {
            self.points.push(point);
            self.points.len() - 1
        }
    }

    /// Blocks covered by a track of `width` blocks following the curve.
    pub fn rasterize(&self, width: u32) -> HashSet<BlockPos> {
        let mut blocks = HashSet::new();
        let radius = width as f32 / 2.0;

        for seg in self.segments() {
            for (_, point) in seg.samples() {
                let min_x = (point.x - radius).floor() as i32;
                let max_x = (point.x + radius).ceil() as i32;
                let min_z = (point.y - radius).floor() as i32;
                let max_z = (point.y + radius).ceil() as i32;
                for z in min_z..max_z {
                    for x in min_x..max_x {
                        let block = BlockPos::new(x, z);
                        if point.distance(block.center()) <= radius {
                            blocks.insert(block);
                        }
                    }
                }
            }
        }
        blocks
    }
}
