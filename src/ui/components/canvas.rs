// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Curve editing canvas in MVU shape.
//!
//! The view translates raw pointer input into [`CanvasMsg`]s carrying
//! canvas-local screen positions; [`update`] applies them to the model. All
//! editing rules (hit testing, splitting, dragging, locking) live in `update`
//! so they can be exercised without a running UI.

use std::collections::HashSet;

use eframe::egui::{self, Color32, PointerButton, Pos2, Rect, Stroke, Vec2};

use crate::models::curve::{BlockPos, Curve};
use crate::models::history::History;
use crate::models::viewport::Viewport;
use crate::models::ControlPoint;

/// Radius of tangent handles in screen pixels; hit tests reach twice as far.
pub const HANDLE_RADIUS: f32 = 6.0;
pub const MIN_WIDTH: u32 = 1;
pub const MAX_WIDTH: u32 = 25;
pub const DEFAULT_WIDTH: u32 = 3;

const BACKGROUND: Color32 = Color32::from_rgb(0x28, 0x2c, 0x34);
const BLOCK_FILL: Color32 = Color32::from_rgb(0xa0, 0xe8, 0xff);
const HIGHLIGHT_FILL: Color32 = Color32::from_rgba_premultiplied(100, 0, 0, 100);
const GRID_LINE: Color32 = Color32::from_rgb(60, 60, 60);
const CURVE_LINE: Color32 = Color32::from_rgba_premultiplied(150, 150, 150, 150);
const MIRRORED_HANDLE: Color32 = Color32::from_rgb(0xff, 0x55, 0x55);
const IN_HANDLE: Color32 = Color32::from_rgb(0x55, 0xff, 0x55);
const OUT_HANDLE: Color32 = Color32::from_rgb(0x55, 0x55, 0xff);

/// Which part of a control point is being dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    Point,
    InHandle,
    OutHandle,
}

#[derive(Clone, Debug, PartialEq)]
struct DragState {
    kind: DragKind,
    index: usize,
    /// Absolute handle positions when the drag started (for Shift-drag).
    start_in: Pos2,
    start_out: Pos2,
    /// Curve before the drag; a drag that changes nothing is not recorded.
    before: Vec<ControlPoint>,
}

/// Editor state behind the canvas.
#[derive(Clone, Debug)]
pub struct CanvasModel {
    curve: Curve,
    selected: Option<usize>,
    history: History<Vec<ControlPoint>>,
    viewport: Viewport,
    blocks: HashSet<BlockPos>,
    highlighted: HashSet<BlockPos>,
    curve_width: u32,
    show_tangents: bool,
    locked: bool,
    drag: Option<DragState>,
    pan_anchor: Option<Pos2>,
    cursor: Option<BlockPos>,
}

impl Default for CanvasModel {
    fn default() -> Self {
        Self {
            curve: Curve::default(),
            selected: None,
            history: History::new(Vec::new()),
            viewport: Viewport::default(),
            blocks: HashSet::new(),
            highlighted: HashSet::new(),
            curve_width: DEFAULT_WIDTH,
            show_tangents: true,
            locked: false,
            drag: None,
            pan_anchor: None,
            cursor: None,
        }
    }
}

/// Messages emitted by the canvas view and the surrounding controls.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasMsg {
    PointerPressed { button: PointerButton, pos: Pos2 },
    PointerMoved { pos: Pos2, shift: bool },
    PointerReleased { button: PointerButton },
    PointerLeft,
    /// Mouse wheel notches; positive zooms in.
    Scrolled(i32),
    SetZoom(i32),
    SetCurveWidth(u32),
    ToggleTangents,
    SetLocked(bool),
    ToggleMirror,
    Undo,
    Redo,
    Clear,
    ClearHighlights,
    ReplacePoints(Vec<ControlPoint>),
}

/// User-facing feedback surfaced to the status bar or error modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanvasEvent {
    pub message: String,
    pub is_error: bool,
}

impl CanvasEvent {
    fn info(message: impl Into<String>) -> Option<Self> {
        Some(Self {
            message: message.into(),
            is_error: false,
        })
    }

    fn error(message: impl Into<String>) -> Option<Self> {
        Some(Self {
            message: message.into(),
            is_error: true,
        })
    }
}

impl CanvasModel {
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    #[cfg(test)]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn blocks(&self) -> &HashSet<BlockPos> {
        &self.blocks
    }

    pub fn highlighted(&self) -> &HashSet<BlockPos> {
        &self.highlighted
    }

    pub fn curve_width(&self) -> u32 {
        self.curve_width
    }

    pub fn show_tangents(&self) -> bool {
        self.show_tangents
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Block under the pointer, if the pointer is over the canvas.
    pub fn cursor(&self) -> Option<BlockPos> {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        !self.locked && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.locked && self.history.can_redo()
    }

    /// True while a drag or pan is in progress.
    pub fn is_interacting(&self) -> bool {
        self.drag.is_some() || self.pan_anchor.is_some()
    }

    fn rebuild_blocks(&mut self) {
        self.blocks = self.curve.rasterize(self.curve_width);
        let blocks = &self.blocks;
        self.highlighted.retain(|b| blocks.contains(b));
    }

    fn commit(&mut self) {
        self.history.record(self.curve.points().to_vec());
    }

    fn restore(&mut self, points: Vec<ControlPoint>) {
        self.curve.set_points(points);
        self.selected = None;
        self.drag = None;
        self.rebuild_blocks();
    }

    fn finish_drag(&mut self) {
        if let Some(drag) = self.drag.take()
            && drag.before.as_slice() != self.curve.points()
        {
            self.commit();
        }
    }

    /// Topmost control point part under `pos`, using Manhattan distance.
    fn hit_test(&self, pos: Pos2) -> Option<(DragKind, usize)> {
        let reach = HANDLE_RADIUS * 2.0;
        let near = |a: Pos2| {
            let d = a - pos;
            d.x.abs() + d.y.abs() < reach
        };

        for (index, pt) in self.curve.points().iter().enumerate().rev() {
            let center = self.viewport.grid_to_screen(pt.pos);
            if self.show_tangents {
                if near(center + self.viewport.grid_vec_to_screen(pt.in_tangent)) {
                    return Some((DragKind::InHandle, index));
                }
                if near(center + self.viewport.grid_vec_to_screen(pt.out_tangent)) {
                    return Some((DragKind::OutHandle, index));
                }
            }
            if near(center) {
                return Some((DragKind::Point, index));
            }
        }
        None
    }

    fn press_primary(&mut self, pos: Pos2) -> Option<CanvasEvent> {
        if self.locked {
            self.toggle_highlight(pos);
            return None;
        }

        if let Some((kind, index)) = self.hit_test(pos) {
            let pt = &self.curve.points()[index];
            self.drag = Some(DragState {
                kind,
                index,
                start_in: pt.in_handle(),
                start_out: pt.out_handle(),
                before: self.curve.points().to_vec(),
            });
            self.selected = Some(index);
            return None;
        }

        let viewport = self.viewport;
        let threshold = self.curve_width as f32 * viewport.zoom() as f32 / 2.0 + 5.0;
        let hit = self
            .curve
            .closest_sample(|g| viewport.grid_to_screen(g), pos)
            .filter(|hit| hit.distance < threshold);

        let inserted = match hit {
            Some(hit) => self.curve.split_segment(hit.segment, hit.t),
            None => Some(self.curve.extend(viewport.screen_to_grid(pos))),
        };
        self.selected = inserted;
        self.rebuild_blocks();
        self.commit();
        None
    }

    fn press_middle(&mut self, pos: Pos2) -> Option<CanvasEvent> {
        // Deleting would shift the index of the point being dragged.
        if self.locked || self.drag.is_some() {
            return None;
        }
        let reach = HANDLE_RADIUS * 2.0;
        let target = self
            .curve
            .points()
            .iter()
            .rposition(|pt| self.viewport.grid_to_screen(pt.pos).distance(pos) < reach)?;

        self.curve.remove(target);
        self.selected = None;
        self.rebuild_blocks();
        self.commit();
        CanvasEvent::info("Point deleted")
    }

    fn toggle_highlight(&mut self, pos: Pos2) {
        let block = BlockPos::containing(self.viewport.screen_to_grid(pos));
        if !self.blocks.contains(&block) {
            return;
        }
        if !self.highlighted.remove(&block) {
            self.highlighted.insert(block);
        }
    }

    fn drag_to(&mut self, pos: Pos2, shift: bool) {
        let Some(drag) = self.drag.as_ref() else {
            return;
        };
        let (kind, index, start_in, start_out) =
            (drag.kind, drag.index, drag.start_in, drag.start_out);
        let viewport = self.viewport;
        let Some(pt) = self.curve.point_mut(index) else {
            self.drag = None;
            return;
        };

        match kind {
            DragKind::Point => {
                let grid = viewport.screen_to_grid(pos);
                pt.pos = grid;
                if shift {
                    pt.in_tangent = start_in - grid;
                    pt.out_tangent = start_out - grid;
                }
            }
            DragKind::InHandle | DragKind::OutHandle => {
                let center = viewport.grid_to_screen(pt.pos);
                let tangent = viewport.screen_vec_to_grid(pos - center);
                if kind == DragKind::InHandle {
                    pt.set_in_tangent(tangent);
                } else {
                    pt.set_out_tangent(tangent);
                }
            }
        }
        self.rebuild_blocks();
    }
}

/// Apply a message to the model. Returns a feedback event when relevant.
pub fn update(model: &mut CanvasModel, msg: CanvasMsg) -> Option<CanvasEvent> {
    match msg {
        CanvasMsg::PointerPressed { button, pos } => match button {
            PointerButton::Secondary => {
                model.pan_anchor = Some(pos);
                None
            }
            PointerButton::Middle => model.press_middle(pos),
            PointerButton::Primary => model.press_primary(pos),
            _ => None,
        },
        CanvasMsg::PointerMoved { pos, shift } => {
            model.cursor = Some(BlockPos::containing(model.viewport.screen_to_grid(pos)));
            if let Some(anchor) = model.pan_anchor {
                model.viewport.pan(pos - anchor);
                model.pan_anchor = Some(pos);
                return None;
            }
            if !model.locked {
                model.drag_to(pos, shift);
            }
            None
        }
        CanvasMsg::PointerReleased { button } => {
            match button {
                PointerButton::Secondary => model.pan_anchor = None,
                PointerButton::Primary => model.finish_drag(),
                _ => {}
            }
            None
        }
        CanvasMsg::PointerLeft => {
            model.cursor = None;
            None
        }
        CanvasMsg::Scrolled(steps) => {
            model.viewport.zoom_by(steps);
            None
        }
        CanvasMsg::SetZoom(zoom) => {
            model.viewport.set_zoom(zoom);
            None
        }
        CanvasMsg::SetCurveWidth(width) => {
            if model.locked {
                return CanvasEvent::info("Unlock the track to change its width.");
            }
            let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
            if width != model.curve_width {
                model.curve_width = width;
                model.rebuild_blocks();
            }
            None
        }
        CanvasMsg::ToggleTangents => {
            model.show_tangents = !model.show_tangents;
            None
        }
        CanvasMsg::SetLocked(locked) => {
            if locked == model.locked {
                return None;
            }
            model.finish_drag();
            model.locked = locked;
            if locked {
                CanvasEvent::info("Track locked: click blocks to mark them.")
            } else {
                CanvasEvent::info("Track unlocked.")
            }
        }
        CanvasMsg::ToggleMirror => {
            if model.locked {
                return None;
            }
            let index = model.selected?;
            let pt = model.curve.point_mut(index)?;
            pt.toggle_mirrored();
            let mirrored = pt.mirrored;
            model.commit();
            CanvasEvent::info(if mirrored {
                "Tangent mirroring on"
            } else {
                "Tangent mirroring off"
            })
        }
        CanvasMsg::Undo => {
            if model.locked {
                return None;
            }
            model.finish_drag();
            match model.history.undo().cloned() {
                Some(points) => {
                    model.restore(points);
                    None
                }
                None => CanvasEvent::info("Nothing to undo"),
            }
        }
        CanvasMsg::Redo => {
            if model.locked {
                return None;
            }
            model.finish_drag();
            match model.history.redo().cloned() {
                Some(points) => {
                    model.restore(points);
                    None
                }
                None => CanvasEvent::info("Nothing to redo"),
            }
        }
        CanvasMsg::Clear => {
            if model.locked {
                return None;
            }
            model.drag = None;
            model.curve.clear();
            model.selected = None;
            model.rebuild_blocks();
            model.commit();
            CanvasEvent::info("Track cleared")
        }
        CanvasMsg::ClearHighlights => {
            model.highlighted.clear();
            None
        }
        CanvasMsg::ReplacePoints(points) => {
            if model.locked {
                return CanvasEvent::error("Unlock the track before importing.");
            }
            model.restore(points);
            model.commit();
            None
        }
    }
}

/// Render the canvas and return any messages triggered by pointer input.
pub fn view(ui: &mut egui::Ui, model: &CanvasModel) -> Vec<CanvasMsg> {
    let (response, painter) =
        ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
    let rect = response.rect;
    paint(&painter, rect, model);

    let over = response.contains_pointer();
    let mut msgs = Vec::new();

    ui.input(|input| {
        let pointer = &input.pointer;
        let Some(latest) = pointer.latest_pos() else {
            return;
        };
        let pos = (latest - rect.min).to_pos2();

        if over {
            for button in [
                PointerButton::Primary,
                PointerButton::Middle,
                PointerButton::Secondary,
            ] {
                if pointer.button_pressed(button) {
                    msgs.push(CanvasMsg::PointerPressed { button, pos });
                }
            }

            let scroll = input.raw_scroll_delta.y;
            if scroll != 0.0 {
                msgs.push(CanvasMsg::Scrolled(scroll.signum() as i32));
            }
        }

        if pointer.delta() != Vec2::ZERO && (over || model.is_interacting()) {
            msgs.push(CanvasMsg::PointerMoved {
                pos,
                shift: input.modifiers.shift,
            });
        }

        for button in [PointerButton::Primary, PointerButton::Secondary] {
            if pointer.button_released(button) {
                msgs.push(CanvasMsg::PointerReleased { button });
            }
        }
    });

    if !over && model.cursor.is_some() && !model.is_interacting() {
        msgs.push(CanvasMsg::PointerLeft);
    }

    msgs
}

fn paint(painter: &egui::Painter, rect: Rect, model: &CanvasModel) {
    let viewport = model.viewport();
    let origin = rect.min.to_vec2();
    let to_screen = |grid: Pos2| viewport.grid_to_screen(grid) + origin;

    painter.rect_filled(rect, 0.0, BACKGROUND);

    for (set, fill) in [(&model.blocks, BLOCK_FILL), (&model.highlighted, HIGHLIGHT_FILL)] {
        for block in set {
            let block_rect = viewport.block_rect(*block).translate(origin);
            if rect.intersects(block_rect) {
                painter.rect_filled(block_rect, 0.0, fill);
            }
        }
    }

    paint_grid(painter, rect, viewport);

    let curve_stroke = Stroke::new(2.0, CURVE_LINE);
    for segment in model.curve.segments() {
        let line: Vec<Pos2> = segment.samples().map(|(_, p)| to_screen(p)).collect();
        painter.add(egui::Shape::line(line, curve_stroke));
    }

    for (index, pt) in model.curve.points().iter().enumerate() {
        let center = to_screen(pt.pos);
        if model.show_tangents {
            let (in_color, out_color) = if pt.mirrored {
                (MIRRORED_HANDLE, MIRRORED_HANDLE)
            } else {
                (IN_HANDLE, OUT_HANDLE)
            };
            for (tangent, color) in [(pt.in_tangent, in_color), (pt.out_tangent, out_color)] {
                let handle = center + viewport.grid_vec_to_screen(tangent);
                painter.line_segment([center, handle], Stroke::new(2.0, color));
                painter.circle(handle, HANDLE_RADIUS, color, Stroke::new(2.0, color));
            }
        }

        if model.selected == Some(index) {
            painter.circle(center, 8.0, Color32::YELLOW, Stroke::new(2.0, Color32::WHITE));
        } else {
            painter.circle(center, 6.0, Color32::RED, Stroke::new(2.0, Color32::BLACK));
        }
    }
}

fn paint_grid(painter: &egui::Painter, rect: Rect, viewport: &Viewport) {
    if viewport.zoom() <= 3 {
        return;
    }
    let step = viewport.zoom() as f32;
    let stroke = Stroke::new(1.0, GRID_LINE);

    let mut x = rect.left() + (-viewport.offset.x * step).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }
    let mut y = rect.top() + (-viewport.offset.y * step).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn press(model: &mut CanvasModel, button: PointerButton, x: f32, y: f32) -> Option<CanvasEvent> {
        update(
            model,
            CanvasMsg::PointerPressed {
                button,
                pos: pos2(x, y),
            },
        )
    }

    fn move_to(model: &mut CanvasModel, x: f32, y: f32, shift: bool) {
        update(
            model,
            CanvasMsg::PointerMoved {
                pos: pos2(x, y),
                shift,
            },
        );
    }

    fn release(model: &mut CanvasModel, button: PointerButton) {
        update(model, CanvasMsg::PointerReleased { button });
    }

    /// Two points: (510, 510) and (510, 530) in grid space, i.e. screen
    /// (100, 100) and (100, 300) with the default view.
    fn two_point_model() -> CanvasModel {
        let mut model = CanvasModel::default();
        press(&mut model, PointerButton::Primary, 100.0, 100.0);
        press(&mut model, PointerButton::Primary, 100.0, 300.0);
        model
    }

    #[test]
    fn clicks_on_empty_space_extend_the_track() {
        let model = two_point_model();
        let points = model.curve().points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].pos, pos2(510.0, 510.0));
        assert_eq!(points[1].pos, pos2(510.0, 530.0));
        assert_eq!(model.selected(), Some(1));
        assert!(!model.blocks().is_empty());
        assert!(model.can_undo());
    }

    #[test]
    fn click_near_curve_splits_segment() {
        let mut model = two_point_model();
        // Curve midpoint is grid (510, 520), screen (100, 200).
        press(&mut model, PointerButton::Primary, 101.0, 200.0);

        assert_eq!(model.curve().len(), 3);
        assert_eq!(model.selected(), Some(1));
        let mid = model.curve().points()[1].pos;
        assert!((mid.y - 520.0).abs() < 1.0, "inserted at {mid:?}");
    }

    #[test]
    fn undo_and_redo_restore_snapshots() {
        let mut model = two_point_model();
        press(&mut model, PointerButton::Primary, 101.0, 200.0);
        assert_eq!(model.curve().len(), 3);

        update(&mut model, CanvasMsg::Undo);
        assert_eq!(model.curve().len(), 2);
        assert_eq!(model.selected(), None);

        update(&mut model, CanvasMsg::Redo);
        assert_eq!(model.curve().len(), 3);

        let event = update(&mut model, CanvasMsg::Redo).unwrap();
        assert_eq!(event.message, "Nothing to redo");
    }

    #[test]
    fn middle_click_deletes_point() {
        let mut model = two_point_model();
        let event = press(&mut model, PointerButton::Middle, 103.0, 98.0);
        assert_eq!(event.map(|e| e.message).as_deref(), Some("Point deleted"));
        assert_eq!(model.curve().len(), 1);
        assert_eq!(model.curve().points()[0].pos, pos2(510.0, 530.0));
        assert!(model.blocks().is_empty());

        // Missing a point does nothing.
        assert!(press(&mut model, PointerButton::Middle, 400.0, 400.0).is_none());
        assert_eq!(model.curve().len(), 1);
    }

    #[test]
    fn middle_click_is_ignored_during_a_drag() {
        let mut model = two_point_model();
        // Grab the second point, then middle-click the first.
        press(&mut model, PointerButton::Primary, 100.0, 300.0);
        assert!(press(&mut model, PointerButton::Middle, 100.0, 100.0).is_none());
        assert_eq!(model.curve().len(), 2);

        move_to(&mut model, 150.0, 300.0, false);
        release(&mut model, PointerButton::Primary);
        assert_eq!(model.curve().points()[0].pos, pos2(510.0, 510.0));
        assert_eq!(model.curve().points()[1].pos, pos2(515.0, 530.0));

        press(&mut model, PointerButton::Middle, 100.0, 100.0);
        assert_eq!(model.curve().len(), 1);
    }

    #[test]
    fn dragging_a_point_moves_it_and_commits_once() {
        let mut model = two_point_model();
        press(&mut model, PointerButton::Primary, 100.0, 100.0);
        assert_eq!(model.selected(), Some(0));
        assert!(model.is_interacting());

        move_to(&mut model, 150.0, 100.0, false);
        assert_eq!(model.curve().points()[0].pos, pos2(515.0, 510.0));
        // Tangents travel with the point.
        assert_eq!(model.curve().points()[0].out_tangent, vec2(20.0, 0.0));
        release(&mut model, PointerButton::Primary);
        assert!(!model.is_interacting());

        update(&mut model, CanvasMsg::Undo);
        assert_eq!(model.curve().points()[0].pos, pos2(510.0, 510.0));
    }

    #[test]
    fn shift_drag_keeps_handles_in_place() {
        let mut model = two_point_model();
        press(&mut model, PointerButton::Primary, 100.0, 100.0);
        move_to(&mut model, 150.0, 100.0, true);

        let pt = &model.curve().points()[0];
        assert_eq!(pt.in_tangent, vec2(-25.0, 0.0));
        assert_eq!(pt.out_tangent, vec2(15.0, 0.0));
        assert_eq!(pt.out_handle(), pos2(530.0, 510.0));
    }

    #[test]
    fn dragging_out_handle_mirrors_in_handle() {
        let mut model = two_point_model();
        // Out handle of the first point: grid (530, 510), screen (300, 100).
        press(&mut model, PointerButton::Primary, 300.0, 100.0);
        move_to(&mut model, 300.0, 150.0, false);

        let pt = &model.curve().points()[0];
        assert_eq!(pt.out_tangent, vec2(20.0, 5.0));
        assert_eq!(pt.in_tangent, vec2(-20.0, -5.0));
    }

    #[test]
    fn hidden_tangents_are_not_grabbed() {
        let mut model = two_point_model();
        update(&mut model, CanvasMsg::ToggleTangents);
        assert!(!model.show_tangents());

        // Far from the curve, so this extends the track instead of grabbing.
        press(&mut model, PointerButton::Primary, 300.0, 100.0);
        assert!(!model.is_interacting());
        assert_eq!(model.curve().len(), 3);
    }

    #[test]
    fn click_without_drag_records_nothing() {
        let mut model = two_point_model();
        update(&mut model, CanvasMsg::Undo);
        assert!(model.can_redo());

        press(&mut model, PointerButton::Primary, 100.0, 100.0);
        release(&mut model, PointerButton::Primary);
        // Redo is still possible because no snapshot was recorded.
        assert!(model.can_redo());
    }

    #[test]
    fn toggle_mirror_needs_a_selection() {
        let mut model = CanvasModel::default();
        assert!(update(&mut model, CanvasMsg::ToggleMirror).is_none());

        let mut model = two_point_model();
        let event = update(&mut model, CanvasMsg::ToggleMirror).unwrap();
        assert_eq!(event.message, "Tangent mirroring off");
        assert!(!model.curve().points()[1].mirrored);
    }

    #[test]
    fn locked_canvas_toggles_highlights_only() {
        let mut model = two_point_model();
        update(&mut model, CanvasMsg::SetLocked(true));

        // Screen (105, 105) is inside block (510, 510), which the track covers.
        press(&mut model, PointerButton::Primary, 105.0, 105.0);
        assert!(model.highlighted().contains(&BlockPos::new(510, 510)));
        assert_eq!(model.curve().len(), 2);
        assert!(!model.is_interacting());

        press(&mut model, PointerButton::Primary, 105.0, 105.0);
        assert!(model.highlighted().is_empty());

        // Uncovered blocks cannot be marked.
        press(&mut model, PointerButton::Primary, 5.0, 5.0);
        assert!(model.highlighted().is_empty());

        press(&mut model, PointerButton::Middle, 100.0, 100.0);
        assert_eq!(model.curve().len(), 2);
        update(&mut model, CanvasMsg::Clear);
        assert_eq!(model.curve().len(), 2);
        assert!(!model.can_undo());
    }

    #[test]
    fn locked_canvas_rejects_width_changes() {
        let mut model = two_point_model();
        update(&mut model, CanvasMsg::SetLocked(true));
        let event = update(&mut model, CanvasMsg::SetCurveWidth(9)).unwrap();
        assert!(!event.is_error);
        assert_eq!(model.curve_width(), DEFAULT_WIDTH);

        update(&mut model, CanvasMsg::SetLocked(false));
        update(&mut model, CanvasMsg::SetCurveWidth(99));
        assert_eq!(model.curve_width(), MAX_WIDTH);
    }

    #[test]
    fn clearing_drops_stale_highlights() {
        let mut model = two_point_model();
        update(&mut model, CanvasMsg::SetLocked(true));
        press(&mut model, PointerButton::Primary, 105.0, 105.0);
        assert_eq!(model.highlighted().len(), 1);

        update(&mut model, CanvasMsg::SetLocked(false));
        update(&mut model, CanvasMsg::Clear);
        assert!(model.curve().is_empty());
        assert!(model.highlighted().is_empty());

        update(&mut model, CanvasMsg::Undo);
        assert_eq!(model.curve().len(), 2);
    }

    #[test]
    fn right_drag_pans_even_when_locked() {
        let mut model = CanvasModel::default();
        update(&mut model, CanvasMsg::SetLocked(true));
        press(&mut model, PointerButton::Secondary, 0.0, 0.0);
        move_to(&mut model, 20.0, 10.0, false);
        release(&mut model, PointerButton::Secondary);
        move_to(&mut model, 90.0, 90.0, false);

        assert_eq!(model.viewport().offset, vec2(498.0, 499.0));
        assert!(!model.is_interacting());
    }

    #[test]
    fn wheel_and_slider_zoom_are_clamped() {
        let mut model = CanvasModel::default();
        update(&mut model, CanvasMsg::Scrolled(1));
        assert_eq!(model.viewport().zoom(), 11);
        update(&mut model, CanvasMsg::SetZoom(1));
        assert_eq!(model.viewport().zoom(), 2);
    }

    #[test]
    fn cursor_tracks_block_under_pointer() {
        let mut model = CanvasModel::default();
        move_to(&mut model, 25.0, 9.0, false);
        assert_eq!(model.cursor(), Some(BlockPos::new(502, 500)));
        update(&mut model, CanvasMsg::PointerLeft);
        assert_eq!(model.cursor(), None);
    }

    #[test]
    fn replacing_points_is_undoable() {
        let mut model = two_point_model();
        let imported = vec![
            ControlPoint::new(pos2(0.0, 0.0)),
            ControlPoint::new(pos2(10.0, 0.0)),
            ControlPoint::new(pos2(20.0, 0.0)),
        ];
        assert!(update(&mut model, CanvasMsg::ReplacePoints(imported)).is_none());
        assert_eq!(model.curve().len(), 3);

        update(&mut model, CanvasMsg::Undo);
        assert_eq!(model.curve().len(), 2);

        update(&mut model, CanvasMsg::SetLocked(true));
        let event = update(&mut model, CanvasMsg::ReplacePoints(Vec::new())).unwrap();
        assert!(event.is_error);
    }
}
