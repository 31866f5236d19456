// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Side panel with track settings, file actions and history buttons.

use eframe::egui;
use egui_phosphor::regular as icons;

use crate::models::viewport::{MAX_ZOOM, MIN_ZOOM};
use crate::ui::components::canvas::{CanvasModel, MAX_WIDTH, MIN_WIDTH};

/// Messages emitted by the control panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlPanelMsg {
    WidthChanged(u32),
    ZoomChanged(i32),
    ToggleTangents,
    ImportTrack,
    ExportTrack,
    ExportImage,
    Undo,
    Redo,
    Clear,
    LockChanged(bool),
    ClearHighlights,
}

const USAGE_HINT: &str = "Left click: add or drag points\n\
    Middle click: delete point\n\
    Right drag: pan, wheel: zoom\n\
    Shift + drag: move point, keep handles\n\
    Lock the track to mark blocks";

/// Status line summarising the covered and marked blocks.
pub fn block_summary(model: &CanvasModel) -> String {
    let marked = model.highlighted().len();
    if marked == 0 {
        format!("Blocks: {}", model.blocks().len())
    } else {
        format!("Blocks: {} ({} marked)", model.blocks().len(), marked)
    }
}

/// Render the panel and return the messages triggered this frame.
pub fn view(ui: &mut egui::Ui, model: &CanvasModel) -> Vec<ControlPanelMsg> {
    let mut msgs = Vec::new();
    let locked = model.locked();

    ui.add_space(6.0);
    ui.heading("Track");
    ui.add_space(4.0);

    let mut width = model.curve_width();
    if ui
        .add_enabled(
            !locked,
            egui::Slider::new(&mut width, MIN_WIDTH..=MAX_WIDTH).text("Width"),
        )
        .on_disabled_hover_text("Unlock the track to change its width")
        .changed()
    {
        msgs.push(ControlPanelMsg::WidthChanged(width));
    }

    let mut zoom = model.viewport().zoom();
    if ui
        .add(egui::Slider::new(&mut zoom, MIN_ZOOM..=MAX_ZOOM).text("Zoom"))
        .changed()
    {
        msgs.push(ControlPanelMsg::ZoomChanged(zoom));
    }

    let tangents_label = if model.show_tangents() {
        format!("{} Hide tangents", icons::EYE_SLASH)
    } else {
        format!("{} Show tangents", icons::EYE)
    };
    if ui.button(tangents_label).clicked() {
        msgs.push(ControlPanelMsg::ToggleTangents);
    }

    ui.separator();
    ui.label("File");
    ui.horizontal_wrapped(|ui| {
        if ui
            .add_enabled(
                !locked,
                egui::Button::new(format!("{} Import", icons::FOLDER_OPEN)),
            )
            .clicked()
        {
            msgs.push(ControlPanelMsg::ImportTrack);
        }
        if ui
            .button(format!("{} Export", icons::FLOPPY_DISK))
            .on_hover_text("Save control points as .mtrack")
            .clicked()
        {
            msgs.push(ControlPanelMsg::ExportTrack);
        }
        if ui
            .button(format!("{} Export PNG", icons::IMAGE))
            .clicked()
        {
            msgs.push(ControlPanelMsg::ExportImage);
        }
    });

    ui.separator();
    ui.label("Edit");
    ui.horizontal_wrapped(|ui| {
        if ui
            .add_enabled(
                model.can_undo(),
                egui::Button::new(format!("{} Undo", icons::ARROW_COUNTER_CLOCKWISE)),
            )
            .clicked()
        {
            msgs.push(ControlPanelMsg::Undo);
        }
        if ui
            .add_enabled(
                model.can_redo(),
                egui::Button::new(format!("{} Redo", icons::ARROW_CLOCKWISE)),
            )
            .clicked()
        {
            msgs.push(ControlPanelMsg::Redo);
        }
        if ui
            .add_enabled(
                !locked && !model.curve().is_empty(),
                egui::Button::new(format!("{} Clear", icons::TRASH)),
            )
            .clicked()
        {
            msgs.push(ControlPanelMsg::Clear);
        }
    });

    ui.separator();
    let mut lock = locked;
    if ui
        .checkbox(&mut lock, format!("{} Lock track", icons::LOCK))
        .on_hover_text("While locked, clicking a block marks it")
        .changed()
    {
        msgs.push(ControlPanelMsg::LockChanged(lock));
    }
    if ui
        .add_enabled(
            !model.highlighted().is_empty(),
            egui::Button::new(format!("{} Clear marks", icons::ERASER)),
        )
        .clicked()
    {
        msgs.push(ControlPanelMsg::ClearHighlights);
    }

    ui.separator();
    ui.label(block_summary(model));
    ui.label(format!("Control points: {}", model.curve().len()));

    ui.add_space(8.0);
    ui.label(
        egui::RichText::new(USAGE_HINT)
            .small()
            .color(egui::Color32::from_gray(110)),
    );

    msgs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::canvas::{self, CanvasMsg};
    use eframe::egui::{PointerButton, pos2};

    #[test]
    fn summary_mentions_marks_only_when_present() {
        let mut model = CanvasModel::default();
        assert_eq!(block_summary(&model), "Blocks: 0");

        for pos in [pos2(100.0, 100.0), pos2(100.0, 300.0)] {
            canvas::update(
                &mut model,
                CanvasMsg::PointerPressed {
                    button: PointerButton::Primary,
                    pos,
                },
            );
        }
        let covered = model.blocks().len();
        assert!(covered > 0);

        canvas::update(&mut model, CanvasMsg::SetLocked(true));
        canvas::update(
            &mut model,
            CanvasMsg::PointerPressed {
                button: PointerButton::Primary,
                pos: pos2(105.0, 105.0),
            },
        );
        assert_eq!(
            block_summary(&model),
            format!("Blocks: {covered} (1 marked)")
        );
    }
}
