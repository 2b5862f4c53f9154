use egui::epaint::RectShape;
use egui::{
    vec2, Align2, Color32, Context, FontId, Id, Key, Painter, Pos2, Rect, Response, Rounding,
    Sense, Shape, Stroke, Ui,
};

use crate::element::{DrawingElement, ElementKind, Point, ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH};
use crate::layout::{CanvasLayout, IMAGE_CORNER_RADIUS};
use crate::state::{EditorState, ToolPhase};
use crate::theme;
use crate::ui_controls;

/// Backdrop swatches offered by the picker, in display order.
pub const BACKGROUND_PALETTE: [[u8; 4]; 10] = [
    [0xEF, 0x44, 0x44, 0xFF],
    [0xF9, 0x73, 0x16, 0xFF],
    [0xEA, 0xB3, 0x08, 0xFF],
    [0x22, 0xC5, 0x5E, 0xFF],
    [0x3B, 0x82, 0xF6, 0xFF],
    [0x8B, 0x5C, 0xF6, 0xFF],
    [0xEC, 0x48, 0x99, 0xFF],
    [0x64, 0x74, 0x8B, 0xFF],
    [0x00, 0x00, 0x00, 0xFF],
    [0xFF, 0xFF, 0xFF, 0xFF],
];

pub fn show_canvas(ui: &mut Ui, ctx: &Context, state: &mut EditorState) {
    let Some(image_size) = state.image.as_ref().map(|image| image.size_vec2()) else {
        empty_canvas(ui);
        return;
    };

    let texture_id = {
        // Image presence was checked above.
        let Some(image) = state.image.as_mut() else {
            return;
        };
        image.ensure_texture(ctx);
        match image.texture.as_ref() {
            Some(texture) => texture.id(),
            None => return,
        }
    };

    let available = ui.available_size();
    let layout = CanvasLayout::fit(
        available - vec2(32.0, 32.0),
        image_size.x,
        image_size.y,
        state.background.is_some(),
    );
    state.last_layout = Some(layout);

    let (container, response) = ui.allocate_exact_size(available, Sense::click_and_drag());
    let canvas_rect = layout.canvas_rect(container);

    let painter = ui.painter_at(container);
    draw_stage(&painter, container);

    if let Some([r, g, b, a]) = state.background {
        painter.rect_filled(
            canvas_rect,
            IMAGE_CORNER_RADIUS,
            Color32::from_rgba_unmultiplied(r, g, b, a),
        );
    }

    let image_rect = Rect::from_min_size(
        canvas_rect.min + vec2(layout.offset_x, layout.offset_y),
        vec2(layout.display_width, layout.display_height),
    );
    let mut image_shape = RectShape::filled(
        image_rect,
        Rounding::same(IMAGE_CORNER_RADIUS),
        Color32::WHITE,
    );
    image_shape.fill_texture_id = texture_id;
    image_shape.uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    painter.add(Shape::Rect(image_shape));

    for element in &state.elements {
        draw_element(&painter, element, &layout, canvas_rect);
    }
    draw_drag_preview(&painter, state, &layout, canvas_rect);

    handle_pointer_interaction(state, &response, &layout, canvas_rect);

    draw_text_editor(ui, state, &layout, canvas_rect);
    draw_background_picker(ui, state, container);
}

fn empty_canvas(ui: &mut Ui) {
    let theme = theme::studio_dark_theme();
    let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 16.0, theme.palette.canvas_bg);
    painter.rect_stroke(rect, 16.0, Stroke::new(1.0, theme.palette.stroke_soft));
    painter.text(
        rect.center() - vec2(0.0, 14.0),
        Align2::CENTER_CENTER,
        "Paste a screenshot (Cmd+V)",
        FontId::proportional(19.0),
        theme.palette.text_secondary,
    );
    painter.text(
        rect.center() + vec2(0.0, 14.0),
        Align2::CENTER_CENTER,
        "or open an image file (Cmd+O)",
        FontId::proportional(14.0),
        theme.palette.text_muted,
    );
}

fn draw_stage(painter: &Painter, rect: Rect) {
    let theme = theme::studio_dark_theme();
    painter.rect_filled(rect, 0.0, theme.palette.canvas_bg);
}

fn draw_drag_preview(
    painter: &Painter,
    state: &EditorState,
    layout: &CanvasLayout,
    canvas_rect: Rect,
) {
    let ToolPhase::Dragging { tool, path } = &state.phase else {
        return;
    };
    let Some(preview) = DrawingElement::from_gesture(*tool, path) else {
        return;
    };
    // The in-progress gesture draws exactly like the committed element.
    draw_element(painter, &preview, layout, canvas_rect);
}

fn draw_element(
    painter: &Painter,
    element: &DrawingElement,
    layout: &CanvasLayout,
    canvas_rect: Rect,
) {
    let color = element.color32();
    let stroke = Stroke::new(element.stroke_width, color);
    let place = |point: Point| canvas_rect.min + layout.to_canvas(point).to_vec2();

    match &element.kind {
        ElementKind::Pen { points } => {
            if let [only] = points.as_slice() {
                painter.circle_filled(place(*only), (stroke.width * 0.5).max(1.0), color);
                return;
            }
            let screen: Vec<Pos2> = points.iter().map(|point| place(*point)).collect();
            painter.add(Shape::line(screen, stroke));
        }
        ElementKind::Rect { start, end } => {
            let a = place(*start);
            let b = place(*end);
            let rect = Rect::from_two_pos(a, b);
            painter.rect_stroke(rect, 0.0, stroke);
        }
        ElementKind::Arrow { start, end } => {
            let from = place(*start);
            let to = place(*end);
            painter.line_segment([from, to], stroke);
            let angle = (to.y - from.y).atan2(to.x - from.x);
            for sign in [-1.0_f32, 1.0] {
                let wing = Pos2::new(
                    to.x - ARROW_HEAD_LENGTH * (angle + sign * ARROW_HEAD_ANGLE).cos(),
                    to.y - ARROW_HEAD_LENGTH * (angle + sign * ARROW_HEAD_ANGLE).sin(),
                );
                painter.line_segment([to, wing], stroke);
            }
        }
        ElementKind::Text {
            anchor,
            content,
            font_size,
        } => {
            let pos = place(*anchor);
            let font = FontId::proportional(*font_size);
            // Offset passes fake the black outline the export renders.
            for offset in [
                vec2(-1.5, 0.0),
                vec2(1.5, 0.0),
                vec2(0.0, -1.5),
                vec2(0.0, 1.5),
            ] {
                painter.text(
                    pos + offset,
                    Align2::LEFT_TOP,
                    content,
                    font.clone(),
                    Color32::BLACK,
                );
            }
            painter.text(pos, Align2::LEFT_TOP, content, font, color);
        }
    }
}

fn handle_pointer_interaction(
    state: &mut EditorState,
    response: &Response,
    layout: &CanvasLayout,
    canvas_rect: Rect,
) {
    // Gestures that wander off the canvas are committed as-is.
    if state.is_dragging() {
        match response.interact_pointer_pos() {
            Some(pos) if !canvas_rect.contains(pos) => {
                state.pointer_left();
                return;
            }
            None if !response.dragged() => {
                state.pointer_left();
                return;
            }
            _ => {}
        }
    }

    let Some(pointer_pos) = response.interact_pointer_pos() else {
        return;
    };
    let image_pos = layout.to_image(pointer_pos - canvas_rect.min.to_vec2());

    if response.drag_started() && canvas_rect.contains(pointer_pos) {
        state.pointer_down(image_pos);
    }

    if response.dragged() {
        state.pointer_moved(image_pos);
    }

    if response.drag_stopped() {
        state.pointer_released();
    }

    if response.clicked() && canvas_rect.contains(pointer_pos) {
        // A tap never reports drag_started, so feed both edges here.
        state.pointer_down(image_pos);
        state.pointer_released();
    }
}

fn draw_text_editor(ui: &mut Ui, state: &mut EditorState, layout: &CanvasLayout, canvas_rect: Rect) {
    let ToolPhase::TextEditing { anchor, buffer } = &mut state.phase else {
        return;
    };
    let screen_pos = canvas_rect.min + layout.to_canvas(*anchor).to_vec2();

    let mut commit = false;
    let mut cancel = false;

    egui::Area::new(Id::new("scribble_text_edit"))
        .order(egui::Order::Foreground)
        .fixed_pos(screen_pos)
        .show(ui.ctx(), |ui| {
            let theme = theme::studio_dark_theme();
            ui_controls::popup_frame(&theme).show(ui, |ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(buffer)
                        .desired_width(220.0)
                        .hint_text("Type, Enter to place")
                        .frame(false),
                );
                response.request_focus();

                if ui.input(|input| input.key_pressed(Key::Enter)) {
                    commit = true;
                } else if ui.input(|input| input.key_pressed(Key::Escape)) {
                    cancel = true;
                } else if response.lost_focus()
                    && ui.input(|input| input.pointer.any_released())
                {
                    commit = true;
                }
            });
        });

    if commit {
        state.submit_text();
    } else if cancel {
        state.cancel_text();
    }
}

fn draw_background_picker(ui: &mut Ui, state: &mut EditorState, container: Rect) {
    if state.phase != ToolPhase::PickingBackground {
        return;
    }

    let theme = theme::studio_dark_theme();
    let mut choice: Option<Option<[u8; 4]>> = None;
    let mut cancel = false;

    egui::Area::new(Id::new("scribble_background_picker"))
        .order(egui::Order::Foreground)
        .pivot(Align2::CENTER_TOP)
        .fixed_pos(Pos2::new(container.center().x, container.top() + 24.0))
        .show(ui.ctx(), |ui| {
            ui_controls::popup_frame(&theme).show(ui, |ui| {
                ui.label(
                    egui::RichText::new("Backdrop")
                        .color(theme.palette.text_secondary)
                        .size(12.0),
                );
                ui.horizontal(|ui| {
                    for color in BACKGROUND_PALETTE {
                        let color32 = Color32::from_rgba_unmultiplied(
                            color[0], color[1], color[2], color[3],
                        );
                        let selected = state.background == Some(color);
                        if ui_controls::color_chip(ui, &theme, color32, selected).clicked() {
                            choice = Some(Some(color));
                        }
                    }
                });
                ui.horizontal(|ui| {
                    if ui_controls::ghost_button(ui, &theme, "None", vec2(64.0, 24.0)).clicked() {
                        choice = Some(None);
                    }
                    if ui_controls::ghost_button(ui, &theme, "Cancel", vec2(64.0, 24.0)).clicked() {
                        cancel = true;
                    }
                });

                if ui.input(|input| input.key_pressed(Key::Escape)) {
                    cancel = true;
                }
            });
        });

    match choice {
        Some(Some(color)) => state.choose_background(color),
        Some(None) => state.clear_background(),
        None if cancel => state.cancel_background(),
        None => {}
    }
}
