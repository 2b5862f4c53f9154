use egui::{vec2, Align, Align2, Color32, FontId, Layout, Pos2, Rect, Shape, Stroke, Ui};

use crate::element::Tool;
use crate::state::EditorState;
use crate::theme::{self, WidthClass};
use crate::ui_controls;

#[derive(Clone, Copy, Debug)]
pub struct ToolbarPlan {
    pub show_tool_chips: bool,
    pub show_keycap_hints: bool,
    pub show_tool_name: bool,
}

/// Width-dependent toolbar layout. Tool chips always stay visible; the
/// keycap hints and the active tool name drop as the window narrows.
pub fn plan_toolbar_items(width_class: WidthClass) -> ToolbarPlan {
    ToolbarPlan {
        show_tool_chips: true,
        show_keycap_hints: width_class == WidthClass::Wide,
        show_tool_name: width_class != WidthClass::Compact,
    }
}

pub fn show_toolbar(ui: &mut Ui, state: &mut EditorState, width_class: WidthClass) {
    let theme = theme::studio_dark_theme();
    let plan = plan_toolbar_items(width_class);

    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
        ui.spacing_mut().interact_size.y = theme.metrics.chip_h;
        ui.spacing_mut().button_padding.y = theme.metrics.space_1;
        ui.spacing_mut().item_spacing = vec2(theme.metrics.space_2, 0.0);

        if plan.show_tool_chips {
            tool_button(ui, state, Tool::Pen, "Pen (P)");
            tool_button(ui, state, Tool::Rectangle, "Rectangle (R)");
            tool_button(ui, state, Tool::Arrow, "Arrow (A)");
            tool_button(ui, state, Tool::Text, "Text (T)");
            tool_button(ui, state, Tool::Background, "Backdrop (B)");
        }

        if plan.show_tool_name {
            ui.add_space(theme.metrics.space_2);
            ui_controls::vertical_divider(ui, &theme, 16.0);
            ui.add_space(theme.metrics.space_2);
            ui.label(
                egui::RichText::new(tool_name(state.active_tool))
                    .color(theme.palette.text_muted)
                    .size(12.0),
            );
        }

        if plan.show_keycap_hints {
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.add_space(theme.metrics.space_2);
                for key in ["B", "T", "A", "R", "P"] {
                    ui_controls::keycap(ui, &theme, key);
                    ui.add_space(theme.metrics.space_1);
                }
                ui.label(
                    egui::RichText::new("tools")
                        .color(theme.palette.text_muted)
                        .size(11.0),
                );
            });
        }
    });
}

fn tool_name(tool: Tool) -> &'static str {
    match tool {
        Tool::Pen => "Pen",
        Tool::Rectangle => "Rectangle",
        Tool::Arrow => "Arrow",
        Tool::Text => "Text",
        Tool::Background => "Backdrop",
    }
}

fn tool_button(ui: &mut Ui, state: &mut EditorState, tool: Tool, hint: &str) {
    let theme = theme::studio_dark_theme();
    let selected = state.active_tool == tool;
    let response = ui_controls::tool_chip(ui, &theme, "", selected).on_hover_text(hint);
    draw_tool_icon(ui, response.rect, tool, selected);
    if response.clicked() {
        state.set_tool(tool);
    }
}

fn draw_tool_icon(ui: &Ui, rect: Rect, tool: Tool, selected: bool) {
    let theme = theme::studio_dark_theme();
    let color = if selected {
        theme.palette.text_primary
    } else {
        theme.palette.text_secondary
    };
    let stroke = Stroke::new(1.65, color);
    let painter = ui.painter();
    let icon_rect = rect.shrink2(vec2(8.0, 5.0));

    match tool {
        Tool::Pen => {
            // Nib plus a short trailing curve.
            let tip = Pos2::new(icon_rect.left() + 1.5, icon_rect.bottom() - 1.5);
            let shaft = Pos2::new(icon_rect.right() - 3.0, icon_rect.top() + 2.0);
            painter.line_segment([tip, shaft], stroke);
            painter.line_segment(
                [
                    Pos2::new(shaft.x - 3.2, shaft.y - 1.2),
                    Pos2::new(shaft.x + 1.2, shaft.y + 3.2),
                ],
                stroke,
            );
            painter.circle_filled(tip, 1.4, color);
        }
        Tool::Rectangle => {
            let r = icon_rect.shrink2(vec2(2.0, 3.0));
            painter.rect_stroke(r, 2.5, stroke);
        }
        Tool::Arrow => {
            let y = icon_rect.center().y + 0.5;
            let start = Pos2::new(icon_rect.left() + 2.0, y + 4.0);
            let tip = Pos2::new(icon_rect.right() - 2.0, y - 4.0);
            painter.line_segment([start, tip], stroke);
            painter.add(Shape::convex_polygon(
                vec![
                    tip,
                    Pos2::new(tip.x - 6.5, tip.y - 0.5),
                    Pos2::new(tip.x - 1.5, tip.y + 5.5),
                ],
                color,
                Stroke::NONE,
            ));
        }
        Tool::Text => {
            painter.text(
                icon_rect.center(),
                Align2::CENTER_CENTER,
                "T",
                FontId::proportional(14.5),
                color,
            );
        }
        Tool::Background => {
            // Swatch card behind the canvas card.
            let back = Rect::from_min_size(
                icon_rect.left_top() + vec2(3.5, 0.0),
                vec2(icon_rect.width() - 3.5, icon_rect.height() - 3.5),
            );
            let front = Rect::from_min_size(
                icon_rect.left_top() + vec2(0.0, 3.5),
                vec2(icon_rect.width() - 3.5, icon_rect.height() - 3.5),
            );
            painter.rect_stroke(back, 2.0, Stroke::new(1.2, color.gamma_multiply(0.6)));
            painter.rect_filled(
                front,
                2.0,
                Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 56),
            );
            painter.rect_stroke(front, 2.0, stroke);
        }
    }
}
