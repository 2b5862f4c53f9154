use egui::{vec2, Color32, Frame, Margin, RichText, Rounding, Sense, Stroke, Ui, Vec2};

use crate::theme::EditorTheme;

pub fn toolbar_frame(theme: &EditorTheme) -> Frame {
    Frame::none()
        .fill(theme.palette.panel_bg)
        .rounding(Rounding::ZERO)
        .inner_margin(Margin::symmetric(
            theme.metrics.panel_padding_x,
            theme.metrics.panel_padding_y,
        ))
}

pub fn action_bar_frame(theme: &EditorTheme) -> Frame {
    let vertical_padding = ((theme.metrics.action_bar_height - theme.metrics.action_height) * 0.5)
        .round()
        .max(theme.metrics.space_1);

    Frame::none()
        .fill(theme.palette.panel_bg)
        .rounding(Rounding::ZERO)
        .inner_margin(Margin::symmetric(
            theme.metrics.panel_padding_x,
            vertical_padding,
        ))
}

pub fn popup_frame(theme: &EditorTheme) -> Frame {
    Frame::none()
        .fill(theme.palette.card_bg)
        .rounding(Rounding::same(theme.metrics.panel_rounding))
        .stroke(Stroke::new(1.0, theme.palette.stroke_strong))
        .inner_margin(Margin::symmetric(
            theme.metrics.space_3,
            theme.metrics.space_3,
        ))
}

pub fn tool_chip(ui: &mut Ui, theme: &EditorTheme, label: &str, selected: bool) -> egui::Response {
    let mut button =
        egui::Button::new(RichText::new(label).size(theme.metrics.toolbar_icon_size))
            .min_size(vec2(theme.metrics.chip_w, theme.metrics.chip_h))
            .rounding(Rounding::same(theme.metrics.chip_rounding));

    if selected {
        button = button
            .fill(theme.palette.accent_soft)
            .stroke(Stroke::new(1.0, theme.palette.focus_ring));
    } else {
        button = button.fill(theme.palette.card_bg);
    }

    ui.add(button)
}

pub fn color_chip(
    ui: &mut Ui,
    theme: &EditorTheme,
    color: Color32,
    selected: bool,
) -> egui::Response {
    let mut button = egui::Button::new("")
        .min_size(vec2(24.0, 24.0))
        .fill(color)
        .rounding(Rounding::same(12.0));

    if selected {
        button = button.stroke(Stroke::new(2.0, theme.palette.focus_ring));
    } else {
        button = button.stroke(Stroke::new(1.0, theme.palette.stroke_soft));
    }

    ui.add(button)
}

pub fn primary_button(
    ui: &mut Ui,
    theme: &EditorTheme,
    label: &str,
    min_size: Vec2,
) -> egui::Response {
    ui.add(
        egui::Button::new(
            RichText::new(label)
                .strong()
                .color(theme.palette.text_primary),
        )
        .min_size(min_size)
        .fill(theme.palette.accent_soft)
        .stroke(Stroke::new(1.0, theme.palette.accent))
        .rounding(Rounding::same(theme.metrics.button_rounding)),
    )
}

pub fn ghost_button(
    ui: &mut Ui,
    theme: &EditorTheme,
    label: &str,
    min_size: Vec2,
) -> egui::Response {
    ui.add(
        egui::Button::new(RichText::new(label).color(theme.palette.text_secondary))
            .min_size(min_size)
            .fill(theme.palette.card_bg)
            .stroke(Stroke::new(1.0, theme.palette.stroke_soft))
            .rounding(Rounding::same(theme.metrics.button_rounding)),
    )
}

pub fn subtle_badge(ui: &mut Ui, theme: &EditorTheme, text: &str) {
    let label = RichText::new(text)
        .size(12.0)
        .color(theme.palette.text_primary)
        .strong();
    Frame::none()
        .fill(Color32::from_rgba_unmultiplied(
            theme.palette.accent.r(),
            theme.palette.accent.g(),
            theme.palette.accent.b(),
            36,
        ))
        .rounding(Rounding::same(10.0))
        .stroke(Stroke::new(1.0, theme.palette.accent_soft))
        .inner_margin(Margin::symmetric(8.0, 4.0))
        .show(ui, |ui| {
            ui.label(label);
        });
}

pub fn keycap(ui: &mut Ui, theme: &EditorTheme, label: &str) {
    Frame::none()
        .fill(Color32::from_rgba_unmultiplied(255, 255, 255, 16))
        .stroke(Stroke::new(
            1.0,
            Color32::from_rgba_unmultiplied(255, 255, 255, 38),
        ))
        .rounding(Rounding::same(5.0))
        .inner_margin(Margin::symmetric(6.0, 2.0))
        .show(ui, |ui| {
            ui.label(
                RichText::new(label)
                    .size(11.0)
                    .strong()
                    .color(theme.palette.text_secondary),
            );
        });
}

pub fn vertical_divider(ui: &mut Ui, theme: &EditorTheme, height: f32) {
    let (rect, _) = ui.allocate_exact_size(vec2(1.0, height), Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        Stroke::new(1.0, theme.palette.stroke_soft),
    );
}
