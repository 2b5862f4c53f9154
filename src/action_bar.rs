use egui::{vec2, Align, Layout, Ui};

use crate::state::EditorState;
use crate::theme::{self, WidthClass};
use crate::ui_controls;

#[derive(Default)]
pub struct ActionBarOutput {
    pub undo: bool,
    pub redo: bool,
    pub clear: bool,
    pub copy: bool,
    pub save: bool,
    pub open: bool,
}

pub fn should_show_shortcut_label(width_class: WidthClass, available_width: f32) -> bool {
    match width_class {
        WidthClass::Compact => available_width >= 400.0,
        WidthClass::Regular | WidthClass::Wide => true,
    }
}

pub fn show_action_bar(
    ui: &mut Ui,
    state: &EditorState,
    status: Option<&str>,
    width_class: WidthClass,
) -> ActionBarOutput {
    let theme = theme::studio_dark_theme();
    let action_h = theme.metrics.action_height;
    let button_gap = theme.metrics.space_3 + 2.0;
    let group_gap = theme.metrics.space_4 + 4.0;
    let small_w = if width_class == WidthClass::Compact {
        78.0
    } else {
        92.0
    };
    let wide_w = if width_class == WidthClass::Compact {
        96.0
    } else {
        108.0
    };
    let left_group_w = small_w * 3.0 + button_gap * 2.0;
    let right_group_w = wide_w * 3.0 + button_gap * 2.0;
    let shortcut_visible = should_show_shortcut_label(
        width_class,
        ui.available_width() - left_group_w - right_group_w,
    );

    let mut out = ActionBarOutput::default();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing = vec2(button_gap, 0.0);

        let undo_button = ui.add_enabled_ui(state.can_undo(), |ui| {
            ui_controls::ghost_button(ui, &theme, "↩ Undo", vec2(small_w, action_h))
        });
        if undo_button.inner.clicked() {
            out.undo = true;
        }

        let redo_button = ui.add_enabled_ui(state.can_redo(), |ui| {
            ui_controls::ghost_button(ui, &theme, "↪ Redo", vec2(small_w, action_h))
        });
        if redo_button.inner.clicked() {
            out.redo = true;
        }

        let clear_button = ui.add_enabled_ui(!state.elements.is_empty(), |ui| {
            ui_controls::ghost_button(ui, &theme, "Clear", vec2(small_w, action_h))
        });
        if clear_button.inner.clicked() {
            out.clear = true;
        }

        ui.add_space(group_gap);

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.add_space(theme.metrics.space_2);

            if shortcut_visible {
                ui_controls::keycap(ui, &theme, "S");
                ui.add_space(theme.metrics.space_2);
                ui_controls::keycap(ui, &theme, "⌘");
                ui.add_space(theme.metrics.space_3);
                ui_controls::vertical_divider(ui, &theme, 16.0);
                ui.add_space(theme.metrics.space_3);
            }

            let save_button = ui.add_enabled_ui(state.image.is_some(), |ui| {
                ui_controls::primary_button(ui, &theme, "Save PNG", vec2(wide_w, action_h))
            });
            let mut save_response = save_button.inner;
            if !shortcut_visible {
                save_response = save_response.on_hover_text("⌘S");
            }
            if save_response.clicked() {
                out.save = true;
            }

            ui.add_space(button_gap);

            let copy_button = ui.add_enabled_ui(state.image.is_some(), |ui| {
                ui_controls::ghost_button(ui, &theme, "Copy", vec2(wide_w, action_h))
            });
            if copy_button.inner.clicked() {
                out.copy = true;
            }

            ui.add_space(button_gap);

            if ui_controls::ghost_button(ui, &theme, "Open…", vec2(wide_w, action_h))
                .on_hover_text("⌘O, or paste with ⌘V")
                .clicked()
            {
                out.open = true;
            }

            if let Some(text) = status {
                if width_class != WidthClass::Compact {
                    ui.add_space(button_gap);
                    ui_controls::subtle_badge(ui, &theme, text);
                }
            }
        });
    });

    out
}

#[cfg(test)]
mod tests {
    use super::should_show_shortcut_label;
    use crate::theme::WidthClass;

    #[test]
    fn compact_width_hides_shortcut_label_first() {
        assert!(!should_show_shortcut_label(WidthClass::Compact, 320.0));
        assert!(should_show_shortcut_label(WidthClass::Compact, 400.0));
        assert!(should_show_shortcut_label(WidthClass::Regular, 320.0));
    }
}
