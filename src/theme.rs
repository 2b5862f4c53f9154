use egui::epaint::Shadow;
use egui::{
    vec2, Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals,
};

/// Responsive bucket derived from the window width; the toolbar and action
/// bar drop labels and hints as the window narrows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidthClass {
    Compact,
    Regular,
    Wide,
}

#[derive(Clone, Debug)]
pub struct EditorTheme {
    pub palette: Palette,
    pub metrics: Metrics,
    pub breakpoints: Breakpoints,
}

#[derive(Clone, Debug)]
pub struct Palette {
    pub app_bg: Color32,
    pub panel_bg: Color32,
    pub card_bg: Color32,
    pub canvas_bg: Color32,
    pub stroke_soft: Color32,
    pub stroke_strong: Color32,
    pub accent: Color32,
    pub accent_soft: Color32,
    pub focus_ring: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub shadow: Color32,
}

#[derive(Clone, Debug)]
pub struct Metrics {
    pub space_1: f32,
    pub space_2: f32,
    pub space_3: f32,
    pub space_4: f32,
    pub panel_padding_x: f32,
    pub panel_padding_y: f32,
    pub chip_h: f32,
    pub chip_w: f32,
    pub action_height: f32,
    pub action_bar_height: f32,
    pub panel_rounding: f32,
    pub chip_rounding: f32,
    pub button_rounding: f32,
    pub toolbar_icon_size: f32,
}

#[derive(Clone, Debug)]
pub struct Breakpoints {
    pub compact_max: f32,
    pub regular_max: f32,
}

impl EditorTheme {
    pub fn width_class(&self, width: f32) -> WidthClass {
        width_class(width, &self.breakpoints)
    }
}

pub fn width_class(width: f32, breakpoints: &Breakpoints) -> WidthClass {
    if width <= breakpoints.compact_max {
        WidthClass::Compact
    } else if width <= breakpoints.regular_max {
        WidthClass::Regular
    } else {
        WidthClass::Wide
    }
}

pub fn studio_dark_theme() -> EditorTheme {
    EditorTheme {
        palette: Palette {
            app_bg: Color32::from_rgb(0x14, 0x15, 0x19),
            panel_bg: Color32::from_rgb(0x1A, 0x1B, 0x20),
            card_bg: Color32::from_rgb(0x22, 0x24, 0x2B),
            canvas_bg: Color32::from_rgb(0x0F, 0x10, 0x15),
            stroke_soft: Color32::from_rgba_unmultiplied(255, 255, 255, 24),
            stroke_strong: Color32::from_rgba_unmultiplied(255, 255, 255, 52),
            accent: Color32::from_rgb(0xEF, 0x44, 0x44),
            accent_soft: Color32::from_rgba_unmultiplied(0xEF, 0x44, 0x44, 64),
            focus_ring: Color32::from_rgba_unmultiplied(0xF8, 0x71, 0x71, 200),
            text_primary: Color32::from_rgb(0xF4, 0xF6, 0xFB),
            text_secondary: Color32::from_rgb(0xB0, 0xB7, 0xC6),
            text_muted: Color32::from_rgb(0x7E, 0x86, 0x98),
            shadow: Color32::from_rgba_unmultiplied(0, 0, 0, 96),
        },
        metrics: Metrics {
            space_1: 4.0,
            space_2: 8.0,
            space_3: 12.0,
            space_4: 16.0,
            panel_padding_x: 12.0,
            panel_padding_y: 8.0,
            chip_h: 28.0,
            chip_w: 40.0,
            action_height: 28.0,
            action_bar_height: 48.0,
            panel_rounding: 10.0,
            chip_rounding: 8.0,
            button_rounding: 8.0,
            toolbar_icon_size: 18.0,
        },
        breakpoints: Breakpoints {
            compact_max: 720.0,
            regular_max: 1080.0,
        },
    }
}

pub fn apply_theme(ctx: &Context, theme: &EditorTheme) {
    let mut style: Style = (*ctx.style()).clone();
    let palette = &theme.palette;
    let metrics = &theme.metrics;

    style.spacing.item_spacing = vec2(metrics.space_2, metrics.space_2);
    style.spacing.button_padding = vec2(metrics.space_3, metrics.space_2);
    style.spacing.menu_margin = egui::Margin::symmetric(metrics.space_2, metrics.space_2);
    style.spacing.window_margin = egui::Margin::symmetric(metrics.space_3, metrics.space_3);

    style.visuals = Visuals::dark();
    style.visuals.override_text_color = Some(palette.text_primary);
    style.visuals.panel_fill = palette.panel_bg;
    style.visuals.window_fill = palette.panel_bg;
    style.visuals.faint_bg_color = palette.panel_bg;
    style.visuals.extreme_bg_color = palette.app_bg;
    style.visuals.window_rounding = Rounding::same(metrics.panel_rounding);

    style.visuals.widgets.noninteractive.bg_fill = palette.panel_bg;
    style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_secondary);
    style.visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, palette.stroke_soft);

    style.visuals.widgets.inactive.bg_fill = palette.card_bg;
    style.visuals.widgets.inactive.weak_bg_fill = palette.card_bg;
    style.visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, palette.stroke_soft);
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, palette.text_secondary);

    style.visuals.widgets.hovered.bg_fill = palette.card_bg;
    style.visuals.widgets.hovered.weak_bg_fill = palette.card_bg;
    style.visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, palette.stroke_strong);
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, palette.text_primary);

    style.visuals.widgets.active.bg_fill = palette.accent_soft;
    style.visuals.widgets.active.bg_stroke = Stroke::new(1.0, palette.accent);
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, palette.text_primary);

    style.visuals.widgets.open.bg_fill = palette.card_bg;
    style.visuals.widgets.open.bg_stroke = Stroke::new(1.0, palette.stroke_strong);
    style.visuals.widgets.open.fg_stroke = Stroke::new(1.0, palette.text_primary);

    style.visuals.selection.bg_fill = palette.accent_soft;
    style.visuals.selection.stroke = Stroke::new(1.0, palette.accent);
    style.visuals.popup_shadow = Shadow {
        offset: vec2(0.0, 8.0),
        blur: 20.0,
        spread: 0.0,
        color: palette.shadow,
    };
    style.visuals.window_shadow = Shadow {
        offset: vec2(0.0, 12.0),
        blur: 26.0,
        spread: 0.0,
        color: palette.shadow,
    };

    for widget in [
        &mut style.visuals.widgets.noninteractive,
        &mut style.visuals.widgets.inactive,
        &mut style.visuals.widgets.hovered,
        &mut style.visuals.widgets.active,
        &mut style.visuals.widgets.open,
    ] {
        widget.rounding = Rounding::same(metrics.button_rounding);
    }

    style.text_styles.insert(
        TextStyle::Heading,
        FontId::new(28.0, FontFamily::Proportional),
    );
    style
        .text_styles
        .insert(TextStyle::Body, FontId::new(15.0, FontFamily::Proportional));
    style.text_styles.insert(
        TextStyle::Button,
        FontId::new(14.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        TextStyle::Small,
        FontId::new(12.0, FontFamily::Proportional),
    );

    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::{width_class, Breakpoints, WidthClass};

    #[test]
    fn width_class_boundaries_are_stable() {
        let breakpoints = Breakpoints {
            compact_max: 720.0,
            regular_max: 1080.0,
        };

        assert_eq!(width_class(600.0, &breakpoints), WidthClass::Compact);
        assert_eq!(width_class(720.0, &breakpoints), WidthClass::Compact);
        assert_eq!(width_class(721.0, &breakpoints), WidthClass::Regular);
        assert_eq!(width_class(1080.0, &breakpoints), WidthClass::Regular);
        assert_eq!(width_class(1081.0, &breakpoints), WidthClass::Wide);
    }
}
