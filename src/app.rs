use anyhow::{Context as _, Result};
use chrono::Local;
use eframe::egui::{self, Context as EguiContext, Key, TopBottomPanel};
use eframe::{App, Frame};

use crate::action_bar;
use crate::canvas;
use crate::clipboard;
use crate::element::Tool;
use crate::layout::CanvasLayout;
use crate::render;
use crate::state::EditorState;
use crate::theme;
use crate::toolbar;
use crate::ui_controls;

const STATUS_SECONDS: f64 = 2.0;

pub struct ScribbleApp {
    pub state: EditorState,
    theme: theme::EditorTheme,
    status: Option<(String, f64)>,
}

impl ScribbleApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme = theme::studio_dark_theme();
        theme::apply_theme(&cc.egui_ctx, &theme);

        Self {
            state: EditorState::default(),
            theme,
            status: None,
        }
    }

    fn set_status(&mut self, ctx: &EguiContext, text: impl Into<String>) {
        let until = ctx.input(|input| input.time) + STATUS_SECONDS;
        self.status = Some((text.into(), until));
    }

    fn active_status(&self, ctx: &EguiContext) -> Option<&str> {
        let (text, until) = self.status.as_ref()?;
        let now = ctx.input(|input| input.time);
        (now <= *until).then_some(text.as_str())
    }

    fn handle_shortcuts(&mut self, ctx: &EguiContext) {
        if self.state.is_text_editing() {
            return;
        }

        let cmd = ctx.input(|input| input.modifiers.command || input.modifiers.ctrl);
        let shift = ctx.input(|input| input.modifiers.shift);

        if ctx.input(|input| input.key_pressed(Key::Escape)) {
            self.state.cancel_background();
        }

        if !cmd {
            if ctx.input(|input| input.key_pressed(Key::P)) {
                self.state.set_tool(Tool::Pen);
            }
            if ctx.input(|input| input.key_pressed(Key::R)) {
                self.state.set_tool(Tool::Rectangle);
            }
            if ctx.input(|input| input.key_pressed(Key::A)) {
                self.state.set_tool(Tool::Arrow);
            }
            if ctx.input(|input| input.key_pressed(Key::T)) {
                self.state.set_tool(Tool::Text);
            }
            if ctx.input(|input| input.key_pressed(Key::B)) {
                self.state.set_tool(Tool::Background);
            }
            return;
        }

        if ctx.input(|input| input.key_pressed(Key::Z)) {
            if shift {
                self.state.redo();
            } else {
                self.state.undo();
            }
        }

        if ctx.input(|input| input.key_pressed(Key::Y)) {
            self.state.redo();
        }

        if ctx.input(|input| input.key_pressed(Key::C)) {
            self.copy_to_clipboard(ctx);
        }

        if ctx.input(|input| input.key_pressed(Key::S)) {
            self.save_to_file(ctx);
        }

        if ctx.input(|input| input.key_pressed(Key::V)) {
            self.paste_image(ctx);
        }

        if ctx.input(|input| input.key_pressed(Key::O)) {
            self.open_image(ctx);
        }
    }

    fn paste_image(&mut self, ctx: &EguiContext) {
        match clipboard::read_image() {
            Ok(Some(image)) => {
                self.state.install_image(image);
                self.set_status(ctx, "Image pasted");
            }
            Ok(None) => {}
            Err(err) => {
                log::error!("paste failed: {err:#}");
                self.set_status(ctx, "Cannot paste image");
            }
        }
    }

    fn open_image(&mut self, ctx: &EguiContext) {
        let file = rfd::FileDialog::new()
            .set_title("Open image")
            .add_filter("Images", &["png", "jpg", "jpeg", "webp", "bmp"])
            .pick_file();

        let Some(path) = file else {
            return;
        };

        match image::open(&path) {
            Ok(image) => {
                self.state.install_image(image);
            }
            Err(err) => {
                log::error!("cannot decode {}: {err:#}", path.display());
                self.set_status(ctx, "Cannot decode that file");
            }
        }
    }

    /// Full-resolution render of the current canvas.
    fn render_output(&self) -> Result<Vec<u8>> {
        let image = self
            .state
            .image
            .as_ref()
            .context("no image loaded")?;
        let size = image.size_vec2();

        let layout = self
            .state
            .last_layout
            .unwrap_or_else(|| CanvasLayout::fit(size, size.x, size.y, self.state.background.is_some()));
        let scale = size.x / layout.display_width.max(1.0);

        let pixmap = render::compose(
            &image.dynamic,
            &layout,
            self.state.background,
            &self.state.elements,
            scale,
        )?;
        render::encode_png(&pixmap)
    }

    fn copy_to_clipboard(&mut self, ctx: &EguiContext) {
        if self.state.image.is_none() {
            return;
        }
        match self.render_output().and_then(|png| clipboard::write_png(&png)) {
            Ok(()) => self.set_status(ctx, "Copied to clipboard"),
            Err(err) => {
                log::error!("copy failed: {err:#}");
                self.set_status(ctx, "Copy failed");
            }
        }
    }

    fn save_to_file(&mut self, ctx: &EguiContext) {
        if self.state.image.is_none() {
            return;
        }

        let default_name = format!("annotated-{}.png", Local::now().format("%Y-%m-%d-%H%M%S"));
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save annotated image")
            .set_file_name(&default_name)
            .add_filter("PNG", &["png"]);
        if let Some(dir) = self.state.settings.last_export_dir.as_ref() {
            dialog = dialog.set_directory(dir);
        }

        let Some(path) = dialog.save_file() else {
            return;
        };

        let result = self
            .render_output()
            .and_then(|png| std::fs::write(&path, png).context("cannot write file"));
        match result {
            Ok(()) => {
                if let Some(dir) = path.parent() {
                    self.state.settings.last_export_dir = Some(dir.to_path_buf());
                    if let Err(err) = self.state.settings.save() {
                        log::warn!("settings not saved: {err:#}");
                    }
                }
                self.set_status(ctx, "Saved");
            }
            Err(err) => {
                log::error!("save to {} failed: {err:#}", path.display());
                self.set_status(ctx, "Save failed");
            }
        }
    }
}

impl App for ScribbleApp {
    fn update(&mut self, ctx: &EguiContext, _frame: &mut Frame) {
        self.handle_shortcuts(ctx);

        TopBottomPanel::top("toolbar")
            .exact_height(44.0)
            .frame(ui_controls::toolbar_frame(&self.theme))
            .show(ctx, |ui| {
                let width_class = self.theme.width_class(ui.available_width());
                toolbar::show_toolbar(ui, &mut self.state, width_class);
            });

        let status = self.active_status(ctx).map(str::to_owned);
        let action_output = TopBottomPanel::bottom("action_bar")
            .exact_height(self.theme.metrics.action_bar_height)
            .frame(ui_controls::action_bar_frame(&self.theme))
            .show(ctx, |ui| {
                let width_class = self.theme.width_class(ui.available_width());
                action_bar::show_action_bar(ui, &self.state, status.as_deref(), width_class)
            })
            .inner;

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.palette.app_bg)
                    .inner_margin(egui::Margin::symmetric(
                        self.theme.metrics.panel_padding_x,
                        self.theme.metrics.panel_padding_y,
                    )),
            )
            .show(ctx, |ui| {
                canvas::show_canvas(ui, ctx, &mut self.state);
            });

        if action_output.undo {
            self.state.undo();
        }
        if action_output.redo {
            self.state.redo();
        }
        if action_output.clear {
            self.state.clear_elements();
        }
        if action_output.copy {
            self.copy_to_clipboard(ctx);
        }
        if action_output.save {
            self.save_to_file(ctx);
        }
        if action_output.open {
            self.open_image(ctx);
        }
    }
}
