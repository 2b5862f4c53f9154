use std::path::PathBuf;

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use egui::{ColorImage, Context as EguiContext, TextureHandle, TextureOptions, Vec2};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::element::{DrawingElement, Point, Tool};
use crate::history::UndoHistory;
use crate::layout::CanvasLayout;

/// Full document state captured per history snapshot. Always a structural
/// copy, never an alias of the live vectors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub elements: Vec<DrawingElement>,
    pub background: Option<[u8; 4]>,
}

/// Input state machine for the active gesture.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolPhase {
    Idle,
    Dragging { tool: Tool, path: Vec<Point> },
    TextEditing { anchor: Point, buffer: String },
    PickingBackground,
}

pub struct EditorImage {
    pub dynamic: DynamicImage,
    pub texture: Option<TextureHandle>,
}

impl EditorImage {
    pub fn size_vec2(&self) -> Vec2 {
        Vec2::new(self.dynamic.width() as f32, self.dynamic.height() as f32)
    }

    pub fn ensure_texture(&mut self, ctx: &EguiContext) {
        if self.texture.is_some() {
            return;
        }
        let rgba = self.dynamic.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        self.texture = Some(ctx.load_texture("source_image", color, TextureOptions::LINEAR));
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserSettings {
    pub last_export_dir: Option<PathBuf>,
    pub last_background: Option<[u8; 4]>,
}

pub struct EditorState {
    pub image: Option<EditorImage>,
    pub elements: Vec<DrawingElement>,
    pub background: Option<[u8; 4]>,
    pub history: UndoHistory<Document>,
    pub active_tool: Tool,
    pub phase: ToolPhase,
    /// Layout of the most recent paint, kept for export scaling.
    pub last_layout: Option<CanvasLayout>,
    pub settings: UserSettings,
}

impl Default for EditorState {
    fn default() -> Self {
        let settings = Self::stored_settings();
        Self {
            image: None,
            elements: Vec::new(),
            background: None,
            history: UndoHistory::new(Document::default()),
            active_tool: Tool::Pen,
            phase: ToolPhase::Idle,
            last_layout: None,
            settings,
        }
    }
}

impl EditorState {
    #[cfg(not(test))]
    fn stored_settings() -> UserSettings {
        UserSettings::load().unwrap_or_else(|err| {
            log::warn!("settings not loaded: {err:#}");
            UserSettings::default()
        })
    }

    // Tests never touch the on-disk settings file.
    #[cfg(test)]
    fn stored_settings() -> UserSettings {
        UserSettings::default()
    }

    fn persist_settings(&self) {
        #[cfg(not(test))]
        if let Err(err) = self.settings.save() {
            log::warn!("settings not saved: {err:#}");
        }
    }

    pub fn document(&self) -> Document {
        Document {
            elements: self.elements.clone(),
            background: self.background,
        }
    }

    fn restore(&mut self, document: Document) {
        self.elements = document.elements;
        self.background = document.background;
        self.phase = ToolPhase::Idle;
    }

    fn commit(&mut self) {
        self.history.push_snapshot(self.document());
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) {
        if let Some(document) = self.history.undo() {
            self.restore(document);
        }
    }

    pub fn redo(&mut self) {
        if let Some(document) = self.history.redo() {
            self.restore(document);
        }
    }

    /// Atomic replace: the previous document and its history are discarded
    /// wholesale and the history is reseeded with the empty canvas.
    pub fn install_image(&mut self, image: DynamicImage) {
        self.image = Some(EditorImage {
            dynamic: image,
            texture: None,
        });
        self.elements.clear();
        self.background = None;
        self.phase = ToolPhase::Idle;
        self.last_layout = None;
        self.history.clear_with(Document::default());
    }

    pub fn close_image(&mut self) {
        self.image = None;
        self.elements.clear();
        self.background = None;
        self.phase = ToolPhase::Idle;
        self.last_layout = None;
        self.history.clear_with(Document::default());
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if self.is_text_editing() {
            return;
        }
        self.active_tool = tool;
        self.phase = ToolPhase::Idle;
    }

    pub fn is_text_editing(&self) -> bool {
        matches!(self.phase, ToolPhase::TextEditing { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, ToolPhase::Dragging { .. })
    }

    // --- pointer transitions (positions are image-space) ---

    pub fn pointer_down(&mut self, pos: Point) {
        if self.phase != ToolPhase::Idle || self.image.is_none() {
            return;
        }
        match self.active_tool {
            Tool::Text => {
                self.phase = ToolPhase::TextEditing {
                    anchor: pos,
                    buffer: String::new(),
                };
            }
            Tool::Background => {
                self.phase = ToolPhase::PickingBackground;
            }
            tool => {
                self.phase = ToolPhase::Dragging {
                    tool,
                    path: vec![pos],
                };
            }
        }
    }

    pub fn pointer_moved(&mut self, pos: Point) {
        let ToolPhase::Dragging { tool, path } = &mut self.phase else {
            return;
        };
        match tool {
            Tool::Pen => path.push(pos),
            // Shapes only need start + current for preview and commit.
            _ => {
                if path.len() < 2 {
                    path.push(pos);
                } else if let Some(last) = path.last_mut() {
                    *last = pos;
                }
            }
        }
    }

    /// Commits the in-progress gesture, if any. A click with no movement
    /// still carries the down-point, so a pen tap commits a one-point
    /// stroke; releasing with an empty path is a silent no-op. Releases in
    /// any other phase are ignored so a tap that just opened the text
    /// editor or the backdrop picker does not immediately close it.
    pub fn pointer_released(&mut self) {
        if !self.is_dragging() {
            return;
        }
        let ToolPhase::Dragging { tool, path } = std::mem::replace(&mut self.phase, ToolPhase::Idle)
        else {
            return;
        };
        if let Some(element) = DrawingElement::from_gesture(tool, &path) {
            self.elements.push(element);
            self.commit();
        }
    }

    /// Leaving the canvas mid-gesture ends it exactly like a release.
    pub fn pointer_left(&mut self) {
        self.pointer_released();
    }

    // --- text entry ---

    /// Commits the text element, or discards it when the trimmed input is
    /// empty; only a commit pushes history.
    pub fn submit_text(&mut self) {
        let ToolPhase::TextEditing { anchor, buffer } =
            std::mem::replace(&mut self.phase, ToolPhase::Idle)
        else {
            return;
        };
        let content = buffer.trim();
        if content.is_empty() {
            return;
        }
        self.elements
            .push(DrawingElement::text(anchor, content.to_string()));
        self.commit();
    }

    pub fn cancel_text(&mut self) {
        if self.is_text_editing() {
            self.phase = ToolPhase::Idle;
        }
    }

    // --- backdrop ---

    pub fn choose_background(&mut self, color: [u8; 4]) {
        self.background = Some(color);
        self.settings.last_background = Some(color);
        self.persist_settings();
        self.phase = ToolPhase::Idle;
        self.commit();
    }

    pub fn clear_background(&mut self) {
        self.background = None;
        self.phase = ToolPhase::Idle;
        self.commit();
    }

    pub fn cancel_background(&mut self) {
        if self.phase == ToolPhase::PickingBackground {
            self.phase = ToolPhase::Idle;
        }
    }

    pub fn clear_elements(&mut self) {
        if self.elements.is_empty() {
            return;
        }
        self.elements.clear();
        self.commit();
    }
}

impl UserSettings {
    fn file_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("io", "scribble", "scribble-annotate")?;
        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir).ok()?;
        Some(config_dir.join("settings.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::file_path().context("cannot resolve settings path")?;
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::file_path().context("cannot resolve settings path")?;
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, RgbaImage};

    use super::{EditorState, ToolPhase};
    use crate::element::{ElementKind, Point, Tool};

    fn state_with_image() -> EditorState {
        let mut state = EditorState::default();
        state.install_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            64,
            48,
            image::Rgba([255, 255, 255, 255]),
        )));
        state
    }

    fn drag(state: &mut EditorState, tool: Tool, from: Point, to: Point) {
        state.set_tool(tool);
        state.pointer_down(from);
        state.pointer_moved(to);
        state.pointer_released();
    }

    #[test]
    fn pen_tap_commits_single_point_stroke() {
        let mut state = state_with_image();
        state.set_tool(Tool::Pen);

        state.pointer_down(Point::new(5.0, 5.0));
        state.pointer_released();

        assert_eq!(state.elements.len(), 1);
        match &state.elements[0].kind {
            ElementKind::Pen { points } => assert_eq!(points.len(), 1),
            other => panic!("unexpected kind {other:?}"),
        }
        assert!(state.can_undo());
    }

    #[test]
    fn release_without_gesture_is_a_no_op() {
        let mut state = state_with_image();

        state.pointer_released();

        assert!(state.elements.is_empty());
        assert!(!state.can_undo());
    }

    #[test]
    fn shape_drag_tracks_only_start_and_current() {
        let mut state = state_with_image();
        state.set_tool(Tool::Rectangle);

        state.pointer_down(Point::new(10.0, 10.0));
        state.pointer_moved(Point::new(40.0, 20.0));
        state.pointer_moved(Point::new(100.0, 50.0));
        match &state.phase {
            ToolPhase::Dragging { path, .. } => assert_eq!(path.len(), 2),
            other => panic!("unexpected phase {other:?}"),
        }
        state.pointer_released();

        match &state.elements[0].kind {
            ElementKind::Rect { start, end } => {
                assert_eq!(*start, Point::new(10.0, 10.0));
                assert_eq!(*end, Point::new(100.0, 50.0));
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn release_keeps_text_editor_open() {
        let mut state = state_with_image();
        state.set_tool(Tool::Text);

        // A tap arrives as down followed by release on the same frame.
        state.pointer_down(Point::new(3.0, 4.0));
        state.pointer_released();

        assert!(matches!(state.phase, ToolPhase::TextEditing { .. }));
        assert!(state.elements.is_empty());
        assert!(!state.can_undo());
    }

    #[test]
    fn release_keeps_background_picker_open() {
        let mut state = state_with_image();
        state.set_tool(Tool::Background);

        state.pointer_down(Point::new(1.0, 1.0));
        state.pointer_released();

        assert_eq!(state.phase, ToolPhase::PickingBackground);
    }

    #[test]
    fn empty_text_submit_adds_nothing_and_keeps_tool() {
        let mut state = state_with_image();
        state.set_tool(Tool::Text);

        state.pointer_down(Point::new(3.0, 4.0));
        if let ToolPhase::TextEditing { buffer, .. } = &mut state.phase {
            buffer.push_str("   ");
        }
        state.submit_text();

        assert!(state.elements.is_empty());
        assert!(!state.can_undo());
        assert_eq!(state.active_tool, Tool::Text);
        assert_eq!(state.phase, ToolPhase::Idle);
    }

    #[test]
    fn text_submit_trims_and_commits() {
        let mut state = state_with_image();
        state.set_tool(Tool::Text);

        state.pointer_down(Point::new(3.0, 4.0));
        if let ToolPhase::TextEditing { buffer, .. } = &mut state.phase {
            buffer.push_str("  Hi  ");
        }
        state.submit_text();

        match &state.elements[0].kind {
            ElementKind::Text {
                anchor, content, ..
            } => {
                assert_eq!(*anchor, Point::new(3.0, 4.0));
                assert_eq!(content, "Hi");
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn undo_walks_back_one_action_at_a_time() {
        let mut state = state_with_image();
        drag(
            &mut state,
            Tool::Pen,
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
        );
        state.set_tool(Tool::Text);
        state.pointer_down(Point::new(10.0, 10.0));
        if let ToolPhase::TextEditing { buffer, .. } = &mut state.phase {
            buffer.push_str("Hi");
        }
        state.submit_text();

        state.undo();
        assert_eq!(state.elements.len(), 1);
        assert!(matches!(state.elements[0].kind, ElementKind::Pen { .. }));
        assert_eq!(state.background, None);

        state.undo();
        assert!(state.elements.is_empty());
        assert!(!state.can_undo());
    }

    #[test]
    fn undo_redo_are_inverse_over_a_mixed_session() {
        let mut state = state_with_image();
        drag(
            &mut state,
            Tool::Arrow,
            Point::new(0.0, 0.0),
            Point::new(9.0, 9.0),
        );
        state.set_tool(Tool::Background);
        state.pointer_down(Point::new(1.0, 1.0));
        state.choose_background([0xEF, 0x44, 0x44, 0xFF]);
        drag(
            &mut state,
            Tool::Rectangle,
            Point::new(2.0, 2.0),
            Point::new(8.0, 8.0),
        );
        let final_doc = state.document();

        for _ in 0..3 {
            state.undo();
        }
        assert_eq!(state.document(), super::Document::default());

        for _ in 0..3 {
            state.redo();
        }
        assert_eq!(state.document(), final_doc);
    }

    #[test]
    fn new_action_after_undo_discards_redo_branch() {
        let mut state = state_with_image();
        drag(
            &mut state,
            Tool::Pen,
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
        );
        drag(
            &mut state,
            Tool::Pen,
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        );

        state.undo();
        state.undo();
        drag(
            &mut state,
            Tool::Arrow,
            Point::new(4.0, 4.0),
            Point::new(5.0, 5.0),
        );

        assert!(!state.can_redo());
        state.redo();
        assert_eq!(state.elements.len(), 1);
        assert!(matches!(state.elements[0].kind, ElementKind::Arrow { .. }));
    }

    #[test]
    fn background_cancel_leaves_document_untouched() {
        let mut state = state_with_image();
        state.set_tool(Tool::Background);
        state.pointer_down(Point::new(0.0, 0.0));
        assert_eq!(state.phase, ToolPhase::PickingBackground);

        state.cancel_background();

        assert_eq!(state.background, None);
        assert!(!state.can_undo());
    }

    #[test]
    fn new_image_discards_document_and_history() {
        let mut state = state_with_image();
        drag(
            &mut state,
            Tool::Pen,
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
        );
        state.choose_background([0, 0, 0, 255]);

        state.install_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            8,
            8,
            image::Rgba([0, 0, 0, 255]),
        )));

        assert!(state.elements.is_empty());
        assert_eq!(state.background, None);
        assert!(!state.can_undo());
        assert!(!state.can_redo());
    }

    #[test]
    fn pointer_down_without_image_is_ignored() {
        let mut state = EditorState::default();
        state.pointer_down(Point::new(1.0, 1.0));
        assert_eq!(state.phase, ToolPhase::Idle);
    }
}
