use egui::Color32;
use serde::{Deserialize, Serialize};

/// Stroke color for every committed drawing (#EF4444, same as the preview).
pub const DRAW_COLOR: [u8; 4] = [0xEF, 0x44, 0x44, 0xFF];
pub const DRAW_STROKE_WIDTH: f32 = 2.0;
pub const TEXT_STROKE_WIDTH: f32 = 4.0;
pub const TEXT_FONT_SIZE: f32 = 20.0;
pub const TEXT_OUTLINE_WIDTH: f32 = 3.0;
pub const ARROW_HEAD_LENGTH: f32 = 15.0;
/// Arrowhead half-angle from the line direction.
pub const ARROW_HEAD_ANGLE: f32 = std::f32::consts::PI / 6.0;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Tool {
    Pen,
    Rectangle,
    Arrow,
    Text,
    Background,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One committed annotation. Coordinates are image-space: relative to the
/// displayed image's top-left corner, independent of backdrop padding.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DrawingElement {
    pub kind: ElementKind,
    pub color: [u8; 4],
    pub stroke_width: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum ElementKind {
    /// Freehand polyline sampled at pointer-move granularity; never empty.
    /// A single point is a valid stroke and renders as a dot.
    Pen { points: Vec<Point> },
    /// Opposite corners as dragged; width/height may be negative. Rendering
    /// normalizes, storage does not.
    Rect { start: Point, end: Point },
    Arrow { start: Point, end: Point },
    Text {
        anchor: Point,
        content: String,
        font_size: f32,
    },
}

impl DrawingElement {
    /// Builds the element a completed drag gesture commits.
    pub fn from_gesture(tool: Tool, path: &[Point]) -> Option<Self> {
        let first = *path.first()?;
        let last = *path.last()?;
        let kind = match tool {
            Tool::Pen => ElementKind::Pen {
                points: path.to_vec(),
            },
            Tool::Rectangle => ElementKind::Rect {
                start: first,
                end: last,
            },
            Tool::Arrow => ElementKind::Arrow {
                start: first,
                end: last,
            },
            Tool::Text | Tool::Background => return None,
        };
        Some(Self {
            kind,
            color: DRAW_COLOR,
            stroke_width: DRAW_STROKE_WIDTH,
        })
    }

    pub fn text(anchor: Point, content: String) -> Self {
        Self {
            kind: ElementKind::Text {
                anchor,
                content,
                font_size: TEXT_FONT_SIZE,
            },
            color: DRAW_COLOR,
            stroke_width: TEXT_STROKE_WIDTH,
        }
    }

    pub fn color32(&self) -> Color32 {
        Color32::from_rgba_unmultiplied(self.color[0], self.color[1], self.color[2], self.color[3])
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawingElement, ElementKind, Point, Tool, DRAW_COLOR};

    #[test]
    fn gesture_keeps_full_path_for_pen_only() {
        let path = [
            Point::new(1.0, 1.0),
            Point::new(2.0, 3.0),
            Point::new(4.0, 4.0),
        ];

        let pen = DrawingElement::from_gesture(Tool::Pen, &path).expect("pen commits");
        match pen.kind {
            ElementKind::Pen { points } => assert_eq!(points.len(), 3),
            other => panic!("unexpected kind {other:?}"),
        }

        let rect = DrawingElement::from_gesture(Tool::Rectangle, &path).expect("rect commits");
        match rect.kind {
            ElementKind::Rect { start, end } => {
                assert_eq!(start, Point::new(1.0, 1.0));
                assert_eq!(end, Point::new(4.0, 4.0));
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(rect.color, DRAW_COLOR);
    }

    #[test]
    fn gesture_with_empty_path_commits_nothing() {
        assert!(DrawingElement::from_gesture(Tool::Pen, &[]).is_none());
        assert!(DrawingElement::from_gesture(Tool::Text, &[Point::new(0.0, 0.0)]).is_none());
    }
}
