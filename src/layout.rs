use egui::{Pos2, Rect, Vec2};

use crate::element::Point;

/// Uniform padding around the image when a backdrop color is set.
pub const BACKDROP_PADDING: f32 = 40.0;
/// Corner radius of the rounded clip applied to the image.
pub const IMAGE_CORNER_RADIUS: f32 = 12.0;

/// Derived placement of the image on the canvas. Recomputed whenever the
/// source image or the backdrop toggles; element coordinates stay valid
/// because they are relative to `(offset_x, offset_y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasLayout {
    pub display_width: f32,
    pub display_height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl CanvasLayout {
    /// Aspect-preserving fit of an `image_width × image_height` source into
    /// `container` minus padding on every side. Wider-than-available images
    /// are width-bound, the rest height-bound.
    pub fn fit(container: Vec2, image_width: f32, image_height: f32, padded: bool) -> Self {
        let padding = if padded { BACKDROP_PADDING } else { 0.0 };
        let avail_w = (container.x - padding * 2.0).max(1.0);
        let avail_h = (container.y - padding * 2.0).max(1.0);
        let aspect = image_width / image_height.max(1.0);

        let (display_width, display_height) = if aspect > avail_w / avail_h {
            (avail_w, avail_w / aspect)
        } else {
            (avail_h * aspect, avail_h)
        };

        Self {
            display_width,
            display_height,
            offset_x: padding,
            offset_y: padding,
        }
    }

    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(
            self.display_width + self.offset_x * 2.0,
            self.display_height + self.offset_y * 2.0,
        )
    }

    /// Canvas rect centered inside the container.
    pub fn canvas_rect(&self, container: Rect) -> Rect {
        Rect::from_center_size(container.center(), self.canvas_size())
    }

    /// Canvas-relative pointer position to image-space.
    pub fn to_image(&self, canvas_pos: Pos2) -> Point {
        Point::new(canvas_pos.x - self.offset_x, canvas_pos.y - self.offset_y)
    }

    /// Image-space point back to a canvas-relative position.
    pub fn to_canvas(&self, point: Point) -> Pos2 {
        Pos2::new(point.x + self.offset_x, point.y + self.offset_y)
    }

    /// Same layout at another resolution, for full-size export.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            display_width: self.display_width * factor,
            display_height: self.display_height * factor,
            offset_x: self.offset_x * factor,
            offset_y: self.offset_y * factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use egui::{Pos2, Rect, Vec2};

    use super::{CanvasLayout, BACKDROP_PADDING};

    #[test]
    fn fit_is_height_bound_for_wide_container() {
        // 800x600 in 1000x700: image aspect 1.333 < available aspect 1.428.
        let layout = CanvasLayout::fit(Vec2::new(1000.0, 700.0), 800.0, 600.0, false);

        assert!((layout.display_height - 700.0).abs() < 0.01);
        assert!((layout.display_width - 933.333).abs() < 0.01);
        assert_eq!(layout.offset_x, 0.0);
        assert_eq!(layout.offset_y, 0.0);

        let container = Rect::from_min_size(Pos2::ZERO, Vec2::new(1000.0, 700.0));
        let canvas = layout.canvas_rect(container);
        assert!((canvas.min.x - 33.333).abs() < 0.01);
        assert!(canvas.min.y.abs() < 0.01);
    }

    #[test]
    fn fit_is_width_bound_for_wide_image() {
        let layout = CanvasLayout::fit(Vec2::new(1000.0, 700.0), 2000.0, 600.0, false);

        assert!((layout.display_width - 1000.0).abs() < 0.01);
        assert!((layout.display_height - 300.0).abs() < 0.01);
    }

    #[test]
    fn backdrop_padding_shrinks_available_box() {
        let layout = CanvasLayout::fit(Vec2::new(1000.0, 700.0), 800.0, 600.0, true);

        assert_eq!(layout.offset_x, BACKDROP_PADDING);
        assert_eq!(layout.offset_y, BACKDROP_PADDING);
        // 920x620 available, aspect 1.484 > 1.333: height-bound.
        assert!((layout.display_height - 620.0).abs() < 0.01);
        assert!((layout.display_width - 826.666).abs() < 0.01);
        let size = layout.canvas_size();
        assert!((size.x - (layout.display_width + 80.0)).abs() < 0.01);
        assert!((size.y - 700.0).abs() < 0.01);
    }

    #[test]
    fn pointer_round_trips_through_image_space() {
        let layout = CanvasLayout::fit(Vec2::new(1000.0, 700.0), 800.0, 600.0, true);
        let pointer = Pos2::new(123.4, 456.7);

        let image = layout.to_image(pointer);
        let back = layout.to_canvas(image);

        assert!((back.x - pointer.x).abs() < 1e-4);
        assert!((back.y - pointer.y).abs() < 1e-4);
    }

    #[test]
    fn scaled_layout_multiplies_every_dimension() {
        let layout = CanvasLayout::fit(Vec2::new(1000.0, 700.0), 800.0, 600.0, true);
        let scaled = layout.scaled(2.0);

        assert!((scaled.display_width - layout.display_width * 2.0).abs() < 1e-3);
        assert!((scaled.offset_x - layout.offset_x * 2.0).abs() < 1e-3);
    }
}
