use ab_glyph::FontArc;
use anyhow::{anyhow, Context as _, Result};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Paint, Path, PathBuilder, Pattern, Pixmap, Rect,
    SpreadMode, Stroke, Transform,
};

use crate::element::{
    DrawingElement, ElementKind, Point, ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH, TEXT_OUTLINE_WIDTH,
};
use crate::layout::{CanvasLayout, IMAGE_CORNER_RADIUS};

/// Composites the full canvas: backdrop fill, rounded-clipped image, then
/// every element in insertion order. Pure function of its inputs; the same
/// arguments always produce the same pixels. `scale` multiplies all geometry
/// (1.0 for screen-sized output, `image_width / display_width` for export).
pub fn compose(
    image: &DynamicImage,
    layout: &CanvasLayout,
    background: Option<[u8; 4]>,
    elements: &[DrawingElement],
    scale: f32,
) -> Result<Pixmap> {
    let layout = layout.scaled(scale);
    let size = layout.canvas_size();
    let width = (size.x.round() as u32).max(1);
    let height = (size.y.round() as u32).max(1);

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| anyhow!("cannot allocate pixmap"))?;

    if let Some([r, g, b, a]) = background {
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    draw_source_image(&mut pixmap, image, &layout, scale)?;

    let font = load_font();
    for element in elements {
        draw_element(&mut pixmap, element, &layout, scale, font.as_ref())?;
    }

    Ok(pixmap)
}

pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>> {
    let rgba = RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixmap.data().to_vec())
        .ok_or_else(|| anyhow!("cannot construct output image"))?;
    let mut buffer = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(rgba)
        .write_to(&mut buffer, ImageFormat::Png)
        .context("cannot encode PNG")?;
    Ok(buffer.into_inner())
}

fn draw_source_image(
    pixmap: &mut Pixmap,
    image: &DynamicImage,
    layout: &CanvasLayout,
    scale: f32,
) -> Result<()> {
    let rgba = image.to_rgba8();
    let source = Pixmap::from_vec(
        rgba.as_raw().to_vec(),
        tiny_skia::IntSize::from_wh(rgba.width(), rgba.height())
            .ok_or_else(|| anyhow!("source image has zero size"))?,
    )
    .ok_or_else(|| anyhow!("cannot wrap source image"))?;

    let sx = layout.display_width / rgba.width() as f32;
    let sy = layout.display_height / rgba.height() as f32;
    let place = Transform::from_row(sx, 0.0, 0.0, sy, layout.offset_x, layout.offset_y);

    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.shader = Pattern::new(
        source.as_ref(),
        SpreadMode::Pad,
        FilterQuality::Bilinear,
        1.0,
        place,
    );

    let clip = rounded_rect_path(
        layout.offset_x,
        layout.offset_y,
        layout.display_width,
        layout.display_height,
        IMAGE_CORNER_RADIUS * scale,
    )
    .ok_or_else(|| anyhow!("cannot build image clip path"))?;

    pixmap.fill_path(&clip, &paint, FillRule::Winding, Transform::identity(), None);
    Ok(())
}

fn draw_element(
    pixmap: &mut Pixmap,
    element: &DrawingElement,
    layout: &CanvasLayout,
    scale: f32,
    font: Option<&FontArc>,
) -> Result<()> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(
        element.color[0],
        element.color[1],
        element.color[2],
        element.color[3],
    );
    paint.anti_alias = true;

    let stroke = Stroke {
        width: element.stroke_width * scale,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    match &element.kind {
        ElementKind::Pen { points } => {
            if let [only] = points.as_slice() {
                // Zero-length stroke renders as a dot of the stroke width.
                let center = place(*only, layout, scale);
                let mut pb = PathBuilder::new();
                pb.push_circle(center.0, center.1, (stroke.width * 0.5).max(0.5));
                let path = pb.finish().ok_or_else(|| anyhow!("cannot build dot"))?;
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
                return Ok(());
            }

            let mut pb = PathBuilder::new();
            for (i, point) in points.iter().enumerate() {
                let (x, y) = place(*point, layout, scale);
                if i == 0 {
                    pb.move_to(x, y);
                } else {
                    pb.line_to(x, y);
                }
            }
            let path = pb.finish().ok_or_else(|| anyhow!("cannot build stroke"))?;
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
        ElementKind::Rect { start, end } => {
            let (x0, y0) = place(*start, layout, scale);
            let (x1, y1) = place(*end, layout, scale);
            let Some(rect) =
                Rect::from_ltrb(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
            else {
                // Degenerate box: a zero-area drag still leaves a mark.
                return stroke_segment(pixmap, (x0, y0), (x1, y1), &paint, &stroke);
            };
            let path = PathBuilder::from_rect(rect);
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
        ElementKind::Arrow { start, end } => {
            let from = place(*start, layout, scale);
            let to = place(*end, layout, scale);
            stroke_segment(pixmap, from, to, &paint, &stroke)?;
            for wing in arrow_head_segments(from, to, scale) {
                stroke_segment(pixmap, to, wing, &paint, &stroke)?;
            }
        }
        ElementKind::Text {
            anchor,
            content,
            font_size,
        } => {
            let Some(font) = font else {
                log::warn!("no usable font found, skipping text annotation");
                return Ok(());
            };
            let (x, y) = place(*anchor, layout, scale);
            draw_outlined_text(
                pixmap,
                font,
                content,
                x,
                y,
                font_size * scale,
                element.color,
            )?;
        }
    }

    Ok(())
}

fn place(point: Point, layout: &CanvasLayout, scale: f32) -> (f32, f32) {
    (
        point.x * scale + layout.offset_x,
        point.y * scale + layout.offset_y,
    )
}

fn stroke_segment(
    pixmap: &mut Pixmap,
    from: (f32, f32),
    to: (f32, f32),
    paint: &Paint<'_>,
    stroke: &Stroke,
) -> Result<()> {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    let path = pb.finish().ok_or_else(|| anyhow!("cannot build line"))?;
    pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
    Ok(())
}

/// Endpoints of the two arrowhead wings: fixed length, ±30° off the shaft.
fn arrow_head_segments(from: (f32, f32), to: (f32, f32), scale: f32) -> [(f32, f32); 2] {
    let angle = (to.1 - from.1).atan2(to.0 - from.0);
    let len = ARROW_HEAD_LENGTH * scale;
    [
        (
            to.0 - len * (angle - ARROW_HEAD_ANGLE).cos(),
            to.1 - len * (angle - ARROW_HEAD_ANGLE).sin(),
        ),
        (
            to.0 - len * (angle + ARROW_HEAD_ANGLE).cos(),
            to.1 - len * (angle + ARROW_HEAD_ANGLE).sin(),
        ),
    ]
}

/// Text is drawn in place so that later shapes occlude earlier labels:
/// black offset passes approximate the outline, then the fill on top.
fn draw_outlined_text(
    pixmap: &mut Pixmap,
    font: &FontArc,
    content: &str,
    x: f32,
    y: f32,
    px: f32,
    color: [u8; 4],
) -> Result<()> {
    let width = pixmap.width();
    let height = pixmap.height();
    let mut canvas = RgbaImage::from_raw(width, height, pixmap.data().to_vec())
        .ok_or_else(|| anyhow!("cannot view pixmap as image"))?;

    let outline = TEXT_OUTLINE_WIDTH.round() as i32 / 2 + 1;
    for dx in -outline..=outline {
        for dy in -outline..=outline {
            if dx == 0 && dy == 0 {
                continue;
            }
            draw_text_mut(
                &mut canvas,
                Rgba([0, 0, 0, 255]),
                x as i32 + dx,
                y as i32 + dy,
                px,
                font,
                content,
            );
        }
    }
    draw_text_mut(&mut canvas, Rgba(color), x as i32, y as i32, px, font, content);

    pixmap.data_mut().copy_from_slice(canvas.as_raw());
    Ok(())
}

fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<Path> {
    let r = radius.min(w * 0.5).min(h * 0.5).max(0.0);
    if r <= 0.0 {
        return PathBuilder::from_rect(Rect::from_xywh(x, y, w, h)?).into();
    }
    // Circular corners via the standard cubic approximation.
    let k = r * 0.552_284_8;
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.cubic_to(x + w - r + k, y, x + w, y + r - k, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.cubic_to(x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.cubic_to(x + r - k, y + h, x, y + h - r + k, x, y + h - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}

fn load_font() -> Option<FontArc> {
    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arialbd.ttf",
    ];

    for path in candidates {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(bytes) {
                return Some(font);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use egui::Vec2;
    use image::{DynamicImage, RgbaImage};

    use super::{compose, encode_png};
    use crate::element::{DrawingElement, Point, Tool, DRAW_COLOR};
    use crate::layout::CanvasLayout;

    fn white_image(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255])))
    }

    fn pixel(pixmap: &tiny_skia::Pixmap, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * pixmap.width() + x) * 4) as usize;
        let data = pixmap.data();
        [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]
    }

    #[test]
    fn compose_is_deterministic() {
        let image = white_image(200, 150);
        let layout = CanvasLayout::fit(Vec2::new(200.0, 150.0), 200.0, 150.0, true);
        let elements = vec![
            DrawingElement::from_gesture(
                Tool::Pen,
                &[Point::new(5.0, 5.0), Point::new(50.0, 40.0)],
            )
            .unwrap(),
            DrawingElement::from_gesture(
                Tool::Arrow,
                &[Point::new(20.0, 20.0), Point::new(90.0, 60.0)],
            )
            .unwrap(),
        ];

        let a = compose(&image, &layout, Some([30, 30, 30, 255]), &elements, 1.0).unwrap();
        let b = compose(&image, &layout, Some([30, 30, 30, 255]), &elements, 1.0).unwrap();

        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn canvas_matches_layout_size() {
        let image = white_image(800, 600);
        let layout = CanvasLayout::fit(Vec2::new(1000.0, 700.0), 800.0, 600.0, false);

        let pixmap = compose(&image, &layout, None, &[], 1.0).unwrap();

        assert_eq!(pixmap.width(), 933);
        assert_eq!(pixmap.height(), 700);
    }

    #[test]
    fn backdrop_padding_shifts_elements_by_forty() {
        let image = white_image(400, 300);
        // Display at native size so image-space equals display pixels.
        let layout = CanvasLayout::fit(Vec2::new(480.0, 380.0), 400.0, 300.0, true);
        let rect = DrawingElement::from_gesture(
            Tool::Rectangle,
            &[Point::new(10.0, 10.0), Point::new(100.0, 50.0)],
        )
        .unwrap();

        let pixmap = compose(&image, &layout, Some([0, 0, 0, 255]), &[rect], 1.0).unwrap();

        // Left edge midpoint lands at image (10, 30) -> canvas (50, 70).
        assert_eq!(pixel(&pixmap, 50, 70), DRAW_COLOR);
        // Well inside the box the white image shows through.
        assert_eq!(pixel(&pixmap, 90, 70), [255, 255, 255, 255]);
        // The padding band keeps the backdrop color.
        assert_eq!(pixel(&pixmap, 5, 5), [0, 0, 0, 255]);
    }

    #[test]
    fn later_elements_paint_over_earlier_ones() {
        let image = white_image(100, 100);
        let layout = CanvasLayout::fit(Vec2::new(100.0, 100.0), 100.0, 100.0, false);
        let first = DrawingElement {
            color: [0, 0, 255, 255],
            ..DrawingElement::from_gesture(
                Tool::Pen,
                &[Point::new(10.0, 50.0), Point::new(90.0, 50.0)],
            )
            .unwrap()
        };
        let second = DrawingElement::from_gesture(
            Tool::Pen,
            &[Point::new(10.0, 50.0), Point::new(90.0, 50.0)],
        )
        .unwrap();

        let pixmap = compose(&image, &layout, None, &[first, second], 1.0).unwrap();

        assert_eq!(pixel(&pixmap, 50, 50), DRAW_COLOR);
    }

    #[test]
    fn single_point_pen_renders_a_dot() {
        let image = white_image(100, 100);
        let layout = CanvasLayout::fit(Vec2::new(100.0, 100.0), 100.0, 100.0, false);
        let dot =
            DrawingElement::from_gesture(Tool::Pen, &[Point::new(50.0, 50.0)]).unwrap();

        let pixmap = compose(&image, &layout, None, &[dot], 1.0).unwrap();

        assert_ne!(pixel(&pixmap, 50, 50), [255, 255, 255, 255]);
    }

    #[test]
    fn encode_png_produces_a_decodable_buffer() {
        let image = white_image(64, 48);
        let layout = CanvasLayout::fit(Vec2::new(64.0, 48.0), 64.0, 48.0, false);
        let pixmap = compose(&image, &layout, None, &[], 1.0).unwrap();

        let png = encode_png(&pixmap).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();

        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 48);
    }
}
