// SPDX-License-Identifier: MPL-2.0
//! Replaying the operation log and compositing it over the base image.

use tiny_skia::{
    BlendMode, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect,
    Stroke, Transform,
};

use super::image::BaseImage;
use super::log::{DrawingOperation, FreehandTool, ShapeTool, StrokeStyle};
use super::AnnotationError;
use crate::config::{
    ARROW_HEAD_HALF_ANGLE_DEG, ARROW_HEAD_LENGTH_FACTOR, ERASER_WIDTH_FACTOR, MIN_ARROW_HEAD_LENGTH,
    SINGLE_POINT_EPSILON,
};
use crate::domain::annotation::Point;

/// Paints `operations` in order onto a transparent `width` x `height` layer.
///
/// # Errors
///
/// Returns [`AnnotationError::SurfaceUnavailable`] if the layer cannot be allocated.
pub fn render_layer(
    operations: &[DrawingOperation],
    width: u32,
    height: u32,
) -> Result<Pixmap, AnnotationError> {
    let mut layer =
        Pixmap::new(width, height).ok_or(AnnotationError::SurfaceUnavailable { width, height })?;
    for operation in operations {
        paint_operation(&mut layer, operation);
    }
    Ok(layer)
}

/// Produces the annotated screenshot as PNG bytes.
///
/// The base image is drawn first and the annotation layer on top, so eraser
/// strokes only ever remove annotation pixels.
///
/// # Errors
///
/// Fails when a surface cannot be allocated or PNG encoding fails.
pub fn composite(base: &BaseImage, operations: &[DrawingOperation]) -> Result<Vec<u8>, AnnotationError> {
    let (width, height) = (base.pixmap().width(), base.pixmap().height());
    let layer = render_layer(operations, width, height)?;

    let mut output =
        Pixmap::new(width, height).ok_or(AnnotationError::SurfaceUnavailable { width, height })?;
    let paint = PixmapPaint::default();
    output.draw_pixmap(0, 0, base.pixmap().as_ref(), &paint, Transform::identity(), None);
    output.draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), None);

    output
        .encode_png()
        .map_err(|e| AnnotationError::Encode(e.to_string()))
}

fn paint_operation(layer: &mut Pixmap, operation: &DrawingOperation) {
    match operation {
        DrawingOperation::Freehand {
            tool,
            points,
            style,
        } => {
            let Some(path) = polyline(points) else {
                tracing::debug!("skipping freehand stroke without points");
                return;
            };
            let (paint, width) = match tool {
                FreehandTool::Pen => (stroke_paint(style), style.width.value()),
                FreehandTool::Eraser => (eraser_paint(), style.width.value() * ERASER_WIDTH_FACTOR),
            };
            layer.stroke_path(&path, &paint, &round_stroke(width), Transform::identity(), None);
        }
        DrawingOperation::Shape {
            tool,
            start,
            end,
            style,
        } => {
            let paint = stroke_paint(style);
            let stroke = round_stroke(style.width.value());
            let outline = match tool {
                ShapeTool::Rectangle => rectangle(*start, *end),
                ShapeTool::Circle => ellipse(*start, *end),
                ShapeTool::Arrow => segment(*start, *end),
            };
            match outline {
                Some(path) => layer.stroke_path(&path, &paint, &stroke, Transform::identity(), None),
                None => tracing::debug!(?tool, "skipping degenerate shape"),
            }
            if *tool == ShapeTool::Arrow {
                if let Some(head) = arrow_head(*start, *end, style.width.value()) {
                    layer.fill_path(&head, &paint, FillRule::Winding, Transform::identity(), None);
                }
            }
        }
    }
}

fn stroke_paint(style: &StrokeStyle) -> Paint<'static> {
    let mut paint = Paint::default();
    let color = style.color;
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Paint whose alpha is subtracted from the layer.
fn eraser_paint() -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 0xFF);
    paint.anti_alias = true;
    paint.blend_mode = BlendMode::DestinationOut;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    }
}

fn polyline(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(first.x, first.y);
    if rest.is_empty() {
        // A lone point still needs a segment for the round cap to show.
        builder.line_to(first.x + SINGLE_POINT_EPSILON, first.y + SINGLE_POINT_EPSILON);
    }
    for point in rest {
        builder.line_to(point.x, point.y);
    }
    builder.finish()
}

fn segment(start: Point, end: Point) -> Option<Path> {
    let mut builder = PathBuilder::new();
    builder.move_to(start.x, start.y);
    builder.line_to(end.x, end.y);
    builder.finish()
}

fn rectangle(start: Point, end: Point) -> Option<Path> {
    let (left, right) = (start.x.min(end.x), start.x.max(end.x));
    let (top, bottom) = (start.y.min(end.y), start.y.max(end.y));
    let mut builder = PathBuilder::new();
    builder.move_to(left, top);
    builder.line_to(right, top);
    builder.line_to(right, bottom);
    builder.line_to(left, bottom);
    builder.close();
    builder.finish()
}

fn ellipse(center: Point, corner: Point) -> Option<Path> {
    let rx = (corner.x - center.x).abs();
    let ry = (corner.y - center.y).abs();
    let bounds = Rect::from_ltrb(center.x - rx, center.y - ry, center.x + rx, center.y + ry)?;
    PathBuilder::from_oval(bounds)
}

/// Filled triangle whose tip sits on `end`, pointing away from `start`.
fn arrow_head(start: Point, end: Point, stroke_width: f32) -> Option<Path> {
    let length = (stroke_width * ARROW_HEAD_LENGTH_FACTOR).max(MIN_ARROW_HEAD_LENGTH);
    let half_angle = ARROW_HEAD_HALF_ANGLE_DEG.to_radians();
    let shaft = (end.y - start.y).atan2(end.x - start.x);

    let wing = |angle: f32| {
        Point::new(
            end.x - length * angle.cos(),
            end.y - length * angle.sin(),
        )
    };
    let left = wing(shaft - half_angle);
    let right = wing(shaft + half_angle);

    let mut builder = PathBuilder::new();
    builder.move_to(end.x, end.y);
    builder.line_to(left.x, left.y);
    builder.line_to(right.x, right.y);
    builder.close();
    builder.finish()
}
