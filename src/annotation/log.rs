// SPDX-License-Identifier: MPL-2.0
//! Drawing operations and the append-only operation log.

use crate::domain::annotation::{Point, StrokeColor, StrokeWidth};

/// Every annotation tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Pen,
    Rectangle,
    Arrow,
    Circle,
    Eraser,
}

/// Tools drawn from a sequence of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreehandTool {
    Pen,
    Eraser,
}

/// Tools drawn from a start and an end point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeTool {
    Rectangle,
    Arrow,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrokeStyle {
    pub color: StrokeColor,
    pub width: StrokeWidth,
}

impl StrokeStyle {
    #[must_use]
    pub fn new(color: StrokeColor, width: StrokeWidth) -> Self {
        Self { color, width }
    }
}

/// One recorded drawing action, in image pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingOperation {
    Freehand {
        tool: FreehandTool,
        points: Vec<Point>,
        style: StrokeStyle,
    },
    Shape {
        tool: ShapeTool,
        start: Point,
        end: Point,
        style: StrokeStyle,
    },
}

impl DrawingOperation {
    #[must_use]
    pub fn pen(points: Vec<Point>, style: StrokeStyle) -> Self {
        Self::Freehand {
            tool: FreehandTool::Pen,
            points,
            style,
        }
    }

    /// An eraser stroke. Its color is ignored when painting.
    #[must_use]
    pub fn eraser(points: Vec<Point>, width: StrokeWidth) -> Self {
        Self::Freehand {
            tool: FreehandTool::Eraser,
            points,
            style: StrokeStyle::new(StrokeColor::BLACK, width),
        }
    }

    #[must_use]
    pub fn rectangle(start: Point, end: Point, style: StrokeStyle) -> Self {
        Self::shape(ShapeTool::Rectangle, start, end, style)
    }

    #[must_use]
    pub fn arrow(start: Point, end: Point, style: StrokeStyle) -> Self {
        Self::shape(ShapeTool::Arrow, start, end, style)
    }

    /// An ellipse centered on `start` passing through the corner `end`.
    #[must_use]
    pub fn circle(start: Point, end: Point, style: StrokeStyle) -> Self {
        Self::shape(ShapeTool::Circle, start, end, style)
    }

    fn shape(tool: ShapeTool, start: Point, end: Point, style: StrokeStyle) -> Self {
        Self::Shape {
            tool,
            start,
            end,
            style,
        }
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        match self {
            Self::Freehand { tool: FreehandTool::Pen, .. } => Tool::Pen,
            Self::Freehand { tool: FreehandTool::Eraser, .. } => Tool::Eraser,
            Self::Shape { tool: ShapeTool::Rectangle, .. } => Tool::Rectangle,
            Self::Shape { tool: ShapeTool::Arrow, .. } => Tool::Arrow,
            Self::Shape { tool: ShapeTool::Circle, .. } => Tool::Circle,
        }
    }

    #[must_use]
    pub fn style(&self) -> StrokeStyle {
        match self {
            Self::Freehand { style, .. } | Self::Shape { style, .. } => *style,
        }
    }
}

/// Ordered operations, replayed in insertion order.
///
/// The only mutations are appending, dropping the last operation and clearing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationLog {
    operations: Vec<DrawingOperation>,
}

impl AnnotationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operation: DrawingOperation) {
        self.operations.push(operation);
    }

    /// Removes and returns the most recent operation.
    pub fn undo(&mut self) -> Option<DrawingOperation> {
        self.operations.pop()
    }

    pub fn clear(&mut self) {
        self.operations.clear();
    }

    #[must_use]
    pub fn operations(&self) -> &[DrawingOperation] {
        &self.operations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
