use crate::{
    shapes::Shape,
    surface::{CanvasSize, Point2},
};

/// The stroke being drawn on the canvas.
#[derive(Debug, Default)]
pub struct DrawingState {
    drawing: bool,
    points: Vec<Point2>,
}

impl DrawingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Pointer went down: discards the previous stroke and starts a new one.
    pub fn begin_stroke(&mut self) {
        self.drawing = true;
        self.points.clear();
    }

    /// Pointer moved. Returns whether the point was recorded.
    ///
    /// Movement is ignored unless a stroke is in progress.
    pub fn extend(&mut self, point: Point2) -> bool {
        if self.drawing {
            self.points.push(point);
        }
        self.drawing
    }

    /// Pointer released. The points stay until the next stroke or [`DrawingState::clear`].
    pub fn end_stroke(&mut self) {
        self.drawing = false;
    }

    pub fn clear(&mut self) {
        self.drawing = false;
        self.points.clear();
    }

    /// Replaces the stroke with a preset shape.
    pub fn load_preset(&mut self, shape: Shape, canvas: CanvasSize) {
        self.drawing = false;
        self.points = shape.points(canvas);
    }
}
