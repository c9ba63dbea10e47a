use std::{f32::consts::TAU, fmt};

use serde::Deserialize;

use crate::{
    math::linspace,
    surface::{CanvasSize, Point2},
};

/// Number of points sampled along the outline of round presets.
pub const ROUND_SAMPLES: usize = 100;

/// Preset shapes that can replace the free-hand stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Shape {
    Line,
    Square,
    Rectangle,
    Circle,
    Ellipse,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Line,
        Shape::Square,
        Shape::Rectangle,
        Shape::Circle,
        Shape::Ellipse,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Shape::Line => "Line",
            Shape::Square => "Square",
            Shape::Rectangle => "Rectangle",
            Shape::Circle => "Circle",
            Shape::Ellipse => "Ellipse",
        }
    }

    /// The shape after this one in [`Shape::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    fn generator(self) -> fn(Dims) -> Vec<Point2> {
        match self {
            Shape::Line => line,
            Shape::Square => square,
            Shape::Rectangle => rectangle,
            Shape::Circle => circle,
            Shape::Ellipse => ellipse,
        }
    }

    /// Generates the outline of this shape, sized relative to `canvas`.
    ///
    /// Returns no points if the canvas has not been laid out.
    pub fn points(self, canvas: CanvasSize) -> Vec<Point2> {
        match Dims::of(canvas) {
            Some(dims) => (self.generator())(dims),
            None => Vec::new(),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whole-pixel canvas dimensions; presets are laid out on the integer grid.
#[derive(Clone, Copy)]
struct Dims {
    width: i32,
    height: i32,
}

impl Dims {
    fn of(canvas: CanvasSize) -> Option<Self> {
        let dims = Dims {
            width: canvas.width as i32,
            height: canvas.height as i32,
        };
        (dims.width > 0 && dims.height > 0).then_some(dims)
    }

    fn center(self) -> (i32, i32) {
        (self.width / 2, self.height / 2)
    }

    fn min(self) -> i32 {
        self.width.min(self.height)
    }
}

fn line(d: Dims) -> Vec<Point2> {
    vec![
        Point2::new(d.width / 4, d.height / 4),
        Point2::new(3 * d.width / 4, 3 * d.height / 4),
    ]
}

/// Closed axis-aligned box around the centre, clockwise from the top left corner.
fn closed_box(d: Dims, half_w: i32, half_h: i32) -> Vec<Point2> {
    let (cx, cy) = d.center();
    vec![
        Point2::new(cx - half_w, cy - half_h),
        Point2::new(cx + half_w, cy - half_h),
        Point2::new(cx + half_w, cy + half_h),
        Point2::new(cx - half_w, cy + half_h),
        Point2::new(cx - half_w, cy - half_h),
    ]
}

fn square(d: Dims) -> Vec<Point2> {
    let size = d.min() / 4;
    closed_box(d, size, size)
}

fn rectangle(d: Dims) -> Vec<Point2> {
    closed_box(d, d.min() / 3, d.min() / 2)
}

fn outline(d: Dims, a: i32, b: i32) -> Vec<Point2> {
    let (cx, cy) = d.center();
    linspace(0.0..=TAU, ROUND_SAMPLES)
        .map(|angle| {
            let (sin, cos) = angle.sin_cos();
            Point2::new(
                (cx as f32 + a as f32 * cos).round() as i32,
                (cy as f32 + b as f32 * sin).round() as i32,
            )
        })
        .collect()
}

fn circle(d: Dims) -> Vec<Point2> {
    let radius = d.min() / 4;
    outline(d, radius, radius)
}

fn ellipse(d: Dims) -> Vec<Point2> {
    outline(d, d.min() / 3, d.min() / 6)
}
