use crate::{math::Vec2f, shapes::Shape, surface::Point2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cmd {
    Clear,

    SelectShape {
        shape: Shape,
    },
    NextShape,
    /// Replaces the stroke with the selected preset.
    DrawShape,

    /// Pointer pressed on the canvas; starts a new stroke.
    PenDown,
    PenMove {
        /// Pointer position in logical canvas pixels.
        position: Point2,
    },
    PenUp,

    /// Rotates the plot camera by a pointer drag, in logical pixels.
    Orbit {
        delta: Vec2f,
    },
    ResetView,

    Quit,
}
