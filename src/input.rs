//! Translation of raw window events into [`Cmd`]s.

use std::collections::HashMap;

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, WindowEvent},
    keyboard,
};

use crate::{
    cmd::Cmd,
    config::{CommandVerb, Key},
    math::{vec2, Vec2f},
    shapes::Shape,
    surface::Point2,
};

/// Which of the two windows an event was delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Canvas,
    Plot,
}

pub struct Input {
    bind: HashMap<Key, CommandVerb>,
    /// Last pointer position over the plot window, in logical pixels.
    plot_cursor: Option<Vec2f>,
    orbiting: bool,
}

impl Input {
    pub fn new(bind: HashMap<Key, CommandVerb>) -> Self {
        Self {
            bind,
            plot_cursor: None,
            orbiting: false,
        }
    }

    pub fn window_event(
        &mut self,
        target: Target,
        event: &WindowEvent,
        scale_factor: f64,
    ) -> Option<Cmd> {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                self.key_pressed(&event.logical_key)
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(target, *position, scale_factor)
            }
            WindowEvent::CursorLeft { .. } if target == Target::Plot => {
                self.plot_cursor = None;
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_input(target, *button, *state)
            }
            _ => None,
        }
    }

    fn key_pressed(&self, key: &keyboard::Key) -> Option<Cmd> {
        let verb = self.bind.get(&Key::from_logical(key))?;
        Some(match verb {
            CommandVerb::SelectLine => Cmd::SelectShape { shape: Shape::Line },
            CommandVerb::SelectSquare => Cmd::SelectShape {
                shape: Shape::Square,
            },
            CommandVerb::SelectRectangle => Cmd::SelectShape {
                shape: Shape::Rectangle,
            },
            CommandVerb::SelectCircle => Cmd::SelectShape {
                shape: Shape::Circle,
            },
            CommandVerb::SelectEllipse => Cmd::SelectShape {
                shape: Shape::Ellipse,
            },
            CommandVerb::NextShape => Cmd::NextShape,
            CommandVerb::DrawShape => Cmd::DrawShape,
            CommandVerb::Clear => Cmd::Clear,
            CommandVerb::ResetView => Cmd::ResetView,
            CommandVerb::Quit => Cmd::Quit,
        })
    }

    fn cursor_moved(
        &mut self,
        target: Target,
        position: PhysicalPosition<f64>,
        scale_factor: f64,
    ) -> Option<Cmd> {
        let logical = position.to_logical::<f64>(scale_factor);
        match target {
            Target::Canvas => Some(Cmd::PenMove {
                position: Point2::new(logical.x.round() as i32, logical.y.round() as i32),
            }),
            Target::Plot => {
                let pos = vec2(logical.x as f32, logical.y as f32);
                let last = self.plot_cursor.replace(pos);
                match last {
                    Some(last) if self.orbiting => Some(Cmd::Orbit { delta: pos - last }),
                    _ => None,
                }
            }
        }
    }

    fn mouse_input(
        &mut self,
        target: Target,
        button: MouseButton,
        state: ElementState,
    ) -> Option<Cmd> {
        let pressed = state == ElementState::Pressed;
        match (target, button) {
            (Target::Canvas, MouseButton::Left) => Some(if pressed { Cmd::PenDown } else { Cmd::PenUp }),
            (Target::Canvas, MouseButton::Right) if pressed => Some(Cmd::DrawShape),
            (Target::Plot, MouseButton::Left) => {
                self.orbiting = pressed;
                None
            }
            _ => None,
        }
    }
}
