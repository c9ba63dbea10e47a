//! Projection of canvas coordinates onto the 3D reference surfaces.

use std::f32::consts::{PI, TAU};

use serde::Deserialize;

use crate::math::{linspace, vec3, Vec3f};

/// A point of the drawn stroke, in logical canvas pixels with the origin at the top left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point2 {
    pub x: i32,
    pub y: i32,
}

impl Point2 {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Current size of the drawing canvas, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether the canvas has real dimensions yet.
    ///
    /// Windows report a zero size until their first layout pass; nothing can be mapped before
    /// that.
    pub fn is_laid_out(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// The 3D surface that strokes are projected onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Unit sphere. Canvas x becomes the azimuth, canvas y the polar angle.
    Sphere,
    /// Unit-radius cylinder spanning `z = -1..=1` around the z axis.
    Cylinder,
}

impl Surface {
    pub fn adjective(self) -> &'static str {
        match self {
            Surface::Sphere => "Spherical",
            Surface::Cylinder => "Cylindrical",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Surface::Sphere => "Shape on Spherical Surface",
            Surface::Cylinder => "Shape on Cylindrical Surface",
        }
    }

    /// Maps a single canvas point onto the surface.
    ///
    /// Returns `None` when `canvas` is not laid out yet.
    pub fn map(self, point: Point2, canvas: CanvasSize) -> Option<Vec3f> {
        if !canvas.is_laid_out() {
            return None;
        }

        let x = point.x as f32;
        let y = point.y as f32;
        let CanvasSize { width, height } = canvas;

        Some(match self {
            Surface::Sphere => {
                let theta = PI * (1.0 - y / height);
                let phi = TAU * (x / width);
                let (sin_t, cos_t) = theta.sin_cos();
                let (sin_p, cos_p) = phi.sin_cos();
                vec3(sin_t * cos_p, sin_t * sin_p, cos_t)
            }
            Surface::Cylinder => {
                let half_w = width / 2.0;
                let half_h = height / 2.0;
                let theta = (y - half_h).atan2(x - half_w);
                // Drags can leave the canvas; keep the point on the finite cylinder.
                let z = ((y - half_h) / half_h).clamp(-1.0, 1.0);
                let (sin_t, cos_t) = theta.sin_cos();
                vec3(cos_t, sin_t, z)
            }
        })
    }

    /// Maps every point of a stroke, preserving order and length.
    pub fn map_stroke(self, points: &[Point2], canvas: CanvasSize) -> Option<Vec<Vec3f>> {
        if !canvas.is_laid_out() {
            return None;
        }
        points.iter().map(|&p| self.map(p, canvas)).collect()
    }

    /// Builds the reference wireframe as a list of polylines.
    ///
    /// `lines` polylines are produced in each parameter direction, each sampled at `samples`
    /// points.
    pub fn wireframe(self, lines: usize, samples: usize) -> Vec<Vec<Vec3f>> {
        let mut polylines: Vec<Vec<Vec3f>> = Vec::with_capacity(lines * 2);
        match self {
            Surface::Sphere => {
                let sphere = |u: f32, v: f32| {
                    let (sin_u, cos_u) = u.sin_cos();
                    let (sin_v, cos_v) = v.sin_cos();
                    vec3(cos_u * sin_v, sin_u * sin_v, cos_v)
                };
                // Meridians.
                for u in linspace(0.0..=TAU, lines) {
                    polylines.push(linspace(0.0..=PI, samples).map(|v| sphere(u, v)).collect());
                }
                // Parallels.
                for v in linspace(0.0..=PI, lines) {
                    polylines.push(linspace(0.0..=TAU, samples).map(|u| sphere(u, v)).collect());
                }
            }
            Surface::Cylinder => {
                let cylinder = |theta: f32, z: f32| {
                    let (sin_t, cos_t) = theta.sin_cos();
                    vec3(cos_t, sin_t, z)
                };
                for theta in linspace(0.0..=TAU, lines) {
                    polylines.push(
                        linspace(-1.0..=1.0, samples)
                            .map(|z| cylinder(theta, z))
                            .collect(),
                    );
                }
                for z in linspace(-1.0..=1.0, lines) {
                    polylines.push(
                        linspace(0.0..=TAU, samples)
                            .map(|theta| cylinder(theta, z))
                            .collect(),
                    );
                }
            }
        }
        polylines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn canvas() -> CanvasSize {
        CanvasSize::new(400.0, 400.0)
    }

    fn assert_close(actual: Vec3f, expected: [f32; 3]) {
        assert!(
            actual.dist(expected.into()) < EPS,
            "{actual:?} is not close to {expected:?}"
        );
    }

    /// A grid of inputs that also reaches a bit past every canvas edge.
    fn sample_inputs() -> impl Iterator<Item = (Point2, CanvasSize)> {
        let sizes = [(400.0, 400.0), (1.0, 1.0), (640.0, 123.0), (33.0, 900.0)];
        sizes.into_iter().flat_map(|(w, h)| {
            (-2..=12).flat_map(move |i| {
                (-2..=12).map(move |j| {
                    let x = (w * i as f32 / 10.0) as i32;
                    let y = (h * j as f32 / 10.0) as i32;
                    (Point2::new(x, y), CanvasSize::new(w, h))
                })
            })
        })
    }

    #[test]
    fn sphere_points_lie_on_unit_sphere() {
        for (point, canvas) in sample_inputs() {
            let p = Surface::Sphere.map(point, canvas).unwrap();
            assert!((p.length() - 1.0).abs() < EPS, "{point:?} in {canvas:?} -> {p:?}");
        }
    }

    #[test]
    fn cylinder_points_lie_on_unit_cylinder() {
        for (point, canvas) in sample_inputs() {
            let p = Surface::Cylinder.map(point, canvas).unwrap();
            let radius = (p.x() * p.x() + p.y() * p.y()).sqrt();
            assert!((radius - 1.0).abs() < EPS, "{point:?} in {canvas:?} -> {p:?}");
            assert!((-1.0..=1.0).contains(&p.z()), "{point:?} in {canvas:?} -> {p:?}");
        }
    }

    #[test]
    fn top_centre_maps_to_south_pole() {
        let p = Surface::Sphere.map(Point2::new(200, 0), canvas()).unwrap();
        assert_close(p, [0.0, 0.0, -1.0]);
    }

    #[test]
    fn bottom_edge_maps_to_north_pole() {
        let p = Surface::Sphere.map(Point2::new(123, 400), canvas()).unwrap();
        assert_close(p, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn right_edge_maps_to_cylinder_x_axis() {
        let p = Surface::Cylinder.map(Point2::new(400, 200), canvas()).unwrap();
        assert_close(p, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn cylinder_height_follows_canvas_y() {
        let top = Surface::Cylinder.map(Point2::new(200, 0), canvas()).unwrap();
        let bottom = Surface::Cylinder.map(Point2::new(200, 400), canvas()).unwrap();
        assert_close(top, [0.0, -1.0, -1.0]);
        assert_close(bottom, [0.0, 1.0, 1.0]);

        let outside = Surface::Cylinder.map(Point2::new(200, 900), canvas()).unwrap();
        assert_eq!(outside.z(), 1.0);
    }

    #[test]
    fn mapping_is_repeatable() {
        for surface in [Surface::Sphere, Surface::Cylinder] {
            let point = Point2::new(37, 311);
            assert_eq!(surface.map(point, canvas()), surface.map(point, canvas()));
        }
    }

    #[test]
    fn unlaid_canvas_maps_nothing() {
        for surface in [Surface::Sphere, Surface::Cylinder] {
            for canvas in [
                CanvasSize::new(0.0, 0.0),
                CanvasSize::new(400.0, 0.0),
                CanvasSize::new(0.0, 400.0),
                CanvasSize::new(-1.0, 400.0),
            ] {
                assert_eq!(surface.map(Point2::new(10, 10), canvas), None);
                assert_eq!(surface.map_stroke(&[Point2::new(10, 10)], canvas), None);
            }
        }
    }

    #[test]
    fn stroke_mapping_preserves_order_and_length() {
        let stroke = [Point2::new(0, 0), Point2::new(200, 0), Point2::new(400, 200)];
        let mapped = Surface::Cylinder.map_stroke(&stroke, canvas()).unwrap();
        assert_eq!(mapped.len(), stroke.len());
        for (point, p3) in stroke.iter().zip(&mapped) {
            assert_eq!(Surface::Cylinder.map(*point, canvas()), Some(*p3));
        }

        assert_eq!(Surface::Sphere.map_stroke(&[], canvas()), Some(Vec::new()));
    }

    #[test]
    fn wireframes_stay_on_their_surface() {
        let sphere = Surface::Sphere.wireframe(8, 16);
        assert_eq!(sphere.len(), 16);
        for p in sphere.iter().flatten() {
            assert!((p.length() - 1.0).abs() < EPS);
        }

        let cylinder = Surface::Cylinder.wireframe(8, 16);
        assert_eq!(cylinder.len(), 16);
        for p in cylinder.iter().flatten() {
            assert!((p.x().hypot(p.y()) - 1.0).abs() < EPS);
            assert!((-1.0..=1.0).contains(&p.z()));
        }
        assert!(cylinder.iter().all(|line| line.len() == 16));
    }
}
