use crate::math::{vec2, vec3, Vec2f, Vec3f};

/// Orbit sensitivity of the plot camera.
const DEGREES_PER_PIXEL: f32 = 0.5;

/// Half-extent of the world region that is fit into the viewport.
///
/// The plotted box spans `[-1, 1]` on every axis, so its corners are at most `sqrt(3)` from the
/// origin in any view.
const FIT_EXTENT: f32 = 1.8;

/// Orthographic camera orbiting the origin of the 3D plot.
///
/// Angles are in degrees. Azimuth rotates around the z axis, elevation tilts towards it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub azimuth: f32,
    pub elevation: f32,
    home: (f32, f32),
}

impl Camera {
    pub fn new(azimuth: f32, elevation: f32) -> Self {
        let elevation = elevation.clamp(-90.0, 90.0);
        Self {
            azimuth,
            elevation,
            home: (azimuth, elevation),
        }
    }

    /// Rotates the camera by a pointer drag of `delta` pixels.
    pub fn orbit(&mut self, delta: Vec2f) {
        self.azimuth -= delta.x() * DEGREES_PER_PIXEL;
        self.azimuth = (self.azimuth + 180.0).rem_euclid(360.0) - 180.0;
        self.elevation = (self.elevation + delta.y() * DEGREES_PER_PIXEL).clamp(-90.0, 90.0);
    }

    pub fn reset(&mut self) {
        (self.azimuth, self.elevation) = self.home;
    }

    /// Computes the projection into a viewport of `size` pixels.
    pub fn view(&self, size: Vec2f) -> View {
        let (sin_a, cos_a) = self.azimuth.to_radians().sin_cos();
        let (sin_e, cos_e) = self.elevation.to_radians().sin_cos();

        let toward_viewer = vec3(cos_e * cos_a, cos_e * sin_a, sin_e);
        let right = vec3(-sin_a, cos_a, 0.0);
        let up = toward_viewer.cross(right);

        View {
            right,
            up,
            toward_viewer,
            center: size * 0.5,
            scale: 0.5 * size.x().min(size.y()) / FIT_EXTENT,
        }
    }
}

/// A fixed camera pose applied to a viewport.
#[derive(Debug, Clone, Copy)]
pub struct View {
    right: Vec3f,
    up: Vec3f,
    toward_viewer: Vec3f,
    center: Vec2f,
    scale: f32,
}

impl View {
    /// Projects a world position to viewport pixels (y pointing down).
    pub fn project(&self, p: Vec3f) -> Vec2f {
        self.center + vec2(p.dot(self.right), -p.dot(self.up)) * self.scale
    }

    /// Signed distance of `p` towards the viewer, in world units.
    pub fn depth(&self, p: Vec3f) -> f32 {
        p.dot(self.toward_viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_centre() {
        let view = Camera::new(-60.0, 30.0).view(vec2(400.0, 300.0));
        assert_eq!(view.project(vec3(0.0, 0.0, 0.0)), vec2(200.0, 150.0));
    }

    #[test]
    fn z_axis_points_up_on_screen() {
        let view = Camera::new(-60.0, 30.0).view(vec2(400.0, 400.0));
        let top = view.project(vec3(0.0, 0.0, 1.0));
        assert!((top.x() - 200.0).abs() < 1e-3);
        assert!(top.y() < 200.0);
    }

    #[test]
    fn points_facing_the_camera_are_nearer() {
        let view = Camera::new(0.0, 0.0).view(vec2(400.0, 400.0));
        assert!(view.depth(vec3(1.0, 0.0, 0.0)) > view.depth(vec3(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn unit_box_fits_viewport() {
        let view = Camera::new(-60.0, 30.0).view(vec2(400.0, 400.0));
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for z in [-1.0, 1.0] {
                    let p = view.project(vec3(x, y, z));
                    assert!((0.0..=400.0).contains(&p.x()) && (0.0..=400.0).contains(&p.y()));
                }
            }
        }
    }

    #[test]
    fn orbit_clamps_elevation_and_resets() {
        let mut camera = Camera::new(-60.0, 30.0);
        camera.orbit(vec2(0.0, 1000.0));
        assert_eq!(camera.elevation, 90.0);
        camera.orbit(vec2(720.0, 0.0));
        assert!((-180.0..180.0).contains(&camera.azimuth));
        camera.reset();
        assert_eq!((camera.azimuth, camera.elevation), (-60.0, 30.0));
    }
}
