//! The 3D plot: reference surface, axes box and the mapped stroke.

use crate::{
    camera::View,
    drawing::DrawingState,
    gfx::{Instance, Rgba},
    math::{lerp, vec3, Vec3f},
    surface::{CanvasSize, Surface},
};

const WIREFRAME_COLOR: Rgba = [0.83, 0.83, 0.83, 0.5];
const BOX_COLOR: Rgba = [0.55, 0.55, 0.55, 1.0];
const POINT_COLOR: Rgba = [0.0, 0.0, 1.0, 1.0];
/// Opacity of the point farthest from the viewer; the nearest is fully opaque.
const FAR_POINT_ALPHA: f32 = 0.3;
/// Distance from the origin to a corner of the plotted box.
const BOX_RADIUS: f32 = 1.732_050_8;

pub struct Scene {
    surface: Surface,
    /// Precomputed reference wireframe, as polylines.
    reference: Vec<Vec<Vec3f>>,
    points: Vec<Vec3f>,
}

impl Scene {
    pub fn new(surface: Surface, wireframe_lines: usize, wireframe_samples: usize) -> Self {
        Self {
            surface,
            reference: surface.wireframe(wireframe_lines, wireframe_samples),
            points: Vec::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.surface.title()
    }

    /// The stroke as mapped by the last successful refresh.
    pub fn points(&self) -> &[Vec3f] {
        &self.points
    }

    /// Re-maps the whole stroke onto the surface.
    ///
    /// Returns `false` and keeps the previous points if `canvas` has not been laid out.
    pub fn refresh(&mut self, state: &DrawingState, canvas: CanvasSize) -> bool {
        match self.surface.map_stroke(state.points(), canvas) {
            Some(points) => {
                self.points = points;
                true
            }
            None => {
                log::debug!("canvas is {canvas:?}, skipping scene refresh");
                false
            }
        }
    }

    /// Builds the draw list for the plot, back to front.
    ///
    /// `px` is the size of one logical pixel in render target pixels.
    pub fn instances(&self, view: &View, px: f32, point_size: f32) -> Vec<Instance> {
        let line_count: usize = self.reference.iter().map(|l| l.len().saturating_sub(1)).sum();
        let mut out = Vec::with_capacity(BOX_EDGES.len() + line_count + self.points.len());

        for (a, b) in BOX_EDGES {
            out.push(Instance::segment(
                view.project(corner(a)),
                view.project(corner(b)),
                px,
                BOX_COLOR,
            ));
        }

        for line in &self.reference {
            for pair in line.windows(2) {
                out.push(Instance::segment(
                    view.project(pair[0]),
                    view.project(pair[1]),
                    px,
                    WIREFRAME_COLOR,
                ));
            }
        }

        let mut points: Vec<(f32, Vec3f)> =
            self.points.iter().map(|&p| (view.depth(p), p)).collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (depth, p) in points {
            let t = ((depth + BOX_RADIUS) / (2.0 * BOX_RADIUS)).clamp(0.0, 1.0);
            let mut color = POINT_COLOR;
            color[3] *= lerp(FAR_POINT_ALPHA..=1.0, t);
            out.push(Instance::dot(view.project(p), point_size * px, color));
        }

        out
    }
}

/// Edges of the `[-1, 1]^3` box, as pairs of corner indices (bit 0 = x, bit 1 = y, bit 2 = z).
const BOX_EDGES: [(u8, u8); 12] = [
    (0b000, 0b001),
    (0b010, 0b011),
    (0b100, 0b101),
    (0b110, 0b111),
    (0b000, 0b010),
    (0b001, 0b011),
    (0b100, 0b110),
    (0b101, 0b111),
    (0b000, 0b100),
    (0b001, 0b101),
    (0b010, 0b110),
    (0b011, 0b111),
];

fn corner(index: u8) -> Vec3f {
    let coord = |bit: u8| if index & bit != 0 { 1.0 } else { -1.0 };
    vec3(coord(0b001), coord(0b010), coord(0b100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        camera::Camera,
        math::vec2,
        shapes::Shape,
        surface::Point2,
    };

    fn canvas() -> CanvasSize {
        CanvasSize::new(400.0, 400.0)
    }

    fn drawn(points: &[Point2]) -> DrawingState {
        let mut state = DrawingState::new();
        state.begin_stroke();
        for &p in points {
            state.extend(p);
        }
        state.end_stroke();
        state
    }

    #[test]
    fn refresh_maps_every_point() {
        let mut scene = Scene::new(Surface::Cylinder, 4, 8);
        let mut state = DrawingState::new();
        state.load_preset(Shape::Circle, canvas());

        assert!(scene.refresh(&state, canvas()));
        assert_eq!(scene.points().len(), state.points().len());
        assert_eq!(
            scene.points()[0],
            Surface::Cylinder.map(state.points()[0], canvas()).unwrap()
        );
    }

    #[test]
    fn cleared_stroke_leaves_only_the_reference() {
        let mut scene = Scene::new(Surface::Sphere, 4, 8);
        let mut state = drawn(&[Point2::new(1, 2), Point2::new(3, 4)]);
        scene.refresh(&state, canvas());
        assert_eq!(scene.points().len(), 2);

        state.clear();
        assert!(scene.refresh(&state, canvas()));
        assert!(scene.points().is_empty());

        let view = Camera::new(-60.0, 30.0).view(vec2(400.0, 400.0));
        let instances = scene.instances(&view, 1.0, 6.0);
        // 12 box edges plus 8 polylines of 7 segments each.
        assert_eq!(instances.len(), 12 + 8 * 7);
        assert!(instances.iter().all(|i| i.color != POINT_COLOR));
    }

    #[test]
    fn unlaid_canvas_keeps_previous_points() {
        let mut scene = Scene::new(Surface::Sphere, 4, 8);
        let state = drawn(&[Point2::new(200, 0)]);
        assert!(scene.refresh(&state, canvas()));

        let empty = DrawingState::new();
        assert!(!scene.refresh(&empty, CanvasSize::new(0.0, 0.0)));
        assert_eq!(scene.points().len(), 1);
    }

    #[test]
    fn nearer_points_are_more_opaque() {
        let mut scene = Scene::new(Surface::Sphere, 2, 2);
        // Azimuth 0 looks down the x axis; canvas x = 0 lands on +x, x = 200 on -x.
        let state = drawn(&[Point2::new(0, 200), Point2::new(200, 200)]);
        scene.refresh(&state, canvas());

        let view = Camera::new(0.0, 0.0).view(vec2(400.0, 400.0));
        let instances = scene.instances(&view, 1.0, 6.0);
        let dots: Vec<&Instance> = instances.iter().skip(12 + 4).collect();
        assert_eq!(dots.len(), 2);
        let (far, near) = (dots[0], dots[1]);
        assert!(far.color[3] < near.color[3]);
        assert!(near.a.dist(view.project(vec3(1.0, 0.0, 0.0))) < 1e-3);
    }

    #[test]
    fn box_edges_join_adjacent_corners() {
        for (a, b) in BOX_EDGES {
            assert_eq!(corner(a).dist(corner(b)), 2.0);
        }
    }
}
