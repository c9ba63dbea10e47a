use std::{process, sync::Arc};

use wgpu::{Color, Surface, SurfaceError, SurfaceTarget};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    camera::Camera,
    cmd::Cmd,
    config::Config,
    drawing::DrawingState,
    gfx::{self, Batch, Gpu, Instance, Pass, Rgba},
    input::{Input, Target},
    math::vec2,
    scene::Scene,
    shapes::Shape,
    surface::{CanvasSize, Point2},
};

const STROKE_COLOR: Rgba = [0.0, 0.0, 0.0, 1.0];
/// Stroke width on the canvas, in logical pixels.
const STROKE_WIDTH: f32 = 2.0;

pub struct App {
    config: Config,
    instance: wgpu::Instance,
    win: Option<Windows>,

    input: Input,
    state: DrawingState,
    scene: Scene,
    camera: Camera,
    /// Preset used by [`Cmd::DrawShape`].
    shape: Shape,
}

struct Windows {
    gpu: Gpu,
    canvas: Win,
    plot: Win,
}

impl Windows {
    fn target(&self, id: WindowId) -> Option<Target> {
        if id == self.canvas.window.id() {
            Some(Target::Canvas)
        } else if id == self.plot.window.id() {
            Some(Target::Plot)
        } else {
            None
        }
    }

    fn get(&self, target: Target) -> &Win {
        match target {
            Target::Canvas => &self.canvas,
            Target::Plot => &self.plot,
        }
    }
}

struct Win {
    window: Arc<Window>,
    surface: Surface<'static>,
    batch: Batch,
    clear: Color,
}

impl Win {
    /// Logical pixels to render target pixels.
    fn px(&self) -> f32 {
        self.window.scale_factor() as f32
    }

    fn recreate_swapchain(&self, gpu: &Gpu) -> bool {
        let res = self.window.inner_size();
        gpu.configure(&self.surface, res.width, res.height)
    }

    fn redraw(&mut self, gpu: &Gpu, instances: &[Instance]) {
        let st = match self.surface.get_current_texture() {
            Ok(st) => st,
            Err(err @ (SurfaceError::Outdated | SurfaceError::Lost)) => {
                log::debug!("surface error: {}", err);
                if !self.recreate_swapchain(gpu) {
                    return;
                }
                match self.surface.get_current_texture() {
                    Ok(st) => st,
                    Err(e) => {
                        log::error!("failed to acquire next frame after recreating swapchain: {e}");
                        return;
                    }
                }
            }
            Err(e) => {
                log::warn!("failed to acquire frame: {e}");
                return;
            }
        };

        self.batch.set_instances(gpu, instances);

        let mut enc = gpu.encoder();
        let mut pass = Pass::new(gpu, &mut enc, &st.texture, self.clear);
        self.batch.draw(&mut pass);
        drop(pass);

        gpu.submit(enc);
        self.window.pre_present_notify();
        st.present();
    }
}

impl App {
    pub fn new(config: Config) -> Self {
        let plot = &config.plot;
        Self {
            instance: gfx::create_instance(),
            win: None,
            input: Input::new(config.bind.clone()),
            state: DrawingState::new(),
            scene: Scene::new(config.surface, plot.wireframe_lines, plot.wireframe_samples),
            camera: Camera::new(plot.azimuth, plot.elevation),
            shape: config.shape,
            config,
        }
    }

    fn canvas_title(&self) -> String {
        format!(
            "Draw Shape and Visualize on {} Surface [{}]",
            self.config.surface.adjective(),
            self.shape,
        )
    }

    fn create_win(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Windows> {
        let canvas_attrs = Window::default_attributes()
            .with_title(self.canvas_title())
            .with_inner_size(LogicalSize::new(
                self.config.canvas.width,
                self.config.canvas.height,
            ))
            .with_resizable(false);
        let plot_attrs = Window::default_attributes()
            .with_title(self.scene.title())
            .with_inner_size(LogicalSize::new(self.config.plot.width, self.config.plot.height));

        let (canvas_window, canvas_surface) = self.create_surface(event_loop, canvas_attrs)?;
        let (plot_window, plot_surface) = self.create_surface(event_loop, plot_attrs)?;

        let gpu = Gpu::new(&self.instance, &canvas_surface)?;

        let canvas = Win {
            window: canvas_window,
            surface: canvas_surface,
            batch: Batch::new(&gpu),
            clear: Color::WHITE,
        };
        let plot = Win {
            window: plot_window,
            surface: plot_surface,
            batch: Batch::new(&gpu),
            clear: Color::WHITE,
        };
        for win in [&canvas, &plot] {
            win.recreate_swapchain(&gpu);
            win.window.request_redraw();
        }

        let size = canvas.window.inner_size();
        log::debug!(
            "created canvas at {}x{} (scale factor {})",
            size.width,
            size.height,
            canvas.window.scale_factor(),
        );

        Ok(Windows { gpu, canvas, plot })
    }

    fn create_surface(
        &self,
        event_loop: &ActiveEventLoop,
        attrs: WindowAttributes,
    ) -> anyhow::Result<(Arc<Window>, Surface<'static>)> {
        let window = Arc::new(event_loop.create_window(attrs)?);
        let surface = self
            .instance
            .create_surface(SurfaceTarget::from(window.clone()))?;
        Ok((window, surface))
    }

    /// Current canvas size in logical pixels; zero until the canvas window exists.
    fn canvas_size(&self) -> CanvasSize {
        match &self.win {
            Some(win) => {
                let window = &win.canvas.window;
                let size = window.inner_size().to_logical::<f32>(window.scale_factor());
                CanvasSize::new(size.width, size.height)
            }
            None => CanvasSize::new(0.0, 0.0),
        }
    }

    fn request_redraw(&self, target: Target) {
        if let Some(win) = &self.win {
            win.get(target).window.request_redraw();
        }
    }

    fn select_shape(&mut self, shape: Shape) {
        self.shape = shape;
        log::info!("selected preset: {shape}");
        if let Some(win) = &self.win {
            win.canvas.window.set_title(&self.canvas_title());
        }
    }

    fn handle(&mut self, event_loop: &ActiveEventLoop, cmd: Cmd) {
        let canvas = self.canvas_size();
        let stroke_changed = match cmd {
            Cmd::Clear => {
                log::info!("clearing canvas");
                self.state.clear();
                true
            }
            Cmd::SelectShape { shape } => {
                self.select_shape(shape);
                false
            }
            Cmd::NextShape => {
                self.select_shape(self.shape.next());
                false
            }
            Cmd::DrawShape => {
                log::info!("drawing preset: {}", self.shape);
                self.state.load_preset(self.shape, canvas);
                true
            }
            Cmd::PenDown => {
                self.state.begin_stroke();
                true
            }
            Cmd::PenMove { position } => self.state.extend(position),
            Cmd::PenUp => {
                self.state.end_stroke();
                false
            }
            Cmd::Orbit { delta } => {
                self.camera.orbit(delta);
                self.request_redraw(Target::Plot);
                false
            }
            Cmd::ResetView => {
                self.camera.reset();
                self.request_redraw(Target::Plot);
                false
            }
            Cmd::Quit => {
                event_loop.exit();
                false
            }
        };

        if stroke_changed {
            self.request_redraw(Target::Canvas);
            if self.scene.refresh(&self.state, canvas) {
                self.request_redraw(Target::Plot);
            }
        }
    }

    fn redraw(&mut self, target: Target) {
        let Some(win) = &mut self.win else { return };
        match target {
            Target::Canvas => {
                let instances = stroke_instances(self.state.points(), win.canvas.px());
                win.canvas.redraw(&win.gpu, &instances);
            }
            Target::Plot => {
                let size = win.plot.window.inner_size();
                let view = self
                    .camera
                    .view(vec2(size.width as f32, size.height as f32));
                let instances =
                    self.scene
                        .instances(&view, win.plot.px(), self.config.plot.point_size);
                win.plot.redraw(&win.gpu, &instances);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.win.is_none() {
            let win = match self.create_win(event_loop) {
                Ok(win) => win,
                Err(e) => {
                    log::error!("could not create windows: {e:#}");
                    process::exit(1);
                }
            };
            self.win = Some(win);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(win) = &self.win else { return };
        let Some(target) = win.target(window_id) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }
            WindowEvent::RedrawRequested => {
                self.redraw(target);
                return;
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let w = win.get(target);
                w.recreate_swapchain(&win.gpu);
                w.window.request_redraw();
            }
            _ => {}
        }

        let scale_factor = win.get(target).window.scale_factor();
        if let Some(cmd) = self.input.window_event(target, &event, scale_factor) {
            self.handle(event_loop, cmd);
        }
    }
}

/// The canvas stroke as a polyline, in render target pixels.
fn stroke_instances(points: &[Point2], px: f32) -> Vec<Instance> {
    let to_px = |p: Point2| vec2(p.x as f32, p.y as f32) * px;
    let width = STROKE_WIDTH * px;
    match points {
        [] => Vec::new(),
        [p] => vec![Instance::dot(to_px(*p), width, STROKE_COLOR)],
        _ => points
            .windows(2)
            .map(|w| Instance::segment(to_px(w[0]), to_px(w[1]), width, STROKE_COLOR))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_is_drawn_as_polyline() {
        assert!(stroke_instances(&[], 1.0).is_empty());

        let dot = stroke_instances(&[Point2::new(3, 4)], 2.0);
        assert_eq!(dot, [Instance::dot(vec2(6.0, 8.0), 4.0, STROKE_COLOR)]);

        let line = stroke_instances(
            &[Point2::new(0, 0), Point2::new(10, 0), Point2::new(10, 10)],
            1.0,
        );
        assert_eq!(line.len(), 2);
        assert_eq!((line[1].a, line[1].b), (vec2(10.0, 0.0), vec2(10.0, 10.0)));
    }
}
