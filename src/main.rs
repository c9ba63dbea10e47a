use std::env;

use anyhow::bail;
use app::App;
use config::Config;
use winit::event_loop::EventLoop;

mod app;
mod camera;
mod cmd;
mod config;
mod drawing;
mod gfx;
mod input;
mod math;
mod scene;
mod shapes;
mod surface;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_module(env!("CARGO_CRATE_NAME"), log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    let config = match &*env::args_os().skip(1).collect::<Vec<_>>() {
        [] => Config::default(),
        [path] => Config::load(path)?,
        _ => {
            bail!("usage: {} [config.toml]", env!("CARGO_PKG_NAME"));
        }
    };
    log::info!(
        "projecting onto a {:?}, preset {}",
        config.surface,
        config.shape
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    Ok(event_loop.run_app(&mut app)?)
}
