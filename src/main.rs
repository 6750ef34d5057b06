use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window as WinitWindow, WindowId},
};

use scene_viewer::cli::Cli;
use scene_viewer::config::SceneConfig;
use scene_viewer::core::WinitController;
use scene_viewer::frame::FrameClock;
use scene_viewer::loaders::AssetLoader;
use scene_viewer::panel::{ControlPanel, PanelStats};
use scene_viewer::renderer::WgpuRenderer;
use scene_viewer::scenes::build_scene;
use scene_viewer::traits::{Button, Controller, SceneContext, SceneRenderer};
use scene_viewer::window::Window;
use scene_viewer::{RenderLoop, SceneError, SceneManager, ViewController};

const DEFAULT_CONFIG: &str = "scene.toml";

struct App {
    config: SceneConfig,
    window: Option<Window>,
    renderer: Option<WgpuRenderer>,
    panel: Option<ControlPanel>,
    manager: SceneManager,
    assets: AssetLoader,
    views: ViewController,
    input: WinitController,
    clock: FrameClock,
    render_loop: RenderLoop,
}

impl App {
    fn new(config: SceneConfig) -> Result<Self> {
        let mut manager = SceneManager::new();
        let mut assets = AssetLoader::new()?;
        let views = ViewController::from_config(&config.camera)?;

        build_scene(
            &config.scene,
            &mut SceneContext {
                manager: &mut manager,
                assets: &mut assets,
                config: &config,
            },
        )?;

        Ok(Self {
            config,
            window: None,
            renderer: None,
            panel: None,
            manager,
            assets,
            views,
            input: WinitController::new(),
            clock: FrameClock::new(),
            render_loop: RenderLoop::new(),
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(renderer)) = (&self.window, &mut self.renderer) else {
            return;
        };

        if self.input.was_pressed(Button::Escape) {
            event_loop.exit();
            return;
        }
        self.views.toggle_on_key(&self.input);

        let arrived = self.assets.poll(self.manager.scene_mut());
        if arrived > 0 {
            info!("{} model(s) added to the scene", arrived);
        }

        if let Some(panel) = &mut self.panel {
            let stats = PanelStats {
                fps: self.render_loop.fps(),
                objects: self.manager.scene().len(),
                animated: self.manager.len(),
                pending_loads: self.assets.pending(),
                resolution: renderer.drawing_buffer_size(),
            };
            let overlay = panel.run(window.inner(), &mut self.views, &stats);
            renderer.set_overlay(overlay);
        }

        let result = self.render_loop.tick(
            self.clock.elapsed_ms(),
            window,
            renderer,
            &mut self.manager,
            &mut self.views,
            &self.input,
        );
        match result {
            Ok(_) => {}
            Err(SceneError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                error!("out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => error!("frame failed: {}", e),
        }

        self.input.reset_deltas();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            WinitWindow::default_attributes()
                .with_title(self.config.window.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(WgpuRenderer::new(window.clone())) {
            Ok(renderer) => renderer,
            Err(e) => {
                error!("failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = renderer.drawing_buffer_size();
        self.views.set_aspect(width as f32 / height as f32);

        if self.config.show_ui {
            self.panel = Some(ControlPanel::new(&window));
        }

        window.request_redraw();
        self.window = Some(Window::new(window));
        self.renderer = Some(renderer);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // Let egui handle the event first
        if let (Some(panel), Some(window)) = (&mut self.panel, &self.window) {
            if panel.on_window_event(window.inner(), &event) {
                return;
            }
        }

        self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(_) => {
                if let Some(window) = &self.window {
                    window.inner().request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn load_config(cli: &Cli) -> Result<SceneConfig> {
    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => SceneConfig::load(DEFAULT_CONFIG)?,
        None => SceneConfig::default(),
    };
    Ok(cli.apply(config))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!(
        "scene {:?}, assets in {}",
        config.scene,
        config.assets.display()
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;

    info!("Controls: drag to orbit, scroll to zoom, V or Switch Camera to change view, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
