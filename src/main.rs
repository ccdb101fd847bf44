use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use model_viewer::app::{ModelViewerApp, UiAction};
use model_viewer::cli::Cli;
use model_viewer::config::ViewerConfig;
use model_viewer::input::OrbitInput;
use model_viewer::jobs::JobDispatcher;
use model_viewer::loaders::GltfSceneLoader;
use model_viewer::renderer::{viewport_size, SceneRenderer};
use model_viewer::store::HttpModelStore;

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;

struct App {
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
    viewer: ModelViewerApp,
    input: OrbitInput,
    show_ui: bool,
    last_frame_time: Instant,
}

impl App {
    fn new(viewer: ModelViewerApp, show_ui: bool) -> Self {
        Self {
            window: None,
            renderer: None,
            viewer,
            input: OrbitInput::new(),
            show_ui,
            last_frame_time: Instant::now(),
        }
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(size);
        }
        let (width, height) = viewport_size(size.width, size.height, self.show_ui);
        self.viewer.viewer_mut().resize(width, height);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        self.viewer.pump();
        self.viewer.viewer_mut().camera_mut().update(delta);

        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        match renderer.render(window, &mut self.viewer, self.show_ui) {
            Ok(actions) => {
                for action in actions {
                    self.viewer.handle_action(action);
                }
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = renderer.size();
                self.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("Model Viewer")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        INITIAL_WINDOW_WIDTH,
                        INITIAL_WINDOW_HEIGHT,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let renderer = match pollster::block_on(SceneRenderer::new(window.clone(), &self.viewer)) {
                Ok(r) => r,
                Err(e) => {
                    log::error!("Failed to initialize renderer: {:#}", e);
                    event_loop.exit();
                    return;
                }
            };

            let size = window.inner_size();
            self.window = Some(window);
            self.renderer = Some(renderer);
            self.resize(size);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return; // egui consumed the event
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::DroppedFile(path) => {
                self.viewer.handle_action(UiAction::OpenFile(path));
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => self
                .input
                .process_event(&other, self.viewer.viewer_mut().camera_mut()),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn build_viewer(cli: &Cli) -> Result<(ModelViewerApp, ViewerConfig)> {
    let config = cli.to_config()?;
    log::info!("Catalog at {}", config.base_url);

    let store = HttpModelStore::new(config.base_url.clone(), config.request_timeout)
        .context("Failed to create catalog client")?;
    let (jobs, queue) = JobDispatcher::new(config.workers, Arc::new(store), Arc::new(GltfSceneLoader::new()))
        .context("Failed to start job pool")?;

    let aspect = INITIAL_WINDOW_WIDTH as f32 / INITIAL_WINDOW_HEIGHT as f32;
    let mut viewer = ModelViewerApp::new(&config, jobs, queue, aspect);
    viewer.start();

    if let Some(path) = &cli.file {
        viewer.handle_action(UiAction::OpenFile(path.clone()));
    }

    Ok((viewer, config))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let (viewer, config) = build_viewer(&cli)?;

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(viewer, config.show_ui);

    log::info!("Model Viewer - Controls: left-drag rotate, right-drag pan, scroll zoom, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
