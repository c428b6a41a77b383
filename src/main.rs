use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use pollster::block_on;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{
    DeviceEvent, DeviceId, ElementState, KeyEvent, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

use kinetic_sculpture::config::{WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use kinetic_sculpture::render::renderer::{surface_error_is_fatal, surface_error_needs_resize};
use kinetic_sculpture::{
    AppState, AssetRoot, FrameClock, InputEvent, KeyCode, LightingConfig, Renderer, StartupError,
};

/// Pixel-precise wheels (touchpads) report pixels; treat this many as one notch.
const SCROLL_PIXELS_PER_LINE: f64 = 20.0;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        let code = if err.downcast_ref::<StartupError>().is_some() {
            -1
        } else {
            1
        };
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    let lighting = LightingConfig::kinetic();
    lighting.validate().context("invalid lighting table")?;

    let assets = AssetRoot::from_env();
    info!("resolving assets from {}", assets.root().display());

    let event_loop = create_event_loop()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = SculptureApp::new(assets, AppState::new(lighting));
    event_loop
        .run_app(&mut app)
        .map_err(|err| anyhow!("event loop terminated abnormally: {err}"))?;

    match app.last_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn create_event_loop() -> Result<EventLoop<()>> {
    // Some platform backends panic instead of erroring when no display is reachable.
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop =
        event_loop.map_err(|panic| StartupError::window_panic("event loop", panic))?;
    Ok(event_loop.map_err(|err| StartupError::window("event loop", err))?)
}

struct SculptureApp {
    assets: AssetRoot,
    state: AppState,
    renderer: Option<Renderer>,
    clock: FrameClock,
    pending: Vec<InputEvent>,
    /// Cursor position integrated from raw motion so look works while grabbed.
    virtual_cursor: (f64, f64),
    last_error: Option<anyhow::Error>,
}

impl SculptureApp {
    fn new(assets: AssetRoot, state: AppState) -> Self {
        Self {
            assets,
            state,
            renderer: None,
            clock: FrameClock::new(),
            pending: Vec::new(),
            virtual_cursor: (0.0, 0.0),
            last_error: None,
        }
    }

    fn init_renderer(&self, event_loop: &ActiveEventLoop) -> Result<Renderer> {
        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|err| StartupError::window("window", err))?,
        );
        capture_cursor(&window);
        block_on(Renderer::new(window, &self.assets))
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.last_error = Some(err);
        event_loop.exit();
    }

    /// One iteration of the frame loop: input, animation, uniforms, draw.
    fn frame(&mut self) -> Result<()> {
        let delta = self.clock.tick();
        for event in self.pending.drain(..) {
            self.state.handle_event(event);
        }
        self.state.update(delta);

        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        renderer.update_globals(&self.state.camera_params(), &self.state.frame_lighting());
        let scene = self.state.scene();
        match renderer.render(&scene) {
            Ok(()) => Ok(()),
            Err(err) if surface_error_needs_resize(&err) => {
                let size = renderer.window().inner_size();
                renderer.resize(size);
                Ok(())
            }
            Err(err) if surface_error_is_fatal(&err) => Err(anyhow!("GPU is out of memory")),
            Err(err) => {
                warn!("skipping frame: {err}");
                Ok(())
            }
        }
    }
}

impl ApplicationHandler for SculptureApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        match self.init_renderer(event_loop) {
            Ok(renderer) => {
                let size = renderer.window().inner_size();
                self.state.handle_event(InputEvent::Resize {
                    width: size.width,
                    height: size.height,
                });
                self.renderer = Some(renderer);
                self.clock = FrameClock::new();
                info!("renderer ready");
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.renderer.as_ref().map(Renderer::window_id) != Some(window_id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
                self.pending.push(InputEvent::Resize {
                    width: size.width,
                    height: size.height,
                });
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_keycode(code) {
                    self.pending.push(InputEvent::KeyEdge {
                        key,
                        pressed: state == ElementState::Pressed,
                    });
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => {
                        (position.y / SCROLL_PIXELS_PER_LINE) as f32
                    }
                };
                self.pending.push(InputEvent::Scroll { delta });
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.frame() {
                    self.fail(event_loop, err);
                } else if self.state.quit_requested() {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.virtual_cursor.0 += dx;
            self.virtual_cursor.1 += dy;
            let (x, y) = self.virtual_cursor;
            self.pending.push(InputEvent::MouseMove { x, y });
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window().request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.renderer.take().is_some() {
            info!("released GPU resources");
        }
    }
}

fn capture_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(err) = grabbed {
        warn!("cursor capture unavailable: {err}");
    }
    window.set_cursor_visible(false);
}

fn map_keycode(code: WinitKeyCode) -> Option<KeyCode> {
    Some(match code {
        WinitKeyCode::KeyW => KeyCode::W,
        WinitKeyCode::KeyA => KeyCode::A,
        WinitKeyCode::KeyS => KeyCode::S,
        WinitKeyCode::KeyD => KeyCode::D,
        WinitKeyCode::KeyP => KeyCode::P,
        WinitKeyCode::KeyR => KeyCode::R,
        WinitKeyCode::ArrowUp => KeyCode::UP,
        WinitKeyCode::ArrowDown => KeyCode::DOWN,
        WinitKeyCode::ArrowLeft => KeyCode::LEFT,
        WinitKeyCode::ArrowRight => KeyCode::RIGHT,
        WinitKeyCode::Escape => KeyCode::ESCAPE,
        _ => return None,
    })
}
