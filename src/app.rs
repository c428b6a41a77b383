use std::time::Instant;

use log::info;

use crate::animation::AnimationParams;
use crate::camera::{Camera, Movement};
use crate::config::{TUNING_RATE, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::input::{CursorTracker, EdgeTrigger, InputEvent, InputState, KeyCode};
use crate::lighting::LightingConfig;
use crate::render::CameraParams;
use crate::scene::FrameScene;

/// Whether the simulation clock is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Running,
    Paused,
}

/// Everything the frame loop mutates, owned in one place.
#[derive(Debug, Clone)]
pub struct AppState {
    pub camera: Camera,
    pub animation: AnimationParams,
    pub lighting: LightingConfig,
    input: InputState,
    pause_trigger: EdgeTrigger,
    cursor: CursorTracker,
    viewport: (u32, u32),
    quit_requested: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LightingConfig::kinetic())
    }
}

impl AppState {
    pub fn new(lighting: LightingConfig) -> Self {
        Self {
            camera: Camera::default(),
            animation: AnimationParams::default(),
            lighting,
            input: InputState::new(),
            pause_trigger: EdgeTrigger::new(),
            cursor: CursorTracker::default(),
            viewport: (WINDOW_WIDTH, WINDOW_HEIGHT),
            quit_requested: false,
        }
    }

    pub fn playback(&self) -> Playback {
        if self.animation.paused {
            Playback::Paused
        } else {
            Playback::Running
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        let (width, height) = self.viewport;
        if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }

    /// Applies one queued window-layer event.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Resize { width, height } => {
                if width > 0 && height > 0 {
                    self.viewport = (width, height);
                }
            }
            InputEvent::MouseMove { x, y } => {
                if let Some((dx, dy)) = self.cursor.offset(x, y) {
                    self.camera.process_mouse_movement(dx, dy);
                }
            }
            InputEvent::Scroll { delta } => self.camera.process_mouse_scroll(delta),
            InputEvent::KeyEdge { key, pressed } => {
                if pressed {
                    self.input.set_key_down(key);
                } else {
                    self.input.set_key_up(key);
                }
            }
        }
    }

    /// Polls held keys: camera movement, pause edge, tuning ramps and reset.
    pub fn process_input(&mut self, delta: f32) {
        if self.input.is_key_down(KeyCode::ESCAPE) {
            self.quit_requested = true;
        }

        let movement = [
            (KeyCode::W, Movement::Forward),
            (KeyCode::S, Movement::Backward),
            (KeyCode::A, Movement::Left),
            (KeyCode::D, Movement::Right),
        ];
        for (key, direction) in movement {
            if self.input.is_key_down(key) {
                self.camera.process_keyboard(direction, delta);
            }
        }

        if self.pause_trigger.update(self.input.is_key_down(KeyCode::P)) {
            self.animation.toggle_pause();
            info!("animation {:?}", self.playback());
        }

        let step = TUNING_RATE * delta;
        if self.input.is_key_down(KeyCode::UP) {
            self.animation.adjust_speed(step);
        }
        if self.input.is_key_down(KeyCode::DOWN) {
            self.animation.adjust_speed(-step);
        }
        if self.input.is_key_down(KeyCode::RIGHT) {
            self.animation.adjust_amplitude(step);
        }
        if self.input.is_key_down(KeyCode::LEFT) {
            self.animation.adjust_amplitude(-step);
        }

        if self.input.is_key_down(KeyCode::R) {
            self.animation.reset();
        }
    }

    /// Runs the input and animation steps of one frame.
    pub fn update(&mut self, delta: f32) {
        self.process_input(delta);
        self.animation.advance(delta);
    }

    pub fn camera_params(&self) -> CameraParams {
        CameraParams::from_camera(&self.camera, self.aspect())
    }

    /// Lighting table with the spotlight mounted on the camera.
    pub fn frame_lighting(&self) -> LightingConfig {
        self.lighting
            .bound_to_camera(self.camera.position, self.camera.front())
    }

    pub fn scene(&self) -> FrameScene {
        FrameScene::compose(&self.animation, &self.lighting)
    }
}

/// Wall-clock delta between frames.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_WAVE_AMPLITUDE, DEFAULT_WAVE_SPEED};

    const FRAME: f32 = 1.0 / 60.0;

    fn press(app: &mut AppState, key: KeyCode) {
        app.handle_event(InputEvent::KeyEdge { key, pressed: true });
    }

    fn release(app: &mut AppState, key: KeyCode) {
        app.handle_event(InputEvent::KeyEdge {
            key,
            pressed: false,
        });
    }

    #[test]
    fn holding_pause_toggles_once() {
        let mut app = AppState::default();
        press(&mut app, KeyCode::P);
        for _ in 0..45 {
            app.update(FRAME);
        }
        assert_eq!(app.playback(), Playback::Paused);
        release(&mut app, KeyCode::P);
        app.update(FRAME);
        press(&mut app, KeyCode::P);
        app.update(FRAME);
        assert_eq!(app.playback(), Playback::Running);
    }

    #[test]
    fn paused_frames_are_identical() {
        let mut app = AppState::default();
        app.update(0.25);
        press(&mut app, KeyCode::P);
        app.update(FRAME);
        let first = app.scene();
        app.update(0.5);
        app.update(0.5);
        assert_eq!(app.scene().lit, first.lit);
    }

    #[test]
    fn running_clock_scales_with_speed() {
        let mut app = AppState::default();
        app.update(0.5);
        assert!((app.animation.time - 0.5 * DEFAULT_WAVE_SPEED).abs() < 1e-6);
    }

    #[test]
    fn reset_mid_animation_restores_defaults() {
        let mut app = AppState::default();
        app.animation.time = 50.0;
        app.animation.speed = 3.0;
        app.animation.amplitude = 0.2;
        press(&mut app, KeyCode::R);
        app.process_input(FRAME);
        assert_eq!(app.animation.time, 0.0);
        assert_eq!(app.animation.speed, DEFAULT_WAVE_SPEED);
        assert_eq!(app.animation.amplitude, DEFAULT_WAVE_AMPLITUDE);
    }

    #[test]
    fn tuning_ramps_while_held_and_floors_at_zero() {
        let mut app = AppState::default();
        press(&mut app, KeyCode::UP);
        app.process_input(1.0);
        assert!((app.animation.speed - (DEFAULT_WAVE_SPEED + TUNING_RATE)).abs() < 1e-6);
        release(&mut app, KeyCode::UP);

        press(&mut app, KeyCode::DOWN);
        press(&mut app, KeyCode::LEFT);
        for _ in 0..600 {
            app.process_input(FRAME);
        }
        assert_eq!(app.animation.speed, 0.0);
        assert_eq!(app.animation.amplitude, 0.0);

        release(&mut app, KeyCode::LEFT);
        press(&mut app, KeyCode::RIGHT);
        app.process_input(0.5);
        assert!((app.animation.amplitude - 0.4).abs() < 1e-6);
    }

    #[test]
    fn escape_requests_quit() {
        let mut app = AppState::default();
        app.update(FRAME);
        assert!(!app.quit_requested());
        press(&mut app, KeyCode::ESCAPE);
        app.update(FRAME);
        assert!(app.quit_requested());
    }

    #[test]
    fn events_drive_camera_and_viewport() {
        let mut app = AppState::default();
        app.handle_event(InputEvent::Resize {
            width: 800,
            height: 400,
        });
        assert_eq!(app.aspect(), 2.0);
        app.handle_event(InputEvent::Resize {
            width: 0,
            height: 0,
        });
        assert_eq!(app.viewport(), (800, 400));

        app.handle_event(InputEvent::Scroll { delta: 5.0 });
        assert_eq!(app.camera.zoom(), 40.0);

        let yaw = app.camera.yaw();
        app.handle_event(InputEvent::MouseMove { x: 10.0, y: 10.0 });
        assert_eq!(app.camera.yaw(), yaw);
        app.handle_event(InputEvent::MouseMove { x: 30.0, y: 10.0 });
        assert!((app.camera.yaw() - (yaw + 2.0)).abs() < 1e-5);
    }

    #[test]
    fn spotlight_tracks_camera_each_frame() {
        let mut app = AppState::default();
        press(&mut app, KeyCode::W);
        app.update(1.0);
        let lighting = app.frame_lighting();
        assert_eq!(lighting.spot.position, app.camera.position);
        assert_eq!(lighting.spot.direction, app.camera.front());
    }
}
