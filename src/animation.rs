//! Procedural pendant animation.
//!
//! Every pendant is derived from the accumulated clock and its grid cell on
//! each frame; nothing here is stored between frames except the tunable
//! [`AnimationParams`].

use glam::{Mat4, Vec3};

use crate::config::{
    BASE_HEIGHT, DEFAULT_WAVE_AMPLITUDE, DEFAULT_WAVE_SPEED, GRID_SPACING, GRID_X, GRID_Z,
    PENDANT_SIZE, PLATE_COVERAGE, PLATE_THICKNESS, STRING_OFFSET, STRING_THICKNESS,
};

/// Phase offset between neighbouring cells along either grid axis.
pub const PHASE_STEP: f32 = 0.35;
pub const YAW_AMPLITUDE_DEG: f32 = 10.0;
pub const YAW_RATE: f32 = 0.6;
pub const YAW_STEP: f32 = 0.25;
pub const TILT_AMPLITUDE_DEG: f32 = 6.0;
pub const TILT_RATE: f32 = 0.7;
pub const TILT_STEP: f32 = 0.30;

/// Tunable wave parameters and the simulation clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationParams {
    pub speed: f32,
    pub amplitude: f32,
    /// Accumulated time in seconds, scaled by `speed`.
    pub time: f32,
    pub paused: bool,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            speed: DEFAULT_WAVE_SPEED,
            amplitude: DEFAULT_WAVE_AMPLITUDE,
            time: 0.0,
            paused: false,
        }
    }
}

impl AnimationParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by `delta * speed` unless paused.
    pub fn advance(&mut self, delta: f32) {
        if !self.paused {
            self.time += delta * self.speed;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Restores speed, amplitude and the clock. The pause flag is kept.
    pub fn reset(&mut self) {
        self.speed = DEFAULT_WAVE_SPEED;
        self.amplitude = DEFAULT_WAVE_AMPLITUDE;
        self.time = 0.0;
    }

    pub fn adjust_speed(&mut self, delta: f32) {
        self.speed = (self.speed + delta).max(0.0);
    }

    pub fn adjust_amplitude(&mut self, delta: f32) {
        self.amplitude = (self.amplitude + delta).max(0.0);
    }

    pub fn pendant(&self, ix: usize, iz: usize) -> PendantState {
        PendantState::at(self.time, ix, iz, self.amplitude)
    }

    /// Iterates every pendant in row-major (x, then z) order.
    pub fn pendants(&self) -> impl Iterator<Item = PendantState> + '_ {
        (0..GRID_X).flat_map(move |ix| (0..GRID_Z).map(move |iz| self.pendant(ix, iz)))
    }
}

/// Pose of a single pendant for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendantState {
    pub position: Vec3,
    pub yaw_degrees: f32,
    pub tilt_degrees: f32,
}

impl PendantState {
    pub fn at(time: f32, ix: usize, iz: usize, amplitude: f32) -> Self {
        let (fx, fz) = (ix as f32, iz as f32);
        let phase = PHASE_STEP * (fx + fz);
        let height = BASE_HEIGHT + amplitude * (time + phase).sin();
        let yaw_degrees = YAW_AMPLITUDE_DEG * (YAW_RATE * time + YAW_STEP * fx).sin();
        let tilt_degrees = TILT_AMPLITUDE_DEG * (TILT_RATE * time + TILT_STEP * fz).sin();
        let (x, z) = grid_offset(ix, iz);
        Self {
            position: Vec3::new(x, height, z),
            yaw_degrees,
            tilt_degrees,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_y(self.yaw_degrees.to_radians())
            * Mat4::from_rotation_x(self.tilt_degrees.to_radians())
            * Mat4::from_scale(Vec3::splat(PENDANT_SIZE))
    }

    /// Thin box hanging between the base plate and the pendant centre.
    ///
    /// The length is `height - 0.05` with no clamping, so very large
    /// amplitudes produce an inverted box.
    pub fn string_matrix(&self) -> Mat4 {
        let length = self.string_length();
        Mat4::from_translation(Vec3::new(self.position.x, length * 0.5, self.position.z))
            * Mat4::from_scale(Vec3::new(STRING_THICKNESS, length, STRING_THICKNESS))
    }

    pub fn string_length(&self) -> f32 {
        self.position.y - STRING_OFFSET
    }
}

/// World-space x/z of a grid cell, centred on the origin.
pub fn grid_offset(ix: usize, iz: usize) -> (f32, f32) {
    let x = (ix as f32 - (GRID_X as f32 - 1.0) * 0.5) * GRID_SPACING;
    let z = (iz as f32 - (GRID_Z as f32 - 1.0) * 0.5) * GRID_SPACING;
    (x, z)
}

pub fn base_plate_matrix() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, -PLATE_THICKNESS * 0.5, 0.0))
        * Mat4::from_scale(Vec3::new(
            GRID_X as f32 * GRID_SPACING * PLATE_COVERAGE,
            PLATE_THICKNESS,
            GRID_Z as f32 * GRID_SPACING * PLATE_COVERAGE,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-4;

    #[test]
    fn origin_cell_starts_at_base_height() {
        let state = PendantState::at(0.0, 0, 0, 0.9);
        assert!((state.position.y - 1.8).abs() < EPS);
        assert!(state.yaw_degrees.abs() < EPS);
        assert!(state.tilt_degrees.abs() < EPS);
    }

    #[test]
    fn quarter_period_reaches_crest() {
        let mut params = AnimationParams {
            speed: 1.0,
            ..AnimationParams::default()
        };
        params.advance(FRAC_PI_2);
        let state = params.pendant(0, 0);
        assert!((state.position.y - 2.7).abs() < EPS);
    }

    #[test]
    fn height_stays_within_amplitude() {
        let amplitude = 1.25;
        for step in 0..200 {
            let time = step as f32 * 0.37;
            for ix in 0..GRID_X {
                for iz in 0..GRID_Z {
                    let y = PendantState::at(time, ix, iz, amplitude).position.y;
                    assert!(y >= BASE_HEIGHT - amplitude - EPS);
                    assert!(y <= BASE_HEIGHT + amplitude + EPS);
                }
            }
        }
    }

    #[test]
    fn neighbours_are_phase_shifted() {
        let a = PendantState::at(0.0, 0, 1, 1.0);
        let b = PendantState::at(0.0, 1, 0, 1.0);
        assert!((a.position.y - b.position.y).abs() < EPS);
        assert!((a.position.y - (BASE_HEIGHT + PHASE_STEP.sin())).abs() < EPS);
    }

    #[test]
    fn grid_is_centred() {
        let (x0, z0) = grid_offset(0, 0);
        let (x1, z1) = grid_offset(GRID_X - 1, GRID_Z - 1);
        assert!((x0 + x1).abs() < EPS);
        assert!((z0 + z1).abs() < EPS);
        assert!((x0 - (-6.5 * GRID_SPACING)).abs() < EPS);
    }

    #[test]
    fn pause_freezes_clock() {
        let mut params = AnimationParams::new();
        params.advance(0.5);
        params.toggle_pause();
        let before = params.pendant(3, 7);
        params.advance(0.5);
        params.advance(2.0);
        assert_eq!(params.pendant(3, 7), before);
    }

    #[test]
    fn adjustments_are_clamped() {
        let mut params = AnimationParams::new();
        for _ in 0..100 {
            params.adjust_speed(-0.1);
            params.adjust_amplitude(-0.1);
        }
        assert_eq!(params.speed, 0.0);
        assert_eq!(params.amplitude, 0.0);
    }

    #[test]
    fn reset_keeps_pause_flag() {
        let mut params = AnimationParams {
            speed: 4.0,
            amplitude: 0.1,
            time: 50.0,
            paused: true,
        };
        params.reset();
        assert_eq!(params.time, 0.0);
        assert_eq!(params.speed, DEFAULT_WAVE_SPEED);
        assert_eq!(params.amplitude, DEFAULT_WAVE_AMPLITUDE);
        assert!(params.paused);
    }

    #[test]
    fn string_spans_plate_to_pendant() {
        let state = PendantState::at(0.0, 2, 5, 0.9);
        let string = state.string_matrix();
        let top = string.transform_point3(Vec3::new(0.0, 0.5, 0.0));
        let bottom = string.transform_point3(Vec3::new(0.0, -0.5, 0.0));
        assert!((top.y - (state.position.y - STRING_OFFSET)).abs() < EPS);
        assert!(bottom.y.abs() < EPS);
        assert!((top.x - state.position.x).abs() < EPS);
    }

    #[test]
    fn pendant_matrix_places_cube_centre() {
        let state = PendantState::at(1.3, 4, 9, 0.9);
        let centre = state.model_matrix().transform_point3(Vec3::ZERO);
        assert!((centre - state.position).length() < EPS);
    }

    #[test]
    fn iterates_every_cell() {
        assert_eq!(AnimationParams::new().pendants().count(), GRID_X * GRID_Z);
    }
}
