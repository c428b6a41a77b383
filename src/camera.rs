use glam::{Mat4, Vec3};

use crate::config::{FAR_PLANE, NEAR_PLANE};

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_MOVE_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_ZOOM: f32 = 45.0;
pub const PITCH_LIMIT: f32 = 89.0;
pub const MIN_ZOOM: f32 = 1.0;

/// Where the viewer starts: above and in front of the grid.
pub const START_POSITION: Vec3 = Vec3::new(0.0, 4.0, 18.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-fly camera driven by yaw/pitch Euler angles.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    pub move_speed: f32,
    pub sensitivity: f32,
    zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(START_POSITION)
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            move_speed: DEFAULT_MOVE_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect.max(0.01), NEAR_PLANE, FAR_PLANE)
    }

    pub fn process_keyboard(&mut self, direction: Movement, delta: f32) {
        let velocity = self.move_speed * delta;
        match direction {
            Movement::Forward => self.position += self.front * velocity,
            Movement::Backward => self.position -= self.front * velocity,
            Movement::Left => self.position -= self.right * velocity,
            Movement::Right => self.position += self.right * velocity,
        }
    }

    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.sensitivity;
        self.pitch = (self.pitch + y_offset * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, DEFAULT_ZOOM);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert!((camera.front() - Vec3::NEG_Z).length() < EPS);
        assert!((camera.right() - Vec3::X).length() < EPS);
        assert!((camera.up() - Vec3::Y).length() < EPS);
        assert_eq!(camera.position, START_POSITION);
    }

    #[test]
    fn keyboard_moves_along_basis() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_keyboard(Movement::Forward, 2.0);
        assert!((camera.position - Vec3::new(0.0, 0.0, -5.0)).length() < EPS);
        camera.process_keyboard(Movement::Right, 1.0);
        assert!((camera.position - Vec3::new(2.5, 0.0, -5.0)).length() < EPS);
        camera.process_keyboard(Movement::Backward, 2.0);
        camera.process_keyboard(Movement::Left, 1.0);
        assert!(camera.position.length() < EPS);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 10_000.0);
        assert_eq!(camera.pitch(), PITCH_LIMIT);
        camera.process_mouse_movement(0.0, -100_000.0);
        assert_eq!(camera.pitch(), -PITCH_LIMIT);
        assert!(camera.front().is_normalized());
    }

    #[test]
    fn mouse_turns_yaw_by_sensitivity() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(900.0, 0.0);
        assert!((camera.yaw() - 0.0).abs() < 1e-3);
        assert!((camera.front() - Vec3::X).length() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom(), MIN_ZOOM);
        camera.process_mouse_scroll(-100.0);
        assert_eq!(camera.zoom(), DEFAULT_ZOOM);
    }

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let camera = Camera::default();
        let eye = camera.view_matrix().transform_point3(camera.position);
        assert!(eye.length() < 1e-4);
    }
}
