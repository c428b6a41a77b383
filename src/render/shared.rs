use glam::{Mat4, Vec3};

use crate::camera::Camera;

/// Camera parameters consumed by the renderer's uniform buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraParams {
    pub view_proj: Mat4,
    pub position: Vec3,
}

impl CameraParams {
    pub fn from_camera(camera: &Camera, aspect: f32) -> Self {
        Self {
            view_proj: camera.projection_matrix(aspect) * camera.view_matrix(),
            position: camera.position,
        }
    }
}
