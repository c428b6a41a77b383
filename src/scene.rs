use glam::{Mat4, Vec3};

use crate::animation::{base_plate_matrix, AnimationParams};
use crate::config::{GRID_X, GRID_Z, LIGHT_MARKER_SIZE};
use crate::lighting::{LightingConfig, POINT_LIGHT_COUNT};

/// Draw list for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameScene {
    /// Textured, lit geometry: base plate, then each pendant followed by its string.
    pub lit: Vec<Mat4>,
    /// Unlit cubes marking the point light positions.
    pub markers: Vec<Mat4>,
}

impl FrameScene {
    /// Number of objects drawn every frame.
    pub const OBJECT_COUNT: usize = 1 + GRID_X * GRID_Z * 2 + POINT_LIGHT_COUNT;

    pub fn compose(animation: &AnimationParams, lighting: &LightingConfig) -> Self {
        let mut lit = Vec::with_capacity(1 + GRID_X * GRID_Z * 2);
        lit.push(base_plate_matrix());
        for pendant in animation.pendants() {
            lit.push(pendant.model_matrix());
            lit.push(pendant.string_matrix());
        }

        let markers = lighting
            .point_lights
            .iter()
            .map(|light| {
                Mat4::from_translation(light.position)
                    * Mat4::from_scale(Vec3::splat(LIGHT_MARKER_SIZE))
            })
            .collect();

        Self { lit, markers }
    }

    pub fn object_count(&self) -> usize {
        self.lit.len() + self.markers.len()
    }
}
