//! Uniform buffer layouts shared with the WGSL shaders.
//!
//! Every `vec3` on the shader side is widened to `vec4` so the Rust structs
//! match WGSL's 16-byte alignment without explicit padding fields.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

use crate::lighting::{
    Attenuation, DirectionalLight, LightingConfig, PointLight, SpotLight, POINT_LIGHT_COUNT,
};
use crate::render::CameraParams;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DirLightUniform {
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// constant, linear, quadratic, unused
    pub attenuation: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SpotLightUniform {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub attenuation: [f32; 4],
    /// inner cosine, outer cosine, unused, unused
    pub cutoff: [f32; 4],
}

/// Group 0: camera and the whole lighting table.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    /// shininess, unused, unused, unused
    pub material: [f32; 4],
    pub dir_light: DirLightUniform,
    pub point_lights: [PointLightUniform; POINT_LIGHT_COUNT],
    pub spot_light: SpotLightUniform,
}

impl GlobalUniform {
    pub fn new(camera: &CameraParams, lighting: &LightingConfig) -> Self {
        Self {
            view_proj: camera.view_proj.to_cols_array_2d(),
            view_position: camera.position.extend(1.0).into(),
            material: [lighting.shininess, 0.0, 0.0, 0.0],
            dir_light: DirLightUniform::from(&lighting.directional),
            point_lights: lighting.point_lights.map(|light| PointLightUniform::from(&light)),
            spot_light: SpotLightUniform::from(&lighting.spot),
        }
    }
}

/// Group 1: per-object transform, bound with a dynamic offset.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectConstants {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
}

impl ObjectConstants {
    pub fn from_model(model: Mat4) -> Self {
        let normal = Mat3::from_mat4(model).inverse().transpose();
        Self {
            model: model.to_cols_array_2d(),
            normal: mat3_to_3x4(normal),
        }
    }
}

impl From<&DirectionalLight> for DirLightUniform {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            direction: light.direction.extend(0.0).into(),
            ambient: rgb(light.ambient),
            diffuse: rgb(light.diffuse),
            specular: rgb(light.specular),
        }
    }
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.extend(1.0).into(),
            ambient: rgb(light.ambient),
            diffuse: rgb(light.diffuse),
            specular: rgb(light.specular),
            attenuation: attenuation(&light.attenuation),
        }
    }
}

impl From<&SpotLight> for SpotLightUniform {
    fn from(light: &SpotLight) -> Self {
        Self {
            position: light.position.extend(1.0).into(),
            direction: light.direction.extend(0.0).into(),
            ambient: rgb(light.ambient),
            diffuse: rgb(light.diffuse),
            specular: rgb(light.specular),
            attenuation: attenuation(&light.attenuation),
            cutoff: [light.inner_cutoff, light.outer_cutoff, 0.0, 0.0],
        }
    }
}

fn rgb(color: Vec3) -> [f32; 4] {
    color.extend(1.0).into()
}

fn attenuation(attenuation: &Attenuation) -> [f32; 4] {
    [
        attenuation.constant,
        attenuation.linear,
        attenuation.quadratic,
        0.0,
    ]
}

fn mat3_to_3x4(matrix: Mat3) -> [[f32; 4]; 3] {
    let cols = matrix.to_cols_array();
    [
        [cols[0], cols[1], cols[2], 0.0],
        [cols[3], cols[4], cols[5], 0.0],
        [cols[6], cols[7], cols[8], 0.0],
    ]
}

/// Rounds `size` up to the next multiple of `alignment`.
pub fn align_to(size: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        return size;
    }
    size.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn layouts_match_wgsl_sizes() {
        assert_eq!(size_of::<DirLightUniform>(), 64);
        assert_eq!(size_of::<PointLightUniform>(), 80);
        assert_eq!(size_of::<SpotLightUniform>(), 112);
        assert_eq!(size_of::<ObjectConstants>(), 112);
        assert_eq!(size_of::<GlobalUniform>(), 64 + 16 + 16 + 64 + 4 * 80 + 112);
        assert_eq!(size_of::<GlobalUniform>() % 16, 0);
    }

    #[test]
    fn packs_lighting_table() {
        let camera = CameraParams {
            view_proj: Mat4::IDENTITY,
            position: Vec3::new(0.0, 4.0, 18.0),
        };
        let lighting = LightingConfig::kinetic().bound_to_camera(camera.position, Vec3::NEG_Z);
        let uniform = GlobalUniform::new(&camera, &lighting);
        assert_eq!(uniform.material[0], 32.0);
        assert_eq!(uniform.view_position, [0.0, 4.0, 18.0, 1.0]);
        assert_eq!(uniform.point_lights[1].position, [-7.0, 7.5, 7.0, 1.0]);
        assert_eq!(uniform.point_lights[3].attenuation, [1.0, 0.09, 0.032, 0.0]);
        assert_eq!(uniform.spot_light.position, [0.0, 4.0, 18.0, 1.0]);
        assert_eq!(uniform.spot_light.direction, [0.0, 0.0, -1.0, 0.0]);
        assert!(uniform.spot_light.cutoff[0] > uniform.spot_light.cutoff[1]);
        assert_eq!(uniform.dir_light.direction, [-0.2, -1.0, -0.3, 0.0]);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let constants = ObjectConstants::from_model(Mat4::from_scale(Vec3::new(2.0, 4.0, 1.0)));
        assert_eq!(constants.normal[0][0], 0.5);
        assert_eq!(constants.normal[1][1], 0.25);
        assert_eq!(constants.normal[2][2], 1.0);
    }

    #[test]
    fn aligns_object_stride() {
        assert_eq!(align_to(112, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(300, 256), 512);
        assert_eq!(align_to(112, 0), 112);
    }
}
