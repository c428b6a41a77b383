use glam::Vec3;
use thiserror::Error;

pub const POINT_LIGHT_COUNT: usize = 4;
pub const MATERIAL_SHININESS: f32 = 32.0;

/// Point lights hang at the four corners above the grid.
pub const POINT_LIGHT_POSITIONS: [Vec3; POINT_LIGHT_COUNT] = [
    Vec3::new(7.0, 7.5, 7.0),
    Vec3::new(-7.0, 7.5, 7.0),
    Vec3::new(7.0, 7.5, -7.0),
    Vec3::new(-7.0, 7.5, -7.0),
];

/// Distance falloff `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// Falloff covering roughly 50 units.
    pub const MEDIUM_RANGE: Self = Self {
        constant: 1.0,
        linear: 0.09,
        quadratic: 0.032,
    };

    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
}

/// Cone light; cutoffs are stored as cosines of the half-angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
    pub inner_cutoff: f32,
    pub outer_cutoff: f32,
}

#[derive(Debug, Error, PartialEq)]
pub enum LightingError {
    #[error("{light} has a non-positive constant attenuation term ({constant})")]
    NonPositiveAttenuation { light: String, constant: f32 },
    #[error("spotlight outer cutoff cosine ({outer}) exceeds inner cutoff cosine ({inner})")]
    InvertedCutoff { inner: f32, outer: f32 },
}

/// Fixed light table uploaded every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingConfig {
    pub directional: DirectionalLight,
    pub point_lights: [PointLight; POINT_LIGHT_COUNT],
    pub spot: SpotLight,
    pub shininess: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self::kinetic()
    }
}

impl LightingConfig {
    /// Dim grey sun, four white corner lights and a white camera flashlight.
    pub fn kinetic() -> Self {
        let directional = DirectionalLight {
            direction: Vec3::new(-0.2, -1.0, -0.3),
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::splat(0.35),
            specular: Vec3::splat(0.20),
        };
        let point_lights = POINT_LIGHT_POSITIONS.map(|position| PointLight {
            position,
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
            attenuation: Attenuation::MEDIUM_RANGE,
        });
        let spot = SpotLight {
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            ambient: Vec3::ZERO,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            attenuation: Attenuation::MEDIUM_RANGE,
            inner_cutoff: 12.5_f32.to_radians().cos(),
            outer_cutoff: 15.0_f32.to_radians().cos(),
        };
        Self {
            directional,
            point_lights,
            spot,
            shininess: MATERIAL_SHININESS,
        }
    }

    /// Copy of the table with the spotlight mounted on the camera.
    pub fn bound_to_camera(&self, position: Vec3, front: Vec3) -> Self {
        let mut lighting = *self;
        lighting.spot.position = position;
        lighting.spot.direction = front;
        lighting
    }

    pub fn validate(&self) -> Result<(), LightingError> {
        for (index, light) in self.point_lights.iter().enumerate() {
            check_attenuation(&format!("point light {index}"), &light.attenuation)?;
        }
        check_attenuation("spotlight", &self.spot.attenuation)?;
        if self.spot.outer_cutoff > self.spot.inner_cutoff {
            return Err(LightingError::InvertedCutoff {
                inner: self.spot.inner_cutoff,
                outer: self.spot.outer_cutoff,
            });
        }
        Ok(())
    }
}

fn check_attenuation(light: &str, attenuation: &Attenuation) -> Result<(), LightingError> {
    if attenuation.constant > 0.0 {
        Ok(())
    } else {
        Err(LightingError::NonPositiveAttenuation {
            light: light.to_string(),
            constant: attenuation.constant,
        })
    }
}
