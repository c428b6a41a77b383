use std::env;
use std::path::{Path, PathBuf};

// Window
pub const WINDOW_TITLE: &str = "Kinetic Sculpture - Multiple Lights";
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;
pub const CLEAR_COLOR: [f64; 3] = [0.06, 0.07, 0.09];

// Pendant grid
pub const GRID_X: usize = 14;
pub const GRID_Z: usize = 14;
pub const GRID_SPACING: f32 = 1.3;
pub const BASE_HEIGHT: f32 = 1.8;
pub const PENDANT_SIZE: f32 = 0.5;
pub const STRING_THICKNESS: f32 = 0.06;
pub const STRING_OFFSET: f32 = 0.05;
pub const PLATE_THICKNESS: f32 = 0.1;
/// Fraction of the grid footprint covered by the base plate.
pub const PLATE_COVERAGE: f32 = 0.9;
pub const LIGHT_MARKER_SIZE: f32 = 0.25;

// Animation tuning
pub const DEFAULT_WAVE_SPEED: f32 = 1.6;
pub const DEFAULT_WAVE_AMPLITUDE: f32 = 0.9;
/// Units per second applied while a tuning key is held.
pub const TUNING_RATE: f32 = 0.8;

// Projection
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 200.0;

// Assets, relative to the asset root.
pub const LIGHTING_SHADER: &str = "shaders/multiple_lights.wgsl";
pub const MARKER_SHADER: &str = "shaders/light_cube.wgsl";
pub const DIFFUSE_TEXTURE: &str = "resources/textures/container2.png";
pub const SPECULAR_TEXTURE: &str = "resources/textures/container2_specular.png";

/// Environment variable overriding the directory assets are resolved from.
pub const ASSET_ROOT_ENV: &str = "KINETIC_SCULPTURE_ROOT";

/// Resolves asset paths relative to a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoot {
    root: PathBuf,
}

impl AssetRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses `KINETIC_SCULPTURE_ROOT` when set and non-empty, otherwise the
    /// directory the crate was built from.
    pub fn from_env() -> Self {
        Self::from_override(env::var_os(ASSET_ROOT_ENV).map(PathBuf::from))
    }

    fn from_override(value: Option<PathBuf>) -> Self {
        match value {
            Some(path) if !path.as_os_str().is_empty() => Self::new(path),
            _ => Self::new(env!("CARGO_MANIFEST_DIR")),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_to_root() {
        let root = AssetRoot::new("/opt/sculpture");
        assert_eq!(
            root.resolve(DIFFUSE_TEXTURE),
            Path::new("/opt/sculpture/resources/textures/container2.png")
        );
    }

    #[test]
    fn empty_override_falls_back_to_manifest_dir() {
        let root = AssetRoot::from_override(Some(PathBuf::new()));
        assert_eq!(root.root(), Path::new(env!("CARGO_MANIFEST_DIR")));
        let root = AssetRoot::from_override(None);
        assert_eq!(root.root(), Path::new(env!("CARGO_MANIFEST_DIR")));
    }

    #[test]
    fn override_is_used_verbatim() {
        let root = AssetRoot::from_override(Some(PathBuf::from("assets")));
        assert_eq!(root.resolve(LIGHTING_SHADER), Path::new("assets/shaders/multiple_lights.wgsl"));
    }

    #[test]
    fn shipped_shaders_exist() {
        let root = AssetRoot::new(env!("CARGO_MANIFEST_DIR"));
        assert!(root.resolve(LIGHTING_SHADER).is_file());
        assert!(root.resolve(MARKER_SHADER).is_file());
    }
}
