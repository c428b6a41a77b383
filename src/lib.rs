//! Kinetic sculpture demo: a grid of pendant cubes swaying on sine waves,
//! lit by one directional light, four point lights and a camera spotlight.
//!
//! The animation, lighting table, camera and input handling are plain data
//! and can be exercised without a window; only [`render`] touches the GPU.

pub mod animation;
pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod lighting;
pub mod render;
pub mod scene;

pub use animation::{AnimationParams, PendantState};
pub use app::{AppState, FrameClock, Playback};
pub use camera::{Camera, Movement};
pub use config::AssetRoot;
pub use error::StartupError;
pub use input::{EdgeTrigger, InputEvent, InputState, KeyCode, NamedKey};
pub use lighting::{LightingConfig, LightingError};
pub use render::{CameraParams, Renderer};
pub use scene::FrameScene;
