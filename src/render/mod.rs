pub mod mesh;
pub mod renderer;
pub mod shader;
pub mod shared;
pub mod texture;
pub mod uniforms;

pub use renderer::Renderer;
pub use shared::CameraParams;
