use std::mem::size_of;

use wgpu::util::DeviceExt;

/// Floats per vertex: position.xyz, normal.xyz, uv.
pub const CUBE_VERTEX_STRIDE: usize = 8;
pub const CUBE_VERTEX_COUNT: u32 = 36;

/// Unit cube centred on the origin as a plain triangle list.
#[rustfmt::skip]
pub const CUBE_VERTICES: [f32; CUBE_VERTEX_STRIDE * CUBE_VERTEX_COUNT as usize] = [
    // back
    -0.5, -0.5, -0.5,   0.0,  0.0, -1.0,   0.0, 0.0,
     0.5, -0.5, -0.5,   0.0,  0.0, -1.0,   1.0, 0.0,
     0.5,  0.5, -0.5,   0.0,  0.0, -1.0,   1.0, 1.0,
     0.5,  0.5, -0.5,   0.0,  0.0, -1.0,   1.0, 1.0,
    -0.5,  0.5, -0.5,   0.0,  0.0, -1.0,   0.0, 1.0,
    -0.5, -0.5, -0.5,   0.0,  0.0, -1.0,   0.0, 0.0,
    // front
    -0.5, -0.5,  0.5,   0.0,  0.0,  1.0,   0.0, 0.0,
     0.5, -0.5,  0.5,   0.0,  0.0,  1.0,   1.0, 0.0,
     0.5,  0.5,  0.5,   0.0,  0.0,  1.0,   1.0, 1.0,
     0.5,  0.5,  0.5,   0.0,  0.0,  1.0,   1.0, 1.0,
    -0.5,  0.5,  0.5,   0.0,  0.0,  1.0,   0.0, 1.0,
    -0.5, -0.5,  0.5,   0.0,  0.0,  1.0,   0.0, 0.0,
    // left
    -0.5,  0.5,  0.5,  -1.0,  0.0,  0.0,   1.0, 0.0,
    -0.5,  0.5, -0.5,  -1.0,  0.0,  0.0,   1.0, 1.0,
    -0.5, -0.5, -0.5,  -1.0,  0.0,  0.0,   0.0, 1.0,
    -0.5, -0.5, -0.5,  -1.0,  0.0,  0.0,   0.0, 1.0,
    -0.5, -0.5,  0.5,  -1.0,  0.0,  0.0,   0.0, 0.0,
    -0.5,  0.5,  0.5,  -1.0,  0.0,  0.0,   1.0, 0.0,
    // right
     0.5,  0.5,  0.5,   1.0,  0.0,  0.0,   1.0, 0.0,
     0.5,  0.5, -0.5,   1.0,  0.0,  0.0,   1.0, 1.0,
     0.5, -0.5, -0.5,   1.0,  0.0,  0.0,   0.0, 1.0,
     0.5, -0.5, -0.5,   1.0,  0.0,  0.0,   0.0, 1.0,
     0.5, -0.5,  0.5,   1.0,  0.0,  0.0,   0.0, 0.0,
     0.5,  0.5,  0.5,   1.0,  0.0,  0.0,   1.0, 0.0,
    // bottom
    -0.5, -0.5, -0.5,   0.0, -1.0,  0.0,   0.0, 1.0,
     0.5, -0.5, -0.5,   0.0, -1.0,  0.0,   1.0, 1.0,
     0.5, -0.5,  0.5,   0.0, -1.0,  0.0,   1.0, 0.0,
     0.5, -0.5,  0.5,   0.0, -1.0,  0.0,   1.0, 0.0,
    -0.5, -0.5,  0.5,   0.0, -1.0,  0.0,   0.0, 0.0,
    -0.5, -0.5, -0.5,   0.0, -1.0,  0.0,   0.0, 1.0,
    // top
    -0.5,  0.5, -0.5,   0.0,  1.0,  0.0,   0.0, 1.0,
     0.5,  0.5, -0.5,   0.0,  1.0,  0.0,   1.0, 1.0,
     0.5,  0.5,  0.5,   0.0,  1.0,  0.0,   1.0, 0.0,
     0.5,  0.5,  0.5,   0.0,  1.0,  0.0,   1.0, 0.0,
    -0.5,  0.5,  0.5,   0.0,  1.0,  0.0,   0.0, 0.0,
    -0.5,  0.5, -0.5,   0.0,  1.0,  0.0,   0.0, 1.0,
];

const FLOAT: u64 = size_of::<f32>() as u64;

/// Layout used by the lit pipeline: position, normal, uv.
pub const LIT_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 3 * FLOAT,
        shader_location: 1,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 6 * FLOAT,
        shader_location: 2,
    },
];

/// Marker cubes only read the position from the shared buffer.
pub const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x3,
    offset: 0,
    shader_location: 0,
}];

pub fn vertex_layout(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'_> {
    wgpu::VertexBufferLayout {
        array_stride: CUBE_VERTEX_STRIDE as u64 * FLOAT,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

/// Cube vertex buffer shared by every draw.
pub struct CubeMesh {
    pub vertex: wgpu::Buffer,
    pub vertex_count: u32,
}

impl CubeMesh {
    pub fn upload(device: &wgpu::Device) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube-vertices"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            vertex,
            vertex_count: CUBE_VERTEX_COUNT,
        }
    }
}
