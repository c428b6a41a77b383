use std::mem::size_of;
use std::sync::Arc;

use anyhow::Result;
use bytemuck::bytes_of;
use log::{info, warn};
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::config::{
    AssetRoot, CLEAR_COLOR, DIFFUSE_TEXTURE, LIGHTING_SHADER, MARKER_SHADER, SPECULAR_TEXTURE,
};
use crate::error::StartupError;
use crate::lighting::LightingConfig;
use crate::render::mesh::{self, CubeMesh, LIT_ATTRIBUTES, POSITION_ATTRIBUTES};
use crate::render::shader;
use crate::render::texture::{self, GpuTexture, TextureImage};
use crate::render::uniforms::{align_to, GlobalUniform, ObjectConstants};
use crate::render::CameraParams;
use crate::scene::FrameScene;

/// Forward renderer drawing the sculpture with wgpu.
pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth: DepthBuffer,
    lit_pipeline: wgpu::RenderPipeline,
    marker_pipeline: wgpu::RenderPipeline,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    objects: ObjectBuffer,
    material_bind_group: wgpu::BindGroup,
    cube: CubeMesh,
    _diffuse: GpuTexture,
    _specular: GpuTexture,
}

impl Renderer {
    /// Initializes the GPU, loads shaders and textures and builds both pipelines.
    pub async fn new(window: Arc<Window>, assets: &AssetRoot) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: Default::default(),
            backend_options: Default::default(),
        });
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|err| StartupError::gpu("surface", err))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| StartupError::gpu("adapter", err))?;
        info!("using GPU adapter {}", adapter.get_info().name);

        let device_descriptor = wgpu::DeviceDescriptor {
            label: Some("sculpture-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: Default::default(),
            memory_hints: Default::default(),
            trace: Default::default(),
        };
        let (device, queue) = adapter
            .request_device(&device_descriptor)
            .await
            .map_err(|err| StartupError::gpu("device", err))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| StartupError::gpu("surface", "no supported surface formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);

        let lit_source = shader::read_wgsl(&assets.resolve(LIGHTING_SHADER))?;
        let marker_source = shader::read_wgsl(&assets.resolve(MARKER_SHADER))?;
        let lit_shader = shader::create_module(&device, "lighting-shader", &lit_source);
        let marker_shader = shader::create_module(&device, "marker-shader", &marker_source);

        let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("global-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(size_of::<GlobalUniform>() as u64),
                },
                count: None,
            }],
        });

        // Per-object uniforms share one buffer, selected by dynamic offset.
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(size_of::<ObjectConstants>() as u64),
                },
                count: None,
            }],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material-bind-layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global-uniform"),
            size: size_of::<GlobalUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global-bind-group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        let objects = ObjectBuffer::new(&device, object_layout, FrameScene::OBJECT_COUNT);

        let diffuse = GpuTexture::upload(
            &device,
            &queue,
            &TextureImage::load_or_placeholder(&assets.resolve(DIFFUSE_TEXTURE)),
            wgpu::TextureFormat::Rgba8UnormSrgb,
            "diffuse-map",
        );
        let specular = GpuTexture::upload(
            &device,
            &queue,
            &TextureImage::load_or_placeholder(&assets.resolve(SPECULAR_TEXTURE)),
            wgpu::TextureFormat::Rgba8Unorm,
            "specular-map",
        );
        let sampler = texture::create_sampler(&device);
        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material-bind-group"),
            layout: &material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&specular.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let lit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lighting-pipeline-layout"),
            bind_group_layouts: &[&global_layout, &objects.layout, &material_layout],
            push_constant_ranges: &[],
        });
        let marker_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("marker-pipeline-layout"),
            bind_group_layouts: &[&global_layout, &objects.layout],
            push_constant_ranges: &[],
        });

        let lit_pipeline = create_pipeline(
            &device,
            "lighting-pipeline",
            &lit_layout,
            &lit_shader,
            mesh::vertex_layout(&LIT_ATTRIBUTES),
            surface_format,
        );
        let marker_pipeline = create_pipeline(
            &device,
            "marker-pipeline",
            &marker_layout,
            &marker_shader,
            mesh::vertex_layout(&POSITION_ATTRIBUTES),
            surface_format,
        );

        let cube = CubeMesh::upload(&device);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            depth,
            lit_pipeline,
            marker_pipeline,
            global_buffer,
            global_bind_group,
            objects,
            material_bind_group,
            cube,
            _diffuse: diffuse,
            _specular: specular,
        })
    }

    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Reconfigures the swap chain and depth buffer.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    /// Uploads camera and the full lighting table. Called every frame.
    pub fn update_globals(&self, camera: &CameraParams, lighting: &LightingConfig) {
        let uniform = GlobalUniform::new(camera, lighting);
        self.queue
            .write_buffer(&self.global_buffer, 0, bytes_of(&uniform));
    }

    /// Draws the base plate, pendants, strings and light markers.
    pub fn render(&mut self, scene: &FrameScene) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sculpture-encoder"),
            });

        self.objects
            .write(&self.device, &self.queue, scene.lit.iter().chain(&scene.markers));

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("main-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: CLEAR_COLOR[0],
                        g: CLEAR_COLOR[1],
                        b: CLEAR_COLOR[2],
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_vertex_buffer(0, self.cube.vertex.slice(..));

        pass.set_pipeline(&self.lit_pipeline);
        pass.set_bind_group(0, &self.global_bind_group, &[]);
        pass.set_bind_group(2, &self.material_bind_group, &[]);
        for index in 0..scene.lit.len() {
            pass.set_bind_group(1, &self.objects.bind_group, &[self.objects.offset(index)]);
            pass.draw(0..self.cube.vertex_count, 0..1);
        }

        pass.set_pipeline(&self.marker_pipeline);
        pass.set_bind_group(0, &self.global_bind_group, &[]);
        for index in scene.lit.len()..scene.object_count() {
            pass.set_bind_group(1, &self.objects.bind_group, &[self.objects.offset(index)]);
            pass.draw(0..self.cube.vertex_count, 0..1);
        }

        drop(pass);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Per-object constants packed at `stride` intervals in a single buffer.
struct ObjectBuffer {
    layout: wgpu::BindGroupLayout,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: usize,
    staging: Vec<u8>,
}

impl ObjectBuffer {
    fn new(device: &wgpu::Device, layout: wgpu::BindGroupLayout, capacity: usize) -> Self {
        let stride = align_to(
            size_of::<ObjectConstants>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let (buffer, bind_group) = Self::allocate(device, &layout, stride, capacity);
        Self {
            layout,
            buffer,
            bind_group,
            stride,
            capacity,
            staging: Vec::new(),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object-uniforms"),
            size: stride * capacity.max(1) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object-bind-group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(size_of::<ObjectConstants>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn offset(&self, index: usize) -> wgpu::DynamicOffset {
        (index as u64 * self.stride) as wgpu::DynamicOffset
    }

    fn write<'a>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        models: impl Iterator<Item = &'a glam::Mat4>,
    ) {
        self.staging.clear();
        let stride = self.stride as usize;
        let mut count = 0;
        for model in models {
            let start = count * stride;
            self.staging.resize(start + stride, 0);
            let constants = ObjectConstants::from_model(*model);
            self.staging[start..start + size_of::<ObjectConstants>()]
                .copy_from_slice(bytes_of(&constants));
            count += 1;
        }
        if count > self.capacity {
            warn!(
                "growing object buffer from {} to {count} entries",
                self.capacity
            );
            let (buffer, bind_group) = Self::allocate(device, &self.layout, self.stride, count);
            self.buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = count;
        }
        if !self.staging.is_empty() {
            queue.write_buffer(&self.buffer, 0, &self.staging);
        }
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vertex_layout: wgpu::VertexBufferLayout<'_>,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[vertex_layout],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
        cache: None,
    })
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Surface errors worth surfacing to the frame loop.
pub fn surface_error_is_fatal(err: &wgpu::SurfaceError) -> bool {
    matches!(err, wgpu::SurfaceError::OutOfMemory)
}

/// Reconfiguring the surface recovers from these.
pub fn surface_error_needs_resize(err: &wgpu::SurfaceError) -> bool {
    matches!(
        err,
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_surface_errors() {
        assert!(surface_error_is_fatal(&wgpu::SurfaceError::OutOfMemory));
        assert!(!surface_error_is_fatal(&wgpu::SurfaceError::Timeout));
        assert!(surface_error_needs_resize(&wgpu::SurfaceError::Lost));
        assert!(surface_error_needs_resize(&wgpu::SurfaceError::Outdated));
        assert!(!surface_error_needs_resize(&wgpu::SurfaceError::Timeout));
    }
}
