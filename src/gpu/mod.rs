//! wgpu implementation of [`RenderBackend`].
//!
//! One static vertex buffer holds the triangle. Per-draw parameters live in a
//! single uniform buffer, one aligned slot per draw, selected with a dynamic
//! offset. The slots are rewritten every frame and the buffer only grows.

use std::sync::Arc;

use tracing::{debug, info};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::backend::RenderBackend;
use crate::error::GpuError;
use crate::shader::{self, ParticleUniforms, SHADER_SOURCE, TRIANGLE_VERTICES};

const INITIAL_UNIFORM_SLOTS: usize = 256;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

/// Round `size` up to a multiple of `alignment`.
fn align_to(size: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        return size;
    }
    size.div_ceil(alignment) * alignment
}

pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    /// Bytes between two uniform slots.
    uniform_stride: u64,
    /// Slots the uniform buffer can hold.
    uniform_slots: usize,
    clear_color: wgpu::Color,
    /// Parameters for the next draw.
    current: ParticleUniforms,
    /// Draws recorded since the last clear.
    frame: Vec<ParticleUniforms>,
    staging: Vec<u8>,
}

impl GpuRenderer {
    /// Create the surface, device and particle pipeline for `window`.
    ///
    /// Fails if no adapter fits the surface or if the shader program does not
    /// validate. Nothing is drawn until this succeeds.
    pub async fn new(window: Arc<Window>, clear_color: [f32; 4]) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            "GPU adapter selected"
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoAdapter)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Triangle Vertex Buffer"),
            contents: bytemuck::cast_slice(&TRIANGLE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_stride = align_to(
            ParticleUniforms::SIZE,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Particle Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(ParticleUniforms::SIZE),
                    },
                    count: None,
                }],
            });

        let (uniform_buffer, uniform_bind_group) = create_uniform_slots(
            &device,
            &uniform_bind_group_layout,
            uniform_stride,
            INITIAL_UNIFORM_SLOTS,
        );

        // A bad program must surface here, not as a blank window later.
        shader::validate()?;
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let render_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Particle Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &render_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &render_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = device.pop_error_scope().await {
            return Err(GpuError::ShaderCompilation {
                stage: "Pipeline",
                message: err.to_string(),
            });
        }

        let [r, g, b, a] = clear_color.map(f64::from);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            uniform_bind_group_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            uniform_slots: INITIAL_UNIFORM_SLOTS,
            clear_color: wgpu::Color { r, g, b, a },
            current: ParticleUniforms::default(),
            frame: Vec::new(),
            staging: Vec::new(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size, e.g. after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Draws recorded for the current frame.
    pub fn pending_draws(&self) -> usize {
        self.frame.len()
    }

    /// Grow the uniform buffer so it can hold `draws` slots.
    fn reserve_slots(&mut self, draws: usize) {
        if draws <= self.uniform_slots {
            return;
        }
        let slots = draws.next_power_of_two();
        let (buffer, bind_group) = create_uniform_slots(
            &self.device,
            &self.uniform_bind_group_layout,
            self.uniform_stride,
            slots,
        );
        debug!(from = self.uniform_slots, to = slots, "grew particle uniform buffer");
        self.uniform_buffer = buffer;
        self.uniform_bind_group = bind_group;
        self.uniform_slots = slots;
    }

    /// Submit the recorded frame and present it.
    pub fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.reserve_slots(self.frame.len());

        if !self.frame.is_empty() {
            let stride = self.uniform_stride as usize;
            self.staging.clear();
            self.staging.resize(self.frame.len() * stride, 0);
            for (slot, uniforms) in self.staging.chunks_exact_mut(stride).zip(&self.frame) {
                slot[..ParticleUniforms::SIZE as usize].copy_from_slice(bytemuck::bytes_of(uniforms));
            }
            self.queue.write_buffer(&self.uniform_buffer, 0, &self.staging);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Particle Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            for slot in 0..self.frame.len() {
                let offset = (slot as u64 * self.uniform_stride) as u32;
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                render_pass.draw(0..TRIANGLE_VERTICES.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl RenderBackend for GpuRenderer {
    fn clear_frame(&mut self) {
        self.frame.clear();
    }

    fn set_uniforms(&mut self, uniforms: &ParticleUniforms) {
        self.current = *uniforms;
    }

    fn draw_triangle(&mut self) {
        self.frame.push(self.current);
    }
}

fn create_uniform_slots(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    slots: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Particle Uniform Buffer"),
        size: stride * slots as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Particle Uniform Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(ParticleUniforms::SIZE),
            }),
        }],
    });

    (buffer, bind_group)
}
