//! Instanced renderer for antialiased segments and dots.

use std::mem;

use anyhow::{anyhow, bail};
use bytemuck::NoUninit;
use wgpu::{
    Adapter, Backends, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, BlendState,
    Buffer, BufferBindingType, BufferDescriptor, BufferUsages, Color, ColorTargetState,
    ColorWrites, CommandEncoder, Device, DeviceDescriptor, FragmentState, InstanceDescriptor,
    LoadOp, MemoryHints, MultisampleState, Operations, PipelineCompilationOptions,
    PipelineLayoutDescriptor, PrimitiveState, PrimitiveTopology, Queue, RenderPass,
    RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor,
    RequestAdapterOptions, ShaderModuleDescriptor, ShaderSource, ShaderStages, Surface,
    Texture, TextureFormat, VertexState,
};

use crate::math::{vec2, Vec2f, Vec2u};

pub fn create_instance() -> wgpu::Instance {
    wgpu::Instance::new(&InstanceDescriptor {
        backends: Backends::PRIMARY,
        ..Default::default()
    })
}

pub struct Gpu {
    adapter: Adapter,
    device: Device,
    queue: Queue,
    /// Format of the window surfaces, used as the format of every render target.
    format: TextureFormat,

    render_pipeline: RenderPipeline,
    uniforms_bgl: BindGroupLayout,
    instances_bgl: BindGroupLayout,
}

impl Gpu {
    /// Opens a device that can present to `surface` (and to other surfaces of the same kind).
    pub fn new(instance: &wgpu::Instance, surface: &Surface<'_>) -> anyhow::Result<Self> {
        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
            compatible_surface: Some(surface),
            ..Default::default()
        }))
        .map_err(|e| anyhow!("failed to find a supported graphics adapter: {e}"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&DeviceDescriptor {
            label: Some("surface-sketch"),
            memory_hints: MemoryHints::MemoryUsage,
            ..Default::default()
        }))?;

        let caps = surface.get_capabilities(&adapter);
        let Some(&format) = caps.formats.first() else {
            bail!("adapter '{}' cannot present to the window", adapter.get_info().name);
        };

        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("shader"),
            source: ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let uniforms_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("uniforms"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                count: None,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
            }],
        });
        let instances_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("instances"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                count: None,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
            }],
        });

        let render_pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("main_render_pipeline"),
            layout: Some(&device.create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("main_render_pipeline"),
                bind_group_layouts: &[&uniforms_bgl, &instances_bgl],
                ..Default::default()
            })),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &[],
            },
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                targets: &[Some(ColorTargetState {
                    format,
                    blend: Some(BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: ColorWrites::all(),
                })],
            }),
            multiview: None,
            cache: None,
        });

        log::debug!(
            "using adapter '{}' ({:?}), surface format {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            format,
        );

        Ok(Gpu {
            adapter,
            device,
            queue,
            format,
            render_pipeline,
            uniforms_bgl,
            instances_bgl,
        })
    }

    /// Configures `surface` for presenting `width`x`height` frames.
    ///
    /// Returns `false` if the surface cannot be configured at this size (eg. a minimized
    /// window).
    pub fn configure(&self, surface: &Surface<'_>, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let Some(mut config) = surface.get_default_config(&self.adapter, width, height) else {
            log::error!("adapter does not support surface");
            return false;
        };
        config.format = self.format;

        log::debug!(
            "configuring window surface for {}x{} (format: {:?}, present mode: {:?}, alpha mode: {:?})",
            width,
            height,
            config.format,
            config.present_mode,
            config.alpha_mode,
        );

        surface.configure(&self.device, &config);
        true
    }

    pub fn submit(&self, enc: CommandEncoder) {
        self.queue.submit([enc.finish()]);
    }

    pub fn encoder(&self) -> CommandEncoder {
        self.device.create_command_encoder(&Default::default())
    }
}

#[derive(Clone, Copy, NoUninit)]
#[repr(C)]
struct Uniforms {
    render_target_size: Vec2u,
    _padding: Vec2u,
}

/// Straight (non-premultiplied) RGBA.
pub type Rgba = [f32; 4];

#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
#[repr(C)]
pub struct Instance {
    /// Segment endpoints in render target pixels.
    pub a: Vec2f,
    pub b: Vec2f,
    pub color: Rgba,
    /// Half of the stroke width, in pixels.
    pub radius: f32,
    _padding: [f32; 3],
}

impl Instance {
    pub fn segment(a: Vec2f, b: Vec2f, width: f32, color: Rgba) -> Self {
        Self {
            a,
            b,
            color,
            radius: width * 0.5,
            _padding: [0.0; 3],
        }
    }

    pub fn dot(center: Vec2f, diameter: f32, color: Rgba) -> Self {
        Self::segment(center, center, diameter, color)
    }
}

pub struct Pass<'a> {
    gpu: &'a Gpu,
    pass: RenderPass<'a>,
    render_target_size: Vec2u,
}

impl<'a> Pass<'a> {
    pub fn new(gpu: &'a Gpu, enc: &'a mut CommandEncoder, target: &Texture, clear: Color) -> Self {
        let pass = enc.begin_render_pass(&RenderPassDescriptor {
            color_attachments: &[Some(RenderPassColorAttachment {
                view: &target.create_view(&Default::default()),
                depth_slice: None,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(clear),
                    ..Default::default()
                },
            })],
            ..Default::default()
        });

        Self {
            gpu,
            pass,
            render_target_size: vec2(target.width(), target.height()),
        }
    }
}

/// A set of instances drawn with one draw call.
pub struct Batch {
    uniform_buf: Buffer,
    instance_buf: Buffer,
    uniforms_bg: BindGroup,
    instances_bg: BindGroup,
    instance_count: u32,
}

impl Batch {
    pub fn new(gpu: &Gpu) -> Self {
        let uniform_buf = gpu.device.create_buffer(&BufferDescriptor {
            label: Some("uniforms"),
            size: mem::size_of::<Uniforms>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let instance_buf = Self::create_instance_buf(gpu, mem::size_of::<Instance>() as u64);
        let uniforms_bg = gpu.device.create_bind_group(&BindGroupDescriptor {
            label: Some("uniforms"),
            layout: &gpu.uniforms_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: BindingResource::Buffer(uniform_buf.as_entire_buffer_binding()),
            }],
        });
        let instances_bg = Self::create_instances_bg(gpu, &instance_buf);

        Self {
            uniform_buf,
            instance_buf,
            uniforms_bg,
            instances_bg,
            instance_count: 0,
        }
    }

    fn create_instance_buf(gpu: &Gpu, size: u64) -> Buffer {
        gpu.device.create_buffer(&BufferDescriptor {
            label: Some("instances"),
            size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_instances_bg(gpu: &Gpu, buf: &Buffer) -> BindGroup {
        gpu.device.create_bind_group(&BindGroupDescriptor {
            label: Some("instances"),
            layout: &gpu.instances_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: BindingResource::Buffer(buf.as_entire_buffer_binding()),
            }],
        })
    }

    pub fn set_instances(&mut self, gpu: &Gpu, instances: &[Instance]) {
        let size = mem::size_of_val(instances) as u64;
        if self.instance_buf.size() < size {
            // Grow to the next power of two so a stroke in progress doesn't reallocate on every
            // pointer event.
            self.instance_buf = Self::create_instance_buf(gpu, size.next_power_of_two());
            self.instances_bg = Self::create_instances_bg(gpu, &self.instance_buf);
        }
        gpu.queue
            .write_buffer(&self.instance_buf, 0, bytemuck::cast_slice(instances));
        self.instance_count = instances.len() as u32;
    }

    pub fn draw(&self, p: &mut Pass<'_>) {
        let uniforms = Uniforms {
            render_target_size: p.render_target_size,
            _padding: vec2(0, 0),
        };
        p.gpu
            .queue
            .write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(&uniforms));

        p.pass.set_pipeline(&p.gpu.render_pipeline);
        p.pass.set_bind_group(0, &self.uniforms_bg, &[]);
        p.pass.set_bind_group(1, &self.instances_bg, &[]);
        p.pass.draw(0..4, 0..self.instance_count);
    }
}
