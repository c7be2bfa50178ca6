//! WebGPU forward renderer over the core scene arena.
//!
//! One opaque pass over visible mesh nodes, then a back-to-front
//! translucent pass for glow overlays and sparks. Per-draw model/color
//! uniforms go through one dynamic-offset buffer rewritten each frame.

use glam::{Mat4, Vec3};
use room_core::camera::Camera;
use room_core::scene::{MeshVertex, Scene};
use room_core::viewer::Viewer;
use web_sys as web;
use wgpu::util::DeviceExt;

const MAX_POINT_LIGHTS: usize = 8;
const DRAW_STRIDE: u64 = 256;
const SPARK_SCALE: f32 = 0.02;
const SPARK_COLOR: [f32; 3] = [0.75, 0.85, 1.0];

const SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    ambient: vec4<f32>,
    hemi_sky: vec4<f32>,
    hemi_ground: vec4<f32>,
    sun_dir: vec4<f32>,
    sun_color: vec4<f32>,
    camera_pos: vec4<f32>,
    counts: vec4<f32>,
    points_pos: array<vec4<f32>, 8>,
    points_color: array<vec4<f32>, 8>,
};
@group(0) @binding(0) var<uniform> globals: Globals;

struct DrawU {
    model: mat4x4<f32>,
    color: vec4<f32>,
};
@group(1) @binding(0) var<uniform> draw: DrawU;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

@vertex
fn vs_main(@location(0) pos: vec3<f32>, @location(1) normal: vec3<f32>) -> VsOut {
    let world = draw.model * vec4<f32>(pos, 1.0);
    var out: VsOut;
    out.clip = globals.view_proj * world;
    out.world_pos = world.xyz;
    out.normal = (draw.model * vec4<f32>(normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    var light = globals.ambient.rgb;
    let hemi_t = n.y * 0.5 + 0.5;
    light += mix(globals.hemi_ground.rgb, globals.hemi_sky.rgb, hemi_t) * globals.hemi_sky.a;
    light += globals.sun_color.rgb * globals.sun_color.a * max(dot(n, -globals.sun_dir.xyz), 0.0);
    let count = u32(globals.counts.x);
    for (var i = 0u; i < count; i = i + 1u) {
        let to_l = globals.points_pos[i].xyz - in.world_pos;
        let dist = max(length(to_l), 1e-4);
        let atten = 1.0 / (1.0 + dist * dist);
        light += globals.points_color[i].rgb * globals.points_color[i].a
            * max(dot(n, to_l / dist), 0.0) * atten;
    }
    return vec4<f32>(draw.color.rgb * light, draw.color.a);
}
"#;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    hemi_sky: [f32; 4],
    hemi_ground: [f32; 4],
    sun_dir: [f32; 4],
    sun_color: [f32; 4],
    camera_pos: [f32; 4],
    counts: [f32; 4],
    points_pos: [[f32; 4]; MAX_POINT_LIGHTS],
    points_color: [[f32; 4]; MAX_POINT_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

struct DrawItem {
    mesh: usize,
    uniforms: DrawUniforms,
    translucent: bool,
    depth_key: f32,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    globals_buf: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draws_buf: wgpu::Buffer,
    draws_bg: wgpu::BindGroup,
    draws_capacity: usize,

    opaque_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,

    mesh_buffers: Vec<Option<MeshBuffers>>,
    spark_mesh: MeshBuffers,

    width: u32,
    height: u32,
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

/// Tiny octahedron used for spark billquads; normals point outward.
fn spark_mesh_data() -> (Vec<MeshVertex>, Vec<u32>) {
    let dirs = [
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];
    let vertices = dirs
        .iter()
        .map(|d| MeshVertex {
            position: (*d).into(),
            normal: (*d).into(),
        })
        .collect();
    let indices = vec![
        0, 2, 4, 4, 2, 1, 1, 2, 5, 5, 2, 0, // top four faces
        4, 3, 0, 1, 3, 4, 5, 3, 1, 0, 3, 5, // bottom four faces
    ];
    (vertices, indices)
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits keep older WebGPU implementations happy
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("room-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<Globals>() as u64
                    ),
                },
                count: None,
            }],
        });
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<DrawUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let globals_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals-bg"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buf.as_entire_binding(),
            }],
        });

        let draws_capacity = 256usize;
        let (draws_buf, draws_bg) =
            create_draws_buffer(&device, &draw_layout, draws_capacity);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("room-pipeline-layout"),
            bind_group_layouts: &[&globals_layout, &draw_layout],
            push_constant_ranges: &[],
        });
        let opaque_pipeline =
            create_pipeline(&device, &pipeline_layout, &shader, format, false);
        let translucent_pipeline =
            create_pipeline(&device, &pipeline_layout, &shader, format, true);

        let (spark_vertices, spark_indices) = spark_mesh_data();
        let spark_mesh = MeshBuffers {
            vertex: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("spark-vb"),
                contents: bytemuck::cast_slice(&spark_vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            index: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("spark-ib"),
                contents: bytemuck::cast_slice(&spark_indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: spark_indices.len() as u32,
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            globals_buf,
            globals_bg,
            draw_layout,
            draws_buf,
            draws_bg,
            draws_capacity,
            opaque_pipeline,
            translucent_pipeline,
            mesh_buffers: Vec::new(),
            spark_mesh,
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, width, height);
    }

    fn ensure_mesh_buffers(&mut self, scene: &Scene) {
        while self.mesh_buffers.len() < scene.meshes.len() {
            self.mesh_buffers.push(None);
        }
        for (i, slot) in self.mesh_buffers.iter_mut().enumerate() {
            if slot.is_some() {
                continue;
            }
            if let Some(mesh) = scene.mesh(i) {
                *slot = Some(MeshBuffers {
                    vertex: self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("mesh-vb"),
                        contents: bytemuck::cast_slice(&mesh.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    index: self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("mesh-ib"),
                        contents: bytemuck::cast_slice(&mesh.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                    index_count: mesh.indices.len() as u32,
                });
            }
        }
    }

    fn collect_draws(&self, viewer: &Viewer, camera: &Camera) -> Vec<DrawItem> {
        let scene = &viewer.scene;
        let mut items = Vec::new();
        for root in scene.roots() {
            for id in scene.descendants(*root) {
                let node = match scene.node(id) {
                    Some(n) => n,
                    None => continue,
                };
                let mesh_id = match node.mesh {
                    Some(m) => m,
                    None => continue,
                };
                if !scene.effectively_visible(id) {
                    continue;
                }
                let mesh = match scene.mesh(mesh_id) {
                    Some(m) => m,
                    None => continue,
                };
                let world = scene.world_transform(id);
                let opacity = node.overlay_opacity.unwrap_or(1.0);
                let mut color = mesh.base_color;
                color[3] *= opacity;
                let pos = world.transform_point3(Vec3::ZERO);
                items.push(DrawItem {
                    mesh: mesh_id,
                    uniforms: DrawUniforms {
                        model: world.to_cols_array_2d(),
                        color,
                    },
                    translucent: node.overlay_opacity.is_some() || mesh.base_color[3] < 1.0,
                    depth_key: (pos - camera.eye).length_squared(),
                });
            }
        }
        // Sparks ride the translucent pass on a shared unit mesh.
        for (pos, fade) in viewer.sparks.alive() {
            let model = Mat4::from_scale_rotation_translation(
                Vec3::splat(SPARK_SCALE),
                glam::Quat::IDENTITY,
                pos,
            );
            items.push(DrawItem {
                mesh: usize::MAX,
                uniforms: DrawUniforms {
                    model: model.to_cols_array_2d(),
                    color: [SPARK_COLOR[0], SPARK_COLOR[1], SPARK_COLOR[2], fade * 0.8],
                },
                translucent: true,
                depth_key: (pos - camera.eye).length_squared(),
            });
        }
        items
    }

    fn write_globals(&self, viewer: &Viewer, camera: &Camera) {
        let rig = &viewer.rig;
        let mut points_pos = [[0.0f32; 4]; MAX_POINT_LIGHTS];
        let mut points_color = [[0.0f32; 4]; MAX_POINT_LIGHTS];
        let mut count = 0usize;
        if rig.lamp.visible && count < MAX_POINT_LIGHTS {
            points_pos[count] = [rig.lamp.position.x, rig.lamp.position.y, rig.lamp.position.z, 0.0];
            points_color[count] = [
                rig.lamp.color.x,
                rig.lamp.color.y,
                rig.lamp.color.z,
                rig.lamp.intensity,
            ];
            count += 1;
        }
        for (pos, color, intensity) in viewer.glow.lights() {
            if count >= MAX_POINT_LIGHTS {
                break;
            }
            points_pos[count] = [pos.x, pos.y, pos.z, 0.0];
            points_color[count] = [color.x, color.y, color.z, intensity];
            count += 1;
        }
        let hemi_intensity = if rig.hemisphere.visible {
            rig.hemisphere.intensity
        } else {
            0.0
        };
        let sun_intensity = if rig.directional.visible {
            rig.directional.intensity
        } else {
            0.0
        };
        let globals = Globals {
            view_proj: camera.view_projection().to_cols_array_2d(),
            ambient: [
                rig.ambient_intensity,
                rig.ambient_intensity,
                rig.ambient_intensity,
                0.0,
            ],
            hemi_sky: [
                rig.hemisphere.sky.x,
                rig.hemisphere.sky.y,
                rig.hemisphere.sky.z,
                hemi_intensity,
            ],
            hemi_ground: [
                rig.hemisphere.ground.x,
                rig.hemisphere.ground.y,
                rig.hemisphere.ground.z,
                0.0,
            ],
            sun_dir: [
                rig.directional.direction.x,
                rig.directional.direction.y,
                rig.directional.direction.z,
                0.0,
            ],
            sun_color: [
                rig.directional.color.x,
                rig.directional.color.y,
                rig.directional.color.z,
                sun_intensity,
            ],
            camera_pos: [camera.eye.x, camera.eye.y, camera.eye.z, 0.0],
            counts: [count as f32, 0.0, 0.0, 0.0],
            points_pos,
            points_color,
        };
        self.queue
            .write_buffer(&self.globals_buf, 0, bytemuck::bytes_of(&globals));
    }

    pub fn render(&mut self, viewer: &Viewer, camera: &Camera) -> anyhow::Result<()> {
        self.ensure_mesh_buffers(&viewer.scene);
        let mut items = self.collect_draws(viewer, camera);
        // opaque first, then translucent back-to-front
        items.sort_by(|a, b| {
            a.translucent.cmp(&b.translucent).then(
                b.depth_key
                    .partial_cmp(&a.depth_key)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        });

        if items.len() > self.draws_capacity {
            self.draws_capacity = items.len().next_power_of_two();
            let (buf, bg) = create_draws_buffer(&self.device, &self.draw_layout, self.draws_capacity);
            self.draws_buf = buf;
            self.draws_bg = bg;
        }
        let mut draw_bytes = vec![0u8; items.len() * DRAW_STRIDE as usize];
        for (i, item) in items.iter().enumerate() {
            let offset = i * DRAW_STRIDE as usize;
            let src = bytemuck::bytes_of(&item.uniforms);
            draw_bytes[offset..offset + src.len()].copy_from_slice(src);
        }
        if !draw_bytes.is_empty() {
            self.queue.write_buffer(&self.draws_buf, 0, &draw_bytes);
        }
        self.write_globals(viewer, camera);

        let frame = self
            .surface
            .get_current_texture()
            .map_err(|e| anyhow::anyhow!("surface error: {:?}", e))?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let bg = viewer.rig.background;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("room-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.x as f64,
                            g: bg.y as f64,
                            b: bg.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.globals_bg, &[]);
            let mut current_translucent = false;
            pass.set_pipeline(&self.opaque_pipeline);
            for (i, item) in items.iter().enumerate() {
                if item.translucent && !current_translucent {
                    pass.set_pipeline(&self.translucent_pipeline);
                    current_translucent = true;
                }
                let buffers = if item.mesh == usize::MAX {
                    Some(&self.spark_mesh)
                } else {
                    self.mesh_buffers.get(item.mesh).and_then(|b| b.as_ref())
                };
                let buffers = match buffers {
                    Some(b) => b,
                    None => continue,
                };
                pass.set_bind_group(1, &self.draws_bg, &[(i as u64 * DRAW_STRIDE) as u32]);
                pass.set_vertex_buffer(0, buffers.vertex.slice(..));
                pass.set_index_buffer(buffers.index.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..buffers.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let depth = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_draws_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("draw-uniforms"),
        size: capacity as u64 * DRAW_STRIDE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("draw-bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buf,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
            }),
        }],
    });
    (buf, bg)
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    translucent: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(if translucent {
            "translucent-pipeline"
        } else {
            "opaque-pipeline"
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[vertex_layout()],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: !translucent,
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
                blend: Some(if translucent {
                    wgpu::BlendState::ALPHA_BLENDING
                } else {
                    wgpu::BlendState::REPLACE
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
        cache: None,
    })
}
