use std::collections::HashMap;
use std::num::NonZeroU64;
use std::ops::Range;
use std::sync::Arc;

use anyhow::Context as _;
use glam::Vec3;
use log::{debug, info, warn};
use wgpu::util::DeviceExt;
use winit::window::Window as WinitWindow;

use crate::core::GpuContext;
use crate::engine::{
    Background, ColorSpace, GeometryId, ObjectKind, PerspectiveCamera, SceneGraph, TextureHandle,
    TextureId, TextureImage, WrapMode,
};
use crate::error::Result;
use crate::traits::SceneRenderer;

mod uniforms;

pub use uniforms::{
    clear_color, overlay_pixels_per_point, FrameUniform, ObjectUniform, SceneLights, Vertex,
    MAX_DIRECTIONAL_LIGHTS, MAX_POINT_LIGHTS,
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_OBJECT_SLOTS: usize = 64;

/// Tessellated egui output to draw over the scene on the next frame
pub struct UiOverlay {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

struct GpuTexture {
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
}

/// One material group of one mesh, ready to draw
struct DrawItem {
    geometry: GeometryId,
    indices: Range<u32>,
    texture: Option<TextureId>,
    uniform: ObjectUniform,
    blended: bool,
    distance: f32,
}

#[derive(Debug, Clone, Copy)]
enum PipelineKind {
    Sky,
    Opaque,
    Transparent,
}

/// Forward renderer drawing a [`SceneGraph`] into the window surface
///
/// Opaque meshes are drawn in scene order, blended ones afterwards from far
/// to near. Geometry and textures are uploaded on first use and cached by id.
/// The egui overlay handed over through [`WgpuRenderer::set_overlay`] is
/// composited on top of the scene.
pub struct WgpuRenderer {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    pixel_ratio: f64,
    depth_view: wgpu::TextureView,
    frame_buffer: wgpu::Buffer,
    frame_layout: wgpu::BindGroupLayout,
    frame_bind_group: wgpu::BindGroup,
    bound_sky: Option<TextureId>,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_stride: u64,
    object_slots: usize,
    material_layout: wgpu::BindGroupLayout,
    clamp_sampler: wgpu::Sampler,
    repeat_sampler: wgpu::Sampler,
    fallback: GpuTexture,
    sky_pipeline: wgpu::RenderPipeline,
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    meshes: HashMap<GeometryId, GpuMesh>,
    textures: HashMap<TextureId, GpuTexture>,
    overlay: Option<UiOverlay>,
    egui_renderer: egui_wgpu::Renderer,
}

impl WgpuRenderer {
    pub async fn new(window: Arc<WinitWindow>) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let pixel_ratio = window.scale_factor();

        let instance = GpuContext::instance();
        let surface = instance
            .create_surface(window)
            .context("failed to create window surface")?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;
        let config = gpu.surface_config(&surface, size.width, size.height)?;
        surface.configure(gpu.device(), &config);

        let device = gpu.device();
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("renderer/mesh.wgsl").into()),
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<ObjectUniform>() as u64),
                },
                count: None,
            }],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });

        let clamp_sampler = create_sampler(device, wgpu::AddressMode::ClampToEdge);
        let repeat_sampler = create_sampler(device, wgpu::AddressMode::Repeat);

        let fallback = {
            let view = upload_image(
                device,
                gpu.queue(),
                &TextureImage::solid([255, 255, 255, 255]),
                wgpu::TextureFormat::Rgba8UnormSrgb,
            );
            let bind_group = material_bind_group(device, &material_layout, &view, &clamp_sampler);
            GpuTexture { view, bind_group }
        };

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = frame_bind_group(
            device,
            &frame_layout,
            &frame_buffer,
            &fallback.view,
            &clamp_sampler,
        );

        let object_stride = uniforms::aligned_stride(
            std::mem::size_of::<ObjectUniform>() as u64,
            u64::from(device.limits().min_uniform_buffer_offset_alignment),
        );
        let (object_buffer, object_bind_group) =
            object_storage(device, &object_layout, object_stride, INITIAL_OBJECT_SLOTS);

        let sky_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sky Pipeline Layout"),
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });
        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &object_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let sky_pipeline =
            create_pipeline(device, &sky_layout, &shader, config.format, PipelineKind::Sky);
        let opaque_pipeline =
            create_pipeline(device, &mesh_layout, &shader, config.format, PipelineKind::Opaque);
        let transparent_pipeline = create_pipeline(
            device,
            &mesh_layout,
            &shader,
            config.format,
            PipelineKind::Transparent,
        );

        let depth_view = create_depth_view(device, config.width, config.height);

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            config.format,
            egui_wgpu::RendererOptions::default(),
        );

        info!(
            "renderer ready: {}x{} {:?}",
            config.width, config.height, config.format
        );

        Ok(Self {
            gpu,
            surface,
            config,
            pixel_ratio,
            depth_view,
            frame_buffer,
            frame_layout,
            frame_bind_group,
            bound_sky: None,
            object_layout,
            object_buffer,
            object_bind_group,
            object_stride,
            object_slots: INITIAL_OBJECT_SLOTS,
            material_layout,
            clamp_sampler,
            repeat_sampler,
            fallback,
            sky_pipeline,
            opaque_pipeline,
            transparent_pipeline,
            meshes: HashMap::new(),
            textures: HashMap::new(),
            overlay: None,
            egui_renderer,
        })
    }

    /// Overlay to composite on the next rendered frame
    pub fn set_overlay(&mut self, overlay: UiOverlay) {
        self.overlay = Some(overlay);
    }

    /// Reapply the surface configuration after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(self.gpu.device(), &self.config);
    }

    fn upload_mesh(&mut self, id: GeometryId, data: &crate::engine::MeshData) {
        if self.meshes.contains_key(&id) {
            return;
        }
        let device = self.gpu.device();
        let vertices = uniforms::interleave(data);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        debug!(
            "uploaded geometry {:?}: {} vertices, {} triangles",
            id,
            data.vertex_count(),
            data.triangle_count()
        );
        self.meshes.insert(id, GpuMesh { vertex_buffer, index_buffer });
    }

    fn upload_texture(&mut self, handle: &TextureHandle) {
        if self.textures.contains_key(&handle.id()) {
            return;
        }
        let Some(image) = handle.image() else {
            return;
        };
        let device = self.gpu.device();
        let max = device.limits().max_texture_dimension_2d;
        let image = fit_to_limit(image, max);
        let format = match handle.settings().color_space {
            ColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            ColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
        };
        let view = upload_image(device, self.gpu.queue(), &image, format);
        let sampler = match handle.settings().wrap {
            WrapMode::Repeat => &self.repeat_sampler,
            WrapMode::ClampToEdge => &self.clamp_sampler,
        };
        let bind_group = material_bind_group(device, &self.material_layout, &view, sampler);
        debug!(
            "uploaded texture {} ({}x{})",
            handle.source().display(),
            image.width,
            image.height
        );
        self.textures.insert(handle.id(), GpuTexture { view, bind_group });
    }

    /// Rebind group 0 when the background texture changes
    fn bind_sky(&mut self, sky: Option<TextureId>) {
        if self.bound_sky == sky {
            return;
        }
        let view = sky
            .and_then(|id| self.textures.get(&id))
            .map(|t| &t.view)
            .unwrap_or(&self.fallback.view);
        self.frame_bind_group = frame_bind_group(
            self.gpu.device(),
            &self.frame_layout,
            &self.frame_buffer,
            view,
            &self.clamp_sampler,
        );
        self.bound_sky = sky;
    }

    fn reserve_object_slots(&mut self, count: usize) {
        if count <= self.object_slots {
            return;
        }
        let slots = count.next_power_of_two();
        let (buffer, bind_group) =
            object_storage(self.gpu.device(), &self.object_layout, self.object_stride, slots);
        self.object_buffer = buffer;
        self.object_bind_group = bind_group;
        self.object_slots = slots;
        debug!("grew object uniform buffer to {} slots", slots);
    }

    fn draw_overlay(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        overlay: UiOverlay,
    ) -> Vec<wgpu::CommandBuffer> {
        let device = self.gpu.device();
        let queue = self.gpu.queue();
        for (id, image_delta) in &overlay.textures_delta.set {
            self.egui_renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: overlay_pixels_per_point(self.pixel_ratio, overlay.pixels_per_point),
        };
        let callbacks = self.egui_renderer.update_buffers(
            device,
            queue,
            encoder,
            &overlay.primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &overlay.primitives, &screen_descriptor);
        }

        for id in &overlay.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        callbacks
    }
}

impl SceneRenderer for WgpuRenderer {
    fn drawing_buffer_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.gpu.device(), &self.config);
        self.depth_view = create_depth_view(self.gpu.device(), width, height);
        debug!("drawing buffer resized to {}x{}", width, height);
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<()> {
        let mut lights = SceneLights::default();
        let mut items = Vec::new();
        let mut geometries = Vec::new();
        let mut maps = Vec::new();

        scene.traverse(|object, world| match &object.kind {
            ObjectKind::Light(light) => lights.add(light, world),
            ObjectKind::Mesh(mesh) => {
                let geometry = &mesh.geometry;
                geometries.push(geometry.clone());
                let distance = world.transform_point3(Vec3::ZERO).distance(camera.position);
                for group in geometry.data().draw_groups() {
                    let Some(material) = mesh.materials.for_group(group.material_index) else {
                        continue;
                    };
                    let map = material.map.as_ref().filter(|m| m.is_ready());
                    if let Some(map) = map {
                        maps.push(map.clone());
                    }
                    items.push(DrawItem {
                        geometry: geometry.id(),
                        indices: group.start..group.start + group.count,
                        texture: map.map(TextureHandle::id),
                        uniform: ObjectUniform::new(world, material, map.is_some()),
                        blended: material.is_blended(),
                        distance,
                    });
                }
            }
            ObjectKind::Group(_) => {}
        });

        for geometry in &geometries {
            self.upload_mesh(geometry.id(), geometry.data());
        }
        for map in &maps {
            self.upload_texture(map);
        }

        let sky = match scene.background() {
            Some(Background::Texture(handle)) if handle.is_ready() => {
                self.upload_texture(handle);
                Some(handle.id()).filter(|id| self.textures.contains_key(id))
            }
            _ => None,
        };
        self.bind_sky(sky);

        let frame = FrameUniform::new(camera, scene, &lights, sky.is_some());
        self.gpu
            .queue()
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        self.reserve_object_slots(items.len());
        if !items.is_empty() {
            let stride = self.object_stride as usize;
            let mut bytes = vec![0u8; stride * items.len()];
            for (slot, item) in bytes.chunks_exact_mut(stride).zip(&items) {
                let uniform = bytemuck::bytes_of(&item.uniform);
                slot[..uniform.len()].copy_from_slice(uniform);
            }
            self.gpu.queue().write_buffer(&self.object_buffer, 0, &bytes);
        }

        let mut order: Vec<usize> = (0..items.len()).filter(|&i| !items[i].blended).collect();
        let mut blended: Vec<usize> = (0..items.len()).filter(|&i| items[i].blended).collect();
        blended.sort_by(|&a, &b| items[b].distance.total_cmp(&items[a].distance));
        order.extend(blended);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        let clear = clear_color(scene);
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(clear.r),
                            g: f64::from(clear.g),
                            b: f64::from(clear.b),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            if sky.is_some() {
                render_pass.set_pipeline(&self.sky_pipeline);
                render_pass.draw(0..3, 0..1);
            }

            for &slot in &order {
                let item = &items[slot];
                let Some(mesh) = self.meshes.get(&item.geometry) else {
                    continue;
                };
                let texture = item
                    .texture
                    .and_then(|id| self.textures.get(&id))
                    .unwrap_or(&self.fallback);
                let pipeline = if item.blended {
                    &self.transparent_pipeline
                } else {
                    &self.opaque_pipeline
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(
                    1,
                    &self.object_bind_group,
                    &[(slot as u64 * self.object_stride) as u32],
                );
                render_pass.set_bind_group(2, &texture.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(item.indices.clone(), 0, 0..1);
            }
        }

        let mut command_buffers = match self.overlay.take() {
            Some(overlay) => self.draw_overlay(&mut encoder, &view, overlay),
            None => Vec::new(),
        };
        command_buffers.push(encoder.finish());
        self.gpu.queue().submit(command_buffers);
        output.present();

        Ok(())
    }
}

/// Downscale images exceeding the device texture limit
fn fit_to_limit(image: &TextureImage, max: u32) -> std::borrow::Cow<'_, TextureImage> {
    use std::borrow::Cow;

    if image.width <= max && image.height <= max {
        return Cow::Borrowed(image);
    }
    let scale = max as f32 / image.width.max(image.height) as f32;
    let width = ((image.width as f32 * scale) as u32).clamp(1, max);
    let height = ((image.height as f32 * scale) as u32).clamp(1, max);
    let Some(source) = image::RgbaImage::from_raw(image.width, image.height, image.rgba.clone())
    else {
        return Cow::Borrowed(image);
    };
    warn!(
        "texture {}x{} exceeds device limit {}, resizing to {}x{}",
        image.width, image.height, max, width, height
    );
    let resized = image::imageops::resize(&source, width, height, image::imageops::FilterType::Triangle);
    Cow::Owned(TextureImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
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

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn create_sampler(device: &wgpu::Device, address_mode: wgpu::AddressMode) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

fn upload_image(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &TextureImage,
    format: wgpu::TextureFormat,
) -> wgpu::TextureView {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("Material Texture"),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &image.rgba,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn frame_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    sky: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("frame_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(sky),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("material_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

/// Uniform buffer holding `slots` object uniforms at `stride` byte offsets
fn object_storage(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    slots: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Object Buffer"),
        size: stride * slots as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("object_bind_group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: NonZeroU64::new(std::mem::size_of::<ObjectUniform>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    kind: PipelineKind,
) -> wgpu::RenderPipeline {
    let vertex_layouts = [Vertex::layout()];
    let (label, vs, fs, buffers, blend, depth_write, depth_compare): (_, _, _, &[_], _, _, _) =
        match kind {
            PipelineKind::Sky => (
                "Sky Pipeline",
                "vs_sky",
                "fs_sky",
                &[],
                wgpu::BlendState::REPLACE,
                false,
                wgpu::CompareFunction::Always,
            ),
            PipelineKind::Opaque => (
                "Opaque Pipeline",
                "vs_main",
                "fs_main",
                &vertex_layouts,
                wgpu::BlendState::REPLACE,
                true,
                wgpu::CompareFunction::Less,
            ),
            PipelineKind::Transparent => (
                "Transparent Pipeline",
                "vs_main",
                "fs_main",
                &vertex_layouts,
                wgpu::BlendState::ALPHA_BLENDING,
                false,
                wgpu::CompareFunction::Less,
            ),
        };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
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
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_to_limit_keeps_small_images() {
        let image = TextureImage::solid([1, 2, 3, 4]);
        assert!(matches!(fit_to_limit(&image, 8192), std::borrow::Cow::Borrowed(_)));
    }

    #[test]
    fn test_fit_to_limit_preserves_aspect() {
        let image = TextureImage::new(64, 32, vec![128; 64 * 32 * 4]).unwrap();
        let fitted = fit_to_limit(&image, 16);
        assert_eq!((fitted.width, fitted.height), (16, 8));
        assert_eq!(fitted.rgba.len(), 16 * 8 * 4);
    }
}
