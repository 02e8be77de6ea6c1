use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::pipeline::{QuadPipeline, QuadVertex, create_quad_pipeline, orthographic_projection, quad_vertices};
use super::{Color, Flip, RenderBackend, TextureId};
use crate::error::{AppError, AppResult};
use crate::world::Rect;

struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Consecutive quads sharing one texture.
struct DrawBatch {
    texture: TextureId,
    first: u32,
    count: u32,
}

/// wgpu renderer bound to a winit window.
///
/// Every draw call becomes one textured quad in a per-frame vertex list;
/// solid fills sample a 1×1 white texture. `present` uploads the list and
/// submits a single render pass.
pub struct WgpuBackend {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: QuadPipeline,
    sampler: wgpu::Sampler,
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    textures: HashMap<TextureId, GpuTexture>,
    next_texture: u64,
    /// 1×1 opaque white, used by `fill_rect`.
    white: TextureId,
    draw_color: Color,
    clear_color: Color,
    vertices: Vec<QuadVertex>,
    batches: Vec<DrawBatch>,
}

impl WgpuBackend {
    pub async fn new(window: Arc<Window>, smooth_scaling: bool) -> AppResult<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|e| AppError::Window(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(|e| AppError::Window(format!("no suitable GPU adapter: {e}")))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(|e| AppError::Window(format!("failed to create device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        // Blend in gamma space like a classic 2D renderer: prefer a non-sRGB
        // swapchain so 8-bit colors reach the screen unchanged.
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| AppError::Window("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_quad_pipeline(&device, format);

        let filter = if smooth_scaling { wgpu::FilterMode::Linear } else { wgpu::FilterMode::Nearest };
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("image_sampler"),
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        });

        let proj = orthographic_projection(config.width as f32, config.height as f32);
        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::cast_slice(&proj),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection_bg"),
            layout: &pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        log::info!(
            "renderer ready: {} ({:?}), {}x{} {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            config.width,
            config.height,
            format
        );

        let mut backend = Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            sampler,
            projection_buffer,
            projection_bind_group,
            textures: HashMap::new(),
            next_texture: 0,
            white: TextureId(0),
            draw_color: Color::WHITE,
            clear_color: Color::BLACK,
            vertices: Vec::new(),
            batches: Vec::new(),
        };
        backend.white = backend.create_texture(&RgbaImage::from_pixel(1, 1, image::Rgba([255; 4])))?;
        Ok(backend)
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        let proj = orthographic_projection(new_size.width as f32, new_size.height as f32);
        self.queue
            .write_buffer(&self.projection_buffer, 0, bytemuck::cast_slice(&proj));
    }

    fn push_quad(&mut self, texture: TextureId, quad: [QuadVertex; 6]) {
        let first = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&quad);
        match self.batches.last_mut() {
            Some(batch) if batch.texture == texture => batch.count += 6,
            _ => self.batches.push(DrawBatch { texture, first, count: 6 }),
        }
    }

    fn reset_frame(&mut self) {
        self.vertices.clear();
        self.batches.clear();
    }
}

impl RenderBackend for WgpuBackend {
    fn create_texture(&mut self, pixels: &RgbaImage) -> AppResult<TextureId> {
        let (width, height) = pixels.dimensions();
        let max = self.device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(AppError::Texture(format!(
                "{width}x{height} is outside the supported range 1..={max}"
            )));
        }

        let texture = self.device.create_texture_with_data(
            &self.queue,
            &wgpu::TextureDescriptor {
                label: Some("image"),
                size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            pixels.as_raw(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("image_bg"),
            layout: &self.pipeline.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(id, GpuTexture { texture, bind_group });
        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if let Some(gpu) = self.textures.remove(&id) {
            gpu.texture.destroy();
        }
    }

    fn output_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn clear(&mut self) {
        // Everything recorded so far would be painted over anyway.
        self.reset_frame();
        self.clear_color = self.draw_color;
    }

    fn fill_rect(&mut self, rect: Rect) {
        let quad = quad_vertices(rect, 0.0, Flip::None, self.draw_color.0);
        self.push_quad(self.white, quad);
    }

    fn copy_ex(&mut self, texture: TextureId, dst: Rect, angle_degrees: f64, flip: Flip) {
        let quad = quad_vertices(dst, angle_degrees, flip, Color::WHITE.0);
        self.push_quad(texture, quad);
    }

    fn present(&mut self) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.reset_frame();
                return;
            }
            Err(e) => {
                log::error!("render error: {e}");
                self.reset_frame();
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let vertex_buffer = (!self.vertices.is_empty()).then(|| {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad_vertex_buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let [r, g, b, a] = self.clear_color.0;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(vbuf) = &vertex_buffer {
                pass.set_pipeline(&self.pipeline.render_pipeline);
                pass.set_bind_group(0, &self.projection_bind_group, &[]);
                pass.set_vertex_buffer(0, vbuf.slice(..));

                for batch in &self.batches {
                    // Draws that reference an already destroyed texture are dropped.
                    let Some(gpu) = self.textures.get(&batch.texture) else {
                        continue;
                    };
                    pass.set_bind_group(1, &gpu.bind_group, &[]);
                    pass.draw(batch.first..batch.first + batch.count, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        self.reset_frame();
    }
}
