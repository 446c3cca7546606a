//! GPU side of the frame: owns pipelines, buffers and textures, records the
//! frame through its [`DrawList`] and replays it into a render pass.

use std::path::Path;

use wgpu::util::DeviceExt;

use lot_core::canvas::{Canvas, ImageQuad, TextureId};

use crate::camera::ScreenCamera;
use crate::draw_list::{DrawKind, DrawList};
use crate::glyphs::{GlyphAtlas, GlyphTable};
use crate::pipelines::LotPipelines;
use crate::texture::Texture;
use crate::vertex::SpriteVertex;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

struct GpuTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// Counters of the most recently recorded frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub vertices: u32,
}

pub struct Renderer {
    pipelines: LotPipelines,
    camera: ScreenCamera,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    // Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,

    textures: Vec<GpuTexture>,
    fallback: GpuTexture,
    glyph_atlas: GpuTexture,
    draw_list: DrawList,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: (u32, u32),
        glyphs: GlyphTable,
        atlas: &GlyphAtlas,
    ) -> Result<Self, String> {
        let pipelines = LotPipelines::new(device, surface_format)?;
        let camera = ScreenCamera::new(viewport.0, viewport.1);
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::cast_slice(&[camera.build_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = pipelines.create_camera_bind_group(device, &camera_buffer);

        let fallback = gpu_texture(device, &pipelines, Texture::white(device, queue));
        let glyph_atlas = gpu_texture(
            device,
            &pipelines,
            Texture::from_alpha8(
                device,
                queue,
                &atlas.pixels,
                atlas.width,
                atlas.height,
                "glyph_atlas",
            ),
        );

        Ok(Self {
            pipelines,
            camera,
            camera_buffer,
            camera_bind_group,
            vertex_buffer: create_vertex_buffer(device, 1),
            index_buffer: create_index_buffer(device, 1),
            vertex_capacity: 1,
            index_capacity: 1,
            textures: Vec::new(),
            fallback,
            glyph_atlas,
            draw_list: DrawList::new(glyphs),
        })
    }

    /// Load an image file. A missing or undecodable file is replaced by a
    /// 1x1 white texture so the rest of the frame still draws.
    pub fn load_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> TextureId {
        let label = path.display().to_string();
        let texture = std::fs::read(path)
            .map_err(|e| format!("Failed to read texture '{}': {e}", label))
            .and_then(|bytes| Texture::from_bytes(device, queue, &bytes, &label))
            .unwrap_or_else(|err| {
                log::warn!("{err}. Falling back to white.");
                Texture::white(device, queue)
            });
        log::info!(
            "Texture '{}' loaded ({}x{})",
            label,
            texture.size.0,
            texture.size.1
        );
        let id = TextureId(self.textures.len() as u32);
        self.textures
            .push(gpu_texture(device, &self.pipelines, texture));
        id
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.viewport = (width, height);
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.camera.viewport
    }

    /// Drop last frame's recording.
    pub fn begin_frame(&mut self) {
        self.draw_list.clear();
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            draw_calls: self.draw_list.commands().len() as u32,
            vertices: self.draw_list.vertices().len() as u32,
        }
    }

    /// Upload the recorded frame and encode it into a pass that clears
    /// `view` first.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera.build_uniform()]),
        );

        let vertex_count = self.draw_list.vertices().len();
        let index_count = self.draw_list.indices().len();
        self.ensure_capacity(device, vertex_count, index_count);
        let vertices = self.draw_list.vertices();
        let indices = self.draw_list.indices();
        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
        if !indices.is_empty() {
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(indices));
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Lot Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        let mut bound: Option<DrawKind> = None;
        for command in self.draw_list.commands() {
            if command.index_count == 0 {
                continue;
            }
            if bound != Some(command.kind) {
                match command.kind {
                    DrawKind::Shape => pass.set_pipeline(&self.pipelines.shape),
                    DrawKind::Image(id) => {
                        let texture = self.textures.get(id.0 as usize).unwrap_or(&self.fallback);
                        pass.set_pipeline(&self.pipelines.image);
                        pass.set_bind_group(1, &texture.bind_group, &[]);
                    }
                    DrawKind::Glyph => {
                        pass.set_pipeline(&self.pipelines.glyph);
                        pass.set_bind_group(1, &self.glyph_atlas.bind_group, &[]);
                    }
                }
                bound = Some(command.kind);
            }
            pass.draw_indexed(
                command.index_start..command.index_start + command.index_count,
                0,
                0..1,
            );
        }
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {}", self.vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(device, self.index_capacity);
            log::debug!("Index buffer grown to {}", self.index_capacity);
        }
    }

    /// Approximate GPU memory held by textures and buffers.
    pub fn estimate_memory_mb(&self) -> f32 {
        let mut bytes: usize = 0;
        for tex in self.textures.iter().chain([&self.fallback]) {
            let (w, h) = tex.texture.size;
            bytes += (w as usize) * (h as usize) * 4;
        }
        let (w, h) = self.glyph_atlas.texture.size;
        bytes += (w as usize) * (h as usize);
        bytes += self.vertex_capacity * std::mem::size_of::<SpriteVertex>();
        bytes += self.index_capacity * std::mem::size_of::<u32>();
        bytes as f32 / (1024.0 * 1024.0)
    }
}

impl Canvas for Renderer {
    fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) {
        self.draw_list.draw_rectangle(x, y, width, height, color);
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, color: [f32; 3]) {
        self.draw_list.draw_circle(cx, cy, radius, color);
    }

    fn draw_parking_spot_timer(&mut self, cx: f32, cy: f32, radius: f32, elapsed_fraction: f32) {
        self.draw_list
            .draw_parking_spot_timer(cx, cy, radius, elapsed_fraction);
    }

    fn render_image(&mut self, texture: TextureId, quad: ImageQuad) {
        self.draw_list.render_image(texture, quad);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, scale: f32, color: [f32; 4]) {
        self.draw_list.draw_text(text, x, y, scale, color);
    }

    fn measure_text_width(&self, text: &str, scale: f32) -> f32 {
        self.draw_list.measure_text_width(text, scale)
    }
}

fn gpu_texture(device: &wgpu::Device, pipelines: &LotPipelines, texture: Texture) -> GpuTexture {
    let bind_group = pipelines.create_texture_bind_group(device, &texture);
    GpuTexture {
        texture,
        bind_group,
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(4) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Lot Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(4) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Lot Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
