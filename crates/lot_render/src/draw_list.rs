//! CPU-side frame recording.
//!
//! Every [`Canvas`] call appends its tessellated geometry to one shared
//! vertex/index stream and records exactly one [`DrawCommand`] per primitive
//! (one per glyph for text, one per arc for the timer). The renderer uploads
//! the stream once and replays the commands in order.

use lot_core::canvas::{Canvas, ImageQuad, TextureId};

use crate::glyphs::GlyphTable;
use crate::shapes::{
    circle_fan, fan_indices, image_quad_corners, rectangle_fan, timer_fans, TIMER_GREEN, TIMER_RED,
};
use crate::vertex::SpriteVertex;

/// Upright image: texture row 0 is the top edge of the quad.
const IMAGE_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Shape,
    Image(TextureId),
    Glyph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub kind: DrawKind,
    pub index_start: u32,
    pub index_count: u32,
}

pub struct DrawList {
    glyphs: GlyphTable,
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(glyphs: GlyphTable) -> Self {
        Self {
            glyphs,
            vertices: Vec::new(),
            indices: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.commands.clear();
    }

    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    fn push_fan(&mut self, points: &[[f32; 2]], color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend(points.iter().map(|&p| SpriteVertex::solid(p, color)));
        let fan = fan_indices(base, points.len() as u32);
        self.push_command(DrawKind::Shape, &fan);
    }

    fn push_quad(
        &mut self,
        kind: DrawKind,
        corners: [[f32; 2]; 4],
        uvs: [[f32; 2]; 4],
        color: [f32; 4],
    ) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(
            corners
                .iter()
                .zip(uvs)
                .map(|(&p, uv)| SpriteVertex::textured(p, uv, color)),
        );
        let fan = fan_indices(base, 4);
        self.push_command(kind, &fan);
    }

    fn push_command(&mut self, kind: DrawKind, indices: &[u32]) {
        self.commands.push(DrawCommand {
            kind,
            index_start: self.indices.len() as u32,
            index_count: indices.len() as u32,
        });
        self.indices.extend_from_slice(indices);
    }
}

impl Canvas for DrawList {
    fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) {
        self.push_fan(&rectangle_fan(x, y, width, height), color);
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, color: [f32; 3]) {
        let [r, g, b] = color;
        self.push_fan(&circle_fan(cx, cy, radius), [r, g, b, 1.0]);
    }

    fn draw_parking_spot_timer(&mut self, cx: f32, cy: f32, radius: f32, elapsed_fraction: f32) {
        let (green, red) = timer_fans(cx, cy, radius, elapsed_fraction);
        self.push_fan(&green, TIMER_GREEN);
        self.push_fan(&red, TIMER_RED);
    }

    fn render_image(&mut self, texture: TextureId, quad: ImageQuad) {
        let [r, g, b] = quad.blend_color;
        self.push_quad(
            DrawKind::Image(texture),
            image_quad_corners(&quad),
            IMAGE_UVS,
            [r, g, b, quad.alpha],
        );
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, scale: f32, color: [f32; 4]) {
        for glyph in self.glyphs.layout(text, x, y, scale) {
            let [u0, v0, u1, v1] = glyph.uv;
            self.push_quad(
                DrawKind::Glyph,
                rectangle_fan(glyph.x, glyph.y, glyph.width, glyph.height),
                [[u0, v1], [u1, v1], [u1, v0], [u0, v0]],
                color,
            );
        }
    }

    fn measure_text_width(&self, text: &str, scale: f32) -> f32 {
        self.glyphs.measure(text, scale)
    }
}
