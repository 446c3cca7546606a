//! Immediate-mode drawing surface the frame composer talks to.
//!
//! Coordinates are pixels with the origin at the bottom-left of the
//! viewport. Implementations record or submit one draw per call; nothing
//! issued through a `Canvas` outlives the frame it was issued in.

/// Opaque handle into the renderer's texture table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Placement of a textured quad. `rotation_deg` turns the quad about its own
/// centre. Texels that are close to white are replaced by `blend_color`;
/// every texel's alpha is multiplied by `alpha`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageQuad {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation_deg: f32,
    pub alpha: f32,
    pub blend_color: [f32; 3],
}

impl ImageQuad {
    /// Unrotated, opaque, untinted quad.
    pub fn plain(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation_deg: 0.0,
            alpha: 1.0,
            blend_color: [1.0, 1.0, 1.0],
        }
    }
}

/// Textures the lot view draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotTextures {
    pub background: TextureId,
    pub spot: TextureId,
    pub car: TextureId,
}

pub trait Canvas {
    fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32, color: [f32; 4]);

    /// Filled opaque circle.
    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, color: [f32; 3]);

    /// Two-colour pie: green for the remaining share, red for the elapsed
    /// share, starting at 12 o'clock.
    fn draw_parking_spot_timer(&mut self, cx: f32, cy: f32, radius: f32, elapsed_fraction: f32);

    fn render_image(&mut self, texture: TextureId, quad: ImageQuad);

    /// `y` is the baseline.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, scale: f32, color: [f32; 4]);

    fn measure_text_width(&self, text: &str, scale: f32) -> f32;
}
