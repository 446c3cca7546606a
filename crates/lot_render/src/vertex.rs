/// One vertex format for every primitive. Shapes ignore `tex_coords`; images
/// carry their blend colour and alpha in `color`; glyphs carry the text tint.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x2, // position
    1 => Float32x2, // tex_coords
    2 => Float32x4, // color
];

impl SpriteVertex {
    pub fn solid(position: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position,
            tex_coords: [0.0, 0.0],
            color,
        }
    }

    pub fn textured(position: [f32; 2], tex_coords: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position,
            tex_coords,
            color,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_offsets_match_struct() {
        assert_eq!(std::mem::size_of::<SpriteVertex>(), 32);
        assert_eq!(ATTRIBUTES[1].offset as usize, std::mem::offset_of!(SpriteVertex, tex_coords));
        assert_eq!(ATTRIBUTES[2].offset as usize, std::mem::offset_of!(SpriteVertex, color));
    }
}
