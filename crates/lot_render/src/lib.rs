pub mod camera;
pub mod draw_list;
pub mod glyphs;
pub mod gpu_context;
pub mod pipelines;
pub mod renderer;
pub mod shapes;
pub mod texture;
pub mod vertex;

pub use camera::{CameraUniform, ScreenCamera};
pub use draw_list::{DrawCommand, DrawKind, DrawList};
pub use glyphs::{load_font, GlyphAtlas, GlyphRecord, GlyphTable};
pub use gpu_context::GpuContext;
pub use renderer::{FrameStats, Renderer};
pub use texture::Texture;
pub use vertex::SpriteVertex;
