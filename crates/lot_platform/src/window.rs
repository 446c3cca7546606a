use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{CustomCursor, Window, WindowAttributes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Parking Servis".to_string(),
            width: 1400,
            height: 800,
        }
    }
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, String> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height));

    let window = event_loop
        .create_window(attrs)
        .map_err(|e| format!("Failed to create window: {e}"))?;
    Ok(Arc::new(window))
}

/// Build a cursor from straight RGBA8 pixels with its hotspot at
/// `(hotspot_x, hotspot_y)` pixels from the top-left.
pub fn create_cursor(
    event_loop: &ActiveEventLoop,
    rgba: Vec<u8>,
    width: u16,
    height: u16,
    hotspot_x: u16,
    hotspot_y: u16,
) -> Result<CustomCursor, String> {
    let source = CustomCursor::from_rgba(rgba, width, height, hotspot_x, hotspot_y)
        .map_err(|e| format!("Invalid cursor image: {e}"))?;
    log::debug!("Custom cursor {width}x{height}, hotspot ({hotspot_x}, {hotspot_y})");
    Ok(event_loop.create_custom_cursor(source))
}
