pub mod window;

pub use window::{create_cursor, create_window, PlatformConfig};
