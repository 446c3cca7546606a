use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use lot_platform::PlatformConfig;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowSection,
    pub target_fps: u32,
    pub font: FontSection,
    pub textures: TextureSection,
    pub cursor: PathBuf,
    pub sounds: SoundSection,
    /// Fixed RNG seed; OS entropy when absent.
    pub seed: Option<u64>,
    pub credit: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowSection {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FontSection {
    pub path: PathBuf,
    pub pixel_size: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TextureSection {
    pub background: PathBuf,
    pub spot: PathBuf,
    pub car: PathBuf,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SoundSection {
    pub park: PathBuf,
    pub leave: PathBuf,
    pub indicator: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowSection::default(),
            target_fps: 60,
            font: FontSection::default(),
            textures: TextureSection::default(),
            cursor: PathBuf::from("assets/textures/cursor.png"),
            sounds: SoundSection::default(),
            seed: None,
            credit: "Parking Servis".to_string(),
        }
    }
}

impl Default for WindowSection {
    fn default() -> Self {
        let platform = PlatformConfig::default();
        Self {
            title: platform.title,
            width: platform.width,
            height: platform.height,
        }
    }
}

impl Default for FontSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/fonts/Gill_Sans.otf"),
            pixel_size: 48.0,
        }
    }
}

impl Default for TextureSection {
    fn default() -> Self {
        Self {
            background: PathBuf::from("assets/textures/background_whole.jpg"),
            spot: PathBuf::from("assets/textures/parking_spot.png"),
            car: PathBuf::from("assets/textures/car.png"),
        }
    }
}

impl Default for SoundSection {
    fn default() -> Self {
        Self {
            park: PathBuf::from("assets/sounds/car_enter_parking.wav"),
            leave: PathBuf::from("assets/sounds/car_drive_off.wav"),
            indicator: PathBuf::from("assets/sounds/indicator_sound.wav"),
        }
    }
}

impl GameConfig {
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            title: self.window.title.clone(),
            width: self.window.width,
            height: self.window.height,
        }
    }
}

pub fn load_config_from_path(config_path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read config file {}: {e}", config_path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", config_path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Missing file means defaults; a file that fails to parse or validate is
/// reported and also falls back to defaults.
pub fn load_config_or_default(config_path: &Path) -> GameConfig {
    if !config_path.exists() {
        log::warn!(
            "Config '{}' not found, using defaults.",
            config_path.display()
        );
        return GameConfig::default();
    }
    match load_config_from_path(config_path) {
        Ok(config) => {
            log::info!("Loaded config '{}'", config_path.display());
            config
        }
        Err(err) => {
            log::error!("{err}. Using defaults.");
            GameConfig::default()
        }
    }
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.window.width == 0 || config.window.height == 0 {
        return Err(format!(
            "Config validation failed: window size {}x{} must be positive",
            config.window.width, config.window.height
        ));
    }
    if config.target_fps == 0 {
        return Err("Config validation failed: target_fps must be greater than 0".to_string());
    }
    if !(config.font.pixel_size.is_finite() && config.font.pixel_size > 0.0) {
        return Err(format!(
            "Config validation failed: font pixel_size {} must be positive",
            config.font.pixel_size
        ));
    }
    Ok(())
}
