use crate::error::PlanetError;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, OnceLock};

pub const CONFIG_FILE: &str = "icoplanet_config.toml";

static CONFIG: OnceLock<Mutex<PlanetGenConfig>> = OnceLock::new();

/// Get a copy of the current configuration, loading it from disk on first use.
/// A missing or malformed file falls back to the defaults.
pub fn get_config() -> PlanetGenConfig {
    let config_mutex = CONFIG.get_or_init(|| Mutex::new(load_or_default(CONFIG_FILE)));
    match config_mutex.lock() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn reload_config() {
    let new_config = load_or_default(CONFIG_FILE);
    let config_mutex = CONFIG.get_or_init(|| Mutex::new(new_config.clone()));
    match config_mutex.lock() {
        Ok(mut config) => *config = new_config,
        Err(poisoned) => *poisoned.into_inner() = new_config,
    }
}

fn load_or_default(path: &str) -> PlanetGenConfig {
    match PlanetGenConfig::load_from_file(path) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("using default planet config ({err})");
            PlanetGenConfig::default()
        }
    }
}

pub type UvTriangle = [[f32; 2]; 3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetGenConfig {
    pub generation: GenerationConfig,
    pub uv_atlas: UvAtlasConfig,
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub radius: f32,
    /// Share of level-0 faces seeded with a fault link, in (0, 1)
    pub node_density: f32,
    pub max_depth: usize,
    pub initial_depth: usize,
}

/// Debug UV triangles, listed as (top, left, right)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvAtlasConfig {
    pub plain: UvTriangle,
    pub link: UvTriangle,
    pub intersection: UvTriangle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    pub default_color: [f32; 4],
}

impl Default for UvAtlasConfig {
    fn default() -> Self {
        Self {
            plain: [[0.75, 1.0], [0.5, 0.5], [1.0, 0.5]],
            link: [[0.25, 0.5], [0.0, 0.0], [0.5, 0.0]],
            intersection: [[0.25, 1.0], [0.0, 0.5], [0.5, 0.5]],
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            default_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl Default for PlanetGenConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig {
                radius: 2.0,
                node_density: 0.15,
                max_depth: 7,
                initial_depth: 0,
            },
            uv_atlas: UvAtlasConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl PlanetGenConfig {
    pub fn load_from_file(path: &str) -> Result<Self, PlanetError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PlanetError::Config(format!("{path}: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, PlanetError> {
        toml::from_str(content).map_err(|e| PlanetError::Config(e.to_string()))
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), PlanetError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| PlanetError::Config(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| PlanetError::Config(format!("{path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_survives_toml_round_trip() {
        let config = PlanetGenConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(PlanetGenConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn parses_hand_written_file() {
        let text = r#"
            [generation]
            radius = 1.0
            node_density = 0.3
            max_depth = 5
            initial_depth = 2

            [uv_atlas]
            plain = [[0.75, 1.0], [0.5, 0.5], [1.0, 0.5]]
            link = [[0.25, 0.5], [0.0, 0.0], [0.5, 0.0]]
            intersection = [[0.25, 1.0], [0.0, 0.5], [0.5, 0.5]]

            [colors]
            default_color = [0.5, 0.5, 0.5, 1.0]
        "#;
        let config = PlanetGenConfig::from_toml(text).unwrap();
        assert_eq!(config.generation.max_depth, 5);
        assert_eq!(config.generation.node_density, 0.3);
        assert_eq!(config.colors.default_color, [0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn missing_section_is_a_config_error() {
        let err = PlanetGenConfig::from_toml("[generation]\nradius = 1.0\n").unwrap_err();
        assert!(matches!(err, PlanetError::Config(_)));
    }

    #[test]
    fn saved_file_loads_back_unchanged() {
        let mut config = PlanetGenConfig::default();
        config.generation.node_density = 0.4;
        config.generation.max_depth = 3;
        config.colors.default_color = [0.1, 0.2, 0.3, 1.0];

        let file = format!("icoplanet_config_{}.toml", std::process::id());
        let path = std::env::temp_dir().join(file).to_string_lossy().into_owned();
        config.save_to_file(&path).unwrap();
        let loaded = PlanetGenConfig::load_from_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn save_into_missing_directory_is_a_config_error() {
        let err = PlanetGenConfig::default()
            .save_to_file("/nonexistent/dir/icoplanet.toml")
            .unwrap_err();
        assert!(matches!(err, PlanetError::Config(_)));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = PlanetGenConfig::load_from_file("/nonexistent/icoplanet.toml").unwrap_err();
        assert!(matches!(err, PlanetError::Config(_)));
    }
}
