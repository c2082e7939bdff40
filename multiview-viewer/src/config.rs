//! Viewer configuration

use serde::{Deserialize, Serialize};

/// Viewer controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Maximum number of simultaneous sources the layout is sized for
    /// (1 main view + the tile strip). This is a layout assumption for the
    /// presentation layer; the controller does not truncate the tile list.
    pub max_sources: usize,

    /// Whether tile previews play muted
    pub mute_tiles: bool,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_sources: 4,
            mute_tiles: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Number of tile slots the layout allocates next to the main view.
    #[must_use]
    pub const fn tile_capacity(&self) -> usize {
        self.max_sources.saturating_sub(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert_eq!(config.max_sources, 4);
        assert_eq!(config.tile_capacity(), 3);
        assert!(config.mute_tiles);
        assert_eq!(config.logging.level, "info");
    }
}
