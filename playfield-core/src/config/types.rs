//! Configuration types for the audio player, sound engine and tile maps.

use serde::{Deserialize, Serialize};

/// Complete playfield configuration loaded from YAML.
///
/// Every section and field has a default, so an empty document is a valid
/// config.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayfieldConfig {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub tilemap: TileMapConfig,
    /// Full path to the source YAML file this config was loaded from.
    #[serde(skip)]
    pub source_path: Option<std::path::PathBuf>,
}

/// Multi-track music player configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Global loop flag applied to every session the player creates.
    #[serde(default = "default_true", rename = "loop")]
    pub looping: bool,
    /// When true, replaying a track resumes where it was paused.
    /// When false, every play restarts the track from the beginning.
    #[serde(default = "default_true")]
    pub resume_on_play: bool,
    /// Pause the current track before another one starts.
    #[serde(default = "default_true")]
    pub pause_others_on_play: bool,
    /// File extensions picked up by `load_directory`. Empty accepts every file.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            looping: true,
            resume_on_play: true,
            pause_others_on_play: true,
            extensions: default_extensions(),
        }
    }
}

impl PlayerConfig {
    /// Returns true if `path` has one of the accepted extensions.
    pub fn accepts(&self, path: &std::path::Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| {
                self.extensions
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(ext))
            })
    }
}

/// One-shot sound engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SoundConfig {
    /// Volume given to freshly loaded sounds (0.0-1.0).
    #[serde(default = "default_volume")]
    pub default_volume: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
        }
    }
}

/// Tile map sprite generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TileMapConfig {
    #[serde(default)]
    pub resolution: TileResolution,
    /// Default scale applied to generated sprites.
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl Default for TileMapConfig {
    fn default() -> Self {
        Self {
            resolution: TileResolution::default(),
            scale: default_scale(),
        }
    }
}

/// How sprite generation treats layers and tiles it cannot resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TileResolution {
    /// Log a warning and skip the offending layer or cell.
    #[default]
    Lenient,
    /// Fail with an error.
    Strict,
}

fn default_true() -> bool {
    true
}

fn default_volume() -> f32 {
    1.0
}

fn default_scale() -> f32 {
    1.0
}

fn default_extensions() -> Vec<String> {
    ["wav", "mp3", "ogg", "flac"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: PlayfieldConfig = serde_yaml::from_str("{}").unwrap();

        assert!(config.player.looping);
        assert!(config.player.resume_on_play);
        assert!(config.player.pause_others_on_play);
        assert_eq!(config.player.extensions.len(), 4);
        assert_eq!(config.sound.default_volume, 1.0);
        assert_eq!(config.tilemap.resolution, TileResolution::Lenient);
    }

    #[test]
    fn test_parse_player_section() {
        let yaml = r#"
player:
  loop: false
  resume_on_play: false
  extensions: [ogg]
tilemap:
  resolution: strict
  scale: 0.5
"#;
        let config: PlayfieldConfig = serde_yaml::from_str(yaml).unwrap();

        assert!(!config.player.looping);
        assert!(!config.player.resume_on_play);
        assert!(config.player.pause_others_on_play);
        assert_eq!(config.player.extensions, vec!["ogg".to_string()]);
        assert_eq!(config.tilemap.resolution, TileResolution::Strict);
        assert_eq!(config.tilemap.scale, 0.5);
    }

    #[test]
    fn test_accepts_extension_case_insensitive() {
        let config = PlayerConfig::default();

        assert!(config.accepts(Path::new("music/theme.OGG")));
        assert!(config.accepts(Path::new("laser.wav")));
        assert!(!config.accepts(Path::new("notes.txt")));
        assert!(!config.accepts(Path::new("README")));
    }

    #[test]
    fn test_empty_extension_list_accepts_everything() {
        let config = PlayerConfig {
            extensions: Vec::new(),
            ..PlayerConfig::default()
        };

        assert!(config.accepts(Path::new("README")));
        assert!(config.accepts(Path::new("notes.txt")));
    }
}
