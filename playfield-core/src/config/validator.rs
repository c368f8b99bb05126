//! Configuration validation.

use crate::config::types::{PlayerConfig, PlayfieldConfig, SoundConfig, TileMapConfig};
use crate::error::{Error, Result};

/// Validator for playfield configurations.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Creates a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Validates a playfield configuration.
    pub fn validate(&self, config: &PlayfieldConfig) -> Result<()> {
        self.validate_player(&config.player)?;
        self.validate_sound(&config.sound)?;
        self.validate_tilemap(&config.tilemap)?;
        Ok(())
    }

    fn validate_player(&self, player: &PlayerConfig) -> Result<()> {
        for ext in &player.extensions {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(Error::ConfigValidation(
                    "player.extensions".to_string(),
                    format!("Invalid extension '{}'. Use bare names like 'ogg'", ext),
                ));
            }
        }
        Ok(())
    }

    fn validate_sound(&self, sound: &SoundConfig) -> Result<()> {
        if !(0.0..=1.0).contains(&sound.default_volume) {
            return Err(Error::ConfigValidation(
                "sound.default_volume".to_string(),
                format!("Volume {} must be between 0.0 and 1.0", sound.default_volume),
            ));
        }
        Ok(())
    }

    fn validate_tilemap(&self, tilemap: &TileMapConfig) -> Result<()> {
        if !(tilemap.scale > 0.0) {
            return Err(Error::ConfigValidation(
                "tilemap.scale".to_string(),
                "Scale must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
