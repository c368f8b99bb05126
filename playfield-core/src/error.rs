//! Error types for playfield-core.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the playfield-core library.
#[derive(Error, Debug)]
pub enum Error {
    // Config errors
    #[error("Failed to load config '{0}': {1}")]
    ConfigLoad(String, String),

    #[error("Failed to parse config '{0}': {1}")]
    ConfigParse(String, String),

    #[error("Config validation error in '{0}': {1}")]
    ConfigValidation(String, String),

    #[error("Failed to acquire cache lock")]
    CacheLock,

    // Track registry / player errors
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Track '{0}' does not exist in loaded music")]
    TrackNotFound(String),

    #[error("Track '{0}' already has an active playback session")]
    AlreadyActive(String),

    // Audio backend errors
    #[error("No audio output device available: {0}")]
    NoAudioDevice(String),

    #[error("Failed to decode sound '{0}': {1}")]
    SoundDecode(String, String),

    #[error("Failed to play sound: {0}")]
    SoundPlayback(String),

    // Tile map errors
    #[error("Failed to load tile map '{0}': {1}")]
    TileMapLoad(String, String),

    #[error("No layer named '{0}'")]
    LayerNotFound(String),

    #[error("No tile found for gid {0}")]
    TileNotFound(u32),

    #[error("Tile with gid {0} has no image")]
    TileImageMissing(u32),

    // Generic errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
