//! Playfield Core - audio and tile map helpers for 2D games.
//!
//! This library provides:
//! - Configuration loading and validation from YAML files
//! - A one-shot sound engine for effects (`load_sound` / `play_sound`)
//! - A multi-track music player with named tracks, looping and exclusive playback
//! - Reading Tiled Map Editor maps and generating sprites from their tile layers
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use playfield_core::config::ConfigLoader;
//! use playfield_core::engines::{KiraBackend, MusicPlayer, SoundEngine};
//! use playfield_core::tilemap::{generate_sprites, read_tiled_map};
//!
//! let config = ConfigLoader::new("config").load_or_default("playfield.yaml")?;
//! let backend = Arc::new(KiraBackend::new()?);
//!
//! // Play a sound effect
//! let sounds = SoundEngine::new(Arc::clone(&backend), &config);
//! let laser = sounds.load_sound("sounds/laser1.wav")?;
//! sounds.play_sound(&laser)?;
//!
//! // Background music
//! let mut music = MusicPlayer::new(backend, config.player.clone());
//! music.load_directory("music")?;
//! music.play("overworld")?;
//!
//! // Level geometry
//! let map = read_tiled_map("maps/level_1.tmx")?;
//! let platforms = generate_sprites(&map, "Platforms", config.tilemap.scale, "maps/");
//! # Ok::<(), playfield_core::Error>(())
//! ```

pub mod config;
pub mod engines;
pub mod error;
pub mod tilemap;

pub use error::{Error, Result};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::config::{
        ConfigLoader, PlayerConfig, PlayfieldConfig, SoundConfig, TileMapConfig, TileResolution,
    };
    pub use crate::engines::{
        AudioBackend, KiraBackend, MusicPlayer, PlaybackSession, Sound, SoundEngine,
    };
    pub use crate::error::{Error, Result};
    pub use crate::tilemap::{
        generate_sprites, read_tiled_map, try_generate_sprites, Sprite, SpriteList, TileMap,
    };
}
