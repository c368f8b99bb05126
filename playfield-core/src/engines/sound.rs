//! Sound handles and the one-shot sound engine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::{PlayerConfig, PlayfieldConfig};
use crate::engines::backend::{clamp_volume, AudioBackend, PlaybackSession, RenderSettings};
use crate::error::Result;

/// A decoded, in-memory audio clip with its own playback volume.
#[derive(Clone)]
pub struct Sound<C> {
    source: PathBuf,
    clip: C,
    volume: f32,
}

impl<C> Sound<C> {
    /// Wraps an already decoded clip. Volume starts at 1.0.
    pub fn new(source: PathBuf, clip: C) -> Self {
        Self {
            source,
            clip,
            volume: 1.0,
        }
    }

    /// Path the sound was loaded from, exactly as given.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn clip(&self) -> &C {
        &self.clip
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Sets the volume sessions started from this sound begin at. Clamped to 0.0-1.0.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
    }

    pub(crate) fn render_settings(&self, looping: bool) -> RenderSettings {
        RenderSettings {
            volume: self.volume,
            looping,
        }
    }
}

impl<C> std::fmt::Debug for Sound<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sound")
            .field("source", &self.source)
            .field("volume", &self.volume)
            .finish()
    }
}

/// Decodes `path` into a sound handle with volume 1.0.
pub fn load_sound<B: AudioBackend>(backend: &B, path: impl AsRef<Path>) -> Result<Sound<B::Clip>> {
    let path = path.as_ref();
    let clip = backend.decode(path)?;
    tracing::debug!("Loaded sound {}", path.display());
    Ok(Sound::new(path.to_path_buf(), clip))
}

/// Starts rendering `sound` once, at its own volume, without looping.
pub fn play_sound<B: AudioBackend>(backend: &B, sound: &Sound<B::Clip>) -> Result<B::Session> {
    backend.render(sound.clip(), sound.render_settings(false))
}

/// Configured extensions the backend cannot decode, in configured order.
pub fn unsupported_extensions<'c, B: AudioBackend>(
    backend: &B,
    config: &'c PlayerConfig,
) -> Vec<&'c str> {
    config
        .extensions
        .iter()
        .map(String::as_str)
        .filter(|ext| !backend.supports_extension(ext))
        .collect()
}

type ActiveSessions<S> = Arc<Mutex<HashMap<u64, S>>>;

/// Sound engine for fire-and-forget effects.
///
/// Keeps every spontaneous session alive until it reaches end-of-stream, at
/// which point the session retires itself from the engine.
pub struct SoundEngine<B: AudioBackend> {
    backend: Arc<B>,
    default_volume: f32,
    active: ActiveSessions<B::Session>,
    next_id: AtomicU64,
}

impl<B: AudioBackend> SoundEngine<B> {
    /// Creates a new sound engine. Warns once about configured extensions the
    /// backend cannot decode; loading those files will fail later at decode time.
    pub fn new(backend: Arc<B>, config: &PlayfieldConfig) -> Self {
        let unsupported = unsupported_extensions(backend.as_ref(), &config.player);
        if !unsupported.is_empty() {
            tracing::warn!(
                "Audio backend '{}' cannot decode: {}. Playback of these formats will fail.",
                backend.name(),
                unsupported.join(", ")
            );
        }

        Self {
            backend,
            default_volume: clamp_volume(config.sound.default_volume),
            active: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Loads a sound effect into memory. Its volume starts at the configured default.
    pub fn load_sound(&self, path: impl AsRef<Path>) -> Result<Sound<B::Clip>> {
        let mut sound = load_sound(self.backend.as_ref(), path)?;
        sound.set_volume(self.default_volume);
        Ok(sound)
    }

    /// Plays a sound asynchronously, returning its session immediately.
    pub fn play_sound(&self, sound: &Sound<B::Clip>) -> Result<B::Session> {
        let mut session = play_sound(self.backend.as_ref(), sound)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        if let Ok(mut active) = self.active.lock() {
            active.insert(id, session.clone());
        }

        let active = Arc::clone(&self.active);
        session.on_complete(Box::new(move || {
            if let Ok(mut active) = active.lock() {
                active.remove(&id);
            }
        }));

        tracing::debug!(
            "Playing {} at volume {:.2}",
            sound.source().display(),
            sound.volume()
        );
        Ok(session)
    }

    /// Stops all currently playing sounds. Returns how many were stopped.
    pub fn stop_all(&self) -> usize {
        let mut count = 0;

        if let Ok(mut active) = self.active.lock() {
            for (_, mut session) in active.drain() {
                session.stop();
                count += 1;
            }
        }

        count
    }

    /// Returns the number of currently playing sounds.
    /// Cleans up finished sessions as a side effect.
    pub fn playing_count(&self) -> usize {
        if let Ok(mut active) = self.active.lock() {
            active.retain(|_, session| !session.is_stopped());
            active.len()
        } else {
            0
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }
}

impl<B: AudioBackend> Drop for SoundEngine<B> {
    fn drop(&mut self) {
        self.stop_all();
    }
}
