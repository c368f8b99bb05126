//! kira-backed audio output.
//!
//! All sessions play through one kira `AudioManager` (one cpal stream), owned
//! by a [`KiraBackend`] that callers share behind an `Arc`. Each session gets
//! its own `StaticSoundHandle` with per-sound volume via kira's internal mixer.

use std::path::Path;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::sound::{PlaybackState, Region};
use kira::{AudioManager, AudioManagerSettings, Decibels, DefaultBackend, Tween};

use crate::engines::backend::{
    clamp_volume, AudioBackend, CompletionCallback, PlaybackSession, RenderSettings,
};
use crate::error::{Error, Result};

/// Extensions kira decodes with its default symphonia features.
const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg", "flac"];

/// How often a completion watcher polls its session.
const WATCH_INTERVAL: Duration = Duration::from_millis(100);

/// Converts a linear 0.0-1.0 amplitude to kira decibels.
pub fn volume_to_db(volume: f32) -> Decibels {
    let volume = clamp_volume(volume);
    if volume <= 0.0 {
        return Decibels::SILENCE;
    }
    Decibels((20.0 * volume.log10()).max(Decibels::SILENCE.0))
}

/// Audio backend driving the default output device through kira.
pub struct KiraBackend {
    manager: Mutex<AudioManager<DefaultBackend>>,
}

impl KiraBackend {
    /// Opens the default output device.
    pub fn new() -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| Error::NoAudioDevice(e.to_string()))?;
        tracing::info!("Initialized kira audio output");
        Ok(Self {
            manager: Mutex::new(manager),
        })
    }
}

impl AudioBackend for KiraBackend {
    type Clip = StaticSoundData;
    type Session = KiraSession;

    fn decode(&self, path: &Path) -> Result<Self::Clip> {
        StaticSoundData::from_file(path)
            .map_err(|e| Error::SoundDecode(path.display().to_string(), e.to_string()))
    }

    fn render(&self, clip: &Self::Clip, settings: RenderSettings) -> Result<Self::Session> {
        let data = clip.clone().volume(volume_to_db(settings.volume));
        let data = if settings.looping {
            data.loop_region(..)
        } else {
            data
        };

        let handle = {
            let mut manager = self
                .manager
                .lock()
                .map_err(|_| Error::SoundPlayback("Audio manager lock poisoned".to_string()))?;
            manager
                .play(data)
                .map_err(|e| Error::SoundPlayback(e.to_string()))?
        };

        Ok(KiraSession {
            handle: Arc::new(Mutex::new(handle)),
        })
    }

    fn supports_extension(&self, extension: &str) -> bool {
        SUPPORTED_EXTENSIONS
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(extension))
    }

    fn name(&self) -> &'static str {
        "kira"
    }
}

/// A sound playing through the shared `AudioManager`.
#[derive(Clone)]
pub struct KiraSession {
    handle: Arc<Mutex<StaticSoundHandle>>,
}

impl KiraSession {
    fn with_handle<T>(&self, f: impl FnOnce(&mut StaticSoundHandle) -> T) -> Option<T> {
        self.handle.lock().ok().map(|mut handle| f(&mut handle))
    }

    fn state(&self) -> PlaybackState {
        self.with_handle(|h| h.state())
            .unwrap_or(PlaybackState::Stopped)
    }
}

impl PlaybackSession for KiraSession {
    fn pause(&mut self) {
        self.with_handle(|h| h.pause(Tween::default()));
    }

    fn resume(&mut self) {
        self.with_handle(|h| h.resume(Tween::default()));
    }

    fn stop(&mut self) {
        self.with_handle(|h| h.stop(Tween::default()));
    }

    fn seek(&mut self, position: f64) {
        self.with_handle(|h| h.seek_to(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.with_handle(|h| h.set_volume(volume_to_db(volume), Tween::default()));
    }

    fn set_looping(&mut self, looping: bool) {
        if looping {
            self.with_handle(|h| h.set_loop_region(..));
        } else {
            self.with_handle(|h| h.set_loop_region(None::<Region>));
        }
    }

    fn is_playing(&self) -> bool {
        matches!(
            self.state(),
            PlaybackState::Playing | PlaybackState::Pausing | PlaybackState::Resuming
        )
    }

    fn is_stopped(&self) -> bool {
        matches!(self.state(), PlaybackState::Stopped)
    }

    fn on_complete(&mut self, callback: CompletionCallback) {
        let handle: Weak<Mutex<StaticSoundHandle>> = Arc::downgrade(&self.handle);
        let spawned = std::thread::Builder::new()
            .name("session-watcher".into())
            .spawn(move || watch_until_stopped(handle, callback));
        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn session watcher: {}", e);
        }
    }
}

/// Polls the handle until kira reports it stopped, then fires the callback.
/// Exits quietly once every owner of the session has dropped it.
fn watch_until_stopped(handle: Weak<Mutex<StaticSoundHandle>>, callback: CompletionCallback) {
    loop {
        std::thread::sleep(WATCH_INTERVAL);

        let Some(handle) = handle.upgrade() else {
            return;
        };
        let stopped = match handle.lock() {
            Ok(h) => matches!(h.state(), PlaybackState::Stopped),
            Err(_) => true,
        };
        if stopped {
            break;
        }
    }
    callback();
}
