//! Multi-track music player with exclusive and looping playback.
//!
//! Tracks are loaded by directory or by file and addressed by name (the file
//! name minus its extension). Playing a track lazily creates its session the
//! first time; later plays resume or restart that same session.

use std::path::Path;
use std::sync::Arc;

use crate::config::PlayerConfig;
use crate::engines::backend::{clamp_volume, AudioBackend, PlaybackSession};
use crate::engines::registry::{TrackRegistry, TrackSlot};
use crate::error::{Error, Result};

/// Background music player holding any number of named tracks.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use playfield_core::config::PlayerConfig;
/// use playfield_core::engines::{KiraBackend, MusicPlayer};
///
/// let backend = Arc::new(KiraBackend::new()?);
/// let mut player = MusicPlayer::new(backend, PlayerConfig::default());
/// player.load_directory("assets/music")?;
/// player.play("overworld")?;
/// # Ok::<(), playfield_core::Error>(())
/// ```
pub struct MusicPlayer<B: AudioBackend> {
    backend: Arc<B>,
    tracks: TrackRegistry<B>,
    /// Name of the track last played. Identifies the slot, does not own it.
    current: Option<String>,
    looping: bool,
    resume_on_play: bool,
    pause_others_on_play: bool,
    config: PlayerConfig,
}

impl<B: AudioBackend> MusicPlayer<B> {
    /// Creates a player with its flags taken from `config`.
    pub fn new(backend: Arc<B>, config: PlayerConfig) -> Self {
        Self {
            backend,
            tracks: TrackRegistry::new(),
            current: None,
            looping: config.looping,
            resume_on_play: config.resume_on_play,
            pause_others_on_play: config.pause_others_on_play,
            config,
        }
    }

    /// Loads every accepted media file in `dir`. Returns the track names loaded.
    pub fn load_directory(&mut self, dir: impl AsRef<Path>) -> Result<Vec<String>> {
        let config = &self.config;
        let loaded = self.tracks.load_directory(self.backend.as_ref(), dir.as_ref(), |path| {
            config.accepts(path)
        })?;
        for name in &loaded {
            self.forget_current_if(name);
        }
        Ok(loaded)
    }

    /// Loads a single file as a track. Returns the track name.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<String> {
        let name = self.tracks.load_file(self.backend.as_ref(), path.as_ref())?;
        self.forget_current_if(&name);
        Ok(name)
    }

    /// Plays the named track.
    ///
    /// With pause-others enabled the current track is paused first. A track
    /// played for the first time gets a new session at its own volume and the
    /// global loop flag. A track played before is resumed, or restarted from
    /// the beginning when `resume_on_play` is off. A track whose session has
    /// stopped, for example by reaching its end without looping, is rendered
    /// again from the start.
    pub fn play(&mut self, name: &str) -> Result<()> {
        if !self.tracks.contains(name) {
            return Err(Error::TrackNotFound(name.to_string()));
        }

        if self.pause_others_on_play {
            self.stop();
        }

        let looping = self.looping;
        let restart = !self.resume_on_play;
        let slot = self
            .tracks
            .get_mut(name)
            .ok_or_else(|| Error::TrackNotFound(name.to_string()))?;

        let started = match slot {
            TrackSlot::Unstarted(sound) => Some(
                self.backend
                    .render(sound.clip(), sound.render_settings(looping))?,
            ),
            // A session that ran to its end cannot be resumed.
            TrackSlot::Active { sound, session } if session.is_stopped() => Some(
                self.backend
                    .render(sound.clip(), sound.render_settings(looping))?,
            ),
            TrackSlot::Active { session, .. } => {
                if restart {
                    session.seek(0.0);
                }
                session.set_looping(looping);
                session.resume();
                tracing::info!(
                    "{} track '{}'",
                    if restart { "Restarted" } else { "Resumed" },
                    name
                );
                None
            }
        };

        if let Some(session) = started {
            self.tracks.replace_session(name, session)?;
            tracing::info!("Started track '{}' (loop: {})", name, looping);
        }

        self.current = Some(name.to_string());
        Ok(())
    }

    /// Pauses the current track. No-op if nothing has been played.
    pub fn stop(&mut self) {
        let Some(name) = self.current.as_deref() else {
            return;
        };
        if let Some(session) = self.tracks.get_mut(name).and_then(TrackSlot::session_mut) {
            session.pause();
            tracing::debug!("Paused track '{}'", name);
        }
    }

    /// Pauses one specific track. A track that was never played is left alone.
    pub fn stop_track(&mut self, name: &str) -> Result<()> {
        let slot = self
            .tracks
            .get_mut(name)
            .ok_or_else(|| Error::TrackNotFound(name.to_string()))?;

        if let Some(session) = slot.session_mut() {
            session.pause();
            tracing::debug!("Paused track '{}'", name);
        }
        Ok(())
    }

    /// Sets the volume (0.0-1.0) of every track that has a session.
    /// Tracks never played keep the volume stored on their sound.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = clamp_volume(volume);
        for session in self.tracks.sessions_mut() {
            session.set_volume(volume);
        }
        tracing::debug!("Set volume of all active tracks to {:.2}", volume);
    }

    /// Sets the volume (0.0-1.0) of one track. A track never played remembers
    /// it and starts at that volume.
    pub fn set_track_volume(&mut self, name: &str, volume: f32) -> Result<()> {
        let slot = self
            .tracks
            .get_mut(name)
            .ok_or_else(|| Error::TrackNotFound(name.to_string()))?;

        slot.sound_mut().set_volume(volume);
        let volume = slot.sound().volume();
        if let Some(session) = slot.session_mut() {
            session.set_volume(volume);
        }
        tracing::debug!("Set volume of '{}' to {:.2}", name, volume);
        Ok(())
    }

    /// Sets the global loop flag and applies it to every track with a session.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        for session in self.tracks.sessions_mut() {
            session.set_looping(looping);
        }
        tracing::debug!("Looping {}", if looping { "enabled" } else { "disabled" });
    }

    /// Stops playback, forgets the current track and unloads every track.
    pub fn clear(&mut self) {
        self.stop();
        self.current = None;
        self.tracks.clear();
    }

    /// Whether any track is currently playing.
    pub fn is_playing(&self) -> bool {
        self.tracks.sessions().any(PlaybackSession::is_playing)
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Names of all loaded tracks, sorted.
    pub fn tracks(&self) -> Vec<String> {
        self.tracks.names()
    }

    /// Name of the track last played, if it is still loaded.
    pub fn current_track(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Session of the track last played.
    pub fn current_session(&self) -> Option<&B::Session> {
        self.current
            .as_deref()
            .and_then(|name| self.tracks.get(name))
            .and_then(TrackSlot::session)
    }

    /// Whether replaying a track resumes it (true) or restarts it (false).
    pub fn resume_on_play(&self) -> bool {
        self.resume_on_play
    }

    pub fn set_resume_on_play(&mut self, resume: bool) {
        self.resume_on_play = resume;
    }

    /// Whether playing a track pauses the current one first.
    pub fn pause_others(&self) -> bool {
        self.pause_others_on_play
    }

    pub fn set_pause_others(&mut self, pause_others: bool) {
        self.pause_others_on_play = pause_others;
    }

    pub fn registry(&self) -> &TrackRegistry<B> {
        &self.tracks
    }

    /// A reload replaced the slot `current` pointed at, and with it the session.
    fn forget_current_if(&mut self, name: &str) {
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
    }
}

impl<B: AudioBackend> Drop for MusicPlayer<B> {
    fn drop(&mut self) {
        self.clear();
    }
}
