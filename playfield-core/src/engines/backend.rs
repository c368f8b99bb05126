//! Seam between the players and the platform audio engine.
//!
//! The production implementation is [`KiraBackend`](super::KiraBackend). The
//! players only ever talk to these traits, so they run unchanged against a
//! recording backend in tests.

use std::path::Path;

use crate::error::Result;

/// Completion callback invoked once a session reaches end-of-stream.
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Parameters a session starts rendering with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Linear amplitude, 0.0-1.0.
    pub volume: f32,
    pub looping: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            looping: false,
        }
    }
}

/// A platform audio engine able to decode files and render them.
pub trait AudioBackend: Send + Sync {
    /// Decoded, in-memory audio. Cloning must be cheap and share the samples.
    type Clip: Clone + Send + 'static;
    /// A live rendering of a clip.
    type Session: PlaybackSession;

    /// Decodes the file at `path` into memory.
    fn decode(&self, path: &Path) -> Result<Self::Clip>;

    /// Starts rendering `clip` on the output device.
    fn render(&self, clip: &Self::Clip, settings: RenderSettings) -> Result<Self::Session>;

    /// Whether files with this extension can be decoded.
    fn supports_extension(&self, extension: &str) -> bool;

    /// Short backend name for logging.
    fn name(&self) -> &'static str;
}

/// A live, controllable instance of a clip being rendered.
///
/// Sessions are handles: clones refer to the same rendering.
pub trait PlaybackSession: Clone + Send + 'static {
    fn pause(&mut self);
    fn resume(&mut self);
    /// Stops rendering for good. A stopped session cannot be resumed.
    fn stop(&mut self);
    /// Moves the playback cursor to `position` seconds.
    fn seek(&mut self, position: f64);
    fn set_volume(&mut self, volume: f32);
    fn set_looping(&mut self, looping: bool);
    fn is_playing(&self) -> bool;
    fn is_stopped(&self) -> bool;
    /// Registers `callback` to run once the session stops on its own or is stopped.
    /// It may run on another thread.
    fn on_complete(&mut self, callback: CompletionCallback);
}

/// Clamps a requested volume into the 0.0-1.0 range the backends accept.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}
