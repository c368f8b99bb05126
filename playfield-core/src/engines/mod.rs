//! Audio engines: the backend seam, one-shot sounds and the multi-track music player.

pub mod audio_output;
mod backend;
#[cfg(test)]
pub(crate) mod mock;
mod music;
mod registry;
mod sound;

pub use audio_output::{KiraBackend, KiraSession};
pub use backend::{AudioBackend, CompletionCallback, PlaybackSession, RenderSettings};
pub use music::MusicPlayer;
pub use registry::{track_name, TrackRegistry, TrackSlot};
pub use sound::{load_sound, play_sound, unsupported_extensions, Sound, SoundEngine};
