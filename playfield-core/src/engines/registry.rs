//! Track registry: named slots holding either a loaded sound or its live session.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::engines::backend::{AudioBackend, PlaybackSession};
use crate::engines::sound::{load_sound, Sound};
use crate::error::{Error, Result};

/// One registry entry.
///
/// A slot starts `Unstarted` and becomes `Active` the first time its track is
/// played. It never goes back; reloading the name replaces the whole slot.
pub enum TrackSlot<B: AudioBackend> {
    Unstarted(Sound<B::Clip>),
    Active {
        sound: Sound<B::Clip>,
        session: B::Session,
    },
}

impl<B: AudioBackend> TrackSlot<B> {
    pub fn sound(&self) -> &Sound<B::Clip> {
        match self {
            TrackSlot::Unstarted(sound) | TrackSlot::Active { sound, .. } => sound,
        }
    }

    pub fn sound_mut(&mut self) -> &mut Sound<B::Clip> {
        match self {
            TrackSlot::Unstarted(sound) | TrackSlot::Active { sound, .. } => sound,
        }
    }

    pub fn session(&self) -> Option<&B::Session> {
        match self {
            TrackSlot::Unstarted(_) => None,
            TrackSlot::Active { session, .. } => Some(session),
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut B::Session> {
        match self {
            TrackSlot::Unstarted(_) => None,
            TrackSlot::Active { session, .. } => Some(session),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TrackSlot::Active { .. })
    }

    /// Stops the session, if any, before the slot is released.
    fn release(self) {
        if let TrackSlot::Active { mut session, .. } = self {
            session.stop();
        }
    }
}

/// Derives a track name from a file path: the file name with its last
/// extension removed. `theme.tar.ogg` becomes `theme.tar`.
pub fn track_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

fn decode_track<B: AudioBackend>(backend: &B, path: &Path) -> Result<(String, Sound<B::Clip>)> {
    let name = track_name(path).ok_or_else(|| {
        Error::SoundDecode(path.display().to_string(), "File has no usable name".to_string())
    })?;
    Ok((name, load_sound(backend, path)?))
}

/// Mapping from track name to its slot.
pub struct TrackRegistry<B: AudioBackend> {
    tracks: HashMap<String, TrackSlot<B>>,
}

impl<B: AudioBackend> TrackRegistry<B> {
    pub fn new() -> Self {
        Self {
            tracks: HashMap::new(),
        }
    }

    /// Loads every accepted file of `dir` as an unstarted track.
    ///
    /// Files are visited in name order, so when two files map to the same track
    /// name the later one wins. Existing tracks with the same names are
    /// replaced. Returns the names loaded.
    pub fn load_directory(
        &mut self,
        backend: &B,
        dir: &Path,
        accept: impl Fn(&Path) -> bool,
    ) -> Result<Vec<String>> {
        if !dir.is_dir() {
            return Err(Error::DirectoryNotFound(dir.to_path_buf()));
        }

        let mut paths: Vec<_> = fs::read_dir(dir)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && accept(path))
            .collect();
        paths.sort();

        // Decode everything before touching any slot, so a bad file leaves the
        // registry as it was.
        let mut decoded = Vec::with_capacity(paths.len());
        for path in &paths {
            decoded.push(decode_track(backend, path)?);
        }

        let mut loaded = Vec::with_capacity(decoded.len());
        for (name, sound) in decoded {
            self.insert(name.clone(), sound);
            loaded.push(name);
        }

        tracing::info!("Loaded {} tracks from {}", loaded.len(), dir.display());
        Ok(loaded)
    }

    /// Loads one file as an unstarted track named after it. Returns the name.
    pub fn load_file(&mut self, backend: &B, path: &Path) -> Result<String> {
        let (name, sound) = decode_track(backend, path)?;
        self.insert(name.clone(), sound);
        Ok(name)
    }

    /// Inserts an unstarted track, stopping and releasing whatever held the name.
    /// Returns true if an existing track was replaced.
    pub fn insert(&mut self, name: String, sound: Sound<B::Clip>) -> bool {
        match self.tracks.insert(name, TrackSlot::Unstarted(sound)) {
            Some(previous) => {
                previous.release();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&TrackSlot<B>> {
        self.tracks.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TrackSlot<B>> {
        self.tracks.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tracks.contains_key(name)
    }

    /// Moves an unstarted track to the active state with `session`.
    pub fn promote(&mut self, name: &str, session: B::Session) -> Result<&mut B::Session> {
        let slot = self
            .tracks
            .remove(name)
            .ok_or_else(|| Error::TrackNotFound(name.to_string()))?;

        let sound = match slot {
            TrackSlot::Unstarted(sound) => sound,
            active @ TrackSlot::Active { .. } => {
                self.tracks.insert(name.to_string(), active);
                return Err(Error::AlreadyActive(name.to_string()));
            }
        };

        let slot = self
            .tracks
            .entry(name.to_string())
            .or_insert(TrackSlot::Active { sound, session });
        slot.session_mut()
            .ok_or_else(|| Error::AlreadyActive(name.to_string()))
    }

    /// Gives a track a new session in place of one that has stopped, such as a
    /// non-looping track that reached its end. An unstarted track is promoted.
    pub fn replace_session(&mut self, name: &str, session: B::Session) -> Result<()> {
        match self.tracks.get_mut(name) {
            None => return Err(Error::TrackNotFound(name.to_string())),
            Some(TrackSlot::Active { session: current, .. }) => {
                if !current.is_stopped() {
                    return Err(Error::AlreadyActive(name.to_string()));
                }
                *current = session;
                return Ok(());
            }
            Some(TrackSlot::Unstarted(_)) => {}
        }
        self.promote(name, session).map(|_| ())
    }

    /// Sessions of every active track.
    pub fn sessions(&self) -> impl Iterator<Item = &B::Session> {
        self.tracks.values().filter_map(TrackSlot::session)
    }

    pub fn sessions_mut(&mut self) -> impl Iterator<Item = &mut B::Session> {
        self.tracks.values_mut().filter_map(TrackSlot::session_mut)
    }

    /// Track names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tracks.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Stops every session and empties the registry.
    pub fn clear(&mut self) {
        for (_, slot) in self.tracks.drain() {
            slot.release();
        }
    }
}

impl<B: AudioBackend> Default for TrackRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}
