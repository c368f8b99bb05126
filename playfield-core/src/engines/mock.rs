//! Recording backend for tests. Nothing reaches an audio device.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::engines::backend::{AudioBackend, CompletionCallback, PlaybackSession, RenderSettings};
use crate::error::{Error, Result};

/// Every call made against the backend or its sessions, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Decode(PathBuf),
    Render { source: PathBuf, settings: RenderSettings },
    Pause(usize),
    Resume(usize),
    Stop(usize),
    Seek(usize, f64),
    SetVolume(usize, f32),
    SetLooping(usize, bool),
}

#[derive(Clone, Debug)]
pub struct MockClip {
    pub source: PathBuf,
}

#[derive(Debug)]
struct SessionState {
    playing: bool,
    stopped: bool,
    volume: f32,
    looping: bool,
    position: f64,
}

#[derive(Default)]
pub struct MockBackend {
    events: Arc<Mutex<Vec<Event>>>,
    callbacks: Arc<Mutex<Vec<(usize, CompletionCallback)>>>,
    sessions: Mutex<Vec<Arc<Mutex<SessionState>>>>,
    fail_decode: bool,
    rejected: Option<String>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose decoder rejects every file.
    pub fn failing() -> Self {
        Self {
            fail_decode: true,
            ..Self::default()
        }
    }

    /// A backend whose decoder rejects only files named `file_name`.
    pub fn rejecting(file_name: &str) -> Self {
        Self {
            rejected: Some(file_name.to_string()),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn render_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Render { .. }))
            .count()
    }

    /// Simulates end-of-stream for session `id`: marks it stopped and fires its callbacks.
    pub fn finish(&self, id: usize) {
        if let Some(state) = self.sessions.lock().unwrap().get(id) {
            let mut state = state.lock().unwrap();
            state.playing = false;
            state.stopped = true;
        }
        let ready: Vec<CompletionCallback> = {
            let mut callbacks = self.callbacks.lock().unwrap();
            let (ready, pending): (Vec<_>, Vec<_>) =
                callbacks.drain(..).partition(|(owner, _)| *owner == id);
            *callbacks = pending;
            ready.into_iter().map(|(_, cb)| cb).collect()
        };
        for callback in ready {
            callback();
        }
    }
}

impl AudioBackend for MockBackend {
    type Clip = MockClip;
    type Session = MockSession;

    fn decode(&self, path: &Path) -> Result<Self::Clip> {
        self.events
            .lock()
            .unwrap()
            .push(Event::Decode(path.to_path_buf()));
        let rejected = self.rejected.as_deref().is_some_and(|name| {
            path.file_name().is_some_and(|file_name| file_name == name)
        });
        if self.fail_decode || rejected {
            return Err(Error::SoundDecode(
                path.display().to_string(),
                "unsupported".to_string(),
            ));
        }
        Ok(MockClip {
            source: path.to_path_buf(),
        })
    }

    fn render(&self, clip: &Self::Clip, settings: RenderSettings) -> Result<Self::Session> {
        self.events.lock().unwrap().push(Event::Render {
            source: clip.source.clone(),
            settings,
        });
        let state = Arc::new(Mutex::new(SessionState {
            playing: true,
            stopped: false,
            volume: settings.volume,
            looping: settings.looping,
            position: 0.0,
        }));
        let mut sessions = self.sessions.lock().unwrap();
        sessions.push(Arc::clone(&state));
        Ok(MockSession {
            id: sessions.len() - 1,
            state,
            events: Arc::clone(&self.events),
            callbacks: Arc::clone(&self.callbacks),
        })
    }

    fn supports_extension(&self, extension: &str) -> bool {
        extension != "mid"
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[derive(Clone)]
pub struct MockSession {
    pub id: usize,
    state: Arc<Mutex<SessionState>>,
    events: Arc<Mutex<Vec<Event>>>,
    callbacks: Arc<Mutex<Vec<(usize, CompletionCallback)>>>,
}

impl MockSession {
    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn volume(&self) -> f32 {
        self.state.lock().unwrap().volume
    }

    pub fn looping(&self) -> bool {
        self.state.lock().unwrap().looping
    }

    pub fn position(&self) -> f64 {
        self.state.lock().unwrap().position
    }

    /// Simulates the cursor advancing while rendering.
    pub fn advance(&self, seconds: f64) {
        self.state.lock().unwrap().position += seconds;
    }
}

impl PlaybackSession for MockSession {
    fn pause(&mut self) {
        self.record(Event::Pause(self.id));
        self.state.lock().unwrap().playing = false;
    }

    fn resume(&mut self) {
        self.record(Event::Resume(self.id));
        let mut state = self.state.lock().unwrap();
        if !state.stopped {
            state.playing = true;
        }
    }

    fn stop(&mut self) {
        self.record(Event::Stop(self.id));
        let mut state = self.state.lock().unwrap();
        state.playing = false;
        state.stopped = true;
    }

    fn seek(&mut self, position: f64) {
        self.record(Event::Seek(self.id, position));
        self.state.lock().unwrap().position = position;
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(Event::SetVolume(self.id, volume));
        self.state.lock().unwrap().volume = volume;
    }

    fn set_looping(&mut self, looping: bool) {
        self.record(Event::SetLooping(self.id, looping));
        self.state.lock().unwrap().looping = looping;
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    fn is_stopped(&self) -> bool {
        self.state.lock().unwrap().stopped
    }

    fn on_complete(&mut self, callback: CompletionCallback) {
        self.callbacks.lock().unwrap().push((self.id, callback));
    }
}
