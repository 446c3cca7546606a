//! Sound cues for lot events.
//!
//! Cue files are read on a background thread at startup so the first frame is
//! not held up by disk I/O. The raw bytes live in a shared `CueBank`; each
//! `play` decodes a fresh source from them. `RodioCuePlayer` sends that source
//! to the default output device, `LoggingCuePlayer` only records it and is
//! used when no device can be opened.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Source};

use crate::config::SoundSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Park,
    Leave,
    Indicator,
}

impl Cue {
    pub fn label(self) -> &'static str {
        match self {
            Cue::Park => "park",
            Cue::Leave => "leave",
            Cue::Indicator => "indicator",
        }
    }
}

pub trait CuePlayer {
    fn play(&mut self, cue: Cue);
}

type CueBytes = Arc<[u8]>;

/// Encoded cue files keyed by cue, filled in by the preload thread.
#[derive(Clone, Default)]
pub struct CueBank {
    clips: Arc<Mutex<HashMap<Cue, CueBytes>>>,
}

impl CueBank {
    /// Starts reading the cue files and returns immediately. The handle is
    /// only needed by callers that must wait for the preload.
    pub fn preload(sounds: &SoundSection) -> (Self, JoinHandle<()>) {
        let bank = Self::default();
        let sources: Vec<(Cue, PathBuf)> = vec![
            (Cue::Park, sounds.park.clone()),
            (Cue::Leave, sounds.leave.clone()),
            (Cue::Indicator, sounds.indicator.clone()),
        ];
        let shared = bank.clone();
        let handle = std::thread::spawn(move || {
            for (cue, path) in sources {
                match std::fs::read(&path) {
                    Ok(bytes) => {
                        log::debug!(
                            "Cue '{}' preloaded from '{}' ({} bytes)",
                            cue.label(),
                            path.display(),
                            bytes.len()
                        );
                        shared.insert(cue, bytes);
                    }
                    Err(err) => {
                        log::warn!(
                            "Failed to preload cue '{}' from '{}': {err}",
                            cue.label(),
                            path.display()
                        );
                    }
                }
            }
        });
        (bank, handle)
    }

    fn insert(&self, cue: Cue, bytes: Vec<u8>) {
        if let Ok(mut clips) = self.clips.lock() {
            clips.insert(cue, Arc::from(bytes));
        }
    }

    fn clip(&self, cue: Cue) -> Option<CueBytes> {
        self.clips
            .lock()
            .ok()
            .and_then(|clips| clips.get(&cue).cloned())
    }

    pub fn is_loaded(&self, cue: Cue) -> bool {
        self.clip(cue).is_some()
    }

    /// A new decoder over the cue's bytes, positioned at the start.
    pub fn decode(&self, cue: Cue) -> Result<Decoder<Cursor<CueBytes>>, String> {
        let bytes = self
            .clip(cue)
            .ok_or_else(|| format!("Cue '{}' not loaded", cue.label()))?;
        Decoder::new(Cursor::new(bytes))
            .map_err(|e| format!("Failed to decode cue '{}': {e}", cue.label()))
    }
}

pub struct RodioCuePlayer {
    // Dropping the stream silences every sink on it.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    bank: CueBank,
}

impl RodioCuePlayer {
    pub fn open(bank: CueBank) -> Result<Self, String> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| format!("Failed to open audio output: {e}"))?;
        Ok(Self {
            _stream: stream,
            handle,
            bank,
        })
    }
}

impl CuePlayer for RodioCuePlayer {
    fn play(&mut self, cue: Cue) {
        let source = match self.bank.decode(cue) {
            Ok(source) => source,
            Err(err) => {
                log::debug!("{err}, skipped");
                return;
            }
        };
        if let Err(err) = self.handle.play_raw(source.convert_samples::<f32>()) {
            log::warn!("Failed to play cue '{}': {err}", cue.label());
        }
    }
}

pub struct LoggingCuePlayer {
    bank: CueBank,
    played: Vec<Cue>,
}

impl LoggingCuePlayer {
    pub fn new(bank: CueBank) -> Self {
        Self {
            bank,
            played: Vec::new(),
        }
    }

    /// Cues that decoded successfully, in play order.
    pub fn played(&self) -> &[Cue] {
        &self.played
    }
}

impl CuePlayer for LoggingCuePlayer {
    fn play(&mut self, cue: Cue) {
        match self.bank.decode(cue) {
            Ok(source) => {
                log::info!(
                    "Playing cue '{}' ({} Hz, {} ch)",
                    cue.label(),
                    source.sample_rate(),
                    source.channels()
                );
                self.played.push(cue);
            }
            Err(err) => log::debug!("{err}, skipped"),
        }
    }
}

/// Preloads the cues and opens the default output device, falling back to
/// the logging player when there is none.
pub fn open_player(sounds: &SoundSection) -> Box<dyn CuePlayer> {
    let (bank, _preload) = CueBank::preload(sounds);
    match RodioCuePlayer::open(bank.clone()) {
        Ok(player) => Box::new(player),
        Err(err) => {
            log::warn!("{err}. Sound cues will only be logged.");
            Box::new(LoggingCuePlayer::new(bank))
        }
    }
}
