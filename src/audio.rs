//! Audio system for background music and sound effects
//!
//! Purely observational: every failure path is swallowed so gameplay never
//! depends on the sound device.

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Sound effect types, one per engine event worth hearing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Move,
    Rotate,
    HardDrop,
    LineClear,
    GameOver,
}

impl Sfx {
    fn filename(&self) -> &'static str {
        match self {
            Sfx::Move => "move.wav",
            Sfx::Rotate => "rotate.wav",
            Sfx::HardDrop => "hard_drop.wav",
            Sfx::LineClear => "line_clear.wav",
            Sfx::GameOver => "game_over.wav",
        }
    }
}

/// Looping background theme
const BGM_FILE: &str = "theme.wav";

/// Audio manager handles all sound playback
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    bgm_sink: Option<Sink>,
    assets_path: PathBuf,
    bgm_volume: f32,
    sfx_volume: f32,
}

impl AudioManager {
    /// Create a new audio manager; None if there is no output device or no
    /// assets directory - the game runs fine without either
    pub fn new() -> Option<Self> {
        let (stream, stream_handle) = OutputStream::try_default().ok()?;
        let assets_path = Self::find_assets_path()?;

        Some(Self {
            _stream: stream,
            stream_handle,
            bgm_sink: None,
            assets_path,
            bgm_volume: 0.3,
            sfx_volume: 0.5,
        })
    }

    fn find_assets_path() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("assets"),
            PathBuf::from("./assets"),
            std::env::current_exe().ok()?.parent()?.join("assets"),
        ];

        paths.iter().find(|p| p.exists()).cloned()
    }

    /// Set BGM volume (0.0 to 1.0)
    pub fn set_bgm_volume(&mut self, volume: f32) {
        self.bgm_volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.bgm_sink {
            sink.set_volume(self.bgm_volume);
        }
    }

    /// Set SFX volume (0.0 to 1.0)
    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    /// Start the looping background theme (no-op if already playing)
    pub fn play_bgm(&mut self) {
        if self.bgm_sink.is_some() {
            return;
        }

        let path = self.assets_path.join(BGM_FILE);
        let Ok(file) = File::open(&path) else { return };
        let Ok(sink) = Sink::try_new(&self.stream_handle) else { return };
        let Ok(decoder) = Decoder::new(BufReader::new(file)) else { return };

        sink.set_volume(self.bgm_volume);
        sink.append(decoder.repeat_infinite());
        self.bgm_sink = Some(sink);
    }

    /// Stop background music
    pub fn stop_bgm(&mut self) {
        if let Some(sink) = self.bgm_sink.take() {
            sink.stop();
        }
    }

    /// Pause background music
    pub fn pause_bgm(&mut self) {
        if let Some(sink) = &self.bgm_sink {
            sink.pause();
        }
    }

    /// Resume background music
    pub fn resume_bgm(&mut self) {
        if let Some(sink) = &self.bgm_sink {
            sink.play();
        }
    }

    /// Play a sound effect (fire and forget)
    pub fn play_sfx(&mut self, sfx: Sfx) {
        if self.sfx_volume <= 0.0 {
            return;
        }

        let path = self.assets_path.join("sfx").join(sfx.filename());
        if let Ok(file) = File::open(&path) {
            if let Ok(decoder) = Decoder::new(BufReader::new(file)) {
                if let Ok(sink) = Sink::try_new(&self.stream_handle) {
                    sink.set_volume(self.sfx_volume);
                    sink.append(decoder);
                    sink.detach(); // plays out and cleans up on its own
                }
            }
        }
    }
}
