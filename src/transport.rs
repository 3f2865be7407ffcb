//! Audio transport seam.
//!
//! The audio player runs on its own clock. The frame driver only polls its
//! position once per tick and tells it to play, pause or switch tracks.

/// Control and position of the audio being lip-synced.
pub trait AudioTransport {
    fn play(&mut self);

    fn pause(&mut self);

    /// Replaces the loaded audio. The new track starts paused at 0.
    fn switch_track(&mut self, script: &str, duration: f32);

    fn is_playing(&self) -> bool;

    /// Playback position in seconds.
    fn current_time(&self) -> f32;
}

/// A transport driven by explicit `advance` calls instead of real audio.
///
/// Stops at the end of the track, keeping its position there. Playing an
/// ended track restarts it from 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClockTransport {
    script: String,
    time: f32,
    duration: f32,
    playing: bool,
}

impl ClockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the playback head forward by `dt` seconds while playing.
    pub fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        self.time += dt;
        if self.time >= self.duration {
            self.time = self.duration;
            self.playing = false;
        }
    }

    /// Jumps to `time`, clamped to the track.
    pub fn seek(&mut self, time: f32) {
        self.time = time.clamp(0.0, self.duration);
    }

    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }
}

impl AudioTransport for ClockTransport {
    fn play(&mut self) {
        if self.time >= self.duration {
            self.time = 0.0;
        }
        self.playing = self.duration > 0.0;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn switch_track(&mut self, script: &str, duration: f32) {
        self.script = script.to_string();
        self.duration = duration.max(0.0);
        self.time = 0.0;
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn current_time(&self) -> f32 {
        self.time
    }
}
