use std::sync::Arc;

use murmur_core::lerp;

use crate::clip::AnimationClip;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopMode {
    Once,
    Loop,
    PingPong,
}

/// A time-bounded ramp of an action's weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    pub from: f32,
    pub to: f32,
    pub elapsed: f32,
    pub duration: f32,
}

impl Fade {
    #[must_use]
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    #[must_use]
    pub fn weight(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        lerp(self.from, self.to, (self.elapsed / self.duration).clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playback state of one clip inside the mixer.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    /// Whether the action contributes to the pose at all.
    pub enabled: bool,

    fade: Option<Fade>,
}

impl AnimationAction {
    /// A stopped action. Call [`play`](Self::play) or [`fade_in`](Self::fade_in) to start it.
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 0.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            enabled: false,
            fade: None,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Rewinds to the start and cancels any running fade.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.paused = false;
        self.enabled = true;
        self.fade = None;
        self
    }

    /// Plays immediately at full weight.
    pub fn play(&mut self) -> &mut Self {
        self.enabled = true;
        self.paused = false;
        self.fade = None;
        self.weight = 1.0;
        self
    }

    /// Ramps the weight from 0 to 1, replacing any running fade.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.enabled = true;
        self.weight = 0.0;
        self.start_fade(Fade::new(0.0, 1.0, duration));
        self
    }

    /// Ramps the weight from its current value to 0, then stops the action.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        if self.enabled {
            self.start_fade(Fade::new(self.weight, 0.0, duration));
        }
        self
    }

    fn start_fade(&mut self, fade: Fade) {
        self.fade = Some(fade);
        self.apply_fade();
    }

    #[must_use]
    pub fn fade(&self) -> Option<&Fade> {
        self.fade.as_ref()
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Weight the renderer should blend this clip with.
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        if self.enabled { self.weight } else { 0.0 }
    }

    /// Advances fades and clip time.
    pub fn update(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }

        if let Some(fade) = &mut self.fade {
            fade.elapsed += dt;
        }
        self.apply_fade();

        if self.enabled && !self.paused {
            self.advance_time(dt);
        }
    }

    fn apply_fade(&mut self) {
        let Some(fade) = self.fade else {
            return;
        };
        self.weight = fade.weight();
        if fade.is_finished() {
            self.fade = None;
            if fade.to <= 0.0 {
                self.enabled = false;
            }
        }
    }

    fn advance_time(&mut self, dt: f32) {
        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Loop => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    self.time = duration + (self.time % duration);
                }
            }
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let mut t = self.time % double_duration;
                if t < 0.0 {
                    t += double_duration;
                }
                // Second half of the cycle runs backwards
                if t > duration {
                    t = double_duration - t;
                }
                self.time = t;
            }
        }
    }
}
