use std::sync::Arc;

use murmur_core::lerp;

use crate::cue::CueTrack;
use crate::map::VisemeMap;
use crate::weights::ChannelWeights;

/// How the blender moves weights toward their per-frame target.
///
/// `factor` is applied once per tick and is **not** scaled by elapsed time, so
/// the perceived smoothing speed depends on the host's frame rate. Values are
/// tuned for a display-synchronised loop around 60 Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendSettings {
    /// `false` snaps weights to 0 / 1 every frame.
    pub smoothing: bool,
    /// Lerp factor in `[0, 1]`.
    pub factor: f32,
}

impl BlendSettings {
    #[must_use]
    pub const fn snap() -> Self {
        Self {
            smoothing: false,
            factor: 0.0,
        }
    }

    /// Smoothing enabled; `factor` is clamped to `[0, 1]`.
    #[must_use]
    pub fn smoothed(factor: f32) -> Self {
        Self {
            smoothing: true,
            factor: if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) },
        }
    }

    #[inline]
    fn toward(self, current: f32, target: f32) -> f32 {
        if self.smoothing {
            lerp(current, target, self.factor)
        } else {
            target
        }
    }
}

impl Default for BlendSettings {
    fn default() -> Self {
        Self::smoothed(0.5)
    }
}

/// Computes channel weights from a cue track and the playback time.
///
/// Every tick runs two passes over the channels of the [`VisemeMap`]:
///
/// 1. **Decay**: every channel moves toward 0. This runs whether or not a cue
///    is active and is the only thing that returns channels to rest.
/// 2. **Activation**: the first cue (in storage order) whose closed window
///    contains `time` moves its channel toward 1, starting from the value the
///    decay pass just produced.
///
/// With smoothing at factor `f`, a held cue therefore settles at
/// `1 / (2 - f)` rather than 1, and an inactive channel converges to 0. Both
/// approaches are monotone and never overshoot.
#[derive(Debug, Clone)]
pub struct VisemeBlender {
    map: Arc<VisemeMap>,
}

impl VisemeBlender {
    #[must_use]
    pub fn new(map: Arc<VisemeMap>) -> Self {
        Self { map }
    }

    #[inline]
    #[must_use]
    pub fn map(&self) -> &Arc<VisemeMap> {
        &self.map
    }

    /// Returns the weights for the frame at `time`.
    ///
    /// `previous` is expected to come from this blender's map; weights of a
    /// different shape are treated as all-zero.
    #[must_use]
    pub fn tick(
        &self,
        track: &CueTrack,
        time: f32,
        previous: &ChannelWeights,
        settings: BlendSettings,
    ) -> ChannelWeights {
        let mut next = if previous.matches(&self.map) {
            previous.clone()
        } else {
            ChannelWeights::zeroed(&self.map)
        };
        self.tick_in_place(track, time, &mut next, settings);
        next
    }

    /// Same as [`tick`](Self::tick), updating `weights` without allocating.
    pub fn tick_in_place(
        &self,
        track: &CueTrack,
        time: f32,
        weights: &mut ChannelWeights,
        settings: BlendSettings,
    ) {
        if !weights.matches(&self.map) {
            *weights = ChannelWeights::zeroed(&self.map);
        }
        let values = weights.as_mut_slice();

        for value in values.iter_mut() {
            *value = settings.toward(*value, 0.0);
        }

        if let Some(cue) = track.active_cue(time) {
            let value = &mut values[self.map.channel_index(cue.symbol)];
            *value = settings.toward(*value, 1.0);
        }
    }
}
