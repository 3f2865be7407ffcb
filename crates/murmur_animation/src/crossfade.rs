use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::state::AnimationState;

/// Length of every crossfade, in seconds.
pub const CROSSFADE_DURATION: f32 = 0.5;

/// Something that can fade animation clips in and out.
///
/// Requests are fire-and-forget: they return immediately and the fade runs as
/// the player is advanced.
pub trait ClipPlayer {
    /// Restarts the clip of `state` at weight 0 and ramps it to 1.
    fn fade_in(&mut self, state: AnimationState, duration: f32);

    /// Ramps the clip of `state` from its current weight to 0.
    fn fade_out(&mut self, state: AnimationState, duration: f32);
}

/// Which body animation accompanies each script while it is playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationTable {
    by_script: FxHashMap<String, AnimationState>,
}

impl AnimationTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_script: FxHashMap::default(),
        }
    }

    /// `welcome` greets, `pizzas` gets angry.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.insert("welcome", AnimationState::Greeting);
        table.insert("pizzas", AnimationState::Angry);
        table
    }

    pub fn insert(&mut self, script: impl Into<String>, state: AnimationState) {
        self.by_script.insert(script.into(), state);
    }

    #[must_use]
    pub fn get(&self, script: &str) -> Option<AnimationState> {
        self.by_script.get(script).copied()
    }

    /// States referenced by the table plus `Idle`.
    pub fn states(&self) -> impl Iterator<Item = AnimationState> + '_ {
        std::iter::once(AnimationState::Idle).chain(self.by_script.values().copied())
    }
}

impl Default for AnimationTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl<S: Into<String>> FromIterator<(S, AnimationState)> for AnimationTable {
    fn from_iter<T: IntoIterator<Item = (S, AnimationState)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (script, state) in iter {
            table.insert(script, state);
        }
        table
    }
}

/// A state change and the fades requested for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: AnimationState,
    pub to: AnimationState,
    pub duration: f32,
}

/// Selects the body animation from the playback signal.
///
/// The current state switches as soon as a transition is requested; the
/// fades only shape how the renderer gets there. A later request simply
/// fades out whatever is current at that moment, so the last request wins
/// while clips abandoned mid-fade keep fading out.
#[derive(Debug, Clone)]
pub struct CrossfadeController {
    current: AnimationState,
    table: AnimationTable,
    last_signal: Option<(bool, String)>,
}

impl CrossfadeController {
    #[must_use]
    pub fn new(table: AnimationTable) -> Self {
        Self {
            current: AnimationState::Idle,
            table,
            last_signal: None,
        }
    }

    /// Fades the initial `Idle` clip in.
    pub fn start(&mut self, player: &mut impl ClipPlayer) {
        player.fade_in(self.current, CROSSFADE_DURATION);
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> AnimationState {
        self.current
    }

    #[must_use]
    pub fn table(&self) -> &AnimationTable {
        &self.table
    }

    /// State the signal asks for. An unknown script while playing maps to `Idle`.
    #[must_use]
    pub fn target_for(&self, is_playing: bool, script: &str) -> AnimationState {
        if !is_playing {
            return AnimationState::Idle;
        }
        self.table.get(script).unwrap_or_else(|| {
            warn!("Script {script:?} has no animation, staying idle");
            AnimationState::Idle
        })
    }

    /// Feeds the playback signal. Only a change since the previous call is
    /// evaluated.
    pub fn on_signal(
        &mut self,
        is_playing: bool,
        script: &str,
        player: &mut impl ClipPlayer,
    ) -> Option<Transition> {
        let unchanged = self
            .last_signal
            .as_ref()
            .is_some_and(|(playing, last)| *playing == is_playing && last == script);
        if unchanged {
            return None;
        }
        self.last_signal = Some((is_playing, script.to_string()));

        let target = self.target_for(is_playing, script);
        self.request(target, player)
    }

    /// Transitions to `target`. Requesting the current state does nothing.
    pub fn request(
        &mut self,
        target: AnimationState,
        player: &mut impl ClipPlayer,
    ) -> Option<Transition> {
        if target == self.current {
            return None;
        }

        let transition = Transition {
            from: self.current,
            to: target,
            duration: CROSSFADE_DURATION,
        };
        info!("Animation {} -> {}", transition.from, transition.to);

        player.fade_out(transition.from, CROSSFADE_DURATION);
        player.fade_in(transition.to, CROSSFADE_DURATION);
        self.current = target;

        Some(transition)
    }
}

impl Default for CrossfadeController {
    fn default() -> Self {
        Self::new(AnimationTable::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(&'static str, AnimationState, f32)>);

    impl ClipPlayer for Recorder {
        fn fade_in(&mut self, state: AnimationState, duration: f32) {
            self.0.push(("in", state, duration));
        }

        fn fade_out(&mut self, state: AnimationState, duration: f32) {
            self.0.push(("out", state, duration));
        }
    }

    #[test]
    fn starts_idle_and_fades_it_in() {
        let mut controller = CrossfadeController::default();
        let mut player = Recorder::default();
        controller.start(&mut player);

        assert_eq!(controller.current(), AnimationState::Idle);
        assert_eq!(player.0, vec![("in", AnimationState::Idle, 0.5)]);
    }

    #[test]
    fn unknown_script_while_playing_targets_idle() {
        let controller = CrossfadeController::default();
        assert_eq!(controller.target_for(true, "karaoke"), AnimationState::Idle);
        assert_eq!(controller.target_for(true, "pizzas"), AnimationState::Angry);
        assert_eq!(controller.target_for(false, "pizzas"), AnimationState::Idle);
    }

    #[test]
    fn repeated_signal_is_ignored() {
        let mut controller = CrossfadeController::default();
        let mut player = Recorder::default();

        assert!(controller.on_signal(true, "welcome", &mut player).is_some());
        assert!(controller.on_signal(true, "welcome", &mut player).is_none());
        assert_eq!(player.0.len(), 2);
    }

    #[test]
    fn table_from_iterator() {
        let table: AnimationTable = [("hello", AnimationState::Greeting)].into_iter().collect();
        assert_eq!(table.get("hello"), Some(AnimationState::Greeting));
        assert_eq!(table.get("welcome"), None);
        assert!(table.states().any(|s| s == AnimationState::Idle));
    }
}
