use std::sync::Arc;

use log::{debug, warn};
use murmur_core::{MurmurError, Result};
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::action::AnimationAction;
use crate::clip::AnimationClip;
use crate::crossfade::ClipPlayer;
use crate::state::AnimationState;

new_key_type! {
    pub struct ActionHandle;
}

/// Owns one [`AnimationAction`] per animation state and advances them.
///
/// The mixer does not sample keyframes; it produces the per-clip time and
/// weight that the renderer blends with.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: SlotMap<ActionHandle, AnimationAction>,
    by_state: FxHashMap<AnimationState, ActionHandle>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mixer from the clip registry.
    ///
    /// At least two clips are required, otherwise there is nothing to
    /// crossfade between.
    pub fn from_clips<I>(clips: I) -> Result<Self>
    where
        I: IntoIterator<Item = (AnimationState, AnimationClip)>,
    {
        let mut mixer = Self::new();
        for (state, clip) in clips {
            mixer.register(state, clip);
        }
        if mixer.by_state.len() < 2 {
            return Err(MurmurError::NotEnoughClips {
                found: mixer.by_state.len(),
            });
        }
        Ok(mixer)
    }

    /// Registers the clip for `state`, renaming it after the state.
    ///
    /// Registering a state twice replaces its action.
    pub fn register(&mut self, state: AnimationState, mut clip: AnimationClip) -> ActionHandle {
        if clip.name != state.name() {
            debug!("Registering clip {:?} as {state}", clip.name);
            clip.name = state.name().to_string();
        }

        let handle = self.actions.insert(AnimationAction::new(Arc::new(clip)));
        if let Some(old) = self.by_state.insert(state, handle) {
            self.actions.remove(old);
        }
        handle
    }

    /// Fails with [`MurmurError::MissingClip`] on the first state without a clip.
    pub fn ensure_registered<I>(&self, states: I) -> Result<()>
    where
        I: IntoIterator<Item = AnimationState>,
    {
        states.into_iter().try_for_each(|state| {
            if self.by_state.contains_key(&state) {
                Ok(())
            } else {
                Err(MurmurError::MissingClip(state.to_string()))
            }
        })
    }

    #[must_use]
    pub fn action(&self, state: AnimationState) -> Option<&AnimationAction> {
        self.actions.get(*self.by_state.get(&state)?)
    }

    pub fn action_mut(&mut self, state: AnimationState) -> Option<&mut AnimationAction> {
        self.actions.get_mut(*self.by_state.get(&state)?)
    }

    #[must_use]
    pub fn get(&self, handle: ActionHandle) -> Option<&AnimationAction> {
        self.actions.get(handle)
    }

    /// Names of the registered clips, sorted.
    #[must_use]
    pub fn list_animations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .actions
            .values()
            .map(|action| action.clip().name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Effective blend weight of a state's clip; 0 when absent or stopped.
    #[must_use]
    pub fn weight_of(&self, state: AnimationState) -> f32 {
        self.action(state)
            .map_or(0.0, AnimationAction::effective_weight)
    }

    /// Whether no fade is in flight.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.actions.values().all(|action| !action.is_fading())
    }

    /// Advances every action by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for action in self.actions.values_mut() {
            let was_fading = action.is_fading();
            action.update(dt);
            if was_fading && !action.is_fading() {
                debug!(
                    "Fade of {} finished at weight {}",
                    action.clip().name,
                    action.effective_weight()
                );
            }
        }
    }
}

impl ClipPlayer for AnimationMixer {
    fn fade_in(&mut self, state: AnimationState, duration: f32) {
        match self.action_mut(state) {
            Some(action) => {
                action.reset().fade_in(duration);
            }
            None => warn!("No clip registered for {state}, cannot fade in"),
        }
    }

    fn fade_out(&mut self, state: AnimationState, duration: f32) {
        match self.action_mut(state) {
            Some(action) => {
                action.fade_out(duration);
            }
            None => warn!("No clip registered for {state}, cannot fade out"),
        }
    }
}
