use std::fmt;
use std::str::FromStr;

use murmur_core::MurmurError;
use serde::{Deserialize, Serialize};

/// Body animation the avatar can be in. Exactly one is current at a time.
///
/// Extend by adding variants; the mixer and controller are table driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Greeting,
    Angry,
}

impl AnimationState {
    pub const ALL: [AnimationState; 3] = [
        AnimationState::Idle,
        AnimationState::Greeting,
        AnimationState::Angry,
    ];

    /// Clip name used in the clip registry.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AnimationState::Idle => "Idle",
            AnimationState::Greeting => "Greeting",
            AnimationState::Angry => "Angry",
        }
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationState {
    type Err = MurmurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimationState::ALL
            .into_iter()
            .find(|state| state.name() == s)
            .ok_or_else(|| MurmurError::InvalidConfig(format!("unknown animation state {s:?}")))
    }
}
