//! Body animation for the avatar.
//!
//! - [`AnimationState`]: the closed set of body poses (idle, greeting, ...)
//! - [`AnimationClip`] / [`AnimationAction`]: externally loaded clips and their
//!   playback state, including fades
//! - [`AnimationMixer`]: owns one action per state and advances them
//! - [`CrossfadeController`]: picks the current state from playback signals
//!   and requests fades through the [`ClipPlayer`] seam

pub mod action;
pub mod clip;
pub mod crossfade;
pub mod mixer;
pub mod state;

pub use action::{AnimationAction, Fade, LoopMode};
pub use clip::AnimationClip;
pub use crossfade::{AnimationTable, CROSSFADE_DURATION, ClipPlayer, CrossfadeController, Transition};
pub use mixer::{ActionHandle, AnimationMixer};
pub use state::AnimationState;
