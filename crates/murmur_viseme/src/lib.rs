//! Viseme scheduling and blending.
//!
//! Data flows leaf-first through this crate:
//!
//! 1. [`VisemeMap`] maps the closed [`VisemeSymbol`] alphabet to morph target
//!    channel names.
//! 2. [`CueTrack`] holds the time-indexed [`MouthCue`] windows loaded from a
//!    cue file.
//! 3. [`VisemeBlender`] turns a cue track, a playback time and the previous
//!    [`ChannelWeights`] into the next frame's weights.
//! 4. [`FaceSurfaces`] writes those weights into every bound [`MorphSurface`]
//!    (head, teeth, ...) through pre-resolved slot tables.

pub mod blender;
pub mod cue;
pub mod map;
pub mod surface;
pub mod symbol;
pub mod weights;

pub use blender::{BlendSettings, VisemeBlender};
pub use cue::{CueMetadata, CueTrack, MouthCue};
pub use map::{ChannelName, VisemeMap};
pub use surface::{FaceSurfaces, MorphSurface, SurfaceSlots};
pub use symbol::VisemeSymbol;
pub use weights::ChannelWeights;
