//! # Murmur
//!
//! Lip-sync and body-animation control for 3D avatars.
//!
//! A cue file describes which viseme (mouth shape) is active at each moment
//! of an audio track. Every rendered frame, the [`FrameDriver`] polls the
//! audio position, blends the face's viseme morph targets toward the active
//! cue and crossfades the body between idle and talking animations.
//!
//! Asset decoding, audio decoding and rendering live outside this crate: the
//! host supplies morph target names, animation clips and an
//! [`AudioTransport`], and reads back morph influences, clip weights and the
//! head bone's rotation.
//!
//! ```rust,ignore
//! use murmur::prelude::*;
//!
//! let config = MurmurConfig::from_path("avatar.json")?;
//! let library = config.load_cues(Path::new("assets"))?;
//! let mixer = AnimationMixer::from_clips(clips)?;
//! let mut driver = FrameDriver::new(&config, library, mixer, rig, ClockTransport::new())?;
//! driver.attach_surface("Wolf3D_Head", head_targets);
//!
//! loop {
//!     let report = driver.tick(&config.avatar, camera_position, dt);
//! }
//! ```

pub mod config;
pub mod driver;
pub mod transport;

pub use murmur_animation as animation;
pub use murmur_scene as scene;
pub use murmur_viseme as viseme;

pub use config::{AvatarConfig, CueLibrary, MurmurConfig, NOMINAL_TICK_RATE, SceneConfig, ScriptEntry};
pub use driver::{FrameDriver, FrameReport, PlaybackSignal};
pub use murmur_core::{MurmurError, Result};
pub use transport::{AudioTransport, ClockTransport};

pub mod prelude {
    pub use crate::config::{AvatarConfig, CueLibrary, MurmurConfig};
    pub use crate::driver::{FrameDriver, FrameReport};
    pub use crate::transport::{AudioTransport, ClockTransport};
    pub use murmur_animation::{
        AnimationClip, AnimationMixer, AnimationState, AnimationTable, CROSSFADE_DURATION,
        ClipPlayer, CrossfadeController,
    };
    pub use murmur_core::{MurmurError, Result};
    pub use murmur_scene::{HeadFollow, Rig, Transform};
    pub use murmur_viseme::{
        BlendSettings, ChannelWeights, CueTrack, FaceSurfaces, MorphSurface, MouthCue,
        VisemeBlender, VisemeMap, VisemeSymbol,
    };
}
