//! Minimal skeleton model for orienting avatar bones.
//!
//! The renderer owns the real skeleton; the lipsync core mirrors the bones it
//! needs to drive (the head) in a [`Rig`] and writes rotations back through it.

pub mod head;
pub mod rig;
pub mod transform;

pub use head::HeadFollow;
pub use rig::{Bone, BoneHandle, Rig};
pub use transform::Transform;
