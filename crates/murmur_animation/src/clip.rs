/// A body animation clip loaded by the asset pipeline.
///
/// Keyframe data stays with the renderer; the mixer only needs the clip's
/// name and length to drive playback time and weights.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Seconds
    pub duration: f32,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
        }
    }
}
