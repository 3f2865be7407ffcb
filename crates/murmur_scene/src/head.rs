use glam::Vec3;
use log::warn;

use crate::rig::{BoneHandle, Rig};

/// Keeps a bone turned toward a point in world space, typically the camera.
///
/// Stateless: every application recomputes the rotation from scratch, with no
/// smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadFollow {
    bone: BoneHandle,
}

impl HeadFollow {
    #[must_use]
    pub fn new(bone: BoneHandle) -> Self {
        Self { bone }
    }

    /// Resolves the bone by name; `None` if the rig has no such bone.
    #[must_use]
    pub fn find(rig: &Rig, bone_name: &str) -> Option<Self> {
        let found = rig.find_by_name(bone_name).map(Self::new);
        if found.is_none() {
            warn!("Rig has no bone named {bone_name:?}, head follow disabled");
        }
        found
    }

    #[must_use]
    pub fn bone(&self) -> BoneHandle {
        self.bone
    }

    /// Turns the bone toward `target` (world space). Returns `false` if the
    /// bone no longer exists.
    pub fn apply(&self, rig: &mut Rig, target: Vec3) -> bool {
        let to_parent = rig.parent_world_matrix(self.bone).inverse();
        let local_target = to_parent.transform_point3(target);
        let local_up = to_parent.transform_vector3(Vec3::Y);

        let Some(bone) = rig.get_mut(self.bone) else {
            return false;
        };
        bone.transform.face(local_target, local_up);
        true
    }
}
