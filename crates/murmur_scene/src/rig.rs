use glam::{Affine3A, Vec3};
use slotmap::{SlotMap, new_key_type};

use crate::transform::Transform;

new_key_type! {
    pub struct BoneHandle;
}

#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    pub transform: Transform,
    parent: Option<BoneHandle>,
    children: Vec<BoneHandle>,
}

impl Bone {
    #[must_use]
    pub fn parent(&self) -> Option<BoneHandle> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[BoneHandle] {
        &self.children
    }
}

/// A named bone hierarchy.
#[derive(Debug, Clone, Default)]
pub struct Rig {
    bones: SlotMap<BoneHandle, Bone>,
    roots: Vec<BoneHandle>,
}

impl Rig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bone under `parent`, or as a root when `parent` is `None` or stale.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        parent: Option<BoneHandle>,
    ) -> BoneHandle {
        let parent = parent.filter(|p| self.bones.contains_key(*p));
        let handle = self.bones.insert(Bone {
            name: name.into(),
            transform,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|p| self.bones.get_mut(p)) {
            Some(parent_bone) => parent_bone.children.push(handle),
            None => self.roots.push(handle),
        }
        handle
    }

    #[must_use]
    pub fn get(&self, handle: BoneHandle) -> Option<&Bone> {
        self.bones.get(handle)
    }

    pub fn get_mut(&mut self, handle: BoneHandle) -> Option<&mut Bone> {
        self.bones.get_mut(handle)
    }

    /// Depth-first search from the roots, first match wins.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<BoneHandle> {
        self.roots
            .iter()
            .find_map(|&root| self.find_in_subtree(root, name))
    }

    fn find_in_subtree(&self, current: BoneHandle, name: &str) -> Option<BoneHandle> {
        let bone = self.bones.get(current)?;
        if bone.name == name {
            return Some(current);
        }
        bone.children
            .iter()
            .find_map(|&child| self.find_in_subtree(child, name))
    }

    /// World matrix of a bone, composed from its ancestors' local transforms.
    #[must_use]
    pub fn world_matrix(&self, handle: BoneHandle) -> Option<Affine3A> {
        let bone = self.bones.get(handle)?;
        let local = bone.transform.local_matrix();
        Some(match bone.parent {
            Some(parent) => self.world_matrix(parent).unwrap_or(Affine3A::IDENTITY) * local,
            None => local,
        })
    }

    /// World matrix of the bone's parent; identity for roots.
    #[must_use]
    pub fn parent_world_matrix(&self, handle: BoneHandle) -> Affine3A {
        self.bones
            .get(handle)
            .and_then(|bone| bone.parent)
            .and_then(|parent| self.world_matrix(parent))
            .unwrap_or(Affine3A::IDENTITY)
    }

    #[must_use]
    pub fn world_position(&self, handle: BoneHandle) -> Option<Vec3> {
        self.world_matrix(handle)
            .map(|m| Vec3::from(m.translation))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}
