use glam::{Affine3A, EulerRot, Mat3, Quat, Vec3};

/// Local translation, rotation and scale of a bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Object-style look-at: the local +Z axis points at `target`.
    ///
    /// This is what bones and meshes use, as their forward is +Z.
    pub fn face(&mut self, target: Vec3, up: Vec3) {
        if let Some(basis) = facing_basis(target - self.position, up) {
            let (right, new_up, forward) = basis;
            // Mirrored basis: right = up x forward
            self.rotation = Quat::from_mat3(&Mat3::from_cols(-right, new_up, forward));
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Orthonormal (right, up, forward) basis for a view direction.
fn facing_basis(direction: Vec3, up: Vec3) -> Option<(Vec3, Vec3, Vec3)> {
    let forward = direction.try_normalize()?;
    let right = forward.cross(up);
    if right.length_squared() < 1e-4 {
        return None;
    }
    let right = right.normalize();
    let new_up = right.cross(forward).normalize();
    Some((right, new_up, forward))
}
