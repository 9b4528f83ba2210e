//! Camera follow and audio listener pose
//!
//! Pure derivations from the skewer transform; no state of their own.

use glam::{Mat4, Quat, Vec3};

use crate::scene::Transform;

/// Camera pose following the skewer: the configured offset rotated by the
/// yaw-only rotation (tilt excluded), looking back at the skewer with +Z up.
pub fn follow(skewer_position: Vec3, yaw: f32, offset: Vec3) -> Transform {
    let position = skewer_position + Quat::from_rotation_z(yaw) * offset;
    let look = Mat4::look_at_rh(position, skewer_position, Vec3::Z);
    Transform {
        position,
        rotation: Quat::from_mat4(&look.inverse()),
        scale: Vec3::ONE,
    }
}

/// Listener pose pushed to the audio layer each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListenerPose {
    pub position: Vec3,
    pub right: Vec3,
}

/// Extract the listener pose from the camera's world transform
pub fn listener_pose(camera: &Transform) -> ListenerPose {
    ListenerPose {
        position: camera.position,
        right: camera.rotation * Vec3::X,
    }
}
