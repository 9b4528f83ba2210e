//! Skewer and marshmallow transform composition
//!
//! Turns held input and elapsed time into the skewer's world transform,
//! then derives the marshmallow slot transforms from it.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::cook::CookStage;
use super::input::InputState;
use crate::consts;
use crate::horizontal;
use crate::scene::{Scene, SceneRoles, Transform};
use crate::tuning::Tuning;

/// Local direction the skewer points when un-yawed
const LOCAL_FORWARD: Vec3 = Vec3::new(0.0, -1.0, 0.0);

/// Per-session transform state: the accumulated yaw angle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Composer {
    yaw: f32,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated yaw in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Yaw-only rotation, used by the camera follow
    pub fn yaw_rotation(&self) -> Quat {
        Quat::from_rotation_z(self.yaw)
    }

    /// Advance the skewer transform by one frame.
    ///
    /// `camera_position` must be sampled before this call moves anything:
    /// the tilt frame intentionally uses the camera a frame behind, which
    /// is part of the game's feel.
    pub fn advance(
        &mut self,
        dt: f32,
        input: &InputState,
        tuning: &Tuning,
        skewer: &mut Transform,
        camera_position: Vec3,
    ) {
        self.yaw += input.turn_amount() * tuning.turn_rate * dt;

        // Stylistic tilt away from the camera. Degenerate when the skewer
        // sits on the camera's vertical axis: the cross product collapses
        // to zero and the normalize goes non-finite (known instability,
        // kept as-is).
        let away = -(skewer.position - camera_position).normalize();
        let tilt_axis = Vec3::Z.cross(away).normalize();
        let tilt = Quat::from_axis_angle(tilt_axis, tuning.tilt_degrees.to_radians());
        skewer.rotation = tilt * self.yaw_rotation();

        // Forward/back along the skewer's facing, flattened to the ground
        let dir = horizontal(skewer.rotation * LOCAL_FORWARD);
        skewer.position += dir * (input.move_amount() * tuning.move_speed * dt);

        // Raise/lower within the playable band
        let z = skewer.position.z + input.lift_amount() * tuning.lift_speed * dt;
        skewer.position.z = z.clamp(tuning.lift_min, tuning.lift_max);
    }

    /// Put the active marshmallow slot on the skewer tip and park the
    /// other three off-scene. Applied every frame, not just on stage
    /// changes.
    pub fn place_marshmallows(
        scene: &mut Scene,
        roles: &SceneRoles,
        stage: CookStage,
        tip_offset: f32,
    ) {
        let skewer = scene.node(roles.skewer).transform;
        for (i, id) in roles.marshmallow.iter().enumerate() {
            let slot = &mut scene.node_mut(*id).transform;
            if i == stage as usize {
                slot.position = skewer.position + skewer.rotation * Vec3::new(0.0, 0.0, tip_offset);
                slot.rotation = skewer.rotation;
            } else {
                slot.position = consts::PARK_POSITION;
            }
        }
    }
}
