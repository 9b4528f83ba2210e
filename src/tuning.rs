//! Data-driven game balance
//!
//! Everything a designer might retune without touching gameplay code.
//! Ships as JSON next to the exported scenes; [`Tuning::default`] is the
//! current balance, [`Tuning::classic`] the first release.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Yaw turn rate while a turn key is held (radians/second)
    pub turn_rate: f32,
    /// Forward/back speed (units/second)
    pub move_speed: f32,
    /// Raise/lower speed (units/second)
    pub lift_speed: f32,
    /// Lowest skewer height
    pub lift_min: f32,
    /// Highest skewer height
    pub lift_max: f32,
    /// Stylistic tilt applied to the skewer (degrees)
    pub tilt_degrees: f32,
    /// Marshmallow offset along the skewer's local +Z (units)
    pub skewer_tip_offset: f32,
    /// Camera offset from the skewer, before yaw rotation
    pub camera_offset: Vec3,
    /// Seconds the fire stays hidden between appearances
    pub fire_hidden_seconds: f32,
    /// Seconds the fire stays visible
    pub fire_visible_seconds: f32,
    /// Fire relocates uniformly within this half-extent square
    pub fire_region_half_extent: f32,
    /// Marshmallow-to-fire distance that counts as toasting
    pub touch_radius: f32,
    /// Goal toast time is drawn uniformly from this range (seconds)
    pub goal_min_seconds: f32,
    pub goal_max_seconds: f32,
    /// Fire-reappear cue volume while still under the goal
    pub fire_volume_eager: f32,
    /// Fire-reappear cue volume once the goal has been reached
    pub fire_volume_done: f32,
    /// Sizzle loop volume
    pub sizzle_volume: f32,
    /// Sizzle loop audible range
    pub sizzle_max_distance: f32,
    /// Stage-entry chime volume
    pub cue_volume: f32,
    /// Listener interpolation hint pushed to the audio layer each frame.
    /// Fixed at 1/60 s rather than the frame's actual elapsed time.
    pub listener_smoothing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            turn_rate: 1.8,
            move_speed: 20.0,
            lift_speed: 20.0,
            lift_min: 0.0,
            lift_max: 10.0,
            tilt_degrees: -70.0,
            skewer_tip_offset: 2.0,
            camera_offset: Vec3::new(0.0, 23.0, 8.0),
            fire_hidden_seconds: 1.0,
            fire_visible_seconds: 7.0,
            fire_region_half_extent: 20.0,
            touch_radius: 5.0,
            goal_min_seconds: 7.0,
            goal_max_seconds: 15.0,
            fire_volume_eager: 1.0,
            fire_volume_done: 0.3,
            sizzle_volume: 0.7,
            sizzle_max_distance: 10.0,
            cue_volume: 0.8,
            listener_smoothing: 1.0 / 60.0,
        }
    }
}

impl Tuning {
    /// The first release's balance: slower fire cycle, longer goals
    pub fn classic() -> Self {
        Self {
            fire_visible_seconds: 10.0,
            goal_min_seconds: 10.0,
            goal_max_seconds: 15.0,
            ..Self::default()
        }
    }

    /// Parse balance data shipped alongside the scene assets
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
