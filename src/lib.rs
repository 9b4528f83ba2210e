//! Campfire Toast - a marshmallow-toasting arcade game
//!
//! Core modules:
//! - `sim`: Per-frame gameplay simulation (input, fire scheduler, cook state, transforms)
//! - `scene`: In-memory scene data and named-node role resolution
//! - `audio` / `render`: Contracts for the engine-layer collaborators
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod render;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use scene::{Scene, SceneError, Transform};
pub use sim::session::Session;
pub use tuning::Tuning;

use glam::Vec3;

/// Structural gameplay constants (balance values live in [`tuning`])
pub mod consts {
    use glam::Vec3;

    /// Where off-scene nodes get parked, far outside the playable area
    pub const PARK_XY: f32 = 1000.0;
    /// Parking spot for inactive marshmallow slots
    pub const PARK_POSITION: Vec3 = Vec3::new(PARK_XY, PARK_XY, 0.0);
    /// Overlay text height in clip-ish units
    pub const HUD_TEXT_HEIGHT: f32 = 0.09;
    /// Shadow pass color for the status overlay
    pub const HUD_SHADOW: [u8; 4] = [0x00, 0x00, 0x00, 0x00];
    /// Foreground pass color for the status overlay
    pub const HUD_FOREGROUND: [u8; 4] = [0xff, 0xff, 0xff, 0x00];
}

/// Project a vector onto the horizontal (z = 0) plane
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, 0.0)
}
