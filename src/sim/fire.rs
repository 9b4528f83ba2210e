//! Fire visibility scheduler
//!
//! Two-state timer: the fire burns for a while, vanishes, then reappears
//! somewhere new. Hiding works by parking the fire node off-scene, which
//! is also what removes it from the contact check.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Transition produced by one scheduler step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireEvent {
    /// Hidden -> visible at a freshly drawn position. `volume` carries the
    /// caller's hint for the reappear cue.
    Relocated { position: Vec2, volume: f32 },
    /// Visible -> hidden; the session parks the fire node
    Hidden,
}

/// Visible/hidden state machine for the fire hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireScheduler {
    pub visible: bool,
    /// Seconds in the current state; zeroed on every transition
    pub timer: f32,
    /// Current target position on the ground plane
    pub position: Vec2,
}

impl FireScheduler {
    /// Starts hidden at the given position (the session randomizes it)
    pub fn new(position: Vec2) -> Self {
        Self {
            visible: false,
            timer: 0.0,
            position,
        }
    }

    /// Draw a uniform position within the relocation region
    pub fn draw_position<R: Rng>(rng: &mut R, tuning: &Tuning) -> Vec2 {
        let half = tuning.fire_region_half_extent;
        Vec2::new(
            rng.random_range(-half..=half),
            rng.random_range(-half..=half),
        )
    }

    /// Advance the timer; at most one transition per call.
    ///
    /// `reappear_volume` is the cue volume to attach if the fire comes
    /// back this frame (louder while the player still needs toast time).
    pub fn advance<R: Rng>(
        &mut self,
        dt: f32,
        rng: &mut R,
        reappear_volume: f32,
        tuning: &Tuning,
    ) -> Option<FireEvent> {
        self.timer += dt;
        if self.visible {
            if self.timer >= tuning.fire_visible_seconds {
                self.visible = false;
                self.timer = 0.0;
                return Some(FireEvent::Hidden);
            }
        } else if self.timer >= tuning.fire_hidden_seconds {
            self.visible = true;
            self.timer = 0.0;
            self.position = Self::draw_position(rng, tuning);
            return Some(FireEvent::Relocated {
                position: self.position,
                volume: reappear_volume,
            });
        }
        None
    }
}
