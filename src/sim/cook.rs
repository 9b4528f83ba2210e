//! Toasting progress and cook-stage classification
//!
//! Accumulates marshmallow-over-fire contact time and classifies it
//! against the session's goal. Stage is recomputed from scratch every
//! frame; entry cues are edge-triggered and fire once per session.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::audio::Cue;
use crate::tuning::Tuning;

/// Seconds before the goal when the marshmallow turns almost-done
pub const ALMOST_WINDOW: f32 = 2.0;
/// Seconds past the goal before it burns
pub const BURNT_AFTER: f32 = 1.0;

/// Discrete cook classification, in toasting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CookStage {
    Raw = 0,
    Almost = 1,
    Golden = 2,
    Burnt = 3,
}

impl CookStage {
    /// Classify accumulated touch time against a goal. Pure; monotone in
    /// `touching` for a fixed `goal`.
    pub fn classify(touching: f32, goal: f32) -> Self {
        if touching >= goal + BURNT_AFTER {
            CookStage::Burnt
        } else if touching >= goal {
            CookStage::Golden
        } else if touching >= goal - ALMOST_WINDOW {
            CookStage::Almost
        } else {
            CookStage::Raw
        }
    }

    /// HUD status text for this stage
    pub fn status_text(self) -> &'static str {
        match self {
            CookStage::Raw => "keep toasting",
            CookStage::Almost => "almost there",
            CookStage::Golden => "golden, pull it out!",
            CookStage::Burnt => "burnt...",
        }
    }

    /// One-shot cue played on entry. Raw is the starting stage, no cue.
    pub fn cue(self) -> Option<Cue> {
        match self {
            CookStage::Raw => None,
            CookStage::Almost => Some(Cue::AlmostChime),
            CookStage::Golden => Some(Cue::GoldenChime),
            CookStage::Burnt => Some(Cue::BurntSting),
        }
    }
}

/// Side effects requested by one cook step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookEvent {
    /// Contact just began; start the sizzle loop
    SizzleStarted,
    /// Contact just ended; stop the sizzle loop
    SizzleStopped,
    /// First frame in this stage for the session
    StageEntered(CookStage),
}

/// Toast-time accumulator and one-shot cue tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookState {
    /// Seconds of fire contact so far; never decreases within a session
    pub touching_seconds: f32,
    /// Toast time to hit, drawn once at session start
    pub goal_seconds: f32,
    touching: bool,
    /// Entry cues already played, indexed by `CookStage as usize`. Only a
    /// restart (a brand-new session) clears these.
    cued: [bool; 4],
}

impl CookState {
    pub fn new(goal_seconds: f32) -> Self {
        Self {
            touching_seconds: 0.0,
            goal_seconds,
            touching: false,
            cued: [false; 4],
        }
    }

    /// Current stage, recomputed from the accumulator
    pub fn stage(&self) -> CookStage {
        CookStage::classify(self.touching_seconds, self.goal_seconds)
    }

    /// Whether the marshmallow was over the fire last step
    pub fn is_touching(&self) -> bool {
        self.touching
    }

    /// Accumulate one frame of contact and report edge-triggered effects.
    ///
    /// All four slots are checked even though only the active one sits in
    /// the playable area; parked slots are hundreds of units away and
    /// never pass the radius test.
    pub fn step(
        &mut self,
        dt: f32,
        tuning: &Tuning,
        fire_visible: bool,
        fire_position: Vec3,
        slots: &[Vec3; 4],
    ) -> Vec<CookEvent> {
        let mut events = Vec::new();

        let near = fire_visible
            && slots
                .iter()
                .any(|p| p.distance(fire_position) < tuning.touch_radius);
        if near {
            self.touching_seconds += dt;
        }
        if near != self.touching {
            self.touching = near;
            events.push(if near {
                CookEvent::SizzleStarted
            } else {
                CookEvent::SizzleStopped
            });
        }

        let stage = self.stage();
        if stage != CookStage::Raw && !self.cued[stage as usize] {
            self.cued[stage as usize] = true;
            events.push(CookEvent::StageEntered(stage));
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        let g = 10.0;
        assert_eq!(CookStage::classify(7.9, g), CookStage::Raw);
        assert_eq!(CookStage::classify(8.0, g), CookStage::Almost);
        assert_eq!(CookStage::classify(9.99, g), CookStage::Almost);
        assert_eq!(CookStage::classify(10.0, g), CookStage::Golden);
        assert_eq!(CookStage::classify(10.99, g), CookStage::Golden);
        assert_eq!(CookStage::classify(11.0, g), CookStage::Burnt);
        assert_eq!(CookStage::classify(500.0, g), CookStage::Burnt);
    }

    #[test]
    fn test_stage_never_regresses() {
        let g = 10.0;
        let mut last = CookStage::Raw;
        let mut t = 0.0;
        while t < 15.0 {
            let stage = CookStage::classify(t, g);
            assert!(stage >= last, "stage regressed at t={t}");
            last = stage;
            t += 0.013;
        }
        assert_eq!(last, CookStage::Burnt);
    }

    fn in_contact() -> (Vec3, [Vec3; 4]) {
        let fire = Vec3::new(3.0, -2.0, 0.0);
        let slots = [
            fire + Vec3::new(1.0, 0.0, 1.0),
            Vec3::splat(1000.0),
            Vec3::splat(1000.0),
            Vec3::splat(1000.0),
        ];
        (fire, slots)
    }

    #[test]
    fn test_contact_requires_visible_fire() {
        let tuning = Tuning::default();
        let (fire, slots) = in_contact();
        let mut cook = CookState::new(10.0);

        let events = cook.step(0.5, &tuning, false, fire, &slots);
        assert_eq!(cook.touching_seconds, 0.0);
        assert!(events.is_empty());

        cook.step(0.5, &tuning, true, fire, &slots);
        assert_eq!(cook.touching_seconds, 0.5);
    }

    #[test]
    fn test_contact_radius_gate() {
        let tuning = Tuning::default();
        let fire = Vec3::ZERO;
        let mut cook = CookState::new(10.0);

        let far = [Vec3::new(5.1, 0.0, 0.0); 4];
        cook.step(1.0, &tuning, true, fire, &far);
        assert_eq!(cook.touching_seconds, 0.0);

        let close = [Vec3::new(4.9, 0.0, 0.0); 4];
        cook.step(1.0, &tuning, true, fire, &close);
        assert_eq!(cook.touching_seconds, 1.0);
    }

    #[test]
    fn test_any_slot_counts() {
        let tuning = Tuning::default();
        let fire = Vec3::ZERO;
        let mut slots = [Vec3::splat(1000.0); 4];
        slots[3] = Vec3::new(0.0, 2.0, 0.0);

        let mut cook = CookState::new(10.0);
        cook.step(0.25, &tuning, true, fire, &slots);
        assert_eq!(cook.touching_seconds, 0.25);
    }

    #[test]
    fn test_sizzle_edges() {
        let tuning = Tuning::default();
        let (fire, slots) = in_contact();
        let parked = [Vec3::splat(1000.0); 4];
        let mut cook = CookState::new(10.0);

        let events = cook.step(0.1, &tuning, true, fire, &slots);
        assert_eq!(events, vec![CookEvent::SizzleStarted]);
        assert!(cook.is_touching());

        // Still touching: no repeat event
        let events = cook.step(0.1, &tuning, true, fire, &slots);
        assert!(events.is_empty());

        let events = cook.step(0.1, &tuning, true, fire, &parked);
        assert_eq!(events, vec![CookEvent::SizzleStopped]);

        // Fire going hidden also breaks contact
        cook.step(0.1, &tuning, true, fire, &slots);
        let events = cook.step(0.1, &tuning, false, fire, &slots);
        assert_eq!(events, vec![CookEvent::SizzleStopped]);
    }

    #[test]
    fn test_stage_cues_fire_once_at_millisecond_steps() {
        let tuning = Tuning::default();
        let (fire, slots) = in_contact();
        let mut cook = CookState::new(10.0);

        let mut entries = Vec::new();
        // 12 simulated seconds of continuous contact at 1ms steps
        for _ in 0..12_000 {
            for event in cook.step(0.001, &tuning, true, fire, &slots) {
                if let CookEvent::StageEntered(stage) = event {
                    entries.push(stage);
                }
            }
        }
        assert_eq!(
            entries,
            vec![CookStage::Almost, CookStage::Golden, CookStage::Burnt]
        );
    }

    #[test]
    fn test_no_cue_for_raw() {
        let tuning = Tuning::default();
        let (fire, slots) = in_contact();
        let mut cook = CookState::new(10.0);
        let events = cook.step(0.001, &tuning, true, fire, &slots);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, CookEvent::StageEntered(_)))
        );
        assert_eq!(CookStage::Raw.cue(), None);
    }
}
