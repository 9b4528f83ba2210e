//! One play-through's state and per-frame driver
//!
//! A `Session` owns the scene copy and every piece of gameplay state.
//! Restart never resets fields in place: the host tears the session down
//! and constructs a fresh one, which re-rolls the goal and fire position.

use glam::{UVec2, Vec3};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::{follow, listener_pose};
use super::compose::Composer;
use super::cook::{CookEvent, CookState};
use super::fire::{FireEvent, FireScheduler};
use super::input::{Action, InputState};
use crate::audio::{AudioService, Cue, LoopHandle};
use crate::consts;
use crate::render::RenderBackend;
use crate::scene::{Scene, SceneError, SceneRoles};
use crate::tuning::Tuning;

/// All mutable state for one play-through
pub struct Session {
    scene: Scene,
    roles: SceneRoles,
    tuning: Tuning,
    rng: Pcg32,
    input: InputState,
    composer: Composer,
    fire: FireScheduler,
    cook: CookState,
    sizzle: Option<LoopHandle>,
    restart_pending: bool,
}

impl Session {
    /// Build a session over a loaded scene.
    ///
    /// Rolls the goal toast time and the fire's starting position from the
    /// seed. Fails when a required node is missing or the camera count is
    /// not exactly one.
    pub fn new(mut scene: Scene, tuning: Tuning, seed: u64) -> Result<Self, SceneError> {
        let roles = scene.resolve_roles()?;
        let mut rng = Pcg32::seed_from_u64(seed);

        let goal = rng.random_range(tuning.goal_min_seconds..=tuning.goal_max_seconds);
        let fire_position = FireScheduler::draw_position(&mut rng, &tuning);
        let fire_node = &mut scene.node_mut(roles.fire).transform;
        fire_node.position.x = fire_position.x;
        fire_node.position.y = fire_position.y;

        // Camera starts on its follow pose; whatever pose the loader left
        // would be overwritten at the end of the first frame anyway
        let skewer_position = scene.node(roles.skewer).transform.position;
        scene.camera_mut(roles.camera).transform =
            follow(skewer_position, 0.0, tuning.camera_offset);

        info!(
            "session start: goal {:.1}s, fire at ({:.1}, {:.1})",
            goal, fire_position.x, fire_position.y
        );

        Ok(Self {
            scene,
            roles,
            tuning,
            rng,
            input: InputState::new(),
            composer: Composer::new(),
            fire: FireScheduler::new(fire_position),
            cook: CookState::new(goal),
            sizzle: None,
            restart_pending: false,
        })
    }

    /// Apply one key transition from the host. Returns whether the action
    /// was handled; unrecognized keys should not reach here.
    ///
    /// Restart is a command, not button state: on key-down it silences all
    /// audio and flags the host to rebuild the session.
    pub fn handle_key(
        &mut self,
        action: Action,
        is_down: bool,
        audio: &mut dyn AudioService,
    ) -> bool {
        if action == Action::Restart {
            if is_down {
                audio.stop_all();
                self.sizzle = None;
                self.restart_pending = true;
                info!("restart requested");
                return true;
            }
            return false;
        }
        self.input.on_key(action, is_down)
    }

    /// Whether the restart action fired. The host answers by dropping this
    /// session and constructing a new one.
    pub fn restart_pending(&self) -> bool {
        self.restart_pending
    }

    /// Advance the simulation by one frame of `dt` seconds
    pub fn update(&mut self, dt: f32, audio: &mut dyn AudioService) {
        // Skewer transform; camera sampled before anything moves so the
        // tilt sees last frame's camera
        let camera_position = self.scene.camera(self.roles.camera).transform.position;
        let skewer = &mut self.scene.node_mut(self.roles.skewer).transform;
        self.composer
            .advance(dt, &self.input, &self.tuning, skewer, camera_position);
        let skewer = *skewer;

        // Active marshmallow slot to the tip, the rest parked
        Composer::place_marshmallows(
            &mut self.scene,
            &self.roles,
            self.cook.stage(),
            self.tuning.skewer_tip_offset,
        );

        // Fire scheduler; the reappear cue is louder while toast is owed
        let reappear_volume = if self.cook.touching_seconds < self.cook.goal_seconds {
            self.tuning.fire_volume_eager
        } else {
            self.tuning.fire_volume_done
        };
        if let Some(event) = self
            .fire
            .advance(dt, &mut self.rng, reappear_volume, &self.tuning)
        {
            let fire_node = &mut self.scene.node_mut(self.roles.fire).transform;
            match event {
                FireEvent::Relocated { position, volume } => {
                    fire_node.position.x = position.x;
                    fire_node.position.y = position.y;
                    let at = fire_node.position;
                    debug!("fire relocated to ({:.1}, {:.1})", position.x, position.y);
                    audio.play_one_shot(Cue::FireMoved, volume, at);
                }
                FireEvent::Hidden => {
                    // Parking the node is what removes the fire from the
                    // contact check
                    fire_node.position.x = consts::PARK_XY;
                    fire_node.position.y = consts::PARK_XY;
                }
            }
        }

        // Contact accumulation and cook classification
        let fire_position = self.scene.node(self.roles.fire).transform.position;
        let slots = self
            .roles
            .marshmallow
            .map(|id| self.scene.node(id).transform.position);
        let cook_events = self
            .cook
            .step(dt, &self.tuning, self.fire.visible, fire_position, &slots);
        for event in cook_events {
            self.apply_cook_event(event, fire_position, audio);
        }

        // Camera follow and listener push
        let cam = follow(skewer.position, self.composer.yaw(), self.tuning.camera_offset);
        self.scene.camera_mut(self.roles.camera).transform = cam;
        let pose = listener_pose(&cam);
        audio.set_listener(pose.position, pose.right, self.tuning.listener_smoothing);

        // Edge counters are consumed; clear for the next frame
        self.input.reset_edges();
    }

    fn apply_cook_event(&mut self, event: CookEvent, fire_position: Vec3, audio: &mut dyn AudioService) {
        match event {
            CookEvent::SizzleStarted => {
                let already = self.sizzle.map_or(false, |h| !audio.is_stopped(h));
                if !already {
                    self.sizzle = Some(audio.start_loop(
                        Cue::Sizzle,
                        self.tuning.sizzle_volume,
                        fire_position,
                        self.tuning.sizzle_max_distance,
                    ));
                }
            }
            CookEvent::SizzleStopped => {
                if let Some(handle) = self.sizzle.take() {
                    audio.stop(handle);
                }
            }
            CookEvent::StageEntered(stage) => {
                info!(
                    "cook stage {:?} at {:.2}s / {:.1}s",
                    stage, self.cook.touching_seconds, self.cook.goal_seconds
                );
                if let Some(cue) = stage.cue() {
                    let at = self
                        .scene
                        .node(self.roles.marshmallow[stage as usize])
                        .transform
                        .position;
                    audio.play_one_shot(cue, self.tuning.cue_volume, at);
                }
            }
        }
    }

    /// Submit the scene and the two-pass status overlay
    pub fn draw(&mut self, backend: &mut dyn RenderBackend, drawable_size: UVec2) {
        let aspect = drawable_size.x as f32 / drawable_size.y as f32;
        self.scene.camera_mut(self.roles.camera).aspect = aspect;
        backend.draw_scene(&self.scene, self.roles.camera);

        let text = self.status_line();
        let h = consts::HUD_TEXT_HEIGHT;
        let anchor = Vec3::new(-aspect + 0.1 * h, -1.0 + 0.1 * h, 0.0);
        let x_axis = Vec3::new(h, 0.0, 0.0);
        let y_axis = Vec3::new(0.0, h, 0.0);
        backend.draw_text(&text, anchor, x_axis, y_axis, consts::HUD_SHADOW);

        let ofs = 2.0 / drawable_size.y as f32;
        backend.draw_text(
            &text,
            anchor + Vec3::new(ofs, ofs, 0.0),
            x_axis,
            y_axis,
            consts::HUD_FOREGROUND,
        );
    }

    /// The HUD status string: progress, goal, and stage text
    pub fn status_line(&self) -> String {
        format!(
            "Toasted: {:.1}s, Goal: {:.1}s - {}",
            self.cook.touching_seconds,
            self.cook.goal_seconds,
            self.cook.stage().status_text()
        )
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn roles(&self) -> &SceneRoles {
        &self.roles
    }

    pub fn cook(&self) -> &CookState {
        &self.cook
    }

    pub fn fire(&self) -> &FireScheduler {
        &self.fire
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn yaw(&self) -> f32 {
        self.composer.yaw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioEvent, RecordingAudio};
    use crate::render::RecordingRenderer;
    use crate::scene::{FIRE_NODE, MARSHMALLOW_NODES, SKEWER_NODE};
    use crate::sim::cook::CookStage;

    fn demo_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_node(SKEWER_NODE);
        scene.add_node(FIRE_NODE);
        for name in MARSHMALLOW_NODES {
            scene.add_node(name);
        }
        scene.add_camera();
        scene
    }

    fn session(seed: u64) -> Session {
        Session::new(demo_scene(), Tuning::default(), seed).unwrap()
    }

    /// Drive the skewer into sustained fire contact: wait for the fire to
    /// appear, then teleport the skewer over it.
    fn force_contact(session: &mut Session, audio: &mut RecordingAudio) {
        while !session.fire().visible {
            session.update(1.0 / 60.0, audio);
        }
        let fire = session.scene.node(session.roles.fire).transform.position;
        session.scene.node_mut(session.roles.skewer).transform.position =
            Vec3::new(fire.x, fire.y, 1.0);
        // One frame to settle the marshmallow onto the tip
        session.update(1.0 / 60.0, audio);
    }

    #[test]
    fn test_construction_rolls_goal_and_fire() {
        let tuning = Tuning::default();
        let s = session(42);
        let goal = s.cook().goal_seconds;
        assert!(goal >= tuning.goal_min_seconds && goal <= tuning.goal_max_seconds);

        let fire = s.scene().node(s.roles().fire).transform.position;
        assert!(fire.x.abs() <= tuning.fire_region_half_extent);
        assert!(fire.y.abs() <= tuning.fire_region_half_extent);
        assert!(!s.fire().visible);
    }

    #[test]
    fn test_missing_nodes_abort_construction() {
        let mut scene = Scene::new();
        scene.add_node(SKEWER_NODE);
        scene.add_camera();
        assert!(Session::new(scene, Tuning::default(), 1).is_err());
    }

    #[test]
    fn test_same_seed_same_session() {
        let a = session(7);
        let b = session(7);
        assert_eq!(a.cook().goal_seconds, b.cook().goal_seconds);
        assert_eq!(a.fire().position, b.fire().position);
    }

    #[test]
    fn test_restart_is_a_fresh_session() {
        let mut audio = RecordingAudio::new();
        let mut s = session(3);
        force_contact(&mut s, &mut audio);
        for _ in 0..30 {
            s.update(1.0 / 60.0, &mut audio);
        }
        assert!(s.cook().touching_seconds > 0.0);
        assert!(!audio.live_loops().is_empty());

        assert!(s.handle_key(Action::Restart, true, &mut audio));
        assert!(s.restart_pending());
        assert!(audio.events.contains(&AudioEvent::StoppedAll));
        assert!(audio.live_loops().is_empty());

        // Host-side rebuild with a new seed: everything re-rolled
        let fresh = session(4);
        assert_eq!(fresh.cook().touching_seconds, 0.0);
        assert!(!fresh.restart_pending());
        assert_ne!(fresh.cook().goal_seconds, s.cook().goal_seconds);
    }

    #[test]
    fn test_restart_keyup_not_handled() {
        let mut audio = RecordingAudio::new();
        let mut s = session(3);
        assert!(!s.handle_key(Action::Restart, false, &mut audio));
        assert!(!s.restart_pending());
    }

    #[test]
    fn test_hidden_fire_never_accumulates() {
        let mut audio = RecordingAudio::new();
        let mut s = session(9);
        // Put the skewer right on the (hidden) fire position
        let fire = s.scene.node(s.roles.fire).transform.position;
        s.scene.node_mut(s.roles.skewer).transform.position = fire;

        // Fire stays hidden for the first second
        for _ in 0..30 {
            s.update(0.01, &mut audio);
        }
        assert_eq!(s.cook().touching_seconds, 0.0);
    }

    #[test]
    fn test_sizzle_and_accumulation_over_fire() {
        let mut audio = RecordingAudio::new();
        let mut s = session(5);
        force_contact(&mut s, &mut audio);

        for _ in 0..60 {
            s.update(1.0 / 60.0, &mut audio);
        }
        assert!(s.cook().touching_seconds > 0.9);
        assert!(s.cook().is_touching());
        assert_eq!(audio.live_loops().len(), 1);
    }

    #[test]
    fn test_fire_hides_and_parks_after_visible_duration() {
        let mut audio = RecordingAudio::new();
        let mut s = session(11);
        while !s.fire().visible {
            s.update(0.1, &mut audio);
        }
        // Ride out the visible window
        for _ in 0..71 {
            s.update(0.1, &mut audio);
        }
        assert!(!s.fire().visible);
        let fire = s.scene().node(s.roles().fire).transform.position;
        assert!(fire.length() > 900.0);
    }

    #[test]
    fn test_reappear_volume_tracks_goal() {
        let tuning = Tuning::default();
        let mut audio = RecordingAudio::new();
        let mut s = session(13);

        // First appearance: no toast time yet, cue is loud
        while !s.fire().visible {
            s.update(0.1, &mut audio);
        }
        let volumes: Vec<f32> = audio
            .events
            .iter()
            .filter_map(|e| match e {
                AudioEvent::OneShot {
                    cue: Cue::FireMoved,
                    volume,
                    ..
                } => Some(*volume),
                _ => None,
            })
            .collect();
        assert_eq!(volumes, vec![tuning.fire_volume_eager]);

        // Force the goal already met and ride to the next appearance
        s.cook.touching_seconds = s.cook.goal_seconds + 0.5;
        loop {
            s.update(0.1, &mut audio);
            if s.fire().visible && s.fire().timer == 0.0 {
                break;
            }
        }
        let last_volume = audio
            .events
            .iter()
            .rev()
            .find_map(|e| match e {
                AudioEvent::OneShot {
                    cue: Cue::FireMoved,
                    volume,
                    ..
                } => Some(*volume),
                _ => None,
            })
            .unwrap();
        assert_eq!(last_volume, tuning.fire_volume_done);
    }

    #[test]
    fn test_marshmallow_slot_tracks_stage() {
        let mut audio = RecordingAudio::new();
        let mut s = session(21);
        s.update(1.0 / 60.0, &mut audio);

        // Raw stage: slot zero on the tip, others parked
        let active = s.roles().marshmallow[CookStage::Raw as usize];
        let skewer = s.scene().node(s.roles().skewer).transform;
        let expected = skewer.position + skewer.rotation * Vec3::new(0.0, 0.0, 2.0);
        assert!(s.scene().node(active).transform.position.distance(expected) < 1e-4);
        for stage in [CookStage::Almost, CookStage::Golden, CookStage::Burnt] {
            let parked = s.roles().marshmallow[stage as usize];
            assert!(s.scene().node(parked).transform.position.length() > 900.0);
        }

        // Golden: the golden slot takes over
        s.cook.touching_seconds = s.cook.goal_seconds;
        s.update(1.0 / 60.0, &mut audio);
        let golden = s.roles().marshmallow[CookStage::Golden as usize];
        assert!(s.scene().node(golden).transform.position.length() < 900.0);
        assert!(
            s.scene()
                .node(s.roles().marshmallow[CookStage::Raw as usize])
                .transform
                .position
                .length()
                > 900.0
        );
    }

    #[test]
    fn test_stage_cues_one_shot_through_session() {
        let mut audio = RecordingAudio::new();
        let mut s = session(17);
        force_contact(&mut s, &mut audio);

        // Toast far past burnt; fire hides and reappears along the way,
        // so keep chasing its latest target position
        for _ in 0..(25 * 100) {
            let fire = s.fire().position;
            s.scene.node_mut(s.roles.skewer).transform.position =
                Vec3::new(fire.x, fire.y, 1.0);
            s.update(0.01, &mut audio);
        }
        assert_eq!(s.cook().stage(), CookStage::Burnt);

        let chimes: Vec<Cue> = audio
            .one_shots()
            .into_iter()
            .filter(|c| matches!(c, Cue::AlmostChime | Cue::GoldenChime | Cue::BurntSting))
            .collect();
        assert_eq!(chimes, vec![Cue::AlmostChime, Cue::GoldenChime, Cue::BurntSting]);
    }

    #[test]
    fn test_listener_follows_camera_every_frame() {
        let tuning = Tuning::default();
        let mut audio = RecordingAudio::new();
        let mut s = session(2);
        s.update(1.0 / 60.0, &mut audio);

        let cam = s.scene().camera(s.roles().camera).transform;
        match audio.events.last() {
            Some(AudioEvent::Listener {
                position,
                smoothing_seconds,
                ..
            }) => {
                assert_eq!(*position, cam.position);
                assert_eq!(*smoothing_seconds, tuning.listener_smoothing);
            }
            other => panic!("expected trailing Listener event, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_counts_reset_each_frame() {
        let mut audio = RecordingAudio::new();
        let mut s = session(2);
        s.handle_key(Action::Forward, true, &mut audio);
        s.handle_key(Action::Forward, false, &mut audio);
        s.handle_key(Action::Forward, true, &mut audio);
        assert_eq!(s.input().forward.edge_count, 2);

        s.update(1.0 / 60.0, &mut audio);
        assert_eq!(s.input().forward.edge_count, 0);
        assert!(s.input().forward.held);
    }

    #[test]
    fn test_draw_two_pass_overlay() {
        let mut audio = RecordingAudio::new();
        let mut renderer = RecordingRenderer::new();
        let mut s = session(2);
        s.update(1.0 / 60.0, &mut audio);
        s.draw(&mut renderer, UVec2::new(1280, 720));

        assert_eq!(renderer.scene_draws, 1);
        assert_eq!(renderer.text_calls.len(), 2);
        assert_eq!(renderer.text_calls[0].1, consts::HUD_SHADOW);
        assert_eq!(renderer.text_calls[1].1, consts::HUD_FOREGROUND);
        let text = renderer.last_text().unwrap();
        assert!(text.starts_with("Toasted: 0.0s, Goal:"));
        assert!(text.ends_with("keep toasting"));
    }

    #[test]
    fn test_movement_moves_skewer() {
        let mut audio = RecordingAudio::new();
        let mut s = session(2);
        s.handle_key(Action::Forward, true, &mut audio);
        let before = s.scene().node(s.roles().skewer).transform.position;
        for _ in 0..60 {
            s.update(1.0 / 60.0, &mut audio);
        }
        let after = s.scene().node(s.roles().skewer).transform.position;
        // The move vector is the tilted skewer axis flattened to the
        // ground and not renormalized, so a second of "forward" covers
        // move_speed * cos(tilt) units
        let expected = 20.0 * 70.0f32.to_radians().cos();
        let moved = (after - before).length();
        assert!((moved - expected).abs() < 0.5, "moved {moved}");
        // Horizontal movement only
        assert_eq!(after.z, before.z);
    }
}
