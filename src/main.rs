//! Campfire Toast entry point
//!
//! Headless demo host: the shipped game drives the core from the engine's
//! window/audio layer, but the simulation runs fine without either. This
//! binary builds a synthetic scene, scripts some input, and logs the HUD
//! line so the whole frame loop can be watched from a terminal.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::{UVec2, Vec3};
use log::{debug, info};

use campfire_toast::audio::{AudioService, Cue, LoopHandle};
use campfire_toast::render::{RenderBackend, Rgba};
use campfire_toast::scene::{FIRE_NODE, MARSHMALLOW_NODES, SKEWER_NODE, Scene, SceneError};
use campfire_toast::sim::{Action, Session};
use campfire_toast::tuning::Tuning;

/// Frames per simulated second for the scripted run
const DEMO_HZ: u32 = 60;
/// Scripted run length in seconds, per session
const DEMO_SECONDS: u32 = 20;

/// Logs every audio call instead of mixing samples
#[derive(Default)]
struct LogAudio {
    next_handle: u64,
    live: Vec<LoopHandle>,
}

impl AudioService for LogAudio {
    fn play_one_shot(&mut self, cue: Cue, volume: f32, position: Vec3) {
        info!(
            "audio: {cue:?} at ({:.1}, {:.1}, {:.1}) vol {volume:.2}",
            position.x, position.y, position.z
        );
    }

    fn start_loop(
        &mut self,
        cue: Cue,
        volume: f32,
        _position: Vec3,
        _max_distance: f32,
    ) -> LoopHandle {
        self.next_handle += 1;
        let handle = LoopHandle(self.next_handle);
        self.live.push(handle);
        info!("audio: loop {cue:?} started vol {volume:.2}");
        handle
    }

    fn stop(&mut self, handle: LoopHandle) {
        if let Some(i) = self.live.iter().position(|h| *h == handle) {
            self.live.remove(i);
            info!("audio: loop stopped");
        }
    }

    fn is_stopped(&self, handle: LoopHandle) -> bool {
        !self.live.contains(&handle)
    }

    fn stop_all(&mut self) {
        self.live.clear();
        info!("audio: stop all");
    }

    fn set_listener(&mut self, position: Vec3, right: Vec3, smoothing_seconds: f32) {
        debug!(
            "audio: listener at ({:.1}, {:.1}, {:.1}) right ({:.2}, {:.2}, {:.2}) smooth {smoothing_seconds:.4}",
            position.x, position.y, position.z, right.x, right.y, right.z
        );
    }
}

/// Prints the overlay's foreground pass once a second
#[derive(Default)]
struct ConsoleRenderer {
    frame: u32,
}

impl RenderBackend for ConsoleRenderer {
    fn draw_scene(&mut self, _scene: &Scene, _camera: campfire_toast::scene::CameraId) {
        self.frame += 1;
    }

    fn draw_text(&mut self, text: &str, _anchor: Vec3, _x: Vec3, _y: Vec3, color: Rgba) {
        // Shadow pass is black; echo only the foreground pass
        if color != campfire_toast::consts::HUD_SHADOW && self.frame % DEMO_HZ == 1 {
            println!("{text}");
        }
    }
}

/// Stand-in for the engine's scene loader: same node names the Blender
/// export carries
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

/// Scripted input: circle around while chasing height
fn scripted_action(second: u32) -> Option<Action> {
    match second % 8 {
        0 | 1 => Some(Action::Forward),
        2 => Some(Action::TurnLeft),
        3 | 4 => Some(Action::Forward),
        5 => Some(Action::Raise),
        6 => Some(Action::Lower),
        _ => None,
    }
}

fn run_session(
    seed: u64,
    restart_at_second: Option<u32>,
    audio: &mut LogAudio,
    renderer: &mut ConsoleRenderer,
) -> Result<bool, SceneError> {
    let mut session = Session::new(demo_scene(), Tuning::default(), seed)?;
    let dt = 1.0 / DEMO_HZ as f32;
    let mut held: Option<Action> = None;

    for frame in 0..(DEMO_SECONDS * DEMO_HZ) {
        // Re-script the held key once a second, between frames like a host
        if frame % DEMO_HZ == 0 {
            let second = frame / DEMO_HZ;
            if let Some(action) = held.take() {
                session.handle_key(action, false, audio);
            }
            if restart_at_second == Some(second) {
                session.handle_key(Action::Restart, true, audio);
            } else if let Some(action) = scripted_action(second) {
                session.handle_key(action, true, audio);
                held = Some(action);
            }
        }

        session.update(dt, audio);
        session.draw(renderer, UVec2::new(1280, 720));

        if session.restart_pending() {
            return Ok(true);
        }
    }
    info!("session done: {}", session.status_line());
    Ok(false)
}

fn main() -> Result<(), SceneError> {
    env_logger::init();

    let mut seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    info!("seed {seed}");

    let mut audio = LogAudio::default();
    let mut renderer = ConsoleRenderer::default();

    // The host owns restart: a pending request tears the session down and
    // a fresh one is built, new goal and fire position included. The demo
    // scripts one restart partway through the first session.
    let mut restart_at = Some(8);
    loop {
        let restarted = run_session(seed, restart_at, &mut audio, &mut renderer)?;
        if !restarted {
            break;
        }
        seed = seed.wrapping_add(1);
        restart_at = None;
    }
    Ok(())
}
