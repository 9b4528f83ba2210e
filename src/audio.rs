//! Audio collaborator contract
//!
//! Decoding and mixing live in the engine layer; the gameplay core drives
//! them through [`AudioService`]. A recording implementation is provided
//! for tests and headless hosts.

use glam::Vec3;

/// Sound cues the gameplay core can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Fire reappeared somewhere new
    FireMoved,
    /// Looping sizzle while the marshmallow is over the fire
    Sizzle,
    /// Marshmallow is almost done
    AlmostChime,
    /// Marshmallow hit the golden window
    GoldenChime,
    /// Left it in too long
    BurntSting,
}

/// Handle to a playing loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopHandle(pub u64);

/// Engine-layer audio surface consumed by the core
pub trait AudioService {
    /// Fire-and-forget positional sample
    fn play_one_shot(&mut self, cue: Cue, volume: f32, position: Vec3);

    /// Start a positional loop; keeps playing until stopped
    fn start_loop(&mut self, cue: Cue, volume: f32, position: Vec3, max_distance: f32)
    -> LoopHandle;

    /// Stop a playing loop (no-op if already stopped)
    fn stop(&mut self, handle: LoopHandle);

    /// Whether a loop has finished or been stopped
    fn is_stopped(&self, handle: LoopHandle) -> bool;

    /// Silence everything, loops included
    fn stop_all(&mut self);

    /// Update the listener pose. `smoothing_seconds` is the interpolation
    /// hint for the mixer, not the frame's elapsed time.
    fn set_listener(&mut self, position: Vec3, right: Vec3, smoothing_seconds: f32);
}

/// One recorded call on a [`RecordingAudio`]
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    OneShot {
        cue: Cue,
        volume: f32,
        position: Vec3,
    },
    LoopStarted {
        cue: Cue,
        handle: LoopHandle,
        volume: f32,
    },
    LoopStopped {
        handle: LoopHandle,
    },
    StoppedAll,
    Listener {
        position: Vec3,
        right: Vec3,
        smoothing_seconds: f32,
    },
}

/// Records every call instead of making sound. Used by tests and by hosts
/// that run the simulation without an audio device.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub events: Vec<AudioEvent>,
    next_handle: u64,
    live: Vec<LoopHandle>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues of all one-shots played, in order
    pub fn one_shots(&self) -> Vec<Cue> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AudioEvent::OneShot { cue, .. } => Some(*cue),
                _ => None,
            })
            .collect()
    }

    /// Loops currently playing
    pub fn live_loops(&self) -> &[LoopHandle] {
        &self.live
    }
}

impl AudioService for RecordingAudio {
    fn play_one_shot(&mut self, cue: Cue, volume: f32, position: Vec3) {
        self.events.push(AudioEvent::OneShot {
            cue,
            volume,
            position,
        });
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
        self.events.push(AudioEvent::LoopStarted {
            cue,
            handle,
            volume,
        });
        handle
    }

    fn stop(&mut self, handle: LoopHandle) {
        if let Some(i) = self.live.iter().position(|h| *h == handle) {
            self.live.remove(i);
            self.events.push(AudioEvent::LoopStopped { handle });
        }
    }

    fn is_stopped(&self, handle: LoopHandle) -> bool {
        !self.live.contains(&handle)
    }

    fn stop_all(&mut self) {
        self.live.clear();
        self.events.push(AudioEvent::StoppedAll);
    }

    fn set_listener(&mut self, position: Vec3, right: Vec3, smoothing_seconds: f32) {
        self.events.push(AudioEvent::Listener {
            position,
            right,
            smoothing_seconds,
        });
    }
}
