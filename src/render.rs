//! Render collaborator contract
//!
//! The core never talks to the GPU; it submits the scene and an overlay
//! string through this trait once per frame.

use glam::Vec3;

use crate::scene::{CameraId, Scene};

/// RGBA overlay color
pub type Rgba = [u8; 4];

/// Engine-layer render surface consumed by the core
pub trait RenderBackend {
    /// Draw every scene drawable from the given camera
    fn draw_scene(&mut self, scene: &Scene, camera: CameraId);

    /// Draw one line of overlay text. `anchor` is the baseline origin,
    /// `x_axis`/`y_axis` span one glyph cell.
    fn draw_text(&mut self, text: &str, anchor: Vec3, x_axis: Vec3, y_axis: Vec3, color: Rgba);
}

/// Discards scene submissions and keeps the overlay strings. Used by tests
/// and the headless demo host.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub scene_draws: usize,
    pub text_calls: Vec<(String, Rgba)>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The foreground pass of the most recent overlay, if any
    pub fn last_text(&self) -> Option<&str> {
        self.text_calls.last().map(|(s, _)| s.as_str())
    }
}

impl RenderBackend for RecordingRenderer {
    fn draw_scene(&mut self, _scene: &Scene, _camera: CameraId) {
        self.scene_draws += 1;
    }

    fn draw_text(&mut self, text: &str, _anchor: Vec3, _x_axis: Vec3, _y_axis: Vec3, color: Rgba) {
        self.text_calls.push((text.to_string(), color));
    }
}
