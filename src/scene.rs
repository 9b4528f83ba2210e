//! In-memory scene data and role resolution
//!
//! The engine layer loads exported scenes and populates a [`Scene`]; the
//! gameplay core only ever addresses nodes through the typed handles in
//! [`SceneRoles`], resolved once by name after load.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

pub const SKEWER_NODE: &str = "skewer_root";
pub const FIRE_NODE: &str = "fire_root";
/// Marshmallow slot names, indexed by `CookStage as usize`
pub const MARSHMALLOW_NODES: [&str; 4] = [
    "marshmallow_root",
    "marshmallow_almost_root",
    "marshmallow_golden_root",
    "marshmallow_burnt_root",
];

/// Position/rotation/scale of one scene node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Handle to a node in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

/// Handle to a camera in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CameraId(usize);

/// A named scene node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
}

/// A scene camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub transform: Transform,
    pub aspect: f32,
}

/// Flattened scene contents, owned by the session so gameplay can mutate it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: Vec<Node>,
    cameras: Vec<Camera>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with an identity transform, returning its handle
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        self.add_node_at(name, Transform::default())
    }

    /// Add a node at the given transform, returning its handle
    pub fn add_node_at(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        self.nodes.push(Node {
            name: name.into(),
            transform,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Add a camera, returning its handle
    pub fn add_camera(&mut self) -> CameraId {
        self.cameras.push(Camera {
            transform: Transform::default(),
            aspect: 1.0,
        });
        CameraId(self.cameras.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn camera(&self, id: CameraId) -> &Camera {
        &self.cameras[id.0]
    }

    pub fn camera_mut(&mut self, id: CameraId) -> &mut Camera {
        &mut self.cameras[id.0]
    }

    /// Find a node by name (first match wins, matching the loader contract)
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// Resolve the named nodes the gameplay core requires.
    ///
    /// One pass, one aggregated error: every missing name is reported
    /// together, and the camera count is checked after.
    pub fn resolve_roles(&self) -> Result<SceneRoles, SceneError> {
        let mut missing = Vec::new();
        let mut require = |name: &'static str| match self.find(name) {
            Some(id) => id,
            None => {
                missing.push(name);
                NodeId(usize::MAX)
            }
        };

        let skewer = require(SKEWER_NODE);
        let fire = require(FIRE_NODE);
        let marshmallow = MARSHMALLOW_NODES.map(&mut require);

        if !missing.is_empty() {
            return Err(SceneError::MissingNodes(missing));
        }
        if self.cameras.len() != 1 {
            return Err(SceneError::CameraCount(self.cameras.len()));
        }

        Ok(SceneRoles {
            skewer,
            fire,
            marshmallow,
            camera: CameraId(0),
        })
    }
}

/// Typed handles to the nodes gameplay cares about
#[derive(Debug, Clone, Copy)]
pub struct SceneRoles {
    pub skewer: NodeId,
    pub fire: NodeId,
    /// Marshmallow slots, indexed by `CookStage as usize`
    pub marshmallow: [NodeId; 4],
    pub camera: CameraId,
}

/// Fatal scene-resolution failure; aborts session construction
#[derive(Debug, Clone, thiserror::Error)]
pub enum SceneError {
    #[error("scene is missing required nodes: {}", .0.join(", "))]
    MissingNodes(Vec<&'static str>),

    #[error("expected scene to have exactly one camera, but it has {0}")]
    CameraCount(usize),
}
