//! Render entry produced by traversal

use crate::foundation::math::Mat4;
use crate::scene::{DrawableKind, NodeId};

/// A drawable node paired with its world transform for one frame
///
/// Entries are only valid for the frame they were built in; the handle may
/// dangle once the scene is edited.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderEntry {
    /// Node to draw
    pub node: NodeId,
    /// Kind of the node when it was visited
    pub kind: DrawableKind,
    /// Accumulated world transform
    pub transform: Mat4,
}

impl RenderEntry {
    /// Create an entry
    pub fn new(node: NodeId, kind: DrawableKind, transform: Mat4) -> Self {
        Self { node, kind, transform }
    }

    /// Whether the entry is a light
    pub fn is_light(&self) -> bool {
        self.kind == DrawableKind::Light
    }

    /// Whether the entry is a mesh
    pub fn is_mesh(&self) -> bool {
        self.kind == DrawableKind::Mesh
    }
}
