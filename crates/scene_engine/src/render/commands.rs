//! Draw commands handed to a render backend
//!
//! The renderer never touches a graphics API itself. Batches are lowered into
//! a flat sequence of commands carrying pre-computed model-view matrices and
//! arena handles; the backend resolves the handles against the scene it is
//! given.

use crate::foundation::math::Mat4;
use crate::scene::{MaterialId, NodeId};

/// A single backend instruction
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Turn on the light slot `light_id`
    EnableLight {
        /// Slot assigned by the scene graph
        light_id: u32,
    },

    /// Upload a light's parameters at its eye-space placement
    DrawLight {
        /// Light node
        node: NodeId,
        /// `view * world`
        model_view: Mat4,
    },

    /// Draw a mesh with its material
    DrawMesh {
        /// Mesh node
        node: NodeId,
        /// Material bound for this draw, if the mesh has one
        material: Option<MaterialId>,
        /// `view * world`
        model_view: Mat4,
    },

    /// Draw a non-mesh node (a group); backends usually ignore these
    DrawNode {
        /// Node being drawn
        node: NodeId,
        /// `view * world`
        model_view: Mat4,
    },

    /// Enable alpha blending
    EnableBlend,

    /// Disable alpha blending
    DisableBlend,
}

impl DrawCommand {
    /// Node the command refers to, if any
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::DrawLight { node, .. } | Self::DrawMesh { node, .. } | Self::DrawNode { node, .. } => Some(*node),
            Self::EnableLight { .. } | Self::EnableBlend | Self::DisableBlend => None,
        }
    }

    /// Model-view matrix carried by a draw command
    pub fn model_view(&self) -> Option<&Mat4> {
        match self {
            Self::DrawLight { model_view, .. }
            | Self::DrawMesh { model_view, .. }
            | Self::DrawNode { model_view, .. } => Some(model_view),
            Self::EnableLight { .. } | Self::EnableBlend | Self::DisableBlend => None,
        }
    }

    /// Whether this command issues a draw
    pub fn is_draw(&self) -> bool {
        self.node().is_some()
    }
}
