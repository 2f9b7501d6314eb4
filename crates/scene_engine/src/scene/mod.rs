//! Scene management system
//!
//! Hierarchical scene graph of transform-bearing nodes. Nodes live in an arena
//! owned by [`SceneGraph`] and are addressed by [`NodeId`] handles, so parent
//! links are plain handles instead of pointers and a subtree can be torn down
//! without recursion.
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph (arena: nodes + materials)
//!      ↓  pass(root, identity)
//! RenderList (render module)
//!      ↓  classify()
//! Backend
//! ```
//!
//! Each node carries a [`NodeKind`]: a plain group, a light, a mesh or a
//! camera. Everything except cameras ends up in the render list.

mod node;
mod light;
mod material;
mod mesh;
mod camera;
mod scene_graph;
mod node_grid;

pub use node::{Node, NodeId, NodeKind, DrawableKind, ObjectId};
pub use light::{Light, LightSource, Attenuation, OMNI_CUTOFF_DEGREES};
pub use material::{Material, MaterialId, TextureRef};
pub use mesh::{Mesh, MeshGeometry};
pub use camera::{Camera, Projection};
pub use scene_graph::SceneGraph;
pub use node_grid::{NodeGrid, GRID_SIZE};

use thiserror::Error;

/// Errors raised by scene graph operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// The handle does not refer to a live node
    #[error("Unknown node handle {0:?}")]
    UnknownNode(NodeId),

    /// The handle does not refer to a stored material
    #[error("Unknown material handle {0:?}")]
    UnknownMaterial(MaterialId),

    /// A node cannot be its own child
    #[error("Node {0:?} cannot be attached to itself")]
    SelfParent(NodeId),

    /// Attaching would make a node its own ancestor
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        /// Requested parent
        parent: NodeId,
        /// Requested child
        child: NodeId,
    },

    /// A parent chain is longer than the configured limit
    #[error("Hierarchy deeper than {limit} levels at node {node:?}")]
    DepthLimitExceeded {
        /// Node where the walk started
        node: NodeId,
        /// Configured limit
        limit: usize,
    },

    /// Every light slot is taken
    #[error("Maximum number of lights reached ({max})")]
    LightLimitReached {
        /// Configured number of slots
        max: u32,
    },

    /// The node exists but is not a camera
    #[error("Node {0:?} is not a camera")]
    NotACamera(NodeId),

    /// A camera transform has no inverse
    #[error("Transform of node {0:?} is not invertible")]
    SingularTransform(NodeId),

    /// Attenuation factors must be non-negative
    #[error("Attenuation factor must be non-negative, got {0}")]
    NegativeAttenuation(f32),

    /// Mesh geometry with mismatched attributes or out-of-bounds indices
    #[error("Invalid mesh geometry: {0}")]
    InvalidGeometry(String),

    /// Grid addressing outside the board
    #[error("Grid position ({row}, {col}) is out of range")]
    OutOfRange {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
    },

    /// Grid position inside the board that holds no node
    #[error("Grid position ({row}, {col}) is empty")]
    EmptyCell {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
    },
}

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
