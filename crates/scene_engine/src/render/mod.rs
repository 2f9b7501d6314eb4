//! # Rendering System
//!
//! Turns a scene graph into an ordered draw submission.
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph ──pass──▶ RenderList ──classify──▶ RenderBatches ──submit──▶ RenderBackend
//!                     (lights front,            (lights, opaque,
//!                      others back)              transparent)
//! ```
//!
//! - **SceneTraverser**: walks the node tree and composes `parent * local`
//! - **RenderList**: per-frame working list with the light front-loading policy
//! - **RenderBatches**: the three disjoint batches and their submission rules
//! - **RenderBackend**: receives [`DrawCommand`]s; the engine never talks to a
//!   graphics API directly
//!
//! Nothing here is cached between frames: the list is cleared and rebuilt
//! every time.

mod render_entry;
mod traverser;
mod render_list;
mod batches;
mod commands;
mod backend;

pub use render_entry::RenderEntry;
pub use traverser::SceneTraverser;
pub use render_list::RenderList;
pub use batches::{RenderBatches, SubmitStats};
pub use commands::DrawCommand;
pub use backend::{RenderBackend, CommandRecorder};

use thiserror::Error;

use crate::scene::{NodeId, SceneError};

/// Errors raised while building or submitting a frame
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// A scene lookup failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// The tree being walked is deeper than allowed
    #[error("Traversal exceeded {limit} levels at node {node:?}")]
    DepthLimitExceeded {
        /// First node found beyond the limit
        node: NodeId,
        /// Configured limit
        limit: usize,
    },

    /// A mesh entry has no material to classify it with
    #[error("Mesh node {node:?} ('{name}') has no material")]
    MissingMaterial {
        /// Offending node
        node: NodeId,
        /// Its name, for diagnostics
        name: String,
    },

    /// The backend refused a command
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
