//! # Scene Engine
//!
//! A scene graph with a light/opaque/transparent render partitioner.
//!
//! ## Features
//!
//! - **Scene Graph**: arena-backed node tree with groups, lights, meshes and cameras
//! - **Traversal**: pre-order walk composing world transforms
//! - **Partitioning**: lights first, opaque meshes next, blended entries last
//! - **Backends**: draw commands go through a [`render::RenderBackend`] trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(ApplicationConfig::default())?;
//!
//!     let scene = engine.scene_mut();
//!     let root = scene.create_group("root", Mat4::identity());
//!     let sun = scene.create_light("sun", Mat4::identity(), Light::directional(-Vec3::y()))?;
//!     scene.add_child(root, sun)?;
//!
//!     engine.set_root(root)?;
//!     let mut recorder = CommandRecorder::new();
//!     let stats = engine.render_frame(&mut recorder)?;
//!     println!("{} lights", stats.lights);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod scene;
pub mod render;

mod engine;

pub use engine::{Engine, EngineError, FrameStats};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Engine, EngineError, FrameStats,
        config::Config,
        core::{ApplicationConfig, MalformedEntryPolicy, RenderConfig, SceneConfig, TransparentOrder},
        foundation::math::{Mat4, Mat4Ext, Transform, Vec3, Vec4},
        render::{CommandRecorder, DrawCommand, RenderBackend, RenderBatches, RenderList, SceneTraverser},
        scene::{Camera, Light, Material, Mesh, MeshGeometry, NodeGrid, NodeId, SceneGraph},
    };
}
