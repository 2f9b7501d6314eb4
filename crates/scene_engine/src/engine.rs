//! Engine context
//!
//! Owns the scene, the per-frame render list and the configuration. There is
//! no global instance: callers create an [`Engine`] and pass it around.

use crate::{
    config::ConfigError,
    core::config::ApplicationConfig,
    foundation::math::Mat4,
    render::{RenderBackend, RenderError, RenderList, SceneTraverser, SubmitStats},
    scene::{NodeId, SceneError, SceneGraph},
};
use thiserror::Error;

/// Summary of one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Entries produced by traversal
    pub entries: usize,
    /// Size of the lights batch
    pub lights: usize,
    /// Size of the opaque batch
    pub opaque: usize,
    /// Size of the transparent batch
    pub transparent: usize,
    /// What the backend was actually sent
    pub submitted: SubmitStats,
}

/// Main engine struct
pub struct Engine {
    config: ApplicationConfig,
    scene: SceneGraph,
    render_list: RenderList,
    traverser: SceneTraverser,
    root: Option<NodeId>,
    camera: Option<NodeId>,
    frame_count: u64,
}

impl Engine {
    /// Create an engine with an empty scene
    pub fn new(config: ApplicationConfig) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing engine...");

        let scene = SceneGraph::with_config(&config.scene);
        let traverser = SceneTraverser::new(config.scene.max_depth);

        Ok(Self {
            config,
            scene,
            render_list: RenderList::new(),
            traverser,
            root: None,
            camera: None,
            frame_count: 0,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// The scene
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// The scene, for editing between frames
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// Render list as built by the last frame
    pub fn render_list(&self) -> &RenderList {
        &self.render_list
    }

    /// Root node rendered each frame
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Set the node rendered each frame
    pub fn set_root(&mut self, root: NodeId) -> Result<(), EngineError> {
        self.scene.get(root)?;
        self.root = Some(root);
        Ok(())
    }

    /// Camera providing the view transform
    pub fn camera(&self) -> Option<NodeId> {
        self.camera
    }

    /// Set the camera providing the view transform
    pub fn set_camera(&mut self, camera: NodeId) -> Result<(), EngineError> {
        if !self.scene.get(camera)?.is_camera() {
            return Err(SceneError::NotACamera(camera).into());
        }
        self.camera = Some(camera);
        Ok(())
    }

    /// Forward a window resize to the active camera
    pub fn reshape(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        let Some(id) = self.camera else {
            log::debug!("Reshape to {}x{} with no camera set", width, height);
            return Ok(());
        };
        let camera = self
            .scene
            .node_mut(id)
            .and_then(|node| node.as_camera_mut())
            .ok_or(SceneError::NotACamera(id))?;
        camera.update_window_size(width, height);
        log::debug!("Reshaped camera to {}x{}", width, height);
        Ok(())
    }

    /// Projection of the active camera, identity without one
    pub fn projection_matrix(&self) -> Mat4 {
        self.camera
            .and_then(|id| self.scene.node(id))
            .and_then(|node| node.as_camera())
            .map_or_else(Mat4::identity, |camera| camera.projection_matrix())
    }

    /// Frames rendered so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Build and submit one frame
    ///
    /// Rebuilds the render list from the root, classifies it and submits the
    /// batches with the camera's view transform (identity without a camera).
    pub fn render_frame(&mut self, backend: &mut dyn RenderBackend) -> Result<FrameStats, EngineError> {
        let root = self.root.ok_or(EngineError::NoRoot)?;

        self.render_list.clear();
        self.render_list
            .pass_with(&self.traverser, &self.scene, Some(root), &Mat4::identity())?;
        let batches = self
            .render_list
            .classify(&self.scene, self.config.malformed_entry_policy())?;

        let view = match self.camera {
            Some(camera) => self.scene.view_matrix(camera)?,
            None => Mat4::identity(),
        };
        let submitted = batches.submit(&self.scene, &view, &self.config.render, backend)?;

        self.frame_count += 1;
        let stats = FrameStats {
            frame: self.frame_count,
            entries: self.render_list.len(),
            lights: batches.lights.len(),
            opaque: batches.opaque.len(),
            transparent: batches.transparent.len(),
            submitted,
        };
        log::trace!("Frame {}: {:?}", stats.frame, stats);
        Ok(stats)
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene operation failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Frame could not be built or submitted
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// `render_frame` was called before `set_root`
    #[error("No root node set")]
    NoRoot,
}
