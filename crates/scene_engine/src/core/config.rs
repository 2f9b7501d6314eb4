//! # Unified Configuration System
//!
//! All configuration structures for the engine live here. Every section has
//! sensible defaults so a partial file (or none at all) is enough.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging and debug behavior
//! - **Scene Config**: limits enforced by the scene graph arena
//! - **Render Config**: light activation, malformed entry handling, transparent ordering

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError, ConfigFormat};

/// Default number of light slots a scene may allocate
pub const DEFAULT_MAX_LIGHTS: u32 = 8;

/// Default bound on hierarchy depth for walks over the tree
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// # Engine Configuration
///
/// Core engine behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level filter handed to `env_logger`
    pub log_level: String,
    /// Development mode: malformed render entries fail the frame unless
    /// [`RenderConfig::malformed_entries`] says otherwise
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Scene Configuration
///
/// Limits enforced by [`crate::scene::SceneGraph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of light slots that can be handed out
    pub max_lights: u32,
    /// Maximum parent chain length before a walk is treated as structurally broken
    pub max_depth: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            max_lights: DEFAULT_MAX_LIGHTS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// What to do with a render entry that cannot be classified
///
/// A mesh is malformed when it has no material or its material handle no
/// longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedEntryPolicy {
    /// Abort classification with an error
    Reject,
    /// Log a warning and drop the entry from the frame
    Skip,
}

impl MalformedEntryPolicy {
    /// `Reject` in debug mode, `Skip` otherwise
    pub fn for_debug_mode(debug_mode: bool) -> Self {
        if debug_mode {
            Self::Reject
        } else {
            Self::Skip
        }
    }
}

/// Submission order of the transparent batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransparentOrder {
    /// Keep traversal order
    #[default]
    Traversal,
    /// Sort by view-space depth, farthest first
    BackToFront,
}

/// # Render Configuration
///
/// Controls how partitioned batches are submitted to a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Lights beyond this count are skipped for the frame
    pub max_active_lights: u32,
    /// Handling of malformed meshes; unset follows [`EngineConfig::debug_mode`]
    pub malformed_entries: Option<MalformedEntryPolicy>,
    /// Ordering of the transparent batch
    pub transparent_order: TransparentOrder,
}

impl RenderConfig {
    /// Set the active light limit
    pub fn with_max_active_lights(mut self, count: u32) -> Self {
        self.max_active_lights = count;
        self
    }

    /// Set the malformed entry policy
    pub fn with_malformed_entries(mut self, policy: MalformedEntryPolicy) -> Self {
        self.malformed_entries = Some(policy);
        self
    }

    /// Set the transparent batch ordering
    pub fn with_transparent_order(mut self, order: TransparentOrder) -> Self {
        self.transparent_order = order;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_active_lights: DEFAULT_MAX_LIGHTS,
            malformed_entries: None,
            transparent_order: TransparentOrder::default(),
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Scene graph limits
    pub scene: SceneConfig,
    /// Render submission settings
    pub render: RenderConfig,
}

impl ApplicationConfig {
    /// Policy applied to malformed render entries
    pub fn malformed_entry_policy(&self) -> MalformedEntryPolicy {
        self.render
            .malformed_entries
            .unwrap_or_else(|| MalformedEntryPolicy::for_debug_mode(self.engine.debug_mode))
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log level cannot be empty".to_string()));
        }

        if self.scene.max_depth == 0 {
            return Err(ConfigError::Invalid("max depth must be at least 1".to_string()));
        }

        if self.render.max_active_lights > self.scene.max_lights {
            log::warn!(
                "max_active_lights ({}) exceeds the scene light slots ({}); the extra slots are never used",
                self.render.max_active_lights,
                self.scene.max_lights
            );
        }

        Ok(())
    }
}

impl Config for ApplicationConfig {}
