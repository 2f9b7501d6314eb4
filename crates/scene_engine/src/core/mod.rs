//! # Core Engine Module
//!
//! Shared abstractions used by every subsystem. At the moment this is the
//! unified configuration layer.

pub mod config;

pub use config::{
    ApplicationConfig,
    EngineConfig,
    SceneConfig,
    RenderConfig,
    MalformedEntryPolicy,
    TransparentOrder,
    Config,
    ConfigError,
    ConfigFormat,
};
