//! Error types for the viewer core

use thiserror::Error;

/// Errors raised while configuring or driving the viewer
#[derive(Error, Debug)]
pub enum ViewerError {
    /// The rendering context (window, document, canvas) is unavailable.
    /// Fatal: the frame loop must not be started.
    #[error("Rendering capability unavailable: {0}")]
    MissingCapability(String),
    #[error("Unknown view '{0}' (expected exterior, interior, or courtyard)")]
    UnknownView(String),
    #[error("Invalid rotation speed '{0}'")]
    InvalidRotationSpeed(String),
    #[error("TOML config error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON config error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Errors reported by a frame renderer for a single frame.
///
/// A failed frame never prevents the next one from running.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Render target missing: {0}")]
    TargetMissing(&'static str),
    #[error("Render backend error: {0}")]
    Backend(String),
}
