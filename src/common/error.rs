//! Crate-wide error type
//!
//! Each subsystem (annotation modeling, cluster inspection, rendering, reconciliation)
//! defines its own error enum; this module composes them into one type so `main`
//! and the reconcile loop can handle any failure uniformly.

use thiserror::Error;
use std::io;

use crate::annotation::ModelError;
use crate::inspector::InspectorError;
use crate::render::RenderError;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Bootstrap settings failed to load or validate
    #[error("settings error: {0}")]
    Settings(String),

    /// Annotation modeling failed (strict mode only; warn mode never returns this)
    #[error("annotation modeling error: {0}")]
    Model(#[from] ModelError),

    /// Cluster inspection failed
    #[error("cluster inspection error: {0}")]
    Inspector(#[from] InspectorError),

    /// Rendering / materialization failed
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Kubernetes client construction failed (fatal at startup)
    #[error("kubernetes client error: {0}")]
    Kube(#[from] kube::Error),

    /// Proxy process could not be started or signaled
    #[error("proxy process error: {0}")]
    Proxy(String),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, AppError>;
