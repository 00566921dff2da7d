//! Cluster inspection errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectorError {
    /// Any transport error against the cluster API other than not-found.
    #[error("kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// The router deployment is a required object; its absence is a hard error
    /// (every other optional object quietly becomes "absent" instead).
    #[error("router deployment \"{name}\" not found in namespace \"{namespace}\"")]
    DeploymentNotFound { name: String, namespace: String },
}

pub type Result<T> = std::result::Result<T, InspectorError>;
