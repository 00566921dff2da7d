//! The single-shot snapshot of cluster objects the config model is built from.

use std::collections::HashMap;

/// A routable app service as observed at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppServiceSnapshot {
    pub namespace: String,
    pub name: String,
    /// The `app` label, if set; falls back to `name` when absent (§4.3 naming rule).
    pub app_label: Option<String>,
    pub annotations: HashMap<String, String>,
    pub cluster_ip: String,
    /// Whether the service currently has at least one ready endpoint.
    pub available: bool,
}

/// The optional builder service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderServiceSnapshot {
    pub annotations: HashMap<String, String>,
    pub cluster_ip: String,
}

/// A raw cert/key pair as read from a secret, before it is wrapped as a
/// `model::Certificate`. Kept separate so the inspector layer owns secret-shape
/// validation (missing `tls.crt`/`tls.key` => the whole secret is treated as absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertSecret {
    pub cert: String,
    pub key: String,
}

/// Everything the config model needs from the cluster for one reconciliation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub deployment_annotations: HashMap<String, String>,
    pub app_services: Vec<AppServiceSnapshot>,
    pub builder_service: Option<BuilderServiceSnapshot>,
    pub platform_cert_secret: Option<CertSecret>,
    /// Raw DH parameter bytes (PEM), if the secret and its `dhparam` key exist.
    pub dh_param: Option<String>,
}
