//! router-reconciler: control-plane sidecar for a dynamic HTTP/TCP edge proxy.
//!
//! This crate reconciles a proxy's on-disk configuration (main config file, TLS
//! certificates, Diffie-Hellman parameters) against the desired state discovered
//! from a Kubernetes cluster, and signals the proxy to reload when that state
//! changes. The reconciliation core — translating annotation-carrying cluster
//! objects into a typed, validated configuration model, rendering that model into
//! proxy configuration, materializing certificate/key/dhparam files with stale-file
//! eviction, and driving the reload loop with rate limiting and strict
//! partial-failure semantics — is implemented by the five modules below, in
//! dependency order.
//!
//! ```text
//! Reconciler -> Inspector (fetch cluster objects)
//!            -> Annotation Modeler (per-object annotations -> typed fields)
//!            -> Config Model (assembled RouterConfig)
//!            -> Renderer (writes certs, dhparam, config)
//!            -> Reconciler (signal proxy to reload)
//! ```

pub mod annotation;
pub mod common;
pub mod inspector;
pub mod model;
pub mod reconcile;
pub mod render;
pub mod settings;

pub use common::{AppError, Result};
pub use settings::Settings;

/// Application name, used in logging and the CLI's `--help` output.
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
