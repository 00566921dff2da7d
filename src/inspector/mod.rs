//! Cluster Inspector
//!
//! A single-shot, read-only snapshot of the cluster objects the config model needs:
//! the router deployment, routable app services (with endpoint availability), the
//! optional builder service, and the optional platform-cert/DH-param secrets. There
//! is no watch/controller runtime here — every cycle issues a fresh round of direct
//! `get`/`list` calls, matching the "logically sequential, observed as one snapshot"
//! contract.

pub mod client;
pub mod error;
pub mod snapshot;

pub use client::{ClusterInspector, KubeInspector, WellKnownNames};
pub use error::{InspectorError, Result};
pub use snapshot::{AppServiceSnapshot, BuilderServiceSnapshot, CertSecret, Snapshot};
