//! Config Model
//!
//! The typed router configuration assembled from a cluster snapshot by applying
//! the annotation modeler (see `crate::annotation`) to each object's raw annotation
//! map. `build::build` is the single entry point; everything else here is the
//! struct hierarchy it fills in and the per-struct `populate` functions that
//! recurse into nested records, since Rust has no runtime field reflection to walk
//! it generically the way the original Go Modeler does.

pub mod app;
pub mod build;
pub mod builder;
pub mod certificate;
pub mod gzip;
pub mod hsts;
pub mod router;
pub mod ssl;

pub use app::AppConfig;
pub use build::{build, RESERVED_CONTEXT};
pub use builder::BuilderConfig;
pub use certificate::Certificate;
pub use gzip::GzipConfig;
pub use hsts::HstsConfig;
pub use router::{RouterConfig, WhitelistMode};
pub use ssl::SslConfig;
