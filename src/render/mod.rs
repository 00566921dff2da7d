//! Renderer
//!
//! Deterministic materialization of a `RouterConfig` into the three artifacts the
//! proxy reads from disk: certificate/key pairs, a DH-parameters file, and the main
//! text configuration. Each `write_*` operation is independent and idempotent; the
//! reconciler (`crate::reconcile`) is responsible for sequencing them and for never
//! advancing its retained model past a partial failure.

pub mod certs;
pub mod config;
pub mod dhparam;
pub mod error;

pub use certs::write_certs;
pub use config::render as render_config;
pub use dhparam::write_dhparam;
pub use error::{RenderError, Result};

use std::path::Path;

use crate::model::RouterConfig;

/// Render `model` and write it to `path`, truncating any existing file.
pub fn write_config(model: &RouterConfig, path: &Path, ssl_dir: &str) -> Result<()> {
    let rendered = render_config(model, ssl_dir);
    crate::common::fs::write_file_with_mode(path, rendered.as_bytes(), 0o644).map_err(|e| match e {
        crate::common::error::AppError::Io(io_err) => RenderError::Io(io_err),
        other => RenderError::Io(std::io::Error::other(other.to_string())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_config_truncates_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nginx.conf");
        let model = RouterConfig::default();

        write_config(&model, &path, "/opt/router/ssl").unwrap();
        let first = std::fs::read(&path).unwrap();
        write_config(&model, &path, "/opt/router/ssl").unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
    }
}
