//! Certificate and key materialization, with stale-file eviction.

use std::path::Path;

use crate::common::fs as common_fs;
use crate::model::RouterConfig;

use super::error::{RenderError, Result};

const CERT_MODE: u32 = 0o644;
const KEY_MODE: u32 = 0o600;

fn io(e: crate::common::error::AppError) -> RenderError {
    match e {
        crate::common::error::AppError::Io(io_err) => RenderError::Io(io_err),
        other => RenderError::Io(std::io::Error::other(other.to_string())),
    }
}

/// First evict every `*.crt`/`*.key` already in `dir`, then write `platform.{crt,key}`
/// (if a platform certificate is attached) and `<domain>.{crt,key}` for every domain
/// whose resolved certificate is non-nil. Certificates are written mode 0644, keys 0600.
pub fn write_certs(model: &RouterConfig, dir: &Path) -> Result<()> {
    for crt in common_fs::list_files_with_extension(dir, "crt").map_err(io)? {
        common_fs::remove_file_if_exists(&crt).map_err(io)?;
    }
    for key in common_fs::list_files_with_extension(dir, "key").map_err(io)? {
        common_fs::remove_file_if_exists(&key).map_err(io)?;
    }

    if let Some(cert) = &model.platform_certificate {
        write_pair(dir, "platform", &cert.cert, &cert.key)?;
    }

    for app in &model.app_configs {
        for (domain, cert) in &app.certificates {
            if let Some(cert) = cert {
                write_pair(dir, domain, &cert.cert, &cert.key)?;
            }
        }
    }

    Ok(())
}

fn write_pair(dir: &Path, stem: &str, cert: &str, key: &str) -> Result<()> {
    common_fs::write_file_with_mode(&dir.join(format!("{stem}.crt")), cert.as_bytes(), CERT_MODE)
        .map_err(io)?;
    common_fs::write_file_with_mode(&dir.join(format!("{stem}.key")), key.as_bytes(), KEY_MODE)
        .map_err(io)?;
    Ok(())
}
