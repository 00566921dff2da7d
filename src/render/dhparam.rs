//! Diffie-Hellman parameter file materialization.

use std::path::Path;

use crate::common::fs as common_fs;
use crate::model::RouterConfig;

use super::error::Result;

const DHPARAM_MODE: u32 = 0o644;

fn io(e: crate::common::error::AppError) -> super::error::RenderError {
    match e {
        crate::common::error::AppError::Io(io_err) => super::error::RenderError::Io(io_err),
        other => super::error::RenderError::Io(std::io::Error::other(other.to_string())),
    }
}

/// Write `dhparam.pem` (mode 0644) iff `model.ssl.dh_param` is non-empty; otherwise
/// remove any file already at that path.
pub fn write_dhparam(model: &RouterConfig, dir: &Path) -> Result<()> {
    let path = dir.join("dhparam.pem");
    if model.ssl.dh_param.is_empty() {
        common_fs::remove_file_if_exists(&path).map_err(io)
    } else {
        common_fs::write_file_with_mode(&path, model.ssl.dh_param.as_bytes(), DHPARAM_MODE)
            .map_err(io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writes_dhparam_when_present() {
        let dir = tempdir().unwrap();
        let mut model = RouterConfig::default();
        model.ssl.dh_param = "bizbar".to_string();
        write_dhparam(&model, dir.path()).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("dhparam.pem")).unwrap(), "bizbar");
    }

    #[test]
    fn removes_existing_file_when_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dhparam.pem");
        fs::write(&path, b"stale").unwrap();

        let model = RouterConfig::default();
        write_dhparam(&model, dir.path()).unwrap();
        assert!(!path.exists());
    }
}
