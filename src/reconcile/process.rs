//! Proxy process lifecycle: start it once, signal it to reload on every successful
//! apply. Grounded in the original `nginx/commands.go` shell-out (`Start`/`Reload`
//! exec the same binary, stdout/stderr forwarded, reload never waits on exit — §9
//! "fire-and-start" is the canonical choice this crate keeps).

use std::path::PathBuf;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to exec proxy binary {binary}: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ProcessError>;

/// Wraps the external reverse-proxy binary: started once at bootstrap, re-exec'd
/// with its reload flag on every successful reconciliation.
pub struct ProxyProcess {
    binary: PathBuf,
    reload_args: Vec<String>,
}

impl ProxyProcess {
    pub fn new(binary: PathBuf, reload_args: Vec<String>) -> Self {
        Self { binary, reload_args }
    }

    /// Exec the proxy binary with no arguments. Does not wait for it to exit: the
    /// rendered configuration runs the proxy in the foreground (`daemon off`), so
    /// this process and the proxy run concurrently for the life of the sidecar.
    pub async fn start(&self) -> Result<()> {
        log::info!("starting proxy process: {}", self.binary.display());
        Command::new(&self.binary)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;
        Ok(())
    }

    /// Re-exec the proxy binary with the reload flag(s). Fire-and-forget: only a
    /// failure to spawn the command is reported, its exit status is never awaited
    /// (§9 "the reload command is fire-and-start").
    pub async fn reload(&self) -> Result<()> {
        log::info!("reloading proxy process: {}", self.binary.display());
        Command::new(&self.binary)
            .args(&self.reload_args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;
        Ok(())
    }
}
