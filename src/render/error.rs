//! Rendering / materialization errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// Reading, writing, or removing a file under the conf/ssl directories failed.
    #[error("render I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
