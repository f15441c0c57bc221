//! Error types for the server crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid bind address '{0}'")]
    BindAddress(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;
