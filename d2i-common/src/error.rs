//! Common error types for the disk2iso console

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for console operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by shared console code
#[derive(Error, Debug)]
pub enum Error {
    /// Config file could not be read
    #[error("Configuration error: read {} failed: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::config::TomlConfig`]
    #[error("Configuration error: parse {} failed: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
