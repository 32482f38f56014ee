use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading inputs. Rendering itself never fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// The selected JSON value is neither an array of blocks nor null.
    #[error("expected an array of content blocks, found {found}")]
    NotBlockArray { found: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
