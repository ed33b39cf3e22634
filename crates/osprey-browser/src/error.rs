use thiserror::Error;

/// Fatal browser-plumbing failures. Anything that happens after a
/// session exists is classified per extension with the core error kinds
/// instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Discovery(String),

    #[error("Failed to launch Chrome: {0}")]
    Launch(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
