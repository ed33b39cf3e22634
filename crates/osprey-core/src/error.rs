use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no matching result for: {0}")]
    NotFound(String),

    #[error("detail page URL carries no itemName parameter")]
    MissingIdentifier,

    #[error("navigation did not complete within {0}ms")]
    NavigationTimeout(u64),

    #[error("page action did not complete within {0}ms")]
    ActionTimeout(u64),

    #[error("download exceeded {0}ms")]
    DownloadTimeout(u64),

    #[error("download failed: HTTP {0}")]
    Http(u16),

    #[error("operation not supported: {0}")]
    UnsupportedOperation(&'static str),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Browser(err.to_string())
    }
}

impl Error {
    /// Whether this failure was a timeout, as opposed to a missing
    /// result, an HTTP error, or a driver-level fault.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::NavigationTimeout(_) | Error::ActionTimeout(_) | Error::DownloadTimeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_classification() {
        assert!(Error::DownloadTimeout(3000).is_timeout());
        assert!(Error::NavigationTimeout(10000).is_timeout());
        assert!(Error::ActionTimeout(3000).is_timeout());
        assert!(!Error::Http(404).is_timeout());
        assert!(!Error::NotFound("Prettier".into()).is_timeout());
    }
}
