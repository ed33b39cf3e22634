pub mod batch;
pub mod config;
pub mod download;
mod error;

pub use batch::BatchResult;
pub use config::InstallerConfig;
pub use download::{DiskStore, DownloadOutcome, Downloader, FileStore, DEFAULT_FILE_NAME};
pub use error::{Error, Result};
