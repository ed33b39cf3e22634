use crate::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default per-download timeout.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_millis(3000);

/// Per-installer configuration. Built once at orchestrator start and
/// read-only afterwards; one instance is owned by exactly one installer.
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    name: String,
    download_dir: PathBuf,
    navigation_timeout: Option<Duration>,
    action_timeout: Option<Duration>,
    download_timeout: Duration,
}

impl InstallerConfig {
    /// Create a config with the given log label and download directory.
    ///
    /// An absolute directory is used as-is; a relative one is resolved
    /// against the current working directory. The directory is created
    /// recursively if it does not exist.
    pub fn new(name: impl Into<String>, download_dir: impl AsRef<Path>) -> Result<Self> {
        let name = name.into();
        let download_dir = resolve_download_dir(download_dir.as_ref())?;
        tracing::info!("[{}] download directory: {}", name, download_dir.display());

        Ok(Self {
            name,
            download_dir,
            navigation_timeout: None,
            action_timeout: None,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
        })
    }

    /// Bound page navigations (goto + load) to the given duration.
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = Some(timeout);
        self
    }

    /// Bound page actions (element waits, URL waits) to the given duration.
    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = Some(timeout);
        self
    }

    /// Override the per-download timeout.
    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn navigation_timeout(&self) -> Option<Duration> {
        self.navigation_timeout
    }

    pub fn action_timeout(&self) -> Option<Duration> {
        self.action_timeout
    }

    pub fn download_timeout(&self) -> Duration {
        self.download_timeout
    }
}

fn resolve_download_dir(dir: &Path) -> Result<PathBuf> {
    let resolved = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(dir)
    };
    std::fs::create_dir_all(&resolved)?;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_dir_used_as_is() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("downloads");

        let config = InstallerConfig::new("Test", &dir).unwrap();

        assert_eq!(config.download_dir(), dir);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_nested_dir_created_recursively() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("a").join("b").join("downloads");

        let config = InstallerConfig::new("Test", &dir).unwrap();

        assert!(config.download_dir().is_dir());
    }

    #[test]
    fn test_relative_dir_resolves_to_absolute() {
        let resolved = resolve_download_dir(Path::new("target/osprey-config-test")).unwrap();

        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("target/osprey-config-test"));
        assert!(resolved.is_dir());

        let _ = std::fs::remove_dir_all(&resolved);
    }

    #[test]
    fn test_download_timeout_defaults_to_3000ms() {
        let temp = tempfile::tempdir().unwrap();
        let config = InstallerConfig::new("Test", temp.path()).unwrap();

        assert_eq!(config.download_timeout(), Duration::from_millis(3000));
        assert!(config.navigation_timeout().is_none());
        assert!(config.action_timeout().is_none());
    }

    #[test]
    fn test_timeout_overrides() {
        let temp = tempfile::tempdir().unwrap();
        let config = InstallerConfig::new("Test", temp.path())
            .unwrap()
            .with_navigation_timeout(Duration::from_secs(10))
            .with_action_timeout(Duration::from_secs(3))
            .with_download_timeout(Duration::from_secs(5));

        assert_eq!(config.navigation_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.action_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.download_timeout(), Duration::from_secs(5));
    }
}
