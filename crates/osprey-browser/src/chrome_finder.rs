use crate::{Error, Result};
use std::path::{Path, PathBuf};

const PATH_CANDIDATES: &[&str] = &["google-chrome", "chromium", "chromium-browser", "chrome"];

/// Locates a Chrome or Chromium binary on the system.
pub struct ChromeFinder {
    custom_path: Option<PathBuf>,
}

impl ChromeFinder {
    /// Create a finder with an optional user-supplied binary path.
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        Self { custom_path }
    }

    /// Find the browser binary: the custom path wins, then PATH lookup,
    /// then platform default install locations.
    pub fn find(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.custom_path {
            return self.validate_chrome_path(path);
        }

        for name in PATH_CANDIDATES {
            if let Ok(path) = which::which(name) {
                return Ok(path);
            }
        }

        for path in Self::default_paths() {
            if let Ok(valid_path) = self.validate_chrome_path(&path) {
                return Ok(valid_path);
            }
        }

        Err(Error::Discovery(format!(
            "Chrome not found. Checked PATH and: {}. Use --chrome-path to specify location.",
            Self::default_paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }

    /// Platform-specific default install locations.
    fn default_paths() -> Vec<PathBuf> {
        #[cfg(target_os = "macos")]
        return vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
        ];

        #[cfg(target_os = "linux")]
        return vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/usr/bin/chromium-browser"),
        ];

        #[cfg(target_os = "windows")]
        return vec![
            PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        return vec![];
    }

    /// Validate that a path exists and is executable.
    fn validate_chrome_path(&self, path: &Path) -> Result<PathBuf> {
        if !path.exists() {
            return Err(Error::Discovery(format!(
                "Chrome not found at: {}",
                path.display()
            )));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = std::fs::metadata(path).map_err(Error::Io)?;
            if metadata.permissions().mode() & 0o111 == 0 {
                return Err(Error::Discovery(format!(
                    "Chrome binary not executable: {}",
                    path.display()
                )));
            }
        }

        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_finder_accepts_custom_path() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let finder = ChromeFinder::new(Some(path.to_path_buf()));
        let result = finder.find();

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), path);
    }

    #[test]
    fn test_finder_fails_on_missing_custom_path() {
        let finder = ChromeFinder::new(Some(PathBuf::from("/nonexistent/chrome")));
        let result = finder.find();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[cfg(unix)]
    #[test]
    fn test_finder_rejects_non_executable() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path();

        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let finder = ChromeFinder::new(Some(path.to_path_buf()));
        let result = finder.find();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not executable"));
    }
}
