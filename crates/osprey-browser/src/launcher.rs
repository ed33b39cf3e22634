use crate::{Error, Result};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

/// Spawns the headless Chrome process that marketplace sessions run in.
pub struct ChromeLauncher {
    chrome_path: PathBuf,
    profile_dir: PathBuf,
    debugging_port: u16,
}

impl ChromeLauncher {
    pub fn new(chrome_path: PathBuf, profile_dir: PathBuf) -> Self {
        Self {
            chrome_path,
            profile_dir,
            debugging_port: 9222,
        }
    }

    pub fn with_debugging_port(mut self, port: u16) -> Self {
        self.debugging_port = port;
        self
    }

    /// Launch the Chrome process, detached from our stdio.
    pub fn launch(&self) -> Result<Child> {
        let args = self.build_args();

        Command::new(&self.chrome_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Launch(e.to_string()))
    }

    /// Build Chrome command-line arguments.
    fn build_args(&self) -> Vec<String> {
        vec![
            "--headless=new".to_string(),
            "--disable-gpu".to_string(),
            format!("--remote-debugging-port={}", self.debugging_port),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            format!("--user-data-dir={}", self.profile_dir.display()),
            "about:blank".to_string(),
        ]
    }

    pub fn debugging_port(&self) -> u16 {
        self.debugging_port
    }
}
