use crate::{ChromeFinder, ChromeLauncher, Error, Result, ScratchProfile, Session};
use chromiumoxide::browser::Browser;
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Child;
use std::time::Duration;
use tokio::task::JoinHandle;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// One headless Chrome instance shared by all installer passes of a run.
///
/// Owns the OS process, the CDP connection, and the scratch profile; all
/// three are released together in [`HeadlessChrome::shutdown`].
pub struct HeadlessChrome {
    browser: Browser,
    handler_task: JoinHandle<()>,
    process: Child,
    _profile: ScratchProfile,
}

impl HeadlessChrome {
    /// Find, launch, and connect to a headless Chrome.
    pub async fn launch(chrome_path: Option<PathBuf>, debugging_port: u16) -> Result<Self> {
        let finder = ChromeFinder::new(chrome_path);
        let chrome_binary = finder.find()?;
        tracing::info!("using Chrome at {}", chrome_binary.display());

        let profile = ScratchProfile::new()?;
        let launcher = ChromeLauncher::new(chrome_binary, profile.path().to_path_buf())
            .with_debugging_port(debugging_port);

        let mut process = launcher.launch()?;
        match connect_with_retry(debugging_port).await {
            Ok((browser, handler_task)) => Ok(Self {
                browser,
                handler_task,
                process,
                _profile: profile,
            }),
            Err(err) => {
                let _ = process.kill();
                let _ = process.wait();
                Err(err)
            }
        }
    }

    /// Open a fresh page for one installer. The returned [`Session`] is
    /// exclusively owned by its installer and must be closed by it.
    pub async fn new_session(
        &self,
        label: impl Into<String>,
        navigation_timeout: Option<Duration>,
        action_timeout: Option<Duration>,
    ) -> Result<Session> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(Session::new(label, page, navigation_timeout, action_timeout))
    }

    /// Close the CDP connection and terminate the Chrome process.
    pub async fn shutdown(mut self) {
        if let Err(err) = self.browser.close().await {
            tracing::debug!("browser close failed (continuing): {}", err);
        }
        self.handler_task.abort();
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Connect to Chrome's debugging port, retrying while the process boots,
/// and spawn the task that drains CDP protocol messages.
async fn connect_with_retry(debugging_port: u16) -> Result<(Browser, JoinHandle<()>)> {
    let ws_url = format!("http://localhost:{}", debugging_port);

    let (browser, mut handler) = {
        let mut retries = CONNECT_ATTEMPTS;
        loop {
            tracing::debug!("attempting CDP connection to {}", ws_url);
            match Browser::connect(&ws_url).await {
                Ok(result) => {
                    tracing::info!("CDP connection established");
                    break result;
                }
                Err(e) => {
                    retries -= 1;
                    if retries == 0 {
                        return Err(Error::Cdp(format!(
                            "Failed to connect to Chrome after {} attempts: {}",
                            CONNECT_ATTEMPTS, e
                        )));
                    }
                    tracing::info!("CDP connection attempt failed, retrying... ({} left)", retries);
                    tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                }
            }
        }
    };

    // The handler stream must be drained for any browser command to work
    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::debug!("CDP handler event error (continuing): {}", e);
            }
        }
    });

    Ok((browser, handler_task))
}
