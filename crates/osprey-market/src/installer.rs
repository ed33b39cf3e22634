use crate::marketplace::Marketplace;
use async_trait::async_trait;
use osprey_browser::{HeadlessChrome, Session};
use osprey_core::{
    BatchResult, DownloadOutcome, Downloader, Error, InstallerConfig, Result, DEFAULT_FILE_NAME,
};

/// What the batch loop drives: one install attempt per extension plus a
/// between-items session reset. [`Installer`] is the production
/// implementation; tests use scripted fakes.
#[async_trait]
pub trait ExtensionSink {
    fn label(&self) -> &str;

    /// Install one extension. Never fails the batch: every error is
    /// absorbed into a `false` outcome.
    async fn install(&mut self, name: &str) -> bool;

    /// Reset the session to a search-ready state.
    async fn reset(&mut self) -> Result<()>;
}

/// Run the install loop over `names`, strictly in input order.
///
/// The session reset runs between two consecutive installs but never
/// after the last one, so the batch does not abort an in-flight
/// navigation on its way out.
pub async fn run_batch<S>(sink: &mut S, names: &[String]) -> Result<BatchResult>
where
    S: ExtensionSink + Send,
{
    let mut result = BatchResult::new();

    for (index, name) in names.iter().enumerate() {
        let succeeded = sink.install(name.trim()).await;
        result.record(name.clone(), succeeded);

        if index + 1 < names.len() {
            sink.reset().await?;
        }
    }

    if result.all_ok() {
        tracing::info!(
            "[{}] all extensions downloaded: {}",
            sink.label(),
            result.ok.join(",")
        );
    } else {
        tracing::info!(
            "[{}] downloaded {} of {} extensions: {}. failed: {}",
            sink.label(),
            result.ok.len(),
            result.total(),
            result.ok.join(","),
            result.failed.join(",")
        );
    }

    Ok(result)
}

/// Drives one marketplace adapter through a sequential per-extension
/// install loop over one exclusively-owned browser session.
pub struct Installer<'a> {
    chrome: &'a HeadlessChrome,
    marketplace: Box<dyn Marketplace>,
    config: InstallerConfig,
    downloader: Downloader,
    session: Option<Session>,
}

impl<'a> Installer<'a> {
    pub fn new(
        chrome: &'a HeadlessChrome,
        marketplace: Box<dyn Marketplace>,
        config: InstallerConfig,
    ) -> Self {
        let downloader = Downloader::new(
            config.download_dir().to_path_buf(),
            config.download_timeout(),
        );
        Self {
            chrome,
            marketplace,
            config,
            downloader,
            session: None,
        }
    }

    /// Create this installer's session and navigate to the marketplace
    /// root. A failure here is fatal for the pass, not per-extension.
    pub async fn init(&mut self) -> Result<()> {
        let session = self
            .chrome
            .new_session(
                self.config.name(),
                self.config.navigation_timeout(),
                self.config.action_timeout(),
            )
            .await
            .map_err(|e| Error::Browser(e.to_string()))?;

        // Stored before the first navigation so cleanup() releases the
        // session even when that navigation fails.
        self.session = Some(session);
        if let Some(session) = &self.session {
            self.marketplace.open_root(session).await?;
        }
        Ok(())
    }

    /// Install a single extension: search, resolve, download, save.
    ///
    /// Any error during the install, including unexpected ones, degrades
    /// to a failed outcome for this extension and is never re-thrown to
    /// the batch loop.
    pub async fn install_extension(&mut self, name: &str) -> DownloadOutcome {
        tracing::info!("[{}] fetching extension: {}", self.config.name(), name);

        let outcome = match self.try_install(name).await {
            Ok(outcome) => outcome,
            Err(err) => DownloadOutcome::failed(err),
        };

        match (&outcome.saved_path, &outcome.failure) {
            (Some(path), _) => {
                tracing::info!(
                    "[{}] extension {} saved to {}",
                    self.config.name(),
                    name,
                    path.display()
                );
            }
            (_, Some(err)) if err.is_timeout() => {
                tracing::error!("[{}] timed out fetching {}: {}", self.config.name(), name, err);
            }
            (_, Some(err)) => {
                tracing::error!("[{}] failed to fetch {}: {}", self.config.name(), name, err);
            }
            _ => {}
        }

        outcome
    }

    async fn try_install(&mut self, name: &str) -> Result<DownloadOutcome> {
        let session = self
            .session
            .as_ref()
            .ok_or(Error::UnsupportedOperation("installer used before init"))?;

        self.marketplace.locate_extension(session, name).await?;
        let url = self.marketplace.resolve_download_url(session).await?;
        tracing::debug!("[{}] resolved {} to {}", self.config.name(), name, url);

        self.downloader.fetch_and_save(&url, DEFAULT_FILE_NAME).await
    }

    /// Install every extension in `names`. See [`run_batch`] for the
    /// ordering and reset contract.
    pub async fn install_extensions(&mut self, names: &[String]) -> Result<BatchResult> {
        run_batch(self, names).await
    }

    /// Release the session. Runs on every exit path; safe to call when
    /// `init` never completed.
    pub async fn cleanup(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(err) = session.close().await {
                tracing::warn!("[{}] failed to close session: {}", self.config.name(), err);
            }
        }
    }
}

#[async_trait]
impl ExtensionSink for Installer<'_> {
    fn label(&self) -> &str {
        self.config.name()
    }

    async fn install(&mut self, name: &str) -> bool {
        self.install_extension(name).await.succeeded
    }

    async fn reset(&mut self) -> Result<()> {
        let session = self
            .session
            .as_ref()
            .ok_or(Error::UnsupportedOperation("installer used before init"))?;
        self.marketplace.open_root(session).await
    }
}
