use async_trait::async_trait;
use osprey_browser::Session;
use osprey_core::{Error, Result};

/// One marketplace's navigation/search/resolve flow behind a uniform
/// three-step contract, so the installer never touches site-specific UI.
///
/// The per-extension sequence the installer drives is:
/// `open_root` (reset) → `locate_extension` → `resolve_download_url`.
#[async_trait]
pub trait Marketplace: Send + Sync {
    /// Label used in logs.
    fn name(&self) -> &'static str;

    /// The marketplace root URL. `None` means the variant cannot
    /// navigate, which makes calling [`Marketplace::open_root`] a
    /// programming error rather than a runtime failure.
    fn root_url(&self) -> Option<&str> {
        None
    }

    /// Reset the session to a search-ready root state. Safe to call
    /// between installs.
    async fn open_root(&self, session: &Session) -> Result<()> {
        let root = self
            .root_url()
            .ok_or(Error::UnsupportedOperation(
                "marketplace root URL is not configured",
            ))?;
        session.goto(root).await
    }

    /// Search for `name`, find a matching result, and navigate into its
    /// detail page. Fails with [`Error::NotFound`] when no result matches
    /// within the action timeout.
    async fn locate_extension(&self, session: &Session, name: &str) -> Result<()>;

    /// Resolve a concrete download URL from the detail page.
    async fn resolve_download_url(&self, session: &Session) -> Result<String>;
}
