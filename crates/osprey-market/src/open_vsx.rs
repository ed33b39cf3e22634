use crate::dom;
use crate::marketplace::Marketplace;
use async_trait::async_trait;
use osprey_browser::Session;
use osprey_core::{Error, Result};
use std::time::Duration;

pub const OPEN_VSX_URL: &str = "https://open-vsx.org/";

const SEARCH_INPUT: &str = "input#search-input";
// The site keeps firing long fetches after navigation; acting before they
// settle aborts in-flight requests.
const ROOT_SETTLE: Duration = Duration::from_millis(1000);
const RESULTS_SETTLE: Duration = Duration::from_millis(3000);

/// The open marketplace. Search results link straight to detail pages
/// that expose a Download link with a concrete `href`.
pub struct OpenVsx {
    root: String,
}

impl OpenVsx {
    pub fn new() -> Self {
        Self {
            root: OPEN_VSX_URL.to_string(),
        }
    }

    /// Point the variant at an alternate deployment of the marketplace.
    pub fn with_root(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for OpenVsx {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Marketplace for OpenVsx {
    fn name(&self) -> &'static str {
        "OpenVSX"
    }

    fn root_url(&self) -> Option<&str> {
        Some(&self.root)
    }

    async fn open_root(&self, session: &Session) -> Result<()> {
        session.goto(&self.root).await?;
        session.settle(ROOT_SETTLE).await;
        Ok(())
    }

    async fn locate_extension(&self, session: &Session, name: &str) -> Result<()> {
        dom::submit_search(session, SEARCH_INPUT, name).await?;
        session.wait_for_url_contains("search").await?;
        session.settle(RESULTS_SETTLE).await;

        // Any result whose label contains the requested name, first match
        let needle = name.to_lowercase();
        let links = dom::matching_links(session, |label| label.to_lowercase().contains(&needle))
            .await
            .map_err(|err| match err {
                Error::ActionTimeout(_) => Error::NotFound(name.to_string()),
                other => other,
            })?;
        let link = links
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        link.click().await?;

        session.wait_for_url_contains("extension").await?;
        Ok(())
    }

    async fn resolve_download_url(&self, session: &Session) -> Result<String> {
        // The detail page renders several Download anchors; the last one
        // is the package itself
        let links =
            dom::matching_links(session, |label| label.trim().eq_ignore_ascii_case("Download"))
                .await?;
        let link = links
            .into_iter()
            .last()
            .ok_or_else(|| Error::Browser("detail page has no Download link".to_string()))?;

        link.attribute("href")
            .await?
            .ok_or_else(|| Error::Browser("Download link has no href".to_string()))
    }
}
