use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use osprey_core::{Error, Result};
use std::time::Duration;

pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One browser page, exclusively owned by one installer for its entire
/// batch. Closed exactly once via [`Session::close`].
///
/// Every wait is bounded: navigations by the navigation timeout, element
/// and URL waits by the action timeout. Session-level failures use the
/// core error kinds so the installer can classify them per extension.
pub struct Session {
    label: String,
    page: Page,
    navigation_timeout: Duration,
    action_timeout: Duration,
}

impl Session {
    pub fn new(
        label: impl Into<String>,
        page: Page,
        navigation_timeout: Option<Duration>,
        action_timeout: Option<Duration>,
    ) -> Self {
        Self {
            label: label.into(),
            page,
            navigation_timeout: navigation_timeout.unwrap_or(DEFAULT_NAVIGATION_TIMEOUT),
            action_timeout: action_timeout.unwrap_or(DEFAULT_ACTION_TIMEOUT),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn action_timeout(&self) -> Duration {
        self.action_timeout
    }

    /// Navigate to `url` and wait for the load to settle.
    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!("[{}] navigating to {}", self.label, url);
        let navigate = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<(), Error>(())
        };

        match tokio::time::timeout(self.navigation_timeout, navigate).await {
            Ok(result) => result,
            Err(_) => Err(Error::NavigationTimeout(
                self.navigation_timeout.as_millis() as u64,
            )),
        }
    }

    /// The page's current URL.
    pub async fn current_url(&self) -> Result<String> {
        self.page
            .url()
            .await?
            .ok_or_else(|| Error::Browser("page has no URL".to_string()))
    }

    /// Poll until the page URL contains `needle`.
    pub async fn wait_for_url_contains(&self, needle: &str) -> Result<()> {
        let poll = async {
            loop {
                if let Ok(Some(url)) = self.page.url().await {
                    if url.contains(needle) {
                        return;
                    }
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(self.action_timeout, poll)
            .await
            .map_err(|_| Error::ActionTimeout(self.action_timeout.as_millis() as u64))
    }

    /// Poll until an element matching `selector` exists.
    pub async fn wait_for_element(&self, selector: &str) -> Result<Element> {
        let poll = async {
            loop {
                if let Ok(element) = self.page.find_element(selector).await {
                    return element;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(self.action_timeout, poll)
            .await
            .map_err(|_| Error::ActionTimeout(self.action_timeout.as_millis() as u64))
    }

    /// Give the page time to finish background fetches before the next
    /// action. Some marketplace pages abort in-flight requests when acted
    /// on too early.
    pub async fn settle(&self, wait: Duration) {
        tokio::time::sleep(wait).await;
    }

    /// Release the page. Consumes the session so release happens once.
    pub async fn close(self) -> Result<()> {
        tracing::debug!("[{}] closing session", self.label);
        self.page.close().await?;
        Ok(())
    }
}
