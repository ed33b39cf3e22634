use crate::dom;
use crate::marketplace::Marketplace;
use async_trait::async_trait;
use lazy_static::lazy_static;
use osprey_browser::Session;
use osprey_core::{Error, Result};
use regex::Regex;
use std::time::Duration;
use url::Url;

pub const VS_MARKETPLACE_URL: &str = "https://marketplace.visualstudio.com/vscode";
pub const GALLERY_BASE: &str = "https://marketplace.visualstudio.com";

const SEARCH_INPUT: &str = "input.search-input";
const VERSION_HISTORY_TAB: &str = "Version History";
const DETAIL_SETTLE: Duration = Duration::from_millis(1000);

lazy_static! {
    static ref VERSION_CELL: Regex = Regex::new(r"^\d+(\.\d+)*$").unwrap();
}

/// The proprietary marketplace. Detail pages carry the
/// `publisher.extension` identifier in their URL query; the download URL
/// is synthesized from it plus the latest version scraped from the
/// Version History view.
pub struct VsMarketplace {
    root: String,
    gallery_base: String,
}

impl VsMarketplace {
    pub fn new() -> Self {
        Self {
            root: VS_MARKETPLACE_URL.to_string(),
            gallery_base: GALLERY_BASE.to_string(),
        }
    }
}

impl Default for VsMarketplace {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Marketplace for VsMarketplace {
    fn name(&self) -> &'static str {
        "VSMarketplace"
    }

    fn root_url(&self) -> Option<&str> {
        Some(&self.root)
    }

    async fn locate_extension(&self, session: &Session, name: &str) -> Result<()> {
        dom::submit_search(session, SEARCH_INPUT, name).await?;
        session.wait_for_url_contains("search").await?;

        // Result cards are labelled "Extension {name} by publisher ..."
        let pattern = format!("extension {} by publisher", name).to_lowercase();
        let links = dom::matching_links(session, |label| label.to_lowercase().contains(&pattern))
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

        session.wait_for_url_contains("items").await?;
        Ok(())
    }

    async fn resolve_download_url(&self, session: &Session) -> Result<String> {
        let current = session.current_url().await?;
        let (publisher, extension) = item_identifier(&current)?;

        let tab = dom::find_button(session, VERSION_HISTORY_TAB).await?;
        tab.click().await?;
        session.settle(DETAIL_SETTLE).await;

        let version = latest_version(session).await?;

        Ok(vspackage_url(
            &self.gallery_base,
            &publisher,
            &extension,
            &version,
        ))
    }
}

/// Split the detail page's `itemName` query parameter into
/// `(publisher, extension)`.
fn item_identifier(page_url: &str) -> Result<(String, String)> {
    let url = Url::parse(page_url)?;
    let item_name = url
        .query_pairs()
        .find(|(key, _)| key == "itemName")
        .map(|(_, value)| value.into_owned())
        .ok_or(Error::MissingIdentifier)?;

    let (publisher, extension) = item_name.split_once('.').ok_or(Error::MissingIdentifier)?;
    Ok((publisher.to_string(), extension.to_string()))
}

/// Read the leading cell of the first (latest) row in the Version History
/// table.
async fn latest_version(session: &Session) -> Result<String> {
    let timeout = session.action_timeout();
    let poll = async {
        loop {
            if let Ok(cells) = session.page().find_elements("table td").await {
                for cell in cells {
                    if let Ok(Some(text)) = cell.inner_text().await {
                        let text = text.trim();
                        if VERSION_CELL.is_match(text) {
                            return text.to_string();
                        }
                    }
                }
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| Error::ActionTimeout(timeout.as_millis() as u64))
}

fn vspackage_url(base: &str, publisher: &str, extension: &str, version: &str) -> String {
    format!(
        "{}/_apis/public/gallery/publishers/{}/vsextensions/{}/{}/vspackage",
        base, publisher, extension, version
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_identifier_splits_on_first_dot() {
        let (publisher, extension) = item_identifier(
            "https://marketplace.visualstudio.com/items?itemName=ms-vscode.cpptools",
        )
        .unwrap();

        assert_eq!(publisher, "ms-vscode");
        assert_eq!(extension, "cpptools");
    }

    #[test]
    fn test_item_identifier_keeps_trailing_dots_in_extension() {
        let (publisher, extension) =
            item_identifier("https://example.com/items?itemName=pub.ext.extra").unwrap();

        assert_eq!(publisher, "pub");
        assert_eq!(extension, "ext.extra");
    }

    #[test]
    fn test_item_identifier_missing_param() {
        let err = item_identifier("https://example.com/items?other=1").unwrap_err();
        assert!(matches!(err, Error::MissingIdentifier));
    }

    #[test]
    fn test_item_identifier_without_dot() {
        let err = item_identifier("https://example.com/items?itemName=nodot").unwrap_err();
        assert!(matches!(err, Error::MissingIdentifier));
    }

    #[test]
    fn test_vspackage_url_synthesis() {
        let url = vspackage_url(GALLERY_BASE, "ms-vscode", "cpptools", "1.2.3");

        assert!(url.ends_with("/publishers/ms-vscode/vsextensions/cpptools/1.2.3/vspackage"));
        assert_eq!(
            url,
            "https://marketplace.visualstudio.com/_apis/public/gallery/publishers/ms-vscode/vsextensions/cpptools/1.2.3/vspackage"
        );
    }

    #[test]
    fn test_version_cell_pattern() {
        assert!(VERSION_CELL.is_match("1.2.3"));
        assert!(VERSION_CELL.is_match("0.10"));
        assert!(VERSION_CELL.is_match("2"));
        assert!(!VERSION_CELL.is_match("v1.2.3"));
        assert!(!VERSION_CELL.is_match("2024-01-01"));
        assert!(!VERSION_CELL.is_match(""));
    }
}
