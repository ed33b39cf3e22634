//! Shared DOM plumbing for the marketplace variants.

use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use osprey_browser::Session;
use osprey_core::{Error, Result};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Type `query` into the search control at `selector` and submit it.
pub(crate) async fn submit_search(session: &Session, selector: &str, query: &str) -> Result<()> {
    let input = session.wait_for_element(selector).await?;
    input.click().await?;
    input.type_str(query).await?;
    input.press_key("Enter").await?;
    Ok(())
}

/// Poll the page for anchor elements whose accessible label (aria-label,
/// falling back to visible text) satisfies `matches`, returning every hit
/// of the first non-empty sweep. Times out after the session's action
/// timeout with [`Error::ActionTimeout`].
pub(crate) async fn matching_links<F>(session: &Session, matches: F) -> Result<Vec<Element>>
where
    F: Fn(&str) -> bool,
{
    let timeout = session.action_timeout();
    let poll = async {
        loop {
            let hits = sweep_links(session.page(), &matches).await;
            if !hits.is_empty() {
                return hits;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| Error::ActionTimeout(timeout.as_millis() as u64))
}

/// Poll for a button-like element whose visible text equals `label`
/// (case-insensitive) and return it.
pub(crate) async fn find_button(session: &Session, label: &str) -> Result<Element> {
    let timeout = session.action_timeout();
    let poll = async {
        loop {
            if let Ok(buttons) = session.page().find_elements("button, [role=\"button\"]").await {
                for button in buttons {
                    if let Ok(Some(text)) = button.inner_text().await {
                        if text.trim().eq_ignore_ascii_case(label) {
                            return button;
                        }
                    }
                }
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| Error::ActionTimeout(timeout.as_millis() as u64))
}

async fn sweep_links<F>(page: &Page, matches: &F) -> Vec<Element>
where
    F: Fn(&str) -> bool,
{
    let mut hits = Vec::new();
    let Ok(anchors) = page.find_elements("a").await else {
        return hits;
    };

    for anchor in anchors {
        let label = match anchor.attribute("aria-label").await {
            Ok(Some(value)) if !value.is_empty() => value,
            _ => match anchor.inner_text().await {
                Ok(Some(text)) => text,
                _ => continue,
            },
        };
        if matches(&label) {
            hits.push(anchor);
        }
    }

    hits
}
