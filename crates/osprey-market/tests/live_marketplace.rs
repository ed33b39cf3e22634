//! End-to-end passes against the real marketplaces. These drive a live
//! Chrome instance over the network, so they are ignored by default:
//!
//!     cargo test -p osprey-market -- --ignored

use osprey_browser::HeadlessChrome;
use osprey_core::InstallerConfig;
use osprey_market::{Installer, OpenVsx, VsMarketplace};
use std::time::Duration;

const EXTENSIONS: &[&str] = &["Prettier - Code formatter", "Path Intellisense"];

#[tokio::test]
#[ignore = "requires Chrome and network access"]
async fn fetch_from_open_vsx() {
    let temp = tempfile::tempdir().unwrap();
    let config = InstallerConfig::new("OpenVSX", temp.path())
        .unwrap()
        .with_download_timeout(Duration::from_secs(30));

    let chrome = HeadlessChrome::launch(None, 9224).await.unwrap();
    let mut installer = Installer::new(&chrome, Box::new(OpenVsx::new()), config);

    installer.init().await.unwrap();
    let names: Vec<String> = EXTENSIONS.iter().map(|n| n.to_string()).collect();
    let result = installer.install_extensions(&names).await;
    installer.cleanup().await;
    chrome.shutdown().await;

    let result = result.unwrap();
    assert_eq!(result.total(), EXTENSIONS.len());
    assert!(result.all_ok(), "failed: {:?}", result.failed);
    assert!(std::fs::read_dir(temp.path()).unwrap().count() > 0);
}

#[tokio::test]
#[ignore = "requires Chrome and network access"]
async fn fetch_from_vs_marketplace() {
    let temp = tempfile::tempdir().unwrap();
    let config = InstallerConfig::new("VSMarketplace", temp.path())
        .unwrap()
        .with_download_timeout(Duration::from_secs(30));

    let chrome = HeadlessChrome::launch(None, 9225).await.unwrap();
    let mut installer = Installer::new(&chrome, Box::new(VsMarketplace::new()), config);

    installer.init().await.unwrap();
    let names: Vec<String> = EXTENSIONS.iter().map(|n| n.to_string()).collect();
    let result = installer.install_extensions(&names).await;
    installer.cleanup().await;
    chrome.shutdown().await;

    let result = result.unwrap();
    assert_eq!(result.total(), EXTENSIONS.len());
    assert!(result.all_ok(), "failed: {:?}", result.failed);
}
