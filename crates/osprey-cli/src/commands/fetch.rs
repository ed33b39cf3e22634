use anyhow::Result;
use console::style;
use osprey_browser::HeadlessChrome;
use osprey_core::{BatchResult, InstallerConfig};
use osprey_market::{install_with_fallback, Installer, Marketplace, OpenVsx, VsMarketplace};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEBUGGING_PORT: u16 = 9222;

pub fn execute(
    extensions: &str,
    download_dir: &Path,
    chrome_path: Option<PathBuf>,
    download_timeout: u64,
    navigation_timeout: Option<u64>,
    action_timeout: Option<u64>,
) -> Result<()> {
    let names = parse_extension_list(extensions);
    if names.is_empty() {
        return Err(anyhow::anyhow!(
            "no extension names given (use --extensions \"Name One,Name Two\")"
        ));
    }

    // Create tokio runtime for async operations
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        println!("🔍 Locating Chrome...");
        let chrome = HeadlessChrome::launch(chrome_path, DEBUGGING_PORT).await?;
        println!("🚀 Chrome started");

        let outcome = run_passes(
            &chrome,
            &names,
            download_dir,
            download_timeout,
            navigation_timeout,
            action_timeout,
        )
        .await;

        chrome.shutdown().await;
        outcome
    });

    // Explicitly shutdown runtime with timeout to prevent hanging on blocking tasks
    runtime.shutdown_timeout(Duration::from_millis(100));

    let result = result?;
    println!();
    if result.all_ok() {
        println!(
            "{} All extensions downloaded: {}",
            style("✅").green(),
            result.ok.join(", ")
        );
    } else {
        println!(
            "{} Failed to download: {}",
            style("⚠️").yellow(),
            result.failed.join(", ")
        );
    }

    Ok(())
}

async fn run_passes(
    chrome: &HeadlessChrome,
    names: &[String],
    download_dir: &Path,
    download_timeout: u64,
    navigation_timeout: Option<u64>,
    action_timeout: Option<u64>,
) -> Result<BatchResult> {
    let make_config = |label: &str| -> Result<InstallerConfig> {
        let mut config = InstallerConfig::new(label, download_dir)?
            .with_download_timeout(Duration::from_millis(download_timeout));
        if let Some(ms) = navigation_timeout {
            config = config.with_navigation_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = action_timeout {
            config = config.with_action_timeout(Duration::from_millis(ms));
        }
        Ok(config)
    };

    let primary_config = make_config("OpenVSX")?;
    let secondary_config = make_config("VSMarketplace")?;

    let result = install_with_fallback(
        names,
        move |batch| run_pass(chrome, Box::new(OpenVsx::new()), primary_config, batch),
        move |batch| run_pass(chrome, Box::new(VsMarketplace::new()), secondary_config, batch),
    )
    .await?;

    Ok(result)
}

/// One full batch against one marketplace: init, install loop, cleanup.
/// The session is released on every exit path.
async fn run_pass(
    chrome: &HeadlessChrome,
    marketplace: Box<dyn Marketplace>,
    config: InstallerConfig,
    names: Vec<String>,
) -> osprey_core::Result<BatchResult> {
    println!("📦 Fetching from {}...", marketplace.name());

    let mut installer = Installer::new(chrome, marketplace, config);
    let outcome = match installer.init().await {
        Ok(()) => installer.install_extensions(&names).await,
        Err(err) => Err(err),
    };
    installer.cleanup().await;

    outcome
}

fn parse_extension_list(extensions: &str) -> Vec<String> {
    extensions
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
        .collect()
}
