mod dom;
pub mod fallback;
pub mod installer;
pub mod marketplace;
pub mod open_vsx;
pub mod vs_marketplace;

pub use fallback::install_with_fallback;
pub use installer::{run_batch, ExtensionSink, Installer};
pub use marketplace::Marketplace;
pub use open_vsx::OpenVsx;
pub use vs_marketplace::VsMarketplace;
