use osprey_core::{BatchResult, Result};
use std::future::Future;

/// Run the batch against the primary marketplace, then retry the failures
/// (and only the failures) once against the secondary.
///
/// When the fallback hop runs, its result is the overall result; failures
/// of the secondary are terminal for this run. The secondary is never
/// constructed when the primary pass fully succeeds.
pub async fn install_with_fallback<P, S, PF, SF>(
    names: &[String],
    primary: P,
    secondary: S,
) -> Result<BatchResult>
where
    P: FnOnce(Vec<String>) -> PF,
    PF: Future<Output = Result<BatchResult>>,
    S: FnOnce(Vec<String>) -> SF,
    SF: Future<Output = Result<BatchResult>>,
{
    let first = primary(names.to_vec()).await?;
    if first.all_ok() {
        return Ok(first);
    }

    tracing::info!(
        "retrying {} failed extension(s) against the fallback marketplace: {}",
        first.failed.len(),
        first.failed.join(",")
    );
    secondary(first.failed.clone()).await
}
