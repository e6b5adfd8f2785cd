use std::path::PathBuf;

use thiserror::Error;

use crate::extract::{ExtractError, extract, resolve_branch};
use crate::fetch::{FetchError, fetch_remote_time};
use crate::locate::{InstallDirSource, LocateError, NativeSteam, locate_manifest};
use crate::vdf;

/// Everything needed for one update check. Immutable for its duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    pub app_id: String,
    /// Explicit manifests directory; skips client discovery when set.
    pub apps_dir: Option<PathBuf>,
    /// Branch to check instead of whatever the manifest selects.
    pub branch_override: Option<String>,
}

/// First failure encountered during a check. Exactly one is reported.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// The entire decision rule: the branch has an update when its published
/// timestamp is strictly newer than the local one.
#[must_use]
pub fn update_available(local: i64, remote: i64) -> bool {
    remote > local
}

/// Run one check against the native Steam installation.
///
/// # Errors
/// Returns the first stage failure; later stages are not attempted.
pub async fn run_check(
    client: &reqwest::Client,
    request: &CheckRequest,
) -> Result<bool, CheckError> {
    run_check_with(client, request, &NativeSteam).await
}

/// Run one check with a caller-supplied install-directory source.
///
/// Stages run strictly in order: locate, read and parse the manifest,
/// extract, fetch, compare. The first failure short-circuits the rest.
///
/// # Errors
/// Returns the first stage failure; later stages are not attempted.
pub async fn run_check_with(
    client: &reqwest::Client,
    request: &CheckRequest,
    steam: &dyn InstallDirSource,
) -> Result<bool, CheckError> {
    let local = resolve_local(request, steam)?;
    log::debug!(
        "app {} last updated {} locally, checking branch {}",
        request.app_id,
        local.last_updated,
        local.branch
    );

    let remote = fetch_remote_time(client, &request.app_id, &local.branch).await?;
    log::debug!("branch {} published at {remote}", local.branch);

    Ok(update_available(local.last_updated, remote))
}

#[derive(Debug)]
struct LocalState {
    last_updated: i64,
    branch: String,
}

fn resolve_local(
    request: &CheckRequest,
    steam: &dyn InstallDirSource,
) -> Result<LocalState, CheckError> {
    let manifest_path = locate_manifest(&request.app_id, request.apps_dir.as_deref(), steam)?;
    log::debug!("manifest located at {}", manifest_path.display());

    let raw = std::fs::read_to_string(&manifest_path)
        .map_err(|_| LocateError::ManifestNotFound(manifest_path.clone()))?;
    let document = vdf::parse_document(&raw)
        .map_err(|error| ExtractError::UnrecognizedFormat(error.to_string()))?;

    let manifest = extract(&document.root)?;
    let branch = resolve_branch(
        request.branch_override.as_deref(),
        manifest.beta_key.as_deref(),
    );

    Ok(LocalState {
        last_updated: manifest.last_updated,
        branch,
    })
}
