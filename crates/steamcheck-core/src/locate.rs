use std::path::{Path, PathBuf};

use thiserror::Error;

use steamcheck_platform::{DiscoveryError, steam_install_dir};

use crate::vdf;

const STEAM_APPS_DIR: &str = "steamapps";
const LIBRARY_INDEX_FILE: &str = "libraryfolders.vdf";
const LIBRARY_APPS_FIELD: &str = "apps";
const LIBRARY_PATH_FIELD: &str = "path";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error("automatic Steam discovery is not supported on this platform, pass --appsdir")]
    UnsupportedPlatform,

    #[error("Steam installation not found: {0}")]
    ClientNotFound(String),

    #[error("library index not found at {}", .0.display())]
    LibraryIndexMissing(PathBuf),

    #[error("app {0} is not installed in any Steam library")]
    AppNotInAnyLibrary(String),

    #[error("manifest not found at {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("{} is not a usable manifests directory", .0.display())]
    InvalidDirectory(PathBuf),
}

impl From<DiscoveryError> for LocateError {
    fn from(error: DiscoveryError) -> Self {
        match error {
            DiscoveryError::UnsupportedPlatform => LocateError::UnsupportedPlatform,
            DiscoveryError::ClientNotFound(details) => LocateError::ClientNotFound(details),
        }
    }
}

/// Source of the Steam client's install directory. The native implementation
/// consults the platform store; tests substitute fakes so location logic can
/// run anywhere.
pub trait InstallDirSource {
    /// # Errors
    /// Returns a `DiscoveryError` when no install directory can be produced.
    fn install_dir(&self) -> Result<PathBuf, DiscoveryError>;
}

/// Install-directory source backed by the host platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSteam;

impl InstallDirSource for NativeSteam {
    fn install_dir(&self) -> Result<PathBuf, DiscoveryError> {
        steam_install_dir()
    }
}

/// Locate the manifest file for `app_id`.
///
/// With an explicit `apps_dir` the platform store is never consulted: the
/// directory (with `steamapps` appended unless it already ends in it) must
/// contain the manifest. Without one, the Steam install is discovered
/// through `steam` and its library index is scanned for the app.
///
/// # Errors
/// Returns a `LocateError` naming the first step that failed.
pub fn locate_manifest(
    app_id: &str,
    apps_dir: Option<&Path>,
    steam: &dyn InstallDirSource,
) -> Result<PathBuf, LocateError> {
    match apps_dir {
        Some(dir) => locate_in_dir(app_id, dir),
        None => locate_via_discovery(app_id, steam),
    }
}

fn locate_in_dir(app_id: &str, dir: &Path) -> Result<PathBuf, LocateError> {
    if !dir.is_dir() {
        return Err(LocateError::InvalidDirectory(dir.to_path_buf()));
    }

    let apps_dir = if dir.file_name().is_some_and(|name| name == STEAM_APPS_DIR) {
        dir.to_path_buf()
    } else {
        dir.join(STEAM_APPS_DIR)
    };
    if !apps_dir.is_dir() {
        return Err(LocateError::InvalidDirectory(apps_dir));
    }

    let manifest = apps_dir.join(manifest_file_name(app_id));
    if !manifest.is_file() {
        return Err(LocateError::ManifestNotFound(manifest));
    }
    Ok(manifest)
}

fn locate_via_discovery(
    app_id: &str,
    steam: &dyn InstallDirSource,
) -> Result<PathBuf, LocateError> {
    let install_dir = steam.install_dir()?;
    log::debug!("Steam install directory: {}", install_dir.display());

    let index_path = install_dir.join(STEAM_APPS_DIR).join(LIBRARY_INDEX_FILE);
    let raw = std::fs::read_to_string(&index_path)
        .map_err(|_| LocateError::LibraryIndexMissing(index_path.clone()))?;

    let index = match vdf::parse_document(&raw) {
        Ok(document) => document,
        Err(error) => {
            // The outward failure stays coarse; keep the real reason in the log.
            log::warn!(
                "library index at {} did not parse: {error}",
                index_path.display()
            );
            return Err(LocateError::AppNotInAnyLibrary(app_id.to_string()));
        }
    };

    let library = library_path_for_app(&index.root, app_id)
        .ok_or_else(|| LocateError::AppNotInAnyLibrary(app_id.to_string()))?;
    log::debug!("app {app_id} found in library {library}");

    let manifest = PathBuf::from(library)
        .join(STEAM_APPS_DIR)
        .join(manifest_file_name(app_id));
    if !manifest.is_file() {
        return Err(LocateError::ManifestNotFound(manifest));
    }
    Ok(manifest)
}

fn library_path_for_app<'t>(index_root: &'t vdf::Node, app_id: &str) -> Option<&'t str> {
    index_root.entries().iter().find_map(|(_, library)| {
        library
            .child(LIBRARY_APPS_FIELD)?
            .child(app_id)
            .and_then(|_| library.string(LIBRARY_PATH_FIELD))
    })
}

fn manifest_file_name(app_id: &str) -> String {
    format!("appmanifest_{app_id}.acf")
}
