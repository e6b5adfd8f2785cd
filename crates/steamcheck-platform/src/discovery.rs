use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("automatic Steam discovery is not supported on this platform")]
    UnsupportedPlatform,

    #[error("Steam installation not found: {0}")]
    ClientNotFound(String),
}

/// Return the Steam client's install directory for the current platform.
///
/// # Errors
/// Returns `UnsupportedPlatform` on platforms without a native discovery
/// mechanism, and `ClientNotFound` when the platform store has no usable
/// record of a Steam installation.
pub fn steam_install_dir() -> Result<PathBuf, DiscoveryError> {
    #[cfg(windows)]
    {
        let dir = crate::registry::steam_path()?;
        log::debug!("Steam install directory from registry: {}", dir.display());
        Ok(dir)
    }

    #[cfg(not(windows))]
    {
        Err(DiscoveryError::UnsupportedPlatform)
    }
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::{DiscoveryError, steam_install_dir};

    #[test]
    fn non_windows_discovery_is_unsupported() {
        assert_eq!(
            steam_install_dir(),
            Err(DiscoveryError::UnsupportedPlatform)
        );
    }
}
