//! Platform-specific discovery of the Steam client installation.
//!
//! Only Windows carries a native discovery mechanism (the registry key the
//! client writes at install time). Every other platform reports itself as
//! unsupported so callers can fall back to an explicit directory.

mod discovery;

#[cfg(windows)]
mod registry;

pub use discovery::{DiscoveryError, steam_install_dir};
