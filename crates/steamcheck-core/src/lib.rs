//! Core update-check logic for steamcheck.
//!
//! This crate answers one question: does the locally installed copy of a
//! Steam app lag behind the version published on its distribution branch?
//! It is split along the stages of a single check:
//! - Manifest location (explicit directory or registry-backed discovery).
//! - Local field extraction from the app manifest.
//! - Remote branch timestamp fetching.
//! - Timestamp comparison and check orchestration.

mod check;
mod extract;
mod fetch;
mod locate;
pub mod vdf;

/// Check request/result types and the sequential check driver.
pub use check::{CheckError, CheckRequest, run_check, run_check_with, update_available};
/// Manifest field model, extraction, and branch precedence rules.
pub use extract::{AppManifest, DEFAULT_BRANCH, ExtractError, extract, resolve_branch};
/// Remote branch timestamp lookup against the app info service.
pub use fetch::{FetchError, fetch_remote_time, fetch_remote_time_at};
/// Manifest location on disk, with a pluggable install-directory source.
pub use locate::{InstallDirSource, LocateError, NativeSteam, locate_manifest};
