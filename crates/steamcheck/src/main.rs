//! steamcheck - is an installed Steam app behind its distribution branch?
//!
//! The verdict is the exit code so the tool composes into scripts:
//! 0 usage printed, 1 check failed, 2 no update pending, 3 update pending.

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser};

use steamcheck_core::{CheckError, CheckRequest, run_check};

const EXIT_CHECK_FAILED: u8 = 1;
const EXIT_UP_TO_DATE: u8 = 2;
const EXIT_UPDATE_AVAILABLE: u8 = 3;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "steamcheck")]
#[command(about = "Check whether an installed Steam app has a pending update", long_about = None)]
#[command(version)]
struct Cli {
    /// Steam application id to check
    app_id: String,

    /// Directory holding appmanifest files (skips Steam discovery)
    #[arg(long = "appsdir", value_name = "PATH")]
    apps_dir: Option<PathBuf>,

    /// Branch to check instead of the manifest's configured branch
    #[arg(long, value_name = "NAME")]
    branch: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn outcome_code(outcome: &Result<bool, CheckError>) -> u8 {
    match outcome {
        Ok(true) => EXIT_UPDATE_AVAILABLE,
        Ok(false) => EXIT_UP_TO_DATE,
        Err(_) => EXIT_CHECK_FAILED,
    }
}

/// Exit code for an argument-parsing outcome. Help and version displays are
/// successes; real parse failures report "check could not complete" so they
/// can never be mistaken for a no-update verdict.
fn parse_exit_code(error: &clap::Error) -> u8 {
    if error.use_stderr() { EXIT_CHECK_FAILED } else { 0 }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Bare invocation prints usage and performs no check at all.
    if std::env::args_os().len() <= 1 {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return ExitCode::from(parse_exit_code(&error));
        }
    };
    logging::init_logging(cli.verbose);

    let client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
        Ok(client) => client,
        Err(error) => {
            eprintln!("steamcheck: failed to build HTTP client: {error}");
            return ExitCode::from(EXIT_CHECK_FAILED);
        }
    };

    let request = CheckRequest {
        app_id: cli.app_id,
        apps_dir: cli.apps_dir,
        branch_override: cli.branch,
    };

    let outcome = run_check(&client, &request).await;
    match &outcome {
        Ok(true) => log::debug!("update available for app {}", request.app_id),
        Ok(false) => log::debug!("app {} is up to date", request.app_id),
        Err(error) => eprintln!("steamcheck: {error}"),
    }

    ExitCode::from(outcome_code(&outcome))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use steamcheck_core::{ExtractError, FetchError};

    use super::{Cli, EXIT_CHECK_FAILED, EXIT_UP_TO_DATE, outcome_code, parse_exit_code};

    #[test]
    fn verdicts_map_to_documented_exit_codes() {
        assert_eq!(outcome_code(&Ok(true)), 3);
        assert_eq!(outcome_code(&Ok(false)), 2);
        assert_eq!(
            outcome_code(&Err(ExtractError::MissingField("LastUpdated").into())),
            1
        );
        assert_eq!(
            outcome_code(&Err(FetchError::FieldNotFound {
                path: "data".to_string(),
            }
            .into())),
            1
        );
    }

    #[test]
    fn arguments_parse_into_a_request_shape() {
        let cli = Cli::parse_from([
            "steamcheck",
            "--appsdir",
            "/tmp/steamapps",
            "--branch",
            "beta",
            "730",
        ]);

        assert_eq!(cli.app_id, "730");
        assert_eq!(cli.apps_dir.as_deref(), Some(std::path::Path::new("/tmp/steamapps")));
        assert_eq!(cli.branch.as_deref(), Some("beta"));
        assert!(!cli.verbose);
    }

    #[test]
    fn flags_require_their_values() {
        assert!(Cli::try_parse_from(["steamcheck", "730", "--branch"]).is_err());
        assert!(Cli::try_parse_from(["steamcheck", "--appsdir"]).is_err());
    }

    #[test]
    fn missing_app_id_is_a_parse_failure() {
        assert!(Cli::try_parse_from(["steamcheck", "--branch", "beta"]).is_err());
    }

    #[test]
    fn unrecognized_flag_is_a_parse_failure() {
        assert!(Cli::try_parse_from(["steamcheck", "--frobnicate", "730"]).is_err());
    }

    #[test]
    fn parse_failures_never_reuse_verdict_exit_codes() {
        let bad_flag = Cli::try_parse_from(["steamcheck", "--frobnicate", "730"])
            .expect_err("unrecognized flag should fail to parse");
        assert_eq!(parse_exit_code(&bad_flag), EXIT_CHECK_FAILED);
        assert_ne!(parse_exit_code(&bad_flag), EXIT_UP_TO_DATE);

        let missing_positional = Cli::try_parse_from(["steamcheck", "--branch", "beta"])
            .expect_err("missing app id should fail to parse");
        assert_eq!(parse_exit_code(&missing_positional), EXIT_CHECK_FAILED);
    }

    #[test]
    fn help_and_version_displays_exit_successfully() {
        let help = Cli::try_parse_from(["steamcheck", "--help"])
            .expect_err("help display surfaces as a parse error");
        assert_eq!(parse_exit_code(&help), 0);

        let version = Cli::try_parse_from(["steamcheck", "--version"])
            .expect_err("version display surfaces as a parse error");
        assert_eq!(parse_exit_code(&version), 0);
    }
}
