use serde_json::Value;
use thiserror::Error;

const INFO_SERVICE_BASE: &str = "https://api.steamcmd.net/v1/info";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to the app info service failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("app info response was not valid JSON: {0}")]
    Parse(#[source] reqwest::Error),

    #[error("app info service returned HTTP {status}")]
    ServiceError { status: reqwest::StatusCode },

    #[error("field `{path}` not found in app info response")]
    FieldNotFound { path: String },

    #[error("field `{path}` is not an integer timestamp: {value}")]
    MalformedField { path: String, value: String },
}

/// Fetch the published timestamp of `branch` for `app_id`.
///
/// One GET against the info service; the branch timestamp is read out of the
/// response with a dotted-path lookup. The service transmits it as a numeric
/// string, so the value is parsed as base-10 rather than trusting JSON
/// number typing.
///
/// # Errors
/// Returns a `FetchError` for transport failures, non-success HTTP statuses,
/// unparseable bodies, and missing or malformed timestamp fields.
pub async fn fetch_remote_time(
    client: &reqwest::Client,
    app_id: &str,
    branch: &str,
) -> Result<i64, FetchError> {
    fetch_remote_time_at(client, INFO_SERVICE_BASE, app_id, branch).await
}

/// [`fetch_remote_time`] against an explicit service base URL, for tests and
/// alternate deployments.
///
/// # Errors
/// Same contract as [`fetch_remote_time`].
pub async fn fetch_remote_time_at(
    client: &reqwest::Client,
    base_url: &str,
    app_id: &str,
    branch: &str,
) -> Result<i64, FetchError> {
    let url = format!("{base_url}/{app_id}");
    log::debug!("fetching branch info from {url}");

    let response = client.get(&url).send().await.map_err(FetchError::Transport)?;
    if !response.status().is_success() {
        return Err(FetchError::ServiceError {
            status: response.status(),
        });
    }

    let body: Value = response.json().await.map_err(FetchError::Parse)?;
    published_time(&body, app_id, branch)
}

fn published_time(body: &Value, app_id: &str, branch: &str) -> Result<i64, FetchError> {
    let path = format!("data.{app_id}.depots.branches.{branch}.timeupdated");
    let value = lookup_dotted(body, &path).ok_or_else(|| FetchError::FieldNotFound {
        path: path.clone(),
    })?;

    let parsed = match value {
        Value::String(text) => text.parse::<i64>().ok(),
        Value::Number(number) => number.as_i64(),
        _ => None,
    };
    parsed.ok_or_else(|| FetchError::MalformedField {
        path,
        value: value.to_string(),
    })
}

fn lookup_dotted<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(root, |node, key| node.get(key))
}
