use thiserror::Error;

use crate::vdf::Node;

/// Branch checked when neither an override nor a manifest selection exists.
pub const DEFAULT_BRANCH: &str = "public";

const LAST_UPDATED_FIELD: &str = "LastUpdated";
const USER_CONFIG_FIELD: &str = "UserConfig";
const BETA_KEY_FIELD: &str = "BetaKey";

/// Fields read out of an app manifest for one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppManifest {
    /// Unix timestamp of the last local update.
    pub last_updated: i64,
    /// Branch key the user selected in the client, if any.
    pub beta_key: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("manifest is not in the expected format: {0}")]
    UnrecognizedFormat(String),

    #[error("manifest is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("manifest field `{field}` has unusable value `{value}`")]
    MalformedField {
        field: &'static str,
        value: String,
    },
}

/// Read the update timestamp and optional branch selection from a parsed
/// manifest root.
///
/// The `UserConfig` block is optional; its absence only means no branch was
/// selected locally.
///
/// # Errors
/// Returns `UnrecognizedFormat` when the root is not an object,
/// `MissingField` when `LastUpdated` is absent, and `MalformedField` when it
/// is not a non-negative base-10 integer.
pub fn extract(root: &Node) -> Result<AppManifest, ExtractError> {
    if !root.is_object() {
        return Err(ExtractError::UnrecognizedFormat(
            "manifest root is not an object".to_string(),
        ));
    }

    let node = root
        .child(LAST_UPDATED_FIELD)
        .ok_or(ExtractError::MissingField(LAST_UPDATED_FIELD))?;
    let raw = node
        .as_scalar()
        .ok_or_else(|| ExtractError::MalformedField {
            field: LAST_UPDATED_FIELD,
            value: "<object>".to_string(),
        })?;
    let last_updated = raw
        .parse::<i64>()
        .ok()
        .filter(|seconds| *seconds >= 0)
        .ok_or_else(|| ExtractError::MalformedField {
            field: LAST_UPDATED_FIELD,
            value: raw.to_string(),
        })?;

    let beta_key = root
        .child(USER_CONFIG_FIELD)
        .and_then(|config| config.string(BETA_KEY_FIELD))
        .map(str::to_string);

    Ok(AppManifest {
        last_updated,
        beta_key,
    })
}

/// Resolve the branch to check. Precedence is strict: a non-empty override
/// wins, then a non-empty manifest selection, then [`DEFAULT_BRANCH`].
#[must_use]
pub fn resolve_branch(branch_override: Option<&str>, beta_key: Option<&str>) -> String {
    branch_override
        .filter(|branch| !branch.is_empty())
        .or_else(|| beta_key.filter(|key| !key.is_empty()))
        .unwrap_or(DEFAULT_BRANCH)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{AppManifest, DEFAULT_BRANCH, ExtractError, extract, resolve_branch};
    use crate::vdf::{Node, parse_document};

    fn manifest_root(body: &str) -> Node {
        parse_document(&format!("\"AppState\"\n{{\n{body}\n}}\n"))
            .expect("test manifest should parse")
            .root
    }

    #[test]
    fn extracts_timestamp_and_branch_key() {
        let root = manifest_root(
            "\"LastUpdated\" \"1700000000\"\n\"UserConfig\"\n{\n\"BetaKey\" \"beta\"\n}",
        );

        assert_eq!(
            extract(&root).expect("manifest should extract"),
            AppManifest {
                last_updated: 1_700_000_000,
                beta_key: Some("beta".to_string()),
            }
        );
    }

    #[test]
    fn missing_user_config_is_not_an_error() {
        let root = manifest_root("\"LastUpdated\" \"42\"");

        let manifest = extract(&root).expect("manifest should extract");
        assert_eq!(manifest.last_updated, 42);
        assert_eq!(manifest.beta_key, None);
    }

    #[test]
    fn scalar_root_is_unrecognized_format() {
        let root = Node::Scalar("not a manifest".to_string());

        assert!(matches!(
            extract(&root),
            Err(ExtractError::UnrecognizedFormat(_))
        ));
    }

    #[test]
    fn absent_last_updated_is_missing_field() {
        let root = manifest_root("\"appid\" \"730\"");

        assert_eq!(
            extract(&root),
            Err(ExtractError::MissingField("LastUpdated"))
        );
    }

    #[test]
    fn non_numeric_last_updated_is_malformed() {
        let root = manifest_root("\"LastUpdated\" \"yesterday\"");

        assert_eq!(
            extract(&root),
            Err(ExtractError::MalformedField {
                field: "LastUpdated",
                value: "yesterday".to_string(),
            })
        );
    }

    #[test]
    fn negative_last_updated_is_malformed() {
        let root = manifest_root("\"LastUpdated\" \"-5\"");

        assert!(matches!(
            extract(&root),
            Err(ExtractError::MalformedField { .. })
        ));
    }

    #[test]
    fn last_updated_block_is_malformed() {
        let root = manifest_root("\"LastUpdated\"\n{\n\"x\" \"y\"\n}");

        assert!(matches!(
            extract(&root),
            Err(ExtractError::MalformedField { .. })
        ));
    }

    #[test]
    fn override_wins_over_manifest_key() {
        assert_eq!(resolve_branch(Some("beta"), Some("alpha")), "beta");
    }

    #[test]
    fn manifest_key_wins_over_default() {
        assert_eq!(resolve_branch(None, Some("alpha")), "alpha");
        assert_eq!(resolve_branch(Some(""), Some("alpha")), "alpha");
    }

    #[test]
    fn default_branch_when_nothing_is_selected() {
        assert_eq!(resolve_branch(None, None), DEFAULT_BRANCH);
        assert_eq!(resolve_branch(Some(""), Some("")), DEFAULT_BRANCH);
    }
}
