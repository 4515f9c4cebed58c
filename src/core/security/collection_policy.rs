use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::config::Config;

/// Longest collection name accepted, in bytes.
pub const MAX_COLLECTION_NAME_LEN: usize = 120;

/// Which collection names the dynamic router may bind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "names", rename_all = "kebab-case")]
pub enum CollectionPolicy {
    /// Any well-formed name is bound.
    #[default]
    Open,

    /// Only the listed names are bound.
    AllowList(BTreeSet<String>),
}

impl CollectionPolicy {
    /// Build an allow-list policy from the given names.
    pub fn allow_list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AllowList(names.into_iter().map(Into::into).collect())
    }

    /// Parse a comma-separated list, ignoring blanks. An empty list means [`Open`](Self::Open).
    pub fn from_csv(raw: &str) -> Self {
        let names: BTreeSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            Self::Open
        } else {
            Self::AllowList(names)
        }
    }

    pub fn permits(&self, name: &str) -> bool {
        match self {
            Self::Open => true,
            Self::AllowList(names) => names.contains(name),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Open => "open".to_string(),
            Self::AllowList(names) => format!(
                "allow-list [{}]",
                names.iter().cloned().collect::<Vec<_>>().join(", ")
            ),
        }
    }
}

/// Errors that can occur while validating a collection name
#[derive(Debug, thiserror::Error)]
pub enum CollectionAccessError {
    #[error("Invalid collection name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Collection '{name}' is not available")]
    NotAllowed { name: String },
}

/// Validates that a collection name may be bound by the dynamic router.
///
/// This function performs the following checks:
/// 1. The name is something the store accepts (non-empty, bounded length,
///    no `$` or NUL, not in the reserved `system.` namespace)
/// 2. The configured [`CollectionPolicy`] permits it
///
/// # Examples
///
/// ```rust,ignore
/// let config = Config::from_env();
/// let name = validate_collection("orders", &config)?;
/// ```
pub fn validate_collection<'a>(
    name: &'a str,
    config: &Config,
) -> Result<&'a str, CollectionAccessError> {
    check_well_formed(name)?;

    if !config.collections.policy.permits(name) {
        return Err(CollectionAccessError::NotAllowed {
            name: name.to_string(),
        });
    }

    Ok(name)
}

fn check_well_formed(name: &str) -> Result<(), CollectionAccessError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.len() > MAX_COLLECTION_NAME_LEN {
        "name is too long"
    } else if name.contains('$') || name.contains('\0') {
        "name contains a reserved character"
    } else if name.starts_with("system.") {
        "name is in the reserved system namespace"
    } else {
        return Ok(());
    };

    Err(CollectionAccessError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config(policy: CollectionPolicy) -> Config {
        let mut config = Config::default();
        config.collections.policy = policy;
        config
    }

    #[test]
    fn test_open_policy_allows_any_well_formed_name() {
        let config = create_test_config(CollectionPolicy::Open);
        for name in ["lessons", "orders", "anything-else", "with.dots"] {
            assert_eq!(validate_collection(name, &config).unwrap(), name);
        }
    }

    #[test]
    fn test_allow_list_blocks_unlisted_names() {
        let config = create_test_config(CollectionPolicy::allow_list(["lessons", "orders"]));

        assert!(validate_collection("orders", &config).is_ok());
        assert!(matches!(
            validate_collection("users", &config),
            Err(CollectionAccessError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_malformed_names_rejected_under_any_policy() {
        let long = "x".repeat(MAX_COLLECTION_NAME_LEN + 1);
        for policy in [CollectionPolicy::Open, CollectionPolicy::allow_list(["a"])] {
            let config = create_test_config(policy);
            for name in ["", "bad$name", "nul\0name", "system.users", long.as_str()] {
                assert!(
                    matches!(
                        validate_collection(name, &config),
                        Err(CollectionAccessError::InvalidName { .. })
                    ),
                    "{name:?}"
                );
            }
        }
    }

    #[test]
    fn test_policy_from_csv() {
        assert_eq!(CollectionPolicy::from_csv(""), CollectionPolicy::Open);
        assert_eq!(CollectionPolicy::from_csv(" , "), CollectionPolicy::Open);
        assert_eq!(
            CollectionPolicy::from_csv("lessons, orders,,"),
            CollectionPolicy::allow_list(["lessons", "orders"])
        );
    }

    #[test]
    fn test_describe() {
        assert_eq!(CollectionPolicy::Open.describe(), "open");
        assert_eq!(
            CollectionPolicy::allow_list(["orders", "lessons"]).describe(),
            "allow-list [lessons, orders]"
        );
    }
}
