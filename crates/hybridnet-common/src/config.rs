//! Assembler configuration model.

use serde::{Deserialize, Serialize};

/// How malformed bool/int/shape tokens are handled.
///
/// Required strings always fail hard; this only governs optional values
/// that carry a default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// Fall back to the declared default and log a warning.
    #[default]
    Lenient,
    /// Reject the token with an invalid-configuration error.
    Strict,
}

/// Root configuration for one assembler instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblerConfig {
    /// Policy applied to malformed optional tokens.
    pub parse_policy: ParsePolicy,
    /// Value of the `ManagedBy` label applied to every resource.
    pub managed_by: String,
}

impl AssemblerConfig {
    /// Returns a configuration using the strict parse policy.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            parse_policy: ParsePolicy::Strict,
            ..Self::default()
        }
    }
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            parse_policy: ParsePolicy::default(),
            managed_by: crate::constants::APP_NAME.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_lenient_and_managed_by_app() {
        let config = AssemblerConfig::default();
        assert_eq!(config.parse_policy, ParsePolicy::Lenient);
        assert_eq!(config.managed_by, "hybridnet");
    }

    #[test]
    fn strict_keeps_other_defaults() {
        let config = AssemblerConfig::strict();
        assert_eq!(config.parse_policy, ParsePolicy::Strict);
        assert_eq!(config.managed_by, AssemblerConfig::default().managed_by);
    }
}
