//! DNS zone lookup collaborator.

use std::collections::BTreeMap;
use std::fmt;

use hybridnet_common::error::{HybridnetError, Result};
use serde::Serialize;

/// Identifier of a hosted DNS zone, as reported by the lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    /// Creates a zone ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves a root domain to the zone that hosts it.
///
/// Called at most once per run. The assembler neither retries nor times
/// out the call.
pub trait ZoneLookup {
    /// Finds the zone hosting `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`HybridnetError::ZoneLookup`] if no zone hosts the domain.
    fn find_zone(&self, domain: &str) -> Result<ZoneId>;
}

/// In-memory lookup over a fixed domain → zone table.
#[derive(Debug, Clone, Default)]
pub struct StaticZones {
    zones: BTreeMap<String, ZoneId>,
}

impl StaticZones {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `domain` as hosted by `zone`.
    #[must_use]
    pub fn with_zone(mut self, domain: impl Into<String>, zone: ZoneId) -> Self {
        let _ = self.zones.insert(normalize(&domain.into()), zone);
        self
    }
}

impl ZoneLookup for StaticZones {
    fn find_zone(&self, domain: &str) -> Result<ZoneId> {
        tracing::debug!(domain, "looking up hosted zone");
        self.zones
            .get(&normalize(domain))
            .cloned()
            .ok_or_else(|| HybridnetError::ZoneLookup {
                domain: domain.to_owned(),
                message: "no hosted zone registered".into(),
            })
    }
}

fn normalize(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_registered_zone_ignoring_case_and_trailing_dot() {
        let zones = StaticZones::new().with_zone("Example.com.", ZoneId::new("Z123"));
        assert_eq!(zones.find_zone("example.com").expect("zone").as_str(), "Z123");
    }

    #[test]
    fn unknown_domain_is_a_lookup_error() {
        let err = StaticZones::new().find_zone("example.org").unwrap_err();
        assert!(matches!(err, HybridnetError::ZoneLookup { .. }));
        assert!(err.to_string().contains("example.org"));
    }
}
