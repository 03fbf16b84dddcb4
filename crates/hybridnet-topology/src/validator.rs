//! Cross-field validation of a resolved configuration.
//!
//! Runs before any resource node is built and fails the whole run on the
//! first violated rule.

use std::ops::Deref;

use hybridnet_common::error::{HybridnetError, Result};
use hybridnet_common::types::Feature;

use crate::params::{NamingSettings, ResolvedConfig, schema};

/// Internal API endpoint that receives a dedicated egress rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalApiEndpoint {
    /// Trimmed, non-empty host.
    pub host: String,
    /// Port.
    pub port: u16,
}

/// DNS records to create in the zone of `domain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecords {
    /// Trimmed, non-empty root domain.
    pub domain: String,
    /// Create the apex record.
    pub apex: bool,
    /// Create the `www` record.
    pub www: bool,
}

/// A configuration that passed every cross-field rule.
///
/// Only [`validate`] constructs this type, so holding one proves the
/// checks ran. Dereferences to the underlying [`ResolvedConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    config: ResolvedConfig,
    internal_api: Option<InternalApiEndpoint>,
    naming: Feature<ZoneRecords>,
}

impl ValidatedConfig {
    /// The resolved configuration.
    #[must_use]
    pub const fn resolved(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Internal API endpoint, absent if the host was missing or blank.
    #[must_use]
    pub const fn internal_api(&self) -> Option<&InternalApiEndpoint> {
        self.internal_api.as_ref()
    }

    /// DNS records, if naming is enabled.
    #[must_use]
    pub const fn zone_records(&self) -> &Feature<ZoneRecords> {
        &self.naming
    }
}

impl Deref for ValidatedConfig {
    type Target = ResolvedConfig;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}

/// Validates a resolved configuration.
///
/// # Checks performed
///
/// 1. Naming enabled requires a non-blank root domain.
/// 2. A blank internal API host is treated as absent.
///
/// Storage has no required sub-parameters, and address-shaped values are
/// passed through without format checks.
///
/// # Errors
///
/// Returns [`HybridnetError::InvalidConfiguration`] if a rule is violated.
pub fn validate(config: ResolvedConfig) -> Result<ValidatedConfig> {
    tracing::info!("validating resolved configuration");
    let naming = check_naming_domain(&config.naming)?;
    let internal_api = normalize_internal_api(&config);
    Ok(ValidatedConfig {
        config,
        internal_api,
        naming,
    })
}

fn check_naming_domain(naming: &Feature<NamingSettings>) -> Result<Feature<ZoneRecords>> {
    let Feature::Enabled(settings) = naming else {
        return Ok(Feature::Disabled);
    };
    let domain = settings
        .domain
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| {
            HybridnetError::invalid(format!(
                "{} is required when {}=true",
                schema::DOMAIN.name,
                schema::ENABLE_NAMING.name
            ))
        })?;
    Ok(Feature::Enabled(ZoneRecords {
        domain: domain.to_owned(),
        apex: settings.apex_record,
        www: settings.www_record,
    }))
}

fn normalize_internal_api(config: &ResolvedConfig) -> Option<InternalApiEndpoint> {
    let host = config.compute.internal_api_host.as_deref()?.trim();
    if host.is_empty() {
        tracing::debug!("internal API host is blank, skipping its egress rule");
        return None;
    }
    Some(InternalApiEndpoint {
        host: host.to_owned(),
        port: config.compute.internal_api_port,
    })
}

#[cfg(test)]
mod tests {
    use hybridnet_common::config::ParsePolicy;

    use super::*;
    use crate::params::{ParameterResolver, ParameterSet};

    fn resolve(extra: &[(&str, &str)]) -> ResolvedConfig {
        let mut params = ParameterSet::new()
            .with("ssh_ip", "203.0.113.10/32")
            .with("key_pair", "k1")
            .with("peer_ip", "198.51.100.20")
            .with("psk", "secret")
            .with("remote_cidr", "10.1.0.0/16");
        for (k, v) in extra {
            params.insert(*k, *v);
        }
        ParameterResolver::new(ParsePolicy::Lenient)
            .resolve(&params)
            .expect("resolves")
    }

    #[test]
    fn validate_default_config_succeeds() {
        let validated = validate(resolve(&[])).expect("valid");
        assert_eq!(validated.zone_records(), &Feature::Disabled);
        assert!(validated.internal_api().is_none());
        assert!(validated.storage.is_enabled());
    }

    #[test]
    fn naming_without_domain_fails() {
        let err = validate(resolve(&[("enable_naming", "true")])).unwrap_err();
        assert!(matches!(err, HybridnetError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("domain"), "got: {err}");
    }

    #[test]
    fn naming_with_blank_domain_fails() {
        let err = validate(resolve(&[("enable_naming", "true"), ("domain", "  ")])).unwrap_err();
        assert!(matches!(err, HybridnetError::InvalidConfiguration { .. }));
    }

    #[test]
    fn domain_is_ignored_when_naming_disabled() {
        let validated = validate(resolve(&[("domain", "")])).expect("valid");
        assert_eq!(validated.zone_records(), &Feature::Disabled);
    }

    #[test]
    fn naming_with_domain_carries_toggles() {
        let validated = validate(resolve(&[
            ("enable_naming", "true"),
            ("domain", "example.com"),
            ("create_www_record", "false"),
        ]))
        .expect("valid");
        assert_eq!(
            validated.zone_records(),
            &Feature::Enabled(ZoneRecords {
                domain: "example.com".into(),
                apex: true,
                www: false,
            })
        );
    }

    #[test]
    fn blank_internal_api_host_is_absent() {
        for host in ["", "   "] {
            let validated = validate(resolve(&[("sap_api_host", host)])).expect("valid");
            assert!(validated.internal_api().is_none(), "host {host:?}");
        }
    }

    #[test]
    fn internal_api_host_is_trimmed() {
        let validated = validate(resolve(&[
            ("sap_api_host", " 10.1.2.3 "),
            ("sap_api_port", "8443"),
        ]))
        .expect("valid");
        assert_eq!(
            validated.internal_api(),
            Some(&InternalApiEndpoint {
                host: "10.1.2.3".into(),
                port: 8443,
            })
        );
    }

    #[test]
    fn storage_disabled_skips_storage_checks() {
        let validated = validate(resolve(&[("enable_storage", "false"), ("db_name", "")]))
            .expect("valid");
        assert!(!validated.storage.is_enabled());
    }
}
