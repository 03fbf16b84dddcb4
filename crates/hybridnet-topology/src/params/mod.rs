//! Parameter resolution.
//!
//! Turns a flat name → string [`ParameterSet`] into a typed
//! [`ResolvedConfig`] using the fixed [`schema`]. Required strings fail
//! hard; malformed optional tokens follow the configured [`ParsePolicy`].

pub mod schema;
pub mod shape;

use std::collections::BTreeMap;

use hybridnet_common::config::ParsePolicy;
use hybridnet_common::constants::{MAX_AVAILABILITY_DOMAINS, TRUTHY_TOKENS};
use hybridnet_common::error::{HybridnetError, Result};
use hybridnet_common::types::{Feature, Fingerprint, SharedSecret};
use serde::Serialize;

use self::schema::{BoolOption, IntOption, Requirement, ShapeOption, StringOption};
use self::shape::Shape;
use crate::resources::RetentionPolicy;

/// Lower-cased tokens recognized as an explicit `false`.
const FALSY_TOKENS: [&str; 4] = ["false", "0", "no", "off"];

/// Raw input: parameter name → string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    values: BTreeMap<String, String>,
}

impl ParameterSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let _ = self.values.insert(name.into(), value.into());
    }

    /// Builder-style [`ParameterSet::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the raw value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Iterates over all entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// Network sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSettings {
    /// Network address range.
    pub cidr: String,
    /// Availability domains, at least 1.
    pub availability_domains: u32,
    /// NAT gateways, between 1 and `availability_domains`.
    pub nat_gateways: u32,
}

/// Compute node settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputeSettings {
    /// Instance shape.
    pub shape: Shape,
    /// Boot image.
    pub machine_image: String,
    /// Operator address allowed to reach SSH.
    pub ssh_source: String,
    /// Key pair reference.
    pub key_pair: String,
    /// Internal API host exactly as supplied.
    pub internal_api_host: Option<String>,
    /// Internal API port.
    pub internal_api_port: u16,
}

/// Site-to-site tunnel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectivitySettings {
    /// Public address of the remote endpoint.
    pub peer_address: String,
    /// Routing number of the remote network.
    pub peer_routing_number: u32,
    /// Pre-shared key.
    pub shared_secret: SharedSecret,
    /// Remote network prefix.
    pub remote_cidr: String,
}

/// Managed database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageSettings {
    /// Initial database name.
    pub database_name: String,
    /// Administrator user name.
    pub admin_identity: String,
    /// Teardown behavior.
    pub retention: RetentionPolicy,
}

/// DNS record settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingSettings {
    /// Root domain, checked by the validator.
    pub domain: Option<String>,
    /// Create the apex record.
    pub apex_record: bool,
    /// Create the `www` record.
    pub www_record: bool,
}

/// Typed projection of a [`ParameterSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    /// Project label and name prefix.
    pub project: String,
    /// Environment label.
    pub environment: String,
    /// Network group settings.
    pub network: NetworkSettings,
    /// Compute group settings.
    pub compute: ComputeSettings,
    /// Connectivity group settings.
    pub connectivity: ConnectivitySettings,
    /// Storage group, if enabled.
    pub storage: Feature<StorageSettings>,
    /// Naming group, if enabled.
    pub naming: Feature<NamingSettings>,
}

impl ResolvedConfig {
    /// SHA-256 over the canonical JSON form. Equal parameter sets yield
    /// equal fingerprints.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    ///
    /// The shared secret is left out of the hashed form, so the published
    /// fingerprint cannot be used to test guesses of it.
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        Ok(Fingerprint::of_bytes(&self.canonical_bytes()?))
    }

    fn canonical_bytes(&self) -> Result<Vec<u8>> {
        let mut value = serde_json::to_value(self)?;
        if let Some(connectivity) = value
            .get_mut("connectivity")
            .and_then(serde_json::Value::as_object_mut)
        {
            let _ = connectivity.remove("shared_secret");
        }
        Ok(serde_json::to_vec(&value)?)
    }
}

/// Resolves parameter sets against the fixed schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterResolver {
    policy: ParsePolicy,
}

impl ParameterResolver {
    /// Creates a resolver applying `policy` to malformed optional tokens.
    #[must_use]
    pub const fn new(policy: ParsePolicy) -> Self {
        Self { policy }
    }

    /// Resolves `params` into a typed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HybridnetError::MissingParameter`] for the first required
    /// option that is absent or empty, and [`HybridnetError::InvalidConfiguration`]
    /// for malformed tokens under [`ParsePolicy::Strict`].
    pub fn resolve(&self, params: &ParameterSet) -> Result<ResolvedConfig> {
        tracing::info!(count = params.len(), policy = ?self.policy, "resolving parameters");
        warn_unknown(params);
        let reader = Reader {
            params,
            policy: self.policy,
        };

        // Required values first so a missing one is reported before any
        // lenient fallback is logged.
        let ssh_source = reader.required(&schema::SSH_IP)?;
        let key_pair = reader.required(&schema::KEY_PAIR)?;
        let peer_address = reader.required(&schema::PEER_IP)?;
        let shared_secret = SharedSecret::new(reader.required(&schema::PSK)?);
        let remote_cidr = reader.required(&schema::REMOTE_CIDR)?;

        let availability_domains = reader.count(&schema::AZ_COUNT, MAX_AVAILABILITY_DOMAINS)?;
        let nat_gateways = reader
            .count(&schema::NAT_COUNT, MAX_AVAILABILITY_DOMAINS)?
            .min(availability_domains);

        let storage = if reader.boolean(&schema::ENABLE_STORAGE)? {
            Feature::Enabled(StorageSettings {
                database_name: reader.optional(&schema::DB_NAME).unwrap_or_default(),
                admin_identity: reader.optional(&schema::DB_ADMIN).unwrap_or_default(),
                retention: RetentionPolicy::from_flag(reader.boolean(&schema::RETAIN_STORAGE)?),
            })
        } else {
            Feature::Disabled
        };

        let naming = if reader.boolean(&schema::ENABLE_NAMING)? {
            Feature::Enabled(NamingSettings {
                domain: reader.optional(&schema::DOMAIN),
                apex_record: reader.boolean(&schema::CREATE_APEX_RECORD)?,
                www_record: reader.boolean(&schema::CREATE_WWW_RECORD)?,
            })
        } else {
            Feature::Disabled
        };

        Ok(ResolvedConfig {
            project: reader.optional(&schema::PROJECT).unwrap_or_default(),
            environment: reader.optional(&schema::ENVIRONMENT).unwrap_or_default(),
            network: NetworkSettings {
                cidr: reader.optional(&schema::VPC_CIDR).unwrap_or_default(),
                availability_domains,
                nat_gateways,
            },
            compute: ComputeSettings {
                shape: reader.shape(&schema::INSTANCE_TYPE)?,
                machine_image: reader.optional(&schema::MACHINE_IMAGE).unwrap_or_default(),
                ssh_source,
                key_pair,
                internal_api_host: reader.raw(schema::SAP_API_HOST.name).map(str::to_owned),
                internal_api_port: reader.int(&schema::SAP_API_PORT)?,
            },
            connectivity: ConnectivitySettings {
                peer_address,
                peer_routing_number: reader.int(&schema::PEER_ASN)?,
                shared_secret,
                remote_cidr,
            },
            storage,
            naming,
        })
    }
}

fn warn_unknown(params: &ParameterSet) {
    for (name, _) in params.iter() {
        if schema::lookup(name).is_none() {
            tracing::warn!(parameter = name, "ignoring unrecognized parameter");
        }
    }
}

/// Typed accessors over one parameter set.
struct Reader<'a> {
    params: &'a ParameterSet,
    policy: ParsePolicy,
}

impl Reader<'_> {
    fn raw(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    fn required(&self, option: &StringOption) -> Result<String> {
        debug_assert_eq!(option.requirement, Requirement::Required);
        match self.raw(option.name).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value.to_owned()),
            _ => Err(HybridnetError::missing(option.name)),
        }
    }

    /// Present and non-empty value, else the declared default.
    fn optional(&self, option: &StringOption) -> Option<String> {
        match self.raw(option.name).map(str::trim) {
            Some(value) if !value.is_empty() => Some(value.to_owned()),
            _ => match option.requirement {
                Requirement::Optional(default) => default.map(str::to_owned),
                Requirement::Required | Requirement::RequiredWhen(_) => None,
            },
        }
    }

    fn boolean(&self, option: &BoolOption) -> Result<bool> {
        let Some(raw) = self.raw(option.name) else {
            return Ok(option.default);
        };
        let token = raw.trim().to_ascii_lowercase();
        if TRUTHY_TOKENS.contains(&token.as_str()) {
            return Ok(true);
        }
        if !FALSY_TOKENS.contains(&token.as_str()) {
            self.reject(option.name, raw, "false")?;
        }
        Ok(false)
    }

    fn int<T>(&self, option: &IntOption) -> Result<T>
    where
        T: TryFrom<i64> + std::fmt::Display,
    {
        let default = T::try_from(option.default).map_err(|_| {
            HybridnetError::invalid(format!("default of {} is out of range", option.name))
        })?;
        let Some(raw) = self.raw(option.name) else {
            return Ok(default);
        };
        match raw.trim().parse::<i64>().ok().and_then(|v| T::try_from(v).ok()) {
            Some(value) => Ok(value),
            None => {
                self.reject(option.name, raw, &default.to_string())?;
                Ok(default)
            }
        }
    }

    /// Integer count floored at 1. Values above `max` follow the parse
    /// policy and fall back to `max`.
    fn count(&self, option: &IntOption, max: u32) -> Result<u32> {
        let value: i64 = self.int(option)?;
        if value > i64::from(max) {
            let raw = self.raw(option.name).unwrap_or_default();
            self.reject(option.name, raw, &max.to_string())?;
            return Ok(max);
        }
        Ok(u32::try_from(value.max(1)).unwrap_or(1))
    }

    fn shape(&self, option: &ShapeOption) -> Result<Shape> {
        let Some(raw) = self.raw(option.name) else {
            return Ok(Shape::default());
        };
        match Shape::parse(raw) {
            Some(shape) => Ok(shape),
            None => {
                let fallback = Shape::default();
                self.reject(option.name, raw, &fallback.to_string())?;
                Ok(fallback)
            }
        }
    }

    /// Applies the parse policy to a malformed token.
    fn reject(&self, name: &str, raw: &str, fallback: &str) -> Result<()> {
        match self.policy {
            ParsePolicy::Lenient => {
                tracing::warn!(
                    parameter = name,
                    value = raw,
                    fallback,
                    "unrecognized value, using fallback"
                );
                Ok(())
            }
            ParsePolicy::Strict => Err(HybridnetError::invalid(format!(
                "parameter {name} has unrecognized value \"{raw}\""
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ParameterSet {
        ParameterSet::new()
            .with("ssh_ip", "203.0.113.10/32")
            .with("key_pair", "k1")
            .with("peer_ip", "198.51.100.20")
            .with("psk", "secret")
            .with("remote_cidr", "10.1.0.0/16")
    }

    fn lenient() -> ParameterResolver {
        ParameterResolver::new(ParsePolicy::Lenient)
    }

    fn strict() -> ParameterResolver {
        ParameterResolver::new(ParsePolicy::Strict)
    }

    #[test]
    fn minimal_set_resolves_with_defaults() {
        let config = lenient().resolve(&minimal()).expect("resolves");
        assert_eq!(config.project, "hybrid-network");
        assert_eq!(config.network.cidr, "10.0.0.0/16");
        assert_eq!(config.network.availability_domains, 1);
        assert_eq!(config.network.nat_gateways, 1);
        assert_eq!(config.compute.shape, Shape::default());
        assert_eq!(config.compute.internal_api_host, None);
        assert_eq!(config.compute.internal_api_port, 50000);
        assert_eq!(config.connectivity.peer_routing_number, 65000);
        assert_eq!(
            config.storage,
            Feature::Enabled(StorageSettings {
                database_name: "appdb".into(),
                admin_identity: "dbadmin".into(),
                retention: RetentionPolicy::Destroy,
            })
        );
        assert_eq!(config.naming, Feature::Disabled);
    }

    #[test]
    fn each_required_option_is_reported_by_name() {
        for name in ["ssh_ip", "key_pair", "peer_ip", "psk", "remote_cidr"] {
            let params: ParameterSet = minimal().iter().filter(|(k, _)| *k != name).collect();
            let err = lenient().resolve(&params).unwrap_err();
            match err {
                HybridnetError::MissingParameter { name: missing } => assert_eq!(missing, name),
                other => panic!("expected MissingParameter for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn blank_required_option_is_missing() {
        let params = minimal().with("psk", "   ");
        let err = lenient().resolve(&params).unwrap_err();
        assert!(matches!(err, HybridnetError::MissingParameter { name } if name == "psk"));
    }

    #[test]
    fn bool_accepts_truthy_tokens_case_insensitively() {
        for token in ["true", "TRUE", "1", "Yes", " on "] {
            let config = lenient()
                .resolve(&minimal().with("retain_storage", token))
                .expect("resolves");
            let storage = config.storage.as_enabled().expect("storage on");
            assert_eq!(storage.retention, RetentionPolicy::Retain, "token {token:?}");
        }
    }

    #[test]
    fn unrecognized_bool_is_false_when_lenient() {
        let config = lenient()
            .resolve(&minimal().with("enable_storage", "maybe"))
            .expect("resolves");
        assert_eq!(config.storage, Feature::Disabled);
    }

    #[test]
    fn unrecognized_bool_fails_when_strict() {
        let err = strict()
            .resolve(&minimal().with("enable_storage", "maybe"))
            .unwrap_err();
        assert!(matches!(err, HybridnetError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("enable_storage"));
    }

    #[test]
    fn explicit_false_is_accepted_when_strict() {
        let config = strict()
            .resolve(&minimal().with("enable_storage", "off"))
            .expect("resolves");
        assert_eq!(config.storage, Feature::Disabled);
    }

    #[test]
    fn bad_int_falls_back_to_default() {
        let params = minimal()
            .with("peer_asn", "sixty-five")
            .with("sap_api_port", "70000");
        let config = lenient().resolve(&params).expect("resolves");
        assert_eq!(config.connectivity.peer_routing_number, 65000);
        assert_eq!(config.compute.internal_api_port, 50000);
    }

    #[test]
    fn bad_int_fails_when_strict() {
        let err = strict()
            .resolve(&minimal().with("az_count", "two"))
            .unwrap_err();
        assert!(err.to_string().contains("az_count"));
    }

    #[test]
    fn counts_are_floored_and_nat_capped() {
        let config = lenient()
            .resolve(&minimal().with("az_count", "0").with("nat_count", "-4"))
            .expect("resolves");
        assert_eq!(config.network.availability_domains, 1);
        assert_eq!(config.network.nat_gateways, 1);

        let config = lenient()
            .resolve(&minimal().with("az_count", "2").with("nat_count", "5"))
            .expect("resolves");
        assert_eq!(config.network.availability_domains, 2);
        assert_eq!(config.network.nat_gateways, 2);
    }

    #[test]
    fn unknown_shape_falls_back_to_default() {
        for descriptor in ["t3", "x1.micro", "t3.micro.large", "t3-micro"] {
            let config = lenient()
                .resolve(&minimal().with("instance_type", descriptor))
                .expect("resolves");
            assert_eq!(config.compute.shape, Shape::default(), "{descriptor}");
        }
        let config = lenient()
            .resolve(&minimal().with("instance_type", "c5.large"))
            .expect("resolves");
        assert_eq!(config.compute.shape.to_string(), "c5.large");
    }

    #[test]
    fn naming_domain_is_optional_at_resolution() {
        let config = lenient()
            .resolve(&minimal().with("enable_naming", "true"))
            .expect("resolver does not enforce the flag-gated domain");
        let naming = config.naming.as_enabled().expect("naming on");
        assert_eq!(naming.domain, None);
        assert!(naming.apex_record && naming.www_record);
    }

    #[test]
    fn internal_api_host_is_kept_verbatim() {
        let config = lenient()
            .resolve(&minimal().with("sap_api_host", "  "))
            .expect("resolves");
        assert_eq!(config.compute.internal_api_host.as_deref(), Some("  "));
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let config = lenient()
            .resolve(&minimal().with("colour", "blue"))
            .expect("resolves");
        assert_eq!(config, lenient().resolve(&minimal()).expect("resolves"));
    }

    #[test]
    fn oversized_counts_are_capped_or_rejected() {
        let params = minimal().with("az_count", "4000000000").with("nat_count", "9");
        let config = lenient().resolve(&params).expect("resolves");
        assert_eq!(
            config.network.availability_domains,
            MAX_AVAILABILITY_DOMAINS
        );
        assert_eq!(config.network.nat_gateways, MAX_AVAILABILITY_DOMAINS);

        let err = strict().resolve(&params).unwrap_err();
        assert!(err.to_string().contains("az_count"));
    }

    #[test]
    fn fingerprint_excludes_shared_secret() {
        let a = lenient()
            .resolve(&minimal().with("psk", "hunter2"))
            .expect("resolves");
        let b = lenient()
            .resolve(&minimal().with("psk", "correct-horse"))
            .expect("resolves");
        assert_eq!(
            a.fingerprint().expect("fingerprint"),
            b.fingerprint().expect("fingerprint")
        );

        let bytes = a.canonical_bytes().expect("bytes");
        let text = String::from_utf8(bytes).expect("utf-8");
        assert!(!text.contains("hunter2"));
        assert!(text.contains("198.51.100.20"));
    }

    #[test]
    fn fingerprint_tracks_non_secret_changes() {
        let a = lenient().resolve(&minimal()).expect("resolves");
        let b = lenient()
            .resolve(&minimal().with("remote_cidr", "10.2.0.0/16"))
            .expect("resolves");
        assert_ne!(
            a.fingerprint().expect("fingerprint"),
            b.fingerprint().expect("fingerprint")
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let params = minimal().with("az_count", "3").with("enable_naming", "yes");
        let a = lenient().resolve(&params).expect("resolves");
        let b = lenient().resolve(&params).expect("resolves");
        assert_eq!(
            serde_json::to_vec(&a).expect("serialize"),
            serde_json::to_vec(&b).expect("serialize")
        );
        assert_eq!(
            a.fingerprint().expect("fingerprint"),
            b.fingerprint().expect("fingerprint")
        );
    }
}
