//! Domain primitive types used across the hybridnet workspace.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Opaque handle naming one resource node within a single assembly run.
///
/// Identities are logical names (`vpc`, `compute-node`, ...) so that two
/// runs over the same parameters produce the same handles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Creates an identity from its logical name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cluster of related resources that is built as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceGroup {
    /// Virtual network, subnets and the tunnel-termination gateway.
    Network,
    /// Firewall, compute node and its static address.
    Compute,
    /// Peer gateway, tunnel and remote route.
    Connectivity,
    /// Managed database and its firewall.
    Storage,
    /// DNS address records.
    Naming,
}

impl ResourceGroup {
    /// All groups in build order.
    pub const BUILD_ORDER: [Self; 5] = [
        Self::Network,
        Self::Compute,
        Self::Connectivity,
        Self::Storage,
        Self::Naming,
    ];

    /// Groups whose identities this group may reference.
    #[must_use]
    pub const fn depends_on(self) -> &'static [Self] {
        match self {
            Self::Network => &[],
            Self::Compute | Self::Connectivity => &[Self::Network],
            Self::Storage => &[Self::Network, Self::Compute],
            Self::Naming => &[Self::Compute],
        }
    }

    /// Whether a node of this group may hold a reference to a node of `other`.
    #[must_use]
    pub fn may_reference(self, other: Self) -> bool {
        self == other || self.depends_on().contains(&other)
    }
}

impl fmt::Display for ResourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Compute => write!(f, "compute"),
            Self::Connectivity => write!(f, "connectivity"),
            Self::Storage => write!(f, "storage"),
            Self::Naming => write!(f, "naming"),
        }
    }
}

/// A conditionally enabled feature and, when enabled, its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "settings", rename_all = "snake_case")]
pub enum Feature<T> {
    /// The feature is switched off and contributes nothing.
    Disabled,
    /// The feature is switched on with the given attributes.
    Enabled(T),
}

impl<T> Feature<T> {
    /// Returns `true` if the feature is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// Borrows the enabled attributes, if any.
    #[must_use]
    pub const fn as_enabled(&self) -> Option<&T> {
        match self {
            Self::Enabled(value) => Some(value),
            Self::Disabled => None,
        }
    }

    /// Borrows the attributes, keeping the variant.
    #[must_use]
    pub const fn as_ref(&self) -> Feature<&T> {
        match self {
            Self::Enabled(value) => Feature::Enabled(value),
            Self::Disabled => Feature::Disabled,
        }
    }

    /// Maps the enabled attributes, keeping `Disabled` as is.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Feature<U> {
        match self {
            Self::Enabled(value) => Feature::Enabled(f(value)),
            Self::Disabled => Feature::Disabled,
        }
    }
}

/// A pre-shared secret. Rendered verbatim for the provisioner, redacted in
/// debug output and logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedSecret(String);

impl SharedSecret {
    /// Wraps a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(***)")
    }
}

/// Key/value labels attached to every resource node.
pub type Labels = BTreeMap<String, String>;

/// SHA-256 digest of a serialized value, used to compare runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hashes the given bytes.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut hex = String::with_capacity(crate::constants::SHA256_HEX_LENGTH);
        for byte in digest {
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }

    /// Returns the hex-encoded digest.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.0)
    }
}
