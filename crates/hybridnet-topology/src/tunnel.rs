//! Versioned cryptographic profiles for tunnel channels.
//!
//! Profiles are a closed set. Changing the parameters means adding a new
//! variant and moving [`TunnelProfile::CURRENT`], never editing an existing
//! one.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// IKE protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IkeVersion {
    /// IKEv2.
    Ikev2,
}

/// Negotiation parameters for one IKE phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseParameters {
    /// Encryption algorithm.
    pub encryption: &'static str,
    /// Integrity algorithm.
    pub integrity: &'static str,
    /// Diffie-Hellman group number.
    pub dh_group: u8,
    /// Security association lifetime in seconds.
    pub lifetime_seconds: u32,
}

/// A named, versioned set of tunnel cryptographic parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TunnelProfile {
    /// AES256 / SHA2-256 / group 14 on both phases, IKEv2.
    V1,
}

impl TunnelProfile {
    /// Profile applied to every tunnel channel.
    pub const CURRENT: Self = Self::V1;

    /// Stable profile name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::V1 => "hybridnet-ipsec-v1",
        }
    }

    /// IKE version negotiated by the channel.
    #[must_use]
    pub const fn ike_version(self) -> IkeVersion {
        match self {
            Self::V1 => IkeVersion::Ikev2,
        }
    }

    /// Phase 1 (IKE SA) parameters.
    #[must_use]
    pub const fn phase1(self) -> PhaseParameters {
        match self {
            Self::V1 => PhaseParameters {
                encryption: "AES256",
                integrity: "SHA2-256",
                dh_group: 14,
                lifetime_seconds: 28_800,
            },
        }
    }

    /// Phase 2 (child SA) parameters.
    #[must_use]
    pub const fn phase2(self) -> PhaseParameters {
        match self {
            Self::V1 => PhaseParameters {
                encryption: "AES256",
                integrity: "SHA2-256",
                dh_group: 14,
                lifetime_seconds: 3_600,
            },
        }
    }
}

impl Serialize for TunnelProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TunnelProfile", 4)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("ike_version", &self.ike_version())?;
        state.serialize_field("phase1", &self.phase1())?;
        state.serialize_field("phase2", &self.phase2())?;
        state.end()
    }
}
