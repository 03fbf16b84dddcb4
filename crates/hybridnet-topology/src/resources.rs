//! Typed declarative specifications for every resource kind.
//!
//! A [`Resource`] carries its attributes and the identities it refers to.
//! The graph derives dependency edges from [`Resource::references`], so a
//! reference can never exist without its edge.

use hybridnet_common::constants::RETAINED_BACKUP_DAYS;
use hybridnet_common::types::{Identity, SharedSecret};
use serde::{Deserialize, Serialize};

use crate::params::shape::Shape;
use crate::tunnel::TunnelProfile;
use crate::zone::ZoneId;

/// Virtual network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VirtualNetwork {
    /// Address range.
    pub cidr: String,
    /// Availability domains spanned.
    pub availability_domains: u32,
    /// NAT gateways serving the private subnets.
    pub nat_gateways: u32,
}

/// Subnet class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetClass {
    /// Routed to the internet gateway.
    Public,
    /// Egress through NAT only.
    Private,
}

/// One subnet in one availability domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subnet {
    /// Owning network.
    pub network: Identity,
    /// Public or private.
    pub class: SubnetClass,
    /// Zero-based availability-domain index.
    pub availability_domain: u32,
}

/// Tunnel termination gateway on the network side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpnGateway {
    /// Attached network.
    pub network: Identity,
    /// Propagate tunnel routes into the network's route tables.
    pub route_propagation: bool,
}

/// Transport protocol of a firewall rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// TCP.
    Tcp,
    /// UDP.
    Udp,
    /// ICMP, all types.
    Icmp,
}

/// Source or destination of a firewall rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePeer {
    /// An address range, passed through as given.
    Cidr(String),
    /// Members of another firewall.
    Firewall(Identity),
}

/// A single allow rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirewallRule {
    /// Protocol.
    pub protocol: Protocol,
    /// Port, or `None` for all (ICMP).
    pub port: Option<u16>,
    /// Peer of the rule.
    pub peer: RulePeer,
    /// Operator-facing description.
    pub description: String,
}

impl FirewallRule {
    /// TCP rule to/from a CIDR.
    #[must_use]
    pub fn tcp(port: u16, cidr: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            protocol: Protocol::Tcp,
            port: Some(port),
            peer: RulePeer::Cidr(cidr.into()),
            description: description.into(),
        }
    }
}

/// Stateful firewall attached to a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Firewall {
    /// Owning network.
    pub network: Identity,
    /// Inbound allow rules.
    pub ingress: Vec<FirewallRule>,
    /// Outbound allow rules.
    pub egress: Vec<FirewallRule>,
}

/// Compute node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputeNode {
    /// Instance shape.
    pub shape: Shape,
    /// Boot image.
    pub machine_image: String,
    /// Installed key pair.
    pub key_pair: String,
    /// Placement subnet.
    pub subnet: Identity,
    /// Attached firewall.
    pub firewall: Identity,
}

/// Static public address bound to exactly one compute node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticAddress {
    /// Bound node.
    pub instance: Identity,
}

/// Remote tunnel endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerGateway {
    /// Public address of the remote endpoint.
    pub public_address: String,
    /// Routing number of the remote network.
    pub routing_number: u32,
    /// Gateway type understood by the provisioner.
    pub gateway_type: &'static str,
}

/// One encrypted path of a tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TunnelChannel {
    /// One-based channel number.
    pub index: u8,
    /// Pre-shared key.
    pub shared_secret: SharedSecret,
    /// Cryptographic profile.
    pub profile: TunnelProfile,
}

/// Site-to-site tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tunnel {
    /// Network-side gateway.
    pub local_gateway: Identity,
    /// Remote-side gateway.
    pub peer_gateway: Identity,
    /// Routing is static; no dynamic routing session.
    pub static_routes_only: bool,
    /// Parallel channels.
    pub channels: Vec<TunnelChannel>,
}

/// Static route through the tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticRoute {
    /// Remote prefix.
    pub destination: String,
    /// Tunnel carrying the traffic.
    pub tunnel: Identity,
}

/// Whether storage outlives teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Keep the database, its backups and a final snapshot.
    Retain,
    /// Destroy everything on teardown.
    Destroy,
}

impl RetentionPolicy {
    /// `Retain` when `retain` is set, `Destroy` otherwise.
    #[must_use]
    pub const fn from_flag(retain: bool) -> Self {
        if retain { Self::Retain } else { Self::Destroy }
    }
}

/// Retention settings derived from one [`RetentionPolicy`].
///
/// Fields are private so the backup window and the deletion policy cannot
/// be set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Retention {
    deletion_policy: RetentionPolicy,
    backup_window_days: u32,
    skip_final_snapshot: bool,
}

impl Retention {
    /// Derives all switches from `policy`.
    #[must_use]
    pub const fn new(policy: RetentionPolicy) -> Self {
        match policy {
            RetentionPolicy::Retain => Self {
                deletion_policy: policy,
                backup_window_days: RETAINED_BACKUP_DAYS,
                skip_final_snapshot: false,
            },
            RetentionPolicy::Destroy => Self {
                deletion_policy: policy,
                backup_window_days: 0,
                skip_final_snapshot: true,
            },
        }
    }

    /// Deletion policy.
    #[must_use]
    pub const fn deletion_policy(&self) -> RetentionPolicy {
        self.deletion_policy
    }

    /// Backup window in days.
    #[must_use]
    pub const fn backup_window_days(&self) -> u32 {
        self.backup_window_days
    }

    /// Whether teardown skips the final snapshot.
    #[must_use]
    pub const fn skip_final_snapshot(&self) -> bool {
        self.skip_final_snapshot
    }
}

/// Source of the database administrator credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// Generated and stored by the provisioner; never supplied by the caller.
    Generated,
}

/// Managed database instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Database {
    /// Engine name.
    pub engine: &'static str,
    /// Engine major version.
    pub engine_version: &'static str,
    /// Instance class.
    pub instance_class: &'static str,
    /// Allocated storage in GiB.
    pub allocated_storage_gib: u32,
    /// Initial database name.
    pub database_name: String,
    /// Administrator user name.
    pub admin_identity: String,
    /// Administrator credential.
    pub credential: CredentialSource,
    /// Placement subnets.
    pub subnets: Vec<Identity>,
    /// Attached firewall.
    pub firewall: Identity,
    /// Retention settings.
    pub retention: Retention,
}

/// DNS address record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressRecord {
    /// Hosting zone.
    pub zone: ZoneId,
    /// Fully qualified record name.
    pub fqdn: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Address the record points at.
    pub address: Identity,
}

/// Any resource the assembler can declare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Resource {
    /// Virtual network.
    VirtualNetwork(VirtualNetwork),
    /// Subnet.
    Subnet(Subnet),
    /// Network-side tunnel gateway.
    VpnGateway(VpnGateway),
    /// Firewall.
    Firewall(Firewall),
    /// Compute node.
    ComputeNode(ComputeNode),
    /// Static address.
    StaticAddress(StaticAddress),
    /// Remote tunnel endpoint.
    PeerGateway(PeerGateway),
    /// Site-to-site tunnel.
    Tunnel(Tunnel),
    /// Static route.
    StaticRoute(StaticRoute),
    /// Managed database.
    Database(Database),
    /// DNS address record.
    AddressRecord(AddressRecord),
}

impl Resource {
    /// Short kind name, e.g. `compute_node`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::VirtualNetwork(_) => "virtual_network",
            Self::Subnet(_) => "subnet",
            Self::VpnGateway(_) => "vpn_gateway",
            Self::Firewall(_) => "firewall",
            Self::ComputeNode(_) => "compute_node",
            Self::StaticAddress(_) => "static_address",
            Self::PeerGateway(_) => "peer_gateway",
            Self::Tunnel(_) => "tunnel",
            Self::StaticRoute(_) => "static_route",
            Self::Database(_) => "database",
            Self::AddressRecord(_) => "address_record",
        }
    }

    /// Identities this resource refers to, in declaration order, without
    /// duplicates.
    #[must_use]
    pub fn references(&self) -> Vec<&Identity> {
        let mut refs: Vec<&Identity> = match self {
            Self::VirtualNetwork(_) | Self::PeerGateway(_) => Vec::new(),
            Self::Subnet(s) => vec![&s.network],
            Self::VpnGateway(g) => vec![&g.network],
            Self::Firewall(fw) => std::iter::once(&fw.network)
                .chain(fw.ingress.iter().chain(&fw.egress).filter_map(|rule| {
                    match &rule.peer {
                        RulePeer::Firewall(id) => Some(id),
                        RulePeer::Cidr(_) => None,
                    }
                }))
                .collect(),
            Self::ComputeNode(n) => vec![&n.subnet, &n.firewall],
            Self::StaticAddress(a) => vec![&a.instance],
            Self::Tunnel(t) => vec![&t.local_gateway, &t.peer_gateway],
            Self::StaticRoute(r) => vec![&r.tunnel],
            Self::Database(db) => db.subnets.iter().chain([&db.firewall]).collect(),
            Self::AddressRecord(r) => vec![&r.address],
        };
        let mut seen = std::collections::BTreeSet::new();
        refs.retain(|id| seen.insert(*id));
        refs
    }
}
