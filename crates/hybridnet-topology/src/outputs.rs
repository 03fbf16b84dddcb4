//! Output binding.
//!
//! Derives the named outputs of an assembled [`Topology`]. Outputs owned by
//! a disabled group are omitted entirely.

use std::collections::BTreeMap;

use hybridnet_common::constants::SECRET_SENTINEL;
use hybridnet_common::types::{Feature, Identity, ResourceGroup};
use serde::Serialize;

use crate::builder::Topology;
use crate::builder::naming::DnsRecord;

/// Network identity.
pub const NETWORK_ID: &str = "network_id";
/// Compute node identity.
pub const COMPUTE_NODE_ID: &str = "compute_node_id";
/// Compute firewall identity.
pub const COMPUTE_FIREWALL_ID: &str = "compute_firewall_id";
/// Public address of the compute node.
pub const STATIC_ADDRESS: &str = "static_address";
/// Peer gateway identity.
pub const PEER_GATEWAY_ID: &str = "peer_gateway_id";
/// Tunnel identity.
pub const TUNNEL_ID: &str = "tunnel_id";
/// Database endpoint.
pub const DATABASE_ENDPOINT: &str = "database_endpoint";
/// Name of the generated database secret.
pub const DATABASE_SECRET_NAME: &str = "database_secret_name";
/// Apex record name.
pub const DNS_APEX_RECORD: &str = "dns_apex_record";
/// `www` record name.
pub const DNS_WWW_RECORD: &str = "dns_www_record";

/// Value of an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputValue {
    /// The provisioner-assigned ID of a node.
    Identity(Identity),
    /// An attribute of a node, known only after provisioning.
    Attribute {
        /// Node owning the attribute.
        of: Identity,
        /// Attribute name.
        attribute: String,
        /// Value used if the provisioner reports none.
        #[serde(skip_serializing_if = "Option::is_none")]
        fallback: Option<String>,
    },
    /// A value known at assembly time.
    Literal(String),
}

/// One named output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputBinding {
    /// Group that owns the output.
    pub group: ResourceGroup,
    /// Bound value.
    pub value: OutputValue,
}

/// All outputs of a run, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutputSet {
    bindings: BTreeMap<String, OutputBinding>,
}

impl OutputSet {
    /// Returns the binding named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OutputBinding> {
        self.bindings.get(name)
    }

    /// Whether a binding named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Binding names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Iterates over all bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputBinding)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there are no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Collects bindings while checking they refer to built nodes.
struct Binder<'a> {
    topology: &'a Topology,
    set: OutputSet,
}

impl Binder<'_> {
    fn bind(&mut self, name: &str, group: ResourceGroup, value: OutputValue) {
        if let OutputValue::Identity(id) | OutputValue::Attribute { of: id, .. } = &value {
            assert!(
                self.topology.graph().contains(id),
                "output {name} refers to unbuilt node {id}"
            );
        }
        debug_assert!(self.topology.is_enabled(group));
        let _ = self
            .set
            .bindings
            .insert(name.to_owned(), OutputBinding { group, value });
    }

    fn identity(&mut self, name: &str, group: ResourceGroup, id: &Identity) {
        self.bind(name, group, OutputValue::Identity(id.clone()));
    }

    fn attribute(
        &mut self,
        name: &str,
        group: ResourceGroup,
        of: &Identity,
        attribute: &str,
        fallback: Option<&str>,
    ) {
        self.bind(
            name,
            group,
            OutputValue::Attribute {
                of: of.clone(),
                attribute: attribute.to_owned(),
                fallback: fallback.map(str::to_owned),
            },
        );
    }

    fn record(&mut self, name: &str, record: Option<&DnsRecord>) {
        if let Some(record) = record {
            self.bind(
                name,
                ResourceGroup::Naming,
                OutputValue::Literal(record.fqdn.clone()),
            );
        }
    }
}

/// Derives the output set of `topology`.
#[must_use]
pub fn bind(topology: &Topology) -> OutputSet {
    let mut b = Binder {
        topology,
        set: OutputSet::default(),
    };

    b.identity(NETWORK_ID, ResourceGroup::Network, &topology.network.network);

    let compute = &topology.compute;
    b.identity(COMPUTE_NODE_ID, ResourceGroup::Compute, &compute.node);
    b.identity(COMPUTE_FIREWALL_ID, ResourceGroup::Compute, &compute.firewall);
    b.attribute(
        STATIC_ADDRESS,
        ResourceGroup::Compute,
        &compute.address,
        "public_ip",
        None,
    );

    let connectivity = &topology.connectivity;
    b.identity(
        PEER_GATEWAY_ID,
        ResourceGroup::Connectivity,
        &connectivity.peer_gateway,
    );
    b.identity(TUNNEL_ID, ResourceGroup::Connectivity, &connectivity.tunnel);

    if let Feature::Enabled(storage) = &topology.storage {
        b.attribute(
            DATABASE_ENDPOINT,
            ResourceGroup::Storage,
            &storage.database,
            "endpoint",
            None,
        );
        b.attribute(
            DATABASE_SECRET_NAME,
            ResourceGroup::Storage,
            &storage.database,
            "master_user_secret",
            Some(SECRET_SENTINEL),
        );
    }

    if let Feature::Enabled(naming) = &topology.naming {
        b.record(DNS_APEX_RECORD, naming.apex.as_ref());
        b.record(DNS_WWW_RECORD, naming.www.as_ref());
    }

    tracing::info!(count = b.set.len(), "bound outputs");
    b.set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{TopologyBuilder, testing};
    use crate::zone::{StaticZones, ZoneId};

    fn outputs(extra: &[(&str, &str)]) -> OutputSet {
        let zones = StaticZones::new().with_zone("example.com", ZoneId::new("Z1"));
        let topology = TopologyBuilder::new(&zones, "hybridnet")
            .build(&testing::validated(extra))
            .expect("builds");
        bind(&topology)
    }

    #[test]
    fn default_outputs_cover_base_groups_and_storage() {
        let set = outputs(&[]);
        let names: Vec<&str> = set.names().collect();
        assert_eq!(
            names,
            vec![
                COMPUTE_FIREWALL_ID,
                COMPUTE_NODE_ID,
                DATABASE_ENDPOINT,
                DATABASE_SECRET_NAME,
                NETWORK_ID,
                PEER_GATEWAY_ID,
                STATIC_ADDRESS,
                TUNNEL_ID,
            ]
        );
    }

    #[test]
    fn secret_name_binds_sentinel_fallback() {
        let set = outputs(&[]);
        let binding = set.get(DATABASE_SECRET_NAME).expect("secret binding");
        assert_eq!(binding.group, ResourceGroup::Storage);
        assert_eq!(
            binding.value,
            OutputValue::Attribute {
                of: Identity::new("database"),
                attribute: "master_user_secret".into(),
                fallback: Some("N/A".into()),
            }
        );
    }

    #[test]
    fn storage_outputs_omitted_when_disabled() {
        let set = outputs(&[("enable_storage", "false")]);
        assert!(!set.contains(DATABASE_ENDPOINT));
        assert!(!set.contains(DATABASE_SECRET_NAME));
        assert_eq!(set.len(), 6);
    }

    #[test]
    fn record_outputs_follow_toggles() {
        let set = outputs(&[
            ("enable_naming", "true"),
            ("domain", "example.com"),
            ("create_apex_record", "false"),
        ]);
        assert!(!set.contains(DNS_APEX_RECORD));
        assert_eq!(
            set.get(DNS_WWW_RECORD).map(|b| &b.value),
            Some(&OutputValue::Literal("www.example.com".into()))
        );
    }

    #[test]
    fn static_address_refers_to_address_node() {
        let set = outputs(&[]);
        let binding = set.get(STATIC_ADDRESS).expect("address");
        assert!(matches!(
            &binding.value,
            OutputValue::Attribute { of, attribute, fallback: None }
                if of.as_str() == "compute-address" && attribute == "public_ip"
        ));
    }
}
