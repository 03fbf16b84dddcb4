//! Storage group: database firewall and managed database.

use hybridnet_common::constants::DATABASE_PORT;
use hybridnet_common::types::{Identity, ResourceGroup};

use super::compute::ComputeGroup;
use super::network::NetworkGroup;
use crate::graph::ResourceGraph;
use crate::params::StorageSettings;
use crate::resources::{
    CredentialSource, Database, Firewall, FirewallRule, Protocol, Resource, Retention, RulePeer,
};

const ENGINE: &str = "postgres";
const ENGINE_VERSION: &str = "15";
const INSTANCE_CLASS: &str = "db.t3.micro";
const ALLOCATED_STORAGE_GIB: u32 = 20;

/// Identities created by the storage group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageGroup {
    /// Firewall admitting the compute firewall only.
    pub firewall: Identity,
    /// Managed database.
    pub database: Identity,
}

pub(crate) fn build(
    graph: &mut ResourceGraph,
    network: &NetworkGroup,
    compute: &ComputeGroup,
    settings: &StorageSettings,
) -> StorageGroup {
    const GROUP: ResourceGroup = ResourceGroup::Storage;

    let firewall = graph.add(
        GROUP,
        "database-firewall",
        Resource::Firewall(Firewall {
            network: network.network.clone(),
            ingress: vec![FirewallRule {
                protocol: Protocol::Tcp,
                port: Some(DATABASE_PORT),
                peer: RulePeer::Firewall(compute.firewall.clone()),
                description: "database from compute".into(),
            }],
            egress: Vec::new(),
        }),
    );

    let database = graph.add(
        GROUP,
        "database",
        Resource::Database(Database {
            engine: ENGINE,
            engine_version: ENGINE_VERSION,
            instance_class: INSTANCE_CLASS,
            allocated_storage_gib: ALLOCATED_STORAGE_GIB,
            database_name: settings.database_name.clone(),
            admin_identity: settings.admin_identity.clone(),
            credential: CredentialSource::Generated,
            subnets: network.private_subnets.clone(),
            firewall: firewall.clone(),
            retention: Retention::new(settings.retention),
        }),
    );

    StorageGroup { firewall, database }
}
