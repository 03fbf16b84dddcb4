//! Topology assembly.
//!
//! Builds the five resource groups in their fixed order (network, compute,
//! connectivity, storage, naming) into one [`ResourceGraph`], then applies
//! the run's label set to every node in a single final pass.

pub mod compute;
pub mod connectivity;
pub mod naming;
pub mod network;
pub mod storage;

use hybridnet_common::error::Result;
use hybridnet_common::types::{Feature, Identity, Labels, ResourceGroup};

use self::compute::ComputeGroup;
use self::connectivity::ConnectivityGroup;
use self::naming::NamingGroup;
use self::network::NetworkGroup;
use self::storage::StorageGroup;
use crate::graph::ResourceGraph;
use crate::validator::ValidatedConfig;
use crate::zone::ZoneLookup;

/// The assembled deployment: the graph plus each group's identities.
#[derive(Debug)]
pub struct Topology {
    graph: ResourceGraph,
    /// Network group.
    pub network: NetworkGroup,
    /// Compute group.
    pub compute: ComputeGroup,
    /// Connectivity group.
    pub connectivity: ConnectivityGroup,
    /// Storage group, if enabled.
    pub storage: Feature<StorageGroup>,
    /// Naming group, if enabled.
    pub naming: Feature<NamingGroup>,
}

impl Topology {
    /// The resource graph.
    #[must_use]
    pub const fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    /// Whether `group` was built.
    #[must_use]
    pub const fn is_enabled(&self, group: ResourceGroup) -> bool {
        match group {
            ResourceGroup::Network | ResourceGroup::Compute | ResourceGroup::Connectivity => true,
            ResourceGroup::Storage => self.storage.is_enabled(),
            ResourceGroup::Naming => self.naming.is_enabled(),
        }
    }
}

/// Builds a [`Topology`] from a validated configuration.
#[derive(Debug)]
pub struct TopologyBuilder<'a, Z: ?Sized> {
    zones: &'a Z,
    managed_by: &'a str,
}

impl<'a, Z: ZoneLookup + ?Sized> TopologyBuilder<'a, Z> {
    /// Creates a builder resolving zones through `zones` and labelling every
    /// node as managed by `managed_by`.
    #[must_use]
    pub const fn new(zones: &'a Z, managed_by: &'a str) -> Self {
        Self { zones, managed_by }
    }

    /// Assembles the topology.
    ///
    /// The zone lookup runs before any node is created, so a lookup failure
    /// never leaves a partial graph behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone lookup fails.
    pub fn build(&self, config: &ValidatedConfig) -> Result<Topology> {
        let zoned = match config.zone_records() {
            Feature::Enabled(records) => {
                Feature::Enabled((records, self.zones.find_zone(&records.domain)?))
            }
            Feature::Disabled => Feature::Disabled,
        };

        tracing::info!(
            storage = config.storage.is_enabled(),
            naming = config.zone_records().is_enabled(),
            "assembling topology"
        );
        let mut graph = ResourceGraph::new();
        let network = network::build(&mut graph, &config.network);
        let compute = compute::build(&mut graph, &network, config);
        let connectivity = connectivity::build(&mut graph, &network, &config.connectivity);
        let storage = config
            .storage
            .as_ref()
            .map(|settings| storage::build(&mut graph, &network, &compute, settings));
        let naming =
            zoned.map(|(records, zone)| naming::build(&mut graph, &compute, records, zone));
        debug_assert!(
            graph.follows_group_order(&ResourceGroup::BUILD_ORDER),
            "groups built out of order"
        );

        let base = base_labels(config, self.managed_by);
        let project = config.project.as_str();
        graph.apply_labels(|identity| labels_for(&base, project, identity));
        tracing::info!(nodes = graph.len(), "topology assembled");

        Ok(Topology {
            graph,
            network,
            compute,
            connectivity,
            storage,
            naming,
        })
    }
}

fn base_labels(config: &ValidatedConfig, managed_by: &str) -> Labels {
    Labels::from([
        ("Project".to_owned(), config.project.clone()),
        ("Environment".to_owned(), config.environment.clone()),
        ("ManagedBy".to_owned(), managed_by.to_owned()),
    ])
}

fn labels_for(base: &Labels, project: &str, identity: &Identity) -> Labels {
    let mut labels = base.clone();
    let _ = labels.insert("Name".to_owned(), format!("{project}-{identity}"));
    labels
}

#[cfg(test)]
pub(crate) mod testing {
    use hybridnet_common::config::ParsePolicy;

    use super::*;
    use crate::params::{ParameterResolver, ParameterSet};
    use crate::validator::validate;

    pub fn validated(extra: &[(&str, &str)]) -> ValidatedConfig {
        let mut params = ParameterSet::new()
            .with("ssh_ip", "203.0.113.10/32")
            .with("key_pair", "k1")
            .with("peer_ip", "198.51.100.20")
            .with("psk", "secret")
            .with("remote_cidr", "10.1.0.0/16");
        for (k, v) in extra {
            params.insert(*k, *v);
        }
        let resolved = ParameterResolver::new(ParsePolicy::Lenient)
            .resolve(&params)
            .expect("resolves");
        validate(resolved).expect("valid")
    }

    pub fn network_and_compute(domains: u32) -> (ResourceGraph, NetworkGroup, ComputeGroup) {
        let count = domains.to_string();
        let config = validated(&[("az_count", count.as_str())]);
        let mut graph = ResourceGraph::new();
        let network = network::build(&mut graph, &config.network);
        let compute = compute::build(&mut graph, &network, &config);
        (graph, network, compute)
    }
}
