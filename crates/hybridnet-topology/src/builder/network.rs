//! Network group: virtual network, subnets, tunnel-termination gateway.

use hybridnet_common::types::{Identity, ResourceGroup};

use crate::graph::ResourceGraph;
use crate::params::NetworkSettings;
use crate::resources::{Resource, Subnet, SubnetClass, VirtualNetwork, VpnGateway};

/// Identities created by the network group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkGroup {
    /// Virtual network.
    pub network: Identity,
    /// One public subnet per availability domain.
    pub public_subnets: Vec<Identity>,
    /// One private subnet per availability domain.
    pub private_subnets: Vec<Identity>,
    /// Tunnel-termination gateway.
    pub gateway: Identity,
}

impl NetworkGroup {
    /// Subnet hosting the compute node.
    #[must_use]
    pub fn primary_public_subnet(&self) -> &Identity {
        &self.public_subnets[0]
    }
}

pub(crate) fn build(graph: &mut ResourceGraph, settings: &NetworkSettings) -> NetworkGroup {
    const GROUP: ResourceGroup = ResourceGroup::Network;

    let network = graph.add(
        GROUP,
        "vpc",
        Resource::VirtualNetwork(VirtualNetwork {
            cidr: settings.cidr.clone(),
            availability_domains: settings.availability_domains,
            nat_gateways: settings.nat_gateways,
        }),
    );

    let mut public_subnets = Vec::new();
    let mut private_subnets = Vec::new();
    for domain in 0..settings.availability_domains.max(1) {
        for (class, bucket) in [
            (SubnetClass::Public, &mut public_subnets),
            (SubnetClass::Private, &mut private_subnets),
        ] {
            let label = match class {
                SubnetClass::Public => "public",
                SubnetClass::Private => "private",
            };
            bucket.push(graph.add(
                GROUP,
                format!("subnet-{label}-{domain}"),
                Resource::Subnet(Subnet {
                    network: network.clone(),
                    class,
                    availability_domain: domain,
                }),
            ));
        }
    }

    let gateway = graph.add(
        GROUP,
        "vpn-gateway",
        Resource::VpnGateway(VpnGateway {
            network: network.clone(),
            route_propagation: true,
        }),
    );

    NetworkGroup {
        network,
        public_subnets,
        private_subnets,
        gateway,
    }
}
