//! Compute group: firewall, compute node, static address.

use hybridnet_common::constants::ANY_IPV4;
use hybridnet_common::types::{Identity, ResourceGroup};

use super::network::NetworkGroup;
use crate::graph::ResourceGraph;
use crate::resources::{
    ComputeNode, Firewall, FirewallRule, Protocol, Resource, RulePeer, StaticAddress,
};
use crate::validator::{InternalApiEndpoint, ValidatedConfig};

const HTTP_PORT: u16 = 80;
const HTTPS_PORT: u16 = 443;
const SSH_PORT: u16 = 22;
const DNS_PORT: u16 = 53;

/// Identities created by the compute group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeGroup {
    /// Firewall attached to the node.
    pub firewall: Identity,
    /// Compute node.
    pub node: Identity,
    /// Static address bound to the node.
    pub address: Identity,
}

pub(crate) fn build(
    graph: &mut ResourceGraph,
    network: &NetworkGroup,
    config: &ValidatedConfig,
) -> ComputeGroup {
    const GROUP: ResourceGroup = ResourceGroup::Compute;
    let settings = &config.compute;

    let firewall = graph.add(
        GROUP,
        "compute-firewall",
        Resource::Firewall(Firewall {
            network: network.network.clone(),
            ingress: ingress_rules(&settings.ssh_source),
            egress: egress_rules(config.internal_api()),
        }),
    );

    let node = graph.add(
        GROUP,
        "compute-node",
        Resource::ComputeNode(ComputeNode {
            shape: settings.shape,
            machine_image: settings.machine_image.clone(),
            key_pair: settings.key_pair.clone(),
            subnet: network.primary_public_subnet().clone(),
            firewall: firewall.clone(),
        }),
    );

    let address = graph.add(
        GROUP,
        "compute-address",
        Resource::StaticAddress(StaticAddress {
            instance: node.clone(),
        }),
    );

    ComputeGroup {
        firewall,
        node,
        address,
    }
}

fn ingress_rules(ssh_source: &str) -> Vec<FirewallRule> {
    vec![
        FirewallRule::tcp(HTTP_PORT, ANY_IPV4, "HTTP from anywhere"),
        FirewallRule::tcp(SSH_PORT, ssh_source, "SSH from operator"),
    ]
}

fn egress_rules(internal_api: Option<&InternalApiEndpoint>) -> Vec<FirewallRule> {
    let mut rules = vec![
        FirewallRule {
            protocol: Protocol::Udp,
            port: Some(DNS_PORT),
            peer: RulePeer::Cidr(ANY_IPV4.to_owned()),
            description: "DNS".into(),
        },
        FirewallRule::tcp(HTTP_PORT, ANY_IPV4, "HTTP"),
        FirewallRule::tcp(HTTPS_PORT, ANY_IPV4, "HTTPS"),
        FirewallRule {
            protocol: Protocol::Icmp,
            port: None,
            peer: RulePeer::Cidr(ANY_IPV4.to_owned()),
            description: "ICMP".into(),
        },
    ];
    if let Some(api) = internal_api {
        rules.push(FirewallRule::tcp(
            api.port,
            host_cidr(&api.host),
            "internal API",
        ));
    }
    rules
}

/// `host` as a single-address range unless it already has a prefix length.
fn host_cidr(host: &str) -> String {
    if host.contains('/') {
        host.to_owned()
    } else {
        format!("{host}/32")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::testing;

    #[test]
    fn ingress_allows_http_anywhere_and_ssh_from_operator_only() {
        let rules = ingress_rules("203.0.113.10/32");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].port, Some(80));
        assert_eq!(rules[0].peer, RulePeer::Cidr("0.0.0.0/0".into()));
        assert_eq!(rules[1].port, Some(22));
        assert_eq!(rules[1].peer, RulePeer::Cidr("203.0.113.10/32".into()));
    }

    #[test]
    fn fixed_egress_without_internal_api() {
        let rules = egress_rules(None);
        let protocols: Vec<(Protocol, Option<u16>)> =
            rules.iter().map(|r| (r.protocol, r.port)).collect();
        assert_eq!(
            protocols,
            vec![
                (Protocol::Udp, Some(53)),
                (Protocol::Tcp, Some(80)),
                (Protocol::Tcp, Some(443)),
                (Protocol::Icmp, None),
            ]
        );
    }

    #[test]
    fn internal_api_adds_one_egress_rule() {
        let api = InternalApiEndpoint {
            host: "10.1.2.3".into(),
            port: 50000,
        };
        let rules = egress_rules(Some(&api));
        assert_eq!(rules.len(), 5);
        let last = rules.last().expect("rule");
        assert_eq!(last.port, Some(50000));
        assert_eq!(last.peer, RulePeer::Cidr("10.1.2.3/32".into()));
    }

    #[test]
    fn node_binds_firewall_and_address_binds_node() {
        let (graph, network, compute) = testing::network_and_compute(2);

        let node = graph.get(&compute.node).expect("compute node");
        assert_eq!(
            node.depends_on,
            vec![
                network.primary_public_subnet().clone(),
                compute.firewall.clone()
            ]
        );
        assert_eq!(node.depends_on[0].as_str(), "subnet-public-0");

        let address = graph.get(&compute.address).expect("static address");
        assert_eq!(address.depends_on, vec![compute.node.clone()]);
        let Resource::StaticAddress(spec) = &address.spec else {
            panic!("expected static address, got {}", address.spec.kind());
        };
        assert_eq!(spec.instance, compute.node);

        let firewall = graph.get(&compute.firewall).expect("firewall");
        assert_eq!(firewall.depends_on, vec![network.network.clone()]);
        assert_eq!(graph.nodes_in(ResourceGroup::Compute).count(), 3);
    }

    #[test]
    fn host_with_prefix_is_kept() {
        assert_eq!(host_cidr("10.1.0.0/24"), "10.1.0.0/24");
        assert_eq!(host_cidr("10.1.0.7"), "10.1.0.7/32");
    }
}
