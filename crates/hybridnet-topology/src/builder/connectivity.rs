//! Connectivity group: peer gateway, tunnel, remote route.

use hybridnet_common::constants::TUNNEL_CHANNELS;
use hybridnet_common::types::{Identity, ResourceGroup};

use super::network::NetworkGroup;
use crate::graph::ResourceGraph;
use crate::params::ConnectivitySettings;
use crate::resources::{PeerGateway, Resource, StaticRoute, Tunnel, TunnelChannel};
use crate::tunnel::TunnelProfile;

/// Identities created by the connectivity group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityGroup {
    /// Remote tunnel endpoint.
    pub peer_gateway: Identity,
    /// Site-to-site tunnel.
    pub tunnel: Identity,
    /// Route for the remote prefix.
    pub route: Identity,
}

pub(crate) fn build(
    graph: &mut ResourceGraph,
    network: &NetworkGroup,
    settings: &ConnectivitySettings,
) -> ConnectivityGroup {
    const GROUP: ResourceGroup = ResourceGroup::Connectivity;

    let peer_gateway = graph.add(
        GROUP,
        "peer-gateway",
        Resource::PeerGateway(PeerGateway {
            public_address: settings.peer_address.clone(),
            routing_number: settings.peer_routing_number,
            gateway_type: "ipsec.1",
        }),
    );

    let channels = (1..=TUNNEL_CHANNELS)
        .map(|index| TunnelChannel {
            index,
            shared_secret: settings.shared_secret.clone(),
            profile: TunnelProfile::CURRENT,
        })
        .collect();

    let tunnel = graph.add(
        GROUP,
        "vpn-tunnel",
        Resource::Tunnel(Tunnel {
            local_gateway: network.gateway.clone(),
            peer_gateway: peer_gateway.clone(),
            static_routes_only: true,
            channels,
        }),
    );

    let route = graph.add(
        GROUP,
        "remote-route",
        Resource::StaticRoute(StaticRoute {
            destination: settings.remote_cidr.clone(),
            tunnel: tunnel.clone(),
        }),
    );

    ConnectivityGroup {
        peer_gateway,
        tunnel,
        route,
    }
}
