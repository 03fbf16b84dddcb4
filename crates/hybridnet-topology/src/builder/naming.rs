//! Naming group: apex and `www` address records.

use hybridnet_common::constants::{DNS_RECORD_TTL, WWW_SUBDOMAIN};
use hybridnet_common::types::{Identity, ResourceGroup};

use super::compute::ComputeGroup;
use crate::graph::ResourceGraph;
use crate::resources::{AddressRecord, Resource};
use crate::validator::ZoneRecords;
use crate::zone::ZoneId;

/// A created address record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Record node.
    pub identity: Identity,
    /// Fully qualified name.
    pub fqdn: String,
}

/// Identities created by the naming group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingGroup {
    /// Zone hosting the records.
    pub zone: ZoneId,
    /// Apex record, if requested.
    pub apex: Option<DnsRecord>,
    /// `www` record, if requested.
    pub www: Option<DnsRecord>,
}

pub(crate) fn build(
    graph: &mut ResourceGraph,
    compute: &ComputeGroup,
    records: &ZoneRecords,
    zone: ZoneId,
) -> NamingGroup {
    let apex = records
        .apex
        .then(|| add_record(graph, compute, &zone, "dns-apex", records.domain.clone()));
    let www = records.www.then(|| {
        add_record(
            graph,
            compute,
            &zone,
            "dns-www",
            format!("{WWW_SUBDOMAIN}.{}", records.domain),
        )
    });
    NamingGroup { zone, apex, www }
}

fn add_record(
    graph: &mut ResourceGraph,
    compute: &ComputeGroup,
    zone: &ZoneId,
    identity: &str,
    fqdn: String,
) -> DnsRecord {
    let identity = graph.add(
        ResourceGroup::Naming,
        identity,
        Resource::AddressRecord(AddressRecord {
            zone: zone.clone(),
            fqdn: fqdn.clone(),
            ttl: DNS_RECORD_TTL,
            address: compute.address.clone(),
        }),
    );
    DnsRecord { identity, fqdn }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::testing;

    fn built(apex: bool, www: bool) -> (ResourceGraph, NamingGroup) {
        let (mut graph, _, compute) = testing::network_and_compute(1);
        let group = build(
            &mut graph,
            &compute,
            &ZoneRecords {
                domain: "example.com".into(),
                apex,
                www,
            },
            ZoneId::new("Z1"),
        );
        (graph, group)
    }

    #[test]
    fn both_records_point_at_static_address() {
        let (graph, group) = built(true, true);
        let apex = group.apex.expect("apex");
        let www = group.www.expect("www");
        assert_eq!(apex.fqdn, "example.com");
        assert_eq!(www.fqdn, "www.example.com");
        for record in [&apex, &www] {
            let node = graph.get(&record.identity).expect("record");
            assert_eq!(node.depends_on, vec![Identity::new("compute-address")]);
            let Resource::AddressRecord(spec) = &node.spec else {
                unreachable!("record is an address record");
            };
            assert_eq!(spec.ttl, DNS_RECORD_TTL);
            assert_eq!(spec.zone.as_str(), "Z1");
        }
    }

    #[test]
    fn toggles_are_independent() {
        let (graph, group) = built(false, true);
        assert!(group.apex.is_none());
        assert!(group.www.is_some());
        assert_eq!(graph.nodes_in(ResourceGroup::Naming).count(), 1);

        let (graph, group) = built(false, false);
        assert!(group.apex.is_none() && group.www.is_none());
        assert_eq!(graph.nodes_in(ResourceGroup::Naming).count(), 0);
    }
}
