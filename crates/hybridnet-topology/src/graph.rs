//! Resource graph management using `petgraph`.
//!
//! Every resource node is registered under a unique [`Identity`]. Edges are
//! derived from the references a node's [`Resource`] holds and always point
//! from the dependency to the dependent, so a topological sort yields
//! dependencies first.

use std::collections::BTreeMap;

use hybridnet_common::error::{HybridnetError, Result};
use hybridnet_common::types::{Identity, Labels, ResourceGroup};
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::resources::Resource;

/// A declared resource with its dependencies and labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceNode {
    /// Handle of this node.
    pub identity: Identity,
    /// Owning group.
    pub group: ResourceGroup,
    /// Nodes this one refers to.
    pub depends_on: Vec<Identity>,
    /// Labels, filled in by the final labelling pass.
    pub labels: Labels,
    /// Declarative specification.
    pub spec: Resource,
}

/// Directed acyclic graph of resource nodes.
#[derive(Debug, Default)]
pub struct ResourceGraph {
    graph: petgraph::Graph<ResourceNode, ()>,
    index: BTreeMap<Identity, NodeIndex>,
}

impl ResourceGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resource under `identity` and returns the identity.
    ///
    /// # Panics
    ///
    /// Panics if `identity` is already registered, if the resource refers to
    /// an identity that was never registered, or if it refers to a group
    /// that `group` does not depend on. These are programming errors in the
    /// group builders and cannot be caused by configuration.
    pub fn add(
        &mut self,
        group: ResourceGroup,
        identity: impl Into<String>,
        spec: Resource,
    ) -> Identity {
        let identity = Identity::new(identity);
        assert!(
            !self.index.contains_key(&identity),
            "identity {identity} registered twice"
        );

        let mut dependencies = Vec::new();
        for reference in spec.references() {
            let dep_idx = self.index.get(reference).copied();
            assert!(
                dep_idx.is_some(),
                "{identity} ({group}) references unknown identity {reference}"
            );
            if let Some(dep_idx) = dep_idx {
                let dep_group = self.graph[dep_idx].group;
                assert!(
                    group.may_reference(dep_group),
                    "{identity} ({group}) may not reference {reference} ({dep_group})"
                );
                dependencies.push((reference.clone(), dep_idx));
            }
        }

        tracing::debug!(
            %identity,
            %group,
            kind = spec.kind(),
            deps = dependencies.len(),
            "adding resource node"
        );
        let node = self.graph.add_node(ResourceNode {
            identity: identity.clone(),
            group,
            depends_on: dependencies.iter().map(|(id, _)| id.clone()).collect(),
            labels: Labels::new(),
            spec,
        });
        for (_, dep_idx) in dependencies {
            let _ = self.graph.add_edge(dep_idx, node, ());
        }
        let _ = self.index.insert(identity.clone(), node);
        identity
    }

    /// Returns the node registered under `identity`.
    #[must_use]
    pub fn get(&self, identity: &Identity) -> Option<&ResourceNode> {
        self.index.get(identity).map(|&idx| &self.graph[idx])
    }

    /// Whether `identity` is registered.
    #[must_use]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.index.contains_key(identity)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Nodes owned by `group`, in insertion order.
    pub fn nodes_in(&self, group: ResourceGroup) -> impl Iterator<Item = &ResourceNode> {
        self.graph
            .node_weights()
            .filter(move |node| node.group == group)
    }

    /// Whether nodes were inserted group by group in the sequence `order`.
    ///
    /// Groups absent from `order` never match.
    #[must_use]
    pub fn follows_group_order(&self, order: &[ResourceGroup]) -> bool {
        let mut last = 0;
        for node in self.graph.node_weights() {
            let Some(pos) = order.iter().position(|g| *g == node.group) else {
                return false;
            };
            if pos < last {
                return false;
            }
            last = pos;
        }
        true
    }

    /// Applies `labels_for` to every node.
    pub fn apply_labels(&mut self, mut labels_for: impl FnMut(&Identity) -> Labels) {
        for node in self.graph.node_weights_mut() {
            node.labels = labels_for(&node.identity);
        }
    }

    /// Returns every node in deployment order.
    ///
    /// Dependencies appear before the nodes that depend on them.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph contains cycles.
    pub fn resolve_order(&self) -> Result<Vec<&ResourceNode>> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(indices) => Ok(indices.iter().map(|&idx| &self.graph[idx]).collect()),
            Err(_cycle) => Err(HybridnetError::invalid(
                "cyclic dependency detected in resource graph",
            )),
        }
    }
}
