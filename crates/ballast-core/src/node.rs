// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Ballast Authors

//! Cluster nodes and the node set.

use serde::{Deserialize, Serialize};

use crate::routing::RoutingError;

/// A cluster member capable of hosting shard copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node id.
    pub id: String,
    /// Human-assigned node name.
    pub name: String,
}

impl Node {
    /// Creates a new node.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}{{{}}}", self.name, self.id)
    }
}

/// Insertion-ordered set of cluster nodes.
///
/// Node sets consulted during an explanation are small, so lookups
/// scan the insertion-ordered vector directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nodes {
    nodes: Vec<Node>,
}

impl Nodes {
    /// Creates an empty node set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node to the set.
    pub fn add(&mut self, node: Node) -> Result<(), RoutingError> {
        if self.get(&node.id).is_some() {
            return Err(RoutingError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Resolves a node reference that may be an id or a name.
    ///
    /// Ids take precedence over names. A name resolves only when it is
    /// unambiguous.
    #[must_use]
    pub fn resolve(&self, id_or_name: &str) -> Option<&Node> {
        if let Some(node) = self.get(id_or_name) {
            return Some(node);
        }
        let mut matches = self.nodes.iter().filter(|n| n.name == id_or_name);
        match (matches.next(), matches.next()) {
            (Some(node), None) => Some(node),
            _ => None,
        }
    }

    /// Iterates over the nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Number of nodes in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_nodes() -> Nodes {
        let mut nodes = Nodes::new();
        nodes.add(Node::new("n1", "alpha")).unwrap();
        nodes.add(Node::new("n2", "beta")).unwrap();
        nodes.add(Node::new("n3", "beta")).unwrap();
        nodes
    }

    #[test]
    fn test_get_by_id() {
        let nodes = three_nodes();
        assert_eq!(nodes.get("n2").unwrap().name, "beta");
        assert!(nodes.get("n9").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut nodes = three_nodes();
        let result = nodes.add(Node::new("n1", "other"));
        assert!(matches!(result, Err(RoutingError::DuplicateNode(_))));
    }

    #[test]
    fn test_resolve_prefers_id() {
        let mut nodes = three_nodes();
        // A node whose name collides with another node's id.
        nodes.add(Node::new("n4", "n1")).unwrap();
        assert_eq!(nodes.resolve("n1").unwrap().id, "n1");
    }

    #[test]
    fn test_resolve_by_unique_name() {
        let nodes = three_nodes();
        assert_eq!(nodes.resolve("alpha").unwrap().id, "n1");
    }

    #[test]
    fn test_resolve_ambiguous_name() {
        let nodes = three_nodes();
        assert!(nodes.resolve("beta").is_none());
    }

    #[test]
    fn test_iteration_order() {
        let nodes = three_nodes();
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n2", "n3"]);
    }
}
