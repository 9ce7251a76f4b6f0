// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Ballast Authors

//! The routing table: shard groups and their copies.
//!
//! A shard group holds every copy of one index shard. The group
//! carries exactly one primary by construction; replicas keep their
//! insertion order, which is the natural order all iteration in this
//! module follows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::Nodes;
use crate::shard::{ShardId, ShardRouting};

/// Errors raised while building routing state.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// A shard group with the same id already exists.
    #[error("shard group {0} already exists")]
    DuplicateShardGroup(ShardId),

    /// A copy was added to a group with a different shard id.
    #[error("shard copy {found} does not belong to group {expected}")]
    GroupIdMismatch {
        /// Id of the group being built.
        expected: ShardId,
        /// Id carried by the offending copy.
        found: ShardId,
    },

    /// A replica was passed where the primary belongs.
    #[error("shard group {0} primary slot was given a replica copy")]
    MisplacedPrimary(ShardId),

    /// A primary was passed in the replica list.
    #[error("shard group {0} replica list contains a primary copy")]
    MisplacedReplica(ShardId),

    /// A node with the same id already exists.
    #[error("node '{0}' already exists")]
    DuplicateNode(String),
}

/// All copies of one index shard: one primary plus its replicas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardGroup {
    primary: ShardRouting,
    replicas: Vec<ShardRouting>,
}

impl ShardGroup {
    /// Creates a shard group from its primary and replica copies.
    ///
    /// Rejects a replica in the primary slot, a primary in the replica
    /// list, and copies whose shard id differs from the primary's.
    pub fn new(primary: ShardRouting, replicas: Vec<ShardRouting>) -> Result<Self, RoutingError> {
        if !primary.primary {
            return Err(RoutingError::MisplacedPrimary(primary.id));
        }
        for replica in &replicas {
            if replica.primary {
                return Err(RoutingError::MisplacedReplica(primary.id));
            }
            if replica.id != primary.id {
                return Err(RoutingError::GroupIdMismatch {
                    expected: primary.id.clone(),
                    found: replica.id.clone(),
                });
            }
        }
        Ok(Self { primary, replicas })
    }

    /// The group's shard id.
    #[must_use]
    pub fn id(&self) -> &ShardId {
        &self.primary.id
    }

    /// The group's primary copy.
    #[must_use]
    pub fn primary(&self) -> &ShardRouting {
        &self.primary
    }

    /// The group's replica copies, in insertion order.
    #[must_use]
    pub fn replicas(&self) -> &[ShardRouting] {
        &self.replicas
    }

    /// Iterates over all copies, primary first.
    pub fn shards(&self) -> impl Iterator<Item = &ShardRouting> {
        std::iter::once(&self.primary).chain(self.replicas.iter())
    }
}

/// Insertion-ordered collection of shard groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingTable {
    groups: Vec<ShardGroup>,
}

impl RoutingTable {
    /// Creates an empty routing table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shard group to the table.
    pub fn add_group(&mut self, group: ShardGroup) -> Result<(), RoutingError> {
        if self.shard_group(&group.id().index, group.id().shard).is_some() {
            return Err(RoutingError::DuplicateShardGroup(group.id().clone()));
        }
        self.groups.push(group);
        Ok(())
    }

    /// Looks up the group for an index/shard-number pair.
    #[must_use]
    pub fn shard_group(&self, index: &str, shard: u32) -> Option<&ShardGroup> {
        self.groups.iter().find(|g| g.id().index == index && g.id().shard == shard)
    }

    /// Iterates over the groups in insertion order.
    pub fn groups(&self) -> impl Iterator<Item = &ShardGroup> {
        self.groups.iter()
    }

    /// Iterates over every unassigned shard copy in natural order:
    /// groups in insertion order, primary before replicas.
    pub fn unassigned(&self) -> impl Iterator<Item = &ShardRouting> {
        self.groups.iter().flat_map(ShardGroup::shards).filter(|s| s.is_unassigned())
    }

    /// Number of shard groups in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if the table has no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A consistent point-in-time snapshot of cluster topology.
///
/// All figures in one snapshot are taken at the same cluster-state
/// version, so decisions computed against it never mix epochs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterState {
    /// Cluster-state version at the time of the read.
    pub version: u64,
    /// Nodes known to the cluster.
    pub nodes: Nodes,
    /// Routing table at this version.
    pub routing_table: RoutingTable,
}

impl ClusterState {
    /// Creates a cluster-state snapshot.
    #[must_use]
    pub fn new(version: u64, nodes: Nodes, routing_table: RoutingTable) -> Self {
        Self { version, nodes, routing_table }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(index: &str, shard: u32, replica_nodes: &[&str]) -> ShardGroup {
        let id = ShardId::new(index, shard);
        let primary = ShardRouting::started(id.clone(), true, "n1");
        let replicas = replica_nodes
            .iter()
            .map(|n| ShardRouting::started(id.clone(), false, *n))
            .collect();
        ShardGroup::new(primary, replicas).unwrap()
    }

    #[test]
    fn test_group_rejects_replica_as_primary() {
        let id = ShardId::new("logs", 0);
        let result = ShardGroup::new(ShardRouting::unassigned(id, false), vec![]);
        assert!(matches!(result, Err(RoutingError::MisplacedPrimary(_))));
    }

    #[test]
    fn test_group_rejects_primary_in_replicas() {
        let id = ShardId::new("logs", 0);
        let primary = ShardRouting::started(id.clone(), true, "n1");
        let stray = ShardRouting::started(id, true, "n2");
        let result = ShardGroup::new(primary, vec![stray]);
        assert!(matches!(result, Err(RoutingError::MisplacedReplica(_))));
    }

    #[test]
    fn test_group_rejects_foreign_copy() {
        let primary = ShardRouting::started(ShardId::new("logs", 0), true, "n1");
        let foreign = ShardRouting::started(ShardId::new("logs", 1), false, "n2");
        let result = ShardGroup::new(primary, vec![foreign]);
        assert!(matches!(result, Err(RoutingError::GroupIdMismatch { .. })));
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let mut table = RoutingTable::new();
        table.add_group(group("logs", 0, &[])).unwrap();
        let result = table.add_group(group("logs", 0, &["n2"]));
        assert!(matches!(result, Err(RoutingError::DuplicateShardGroup(_))));
    }

    #[test]
    fn test_shard_group_lookup() {
        let mut table = RoutingTable::new();
        table.add_group(group("logs", 0, &["n2"])).unwrap();
        table.add_group(group("logs", 1, &[])).unwrap();

        assert!(table.shard_group("logs", 0).is_some());
        assert!(table.shard_group("logs", 2).is_none());
        assert!(table.shard_group("metrics", 0).is_none());
    }

    #[test]
    fn test_unassigned_natural_order() {
        let id_a = ShardId::new("a", 0);
        let id_b = ShardId::new("b", 0);
        let group_a = ShardGroup::new(
            ShardRouting::started(id_a.clone(), true, "n1"),
            vec![ShardRouting::unassigned(id_a.clone(), false)],
        )
        .unwrap();
        let group_b = ShardGroup::new(
            ShardRouting::unassigned(id_b.clone(), true),
            vec![ShardRouting::unassigned(id_b.clone(), false)],
        )
        .unwrap();

        let mut table = RoutingTable::new();
        table.add_group(group_a).unwrap();
        table.add_group(group_b).unwrap();

        let unassigned: Vec<_> =
            table.unassigned().map(|s| (s.id.clone(), s.primary)).collect();
        assert_eq!(
            unassigned,
            vec![(id_a, false), (id_b.clone(), true), (id_b, false)]
        );
    }
}
