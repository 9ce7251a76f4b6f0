// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Ballast Authors

//! Shard resolution: turning an explanation target into exactly one
//! concrete shard copy.
//!
//! Replica selection without a node argument follows an explicit
//! ranking over shard state: unassigned copies first, then started
//! ones, then copies mid-transition. Unassigned and started copies
//! yield actionable explanations; a copy that is initializing or
//! relocating cannot be meaningfully explained. Ties keep the
//! first-encountered copy.

use ballast_core::{Node, ShardRouting, ShardState};

use super::{ExplainError, ExplainTarget};
use crate::context::AllocationContext;

/// Ranking policy for replica selection; lower ranks are preferred.
#[must_use]
pub fn replica_rank(state: ShardState) -> u8 {
    match state {
        ShardState::Unassigned => 0,
        ShardState::Started => 1,
        ShardState::Initializing | ShardState::Relocating => 2,
    }
}

/// Resolves an explanation target to exactly one shard copy.
///
/// Every failure is a caller-correctable argument error, raised
/// synchronously and never retried.
pub fn find_shard_to_explain<'a>(
    target: &ExplainTarget,
    ctx: &'a AllocationContext,
) -> Result<&'a ShardRouting, ExplainError> {
    match target {
        ExplainTarget::AnyUnassigned => ctx
            .routing_table()
            .unassigned()
            .next()
            .ok_or(ExplainError::NoUnassignedShards),
        ExplainTarget::Primary { index, shard, node } => {
            let group = ctx
                .routing_table()
                .shard_group(index, *shard)
                .ok_or_else(|| ExplainError::ShardGroupNotFound {
                    index: index.clone(),
                    shard: *shard,
                })?;
            let primary = group.primary();
            if let Some(node) = node {
                let node = resolve_node(ctx, node)?;
                // The primary exists but is assigned elsewhere.
                if primary.current_node.as_deref() != Some(node.id.as_str()) {
                    return Err(ExplainError::MismatchedNode {
                        role: "primary",
                        node: node.id.clone(),
                    });
                }
            }
            Ok(primary)
        }
        ExplainTarget::Replica { index, shard, node } => {
            let group = ctx
                .routing_table()
                .shard_group(index, *shard)
                .ok_or_else(|| ExplainError::ShardGroupNotFound {
                    index: index.clone(),
                    shard: *shard,
                })?;
            let replicas = group.replicas();
            match node {
                Some(node) => {
                    let node = resolve_node(ctx, node)?;
                    replicas
                        .iter()
                        .find(|r| r.current_node.as_deref() == Some(node.id.as_str()))
                        .ok_or_else(|| ExplainError::MismatchedNode {
                            role: "replica",
                            node: node.id.clone(),
                        })
                }
                None => pick_replica(replicas).ok_or_else(|| ExplainError::NoReplicaCopies {
                    index: index.clone(),
                    shard: *shard,
                }),
            }
        }
    }
}

/// Picks the replica copy whose state ranks best; ties keep the
/// first-encountered copy.
fn pick_replica(replicas: &[ShardRouting]) -> Option<&ShardRouting> {
    let mut found: Option<&ShardRouting> = None;
    for replica in replicas {
        match found {
            None => found = Some(replica),
            Some(kept) if replica_rank(replica.state) < replica_rank(kept.state) => {
                found = Some(replica);
            }
            Some(_) => {}
        }
    }
    found
}

fn resolve_node<'a>(ctx: &'a AllocationContext, id_or_name: &str) -> Result<&'a Node, ExplainError> {
    ctx.nodes()
        .resolve(id_or_name)
        .ok_or_else(|| ExplainError::UnknownNode(id_or_name.to_string()))
}

#[cfg(test)]
mod tests {
    use ballast_core::{
        ClusterInfo, ClusterState, Nodes, RoutingTable, ShardGroup, ShardId, SnapshotShardSizes,
    };

    use super::*;

    fn ctx_with(routing_table: RoutingTable, nodes: Nodes) -> AllocationContext {
        AllocationContext::new(
            ClusterState::new(1, nodes, routing_table),
            ClusterInfo::default(),
            SnapshotShardSizes::default(),
            0,
        )
    }

    fn nodes(ids: &[&str]) -> Nodes {
        let mut nodes = Nodes::new();
        for id in ids {
            nodes.add(Node::new(*id, format!("name-{id}"))).unwrap();
        }
        nodes
    }

    fn replica_target(index: &str, shard: u32, node: Option<&str>) -> ExplainTarget {
        ExplainTarget::Replica {
            index: index.to_string(),
            shard,
            node: node.map(str::to_string),
        }
    }

    #[test]
    fn test_replica_rank_policy() {
        assert!(replica_rank(ShardState::Unassigned) < replica_rank(ShardState::Started));
        assert!(replica_rank(ShardState::Started) < replica_rank(ShardState::Initializing));
        assert_eq!(
            replica_rank(ShardState::Initializing),
            replica_rank(ShardState::Relocating)
        );
    }

    #[test]
    fn test_unassigned_replica_preferred_all_permutations() {
        let id = ShardId::new("logs", 0);
        let unassigned = ShardRouting::unassigned(id.clone(), false);
        let started = ShardRouting::started(id.clone(), false, "n2");
        let initializing = ShardRouting::initializing(id.clone(), false, "n3");

        let copies = [unassigned.clone(), started, initializing];
        // Every ordering of the three states must pick the unassigned copy.
        let orders: [[usize; 3]; 6] =
            [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            let replicas: Vec<ShardRouting> = order.iter().map(|&i| copies[i].clone()).collect();
            let picked = pick_replica(&replicas).unwrap();
            assert_eq!(picked, &unassigned, "order {order:?}");
        }
    }

    #[test]
    fn test_started_preferred_over_transitioning() {
        let id = ShardId::new("logs", 0);
        let relocating = ShardRouting::relocating(id.clone(), false, "n1", "n4");
        let initializing = ShardRouting::initializing(id.clone(), false, "n3");
        let started = ShardRouting::started(id, false, "n2");

        let copies = [relocating, initializing, started.clone()];
        let picked = pick_replica(&copies).unwrap();
        assert_eq!(picked, &started);
    }

    #[test]
    fn test_tie_keeps_first_encountered() {
        let id = ShardId::new("logs", 0);
        let first = ShardRouting::started(id.clone(), false, "n2");
        let second = ShardRouting::started(id, false, "n3");

        let copies = [first.clone(), second];
        let picked = pick_replica(&copies).unwrap();
        assert_eq!(picked, &first);
    }

    #[test]
    fn test_any_unassigned_picks_first() {
        let id_a = ShardId::new("a", 0);
        let id_b = ShardId::new("b", 0);
        let mut table = RoutingTable::new();
        table
            .add_group(
                ShardGroup::new(
                    ShardRouting::started(id_a.clone(), true, "n1"),
                    vec![ShardRouting::unassigned(id_a.clone(), false)],
                )
                .unwrap(),
            )
            .unwrap();
        table
            .add_group(
                ShardGroup::new(ShardRouting::unassigned(id_b, true), vec![]).unwrap(),
            )
            .unwrap();

        let ctx = ctx_with(table, nodes(&["n1"]));
        let found = find_shard_to_explain(&ExplainTarget::AnyUnassigned, &ctx).unwrap();
        assert_eq!(found.id, id_a);
        assert!(!found.primary);
    }

    #[test]
    fn test_any_unassigned_none_exist() {
        let id = ShardId::new("logs", 0);
        let mut table = RoutingTable::new();
        table
            .add_group(
                ShardGroup::new(ShardRouting::started(id, true, "n1"), vec![]).unwrap(),
            )
            .unwrap();

        let ctx = ctx_with(table, nodes(&["n1"]));
        let result = find_shard_to_explain(&ExplainTarget::AnyUnassigned, &ctx);
        assert!(matches!(result, Err(ExplainError::NoUnassignedShards)));
    }

    #[test]
    fn test_missing_group() {
        let ctx = ctx_with(RoutingTable::new(), nodes(&["n1"]));
        let result = find_shard_to_explain(&replica_target("logs", 7, None), &ctx);
        assert!(matches!(
            result,
            Err(ExplainError::ShardGroupNotFound { shard: 7, .. })
        ));
    }

    #[test]
    fn test_primary_on_wrong_node() {
        let id = ShardId::new("logs", 3);
        let mut table = RoutingTable::new();
        table
            .add_group(
                ShardGroup::new(ShardRouting::started(id, true, "n1"), vec![]).unwrap(),
            )
            .unwrap();

        let ctx = ctx_with(table, nodes(&["n1", "n5"]));
        let target = ExplainTarget::Primary {
            index: "logs".to_string(),
            shard: 3,
            node: Some("n5".to_string()),
        };
        let result = find_shard_to_explain(&target, &ctx);
        assert!(matches!(
            result,
            Err(ExplainError::MismatchedNode { role: "primary", .. })
        ));
    }

    #[test]
    fn test_primary_resolved_by_node_name() {
        let id = ShardId::new("logs", 3);
        let mut table = RoutingTable::new();
        table
            .add_group(
                ShardGroup::new(ShardRouting::started(id.clone(), true, "n1"), vec![]).unwrap(),
            )
            .unwrap();

        let ctx = ctx_with(table, nodes(&["n1"]));
        let target = ExplainTarget::Primary {
            index: "logs".to_string(),
            shard: 3,
            node: Some("name-n1".to_string()),
        };
        let found = find_shard_to_explain(&target, &ctx).unwrap();
        assert_eq!(found.id, id);
        assert!(found.primary);
    }

    #[test]
    fn test_unknown_node_reference() {
        let id = ShardId::new("logs", 0);
        let mut table = RoutingTable::new();
        table
            .add_group(
                ShardGroup::new(ShardRouting::started(id, true, "n1"), vec![]).unwrap(),
            )
            .unwrap();

        let ctx = ctx_with(table, nodes(&["n1"]));
        let target = ExplainTarget::Primary {
            index: "logs".to_string(),
            shard: 0,
            node: Some("nope".to_string()),
        };
        let result = find_shard_to_explain(&target, &ctx);
        assert!(matches!(result, Err(ExplainError::UnknownNode(_))));
    }

    #[test]
    fn test_replica_by_node() {
        let id = ShardId::new("logs", 0);
        let mut table = RoutingTable::new();
        table
            .add_group(
                ShardGroup::new(
                    ShardRouting::started(id.clone(), true, "n1"),
                    vec![
                        ShardRouting::started(id.clone(), false, "n2"),
                        ShardRouting::started(id.clone(), false, "n3"),
                    ],
                )
                .unwrap(),
            )
            .unwrap();

        let ctx = ctx_with(table, nodes(&["n1", "n2", "n3", "n4"]));

        let found =
            find_shard_to_explain(&replica_target("logs", 0, Some("n3")), &ctx).unwrap();
        assert_eq!(found.current_node.as_deref(), Some("n3"));

        let result = find_shard_to_explain(&replica_target("logs", 0, Some("n4")), &ctx);
        assert!(matches!(
            result,
            Err(ExplainError::MismatchedNode { role: "replica", .. })
        ));
    }

    #[test]
    fn test_zero_replicas_is_no_result() {
        let id = ShardId::new("idx", 0);
        let mut table = RoutingTable::new();
        table
            .add_group(
                ShardGroup::new(ShardRouting::started(id, true, "n1"), vec![]).unwrap(),
            )
            .unwrap();

        let ctx = ctx_with(table, nodes(&["n1"]));
        let result = find_shard_to_explain(&replica_target("idx", 0, None), &ctx);
        assert!(matches!(result, Err(ExplainError::NoReplicaCopies { .. })));
    }
}
