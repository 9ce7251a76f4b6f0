// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Ballast Authors

//! The allocation-explanation engine.
//!
//! An explanation request names one shard copy, possibly ambiguously
//! ("any unassigned shard", "the replica on node X"). The engine
//! resolves it to exactly one concrete copy, drives that copy through
//! the decision subsystem in a debug-capable mode, and assembles an
//! auditable record of the outcome.
//!
//! Shards that are initializing or relocating are deliberately not
//! driven through the deciders: a copy mid-transition has no
//! meaningful current-placement decision, so its record carries the
//! [`AllocationDecision::NotTaken`] sentinel instead.

mod request;
mod resolve;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use ballast_core::{ClusterInfo, ClusterState, Node, ShardRouting, SnapshotShardSizes};
use metrics::counter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use request::{ExplainRequest, ExplainTarget};
pub use resolve::{find_shard_to_explain, replica_rank};

use crate::context::{AllocationContext, DebugMode};
use crate::decider::DecisionAggregator;
use crate::decision::{AllocationDecision, Decision, NodeDecision, ShardDecision};

/// Errors raised while resolving an explanation target.
///
/// All of these are argument-validation errors: the caller named a
/// shard, node, or state of the world that the routing table does not
/// bear out. None are transient and none are retried.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// The index/shard-number pair is absent from the routing table.
    #[error("unable to find shard group [{index}][{shard}] in the routing table")]
    ShardGroupNotFound {
        /// Index name from the request.
        index: String,
        /// Shard number from the request.
        shard: u32,
    },

    /// "Any unassigned" was requested but no shard is unassigned.
    #[error("unable to find any unassigned shards to explain")]
    NoUnassignedShards,

    /// A node was named but the resolved copy is not on it.
    #[error("unable to find a {role} shard assigned to node [{node}]")]
    MismatchedNode {
        /// Role of the requested copy.
        role: &'static str,
        /// Id of the node named in the request.
        node: String,
    },

    /// A replica was requested for a group with zero replica copies.
    ///
    /// Not an input mistake, just an empty result: there is nothing to
    /// explain.
    #[error("shard group [{index}][{shard}] has no replica copies")]
    NoReplicaCopies {
        /// Index name from the request.
        index: String,
        /// Shard number from the request.
        shard: u32,
    },

    /// A node reference resolved to no known node.
    #[error("unable to resolve node [{0}]")]
    UnknownNode(String),
}

/// The immutable result of one explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationExplanation {
    /// The resolved shard copy.
    pub shard: ShardRouting,
    /// Node currently hosting the copy, absent when unassigned.
    pub current_node: Option<Node>,
    /// Node the copy is relocating to, absent unless relocating.
    pub relocating_node: Option<Node>,
    /// Disk-usage snapshot, present only when the caller asked for it.
    pub cluster_info: Option<ClusterInfo>,
    /// The verdict, or the not-applicable sentinel.
    pub decision: AllocationDecision,
}

/// Yields consistent cluster-state snapshots.
pub trait ClusterStateProvider: Send + Sync {
    /// Reads the current cluster state.
    fn cluster_state(&self) -> ClusterState;
}

/// Yields resource-usage snapshots taken alongside the cluster state.
pub trait ResourceUsageProvider: Send + Sync {
    /// Reads the current disk-usage figures.
    fn cluster_info(&self) -> ClusterInfo;

    /// Reads the current snapshot-restore size estimates.
    fn snapshot_shard_sizes(&self) -> SnapshotShardSizes;
}

/// A provider returning a fixed cluster-state snapshot.
pub struct FixedClusterStateProvider {
    state: ClusterState,
}

impl FixedClusterStateProvider {
    /// Creates a provider around one snapshot.
    #[must_use]
    pub fn new(state: ClusterState) -> Self {
        Self { state }
    }
}

impl ClusterStateProvider for FixedClusterStateProvider {
    fn cluster_state(&self) -> ClusterState {
        self.state.clone()
    }
}

/// A provider returning fixed resource-usage snapshots.
#[derive(Default)]
pub struct FixedResourceUsageProvider {
    cluster_info: ClusterInfo,
    snapshot_shard_sizes: SnapshotShardSizes,
}

impl FixedResourceUsageProvider {
    /// Creates a provider around fixed snapshots.
    #[must_use]
    pub fn new(cluster_info: ClusterInfo, snapshot_shard_sizes: SnapshotShardSizes) -> Self {
        Self { cluster_info, snapshot_shard_sizes }
    }
}

impl ResourceUsageProvider for FixedResourceUsageProvider {
    fn cluster_info(&self) -> ClusterInfo {
        self.cluster_info.clone()
    }

    fn snapshot_shard_sizes(&self) -> SnapshotShardSizes {
        self.snapshot_shard_sizes.clone()
    }
}

/// Assembles the explanation record for an already-resolved shard.
///
/// Sets the context's debug mode from `include_all_decisions`, skips
/// decision evaluation entirely for copies mid-transition, and
/// otherwise consults the aggregator once per known node.
pub fn explain_shard(
    shard: &ShardRouting,
    ctx: &mut AllocationContext,
    cluster_info: Option<&ClusterInfo>,
    include_all_decisions: bool,
    aggregator: &dyn DecisionAggregator,
) -> AllocationExplanation {
    let mode = if include_all_decisions {
        DebugMode::On
    } else {
        DebugMode::ExcludeAllowDecisions
    };
    ctx.set_debug_mode(mode);

    let decision = if shard.is_initializing() || shard.is_relocating() {
        AllocationDecision::NotTaken
    } else {
        let node_decisions: Vec<NodeDecision> = ctx
            .nodes()
            .iter()
            .map(|node| NodeDecision {
                node_id: node.id.clone(),
                decision: aggregator.evaluate(shard, node, ctx),
            })
            .collect();
        let overall = Decision::reduce(node_decisions.iter().map(|n| n.decision.clone()));
        AllocationDecision::Taken(ShardDecision { decision: overall, node_decisions })
    };

    let lookup = |id: &Option<String>| {
        id.as_deref().and_then(|id| ctx.nodes().get(id)).cloned()
    };

    AllocationExplanation {
        shard: shard.clone(),
        current_node: lookup(&shard.current_node),
        relocating_node: lookup(&shard.relocating_node),
        cluster_info: cluster_info.cloned(),
        decision,
    }
}

/// The engine's single caller-facing entry point.
///
/// Each call builds a fresh [`AllocationContext`] from one consistent
/// provider read, so concurrent explanations never interfere and need
/// no locks between each other. The work is synchronous: a request
/// either runs to completion or fails fast with an [`ExplainError`].
pub struct AllocationExplainService {
    state_provider: Arc<dyn ClusterStateProvider>,
    usage_provider: Arc<dyn ResourceUsageProvider>,
    aggregator: Arc<dyn DecisionAggregator>,
}

impl AllocationExplainService {
    /// Creates a service over the given collaborators.
    #[must_use]
    pub fn new(
        state_provider: Arc<dyn ClusterStateProvider>,
        usage_provider: Arc<dyn ResourceUsageProvider>,
        aggregator: Arc<dyn DecisionAggregator>,
    ) -> Self {
        Self { state_provider, usage_provider, aggregator }
    }

    /// Explains the allocation of the shard named by `request`.
    ///
    /// Resolution errors propagate unchanged; no partial record is
    /// ever returned alongside an error.
    pub fn explain(
        &self,
        request: &ExplainRequest,
    ) -> Result<AllocationExplanation, ExplainError> {
        let state = self.state_provider.cluster_state();
        let cluster_info = self.usage_provider.cluster_info();
        let snapshot_sizes = self.usage_provider.snapshot_shard_sizes();
        let mut ctx =
            AllocationContext::new(state, cluster_info.clone(), snapshot_sizes, now_nanos());

        let shard = match find_shard_to_explain(&request.target, &ctx) {
            Ok(shard) => shard.clone(),
            Err(err) => {
                counter!("ballast_explain_resolution_failures").increment(1);
                return Err(err);
            }
        };
        debug!(request = %request.target, shard = %shard, "explaining allocation");

        let disk_info = request.include_disk_info.then_some(&cluster_info);
        let explanation = explain_shard(
            &shard,
            &mut ctx,
            disk_info,
            request.include_all_decisions,
            self.aggregator.as_ref(),
        );
        counter!("ballast_explanations_total").increment(1);
        Ok(explanation)
    }
}

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
