// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Ballast Authors

//! Shard resolution and allocation-explanation engine for Ballast.
//!
//! This crate answers one question: for a single shard copy, is its
//! current or candidate placement allowed, and why? It provides:
//! - A severity-ranked decision contract (`Allow`/`Throttle`/`Deny`,
//!   most restrictive wins) with debug-controlled reason retention
//! - A per-request [`AllocationContext`] snapshot
//! - A deterministic shard resolver for ambiguous requests
//! - The explanation assembler and the [`AllocationExplainService`]
//!   entry point
//!
//! The crate never moves shards and never mutates cluster state; the
//! rebalancer and the concrete placement constraints are external
//! collaborators behind the [`AllocationDecider`] and provider seams.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use ballast_allocation::{
//!     AllocationDeciders, AllocationExplainService, ExplainRequest, ExplainTarget,
//!     FixedClusterStateProvider, FixedDecider, FixedResourceUsageProvider, Severity,
//! };
//! use ballast_core::{ClusterState, Node, Nodes, RoutingTable, ShardGroup, ShardId, ShardRouting};
//!
//! let mut nodes = Nodes::new();
//! nodes.add(Node::new("n1", "alpha")).unwrap();
//!
//! let id = ShardId::new("logs", 0);
//! let group = ShardGroup::new(ShardRouting::unassigned(id, true), vec![]).unwrap();
//! let mut routing_table = RoutingTable::new();
//! routing_table.add_group(group).unwrap();
//!
//! let service = AllocationExplainService::new(
//!     Arc::new(FixedClusterStateProvider::new(ClusterState::new(1, nodes, routing_table))),
//!     Arc::new(FixedResourceUsageProvider::default()),
//!     Arc::new(AllocationDeciders::new(vec![Box::new(FixedDecider::new(
//!         "disk",
//!         Severity::Deny,
//!         "disk watermark exceeded",
//!     ))])),
//! );
//!
//! let explanation = service.explain(&ExplainRequest::new(ExplainTarget::AnyUnassigned)).unwrap();
//! assert!(explanation.decision.is_taken());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod decider;
pub mod decision;
pub mod explain;

pub use context::{AllocationContext, DebugMode};
pub use decider::{
    AllocationDecider, AllocationDeciders, DeciderVerdict, DecisionAggregator, FixedDecider,
};
pub use decision::{
    AllocationDecision, Decision, DecisionReason, NodeDecision, Severity, ShardDecision,
};
pub use explain::{
    explain_shard, find_shard_to_explain, replica_rank, AllocationExplainService,
    AllocationExplanation, ClusterStateProvider, ExplainError, ExplainRequest, ExplainTarget,
    FixedClusterStateProvider, FixedResourceUsageProvider, ResourceUsageProvider,
};
