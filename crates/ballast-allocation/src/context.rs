// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Ballast Authors

//! The per-request allocation context.
//!
//! A context bundles everything one explanation needs into a single
//! consistent snapshot: cluster state, resource usage, snapshot-restore
//! size hints, and a fixed clock value. It is built fresh for each
//! request and discarded afterwards; the only mutable field is the
//! request-scoped debug mode.

use ballast_core::{ClusterInfo, ClusterState, Nodes, RoutingTable, SnapshotShardSizes};
use serde::{Deserialize, Serialize};

use crate::decision::Severity;

/// Controls how much decider reasoning is retained for explanation.
///
/// Debug mode never changes a decision's severity, only which reasons
/// survive into the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebugMode {
    /// Retain no per-decider reasons.
    #[default]
    Off,
    /// Retain every decider's reason.
    On,
    /// Retain reasons except those of allowing deciders, keeping
    /// routine explanations small.
    ExcludeAllowDecisions,
}

impl DebugMode {
    /// Returns `true` if a reason of the given severity is retained.
    #[must_use]
    pub fn retains(&self, severity: Severity) -> bool {
        match self {
            Self::Off => false,
            Self::On => true,
            Self::ExcludeAllowDecisions => severity != Severity::Allow,
        }
    }
}

/// Immutable-per-explanation snapshot of everything a placement
/// decision consults.
#[derive(Debug, Clone)]
pub struct AllocationContext {
    state: ClusterState,
    cluster_info: ClusterInfo,
    snapshot_shard_sizes: SnapshotShardSizes,
    now_nanos: u64,
    debug_mode: DebugMode,
}

impl AllocationContext {
    /// Creates a context from one consistent set of snapshots.
    ///
    /// `now_nanos` is fixed at construction so every decision within
    /// the explanation sees the same clock value.
    #[must_use]
    pub fn new(
        state: ClusterState,
        cluster_info: ClusterInfo,
        snapshot_shard_sizes: SnapshotShardSizes,
        now_nanos: u64,
    ) -> Self {
        Self {
            state,
            cluster_info,
            snapshot_shard_sizes,
            now_nanos,
            debug_mode: DebugMode::Off,
        }
    }

    /// The cluster-state snapshot.
    #[must_use]
    pub fn state(&self) -> &ClusterState {
        &self.state
    }

    /// The node set at snapshot time.
    #[must_use]
    pub fn nodes(&self) -> &Nodes {
        &self.state.nodes
    }

    /// The routing table at snapshot time.
    #[must_use]
    pub fn routing_table(&self) -> &RoutingTable {
        &self.state.routing_table
    }

    /// The resource-usage snapshot.
    #[must_use]
    pub fn cluster_info(&self) -> &ClusterInfo {
        &self.cluster_info
    }

    /// Snapshot-restore size estimates.
    #[must_use]
    pub fn snapshot_shard_sizes(&self) -> &SnapshotShardSizes {
        &self.snapshot_shard_sizes
    }

    /// The fixed clock value for this explanation, in nanoseconds.
    #[must_use]
    pub fn now_nanos(&self) -> u64 {
        self.now_nanos
    }

    /// Current debug mode.
    #[must_use]
    pub fn debug_mode(&self) -> DebugMode {
        self.debug_mode
    }

    /// Sets the debug mode for this request.
    ///
    /// Affects only how much reasoning deciders retain, never the
    /// dominant verdict.
    pub fn set_debug_mode(&mut self, mode: DebugMode) {
        self.debug_mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_mode_retention() {
        assert!(!DebugMode::Off.retains(Severity::Deny));
        assert!(!DebugMode::Off.retains(Severity::Allow));

        assert!(DebugMode::On.retains(Severity::Allow));
        assert!(DebugMode::On.retains(Severity::Deny));

        assert!(!DebugMode::ExcludeAllowDecisions.retains(Severity::Allow));
        assert!(DebugMode::ExcludeAllowDecisions.retains(Severity::Throttle));
        assert!(DebugMode::ExcludeAllowDecisions.retains(Severity::Deny));
    }

    #[test]
    fn test_context_defaults_to_debug_off() {
        let ctx = AllocationContext::new(
            ClusterState::default(),
            ClusterInfo::default(),
            SnapshotShardSizes::default(),
            42,
        );
        assert_eq!(ctx.debug_mode(), DebugMode::Off);
        assert_eq!(ctx.now_nanos(), 42);
    }
}
