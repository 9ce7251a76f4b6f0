// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Ballast Authors

//! Read-only resource-usage snapshots.
//!
//! Disk-usage figures and snapshot-restore size hints are collected
//! elsewhere and handed to the allocation subsystem as immutable
//! snapshots. Any key may be unknown, so every lookup returns an
//! `Option`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::shard::{ShardId, ShardRouting};

/// Disk usage of one node at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskUsage {
    /// Node the figures belong to.
    pub node_id: String,
    /// Total disk capacity in bytes.
    pub total_bytes: u64,
    /// Free disk space in bytes.
    pub free_bytes: u64,
}

impl DiskUsage {
    /// Creates a disk-usage figure for a node.
    #[must_use]
    pub fn new(node_id: impl Into<String>, total_bytes: u64, free_bytes: u64) -> Self {
        Self { node_id: node_id.into(), total_bytes, free_bytes }
    }

    /// Bytes currently in use.
    #[must_use]
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.free_bytes)
    }

    /// Fraction of the disk that is free, in `[0.0, 1.0]`.
    #[must_use]
    pub fn free_ratio(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.free_bytes as f64 / self.total_bytes as f64
    }
}

/// Per-node and per-shard disk usage at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    node_disk_usage: HashMap<String, DiskUsage>,
    shard_sizes: HashMap<String, u64>,
}

impl ClusterInfo {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the disk usage of a node.
    pub fn set_node_disk_usage(&mut self, usage: DiskUsage) {
        self.node_disk_usage.insert(usage.node_id.clone(), usage);
    }

    /// Records the on-disk size of one shard copy.
    pub fn set_shard_size(&mut self, shard: &ShardRouting, bytes: u64) {
        self.shard_sizes.insert(Self::copy_key(shard), bytes);
    }

    /// Disk usage of a node, if known.
    #[must_use]
    pub fn node_disk_usage(&self, node_id: &str) -> Option<&DiskUsage> {
        self.node_disk_usage.get(node_id)
    }

    /// On-disk size of a shard copy, if known.
    #[must_use]
    pub fn shard_size(&self, shard: &ShardRouting) -> Option<u64> {
        self.shard_sizes.get(&Self::copy_key(shard)).copied()
    }

    /// Returns `true` if the snapshot holds no figures at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_disk_usage.is_empty() && self.shard_sizes.is_empty()
    }

    // Primary and replica copies of one group are sized independently.
    fn copy_key(shard: &ShardRouting) -> String {
        format!("{}/{}", shard.id, shard.role())
    }
}

/// Snapshot-restore size estimates, keyed by shard group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotShardSizes {
    sizes: HashMap<String, u64>,
}

impl SnapshotShardSizes {
    /// Creates an empty estimate set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the estimated restore size of a shard group.
    pub fn set_size(&mut self, id: &ShardId, bytes: u64) {
        self.sizes.insert(id.to_string(), bytes);
    }

    /// Estimated restore size of a shard group, if known.
    #[must_use]
    pub fn size(&self, id: &ShardId) -> Option<u64> {
        self.sizes.get(&id.to_string()).copied()
    }
}
