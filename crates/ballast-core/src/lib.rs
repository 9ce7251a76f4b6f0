// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Ballast Authors

//! Core cluster data model for Ballast distributed shard storage.
//!
//! This crate provides the read-side view of a cluster that the
//! allocation subsystem consumes:
//! - Shard identities, routing entries, and lifecycle states
//! - Nodes and the insertion-ordered node set
//! - The routing table (shard groups and their copies)
//! - Disk-usage and snapshot-restore-size snapshots
//!
//! Nothing in this crate mutates live cluster state. Routing entries
//! are produced by the placement subsystem and consumed here as
//! immutable snapshots.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cluster_info;
pub mod node;
pub mod routing;
pub mod shard;

pub use cluster_info::{ClusterInfo, DiskUsage, SnapshotShardSizes};
pub use node::{Node, Nodes};
pub use routing::{ClusterState, RoutingError, RoutingTable, ShardGroup};
pub use shard::{ShardId, ShardRouting, ShardState};
