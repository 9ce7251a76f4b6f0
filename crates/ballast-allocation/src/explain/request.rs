// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Ballast Authors

//! Explanation requests.

use serde::{Deserialize, Serialize};

/// Which shard copy an explanation request is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplainTarget {
    /// Explain the first unassigned shard found, in natural routing
    /// order.
    AnyUnassigned,
    /// Explain the primary of an index shard.
    Primary {
        /// Index name.
        index: String,
        /// Shard number.
        shard: u32,
        /// Node (id or name) the primary is claimed to be on.
        node: Option<String>,
    },
    /// Explain a replica of an index shard.
    Replica {
        /// Index name.
        index: String,
        /// Shard number.
        shard: u32,
        /// Node (id or name) the replica is claimed to be on.
        node: Option<String>,
    },
}

impl std::fmt::Display for ExplainTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AnyUnassigned => write!(f, "any unassigned shard"),
            Self::Primary { index, shard, node } => {
                write!(f, "primary of [{index}][{shard}]")?;
                if let Some(node) = node {
                    write!(f, " on [{node}]")?;
                }
                Ok(())
            }
            Self::Replica { index, shard, node } => {
                write!(f, "replica of [{index}][{shard}]")?;
                if let Some(node) = node {
                    write!(f, " on [{node}]")?;
                }
                Ok(())
            }
        }
    }
}

/// A full explanation request: the target plus output flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainRequest {
    /// The shard copy to explain.
    pub target: ExplainTarget,
    /// Whether to attach the disk-usage snapshot to the record.
    pub include_disk_info: bool,
    /// Whether to retain reasons of allowing deciders as well.
    pub include_all_decisions: bool,
}

impl ExplainRequest {
    /// Creates a request with both output flags off.
    #[must_use]
    pub fn new(target: ExplainTarget) -> Self {
        Self { target, include_disk_info: false, include_all_decisions: false }
    }

    /// Attaches the disk-usage snapshot to the resulting record.
    #[must_use]
    pub fn with_disk_info(mut self) -> Self {
        self.include_disk_info = true;
        self
    }

    /// Retains allowing deciders' reasons in the resulting record.
    #[must_use]
    pub fn with_all_decisions(mut self) -> Self {
        self.include_all_decisions = true;
        self
    }
}
