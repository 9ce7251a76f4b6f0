// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Ballast Authors

//! Shard identities, routing entries, and lifecycle states.

use serde::{Deserialize, Serialize};

/// Identifies a shard group: all copies of one shard of one index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShardId {
    /// Name of the index the shard belongs to.
    pub index: String,
    /// Shard number within the index.
    pub shard: u32,
}

impl ShardId {
    /// Creates a new shard id.
    #[must_use]
    pub fn new(index: impl Into<String>, shard: u32) -> Self {
        Self { index: index.into(), shard }
    }
}

impl std::fmt::Display for ShardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}][{}]", self.index, self.shard)
    }
}

/// Lifecycle state of one shard copy.
///
/// States are mutated exclusively by the placement subsystem; this
/// crate only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShardState {
    /// Not assigned to any node.
    Unassigned,
    /// Newly assigned to a node, not yet serving.
    Initializing,
    /// Assigned and serving.
    Started,
    /// Being moved from its current node to another.
    Relocating,
}

impl ShardState {
    /// Returns `true` if the shard copy is unassigned.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        matches!(self, Self::Unassigned)
    }

    /// Returns `true` if the shard copy is initializing.
    #[must_use]
    pub fn is_initializing(&self) -> bool {
        matches!(self, Self::Initializing)
    }

    /// Returns `true` if the shard copy is started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }

    /// Returns `true` if the shard copy is relocating.
    #[must_use]
    pub fn is_relocating(&self) -> bool {
        matches!(self, Self::Relocating)
    }
}

impl std::fmt::Display for ShardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unassigned => "UNASSIGNED",
            Self::Initializing => "INITIALIZING",
            Self::Started => "STARTED",
            Self::Relocating => "RELOCATING",
        };
        write!(f, "{s}")
    }
}

/// One concrete shard copy: a shard id plus role, state, and node
/// assignment.
///
/// The constructors are the only way to build a routing entry, so the
/// state/node invariants always hold: an unassigned copy has no
/// current node, an assigned copy always has one, and only a
/// relocating copy carries a relocation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardRouting {
    /// The shard group this copy belongs to.
    pub id: ShardId,
    /// Whether this copy is the group's primary.
    pub primary: bool,
    /// Current lifecycle state.
    pub state: ShardState,
    /// Node currently hosting the copy, absent when unassigned.
    pub current_node: Option<String>,
    /// Node the copy is relocating to, present only when relocating.
    pub relocating_node: Option<String>,
}

impl ShardRouting {
    /// Creates an unassigned shard copy.
    #[must_use]
    pub fn unassigned(id: ShardId, primary: bool) -> Self {
        Self { id, primary, state: ShardState::Unassigned, current_node: None, relocating_node: None }
    }

    /// Creates an initializing shard copy on the given node.
    #[must_use]
    pub fn initializing(id: ShardId, primary: bool, node: impl Into<String>) -> Self {
        Self {
            id,
            primary,
            state: ShardState::Initializing,
            current_node: Some(node.into()),
            relocating_node: None,
        }
    }

    /// Creates a started shard copy on the given node.
    #[must_use]
    pub fn started(id: ShardId, primary: bool, node: impl Into<String>) -> Self {
        Self {
            id,
            primary,
            state: ShardState::Started,
            current_node: Some(node.into()),
            relocating_node: None,
        }
    }

    /// Creates a shard copy relocating from `node` to `target`.
    #[must_use]
    pub fn relocating(
        id: ShardId,
        primary: bool,
        node: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id,
            primary,
            state: ShardState::Relocating,
            current_node: Some(node.into()),
            relocating_node: Some(target.into()),
        }
    }

    /// Returns `true` if this copy is unassigned.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.state.is_unassigned()
    }

    /// Returns `true` if this copy is initializing.
    #[must_use]
    pub fn is_initializing(&self) -> bool {
        self.state.is_initializing()
    }

    /// Returns `true` if this copy is started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state.is_started()
    }

    /// Returns `true` if this copy is relocating.
    #[must_use]
    pub fn is_relocating(&self) -> bool {
        self.state.is_relocating()
    }

    /// Role label for messages: `"primary"` or `"replica"`.
    #[must_use]
    pub fn role(&self) -> &'static str {
        if self.primary {
            "primary"
        } else {
            "replica"
        }
    }
}

impl std::fmt::Display for ShardRouting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}][{}]", self.id, self.role(), self.state)?;
        if let Some(node) = &self.current_node {
            write!(f, " on {node}")?;
        }
        if let Some(target) = &self.relocating_node {
            write!(f, " -> {target}")?;
        }
        Ok(())
    }
}
