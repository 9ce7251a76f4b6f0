// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Ballast Authors

//! Decision verdicts and their combination rules.
//!
//! A placement decision is a severity plus the reasons that produced
//! it. Severities combine by most-restrictive-wins: `Deny` dominates
//! `Throttle` dominates `Allow`. Combination is a pure reduction over
//! an ordered sequence of verdicts; reason order is preserved.

use serde::{Deserialize, Serialize};

/// Severity of a placement verdict.
///
/// The derived ordering puts `Allow` lowest and `Deny` highest, so the
/// most restrictive severity of a set is its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Placement is allowed.
    Allow,
    /// Placement is allowed but must wait (e.g. recovery limits).
    Throttle,
    /// Placement is not allowed.
    Deny,
}

impl Severity {
    /// Combines two severities, most restrictive wins.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Allow => "ALLOW",
            Self::Throttle => "THROTTLE",
            Self::Deny => "DENY",
        };
        write!(f, "{s}")
    }
}

/// One decider's contribution to a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionReason {
    /// Identifier of the decider that produced the reason.
    pub decider: String,
    /// Severity the decider voted for.
    pub severity: Severity,
    /// Free-text rationale.
    pub explanation: String,
}

/// A placement verdict: the dominant severity plus retained reasons.
///
/// How many reasons are retained depends on the debug mode the
/// decision was computed under; dropping reasons never changes the
/// severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Dominant severity.
    pub severity: Severity,
    /// Reasons retained for explanation, in evaluation order.
    pub reasons: Vec<DecisionReason>,
}

impl Decision {
    /// An `Allow` decision with no reasons.
    #[must_use]
    pub fn allow() -> Self {
        Self { severity: Severity::Allow, reasons: Vec::new() }
    }

    /// A single-reason decision.
    #[must_use]
    pub fn single(
        decider: impl Into<String>,
        severity: Severity,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            reasons: vec![DecisionReason {
                decider: decider.into(),
                severity,
                explanation: explanation.into(),
            }],
        }
    }

    /// Appends a reason without touching the severity.
    pub fn push_reason(&mut self, reason: DecisionReason) {
        self.reasons.push(reason);
    }

    /// Combines two decisions: most restrictive severity wins, reasons
    /// concatenate in input order.
    #[must_use]
    pub fn combine(mut self, other: Self) -> Self {
        self.severity = self.severity.merge(other.severity);
        self.reasons.extend(other.reasons);
        self
    }

    /// Folds an ordered sequence of decisions into one.
    ///
    /// An empty sequence reduces to `Allow` with no reasons: nothing
    /// objected.
    #[must_use]
    pub fn reduce(decisions: impl IntoIterator<Item = Self>) -> Self {
        decisions.into_iter().fold(Self::allow(), Self::combine)
    }
}

/// A decision about one candidate node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDecision {
    /// The candidate node.
    pub node_id: String,
    /// Verdict for placing the shard on that node.
    pub decision: Decision,
}

/// The full verdict for one shard: the overall decision plus the
/// per-node decisions it was reduced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardDecision {
    /// Overall verdict, most-restrictive-wins over the node decisions.
    pub decision: Decision,
    /// Per-node verdicts in node-set order.
    pub node_decisions: Vec<NodeDecision>,
}

/// Outcome of the decision phase for one explanation.
///
/// `NotTaken` is a deliberate short-circuit for shards mid-transition,
/// distinct from a taken decision with no reasons: callers can never
/// mistake "no decision was computed" for "allowed with nothing to
/// say".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationDecision {
    /// No decision was computed; the shard was mid-transition.
    NotTaken,
    /// A decision was computed.
    Taken(ShardDecision),
}

impl AllocationDecision {
    /// Returns `true` if a decision was computed.
    #[must_use]
    pub fn is_taken(&self) -> bool {
        matches!(self, Self::Taken(_))
    }

    /// The computed decision, if one was taken.
    #[must_use]
    pub fn decision(&self) -> Option<&ShardDecision> {
        match self {
            Self::NotTaken => None,
            Self::Taken(d) => Some(d),
        }
    }
}
