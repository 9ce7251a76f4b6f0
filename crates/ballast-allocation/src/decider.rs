// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Ballast Authors

//! Decider seam and verdict aggregation.
//!
//! Concrete placement constraints (disk watermarks, awareness rules,
//! shard-count limits, ...) live outside this crate and plug in via
//! [`AllocationDecider`]. The engine consumes only the aggregate
//! contract, [`DecisionAggregator`]: one ranked verdict per
//! shard-against-node evaluation.

use ballast_core::{Node, ShardRouting};

use crate::context::AllocationContext;
use crate::decision::{Decision, DecisionReason, Severity};

/// One decider's verdict for a shard-against-node placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeciderVerdict {
    /// Severity the decider votes for.
    pub severity: Severity,
    /// Free-text rationale.
    pub explanation: String,
}

impl DeciderVerdict {
    /// Creates a verdict.
    #[must_use]
    pub fn new(severity: Severity, explanation: impl Into<String>) -> Self {
        Self { severity, explanation: explanation.into() }
    }
}

/// An independent constraint evaluator contributing one verdict toward
/// a placement decision.
pub trait AllocationDecider: Send + Sync {
    /// Stable identifier used in explanation output.
    fn name(&self) -> &'static str;

    /// Evaluates placing `shard` on `node` against this constraint.
    fn evaluate(
        &self,
        shard: &ShardRouting,
        node: &Node,
        ctx: &AllocationContext,
    ) -> DeciderVerdict;
}

/// The aggregate verdict contract the explanation engine consumes.
pub trait DecisionAggregator: Send + Sync {
    /// Evaluates placing `shard` on `node`, returning the combined
    /// verdict with reasons retained per the context's debug mode.
    fn evaluate(&self, shard: &ShardRouting, node: &Node, ctx: &AllocationContext) -> Decision;
}

/// An ordered collection of deciders, combined by pure reduction.
///
/// The dominant severity is the maximum across decider verdicts; a
/// verdict's reason is retained only when the context's debug mode
/// says so. Decider order is preserved in the retained reasons.
#[derive(Default)]
pub struct AllocationDeciders {
    deciders: Vec<Box<dyn AllocationDecider>>,
}

impl AllocationDeciders {
    /// Creates an aggregator over the given deciders, evaluated in
    /// order.
    #[must_use]
    pub fn new(deciders: Vec<Box<dyn AllocationDecider>>) -> Self {
        Self { deciders }
    }

    /// Number of registered deciders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deciders.len()
    }

    /// Returns `true` if no deciders are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deciders.is_empty()
    }
}

impl DecisionAggregator for AllocationDeciders {
    fn evaluate(&self, shard: &ShardRouting, node: &Node, ctx: &AllocationContext) -> Decision {
        let mut decision = Decision::allow();
        for decider in &self.deciders {
            let verdict = decider.evaluate(shard, node, ctx);
            decision.severity = decision.severity.merge(verdict.severity);
            if ctx.debug_mode().retains(verdict.severity) {
                decision.push_reason(DecisionReason {
                    decider: decider.name().to_string(),
                    severity: verdict.severity,
                    explanation: verdict.explanation,
                });
            }
        }
        decision
    }
}

/// A decider returning the same verdict for every evaluation.
///
/// Useful for wiring and tests, in the same spirit as the no-op
/// collaborator implementations elsewhere in the workspace.
pub struct FixedDecider {
    name: &'static str,
    severity: Severity,
    explanation: String,
}

impl FixedDecider {
    /// Creates a fixed decider.
    #[must_use]
    pub fn new(name: &'static str, severity: Severity, explanation: impl Into<String>) -> Self {
        Self { name, severity, explanation: explanation.into() }
    }
}

impl AllocationDecider for FixedDecider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn evaluate(
        &self,
        _shard: &ShardRouting,
        _node: &Node,
        _ctx: &AllocationContext,
    ) -> DeciderVerdict {
        DeciderVerdict::new(self.severity, self.explanation.clone())
    }
}
