//! The main simplification engine.
//!
//! Derivatives arrive in canonical arena form, which already folds
//! constants and collects like terms. The engine adds equality saturation
//! on top and only keeps a result that is strictly smaller.

use std::time::Duration;

use egg::{CostFunction, Extractor, RecExpr, Rewrite, Runner};
use serde::{Deserialize, Serialize};
use sigprop_core::{ExprArena, ExprHandle};

use crate::convert::{from_rec_expr, to_rec_expr};
use crate::cost::{AstSizeCost, CostModel, WeightedCost};
use crate::language::PropLang;
use crate::rules;

/// Configuration for the simplification engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifierConfig {
    /// Whether equality saturation runs at all.
    pub enabled: bool,
    /// Maximum number of iterations.
    pub iter_limit: usize,
    /// Maximum number of nodes in the e-graph.
    pub node_limit: usize,
    /// Time limit in seconds.
    pub time_limit_secs: u64,
    /// Cost function used for extraction.
    pub cost: CostModel,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            iter_limit: 12,
            node_limit: 10_000,
            time_limit_secs: 5,
            cost: CostModel::AstSize,
        }
    }
}

/// The main simplification engine.
#[derive(Clone)]
pub struct Simplifier {
    config: SimplifierConfig,
    rules: Vec<Rewrite<PropLang, ()>>,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Simplifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simplifier")
            .field("config", &self.config)
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl Simplifier {
    /// Creates a new simplifier with default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SimplifierConfig::default())
    }

    /// Creates a simplifier with custom configuration.
    #[must_use]
    pub fn with_config(config: SimplifierConfig) -> Self {
        Self {
            config,
            rules: rules::all_rules(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    /// Simplifies `expr`, returning a handle in the same arena.
    ///
    /// The input handle comes back unchanged when saturation is disabled
    /// or finds nothing strictly smaller.
    pub fn simplify(&self, arena: &mut ExprArena, expr: ExprHandle) -> ExprHandle {
        if !self.config.enabled {
            return expr;
        }
        let start = to_rec_expr(arena, expr);
        let (best, stats) = self.simplify_with_stats(&start);
        let candidate = from_rec_expr(arena, &best);

        let before = arena.tree_size(expr);
        let after = arena.tree_size(candidate);
        log::debug!(
            "saturation: {} iterations, {} nodes, {} classes, stopped by {}; size {before} -> {after}",
            stats.iterations,
            stats.egraph_nodes,
            stats.egraph_classes,
            stats.stop_reason,
        );
        if after < before {
            candidate
        } else {
            expr
        }
    }

    /// Simplifies an expression given in e-graph s-expression syntax.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression cannot be parsed.
    pub fn simplify_str(&self, expr: &str) -> Result<String, String> {
        let parsed: RecExpr<PropLang> = expr.parse().map_err(|e| format!("parse error: {e}"))?;
        let (simplified, _) = self.simplify_with_stats(&parsed);
        Ok(simplified.to_string())
    }

    /// Simplifies and returns both the result and statistics.
    #[must_use]
    pub fn simplify_with_stats(
        &self,
        expr: &RecExpr<PropLang>,
    ) -> (RecExpr<PropLang>, SimplificationStats) {
        let runner = Runner::default()
            .with_expr(expr)
            .with_iter_limit(self.config.iter_limit)
            .with_node_limit(self.config.node_limit)
            .with_time_limit(Duration::from_secs(self.config.time_limit_secs))
            .run(&self.rules);

        let stats = SimplificationStats {
            iterations: runner.iterations.len(),
            egraph_nodes: runner.egraph.total_number_of_nodes(),
            egraph_classes: runner.egraph.number_of_classes(),
            stop_reason: format!("{:?}", runner.stop_reason),
        };

        let best = match self.config.cost {
            CostModel::AstSize => extract(&runner, AstSizeCost),
            CostModel::Weighted => extract(&runner, WeightedCost),
        };
        (best, stats)
    }
}

fn extract<CF>(runner: &Runner<PropLang, ()>, cost: CF) -> RecExpr<PropLang>
where
    CF: CostFunction<PropLang>,
{
    let extractor = Extractor::new(&runner.egraph, cost);
    let (_, best) = extractor.find_best(runner.roots[0]);
    best
}

/// Statistics about the simplification process.
#[derive(Clone, Debug)]
pub struct SimplificationStats {
    /// Number of iterations run.
    pub iterations: usize,
    /// Total nodes in the e-graph.
    pub egraph_nodes: usize,
    /// Number of equivalence classes.
    pub egraph_classes: usize,
    /// Reason the runner stopped.
    pub stop_reason: String,
}
