//! Cost functions for expression extraction.
//!
//! After equality saturation the extractor picks one member of each
//! equivalence class. The rendered derivative is the extracted term, so
//! these costs decide what a reader sees.

use egg::{CostFunction, Id, Language};
use serde::{Deserialize, Serialize};

use crate::language::PropLang;

/// Which cost function the simplifier extracts with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostModel {
    /// Fewest nodes.
    #[default]
    AstSize,
    /// Node count weighted against divisions and transcendental calls.
    Weighted,
}

/// A cost function that minimizes AST size.
#[derive(Default)]
pub struct AstSizeCost;

impl CostFunction<PropLang> for AstSizeCost {
    type Cost = usize;

    fn cost<C>(&mut self, enode: &PropLang, mut costs: C) -> Self::Cost
    where
        C: FnMut(Id) -> Self::Cost,
    {
        enode.fold(1, |sum, id| sum + costs(id))
    }
}

/// A cost function that prefers products and powers over quotients
/// and plain arithmetic over repeated function calls.
#[derive(Default)]
pub struct WeightedCost;

impl CostFunction<PropLang> for WeightedCost {
    type Cost = usize;

    fn cost<C>(&mut self, enode: &PropLang, mut costs: C) -> Self::Cost
    where
        C: FnMut(Id) -> Self::Cost,
    {
        let base_cost = match enode {
            PropLang::Num(_) | PropLang::Symbol(_) | PropLang::Neg(_) => 1,
            PropLang::Add(_) | PropLang::Sub(_) | PropLang::Mul(_) => 2,
            PropLang::Div(_) | PropLang::Pow(_) | PropLang::Sqrt(_) => 3,
            PropLang::Abs(_) => 3,
            // Transcendental functions are expensive
            PropLang::Sin(_)
            | PropLang::Cos(_)
            | PropLang::Tan(_)
            | PropLang::Asin(_)
            | PropLang::Acos(_)
            | PropLang::Atan(_)
            | PropLang::Sinh(_)
            | PropLang::Cosh(_)
            | PropLang::Tanh(_)
            | PropLang::Exp(_)
            | PropLang::Ln(_) => 5,
        };

        enode.fold(base_cost, |sum, id| sum + costs(id))
    }
}
