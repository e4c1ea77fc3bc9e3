//! The Engine stage: derivatives, mean and propagated uncertainty.
//!
//! Values are bound exactly where their text allows it (`0.1` is one
//! tenth, not a binary float), and everything else is evaluated with
//! thirty guard digits beyond the widest display precision, so rounding
//! happens once, at the end.

use sigprop_core::{diff, evaluate, Bindings, ExprArena, ExprHandle, SymbolId};
use sigprop_numeric::{transcendental, Precision, Rational};
use sigprop_simplify::Simplifier;

use crate::error::PropagationError;
use crate::format;
use crate::model::Digits;
use crate::parsing::ParseState;

/// The partial derivative with respect to one variable.
#[derive(Debug, Clone)]
pub struct PartialDerivative {
    /// The variable.
    pub symbol: SymbolId,
    /// The simplified derivative, or zero for an exact variable.
    pub expr: ExprHandle,
    /// The derivative at the measured values.
    pub value: Rational,
    /// `value` times the variable's uncertainty.
    pub contribution: Rational,
}

/// Results of the Engine.
#[derive(Debug, Clone)]
pub struct ComputeState {
    arena: ExprArena,
    derivatives: Vec<PartialDerivative>,
    result_mu: String,
    result_sigma: String,
}

impl ComputeState {
    /// The arena of the parse state extended with the derivatives.
    ///
    /// Every handle of the parse state is valid here too.
    #[must_use]
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// One entry per variable, in declaration order.
    #[must_use]
    pub fn derivatives(&self) -> &[PartialDerivative] {
        &self.derivatives
    }

    /// The rounded mean.
    #[must_use]
    pub fn result_mu(&self) -> &str {
        &self.result_mu
    }

    /// The rounded uncertainty.
    #[must_use]
    pub fn result_sigma(&self) -> &str {
        &self.result_sigma
    }
}

/// Runs the Engine on a validated parse state.
///
/// # Errors
///
/// Returns [`PropagationError::Evaluation`] when the formula, a value or a
/// derivative cannot be evaluated, and [`PropagationError::Internal`] when
/// a symbol has no value.
pub fn compute(
    state: &ParseState,
    digits: Digits,
    simplifier: &Simplifier,
) -> Result<ComputeState, PropagationError> {
    let precision = Precision::for_display(digits.mu().max(digits.sigma()));
    let mut arena = state.arena().clone();
    let eval = |arena: &ExprArena, expr: ExprHandle, bindings: &Bindings| {
        evaluate(arena, expr, bindings, precision).map_err(PropagationError::from_evaluation)
    };

    let constants = Bindings::new();
    let mut bindings = Bindings::new();
    let mut uncertainties = Vec::with_capacity(state.variables().len());
    for variable in state.variables() {
        bindings.insert(variable.symbol, eval(&arena, variable.value, &constants)?);
        uncertainties.push(eval(&arena, variable.uncertainty, &constants)?);
    }

    let rhs = state.equation_right();
    let mut derivatives = Vec::with_capacity(state.variables().len());
    for (variable, uncertainty) in state.variables().iter().zip(&uncertainties) {
        if !variable.has_uncertainty {
            derivatives.push(PartialDerivative {
                symbol: variable.symbol,
                expr: arena.integer(0),
                value: Rational::from(0),
                contribution: Rational::from(0),
            });
            continue;
        }

        let raw = diff(&mut arena, rhs, variable.symbol);
        let expr = simplifier.simplify(&mut arena, raw);
        let value = eval(&arena, expr, &bindings)?;
        log::trace!(
            "d/d{}: {} nodes, simplified to {}",
            arena.symbol_name(variable.symbol),
            arena.tree_size(raw),
            arena.tree_size(expr)
        );
        derivatives.push(PartialDerivative {
            symbol: variable.symbol,
            expr,
            contribution: value.clone() * uncertainty.clone(),
            value,
        });
    }

    let mean = eval(&arena, rhs, &bindings)?;
    let sum_squares = derivatives
        .iter()
        .fold(Rational::from(0), |sum, d| {
            sum + d.contribution.clone() * d.contribution.clone()
        });
    let sigma = transcendental::sqrt(&sum_squares, precision)
        .map_err(|e| PropagationError::Evaluation(e.into()))?;

    let result_mu = format::rounded(&mean, digits.mu());
    let result_sigma = format::rounded(&sigma, digits.sigma());
    log::debug!("computed {result_mu} ± {result_sigma} at {} digits", precision.digits());

    Ok(ComputeState {
        arena,
        derivatives,
        result_mu,
        result_sigma,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Equation, Variable};
    use crate::parsing::parse;
    use sigprop_core::LatexPrinter;

    fn run(equation: &Equation, variables: &[Variable], digits: Digits) -> (ParseState, ComputeState) {
        let state = parse(equation, variables).unwrap();
        let computed = compute(&state, digits, &Simplifier::new()).unwrap();
        (state, computed)
    }

    #[test]
    fn test_linear_propagation() {
        let equation = Equation::new("y", "m*x + b");
        let variables = [
            Variable::new("m", "2.5", "0.1", "m"),
            Variable::new("x", "4.0", "0.2", "x"),
            Variable::new("b", "1.0", "0.5", "b"),
        ];
        let (_, computed) = run(&equation, &variables, Digits::new(3, 2).unwrap());

        assert_eq!(computed.result_mu(), "11.0");
        assert_eq!(computed.result_sigma(), "0.81");

        let printer = LatexPrinter::new(computed.arena());
        let shown: Vec<String> = computed
            .derivatives()
            .iter()
            .map(|d| printer.print(d.expr))
            .collect();
        assert_eq!(shown, ["x", "m", "1"]);
        assert_eq!(computed.derivatives()[1].value, "2.5".parse().unwrap());
        assert_eq!(computed.derivatives()[0].contribution, "0.4".parse().unwrap());
    }

    #[test]
    fn test_zero_uncertainty_sets_zero_derivative_and_sigma() {
        let equation = Equation::new("y", "x**2");
        let variables = [Variable::new("x", "3", "0", "x")];
        let (_, computed) = run(&equation, &variables, Digits::new(2, 2).unwrap());

        let derivative = &computed.derivatives()[0];
        assert!(computed.arena().is_zero(derivative.expr));
        assert_eq!(derivative.value, Rational::from(0));
        assert_eq!(computed.result_mu(), "9.0");
        assert_eq!(computed.result_sigma(), "0");
    }

    #[test]
    fn test_irrational_inputs_round_once() {
        let equation = Equation::new("y", "x*3");
        let variables = [Variable::new("x", "1/sqrt(3)", "1/sqrt(3)", "x")];
        let (_, computed) = run(&equation, &variables, Digits::new(4, 4).unwrap());

        // 3/sqrt(3) = sqrt(3) = 1.7320508...
        assert_eq!(computed.result_mu(), "1.732");
        assert_eq!(computed.result_sigma(), "1.732");
    }

    #[test]
    fn test_parse_state_is_untouched() {
        let equation = Equation::new("y", "a*b");
        let variables = [
            Variable::new("a", "2", "0.1", "a"),
            Variable::new("b", "3", "0.1", "b"),
        ];
        let state = parse(&equation, &variables).unwrap();
        let before = state.arena().len();
        let computed = compute(&state, Digits::default(), &Simplifier::new()).unwrap();
        assert_eq!(state.arena().len(), before);
        assert!(computed.arena().len() >= before);
    }

    #[test]
    fn test_domain_errors_surface() {
        let equation = Equation::new("y", "log(x)");
        let variables = [Variable::new("x", "-1", "0.1", "x")];
        let state = parse(&equation, &variables).unwrap();
        let err = compute(&state, Digits::default(), &Simplifier::new()).unwrap_err();
        assert!(matches!(err, PropagationError::Evaluation(_)));
    }
}
