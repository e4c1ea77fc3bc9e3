//! The Parser stage: typed inputs to a [`ParseState`].

use hashbrown::HashSet;
use sigprop_core::{
    evaluate, parse_expr, Bindings, ExprArena, ExprHandle, LabelMap, SymbolId, SymbolScope,
};
use sigprop_numeric::Precision;

use crate::error::PropagationError;
use crate::format;
use crate::model::{Equation, Variable};

/// One declared variable after parsing.
#[derive(Debug, Clone)]
pub struct ParsedVariable {
    /// The variable's symbol in the arena.
    pub symbol: SymbolId,
    /// Display label of the variable.
    pub label: String,
    /// Display label of its uncertainty, `\sigma_{label}`.
    pub uncertainty_label: String,
    /// The value as a numeric expression.
    pub value: ExprHandle,
    /// The uncertainty as a numeric expression.
    pub uncertainty: ExprHandle,
    /// The value as shown in substituted formulas, `\left(...\right)`.
    pub value_markup: String,
    /// The uncertainty rounded to two significant digits.
    pub uncertainty_markup: String,
    /// Whether the uncertainty is nonzero.
    pub has_uncertainty: bool,
}

/// Everything the later stages need from the inputs.
///
/// Built fresh for every run; nothing in it outlives the run.
#[derive(Debug, Clone)]
pub struct ParseState {
    arena: ExprArena,
    variables: Vec<ParsedVariable>,
    symbol_labels: LabelMap,
    value_labels: LabelMap,
    equation_left: String,
    equation_right: ExprHandle,
}

impl ParseState {
    /// The arena holding the formula and every value expression.
    #[must_use]
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// The variables in declaration order.
    #[must_use]
    pub fn variables(&self) -> &[ParsedVariable] {
        &self.variables
    }

    /// Symbol to display label.
    #[must_use]
    pub fn symbol_labels(&self) -> &LabelMap {
        &self.symbol_labels
    }

    /// Symbol to bracketed value markup.
    #[must_use]
    pub fn value_labels(&self) -> &LabelMap {
        &self.value_labels
    }

    /// Display label of the result.
    #[must_use]
    pub fn equation_left(&self) -> &str {
        &self.equation_left
    }

    /// The parsed formula.
    #[must_use]
    pub fn equation_right(&self) -> ExprHandle {
        self.equation_right
    }

    /// Whether any variable contributes to the uncertainty.
    #[must_use]
    pub fn has_uncertainty(&self) -> bool {
        self.variables.iter().any(|v| v.has_uncertainty)
    }

    /// The declared variable with the given symbol.
    #[must_use]
    pub fn variable(&self, symbol: SymbolId) -> Option<&ParsedVariable> {
        self.variables.iter().find(|v| v.symbol == symbol)
    }
}

/// Parses an equation and its variables.
///
/// # Errors
///
/// Returns [`PropagationError::InvalidName`] or
/// [`PropagationError::DuplicateVariable`] for bad declarations,
/// [`PropagationError::InvalidNumber`] when a value or uncertainty is not
/// a numeric expression and [`PropagationError::InvalidEquation`] when the
/// formula does not parse.
pub fn parse(equation: &Equation, variables: &[Variable]) -> Result<ParseState, PropagationError> {
    let mut arena = ExprArena::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut parsed = Vec::with_capacity(variables.len());
    let mut symbol_labels = LabelMap::new();
    let mut value_labels = LabelMap::new();

    for variable in variables {
        let name = variable.name.as_str();
        if !is_identifier(name) {
            return Err(PropagationError::InvalidName(name.to_string()));
        }
        if !seen.insert(name) {
            return Err(PropagationError::DuplicateVariable(name.to_string()));
        }

        let symbol = arena.symbol_id(name);
        let label = variable.latex_name.trim().to_string();
        let value = parse_number(&mut arena, name, "value", &variable.value.to_source())?;
        let uncertainty =
            parse_number(&mut arena, name, "uncertainty", &variable.uncertainty.to_source())?;

        let value_markup = format::bracketed(&format::latex_number(&arena, value));
        let shown = evaluate(
            &arena,
            uncertainty,
            &Bindings::new(),
            Precision::for_display(format::INTERMEDIATE_DIGITS),
        )
        .map_err(|source| PropagationError::InvalidNumber {
            name: name.to_string(),
            field: "uncertainty",
            source,
        })?;

        symbol_labels.insert(symbol, label.clone());
        value_labels.insert(symbol, value_markup.clone());
        parsed.push(ParsedVariable {
            symbol,
            uncertainty_label: format::sigma_label(&label),
            label,
            value,
            uncertainty,
            value_markup,
            uncertainty_markup: format::intermediate(&shown),
            has_uncertainty: !arena.is_zero(uncertainty),
        });
    }

    let scope = SymbolScope::with_declared(variables.iter().map(|v| v.name.clone()));
    let equation_right = parse_expr(&mut arena, &equation.rhs, &scope).map_err(|source| {
        PropagationError::InvalidEquation {
            rhs: equation.rhs.clone(),
            source,
        }
    })?;

    log::debug!(
        "parsed '{}' with {} variables ({} uncertain)",
        equation.rhs,
        parsed.len(),
        parsed.iter().filter(|v| v.has_uncertainty).count()
    );

    Ok(ParseState {
        arena,
        variables: parsed,
        symbol_labels,
        value_labels,
        equation_left: equation.lhs.clone(),
        equation_right,
    })
}

fn parse_number(
    arena: &mut ExprArena,
    name: &str,
    field: &'static str,
    text: &str,
) -> Result<ExprHandle, PropagationError> {
    parse_expr(arena, text, &SymbolScope::numeric()).map_err(|source| {
        PropagationError::InvalidNumber {
            name: name.to_string(),
            field,
            source,
        }
    })
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
