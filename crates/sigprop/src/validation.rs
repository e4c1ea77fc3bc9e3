//! The Validator stage.

use crate::error::PropagationError;
use crate::parsing::ParseState;

/// Checks that the formula only uses declared variables.
///
/// Differentiating with respect to an undeclared name would quietly give
/// zero, so this has to run before the Engine.
///
/// # Errors
///
/// Returns [`PropagationError::UndefinedSymbol`] naming the first
/// undeclared symbol in alphabetical order.
pub fn validate(state: &ParseState) -> Result<(), PropagationError> {
    let arena = state.arena();
    for symbol in arena.free_symbols(state.equation_right()) {
        if state.variable(symbol).is_none() {
            return Err(PropagationError::UndefinedSymbol(
                arena.symbol_name(symbol).to_string(),
            ));
        }
    }
    Ok(())
}
