//! The orchestrator running Parser, Validator, Engine and Renderer.

use sigprop_simplify::{Simplifier, SimplifierConfig};

use crate::compute::compute;
use crate::error::PropagationError;
use crate::model::{Digits, Equation, LastUnit, Variable};
use crate::parsing::parse;
use crate::render::{render, RenderOptions};
use crate::validation::validate;

/// Runs the propagation pipeline.
///
/// A calculator holds configuration only. Every call to [`run`] builds its
/// own parse and compute states, so one calculator can serve any number of
/// unrelated runs, from any number of threads.
///
/// [`run`]: UncertaintyCalculator::run
#[derive(Debug, Clone, Default)]
pub struct UncertaintyCalculator {
    simplifier: Simplifier,
    legacy_end_marker: bool,
}

impl UncertaintyCalculator {
    /// A calculator with the default simplifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tunes the simplification of partial derivatives.
    #[must_use]
    pub fn with_simplifier(mut self, config: SimplifierConfig) -> Self {
        self.simplifier = Simplifier::with_config(config);
        self
    }

    /// Emits the historical `\end{equation}*` marker for separate, inserted,
    /// unnumbered output, whatever the render options say.
    #[must_use]
    pub fn with_legacy_end_marker(mut self, enabled: bool) -> Self {
        self.legacy_end_marker = enabled;
        self
    }

    /// Propagates the uncertainty of `equation` and renders the derivation.
    ///
    /// # Errors
    ///
    /// Returns the first [`PropagationError`] of any stage; no markup is
    /// produced on failure.
    pub fn run(
        &self,
        equation: &Equation,
        variables: &[Variable],
        digits: Digits,
        options: &RenderOptions,
    ) -> Result<String, PropagationError> {
        log::debug!("propagating {} = {}", equation.lhs, equation.rhs);
        let state = parse(equation, variables)?;
        validate(&state)?;
        let computed = compute(&state, digits, &self.simplifier)?;

        let output = if self.legacy_end_marker && !options.legacy_end_marker {
            let options = RenderOptions {
                legacy_end_marker: true,
                ..options.clone()
            };
            render(&state, &computed, &options)
        } else {
            render(&state, &computed, options)
        };
        log::debug!("rendered {} lines", output.lines().count());
        Ok(output)
    }
}

/// Propagates with the default calculator.
///
/// # Errors
///
/// See [`UncertaintyCalculator::run`].
pub fn propagate(
    equation: &Equation,
    variables: &[Variable],
    digits: Digits,
    last_unit: LastUnit,
    separate: bool,
    insert: bool,
    include_equation_number: bool,
) -> Result<String, PropagationError> {
    let options = RenderOptions {
        last_unit,
        separate,
        insert,
        include_equation_number,
        legacy_end_marker: false,
    };
    UncertaintyCalculator::new().run(equation, variables, digits, &options)
}
