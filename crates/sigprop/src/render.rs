//! The Renderer stage.
//!
//! Output is one `equation` environment holding an `aligned` block, or
//! four environments (formula, derivatives, uncertainty, result) separated
//! by blank lines. Every line is terminated by `\n`.

use serde::{Deserialize, Serialize};

use crate::compute::ComputeState;
use crate::format;
use crate::model::LastUnit;
use crate::parsing::ParseState;

/// Presentation switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Unit markup for the mean and uncertainty.
    pub last_unit: LastUnit,
    /// Four environments instead of one.
    pub separate: bool,
    /// Show every formula once more with the values substituted.
    pub insert: bool,
    /// Numbered `equation` instead of `equation*`.
    pub include_equation_number: bool,
    /// Close the final environment of a separate, inserted, unnumbered
    /// derivation with the historical `\end{equation}*`.
    pub legacy_end_marker: bool,
}

/// Renders a complete derivation.
#[must_use]
pub fn render(state: &ParseState, computed: &ComputeState, options: &RenderOptions) -> String {
    let mut renderer = Renderer {
        state,
        computed,
        options,
        out: String::new(),
    };
    if options.separate {
        renderer.separate();
    } else {
        renderer.combined();
    }
    renderer.out
}

struct Renderer<'a> {
    state: &'a ParseState,
    computed: &'a ComputeState,
    options: &'a RenderOptions,
    out: String,
}

impl Renderer<'_> {
    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn star(&self) -> &'static str {
        if self.options.include_equation_number {
            ""
        } else {
            "*"
        }
    }

    fn env_start(&mut self, aligned: bool) {
        let begin = format!("\\begin{{equation{}}}", self.star());
        self.line(&begin);
        if aligned {
            self.line("\\begin{aligned}");
        }
    }

    fn env_end(&mut self, aligned: bool) {
        if aligned {
            self.line("\\end{aligned}");
        }
        let end = format!("\\end{{equation{}}}", self.star());
        self.line(&end);
    }

    fn unit(&self) -> Option<&str> {
        self.options.last_unit.as_deref()
    }

    fn combined(&mut self) {
        self.env_start(true);
        self.equation_definition(true);
        self.partial_derivatives(true);
        self.line("\\\\");
        self.uncertainty();
        self.result_line(true);
        self.env_end(true);
    }

    fn separate(&mut self) {
        self.env_start(false);
        self.equation_definition(false);
        self.env_end(false);
        self.line("");

        self.env_start(true);
        self.partial_derivatives(true);
        self.env_end(true);
        self.line("");

        self.env_start(true);
        self.uncertainty();
        self.env_end(true);
        self.line("");

        self.env_start(false);
        self.result_line(false);
        let options = self.options;
        if options.legacy_end_marker && options.insert && !options.include_equation_number {
            self.line("\\end{equation}*");
        } else {
            self.env_end(false);
        }
    }

    /// `y = formula [= substituted] = mean`
    fn equation_definition(&mut self, aligned: bool) {
        let (state, computed) = (self.state, self.computed);
        let arena = computed.arena();
        let rhs = state.equation_right();

        let mut text = format!(
            "{}{}{}=",
            state.equation_left(),
            separator(aligned),
            format::latex_symbol(arena, state.symbol_labels(), rhs)
        );
        if self.options.insert {
            text.push_str(&format::latex_value(arena, state.value_labels(), rhs));
            text.push('=');
        }
        text.push_str(&format::with_unit(computed.result_mu(), self.unit()));
        if aligned {
            text.push_str("\\\\\n\\\\");
        }
        self.line(&text);
    }

    fn partial_derivatives(&mut self, aligned: bool) {
        let (state, computed) = (self.state, self.computed);
        let arena = computed.arena();
        for (variable, derivative) in state.variables().iter().zip(computed.derivatives()) {
            if !variable.has_uncertainty {
                continue;
            }
            let mut text = format!(
                "{}{}{}=",
                format::partial(state.equation_left(), &variable.label),
                separator(aligned),
                format::latex_symbol(arena, state.symbol_labels(), derivative.expr)
            );
            if self.options.insert {
                text.push_str(&format::latex_value(arena, state.value_labels(), derivative.expr));
                text.push('=');
            }
            text.push_str(&format::intermediate(&derivative.value));
            text.push_str("\\\\");
            self.line(&text);
        }
    }

    fn uncertainty(&mut self) {
        let (state, computed) = (self.state, self.computed);
        let sigma = format::sigma_label(state.equation_left());
        let result = format::with_unit(computed.result_sigma(), self.unit());
        let close = if self.options.separate { "" } else { "\\\\\n\\\\" };

        if !state.has_uncertainty() {
            self.line(&format!("{sigma}&={result}{close}"));
            return;
        }

        let contributing: Vec<_> = state
            .variables()
            .iter()
            .zip(computed.derivatives())
            .filter(|(variable, _)| variable.has_uncertainty)
            .collect();

        let symbolic = root(contributing.iter().map(|(variable, _)| {
            format!(
                "\\left({} {}\\right)^2",
                format::partial(state.equation_left(), &variable.label),
                variable.uncertainty_label
            )
        }));
        self.line(&format!("{sigma}&={symbolic}\\\\"));

        if self.options.insert {
            let substituted = root(contributing.iter().map(|(variable, derivative)| {
                format!(
                    "\\left({} \\times {}\\right)^2",
                    format::intermediate(&derivative.value),
                    variable.uncertainty_markup
                )
            }));
            self.line(&format!("&={substituted}\\\\"));
        }

        let numeric = root(contributing.iter().map(|(_, derivative)| {
            format!(
                "\\left({}\\right)^2",
                format::intermediate(&derivative.contribution)
            )
        }));
        self.line(&format!("&={numeric}\\\\"));
        self.line(&format!("&={result}{close}"));
    }

    fn result_line(&mut self, aligned: bool) {
        let (state, computed) = (self.state, self.computed);
        let label = state.equation_left();
        let mu = computed.result_mu();
        let sigma = computed.result_sigma();
        let text = match self.unit() {
            None => format!("{label}{}{mu} \\pm {sigma}", separator(aligned)),
            Some(unit) => format!(
                "{label}{}\\left ({mu} \\pm {sigma} \\right )\\ {unit}",
                separator(aligned)
            ),
        };
        self.line(&text);
    }
}

fn separator(aligned: bool) -> &'static str {
    if aligned {
        "&="
    } else {
        "="
    }
}

/// `\sqrt{t1+t2+...}`
fn root(terms: impl Iterator<Item = String>) -> String {
    format!("\\sqrt{{{}}}", terms.collect::<Vec<_>>().join("+"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::compute;
    use crate::model::{Digits, Equation, Variable};
    use crate::parsing::parse;
    use sigprop_simplify::Simplifier;

    fn linear(options: &RenderOptions) -> String {
        let equation = Equation::new("y", "m*x + b");
        let variables = [
            Variable::new("m", "2.5", "0.1", "m"),
            Variable::new("x", "4.0", "0.2", "x"),
            Variable::new("b", "1.0", "0.5", "b"),
        ];
        let state = parse(&equation, &variables).unwrap();
        let computed = compute(&state, Digits::new(3, 2).unwrap(), &Simplifier::new()).unwrap();
        render(&state, &computed, options)
    }

    #[test]
    fn test_combined_contains_sigma_line() {
        let out = linear(&RenderOptions::default());
        assert!(out.contains(
            "\\sigma_{y}&=\\sqrt{\\left(\\frac{\\partial y }{\\partial m } \\sigma_{m}\\right)^2+"
        ));
        assert!(out.contains("&=\\sqrt{\\left(0.4\\right)^2+\\left(0.5\\right)^2+\\left(0.5\\right)^2}\\\\\n"));
        assert!(out.starts_with("\\begin{equation*}\n\\begin{aligned}\n"));
    }

    #[test]
    fn test_insert_lines() {
        let out = linear(&RenderOptions {
            insert: true,
            ..RenderOptions::default()
        });
        assert!(out.contains(
            "y&=b + m x=\\left(1.0\\right) + \\left(2.5\\right) \\times \\left(4.0\\right)=11.0\\\\\n"
        ));
        assert!(out.contains("\\frac{\\partial y }{\\partial m }&=x=\\left(4.0\\right)=4.0\\\\\n"));
        assert!(out.contains("&=\\sqrt{\\left(4.0 \\times 0.1\\right)^2+\\left(2.5 \\times 0.2\\right)^2+\\left(1.0 \\times 0.5\\right)^2}\\\\\n"));
    }

    #[test]
    fn test_unit_placement() {
        let out = linear(&RenderOptions {
            last_unit: Some("\\si{m}".to_string()),
            ..RenderOptions::default()
        });
        assert!(out.contains("=11.0\\ \\si{m}\\\\\n"));
        assert!(out.contains("&=0.81\\ \\si{m}\\\\\n"));
        assert!(out.contains("y&=\\left (11.0 \\pm 0.81 \\right )\\ \\si{m}\n"));
    }

    #[test]
    fn test_numbered_environments() {
        let out = linear(&RenderOptions {
            include_equation_number: true,
            ..RenderOptions::default()
        });
        assert!(out.starts_with("\\begin{equation}\n"));
        assert!(out.ends_with("\\end{aligned}\n\\end{equation}\n"));
        assert!(!out.contains('*'));
    }

    #[test]
    fn test_separate_layout() {
        let out = linear(&RenderOptions {
            separate: true,
            ..RenderOptions::default()
        });
        assert_eq!(out.matches("\\begin{equation*}").count(), 4);
        assert_eq!(out.matches("\\begin{aligned}").count(), 2);
        assert!(out.starts_with("\\begin{equation*}\ny=b + m x=11.0\n\\end{equation*}\n\n"));
        assert!(out.contains("&=0.81\n\\end{aligned}\n\\end{equation*}\n\n"));
        assert!(out.ends_with("\\begin{equation*}\ny=11.0 \\pm 0.81\n\\end{equation*}\n"));
    }

    #[test]
    fn test_end_marker() {
        let options = RenderOptions {
            separate: true,
            insert: true,
            ..RenderOptions::default()
        };
        assert!(linear(&options).ends_with("\\end{equation*}\n"));

        let legacy = RenderOptions {
            legacy_end_marker: true,
            ..options
        };
        assert!(linear(&legacy).ends_with("y=11.0 \\pm 0.81\n\\end{equation}*\n"));
    }

    #[test]
    fn test_zero_uncertainty_short_circuit() {
        let equation = Equation::new("y", "x");
        let variables = [Variable::new("x", "1", "0", "x")];
        let state = parse(&equation, &variables).unwrap();
        let computed = compute(&state, Digits::new(2, 2).unwrap(), &Simplifier::new()).unwrap();

        let out = render(&state, &computed, &RenderOptions::default());
        assert!(out.contains("\\sigma_{y}&=0\\\\\n\\\\\n"));
        assert!(!out.contains("\\sqrt"));
        assert!(!out.contains("\\partial"));

        let separate = RenderOptions {
            separate: true,
            ..RenderOptions::default()
        };
        let out = render(&state, &computed, &separate);
        assert!(out.contains("\\begin{aligned}\n\\sigma_{y}&=0\n\\end{aligned}"));
        assert!(!out.contains("\\sqrt"));
    }
}
