//! Job files.
//!
//! A job holds everything one derivation needs. Equations and variables
//! may use either the typed form or the historical textual one:
//!
//! ```yaml
//! equation: ["y", "m*x + b"]
//! variables:
//!   - definition: "m = 2.5 +- 0.1"
//!     latex: "m"
//!   - { name: x, value: 4.0, uncertainty: 0.2, latex_name: x }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use sigprop::input::{parse_equation, parse_variable};
use sigprop::{Digits, Equation, PropagationError, SimplifierConfig, Variable};

/// An equation as written in a job file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EquationSpec {
    /// `[lhs, rhs]`
    Pair(Vec<String>),
    /// `{lhs, rhs}`
    Typed(Equation),
}

/// A variable as written in a job file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VariableSpec {
    /// `{name, value, uncertainty, latex_name}`
    Typed(Variable),
    /// `{definition: "name = value +- uncertainty", latex}`
    Legacy {
        /// The textual definition.
        definition: String,
        /// Display label.
        latex: String,
    },
}

/// One derivation to render.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub equation: EquationSpec,
    pub variables: Vec<VariableSpec>,
    #[serde(default)]
    pub digits: Digits,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub separate: bool,
    #[serde(default)]
    pub insert: bool,
    #[serde(default)]
    pub include_equation_number: bool,
    #[serde(default)]
    pub legacy_end_marker: bool,
    #[serde(default)]
    pub simplifier: SimplifierConfig,
}

impl Job {
    /// Reads a job from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file: {}", path.display()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML job: {}", path.display())),
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON job: {}", path.display())),
            _ => {
                if let Ok(job) = serde_json::from_str(&content) {
                    Ok(job)
                } else {
                    serde_yaml::from_str(&content).with_context(|| {
                        format!(
                            "Could not parse job file {} (tried JSON, YAML)",
                            path.display()
                        )
                    })
                }
            }
        }
    }

    /// The typed equation.
    pub fn equation(&self) -> Result<Equation, PropagationError> {
        match &self.equation {
            EquationSpec::Pair(pair) => parse_equation(pair),
            EquationSpec::Typed(equation) => Ok(equation.clone()),
        }
    }

    /// The typed variables, in file order.
    pub fn variables(&self) -> Result<Vec<Variable>, PropagationError> {
        self.variables
            .iter()
            .map(|spec| match spec {
                VariableSpec::Typed(variable) => Ok(variable.clone()),
                VariableSpec::Legacy { definition, latex } => parse_variable(definition, latex),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigprop::NumericInput;

    #[test]
    fn test_yaml_job_with_legacy_forms() {
        let yaml = r#"
equation: ["\\zeta ", " K*x"]
variables:
  - definition: "K = 4 +- 0"
    latex: "K"
  - name: x
    value: 0.5
    uncertainty: "1/sqrt(3)"
    latex_name: "x"
digits: { mu: 3, sigma: 2 }
unit: "\\si{V}"
insert: true
"#;
        let job: Job = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(job.equation().unwrap(), Equation::new("\\zeta", "K*x"));

        let variables = job.variables().unwrap();
        assert_eq!(variables[0].uncertainty, NumericInput::from("0"));
        assert_eq!(variables[1].value, NumericInput::Float(0.5));
        assert_eq!(job.digits, Digits::new(3, 2).unwrap());
        assert!(job.insert && !job.separate);
        assert!(job.simplifier.enabled);
    }

    #[test]
    fn test_json_job_with_typed_forms() {
        let json = r#"{
            "equation": {"lhs": "y", "rhs": "m*x + b"},
            "variables": [
                {"name": "m", "value": "2.5", "uncertainty": 0.1, "latex_name": "m"}
            ],
            "simplifier": {"enabled": false}
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.equation().unwrap().rhs, "m*x + b");
        assert_eq!(job.digits, Digits::default());
        assert!(!job.simplifier.enabled);
        assert_eq!(job.unit, None);
    }

    #[test]
    fn test_rejects_bad_digits() {
        let json = r#"{"equation": ["y", "x"], "variables": [], "digits": {"mu": 0, "sigma": 2}}"#;
        assert!(serde_json::from_str::<Job>(json).is_err());
    }

    #[test]
    fn test_malformed_legacy_variable() {
        let json = r#"{"equation": ["y", "x"], "variables": [{"definition": "x = 1", "latex": "x"}]}"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert!(matches!(
            job.variables(),
            Err(PropagationError::ValueFormat(_))
        ));
    }
}
