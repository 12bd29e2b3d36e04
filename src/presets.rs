//! # Presets — Risco de Projeto
//!
//! O motor de referência: duas entradas, uma saída, uma regra.
//!
//! | Variável | Termo | Forma |
//! |----------|-------|-------|
//! | `project_funding` | `inadequate` | Trapezoid(0, 0, 20, 30) |
//! | | `marginal` | Triangle(20, 50, 80) |
//! | | `adequate` | Trapezoid(60, 80, 100, 100) |
//! | `project_staffing` | `small` | Trapezoid(0, 0, 30, 57) |
//! | | `large` | Trapezoid(40, 60, 100, 100) |
//! | `risk` (saída) | `low` | Trapezoid(0, 0, 20, 40) |
//! | | `normal` | Triangle(20, 50, 80) |
//! | | `high` | Trapezoid(60, 80, 100, 100) |
//!
//! ```text
//! if (project_funding is adequate or project_staffing is small) then risk is low
//!
//! funding = 25, staffing = 55 → risk ≈ 19.63
//! ```
//!
//! A mesma configuração é distribuída em `data/project_risk.json`.

use crate::config::{EngineConfig, InputConfig, OutputConfig, RuleBlockConfig, RuleConfig};
use crate::core::{Defuzzifier, RangePolicy, SNorm, Shape, TNorm, Term};
use crate::engine::Engine;
use crate::error::ConfigurationError;
use crate::inference::Activation;

pub const PROJECT_RISK_RULE: &str =
    "if (project_funding is adequate or project_staffing is small) then risk is low";

fn term(name: &str, shape: Shape) -> Term {
    Term {
        name: name.to_string(),
        shape,
    }
}

fn trapezoid(name: &str, a: f64, b: f64, c: f64, d: f64) -> Term {
    term(name, Shape::Trapezoid { a, b, c, d })
}

fn triangle(name: &str, a: f64, b: f64, c: f64) -> Term {
    term(name, Shape::Triangle { a, b, c })
}

/// Configuração do motor "Fuzzy Project Risk".
pub fn project_risk_config() -> EngineConfig {
    EngineConfig {
        name: "Fuzzy Project Risk".to_string(),
        inputs: vec![
            InputConfig {
                name: "project_funding".to_string(),
                min: 0.0,
                max: 100.0,
                range_policy: RangePolicy::Clamp,
                terms: vec![
                    trapezoid("inadequate", 0.0, 0.0, 20.0, 30.0),
                    triangle("marginal", 20.0, 50.0, 80.0),
                    trapezoid("adequate", 60.0, 80.0, 100.0, 100.0),
                ],
            },
            InputConfig {
                name: "project_staffing".to_string(),
                min: 0.0,
                max: 100.0,
                range_policy: RangePolicy::Clamp,
                terms: vec![
                    trapezoid("small", 0.0, 0.0, 30.0, 57.0),
                    trapezoid("large", 40.0, 60.0, 100.0, 100.0),
                ],
            },
        ],
        outputs: vec![OutputConfig {
            name: "risk".to_string(),
            min: 0.0,
            max: 100.0,
            default_value: 0.0,
            aggregation: SNorm::Maximum,
            defuzzifier: Defuzzifier::centroid(100),
            terms: vec![
                trapezoid("low", 0.0, 0.0, 20.0, 40.0),
                triangle("normal", 20.0, 50.0, 80.0),
                trapezoid("high", 60.0, 80.0, 100.0, 100.0),
            ],
        }],
        rule_blocks: vec![RuleBlockConfig {
            name: "rule block".to_string(),
            enabled: true,
            conjunction: TNorm::Minimum,
            disjunction: SNorm::Maximum,
            implication: TNorm::Minimum,
            activation: Activation::General,
            rules: vec![RuleConfig::Text(PROJECT_RISK_RULE.to_string())],
        }],
    }
}

/// Motor "Fuzzy Project Risk" pronto para avaliar.
pub fn project_risk() -> Result<Engine, ConfigurationError> {
    project_risk_config().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_result() {
        let engine = project_risk().unwrap();
        let out = engine
            .evaluate([("project_funding", 25.0), ("project_staffing", 55.0)])
            .unwrap();
        assert!((out["risk"] - 19.63).abs() < 0.5, "risk = {}", out["risk"]);
        assert_eq!(format!("{:.2}", out["risk"]).len(), 5);
    }

    #[test]
    fn shipped_json_matches_preset() {
        let shipped: EngineConfig =
            serde_json::from_str(include_str!("../data/project_risk.json")).unwrap();
        assert_eq!(shipped, project_risk_config());
    }

    #[test]
    fn preset_round_trips_through_engine() {
        let engine = project_risk().unwrap();
        assert_eq!(engine.to_config(), project_risk_config());
    }
}
