//! # Configuração Declarativa do Motor (JSON)
//!
//! [`EngineConfig`] é a forma serializável de um [`Engine`]: variáveis,
//! termos, operadores e o **texto** das regras. Construir o motor a partir
//! dela passa pelos mesmos construtores validados da API programática, então
//! um arquivo inválido falha na carga, nunca na avaliação.
//!
//! ## Formato
//!
//! ```text
//! {
//!   "name": "Fuzzy Project Risk",
//!   "inputs": [
//!     { "name": "project_funding", "min": 0, "max": 100,
//!       "range_policy": "clamp",                          ← opcional
//!       "terms": [ { "name": "marginal", "shape": "triangle", "a": 20, "b": 50, "c": 80 } ] }
//!   ],
//!   "outputs": [
//!     { "name": "risk", "min": 0, "max": 100,
//!       "default_value": 0, "aggregation": "maximum",      ← opcionais
//!       "defuzzifier": { "method": "centroid", "resolution": 100 },
//!       "terms": [ ... ] }
//!   ],
//!   "rule_blocks": [
//!     { "name": "rule block",
//!       "conjunction": "minimum", "disjunction": "maximum",
//!       "implication": "minimum", "activation": { "policy": "general" },
//!       "rules": [ "if ... then ...", { "text": "if ...", "enabled": false } ] }
//!   ]
//! }
//! ```
//!
//! Campos omitidos assumem os padrões Mamdani (min/max/min, centróide com
//! resolução 100, `default_value = 0`, entradas limitadas ao domínio).

use serde::{Deserialize, Serialize};

use crate::core::{Defuzzifier, InputVariable, OutputVariable, RangePolicy, SNorm, TNorm, Term};
use crate::engine::Engine;
use crate::error::ConfigurationError;
use crate::inference::{Activation, RuleBlockSettings};

fn enabled() -> bool {
    true
}

fn is_enabled(value: &bool) -> bool {
    *value
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<InputConfig>,
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
    #[serde(default)]
    pub rule_blocks: Vec<RuleBlockConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub name: String,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub range_policy: RangePolicy,
    pub terms: Vec<Term>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub name: String,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub default_value: f64,
    #[serde(default)]
    pub aggregation: SNorm,
    #[serde(default)]
    pub defuzzifier: Defuzzifier,
    pub terms: Vec<Term>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleBlockConfig {
    pub name: String,
    #[serde(default = "enabled", skip_serializing_if = "is_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub conjunction: TNorm,
    #[serde(default)]
    pub disjunction: SNorm,
    #[serde(default)]
    pub implication: TNorm,
    #[serde(default)]
    pub activation: Activation,
    pub rules: Vec<RuleConfig>,
}

impl RuleBlockConfig {
    fn settings(&self) -> RuleBlockSettings {
        RuleBlockSettings {
            enabled: self.enabled,
            conjunction: self.conjunction,
            disjunction: self.disjunction,
            implication: self.implication,
            activation: self.activation,
        }
    }
}

/// Uma regra: texto puro (habilitada) ou objeto com `enabled`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleConfig {
    Text(String),
    Detailed {
        text: String,
        #[serde(default = "enabled")]
        enabled: bool,
    },
}

impl RuleConfig {
    pub fn text(&self) -> &str {
        match self {
            RuleConfig::Text(text) | RuleConfig::Detailed { text, .. } => text,
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            RuleConfig::Text(_) => true,
            RuleConfig::Detailed { enabled, .. } => *enabled,
        }
    }
}

impl EngineConfig {
    /// Monta e valida o motor descrito.
    pub fn build(&self) -> Result<Engine, ConfigurationError> {
        let mut engine = Engine::new(self.name.clone());

        for input in &self.inputs {
            let variable = InputVariable::new(input.name.clone(), input.min, input.max, input.terms.clone())?
                .with_range_policy(input.range_policy);
            engine.add_input_variable(variable)?;
        }

        for output in &self.outputs {
            let variable = OutputVariable::new(output.name.clone(), output.min, output.max, output.terms.clone())?
                .with_default_value(output.default_value)
                .with_aggregation(output.aggregation)
                .with_defuzzifier(output.defuzzifier)?;
            engine.add_output_variable(variable)?;
        }

        for block in &self.rule_blocks {
            engine.add_rule_block(&block.name, block.settings(), block.rules.iter().map(RuleConfig::text))?;
            for (index, rule) in block.rules.iter().enumerate() {
                if !rule.is_enabled() {
                    engine.set_rule_enabled(&block.name, index, false)?;
                }
            }
        }

        tracing::debug!(
            engine = %self.name,
            inputs = self.inputs.len(),
            outputs = self.outputs.len(),
            rule_blocks = self.rule_blocks.len(),
            "Motor montado a partir da configuração"
        );
        Ok(engine)
    }
}

impl From<&Engine> for EngineConfig {
    fn from(engine: &Engine) -> Self {
        let inputs = engine
            .input_variables()
            .iter()
            .map(|v| {
                let (min, max) = v.range();
                InputConfig {
                    name: v.name().to_string(),
                    min,
                    max,
                    range_policy: v.range_policy(),
                    terms: v.terms().to_vec(),
                }
            })
            .collect();

        let outputs = engine
            .output_variables()
            .iter()
            .map(|v| {
                let (min, max) = v.range();
                OutputConfig {
                    name: v.name().to_string(),
                    min,
                    max,
                    default_value: v.default_value(),
                    aggregation: v.aggregation(),
                    defuzzifier: v.defuzzifier(),
                    terms: v.terms().to_vec(),
                }
            })
            .collect();

        let rule_blocks = engine
            .rule_blocks()
            .iter()
            .map(|block| {
                let settings = block.settings();
                RuleBlockConfig {
                    name: block.name().to_string(),
                    enabled: settings.enabled,
                    conjunction: settings.conjunction,
                    disjunction: settings.disjunction,
                    implication: settings.implication,
                    activation: settings.activation,
                    rules: block
                        .rules()
                        .iter()
                        .map(|rule| {
                            if rule.is_enabled() {
                                RuleConfig::Text(rule.text().to_string())
                            } else {
                                RuleConfig::Detailed {
                                    text: rule.text().to_string(),
                                    enabled: false,
                                }
                            }
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            name: engine.name().to_string(),
            inputs,
            outputs,
            rule_blocks,
        }
    }
}

impl Engine {
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigurationError> {
        config.build()
    }

    pub fn to_config(&self) -> EngineConfig {
        EngineConfig::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "name": "tip",
        "inputs": [
            { "name": "service", "min": 0, "max": 10,
              "terms": [
                { "name": "poor", "shape": "trapezoid", "a": 0, "b": 0, "c": 2, "d": 5 },
                { "name": "good", "shape": "gaussian", "mean": 10, "sd": 2 }
              ] }
        ],
        "outputs": [
            { "name": "tip", "min": 0, "max": 30,
              "terms": [
                { "name": "cheap", "shape": "triangle", "a": 0, "b": 5, "c": 10 },
                { "name": "generous", "shape": "rectangle", "start": 20, "end": 30 }
              ] }
        ],
        "rule_blocks": [
            { "name": "tipping",
              "rules": [
                "if service is poor then tip is cheap",
                { "text": "if service is good then tip is generous", "enabled": false }
              ] }
        ]
    }"#;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: EngineConfig = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(config.inputs[0].range_policy, RangePolicy::Clamp);
        assert_eq!(config.outputs[0].aggregation, SNorm::Maximum);
        assert_eq!(config.outputs[0].defuzzifier, Defuzzifier::centroid(100));
        assert_eq!(config.outputs[0].default_value, 0.0);
        let block = &config.rule_blocks[0];
        assert!(block.enabled);
        assert_eq!(block.settings(), RuleBlockSettings::default());
        assert!(block.rules[0].is_enabled());
        assert!(!block.rules[1].is_enabled());
    }

    #[test]
    fn build_honours_disabled_rules() {
        let config: EngineConfig = serde_json::from_str(MINIMAL).unwrap();
        let engine = config.build().unwrap();
        let rules = engine.rule_blocks()[0].rules();
        assert!(rules[0].is_enabled());
        assert!(!rules[1].is_enabled());

        // só "good" dispararia, mas está desabilitada
        let out = engine.evaluate([("service", 10.0)]).unwrap();
        assert_eq!(out["tip"], 0.0);
    }

    #[test]
    fn engine_to_config_and_back() {
        let config: EngineConfig = serde_json::from_str(MINIMAL).unwrap();
        let engine = Engine::from_config(&config).unwrap();
        let exported = engine.to_config();
        assert_eq!(exported.rule_blocks[0].rules[1], config.rule_blocks[0].rules[1]);

        let json = serde_json::to_string_pretty(&exported).unwrap();
        let reloaded: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, exported);
        let again = reloaded.build().unwrap();
        assert_eq!(
            again.evaluate([("service", 1.0)]).unwrap(),
            engine.evaluate([("service", 1.0)]).unwrap()
        );
    }

    #[test]
    fn invalid_files_fail_at_build() {
        let mut config: EngineConfig = serde_json::from_str(MINIMAL).unwrap();
        config.rule_blocks[0].rules.push(RuleConfig::Text("if service is awful then tip is cheap".into()));
        assert!(matches!(config.build(), Err(ConfigurationError::UnknownTerm { .. })));

        let mut config: EngineConfig = serde_json::from_str(MINIMAL).unwrap();
        config.outputs[0].defuzzifier = Defuzzifier::centroid(0);
        assert_eq!(config.build().unwrap_err(), ConfigurationError::InvalidResolution(0));

        let mut config: EngineConfig = serde_json::from_str(MINIMAL).unwrap();
        config.inputs[0].terms[0] = serde_json::from_str(
            r#"{ "name": "poor", "shape": "triangle", "a": 5, "b": 2, "c": 1 }"#,
        )
        .unwrap();
        assert!(matches!(config.build(), Err(ConfigurationError::InvalidBreakpoints { .. })));
    }

    #[test]
    fn unknown_shape_is_a_parse_error() {
        let json = MINIMAL.replace("\"rectangle\"", "\"hexagon\"");
        assert!(serde_json::from_str::<EngineConfig>(&json).is_err());
    }
}
