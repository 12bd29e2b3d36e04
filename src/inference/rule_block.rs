//! # Bloco de Regras — Disparo, Implicação e Acúmulo
//!
//! Um [`RuleBlock`] é uma coleção ordenada de [`Rule`]s que compartilham os
//! mesmos operadores ([`RuleBlockSettings`]) e uma política de
//! [`Activation`].
//!
//! ## Algoritmo
//!
//! ```text
//! se bloco desabilitado: nada
//! para cada regra habilitada:
//!   força = antecedente(graus)                      // conjunction / disjunction
//! selecionadas = activation.select(forças)          // só forças > 0
//! para cada regra selecionada, para cada consequente:
//!   altura = implication(força, peso)
//!   saída.accumulate(termo, altura)                 // recorte pela implicação
//! ```
//!
//! Regras e blocos desabilitados são **pulados** — não entram nas normas
//! como força 0. Como a agregação é comutativa e associativa, a ordem das
//! regras não altera o conjunto agregado.

use serde::{Deserialize, Serialize};

use super::rules::Rule;
use crate::core::{AggregatedSet, SNorm, TNorm};
use crate::error::ConfigurationError;

/// Política que escolhe quais regras com força > 0 contribuem.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Activation {
    /// Todas as regras com força > 0.
    #[default]
    General,
    /// As primeiras `count` regras (em ordem) com força > 0.
    First { count: usize },
    /// As últimas `count` regras (em ordem) com força > 0.
    Last { count: usize },
    /// As `count` regras de maior força.
    Highest { count: usize },
    /// As `count` regras de menor força (ainda > 0).
    Lowest { count: usize },
    /// Regras com força ≥ `value`.
    Threshold { value: f64 },
}

impl Activation {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match *self {
            Activation::General => Ok(()),
            Activation::First { count }
            | Activation::Last { count }
            | Activation::Highest { count }
            | Activation::Lowest { count } => {
                if count == 0 {
                    Err(ConfigurationError::InvalidActivation(format!("{:?}: count deve ser ≥ 1", self)))
                } else {
                    Ok(())
                }
            }
            Activation::Threshold { value } => {
                if value > 0.0 && value <= 1.0 {
                    Ok(())
                } else {
                    Err(ConfigurationError::InvalidActivation(format!(
                        "threshold {} fora de (0, 1]",
                        value
                    )))
                }
            }
        }
    }

    /// Recebe `(índice da regra, força)` em ordem e devolve os índices
    /// selecionados, também em ordem de regra.
    pub fn select(&self, strengths: &[(usize, f64)]) -> Vec<usize> {
        let candidates: Vec<(usize, f64)> = strengths.iter().copied().filter(|(_, s)| *s > 0.0).collect();
        let mut chosen: Vec<usize> = match *self {
            Activation::General => candidates.iter().map(|(i, _)| *i).collect(),
            Activation::First { count } => candidates.iter().take(count).map(|(i, _)| *i).collect(),
            Activation::Last { count } => {
                let skip = candidates.len().saturating_sub(count);
                candidates.iter().skip(skip).map(|(i, _)| *i).collect()
            }
            Activation::Highest { count } | Activation::Lowest { count } => {
                let mut ranked = candidates.clone();
                // sort estável: empates preservam a ordem das regras
                if matches!(self, Activation::Highest { .. }) {
                    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                } else {
                    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
                }
                ranked.into_iter().take(count).map(|(i, _)| i).collect()
            }
            Activation::Threshold { value } => candidates
                .iter()
                .filter(|(_, s)| *s >= value)
                .map(|(i, _)| *i)
                .collect(),
        };
        chosen.sort_unstable();
        chosen
    }
}

/// Operadores e estado de um bloco.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuleBlockSettings {
    pub enabled: bool,
    pub conjunction: TNorm,
    pub disjunction: SNorm,
    pub implication: TNorm,
    pub activation: Activation,
}

/// Padrão Mamdani: `min` / `max` / `min`, ativação geral.
impl Default for RuleBlockSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            conjunction: TNorm::Minimum,
            disjunction: SNorm::Maximum,
            implication: TNorm::Minimum,
            activation: Activation::General,
        }
    }
}

/// Resultado de uma regra em uma avaliação (para explicações).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Firing {
    pub rule: usize,
    pub strength: f64,
    pub activated: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuleBlock {
    name: String,
    settings: RuleBlockSettings,
    rules: Vec<Rule>,
}

impl RuleBlock {
    pub fn new(name: impl Into<String>, settings: RuleBlockSettings, rules: Vec<Rule>) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName("bloco de regras"));
        }
        settings.activation.validate()?;
        Ok(Self { name, settings, rules })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &RuleBlockSettings {
        &self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule_mut(&mut self, index: usize) -> Option<&mut Rule> {
        self.rules.get_mut(index)
    }

    /// Dispara o bloco sobre `degrees[entrada][termo]`, acumulando nos
    /// conjuntos agregados (um por saída). Retorna a força de cada regra
    /// habilitada.
    pub fn activate(&self, degrees: &[Vec<f64>], aggregated: &mut [AggregatedSet]) -> Vec<Firing> {
        if !self.settings.enabled {
            return Vec::new();
        }
        let RuleBlockSettings {
            conjunction,
            disjunction,
            implication,
            activation,
            ..
        } = self.settings;

        let strengths: Vec<(usize, f64)> = self
            .rules
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_enabled())
            .map(|(i, r)| (i, r.firing_strength(degrees, conjunction, disjunction)))
            .collect();
        let selected = activation.select(&strengths);

        // força por índice de regra (desabilitadas ficam em 0)
        let mut by_rule = vec![0.0; self.rules.len()];
        for &(index, strength) in &strengths {
            by_rule[index] = strength;
        }

        for &index in &selected {
            let rule = &self.rules[index];
            let strength = by_rule[index];
            tracing::trace!(block = %self.name, rule = %rule.text(), strength, "Regra disparada");
            for c in rule.consequents() {
                let height = implication.apply(strength, c.weight);
                aggregated[c.output].accumulate(c.term, height, implication);
            }
        }

        strengths
            .into_iter()
            .map(|(rule, strength)| Firing {
                rule,
                strength,
                activated: selected.binary_search(&rule).is_ok(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InputVariable, OutputVariable, Term};

    fn strengths() -> Vec<(usize, f64)> {
        vec![(0, 0.2), (1, 0.0), (2, 0.9), (3, 0.5), (5, 0.2)]
    }

    #[test]
    fn general_takes_every_positive_rule() {
        assert_eq!(Activation::General.select(&strengths()), vec![0, 2, 3, 5]);
    }

    #[test]
    fn first_and_last() {
        assert_eq!(Activation::First { count: 2 }.select(&strengths()), vec![0, 2]);
        assert_eq!(Activation::Last { count: 2 }.select(&strengths()), vec![3, 5]);
        assert_eq!(Activation::Last { count: 10 }.select(&strengths()), vec![0, 2, 3, 5]);
    }

    #[test]
    fn highest_lowest_threshold() {
        assert_eq!(Activation::Highest { count: 2 }.select(&strengths()), vec![2, 3]);
        assert_eq!(Activation::Lowest { count: 2 }.select(&strengths()), vec![0, 5]);
        assert_eq!(Activation::Threshold { value: 0.5 }.select(&strengths()), vec![2, 3]);
    }

    #[test]
    fn invalid_activation() {
        assert!(Activation::First { count: 0 }.validate().is_err());
        assert!(Activation::Threshold { value: 0.0 }.validate().is_err());
        assert!(Activation::Threshold { value: 1.0 }.validate().is_ok());
    }

    fn block(settings: RuleBlockSettings) -> RuleBlock {
        let inputs = vec![InputVariable::new(
            "x",
            0.0,
            10.0,
            vec![
                Term::triangle("lo", 0.0, 0.0, 10.0).unwrap(),
                Term::triangle("hi", 0.0, 10.0, 10.0).unwrap(),
            ],
        )
        .unwrap()];
        let outputs = vec![OutputVariable::new(
            "y",
            0.0,
            10.0,
            vec![
                Term::triangle("lo", 0.0, 0.0, 10.0).unwrap(),
                Term::triangle("hi", 0.0, 10.0, 10.0).unwrap(),
            ],
        )
        .unwrap()];
        let rules = vec![
            Rule::parse("if x is lo then y is lo", &inputs, &outputs).unwrap(),
            Rule::parse("if x is hi then y is hi with 0.5", &inputs, &outputs).unwrap(),
        ];
        RuleBlock::new("main", settings, rules).unwrap()
    }

    #[test]
    fn activate_clips_with_weight() {
        let b = block(RuleBlockSettings::default());
        let degrees = vec![vec![0.3, 0.7]];
        let mut aggregated = vec![AggregatedSet::new()];
        let firings = b.activate(&degrees, &mut aggregated);

        assert_eq!(firings.len(), 2);
        assert!(firings.iter().all(|f| f.activated));
        let heights: Vec<f64> = aggregated[0].clipped_terms().iter().map(|a| a.height).collect();
        assert_eq!(heights, vec![0.3, 0.5]);
    }

    #[test]
    fn disabled_block_and_rule_are_skipped() {
        let mut b = block(RuleBlockSettings::default());
        b.rule_mut(1).unwrap().set_enabled(false);
        let degrees = vec![vec![0.3, 0.7]];
        let mut aggregated = vec![AggregatedSet::new()];
        let firings = b.activate(&degrees, &mut aggregated);
        assert_eq!(firings.len(), 1);
        assert_eq!(aggregated[0].clipped_terms().len(), 1);

        b.set_enabled(false);
        let mut aggregated = vec![AggregatedSet::new()];
        assert!(b.activate(&degrees, &mut aggregated).is_empty());
        assert!(aggregated[0].is_empty());
    }

    #[test]
    fn strength_follows_rule_index_after_disabled_rule() {
        let mut b = block(RuleBlockSettings {
            implication: TNorm::AlgebraicProduct,
            ..RuleBlockSettings::default()
        });
        b.rule_mut(0).unwrap().set_enabled(false);
        let degrees = vec![vec![0.3, 0.7]];
        let mut aggregated = vec![AggregatedSet::new()];
        let firings = b.activate(&degrees, &mut aggregated);

        assert_eq!(firings, vec![Firing { rule: 1, strength: 0.7, activated: true }]);
        let clipped = aggregated[0].clipped_terms();
        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0].term, 1);
        // 0.7 · 0.5 (peso)
        assert!((clipped[0].height - 0.35).abs() < 1e-12);
    }

    #[test]
    fn highest_activation_keeps_strongest() {
        let b = block(RuleBlockSettings {
            activation: Activation::Highest { count: 1 },
            ..RuleBlockSettings::default()
        });
        let degrees = vec![vec![0.3, 0.7]];
        let mut aggregated = vec![AggregatedSet::new()];
        let firings = b.activate(&degrees, &mut aggregated);
        assert_eq!(firings.iter().filter(|f| f.activated).count(), 1);
        assert!(firings[1].activated);
        assert_eq!(aggregated[0].clipped_terms()[0].term, 1);
    }

    #[test]
    fn empty_name_rejected() {
        assert!(matches!(
            RuleBlock::new(" ", RuleBlockSettings::default(), vec![]),
            Err(ConfigurationError::EmptyName(_))
        ));
    }
}
