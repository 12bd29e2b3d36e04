//! # Variáveis Linguísticas — Entradas e Saídas
//!
//! Uma variável é uma grandeza nomeada com domínio `[min, max]` e um
//! conjunto ordenado de [`Term`]s com nomes únicos.
//!
//! - [`InputVariable`] — recebe um valor nítido e expõe os graus de
//!   pertinência de cada termo (fuzzificação). É somente-leitura para as regras.
//! - [`OutputVariable`] — recebe os consequentes recortados das regras em um
//!   [`AggregatedSet`] e o converte em um número via [`Defuzzifier`].
//!
//! ## Estado por Avaliação
//!
//! As variáveis **não guardam** o valor corrente nem o conjunto agregado:
//! esses dados vivem no contexto de avaliação do motor
//! (`engine::Evaluation`), criado limpo a cada chamada.
//! Assim a configuração é imutável e pode ser compartilhada entre threads.
//!
//! ```text
//! InputVariable "project_staffing" [0, 100]
//!   set_value(55.0) → 55.0
//!   fuzzify(55.0)   → 0.074/small + 0.750/large
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::defuzzifier::Defuzzifier;
use super::norm::{SNorm, TNorm};
use super::term::Term;
use crate::error::{ConfigurationError, EvaluationError};

/// O que fazer com uma entrada fora de `[min, max]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Limita silenciosamente ao domínio.
    #[default]
    Clamp,
    /// Falha com [`EvaluationError::OutOfRange`].
    Reject,
}

/// Valida nome, domínio e termos; compartilhado por entradas e saídas.
fn validate_variable(name: &str, min: f64, max: f64, terms: &[Term]) -> Result<(), ConfigurationError> {
    if name.trim().is_empty() {
        return Err(ConfigurationError::EmptyName("variável"));
    }
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(ConfigurationError::InvalidRange {
            variable: name.to_string(),
            min,
            max,
        });
    }
    let mut seen = HashSet::with_capacity(terms.len());
    for term in terms {
        term.validate()?;
        if !seen.insert(term.name.as_str()) {
            return Err(ConfigurationError::DuplicateTerm {
                variable: name.to_string(),
                term: term.name.clone(),
            });
        }
    }
    Ok(())
}

/// Renderiza graus no formato `0.074/small + 0.750/large`.
pub fn format_degrees<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> String {
    pairs
        .into_iter()
        .map(|(name, degree)| format!("{:.3}/{}", degree, name))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Variável de entrada.
#[derive(Clone, Debug, PartialEq)]
pub struct InputVariable {
    name: String,
    min: f64,
    max: f64,
    terms: Vec<Term>,
    range_policy: RangePolicy,
}

impl InputVariable {
    /// Cria uma entrada validando o domínio (`min ≤ max`) e os termos.
    pub fn new(
        name: impl Into<String>,
        min: f64,
        max: f64,
        terms: Vec<Term>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        validate_variable(&name, min, max, &terms)?;
        Ok(Self {
            name,
            min,
            max,
            terms,
            range_policy: RangePolicy::default(),
        })
    }

    pub fn with_range_policy(mut self, policy: RangePolicy) -> Self {
        self.range_policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn range_policy(&self) -> RangePolicy {
        self.range_policy
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }

    /// Aceita (ou rejeita) um valor nítido conforme a [`RangePolicy`].
    ///
    /// Retorna o valor efetivamente usado na fuzzificação.
    ///
    /// # Erros
    ///
    /// - `NaN` → [`EvaluationError::NotANumber`] (independente da política)
    /// - fora do domínio com `Reject` → [`EvaluationError::OutOfRange`]
    pub fn set_value(&self, x: f64) -> Result<f64, EvaluationError> {
        if x.is_nan() {
            return Err(EvaluationError::NotANumber(self.name.clone()));
        }
        if x >= self.min && x <= self.max {
            return Ok(x);
        }
        match self.range_policy {
            RangePolicy::Clamp => Ok(x.clamp(self.min, self.max)),
            RangePolicy::Reject => Err(EvaluationError::OutOfRange {
                variable: self.name.clone(),
                value: x,
                min: self.min,
                max: self.max,
            }),
        }
    }

    /// Graus de pertinência na ordem dos termos.
    pub fn degrees(&self, value: f64) -> Vec<f64> {
        self.terms.iter().map(|t| t.membership(value)).collect()
    }

    /// Mapeamento termo → grau para `value`.
    pub fn fuzzify(&self, value: f64) -> Vec<(&str, f64)> {
        self.terms
            .iter()
            .map(|t| (t.name.as_str(), t.membership(value)))
            .collect()
    }
}

/// Um consequente já recortado: termo da saída + altura de ativação.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClippedTerm {
    pub term: usize,
    pub height: f64,
    pub implication: TNorm,
}

/// Conjunto fuzzy agregado de uma saída, construído do zero a cada avaliação.
///
/// Guarda apenas a lista de termos ativados; a pertinência em `x` é calculada
/// sob demanda dobrando a agregação sobre os termos recortados:
///
/// ```text
/// μ(x) = S( I(μ_t1(x), h1), I(μ_t2(x), h2), ... )
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregatedSet {
    clipped: Vec<ClippedTerm>,
}

impl AggregatedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Volta ao estado "sem suporte". Mantém a capacidade alocada.
    pub fn reset(&mut self) {
        self.clipped.clear();
    }

    /// Incorpora um consequente. Alturas `≤ 0` não têm efeito.
    pub fn accumulate(&mut self, term: usize, height: f64, implication: TNorm) {
        if height > 0.0 {
            self.clipped.push(ClippedTerm {
                term,
                height: height.min(1.0),
                implication,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clipped.is_empty()
    }

    pub fn clipped_terms(&self) -> &[ClippedTerm] {
        &self.clipped
    }

    /// Pertinência do conjunto agregado em `x`.
    pub fn membership_at(&self, x: f64, terms: &[Term], aggregation: SNorm) -> f64 {
        self.clipped.iter().fold(0.0, |acc, a| {
            let clipped = a.implication.apply(terms[a.term].membership(x), a.height);
            aggregation.apply(acc, clipped)
        })
    }
}

/// Variável de saída.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputVariable {
    name: String,
    min: f64,
    max: f64,
    terms: Vec<Term>,
    default_value: f64,
    aggregation: SNorm,
    defuzzifier: Defuzzifier,
}

impl OutputVariable {
    /// Cria uma saída com padrões: `default_value = 0`, agregação `Maximum`,
    /// defuzzificador `Centroid(100)`.
    pub fn new(
        name: impl Into<String>,
        min: f64,
        max: f64,
        terms: Vec<Term>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        validate_variable(&name, min, max, &terms)?;
        Ok(Self {
            name,
            min,
            max,
            terms,
            default_value: 0.0,
            aggregation: SNorm::default(),
            defuzzifier: Defuzzifier::default(),
        })
    }

    pub fn with_default_value(mut self, value: f64) -> Self {
        self.default_value = value;
        self
    }

    pub fn with_aggregation(mut self, aggregation: SNorm) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Troca o defuzzificador, validando a resolução.
    pub fn with_defuzzifier(mut self, defuzzifier: Defuzzifier) -> Result<Self, ConfigurationError> {
        defuzzifier.validate()?;
        self.defuzzifier = defuzzifier;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    pub fn aggregation(&self) -> SNorm {
        self.aggregation
    }

    pub fn defuzzifier(&self) -> Defuzzifier {
        self.defuzzifier
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }

    /// Pertinência do conjunto agregado em `x` usando os termos desta saída.
    pub fn membership_at(&self, set: &AggregatedSet, x: f64) -> f64 {
        set.membership_at(x, &self.terms, self.aggregation)
    }

    /// Converte o conjunto agregado em um valor nítido.
    ///
    /// Sem suporte → `default_value` (caminho de recuperação, não erro).
    pub fn defuzzify(&self, set: &AggregatedSet) -> f64 {
        if set.is_empty() {
            tracing::debug!(output = %self.name, default = self.default_value, "Conjunto agregado vazio, usando valor padrão");
            return self.default_value;
        }
        self.defuzzifier
            .defuzzify(|x| self.membership_at(set, x), self.min, self.max)
            .unwrap_or_else(|| {
                tracing::debug!(output = %self.name, default = self.default_value, "Conjunto agregado sem suporte no domínio, usando valor padrão");
                self.default_value
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staffing() -> InputVariable {
        InputVariable::new(
            "project_staffing",
            0.0,
            100.0,
            vec![
                Term::trapezoid("small", 0.0, 0.0, 30.0, 57.0).unwrap(),
                Term::trapezoid("large", 40.0, 60.0, 100.0, 100.0).unwrap(),
            ],
        )
        .unwrap()
    }

    fn risk() -> OutputVariable {
        OutputVariable::new(
            "risk",
            0.0,
            100.0,
            vec![
                Term::trapezoid("low", 0.0, 0.0, 20.0, 40.0).unwrap(),
                Term::triangle("normal", 20.0, 50.0, 80.0).unwrap(),
                Term::trapezoid("high", 60.0, 80.0, 100.0, 100.0).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn fuzzify_staffing() {
        let v = staffing();
        let degrees = v.fuzzify(55.0);
        assert_eq!(degrees[0].0, "small");
        assert!((degrees[0].1 - 2.0 / 27.0).abs() < 1e-12);
        assert!((degrees[1].1 - 0.75).abs() < 1e-12);
        assert_eq!(
            format_degrees(degrees),
            "0.074/small + 0.750/large"
        );
    }

    #[test]
    fn clamps_by_default() {
        let v = staffing();
        assert_eq!(v.set_value(150.0).unwrap(), 100.0);
        assert_eq!(v.set_value(-3.0).unwrap(), 0.0);
        assert_eq!(v.set_value(0.0).unwrap(), 0.0);
    }

    #[test]
    fn reject_policy_fails_out_of_range() {
        let v = staffing().with_range_policy(RangePolicy::Reject);
        assert_eq!(v.set_value(100.0).unwrap(), 100.0);
        assert!(matches!(
            v.set_value(100.5),
            Err(EvaluationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn nan_is_rejected_even_when_clamping() {
        assert_eq!(
            staffing().set_value(f64::NAN),
            Err(EvaluationError::NotANumber("project_staffing".into()))
        );
    }

    #[test]
    fn boundaries_have_valid_degrees() {
        let v = staffing();
        for x in [0.0, 100.0] {
            for d in v.degrees(x) {
                assert!(!d.is_nan());
                assert!((0.0..=1.0).contains(&d));
            }
        }
    }

    #[test]
    fn invalid_range_and_duplicate_terms() {
        assert!(matches!(
            InputVariable::new("x", 10.0, 0.0, vec![]),
            Err(ConfigurationError::InvalidRange { .. })
        ));
        let dup = vec![
            Term::triangle("a", 0.0, 1.0, 2.0).unwrap(),
            Term::triangle("a", 1.0, 2.0, 3.0).unwrap(),
        ];
        assert!(matches!(
            OutputVariable::new("y", 0.0, 3.0, dup),
            Err(ConfigurationError::DuplicateTerm { .. })
        ));
    }

    #[test]
    fn aggregated_set_reset_and_accumulate() {
        let out = risk();
        let mut set = AggregatedSet::new();
        assert_eq!(out.defuzzify(&set), 0.0);

        set.accumulate(0, 0.5, TNorm::Minimum);
        set.accumulate(2, 0.0, TNorm::Minimum);
        assert_eq!(set.clipped_terms().len(), 1);
        assert_eq!(out.membership_at(&set, 10.0), 0.5);
        assert_eq!(out.membership_at(&set, 90.0), 0.0);

        set.reset();
        assert!(set.is_empty());
        assert_eq!(out.membership_at(&set, 10.0), 0.0);
    }

    #[test]
    fn aggregation_is_pointwise_max() {
        let out = risk();
        let mut set = AggregatedSet::new();
        set.accumulate(0, 0.3, TNorm::Minimum);
        set.accumulate(1, 0.8, TNorm::Minimum);
        // x = 30: low(30) = 0.5 → 0.3; normal(30) = 1/3 → 1/3
        assert!((out.membership_at(&set, 30.0) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn default_value_when_nothing_fired() {
        let out = risk().with_default_value(42.0);
        assert_eq!(out.defuzzify(&AggregatedSet::new()), 42.0);
    }
}
