//! # Motor — Orquestração da Inferência Mamdani
//!
//! O [`Engine`] é dono de toda a configuração (variáveis, termos, blocos de
//! regras) e executa o pipeline completo em uma única chamada síncrona:
//!
//! ```text
//! evaluate({project_funding: 25, project_staffing: 55})
//!   │
//!   ├── 1. set_value      — aceita/limita cada entrada (RangePolicy)
//!   ├── 2. fuzzify        — graus [entrada][termo]
//!   ├── 3. reset          — conjuntos agregados limpos, um por saída
//!   ├── 4. rule blocks    — força → ativação → implicação → acúmulo
//!   └── 5. defuzzify      — um número por saída (ou default_value)
//!   ▼
//! {risk: 19.63}
//! ```
//!
//! ## Estado por Chamada
//!
//! A configuração é **imutável** depois de montada. Tudo que muda durante
//! uma avaliação (valores, graus, conjuntos agregados) vive em um
//! `Evaluation` retirado de um pool interno e devolvido ao final, sempre
//! reinicializado antes do uso. Consequências:
//!
//! - `evaluate` recebe `&self` — o motor é `Send + Sync` e pode ser
//!   avaliado de várias threads sem lock externo;
//! - nada vaza de uma chamada para a outra (Configured → Evaluating → Done
//!   → Configured a cada chamada);
//! - uma avaliação com erro não devolve saídas parciais.
//!
//! O lock do pool (`parking_lot::Mutex`) é mantido apenas para retirar ou
//! devolver o buffer, nunca durante a avaliação.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;

use crate::core::{format_degrees, AggregatedSet, InputVariable, OutputVariable};
use crate::error::{ConfigurationError, EvaluationError, FuzzyError};
use crate::inference::{Rule, RuleBlock, RuleBlockSettings};

/// Saídas de uma avaliação: nome da variável → valor defuzzificado.
pub type Outputs = BTreeMap<String, f64>;

/// Quantos buffers ociosos o pool mantém.
const MAX_POOLED_CONTEXTS: usize = 16;

/// Contexto de uma avaliação: valores, graus e conjuntos agregados.
#[derive(Debug, Default)]
pub(crate) struct Evaluation {
    values: Vec<f64>,
    degrees: Vec<Vec<f64>>,
    aggregated: Vec<AggregatedSet>,
}

impl Evaluation {
    /// Dimensiona e limpa o contexto para o motor atual.
    fn prepare(&mut self, inputs: usize, outputs: usize) {
        self.values.clear();
        self.values.resize(inputs, 0.0);
        self.degrees.resize_with(inputs, Vec::new);
        for d in &mut self.degrees {
            d.clear();
        }
        self.aggregated.resize_with(outputs, AggregatedSet::new);
        for set in &mut self.aggregated {
            set.reset();
        }
    }
}

/// Entrada fuzzificada, para exibição.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FuzzifiedInput {
    pub name: String,
    pub value: f64,
    pub degrees: Vec<(String, f64)>,
}

/// Força de uma regra habilitada em uma avaliação.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleFiring {
    pub block: String,
    pub rule: String,
    pub strength: f64,
    pub activated: bool,
}

/// Rastro legível de uma avaliação: o "porquê" do resultado.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Explanation {
    pub inputs: Vec<FuzzifiedInput>,
    pub rules: Vec<RuleFiring>,
    pub outputs: Outputs,
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            writeln!(
                f,
                "{} = {:.3} → {}",
                input.name,
                input.value,
                format_degrees(input.degrees.iter().map(|(t, d)| (t.as_str(), *d)))
            )?;
        }
        for firing in &self.rules {
            let mark = if firing.activated { "✓" } else { "·" };
            writeln!(f, "[{}] {} {:.3} {}", firing.block, mark, firing.strength, firing.rule)?;
        }
        for (name, value) in &self.outputs {
            writeln!(f, "{} = {:.3}", name, value)?;
        }
        Ok(())
    }
}

/// Motor de inferência fuzzy Mamdani.
#[derive(Debug)]
pub struct Engine {
    name: String,
    inputs: Vec<InputVariable>,
    outputs: Vec<OutputVariable>,
    rule_blocks: Vec<RuleBlock>,
    scratch: Mutex<Vec<Evaluation>>,
}

impl Clone for Engine {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            rule_blocks: self.rule_blocks.clone(),
            scratch: Mutex::new(Vec::new()),
        }
    }
}

impl Engine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            rule_blocks: Vec::new(),
            scratch: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nomes são únicos entre entradas **e** saídas, para que uma regra
    /// nunca seja ambígua.
    fn ensure_unique(&self, name: &str) -> Result<(), ConfigurationError> {
        let taken = self.inputs.iter().any(|v| v.name() == name)
            || self.outputs.iter().any(|v| v.name() == name);
        if taken {
            Err(ConfigurationError::DuplicateVariable(name.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn add_input_variable(&mut self, variable: InputVariable) -> Result<(), ConfigurationError> {
        self.ensure_unique(variable.name())?;
        tracing::debug!(engine = %self.name, variable = %variable.name(), terms = variable.terms().len(), "Entrada registrada");
        self.inputs.push(variable);
        Ok(())
    }

    pub fn add_output_variable(&mut self, variable: OutputVariable) -> Result<(), ConfigurationError> {
        self.ensure_unique(variable.name())?;
        tracing::debug!(engine = %self.name, variable = %variable.name(), terms = variable.terms().len(), "Saída registrada");
        self.outputs.push(variable);
        Ok(())
    }

    /// Registra um bloco, analisando e resolvendo cada regra agora.
    ///
    /// Qualquer nome não resolvido falha aqui, nunca na avaliação.
    pub fn add_rule_block<I, S>(
        &mut self,
        name: &str,
        settings: RuleBlockSettings,
        rules: I,
    ) -> Result<(), ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.rule_blocks.iter().any(|b| b.name() == name) {
            return Err(ConfigurationError::DuplicateRuleBlock(name.to_string()));
        }
        let rules = rules
            .into_iter()
            .map(|text| Rule::parse(text.as_ref(), &self.inputs, &self.outputs))
            .collect::<Result<Vec<_>, _>>()?;
        let block = RuleBlock::new(name, settings, rules)?;
        tracing::debug!(engine = %self.name, block = %name, rules = block.rules().len(), "Bloco de regras registrado");
        self.rule_blocks.push(block);
        Ok(())
    }

    pub fn input_variables(&self) -> &[InputVariable] {
        &self.inputs
    }

    pub fn output_variables(&self) -> &[OutputVariable] {
        &self.outputs
    }

    pub fn rule_blocks(&self) -> &[RuleBlock] {
        &self.rule_blocks
    }

    pub fn input_variable(&self, name: &str) -> Option<&InputVariable> {
        self.inputs.iter().find(|v| v.name() == name)
    }

    pub fn output_variable(&self, name: &str) -> Option<&OutputVariable> {
        self.outputs.iter().find(|v| v.name() == name)
    }

    fn rule_block_mut(&mut self, name: &str) -> Result<&mut RuleBlock, ConfigurationError> {
        self.rule_blocks
            .iter_mut()
            .find(|b| b.name() == name)
            .ok_or_else(|| ConfigurationError::UnknownRuleBlock(name.to_string()))
    }

    pub fn set_rule_block_enabled(&mut self, name: &str, enabled: bool) -> Result<(), ConfigurationError> {
        self.rule_block_mut(name)?.set_enabled(enabled);
        Ok(())
    }

    pub fn set_rule_enabled(&mut self, block: &str, index: usize, enabled: bool) -> Result<(), ConfigurationError> {
        let rule_block = self.rule_block_mut(block)?;
        match rule_block.rule_mut(index) {
            Some(rule) => {
                rule.set_enabled(enabled);
                Ok(())
            }
            None => Err(ConfigurationError::UnknownRule {
                block: block.to_string(),
                index,
            }),
        }
    }

    /// Verifica se há entradas, saídas e blocos suficientes para avaliar.
    pub fn is_ready(&self) -> Result<(), ConfigurationError> {
        if self.inputs.is_empty() {
            return Err(ConfigurationError::NotReady("nenhuma variável de entrada".into()));
        }
        if self.outputs.is_empty() {
            return Err(ConfigurationError::NotReady("nenhuma variável de saída".into()));
        }
        if self.rule_blocks.is_empty() {
            return Err(ConfigurationError::NotReady("nenhum bloco de regras".into()));
        }
        Ok(())
    }

    /// Avalia o motor para um conjunto de entradas nítidas.
    ///
    /// Todas as variáveis de entrada devem ser informadas.
    ///
    /// # Erros
    ///
    /// - [`ConfigurationError::NotReady`]: motor incompleto
    /// - [`EvaluationError::UnknownInput`] / [`EvaluationError::MissingInput`]
    /// - [`EvaluationError::OutOfRange`]: com `RangePolicy::Reject`
    /// - [`EvaluationError::NotANumber`]
    pub fn evaluate<I, K>(&self, inputs: I) -> Result<Outputs, FuzzyError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        self.with_context(|ctx| self.run(inputs, ctx, None))
    }

    /// Como [`evaluate`](Engine::evaluate), mas devolve também a
    /// fuzzificação das entradas e a força de cada regra.
    pub fn explain<I, K>(&self, inputs: I) -> Result<Explanation, FuzzyError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        self.with_context(|ctx| {
            let mut rules = Vec::new();
            let outputs = self.run(inputs, ctx, Some(&mut rules))?;
            let inputs = self
                .inputs
                .iter()
                .zip(ctx.values.iter().zip(&ctx.degrees))
                .map(|(variable, (value, degrees))| FuzzifiedInput {
                    name: variable.name().to_string(),
                    value: *value,
                    degrees: variable
                        .terms()
                        .iter()
                        .zip(degrees)
                        .map(|(t, d)| (t.name.clone(), *d))
                        .collect(),
                })
                .collect();
            Ok(Explanation {
                inputs,
                rules,
                outputs,
            })
        })
    }

    /// Avalia vários conjuntos de entradas em paralelo (rayon).
    ///
    /// O resultado `i` corresponde a `batch[i]`.
    pub fn evaluate_batch(&self, batch: &[HashMap<String, f64>]) -> Vec<Result<Outputs, FuzzyError>> {
        batch
            .par_iter()
            .map(|inputs| self.evaluate(inputs.iter().map(|(k, v)| (k.as_str(), *v))))
            .collect()
    }

    fn with_context<T>(&self, f: impl FnOnce(&mut Evaluation) -> T) -> T {
        let mut ctx = self.scratch.lock().pop().unwrap_or_default();
        let result = f(&mut ctx);
        let mut pool = self.scratch.lock();
        if pool.len() < MAX_POOLED_CONTEXTS {
            pool.push(ctx);
        }
        result
    }

    fn run<I, K>(
        &self,
        inputs: I,
        ctx: &mut Evaluation,
        mut firings: Option<&mut Vec<RuleFiring>>,
    ) -> Result<Outputs, FuzzyError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        self.is_ready()?;
        ctx.prepare(self.inputs.len(), self.outputs.len());

        // 1. valores nítidos
        let mut seen = vec![false; self.inputs.len()];
        for (name, value) in inputs {
            let name = name.as_ref();
            let index = self
                .inputs
                .iter()
                .position(|v| v.name() == name)
                .ok_or_else(|| EvaluationError::UnknownInput(name.to_string()))?;
            ctx.values[index] = self.inputs[index].set_value(value)?;
            seen[index] = true;
        }
        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(EvaluationError::MissingInput(self.inputs[missing].name().to_string()).into());
        }

        // 2. fuzzificação
        for (i, variable) in self.inputs.iter().enumerate() {
            let value = ctx.values[i];
            ctx.degrees[i].extend(variable.terms().iter().map(|t| t.membership(value)));
        }

        // 3-4. blocos de regras sobre conjuntos recém-zerados
        for block in self.rule_blocks.iter().filter(|b| b.is_enabled()) {
            let fired = block.activate(&ctx.degrees, &mut ctx.aggregated);
            if let Some(trace) = firings.as_deref_mut() {
                trace.extend(fired.into_iter().map(|f| RuleFiring {
                    block: block.name().to_string(),
                    rule: block.rules()[f.rule].text().to_string(),
                    strength: f.strength,
                    activated: f.activated,
                }));
            }
        }

        // 5. defuzzificação
        let outputs: Outputs = self
            .outputs
            .iter()
            .zip(&ctx.aggregated)
            .map(|(variable, set)| (variable.name().to_string(), variable.defuzzify(set)))
            .collect();

        tracing::debug!(engine = %self.name, ?outputs, "Avaliação concluída");
        Ok(outputs)
    }
}
