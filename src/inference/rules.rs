//! # Regras Fuzzy — Antecedente Resolvido e Consequentes
//!
//! Segunda fase da construção de uma regra: a AST produzida pelo
//! [`parser`](super::parser) tem seus nomes **resolvidos para índices** nas
//! tabelas de variáveis do motor. A [`Rule`] final guarda apenas índices —
//! nenhuma busca por string acontece durante a avaliação e não existe
//! referência pendente para uma variável inexistente.
//!
//! ## Como Funciona
//!
//! ```text
//! "if (project_funding is adequate or project_staffing is small) then risk is low"
//!          │ parser::parse
//!          ▼
//! Binary(Or, Prop("project_funding","adequate"), Prop("project_staffing","small"))
//!          │ resolve (entradas: [project_funding, project_staffing])
//!          ▼
//! Or(Proposition{input: 0, term: 2}, Proposition{input: 1, term: 0})
//!   → Consequent{output: 0, term: 0, weight: 1.0}
//! ```
//!
//! ## Avaliação do Antecedente
//!
//! | Nó | Grau |
//! |----|------|
//! | `Proposition` | grau fuzzificado da entrada no termo; `not` → `1 − d` |
//! | `And(l, r)` | `conjunction(l, r)` — padrão `min` |
//! | `Or(l, r)` | `disjunction(l, r)` — padrão `max` |
//!
//! A força de disparo da regra é o grau do antecedente.

use super::parser::{self, Connective, Expr};
use crate::core::{InputVariable, OutputVariable, SNorm, TNorm};
use crate::error::ConfigurationError;

/// Árvore do antecedente com índices `[entrada][termo]`.
#[derive(Clone, Debug, PartialEq)]
pub enum Antecedent {
    Proposition {
        input: usize,
        term: usize,
        negated: bool,
    },
    And(Box<Antecedent>, Box<Antecedent>),
    Or(Box<Antecedent>, Box<Antecedent>),
}

impl Antecedent {
    /// Grau do antecedente dado `degrees[entrada][termo]`.
    pub fn evaluate(&self, degrees: &[Vec<f64>], conjunction: TNorm, disjunction: SNorm) -> f64 {
        match self {
            Antecedent::Proposition {
                input,
                term,
                negated,
            } => {
                let d = degrees[*input][*term];
                if *negated {
                    1.0 - d
                } else {
                    d
                }
            }
            Antecedent::And(l, r) => conjunction.apply(
                l.evaluate(degrees, conjunction, disjunction),
                r.evaluate(degrees, conjunction, disjunction),
            ),
            Antecedent::Or(l, r) => disjunction.apply(
                l.evaluate(degrees, conjunction, disjunction),
                r.evaluate(degrees, conjunction, disjunction),
            ),
        }
    }
}

/// Um consequente `saída is termo with peso`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Consequent {
    pub output: usize,
    pub term: usize,
    pub weight: f64,
}

/// Regra imutável, criada uma única vez na configuração.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    text: String,
    enabled: bool,
    antecedent: Antecedent,
    consequents: Vec<Consequent>,
}

impl Rule {
    /// Analisa e resolve o texto contra as variáveis registradas.
    ///
    /// # Erros
    ///
    /// - sintaxe inválida ou `and`/`or` misturados sem parênteses;
    /// - variável ou termo desconhecido;
    /// - variável de saída no antecedente (ou de entrada no consequente).
    pub fn parse(
        text: &str,
        inputs: &[InputVariable],
        outputs: &[OutputVariable],
    ) -> Result<Self, ConfigurationError> {
        let ast = parser::parse(text)?;
        let resolver = Resolver {
            text,
            inputs,
            outputs,
        };
        let antecedent = resolver.antecedent(&ast.antecedent)?;
        let consequents = ast
            .conclusions
            .iter()
            .map(|c| resolver.consequent(&c.variable, &c.term, c.weight))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            text: text.trim().to_string(),
            enabled: true,
            antecedent,
            consequents,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn antecedent(&self) -> &Antecedent {
        &self.antecedent
    }

    pub fn consequents(&self) -> &[Consequent] {
        &self.consequents
    }

    /// Força de disparo = grau do antecedente.
    pub fn firing_strength(&self, degrees: &[Vec<f64>], conjunction: TNorm, disjunction: SNorm) -> f64 {
        self.antecedent.evaluate(degrees, conjunction, disjunction)
    }
}

struct Resolver<'a> {
    text: &'a str,
    inputs: &'a [InputVariable],
    outputs: &'a [OutputVariable],
}

impl Resolver<'_> {
    fn antecedent(&self, expr: &Expr) -> Result<Antecedent, ConfigurationError> {
        match expr {
            Expr::Proposition {
                variable,
                term,
                negated,
            } => {
                let input = match self.inputs.iter().position(|v| v.name() == variable) {
                    Some(i) => i,
                    None => return Err(self.missing_variable(variable, "entrada")),
                };
                let term_index = self.inputs[input]
                    .term_index(term)
                    .ok_or_else(|| self.unknown_term(variable, term))?;
                Ok(Antecedent::Proposition {
                    input,
                    term: term_index,
                    negated: *negated,
                })
            }
            Expr::Binary {
                connective,
                left,
                right,
            } => {
                let l = Box::new(self.antecedent(left)?);
                let r = Box::new(self.antecedent(right)?);
                Ok(match connective {
                    Connective::And => Antecedent::And(l, r),
                    Connective::Or => Antecedent::Or(l, r),
                })
            }
        }
    }

    fn consequent(&self, variable: &str, term: &str, weight: f64) -> Result<Consequent, ConfigurationError> {
        let output = match self.outputs.iter().position(|v| v.name() == variable) {
            Some(i) => i,
            None => return Err(self.missing_variable(variable, "saída")),
        };
        let term_index = self.outputs[output]
            .term_index(term)
            .ok_or_else(|| self.unknown_term(variable, term))?;
        Ok(Consequent {
            output,
            term: term_index,
            weight,
        })
    }

    /// Distingue "não existe" de "existe, mas do tipo errado".
    fn missing_variable(&self, variable: &str, expected: &'static str) -> ConfigurationError {
        let exists = self.inputs.iter().any(|v| v.name() == variable)
            || self.outputs.iter().any(|v| v.name() == variable);
        if exists {
            ConfigurationError::WrongVariableKind {
                rule: self.text.to_string(),
                variable: variable.to_string(),
                expected,
            }
        } else {
            ConfigurationError::UnknownVariable {
                rule: self.text.to_string(),
                variable: variable.to_string(),
            }
        }
    }

    fn unknown_term(&self, variable: &str, term: &str) -> ConfigurationError {
        ConfigurationError::UnknownTerm {
            rule: self.text.to_string(),
            variable: variable.to_string(),
            term: term.to_string(),
        }
    }
}
