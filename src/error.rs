//! # Erros — Configuração vs. Avaliação
//!
//! O motor distingue duas famílias de falha:
//!
//! | Família | Quando ocorre | Exemplo |
//! |---------|---------------|---------|
//! | [`ConfigurationError`] | Ao montar o motor (termos, variáveis, regras) | `"staffing is huge"` com termo inexistente |
//! | [`EvaluationError`] | Em cada chamada a `evaluate` | entrada `"budget"` desconhecida |
//!
//! Erros de configuração falham **imediatamente** — nunca são adiados para a
//! avaliação. A defuzzificação degenerada (conjunto agregado vazio) **não** é
//! um erro: cai no `default_value` da variável de saída.
//!
//! [`FuzzyError`] agrega as duas famílias para quem chama
//! [`Engine::evaluate`](crate::engine::Engine::evaluate).

use thiserror::Error;

/// Falha detectada ao configurar o motor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("termo '{term}': pontos de quebra inválidos {points:?} (devem ser finitos e não-decrescentes)")]
    InvalidBreakpoints { term: String, points: Vec<f64> },

    #[error("termo '{term}': parâmetro inválido ({reason})")]
    InvalidParameter { term: String, reason: String },

    #[error("variável '{variable}': intervalo inválido [{min}, {max}]")]
    InvalidRange { variable: String, min: f64, max: f64 },

    #[error("nome vazio para {0}")]
    EmptyName(&'static str),

    #[error("variável duplicada: '{0}'")]
    DuplicateVariable(String),

    #[error("variável '{variable}': termo duplicado '{term}'")]
    DuplicateTerm { variable: String, term: String },

    #[error("bloco de regras duplicado: '{0}'")]
    DuplicateRuleBlock(String),

    #[error("regra '{rule}': erro de sintaxe ({message})")]
    Syntax { rule: String, message: String },

    /// `and` e `or` misturados no mesmo nível sem parênteses.
    #[error("regra '{rule}': 'and' e 'or' misturados sem parênteses são ambíguos")]
    AmbiguousOperators { rule: String },

    #[error("regra '{rule}': variável desconhecida '{variable}'")]
    UnknownVariable { rule: String, variable: String },

    #[error("regra '{rule}': variável '{variable}' não possui o termo '{term}'")]
    UnknownTerm {
        rule: String,
        variable: String,
        term: String,
    },

    /// Variável de saída usada no antecedente, ou de entrada no consequente.
    #[error("regra '{rule}': '{variable}' não é uma variável de {expected}")]
    WrongVariableKind {
        rule: String,
        variable: String,
        expected: &'static str,
    },

    #[error("regra '{rule}': peso {weight} fora de [0, 1]")]
    InvalidWeight { rule: String, weight: f64 },

    #[error("resolução de defuzzificação inválida: {0} (deve estar entre 1 e 1000000)")]
    InvalidResolution(usize),

    #[error("política de ativação inválida: {0}")]
    InvalidActivation(String),

    #[error("bloco de regras desconhecido: '{0}'")]
    UnknownRuleBlock(String),

    #[error("bloco '{block}': regra {index} não existe")]
    UnknownRule { block: String, index: usize },

    /// O motor ainda não tem o mínimo para avaliar (saídas, blocos).
    #[error("motor não está pronto: {0}")]
    NotReady(String),
}

/// Falha detectada durante uma avaliação.
///
/// Uma avaliação com erro não devolve nenhuma saída parcial.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("entrada desconhecida: '{0}'")]
    UnknownInput(String),

    #[error("entrada não informada: '{0}'")]
    MissingInput(String),

    #[error("entrada '{variable}' = {value} fora do domínio [{min}, {max}]")]
    OutOfRange {
        variable: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("entrada '{0}' não é um número")]
    NotANumber(String),
}

/// Erro de topo retornado pelas operações do motor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuzzyError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
