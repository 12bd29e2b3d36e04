//! # Módulo Inference — Regras e Blocos de Regras
//!
//! Este módulo contém a parte **simbólica** do motor: o texto das regras,
//! sua resolução contra as variáveis e o disparo em blocos.
//!
//! ## Fases
//!
//! | Fase | Sub-módulo | Resultado |
//! |------|------------|-----------|
//! | Análise | [`parser`] | AST com nomes |
//! | Resolução | [`rules`] | [`Rule`] com índices |
//! | Disparo | [`rule_block`] | consequentes acumulados por saída |
//!
//! ## Exemplo
//!
//! ```text
//! "if (project_funding is adequate or project_staffing is small) then risk is low"
//!   project_funding = 25 → adequate = 0.000
//!   project_staffing = 55 → small   = 0.074
//!   or (max) → força 0.074 → "low" recortado em 0.074
//! ```

/// Tokenizador e parser da gramática de regras.
pub mod parser;

/// Regras resolvidas (antecedente + consequentes por índice).
pub mod rules;

/// Blocos de regras, operadores e políticas de ativação.
pub mod rule_block;

pub use rule_block::{Activation, Firing, RuleBlock, RuleBlockSettings};
pub use rules::{Antecedent, Consequent, Rule};
