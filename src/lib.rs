//! # Fuzzy Risk — Motor de Inferência Fuzzy Mamdani
//!
//! Biblioteca que avalia bases de regras fuzzy do tipo Mamdani:
//! entradas nítidas são **fuzzificadas** em termos linguísticos, regras
//! `if ... then ...` disparam com uma força em `[0, 1]`, os consequentes
//! recortados são **agregados** por saída e o conjunto resultante é
//! **defuzzificado** em um número.
//!
//! ## Arquitetura em Camadas
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  main.rs (CLI clap)  ·  persistence (JSON)   │
//! ├──────────────────────────────────────────────┤
//! │  config (EngineConfig)  ·  presets           │
//! ├──────────────────────────────────────────────┤
//! │  engine — Engine, Evaluation, Explanation    │
//! ├──────────────────────────────────────────────┤
//! │  inference — parser, rules, rule_block       │
//! ├──────────────────────────────────────────────┤
//! │  core — term, norm, variable, defuzzifier    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Exemplo
//!
//! ```rust
//! let engine = fuzzy_risk::presets::project_risk().unwrap();
//! let out = engine
//!     .evaluate([("project_funding", 25.0), ("project_staffing", 55.0)])
//!     .unwrap();
//! assert!((out["risk"] - 19.63).abs() < 0.5);
//! ```

/// Tipos fundamentais: termos, normas, variáveis e defuzzificadores.
pub mod core;

/// Regras: parser, resolução e blocos.
pub mod inference;

/// Motor e contexto de avaliação.
pub mod engine;

/// Configuração serializável do motor.
pub mod config;

/// Leitura e gravação de configurações em disco.
pub mod persistence;

/// Motores prontos.
pub mod presets;

/// Erros de configuração e de avaliação.
pub mod error;

pub use config::EngineConfig;
pub use engine::{Engine, Explanation, Outputs};
pub use error::{ConfigurationError, EvaluationError, FuzzyError};
