//! # Normas — Conjunção, Disjunção, Implicação e Agregação
//!
//! Os operadores do motor formam dois conjuntos **fechados**:
//!
//! - [`TNorm`] — conjunção (`and`) e implicação (recorte do consequente)
//! - [`SNorm`] — disjunção (`or`) e agregação (união dos consequentes)
//!
//! | T-norma | `apply(a, b)` | S-norma | `apply(a, b)` |
//! |---------|---------------|---------|---------------|
//! | `Minimum` | `min(a, b)` | `Maximum` | `max(a, b)` |
//! | `AlgebraicProduct` | `a·b` | `AlgebraicSum` | `a + b − a·b` |
//! | `BoundedDifference` | `max(0, a + b − 1)` | `BoundedSum` | `min(1, a + b)` |
//! | `DrasticProduct` | `b se a = 1; a se b = 1; 0` | `DrasticSum` | `b se a = 0; a se b = 0; 1` |
//!
//! O neutro de toda S-norma é 0, então um consequente com altura 0 nunca
//! altera o conjunto agregado.

use serde::{Deserialize, Serialize};

/// Norma triangular (conjunção / implicação).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TNorm {
    #[default]
    Minimum,
    AlgebraicProduct,
    BoundedDifference,
    DrasticProduct,
}

impl TNorm {
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            TNorm::Minimum => a.min(b),
            TNorm::AlgebraicProduct => a * b,
            TNorm::BoundedDifference => (a + b - 1.0).max(0.0),
            TNorm::DrasticProduct => {
                if a == 1.0 {
                    b
                } else if b == 1.0 {
                    a
                } else {
                    0.0
                }
            }
        }
    }
}

/// Co-norma triangular (disjunção / agregação).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SNorm {
    #[default]
    Maximum,
    AlgebraicSum,
    BoundedSum,
    DrasticSum,
}

impl SNorm {
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            SNorm::Maximum => a.max(b),
            SNorm::AlgebraicSum => a + b - a * b,
            SNorm::BoundedSum => (a + b).min(1.0),
            SNorm::DrasticSum => {
                if a == 0.0 {
                    b
                } else if b == 0.0 {
                    a
                } else {
                    1.0
                }
            }
        }
    }
}
