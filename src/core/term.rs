//! # Term — Funções de Pertinência
//!
//! Um [`Term`] é um **rótulo linguístico** ("adequado", "pequeno", "baixo")
//! associado a uma função de pertinência que mapeia um valor nítido (crisp)
//! para um grau em `[0, 1]`.
//!
//! ## Formas Suportadas ([`Shape`])
//!
//! | Forma | Parâmetros | Suporte | Topo (grau 1) |
//! |-------|------------|---------|---------------|
//! | `Triangle` | `a ≤ b ≤ c` | `[a, c]` | `b` |
//! | `Trapezoid` | `a ≤ b ≤ c ≤ d` | `[a, d]` | `[b, c]` |
//! | `Rectangle` | `start ≤ end` | `[start, end]` | `[start, end]` |
//! | `Gaussian` | `mean`, `sd > 0` | `ℝ` | `mean` |
//!
//! Triângulos e trapézios são lineares por partes. Quando dois pontos de
//! quebra consecutivos coincidem (`a = b`, por exemplo) a borda vira um
//! **degrau vertical** — isso é válido, não é erro:
//!
//! ```text
//! Trapezoid(0, 0, 20, 40)       ("low" do risco)
//!
//! 1 ┤█████████████╲
//!   │             ╲
//! 0 ┼──────────────╲─────────
//!   0            20   40
//! ```
//!
//! ## Exemplo
//!
//! ```rust
//! use fuzzy_risk::core::Term;
//!
//! let small = Term::trapezoid("small", 0.0, 0.0, 30.0, 57.0).unwrap();
//! assert!((small.membership(55.0) - 2.0 / 27.0).abs() < 1e-9);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Forma geométrica de uma função de pertinência.
///
/// Serializada com a tag `shape`, por exemplo
/// `{"shape": "triangle", "a": 20, "b": 50, "c": 80}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Triangle { a: f64, b: f64, c: f64 },
    Trapezoid { a: f64, b: f64, c: f64, d: f64 },
    Rectangle { start: f64, end: f64 },
    Gaussian { mean: f64, sd: f64 },
}

impl Shape {
    /// Avalia a forma em `x`. Sempre retorna um valor em `[0, 1]`.
    pub fn membership(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }
        match *self {
            Shape::Triangle { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    // x ≥ a e x < b implica a < b
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            Shape::Trapezoid { a, b, c, d } => {
                if x < a || x > d {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else if x <= c {
                    1.0
                } else if x < d {
                    (d - x) / (d - c)
                } else {
                    0.0
                }
            }
            Shape::Rectangle { start, end } => {
                if x >= start && x <= end {
                    1.0
                } else {
                    0.0
                }
            }
            Shape::Gaussian { mean, sd } => (-(x - mean).powi(2) / (2.0 * sd * sd)).exp(),
        }
    }

    /// Pontos de quebra na ordem declarada (para validação e exibição).
    fn points(&self) -> Vec<f64> {
        match *self {
            Shape::Triangle { a, b, c } => vec![a, b, c],
            Shape::Trapezoid { a, b, c, d } => vec![a, b, c, d],
            Shape::Rectangle { start, end } => vec![start, end],
            Shape::Gaussian { mean, sd } => vec![mean, sd],
        }
    }
}

/// Termo linguístico nomeado: `{name, shape}`.
///
/// A única forma de construir um termo fora da desserialização é pelos
/// construtores validados ([`Term::triangle`], [`Term::trapezoid`], ...),
/// que rejeitam pontos de quebra fora de ordem. Termos desserializados são
/// validados por [`Term::validate`] quando a variável é criada.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    #[serde(flatten)]
    pub shape: Shape,
}

impl Term {
    /// Cria um termo a partir de uma forma qualquer, validando-a.
    pub fn new(name: impl Into<String>, shape: Shape) -> Result<Self, ConfigurationError> {
        let term = Self {
            name: name.into(),
            shape,
        };
        term.validate()?;
        Ok(term)
    }

    pub fn triangle(name: impl Into<String>, a: f64, b: f64, c: f64) -> Result<Self, ConfigurationError> {
        Self::new(name, Shape::Triangle { a, b, c })
    }

    pub fn trapezoid(
        name: impl Into<String>,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, Shape::Trapezoid { a, b, c, d })
    }

    pub fn rectangle(name: impl Into<String>, start: f64, end: f64) -> Result<Self, ConfigurationError> {
        Self::new(name, Shape::Rectangle { start, end })
    }

    pub fn gaussian(name: impl Into<String>, mean: f64, sd: f64) -> Result<Self, ConfigurationError> {
        Self::new(name, Shape::Gaussian { mean, sd })
    }

    /// Grau de pertinência de `x` neste termo.
    pub fn membership(&self, x: f64) -> f64 {
        self.shape.membership(x)
    }

    /// Verifica as invariantes da forma.
    ///
    /// - nome não vazio;
    /// - todos os parâmetros finitos;
    /// - triângulo/trapézio/retângulo: pontos não-decrescentes;
    /// - gaussiana: desvio padrão estritamente positivo.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName("termo"));
        }
        let points = self.shape.points();
        if points.iter().any(|p| !p.is_finite()) {
            return Err(ConfigurationError::InvalidBreakpoints {
                term: self.name.clone(),
                points,
            });
        }
        if let Shape::Gaussian { sd, .. } = self.shape {
            if sd <= 0.0 {
                return Err(ConfigurationError::InvalidParameter {
                    term: self.name.clone(),
                    reason: format!("desvio padrão {} deve ser positivo", sd),
                });
            }
            return Ok(());
        }
        if points.windows(2).any(|w| w[0] > w[1]) {
            return Err(ConfigurationError::InvalidBreakpoints {
                term: self.name.clone(),
                points,
            });
        }
        Ok(())
    }
}

/// Formato compatível com FLL: `low Trapezoid 0.000 0.000 20.000 40.000`.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.shape {
            Shape::Triangle { .. } => "Triangle",
            Shape::Trapezoid { .. } => "Trapezoid",
            Shape::Rectangle { .. } => "Rectangle",
            Shape::Gaussian { .. } => "Gaussian",
        };
        write!(f, "{} {}", self.name, kind)?;
        for p in self.shape.points() {
            write!(f, " {:.3}", p)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn triangle_peak_and_feet() {
        let t = Term::triangle("marginal", 20.0, 50.0, 80.0).unwrap();
        assert_eq!(t.membership(20.0), 0.0);
        assert_eq!(t.membership(50.0), 1.0);
        assert_eq!(t.membership(80.0), 0.0);
        assert!((t.membership(35.0) - 0.5).abs() < 1e-12);
        assert!((t.membership(65.0) - 0.5).abs() < 1e-12);
        assert_eq!(t.membership(-1.0), 0.0);
        assert_eq!(t.membership(81.0), 0.0);
    }

    #[test]
    fn triangle_with_vertical_edge() {
        let t = Term::triangle("left", 0.0, 0.0, 10.0).unwrap();
        assert_eq!(t.membership(0.0), 1.0);
        assert!((t.membership(5.0) - 0.5).abs() < 1e-12);
        assert_eq!(t.membership(-0.001), 0.0);
    }

    #[test]
    fn trapezoid_plateau() {
        let t = Term::trapezoid("small", 0.0, 0.0, 30.0, 57.0).unwrap();
        assert_eq!(t.membership(0.0), 1.0);
        assert_eq!(t.membership(30.0), 1.0);
        assert!((t.membership(55.0) - 2.0 / 27.0).abs() < 1e-12);
        assert_eq!(t.membership(57.0), 0.0);
    }

    #[test]
    fn trapezoid_right_shoulder_reaches_domain_end() {
        let t = Term::trapezoid("adequate", 60.0, 80.0, 100.0, 100.0).unwrap();
        assert_eq!(t.membership(100.0), 1.0);
        assert_eq!(t.membership(25.0), 0.0);
        assert!((t.membership(70.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rectangle_and_gaussian() {
        let r = Term::rectangle("mid", 40.0, 60.0).unwrap();
        assert_eq!(r.membership(40.0), 1.0);
        assert_eq!(r.membership(60.1), 0.0);

        let g = Term::gaussian("around50", 50.0, 10.0).unwrap();
        assert_eq!(g.membership(50.0), 1.0);
        assert!(g.membership(70.0) < g.membership(60.0));
    }

    #[test]
    fn nan_is_not_a_member() {
        let t = Term::triangle("t", 0.0, 5.0, 10.0).unwrap();
        assert_eq!(t.membership(f64::NAN), 0.0);
    }

    #[test]
    fn rejects_decreasing_breakpoints() {
        let err = Term::triangle("bad", 10.0, 5.0, 20.0).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidBreakpoints { .. }));
        assert!(Term::trapezoid("bad", 0.0, 10.0, 5.0, 20.0).is_err());
        assert!(Term::rectangle("bad", 2.0, 1.0).is_err());
    }

    #[test]
    fn rejects_non_finite_and_bad_sd() {
        assert!(Term::triangle("inf", 0.0, f64::INFINITY, 1.0).is_err());
        assert!(matches!(
            Term::gaussian("flat", 0.0, 0.0),
            Err(ConfigurationError::InvalidParameter { .. })
        ));
        assert!(matches!(
            Term::triangle("  ", 0.0, 1.0, 2.0),
            Err(ConfigurationError::EmptyName(_))
        ));
    }

    #[test]
    fn serde_shape_tag() {
        let json = r#"{"name":"low","shape":"trapezoid","a":0,"b":0,"c":20,"d":40}"#;
        let t: Term = serde_json::from_str(json).unwrap();
        assert_eq!(t, Term::trapezoid("low", 0.0, 0.0, 20.0, 40.0).unwrap());
    }

    #[test]
    fn display_fll_style() {
        let t = Term::triangle("normal", 20.0, 50.0, 80.0).unwrap();
        assert_eq!(t.to_string(), "normal Triangle 20.000 50.000 80.000");
    }

    fn sorted3() -> impl Strategy<Value = (f64, f64, f64)> {
        prop::array::uniform3(-100.0f64..100.0).prop_map(|mut p| {
            p.sort_by(|x, y| x.partial_cmp(y).unwrap());
            (p[0], p[1], p[2])
        })
    }

    fn sorted4() -> impl Strategy<Value = (f64, f64, f64, f64)> {
        prop::array::uniform4(-100.0f64..100.0).prop_map(|mut p| {
            p.sort_by(|x, y| x.partial_cmp(y).unwrap());
            (p[0], p[1], p[2], p[3])
        })
    }

    proptest! {
        #[test]
        fn triangle_is_bounded_and_monotonic((a, b, c) in sorted3(), x in -150.0f64..150.0, dx in 0.0f64..10.0) {
            let t = Term::triangle("t", a, b, c).unwrap();
            let m = t.membership(x);
            prop_assert!((0.0..=1.0).contains(&m));
            prop_assert_eq!(t.membership(b), 1.0);
            if a < b {
                prop_assert_eq!(t.membership(a), 0.0);
            }
            // subida não-decrescente, descida não-crescente
            let y = x + dx;
            if y <= b {
                prop_assert!(t.membership(x) <= t.membership(y) + 1e-12);
            }
            if x >= b {
                prop_assert!(t.membership(x) + 1e-12 >= t.membership(y));
            }
        }

        #[test]
        fn trapezoid_is_bounded_and_monotonic((a, b, c, d) in sorted4(), x in -150.0f64..150.0, dx in 0.0f64..10.0) {
            let t = Term::trapezoid("t", a, b, c, d).unwrap();
            prop_assert!((0.0..=1.0).contains(&t.membership(x)));
            if a < b {
                prop_assert_eq!(t.membership(a), 0.0);
            }
            let mid = b + (c - b) / 2.0;
            prop_assert_eq!(t.membership(b), 1.0);
            prop_assert_eq!(t.membership(mid), 1.0);
            prop_assert_eq!(t.membership(c), 1.0);
            let y = x + dx;
            if y <= b {
                prop_assert!(t.membership(x) <= t.membership(y) + 1e-12);
            }
            if x >= c {
                prop_assert!(t.membership(x) + 1e-12 >= t.membership(y));
            }
        }
    }
}
