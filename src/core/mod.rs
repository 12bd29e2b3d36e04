//! # Módulo Core — Blocos Fundamentais da Lógica Fuzzy
//!
//! Este módulo agrupa os **tipos folha** do motor de inferência, na ordem
//! em que os dados fluem:
//!
//! - [`Term`] / [`Shape`] — funções de pertinência (triângulo, trapézio, ...)
//! - [`InputVariable`] / [`OutputVariable`] — variáveis linguísticas com domínio
//! - [`TNorm`] / [`SNorm`] — operadores de conjunção, disjunção, implicação e agregação
//! - [`AggregatedSet`] — conjunto fuzzy de uma saída, reconstruído a cada avaliação
//! - [`Defuzzifier`] — conversão do conjunto agregado em um número
//!
//! Nenhum tipo aqui conhece regras ou o motor: o fluxo é estritamente
//! para frente (valor nítido → graus → conjunto agregado → valor nítido).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use fuzzy_risk::core::{InputVariable, Term};
//!
//! let funding = InputVariable::new(
//!     "project_funding",
//!     0.0,
//!     100.0,
//!     vec![
//!         Term::trapezoid("inadequate", 0.0, 0.0, 20.0, 30.0).unwrap(),
//!         Term::triangle("marginal", 20.0, 50.0, 80.0).unwrap(),
//!         Term::trapezoid("adequate", 60.0, 80.0, 100.0, 100.0).unwrap(),
//!     ],
//! )
//! .unwrap();
//!
//! let degrees = funding.fuzzify(25.0);
//! assert_eq!(degrees[2], ("adequate", 0.0));
//! ```

/// Sub-módulo com [`Term`] e as formas de pertinência.
pub mod term;

/// Sub-módulo com as normas [`TNorm`] e [`SNorm`].
pub mod norm;

/// Sub-módulo com [`InputVariable`], [`OutputVariable`] e [`AggregatedSet`].
pub mod variable;

/// Sub-módulo com os métodos de [`Defuzzifier`].
pub mod defuzzifier;

pub use defuzzifier::Defuzzifier;
pub use norm::{SNorm, TNorm};
pub use term::{Shape, Term};
pub use variable::{format_degrees, AggregatedSet, ClippedTerm, InputVariable, OutputVariable, RangePolicy};
