//! # Defuzzificação — Do Conjunto Agregado ao Número
//!
//! Todos os métodos discretizam o domínio `[min, max]` em `resolution`
//! amostras nos pontos médios de cada intervalo:
//!
//! ```text
//! dx  = (max − min) / resolution
//! x_i = min + (i + ½)·dx,   i = 0 .. resolution−1
//! ```
//!
//! | Método | Resultado |
//! |--------|-----------|
//! | `Centroid` | `Σ x_i·μ_i / Σ μ_i` (centro de gravidade) |
//! | `Bisector` | primeiro `x_i` onde a área acumulada atinge metade do total |
//! | `SmallestOfMaximum` | menor `x_i` com `μ_i` máximo |
//! | `LargestOfMaximum` | maior `x_i` com `μ_i` máximo |
//! | `MeanOfMaximum` | média do menor e do maior `x_i` com `μ_i` máximo |
//!
//! Se o conjunto não tem suporte (`Σ μ_i ≤ ε`) o resultado é `None` e a
//! variável de saída usa o seu `default_value`. A divisão por zero nunca
//! chega a quem chamou.
//!
//! Resoluções maiores aumentam a precisão com custo linear em tempo; a
//! memória é constante (as amostras não são guardadas). A resolução é
//! limitada a [`MAX_RESOLUTION`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Abaixo disso o conjunto agregado é considerado vazio.
pub const EPSILON: f64 = 1e-9;

/// Resolução de referência (100 amostras no domínio).
pub const DEFAULT_RESOLUTION: usize = 100;

/// Maior resolução aceita na configuração.
pub const MAX_RESOLUTION: usize = 1_000_000;

/// Método de defuzzificação.
///
/// Serializado como `{"method": "centroid", "resolution": 100}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Defuzzifier {
    Centroid { resolution: usize },
    Bisector { resolution: usize },
    MeanOfMaximum { resolution: usize },
    SmallestOfMaximum { resolution: usize },
    LargestOfMaximum { resolution: usize },
}

impl Default for Defuzzifier {
    fn default() -> Self {
        Defuzzifier::Centroid {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl Defuzzifier {
    pub fn centroid(resolution: usize) -> Self {
        Defuzzifier::Centroid { resolution }
    }

    pub fn resolution(&self) -> usize {
        match *self {
            Defuzzifier::Centroid { resolution }
            | Defuzzifier::Bisector { resolution }
            | Defuzzifier::MeanOfMaximum { resolution }
            | Defuzzifier::SmallestOfMaximum { resolution }
            | Defuzzifier::LargestOfMaximum { resolution } => resolution,
        }
    }

    /// A resolução precisa estar em `1..=MAX_RESOLUTION`.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self.resolution() {
            1..=MAX_RESOLUTION => Ok(()),
            r => Err(ConfigurationError::InvalidResolution(r)),
        }
    }

    /// Defuzzifica a função `mu` sobre `[min, max]`.
    ///
    /// As amostras são percorridas sem buffer: uma passada para as somas
    /// (e o pico) e, no bissetor e na família do máximo, uma segunda
    /// passada sobre o mesmo gerador.
    ///
    /// Retorna `None` quando o conjunto não tem suporte.
    pub fn defuzzify(&self, mu: impl Fn(f64) -> f64, min: f64, max: f64) -> Option<f64> {
        let resolution = self.resolution().clamp(1, MAX_RESOLUTION);
        let (total, moment, peak) = samples(&mu, min, max, resolution).fold(
            (0.0, 0.0, 0.0f64),
            |(total, moment, peak), (x, m)| (total + m, moment + x * m, peak.max(m)),
        );
        if total <= EPSILON {
            return None;
        }

        match self {
            Defuzzifier::Centroid { .. } => Some(moment / total),
            Defuzzifier::Bisector { .. } => {
                let half = total / 2.0;
                let mut area = 0.0;
                let mut last = min;
                for (x, m) in samples(&mu, min, max, resolution) {
                    area += m;
                    last = x;
                    if area >= half {
                        return Some(x);
                    }
                }
                Some(last)
            }
            Defuzzifier::MeanOfMaximum { .. }
            | Defuzzifier::SmallestOfMaximum { .. }
            | Defuzzifier::LargestOfMaximum { .. } => {
                let (smallest, largest) = samples(&mu, min, max, resolution)
                    .filter(|(_, m)| (peak - m).abs() <= EPSILON)
                    .fold(None, |range: Option<(f64, f64)>, (x, _)| match range {
                        None => Some((x, x)),
                        Some((smallest, _)) => Some((smallest, x)),
                    })?;
                Some(match self {
                    Defuzzifier::SmallestOfMaximum { .. } => smallest,
                    Defuzzifier::LargestOfMaximum { .. } => largest,
                    _ => (smallest + largest) / 2.0,
                })
            }
        }
    }
}

/// Pontos médios `(x_i, μ(x_i))`, gerados sob demanda. Domínio degenerado
/// (`min == max`) vira uma única amostra em `min`.
fn samples<'a, F>(mu: &'a F, min: f64, max: f64, resolution: usize) -> impl Iterator<Item = (f64, f64)> + 'a
where
    F: Fn(f64) -> f64 + 'a,
{
    let (count, dx) = if max <= min {
        (1, 0.0)
    } else {
        (resolution, (max - min) / resolution as f64)
    };
    (0..count).map(move |i| {
        let x = min + (i as f64 + 0.5) * dx;
        (x, mu(x))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Term;

    /// "low" recortado na altura 2/27: cenário de referência do risco.
    fn clipped_low(x: f64) -> f64 {
        let low = Term::trapezoid("low", 0.0, 0.0, 20.0, 40.0).unwrap();
        low.membership(x).min(2.0 / 27.0)
    }

    #[test]
    fn centroid_of_clipped_low() {
        let c = Defuzzifier::centroid(100).defuzzify(clipped_low, 0.0, 100.0).unwrap();
        assert!((c - 19.63).abs() < 0.5, "centroid = {}", c);
    }

    #[test]
    fn centroid_of_symmetric_triangle_is_peak() {
        let t = Term::triangle("t", 20.0, 50.0, 80.0).unwrap();
        let c = Defuzzifier::centroid(1000)
            .defuzzify(|x| t.membership(x), 0.0, 100.0)
            .unwrap();
        assert!((c - 50.0).abs() < 1e-6);
    }

    #[test]
    fn empty_set_has_no_result() {
        for d in [
            Defuzzifier::centroid(100),
            Defuzzifier::Bisector { resolution: 100 },
            Defuzzifier::MeanOfMaximum { resolution: 100 },
        ] {
            assert_eq!(d.defuzzify(|_| 0.0, 0.0, 100.0), None);
        }
    }

    #[test]
    fn maximum_family() {
        // platô em [30, 50]
        let t = Term::trapezoid("t", 20.0, 30.0, 50.0, 60.0).unwrap();
        let mu = |x: f64| t.membership(x);
        let som = Defuzzifier::SmallestOfMaximum { resolution: 100 }
            .defuzzify(mu, 0.0, 100.0)
            .unwrap();
        let lom = Defuzzifier::LargestOfMaximum { resolution: 100 }
            .defuzzify(mu, 0.0, 100.0)
            .unwrap();
        let mom = Defuzzifier::MeanOfMaximum { resolution: 100 }
            .defuzzify(mu, 0.0, 100.0)
            .unwrap();
        assert!((som - 30.5).abs() < 1e-9);
        assert!((lom - 49.5).abs() < 1e-9);
        assert!((mom - 40.0).abs() < 1e-9);
    }

    #[test]
    fn bisector_splits_area() {
        let r = Term::rectangle("r", 0.0, 100.0).unwrap();
        let b = Defuzzifier::Bisector { resolution: 100 }
            .defuzzify(|x| r.membership(x), 0.0, 100.0)
            .unwrap();
        assert!((b - 49.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_domain() {
        let d = Defuzzifier::default();
        assert_eq!(d.defuzzify(|_| 1.0, 5.0, 5.0), Some(5.0));
        assert_eq!(d.defuzzify(|_| 0.0, 5.0, 5.0), None);
    }

    #[test]
    fn resolution_bounds() {
        assert_eq!(
            Defuzzifier::centroid(0).validate(),
            Err(ConfigurationError::InvalidResolution(0))
        );
        assert_eq!(
            Defuzzifier::Bisector { resolution: usize::MAX }.validate(),
            Err(ConfigurationError::InvalidResolution(usize::MAX))
        );
        assert!(Defuzzifier::default().validate().is_ok());
        assert!(Defuzzifier::centroid(MAX_RESOLUTION).validate().is_ok());
    }

    #[test]
    fn max_resolution_converges_to_continuous_centroid() {
        let c = Defuzzifier::centroid(MAX_RESOLUTION)
            .defuzzify(clipped_low, 0.0, 100.0)
            .unwrap();
        assert!((c - 19.632).abs() < 1e-3, "centroid = {}", c);
    }

    #[test]
    fn unvalidated_huge_resolution_is_capped() {
        // construído direto, sem passar por validate()
        let d = Defuzzifier::LargestOfMaximum { resolution: usize::MAX };
        let r = Term::rectangle("r", 10.0, 20.0).unwrap();
        let lom = d.defuzzify(|x| r.membership(x), 0.0, 100.0).unwrap();
        assert!((lom - 20.0).abs() < 1e-3);
    }

    #[test]
    fn serde_method_tag() {
        let d: Defuzzifier =
            serde_json::from_str(r#"{"method":"mean_of_maximum","resolution":200}"#).unwrap();
        assert_eq!(d, Defuzzifier::MeanOfMaximum { resolution: 200 });
    }
}
