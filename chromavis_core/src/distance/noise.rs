//! Receptor-noise-limited (RNL) colour distances.
//!
//! Implements the Vorobyev & Osorio (1998) model generalised to any number of
//! chromatic channels `K >= 2`. Per-channel noise `e[i]` is derived from a
//! Weber fraction and relative receptor densities; the chromatic distance
//! between two samples is
//!
//! ```text
//! dS² = Σ_{S ⊂ K, |S| = K-2} (Π_{i∈S} e[i])² ((Δf[d] - Δf[e]))²
//!       ─────────────────────────────────────────────────────────
//!              Σ_{T ⊂ K, |T| = K-1} (Π_{i∈T} e[i])²
//! ```
//!
//! where `{d, e}` is the complement of `S` and `Δf` is the per-channel
//! difference of log-transformed catches. With two or three channels this
//! reduces to the classical di- and trichromat formulas.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::{VisionError, VisionResult};

/// Origin of photoreceptor noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoiseMode {
    /// Signal-independent neural noise.
    #[default]
    Neural,
    /// Neural noise plus photon shot noise, which depends on both samples.
    Quantum,
}

/// Weber fraction setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weber {
    /// One empirical value, measured at the reference channel.
    Single(f64),
    /// One value per chromatic channel.
    PerChannel(Vec<f64>),
}

impl Default for Weber {
    fn default() -> Self {
        Weber::Single(0.1)
    }
}

/// Channel at which a single Weber fraction was measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeberRef {
    /// The last (longest-wavelength) chromatic channel.
    #[default]
    Longest,
    /// Zero-based channel index.
    Index(usize),
}

impl WeberRef {
    /// Resolve to a channel index for `cones` channels.
    pub fn resolve(&self, cones: usize) -> VisionResult<usize> {
        match *self {
            WeberRef::Longest => Ok(cones - 1),
            WeberRef::Index(index) if index < cones => Ok(index),
            WeberRef::Index(index) => Err(VisionError::WeberReference { index, cones }),
        }
    }
}

/// All `k`-element subsets of `0..n` in lexicographic order.
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k > n {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if idx[i] != i + n - k {
                break;
            }
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// Precomputed subset index lists for a fixed channel count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetPlan {
    channels: usize,
    /// Size-(K-2) subsets paired with their two complementary channels.
    numerator: Vec<(Vec<usize>, [usize; 2])>,
    /// Size-(K-1) subsets.
    denominator: Vec<Vec<usize>>,
}

impl SubsetPlan {
    /// Build the plan for `channels >= 2`.
    pub fn new(channels: usize) -> VisionResult<Self> {
        if channels < 2 {
            return Err(VisionError::channel_count(2, channels, "receptor-noise model"));
        }
        let numerator = combinations(channels, channels - 2)
            .into_iter()
            .map(|subset| {
                let mut rest = (0..channels).filter(|c| !subset.contains(c));
                // exactly two channels remain outside a (K-2)-subset
                let d = rest.next().unwrap_or(0);
                let e = rest.next().unwrap_or(0);
                (subset, [d, e])
            })
            .collect();
        Ok(Self {
            channels,
            numerator,
            denominator: combinations(channels, channels - 1),
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn numerator_terms(&self) -> usize {
        self.numerator.len()
    }

    pub fn denominator_terms(&self) -> usize {
        self.denominator.len()
    }

    /// Evaluate the distance for log-catch differences `delta` and noise `e`.
    fn evaluate(&self, delta: &[f64], e: &[f64]) -> f64 {
        let numerator: f64 = self
            .numerator
            .iter()
            .map(|(subset, [d, k])| {
                let weight: f64 = subset.iter().map(|&i| e[i]).product();
                let contrast = delta[*d] - delta[*k];
                (weight * contrast).powi(2)
            })
            .sum();
        let denominator: f64 = self
            .denominator
            .iter()
            .map(|subset| subset.iter().map(|&i| e[i]).product::<f64>().powi(2))
            .sum();
        (numerator / denominator).sqrt()
    }
}

/// Noise parameters resolved for one invocation.
#[derive(Debug, Clone)]
pub struct ReceptorNoise {
    mode: NoiseMode,
    relative_density: Vec<f64>,
    /// `v[i]² / reln[i]`, the squared signal-independent noise per channel.
    neural_sq: Vec<f64>,
    plan: SubsetPlan,
}

impl ReceptorNoise {
    pub fn new(
        cones: usize,
        densities: &[f64],
        weber: &Weber,
        weber_ref: WeberRef,
        mode: NoiseMode,
    ) -> VisionResult<Self> {
        let plan = SubsetPlan::new(cones)?;
        if densities.len() != cones {
            return Err(VisionError::DensityMismatch {
                expected: cones,
                got: densities.len(),
            });
        }
        if let Some(bad) = densities.iter().find(|n| !n.is_finite() || **n <= 0.0) {
            return Err(VisionError::invalid_parameter(
                "densities",
                bad.to_string(),
                "finite and > 0",
            ));
        }
        let reference = weber_ref.resolve(cones)?;

        let total: f64 = densities.iter().sum();
        let reln: Vec<f64> = densities.iter().map(|n| n / total).collect();

        let v: Vec<f64> = match weber {
            Weber::Single(w) => {
                check_weber("weber", *w)?;
                vec![w * reln[reference].sqrt(); cones]
            }
            Weber::PerChannel(ws) => {
                if ws.len() != cones {
                    return Err(VisionError::WeberMismatch {
                        expected: cones,
                        got: ws.len(),
                    });
                }
                for w in ws {
                    check_weber("weber", *w)?;
                }
                ws.iter().zip(&reln).map(|(w, r)| w * r.sqrt()).collect()
            }
        };

        let neural_sq = v.iter().zip(&reln).map(|(v, r)| v * v / r).collect();

        Ok(Self {
            mode,
            relative_density: reln,
            neural_sq,
            plan,
        })
    }

    pub fn mode(&self) -> NoiseMode {
        self.mode
    }

    pub fn channels(&self) -> usize {
        self.plan.channels()
    }

    pub fn relative_density(&self) -> &[f64] {
        &self.relative_density
    }

    /// Signal-independent noise `e[i] = v[i] / sqrt(reln[i])`.
    pub fn neural_noise(&self) -> Vec<f64> {
        self.neural_sq.iter().map(|e| e.sqrt()).collect()
    }

    /// Noise for a specific pair; `q1`/`q2` are linear catches.
    pub fn pair_noise(&self, q1: ArrayView1<'_, f64>, q2: ArrayView1<'_, f64>) -> Vec<f64> {
        match self.mode {
            NoiseMode::Neural => self.neural_noise(),
            NoiseMode::Quantum => self
                .neural_sq
                .iter()
                .enumerate()
                .map(|(i, n)| (n + 2.0 / (q1[i] + q2[i])).sqrt())
                .collect(),
        }
    }

    /// Chromatic distance between two samples.
    ///
    /// `f1`/`f2` are log-transformed catches, `q1`/`q2` the matching linear
    /// catches (only read in quantum mode). Extra trailing columns are ignored.
    pub fn chromatic_distance(
        &self,
        f1: ArrayView1<'_, f64>,
        f2: ArrayView1<'_, f64>,
        q1: ArrayView1<'_, f64>,
        q2: ArrayView1<'_, f64>,
    ) -> f64 {
        let k = self.channels();
        let delta: Vec<f64> = (0..k).map(|i| f1[i] - f2[i]).collect();
        let e = self.pair_noise(q1, q2);
        self.plan.evaluate(&delta, &e)
    }
}

/// Achromatic contrast `|Δf| / w` on the luminance channel.
///
/// `w` is the achromatic Weber fraction in neural mode and additionally
/// includes shot noise `2 / (q1 + q2)` in quantum mode.
pub fn achromatic_distance(
    f1: f64,
    f2: f64,
    q1: f64,
    q2: f64,
    weber_achro: f64,
    mode: NoiseMode,
) -> f64 {
    let w = match mode {
        NoiseMode::Neural => weber_achro,
        NoiseMode::Quantum => (weber_achro * weber_achro + 2.0 / (q1 + q2)).sqrt(),
    };
    (f1 - f2).abs() / w
}

fn check_weber(name: &str, value: f64) -> VisionResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(VisionError::invalid_parameter(
            name,
            value.to_string(),
            "finite and > 0",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    fn approx_equal(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{} !≈ {}", a, b);
    }

    fn neural(cones: usize, densities: &[f64]) -> ReceptorNoise {
        ReceptorNoise::new(
            cones,
            densities,
            &Weber::default(),
            WeberRef::Longest,
            NoiseMode::Neural,
        )
        .unwrap()
    }

    #[test]
    fn combinations_are_lexicographic() {
        assert_eq!(
            combinations(4, 2),
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        assert_eq!(combinations(3, 0), vec![Vec::<usize>::new()]);
        assert!(combinations(2, 3).is_empty());
    }

    #[test]
    fn subset_plan_term_counts() {
        for (k, numer, denom) in [(2, 1, 2), (3, 3, 3), (4, 6, 4), (5, 10, 5)] {
            let plan = SubsetPlan::new(k).unwrap();
            assert_eq!(plan.numerator_terms(), numer);
            assert_eq!(plan.denominator_terms(), denom);
        }
        assert!(SubsetPlan::new(1).is_err());
    }

    #[test]
    fn neural_noise_for_default_avian_densities() {
        let noise = neural(4, &[1.0, 2.0, 2.0, 4.0]);
        let e = noise.neural_noise();
        approx_equal(e[0], 0.2, 1e-12);
        approx_equal(e[1], 0.1 * 2.0_f64.sqrt(), 1e-12);
        approx_equal(e[2], 0.1 * 2.0_f64.sqrt(), 1e-12);
        approx_equal(e[3], 0.1, 1e-12);
    }

    #[test]
    fn per_channel_weber_is_used_directly() {
        let noise = ReceptorNoise::new(
            3,
            &[1.0, 1.0, 2.0],
            &Weber::PerChannel(vec![0.05, 0.1, 0.2]),
            WeberRef::Longest,
            NoiseMode::Neural,
        )
        .unwrap();
        let e = noise.neural_noise();
        approx_equal(e[0], 0.05, 1e-12);
        approx_equal(e[1], 0.1, 1e-12);
        approx_equal(e[2], 0.2, 1e-12);
    }

    #[test]
    fn dichromat_matches_closed_form() {
        let noise = neural(2, &[1.0, 1.0]);
        let e = noise.neural_noise();
        let f1 = array![0.8, 0.3];
        let f2 = array![0.1, 0.5];
        let ds = noise.chromatic_distance(f1.view(), f2.view(), f1.view(), f2.view());
        let expected = ((0.8 - 0.1) - (0.3 - 0.5_f64)).abs() / (e[0].powi(2) + e[1].powi(2)).sqrt();
        approx_equal(ds, expected, 1e-12);
    }

    #[test]
    fn trichromat_matches_closed_form() {
        let noise = neural(3, &[1.0, 2.0, 3.0]);
        let e = noise.neural_noise();
        let f1 = array![1.2, 0.4, -0.3];
        let f2 = array![0.2, 0.9, 0.6];
        let d: Array1<f64> = &f1 - &f2;
        let numerator = e[0].powi(2) * (d[2] - d[1]).powi(2)
            + e[1].powi(2) * (d[2] - d[0]).powi(2)
            + e[2].powi(2) * (d[0] - d[1]).powi(2);
        let denominator =
            (e[0] * e[1]).powi(2) + (e[0] * e[2]).powi(2) + (e[1] * e[2]).powi(2);
        let ds = noise.chromatic_distance(f1.view(), f2.view(), f1.view(), f2.view());
        approx_equal(ds, (numerator / denominator).sqrt(), 1e-12);
    }

    #[test]
    fn distance_is_symmetric_and_invariant_to_achromatic_shift() {
        let noise = neural(4, &[1.0, 2.0, 2.0, 4.0]);
        let f1 = array![0.5, 1.5, 2.0, 2.2];
        let f2 = array![0.9, 1.1, 2.4, 2.0];
        let ab = noise.chromatic_distance(f1.view(), f2.view(), f1.view(), f2.view());
        let ba = noise.chromatic_distance(f2.view(), f1.view(), f2.view(), f1.view());
        approx_equal(ab, ba, 1e-12);

        let shifted = &f1 + 3.0;
        let same = noise.chromatic_distance(f1.view(), shifted.view(), f1.view(), shifted.view());
        approx_equal(same, 0.0, 1e-12);
    }

    #[test]
    fn quantum_noise_exceeds_neural_noise() {
        let quantum = ReceptorNoise::new(
            2,
            &[1.0, 1.0],
            &Weber::default(),
            WeberRef::Longest,
            NoiseMode::Quantum,
        )
        .unwrap();
        let q1 = array![10.0, 20.0];
        let q2 = array![30.0, 40.0];
        let e = quantum.pair_noise(q1.view(), q2.view());
        let neural_e = quantum.neural_noise();
        approx_equal(e[0], (neural_e[0].powi(2) + 2.0 / 40.0).sqrt(), 1e-12);
        approx_equal(e[1], (neural_e[1].powi(2) + 2.0 / 60.0).sqrt(), 1e-12);
    }

    #[test]
    fn rejects_density_length_mismatch() {
        let err = ReceptorNoise::new(
            3,
            &[1.0, 2.0, 2.0, 4.0],
            &Weber::default(),
            WeberRef::Longest,
            NoiseMode::Neural,
        )
        .unwrap_err();
        assert_eq!(err, VisionError::DensityMismatch { expected: 3, got: 4 });
    }

    #[test]
    fn rejects_out_of_range_reference() {
        let err = ReceptorNoise::new(
            2,
            &[1.0, 1.0],
            &Weber::default(),
            WeberRef::Index(2),
            NoiseMode::Neural,
        )
        .unwrap_err();
        assert_eq!(err, VisionError::WeberReference { index: 2, cones: 2 });
    }

    #[test]
    fn rejects_per_channel_weber_mismatch() {
        let err = ReceptorNoise::new(
            2,
            &[1.0, 1.0],
            &Weber::PerChannel(vec![0.1]),
            WeberRef::Longest,
            NoiseMode::Neural,
        )
        .unwrap_err();
        assert_eq!(err, VisionError::WeberMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn achromatic_distance_modes() {
        approx_equal(achromatic_distance(2.0, 1.5, 0.0, 0.0, 0.1, NoiseMode::Neural), 5.0, 1e-12);
        let quantum = achromatic_distance(2.0, 1.5, 10.0, 10.0, 0.1, NoiseMode::Quantum);
        approx_equal(quantum, 0.5 / (0.01_f64 + 0.1).sqrt(), 1e-12);
    }
}
