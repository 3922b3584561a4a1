//! Geometric distance formulas shared by the colour spaces.
//!
//! Provides the metrics used on the geometric path of the distance engine:
//! - Euclidean distance over native axes
//! - Manhattan (city-block) distance for colour-opponent coding
//! - CIEDE2000 for CIELAB coordinates
//!
//! and the achromatic contrast formulas applied to luminance values.

use std::f64::consts::PI;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// 25^7, used by the CIEDE2000 chroma compensation terms.
const POW25_7: f64 = 6_103_515_625.0;

/// Unweighted Euclidean distance.
pub fn euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// City-block distance.
pub fn manhattan(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// CIEDE2000 (ΔE00) colour difference between two `[L, a, b]` triplets.
///
/// Parametric factors kL, kC and kH are fixed to 1.
pub fn ciede2000(lab1: [f64; 3], lab2: [f64; 3]) -> f64 {
    let [l1, a1, b1] = lab1;
    let [l2, a2, b2] = lab2;

    let c_ab_mean = (a1.hypot(b1) + a2.hypot(b2)) / 2.0;
    let c_ab_mean_pow7 = c_ab_mean.powi(7);
    let g = 0.5 * (1.0 - (c_ab_mean_pow7 / (c_ab_mean_pow7 + POW25_7)).sqrt());

    let a1_prime = a1 * (1.0 + g);
    let a2_prime = a2 * (1.0 + g);
    let c1_prime = a1_prime.hypot(b1);
    let c2_prime = a2_prime.hypot(b2);
    let h1_prime = hue_degrees(a1_prime, b1);
    let h2_prime = hue_degrees(a2_prime, b2);

    let delta_l_prime = l2 - l1;
    let delta_c_prime = c2_prime - c1_prime;
    let chroma_product = c1_prime * c2_prime;

    let delta_h_prime = if chroma_product == 0.0 {
        0.0
    } else {
        let delta_h = h2_prime - h1_prime;
        if delta_h.abs() <= 180.0 {
            delta_h
        } else if delta_h > 180.0 {
            delta_h - 360.0
        } else {
            delta_h + 360.0
        }
    };
    let delta_big_h_prime = 2.0 * chroma_product.sqrt() * (delta_h_prime.to_radians() / 2.0).sin();

    let l_prime_mean = (l1 + l2) / 2.0;
    let c_prime_mean = (c1_prime + c2_prime) / 2.0;
    let h_prime_mean = if chroma_product == 0.0 {
        h1_prime + h2_prime
    } else if (h1_prime - h2_prime).abs() <= 180.0 {
        (h1_prime + h2_prime) / 2.0
    } else if h1_prime + h2_prime < 360.0 {
        (h1_prime + h2_prime + 360.0) / 2.0
    } else {
        (h1_prime + h2_prime - 360.0) / 2.0
    };

    let h_rad = h_prime_mean.to_radians();
    let t = 1.0 - 0.17 * (h_rad - PI / 6.0).cos()
        + 0.24 * (2.0 * h_rad).cos()
        + 0.32 * (3.0 * h_rad + PI / 30.0).cos()
        - 0.20 * (4.0 * h_rad - 63.0_f64.to_radians()).cos();

    let l_offset_sq = (l_prime_mean - 50.0).powi(2);
    let sl = 1.0 + (0.015 * l_offset_sq) / (20.0 + l_offset_sq).sqrt();
    let sc = 1.0 + 0.045 * c_prime_mean;
    let sh = 1.0 + 0.015 * c_prime_mean * t;

    // Rotation term for the blue region.
    let delta_theta = 30.0 * (-((h_prime_mean - 275.0) / 25.0).powi(2)).exp();
    let c_prime_mean_pow7 = c_prime_mean.powi(7);
    let rc = 2.0 * (c_prime_mean_pow7 / (c_prime_mean_pow7 + POW25_7)).sqrt();
    let rt = -(2.0 * delta_theta).to_radians().sin() * rc;

    let term_l = delta_l_prime / sl;
    let term_c = delta_c_prime / sc;
    let term_h = delta_big_h_prime / sh;

    (term_l * term_l + term_c * term_c + term_h * term_h + rt * term_c * term_h)
        .max(0.0)
        .sqrt()
}

/// Hue angle in degrees, `[0, 360)`; zero for a neutral colour.
pub(crate) fn hue_degrees(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        0.0
    } else {
        wrap_degrees(b.atan2(a).to_degrees())
    }
}

/// Angle in degrees mapped into `[0, 360)`.
pub(crate) fn wrap_degrees(angle: f64) -> f64 {
    let h = angle.rem_euclid(360.0);
    // rem_euclid of a tiny negative angle rounds up to 360.0
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Luminance contrast formula used for achromatic distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchromaticContrast {
    /// `a / b`
    SimpleRatio,
    /// `|a - b| / b`, with the second sample of the pair as background.
    Weber,
    /// `|a - b| / (a + b)`
    Michelson,
}

impl AchromaticContrast {
    pub fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            AchromaticContrast::SimpleRatio => a / b,
            AchromaticContrast::Weber => (a - b).abs() / b,
            AchromaticContrast::Michelson => (a - b).abs() / (a + b),
        }
    }
}
