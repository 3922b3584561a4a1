//! Tetrahedral colour space for tetrachromats (Goldsmith 1990; Stoddard &
//! Prum 2008).
//!
//! Relative catches `(u, s, m, l)` are barycentric coordinates of a regular
//! tetrahedron whose centroid is the achromatic point. Vertices sit at
//! distance 3/4 from the centroid and faces at 1/4, so the largest chroma
//! reachable in a hue direction is bounded by the face that direction meets.

use ndarray::{Array2, ArrayView1, ArrayView2};

use super::{ColourSpace, InputRule, PointDescriptor, Projection, SpaceId, SpaceParams};

const CHANNELS: [&str; 4] = ["u", "s", "m", "l"];
const AXES: [&str; 3] = ["x", "y", "z"];

/// Distance from the centroid to each face.
const INRADIUS: f64 = 0.25;

pub struct Tetrahedral;

pub static TETRAHEDRAL: Tetrahedral = Tetrahedral;

/// Cartesian position of a barycentric `(u, s, m, l)` point.
///
/// The point must sum to 1, so `l = 1 - u - s - m` carries no extra
/// information and is not read.
pub fn barycentric_to_cartesian(u: f64, s: f64, m: f64, _l: f64) -> [f64; 3] {
    let x = ((1.0 - 2.0 * s - m - u) / 2.0) * (3.0_f64 / 2.0).sqrt();
    let y = (-1.0 + 3.0 * m + u) / (2.0 * 2.0_f64.sqrt());
    let z = u - 0.25;
    [x, y, z]
}

/// Vertex coordinates and hue directions of the reference tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TetraGeometry {
    /// One vertex per channel, in `u, s, m, l` order.
    pub vertices: [[f64; 3]; 4],
    /// Azimuth of each vertex.
    pub theta: [f64; 4],
    /// Elevation of each vertex.
    pub phi: [f64; 4],
}

impl TetraGeometry {
    pub fn new() -> Self {
        let vertices = [
            barycentric_to_cartesian(1.0, 0.0, 0.0, 0.0),
            barycentric_to_cartesian(0.0, 1.0, 0.0, 0.0),
            barycentric_to_cartesian(0.0, 0.0, 1.0, 0.0),
            barycentric_to_cartesian(0.0, 0.0, 0.0, 1.0),
        ];
        let mut theta = [0.0; 4];
        let mut phi = [0.0; 4];
        for (i, [x, y, z]) in vertices.iter().enumerate() {
            let r = (x * x + y * y + z * z).sqrt();
            theta[i] = y.atan2(*x);
            phi[i] = (z / r).asin();
        }
        Self {
            vertices,
            theta,
            phi,
        }
    }

    /// Maximum radius reachable along hue `(theta, phi)`.
    ///
    /// The binding face is the one opposite the vertex whose hue direction is
    /// angularly farthest from the sample's.
    pub fn max_radius(&self, theta: f64, phi: f64) -> f64 {
        let min_cos = (0..4)
            .map(|v| {
                phi.cos() * self.phi[v].cos() * (theta - self.theta[v]).cos()
                    + phi.sin() * self.phi[v].sin()
            })
            .fold(f64::INFINITY, f64::min);
        INRADIUS / -min_cos
    }
}

impl Default for TetraGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl ColourSpace for Tetrahedral {
    fn id(&self) -> SpaceId {
        SpaceId::Tetrahedral
    }

    fn channels(&self) -> &'static [&'static str] {
        &CHANNELS
    }

    fn input_rule(&self) -> InputRule {
        InputRule::Relative
    }

    fn axes(&self) -> &'static [&'static str] {
        &AXES
    }

    fn project(&self, receptors: ArrayView1<'_, f64>, _params: &SpaceParams) -> Projection {
        let [x, y, z] = barycentric_to_cartesian(receptors[0], receptors[1], receptors[2], receptors[3]);
        let r = (x * x + y * y + z * z).sqrt();

        let descriptor = if r == 0.0 {
            // Hue is undefined at the achromatic centre.
            PointDescriptor {
                r_vec: 0.0,
                hue: f64::NAN,
                elevation: f64::NAN,
                r_max: f64::NAN,
                r_achieved: 0.0,
                category: None,
            }
        } else {
            let theta = y.atan2(x);
            let phi = (z / r).clamp(-1.0, 1.0).asin();
            let r_max = TetraGeometry::new().max_radius(theta, phi);
            PointDescriptor {
                r_vec: r,
                hue: theta,
                elevation: phi,
                r_max,
                r_achieved: r / r_max,
                category: None,
            }
        };

        Projection {
            coords: vec![x, y, z],
            descriptor,
        }
    }

    fn project_gamut(&self, gamut: ArrayView2<'_, f64>, _params: &SpaceParams) -> Option<Array2<f64>> {
        let mut out = Array2::zeros((gamut.nrows(), 3));
        for (i, row) in gamut.rows().into_iter().enumerate() {
            let xyz = barycentric_to_cartesian(row[0], row[1], row[2], row[3]);
            for (j, value) in xyz.into_iter().enumerate() {
                out[[i, j]] = value;
            }
        }
        Some(out)
    }
}
