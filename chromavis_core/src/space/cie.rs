//! CIE 1976 L*a*b* and its cylindrical L*C*h form.
//!
//! Both spaces take XYZ tristimulus values and a reference white from
//! [`SpaceParams`]. Distances are CIEDE2000 regardless of which form the
//! coordinates are stored in.

use ndarray::ArrayView1;

use super::{ColourSpace, InputRule, PointDescriptor, Projection, SpaceId, SpaceParams};
use crate::distance::metrics::{ciede2000, hue_degrees};

const DELTA: f64 = 6.0 / 29.0;

pub struct CieLab;
pub struct CieLch;

pub static CIE_LAB: CieLab = CieLab;
pub static CIE_LCH: CieLch = CieLch;

fn f(t: f64) -> f64 {
    if t > DELTA.powi(3) {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

/// XYZ to L*a*b* against `white`.
pub fn xyz_to_lab(xyz: [f64; 3], white: [f64; 3]) -> [f64; 3] {
    let fx = f(xyz[0] / white[0]);
    let fy = f(xyz[1] / white[1]);
    let fz = f(xyz[2] / white[2]);
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// L*a*b* to L*C*h (hue in degrees).
pub fn lab_to_lch(lab: [f64; 3]) -> [f64; 3] {
    [lab[0], lab[1].hypot(lab[2]), hue_degrees(lab[1], lab[2])]
}

/// L*C*h (hue in degrees) back to L*a*b*.
pub fn lch_to_lab(lch: [f64; 3]) -> [f64; 3] {
    let h = lch[2].to_radians();
    [lch[0], lch[1] * h.cos(), lch[1] * h.sin()]
}

fn lab_of(receptors: ArrayView1<'_, f64>, params: &SpaceParams) -> [f64; 3] {
    xyz_to_lab([receptors[0], receptors[1], receptors[2]], params.white_point)
}

fn triple(v: ArrayView1<'_, f64>) -> [f64; 3] {
    [v[0], v[1], v[2]]
}

impl ColourSpace for CieLab {
    fn id(&self) -> SpaceId {
        SpaceId::CieLab
    }

    fn channels(&self) -> &'static [&'static str] {
        &["X", "Y", "Z"]
    }

    fn input_rule(&self) -> InputRule {
        InputRule::Tristimulus
    }

    fn axes(&self) -> &'static [&'static str] {
        &["L", "a", "b"]
    }

    fn project(&self, receptors: ArrayView1<'_, f64>, params: &SpaceParams) -> Projection {
        let lab = lab_of(receptors, params);
        let [_, chroma, hue] = lab_to_lch(lab);
        Projection {
            coords: lab.to_vec(),
            descriptor: PointDescriptor::saturation(chroma).with_hue(hue),
        }
    }

    fn chromatic_distance(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        ciede2000(triple(a), triple(b))
    }
}

impl ColourSpace for CieLch {
    fn id(&self) -> SpaceId {
        SpaceId::CieLch
    }

    fn channels(&self) -> &'static [&'static str] {
        &["X", "Y", "Z"]
    }

    fn input_rule(&self) -> InputRule {
        InputRule::Tristimulus
    }

    fn axes(&self) -> &'static [&'static str] {
        &["L", "C", "h"]
    }

    fn project(&self, receptors: ArrayView1<'_, f64>, params: &SpaceParams) -> Projection {
        let lch = lab_to_lch(lab_of(receptors, params));
        Projection {
            coords: lch.to_vec(),
            descriptor: PointDescriptor::saturation(lch[1]).with_hue(lch[2]),
        }
    }

    fn chromatic_distance(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        ciede2000(lch_to_lab(triple(a)), lch_to_lab(triple(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::D65_WHITE_POINT;
    use ndarray::array;

    #[test]
    fn white_point_maps_to_l100() {
        let lab = xyz_to_lab(D65_WHITE_POINT, D65_WHITE_POINT);
        assert!((lab[0] - 100.0).abs() < 1e-9);
        assert!(lab[1].abs() < 1e-9);
        assert!(lab[2].abs() < 1e-9);
    }

    #[test]
    fn black_maps_to_l0() {
        let lab = xyz_to_lab([0.0, 0.0, 0.0], D65_WHITE_POINT);
        assert!(lab[0].abs() < 1e-9);
    }

    #[test]
    fn linear_segment_below_threshold() {
        // Y/Yn = 0.001 lies on the linear part: L = 903.3 * t.
        let lab = xyz_to_lab([0.00095047, 0.001, 0.00108883], D65_WHITE_POINT);
        assert!((lab[0] - 0.9033).abs() < 1e-3);
    }

    #[test]
    fn lch_round_trips_through_lab() {
        let lab = [50.0, 20.0, -30.0];
        let back = lch_to_lab(lab_to_lch(lab));
        for i in 0..3 {
            assert!((lab[i] - back[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn lab_and_lch_distances_agree() {
        let params = SpaceParams::default();
        let x1 = array![0.3, 0.25, 0.2];
        let x2 = array![0.2, 0.3, 0.4];
        let lab1 = CIE_LAB.project(x1.view(), &params).coords;
        let lab2 = CIE_LAB.project(x2.view(), &params).coords;
        let lch1 = CIE_LCH.project(x1.view(), &params).coords;
        let lch2 = CIE_LCH.project(x2.view(), &params).coords;
        let d_lab = CIE_LAB.chromatic_distance(
            ndarray::ArrayView1::from(&lab1[..]),
            ndarray::ArrayView1::from(&lab2[..]),
        );
        let d_lch = CIE_LCH.chromatic_distance(
            ndarray::ArrayView1::from(&lch1[..]),
            ndarray::ArrayView1::from(&lch2[..]),
        );
        assert!(d_lab > 0.0);
        assert!((d_lab - d_lch).abs() < 1e-6);
    }
}
