//! Colour-opponent coding space for honeybees (Backhaus 1991).

use ndarray::ArrayView1;

use super::{ColourSpace, InputRule, PointDescriptor, Projection, SpaceId, SpaceParams};
use crate::distance::metrics::manhattan;

pub struct Coc;

pub static COC: Coc = Coc;

impl ColourSpace for Coc {
    fn id(&self) -> SpaceId {
        SpaceId::Coc
    }

    fn channels(&self) -> &'static [&'static str] {
        &["s", "m", "l"]
    }

    fn input_rule(&self) -> InputRule {
        InputRule::Hyperbolic
    }

    fn axes(&self) -> &'static [&'static str] {
        &["x", "y"]
    }

    fn project(&self, receptors: ArrayView1<'_, f64>, _params: &SpaceParams) -> Projection {
        let (s, m, l) = (receptors[0], receptors[1], receptors[2]);
        let a = -9.86 * s + 7.70 * m + 2.16 * l;
        let b = -5.17 * s + 20.25 * m - 15.08 * l;
        Projection {
            coords: vec![a, b],
            descriptor: PointDescriptor::saturation(a.abs() + b.abs()),
        }
    }

    // City-block metric on the two opponent axes.
    fn chromatic_distance(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        manhattan(a, b)
    }
}
