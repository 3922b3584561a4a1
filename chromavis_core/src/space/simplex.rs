//! Dichromat segment and trichromat Maxwell triangle.

use ndarray::ArrayView1;

use super::{ColourSpace, InputRule, PointDescriptor, Projection, SpaceId, SpaceParams};

pub struct Dichromatic;
pub struct Trichromatic;

pub static DICHROMATIC: Dichromatic = Dichromatic;
pub static TRICHROMATIC: Trichromatic = Trichromatic;

impl ColourSpace for Dichromatic {
    fn id(&self) -> SpaceId {
        SpaceId::Dichromatic
    }

    fn channels(&self) -> &'static [&'static str] {
        &["s", "l"]
    }

    fn input_rule(&self) -> InputRule {
        InputRule::Relative
    }

    fn axes(&self) -> &'static [&'static str] {
        &["x"]
    }

    fn project(&self, receptors: ArrayView1<'_, f64>, _params: &SpaceParams) -> Projection {
        let x = (receptors[1] - receptors[0]) / 2.0_f64.sqrt();
        Projection {
            coords: vec![x],
            descriptor: PointDescriptor::saturation(x.abs()),
        }
    }
}

impl ColourSpace for Trichromatic {
    fn id(&self) -> SpaceId {
        SpaceId::Trichromatic
    }

    fn channels(&self) -> &'static [&'static str] {
        &["s", "m", "l"]
    }

    fn input_rule(&self) -> InputRule {
        InputRule::Relative
    }

    fn axes(&self) -> &'static [&'static str] {
        &["x", "y"]
    }

    fn project(&self, receptors: ArrayView1<'_, f64>, _params: &SpaceParams) -> Projection {
        let (s, m, l) = (receptors[0], receptors[1], receptors[2]);
        let x = (l - m) / 2.0_f64.sqrt();
        let y = (2.0_f64 / 3.0).sqrt() * (s - (l + m) / 2.0);
        let r = x.hypot(y);
        let hue = if r == 0.0 { f64::NAN } else { y.atan2(x) };
        Projection {
            coords: vec![x, y],
            descriptor: PointDescriptor::saturation(r).with_hue(hue),
        }
    }
}
