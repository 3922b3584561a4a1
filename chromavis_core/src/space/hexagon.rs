//! Colour hexagon for hymenopteran trichromats (Chittka 1992).
//!
//! Inputs are hyperbolically transformed photoreceptor excitations `E` in
//! `[0, 1)`. The blue (`m`) vertex sits straight up; hue is measured in degrees
//! clockwise from it.

use ndarray::ArrayView1;

use super::{Category, ColourSpace, HexSector, InputRule, PointDescriptor, Projection, SpaceId, SpaceParams};
use crate::distance::metrics::{wrap_degrees, AchromaticContrast};

/// Width of a fine hue sector in degrees.
pub const FINE_SECTOR_DEGREES: f64 = 10.0;

pub struct Hexagon;

pub static HEXAGON: Hexagon = Hexagon;

/// Fine 10 degree sector index for a hue in degrees; `None` at the centre.
pub fn fine_sector(hue: f64) -> Option<u16> {
    if !hue.is_finite() {
        return None;
    }
    let bin = (wrap_degrees(hue) / FINE_SECTOR_DEGREES).floor() as u16;
    Some(bin.min(35))
}

impl ColourSpace for Hexagon {
    fn id(&self) -> SpaceId {
        SpaceId::Hexagon
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
        let x = 3.0_f64.sqrt() / 2.0 * (l - s);
        let y = m - (s + l) / 2.0;
        let r = x.hypot(y);
        let hue = if r == 0.0 {
            f64::NAN
        } else {
            wrap_degrees(x.atan2(y).to_degrees())
        };
        let category = Category::Hexagon {
            coarse: HexSector::from_hue(hue),
            fine: fine_sector(hue),
        };
        Projection {
            coords: vec![x, y],
            descriptor: PointDescriptor::saturation(r)
                .with_hue(hue)
                .with_category(category),
        }
    }

    fn achromatic_contrast(&self) -> AchromaticContrast {
        AchromaticContrast::SimpleRatio
    }
}
