//! Fly categorical colour model (Troje 1993).
//!
//! Two opponent channels compare the pale and yellow ommatidia types; the
//! perceived colour is one of four categories given by their signs.

use ndarray::ArrayView1;

use super::{Category, ColourSpace, FlyCategory, InputRule, PointDescriptor, Projection, SpaceId, SpaceParams};

pub struct Categorical;

pub static CATEGORICAL: Categorical = Categorical;

impl ColourSpace for Categorical {
    fn id(&self) -> SpaceId {
        SpaceId::Categorical
    }

    fn channels(&self) -> &'static [&'static str] {
        &["R7p", "R7y", "R8p", "R8y"]
    }

    fn input_rule(&self) -> InputRule {
        InputRule::Relative
    }

    fn axes(&self) -> &'static [&'static str] {
        &["x", "y"]
    }

    fn project(&self, receptors: ArrayView1<'_, f64>, _params: &SpaceParams) -> Projection {
        let (r7p, r7y, r8p, r8y) = (receptors[0], receptors[1], receptors[2], receptors[3]);
        let x = r7p - r8p;
        let y = r7y - r8y;
        let r = x.hypot(y);
        let hue = if r == 0.0 { f64::NAN } else { y.atan2(x) };
        Projection {
            coords: vec![x, y],
            descriptor: PointDescriptor::saturation(r)
                .with_hue(hue)
                .with_category(Category::Fly(FlyCategory::classify(x, y))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn category(row: [f64; 4]) -> FlyCategory {
        let receptors = ndarray::Array1::from(row.to_vec());
        match CATEGORICAL
            .project(receptors.view(), &SpaceParams::default())
            .descriptor
            .category
        {
            Some(Category::Fly(fly)) => fly,
            other => panic!("unexpected category {:?}", other),
        }
    }

    #[test]
    fn quadrant_follows_opponent_signs() {
        assert_eq!(category([0.4, 0.3, 0.1, 0.2]), FlyCategory::PPosYPos);
        assert_eq!(category([0.1, 0.3, 0.4, 0.2]), FlyCategory::PNegYPos);
        assert_eq!(category([0.4, 0.1, 0.2, 0.3]), FlyCategory::PPosYNeg);
        assert_eq!(category([0.1, 0.2, 0.4, 0.3]), FlyCategory::PNegYNeg);
    }

    #[test]
    fn degenerate_rows_use_two_state_labels() {
        assert_eq!(category([0.25, 0.4, 0.25, 0.1]), FlyCategory::YPos);
        assert_eq!(category([0.25; 4]), FlyCategory::Undefined);
    }

    #[test]
    fn coordinates_are_opponent_differences() {
        let p = CATEGORICAL.project(array![0.4, 0.3, 0.1, 0.2].view(), &SpaceParams::default());
        assert!((p.coords[0] - 0.3).abs() < 1e-12);
        assert!((p.coords[1] - 0.1).abs() < 1e-12);
        assert!((p.descriptor.r_vec - 0.1_f64.hypot(0.3)).abs() < 1e-12);
    }
}
