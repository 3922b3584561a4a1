//! Per-sample descriptors derived from colour-space coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Saturation, hue and category of one projected sample.
///
/// Every field is always present. Fields a space does not define hold NaN
/// (or `None` for the category), as do hues at the achromatic centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointDescriptor {
    /// Distance from the achromatic centre.
    pub r_vec: f64,
    /// Hue angle; units depend on the space.
    pub hue: f64,
    /// Second hue angle (tetrahedral `phi`).
    pub elevation: f64,
    /// Largest `r_vec` reachable in this hue direction.
    pub r_max: f64,
    /// `r_vec / r_max`.
    pub r_achieved: f64,
    pub category: Option<Category>,
}

impl PointDescriptor {
    /// Descriptor carrying only a saturation-like scalar.
    pub fn saturation(r_vec: f64) -> Self {
        Self {
            r_vec,
            hue: f64::NAN,
            elevation: f64::NAN,
            r_max: f64::NAN,
            r_achieved: f64::NAN,
            category: None,
        }
    }

    pub fn with_hue(mut self, hue: f64) -> Self {
        self.hue = hue;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// True when the space defines a hue here and it is not degenerate.
    pub fn has_hue(&self) -> bool {
        self.hue.is_finite()
    }
}

/// Discrete colour category assigned by categorical spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Fly (Troje 1993) opponent-sign category.
    Fly(FlyCategory),
    /// Colour-hexagon hue sector; `fine` is the 10 degree bin index.
    Hexagon { coarse: HexSector, fine: Option<u16> },
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Fly(fly) => f.write_str(fly.label()),
            Category::Hexagon { coarse, .. } => f.write_str(coarse.label()),
        }
    }
}

/// Sign classes of the two fly opponent channels (`p`: R7p-R8p, `y`: R7y-R8y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlyCategory {
    PPosYPos,
    PPosYNeg,
    PNegYPos,
    PNegYNeg,
    /// `y == 0`, `p > 0`
    PPos,
    /// `y == 0`, `p < 0`
    PNeg,
    /// `p == 0`, `y > 0`
    YPos,
    /// `p == 0`, `y < 0`
    YNeg,
    /// Both opponent channels are zero.
    Undefined,
}

impl FlyCategory {
    /// Classify from the signs of the two opponent coordinates.
    pub fn classify(x: f64, y: f64) -> Self {
        match (sign(x), sign(y)) {
            (1, 1) => FlyCategory::PPosYPos,
            (1, -1) => FlyCategory::PPosYNeg,
            (-1, 1) => FlyCategory::PNegYPos,
            (-1, -1) => FlyCategory::PNegYNeg,
            (1, 0) => FlyCategory::PPos,
            (-1, 0) => FlyCategory::PNeg,
            (0, 1) => FlyCategory::YPos,
            (0, -1) => FlyCategory::YNeg,
            _ => FlyCategory::Undefined,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlyCategory::PPosYPos => "p+y+",
            FlyCategory::PPosYNeg => "p+y-",
            FlyCategory::PNegYPos => "p-y+",
            FlyCategory::PNegYNeg => "p-y-",
            FlyCategory::PPos => "p+",
            FlyCategory::PNeg => "p-",
            FlyCategory::YPos => "y+",
            FlyCategory::YNeg => "y-",
            FlyCategory::Undefined => "undefined",
        }
    }

    /// True for the four two-signed quadrant labels.
    pub fn is_quadrant(&self) -> bool {
        matches!(
            self,
            FlyCategory::PPosYPos
                | FlyCategory::PPosYNeg
                | FlyCategory::PNegYPos
                | FlyCategory::PNegYNeg
        )
    }
}

/// Coarse hue sectors of the colour hexagon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexSector {
    Blue,
    BlueGreen,
    Green,
    UvGreen,
    Uv,
    UvBlue,
    Achromatic,
}

impl HexSector {
    /// Sector for a hue in degrees clockwise from the blue vertex.
    pub fn from_hue(hue: f64) -> Self {
        if !hue.is_finite() {
            return HexSector::Achromatic;
        }
        let h = hue.rem_euclid(360.0);
        if !(30.0..330.0).contains(&h) {
            HexSector::Blue
        } else if h < 90.0 {
            HexSector::BlueGreen
        } else if h < 150.0 {
            HexSector::Green
        } else if h < 210.0 {
            HexSector::UvGreen
        } else if h < 270.0 {
            HexSector::Uv
        } else {
            HexSector::UvBlue
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HexSector::Blue => "blue",
            HexSector::BlueGreen => "bluegreen",
            HexSector::Green => "green",
            HexSector::UvGreen => "uvgreen",
            HexSector::Uv => "uv",
            HexSector::UvBlue => "uvblue",
            HexSector::Achromatic => "achro",
        }
    }
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fly_quadrants_follow_signs() {
        assert_eq!(FlyCategory::classify(0.1, 0.2), FlyCategory::PPosYPos);
        assert_eq!(FlyCategory::classify(0.1, -0.2), FlyCategory::PPosYNeg);
        assert_eq!(FlyCategory::classify(-0.1, 0.2), FlyCategory::PNegYPos);
        assert_eq!(FlyCategory::classify(-0.1, -0.2), FlyCategory::PNegYNeg);
    }

    #[test]
    fn fly_axis_cases_use_two_state_labels() {
        assert_eq!(FlyCategory::classify(0.0, 0.3).label(), "y+");
        assert_eq!(FlyCategory::classify(-0.3, 0.0).label(), "p-");
        assert_eq!(FlyCategory::classify(0.0, 0.0), FlyCategory::Undefined);
        assert!(!FlyCategory::YPos.is_quadrant());
    }

    #[test]
    fn hex_sector_boundaries() {
        assert_eq!(HexSector::from_hue(0.0), HexSector::Blue);
        assert_eq!(HexSector::from_hue(345.0), HexSector::Blue);
        assert_eq!(HexSector::from_hue(30.0), HexSector::BlueGreen);
        assert_eq!(HexSector::from_hue(120.0), HexSector::Green);
        assert_eq!(HexSector::from_hue(180.0), HexSector::UvGreen);
        assert_eq!(HexSector::from_hue(240.0), HexSector::Uv);
        assert_eq!(HexSector::from_hue(300.0), HexSector::UvBlue);
        assert_eq!(HexSector::from_hue(f64::NAN), HexSector::Achromatic);
    }
}
