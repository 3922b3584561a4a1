//! Colour-space projection.
//!
//! Each geometric model implements [`ColourSpace`] and is looked up through
//! [`SpaceId::model`]. The projector ([`project_colour_space`]) resolves input
//! channels, applies the model's input rule and maps every row through the
//! model's coordinate function.

pub mod categorical;
pub mod channels;
pub mod cie;
pub mod coc;
pub mod descriptor;
pub mod hexagon;
pub mod projector;
pub mod record;
pub mod simplex;
pub mod tetrahedral;

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::distance::metrics::{euclidean, AchromaticContrast};

pub use channels::ChannelResolution;
pub use descriptor::{Category, FlyCategory, HexSector, PointDescriptor};
pub use projector::{project_colour_space, ProjectionInput};
pub use record::ColourSpaceRecord;

/// D65 reference white (CIE 1931 2°), Y normalised to one.
pub const D65_WHITE_POINT: [f64; 3] = [0.95047, 1.0, 1.08883];

/// Row-sum deviation above which relative input is renormalised.
pub const RELATIVE_TOLERANCE: f64 = 1e-3;

/// Identifier of a geometric colour space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceId {
    /// Dichromat line segment.
    #[serde(rename = "dispace")]
    Dichromatic,
    /// Trichromat Maxwell triangle.
    #[serde(rename = "trispace")]
    Trichromatic,
    /// Tetrachromat tetrahedron.
    #[serde(rename = "tcs")]
    Tetrahedral,
    /// Fly categorical model (Troje 1993).
    #[serde(rename = "categorical")]
    Categorical,
    /// Bee colour hexagon (Chittka 1992).
    #[serde(rename = "hexagon")]
    Hexagon,
    /// Colour-opponent coding space (Backhaus 1991).
    #[serde(rename = "coc")]
    Coc,
    #[serde(rename = "cielab")]
    CieLab,
    #[serde(rename = "cielch")]
    CieLch,
}

impl SpaceId {
    pub const ALL: [SpaceId; 8] = [
        SpaceId::Dichromatic,
        SpaceId::Trichromatic,
        SpaceId::Tetrahedral,
        SpaceId::Categorical,
        SpaceId::Hexagon,
        SpaceId::Coc,
        SpaceId::CieLab,
        SpaceId::CieLch,
    ];

    /// Registry lookup.
    pub fn model(self) -> &'static dyn ColourSpace {
        match self {
            SpaceId::Dichromatic => &simplex::DICHROMATIC,
            SpaceId::Trichromatic => &simplex::TRICHROMATIC,
            SpaceId::Tetrahedral => &tetrahedral::TETRAHEDRAL,
            SpaceId::Categorical => &categorical::CATEGORICAL,
            SpaceId::Hexagon => &hexagon::HEXAGON,
            SpaceId::Coc => &coc::COC,
            SpaceId::CieLab => &cie::CIE_LAB,
            SpaceId::CieLch => &cie::CIE_LCH,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceId::Dichromatic => "dispace",
            SpaceId::Trichromatic => "trispace",
            SpaceId::Tetrahedral => "tcs",
            SpaceId::Categorical => "categorical",
            SpaceId::Hexagon => "hexagon",
            SpaceId::Coc => "coc",
            SpaceId::CieLab => "cielab",
            SpaceId::CieLch => "cielch",
        }
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpaceId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        SpaceId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == lowered)
            .ok_or_else(|| format!("unknown colour space '{value}'"))
    }
}

/// How a space expects its receptor values to be scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputRule {
    /// Rows must sum to one; renormalised otherwise.
    Relative,
    /// Hyperbolically transformed (`Ei`) absolute catches.
    Hyperbolic,
    /// CIE XYZ tristimulus values, used as supplied.
    Tristimulus,
}

/// Model parameters for a projection call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceParams {
    /// Reference white for the CIE spaces.
    pub white_point: [f64; 3],
    /// Gamut reference overriding the record's own, in the space's channel order.
    pub max_gamut: Option<Array2<f64>>,
    /// Row-sum tolerance used to validate relative input.
    pub relative_tolerance: f64,
}

impl Default for SpaceParams {
    fn default() -> Self {
        Self {
            white_point: D65_WHITE_POINT,
            max_gamut: None,
            relative_tolerance: RELATIVE_TOLERANCE,
        }
    }
}

/// Coordinates and descriptor of one projected row.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub coords: Vec<f64>,
    pub descriptor: PointDescriptor,
}

/// A geometric colour-space model.
pub trait ColourSpace: Send + Sync {
    fn id(&self) -> SpaceId;

    /// Receptor channel names in the order the coordinate function expects.
    fn channels(&self) -> &'static [&'static str];

    fn required_channels(&self) -> usize {
        self.channels().len()
    }

    fn input_rule(&self) -> InputRule;

    /// Names of the native coordinate axes.
    fn axes(&self) -> &'static [&'static str];

    /// Map one row of receptor values (already resolved and scaled).
    fn project(&self, receptors: ArrayView1<'_, f64>, params: &SpaceParams) -> Projection;

    /// Chromatic distance between two rows of native coordinates.
    fn chromatic_distance(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        euclidean(a, b)
    }

    /// Luminance contrast formula used on this space's achromatic values.
    fn achromatic_contrast(&self) -> AchromaticContrast {
        AchromaticContrast::Weber
    }

    /// Coordinates of a gamut reference, for spaces that draw one.
    fn project_gamut(&self, _gamut: ArrayView2<'_, f64>, _params: &SpaceParams) -> Option<Array2<f64>> {
        None
    }
}
