//! Engine configuration management via TOML files.
//!
//! Every key is optional; missing sections or keys fall back to the library
//! defaults used by [`DistanceOptions::default`] and [`SpaceParams::default`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distance::{AchromaticContrast, DistanceOptions, NoiseMode, Weber, WeberRef, DEFAULT_DENSITIES};
use crate::space::{SpaceParams, D65_WHITE_POINT, RELATIVE_TOLERANCE};

/// Engine configuration loaded from a TOML file.
///
/// # Examples
///
/// ```
/// use chromavis_core::EngineConfig;
///
/// let config = EngineConfig::from_str("[distance]\nnoise = \"quantum\"").unwrap();
/// let options = config.distance_options();
/// assert_eq!(options.noise, chromavis_core::NoiseMode::Quantum);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct EngineConfig {
    pub distance: DistanceConfig,
    pub projection: ProjectionConfig,
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawEngineConfig =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;

        Ok(Self {
            distance: DistanceConfig::try_from(&raw.distance)?,
            projection: ProjectionConfig::try_from(&raw.projection)?,
        })
    }

    /// Distance options described by the `[distance]` section.
    pub fn distance_options(&self) -> DistanceOptions {
        let d = &self.distance;
        DistanceOptions {
            noise: d.noise,
            subset: d.subset.clone(),
            achromatic: d.achromatic,
            densities: d.densities.clone(),
            weber: d.weber.clone(),
            weber_ref: d.weber_ref,
            weber_achro: d.weber_achro,
            contrast_override: d.contrast,
        }
    }

    /// Projection parameters described by the `[projection]` section.
    pub fn space_params(&self) -> SpaceParams {
        SpaceParams {
            white_point: self.projection.white_point,
            max_gamut: None,
            relative_tolerance: self.projection.relative_tolerance,
        }
    }
}

/// Receptor-noise and pair-selection settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceConfig {
    pub noise: NoiseMode,
    pub densities: Vec<f64>,
    pub weber: Weber,
    pub weber_ref: WeberRef,
    pub weber_achro: f64,
    pub achromatic: bool,
    pub subset: Vec<String>,
    pub contrast: Option<AchromaticContrast>,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        let options = DistanceOptions::default();
        Self {
            noise: options.noise,
            densities: options.densities,
            weber: options.weber,
            weber_ref: options.weber_ref,
            weber_achro: options.weber_achro,
            achromatic: options.achromatic,
            subset: options.subset,
            contrast: options.contrast_override,
        }
    }
}

impl DistanceConfig {
    fn try_from(raw: &RawDistance) -> Result<Self, ConfigError> {
        let noise = match raw.noise.as_str() {
            "neural" => NoiseMode::Neural,
            "quantum" => NoiseMode::Quantum,
            other => {
                return Err(ConfigError::Parse(format!(
                    "distance.noise must be \"neural\" or \"quantum\", got \"{}\"",
                    other
                )))
            }
        };

        if raw.densities.len() < 2 {
            return Err(ConfigError::Parse(
                "distance.densities needs at least two entries".into(),
            ));
        }
        if raw.densities.iter().any(|n| !n.is_finite() || *n <= 0.0) {
            return Err(ConfigError::Parse(
                "distance.densities must all be positive".into(),
            ));
        }

        let weber = match &raw.weber {
            RawWeber::Single(w) => Weber::Single(*w),
            RawWeber::PerChannel(ws) => Weber::PerChannel(ws.clone()),
        };
        let webers: Vec<f64> = match &weber {
            Weber::Single(w) => vec![*w],
            Weber::PerChannel(ws) => ws.clone(),
        };
        if webers.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(ConfigError::Parse("distance.weber must be positive".into()));
        }

        let weber_ref = match &raw.weber_ref {
            RawWeberRef::Index(index) => WeberRef::Index(*index),
            RawWeberRef::Name(name) if name == "longest" => WeberRef::Longest,
            RawWeberRef::Name(name) => {
                return Err(ConfigError::Parse(format!(
                    "distance.weber_ref must be \"longest\" or a channel index, got \"{}\"",
                    name
                )))
            }
        };

        if !raw.weber_achro.is_finite() || raw.weber_achro <= 0.0 {
            return Err(ConfigError::Parse(
                "distance.weber_achro must be positive".into(),
            ));
        }
        if raw.subset.len() > 2 {
            return Err(ConfigError::Parse(
                "distance.subset accepts at most two patterns".into(),
            ));
        }

        let contrast = match raw.contrast.as_deref() {
            None => None,
            Some("simple_ratio") => Some(AchromaticContrast::SimpleRatio),
            Some("weber") => Some(AchromaticContrast::Weber),
            Some("michelson") => Some(AchromaticContrast::Michelson),
            Some(other) => {
                return Err(ConfigError::Parse(format!(
                    "distance.contrast must be simple_ratio, weber or michelson, got \"{}\"",
                    other
                )))
            }
        };

        Ok(Self {
            noise,
            densities: raw.densities.clone(),
            weber,
            weber_ref,
            weber_achro: raw.weber_achro,
            achromatic: raw.achromatic,
            subset: raw.subset.clone(),
            contrast,
        })
    }
}

/// Colour-space projection settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionConfig {
    pub white_point: [f64; 3],
    pub relative_tolerance: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            white_point: D65_WHITE_POINT,
            relative_tolerance: RELATIVE_TOLERANCE,
        }
    }
}

impl ProjectionConfig {
    fn try_from(raw: &RawProjection) -> Result<Self, ConfigError> {
        if raw.white_point.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ConfigError::Parse(
                "projection.white_point components must be positive".into(),
            ));
        }
        if !raw.relative_tolerance.is_finite() || raw.relative_tolerance < 0.0 {
            return Err(ConfigError::Parse(
                "projection.relative_tolerance must be non-negative".into(),
            ));
        }
        Ok(Self {
            white_point: raw.white_point,
            relative_tolerance: raw.relative_tolerance,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawEngineConfig {
    #[serde(default)]
    distance: RawDistance,
    #[serde(default)]
    projection: RawProjection,
}

#[derive(Debug, Deserialize)]
struct RawDistance {
    #[serde(default = "default_noise")]
    noise: String,
    #[serde(default = "default_densities")]
    densities: Vec<f64>,
    #[serde(default = "default_weber")]
    weber: RawWeber,
    #[serde(default = "default_weber_ref")]
    weber_ref: RawWeberRef,
    #[serde(default = "default_weber_achro")]
    weber_achro: f64,
    #[serde(default)]
    achromatic: bool,
    #[serde(default)]
    subset: Vec<String>,
    #[serde(default)]
    contrast: Option<String>,
}

impl Default for RawDistance {
    fn default() -> Self {
        Self {
            noise: default_noise(),
            densities: default_densities(),
            weber: default_weber(),
            weber_ref: default_weber_ref(),
            weber_achro: default_weber_achro(),
            achromatic: false,
            subset: Vec::new(),
            contrast: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawWeber {
    Single(f64),
    PerChannel(Vec<f64>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawWeberRef {
    Index(usize),
    Name(String),
}

#[derive(Debug, Deserialize)]
struct RawProjection {
    #[serde(default = "default_white_point")]
    white_point: [f64; 3],
    #[serde(default = "default_relative_tolerance")]
    relative_tolerance: f64,
}

impl Default for RawProjection {
    fn default() -> Self {
        Self {
            white_point: default_white_point(),
            relative_tolerance: default_relative_tolerance(),
        }
    }
}

fn default_noise() -> String {
    "neural".to_string()
}

fn default_densities() -> Vec<f64> {
    DEFAULT_DENSITIES.to_vec()
}

fn default_weber() -> RawWeber {
    RawWeber::Single(0.1)
}

fn default_weber_ref() -> RawWeberRef {
    RawWeberRef::Name("longest".to_string())
}

fn default_weber_achro() -> f64 {
    0.1
}

fn default_white_point() -> [f64; 3] {
    D65_WHITE_POINT
}

fn default_relative_tolerance() -> f64 {
    RELATIVE_TOLERANCE
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}
