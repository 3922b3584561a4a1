//! # chromavis core
//!
//! Colour-vision modelling over photoreceptor quantum catches: projection into
//! perceptual colour spaces and pairwise perceptual distances, either through
//! the receptor-noise-limited model or through a space's own geometry.
//!
//! ## Quick Start
//!
//! ```rust
//! use chromavis_core::{
//!     compute_distance, project_colour_space, DistanceOptions, QuantumCatches, SpaceId,
//!     SpaceParams, VisualMeta,
//! };
//!
//! let catches = QuantumCatches::from_rows(
//!     &["grey", "uv", "red"],
//!     &["u", "s", "m", "l"],
//!     &[
//!         vec![0.25, 0.25, 0.25, 0.25],
//!         vec![0.40, 0.20, 0.20, 0.20],
//!         vec![0.10, 0.30, 0.30, 0.30],
//!     ],
//!     VisualMeta::new(4).with_relative(true),
//! )
//! .unwrap();
//!
//! let tcs = project_colour_space(&catches, SpaceId::Tetrahedral, &SpaceParams::default()).unwrap();
//! assert_eq!(tcs.descriptors()[0].r_achieved, 0.0);
//!
//! let distances = compute_distance(&tcs, &DistanceOptions::default()).unwrap();
//! assert_eq!(distances.len(), 3);
//! ```
//!
//! ## Core Modules
//!
//! - [`data`] - Quantum-catch records and bare catch tables
//! - [`space`] - Colour-space registry and projector
//! - [`distance`] - Distance engine and receptor-noise model
//! - [`subset`] - Label-based filtering
//! - [`config`] - Engine configuration via TOML
//! - [`logging`] - JSON line-delimited run journal

pub mod config;
pub mod data;
pub mod diagnostics;
pub mod distance;
pub mod error;
pub mod logging;
pub mod space;
pub mod subset;

pub use config::{ConfigError, DistanceConfig, EngineConfig, ProjectionConfig};
pub use data::{AchromaticReceptor, CatchScale, CatchTable, QuantumCatches, VisualMeta, LUM_COLUMN};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use distance::{
    compute_distance, AchromaticContrast, DistanceInput, DistanceOptions, DistanceRecord,
    DistanceSource, NoiseMode, PairDistance, ReceptorNoise, Weber, WeberRef,
};
pub use error::{VisionError, VisionResult};
pub use logging::{log_distance_summary, log_projection_summary};
pub use space::{
    project_colour_space, Category, ColourSpace, ColourSpaceRecord, FlyCategory, HexSector,
    PointDescriptor, ProjectionInput, SpaceId, SpaceParams,
};
pub use subset::{subset_by_label, subset_by_label_with_diagnostic, LabelSubset};
