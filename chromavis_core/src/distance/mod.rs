//! Pairwise perceptual distances.
//!
//! Two paths share one record type:
//!
//! - raw [`QuantumCatches`] go through the receptor-noise-limited model
//!   ([`noise`]) and also produce distances to synthetic reference stimuli
//! - a [`ColourSpaceRecord`] uses its space's own geometric metric and
//!   luminance contrast formula
//!
//! Pairs are always reported in canonical index-ascending order.

pub mod metrics;
pub mod noise;
pub mod reference;

use ndarray::{concatenate, s, Array2, ArrayView2, Axis};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::{CatchScale, QuantumCatches};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::{VisionError, VisionResult};
use crate::space::{ColourSpaceRecord, SpaceId};
use crate::subset::compile_patterns;

pub use metrics::{ciede2000, euclidean, manhattan, AchromaticContrast};
pub use noise::{achromatic_distance, NoiseMode, ReceptorNoise, SubsetPlan, Weber, WeberRef};
pub use reference::{ReferenceStimuli, REFERENCE_FLOOR, REFERENCE_PEAK};

/// Default relative receptor densities (avian u, s, m, l).
pub const DEFAULT_DENSITIES: [f64; 4] = [1.0, 2.0, 2.0, 4.0];

/// Options for [`compute_distance`].
///
/// Receptor-noise fields only apply to quantum-catch input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceOptions {
    pub noise: NoiseMode,
    /// Zero, one or two label patterns restricting the reported pairs.
    pub subset: Vec<String>,
    /// Request luminance contrast `dl`.
    pub achromatic: bool,
    pub densities: Vec<f64>,
    pub weber: Weber,
    pub weber_ref: WeberRef,
    pub weber_achro: f64,
    /// Replace the space's own luminance contrast formula.
    pub contrast_override: Option<AchromaticContrast>,
}

impl Default for DistanceOptions {
    fn default() -> Self {
        Self {
            noise: NoiseMode::Neural,
            subset: Vec::new(),
            achromatic: false,
            densities: DEFAULT_DENSITIES.to_vec(),
            weber: Weber::default(),
            weber_ref: WeberRef::default(),
            weber_achro: 0.1,
            contrast_override: None,
        }
    }
}

impl DistanceOptions {
    pub fn with_noise(mut self, noise: NoiseMode) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_subset<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.subset = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_achromatic(mut self, achromatic: bool) -> Self {
        self.achromatic = achromatic;
        self
    }

    pub fn with_densities(mut self, densities: Vec<f64>) -> Self {
        self.densities = densities;
        self
    }

    pub fn with_weber(mut self, weber: Weber) -> Self {
        self.weber = weber;
        self
    }

    pub fn with_weber_ref(mut self, weber_ref: WeberRef) -> Self {
        self.weber_ref = weber_ref;
        self
    }

    pub fn with_weber_achro(mut self, weber_achro: f64) -> Self {
        self.weber_achro = weber_achro;
        self
    }

    pub fn with_contrast_override(mut self, contrast: AchromaticContrast) -> Self {
        self.contrast_override = Some(contrast);
        self
    }

    fn noise_settings_changed(&self) -> bool {
        let defaults = DistanceOptions::default();
        self.noise != defaults.noise
            || self.densities != defaults.densities
            || self.weber != defaults.weber
            || self.weber_ref != defaults.weber_ref
            || self.weber_achro != defaults.weber_achro
    }
}

/// Data accepted by [`compute_distance`].
#[derive(Debug, Clone, Copy)]
pub enum DistanceInput<'a> {
    Catches(&'a QuantumCatches),
    Space(&'a ColourSpaceRecord),
}

impl<'a> From<&'a QuantumCatches> for DistanceInput<'a> {
    fn from(catches: &'a QuantumCatches) -> Self {
        DistanceInput::Catches(catches)
    }
}

impl<'a> From<&'a ColourSpaceRecord> for DistanceInput<'a> {
    fn from(record: &'a ColourSpaceRecord) -> Self {
        DistanceInput::Space(record)
    }
}

/// Formula that produced a [`DistanceRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    Noise(NoiseMode),
    Space(SpaceId),
}

/// Distance between one unordered pair of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDistance {
    pub patch1: String,
    pub patch2: String,
    /// Chromatic distance.
    pub ds: f64,
    /// Achromatic distance, when computed.
    pub dl: Option<f64>,
}

/// Pairwise distances in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceRecord {
    pairs: Vec<PairDistance>,
    reference: Option<Box<DistanceRecord>>,
    source: DistanceSource,
    diagnostics: Vec<Diagnostic>,
}

impl DistanceRecord {
    pub fn pairs(&self) -> &[PairDistance] {
        &self.pairs
    }

    /// Distances involving the synthetic reference stimuli (noise path only).
    pub fn reference(&self) -> Option<&DistanceRecord> {
        self.reference.as_deref()
    }

    pub fn source(&self) -> DistanceSource {
        self.source
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Distance between two samples, in either order.
    pub fn get(&self, a: &str, b: &str) -> Option<&PairDistance> {
        self.pairs
            .iter()
            .find(|p| (p.patch1 == a && p.patch2 == b) || (p.patch1 == b && p.patch2 == a))
    }

    pub(crate) fn filter_pairs(&self, keep: impl Fn(&PairDistance) -> bool) -> Self {
        Self {
            pairs: self.pairs.iter().filter(|p| keep(p)).cloned().collect(),
            reference: self.reference.clone(),
            source: self.source,
            diagnostics: self.diagnostics.clone(),
        }
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// All unordered index pairs of `0..n` in canonical order.
pub fn canonical_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect()
}

/// Canonical pairs of `labels` retained by zero, one or two patterns.
///
/// One pattern keeps pairs where either member matches. Two patterns keep
/// pairs whose members match different patterns, in either order.
pub fn select_pairs(labels: &[String], patterns: &[String]) -> VisionResult<Vec<(usize, usize)>> {
    if patterns.len() > 2 {
        return Err(VisionError::TooManyPatterns {
            count: patterns.len(),
        });
    }
    let compiled = compile_patterns(patterns)?;
    let pairs = canonical_pairs(labels.len());
    let hits = |re: &Regex| -> Vec<bool> { labels.iter().map(|l| re.is_match(l)).collect() };

    Ok(match compiled.as_slice() {
        [] => pairs,
        [only] => {
            let m = hits(only);
            pairs.into_iter().filter(|&(i, j)| m[i] || m[j]).collect()
        }
        [first, second, ..] => {
            let a = hits(first);
            let b = hits(second);
            pairs
                .into_iter()
                .filter(|&(i, j)| (a[i] && b[j]) || (b[i] && a[j]))
                .collect()
        }
    })
}

/// Compute pairwise distances between the samples of `input`.
///
/// # Errors
///
/// Receptor-noise parameter errors ([`VisionError::DensityMismatch`],
/// [`VisionError::WeberMismatch`], [`VisionError::WeberReference`],
/// [`VisionError::ChannelCount`]), [`VisionError::NegativeLogCatch`] in
/// quantum mode, [`VisionError::IncompatibleScale`] for `Ei` catches, and
/// subset-pattern errors.
pub fn compute_distance<'a>(
    input: impl Into<DistanceInput<'a>>,
    options: &DistanceOptions,
) -> VisionResult<DistanceRecord> {
    match input.into() {
        DistanceInput::Catches(catches) => noise_distance(catches, options),
        DistanceInput::Space(record) => space_distance(record, options),
    }
}

fn empty_pairs_diagnostic(patterns: &[String]) -> Diagnostic {
    Diagnostic::warn(
        DiagnosticKind::EmptySubset,
        format!("no pairs match subset [{}]", patterns.join(", ")),
    )
}

fn achromatic_missing() -> Diagnostic {
    Diagnostic::warn(
        DiagnosticKind::AchromaticUnavailable,
        "achromatic contrast requested but the input declares no achromatic channel; dl left empty",
    )
}

/// Log-transformed and linear catches for every column of `catches`.
fn log_and_linear(catches: &QuantumCatches) -> VisionResult<(Array2<f64>, Array2<f64>)> {
    let values = catches.values().to_owned();
    match catches.meta().scale {
        CatchScale::Qi => Ok((values.mapv(f64::ln), values)),
        CatchScale::Fi => {
            let linear = values.mapv(f64::exp);
            Ok((values, linear))
        }
        CatchScale::Ei => Err(VisionError::incompatible_scale(
            "Ei",
            "receptor noise model",
            "hyperbolically transformed catches cannot be log-transformed; supply Qi or fi catches",
        )),
    }
}

fn check_positive_logs(labels: &[String], log: ArrayView2<'_, f64>) -> VisionResult<()> {
    for (label, row) in labels.iter().zip(log.rows()) {
        if row.iter().any(|&f| f < 0.0) {
            return Err(VisionError::NegativeLogCatch {
                sample: label.clone(),
            });
        }
    }
    Ok(())
}

fn noise_distance(catches: &QuantumCatches, options: &DistanceOptions) -> VisionResult<DistanceRecord> {
    let k = catches.cone_count();
    let noise = ReceptorNoise::new(
        k,
        &options.densities,
        &options.weber,
        options.weber_ref,
        options.noise,
    )?;
    let (log, linear) = log_and_linear(catches)?;
    if options.noise == NoiseMode::Quantum {
        check_positive_logs(catches.labels(), log.view())?;
    }
    tracing::debug!(cones = k, mode = ?options.noise, samples = catches.len(), "receptor-noise distances");

    let mut diagnostics = Vec::new();
    if catches.meta().relative {
        diagnostics.push(Diagnostic::warn(
            DiagnosticKind::RelativeInput,
            "quantum catches are relative; noise-limited distances expect absolute catches",
        ));
    }

    let with_lum = options.achromatic && catches.achromatic().is_some();
    if options.achromatic && !with_lum {
        diagnostics.push(achromatic_missing());
    }

    let labels = catches.labels();
    let selected = select_pairs(labels, &options.subset)?;
    if selected.is_empty() && !options.subset.is_empty() {
        diagnostics.push(empty_pairs_diagnostic(&options.subset));
    }

    let pairs: Vec<PairDistance> = selected
        .par_iter()
        .map(|&(i, j)| {
            let ds = noise.chromatic_distance(log.row(i), log.row(j), linear.row(i), linear.row(j));
            let dl = with_lum.then(|| {
                achromatic_distance(
                    log[[i, k]],
                    log[[j, k]],
                    linear[[i, k]],
                    linear[[j, k]],
                    options.weber_achro,
                    options.noise,
                )
            });
            PairDistance {
                patch1: labels[i].clone(),
                patch2: labels[j].clone(),
                ds,
                dl,
            }
        })
        .collect();

    let reference = reference_distances(catches, &noise, log.view(), linear.view())?;

    Ok(DistanceRecord {
        pairs,
        reference: Some(Box::new(reference)),
        source: DistanceSource::Noise(options.noise),
        diagnostics,
    })
}

/// Distances between the samples and the reference stimuli, and among the
/// reference stimuli themselves. Only chromatic distances are reported.
fn reference_distances(
    catches: &QuantumCatches,
    noise: &ReceptorNoise,
    log: ArrayView2<'_, f64>,
    linear: ArrayView2<'_, f64>,
) -> VisionResult<DistanceRecord> {
    let k = catches.cone_count();
    let stimuli = ReferenceStimuli::new(catches.channels());

    let all_log = stack_chromatic(log, stimuli.log_catches.view(), k)?;
    let all_linear = stack_chromatic(linear, stimuli.linear_catches().view(), k)?;

    let labels: Vec<&String> = catches.labels().iter().chain(&stimuli.labels).collect();
    let pairs = reference::reference_pairs(catches.len(), stimuli.len())
        .par_iter()
        .map(|&(i, j)| PairDistance {
            patch1: labels[i].to_string(),
            patch2: labels[j].to_string(),
            ds: noise.chromatic_distance(
                all_log.row(i),
                all_log.row(j),
                all_linear.row(i),
                all_linear.row(j),
            ),
            dl: None,
        })
        .collect();

    Ok(DistanceRecord {
        pairs,
        reference: None,
        source: DistanceSource::Noise(noise.mode()),
        diagnostics: Vec::new(),
    })
}

/// Chromatic columns of `samples` followed by the rows of `refs`.
fn stack_chromatic(
    samples: ArrayView2<'_, f64>,
    refs: ArrayView2<'_, f64>,
    k: usize,
) -> VisionResult<Array2<f64>> {
    concatenate(Axis(0), &[samples.slice(s![.., ..k]), refs.view()]).map_err(|err| {
        VisionError::invalid_parameter("reference stimuli", k.to_string(), err.to_string())
    })
}

fn space_distance(record: &ColourSpaceRecord, options: &DistanceOptions) -> VisionResult<DistanceRecord> {
    let space = record.space();
    let model = space.model();
    if options.noise_settings_changed() {
        tracing::debug!(space = space.as_str(), "receptor-noise options ignored for colour-space input");
    }

    let mut diagnostics = Vec::new();
    let lum = if options.achromatic {
        let lum = record.lum();
        if lum.is_none() {
            diagnostics.push(achromatic_missing());
        }
        lum
    } else {
        None
    };
    let contrast = options
        .contrast_override
        .unwrap_or_else(|| model.achromatic_contrast());

    let labels = record.labels();
    let selected = select_pairs(labels, &options.subset)?;
    if selected.is_empty() && !options.subset.is_empty() {
        diagnostics.push(empty_pairs_diagnostic(&options.subset));
    }

    let pairs = selected
        .par_iter()
        .map(|&(i, j)| PairDistance {
            patch1: labels[i].clone(),
            patch2: labels[j].clone(),
            ds: model.chromatic_distance(record.point(i), record.point(j)),
            dl: lum.map(|lum| contrast.apply(lum[i], lum[j])),
        })
        .collect();

    Ok(DistanceRecord {
        pairs,
        reference: None,
        source: DistanceSource::Space(space),
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::VisualMeta;
    use crate::diagnostics::has_kind;
    use crate::space::{project_colour_space, SpaceParams};

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn avian(rows: &[Vec<f64>], names: &[&str]) -> QuantumCatches {
        QuantumCatches::from_rows(names, &["u", "s", "m", "l"], rows, VisualMeta::new(4)).unwrap()
    }

    #[test]
    fn canonical_pairs_are_index_ascending() {
        assert_eq!(canonical_pairs(3), vec![(0, 1), (0, 2), (1, 2)]);
        assert_eq!(canonical_pairs(6).len(), 15);
        assert!(canonical_pairs(1).is_empty());
    }

    #[test]
    fn one_pattern_keeps_pairs_touching_a_match() {
        let names = labels(&["a1", "a2", "b1", "c1"]);
        let pairs = select_pairs(&names, &labels(&["b"])).unwrap();
        assert_eq!(pairs, vec![(0, 2), (1, 2), (2, 3)]);
    }

    #[test]
    fn two_patterns_keep_cross_pairs_only() {
        let names = labels(&["a1", "b1", "a2", "b2", "c"]);
        let pairs = select_pairs(&names, &labels(&["a", "b"])).unwrap();
        assert_eq!(pairs, vec![(0, 1), (0, 3), (1, 2), (2, 3)]);
    }

    #[test]
    fn three_patterns_are_rejected() {
        let names = labels(&["a", "b"]);
        let err = select_pairs(&names, &labels(&["a", "b", "c"])).unwrap_err();
        assert_eq!(err, VisionError::TooManyPatterns { count: 3 });
    }

    #[test]
    fn noise_distance_reports_every_pair_and_reference() {
        let catches = avian(
            &[
                vec![0.1, 0.2, 0.3, 0.4],
                vec![0.2, 0.2, 0.3, 0.3],
                vec![0.3, 0.3, 0.2, 0.2],
            ],
            &["a", "b", "c"],
        );
        let record = compute_distance(&catches, &DistanceOptions::default()).unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.source(), DistanceSource::Noise(NoiseMode::Neural));
        assert!(record.pairs().iter().all(|p| p.ds > 0.0 && p.dl.is_none()));

        let reference = record.reference().unwrap();
        // 3 samples x 5 references + C(5, 2)
        assert_eq!(reference.len(), 3 * 5 + 10);
        assert_eq!(reference.pairs()[0].patch2, "ref.u");
    }

    #[test]
    fn stacking_drops_luminance_and_appends_references() {
        let samples = ndarray::array![[1.0, 2.0, 3.0, 9.0], [4.0, 5.0, 6.0, 9.0]];
        let refs = ndarray::array![[7.0, 8.0, 9.0]];
        let stacked = stack_chromatic(samples.view(), refs.view(), 3).unwrap();
        assert_eq!(stacked, ndarray::array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
    }

    #[test]
    fn identical_samples_have_zero_distance() {
        let catches = avian(&[vec![0.1, 0.2, 0.3, 0.4], vec![0.1, 0.2, 0.3, 0.4]], &["a", "b"]);
        let record = compute_distance(&catches, &DistanceOptions::default()).unwrap();
        assert!(record.pairs()[0].ds.abs() < 1e-12);
    }

    #[test]
    fn quantum_mode_rejects_catches_below_one() {
        let catches = avian(&[vec![0.1, 0.2, 0.3, 0.4], vec![0.2, 0.2, 0.3, 0.3]], &["a", "b"]);
        let options = DistanceOptions::default().with_noise(NoiseMode::Quantum);
        let err = compute_distance(&catches, &options).unwrap_err();
        assert!(matches!(err, VisionError::NegativeLogCatch { ref sample } if sample == "a"));
    }

    #[test]
    fn log_scale_input_matches_linear_input() {
        let rows = vec![vec![10.0, 20.0, 30.0, 40.0], vec![20.0, 20.0, 30.0, 30.0]];
        let linear = avian(&rows, &["a", "b"]);
        let logged: Vec<Vec<f64>> = rows.iter().map(|r| r.iter().map(|v| v.ln()).collect()).collect();
        let log_catches = QuantumCatches::from_rows(
            &["a", "b"],
            &["u", "s", "m", "l"],
            &logged,
            VisualMeta::new(4).with_scale(CatchScale::Fi),
        )
        .unwrap();
        let options = DistanceOptions::default().with_noise(NoiseMode::Quantum);
        let d1 = compute_distance(&linear, &options).unwrap().pairs()[0].ds;
        let d2 = compute_distance(&log_catches, &options).unwrap().pairs()[0].ds;
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn achromatic_requires_a_declared_channel() {
        let catches = avian(&[vec![0.1, 0.2, 0.3, 0.4], vec![0.2, 0.2, 0.3, 0.3]], &["a", "b"]);
        let options = DistanceOptions::default().with_achromatic(true);
        let record = compute_distance(&catches, &options).unwrap();
        assert!(record.pairs()[0].dl.is_none());
        assert!(has_kind(record.diagnostics(), DiagnosticKind::AchromaticUnavailable));
    }

    #[test]
    fn achromatic_distance_uses_luminance_column() {
        let catches = QuantumCatches::from_rows(
            &["a", "b"],
            &["u", "s", "m", "l"],
            &[vec![0.1, 0.2, 0.3, 0.4, 1.0], vec![0.1, 0.2, 0.3, 0.4, 2.0]],
            VisualMeta::new(4).with_achromatic("bt.dc"),
        )
        .unwrap();
        let options = DistanceOptions::default().with_achromatic(true);
        let record = compute_distance(&catches, &options).unwrap();
        let pair = &record.pairs()[0];
        assert!(pair.ds.abs() < 1e-12);
        assert!((pair.dl.unwrap() - 2.0_f64.ln() / 0.1).abs() < 1e-9);
    }

    #[test]
    fn ei_catches_are_rejected_by_the_noise_model() {
        let catches = QuantumCatches::from_rows(
            &["a", "b"],
            &["s", "m", "l"],
            &[vec![0.2, 0.5, 0.3], vec![0.3, 0.3, 0.4]],
            VisualMeta::new(3).with_scale(CatchScale::Ei),
        )
        .unwrap();
        let options = DistanceOptions::default().with_densities(vec![1.0, 2.0, 2.0]);
        assert!(matches!(
            compute_distance(&catches, &options),
            Err(VisionError::IncompatibleScale { .. })
        ));
    }

    #[test]
    fn space_distance_uses_the_space_metric() {
        let table = crate::data::CatchTable::from_rows(
            &["a", "b"],
            &["s", "m", "l", "lum"],
            &[vec![0.2, 0.5, 0.3, 4.0], vec![0.3, 0.3, 0.4, 2.0]],
        )
        .unwrap();
        let space = project_colour_space(&table, SpaceId::Coc, &SpaceParams::default()).unwrap();
        let options = DistanceOptions::default().with_achromatic(true);
        let record = compute_distance(&space, &options).unwrap();
        let expected = manhattan(space.point(0), space.point(1));
        let pair = &record.pairs()[0];
        assert!((pair.ds - expected).abs() < 1e-12);
        // Weber contrast with the second sample as background.
        assert!((pair.dl.unwrap() - 1.0).abs() < 1e-12);
        assert!(record.reference().is_none());
        assert_eq!(record.source(), DistanceSource::Space(SpaceId::Coc));

        let michelson = options.with_contrast_override(AchromaticContrast::Michelson);
        let record = compute_distance(&space, &michelson).unwrap();
        let pair = &record.pairs()[0];
        assert!((pair.dl.unwrap() - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn empty_subset_yields_empty_record_with_diagnostic() {
        let catches = avian(&[vec![0.1, 0.2, 0.3, 0.4], vec![0.2, 0.2, 0.3, 0.3]], &["a", "b"]);
        let options = DistanceOptions::default().with_subset(["zzz"]);
        let record = compute_distance(&catches, &options).unwrap();
        assert!(record.is_empty());
        assert!(has_kind(record.diagnostics(), DiagnosticKind::EmptySubset));
    }
}
