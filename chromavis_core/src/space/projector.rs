//! Projection of receptor values into a registered colour space.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

use super::channels::{resolve_declared, resolve_table, ChannelResolution};
use super::{ColourSpace, ColourSpaceRecord, InputRule, Projection, SpaceId, SpaceParams};
use crate::data::{CatchScale, CatchTable, QuantumCatches, VisualMeta, LUM_COLUMN};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::{VisionError, VisionResult};

/// Data accepted by [`project_colour_space`].
#[derive(Debug, Clone, Copy)]
pub enum ProjectionInput<'a> {
    /// Visual-model output with declared channel order and scale.
    Catches(&'a QuantumCatches),
    /// Bare table; channels are resolved from column names.
    Table(&'a CatchTable),
}

impl<'a> From<&'a QuantumCatches> for ProjectionInput<'a> {
    fn from(catches: &'a QuantumCatches) -> Self {
        ProjectionInput::Catches(catches)
    }
}

impl<'a> From<&'a CatchTable> for ProjectionInput<'a> {
    fn from(table: &'a CatchTable) -> Self {
        ProjectionInput::Table(table)
    }
}

/// Receptor columns chosen for a space, before scaling.
struct Resolved {
    receptors: Array2<f64>,
    lum: Option<Vec<f64>>,
    meta: VisualMeta,
    gamut: Option<Array2<f64>>,
    /// Whether rows are already expected to sum to one.
    relative: bool,
    diagnostics: Vec<Diagnostic>,
}

/// Project `input` into `space`.
///
/// Channel resolution and scaling follow one policy for every space:
/// surplus channels are dropped with a diagnostic, relative spaces
/// renormalise rows that do not sum to one, and scale mismatches a space
/// cannot work with are errors. Sample coordinates depend only on their own
/// row.
///
/// # Errors
///
/// Returns [`VisionError::ChannelCount`] when fewer channels are available
/// than the space requires, [`VisionError::IncompatibleScale`] when the
/// declared catch scale cannot be used, and [`VisionError::ShapeMismatch`]
/// for a gamut reference with the wrong number of channels.
pub fn project_colour_space<'a>(
    input: impl Into<ProjectionInput<'a>>,
    space: SpaceId,
    params: &SpaceParams,
) -> VisionResult<ColourSpaceRecord> {
    let model = space.model();
    let input = input.into();
    tracing::debug!(space = space.as_str(), "projecting into colour space");

    let (labels, mut resolved) = match input {
        ProjectionInput::Catches(catches) => (catches.labels().to_vec(), resolve_catches(catches, model)?),
        ProjectionInput::Table(table) => (table.labels().to_vec(), resolve_catch_table(table, model, params)?),
    };

    if model.input_rule() == InputRule::Relative {
        normalise_rows(
            &mut resolved.receptors,
            resolved.relative,
            params.relative_tolerance,
            &mut resolved.diagnostics,
        );
        resolved.meta.relative = true;
    }

    let projections: Vec<Projection> = (0..labels.len())
        .into_par_iter()
        .map(|i| model.project(resolved.receptors.row(i), params))
        .collect();

    let axes = model.axes();
    let coords = Array2::from_shape_fn((projections.len(), axes.len()), |(i, j)| {
        projections[i].coords[j]
    });
    let descriptors = projections.iter().map(|p| p.descriptor).collect();

    let (mut gamut, gamut_relative) = match &params.max_gamut {
        Some(gamut) => {
            if gamut.ncols() != model.required_channels() {
                return Err(VisionError::shape_mismatch(
                    model.required_channels(),
                    gamut.ncols(),
                    format!("{} gamut reference", space),
                ));
            }
            (Some(gamut.clone()), true)
        }
        None => (resolved.gamut.take(), resolved.relative),
    };
    // Gamut rows follow the same scaling as the samples they bound.
    if let (Some(g), InputRule::Relative) = (gamut.as_mut(), model.input_rule()) {
        normalise_rows(g, gamut_relative, params.relative_tolerance, &mut Vec::new());
    }
    let max_gamut = gamut
        .as_ref()
        .and_then(|g| model.project_gamut(g.view(), params));
    resolved.meta.max_gamut = gamut;

    Ok(ColourSpaceRecord {
        space,
        labels,
        channels: model.channels().iter().map(|c| c.to_string()).collect(),
        receptors: resolved.receptors,
        axes: axes.iter().map(|a| a.to_string()).collect(),
        coords,
        descriptors,
        lum: resolved.lum,
        meta: resolved.meta,
        max_gamut,
        diagnostics: resolved.diagnostics,
    })
}

fn resolve_catches(catches: &QuantumCatches, model: &dyn ColourSpace) -> VisionResult<Resolved> {
    let space = model.id();
    let meta = catches.meta();
    let mut diagnostics = Vec::new();

    check_declared_scale(meta, model)?;
    if model.input_rule() == InputRule::Hyperbolic && meta.relative {
        diagnostics.push(Diagnostic::warn(
            DiagnosticKind::RelativeInput,
            format!("{space} expects absolute Ei catches, but relative catches were supplied"),
        ));
    }

    let resolution = resolve_declared(catches.channels(), model.required_channels(), space.as_str())?;
    if let ChannelResolution::Truncated { dropped, .. } = &resolution {
        diagnostics.push(Diagnostic::warn(
            DiagnosticKind::ExcessChannels,
            format!(
                "{space} uses {} channels; the first {} were kept and [{}] ignored",
                model.required_channels(),
                model.required_channels(),
                dropped.join(", ")
            ),
        ));
    }
    let indices = resolution.indices();

    let mut out_meta = meta.clone();
    out_meta.cone_count = indices.len();

    Ok(Resolved {
        receptors: catches.chromatic().select(Axis(1), indices),
        lum: catches.achromatic().map(|lum| lum.to_vec()),
        gamut: meta.max_gamut.as_ref().map(|g| g.select(Axis(1), indices)),
        meta: out_meta,
        relative: meta.relative,
        diagnostics,
    })
}

fn resolve_catch_table(
    table: &CatchTable,
    model: &dyn ColourSpace,
    params: &SpaceParams,
) -> VisionResult<Resolved> {
    let space = model.id();
    let mut diagnostics = Vec::new();

    let candidates = table.chromatic_columns();
    let resolution = resolve_table(&candidates, model.channels(), space.as_str())?;
    match &resolution {
        ChannelResolution::Exact { unused, .. } if !unused.is_empty() => {
            diagnostics.push(Diagnostic::warn(
                DiagnosticKind::ExcessChannels,
                format!("{space} ignores columns [{}]", unused.join(", ")),
            ));
        }
        ChannelResolution::Exact { .. } => {}
        ChannelResolution::Positional { .. } => {
            diagnostics.push(Diagnostic::warn(
                DiagnosticKind::PositionalChannels,
                format!(
                    "column names not recognised; treating columns in order as [{}]",
                    model.channels().join(", ")
                ),
            ));
        }
        ChannelResolution::Truncated { dropped, .. } => {
            diagnostics.push(Diagnostic::warn(
                DiagnosticKind::TruncatedChannels,
                format!(
                    "column names not recognised; using the first {} columns as [{}] and ignoring [{}]",
                    model.required_channels(),
                    model.channels().join(", "),
                    dropped.join(", ")
                ),
            ));
        }
    }

    let scale = match model.input_rule() {
        InputRule::Hyperbolic => {
            diagnostics.push(Diagnostic::warn(
                DiagnosticKind::ScaleAssumed,
                format!("{space} requires Ei catches; assuming the table holds them"),
            ));
            CatchScale::Ei
        }
        InputRule::Relative | InputRule::Tristimulus => CatchScale::Qi,
    };

    let receptors = table.values().select(Axis(1), resolution.indices());
    let lum = table.lum().map(|lum| lum.to_vec());

    let mut meta = VisualMeta::new(resolution.indices().len()).with_scale(scale);
    if lum.is_some() {
        meta = meta.with_achromatic(LUM_COLUMN);
    }

    // A bare table carries no relative flag; infer it from the row sums.
    let relative = rows_sum_to_one(receptors.view(), params.relative_tolerance);
    meta.relative = relative;

    Ok(Resolved {
        receptors,
        lum,
        meta,
        gamut: None,
        relative,
        diagnostics,
    })
}

fn check_declared_scale(meta: &VisualMeta, model: &dyn ColourSpace) -> VisionResult<()> {
    let space = model.id();
    let reason = match (model.input_rule(), meta.scale) {
        (InputRule::Hyperbolic, CatchScale::Ei) => None,
        (InputRule::Hyperbolic, _) => Some("hyperbolically transformed (Ei) catches are required"),
        (_, CatchScale::Fi) => Some("log-transformed catches cannot be used as proportions or tristimulus values"),
        (InputRule::Tristimulus, CatchScale::Ei) => Some("tristimulus values are required"),
        _ => None,
    };
    match reason {
        Some(reason) => Err(VisionError::incompatible_scale(
            meta.scale.to_string(),
            space.as_str(),
            reason,
        )),
        None => Ok(()),
    }
}

fn row_deviates(row: ArrayView1<'_, f64>, tolerance: f64) -> bool {
    (row.sum() - 1.0).abs() > tolerance
}

fn rows_sum_to_one(values: ArrayView2<'_, f64>, tolerance: f64) -> bool {
    values.rows().into_iter().all(|row| !row_deviates(row, tolerance))
}

/// Rescale rows to sum to one. Rows summing to zero are left untouched.
fn normalise_rows(
    receptors: &mut Array2<f64>,
    claimed_relative: bool,
    tolerance: f64,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut rescaled = 0;
    for mut row in receptors.rows_mut() {
        if claimed_relative && !row_deviates(row.view(), tolerance) {
            continue;
        }
        let total = row.sum();
        if total != 0.0 {
            row.mapv_inplace(|v| v / total);
            rescaled += 1;
        }
    }

    if rescaled == 0 {
        return;
    }
    let message = if claimed_relative {
        format!("{rescaled} relative rows deviated from a sum of 1 by more than {tolerance}; renormalised")
    } else {
        format!("input is not relative; {rescaled} rows rescaled to sum to 1")
    };
    diagnostics.push(Diagnostic::warn(DiagnosticKind::Renormalized, message));
}
