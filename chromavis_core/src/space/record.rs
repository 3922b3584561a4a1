use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::{PointDescriptor, SpaceId};
use crate::data::VisualMeta;
use crate::diagnostics::Diagnostic;

/// Samples projected into a geometric colour space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColourSpaceRecord {
    pub(crate) space: SpaceId,
    pub(crate) labels: Vec<String>,
    /// Channel names of `receptors`, in the space's order.
    pub(crate) channels: Vec<String>,
    /// Resolved receptor values the coordinates were computed from.
    pub(crate) receptors: Array2<f64>,
    pub(crate) axes: Vec<String>,
    pub(crate) coords: Array2<f64>,
    pub(crate) descriptors: Vec<PointDescriptor>,
    pub(crate) lum: Option<Vec<f64>>,
    pub(crate) meta: VisualMeta,
    /// Gamut reference in native coordinates.
    pub(crate) max_gamut: Option<Array2<f64>>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl ColourSpaceRecord {
    pub fn space(&self) -> SpaceId {
        self.space
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn receptors(&self) -> ArrayView2<'_, f64> {
        self.receptors.view()
    }

    pub fn axes(&self) -> &[String] {
        &self.axes
    }

    pub fn coords(&self) -> ArrayView2<'_, f64> {
        self.coords.view()
    }

    /// Native coordinates of sample `index`.
    pub fn point(&self, index: usize) -> ArrayView1<'_, f64> {
        self.coords.row(index)
    }

    pub fn descriptors(&self) -> &[PointDescriptor] {
        &self.descriptors
    }

    pub fn lum(&self) -> Option<&[f64]> {
        self.lum.as_deref()
    }

    pub fn meta(&self) -> &VisualMeta {
        &self.meta
    }

    pub fn max_gamut(&self) -> Option<ArrayView2<'_, f64>> {
        self.max_gamut.as_ref().map(|g| g.view())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of the sample named `label`.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub(crate) fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            space: self.space,
            labels: rows.iter().map(|&i| self.labels[i].clone()).collect(),
            channels: self.channels.clone(),
            receptors: self.receptors.select(Axis(0), rows),
            axes: self.axes.clone(),
            coords: self.coords.select(Axis(0), rows),
            descriptors: rows.iter().map(|&i| self.descriptors[i]).collect(),
            lum: self
                .lum
                .as_ref()
                .map(|lum| rows.iter().map(|&i| lum[i]).collect()),
            meta: self.meta.clone(),
            max_gamut: self.max_gamut.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
