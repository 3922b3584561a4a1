//! Photoreceptor quantum-catch records.
//!
//! A [`QuantumCatches`] record is the output of an external visual-model
//! stage: one row per sample, one column per chromatic receptor, optionally
//! followed by an achromatic (luminance) receptor column. Descriptive metadata
//! travels alongside the table in [`VisualMeta`].

use std::fmt;

use ndarray::{s, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{VisionError, VisionResult};

/// Transform applied to the catches by the visual model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatchScale {
    /// Raw quantum catches.
    Qi,
    /// Log-transformed catches (`ln Qi`).
    Fi,
    /// Hyperbolically transformed catches (`Qi / (Qi + 1)`).
    Ei,
}

impl fmt::Display for CatchScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatchScale::Qi => "Qi",
            CatchScale::Fi => "fi",
            CatchScale::Ei => "Ei",
        };
        f.write_str(name)
    }
}

/// Receptor used for achromatic (luminance) vision, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AchromaticReceptor {
    #[default]
    None,
    /// Named receptor, e.g. `bt.dc` (blue tit double cone) or `ml`.
    Receptor(String),
}

impl AchromaticReceptor {
    pub fn is_none(&self) -> bool {
        matches!(self, AchromaticReceptor::None)
    }
}

/// Out-of-band descriptors attached to a quantum-catch table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualMeta {
    /// Number of chromatic channels.
    pub cone_count: usize,
    pub scale: CatchScale,
    /// True when each row of chromatic catches sums to one.
    pub relative: bool,
    pub achromatic: AchromaticReceptor,
    pub visual_system: String,
    pub background: String,
    pub illuminant: String,
    pub von_kries: bool,
    /// Per-population maximum catches (rows over the chromatic channels).
    pub max_gamut: Option<Array2<f64>>,
}

impl VisualMeta {
    /// Metadata for raw, absolute catches with no achromatic channel.
    pub fn new(cone_count: usize) -> Self {
        Self {
            cone_count,
            scale: CatchScale::Qi,
            relative: false,
            achromatic: AchromaticReceptor::None,
            visual_system: "user-defined".to_string(),
            background: "ideal".to_string(),
            illuminant: "ideal".to_string(),
            von_kries: false,
            max_gamut: None,
        }
    }

    pub fn with_scale(mut self, scale: CatchScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    pub fn with_achromatic(mut self, receptor: impl Into<String>) -> Self {
        self.achromatic = AchromaticReceptor::Receptor(receptor.into());
        self
    }

    pub fn with_visual_system(mut self, visual_system: impl Into<String>) -> Self {
        self.visual_system = visual_system.into();
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    pub fn with_illuminant(mut self, illuminant: impl Into<String>) -> Self {
        self.illuminant = illuminant.into();
        self
    }

    pub fn with_von_kries(mut self, von_kries: bool) -> Self {
        self.von_kries = von_kries;
        self
    }

    pub fn with_max_gamut(mut self, max_gamut: Array2<f64>) -> Self {
        self.max_gamut = Some(max_gamut);
        self
    }

    /// Number of columns a conforming row carries.
    pub fn row_len(&self) -> usize {
        self.cone_count + usize::from(!self.achromatic.is_none())
    }
}

/// Row-per-sample table of photoreceptor responses with visual-model metadata.
///
/// # Examples
///
/// ```
/// use chromavis_core::{QuantumCatches, VisualMeta};
///
/// let catches = QuantumCatches::from_rows(
///     &["crown", "throat"],
///     &["u", "s", "m", "l"],
///     &[vec![0.1, 0.2, 0.3, 0.4], vec![0.25, 0.25, 0.25, 0.25]],
///     VisualMeta::new(4).with_relative(true),
/// )
/// .unwrap();
/// assert_eq!(catches.cone_count(), 4);
/// assert!(catches.achromatic().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumCatches {
    labels: Vec<String>,
    channels: Vec<String>,
    values: Array2<f64>,
    meta: VisualMeta,
}

impl QuantumCatches {
    /// Build a record, enforcing the row-length contract.
    ///
    /// `values` holds `cone_count` chromatic columns, plus a trailing achromatic
    /// column when `meta.achromatic` names a receptor.
    pub fn new(
        labels: Vec<String>,
        channels: Vec<String>,
        values: Array2<f64>,
        meta: VisualMeta,
    ) -> VisionResult<Self> {
        if labels.len() != values.nrows() {
            return Err(VisionError::shape_mismatch(
                values.nrows(),
                labels.len(),
                "sample labels",
            ));
        }
        if channels.len() != meta.cone_count {
            return Err(VisionError::shape_mismatch(
                meta.cone_count,
                channels.len(),
                "chromatic channel names",
            ));
        }
        if values.ncols() != meta.row_len() {
            return Err(VisionError::shape_mismatch(
                meta.row_len(),
                values.ncols(),
                "quantum-catch row length",
            ));
        }
        if let Some(gamut) = &meta.max_gamut {
            if gamut.ncols() != meta.cone_count {
                return Err(VisionError::shape_mismatch(
                    meta.cone_count,
                    gamut.ncols(),
                    "maximum gamut row length",
                ));
            }
        }
        Ok(Self {
            labels,
            channels,
            values,
            meta,
        })
    }

    /// Build a record from row vectors; ragged rows are a contract error.
    pub fn from_rows<L, C>(
        labels: &[L],
        channels: &[C],
        rows: &[Vec<f64>],
        meta: VisualMeta,
    ) -> VisionResult<Self>
    where
        L: AsRef<str>,
        C: AsRef<str>,
    {
        let values = rows_to_array(rows, meta.row_len(), "quantum-catch row length")?;
        Self::new(
            labels.iter().map(|l| l.as_ref().to_string()).collect(),
            channels.iter().map(|c| c.as_ref().to_string()).collect(),
            values,
            meta,
        )
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Full table including the achromatic column when present.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn meta(&self) -> &VisualMeta {
        &self.meta
    }

    pub fn cone_count(&self) -> usize {
        self.meta.cone_count
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Chromatic columns only.
    pub fn chromatic(&self) -> ArrayView2<'_, f64> {
        self.values.slice(s![.., ..self.meta.cone_count])
    }

    /// Achromatic column, when the visual model declares one.
    pub fn achromatic(&self) -> Option<ArrayView1<'_, f64>> {
        if self.meta.achromatic.is_none() {
            None
        } else {
            Some(self.values.column(self.meta.cone_count))
        }
    }

    /// Copy of the record restricted to `rows`, in the given order.
    pub(crate) fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            labels: rows.iter().map(|&i| self.labels[i].clone()).collect(),
            channels: self.channels.clone(),
            values: self.values.select(Axis(0), rows),
            meta: self.meta.clone(),
        }
    }
}

/// Stack row vectors into a matrix of `width` columns.
pub(crate) fn rows_to_array(
    rows: &[Vec<f64>],
    width: usize,
    context: &str,
) -> VisionResult<Array2<f64>> {
    let mut flat = Vec::with_capacity(rows.len() * width);
    for row in rows {
        if row.len() != width {
            return Err(VisionError::shape_mismatch(width, row.len(), context));
        }
        flat.extend_from_slice(row);
    }
    Array2::from_shape_vec((rows.len(), width), flat)
        .map_err(|err| VisionError::invalid_parameter("rows", context, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn tetra_meta() -> VisualMeta {
        VisualMeta::new(4).with_relative(true)
    }

    #[test]
    fn test_row_len_counts_achromatic_channel() {
        assert_eq!(VisualMeta::new(4).row_len(), 4);
        assert_eq!(VisualMeta::new(4).with_achromatic("bt.dc").row_len(), 5);
    }

    #[test]
    fn test_rejects_row_length_mismatch() {
        let err = QuantumCatches::new(
            vec!["a".into()],
            vec!["u".into(), "s".into(), "m".into(), "l".into()],
            array![[0.25, 0.25, 0.5]],
            tetra_meta(),
        )
        .unwrap_err();
        assert!(matches!(err, VisionError::ShapeMismatch { expected: 4, got: 3, .. }));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let rows = vec![vec![0.25; 4], vec![0.5; 3]];
        let result =
            QuantumCatches::from_rows(&["a", "b"], &["u", "s", "m", "l"], &rows, tetra_meta());
        assert!(result.is_err());
    }

    #[test]
    fn test_achromatic_column_split() {
        let meta = VisualMeta::new(2).with_achromatic("ml");
        let catches = QuantumCatches::from_rows(
            &["a", "b"],
            &["s", "l"],
            &[vec![1.0, 2.0, 9.0], vec![3.0, 4.0, 8.0]],
            meta,
        )
        .unwrap();
        assert_eq!(catches.chromatic().ncols(), 2);
        let lum = catches.achromatic().unwrap();
        assert_eq!(lum.to_vec(), vec![9.0, 8.0]);
    }

    #[test]
    fn test_select_rows_keeps_metadata() {
        let catches = QuantumCatches::from_rows(
            &["a", "b", "c"],
            &["s", "l"],
            &[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
            VisualMeta::new(2).with_visual_system("canis"),
        )
        .unwrap();
        let picked = catches.select_rows(&[2, 0]);
        assert_eq!(picked.labels(), &["c".to_string(), "a".to_string()]);
        assert_eq!(picked.values()[[0, 0]], 5.0);
        assert_eq!(picked.meta().visual_system, "canis");
    }
}
