//! Bare labelled tables of receptor values.
//!
//! A [`CatchTable`] carries no visual-model metadata, so the projector has to
//! work out which columns are which (see [`crate::space::channels`]).

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::quantum_catch::rows_to_array;
use crate::error::{VisionError, VisionResult};

/// Column name recognised as the achromatic channel of a bare table.
pub const LUM_COLUMN: &str = "lum";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchTable {
    labels: Vec<String>,
    columns: Vec<String>,
    values: Array2<f64>,
}

impl CatchTable {
    pub fn new(labels: Vec<String>, columns: Vec<String>, values: Array2<f64>) -> VisionResult<Self> {
        if labels.len() != values.nrows() {
            return Err(VisionError::shape_mismatch(
                values.nrows(),
                labels.len(),
                "table labels",
            ));
        }
        if columns.len() != values.ncols() {
            return Err(VisionError::shape_mismatch(
                values.ncols(),
                columns.len(),
                "table column names",
            ));
        }
        Ok(Self {
            labels,
            columns,
            values,
        })
    }

    pub fn from_rows<L, C>(labels: &[L], columns: &[C], rows: &[Vec<f64>]) -> VisionResult<Self>
    where
        L: AsRef<str>,
        C: AsRef<str>,
    {
        let values = rows_to_array(rows, columns.len(), "table row length")?;
        Self::new(
            labels.iter().map(|l| l.as_ref().to_string()).collect(),
            columns.iter().map(|c| c.as_ref().to_string()).collect(),
            values,
        )
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of the `lum` column, if present.
    pub fn lum_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c == LUM_COLUMN)
    }

    pub fn lum(&self) -> Option<ArrayView1<'_, f64>> {
        self.lum_index().map(|idx| self.values.column(idx))
    }

    /// Candidate chromatic columns: every column except `lum`, as (index, name).
    pub(crate) fn chromatic_columns(&self) -> Vec<(usize, &str)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, name)| name.as_str() != LUM_COLUMN)
            .map(|(idx, name)| (idx, name.as_str()))
            .collect()
    }

    pub(crate) fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            labels: rows.iter().map(|&i| self.labels[i].clone()).collect(),
            columns: self.columns.clone(),
            values: self.values.select(Axis(0), rows),
        }
    }
}
