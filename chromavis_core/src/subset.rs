//! Label-based filtering of records.
//!
//! Patterns are regular expressions matched anywhere in a label. A row is
//! kept when it matches any pattern; row order is preserved.

use regex::Regex;

use crate::data::{CatchTable, QuantumCatches};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::distance::DistanceRecord;
use crate::error::{VisionError, VisionResult};
use crate::space::ColourSpaceRecord;

/// Compile label patterns, rejecting invalid expressions.
pub fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> VisionResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            let p = p.as_ref();
            Regex::new(p).map_err(|err| VisionError::invalid_pattern(p, err.to_string()))
        })
        .collect()
}

/// Indices of `labels` matching any of `patterns`.
pub(crate) fn matching_rows(labels: &[String], patterns: &[Regex]) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, label)| patterns.iter().any(|re| re.is_match(label)))
        .map(|(i, _)| i)
        .collect()
}

/// Records that can be filtered by sample label.
pub trait LabelSubset: Sized {
    /// Keep the rows (or pairs) whose labels match any pattern.
    ///
    /// The second element is set when nothing matched.
    fn retain_labels(&self, patterns: &[Regex]) -> (Self, Option<Diagnostic>);
}

/// Filter `record` to the samples whose labels match any of `patterns`.
///
/// Matching nothing is not an error: an empty record is returned and an
/// `empty_subset` diagnostic is logged. Colour-space and distance records
/// also carry it in their diagnostics; catch records and tables have no
/// diagnostics list, so use [`subset_by_label_with_diagnostic`] to see it.
pub fn subset_by_label<T, S>(record: &T, patterns: &[S]) -> VisionResult<T>
where
    T: LabelSubset,
    S: AsRef<str>,
{
    subset_by_label_with_diagnostic(record, patterns).map(|(subset, _)| subset)
}

/// Like [`subset_by_label`], also returning the empty-subset diagnostic.
pub fn subset_by_label_with_diagnostic<T, S>(
    record: &T,
    patterns: &[S],
) -> VisionResult<(T, Option<Diagnostic>)>
where
    T: LabelSubset,
    S: AsRef<str>,
{
    let compiled = compile_patterns(patterns)?;
    Ok(record.retain_labels(&compiled))
}

fn empty_subset(patterns: &[Regex]) -> Diagnostic {
    let shown: Vec<&str> = patterns.iter().map(|re| re.as_str()).collect();
    Diagnostic::warn(
        DiagnosticKind::EmptySubset,
        format!("no labels match [{}]", shown.join(", ")),
    )
}

fn outcome(kept: usize, patterns: &[Regex]) -> Option<Diagnostic> {
    (kept == 0 && !patterns.is_empty()).then(|| empty_subset(patterns))
}

impl LabelSubset for QuantumCatches {
    fn retain_labels(&self, patterns: &[Regex]) -> (Self, Option<Diagnostic>) {
        let rows = if patterns.is_empty() {
            (0..self.len()).collect()
        } else {
            matching_rows(self.labels(), patterns)
        };
        (self.select_rows(&rows), outcome(rows.len(), patterns))
    }
}

impl LabelSubset for CatchTable {
    fn retain_labels(&self, patterns: &[Regex]) -> (Self, Option<Diagnostic>) {
        let rows = if patterns.is_empty() {
            (0..self.len()).collect()
        } else {
            matching_rows(self.labels(), patterns)
        };
        (self.select_rows(&rows), outcome(rows.len(), patterns))
    }
}

impl LabelSubset for ColourSpaceRecord {
    fn retain_labels(&self, patterns: &[Regex]) -> (Self, Option<Diagnostic>) {
        let rows = if patterns.is_empty() {
            (0..self.len()).collect()
        } else {
            matching_rows(self.labels(), patterns)
        };
        let mut subset = self.select_rows(&rows);
        let diagnostic = outcome(rows.len(), patterns);
        if let Some(d) = &diagnostic {
            subset.push_diagnostic(d.clone());
        }
        (subset, diagnostic)
    }
}

impl LabelSubset for DistanceRecord {
    fn retain_labels(&self, patterns: &[Regex]) -> (Self, Option<Diagnostic>) {
        let mut subset = self.filter_pairs(|p| {
            patterns.is_empty()
                || patterns
                    .iter()
                    .any(|re| re.is_match(&p.patch1) || re.is_match(&p.patch2))
        });
        let diagnostic = outcome(subset.len(), patterns);
        if let Some(d) = &diagnostic {
            subset.push_diagnostic(d.clone());
        }
        (subset, diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::VisualMeta;

    fn catches() -> QuantumCatches {
        QuantumCatches::from_rows(
            &["wing.1", "wing.2", "tail.1", "head"],
            &["s", "l"],
            &[vec![1.0, 2.0], vec![1.5, 2.0], vec![3.0, 1.0], vec![2.0, 2.0]],
            VisualMeta::new(2),
        )
        .unwrap()
    }

    #[test]
    fn single_pattern_partial_match() {
        let subset = subset_by_label(&catches(), &["wing"]).unwrap();
        assert_eq!(subset.labels(), &["wing.1", "wing.2"]);
        assert_eq!(subset.values()[[1, 0]], 1.5);
    }

    #[test]
    fn multiple_patterns_are_a_union_in_row_order() {
        let subset = subset_by_label(&catches(), &["head", "wing.1"]).unwrap();
        assert_eq!(subset.labels(), &["wing.1", "head"]);
    }

    #[test]
    fn no_match_yields_empty_record() {
        let subset = subset_by_label(&catches(), &["leg"]).unwrap();
        assert!(subset.is_empty());
        assert_eq!(subset.meta().cone_count, 2);
    }

    #[test]
    fn empty_catch_subset_reports_its_diagnostic() {
        let (subset, diagnostic) = subset_by_label_with_diagnostic(&catches(), &["leg"]).unwrap();
        assert!(subset.is_empty());
        assert_eq!(diagnostic.map(|d| d.kind), Some(DiagnosticKind::EmptySubset));

        let (subset, diagnostic) = subset_by_label_with_diagnostic(&catches(), &["tail"]).unwrap();
        assert_eq!(subset.len(), 1);
        assert!(diagnostic.is_none());
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let err = subset_by_label(&catches(), &["wing("]).unwrap_err();
        assert!(matches!(err, VisionError::InvalidPattern { .. }));
    }

    #[test]
    fn tables_can_be_filtered() {
        let table = CatchTable::from_rows(&["a1", "b1", "a2"], &["s", "l"], &[
            vec![0.1, 0.9],
            vec![0.2, 0.8],
            vec![0.3, 0.7],
        ])
        .unwrap();
        let subset = subset_by_label(&table, &["^a"]).unwrap();
        assert_eq!(subset.labels(), &["a1", "a2"]);
    }
}
