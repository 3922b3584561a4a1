//! Recoverable input-shape diagnostics.
//!
//! A diagnostic never changes the schema of the returned record. It is logged
//! through `tracing` where it arises and attached to the record so callers can
//! inspect what fallback was applied.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Class of recoverable issue encountered while projecting or comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// More chromatic channels than the space uses; the first N were kept.
    ExcessChannels,
    /// Rows were rescaled to sum to one.
    Renormalized,
    /// Channel names were not recognised; columns were taken in order.
    PositionalChannels,
    /// Channel names were not recognised and surplus columns were dropped.
    TruncatedChannels,
    /// A bare table was assumed to hold the catch scale the space requires.
    ScaleAssumed,
    /// Relative catches were supplied where absolute ones are expected.
    RelativeInput,
    /// Achromatic contrast was requested but no achromatic channel exists.
    AchromaticUnavailable,
    /// A label filter matched nothing.
    EmptySubset,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::ExcessChannels => "excess_channels",
            DiagnosticKind::Renormalized => "renormalized",
            DiagnosticKind::PositionalChannels => "positional_channels",
            DiagnosticKind::TruncatedChannels => "truncated_channels",
            DiagnosticKind::ScaleAssumed => "scale_assumed",
            DiagnosticKind::RelativeInput => "relative_input",
            DiagnosticKind::AchromaticUnavailable => "achromatic_unavailable",
            DiagnosticKind::EmptySubset => "empty_subset",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recoverable issue and the fallback that was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic and emit it as a warning event.
    pub fn warn(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(kind = kind.as_str(), "{}", message);
        Self { kind, message }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Returns true if any diagnostic of `kind` is present.
pub fn has_kind(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> bool {
    diagnostics.iter().any(|d| d.kind == kind)
}
