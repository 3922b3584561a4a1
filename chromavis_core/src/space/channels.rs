//! Channel resolution for projector inputs.
//!
//! Decides which input columns feed a colour space's receptor channels. The
//! outcome is an explicit [`ChannelResolution`] rather than a silent guess:
//!
//! - `Exact`: every expected channel found by name (tables) or the declared
//!   cone count equals the requirement (visual-model records)
//! - `Positional`: names not recognised, but exactly the required number of
//!   columns, taken in order
//! - `Truncated`: more columns than required; the first N are taken
//!
//! Fewer columns than required is a contract error.

use serde::{Deserialize, Serialize};

use crate::error::{VisionError, VisionResult};

/// Tagged result of channel resolution. Indices refer to input columns and
/// are listed in the space's channel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelResolution {
    Exact {
        indices: Vec<usize>,
        /// Columns present in the input but not used.
        unused: Vec<String>,
    },
    Positional {
        indices: Vec<usize>,
    },
    Truncated {
        indices: Vec<usize>,
        dropped: Vec<String>,
    },
}

impl ChannelResolution {
    pub fn indices(&self) -> &[usize] {
        match self {
            ChannelResolution::Exact { indices, .. }
            | ChannelResolution::Positional { indices }
            | ChannelResolution::Truncated { indices, .. } => indices,
        }
    }
}

/// Resolve a visual-model record whose channel order is declared.
///
/// `names` are the record's chromatic channel names in declared order.
pub fn resolve_declared(names: &[String], required: usize, context: &str) -> VisionResult<ChannelResolution> {
    let available = names.len();
    if available < required {
        return Err(VisionError::channel_count(required, available, context));
    }
    let indices: Vec<usize> = (0..required).collect();
    if available == required {
        Ok(ChannelResolution::Exact {
            indices,
            unused: Vec::new(),
        })
    } else {
        Ok(ChannelResolution::Truncated {
            indices,
            dropped: names[required..].to_vec(),
        })
    }
}

/// Resolve a bare table from its candidate `(column index, name)` pairs.
pub fn resolve_table(
    candidates: &[(usize, &str)],
    expected: &[&str],
    context: &str,
) -> VisionResult<ChannelResolution> {
    let required = expected.len();
    if candidates.len() < required {
        return Err(VisionError::channel_count(required, candidates.len(), context));
    }

    let by_name: Option<Vec<usize>> = expected
        .iter()
        .map(|want| {
            candidates
                .iter()
                .find(|(_, name)| name == want)
                .map(|(idx, _)| *idx)
        })
        .collect();

    if let Some(indices) = by_name {
        let unused = candidates
            .iter()
            .filter(|(idx, _)| !indices.contains(idx))
            .map(|(_, name)| name.to_string())
            .collect();
        return Ok(ChannelResolution::Exact { indices, unused });
    }

    let indices: Vec<usize> = candidates[..required].iter().map(|(idx, _)| *idx).collect();
    if candidates.len() == required {
        Ok(ChannelResolution::Positional { indices })
    } else {
        let dropped = candidates[required..]
            .iter()
            .map(|(_, name)| name.to_string())
            .collect();
        Ok(ChannelResolution::Truncated { indices, dropped })
    }
}
