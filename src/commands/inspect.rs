use std::ops::RangeInclusive;
use tracing::debug;

use crate::core::document::{Document, InspectLines};
use crate::error::{TextSwapError, TextSwapResult};

/// Characters of a candidate shown in probe reports
pub const PROBE_PREVIEW_CHARS: usize = 50;

/// Lines `range` (1-based, inclusive) of the document, for review before editing
pub fn inspect(document: &Document, range: RangeInclusive<usize>) -> InspectLines<'_> {
    document.lines(range)
}

/// Parse a `<start>:<end>` line range
pub fn parse_line_range(text: &str) -> TextSwapResult<RangeInclusive<usize>> {
    let (start, end) = text.split_once(':').ok_or_else(|| {
        TextSwapError::invalid_argument(format!("line range '{}' must look like START:END", text))
    })?;

    let parse = |value: &str| {
        value.trim().parse::<usize>().map_err(|_| {
            TextSwapError::invalid_argument(format!("'{}' is not a line number", value))
        })
    };
    let (start, end) = (parse(start)?, parse(end)?);

    if start == 0 {
        return Err(TextSwapError::invalid_argument(
            "line numbers start at 1",
        ));
    }
    if start > end {
        return Err(TextSwapError::invalid_argument(format!(
            "range start {} is after end {}",
            start, end
        )));
    }

    Ok(start..=end)
}

/// Whether a candidate string currently occurs in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHit {
    pub candidate: String,
    pub found: bool,
}

impl ProbeHit {
    /// One report line, truncating long candidates
    pub fn report_line(&self) -> String {
        let preview: String = self.candidate.chars().take(PROBE_PREVIEW_CHARS).collect();
        if self.found {
            format!("✓ Found: {}", preview)
        } else {
            format!("✗ Not found: {}", preview)
        }
    }
}

/// Check each candidate against the document text, preserving input order
pub fn probe<S: AsRef<str>>(document: &Document, candidates: &[S]) -> Vec<ProbeHit> {
    candidates
        .iter()
        .map(|candidate| {
            let candidate = candidate.as_ref();
            let found = document.text.contains(candidate);
            debug!("probe {:?}: {}", candidate, found);
            ProbeHit {
                candidate: candidate.to_string(),
                found,
            }
        })
        .collect()
}
