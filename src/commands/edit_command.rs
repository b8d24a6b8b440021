use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::document::Document;
use crate::core::types::{ReplacementRule, RuleOutcome};
use crate::diff::operations::{summarize_changes, unified_preview, ChangeSummary};
use crate::diff::search_replace::apply_all;
use crate::error::{TextSwapError, TextSwapResult};
use crate::utils::fs::{backup_file, file_hash};

/// How a replacement run should treat the file on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOptions {
    /// Compute and report outcomes without saving
    pub dry_run: bool,
    /// Copy the original to `<file>.bak` before saving
    pub backup: bool,
    /// Produce a unified diff of the edit
    pub diff: bool,
}

/// Everything a run reports back to the caller
#[derive(Debug, Clone)]
pub struct EditReport {
    pub path: PathBuf,
    pub outcomes: Vec<RuleOutcome>,
    pub changes: ChangeSummary,
    /// Whether the edited text was written back
    pub saved: bool,
    pub backup: Option<PathBuf>,
    pub preview: Option<String>,
}

impl EditReport {
    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    pub fn not_found_count(&self) -> usize {
        self.outcomes.len() - self.applied_count()
    }
}

impl fmt::Display for EditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{}", outcome)?;
        }
        if let Some(preview) = &self.preview {
            write!(f, "{}", preview)?;
        }

        let verdict = if self.saved {
            "file updated"
        } else if self.applied_count() == 0 {
            "nothing to write"
        } else {
            "dry run, file left untouched"
        };
        write!(
            f,
            "{}: {} applied, {} not found, {} ({})",
            self.path.display(),
            self.applied_count(),
            self.not_found_count(),
            self.changes,
            verdict
        )
    }
}

/// Load `path`, apply `rules` in order and write the result back when anything changed.
///
/// Patterns that do not match are reported, never fatal. In dry-run mode the file
/// is hashed before and after to prove it was not modified.
pub fn run_edit(
    path: impl AsRef<Path>,
    rules: &[ReplacementRule],
    options: &EditOptions,
) -> TextSwapResult<EditReport> {
    let path = path.as_ref();
    let mut document = Document::load(path)?;
    let original = document.text.clone();

    let hash_before = if options.dry_run {
        Some(file_hash(path).map_err(|e| TextSwapError::not_found(e, path))?)
    } else {
        None
    };

    let outcomes = apply_all(&mut document, rules);
    let changes = summarize_changes(&original, &document.text);
    let preview = options
        .diff
        .then(|| unified_preview(path, &original, &document.text));

    let any_applied = outcomes.iter().any(|o| o.is_applied());
    let mut backup = None;
    let mut saved = false;

    if let Some(hash_before) = hash_before {
        let hash_after = file_hash(path).map_err(|e| TextSwapError::not_found(e, path))?;
        if hash_after != hash_before {
            return Err(TextSwapError::write_error(
                "file changed on disk during a dry run",
                path,
            ));
        }
        info!("Dry run: {} left untouched", path.display());
    } else if any_applied {
        if options.backup {
            backup = Some(backup_file(path)?);
        }
        document.save()?;
        saved = true;
    } else {
        debug!("No rule applied, skipping save of {}", path.display());
    }

    Ok(EditReport {
        path: path.to_path_buf(),
        outcomes,
        changes,
        saved,
        backup,
        preview,
    })
}
