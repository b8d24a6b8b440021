use similar::{ChangeTag, TextDiff};
use std::fmt;
use std::path::Path;

/// Lines added and removed between two versions of a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub inserted: usize,
    pub deleted: usize,
}

impl ChangeSummary {
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}/-{} lines", self.inserted, self.deleted)
    }
}

/// Count changed lines between the original and edited text
pub fn summarize_changes(old: &str, new: &str) -> ChangeSummary {
    let diff = TextDiff::from_lines(old, new);
    let mut summary = ChangeSummary::default();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => summary.deleted += 1,
            ChangeTag::Insert => summary.inserted += 1,
            ChangeTag::Equal => {}
        }
    }

    summary
}

/// Render a unified diff of a pending edit, empty when nothing changed
pub fn unified_preview(path: &Path, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    let name = path.display().to_string();
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", name), &format!("b/{}", name))
        .to_string()
}
