pub mod operations;
pub mod search_replace;

pub use operations::{summarize_changes, unified_preview, ChangeSummary};
pub use search_replace::{apply_all, apply_rule, parse_search_replace_blocks, BlockSyntaxError};
