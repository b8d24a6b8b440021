use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use tracing::{debug, info, warn};

use crate::core::document::Document;
use crate::core::types::{ReplacementRule, RuleOutcome, RuleStatus};

/// Apply one rule to the document, replacing every non-overlapping occurrence.
///
/// The document is only touched when the pattern occurs at least once.
pub fn apply_rule(document: &mut Document, rule: &ReplacementRule, index: usize) -> RuleOutcome {
    let label = rule.label(index);

    let count = if rule.pattern.is_empty() {
        0
    } else {
        document.text.matches(rule.pattern.as_str()).count()
    };

    if count == 0 {
        warn!("{} not found in {}", label, document.path().display());
        return RuleOutcome {
            index,
            label,
            status: RuleStatus::NotFound,
            count: 0,
        };
    }

    document.text = document
        .text
        .replace(rule.pattern.as_str(), &rule.replacement);
    debug!("{}: replaced {} occurrence(s)", label, count);

    RuleOutcome {
        index,
        label,
        status: RuleStatus::Applied,
        count,
    }
}

/// Apply rules in order; each rule sees the text produced by the previous one
pub fn apply_all(document: &mut Document, rules: &[ReplacementRule]) -> Vec<RuleOutcome> {
    let outcomes: Vec<RuleOutcome> = rules
        .iter()
        .enumerate()
        .map(|(index, rule)| apply_rule(document, rule, index))
        .collect();

    let applied = outcomes.iter().filter(|o| o.is_applied()).count();
    info!(
        "Applied {} of {} rule(s) to {}",
        applied,
        outcomes.len(),
        document.path().display()
    );

    outcomes
}

lazy_static! {
    static ref SEARCH_MARKER: Regex = Regex::new(r"^<{7,}\s*SEARCH\s*$").unwrap();
    static ref DIVIDER_MARKER: Regex = Regex::new(r"^={7,}\s*$").unwrap();
    static ref REPLACE_MARKER: Regex = Regex::new(r"^>{7,}\s*REPLACE\s*$").unwrap();
}

/// Syntax error in a search/replace block file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSyntaxError {
    pub message: String,
    pub line_number: Option<usize>,
}

impl BlockSyntaxError {
    fn at(message: impl Into<String>, line_number: usize) -> Self {
        Self {
            message: message.into(),
            line_number: Some(line_number),
        }
    }
}

impl fmt::Display for BlockSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(line) = self.line_number {
            write!(f, "Syntax error at line {}: {}", line, self.message)
        } else {
            write!(f, "Syntax error: {}", self.message)
        }
    }
}

impl std::error::Error for BlockSyntaxError {}

/// Parse rules written as search/replace blocks.
///
/// Supports the marker format (`<<<<<<< SEARCH` / `=======` / `>>>>>>> REPLACE`)
/// and the prefix format (`search:` / `replace:`). Block lines keep the rule
/// file's own terminators (`\n` or `\r\n`); only the one ending the last line
/// of each block is dropped.
pub fn parse_search_replace_blocks(text: &str) -> Result<Vec<ReplacementRule>, BlockSyntaxError> {
    if text.lines().any(|line| SEARCH_MARKER.is_match(line)) {
        return parse_blocks(text, BlockDialect::Markers);
    }
    if text.lines().any(|line| line.trim() == "search:") {
        return parse_blocks(text, BlockDialect::Prefixes);
    }

    Err(BlockSyntaxError {
        message: "No search/replace blocks found in either marker or prefix format".to_string(),
        line_number: None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockDialect {
    Markers,
    Prefixes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockLine {
    Open,
    Divide,
    Close,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Outside,
    Search,
    Replace,
}

impl BlockDialect {
    fn classify(self, line: &str) -> BlockLine {
        let bare = strip_terminator(line);
        match self {
            BlockDialect::Markers if SEARCH_MARKER.is_match(bare) => BlockLine::Open,
            BlockDialect::Markers if DIVIDER_MARKER.is_match(bare) => BlockLine::Divide,
            BlockDialect::Markers if REPLACE_MARKER.is_match(bare) => BlockLine::Close,
            BlockDialect::Prefixes if bare.trim() == "search:" => BlockLine::Open,
            BlockDialect::Prefixes if bare.trim() == "replace:" => BlockLine::Divide,
            _ => BlockLine::Text,
        }
    }

    /// Prefix blocks end at the next `search:` or at end of input
    fn closes_implicitly(self) -> bool {
        self == BlockDialect::Prefixes
    }
}

fn strip_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(line) => line.strip_suffix('\r').unwrap_or(line),
        None => line,
    }
}

fn block_rule(search: &[&str], replace: &[&str]) -> ReplacementRule {
    let join = |lines: &[&str]| {
        let mut text = lines.concat();
        let end = strip_terminator(&text).len();
        text.truncate(end);
        text
    };

    ReplacementRule {
        name: None,
        pattern: join(search),
        replacement: join(replace),
    }
}

fn unexpected(place: &str, line: &str, line_number: usize) -> BlockSyntaxError {
    BlockSyntaxError::at(
        format!("Unexpected marker {}: {}", place, strip_terminator(line)),
        line_number,
    )
}

fn parse_blocks(
    text: &str,
    dialect: BlockDialect,
) -> Result<Vec<ReplacementRule>, BlockSyntaxError> {
    let mut rules = Vec::new();
    let mut section = Section::Outside;
    let mut search: Vec<&str> = Vec::new();
    let mut replace: Vec<&str> = Vec::new();
    let mut opened_at = 0;

    for (i, line) in text.split_inclusive('\n').enumerate() {
        let line_number = i + 1;

        match (section, dialect.classify(line)) {
            (Section::Outside, BlockLine::Text) => {}
            (Section::Search, BlockLine::Text) => search.push(line),
            (Section::Replace, BlockLine::Text) => replace.push(line),
            (Section::Outside, BlockLine::Open) => {
                opened_at = line_number;
                section = Section::Search;
            }
            (Section::Search, BlockLine::Divide) => {
                if search.is_empty() {
                    return Err(BlockSyntaxError::at("SEARCH block cannot be empty", opened_at));
                }
                section = Section::Replace;
            }
            (Section::Replace, BlockLine::Close) => {
                rules.push(block_rule(&search, &replace));
                search.clear();
                replace.clear();
                section = Section::Outside;
            }
            (Section::Replace, BlockLine::Open) if dialect.closes_implicitly() => {
                rules.push(block_rule(&search, &replace));
                search.clear();
                replace.clear();
                opened_at = line_number;
                section = Section::Search;
            }
            (Section::Outside, _) => return Err(unexpected("outside a block", line, line_number)),
            (Section::Search, _) => return Err(unexpected("in SEARCH block", line, line_number)),
            (Section::Replace, _) => return Err(unexpected("in REPLACE block", line, line_number)),
        }
    }

    match section {
        Section::Outside => {}
        Section::Search => {
            return Err(BlockSyntaxError::at(
                "Unclosed SEARCH block - missing divider",
                opened_at,
            ))
        }
        Section::Replace if dialect.closes_implicitly() => {
            rules.push(block_rule(&search, &replace));
        }
        Section::Replace => {
            return Err(BlockSyntaxError::at(
                "Unclosed block - missing REPLACE marker",
                opened_at,
            ))
        }
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, replacement: &str) -> ReplacementRule {
        ReplacementRule::new(pattern, replacement).unwrap()
    }

    #[test]
    fn test_replace_all_occurrences() {
        let mut doc = Document::new("t.txt", "x-x-x");
        let outcome = apply_rule(&mut doc, &rule("x", "y"), 0);
        assert_eq!(doc.text, "y-y-y");
        assert_eq!(outcome.status, RuleStatus::Applied);
        assert_eq!(outcome.count, 3);
    }

    #[test]
    fn test_absent_pattern_is_noop() {
        let mut doc = Document::new("t.txt", "I'm a Graphic Designer");
        let before = doc.text.clone();
        let outcome = apply_rule(&mut doc, &rule("graphic designer", "Builder"), 0);
        assert_eq!(outcome.status, RuleStatus::NotFound);
        assert_eq!(outcome.count, 0);
        assert_eq!(doc.text.as_bytes(), before.as_bytes());
    }

    #[test]
    fn test_non_overlapping_scan() {
        let mut doc = Document::new("t.txt", "aaaa");
        let outcome = apply_rule(&mut doc, &rule("aa", "b"), 0);
        assert_eq!(doc.text, "bb");
        assert_eq!(outcome.count, 2);
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let mut doc = Document::new("t.txt", "abc");
        let unchecked = ReplacementRule {
            name: None,
            pattern: String::new(),
            replacement: "x".to_string(),
        };
        let outcome = apply_rule(&mut doc, &unchecked, 0);
        assert_eq!(outcome.status, RuleStatus::NotFound);
        assert_eq!(doc.text, "abc");
    }

    #[test]
    fn test_order_sensitivity() {
        let r1 = rule("A", "AB");
        let r2 = rule("AB", "C");

        let mut forward = Document::new("t.txt", "A");
        apply_all(&mut forward, &[r1.clone(), r2.clone()]);
        assert_eq!(forward.text, "C");

        let mut reversed = Document::new("t.txt", "A");
        let outcomes = apply_all(&mut reversed, &[r2, r1]);
        assert_eq!(reversed.text, "AB");
        assert_eq!(outcomes[0].status, RuleStatus::NotFound);
        assert_eq!(outcomes[1].status, RuleStatus::Applied);
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let rules = vec![
            rule("I'm a Graphic Designer", "I am a digital designer").named("First paragraph"),
            rule("My work focuses", "I approach every project").named("Second paragraph"),
        ];
        let mut doc = Document::new(
            "index.html",
            "<p>I'm a Graphic Designer.</p>\n<p>My work focuses on design.</p>\n",
        );

        let first = apply_all(&mut doc, &rules);
        assert!(first.iter().all(|o| o.is_applied()));
        let after_first = doc.text.clone();

        let second = apply_all(&mut doc, &rules);
        assert!(second.iter().all(|o| o.status == RuleStatus::NotFound));
        assert_eq!(doc.text, after_first);
    }

    #[test]
    fn test_unaffected_paragraphs_untouched() {
        let p1 = "<p>\n  Intro — café\n</p>\n";
        let p2 = "<p>\n  I'm a Graphic Designer\n</p>\n";
        let p3 = "<p>\n  Contact\r\n</p>\n";
        let mut doc = Document::new("index.html", format!("{p1}{p2}{p3}"));

        let outcomes = apply_all(&mut doc, &[rule("Graphic Designer", "digital designer")]);
        assert_eq!(outcomes.len(), 1);
        assert!(doc.text.starts_with(p1));
        assert!(doc.text.ends_with(p3));
        assert!(doc.text.contains("I'm a digital designer"));
    }

    #[test]
    fn test_outcomes_follow_input_order() {
        let mut doc = Document::new("t.txt", "alpha beta");
        let outcomes = apply_all(
            &mut doc,
            &[rule("gamma", "g"), rule("beta", "b"), rule("alpha", "a")],
        );
        let indexes: Vec<usize> = outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
        assert_eq!(outcomes[0].label, "rule #1");
        assert_eq!(doc.text, "a b");
    }

    #[test]
    fn test_parse_marker_blocks() {
        let text = r#"<<<<<<< SEARCH
I'm a Graphic Designer involved in videography.
I enjoy transforming complex ideas.
=======
I am a digital designer.
>>>>>>> REPLACE
<<<<<<< SEARCH
const x = 5;
=======
>>>>>>> REPLACE"#;

        let rules = parse_search_replace_blocks(text).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules[0].pattern,
            "I'm a Graphic Designer involved in videography.\nI enjoy transforming complex ideas."
        );
        assert_eq!(rules[0].replacement, "I am a digital designer.");
        assert_eq!(rules[1].replacement, "");
    }

    #[test]
    fn test_parse_invalid_block() {
        let text = r#"<<<<<<< SEARCH
function hello() {
}
>>>>>>> REPLACE"#;

        let err = parse_search_replace_blocks(text).unwrap_err();
        assert_eq!(err.line_number, Some(4));
    }

    #[test]
    fn test_parse_unclosed_block() {
        let text = "<<<<<<< SEARCH\nold\n=======\nnew\n";
        let err = parse_search_replace_blocks(text).unwrap_err();
        assert_eq!(err.line_number, Some(1));
        assert!(err.message.contains("missing REPLACE marker"));
    }

    #[test]
    fn test_parse_prefix_blocks() {
        let text = "search:\nold one\nreplace:\nnew one\nsearch:\nold two\nreplace:\nnew two\n";
        let rules = parse_search_replace_blocks(text).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].pattern, "old two");
        assert_eq!(rules[1].replacement, "new two");
    }

    #[test]
    fn test_parse_no_blocks() {
        let err = parse_search_replace_blocks("just some text\n").unwrap_err();
        assert_eq!(err.line_number, None);
    }

    #[test]
    fn test_crlf_blocks_match_crlf_document() {
        let text = "<<<<<<< SEARCH\r\nline a\r\nline b\r\n=======\r\nline c\r\nline d\r\n>>>>>>> REPLACE\r\n";
        let rules = parse_search_replace_blocks(text).unwrap();
        assert_eq!(rules[0].pattern, "line a\r\nline b");
        assert_eq!(rules[0].replacement, "line c\r\nline d");

        let mut doc = Document::new("index.html", "line a\r\nline b\r\n");
        let outcome = apply_rule(&mut doc, &rules[0], 0);
        assert_eq!(outcome.status, RuleStatus::Applied);
        assert_eq!(doc.text, "line c\r\nline d\r\n");
    }

    #[test]
    fn test_crlf_prefix_blocks() {
        let text = "search:\r\nold one\r\nold two\r\nreplace:\r\nnew\r\n";
        let rules = parse_search_replace_blocks(text).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].pattern, "old one\r\nold two");
        assert_eq!(rules[0].replacement, "new");
    }

    #[test]
    fn test_marker_errors_share_wording() {
        let err = parse_search_replace_blocks("=======\n<<<<<<< SEARCH\nx\n").unwrap_err();
        assert_eq!(err.line_number, Some(1));
        assert_eq!(err.message, "Unexpected marker outside a block: =======");

        let err = parse_search_replace_blocks("search:\na\nsearch:\n").unwrap_err();
        assert_eq!(err.line_number, Some(3));
        assert_eq!(err.message, "Unexpected marker in SEARCH block: search:");
    }
}
