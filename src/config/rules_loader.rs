use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::types::ReplacementRule;
use crate::diff::search_replace::parse_search_replace_blocks;
use crate::error::{TextSwapError, TextSwapResult};

/// Structured rule file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<ReplacementRule>,
}

/// Rule file formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    Toml,
    Yaml,
    Json,
    /// `<<<<<<< SEARCH` / `=======` / `>>>>>>> REPLACE` or `search:` / `replace:` blocks
    Blocks,
}

impl RuleFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => RuleFormat::Toml,
            Some("yaml") | Some("yml") => RuleFormat::Yaml,
            Some("json") => RuleFormat::Json,
            _ => RuleFormat::Blocks,
        }
    }
}

/// Loads replacement rules from a file
pub struct RulesLoader {
    path: PathBuf,
}

impl RulesLoader {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and parse the rule file, validating every rule
    pub fn load(&self) -> TextSwapResult<Vec<ReplacementRule>> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| TextSwapError::not_found(e, &self.path))?;

        let format = RuleFormat::from_path(&self.path);
        debug!("Parsing {} as {:?}", self.path.display(), format);

        let rules = self.parse(&content, format)?;
        for rule in &rules {
            rule.validate()?;
        }

        info!("Loaded {} rule(s) from {}", rules.len(), self.path.display());
        Ok(rules)
    }

    fn parse(&self, content: &str, format: RuleFormat) -> TextSwapResult<Vec<ReplacementRule>> {
        let parse_err = |message: String| TextSwapError::rule_parse(message, &self.path, None);

        match format {
            RuleFormat::Toml => toml::from_str::<RuleSet>(content)
                .map(|set| set.rules)
                .map_err(|e| parse_err(e.to_string())),
            RuleFormat::Yaml => serde_yaml::from_str::<RuleSet>(content)
                .map(|set| set.rules)
                .map_err(|e| parse_err(e.to_string())),
            RuleFormat::Json => serde_json::from_str::<RuleSet>(content)
                .map(|set| set.rules)
                .map_err(|e| parse_err(e.to_string())),
            RuleFormat::Blocks => parse_search_replace_blocks(content)
                .map_err(|e| TextSwapError::rule_parse(e.message, &self.path, e.line_number)),
        }
    }
}

/// Load rules from `path`
pub fn load_rules(path: impl AsRef<Path>) -> TextSwapResult<Vec<ReplacementRule>> {
    RulesLoader::with_path(path.as_ref()).load()
}
