pub mod rules_loader;

pub use rules_loader::{load_rules, RuleFormat, RuleSet, RulesLoader};
