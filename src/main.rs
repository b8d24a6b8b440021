use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use textswap::{
    commands::{
        edit_command::{run_edit, EditOptions},
        inspect::{inspect, parse_line_range, probe},
    },
    config::rules_loader::load_rules,
    core::{document::Document, types::ReplacementRule},
};

/// Replace exact blocks of text in a file and report what matched
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target document
    #[arg(short, long)]
    file: PathBuf,

    /// Rule file (.toml, .yaml, .json, or SEARCH/REPLACE blocks)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Inline rule, applied after the rule file; may be repeated
    #[arg(
        long = "replace",
        num_args = 2,
        value_names = ["PATTERN", "REPLACEMENT"],
        allow_hyphen_values = true
    )]
    replace: Vec<String>,

    /// Report outcomes without writing the file
    #[arg(long)]
    dry_run: bool,

    /// Print lines START:END (1-based, inclusive) and exit
    #[arg(long, value_name = "START:END")]
    inspect: Option<String>,

    /// Report whether TEXT occurs in the file and exit; may be repeated
    #[arg(long, value_name = "TEXT")]
    probe: Vec<String>,

    /// Print a unified diff of the edit
    #[arg(long)]
    diff: bool,

    /// Copy the original to <file>.bak before writing
    #[arg(long)]
    backup: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn collect_rules(cli: &Cli) -> Result<Vec<ReplacementRule>> {
    let mut rules = match &cli.rules {
        Some(path) => load_rules(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?,
        None => Vec::new(),
    };

    for pair in cli.replace.chunks(2) {
        if let [pattern, replacement] = pair {
            rules.push(ReplacementRule::new(pattern.as_str(), replacement.as_str())?);
        }
    }

    Ok(rules)
}

fn run_diagnostics(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let document = Document::load(&cli.file)?;

    if let Some(range) = &cli.inspect {
        let range = parse_line_range(range)?;
        writeln!(
            out,
            "Lines {}-{} of {}:",
            range.start(),
            range.end(),
            cli.file.display()
        )?;
        for (number, line) in inspect(&document, range) {
            writeln!(out, "Line {}: {:?}", number, line)?;
        }
    }

    for hit in probe(&document, &cli.probe) {
        writeln!(out, "{}", hit.report_line())?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    textswap::init_with_logger(cli.verbose)?;

    info!("textswap v{} on {}", textswap::version(), cli.file.display());

    if cli.inspect.is_some() || !cli.probe.is_empty() {
        return run_diagnostics(&cli, &mut std::io::stdout().lock());
    }

    let rules = collect_rules(&cli)?;
    if rules.is_empty() {
        warn!("No rules given; use --rules or --replace");
    }

    let options = EditOptions {
        dry_run: cli.dry_run,
        backup: cli.backup,
        diff: cli.diff,
    };
    let report = run_edit(&cli.file, &rules, &options)
        .with_context(|| format!("Failed to update {}", cli.file.display()))?;

    println!("{}", report);
    if let Some(backup) = &report.backup {
        info!("Backup written to {}", backup.display());
    }

    Ok(())
}
