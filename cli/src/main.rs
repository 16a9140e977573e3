//! labelsel CLI — driving adapter for the labelsel selector engine.
//!
//! Subcommands:
//! - `check <selector> | --config <file>` — validate and print the canonical form
//! - `match <selector> | --config <file> [-l key=value...]` — evaluate against labels
//! - `explain <selector> [-l key=value...]` — print the per-requirement trace
//! - `requirements <selector>` — print the parsed requirements as JSON
//!
//! `match` exits 0 on a match, 1 on no match and 2 on any error.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use labelsel::{RequirementConfig, Selector, SelectorConfig, Set};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "labelsel", version)]
#[command(about = "Parse label selectors and evaluate them against label sets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a selector and print its canonical form
    Check {
        #[command(flatten)]
        source: SelectorSource,
    },
    /// Evaluate a selector against a label set
    Match {
        #[command(flatten)]
        source: SelectorSource,

        /// Label as key=value (repeatable)
        #[arg(short, long = "label", value_parser = parse_label)]
        labels: Vec<(String, String)>,
    },
    /// Print how each requirement evaluated against a label set
    Explain {
        /// Selector string, e.g. "app=shop,tier in (web,api)"
        selector: String,

        /// Label as key=value (repeatable)
        #[arg(short, long = "label", value_parser = parse_label)]
        labels: Vec<(String, String)>,
    },
    /// Print the parsed requirements as JSON
    Requirements {
        /// Selector string
        selector: String,
    },
}

/// A selector given inline or as a structured config file.
#[derive(Args)]
struct SelectorSource {
    /// Selector string
    #[arg(required_unless_present = "config", conflicts_with = "config")]
    selector: Option<String>,

    /// Structured selector config (.json, otherwise YAML)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Outcome of a successful command.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Done,
    NoMatch,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::NoMatch) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<Outcome, String> {
    match command {
        Command::Check { source } => cmd_check(&source),
        Command::Match { source, labels } => cmd_match(&source, labels),
        Command::Explain { selector, labels } => cmd_explain(&selector, labels),
        Command::Requirements { selector } => cmd_requirements(&selector),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_check(source: &SelectorSource) -> Result<Outcome, String> {
    let selector = source.load()?;
    println!("{}", describe(&selector));
    Ok(Outcome::Done)
}

fn cmd_match(source: &SelectorSource, labels: Vec<(String, String)>) -> Result<Outcome, String> {
    let selector = source.load()?;
    let labels: Set = labels.into_iter().collect();
    tracing::debug!(selector = %selector, labels = %labels, "evaluating");

    if selector.matches(&labels) {
        println!("match");
        Ok(Outcome::Done)
    } else {
        println!("no match");
        Ok(Outcome::NoMatch)
    }
}

fn cmd_explain(selector: &str, labels: Vec<(String, String)>) -> Result<Outcome, String> {
    let selector = parse_selector(selector)?;
    let labels: Set = labels.into_iter().collect();
    print!("{}", selector.matches_with_trace(&labels));
    Ok(Outcome::Done)
}

fn cmd_requirements(selector: &str) -> Result<Outcome, String> {
    let selector = parse_selector(selector)?;
    let json = serde_json::to_string_pretty(&requirement_configs(&selector))
        .map_err(|e| format!("JSON encode error: {e}"))?;
    println!("{json}");
    Ok(Outcome::Done)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Selector loading
// ═══════════════════════════════════════════════════════════════════════════════

impl SelectorSource {
    fn load(&self) -> Result<Selector, String> {
        match (&self.selector, &self.config) {
            (_, Some(path)) => load_config(path)?
                .to_selector()
                .map_err(|e| format!("config invalid: {e}")),
            (Some(text), None) => parse_selector(text),
            (None, None) => Err("a selector or --config is required".into()),
        }
    }
}

fn parse_selector(text: &str) -> Result<Selector, String> {
    Selector::parse(text).map_err(|e| format!("invalid selector {text:?}: {e}"))
}

fn load_config(path: &Path) -> Result<SelectorConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read \"{}\": {e}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).map_err(|e| format!("YAML parse error: {e}"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════════════

fn describe(selector: &Selector) -> String {
    match selector.requirements() {
        None => "(nothing)".into(),
        Some([]) => "(everything)".into(),
        Some(_) => selector.to_string(),
    }
}

/// `None` for a selector that can never match.
fn requirement_configs(selector: &Selector) -> Option<Vec<RequirementConfig>> {
    selector
        .requirements()
        .map(|reqs| reqs.iter().map(RequirementConfig::from).collect())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_label(pair: &str) -> Result<(String, String), String> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| format!("invalid label \"{pair}\", expected key=value"))?;
    if key.is_empty() {
        return Err(format!("invalid label \"{pair}\", key is empty"));
    }
    Ok((key.to_owned(), value.to_owned()))
}
