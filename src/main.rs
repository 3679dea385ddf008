//! spsim - learned spelling similarity for cognate identification
//!
//! # Usage
//!
//! ```bash
//! # learn from examples.tsv, score pairs from stdin to stdout
//! spsim examples.tsv
//!
//! # explicit input/output files ("-" means stdin/stdout)
//! spsim examples.tsv input.tsv output.tsv
//!
//! # configuration via environment
//! SPSIM_IGNORE_CASE=0 SPSIM_GROUP_VOWELS=1 spsim examples.tsv
//! ```
//!
//! Both files are tab-separated: examples hold one equivalent pair per
//! line; input lines get the phrase similarity of their first two
//! columns appended as a new column.

use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use spsim::{PhraseSimilarity, Result, WordConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable for the `ignore_case` flag (default on)
const ENV_IGNORE_CASE: &str = "SPSIM_IGNORE_CASE";

/// Environment variable for the `ignore_accents` flag (default on)
const ENV_IGNORE_ACCENTS: &str = "SPSIM_IGNORE_ACCENTS";

/// Environment variable for the `group_vowels` flag (default off)
const ENV_GROUP_VOWELS: &str = "SPSIM_GROUP_VOWELS";

/// Environment variable for the `no_empty_differences` flag (default off)
const ENV_NO_EMPTY_DIFFS: &str = "SPSIM_NO_EMPTY_DIFFS";

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.len() > 3 {
        eprintln!("Usage: spsim <examples-file> [<input-file> [<output-file>]]");
        std::process::exit(2);
    }

    if let Err(e) = run(&args) {
        error!(error = %e, "spsim failed");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spsim=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &[String]) -> Result<()> {
    let config = build_config();
    let mut sim = PhraseSimilarity::new(config);

    let examples = read_examples(&args[0])?;
    sim.learn(examples.iter().map(|(a, b)| (a.as_str(), b.as_str())));
    info!(
        examples = examples.len(),
        rules = sim.word().len(),
        "learned spelling differences"
    );

    let input = open_input(args.get(1).map(String::as_str))?;
    let mut output = open_output(args.get(2).map(String::as_str))?;
    for (num, line) in input.lines().enumerate() {
        let line = line?;
        let mut cols = line.split('\t');
        let (Some(a), Some(b)) = (cols.next(), cols.next()) else {
            warn!(line = num + 1, "line has less than 2 columns; skipping");
            continue;
        };
        let score = sim.score(a, b)?;
        writeln!(output, "{line}\t{score}")?;
    }
    output.flush()?;
    Ok(())
}

/// Build word-level configuration from environment variables.
fn build_config() -> WordConfig {
    WordConfig {
        ignore_case: env_flag(ENV_IGNORE_CASE, true),
        ignore_accents: env_flag(ENV_IGNORE_ACCENTS, true),
        group_vowels: env_flag(ENV_GROUP_VOWELS, false),
        no_empty_differences: env_flag(ENV_NO_EMPTY_DIFFS, false),
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(|v| v != "0" && v.to_lowercase() != "false")
        .unwrap_or(default)
}

/// Read tab-separated example pairs; lines without a tab are ignored,
/// columns past the second are dropped.
fn read_examples(path: &str) -> Result<Vec<(String, String)>> {
    let reader = open_input(Some(path))?;
    let mut examples = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Some((a, rest)) = line.split_once('\t') {
            let b = rest.split('\t').next().unwrap_or(rest);
            examples.push((a.to_string(), b.to_string()));
        }
    }
    Ok(examples)
}

fn open_input(path: Option<&str>) -> Result<Box<dyn BufRead>> {
    match path {
        None | Some("-") => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(p) => Ok(Box::new(BufReader::new(File::open(p)?))),
    }
}

fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    match path {
        None | Some("-") => Ok(Box::new(BufWriter::new(io::stdout()))),
        Some(p) => Ok(Box::new(BufWriter::new(File::create(p)?))),
    }
}
