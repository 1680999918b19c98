//! Fixture runner: regenerate every `fixtures/<case>/` declaration and diff it
//! against the checked-in `expected.go` / `expected.rs`.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use jsongen::{Dialect, Settings};
use regex::Regex;

#[derive(Parser, Debug)]
struct Args {
    /// fixture directory
    #[arg(default_value = "fixtures")]
    dir: PathBuf,

    /// only run cases whose name matches this regex
    #[arg(long)]
    filter: Option<String>,

    /// print the generated source of failing cases
    #[arg(long, default_value_t = false)]
    show: bool,
}

enum Outcome {
    Pass,
    Fail(String),
    Missing,
}

fn run_case(dir: &Path, dialect: Dialect, expected_file: &str) -> Result<Outcome> {
    let Ok(expected) = std::fs::read_to_string(dir.join(expected_file)) else {
        return Ok(Outcome::Missing);
    };
    let settings_path = dir.join("settings.json");
    let settings = Settings::load_or_default(settings_path.is_file().then_some(settings_path.as_path()))?;
    let input = std::fs::read(dir.join("input.json")).context("reading input.json")?;
    let value = jsongen::decode(&input)?;
    let actual = jsongen::generate(&value, settings.options(), dialect, &settings.root_type);
    Ok(if actual == expected { Outcome::Pass } else { Outcome::Fail(actual) })
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = args.filter.as_deref().map(Regex::new).transpose()?;

    let mut cases: Vec<PathBuf> = std::fs::read_dir(&args.dir)
        .with_context(|| format!("reading {}", args.dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.join("input.json").is_file())
        .collect();
    cases.sort();

    let (mut passed, mut failed) = (0usize, 0usize);
    for case in cases {
        let name = case.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if filter.as_ref().is_some_and(|rx| !rx.is_match(&name)) {
            continue;
        }
        for (dialect, file) in [(Dialect::Go, "expected.go"), (Dialect::Rust, "expected.rs")] {
            match run_case(&case, dialect, file) {
                Ok(Outcome::Missing) => {}
                Ok(Outcome::Pass) => {
                    passed += 1;
                    eprintln!("{} {name}/{file}", "pass".green());
                }
                Ok(Outcome::Fail(actual)) => {
                    failed += 1;
                    eprintln!("{} {name}/{file}", "FAIL".red().bold());
                    if args.show {
                        eprintln!("{actual}");
                    }
                }
                Err(error) => {
                    failed += 1;
                    eprintln!("{} {name}/{file}: {error:#}", "ERROR".red().bold());
                }
            }
        }
    }

    eprintln!("{passed} passed, {failed} failed");
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
