//! CLI: JSON document → (Go | Rust) declaration, or the raw type tree.
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::codegen::Dialect;
use crate::config::Settings;
use crate::error::Error;
use crate::inference::Node;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer a static type declaration from a JSON document
#[derive(Parser, Debug)]
#[command(name = "jsongen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and emit a Go type declaration
    Go(DeclOut),
    /// infer and emit Rust serde structs
    Rust(DeclOut),
    /// infer and print the type tree as JSON
    Tree(TreeOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON file to read, or '-' for stdin
    #[arg(default_value = "-")]
    input: String,

    /// JSON Pointer selecting the sub-document to infer (e.g. /data/items)
    #[arg(long)]
    json_pointer: Option<String>,

    /// jq pre-process filter; must produce exactly one value
    #[arg(long)]
    jq_expr: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct InferenceSettings {
    /// JSON settings file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// spell '-' and '_' word boundaries as '_' instead of title-casing
    #[arg(long, default_value_t = false)]
    no_title: bool,

    /// skip squashing arrays of struct and resolving array element types
    #[arg(long, default_value_t = false)]
    no_normalize: bool,
}

#[derive(clap::Parser, Debug)]
struct DeclOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    inference: InferenceSettings,

    /// top-level type name
    #[arg(long)]
    root_type: Option<String>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// also write the type tree as JSON to this file
    #[arg(long)]
    dump: Option<PathBuf>,

    /// pipe the declaration through the dialect's formatter (gofmt/rustfmt)
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(clap::Parser, Debug)]
struct TreeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    inference: InferenceSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> crate::Result<Value> {
        let bytes = if self.input == "-" {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| Error::io("read", "<stdin>", e))?;
            buf
        } else {
            std::fs::read(&self.input).map_err(|e| Error::io("read", &self.input, e))?
        };
        tracing::debug!(input = %self.input, bytes = bytes.len(), "read input");

        let mut value = crate::decode(&bytes)?;

        if let Some(ptr) = self.json_pointer.as_deref() {
            value = value
                .pointer(ptr)
                .cloned()
                .ok_or_else(|| Error::Pointer(ptr.to_string()))?;
        }

        if let Some(jq_expr) = self.jq_expr.as_deref() {
            let mut outputs = crate::jq_exec::run_jaq(jq_expr, &value)
                .map_err(|e| Error::Jq(format!("{e:#}")))?;
            if outputs.len() != 1 {
                return Err(Error::JqArity { count: outputs.len() });
            }
            value = outputs.remove(0);
        }

        Ok(value)
    }
}

impl InferenceSettings {
    fn settings(&self) -> crate::Result<Settings> {
        let mut settings = Settings::load_or_default(self.config.as_deref())?;
        if self.no_title {
            settings.title_case = false;
        }
        if self.no_normalize {
            settings.normalize = false;
        }
        Ok(settings)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Go(target) => target.run(Dialect::Go),
            Command::Rust(target) => target.run(Dialect::Rust),
            Command::Tree(target) => target.run(),
        }
    }
}

impl DeclOut {
    fn run(&self, dialect: Dialect) -> Result<()> {
        let mut settings = self.inference.settings()?;
        if let Some(root_type) = &self.root_type {
            settings.root_type = root_type.clone();
        }
        let options = settings.options();

        // 1) build the tree
        let value = self.input_settings.load()?;
        let tree = crate::inference::infer(&value, options.normalize);

        if let Some(dump) = self.dump.as_ref() {
            write_output(Some(dump), &dump_tree(&tree)?)?;
        }

        // 2) render
        let source = crate::codegen::render(&tree, &settings.root_type, dialect, options.case);

        // 3) optionally pretty-print; a rejected declaration is still emitted
        if !self.pretty {
            return write_output(self.out.as_deref(), &source);
        }
        let command = match dialect {
            Dialect::Go => &settings.go_formatter,
            Dialect::Rust => &settings.rust_formatter,
        };
        match crate::pretty::pretty(command, &source) {
            Ok(formatted) => write_output(self.out.as_deref(), &formatted),
            Err(error) => {
                if let Some(unformatted) = error.fallback_output() {
                    write_output(self.out.as_deref(), unformatted)?;
                }
                Err(error.into())
            }
        }
    }
}

impl TreeOut {
    fn run(&self) -> Result<()> {
        let settings = self.inference.settings()?;
        let value = self.input_settings.load()?;
        let tree = crate::inference::infer(&value, settings.normalize);
        write_output(self.out.as_deref(), &dump_tree(&tree)?)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn dump_tree(tree: &Node) -> Result<String> {
    let mut src = serde_json::to_string_pretty(tree).context("failed to encode type tree")?;
    src.push('\n');
    Ok(src)
}

fn write_output(out: Option<&Path>, src: &str) -> Result<()> {
    let Some(out) = out else {
        print!("{src}");
        return Ok(());
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io("create", parent, e))?;
    }
    std::fs::write(out, src).map_err(|e| Error::io("write", out, e))?;
    tracing::info!(path = %out.display(), bytes = src.len(), "wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        CommandLineInterface::command().debug_assert();
    }

    #[test]
    fn flags_reach_the_subcommand() {
        let cli = CommandLineInterface::try_parse_from([
            "jsongen", "go", "in.json", "--no-title", "--root-type", "Payload", "--pretty",
        ])
        .unwrap();
        let Command::Go(target) = cli.cmd else { panic!("expected go subcommand") };
        assert_eq!(target.input_settings.input, "in.json");
        assert!(target.inference.no_title);
        assert!(!target.inference.no_normalize);
        assert_eq!(target.root_type.as_deref(), Some("Payload"));
        assert!(target.pretty);
    }

    #[test]
    fn input_defaults_to_stdin() {
        let cli = CommandLineInterface::try_parse_from(["jsongen", "tree"]).unwrap();
        let Command::Tree(target) = cli.cmd else { panic!("expected tree subcommand") };
        assert_eq!(target.input_settings.input, "-");
    }

    #[test]
    fn flags_override_settings() {
        let inference = InferenceSettings { config: None, no_title: true, no_normalize: true };
        let s = inference.settings().unwrap();
        assert!(!s.title_case);
        assert!(!s.normalize);
        assert_eq!(s.root_type, "Root");
    }

    #[test]
    fn pointer_and_jq_select_one_document() {
        let dir = std::env::temp_dir().join(format!("jsongen-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("doc.json");
        std::fs::write(&path, br#"{"data": {"items": [{"a": 1}, {"a": 2}]}}"#).unwrap();

        let mut input = InputSettings {
            input: path.to_string_lossy().into_owned(),
            json_pointer: Some("/data/items/0".into()),
            jq_expr: None,
        };
        assert_eq!(input.load().unwrap(), serde_json::json!({"a": 1}));

        input.json_pointer = Some("/missing".into());
        assert!(matches!(input.load(), Err(Error::Pointer(_))));

        input.json_pointer = None;
        input.jq_expr = Some(".data.items[]".into());
        assert!(matches!(input.load(), Err(Error::JqArity { count: 2 })));

        std::fs::write(&path, b"{not json").unwrap();
        input.jq_expr = None;
        assert!(matches!(input.load(), Err(Error::Decode(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
