mod settings;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use tokencss_core::{BuildConfig, Builder, TokenTree};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Design-token to CSS compiler.
#[derive(Parser)]
#[command(name = "tokencss", version, about = "Design-token to CSS compiler")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a token document into a stylesheet
    Build {
        /// Path to the token JSON document
        file: PathBuf,
        /// Write the stylesheet here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Top-level set of the document to build
        #[arg(long)]
        root: Option<String>,
        /// Build configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Path prefix whose colors go through channel variables (repeatable)
        #[arg(long = "paste-as-var")]
        paste_as_var: Vec<String>,
    },

    /// Build a token document without writing it and report what it emits
    Check {
        /// Path to the token JSON document
        file: PathBuf,
        /// Top-level set of the document to build
        #[arg(long)]
        root: Option<String>,
        /// Build configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            file,
            out,
            root,
            config,
            paste_as_var,
        } => {
            let config = resolve_config(config.as_deref(), root, paste_as_var, cli.output, cli.quiet);
            cmd_build(&file, out.as_deref(), &config, cli.output, cli.quiet);
        }
        Commands::Check { file, root, config } => {
            let config = resolve_config(config.as_deref(), root, Vec::new(), cli.output, cli.quiet);
            cmd_check(&file, &config, cli.output, cli.quiet);
        }
    }
}

fn resolve_config(
    path: Option<&Path>,
    root: Option<String>,
    paste_as_var: Vec<String>,
    output: OutputFormat,
    quiet: bool,
) -> BuildConfig {
    match settings::load_config(path) {
        Ok(config) => settings::apply_overrides(config, root, paste_as_var),
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn cmd_build(
    file: &Path,
    out: Option<&Path>,
    config: &BuildConfig,
    output: OutputFormat,
    quiet: bool,
) {
    let tree = load_tree(file, config, output, quiet);
    let mut builder = Builder::new(&tree, config);
    let css = match builder.render() {
        Ok(css) => css,
        Err(e) => {
            report_json_error(&e.to_json_value(), &e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    match out {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &css) {
                let msg = format!("error writing '{}': {}", path.display(), e);
                report_error(&msg, output, quiet);
                process::exit(1);
            }
            info!("wrote {} bytes to {}", css.len(), path.display());
            if !quiet {
                match output {
                    OutputFormat::Text => println!("wrote {}", path.display()),
                    OutputFormat::Json => {
                        let summary = serde_json::json!({ "out": path.display().to_string() });
                        println!("{}", summary);
                    }
                }
            }
        }
        None => print!("{}", css),
    }
}

/// What `check` reports about a document.
#[derive(Debug, Serialize)]
struct CheckSummary {
    file: String,
    tokens: usize,
    variables: usize,
    classes: usize,
}

fn cmd_check(file: &Path, config: &BuildConfig, output: OutputFormat, quiet: bool) {
    let tree = load_tree(file, config, output, quiet);
    let mut builder = Builder::new(&tree, config);
    let sheet = match builder.build() {
        Ok(sheet) => sheet,
        Err(e) => {
            report_json_error(&e.to_json_value(), &e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    let summary = CheckSummary {
        file: file.display().to_string(),
        tokens: tree.leaf_count(),
        variables: sheet.variable_count(),
        classes: sheet.class_count(),
    };
    match output {
        OutputFormat::Text => {
            if !quiet {
                println!(
                    "{}: {} tokens, {} custom properties, {} classes",
                    summary.file, summary.tokens, summary.variables, summary.classes
                );
            }
        }
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&summary)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }
}

/// Read, parse and load the token document, exiting on any failure.
fn load_tree(file: &Path, config: &BuildConfig, output: OutputFormat, quiet: bool) -> TokenTree {
    let src = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc: serde_json::Value = match serde_json::from_str(&src) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let loaded = match config.root.as_deref() {
        Some(set) => TokenTree::from_json_set(&doc, set),
        None => TokenTree::from_json(&doc),
    };
    match loaded {
        Ok(tree) => {
            info!("loaded {} tokens from {}", tree.leaf_count(), file.display());
            tree
        }
        Err(e) => {
            let msg = format!("{}: {}", file.display(), e);
            report_json_error(&e.to_json_value(), &msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Print a structured error: the JSON object in json mode, `text` otherwise.
fn report_json_error(value: &serde_json::Value, text: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", text),
        OutputFormat::Json => {
            let err_json =
                serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{:?}", value));
            eprintln!("{}", err_json);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    report_json_error(&serde_json::json!({ "error": msg }), msg, output, quiet);
}
