//! xmlconf CLI
//!
//! Entry point for the `xmlconf` command-line tool.

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::process;
use xmlconf_locator::config::{ConfigError, DEFAULT_CONFIG_FILE};
use xmlconf_locator::{load_tests, DataPaths, EffectiveConfig, TestRecord};

#[derive(Parser)]
#[command(name = "xmlconf")]
#[command(about = "Resolve W3C XML conformance tests to their input files", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the manifest and list every resolved test
    List {
        #[command(flatten)]
        paths: PathArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Only tests whose profile contains this text
        #[arg(long)]
        profile: Option<String>,

        /// Only tests of this TYPE (valid, invalid, not-wf, error)
        #[arg(long = "type")]
        test_type: Option<String>,
    },

    /// Check the configured corpus locations
    Verify {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Print the effective configuration as JSON
    Config {
        /// Path to config file (default: xmlconf.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct PathArgs {
    /// Path to config file (default: xmlconf.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Corpus root directory
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Manifest file, relative to the corpus root unless absolute
    #[arg(long)]
    manifest: Option<PathBuf>,
}

impl PathArgs {
    fn overrides(&self) -> Option<Value> {
        let mut map = Map::new();
        if let Some(corpus) = &self.corpus {
            map.insert(
                "corpus_dir".to_string(),
                Value::String(corpus.to_string_lossy().to_string()),
            );
        }
        if let Some(manifest) = &self.manifest {
            map.insert(
                "manifest".to_string(),
                Value::String(manifest.to_string_lossy().to_string()),
            );
        }
        (!map.is_empty()).then_some(Value::Object(map))
    }

    fn effective_config(&self) -> Result<EffectiveConfig, ConfigError> {
        build_config(self.config.as_deref(), self.overrides())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            paths,
            json,
            profile,
            test_type,
        } => {
            run_list(&paths, json, profile.as_deref(), test_type.as_deref());
        }
        Commands::Verify { paths } => {
            run_verify(&paths);
        }
        Commands::Config { config } => {
            run_config(config.as_deref());
        }
    }
}

fn build_config(
    config_path: Option<&Path>,
    overrides: Option<Value>,
) -> Result<EffectiveConfig, ConfigError> {
    let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    if config_path.is_some() && !path.exists() {
        return Err(ConfigError::MissingFile {
            key: "config",
            path: path.to_path_buf(),
        });
    }
    EffectiveConfig::build(Some(path), overrides)
}

fn load_paths(args: &PathArgs) -> DataPaths {
    let config = match args.effective_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };
    match DataPaths::from_config(&config) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

fn run_list(args: &PathArgs, json: bool, profile: Option<&str>, test_type: Option<&str>) {
    let paths = load_paths(args);

    let records = match load_tests(&paths) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let selected: Vec<&TestRecord> = records
        .iter()
        .filter(|r| profile.map_or(true, |p| r.profile().contains(p)))
        .filter(|r| test_type.map_or(true, |t| r.test_type() == t))
        .collect();

    if json {
        match serde_json::to_string_pretty(&selected) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    for record in &selected {
        let relative = record
            .resolved_file()
            .strip_prefix(paths.corpus_dir())
            .unwrap_or(record.resolved_file());
        println!(
            "{:<48} {:<8} {:<10} {}",
            record.test_name(),
            record.test_type(),
            record.entities().as_str(),
            relative.display()
        );
    }
    println!();
    println!("{} of {} tests", selected.len(), records.len());
}

fn run_verify(args: &PathArgs) {
    let paths = load_paths(args);

    println!("Configuration valid");
    println!();
    println!("  Corpus: {}", paths.corpus_dir().display());
    println!("  Manifest: {}", paths.manifest().display());
    match paths.schema_dir() {
        Some(dir) => println!("  Schema data: {}", dir.display()),
        None => println!("  Schema data: (not configured)"),
    }
    match paths.schema_suite_file() {
        Ok(suite) => println!("  Schema suite: {}", suite.display()),
        Err(e) => println!("  Schema suite: unavailable ({})", e),
    }

    let options = paths.parse_options();
    println!(
        "  Entities: expand external = {}, reject undeclared = {}, max depth = {}",
        options.expand_external_entities,
        options.reject_undeclared_entities,
        options.max_entity_depth
    );
}

fn run_config(config_path: Option<&Path>) {
    let config = match build_config(config_path, None) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };
    match config.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
