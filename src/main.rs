//! scan-history: build-over-build security scan history tool
//!
//! Summarizes one build's scan results against the previous build and turns
//! a series of builds into a flaw-count trend.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use scan_history::{
    cli,
    config::{
        config_search_dirs, discover_config_file, generate_full_example_config,
        generate_json_schema, load_or_default, AppConfig, ConfigPreset, SummarizeConfig,
        TrendConfig, Validatable, CONFIG_FILE_NAMES,
    },
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scan-history")]
#[command(version)]
#[command(about = "Build-over-build security scan history", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Build passed every enabled check
    1  Build did not pass its policy (--fail-on-policy)
    2  New flaws introduced (--fail-on-new-flaws / --max-new-flaws)
    3  Error occurred
    4  Blacklisted components found (--fail-on-blacklisted)

EXAMPLES:
    # Summarize a build against the one before it
    scan-history summarize build-42.json --previous build-41.json

    # CI/CD gate with JSON output
    scan-history summarize build-42.json -p build-41.json -o json --fail-on-new-flaws

    # Flaw trend over several builds
    scan-history trend build-40.json build-41.json build-42.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `summarize` subcommand
#[derive(Parser)]
struct SummarizeArgs {
    /// Build report of the build being evaluated
    current: PathBuf,

    /// Build report of the previous build
    #[arg(short, long)]
    previous: Option<PathBuf>,

    /// Output format (defaults to the config file, then summary)
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Start from a named preset (default, strict, ci-cd)
    #[arg(long, value_parser = parse_preset)]
    preset: Option<ConfigPreset>,

    /// Report title
    #[arg(long)]
    title: Option<String>,

    /// Leave the flaw and vulnerability trends out of the report
    #[arg(long)]
    no_history: bool,

    /// Exit with code 1 when the build does not pass its policy
    #[arg(long)]
    fail_on_policy: bool,

    /// Exit with code 2 when any new flaw was introduced
    #[arg(long)]
    fail_on_new_flaws: bool,

    /// Exit with code 2 when more than this many new flaws were introduced
    #[arg(long)]
    max_new_flaws: Option<i64>,

    /// Exit with code 4 when blacklisted components were found
    #[arg(long)]
    fail_on_blacklisted: bool,
}

/// Arguments for the `trend` subcommand
#[derive(Parser)]
struct TrendArgs {
    /// Build reports, oldest first
    #[arg(required = true)]
    reports: Vec<PathBuf>,

    /// Label of the series
    #[arg(long, default_value = "Static Analysis")]
    label: String,

    /// Output format (defaults to the config file, then summary)
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a build against the previous one and apply the gate
    Summarize(SummarizeArgs),

    /// Build a flaw-count trend across several builds
    Trend(TrendArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .scan-history.yaml in the current directory
    Init,
}

fn parse_preset(name: &str) -> std::result::Result<ConfigPreset, String> {
    ConfigPreset::from_name(name).ok_or_else(|| {
        let known: Vec<_> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
        format!("unknown preset '{name}' (expected one of: {})", known.join(", "))
    })
}

/// Effective config: preset, then config file, then command-line flags.
fn effective_config(
    config_path: Option<&std::path::Path>,
    preset: Option<ConfigPreset>,
    overrides: &AppConfig,
) -> Result<AppConfig> {
    let (file_config, loaded_from) = load_or_default(config_path);
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let mut config = preset.map_or_else(AppConfig::default, AppConfig::from_preset);
    config.merge(&file_config);
    config.merge(overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<_> = errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("Invalid configuration:\n  {}", messages.join("\n  "));
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Summarize(args) => {
            let overrides = AppConfig::builder()
                .output_format(args.output.unwrap_or_default())
                .output_file(args.output_file)
                .no_color(cli.no_color)
                .fail_on_policy(args.fail_on_policy)
                .fail_on_new_flaws(args.fail_on_new_flaws)
                .max_new_flaws(args.max_new_flaws)
                .fail_on_blacklisted(args.fail_on_blacklisted)
                .quiet(cli.quiet)
                .build();
            let app = effective_config(cli.config.as_deref(), args.preset, &overrides)?;

            let mut config = SummarizeConfig::from_app_config(args.current, args.previous, app);
            config.title = args.title;
            config.include_history = !args.no_history;
            cli::run_summarize(config)
        }

        Commands::Trend(args) => {
            let overrides = AppConfig::builder()
                .output_format(args.output.unwrap_or_default())
                .output_file(args.output_file)
                .no_color(cli.no_color)
                .quiet(cli.quiet)
                .build();
            let app = effective_config(cli.config.as_deref(), None, &overrides)?;

            cli::run_trend(TrendConfig {
                reports: args.reports,
                label: args.label,
                quiet: app.behavior.quiet,
                output: app.output,
            })
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "scan-history", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Path => {
                eprintln!("Config file search paths (in order):");
                for dir in config_search_dirs() {
                    eprintln!("  {}", dir.display());
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".scan-history.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, generate_full_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(exit_codes::SUCCESS)
            }
        },
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_codes::ERROR
        }
    };
    if exit_code != exit_codes::SUCCESS {
        std::process::exit(exit_code);
    }
}
