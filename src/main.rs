use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};

use dealer_score::attribution::{compute_rar, RarInput};
use dealer_score::scoring::input::WinProbabilityInput;
use dealer_score::scoring::{score_document, win_probability, DispatchError, Pillar, Validate};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_SERVER: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the JSON HTTP API
    Serve {
        /// Address to listen on (overrides server.bind in the config)
        #[arg(long, env = "DEALER_SCORE_BIND")]
        bind: Option<String>,
    },
    /// Score one pillar from a JSON or YAML input file
    Score {
        /// Pillar to score (seo, aeo, geo, scs, relevance, piqr, hrp, eeat, qai, win-prob)
        pillar: String,
        /// Input file (.json, .yaml or .yml)
        #[arg(short, long)]
        input: PathBuf,
        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Compute win probability from 0-100 signal scores
    WinProb {
        #[arg(long)]
        ai_visibility: f64,
        #[arg(long)]
        review_trust: f64,
        #[arg(long)]
        schema_coverage: f64,
        #[arg(long)]
        gbp_health: f64,
        #[arg(long)]
        zero_click: f64,
        #[arg(long)]
        json: bool,
    },
    /// Estimate revenue at risk from a JSON or YAML input file
    Rar {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the effective AI engine weights
    Weights,
    /// Create a config file interactively
    Init {
        /// Where to write the config (defaults to ~/.config/dealer-score/config.yaml)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "dealer-score")]
#[command(about = "Dealership AI visibility scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to config file (defaults to ~/.config/dealer-score/config.yaml)
    #[arg(short, long, global = true, env = "DEALER_SCORE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Read a JSON or YAML document, choosing the parser by extension.
fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse YAML in {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

fn exit_with_input_errors(errors: &[dealer_score::ScoreError]) -> ! {
    eprintln!("Input errors:");
    for error in errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(EXIT_INPUT);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.log_json {
        dealer_score::logging::init_json_logger(cli.verbose);
    } else {
        dealer_score::logging::init_cli_logger(cli.verbose);
    }

    // Init runs before config loading so a broken config can be replaced
    if let Commands::Init { path } = &cli.command {
        let target = path.clone().or_else(|| cli.config.clone());
        if let Err(e) = dealer_score::config::init::run_init_wizard(target) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match dealer_score::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = dealer_score::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let use_colors = dealer_score::output::should_use_colors();

    let result = match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server().bind);
            let state = match dealer_score::server::AppState::new(&config) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Config error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            if let Err(e) = dealer_score::server::serve(state, &bind).await {
                eprintln!("Server error: {:#}", e);
                std::process::exit(EXIT_SERVER);
            }
            Ok(())
        }
        Commands::Score {
            pillar,
            input,
            json,
        } => {
            let Some(pillar) = Pillar::from_slug(&pillar) else {
                eprintln!("Unknown pillar '{}'. Expected one of:", pillar);
                for p in Pillar::ALL {
                    eprintln!("  - {}", p.label());
                }
                std::process::exit(EXIT_INPUT);
            };
            read_document(&input).and_then(|doc| match score_document(pillar, doc) {
                Ok(score) if json => print_json(&score),
                Ok(score) => {
                    println!("{}", dealer_score::output::format_breakdown(&score, use_colors));
                    Ok(())
                }
                Err(DispatchError::Invalid { errors, .. }) => exit_with_input_errors(&errors),
                Err(e) => Err(e.into()),
            })
        }
        Commands::WinProb {
            ai_visibility,
            review_trust,
            schema_coverage,
            gbp_health,
            zero_click,
            json,
        } => {
            let input = WinProbabilityInput {
                ai_visibility,
                review_trust,
                schema_coverage,
                gbp_health,
                zero_click,
            };
            if let Err(errors) = input.validate() {
                exit_with_input_errors(&errors);
            }
            let score = win_probability(&input);
            if json {
                print_json(&score)
            } else {
                println!("{}", dealer_score::output::format_breakdown(&score, use_colors));
                Ok(())
            }
        }
        Commands::Rar { input, json } => read_document(&input).and_then(|doc| {
            let input: RarInput =
                serde_json::from_value(doc).context("Input does not match the RaR request shape")?;
            if let Err(errors) = input.validate() {
                exit_with_input_errors(&errors);
            }
            let report = compute_rar(&input, &config.revenue().percentile_bands);
            if json {
                print_json(&report)
            } else {
                println!("{}", dealer_score::output::format_rar_summary(&report, use_colors));
                Ok(())
            }
        }),
        Commands::Weights => {
            let weights = config.engine_weights().effective();
            println!(
                "{}",
                dealer_score::output::format_weights_table(&weights, use_colors)
            );
            Ok(())
        }
        Commands::Init { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(EXIT_INPUT);
    }

    std::process::exit(EXIT_SUCCESS);
}
