//! Command-line front end for the triage engine.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use medtriage_core::{EngineConfig, MedTriageCore, TriageRequest, TriageResponse, TriageResult};

const DEFAULT_LOG_FILTER: &str = "medtriage_core=info,medtriage_model=info";

/// MedTriage - symptom triage from the command line.
#[derive(Parser)]
#[command(name = "medtriage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, global = true, env = "MEDTRIAGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Triage one request.
    Evaluate {
        /// Symptom description. Ignored when --request is given.
        text: Option<String>,

        /// JSON request file ("-" reads stdin).
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// Age in years.
        #[arg(long, default_value_t = 25.0)]
        age: f64,

        /// Sex (M or F).
        #[arg(long)]
        sex: Option<String>,

        /// Days since onset.
        #[arg(long, default_value_t = 3)]
        duration: i64,

        /// Measured temperature in °C.
        #[arg(long)]
        fever: Option<f64>,

        /// Risk factor (repeatable).
        #[arg(long = "risk")]
        risk_factors: Vec<String>,

        /// Exposure (repeatable).
        #[arg(long = "exposure")]
        exposures: Vec<String>,

        /// Clamp out-of-range numbers instead of rejecting them.
        #[arg(long)]
        clamp: bool,

        /// Use demonstration cases before the scorer.
        #[arg(long)]
        demo: bool,

        /// Print the wire JSON response.
        #[arg(long)]
        json: bool,
    },

    /// Load and validate configuration, tables and model.
    CheckConfig,

    /// List emergency phrases.
    RedFlags,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Evaluate {
            text,
            request,
            age,
            sex,
            duration,
            fever,
            risk_factors,
            exposures,
            clamp,
            demo,
            json,
        } => {
            let request = match request {
                Some(path) => read_request(&path)?,
                None => TriageRequest {
                    symptoms_text: text.unwrap_or_default(),
                    age,
                    sex,
                    duration_days: duration,
                    fever_temp_c: fever,
                    risk_factors,
                    exposures,
                },
            };
            let validated = if clamp { request.clamped() } else { request.validate() };
            let input = validated.context("Request rejected")?;

            let core = MedTriageCore::from_config(&config).context("Failed to start engine")?;
            let result = core.evaluate_input(&input, demo || config.demo_mode);

            if json {
                let response = TriageResponse::from_result(&result, config.display_limit);
                println!("{}", response.to_json()?);
            } else {
                print_summary(&result, &config);
            }
        }

        Commands::CheckConfig => {
            let core = MedTriageCore::from_config(&config).context("Configuration is invalid")?;
            let kb = core.knowledge();
            println!("Configuration OK");
            println!("  demo mode:       {}", config.demo_mode);
            println!("  top k:           {}", config.top_k);
            println!("  red flags:       {}", kb.red_flags().len());
            println!("  demo cases:      {}", kb.canned_cases().len());
            println!("  relief entries:  {}", kb.relief().len());
            match &config.model {
                Some(model) => println!("  model:           {}", model.path.display()),
                None => println!("  model:           keyword (built-in)"),
            }
        }

        Commands::RedFlags => {
            let core = MedTriageCore::from_config(&config)?;
            for phrase in core.knowledge().red_flags().phrases() {
                println!("{}", phrase);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

fn read_request(path: &PathBuf) -> Result<TriageRequest> {
    let body = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&body).context("Request is not valid JSON")
}

fn print_summary(result: &TriageResult, config: &EngineConfig) {
    let marker = if result.is_red_flag { " [RED FLAG]" } else { "" };
    println!("Triage: {}{}", result.level, marker);
    println!("  {}", result.level.advice());
    for reason in &result.reasons {
        println!("  because: {}", reason);
    }

    let shown = result.displayed(config.display_threshold, config.display_limit);
    if shown.is_empty() {
        println!("Conditions: none above threshold");
    } else {
        println!("Conditions:");
        for condition in shown {
            println!("  {:<32} {:>5.1}%", condition.label, condition.probability * 100.0);
        }
    }

    for guide in &result.relief {
        println!();
        println!("{}", guide.title);
        for med in &guide.medications {
            println!("  - {}: {}", med.name, med.note);
        }
        println!("  {}", guide.non_pharm);
    }
}
