//! Gate Wheel - command line entry point
//!
//! Loads a wheel configuration, validates it and answers angle queries.
//! Diagnostics go to stderr; results go to stdout as text or JSON.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use gate_wheel::core::types::{Cardinal, LineAddress};
use gate_wheel::core::{load_config, Result, WheelError};
use gate_wheel::wheel::{validate, Located, ValidatedConfiguration};

/// Validate gate wheel configurations and query gate/line angles
#[derive(Parser, Debug)]
#[command(name = "gate-wheel")]
#[command(about = "Validate gate wheel configurations and query gate/line angles")]
struct Args {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a configuration and print its rotation and cardinals
    Validate {
        /// Configuration file (.toml or .json)
        config: PathBuf,
    },
    /// Print the angle where a line starts
    Angle {
        config: PathBuf,
        gate: u32,
        line: u32,
    },
    /// Find the address nearest to an angle
    Locate {
        config: PathBuf,
        #[arg(allow_negative_numbers = true)]
        degrees: f64,
    },
    /// Print all 384 addresses with their angles
    Table { config: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct AngleOutput {
    gate: u32,
    line: u32,
    position: usize,
    degrees: f64,
}

#[derive(Serialize)]
struct TableRow {
    gate: u8,
    line: u8,
    degrees: f64,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_directive = if args.verbose {
        "gate_wheel=debug"
    } else {
        "gate_wheel=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(WheelError::Rejected(errors)) => {
            if args.format == Format::Json {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                let report = serde_json::json!({
                    "stage": errors.stage,
                    "errors": messages,
                });
                println!("{}", report);
            } else {
                eprintln!("{}", errors);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load(path: &Path) -> Result<ValidatedConfiguration> {
    let raw = load_config(path)?;
    let config = validate(&raw)?;
    tracing::info!(
        "Validated {} (offset {})",
        path.display(),
        config.rotation()
    );
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Validate { config } => {
            let config = load(config)?;
            match args.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                Format::Text => print_summary(&config),
            }
        }
        Command::Angle { config, gate, line } => {
            let config = load(config)?;
            let address = LineAddress::new(*gate, *line)?;
            let output = AngleOutput {
                gate: *gate,
                line: *line,
                position: config.position_of(address.gate),
                degrees: config.angle_of_address(address),
            };
            match args.format {
                Format::Json => println!("{}", serde_json::to_string(&output)?),
                Format::Text => println!("{}", output.degrees),
            }
        }
        Command::Locate { config, degrees } => {
            let config = load(config)?;
            let located = config
                .locate(*degrees)
                .ok_or(WheelError::InvalidAngle(*degrees))?;
            print_located(args.format, &located)?;
        }
        Command::Table { config } => {
            let config = load(config)?;
            let rows: Vec<TableRow> = config
                .table()
                .into_iter()
                .map(|(address, degrees)| TableRow {
                    gate: address.gate.number(),
                    line: address.line.number(),
                    degrees,
                })
                .collect();
            match args.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                Format::Text => {
                    for row in rows {
                        println!("{:>2}.{}  {:>9.5}", row.gate, row.line, row.degrees);
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_summary(config: &ValidatedConfiguration) {
    println!("Progression:     {}", config.progression());
    println!("Rotation offset: {}", config.rotation());
    for (cardinal, angle) in config.layout().walk() {
        let anchor = config
            .position(cardinal)
            .map(|spec| spec.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<5} {:>5}°  {}", cardinal, angle, anchor);
    }
    if config.position(Cardinal::East).is_none()
        || config.position(Cardinal::South).is_none()
        || config.position(Cardinal::West).is_none()
    {
        println!("(cardinals without an anchor are derived from North)");
    }
}

fn print_located(format: Format, located: &Located) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(located)?),
        Format::Text => println!(
            "{} at {}° ({:+} off)",
            located.address, located.angle, located.distance
        ),
    }
    Ok(())
}
