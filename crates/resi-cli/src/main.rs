mod config;

use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;

use resi_core::{
    resolve_constant, BuiltinEvaluator, ComplexValue, EstimateWorker, Evaluator, ResiError,
    ResidueRequest,
};

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(
    name = "resi",
    version,
    about = "Residue calculator - estimates residues of complex functions by contour integration"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the residue of a function at a point
    Estimate {
        /// Function of the variable, e.g. "1/z" or "exp(z)/(z-I)^2"
        function: String,

        /// Point the residue is evaluated at (any constant expression, e.g. "1-2*I")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        center: String,

        /// Contour radius; no other singular point may lie within it
        #[arg(short, long)]
        radius: Option<f64>,

        /// Use 10^PRECISION contour samples
        #[arg(short, long)]
        precision: Option<u32>,

        /// Name of the complex variable in FUNCTION
        #[arg(long)]
        variable: Option<String>,

        /// Hide the progress indicator
        #[arg(short, long)]
        quiet: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate an expression at a real value of its variable
    Eval {
        /// Expression, e.g. "sin(z)+I"
        expression: String,

        /// Value of the variable
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        at: f64,

        /// Name of the variable in EXPRESSION
        #[arg(long)]
        variable: Option<String>,
    },

    /// Print the contour-parametrized expression without integrating
    Parametrize {
        /// Function of the variable
        function: String,

        /// Center of the contour
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        center: String,

        /// Contour radius
        #[arg(short, long)]
        radius: Option<f64>,

        /// Name of the complex variable in FUNCTION
        #[arg(long)]
        variable: Option<String>,
    },

    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let cfg = config::load_config()?;

    match cli.command {
        Commands::Estimate {
            function,
            center,
            radius,
            precision,
            variable,
            quiet,
            json,
        } => {
            let request = ResidueRequest {
                function,
                center: resolve_center(&center)?,
                radius: radius.unwrap_or(cfg.estimate.radius),
                precision_digits: precision.unwrap_or(cfg.estimate.precision_digits),
                variable: variable.unwrap_or(cfg.estimate.variable),
            };
            let format = if json {
                OutputFormat::Json
            } else {
                cfg.output.format
            };
            cmd_estimate(request, cfg.output.progress && !quiet, format)
        }
        Commands::Eval {
            expression,
            at,
            variable,
        } => cmd_eval(
            &expression,
            at,
            variable.as_deref().unwrap_or(&cfg.estimate.variable),
        ),
        Commands::Parametrize {
            function,
            center,
            radius,
            variable,
        } => {
            let request = ResidueRequest {
                function,
                center: resolve_center(&center)?,
                radius: radius.unwrap_or(cfg.estimate.radius),
                precision_digits: cfg.estimate.precision_digits,
                variable: variable.unwrap_or(cfg.estimate.variable),
            };
            cmd_parametrize(&request)
        }
        Commands::Config => cmd_config(),
    }
}

/// Log the full error chain and hand back a short user-facing message.
fn failure(err: ResiError) -> anyhow::Error {
    let message = err.user_message();
    debug!("{:#}", anyhow::Error::from(err));
    anyhow!(message)
}

fn resolve_center(text: &str) -> Result<ComplexValue> {
    resolve_constant(&BuiltinEvaluator, text).map_err(failure)
}

fn cmd_estimate(request: ResidueRequest, show_progress: bool, format: OutputFormat) -> Result<()> {
    let samples = request.sample_count().map_err(failure)?;
    let evaluator: Arc<dyn Evaluator> = Arc::new(BuiltinEvaluator::new());
    let worker = EstimateWorker::spawn(request.clone(), evaluator).map_err(failure)?;

    let mut shown = None;
    for fraction in worker.progress().iter() {
        if !show_progress {
            continue;
        }
        let percent = (fraction * 100.0).floor() as u32;
        if shown != Some(percent) {
            shown = Some(percent);
            eprint!("\rEvaluating... {percent:>3}%");
            let _ = std::io::stderr().flush();
        }
    }
    if shown.is_some() {
        eprintln!();
    }

    let residue = worker.join().map_err(failure)?;

    match format {
        OutputFormat::Text => println!("{residue}"),
        OutputFormat::Json => {
            let report = json!({
                "function": request.function,
                "variable": request.variable,
                "center": request.center,
                "radius": request.radius,
                "precision_digits": request.precision_digits,
                "samples": samples,
                "residue": residue,
                "display": residue.to_display_string(),
                "magnitude": residue.magnitude(),
                "argument": residue.argument(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn cmd_eval(expression: &str, at: f64, variable: &str) -> Result<()> {
    if variable.is_empty() {
        bail!("variable name must not be empty");
    }
    let parsed = BuiltinEvaluator::new()
        .parse(expression, variable)
        .map_err(failure)?;
    let value = parsed.evaluate(at).map_err(failure)?;
    println!("{value}");
    Ok(())
}

fn cmd_parametrize(request: &ResidueRequest) -> Result<()> {
    let template = request.template().map_err(failure)?;
    let text = template.parametrize(&request.function).map_err(failure)?;
    println!("{text}");
    Ok(())
}

fn cmd_config() -> Result<()> {
    let cfg = config::load_config()?;
    println!("Config: {}", config::show_config_path());
    println!();
    println!("[estimate]");
    println!("  precision_digits = {}", cfg.estimate.precision_digits);
    println!("  radius = {}", cfg.estimate.radius);
    println!("  variable = {}", cfg.estimate.variable);
    println!();
    println!("[output]");
    println!("  progress = {}", cfg.output.progress);
    let format = match cfg.output.format {
        OutputFormat::Text => "text",
        OutputFormat::Json => "json",
    };
    println!("  format = {format}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_estimate_args() {
        let cli = Cli::try_parse_from([
            "resi", "estimate", "1/(z-I)", "--center", "I", "-r", "0.5", "-p", "3", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Estimate {
                function,
                center,
                radius,
                precision,
                json,
                ..
            } => {
                assert_eq!(function, "1/(z-I)");
                assert_eq!(center, "I");
                assert_eq!(radius, Some(0.5));
                assert_eq!(precision, Some(3));
                assert!(json);
            }
            _ => panic!("expected estimate"),
        }
    }

    #[test]
    fn test_negative_center_accepted() {
        let cli = Cli::try_parse_from(["resi", "estimate", "1/(z+1)", "-c", "-1"]).unwrap();
        match cli.command {
            Commands::Estimate { center, .. } => assert_eq!(center, "-1"),
            _ => panic!("expected estimate"),
        }
    }

    #[test]
    fn test_resolve_center() {
        let c = resolve_center("1-2*I").unwrap();
        assert_eq!(c, ComplexValue::new(1.0, -2.0));

        let err = resolve_center("1-2*").unwrap_err();
        assert_eq!(err.to_string(), "Please check your input syntax");
    }

    #[test]
    fn test_failure_hides_details() {
        let err = failure(ResiError::InvalidRadius(-1.0));
        assert_eq!(err.to_string(), "The radius must be a positive number");
    }
}
