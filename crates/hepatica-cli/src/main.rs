mod display;
mod form;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use hepatica_ai::artifacts::{DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE};
use hepatica_ai::{ArtifactPaths, OnnxClassifier, Predictor};
use hepatica_core::{PatientInput, Sex};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::form::FormSession;

/// Predict a Hepatitis C patient category from twelve blood test values.
#[derive(Parser)]
#[command(name = "hepatica", version, about)]
struct Cli {
    /// Fitted feature scaler (JSON).
    #[arg(long, env = "HEPATICA_SCALER", default_value = DEFAULT_SCALER_FILE, global = true)]
    scaler: PathBuf,

    /// Trained classifier (ONNX).
    #[arg(long, env = "HEPATICA_MODEL", default_value = DEFAULT_MODEL_FILE, global = true)]
    model: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive form (default).
    Form,
    /// Predict once from flags and exit.
    #[command(allow_negative_numbers = true)]
    Predict(PredictArgs),
}

#[derive(Args)]
struct PredictArgs {
    #[arg(long, default_value_t = 32)]
    age: u32,
    /// Male or Female.
    #[arg(long, default_value_t = Sex::Male)]
    sex: Sex,
    /// Albumin
    #[arg(long, default_value_t = 38.5, value_parser = finite_f64)]
    alb: f64,
    /// Alkaline phosphatase
    #[arg(long, default_value_t = 70.0, value_parser = finite_f64)]
    alp: f64,
    /// Alanine transaminase
    #[arg(long, default_value_t = 25.0, value_parser = finite_f64)]
    alt: f64,
    /// Aspartate transaminase
    #[arg(long, default_value_t = 30.0, value_parser = finite_f64)]
    ast: f64,
    /// Bilirubin
    #[arg(long, default_value_t = 5.0, value_parser = finite_f64)]
    bil: f64,
    /// Cholinesterase
    #[arg(long, default_value_t = 8.0, value_parser = finite_f64)]
    che: f64,
    /// Cholesterol
    #[arg(long, default_value_t = 4.5, value_parser = finite_f64)]
    chol: f64,
    /// Creatinine
    #[arg(long, default_value_t = 80.0, value_parser = finite_f64)]
    crea: f64,
    /// Gamma-glutamyl transferase
    #[arg(long, default_value_t = 25.0, value_parser = finite_f64)]
    ggt: f64,
    /// Protein
    #[arg(long, default_value_t = 70.0, value_parser = finite_f64)]
    prot: f64,
    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

/// Lab flags take any number except NaN and infinities.
fn finite_f64(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("{s:?} is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{s:?} is not a finite number"))
    }
}

impl From<&PredictArgs> for PatientInput {
    fn from(a: &PredictArgs) -> Self {
        Self {
            age: a.age,
            sex: a.sex,
            alb: a.alb,
            alp: a.alp,
            alt: a.alt,
            ast: a.ast,
            bil: a.bil,
            che: a.che,
            chol: a.chol,
            crea: a.crea,
            ggt: a.ggt,
            prot: a.prot,
        }
    }
}

fn main() -> ExitCode {
    // stdout is the form surface; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    info!("hepatica v{}", env!("CARGO_PKG_VERSION"));

    let paths = ArtifactPaths::new(cli.scaler, cli.model);
    let predictor = match Predictor::<OnnxClassifier>::load(&paths) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "startup aborted");
            eprintln!("{}", display::fatal_message(&e));
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command.unwrap_or(Command::Form), &predictor) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, predictor: &Predictor<OnnxClassifier>) -> anyhow::Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Form => {
            let stdin = io::stdin();
            FormSession::new(predictor).run(stdin.lock(), &mut out)?;
        }
        Command::Predict(args) => {
            let input = PatientInput::from(&args);
            match predictor.predict(&input) {
                Ok(prediction) if args.json => display::print_prediction_json(&mut out, &prediction)?,
                Ok(prediction) => display::print_prediction(&mut out, &prediction)?,
                Err(e) => {
                    error!(error = %e, "prediction failed");
                    if args.json {
                        display::print_prediction_error_json(&mut out, &e)?;
                    } else {
                        display::print_prediction_error(&mut out, &e)?;
                    }
                    out.flush()?;
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_defaults_to_form_and_default_artifacts() {
        let cli = Cli::try_parse_from(["hepatica"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.scaler, PathBuf::from("scaler.json"));
        assert_eq!(cli.model, PathBuf::from("hepatitis_model.onnx"));
    }

    #[test]
    fn predict_flags_default_to_form_defaults() {
        let cli = Cli::try_parse_from(["hepatica", "predict"]).unwrap();
        let Some(Command::Predict(args)) = cli.command else {
            panic!("expected predict subcommand");
        };
        assert_eq!(PatientInput::from(&args), PatientInput::default());
        assert!(!args.json);
    }

    #[test]
    fn predict_flags_override_fields() {
        let cli = Cli::try_parse_from([
            "hepatica", "predict", "--age", "61", "--sex", "female", "--ast", "120.5", "--bil",
            "-2", "--json",
        ])
        .unwrap();
        let Some(Command::Predict(args)) = cli.command else {
            panic!("expected predict subcommand");
        };
        let input = PatientInput::from(&args);
        assert_eq!(input.age, 61);
        assert_eq!(input.sex, Sex::Female);
        assert_eq!(input.ast, 120.5);
        assert_eq!(input.bil, -2.0);
        assert!(args.json);
    }

    #[test]
    fn non_finite_lab_flags_rejected() {
        for raw in ["nan", "inf", "-inf"] {
            assert!(
                Cli::try_parse_from(["hepatica", "predict", "--alb", raw]).is_err(),
                "--alb {raw} was accepted"
            );
        }
        assert!(Cli::try_parse_from(["hepatica", "predict", "--ggt", "high"]).is_err());
    }

    #[test]
    fn negative_age_rejected() {
        assert!(Cli::try_parse_from(["hepatica", "predict", "--age", "-1"]).is_err());
    }

    #[test]
    fn artifact_paths_after_subcommand() {
        let cli = Cli::try_parse_from(["hepatica", "form", "--scaler", "a.json", "--model", "b.onnx"])
            .unwrap();
        assert_eq!(cli.scaler, PathBuf::from("a.json"));
        assert_eq!(cli.model, PathBuf::from("b.onnx"));
    }
}
