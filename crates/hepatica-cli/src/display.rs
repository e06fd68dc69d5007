//! Text rendering for the form, prediction results, and errors.
//!
//! Every function writes to a caller-supplied sink so the interactive form
//! and the one-shot command share the same output.

use std::io::{self, Write};

use hepatica_ai::Prediction;
use hepatica_core::{PatientInput, PredictError};

use crate::form::Field;

pub const TITLE: &str = "🧬 Hepatitis C Patient Category Prediction";
pub const INTRO: &str =
    "Enter the patient's blood test results to predict the liver disease category.";

// ── Form ──

/// Print the twelve fields with their current values.
pub fn print_form(out: &mut impl Write, input: &PatientInput) -> io::Result<()> {
    for field in Field::ALL {
        writeln!(
            out,
            "  {:<5} {:<36} {}",
            field.code(),
            field.label(),
            field.value(input)
        )?;
    }
    Ok(())
}

// ── Results ──

/// Success block followed by the raw probability line.
pub fn print_prediction(out: &mut impl Write, prediction: &Prediction) -> io::Result<()> {
    writeln!(out, "✅ Prediction: {}", prediction.label)?;
    writeln!(out, "Class probabilities: {:?}", prediction.probabilities)
}

pub fn print_prediction_json(out: &mut impl Write, prediction: &Prediction) -> io::Result<()> {
    let json = serde_json::to_string_pretty(prediction).map_err(io::Error::other)?;
    writeln!(out, "{json}")
}

/// Prediction-time failure. The session continues afterwards.
pub fn print_prediction_error(out: &mut impl Write, err: &PredictError) -> io::Result<()> {
    writeln!(out, "❌ Prediction failed: {err}")
}

/// Prediction failure as `{"error": ...}` for `--json` consumers.
pub fn print_prediction_error_json(out: &mut impl Write, err: &PredictError) -> io::Result<()> {
    let json = serde_json::json!({ "error": err.to_string() });
    writeln!(out, "{json}")
}

/// Startup failure line; nothing else is rendered after it.
pub fn fatal_message(err: &PredictError) -> String {
    format!("❌ {err}")
}
