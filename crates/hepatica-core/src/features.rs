//! Patient input and the fixed-order feature vector fed to the scaler and model.
//!
//! Column order follows the HCV dataset the artifacts were fitted on. The
//! scaler and the classifier both consume [`FEATURE_COLUMNS`] order; nothing
//! else in the workspace defines it.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const FEATURE_COUNT: usize = 12;

/// Column names in model input order.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "Age", "Sex", "ALB", "ALP", "ALT", "AST", "BIL", "CHE", "CHOL", "CREA", "GGT", "PROT",
];

/// Binary sex selector. Encoded Male = 0, Female = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    pub fn encode(self) -> f64 {
        match self {
            Self::Male => 0.0,
            Self::Female => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown sex {0:?}, expected Male or Female")]
pub struct ParseSexError(String);

impl FromStr for Sex {
    type Err = ParseSexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(ParseSexError(s.to_string())),
        }
    }
}

/// The twelve blood-test form fields for one patient.
///
/// `age` is the only floored field (non-negative by type). Lab values have no
/// range, but the form and CLI only ever store finite numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientInput {
    pub age: u32,
    pub sex: Sex,
    /// Albumin
    pub alb: f64,
    /// Alkaline phosphatase
    pub alp: f64,
    /// Alanine transaminase
    pub alt: f64,
    /// Aspartate transaminase
    pub ast: f64,
    /// Bilirubin
    pub bil: f64,
    /// Cholinesterase
    pub che: f64,
    /// Cholesterol
    pub chol: f64,
    /// Creatinine
    pub crea: f64,
    /// Gamma-glutamyl transferase
    pub ggt: f64,
    /// Protein
    pub prot: f64,
}

impl Default for PatientInput {
    fn default() -> Self {
        Self {
            age: 32,
            sex: Sex::Male,
            alb: 38.5,
            alp: 70.0,
            alt: 25.0,
            ast: 30.0,
            bil: 5.0,
            che: 8.0,
            chol: 4.5,
            crea: 80.0,
            ggt: 25.0,
            prot: 70.0,
        }
    }
}

impl PatientInput {
    /// Assemble the raw (unscaled) feature vector in [`FEATURE_COLUMNS`] order.
    pub fn to_features(&self) -> FeatureVector {
        FeatureVector([
            f64::from(self.age),
            self.sex.encode(),
            self.alb,
            self.alp,
            self.alt,
            self.ast,
            self.bil,
            self.che,
            self.chol,
            self.crea,
            self.ggt,
            self.prot,
        ])
    }
}

/// Raw feature vector, one value per entry of [`FEATURE_COLUMNS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
