//! Interactive terminal form over the twelve patient fields.
//!
//! The session reads one command per line. Editing a field only updates the
//! form; the classifier runs solely on `predict`. Each prediction is an
//! independent transaction: a failure prints an error and leaves the last
//! successful result untouched.

use std::io::{self, BufRead, Write};

use hepatica_ai::{Classifier, Prediction, Predictor};
use hepatica_core::{PatientInput, Sex};
use tracing::{debug, warn};

use crate::display;

/// One form input, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Sex,
    Alb,
    Alp,
    Alt,
    Ast,
    Bil,
    Che,
    Chol,
    Crea,
    Ggt,
    Prot,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Self::Age,
        Self::Sex,
        Self::Alb,
        Self::Alp,
        Self::Alt,
        Self::Ast,
        Self::Bil,
        Self::Che,
        Self::Chol,
        Self::Crea,
        Self::Ggt,
        Self::Prot,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::Alb => "alb",
            Self::Alp => "alp",
            Self::Alt => "alt",
            Self::Ast => "ast",
            Self::Bil => "bil",
            Self::Che => "che",
            Self::Chol => "chol",
            Self::Crea => "crea",
            Self::Ggt => "ggt",
            Self::Prot => "prot",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::Alb => "ALB (Albumin)",
            Self::Alp => "ALP (Alkaline Phosphatase)",
            Self::Alt => "ALT (Alanine Transaminase)",
            Self::Ast => "AST (Aspartate Transaminase)",
            Self::Bil => "BIL (Bilirubin)",
            Self::Che => "CHE (Cholinesterase)",
            Self::Chol => "CHOL (Cholesterol)",
            Self::Crea => "CREA (Creatinine)",
            Self::Ggt => "GGT (Gamma Glutamyl Transferase)",
            Self::Prot => "PROT (Protein)",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    /// Current value rendered for display.
    pub fn value(&self, input: &PatientInput) -> String {
        match self {
            Self::Age => input.age.to_string(),
            Self::Sex => input.sex.to_string(),
            _ => self
                .lab_value(input)
                .map(|v| format!("{v:?}"))
                .unwrap_or_default(),
        }
    }

    /// Parse `raw` and store it. On error the input is left unchanged.
    pub fn set(&self, input: &mut PatientInput, raw: &str) -> Result<(), String> {
        let raw = raw.trim();
        match self {
            Self::Age => {
                input.age = raw
                    .parse::<u32>()
                    .map_err(|_| format!("age must be a whole number >= 0, got {raw:?}"))?;
            }
            Self::Sex => {
                input.sex = raw.parse::<Sex>().map_err(|e| e.to_string())?;
            }
            _ => {
                let value = raw
                    .parse::<f64>()
                    .map_err(|_| format!("{} must be a number, got {raw:?}", self.code()))?;
                if !value.is_finite() {
                    return Err(format!("{} must be a finite number, got {raw:?}", self.code()));
                }
                if let Some(slot) = self.lab_value_mut(input) {
                    *slot = value;
                }
            }
        }
        Ok(())
    }

    fn lab_value(&self, input: &PatientInput) -> Option<f64> {
        let value = match self {
            Self::Age | Self::Sex => return None,
            Self::Alb => input.alb,
            Self::Alp => input.alp,
            Self::Alt => input.alt,
            Self::Ast => input.ast,
            Self::Bil => input.bil,
            Self::Che => input.che,
            Self::Chol => input.chol,
            Self::Crea => input.crea,
            Self::Ggt => input.ggt,
            Self::Prot => input.prot,
        };
        Some(value)
    }

    fn lab_value_mut<'a>(&self, input: &'a mut PatientInput) -> Option<&'a mut f64> {
        let slot = match self {
            Self::Age | Self::Sex => return None,
            Self::Alb => &mut input.alb,
            Self::Alp => &mut input.alp,
            Self::Alt => &mut input.alt,
            Self::Ast => &mut input.ast,
            Self::Bil => &mut input.bil,
            Self::Che => &mut input.che,
            Self::Chol => &mut input.chol,
            Self::Crea => &mut input.crea,
            Self::Ggt => &mut input.ggt,
            Self::Prot => &mut input.prot,
        };
        Some(slot)
    }
}

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set(Field, String),
    Predict,
    Show,
    Reset,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = parts.collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "predict" | "p" => Command::Predict,
        "show" => Command::Show,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        code => {
            let field = Field::from_code(code)
                .ok_or_else(|| format!("unknown command or field {head:?}, try `help`"))?;
            if rest.is_empty() {
                return Err(format!("missing value for {}", field.code()));
            }
            Command::Set(field, rest.join(" "))
        }
    };
    Ok(Some(command))
}

const HELP: &str = "\
Commands:
  <field> <value>   set a field, e.g. `alb 40.2` or `sex female`
  predict | p       run the prediction
  show              print the form
  reset             restore default values
  help              show this message
  quit | q          leave";

/// Form state bound to a loaded predictor.
pub struct FormSession<'a, C> {
    predictor: &'a Predictor<C>,
    input: PatientInput,
    last: Option<Prediction>,
}

impl<'a, C: Classifier> FormSession<'a, C> {
    pub fn new(predictor: &'a Predictor<C>) -> Self {
        Self {
            predictor,
            input: PatientInput::default(),
            last: None,
        }
    }

    pub fn input(&self) -> &PatientInput {
        &self.input
    }

    /// Last successful prediction, if any.
    pub fn last_prediction(&self) -> Option<&Prediction> {
        self.last.as_ref()
    }

    /// Drive the session until `quit` or end of input.
    pub fn run(&mut self, reader: impl BufRead, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", display::TITLE)?;
        writeln!(out, "{}", display::INTRO)?;
        writeln!(out)?;
        display::print_form(out, &self.input)?;
        writeln!(out, "Type `help` for commands.")?;

        for line in reader.lines() {
            if !self.handle_line(&line?, out)? {
                break;
            }
        }
        Ok(())
    }

    /// Apply one line. Returns `false` when the session should end.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let command = match parse_command(line) {
            Ok(Some(c)) => c,
            Ok(None) => return Ok(true),
            Err(msg) => {
                writeln!(out, "{msg}")?;
                return Ok(true);
            }
        };

        match command {
            Command::Set(field, raw) => match field.set(&mut self.input, &raw) {
                Ok(()) => {
                    debug!(field = field.code(), value = %raw, "field updated");
                    writeln!(out, "{} = {}", field.label(), field.value(&self.input))?;
                }
                Err(msg) => writeln!(out, "{msg}")?,
            },
            Command::Predict => self.predict(out)?,
            Command::Show => {
                display::print_form(out, &self.input)?;
                if let Some(last) = &self.last {
                    writeln!(out, "Last result:")?;
                    display::print_prediction(out, last)?;
                }
            }
            Command::Reset => {
                self.input = PatientInput::default();
                display::print_form(out, &self.input)?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn predict(&mut self, out: &mut impl Write) -> io::Result<()> {
        match self.predictor.predict(&self.input) {
            Ok(prediction) => {
                display::print_prediction(out, &prediction)?;
                self.last = Some(prediction);
            }
            Err(e) => {
                warn!(error = %e, "prediction failed");
                display::print_prediction_error(out, &e)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hepatica_core::{FEATURE_COUNT, PredictError, StandardScaler};

    /// Fails for ages above 100, otherwise favours class 2.
    struct AgeSensitive;

    impl Classifier for AgeSensitive {
        fn predict_proba(&self, scaled: &[f32]) -> Result<Vec<f32>, PredictError> {
            if scaled[0] > 100.0 {
                return Err(PredictError::Inference("age out of model range".into()));
            }
            Ok(vec![0.1, 0.1, 0.6, 0.1, 0.1])
        }
    }

    fn predictor() -> Predictor<AgeSensitive> {
        let scaler =
            StandardScaler::new(vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT]).unwrap();
        Predictor::new(scaler, AgeSensitive)
    }

    fn drive(session: &mut FormSession<'_, AgeSensitive>, script: &str) -> String {
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_set_and_actions() {
        assert_eq!(
            parse_command("ALB 40.2").unwrap(),
            Some(Command::Set(Field::Alb, "40.2".into()))
        );
        assert_eq!(parse_command("p").unwrap(), Some(Command::Predict));
        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(parse_command("bogus 1").is_err());
        assert!(parse_command("ggt").is_err());
    }

    #[test]
    fn every_field_round_trips_through_its_code() {
        for field in Field::ALL {
            assert_eq!(Field::from_code(field.code()), Some(field));
        }
    }

    #[test]
    fn set_updates_each_lab_field() {
        let mut input = PatientInput::default();
        Field::Crea.set(&mut input, "95.5").unwrap();
        Field::Prot.set(&mut input, "-1").unwrap();
        Field::Sex.set(&mut input, "Female").unwrap();
        assert_eq!(input.crea, 95.5);
        assert_eq!(input.prot, -1.0);
        assert_eq!(input.sex, Sex::Female);
        assert_eq!(Field::Crea.value(&input), "95.5");
    }

    #[test]
    fn negative_age_is_rejected_and_kept() {
        let mut input = PatientInput::default();
        assert!(Field::Age.set(&mut input, "-4").is_err());
        assert!(Field::Age.set(&mut input, "40.5").is_err());
        assert_eq!(input.age, 32);
        Field::Age.set(&mut input, "0").unwrap();
        assert_eq!(input.age, 0);
    }

    #[test]
    fn bad_number_leaves_field_unchanged() {
        let mut input = PatientInput::default();
        let err = Field::Bil.set(&mut input, "high").unwrap_err();
        assert!(err.contains("bil must be a number"));
        assert_eq!(input.bil, 5.0);
    }

    #[test]
    fn non_finite_lab_value_is_rejected() {
        let mut input = PatientInput::default();
        for raw in ["nan", "NaN", "inf", "-inf", "infinity"] {
            let err = Field::Alb.set(&mut input, raw).unwrap_err();
            assert!(err.contains("alb must be a finite number"), "{raw}: {err}");
        }
        assert_eq!(input.alb, 38.5);
    }

    #[test]
    fn nan_entered_in_session_is_not_stored() {
        let predictor = predictor();
        let mut session = FormSession::new(&predictor);
        let out = drive(&mut session, "alb nan\nalb inf\n");
        assert!(out.contains("alb must be a finite number"));
        assert_eq!(session.input().alb, 38.5);
    }

    #[test]
    fn no_prediction_without_trigger() {
        let predictor = predictor();
        let mut session = FormSession::new(&predictor);
        let out = drive(&mut session, "alb 41\nshow\n");
        assert!(!out.contains("✅"));
        assert!(session.last_prediction().is_none());
        assert_eq!(session.input().alb, 41.0);
    }

    #[test]
    fn predict_shows_label_and_probabilities() {
        let predictor = predictor();
        let mut session = FormSession::new(&predictor);
        let out = drive(&mut session, "predict\nquit\n");
        assert!(out.contains("✅ Prediction: Hepatitis"));
        assert!(out.contains("Class probabilities: [0.1, 0.1, 0.6, 0.1, 0.1]"));
        assert_eq!(session.last_prediction().unwrap().class_index, 2);
    }

    #[test]
    fn failed_prediction_keeps_previous_result() {
        let predictor = predictor();
        let mut session = FormSession::new(&predictor);
        let out = drive(&mut session, "predict\nage 150\npredict\n");

        assert!(out.contains("❌ Prediction failed: inference failed: age out of model range"));
        let last = session.last_prediction().unwrap();
        assert_eq!(last.label, "Hepatitis");
        assert_eq!(session.input().age, 150);
    }

    #[test]
    fn session_recovers_after_error() {
        let predictor = predictor();
        let mut session = FormSession::new(&predictor);
        let out = drive(&mut session, "age 150\npredict\nage 60\npredict\n");
        assert_eq!(out.matches("❌").count(), 1);
        assert_eq!(out.matches("✅").count(), 1);
    }

    #[test]
    fn reset_restores_defaults() {
        let predictor = predictor();
        let mut session = FormSession::new(&predictor);
        drive(&mut session, "sex f\nggt 300\nreset\n");
        assert_eq!(session.input(), &PatientInput::default());
    }

    #[test]
    fn quit_stops_reading() {
        let predictor = predictor();
        let mut session = FormSession::new(&predictor);
        drive(&mut session, "quit\nalb 99\n");
        assert_eq!(session.input().alb, 38.5);
    }
}
