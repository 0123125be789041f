use std::fmt::Display;

use predizer_client::{PredictionOutcome, display_value};

/// Shown when the input does not produce any feature.
pub const EMPTY_INPUT_MESSAGE: &str = "Por favor, insira as features.";
pub const PREDICTION_PREFIX: &str = "Predição: ";
pub const ERROR_PREFIX: &str = "Erro: ";

pub fn prediction_message(prediction: &serde_json::Value) -> String {
    format!("{PREDICTION_PREFIX}{}", display_value(prediction))
}

pub fn error_message(detail: impl Display) -> String {
    format!("{ERROR_PREFIX}{detail}")
}

pub fn outcome_message(outcome: &PredictionOutcome) -> String {
    match outcome {
        PredictionOutcome::Prediction(value) => prediction_message(value),
        PredictionOutcome::Failure { detail, .. } => error_message(display_value(detail)),
    }
}
