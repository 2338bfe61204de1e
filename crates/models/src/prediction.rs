use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::error::{OracleError, Result};

/// Result of the single-sequence next-value heuristic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SequencePrediction {
    pub prediction: Option<f64>,
    pub confidence: f64,
    pub reason: String,
}

impl SequencePrediction {
    pub fn new(prediction: Option<f64>, confidence: f64, reason: &str) -> Self {
        Self {
            prediction,
            confidence,
            reason: reason.to_string(),
        }
    }
}

/// Decode a raw prediction request body and extract its sequence.
///
/// The body is read as JSON whatever content type the client declared.
pub fn parse_sequence_body(body: &[u8]) -> Result<Vec<f64>> {
    let value: Value = serde_json::from_slice(body)?;
    parse_sequence(&value)
}

/// Extract the numeric sequence from a prediction request body.
///
/// A missing `sequence` field is an empty sequence. Entries may be JSON
/// numbers or strings holding a finite number.
pub fn parse_sequence(body: &Value) -> Result<Vec<f64>> {
    let raw = match body.get("sequence") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(OracleError::SequenceNotList),
    };

    raw.iter()
        .map(|item| {
            let number = match item {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            number
                .filter(|v| v.is_finite())
                .ok_or(OracleError::SequenceNotNumeric)
        })
        .collect()
}
