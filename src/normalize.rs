use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

/// One per-document outcome. `Failure` is listed first so an untagged
/// decode treats any object carrying an `error` key as a failure record,
/// matching the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultRecord {
    Failure {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw: Option<String>,
    },
    Success {
        #[serde(default)]
        hindi_ocr: String,
        #[serde(default)]
        english_translation: String,
    },
}

impl ResultRecord {
    pub fn is_success(&self) -> bool {
        matches!(self, ResultRecord::Success { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResultRecord::Failure { error, .. } => Some(error),
            ResultRecord::Success { .. } => None,
        }
    }
}

/// Coerces the raw response text into an ordered record sequence.
///
/// A body that is not JSON at all degrades to a single `Failure` carrying
/// the parse error and the full raw text; this is a caller-visible data
/// condition, not a process failure. A single object is wrapped into a
/// one-element sequence, which covers `expected == 1` and defensively
/// covers a service that answered a multi-file batch with one object. An
/// array is returned element-for-element; the length is not reconciled
/// against `expected` (a mismatch is logged and left to the caller).
pub fn normalize(raw_text: &str, expected: usize) -> Vec<ResultRecord> {
    let value: Value = match serde_json::from_str(raw_text) {
        Ok(v) => v,
        Err(e) => {
            error!("failed to decode JSON response: {e}");
            return vec![ResultRecord::Failure {
                error: format!("Invalid JSON response from API: {e}"),
                raw: Some(raw_text.to_string()),
            }];
        }
    };

    let elements = match value {
        Value::Array(items) => items,
        other => {
            if expected > 1 {
                warn!("expected an array from the API but got a single value; wrapping");
            }
            vec![other]
        }
    };

    if elements.len() != expected {
        warn!(
            "API returned {} records for {} submitted files",
            elements.len(),
            expected
        );
    }

    info!("normalized {} result records", elements.len());
    elements.into_iter().map(decode_record).collect()
}

fn decode_record(value: Value) -> ResultRecord {
    match serde_json::from_value::<ResultRecord>(value.clone()) {
        Ok(rec) => rec,
        // Non-object elements (bare strings, numbers) have no field
        // mapping; keep their JSON text for offline inspection.
        Err(e) => ResultRecord::Failure {
            error: format!("unexpected record shape: {e}"),
            raw: Some(value.to_string()),
        },
    }
}
