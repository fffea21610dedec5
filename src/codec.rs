//! Text encodings for the JSON columns
//!
//! `opportunities` and `challenges` are plain JSON string arrays.
//! `framework_json` is wrapped in a versioned envelope:
//!
//! ```json
//! {"schema_version": 1, "payload": { ... }}
//! ```
//!
//! A bare object with no `schema_version` key is a version 0 framework, the
//! shape older tooling wrote straight into the column.

use crate::analysis::AnalysisPayload;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope version written by this build
pub const FRAMEWORK_SCHEMA_VERSION: u64 = 1;

const VERSION_KEY: &str = "schema_version";

#[derive(Serialize, Deserialize)]
struct FrameworkEnvelope<T> {
    schema_version: u64,
    payload: T,
}

/// Encode a list column
pub fn encode_list(items: &[String]) -> Result<String> {
    Ok(serde_json::to_string(items)?)
}

/// Decode a list column; NULL reads as empty
pub fn decode_list(text: Option<&str>) -> Result<Vec<String>> {
    match text {
        None => Ok(Vec::new()),
        Some(s) => Ok(serde_json::from_str(s)?),
    }
}

/// Encode the full payload for the `framework_json` column
pub fn encode_framework(payload: &AnalysisPayload) -> Result<String> {
    let envelope = FrameworkEnvelope {
        schema_version: FRAMEWORK_SCHEMA_VERSION,
        payload,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decode a `framework_json` column written by any supported version
pub fn decode_framework(text: Option<&str>) -> Result<AnalysisPayload> {
    let Some(text) = text else {
        return Ok(AnalysisPayload::default());
    };

    let value: Value = serde_json::from_str(text)?;
    match value.get(VERSION_KEY).map(Value::as_u64) {
        // Legacy: the payload itself, unwrapped
        None => Ok(serde_json::from_value(value)?),
        Some(Some(found)) if found > FRAMEWORK_SCHEMA_VERSION => Err(Error::UnsupportedFormat {
            found,
            supported: FRAMEWORK_SCHEMA_VERSION,
        }),
        Some(_) => {
            let envelope: FrameworkEnvelope<AnalysisPayload> = serde_json::from_value(value)?;
            Ok(envelope.payload)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DimensionInput;

    fn sample_payload() -> AnalysisPayload {
        AnalysisPayload::new()
            .with_overall_score(78.0)
            .with_industry_fit("Strong alignment with enterprise needs")
            .with_opportunities(["Process automation potential"])
            .with_challenges(["Long sales cycle expected"])
            .with_dimensions(vec![DimensionInput::new("Market Alignment", 8.0, "Perfect fit")])
    }

    #[test]
    fn test_framework_is_enveloped() {
        let encoded = encode_framework(&sample_payload()).unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["schema_version"], FRAMEWORK_SCHEMA_VERSION);
        assert_eq!(value["payload"]["overall_score"], 78.0);
        assert_eq!(decode_framework(Some(&encoded)).unwrap(), sample_payload());
    }

    #[test]
    fn test_legacy_framework_decodes() {
        let legacy = r#"{"overall_score": 78, "industry_fit": "Strong alignment with enterprise needs",
            "opportunities": ["Process automation potential"],
            "challenges": ["Long sales cycle expected"],
            "scoring_dimensions": [{"name": "Market Alignment", "score": 8, "rationale": "Perfect fit"}]}"#;
        let decoded = decode_framework(Some(legacy)).unwrap();
        assert_eq!(decoded, AnalysisPayload::from_json(legacy).unwrap());
        assert_eq!(decoded.overall_score(), Some(78.0));
        assert_eq!(decoded.scoring_dimensions(), sample_payload().scoring_dimensions());
        // Integers written by older tooling stay integers
        assert!(decoded.get("overall_score").unwrap().is_u64());
    }

    #[test]
    fn test_newer_framework_is_rejected() {
        let future = r#"{"schema_version": 9, "payload": {}}"#;
        match decode_framework(Some(future)) {
            Err(Error::UnsupportedFormat { found, supported }) => {
                assert_eq!(found, 9);
                assert_eq!(supported, FRAMEWORK_SCHEMA_VERSION);
            }
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_columns_fail_to_decode() {
        assert!(matches!(decode_list(Some("[\"A\",")), Err(Error::Deserialization(_))));
        assert!(matches!(decode_framework(Some("not json")), Err(Error::Deserialization(_))));
    }

    #[test]
    fn test_null_columns_decode_empty() {
        assert!(decode_list(None).unwrap().is_empty());
        assert_eq!(decode_framework(None).unwrap(), AnalysisPayload::default());
    }
}
