//! Analysis records - what goes into the store and what comes back out
//!
//! - `AnalysisPayload`: the submitted analysis, typed at the boundary
//! - `Analysis`: a stored analysis with its decoded lists and framework
//! - `AnalysisSummary`: the lightweight listing row
//! - `ScoringDimension`: one named sub-score attached to an analysis
//! - `PatternReport`: per-dimension averages across every stored analysis

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Row id assigned by SQLite to an analysis
pub type AnalysisId = i64;

/// Recognized fields of a payload. `null` and absent read the same.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct PayloadFields {
    #[serde(default)]
    overall_score: Option<f64>,
    #[serde(default)]
    industry_fit: Option<String>,
    #[serde(default)]
    opportunities: Option<Vec<String>>,
    #[serde(default)]
    challenges: Option<Vec<String>>,
    #[serde(default)]
    scoring_dimensions: Option<Vec<DimensionInput>>,
}

/// A submitted analysis.
///
/// Holds the submitted JSON object verbatim next to a typed view of the
/// fields the store understands. Serializing writes the object back exactly
/// as submitted: unknown keys, explicit `null`s and nested extras included,
/// and nothing that was never sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct AnalysisPayload {
    fields: PayloadFields,
    raw: Map<String, Value>,
}

impl AnalysisPayload {
    /// Empty payload; every recognized field takes its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a payload from JSON, rejecting documents that don't fit the shape
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(raw) = value else {
            return Err(Error::Deserialization(<serde_json::Error as serde::de::Error>::custom(
                "analysis payload must be a JSON object",
            )));
        };
        let fields: PayloadFields = serde_json::from_value(Value::Object(raw.clone()))?;
        Ok(Self { fields, raw })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.raw)?)
    }

    /// The submitted object, untouched
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    pub fn with_overall_score(mut self, score: f64) -> Self {
        self.fields.overall_score = Some(score);
        self.raw.insert("overall_score".to_string(), Value::from(score));
        self
    }

    pub fn with_industry_fit(mut self, industry_fit: impl Into<String>) -> Self {
        let industry_fit = industry_fit.into();
        self.raw.insert("industry_fit".to_string(), Value::from(industry_fit.clone()));
        self.fields.industry_fit = Some(industry_fit);
        self
    }

    pub fn with_opportunities<S: Into<String>>(mut self, items: impl IntoIterator<Item = S>) -> Self {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        self.raw.insert("opportunities".to_string(), Value::from(items.clone()));
        self.fields.opportunities = Some(items);
        self
    }

    pub fn with_challenges<S: Into<String>>(mut self, items: impl IntoIterator<Item = S>) -> Self {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        self.raw.insert("challenges".to_string(), Value::from(items.clone()));
        self.fields.challenges = Some(items);
        self
    }

    pub fn with_dimensions(mut self, dimensions: Vec<DimensionInput>) -> Self {
        let array = dimensions.iter().map(DimensionInput::to_value).collect();
        self.raw.insert("scoring_dimensions".to_string(), Value::Array(array));
        self.fields.scoring_dimensions = Some(dimensions);
        self
    }

    pub fn overall_score(&self) -> Option<f64> {
        self.fields.overall_score
    }

    pub fn industry_fit(&self) -> Option<&str> {
        self.fields.industry_fit.as_deref()
    }

    pub fn opportunities(&self) -> &[String] {
        self.fields.opportunities.as_deref().unwrap_or(&[])
    }

    pub fn challenges(&self) -> &[String] {
        self.fields.challenges.as_deref().unwrap_or(&[])
    }

    pub fn scoring_dimensions(&self) -> &[DimensionInput] {
        self.fields.scoring_dimensions.as_deref().unwrap_or(&[])
    }

    /// Score written to the `overall_score` column
    pub fn effective_score(&self) -> f64 {
        self.fields.overall_score.unwrap_or(0.0)
    }

    /// Text written to the `industry_fit` column
    pub fn effective_industry_fit(&self) -> &str {
        self.industry_fit().unwrap_or("")
    }
}

impl TryFrom<Value> for AnalysisPayload {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl From<AnalysisPayload> for Value {
    fn from(payload: AnalysisPayload) -> Self {
        Value::Object(payload.raw)
    }
}

/// One scoring dimension as submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionInput {
    pub name: String,
    pub score: f64,
    #[serde(default)]
    pub rationale: String,
    /// Anything else attached to the dimension (weights, evidence, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DimensionInput {
    pub fn new(name: impl Into<String>, score: f64, rationale: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score,
            rationale: rationale.into(),
            extra: Map::new(),
        }
    }

    fn to_value(&self) -> Value {
        let mut object = self.extra.clone();
        object.insert("name".to_string(), Value::from(self.name.clone()));
        object.insert("score".to_string(), Value::from(self.score));
        object.insert("rationale".to_string(), Value::from(self.rationale.clone()));
        Value::Object(object)
    }
}

/// A stored analysis, fully decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub id: AnalysisId,
    pub company_name: String,
    /// `YYYY-MM-DD HH:MM:SS`, UTC, as written by SQLite
    pub analysis_date: String,
    pub created_at: String,
    pub overall_score: f64,
    pub industry_fit: String,
    pub opportunities: Vec<String>,
    pub challenges: Vec<String>,
    /// The payload exactly as it was submitted
    pub framework: AnalysisPayload,
    /// Attached dimensions in insertion order
    pub scoring_dimensions: Vec<ScoringDimension>,
}

/// Listing row: summary columns only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub id: AnalysisId,
    pub company_name: String,
    pub analysis_date: String,
    pub overall_score: f64,
    pub industry_fit: String,
}

/// A stored scoring dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringDimension {
    pub id: i64,
    pub analysis_id: AnalysisId,
    pub dimension_name: String,
    pub score: f64,
    pub rationale: String,
}

/// Average score of one dimension name across all analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionAverage {
    pub dimension_name: String,
    pub average_score: f64,
    pub count: usize,
}

/// Aggregate statistics across the whole store.
///
/// The averages and the total come from two separate reads; a writer in
/// another process could land between them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternReport {
    /// Highest average first
    pub dimension_averages: Vec<DimensionAverage>,
    pub total_analyses: usize,
}

impl PatternReport {
    pub fn is_empty(&self) -> bool {
        self.dimension_averages.is_empty() && self.total_analyses == 0
    }

    pub fn get(&self, dimension_name: &str) -> Option<&DimensionAverage> {
        self.dimension_averages
            .iter()
            .find(|d| d.dimension_name == dimension_name)
    }
}

impl std::fmt::Display for PatternReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Pattern Report:")?;
        writeln!(f, "  Total analyses: {}", self.total_analyses)?;
        for dim in &self.dimension_averages {
            writeln!(
                f,
                "  {}: avg {:.2} over {}",
                dim.dimension_name, dim.average_score, dim.count
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_take_defaults() {
        let payload = AnalysisPayload::from_json("{}").unwrap();
        assert_eq!(payload.effective_score(), 0.0);
        assert_eq!(payload.effective_industry_fit(), "");
        assert!(payload.opportunities().is_empty());
        assert!(payload.challenges().is_empty());
        assert!(payload.scoring_dimensions().is_empty());
    }

    #[test]
    fn test_reserializes_exactly_what_was_sent() {
        let input = json!({"overall_score": null, "industry_fit": null, "competitors": null});
        let payload = AnalysisPayload::from_value(input.clone()).unwrap();
        assert_eq!(payload.overall_score(), None);
        assert_eq!(payload.effective_score(), 0.0);

        let reencoded = serde_json::to_value(&payload).unwrap();
        assert_eq!(reencoded, input);
        assert!(reencoded.get("opportunities").is_none());
    }

    #[test]
    fn test_unknown_fields_are_kept() {
        let json = r#"{"overall_score": 61, "decision_makers": ["CFO", "CTO"], "notes": {"tier": 2}}"#;
        let payload = AnalysisPayload::from_json(json).unwrap();
        assert_eq!(payload.overall_score(), Some(61.0));
        assert_eq!(payload.get("decision_makers"), Some(&json!(["CFO", "CTO"])));

        let reencoded: Value = serde_json::from_str(&payload.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reencoded["notes"]["tier"], 2);
        assert_eq!(reencoded["overall_score"], 61);
        assert!(reencoded.get("industry_fit").is_none());
    }

    #[test]
    fn test_dimension_extras_are_kept() {
        let payload = AnalysisPayload::from_value(json!({
            "scoring_dimensions": [
                {"name": "Market Alignment", "score": 8, "weight": 0.3, "evidence": ["10-K"]}
            ]
        }))
        .unwrap();
        let dimension = &payload.scoring_dimensions()[0];
        assert_eq!(dimension.extra["weight"], 0.3);
        assert_eq!(dimension.rationale, "");
    }

    #[test]
    fn test_builder_keeps_view_and_object_in_step() {
        let payload = AnalysisPayload::new()
            .with_overall_score(78.0)
            .with_opportunities(["A", "B"])
            .with_dimensions(vec![DimensionInput::new("Timing", 5.0, "Next quarter")]);

        assert_eq!(payload.opportunities(), ["A", "B"]);
        assert!(payload.get("challenges").is_none());
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "overall_score": 78.0,
                "opportunities": ["A", "B"],
                "scoring_dimensions": [{"name": "Timing", "score": 5.0, "rationale": "Next quarter"}]
            })
        );
    }

    #[test]
    fn test_shape_mismatches_are_rejected() {
        let missing_name = r#"{"scoring_dimensions": [{"score": 4}]}"#;
        assert!(matches!(
            AnalysisPayload::from_json(missing_name),
            Err(crate::Error::Deserialization(_))
        ));
        assert!(matches!(
            AnalysisPayload::from_json("[1, 2]"),
            Err(crate::Error::Deserialization(_))
        ));
    }

    #[test]
    fn test_pattern_report_lookup() {
        let report = PatternReport {
            dimension_averages: vec![DimensionAverage {
                dimension_name: "Budget Readiness".to_string(),
                average_score: 7.0,
                count: 1,
            }],
            total_analyses: 1,
        };
        assert_eq!(report.get("Budget Readiness").unwrap().count, 1);
        assert!(report.get("Market Alignment").is_none());
        assert!(!report.is_empty());
        assert!(PatternReport::default().is_empty());
    }
}
