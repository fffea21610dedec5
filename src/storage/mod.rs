//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - analyses(id, company_name, analysis_date, overall_score, industry_fit,
//!   opportunities, challenges, framework_json, created_at)
//! - scoring_dimensions(id, analysis_id, dimension_name, score, rationale)

pub mod schema;
pub mod sqlite;

pub use sqlite::{AnalysisStore, DbStats, DEFAULT_DATABASE_FILE};
