//! Database schema definitions

/// SQL to create the analyses table
pub const CREATE_ANALYSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS analyses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_name TEXT NOT NULL CHECK (length(company_name) > 0),
    analysis_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    overall_score REAL,
    industry_fit TEXT,
    opportunities TEXT,
    challenges TEXT,
    framework_json TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

/// SQL to create the scoring_dimensions table
/// No cascade: analyses are never deleted
pub const CREATE_SCORING_DIMENSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS scoring_dimensions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    analysis_id INTEGER,
    dimension_name TEXT,
    score REAL,
    rationale TEXT,
    FOREIGN KEY (analysis_id) REFERENCES analyses(id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_analyses_company ON analyses(company_name)",
    "CREATE INDEX IF NOT EXISTS idx_dimensions_analysis ON scoring_dimensions(analysis_id)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_ANALYSES_TABLE, CREATE_SCORING_DIMENSIONS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
