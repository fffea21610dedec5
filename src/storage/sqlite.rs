//! SQLite storage implementation

use std::path::{Path, PathBuf};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use crate::analysis::{
    Analysis, AnalysisId, AnalysisPayload, AnalysisSummary, DimensionAverage, PatternReport,
    ScoringDimension,
};
use crate::{codec, Error, Result};
use super::schema;

/// Database file used when no path is given
pub const DEFAULT_DATABASE_FILE: &str = "company_analyses.db";

const ANALYSIS_COLUMNS: &str = "id, company_name, analysis_date, overall_score, industry_fit, \
     opportunities, challenges, framework_json, created_at";

const SUMMARY_COLUMNS: &str = "id, company_name, analysis_date, overall_score, industry_fit";

/// Newest first. `created_at` has one-second resolution, so the row id
/// orders analyses written within the same second.
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

/// SQLite-backed store of company analyses.
///
/// Holds exactly one connection from `open` until `close`. After `close`
/// every operation fails with [`Error::Closed`].
pub struct AnalysisStore {
    conn: Option<Connection>,
    path: Option<PathBuf>,
}

/// Raw `analyses` row before the JSON columns are decoded
struct AnalysisRow {
    id: AnalysisId,
    company_name: String,
    analysis_date: Option<String>,
    overall_score: Option<f64>,
    industry_fit: Option<String>,
    opportunities: Option<String>,
    challenges: Option<String>,
    framework_json: Option<String>,
    created_at: Option<String>,
}

impl AnalysisRow {
    fn decode(self, scoring_dimensions: Vec<ScoringDimension>) -> Result<Analysis> {
        Ok(Analysis {
            id: self.id,
            company_name: self.company_name,
            analysis_date: self.analysis_date.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_default(),
            overall_score: self.overall_score.unwrap_or(0.0),
            industry_fit: self.industry_fit.unwrap_or_default(),
            opportunities: codec::decode_list(self.opportunities.as_deref())?,
            challenges: codec::decode_list(self.challenges.as_deref())?,
            framework: codec::decode_framework(self.framework_json.as_deref())?,
            scoring_dimensions,
        })
    }
}

impl AnalysisStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Some(conn),
            path: Some(path.to_path_buf()),
        };
        store.initialize_schema()?;
        tracing::info!("Opened analysis store at {}", path.display());
        Ok(store)
    }

    /// Open `company_analyses.db` in the working directory
    pub fn open_default() -> Result<Self> {
        Self::open(Path::new(DEFAULT_DATABASE_FILE))
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn: Some(conn), path: None };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create tables if absent. Existing tables are left as they are.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        Ok(())
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::Closed)
    }

    /// Path of the backing file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Release the connection. Terminal: the store cannot be reopened.
    pub fn close(&mut self) -> Result<()> {
        let conn = self.conn.take().ok_or(Error::Closed)?;
        match conn.close() {
            Ok(()) => {
                tracing::info!("Closed analysis store");
                Ok(())
            }
            Err((conn, err)) => {
                // Still usable; keep it so the caller can retry or drop
                self.conn = Some(conn);
                Err(err.into())
            }
        }
    }

    // ========== Write Operations ==========

    /// Store an analysis and all of its scoring dimensions.
    ///
    /// Everything is written in one transaction; on any failure nothing is
    /// committed. An empty company name is rejected by the schema and
    /// surfaces as [`Error::Constraint`].
    pub fn add_analysis(&mut self, company_name: &str, payload: &AnalysisPayload) -> Result<AnalysisId> {
        let opportunities = codec::encode_list(payload.opportunities())?;
        let challenges = codec::encode_list(payload.challenges())?;
        let framework = codec::encode_framework(payload)?;

        let conn = self.conn.as_mut().ok_or(Error::Closed)?;
        let tx = conn.transaction()?;

        let id = match insert_rows(&tx, company_name, payload, &opportunities, &challenges, &framework) {
            Ok(id) => id,
            Err(err) => {
                // Dropping the transaction rolls it back
                tracing::warn!("Rolled back analysis for {:?}: {}", company_name, err);
                return Err(err);
            }
        };
        tx.commit()?;

        tracing::info!(
            "Stored analysis {} for {:?} with {} dimensions",
            id,
            company_name,
            payload.scoring_dimensions().len()
        );
        Ok(id)
    }

    // ========== Read Operations ==========

    /// Most recently created analysis for an exact, case-sensitive company name
    pub fn get_analysis(&self, company_name: &str) -> Result<Option<Analysis>> {
        let sql = format!(
            "SELECT {} FROM analyses WHERE company_name = ?1 {} LIMIT 1",
            ANALYSIS_COLUMNS, NEWEST_FIRST
        );
        let row = self
            .conn()?
            .query_row(&sql, [company_name], row_to_analysis)
            .optional()?;
        tracing::debug!("get_analysis({:?}) found={}", company_name, row.is_some());
        self.decode_row(row)
    }

    /// Get an analysis by id
    pub fn get_analysis_by_id(&self, id: AnalysisId) -> Result<Option<Analysis>> {
        let sql = format!("SELECT {} FROM analyses WHERE id = ?1", ANALYSIS_COLUMNS);
        let row = self
            .conn()?
            .query_row(&sql, [id], row_to_analysis)
            .optional()?;
        self.decode_row(row)
    }

    fn decode_row(&self, row: Option<AnalysisRow>) -> Result<Option<Analysis>> {
        match row {
            Some(row) => {
                let dimensions = self.dimensions_for(row.id)?;
                Ok(Some(row.decode(dimensions)?))
            }
            None => Ok(None),
        }
    }

    /// Scoring dimensions attached to an analysis, in insertion order
    pub fn dimensions_for(&self, analysis_id: AnalysisId) -> Result<Vec<ScoringDimension>> {
        let mut stmt = self.conn()?.prepare(
            "SELECT id, analysis_id, dimension_name, score, rationale FROM scoring_dimensions WHERE analysis_id = ?1 ORDER BY id"
        )?;

        let dimensions = stmt
            .query_map([analysis_id], row_to_dimension)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(dimensions)
    }

    /// Every analysis, newest first, summary columns only
    pub fn get_all_analyses(&self) -> Result<Vec<AnalysisSummary>> {
        let sql = format!("SELECT {} FROM analyses {}", SUMMARY_COLUMNS, NEWEST_FIRST);
        let mut stmt = self.conn()?.prepare(&sql)?;

        let summaries = stmt
            .query_map([], row_to_summary)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(summaries)
    }

    /// Every analysis of one company, newest first
    pub fn history(&self, company_name: &str) -> Result<Vec<AnalysisSummary>> {
        let sql = format!(
            "SELECT {} FROM analyses WHERE company_name = ?1 {}",
            SUMMARY_COLUMNS, NEWEST_FIRST
        );
        let mut stmt = self.conn()?.prepare(&sql)?;

        let summaries = stmt
            .query_map([company_name], row_to_summary)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(summaries)
    }

    // ========== Aggregates ==========

    /// Average score and occurrence count per dimension name, plus the
    /// total number of analyses.
    ///
    /// Ties on the average keep the dimension that was first stored first.
    /// The two reads are not isolated from each other.
    pub fn find_patterns(&self) -> Result<PatternReport> {
        let mut stmt = self.conn()?.prepare(
            r#"
            SELECT dimension_name, AVG(score) AS avg_score, COUNT(*) AS count
            FROM scoring_dimensions
            GROUP BY dimension_name
            ORDER BY avg_score DESC, MIN(id) ASC
            "#,
        )?;

        let dimension_averages = stmt
            .query_map([], |row| {
                let name: Option<String> = row.get(0)?;
                let average: Option<f64> = row.get(1)?;
                let count: i64 = row.get(2)?;
                Ok(DimensionAverage {
                    dimension_name: name.unwrap_or_default(),
                    average_score: average.unwrap_or(0.0),
                    count: count as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let total_analyses = self.count_analyses()?;
        tracing::debug!(
            "find_patterns: {} dimensions over {} analyses",
            dimension_averages.len(),
            total_analyses
        );

        Ok(PatternReport {
            dimension_averages,
            total_analyses,
        })
    }

    /// Count all analyses
    pub fn count_analyses(&self) -> Result<usize> {
        let count: i64 = self.conn()?.query_row("SELECT COUNT(*) FROM analyses", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count all scoring dimensions
    pub fn count_dimensions(&self) -> Result<usize> {
        let count: i64 = self.conn()?.query_row("SELECT COUNT(*) FROM scoring_dimensions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count distinct company names
    pub fn count_companies(&self) -> Result<usize> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(DISTINCT company_name) FROM analyses",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            analyses: self.count_analyses()?,
            dimensions: self.count_dimensions()?,
            companies: self.count_companies()?,
        })
    }
}

fn insert_rows(
    tx: &Transaction<'_>,
    company_name: &str,
    payload: &AnalysisPayload,
    opportunities: &str,
    challenges: &str,
    framework: &str,
) -> Result<AnalysisId> {
    tx.execute(
        r#"
        INSERT INTO analyses (company_name, overall_score, industry_fit, opportunities, challenges, framework_json)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            company_name,
            payload.effective_score(),
            payload.effective_industry_fit(),
            opportunities,
            challenges,
            framework,
        ],
    )
    .map_err(Error::from_sqlite)?;

    let analysis_id = tx.last_insert_rowid();

    let mut stmt = tx.prepare(
        "INSERT INTO scoring_dimensions (analysis_id, dimension_name, score, rationale) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for dimension in payload.scoring_dimensions() {
        stmt.execute(params![
            analysis_id,
            dimension.name,
            dimension.score,
            dimension.rationale,
        ])
        .map_err(Error::from_sqlite)?;
    }

    Ok(analysis_id)
}

/// Helper to convert a full row to an undecoded analysis
fn row_to_analysis(row: &rusqlite::Row) -> rusqlite::Result<AnalysisRow> {
    Ok(AnalysisRow {
        id: row.get(0)?,
        company_name: row.get(1)?,
        analysis_date: row.get(2)?,
        overall_score: row.get(3)?,
        industry_fit: row.get(4)?,
        opportunities: row.get(5)?,
        challenges: row.get(6)?,
        framework_json: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn row_to_summary(row: &rusqlite::Row) -> rusqlite::Result<AnalysisSummary> {
    let analysis_date: Option<String> = row.get(2)?;
    let overall_score: Option<f64> = row.get(3)?;
    let industry_fit: Option<String> = row.get(4)?;
    Ok(AnalysisSummary {
        id: row.get(0)?,
        company_name: row.get(1)?,
        analysis_date: analysis_date.unwrap_or_default(),
        overall_score: overall_score.unwrap_or(0.0),
        industry_fit: industry_fit.unwrap_or_default(),
    })
}

fn row_to_dimension(row: &rusqlite::Row) -> rusqlite::Result<ScoringDimension> {
    let dimension_name: Option<String> = row.get(2)?;
    let score: Option<f64> = row.get(3)?;
    let rationale: Option<String> = row.get(4)?;
    Ok(ScoringDimension {
        id: row.get(0)?,
        analysis_id: row.get(1)?,
        dimension_name: dimension_name.unwrap_or_default(),
        score: score.unwrap_or(0.0),
        rationale: rationale.unwrap_or_default(),
    })
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub analyses: usize,
    pub dimensions: usize,
    pub companies: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Analyses: {}", self.analyses)?;
        writeln!(f, "  Scoring dimensions: {}", self.dimensions)?;
        writeln!(f, "  Companies: {}", self.companies)
    }
}
