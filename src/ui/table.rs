use crate::analysis::{AnalysisSummary, PatternReport, ScoringDimension};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Industry fit")]
    industry_fit: String,
}

pub fn summary_table(summaries: &[AnalysisSummary]) -> String {
    let rows: Vec<SummaryRow> = summaries
        .iter()
        .map(|s| SummaryRow {
            id: s.id,
            company: s.company_name.clone(),
            date: s.analysis_date.clone(),
            score: format!("{:.1}", s.overall_score),
            industry_fit: s.industry_fit.clone(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct DimensionRow {
    #[tabled(rename = "Dimension")]
    name: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Rationale")]
    rationale: String,
}

pub fn dimension_table(dimensions: &[ScoringDimension]) -> String {
    let rows: Vec<DimensionRow> = dimensions
        .iter()
        .map(|d| DimensionRow {
            name: d.dimension_name.clone(),
            score: format!("{:.1}", d.score),
            rationale: d.rationale.clone(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct PatternRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Dimension")]
    name: String,
    #[tabled(rename = "Avg score")]
    average: String,
    #[tabled(rename = "Count")]
    count: usize,
}

pub fn pattern_table(report: &PatternReport) -> String {
    let rows: Vec<PatternRow> = report
        .dimension_averages
        .iter()
        .enumerate()
        .map(|(i, d)| PatternRow {
            rank: i + 1,
            name: d.dimension_name.clone(),
            average: format!("{:.2}", d.average_score),
            count: d.count,
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
