use crate::{OutputMode, emit_success};
use anyhow::Context;
use owo_colors::OwoColorize;
use salesdb::config::{SalesdbConfig, prepare_database_dir};
use salesdb::ui::{self, Icons};
use salesdb::{AnalysisPayload, AnalysisStore};
use std::io::Read;
use std::path::Path;

fn open_store(database: &Path) -> anyhow::Result<AnalysisStore> {
    prepare_database_dir(database)?;
    AnalysisStore::open(database)
        .with_context(|| format!("failed to open database {}", database.display()))
}

fn read_payload(file: &Path) -> anyhow::Result<AnalysisPayload> {
    let text = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("failed to read payload {}", file.display()))?
    };
    AnalysisPayload::from_json(&text).context("payload does not match the analysis shape")
}

pub fn run_version(output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        ui::banner(
            &format!("{}", "salesdb".bold().style(ui::theme().info.clone())),
            &format!("Version {}", env!("CARGO_PKG_VERSION").bold()),
        );
    } else {
        let data = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
        });
        emit_success(output_mode, "version", data)?;
    }
    Ok(())
}

pub fn run_init(
    output_mode: OutputMode,
    config_path: &Path,
    database: &Path,
    force: bool,
) -> anyhow::Result<()> {
    SalesdbConfig::for_database(database).save(config_path, force)?;

    let mut store = open_store(database)?;
    store.close()?;

    if output_mode.is_human() {
        ui::success("Initialized salesdb");
        ui::info("Config", &config_path.display().to_string());
        ui::info("Database", &database.display().to_string());
    } else {
        let data = serde_json::json!({
            "config": config_path.display().to_string(),
            "database": database.display().to_string(),
        });
        emit_success(output_mode, "init", data)?;
    }
    Ok(())
}

pub fn run_add(
    output_mode: OutputMode,
    database: &Path,
    company: &str,
    file: &Path,
) -> anyhow::Result<()> {
    let payload = read_payload(file)?;
    let mut store = open_store(database)?;
    let id = store.add_analysis(company, &payload)?;
    store.close()?;

    if output_mode.is_human() {
        ui::success(&format!("Added analysis with ID: {}", id));
        ui::summary_row("Company:", &ui::company(company));
        ui::summary_row("Overall score:", &ui::score(payload.effective_score()));
        ui::summary_row(
            "Scoring dimensions:",
            &payload.scoring_dimensions().len().to_string(),
        );
    } else {
        let data = serde_json::json!({
            "id": id,
            "company_name": company,
            "scoring_dimensions": payload.scoring_dimensions().len(),
        });
        emit_success(output_mode, "add", data)?;
    }
    Ok(())
}

pub fn run_show(output_mode: OutputMode, database: &Path, company: &str) -> anyhow::Result<()> {
    let mut store = open_store(database)?;
    let analysis = store.get_analysis(company)?;
    store.close()?;

    if !output_mode.is_human() {
        return emit_success(output_mode, "show", serde_json::to_value(&analysis)?);
    }

    let Some(analysis) = analysis else {
        println!("{} No analysis found for {}", Icons::CROSS, ui::company(company));
        return Ok(());
    };

    ui::header(&format!("{} (analysis #{})", analysis.company_name, analysis.id));
    ui::info("Analysis date", &analysis.analysis_date);
    ui::info("Overall score", &ui::score(analysis.overall_score));
    ui::info("Industry fit", &analysis.industry_fit);

    ui::section("Opportunities");
    if analysis.opportunities.is_empty() {
        println!("  {}", ui::dim("none recorded"));
    }
    for item in &analysis.opportunities {
        println!("  {} {}", Icons::UP, item);
    }

    ui::section("Challenges");
    if analysis.challenges.is_empty() {
        println!("  {}", ui::dim("none recorded"));
    }
    for item in &analysis.challenges {
        println!("  {} {}", Icons::DOWN, item);
    }

    if !analysis.scoring_dimensions.is_empty() {
        ui::section("Scoring dimensions");
        println!("{}", ui::dimension_table(&analysis.scoring_dimensions));
    }
    Ok(())
}

pub fn run_list(output_mode: OutputMode, database: &Path) -> anyhow::Result<()> {
    let mut store = open_store(database)?;
    let summaries = store.get_all_analyses()?;
    store.close()?;

    if !output_mode.is_human() {
        return emit_success(output_mode, "list", serde_json::to_value(&summaries)?);
    }

    if summaries.is_empty() {
        println!("{} No analyses stored yet.", Icons::INFO);
    } else {
        ui::header(&format!("{} analyses", summaries.len()));
        println!("{}", ui::summary_table(&summaries));
    }
    Ok(())
}

pub fn run_history(output_mode: OutputMode, database: &Path, company: &str) -> anyhow::Result<()> {
    let mut store = open_store(database)?;
    let summaries = store.history(company)?;
    store.close()?;

    if !output_mode.is_human() {
        return emit_success(output_mode, "history", serde_json::to_value(&summaries)?);
    }

    if summaries.is_empty() {
        println!("{} No analysis found for {}", Icons::CROSS, ui::company(company));
    } else {
        ui::header(&format!("History of {}", ui::company(company)));
        println!("{}", ui::summary_table(&summaries));
    }
    Ok(())
}

pub fn run_patterns(output_mode: OutputMode, database: &Path) -> anyhow::Result<()> {
    let mut store = open_store(database)?;
    let report = store.find_patterns()?;
    store.close()?;

    if !output_mode.is_human() {
        return emit_success(output_mode, "patterns", serde_json::to_value(&report)?);
    }

    println!("{} Patterns across {} analyses", Icons::STATS, report.total_analyses);
    if report.dimension_averages.is_empty() {
        println!("  {}", ui::dim("no scoring dimensions stored"));
    } else {
        println!("{}", ui::pattern_table(&report));
        if let Some(top) = report.dimension_averages.first() {
            println!(
                "{} Strongest dimension: {} ({:.2})",
                Icons::STAR,
                top.dimension_name.bold(),
                top.average_score
            );
        }
    }
    Ok(())
}

pub fn run_stats(output_mode: OutputMode, database: &Path) -> anyhow::Result<()> {
    let mut store = open_store(database)?;
    let stats = store.stats()?;
    store.close()?;

    if !output_mode.is_human() {
        return emit_success(output_mode, "stats", serde_json::to_value(&stats)?);
    }

    println!("{} salesdb Statistics ({})", Icons::DATABASE, database.display());
    let analyses = stats.analyses.to_string();
    let dimensions = stats.dimensions.to_string();
    let companies = stats.companies.to_string();
    println!(
        "{}",
        ui::stats_table(&[
            ("Analyses", analyses.as_str()),
            ("Scoring dimensions", dimensions.as_str()),
            ("Companies", companies.as_str()),
        ])
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_payload(dir: &Path, json: &str) -> std::path::PathBuf {
        let file = dir.join("payload.json");
        std::fs::write(&file, json).unwrap();
        file
    }

    #[test]
    fn test_add_then_show_in_both_modes() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("data").join("analyses.db");
        let file = write_payload(
            dir.path(),
            r#"{"overall_score": 81, "scoring_dimensions": [{"name": "Timing", "score": 6}]}"#,
        );

        run_add(OutputMode::Json, &database, "Acme", &file).unwrap();
        run_show(OutputMode::Json, &database, "Acme").unwrap();
        run_show(OutputMode::Human, &database, "Acme").unwrap();

        let store = AnalysisStore::open(&database).unwrap();
        let acme = store.get_analysis("Acme").unwrap().unwrap();
        assert_eq!(acme.overall_score, 81.0);
        assert_eq!(acme.scoring_dimensions[0].dimension_name, "Timing");
    }

    #[test]
    fn test_show_unknown_company_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("analyses.db");

        run_show(OutputMode::Json, &database, "Nobody").unwrap();
        run_show(OutputMode::Human, &database, "Nobody").unwrap();
        run_history(OutputMode::Json, &database, "Nobody").unwrap();
    }

    #[test]
    fn test_rejected_payload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("analyses.db");
        let file = write_payload(dir.path(), r#"{"scoring_dimensions": [{"score": 6}]}"#);

        let err = run_add(OutputMode::Json, &database, "Acme", &file).unwrap_err();
        assert!(format!("{:#}", err).contains("payload does not match the analysis shape"));
        assert!(!database.exists());

        let missing = dir.path().join("missing.json");
        let err = run_add(OutputMode::Json, &database, "Acme", &missing).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_init_refuses_to_clobber_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("salesdb.toml");
        let database = dir.path().join("analyses.db");

        run_init(OutputMode::Json, &config_path, &database, false).unwrap();
        assert!(database.exists());
        assert_eq!(
            SalesdbConfig::load(&config_path).unwrap(),
            Some(SalesdbConfig::for_database(&database))
        );

        assert!(run_init(OutputMode::Json, &config_path, &database, false).is_err());
        run_init(OutputMode::Json, &config_path, &database, true).unwrap();
    }
}
