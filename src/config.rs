//! `salesdb.toml`: where the analyses database lives

use crate::storage::DEFAULT_DATABASE_FILE;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "salesdb.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SalesdbConfig {
    /// Database file, relative to the working directory
    pub database: Option<String>,
}

impl SalesdbConfig {
    pub fn for_database(database: &Path) -> Self {
        Self {
            database: Some(database.display().to_string()),
        }
    }

    /// Read a config file. A missing file is `Ok(None)`, not an error.
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read config {}", path.display()));
            }
        };
        let config = toml::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(Some(config))
    }

    /// Write the config; an existing file is only replaced when `overwrite` is set
    pub fn save(&self, path: &Path, overwrite: bool) -> anyhow::Result<()> {
        let text = toml::to_string_pretty(self)?;

        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut file = match options.open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to create config {}", path.display()));
            }
        };
        file.write_all(text.as_bytes())
            .with_context(|| format!("failed to write config {}", path.display()))
    }

    /// CLI flag, then this config, then `company_analyses.db`
    pub fn database_path(config: Option<&Self>, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| config.and_then(|c| c.database.as_deref()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE))
    }
}

/// Create the directory that will hold `database`, if it has one
pub fn prepare_database_dir(database: &Path) -> anyhow::Result<()> {
    match database.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create database directory {}", dir.display())),
        _ => Ok(()),
    }
}
