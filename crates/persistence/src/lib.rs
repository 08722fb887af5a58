#![deny(warnings)]

//! Persistence layer: exports, quarter tables and input files.
//!
//! The engine keeps nothing beyond its own lifetime; this crate is the
//! collaborator that writes games to disk and reads parameters back in.

use std::fs;
use std::path::Path;

use chrono::Local;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use sim_core::{Parameters, QuarterResult};
use sim_runtime::{Export, Scenario};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("amount {0} does not fit in i64 cents")]
    CentsOverflow(Decimal),
}

/// Returns the default directory for exported games.
pub fn default_export_dir() -> &'static str {
    "./exports"
}

/// File name like `factory_results_20251019_181500.json`.
pub fn timestamped_file_name(prefix: &str, extension: &str) -> String {
    format!(
        "{prefix}_{}.{extension}",
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

fn ensure_parent(path: &Path) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write an export as pretty-printed JSON, creating parent directories.
pub fn write_export_json(path: impl AsRef<Path>, export: &Export) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(export)?;
    fs::write(path, json)?;
    info!(path = %path.display(), quarters = export.quarters.len(), "export written");
    Ok(())
}

pub fn read_export_json(path: impl AsRef<Path>) -> Result<Export, PersistenceError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Write one CSV row per quarter.
pub fn write_quarter_csv(
    path: impl AsRef<Path>,
    quarters: &[QuarterResult],
) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut wtr = csv::Writer::from_path(path)?;
    for q in quarters {
        wtr.serialize(q)?;
    }
    wtr.flush()?;
    info!(path = %path.display(), rows = quarters.len(), "quarter table written");
    Ok(())
}

fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, PersistenceError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}

/// Load a parameter set; missing fields take their defaults.
pub fn load_parameters_yaml(path: impl AsRef<Path>) -> Result<Parameters, PersistenceError> {
    load_yaml(path)
}

/// Load a scenario (name plus a list of quarterly decisions).
pub fn load_scenario_yaml(path: impl AsRef<Path>) -> Result<Scenario, PersistenceError> {
    load_yaml(path)
}

/// Convert an amount to whole cents, rounding half to even.
pub fn decimal_to_cents_i64(amount: Decimal) -> Result<i64, PersistenceError> {
    sim_core::round_money(amount)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|c| c.to_i64())
        .ok_or(PersistenceError::CentsOverflow(amount))
}
