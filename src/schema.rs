//! Detected schema model, construction, and YAML persistence.
//!
//! This module owns [`DetectedColumn`] and [`DetectedSchema`] (the canonical
//! representation of a sampled tabular source) and the builder that runs the
//! classifier over every column of a [`TableData`].
//!
//! ## Responsibilities
//!
//! - Column name normalization (lowercase, whitespace runs → `_`) and
//!   title-cased display names
//! - Full-row-set classification with null ratio / cardinality / samples
//! - Primary date election (first date column with a date-like name wins)
//! - Preview row capture (first 10 rows as name→value maps)
//! - YAML schema loading and saving via `serde_yaml`

use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use heck::ToTitleCase;
use serde::{Deserialize, Serialize};

use crate::{
    classify::{self, ColumnStats, DataType},
    ingest::TableData,
};

const PREVIEW_ROW_LIMIT: usize = 10;

/// One sampled column with its inferred type and derived flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedColumn {
    pub name: String,
    pub display_name: String,
    pub data_type: DataType,
    pub is_measure: bool,
    pub is_dimension: bool,
    #[serde(default)]
    pub is_primary_date: bool,
    pub null_ratio: f64,
    pub cardinality: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_values: Vec<String>,
}

/// Output of sampling one tabular source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedSchema {
    pub columns: Vec<DetectedColumn>,
    pub row_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preview_data: Vec<BTreeMap<String, String>>,
}

impl DetectedSchema {
    pub fn column(&self, name: &str) -> Option<&DetectedColumn> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_date_column(&self) -> Option<&DetectedColumn> {
        self.columns.iter().find(|column| column.is_primary_date)
    }

    pub fn measures(&self) -> Vec<&DetectedColumn> {
        self.columns.iter().filter(|c| c.is_measure).collect()
    }

    /// Non-temporal grouping columns, in source order.
    pub fn dimensions(&self) -> Vec<&DetectedColumn> {
        self.columns
            .iter()
            .filter(|c| c.is_dimension && !c.data_type.is_temporal())
            .collect()
    }

    pub fn date_columns(&self) -> Vec<&DetectedColumn> {
        self.columns
            .iter()
            .filter(|c| c.data_type.is_temporal())
            .collect()
    }

    pub fn categories(&self) -> Vec<&DetectedColumn> {
        self.columns
            .iter()
            .filter(|c| c.data_type == DataType::Category)
            .collect()
    }

    /// Re-elects the primary date column after a user override. A name that
    /// does not resolve to a date/datetime column clears the flag instead.
    pub fn set_primary_date(&mut self, name: &str) {
        for column in &mut self.columns {
            column.is_primary_date = column.name == name && column.data_type.is_temporal();
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating schema file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing schema YAML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening schema file {path:?}"))?;
        let reader = BufReader::new(file);
        let schema: DetectedSchema =
            serde_yaml::from_reader(reader).context("Parsing schema YAML")?;
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<()> {
        let primary_dates = self
            .columns
            .iter()
            .filter(|column| column.is_primary_date)
            .count();
        ensure!(
            primary_dates <= 1,
            "Schema declares {primary_dates} primary date columns; at most one is allowed"
        );
        for column in &self.columns {
            ensure!(
                !(column.is_measure && column.is_dimension),
                "Column '{}' is flagged as both measure and dimension",
                column.name
            );
            if column.is_primary_date {
                ensure!(
                    column.data_type.is_temporal(),
                    "Column '{}' is marked primary date but typed {}",
                    column.name,
                    column.data_type
                );
            }
        }
        Ok(())
    }
}

/// Lowercases and collapses separator runs (whitespace or underscores) into
/// a single underscore, trimming separators at both ends. Collapsing keeps
/// normalization idempotent against the title-cased display form.
pub fn normalize_column_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut pending_gap = false;
    for ch in name.chars() {
        if ch.is_whitespace() || ch == '_' {
            pending_gap = !normalized.is_empty();
            continue;
        }
        if pending_gap {
            normalized.push('_');
            pending_gap = false;
        }
        for lowered in ch.to_lowercase() {
            normalized.push(lowered);
        }
    }
    normalized
}

/// Title-cased human label: underscores split tokens, each capitalized.
pub fn display_name(normalized: &str) -> String {
    normalized.to_title_case()
}

/// Appends `_2`, `_3`, ... to repeated normalized names so the schema's
/// columns stay name-unique.
fn dedup_name(name: String, taken: &[String]) -> String {
    if !taken.contains(&name) {
        return name;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{name}_{suffix}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Runs the classifier over every column of the full row set and assembles
/// a [`DetectedSchema`]. Row count reflects the true total while preview
/// data keeps only the first 10 rows.
pub fn build_schema(table: &TableData) -> DetectedSchema {
    let mut names: Vec<String> = Vec::with_capacity(table.headers.len());
    for header in &table.headers {
        let normalized = normalize_column_name(header);
        let normalized = if normalized.is_empty() {
            format!("column_{}", names.len() + 1)
        } else {
            normalized
        };
        let unique = dedup_name(normalized, &names);
        names.push(unique);
    }

    let mut columns = Vec::with_capacity(names.len());
    let mut primary_date_claimed = false;
    for (index, name) in names.iter().enumerate() {
        let values = table.column_values(index);
        let stats: ColumnStats = classify::column_stats(values.iter().copied());
        let base = classify::classify_values(values.iter().copied(), &stats);
        let data_type = classify::refine_with_name(name, base, values.iter().copied(), &stats);

        let is_measure = data_type.is_measure();
        let is_dimension = !is_measure
            && (data_type.is_dimension_type()
                || (table.row_count() > 0
                    && (stats.cardinality as f64) < 0.5 * table.row_count() as f64));
        let is_primary_date = !primary_date_claimed
            && data_type.is_temporal()
            && classify::is_primary_date_name(name);
        if is_primary_date {
            primary_date_claimed = true;
        }

        columns.push(DetectedColumn {
            name: name.clone(),
            display_name: display_name(name),
            data_type,
            is_measure,
            is_dimension,
            is_primary_date,
            null_ratio: stats.null_ratio(),
            cardinality: stats.cardinality,
            sample_values: stats.sample_values,
        });
    }

    let preview_data = table
        .rows
        .iter()
        .take(PREVIEW_ROW_LIMIT)
        .map(|row| {
            names
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let value = row.get(idx).cloned().unwrap_or_default();
                    (name.clone(), value)
                })
                .collect()
        })
        .collect();

    DetectedSchema {
        columns,
        row_count: table.row_count(),
        preview_data,
    }
}
