//! Column type classification over sampled raw values.
//!
//! This module owns the [`DataType`] enum (10 semantic types) and the
//! classification engine that decides one type per column from its raw
//! string values. Rules run in strict precedence order over the non-empty
//! subset of samples; a rule claims the column only when every value
//! satisfies it, so a single mixed value cascades to the next rule.
//!
//! Precedence: boolean, datetime, date, numeric (currency/number/integer),
//! category, text. Name-driven refinements for `id` and `percent` run after
//! the base decision and only touch columns the base rules cannot lose.

use std::{fmt, str::FromStr};

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const CATEGORY_MAX_DISTINCT: usize = 20;
const CATEGORY_MAX_DISTINCT_RATIO: f64 = 0.5;
const CATEGORY_MIN_SAMPLES: usize = 10;
const SAMPLE_VALUE_LIMIT: usize = 5;

const BOOLEAN_TOKENS: &[&str] = &["true", "false", "sim", "não", "yes", "no", "1", "0"];
const CURRENCY_MARKERS: &[&str] = &["R$", "$", "€", "£", "USD"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Semantic type of a detected column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Text,
    Integer,
    Number,
    Currency,
    Date,
    Datetime,
    Boolean,
    Category,
    Id,
    Percent,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Integer => "integer",
            DataType::Number => "number",
            DataType::Currency => "currency",
            DataType::Date => "date",
            DataType::Datetime => "datetime",
            DataType::Boolean => "boolean",
            DataType::Category => "category",
            DataType::Id => "id",
            DataType::Percent => "percent",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &[
            "text", "integer", "number", "currency", "date", "datetime", "boolean", "category",
            "id", "percent",
        ]
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::Date | DataType::Datetime)
    }

    pub fn is_measure(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Number | DataType::Currency)
    }

    pub fn is_dimension_type(&self) -> bool {
        matches!(
            self,
            DataType::Date
                | DataType::Datetime
                | DataType::Text
                | DataType::Category
                | DataType::Boolean
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "string" => Ok(DataType::Text),
            "integer" | "int" => Ok(DataType::Integer),
            "number" | "float" | "double" => Ok(DataType::Number),
            "currency" => Ok(DataType::Currency),
            "date" => Ok(DataType::Date),
            "datetime" | "timestamp" => Ok(DataType::Datetime),
            "boolean" | "bool" => Ok(DataType::Boolean),
            "category" => Ok(DataType::Category),
            "id" => Ok(DataType::Id),
            "percent" | "percentage" => Ok(DataType::Percent),
            other => Err(anyhow!(
                "Unknown data type '{other}'. Supported types: {}",
                DataType::variants().join(", ")
            )),
        }
    }
}

/// Per-column statistics gathered in the same pass as classification.
#[derive(Debug, Clone, Default)]
pub struct ColumnStats {
    pub non_empty: usize,
    pub total: usize,
    pub cardinality: usize,
    pub sample_values: Vec<String>,
}

impl ColumnStats {
    pub fn null_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.total - self.non_empty) as f64 / self.total as f64
    }
}

pub fn column_stats<'a, I>(values: I) -> ColumnStats
where
    I: IntoIterator<Item = &'a str>,
{
    let mut stats = ColumnStats::default();
    let mut distinct: Vec<&str> = Vec::new();
    for value in values {
        stats.total += 1;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        stats.non_empty += 1;
        if !distinct.contains(&trimmed) {
            distinct.push(trimmed);
            if stats.sample_values.len() < SAMPLE_VALUE_LIMIT {
                stats.sample_values.push(trimmed.to_string());
            }
        }
    }
    stats.cardinality = distinct.len();
    stats
}

/// One numeric sample after currency/separator normalization.
#[derive(Debug, Clone, Copy)]
struct NumericObservation {
    has_currency_marker: bool,
    has_meaningful_decimal: bool,
}

/// Strips currency markers and spaces, then normalizes a trailing
/// comma-decimal to a dot (`1.500,00` → `1500.00`, `2,5` → `2.5`). A comma
/// counts as the decimal separator only when at most two digits follow it,
/// so English thousands groups (`1,234,567`) stay integral.
/// Returns `None` when the remainder is not a finite number.
fn analyze_numeric_token(raw: &str) -> Option<NumericObservation> {
    let mut body = raw.trim().to_string();
    let mut has_currency_marker = false;
    for marker in CURRENCY_MARKERS {
        if body.to_ascii_uppercase().contains(&marker.to_ascii_uppercase()) {
            has_currency_marker = true;
        }
        // `R$` must go before `$` so both characters are removed together.
        body = body.replace(marker, "");
    }
    body.retain(|c| !c.is_whitespace());
    if body.is_empty() {
        return None;
    }

    let last_comma = body.rfind(',');
    let last_dot = body.rfind('.');
    let normalized = match (last_comma, last_dot) {
        (Some(comma), dot) if dot.is_none_or(|d| comma > d) && body.len() - comma <= 3 => {
            // Comma is the decimal separator; dots are thousands markers.
            let mut cleaned = body.replace('.', "");
            let comma = cleaned.rfind(',').unwrap_or(comma);
            cleaned.replace_range(comma..=comma, ".");
            cleaned.replace(',', "")
        }
        _ => body.replace(',', ""),
    };

    let parsed: f64 = normalized.parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    let has_meaningful_decimal = normalized.contains('.') && !normalized.ends_with(".00");
    Some(NumericObservation {
        has_currency_marker,
        has_meaningful_decimal,
    })
}

fn is_boolean_token(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    BOOLEAN_TOKENS.contains(&lowered.as_str())
}

pub fn parse_naive_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

pub fn parse_naive_datetime(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Match tallies for one column. Mirrors the sample pass: each counter
/// records how many non-empty values satisfied the corresponding rule, and
/// [`TypeTally::decide`] claims the highest-precedence rule that matched
/// every value.
#[derive(Debug, Clone, Default)]
struct TypeTally {
    non_empty: usize,
    boolean_matches: usize,
    datetime_matches: usize,
    date_matches: usize,
    numeric_matches: usize,
    currency_marker_hits: usize,
    meaningful_decimal_hits: usize,
}

impl TypeTally {
    fn update(&mut self, value: &str) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        self.non_empty += 1;

        if is_boolean_token(trimmed) {
            self.boolean_matches += 1;
        }
        if parse_naive_datetime(trimmed).is_some() {
            self.datetime_matches += 1;
        }
        if parse_naive_date(trimmed).is_some() {
            self.date_matches += 1;
        }
        if let Some(observation) = analyze_numeric_token(trimmed) {
            self.numeric_matches += 1;
            if observation.has_currency_marker {
                self.currency_marker_hits += 1;
            }
            if observation.has_meaningful_decimal {
                self.meaningful_decimal_hits += 1;
            }
        }
    }

    fn unanimous(&self, count: usize) -> bool {
        self.non_empty > 0 && count == self.non_empty
    }

    fn decide(&self, stats: &ColumnStats) -> DataType {
        if self.non_empty == 0 {
            return DataType::Text;
        }
        if self.unanimous(self.boolean_matches) {
            return DataType::Boolean;
        }
        if self.unanimous(self.datetime_matches) {
            return DataType::Datetime;
        }
        if self.unanimous(self.date_matches) {
            return DataType::Date;
        }
        if self.unanimous(self.numeric_matches) {
            if self.currency_marker_hits > 0 {
                return DataType::Currency;
            }
            if self.meaningful_decimal_hits > 0 {
                return DataType::Number;
            }
            return DataType::Integer;
        }
        let distinct_ratio = stats.cardinality as f64 / self.non_empty as f64;
        if stats.cardinality <= CATEGORY_MAX_DISTINCT
            && distinct_ratio < CATEGORY_MAX_DISTINCT_RATIO
            && self.non_empty >= CATEGORY_MIN_SAMPLES
        {
            return DataType::Category;
        }
        DataType::Text
    }
}

/// Classifies one column from its raw sampled values.
pub fn classify_values<'a, I>(values: I, stats: &ColumnStats) -> DataType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tally = TypeTally::default();
    for value in values {
        tally.update(value);
    }
    tally.decide(stats)
}

/// Name/value refinements into `id`/`percent`. These only promote columns
/// the base rules classified as text or plain numeric, so rule precedence
/// is unaffected for everything else.
pub fn refine_with_name<'a, I>(name: &str, base: DataType, values: I, stats: &ColumnStats) -> DataType
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let lowered = name.to_lowercase();
    let id_like_name = lowered == "id" || lowered.ends_with("_id");

    match base {
        DataType::Text => {
            let non_empty = values
                .clone()
                .into_iter()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .collect_vec();
            if !non_empty.is_empty() && non_empty.iter().all(|v| Uuid::parse_str(v).is_ok()) {
                return DataType::Id;
            }
            if !non_empty.is_empty()
                && non_empty
                    .iter()
                    .all(|v| v.ends_with('%') && analyze_numeric_token(&v[..v.len() - 1]).is_some())
            {
                return DataType::Percent;
            }
            if id_like_name && stats.cardinality == stats.non_empty && stats.non_empty > 0 {
                return DataType::Id;
            }
            base
        }
        DataType::Integer | DataType::Number => {
            if percent_like_name(&lowered) {
                return DataType::Percent;
            }
            if id_like_name && stats.cardinality == stats.non_empty && stats.non_empty > 0 {
                return DataType::Id;
            }
            base
        }
        _ => base,
    }
}

fn percent_like_name(lowered: &str) -> bool {
    lowered.contains("percent")
        || lowered.contains("taxa")
        || lowered.contains("pct")
        || lowered.contains('%')
}

/// True when a date-typed column's name marks it as the temporal axis.
pub fn is_primary_date_name(name: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered.contains("data")
        || lowered.contains("date")
        || lowered == "created_at"
        || lowered == "updated_at"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_for(values: &[&str]) -> ColumnStats {
        column_stats(values.iter().copied())
    }

    #[test]
    fn brazilian_currency_samples_classify_as_currency() {
        let values = ["R$ 1.500,00", "R$ 2.300,50"];
        let stats = stats_for(&values);
        assert_eq!(classify_values(values, &stats), DataType::Currency);
    }

    #[test]
    fn comma_decimal_normalization_parses_thousands() {
        let observation = analyze_numeric_token("R$ 1.500,00").expect("numeric");
        assert!(observation.has_currency_marker);
        assert!(!observation.has_meaningful_decimal);
        assert!(analyze_numeric_token("2,5").expect("numeric").has_meaningful_decimal);
    }

    #[test]
    fn english_thousands_groups_stay_integral() {
        let observation = analyze_numeric_token("1,234,567").expect("numeric");
        assert!(!observation.has_meaningful_decimal);
        let values = ["1,234,567", "2,000,000"];
        let stats = stats_for(&values);
        assert_eq!(classify_values(values, &stats), DataType::Integer);
        // Brazilian grouping keeps its two-digit decimal comma.
        assert!(
            analyze_numeric_token("1.234.567,89")
                .expect("numeric")
                .has_meaningful_decimal
        );
    }

    #[test]
    fn boolean_rule_precedes_numeric_for_zero_one() {
        let values = ["1", "0", "1", "0"];
        let stats = stats_for(&values);
        assert_eq!(classify_values(values, &stats), DataType::Boolean);
    }

    #[test]
    fn numeric_rule_precedes_category() {
        let values = ["10", "20", "10", "20", "10", "20", "10", "20", "10", "20", "10"];
        let stats = stats_for(&values);
        assert_eq!(classify_values(values, &stats), DataType::Integer);
    }

    #[test]
    fn repeated_labels_classify_as_category() {
        let values = [
            "novo",
            "qualificado",
            "novo",
            "qualificado",
            "novo",
            "qualificado",
            "novo",
            "qualificado",
            "novo",
            "qualificado",
            "novo",
        ];
        let stats = stats_for(&values);
        assert_eq!(stats.cardinality, 2);
        assert_eq!(classify_values(values, &stats), DataType::Category);
    }

    #[test]
    fn mixed_values_cascade_to_text() {
        let values = ["2024-01-01", "not a date", "2024-01-02"];
        let stats = stats_for(&values);
        assert_eq!(classify_values(values, &stats), DataType::Text);
    }

    #[test]
    fn empty_samples_fall_back_to_text() {
        let values: [&str; 2] = ["", "  "];
        let stats = stats_for(&values);
        assert_eq!(classify_values(values, &stats), DataType::Text);
    }

    #[test]
    fn datetime_wins_over_date_when_time_present() {
        let values = ["2024-01-15T08:30", "2024-02-20 09:00"];
        let stats = stats_for(&values);
        assert_eq!(classify_values(values, &stats), DataType::Datetime);
    }

    #[test]
    fn uuid_values_refine_to_id() {
        let values = [
            "6a5fc3d0-3c2e-4b41-bb0f-0f6f9ef4a001",
            "6a5fc3d0-3c2e-4b41-bb0f-0f6f9ef4a002",
        ];
        let stats = stats_for(&values);
        let base = classify_values(values, &stats);
        assert_eq!(refine_with_name("token", base, values, &stats), DataType::Id);
    }

    #[test]
    fn percent_name_refines_numeric_column() {
        let values = ["0.12", "0.37"];
        let stats = stats_for(&values);
        let base = classify_values(values, &stats);
        assert_eq!(
            refine_with_name("taxa_conversao", base, values, &stats),
            DataType::Percent
        );
    }

    #[test]
    fn primary_date_names() {
        assert!(is_primary_date_name("created_at"));
        assert!(is_primary_date_name("data_criacao"));
        assert!(is_primary_date_name("order_date"));
        assert!(!is_primary_date_name("updated"));
    }
}
