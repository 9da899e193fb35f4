//! Dashboard value model: widgets, sections, and the generated dashboard.
//!
//! These are plain serde values handed to downstream collaborators (a
//! persistence layer that assigns durable ids, and renderers that draw the
//! widgets). A renderer is expected to skip unknown widget types rather
//! than error, so everything here stays inside the closed enums.

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::semantics::{IconTag, Variant};

/// The nine renderable widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Kpi,
    Line,
    Bar,
    Area,
    Pie,
    Funnel,
    Table,
    List,
    Heatmap,
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Kpi => "kpi",
            WidgetKind::Line => "line",
            WidgetKind::Bar => "bar",
            WidgetKind::Area => "area",
            WidgetKind::Pie => "pie",
            WidgetKind::Funnel => "funnel",
            WidgetKind::Table => "table",
            WidgetKind::List => "list",
            WidgetKind::Heatmap => "heatmap",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a metric column is aggregated inside a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

/// Display format for aggregated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    Number,
    Currency,
    Percentage,
}

/// Grid position in a 12-column system. `y` is the stacking row offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetLayout {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

pub const GRID_COLUMNS: u32 = 12;

/// Type-specific widget configuration. Only the fields relevant to the
/// widget's kind are populated; the rest stay off the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ValueFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// One renderable tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidget {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub title: String,
    pub config: WidgetConfig,
    pub layout: WidgetLayout,
}

/// Presentational grouping of widget ids; carries no persistence identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSection {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub widget_ids: Vec<String>,
}

/// A freshly generated dashboard. Ephemeral until a caller hands it to the
/// persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDashboard {
    pub name: String,
    pub description: String,
    pub dataset_id: String,
    pub widgets: Vec<DashboardWidget>,
    pub sections: Vec<DashboardSection>,
}

impl GeneratedDashboard {
    pub fn widget(&self, id: &str) -> Option<&DashboardWidget> {
        self.widgets.iter().find(|widget| widget.id == id)
    }

    pub fn widgets_of_kind(&self, kind: WidgetKind) -> Vec<&DashboardWidget> {
        self.widgets.iter().filter(|w| w.kind == kind).collect()
    }
}

/// Named heuristic strategy selecting which widgets to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Auto,
    Sales,
    Analytics,
    Overview,
}

impl Template {
    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Auto => "auto",
            Template::Sales => "sales",
            Template::Analytics => "analytics",
            Template::Overview => "overview",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Template {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Template::Auto),
            "sales" => Ok(Template::Sales),
            "analytics" => Ok(Template::Analytics),
            "overview" => Ok(Template::Overview),
            other => Err(anyhow!(
                "Unknown template '{other}'. Supported templates: auto, sales, analytics, overview"
            )),
        }
    }
}
