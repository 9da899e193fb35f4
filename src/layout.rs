//! Dashboard layout generation from a detected schema.
//!
//! Four template strategies (`auto`, `sales`, `analytics`, `overview`)
//! share one partitioning step and one grid model: widgets fill a
//! 12-column row left to right, and the vertical cursor advances by the
//! finished row's height (1 for KPI rows, 3 for chart rows, 4 for the
//! overview table). Each section builder takes the current cursor value
//! and returns the widgets it produced together with the new cursor, so
//! sections compose as a fold and test in isolation.
//!
//! Absence of qualifying columns is never an error: the affected widgets
//! and sections are simply omitted and the dashboard comes out sparser.

use crate::{
    classify::DataType,
    dashboard::{
        Aggregation, DashboardSection, DashboardWidget, GeneratedDashboard, Template, ValueFormat,
        WidgetConfig, WidgetKind, WidgetLayout, GRID_COLUMNS,
    },
    schema::{DetectedColumn, DetectedSchema},
    semantics,
};

const KPI_PRIMARY_LIMIT: usize = 5;
const KPI_SECONDARY_LIMIT: usize = 4;
const TREND_METRIC_LIMIT: usize = 4;
const KPI_ROW_HEIGHT: u32 = 1;
const CHART_ROW_HEIGHT: u32 = 3;
const OVERVIEW_TABLE_HEIGHT: u32 = 4;
const DETAIL_TABLE_COLUMN_LIMIT: usize = 6;
const OVERVIEW_TABLE_COLUMN_LIMIT: usize = 8;

const FUNNEL_DIMENSION_HINTS: &[&str] = &["status", "stage", "etapa"];
const SELLER_DIMENSION_HINTS: &[&str] =
    &["vendedor", "seller", "origem", "origin", "canal", "source"];
const REVENUE_MEASURE_HINTS: &[&str] = &["valor", "receita", "venda", "faturamento"];

/// Inputs for one generation call beyond the schema itself.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Opaque dataset reference copied into the dashboard; never dereferenced.
    pub dataset_id: String,
    pub template: Template,
    /// Overrides the schema's elected primary date column by name.
    pub primary_date_column: Option<String>,
}

impl GeneratorOptions {
    pub fn new(dataset_id: impl Into<String>, template: Template) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            template,
            primary_date_column: None,
        }
    }
}

/// Template-independent split of the schema's columns.
struct Partition<'a> {
    measures: Vec<&'a DetectedColumn>,
    dimensions: Vec<&'a DetectedColumn>,
    categories: Vec<&'a DetectedColumn>,
    primary_date: Option<&'a DetectedColumn>,
}

impl<'a> Partition<'a> {
    fn of(schema: &'a DetectedSchema, options: &GeneratorOptions) -> Self {
        let date_columns = schema.date_columns();
        let primary_date = options
            .primary_date_column
            .as_deref()
            .and_then(|name| date_columns.iter().find(|c| c.name == name).copied())
            .or_else(|| schema.primary_date_column())
            .or_else(|| date_columns.first().copied());
        Self {
            measures: schema.measures(),
            dimensions: schema.dimensions(),
            categories: schema.categories(),
            primary_date,
        }
    }

    fn dimension_matching(&self, hints: &[&str]) -> Option<&'a DetectedColumn> {
        self.dimensions
            .iter()
            .find(|column| hints.iter().any(|hint| column.name.contains(hint)))
            .copied()
    }

    /// First currency or revenue-named measure, falling back to the first
    /// measure of any kind.
    fn revenue_measure(&self) -> Option<&'a DetectedColumn> {
        self.measures
            .iter()
            .find(|column| {
                column.data_type == DataType::Currency
                    || REVENUE_MEASURE_HINTS
                        .iter()
                        .any(|hint| column.name.contains(hint))
            })
            .or_else(|| self.measures.first())
            .copied()
    }
}

/// Accumulates widgets and hands out deterministic per-kind ids.
#[derive(Default)]
struct WidgetSink {
    widgets: Vec<DashboardWidget>,
}

impl WidgetSink {
    fn push(
        &mut self,
        kind: WidgetKind,
        title: impl Into<String>,
        config: WidgetConfig,
        layout: WidgetLayout,
    ) -> String {
        let ordinal = self.widgets.iter().filter(|w| w.kind == kind).count() + 1;
        let id = format!("{kind}-{ordinal}");
        self.widgets.push(DashboardWidget {
            id: id.clone(),
            kind,
            title: title.into(),
            config,
            layout,
        });
        id
    }
}

fn kpi_row_width(count: usize, minimum: u32) -> u32 {
    if count == 0 {
        return GRID_COLUMNS;
    }
    (GRID_COLUMNS / count as u32).max(minimum)
}

fn kpi_format(data_type: DataType) -> ValueFormat {
    match data_type {
        DataType::Currency => ValueFormat::Currency,
        DataType::Percent => ValueFormat::Percentage,
        _ => ValueFormat::Number,
    }
}

fn measure_kpi_config(column: &DetectedColumn, aggregation: Aggregation) -> WidgetConfig {
    WidgetConfig {
        metric: Some(column.name.clone()),
        aggregation: Some(aggregation),
        format: Some(kpi_format(column.data_type)),
        icon: Some(semantics::icon_for(&column.name)),
        variant: Some(semantics::variant_for(&column.name, column.data_type)),
        description: Some(semantics::describe_field(
            &column.name,
            &column.display_name,
            column.data_type,
            aggregation,
        )),
        ..WidgetConfig::default()
    }
}

/// Emits one left-to-right KPI row and returns the new cursor.
fn kpi_row(
    sink: &mut WidgetSink,
    ids: &mut Vec<String>,
    columns: &[&DetectedColumn],
    min_width: u32,
    y: u32,
) -> u32 {
    if columns.is_empty() {
        return y;
    }
    let width = kpi_row_width(columns.len(), min_width);
    for (index, column) in columns.iter().enumerate() {
        let layout = WidgetLayout {
            x: index as u32 * width,
            y,
            w: width,
            h: KPI_ROW_HEIGHT,
        };
        let id = sink.push(
            WidgetKind::Kpi,
            column.display_name.clone(),
            measure_kpi_config(column, Aggregation::Sum),
            layout,
        );
        ids.push(id);
    }
    y + KPI_ROW_HEIGHT
}

fn insights_config() -> WidgetConfig {
    WidgetConfig {
        subtitle: Some("Principais destaques gerados a partir dos dados".to_string()),
        limit: Some(5),
        ..WidgetConfig::default()
    }
}

fn table_config(schema: &DetectedSchema, column_limit: usize, row_limit: usize) -> WidgetConfig {
    WidgetConfig {
        columns: schema
            .columns
            .iter()
            .take(column_limit)
            .map(|c| c.name.clone())
            .collect(),
        limit: Some(row_limit),
        ..WidgetConfig::default()
    }
}

fn trend_config(partition: &Partition<'_>, metrics: Vec<String>) -> WidgetConfig {
    WidgetConfig {
        metrics,
        date_column: partition.primary_date.map(|c| c.name.clone()),
        aggregation: Some(Aggregation::Sum),
        ..WidgetConfig::default()
    }
}

struct SectionBuild {
    section: Option<DashboardSection>,
    y: u32,
}

fn finish_section(
    title: &str,
    description: Option<&str>,
    ids: Vec<String>,
    y: u32,
) -> SectionBuild {
    let section = if ids.is_empty() {
        None
    } else {
        Some(DashboardSection {
            title: title.to_string(),
            description: description.map(str::to_string),
            widget_ids: ids,
        })
    };
    SectionBuild { section, y }
}

/// Generates a dashboard for the given schema, template, and options.
/// Never fails: missing qualifying columns degrade to fewer widgets.
pub fn generate(schema: &DetectedSchema, options: &GeneratorOptions) -> GeneratedDashboard {
    let partition = Partition::of(schema, options);
    let mut sink = WidgetSink::default();
    let mut sections = Vec::new();

    let builders: Vec<fn(&mut WidgetSink, &DetectedSchema, &Partition<'_>, u32) -> SectionBuild> =
        match options.template {
            Template::Auto => vec![
                auto_kpi_section,
                auto_trend_section,
                auto_dimension_section,
                auto_detail_section,
            ],
            Template::Sales => vec![sales_kpi_section, sales_trend_section, sales_detail_section],
            Template::Analytics => vec![
                analytics_kpi_section,
                analytics_trend_section,
                analytics_dimension_section,
                analytics_insights_section,
            ],
            Template::Overview => vec![overview_kpi_section, overview_table_section],
        };

    let mut y = 0u32;
    for builder in builders {
        let build = builder(&mut sink, schema, &partition, y);
        y = build.y;
        if let Some(section) = build.section {
            sections.push(section);
        }
    }

    let (name, description) = template_labels(options.template);
    GeneratedDashboard {
        name: name.to_string(),
        description: description.to_string(),
        dataset_id: options.dataset_id.clone(),
        widgets: sink.widgets,
        sections,
    }
}

fn template_labels(template: Template) -> (&'static str, &'static str) {
    match template {
        Template::Auto => (
            "Dashboard Automático",
            "Layout gerado automaticamente a partir do schema detectado",
        ),
        Template::Sales => (
            "Dashboard de Vendas",
            "Indicadores de receita, vendas e funil",
        ),
        Template::Analytics => (
            "Dashboard Analítico",
            "Métricas e tendências para análise exploratória",
        ),
        Template::Overview => ("Visão Geral", "Resumo dos principais campos do dataset"),
    }
}

// ---------------------------------------------------------------------------
// auto

fn auto_kpi_section(
    sink: &mut WidgetSink,
    _schema: &DetectedSchema,
    partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    let mut ids = Vec::new();
    let primary: Vec<&DetectedColumn> = partition
        .measures
        .iter()
        .take(KPI_PRIMARY_LIMIT)
        .copied()
        .collect();
    let secondary: Vec<&DetectedColumn> = partition
        .measures
        .iter()
        .skip(KPI_PRIMARY_LIMIT)
        .take(KPI_SECONDARY_LIMIT)
        .copied()
        .collect();
    let y = kpi_row(sink, &mut ids, &primary, 2, y);
    let y = kpi_row(sink, &mut ids, &secondary, 3, y);
    finish_section(
        "Indicadores Principais",
        Some("Principais métricas do dataset"),
        ids,
        y,
    )
}

fn auto_trend_section(
    sink: &mut WidgetSink,
    _schema: &DetectedSchema,
    partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    let Some(_date) = partition.primary_date else {
        return finish_section("Tendências", None, Vec::new(), y);
    };
    if partition.measures.is_empty() {
        return finish_section("Tendências", None, Vec::new(), y);
    }

    let funnel_dimension = partition.dimension_matching(FUNNEL_DIMENSION_HINTS);
    let companion = funnel_dimension.or_else(|| partition.categories.first().copied());
    let trend_width = if companion.is_some() { 8 } else { GRID_COLUMNS };

    let mut ids = Vec::new();
    let metrics = partition
        .measures
        .iter()
        .take(TREND_METRIC_LIMIT)
        .map(|c| c.name.clone())
        .collect();
    let id = sink.push(
        WidgetKind::Line,
        "Tendência ao Longo do Tempo",
        trend_config(partition, metrics),
        WidgetLayout {
            x: 0,
            y,
            w: trend_width,
            h: CHART_ROW_HEIGHT,
        },
    );
    ids.push(id);

    if let Some(dimension) = funnel_dimension {
        let id = sink.push(
            WidgetKind::Funnel,
            format!("Funil por {}", dimension.display_name),
            WidgetConfig {
                dimension: Some(dimension.name.clone()),
                aggregation: Some(Aggregation::Count),
                ..WidgetConfig::default()
            },
            WidgetLayout {
                x: 8,
                y,
                w: 4,
                h: CHART_ROW_HEIGHT,
            },
        );
        ids.push(id);
    } else if let Some(category) = partition.categories.first() {
        let id = sink.push(
            WidgetKind::Pie,
            format!("Distribuição por {}", category.display_name),
            WidgetConfig {
                dimension: Some(category.name.clone()),
                aggregation: Some(Aggregation::Count),
                ..WidgetConfig::default()
            },
            WidgetLayout {
                x: 8,
                y,
                w: 4,
                h: CHART_ROW_HEIGHT,
            },
        );
        ids.push(id);
    }

    finish_section(
        "Tendências",
        Some("Evolução temporal das métricas"),
        ids,
        y + CHART_ROW_HEIGHT,
    )
}

fn auto_dimension_section(
    sink: &mut WidgetSink,
    _schema: &DetectedSchema,
    partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    let Some(measure) = partition.measures.first() else {
        return finish_section("Análise Dimensional", None, Vec::new(), y);
    };
    let mut ids = Vec::new();
    for (index, dimension) in partition.dimensions.iter().take(2).enumerate() {
        let id = sink.push(
            WidgetKind::Bar,
            format!("{} por {}", measure.display_name, dimension.display_name),
            WidgetConfig {
                metric: Some(measure.name.clone()),
                dimension: Some(dimension.name.clone()),
                aggregation: Some(Aggregation::Sum),
                format: Some(kpi_format(measure.data_type)),
                ..WidgetConfig::default()
            },
            WidgetLayout {
                x: index as u32 * 6,
                y,
                w: 6,
                h: CHART_ROW_HEIGHT,
            },
        );
        ids.push(id);
    }
    let new_y = if ids.is_empty() { y } else { y + CHART_ROW_HEIGHT };
    finish_section(
        "Análise Dimensional",
        Some("Métricas agrupadas por dimensão"),
        ids,
        new_y,
    )
}

fn auto_detail_section(
    sink: &mut WidgetSink,
    schema: &DetectedSchema,
    _partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    let mut ids = Vec::new();
    let id = sink.push(
        WidgetKind::List,
        "Insights",
        insights_config(),
        WidgetLayout {
            x: 0,
            y,
            w: 6,
            h: CHART_ROW_HEIGHT,
        },
    );
    ids.push(id);
    let id = sink.push(
        WidgetKind::Table,
        "Dados Detalhados",
        table_config(schema, DETAIL_TABLE_COLUMN_LIMIT, 10),
        WidgetLayout {
            x: 6,
            y,
            w: 6,
            h: CHART_ROW_HEIGHT,
        },
    );
    ids.push(id);
    finish_section(
        "Detalhes",
        Some("Insights e amostra dos dados"),
        ids,
        y + CHART_ROW_HEIGHT,
    )
}

// ---------------------------------------------------------------------------
// sales

fn sales_kpi_section(
    sink: &mut WidgetSink,
    _schema: &DetectedSchema,
    partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    let Some(revenue) = partition.revenue_measure() else {
        return finish_section("Indicadores de Vendas", None, Vec::new(), y);
    };
    let width = kpi_row_width(4, 2);
    let mut ids = Vec::new();

    let mut place = |sink: &mut WidgetSink, index: u32, title: &str, config: WidgetConfig| {
        sink.push(
            WidgetKind::Kpi,
            title,
            config,
            WidgetLayout {
                x: index * width,
                y,
                w: width,
                h: KPI_ROW_HEIGHT,
            },
        )
    };

    ids.push(place(
        sink,
        0,
        "Receita Total",
        WidgetConfig {
            metric: Some(revenue.name.clone()),
            aggregation: Some(Aggregation::Sum),
            format: Some(ValueFormat::Currency),
            icon: Some(semantics::icon_for(&revenue.name)),
            variant: Some(semantics::variant_for(&revenue.name, revenue.data_type)),
            description: Some(semantics::describe_field(
                &revenue.name,
                &revenue.display_name,
                revenue.data_type,
                Aggregation::Sum,
            )),
            ..WidgetConfig::default()
        },
    ));
    ids.push(place(
        sink,
        1,
        "Total de Vendas",
        WidgetConfig {
            metric: Some(revenue.name.clone()),
            aggregation: Some(Aggregation::Count),
            format: Some(ValueFormat::Number),
            icon: Some(crate::semantics::IconTag::ShoppingCart),
            variant: Some(crate::semantics::Variant::Primary),
            description: Some("Vendas realizadas no período".to_string()),
            ..WidgetConfig::default()
        },
    ));
    ids.push(place(
        sink,
        2,
        "Ticket Médio",
        WidgetConfig {
            metric: Some(revenue.name.clone()),
            aggregation: Some(Aggregation::Avg),
            format: Some(ValueFormat::Currency),
            icon: Some(crate::semantics::IconTag::CreditCard),
            variant: Some(crate::semantics::Variant::Default),
            description: Some("Valor médio por venda".to_string()),
            ..WidgetConfig::default()
        },
    ));
    // TODO: replace the count-based placeholder with a real converted/total
    // ratio once a conversion event column is part of the schema model.
    ids.push(place(
        sink,
        3,
        "Taxa de Conversão",
        WidgetConfig {
            metric: Some(revenue.name.clone()),
            aggregation: Some(Aggregation::Count),
            format: Some(ValueFormat::Percentage),
            icon: Some(crate::semantics::IconTag::Target),
            variant: Some(crate::semantics::Variant::Success),
            description: Some("Taxa de conversão do funil".to_string()),
            ..WidgetConfig::default()
        },
    ));

    finish_section(
        "Indicadores de Vendas",
        Some("Receita, volume e conversão"),
        ids,
        y + KPI_ROW_HEIGHT,
    )
}

fn sales_trend_section(
    sink: &mut WidgetSink,
    _schema: &DetectedSchema,
    partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    let mut ids = Vec::new();
    let revenue = partition.revenue_measure();
    let funnel_dimension = partition.dimension_matching(FUNNEL_DIMENSION_HINTS);
    let mut new_y = y;

    if let (Some(_), Some(revenue)) = (partition.primary_date, revenue) {
        let trend_width = if funnel_dimension.is_some() { 8 } else { GRID_COLUMNS };
        let id = sink.push(
            WidgetKind::Line,
            "Receita ao Longo do Tempo",
            WidgetConfig {
                subtitle: Some("Receita e volume de vendas por período".to_string()),
                ..trend_config(partition, vec![revenue.name.clone()])
            },
            WidgetLayout {
                x: 0,
                y,
                w: trend_width,
                h: CHART_ROW_HEIGHT,
            },
        );
        ids.push(id);
        if let Some(dimension) = funnel_dimension {
            let id = sink.push(
                WidgetKind::Funnel,
                format!("Funil por {}", dimension.display_name),
                WidgetConfig {
                    dimension: Some(dimension.name.clone()),
                    aggregation: Some(Aggregation::Count),
                    ..WidgetConfig::default()
                },
                WidgetLayout {
                    x: 8,
                    y,
                    w: 4,
                    h: CHART_ROW_HEIGHT,
                },
            );
            ids.push(id);
        }
        new_y = y + CHART_ROW_HEIGHT;
    } else if let Some(dimension) = funnel_dimension {
        // No temporal axis: the funnel still earns a full-width slot.
        let id = sink.push(
            WidgetKind::Funnel,
            format!("Funil por {}", dimension.display_name),
            WidgetConfig {
                dimension: Some(dimension.name.clone()),
                aggregation: Some(Aggregation::Count),
                ..WidgetConfig::default()
            },
            WidgetLayout {
                x: 0,
                y,
                w: GRID_COLUMNS,
                h: CHART_ROW_HEIGHT,
            },
        );
        ids.push(id);
        new_y = y + CHART_ROW_HEIGHT;
    }

    finish_section(
        "Tendências",
        Some("Evolução da receita e funil de vendas"),
        ids,
        new_y,
    )
}

fn sales_detail_section(
    sink: &mut WidgetSink,
    _schema: &DetectedSchema,
    partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    let mut ids = Vec::new();
    let seller_dimension = partition
        .dimension_matching(SELLER_DIMENSION_HINTS)
        .or_else(|| partition.dimensions.first().copied());
    let bar = match (partition.revenue_measure(), seller_dimension) {
        (Some(measure), Some(dimension)) => {
            let id = sink.push(
                WidgetKind::Bar,
                format!("{} por {}", measure.display_name, dimension.display_name),
                WidgetConfig {
                    metric: Some(measure.name.clone()),
                    dimension: Some(dimension.name.clone()),
                    aggregation: Some(Aggregation::Sum),
                    format: Some(kpi_format(measure.data_type)),
                    ..WidgetConfig::default()
                },
                WidgetLayout {
                    x: 0,
                    y,
                    w: 6,
                    h: CHART_ROW_HEIGHT,
                },
            );
            ids.push(id);
            true
        }
        _ => false,
    };

    let (insights_x, insights_w) = if bar { (6, 6) } else { (0, GRID_COLUMNS) };
    let id = sink.push(
        WidgetKind::List,
        "Insights",
        insights_config(),
        WidgetLayout {
            x: insights_x,
            y,
            w: insights_w,
            h: CHART_ROW_HEIGHT,
        },
    );
    ids.push(id);

    finish_section(
        "Detalhes",
        Some("Desempenho por dimensão e destaques"),
        ids,
        y + CHART_ROW_HEIGHT,
    )
}

// ---------------------------------------------------------------------------
// analytics

fn analytics_kpi_section(
    sink: &mut WidgetSink,
    _schema: &DetectedSchema,
    partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    let mut ids = Vec::new();
    let measures: Vec<&DetectedColumn> = partition.measures.iter().take(4).copied().collect();
    let y = kpi_row(sink, &mut ids, &measures, 2, y);
    finish_section("Indicadores", None, ids, y)
}

fn analytics_trend_section(
    sink: &mut WidgetSink,
    _schema: &DetectedSchema,
    partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    if partition.primary_date.is_none() || partition.measures.is_empty() {
        return finish_section("Tendências", None, Vec::new(), y);
    }
    let metrics = partition
        .measures
        .iter()
        .take(TREND_METRIC_LIMIT)
        .map(|c| c.name.clone())
        .collect();
    let mut ids = Vec::new();
    let id = sink.push(
        WidgetKind::Line,
        "Tendência das Métricas",
        trend_config(partition, metrics),
        WidgetLayout {
            x: 0,
            y,
            w: GRID_COLUMNS,
            h: CHART_ROW_HEIGHT,
        },
    );
    ids.push(id);
    finish_section("Tendências", None, ids, y + CHART_ROW_HEIGHT)
}

fn analytics_dimension_section(
    sink: &mut WidgetSink,
    _schema: &DetectedSchema,
    partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    let Some(measure) = partition.measures.first() else {
        return finish_section("Dimensões", None, Vec::new(), y);
    };
    let mut ids = Vec::new();
    for (index, dimension) in partition.dimensions.iter().take(2).enumerate() {
        let id = sink.push(
            WidgetKind::Bar,
            format!("{} por {}", measure.display_name, dimension.display_name),
            WidgetConfig {
                metric: Some(measure.name.clone()),
                dimension: Some(dimension.name.clone()),
                aggregation: Some(Aggregation::Sum),
                format: Some(kpi_format(measure.data_type)),
                ..WidgetConfig::default()
            },
            WidgetLayout {
                x: index as u32 * 6,
                y,
                w: 6,
                h: CHART_ROW_HEIGHT,
            },
        );
        ids.push(id);
    }
    let new_y = if ids.is_empty() { y } else { y + CHART_ROW_HEIGHT };
    finish_section("Dimensões", None, ids, new_y)
}

fn analytics_insights_section(
    sink: &mut WidgetSink,
    _schema: &DetectedSchema,
    _partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    let mut ids = Vec::new();
    let id = sink.push(
        WidgetKind::List,
        "Insights",
        insights_config(),
        WidgetLayout {
            x: 0,
            y,
            w: GRID_COLUMNS,
            h: CHART_ROW_HEIGHT,
        },
    );
    ids.push(id);
    finish_section("Insights", None, ids, y + CHART_ROW_HEIGHT)
}

// ---------------------------------------------------------------------------
// overview

fn overview_kpi_section(
    sink: &mut WidgetSink,
    _schema: &DetectedSchema,
    partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    let mut ids = Vec::new();
    let measures: Vec<&DetectedColumn> = partition.measures.iter().take(4).copied().collect();
    let y = kpi_row(sink, &mut ids, &measures, 2, y);
    finish_section("Resumo", None, ids, y)
}

fn overview_table_section(
    sink: &mut WidgetSink,
    schema: &DetectedSchema,
    _partition: &Partition<'_>,
    y: u32,
) -> SectionBuild {
    let mut ids = Vec::new();
    let id = sink.push(
        WidgetKind::Table,
        "Dados",
        table_config(schema, OVERVIEW_TABLE_COLUMN_LIMIT, 15),
        WidgetLayout {
            x: 0,
            y,
            w: GRID_COLUMNS,
            h: OVERVIEW_TABLE_HEIGHT,
        },
    );
    ids.push(id);
    finish_section("Dados", None, ids, y + OVERVIEW_TABLE_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ingest, schema::build_schema};

    fn schema_from_csv(content: &str) -> DetectedSchema {
        build_schema(&ingest::parse_csv(content, None).expect("csv"))
    }

    fn options(template: Template) -> GeneratorOptions {
        GeneratorOptions::new("dataset-1", template)
    }

    #[test]
    fn auto_without_measures_emits_no_kpi_or_line_widgets() {
        let schema = schema_from_csv("created_at,status\n2024-01-01,novo\n2024-01-02,ganho\n");
        let dashboard = generate(&schema, &options(Template::Auto));
        assert!(dashboard.widgets_of_kind(WidgetKind::Kpi).is_empty());
        assert!(dashboard.widgets_of_kind(WidgetKind::Line).is_empty());
        for section in &dashboard.sections {
            assert!(!section.widget_ids.is_empty(), "{}", section.title);
        }
    }

    #[test]
    fn seven_measures_split_into_two_kpi_rows() {
        let schema = schema_from_csv(
            "m1,m2,m3,m4,m5,m6,m7\n10,20,30,40,50,60,70\n11,21,31,41,51,61,71\n",
        );
        let dashboard = generate(&schema, &options(Template::Auto));
        let kpis = dashboard.widgets_of_kind(WidgetKind::Kpi);
        assert_eq!(kpis.len(), 7);
        let first_row: Vec<_> = kpis.iter().filter(|w| w.layout.y == 0).collect();
        let second_row: Vec<_> = kpis.iter().filter(|w| w.layout.y == 1).collect();
        assert_eq!(first_row.len(), 5);
        assert!(first_row.iter().all(|w| w.layout.w == 2));
        assert_eq!(second_row.len(), 2);
        assert!(second_row.iter().all(|w| w.layout.w == 6));
    }

    #[test]
    fn widgets_never_overflow_the_grid() {
        let schema = schema_from_csv(
            "created_at,status,valor,quantidade\n2024-01-01,novo,R$ 10,1\n2024-01-02,ganho,R$ 20,2\n",
        );
        for template in [
            Template::Auto,
            Template::Sales,
            Template::Analytics,
            Template::Overview,
        ] {
            let dashboard = generate(&schema, &options(template));
            for widget in &dashboard.widgets {
                assert!(
                    widget.layout.x + widget.layout.w <= GRID_COLUMNS,
                    "{template}: widget {} overflows",
                    widget.id
                );
            }
        }
    }

    #[test]
    fn widget_ids_are_unique_and_deterministic() {
        let schema = schema_from_csv("valor,status\nR$ 10,novo\nR$ 20,ganho\n");
        let first = generate(&schema, &options(Template::Sales));
        let second = generate(&schema, &options(Template::Sales));
        let ids: Vec<_> = first.widgets.iter().map(|w| w.id.clone()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids.len(), sorted.len());
        assert_eq!(
            ids,
            second.widgets.iter().map(|w| w.id.clone()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn sales_template_builds_fixed_kpi_quartet() {
        let schema = schema_from_csv(
            "data_venda,valor,status\n2024-01-01,R$ 100,novo\n2024-01-02,R$ 200,ganho\n",
        );
        let dashboard = generate(&schema, &options(Template::Sales));
        let titles: Vec<&str> = dashboard
            .widgets_of_kind(WidgetKind::Kpi)
            .iter()
            .map(|w| w.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "Receita Total",
                "Total de Vendas",
                "Ticket Médio",
                "Taxa de Conversão"
            ]
        );
        assert_eq!(dashboard.widgets_of_kind(WidgetKind::Funnel).len(), 1);
    }

    #[test]
    fn overview_table_is_full_width_and_tall() {
        let schema = schema_from_csv("valor,status\nR$ 10,novo\nR$ 20,ganho\n");
        let dashboard = generate(&schema, &options(Template::Overview));
        let tables = dashboard.widgets_of_kind(WidgetKind::Table);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].layout.w, GRID_COLUMNS);
        assert_eq!(tables[0].layout.h, OVERVIEW_TABLE_HEIGHT);
    }

    #[test]
    fn primary_date_override_feeds_the_trend_widget() {
        let schema = schema_from_csv(
            "created_at,data_envio,valor\n2024-01-01,2024-02-01,10\n2024-01-02,2024-02-02,20\n",
        );
        let mut opts = options(Template::Analytics);
        opts.primary_date_column = Some("data_envio".to_string());
        let dashboard = generate(&schema, &opts);
        let line = &dashboard.widgets_of_kind(WidgetKind::Line)[0];
        assert_eq!(line.config.date_column.as_deref(), Some("data_envio"));
    }
}
