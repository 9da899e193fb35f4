use dashgen::classify::DataType;
use dashgen::dashboard::{GRID_COLUMNS, Template, WidgetKind};
use dashgen::layout::{GeneratorOptions, generate};
use dashgen::schema::{DetectedColumn, DetectedSchema};
use proptest::prelude::*;

fn column(name: &str, data_type: DataType) -> DetectedColumn {
    DetectedColumn {
        name: name.to_string(),
        display_name: name.to_string(),
        data_type,
        is_measure: data_type.is_measure(),
        is_dimension: data_type.is_dimension_type(),
        is_primary_date: false,
        null_ratio: 0.0,
        cardinality: 10,
        sample_values: Vec::new(),
    }
}

fn synthetic_schema(measures: usize, dimensions: usize, with_date: bool) -> DetectedSchema {
    let mut columns = Vec::new();
    if with_date {
        let mut date = column("data_referencia", DataType::Date);
        date.is_primary_date = true;
        columns.push(date);
    }
    for i in 0..measures {
        columns.push(column(&format!("metrica_{i}"), DataType::Integer));
    }
    for i in 0..dimensions {
        columns.push(column(&format!("grupo_{i}"), DataType::Category));
    }
    DetectedSchema {
        columns,
        row_count: 100,
        preview_data: Vec::new(),
    }
}

fn options(template: Template) -> GeneratorOptions {
    GeneratorOptions::new("ds-test", template)
}

proptest! {
    #[test]
    fn no_widget_ever_overflows_the_grid(
        measures in 0usize..12,
        dimensions in 0usize..5,
        with_date in any::<bool>(),
        template_index in 0usize..4,
    ) {
        let templates = [
            Template::Auto,
            Template::Sales,
            Template::Analytics,
            Template::Overview,
        ];
        let schema = synthetic_schema(measures, dimensions, with_date);
        let dashboard = generate(&schema, &options(templates[template_index]));
        for widget in &dashboard.widgets {
            prop_assert!(widget.layout.x + widget.layout.w <= GRID_COLUMNS);
            prop_assert!(widget.layout.w >= 1);
            prop_assert!(widget.layout.h >= 1);
        }
    }

    #[test]
    fn every_section_references_existing_widgets(
        measures in 0usize..12,
        dimensions in 0usize..5,
        with_date in any::<bool>(),
    ) {
        let schema = synthetic_schema(measures, dimensions, with_date);
        let dashboard = generate(&schema, &options(Template::Auto));
        for section in &dashboard.sections {
            prop_assert!(!section.widget_ids.is_empty());
            for id in &section.widget_ids {
                prop_assert!(dashboard.widget(id).is_some());
            }
        }
    }
}

#[test]
fn auto_prefers_funnel_over_pie_for_status_dimensions() {
    let mut schema = synthetic_schema(2, 0, true);
    schema.columns.push(column("status_lead", DataType::Category));
    let dashboard = generate(&schema, &options(Template::Auto));
    assert_eq!(dashboard.widgets_of_kind(WidgetKind::Funnel).len(), 1);
    assert!(dashboard.widgets_of_kind(WidgetKind::Pie).is_empty());
}

#[test]
fn auto_falls_back_to_pie_without_status_dimension() {
    let mut schema = synthetic_schema(2, 0, true);
    schema.columns.push(column("regiao", DataType::Category));
    let dashboard = generate(&schema, &options(Template::Auto));
    assert!(dashboard.widgets_of_kind(WidgetKind::Funnel).is_empty());
    assert_eq!(dashboard.widgets_of_kind(WidgetKind::Pie).len(), 1);
}

#[test]
fn trend_takes_full_width_without_a_companion_widget() {
    let schema = synthetic_schema(1, 0, true);
    let dashboard = generate(&schema, &options(Template::Auto));
    let lines = dashboard.widgets_of_kind(WidgetKind::Line);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].layout.w, GRID_COLUMNS);
}

#[test]
fn kpi_rows_advance_the_cursor_before_charts() {
    let schema = synthetic_schema(3, 1, true);
    let dashboard = generate(&schema, &options(Template::Auto));
    let kpi_y = dashboard.widgets_of_kind(WidgetKind::Kpi)[0].layout.y;
    let line_y = dashboard.widgets_of_kind(WidgetKind::Line)[0].layout.y;
    assert_eq!(kpi_y, 0);
    assert_eq!(line_y, 1);
}

#[test]
fn generated_dashboard_serializes_with_camel_case_keys() {
    let schema = synthetic_schema(1, 1, true);
    let dashboard = generate(&schema, &options(Template::Auto));
    let json = serde_json::to_value(&dashboard).expect("serialize");
    assert!(json.get("datasetId").is_some());
    let widget = &json["widgets"][0];
    assert!(widget.get("type").is_some());
    assert!(widget["layout"].get("x").is_some());
    let section = &json["sections"][0];
    assert!(section.get("widgetIds").is_some());
}
