mod common;

use assert_cmd::Command;
use common::TestWorkspace;
use dashgen::schema::DetectedSchema;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const SALES_CSV: &str = "\
created_at;valor;status;vendedor
2024-01-01;R$ 1.500,00;novo;Ana
2024-01-02;R$ 2.300,50;ganho;Bruno
2024-01-03;R$ 900,00;perdido;Ana
";

fn dashgen() -> Command {
    Command::cargo_bin("dashgen").expect("binary exists")
}

#[test]
fn detect_writes_schema_with_sniffed_semicolon_delimiter() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("vendas.csv", SALES_CSV);
    let schema_path = workspace.path().join("vendas.yaml");

    dashgen()
        .args([
            "detect",
            "-i",
            csv_path.to_str().unwrap(),
            "-s",
            schema_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("valor"))
        .stdout(contains("currency"));

    let schema = DetectedSchema::load(&schema_path).expect("load schema");
    assert_eq!(schema.row_count, 3);
    assert!(schema.column("valor").expect("valor").is_measure);
    assert!(schema.column("created_at").expect("created_at").is_primary_date);
}

#[test]
fn columns_lists_saved_schema() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("vendas.csv", SALES_CSV);
    let schema_path = workspace.path().join("vendas.yaml");

    dashgen()
        .args([
            "detect",
            "-i",
            csv_path.to_str().unwrap(),
            "-s",
            schema_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    dashgen()
        .args(["columns", "-s", schema_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("vendedor"))
        .stdout(contains("primary date"));
}

#[test]
fn preview_prints_first_rows() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("vendas.csv", SALES_CSV);

    dashgen()
        .args(["preview", "-i", csv_path.to_str().unwrap(), "-n", "1"])
        .assert()
        .success()
        .stdout(contains("Ana"))
        .stdout(contains("Bruno").not());
}

#[test]
fn generate_produces_sales_dashboard_json() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("vendas.csv", SALES_CSV);
    let dashboard_path = workspace.path().join("dashboard.json");

    dashgen()
        .args([
            "generate",
            "-i",
            csv_path.to_str().unwrap(),
            "-o",
            dashboard_path.to_str().unwrap(),
            "--template",
            "sales",
            "--dataset-id",
            "ds-42",
        ])
        .assert()
        .success();

    let raw = std::fs::read_to_string(&dashboard_path).expect("read dashboard");
    let dashboard: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    assert_eq!(dashboard["datasetId"], "ds-42");
    let widgets = dashboard["widgets"].as_array().expect("widgets");
    assert!(widgets.iter().any(|w| w["title"] == "Receita Total"));
    assert!(widgets.iter().any(|w| w["type"] == "funnel"));
}

#[test]
fn generate_from_saved_schema_matches_generate_from_data() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("vendas.csv", SALES_CSV);
    let schema_path = workspace.path().join("vendas.yaml");

    dashgen()
        .args([
            "detect",
            "-i",
            csv_path.to_str().unwrap(),
            "-s",
            schema_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let from_data = dashgen()
        .args(["generate", "-i", csv_path.to_str().unwrap()])
        .output()
        .expect("run generate");
    let from_schema = dashgen()
        .args(["generate", "-s", schema_path.to_str().unwrap()])
        .output()
        .expect("run generate");
    assert_eq!(
        String::from_utf8_lossy(&from_data.stdout),
        String::from_utf8_lossy(&from_schema.stdout)
    );
}

#[test]
fn xlsx_input_is_rejected_with_conversion_hint() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("planilha.xlsx", "not really a spreadsheet");

    dashgen()
        .args(["detect", "-i", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("export the sheet as CSV"));
}

#[test]
fn empty_file_reports_descriptive_error() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("vazio.csv", "");

    dashgen()
        .args(["detect", "-i", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("empty"));
}

#[test]
fn generate_rejects_unknown_date_column() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("vendas.csv", SALES_CSV);

    dashgen()
        .args([
            "generate",
            "-i",
            csv_path.to_str().unwrap(),
            "--date-column",
            "nao_existe",
        ])
        .assert()
        .failure()
        .stderr(contains("nao_existe"));
}
