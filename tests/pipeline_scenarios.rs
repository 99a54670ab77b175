use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sales_inventory_analysis::error::{AnalysisError, TableKind};
use sales_inventory_analysis::example_data::{example_inventory, example_sales};
use sales_inventory_analysis::processing::{add_line_revenue, low_inventory, summarize_by_category};
use sales_inventory_analysis::pipeline::{run_analysis, run_pipeline, DataOrigin, PipelineOptions, PipelineState};

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sales-analysis-{name}-{nanos}"))
}

fn options(sales: impl Into<PathBuf>, inventory: impl Into<PathBuf>, output_dir: &PathBuf) -> PipelineOptions {
    PipelineOptions {
        sales_path: sales.into(),
        inventory_path: inventory.into(),
        output_dir: output_dir.clone(),
        ..Default::default()
    }
}

#[test]
fn scenario_a_category_summary() {
    let out_dir = tmp_dir("scenario-a");
    let out = run_pipeline(&options(
        "tests/fixtures/sales.csv",
        "tests/fixtures/inventory.csv",
        &out_dir,
    ))
    .unwrap();

    assert_eq!(out.origin, DataOrigin::Loaded);
    let summary = &out.category_summary;
    assert_eq!(summary.len(), 2);

    assert_eq!(summary[0].category, "Electronics");
    assert_eq!(summary[0].total_revenue, 30.0);
    assert_eq!(summary[0].sale_count, 2);
    assert!((summary[0].revenue_share_pct - 85.71).abs() < 0.01);

    assert_eq!(summary[1].category, "Home");
    assert_eq!(summary[1].total_revenue, 5.0);
    assert_eq!(summary[1].sale_count, 1);
    assert!((summary[1].revenue_share_pct - 14.29).abs() < 0.01);

    let _ = std::fs::remove_dir_all(&out_dir);
}

#[test]
fn scenario_b_low_inventory() {
    let out_dir = tmp_dir("scenario-b");
    let out = run_pipeline(&options(
        "tests/fixtures/sales.csv",
        "tests/fixtures/inventory.csv",
        &out_dir,
    ))
    .unwrap();

    assert_eq!(out.low_inventory.len(), 1);
    assert_eq!(out.low_inventory[0].product, "Prod_2");
    assert_eq!(out.low_inventory[0].available_quantity, 3);

    let _ = std::fs::remove_dir_all(&out_dir);
}

#[test]
fn scenario_c_missing_sales_without_fallback() {
    let out_dir = tmp_dir("scenario-c");
    let err = run_pipeline(&options(
        "tests/fixtures/no_such_sales.csv",
        "tests/fixtures/inventory.csv",
        &out_dir,
    ))
    .unwrap_err();

    assert_eq!(err.stage, PipelineState::Loading);
    match &err.error {
        AnalysisError::SourceNotFound { table, path } => {
            assert_eq!(*table, TableKind::Sales);
            assert_eq!(path, &PathBuf::from("tests/fixtures/no_such_sales.csv"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!out_dir.exists());
}

#[test]
fn scenario_d_missing_sales_with_fallback() {
    let out_dir = tmp_dir("scenario-d");
    let out = run_pipeline(&PipelineOptions {
        allow_example_fallback: true,
        ..options("tests/fixtures/no_such_sales.csv", "tests/fixtures/inventory.csv", &out_dir)
    })
    .unwrap();

    assert_eq!(out.origin, DataOrigin::Example);
    assert!(!out.category_summary.is_empty());

    let low: Vec<(&str, u64)> = out
        .low_inventory
        .iter()
        .map(|i| (i.product.as_str(), i.available_quantity))
        .collect();
    assert_eq!(low, vec![("Prod_2", 3), ("Prod_5", 5), ("Prod_3", 8)]);

    let order: Vec<(&str, f64)> = out
        .category_summary
        .iter()
        .map(|s| (s.category.as_str(), s.total_revenue))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Alimentos", 1300.0),
            ("Juguetes", 937.5),
            ("Hogar", 675.0),
            ("Ropa", 440.0),
            ("Electrónicos", 367.5),
        ]
    );
    assert!(out.category_summary.iter().all(|s| s.sale_count == 10));
    assert!(out.artifacts.summary.is_file());
    assert!(out.artifacts.low_inventory.is_file());

    let _ = std::fs::remove_dir_all(&out_dir);
}

#[test]
fn scenario_e_missing_category_column_stops_before_aggregation() {
    let out_dir = tmp_dir("scenario-e");
    let err = run_pipeline(&options(
        "tests/fixtures/sales_missing_category.csv",
        "tests/fixtures/inventory.csv",
        &out_dir,
    ))
    .unwrap_err();

    assert_eq!(err.stage, PipelineState::Validating);
    match &err.error {
        AnalysisError::Schema { table, missing } => {
            assert_eq!(*table, TableKind::Sales);
            assert_eq!(missing, &vec!["categoria".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!out_dir.exists());
}

#[test]
fn missing_inventory_is_also_a_missing_source() {
    let out_dir = tmp_dir("missing-inventory");
    let err = run_pipeline(&options("tests/fixtures/sales.csv", "tests/fixtures/nope.xlsx", &out_dir)).unwrap_err();
    assert!(matches!(
        err.error,
        AnalysisError::SourceNotFound {
            table: TableKind::Inventory,
            ..
        }
    ));
    assert!(!out_dir.exists());
}

#[test]
fn malformed_input_is_never_replaced_by_example_data() {
    let out_dir = tmp_dir("malformed");
    let err = run_pipeline(&PipelineOptions {
        allow_example_fallback: true,
        ..options("tests/fixtures/sales_bad_date.csv", "tests/fixtures/inventory.csv", &out_dir)
    })
    .unwrap_err();

    assert_eq!(err.stage, PipelineState::Loading);
    assert!(matches!(err.error, AnalysisError::Load { table: TableKind::Sales, .. }));
    assert!(!out_dir.exists());
}

#[test]
fn unknown_input_format_is_a_load_error() {
    let out_dir = tmp_dir("unknown-format");
    let err = run_pipeline(&options("Cargo.toml", "tests/fixtures/inventory.csv", &out_dir)).unwrap_err();
    assert!(matches!(err.error, AnalysisError::Load { .. }));
    assert!(err.to_string().contains("extension 'toml'"), "{err}");
}

#[test]
fn run_analysis_uses_default_output_dir_name() {
    // Fails before exporting, so nothing is created in the working directory.
    let err = run_analysis("tests/fixtures/no_such_sales.csv", "tests/fixtures/inventory.csv", false).unwrap_err();
    assert_eq!(err.stage, PipelineState::Loading);
}

#[test]
fn revenue_is_conserved_and_shares_sum_to_one_hundred() {
    let lines = add_line_revenue(&example_sales());
    let summary = summarize_by_category(&lines).unwrap();

    let line_total: f64 = lines.iter().map(|l| l.line_revenue).sum();
    let summary_total: f64 = summary.iter().map(|s| s.total_revenue).sum();
    assert!((line_total - summary_total).abs() < 1e-9);
    assert_eq!(line_total, 3720.0);

    let share_total: f64 = summary.iter().map(|s| s.revenue_share_pct).sum();
    assert!((share_total - 100.0).abs() < 1e-9);
}

#[test]
fn low_inventory_is_complete_and_precise_for_every_threshold() {
    let inventory = example_inventory();
    for t in 0..=25_i64 {
        let low = low_inventory(&inventory, t).unwrap();
        let expected = inventory
            .iter()
            .filter(|i| (i.available_quantity as i64) < t)
            .count();
        assert_eq!(low.len(), expected, "threshold {t}");
        assert!(low.iter().all(|i| (i.available_quantity as i64) < t));
        assert!(low.windows(2).all(|w| w[0].available_quantity <= w[1].available_quantity));
    }
}

#[test]
fn repeated_runs_overwrite_the_same_artifacts() {
    let out_dir = tmp_dir("rerun");
    let opts = options("tests/fixtures/sales.csv", "tests/fixtures/inventory.csv", &out_dir);
    let first = run_pipeline(&opts).unwrap();
    let before = std::fs::read(&first.artifacts.summary).unwrap();
    let second = run_pipeline(&opts).unwrap();

    assert_eq!(first.artifacts, second.artifacts);
    assert_eq!(std::fs::read(&second.artifacts.summary).unwrap(), before);
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 2);

    let _ = std::fs::remove_dir_all(&out_dir);
}
