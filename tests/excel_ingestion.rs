#![cfg(feature = "excel")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use sales_inventory_analysis::export::{
    export_results, read_category_summary, read_low_inventory, ExportFormat, ExportOptions,
};
use sales_inventory_analysis::ingestion::excel::ingest_excel_from_path;
use sales_inventory_analysis::ingestion::{ingest_from_path, IngestionOptions};
use sales_inventory_analysis::pipeline::{run_pipeline, DataOrigin, PipelineOptions};
use sales_inventory_analysis::records::{inventory_schema, sales_schema, CategorySummary, InventoryRecord};
use sales_inventory_analysis::validation::{validate_inventory, validate_sales};

fn tmp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sales-analysis-{name}-{nanos}"))
}

fn write_inventory_xlsx(path: &PathBuf, sheet: &str, leading_blank_rows: u32) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name(sheet).unwrap();

    let h = leading_blank_rows;
    ws.write_string(h, 0, "producto").unwrap();
    ws.write_string(h, 1, "cantidad_disponible").unwrap();
    ws.write_string(h, 2, "categoria").unwrap();

    ws.write_string(h + 1, 0, "Prod_1").unwrap();
    ws.write_number(h + 1, 1, 15).unwrap();
    ws.write_string(h + 1, 2, "Electrónicos").unwrap();

    ws.write_string(h + 2, 0, "Prod_2").unwrap();
    ws.write_number(h + 2, 1, 3).unwrap();
    // categoria left empty

    wb.save(path).unwrap();
}

fn write_sales_xlsx(path: &PathBuf) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    let date_fmt = Format::new().set_num_format("yyyy-mm-dd");

    for (col, header) in ["fecha", "producto", "cantidad", "precio_unitario", "categoria"]
        .iter()
        .enumerate()
    {
        ws.write_string(0, col as u16, *header).unwrap();
    }

    let rows = [(1_u8, "Prod_1", 2, 10.0, "Electronics"), (2, "Prod_1", 1, 10.0, "Electronics"), (3, "Prod_2", 1, 5.0, "Home")];
    for (i, (day, product, qty, price, category)) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let date = ExcelDateTime::from_ymd(2023, 1, *day).unwrap();
        ws.write_datetime_with_format(r, 0, &date, &date_fmt).unwrap();
        ws.write_string(r, 1, *product).unwrap();
        ws.write_number(r, 2, *qty).unwrap();
        ws.write_number(r, 3, *price).unwrap();
        ws.write_string(r, 4, *category).unwrap();
    }

    wb.save(path).unwrap();
}

#[test]
fn ingest_inventory_workbook() {
    let path = tmp_path("inventory").with_extension("xlsx");
    write_inventory_xlsx(&path, "Sheet1", 0);

    let ds = ingest_excel_from_path(&path, None, &inventory_schema()).unwrap();
    let items = validate_inventory(&ds, "xlsx").unwrap();
    assert_eq!(
        items,
        vec![
            InventoryRecord {
                product: "Prod_1".to_string(),
                available_quantity: 15,
                category: Some("Electrónicos".to_string()),
            },
            InventoryRecord {
                product: "Prod_2".to_string(),
                available_quantity: 3,
                category: None,
            },
        ]
    );

    let _ = std::fs::remove_file(&path);
}

#[test]
fn header_row_may_be_preceded_by_blank_rows_and_sheet_can_be_named() {
    let path = tmp_path("inventory-named").with_extension("xlsx");
    write_inventory_xlsx(&path, "Stock", 2);

    let opts = IngestionOptions {
        excel_sheet: Some("Stock".to_string()),
        ..Default::default()
    };
    let ds = ingest_from_path(&path, &inventory_schema(), &opts).unwrap();
    assert_eq!(ds.row_count(), 2);

    let missing = IngestionOptions {
        excel_sheet: Some("Nope".to_string()),
        ..Default::default()
    };
    assert!(ingest_from_path(&path, &inventory_schema(), &missing).is_err());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn date_cells_map_to_calendar_dates() {
    let path = tmp_path("sales").with_extension("xlsx");
    write_sales_xlsx(&path);

    let ds = ingest_from_path(&path, &sales_schema(), &IngestionOptions::default()).unwrap();
    let sales = validate_sales(&ds, "xlsx").unwrap();
    assert_eq!(sales.len(), 3);
    assert_eq!(sales[0].date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    assert_eq!(sales[2].date, NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
    assert_eq!(sales[0].quantity, 2);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn xlsx_export_reopens_with_same_values() {
    let dir = tmp_path("xlsx-export");
    let summary = vec![
        CategorySummary {
            category: "Electronics".to_string(),
            total_revenue: 30.0,
            sale_count: 2,
            revenue_share_pct: 30.0 / 35.0 * 100.0,
        },
        CategorySummary {
            category: "Home".to_string(),
            total_revenue: 5.0,
            sale_count: 1,
            revenue_share_pct: 5.0 / 35.0 * 100.0,
        },
    ];
    let low = vec![InventoryRecord {
        product: "Prod_2".to_string(),
        available_quantity: 3,
        category: None,
    }];
    let opts = ExportOptions {
        summary_format: ExportFormat::Excel,
        low_inventory_format: ExportFormat::Excel,
    };

    let artifacts = export_results(&summary, &low, &dir, &opts).unwrap();
    assert_eq!(artifacts.low_inventory, dir.join("inventario_bajo.xlsx"));
    assert_eq!(read_category_summary(&artifacts.summary, ExportFormat::Excel).unwrap(), summary);
    assert_eq!(read_low_inventory(&artifacts.low_inventory, ExportFormat::Excel).unwrap(), low);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn pipeline_reads_the_default_workbook_inventory() {
    let dir = tmp_path("pipeline-xlsx");
    std::fs::create_dir_all(&dir).unwrap();
    let inventory = dir.join("inventario.xlsx");
    write_inventory_xlsx(&inventory, "Sheet1", 0);

    let out = run_pipeline(&PipelineOptions {
        sales_path: PathBuf::from("tests/fixtures/sales.csv"),
        inventory_path: inventory,
        output_dir: dir.join("resultados"),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(out.origin, DataOrigin::Loaded);
    assert_eq!(out.low_inventory.len(), 1);
    assert_eq!(out.low_inventory[0].product, "Prod_2");

    let _ = std::fs::remove_dir_all(&dir);
}
