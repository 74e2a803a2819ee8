//! One-off reads through the free functions

use std::path::Path;

use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use sheetcell::{CellValue, Error, ReaderOptions};

fn write_grid(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_number(0, 0, 1.0).unwrap();
    sheet.write_number(0, 1, 2.0).unwrap();
    sheet.write_string(1, 0, "x").unwrap();
    sheet.write_number(2, 0, 3.0).unwrap();

    let second = workbook.add_worksheet();
    second.set_name("Second").unwrap();
    second.write_string(0, 0, "NA").unwrap();

    workbook.save(path).unwrap();
}

fn fixture() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.xlsx");
    write_grid(&path);
    (dir, path.to_string_lossy().into_owned())
}

#[test]
fn reads_single_values() {
    let (_dir, path) = fixture();

    assert_eq!(sheetcell::read_cell(&path, "A1", None).unwrap(), CellValue::Number(1.0));
    assert!(sheetcell::is_cell_blank(&path, "B2", None).unwrap());
    assert_eq!(sheetcell::read_cell(&path, "Z99", None).unwrap(), CellValue::Empty);
    assert!(sheetcell::is_cell_blank(&path, "A1", Some("Second")).unwrap());
}

#[test]
fn reads_range() {
    let (_dir, path) = fixture();

    let values = sheetcell::read_cell_range(&path, "A1", "B2", None).unwrap();
    assert_eq!(
        values,
        vec![
            CellValue::Number(1.0),
            CellValue::Number(2.0),
            CellValue::Text("x".to_string()),
            CellValue::Empty,
        ]
    );
}

#[test]
fn checks_cell() {
    let (_dir, path) = fixture();

    let check = sheetcell::check_cell_value(&path, "A2", None).unwrap();
    assert_eq!(check.data_type.as_str(), "text");
    assert_eq!(check.cell_address, "A2");
}

#[test]
fn reads_column_and_row() {
    let (_dir, path) = fixture();

    let column = sheetcell::read_all_cells_in_column(&path, "A", 1, None, None).unwrap();
    assert_eq!(column.len(), 3);
    assert_eq!(column[2].value, CellValue::Number(3.0));

    let column = sheetcell::read_all_cells_in_column(&path, "B", 1, None, None).unwrap();
    assert_eq!(column.len(), 1);

    let row = sheetcell::read_all_cells_in_row(&path, 1, "A", Some("C"), None).unwrap();
    let columns: Vec<&str> = row.iter().map(|c| c.column.as_str()).collect();
    assert_eq!(columns, vec!["A", "B", "C"]);
}

#[test]
fn errors_pass_through() {
    let (_dir, path) = fixture();

    assert!(matches!(
        sheetcell::read_cell(&path, "5C", None),
        Err(Error::InvalidAddress(_))
    ));
    assert!(matches!(
        sheetcell::read_cell(&path, "A1", Some("Missing")),
        Err(Error::SheetNotFound { .. })
    ));
    assert!(matches!(
        sheetcell::read_cell("s3://bucket", "A1", None),
        Err(Error::InvalidLocator(_))
    ));
}

#[test]
fn with_reader_returns_closure_result() {
    let (_dir, path) = fixture();

    let total = sheetcell::with_reader(&path, &ReaderOptions::new(), |reader| {
        let values = reader.read_cell_range("A1", "B1")?;
        Ok(values.iter().filter_map(CellValue::as_f64).sum::<f64>())
    })
    .unwrap();
    assert_eq!(total, 3.0);

    let err = sheetcell::with_reader(&path, &ReaderOptions::new(), |reader| {
        reader.read_cell("bad")
    })
    .unwrap_err();
    assert!(matches!(err, Error::InvalidAddress(_)));
}
