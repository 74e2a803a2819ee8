//! One-off reads. Every call opens the workbook (downloading it again for S3
//! locators), performs a single read and closes the reader before returning.

use crate::error::Result;
use crate::options::ReaderOptions;
use crate::reader::{CellCheck, ColumnCell, GridReader, RowCell};
use crate::value::CellValue;

/// Opens a reader, runs `f` against it and closes it on every exit path.
pub fn with_reader<T>(
    locator: &str,
    options: &ReaderOptions,
    f: impl FnOnce(&GridReader) -> Result<T>,
) -> Result<T> {
    let mut reader = GridReader::open_with(locator, options)?;
    let result = f(&reader);
    reader.close();
    result
}

pub fn read_cell(locator: &str, address: &str, sheet: Option<&str>) -> Result<CellValue> {
    with_reader(locator, &sheet.into(), |reader| reader.read_cell(address))
}

pub fn read_cell_range(
    locator: &str,
    start: &str,
    end: &str,
    sheet: Option<&str>,
) -> Result<Vec<CellValue>> {
    with_reader(locator, &sheet.into(), |reader| {
        reader.read_cell_range(start, end)
    })
}

pub fn is_cell_blank(locator: &str, address: &str, sheet: Option<&str>) -> Result<bool> {
    with_reader(locator, &sheet.into(), |reader| reader.is_cell_blank(address))
}

pub fn check_cell_value(locator: &str, address: &str, sheet: Option<&str>) -> Result<CellCheck> {
    with_reader(locator, &sheet.into(), |reader| {
        reader.check_cell_value(address)
    })
}

pub fn read_all_cells_in_column(
    locator: &str,
    column: &str,
    start_row: u32,
    end_row: Option<u32>,
    sheet: Option<&str>,
) -> Result<Vec<ColumnCell>> {
    with_reader(locator, &sheet.into(), |reader| {
        reader.read_all_cells_in_column(column, start_row, end_row)
    })
}

pub fn read_all_cells_in_row(
    locator: &str,
    row: u32,
    start_column: &str,
    end_column: Option<&str>,
    sheet: Option<&str>,
) -> Result<Vec<RowCell>> {
    with_reader(locator, &sheet.into(), |reader| {
        reader.read_all_cells_in_row(row, start_column, end_column)
    })
}
