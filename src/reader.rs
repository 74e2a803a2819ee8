use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use log::debug;
use serde::Serialize;

use crate::address::{CellAddress, CellRange, column_letter_to_index, parse_cell};
use crate::error::{Error, Result};
use crate::options::ReaderOptions;
use crate::remote::{LocalResource, resolve_local_path};
use crate::value::{CellKind, CellValue, is_blank_or_na};

static EMPTY: CellValue = CellValue::Empty;

/// One fully materialized sheet. `rows[0][0]` is the cell at `origin`,
/// the top-left corner of the sheet's used range.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    sheet_name: String,
    sheet_index: usize,
    sheet_names: Vec<String>,
    // zero-based (row, column) of rows[0][0]
    offset: (usize, usize),
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn from_rows(sheet_name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let sheet_name = sheet_name.into();
        Self {
            sheet_names: vec![sheet_name.clone()],
            sheet_name,
            sheet_index: 0,
            offset: (0, 0),
            rows,
        }
    }

    /// Value at `address`, or `Empty` outside the materialized extent.
    pub fn get(&self, address: CellAddress) -> &CellValue {
        self.cell(address).unwrap_or(&EMPTY)
    }

    fn cell(&self, address: CellAddress) -> Option<&CellValue> {
        let row = (address.row as usize).checked_sub(self.offset.0 + 1)?;
        let col = (address.column as usize).checked_sub(self.offset.1 + 1)?;
        self.rows.get(row)?.get(col)
    }

    /// Rows of the used range, starting at [`origin`](Grid::origin).
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn origin(&self) -> CellAddress {
        CellAddress {
            column: self.offset.1 as u32 + 1,
            row: self.offset.0 as u32 + 1,
        }
    }

    /// Last used row number, 0 for an empty sheet.
    pub fn height(&self) -> usize {
        match self.rows.len() {
            0 => 0,
            n => self.offset.0 + n,
        }
    }

    /// Last used column number, 0 for an empty sheet.
    pub fn width(&self) -> usize {
        match self.rows.iter().map(Vec::len).max().unwrap_or(0) {
            0 => 0,
            n => self.offset.1 + n,
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn sheet_index(&self) -> usize {
        self.sheet_index
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellCheck {
    pub value: CellValue,
    pub is_blank: bool,
    pub cell_address: String,
    pub data_type: CellKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnCell {
    pub address: String,
    pub value: CellValue,
    pub is_blank: bool,
    pub row: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowCell {
    pub address: String,
    pub value: CellValue,
    pub is_blank: bool,
    pub column: String,
}

/// Loads one sheet on open and serves cell reads from memory until closed.
///
/// A downloaded S3 copy lives as long as the reader and is deleted by
/// [`close`](GridReader::close) or on drop. Local files are never touched.
#[derive(Debug)]
pub struct GridReader {
    locator: String,
    grid: Option<Grid>,
    resource: Option<LocalResource>,
}

impl GridReader {
    pub fn open(locator: &str, sheet: Option<&str>) -> Result<Self> {
        Self::open_with(locator, &ReaderOptions::from(sheet))
    }

    pub fn open_with(locator: &str, options: &ReaderOptions) -> Result<Self> {
        let resource = resolve_local_path(locator, options.temp_dir_path())?;
        Self::open_resource(locator, resource, options.sheet_name())
    }

    // Takes ownership of `resource`; a temporary copy is removed if loading fails
    pub(crate) fn open_resource(
        locator: &str,
        resource: LocalResource,
        sheet: Option<&str>,
    ) -> Result<Self> {
        let grid = match load_grid(resource.path(), sheet) {
            Ok(grid) => grid,
            Err(err) => {
                resource.close();
                return Err(err);
            }
        };

        debug!(
            "Loaded sheet '{}' ({}x{}) from {}",
            grid.sheet_name,
            grid.height(),
            grid.width(),
            locator
        );

        Ok(Self {
            locator: locator.to_string(),
            grid: Some(grid),
            resource: Some(resource),
        })
    }

    /// Wraps an already materialized grid; nothing is deleted on close.
    pub fn from_grid(grid: Grid) -> Self {
        Self {
            locator: String::new(),
            grid: Some(grid),
            resource: None,
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn is_temporary(&self) -> bool {
        self.resource.as_ref().is_some_and(LocalResource::is_temporary)
    }

    pub fn is_closed(&self) -> bool {
        self.grid.is_none()
    }

    pub fn get_grid(&self) -> Result<&Grid> {
        self.grid.as_ref().ok_or(Error::AccessorClosed)
    }

    pub fn sheet_name(&self) -> Result<&str> {
        Ok(self.get_grid()?.sheet_name())
    }

    pub fn sheet_names(&self) -> Result<&[String]> {
        Ok(self.get_grid()?.sheet_names())
    }

    pub fn read_cell(&self, address: &str) -> Result<CellValue> {
        let grid = self.get_grid()?;
        let cell = parse_cell(address)?;
        Ok(grid.get(cell).clone())
    }

    /// Row-major values from `start` to `end` inclusive.
    pub fn read_cell_range(&self, start: &str, end: &str) -> Result<Vec<CellValue>> {
        let grid = self.get_grid()?;
        let range = CellRange::new(parse_cell(start)?, parse_cell(end)?);
        Ok(range.cells().map(|cell| grid.get(cell).clone()).collect())
    }

    pub fn is_cell_blank(&self, address: &str) -> Result<bool> {
        Ok(is_blank_or_na(&self.read_cell(address)?))
    }

    pub fn check_cell_value(&self, address: &str) -> Result<CellCheck> {
        let value = self.read_cell(address)?;
        Ok(CellCheck {
            is_blank: is_blank_or_na(&value),
            data_type: value.kind(),
            cell_address: address.to_string(),
            value,
        })
    }

    /// Cells of `column` from `start_row`. With `end_row` every row up to it is
    /// returned; without it the scan stops before the first blank cell.
    pub fn read_all_cells_in_column(
        &self,
        column: &str,
        start_row: u32,
        end_row: Option<u32>,
    ) -> Result<Vec<ColumnCell>> {
        let grid = self.get_grid()?;
        let column = column_letter_to_index(column)?;
        let start = CellAddress::new(column, start_row)?;
        let letter = start.column_letter();

        let cell_at = |row: u32| {
            let value = grid.get(CellAddress { column, row }).clone();
            ColumnCell {
                address: format!("{letter}{row}"),
                is_blank: is_blank_or_na(&value),
                value,
                row,
            }
        };

        let cells = match end_row {
            Some(end) => (start_row..=end).map(cell_at).collect(),
            None => (start_row..=u32::MAX)
                .map(cell_at)
                .take_while(|cell| !cell.is_blank)
                .collect(),
        };
        Ok(cells)
    }

    /// Cells of `row` from `start_column`. With `end_column` every column up to
    /// it is returned; without it the scan stops before the first blank cell.
    pub fn read_all_cells_in_row(
        &self,
        row: u32,
        start_column: &str,
        end_column: Option<&str>,
    ) -> Result<Vec<RowCell>> {
        let grid = self.get_grid()?;
        let start = CellAddress::new(column_letter_to_index(start_column)?, row)?;
        let end = end_column.map(column_letter_to_index).transpose()?;

        let cell_at = |column: u32| {
            let address = CellAddress { column, row };
            let value = grid.get(address).clone();
            RowCell {
                address: address.to_string(),
                is_blank: is_blank_or_na(&value),
                value,
                column: address.column_letter(),
            }
        };

        let cells = match end {
            Some(end) => (start.column..=end).map(cell_at).collect(),
            None => (start.column..=u32::MAX)
                .map(cell_at)
                .take_while(|cell| !cell.is_blank)
                .collect(),
        };
        Ok(cells)
    }

    /// Releases the grid and deletes a downloaded copy. Safe to call twice.
    pub fn close(&mut self) {
        if self.grid.take().is_some() {
            debug!("Closing reader for {}", self.locator);
        }
        if let Some(resource) = self.resource.take() {
            resource.close();
        }
    }
}

impl Drop for GridReader {
    fn drop(&mut self) {
        self.close();
    }
}

fn load_grid(path: &Path, sheet: Option<&str>) -> Result<Grid> {
    if !path.exists() {
        return Err(Error::ResourceNotFound(path.to_path_buf()));
    }

    let unsupported = |reason: String| Error::UnsupportedFormat {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| unsupported(e.to_string()))?;
    let sheet_names = workbook.sheet_names();

    let sheet_index = match sheet {
        Some(name) => sheet_names
            .iter()
            .position(|s| s == name)
            .ok_or_else(|| Error::SheetNotFound {
                name: name.to_string(),
                available: sheet_names.clone(),
            })?,
        None if sheet_names.is_empty() => {
            return Err(unsupported("No worksheets found in file".to_string()));
        }
        None => 0,
    };

    let sheet_name = sheet_names[sheet_index].clone();
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| unsupported(format!("Unable to read worksheet {sheet_name}: {e}")))?;

    Ok(Grid {
        offset: range_offset(&range),
        rows: rows_from_range(&range),
        sheet_name,
        sheet_index,
        sheet_names,
    })
}

fn range_offset(range: &Range<Data>) -> (usize, usize) {
    let (row, col) = range.start().unwrap_or((0, 0));
    (row as usize, col as usize)
}

// Dense copy of the used range only; calamine positions are relative to its start
fn rows_from_range(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let (height, width) = range.get_size();
    let mut rows = vec![vec![CellValue::Empty; width]; height];

    for (row_idx, col_idx, cell) in range.used_cells() {
        rows[row_idx][col_idx] = CellValue::from(cell);
    }

    rows
}
