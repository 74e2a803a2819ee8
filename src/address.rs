use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// A1-style cell coordinate. Both parts are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellAddress {
    pub column: u32,
    pub row: u32,
}

impl CellAddress {
    pub fn new(column: u32, row: u32) -> Result<Self> {
        if column == 0 || row == 0 {
            return Err(Error::InvalidAddress(format!(
                "column {column}, row {row} (both must be >= 1)"
            )));
        }
        Ok(Self { column, row })
    }

    pub fn column_letter(&self) -> String {
        index_to_letters(self.column)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letter(), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_cell(s)
    }
}

/// Rectangular block between two cells. Start and end are kept as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self { start, end }
    }

    // Row-major; empty when the end lies before the start on either axis
    pub fn cells(&self) -> impl Iterator<Item = CellAddress> + use<> {
        let (start, end) = (self.start, self.end);
        (start.row..=end.row).flat_map(move |row| {
            (start.column..=end.column).map(move |column| CellAddress { column, row })
        })
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((start, end)) => Ok(Self::new(parse_cell(start)?, parse_cell(end)?)),
            None => {
                let cell = parse_cell(s)?;
                Ok(Self::new(cell, cell))
            }
        }
    }
}

/// Parse an address such as `C5` or `aa10` into 1-based column and row.
pub fn parse_cell(address: &str) -> Result<CellAddress> {
    let invalid = || Error::InvalidAddress(address.to_string());

    let split = address
        .find(|c: char| !c.is_ascii_alphabetic())
        .ok_or_else(invalid)?;
    let (letters, digits) = address.split_at(split);

    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let column = column_letter_to_index(letters)?;
    let row = digits.parse::<u32>().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }

    Ok(CellAddress { column, row })
}

/// Bijective base-26: `A` = 1, `Z` = 26, `AA` = 27. Case-insensitive.
#[must_use]
pub fn column_letter_to_index(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidAddress("empty column letters".to_string()));
    }

    let mut result: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidAddress(format!("column '{letters}'")));
        }

        let val = (c.to_ascii_uppercase() as u8 - b'A' + 1) as u32;
        result = result
            .checked_mul(26)
            .and_then(|r| r.checked_add(val))
            .ok_or_else(|| Error::InvalidAddress(format!("column '{letters}' is too large")))?;
    }

    Ok(result)
}

#[must_use]
pub fn column_index_to_letter(index: u32) -> Result<String> {
    if index == 0 {
        return Err(Error::InvalidAddress(
            "column index must be >= 1".to_string(),
        ));
    }
    Ok(index_to_letters(index))
}

fn index_to_letters(index: u32) -> String {
    let mut col_name = String::new();
    let mut n = index;

    while n > 0 {
        let remainder = (n - 1) % 26;
        col_name.insert(0, (b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }

    col_name
}
