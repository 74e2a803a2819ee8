use std::fmt;

use calamine::Data;
use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Tokens treated as blank after trimming and upper-casing.
pub const BLANK_TOKENS: [&str; 7] = ["", "N/A", "NA", "NULL", "NONE", "#N/A", "#NA"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Text,
    Number,
    Boolean,
    None,
}

impl CellKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Text => "text",
            CellKind::Number => "number",
            CellKind::Boolean => "boolean",
            CellKind::None => "none",
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CellValue {
    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::Text(_) => CellKind::Text,
            CellValue::Number(_) => CellKind::Number,
            CellValue::Boolean(_) => CellKind::Boolean,
            CellValue::Empty => CellKind::None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn is_blank(&self) -> bool {
        is_blank_or_na(self)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => {
                if *n == (*n as i64) as f64 && n.abs() < 1e10 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            CellValue::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Boolean(*b),
            // Excel error literals such as #N/A or #DIV/0!
            Data::Error(e) => CellValue::Text(e.to_string()),
            Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
            // as_datetime honours the workbook's 1900/1904 date system
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(datetime) => CellValue::Text(datetime_to_iso_string(&datetime)),
                None => CellValue::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

/// Blank means the empty marker, or text that trims/upper-cases to one of
/// [`BLANK_TOKENS`]. Numbers and booleans are never blank.
#[must_use]
pub fn is_blank_or_na(value: &CellValue) -> bool {
    match value {
        CellValue::Empty => true,
        CellValue::Text(s) => is_blank_token(s),
        CellValue::Number(_) | CellValue::Boolean(_) => false,
    }
}

#[must_use]
pub fn is_blank_token(s: &str) -> bool {
    let upper = s.trim().to_uppercase();
    BLANK_TOKENS.contains(&upper.as_str())
}

fn datetime_to_iso_string(datetime: &NaiveDateTime) -> String {
    if datetime.time() == NaiveTime::MIN {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}
