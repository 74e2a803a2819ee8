use std::path::{Path, PathBuf};

/// Settings for opening a [`GridReader`](crate::GridReader).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    sheet: Option<String>,
    temp_dir: Option<PathBuf>,
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet to load; the first sheet when unset.
    pub fn sheet(mut self, name: impl Into<String>) -> Self {
        self.sheet = Some(name.into());
        self
    }

    // Directory for downloaded S3 copies
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    pub fn temp_dir_path(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }
}

impl From<Option<&str>> for ReaderOptions {
    fn from(sheet: Option<&str>) -> Self {
        Self {
            sheet: sheet.map(str::to_string),
            temp_dir: None,
        }
    }
}
