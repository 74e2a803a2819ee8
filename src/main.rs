use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use sheetcell::{GridReader, ReaderOptions};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Excel file path or S3 URI (s3://bucket/key.xlsx)
    #[arg(required = true)]
    locator: String,

    /// Sheet name, defaults to the first sheet
    #[arg(long, short = 's')]
    sheet: Option<String>,

    /// Directory for temporary copies of S3 files
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read a single cell, e.g. C5
    Cell { address: String },

    /// Read a rectangular range in row-major order
    Range { start: String, end: String },

    /// Print whether a cell is blank, null or N/A
    Blank { address: String },

    /// Read a cell with its blank flag and data type
    Check { address: String },

    /// Read a column, until the first blank cell unless --end-row is given
    Column {
        column: String,
        #[arg(long, default_value = "1")]
        start_row: u32,
        #[arg(long)]
        end_row: Option<u32>,
    },

    /// Read a row, until the first blank cell unless --end-column is given
    Row {
        row: u32,
        #[arg(long, default_value = "A")]
        start_column: String,
        #[arg(long)]
        end_column: Option<String>,
    },

    /// List the sheet names of the workbook
    Sheets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut options = ReaderOptions::new();
    if let Some(sheet) = &cli.sheet {
        options = options.sheet(sheet);
    }
    if let Some(dir) = &cli.temp_dir {
        options = options.temp_dir(dir);
    }

    let mut reader = GridReader::open_with(&cli.locator, &options)
        .with_context(|| format!("Unable to open {}", cli.locator))?;

    let output = run_command(&reader, &cli.command);
    reader.close();

    println!("{}", output?);
    Ok(())
}

fn run_command(reader: &GridReader, command: &Command) -> Result<String> {
    match command {
        Command::Cell { address } => to_json(&reader.read_cell(address)?),
        Command::Range { start, end } => to_json(&reader.read_cell_range(start, end)?),
        Command::Blank { address } => to_json(&reader.is_cell_blank(address)?),
        Command::Check { address } => to_json(&reader.check_cell_value(address)?),
        Command::Column {
            column,
            start_row,
            end_row,
        } => to_json(&reader.read_all_cells_in_column(column, *start_row, *end_row)?),
        Command::Row {
            row,
            start_column,
            end_column,
        } => to_json(&reader.read_all_cells_in_row(*row, start_column, end_column.as_deref())?),
        Command::Sheets => to_json(&reader.sheet_names()?),
    }
}

fn to_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize data to JSON")
}
