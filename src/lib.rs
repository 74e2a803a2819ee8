pub mod address;
pub mod error;
pub mod ops;
pub mod options;
pub mod reader;
pub mod remote;
pub mod value;

pub use address::{
    CellAddress, CellRange, column_index_to_letter, column_letter_to_index, parse_cell,
};
pub use error::{Error, Result};
pub use ops::{
    check_cell_value, is_cell_blank, read_all_cells_in_column, read_all_cells_in_row, read_cell,
    read_cell_range, with_reader,
};
pub use options::ReaderOptions;
pub use reader::{CellCheck, ColumnCell, Grid, GridReader, RowCell};
pub use remote::{LocalResource, is_remote_uri, resolve_local_path};
pub use value::{BLANK_TOKENS, CellKind, CellValue, is_blank_or_na};
