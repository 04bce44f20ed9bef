//! `shopkit_io_xlsx`:
//! Tabular export kernel producing single-sheet XLSX workbooks in memory.
//!
//! Modules:
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/options
//! - `util`   : pure helper functions
//! - `record` : record shapes, field discovery and table sources
//! - `frame`  : DataFrame table source
//! - `writer` : workbook writer kernel
//! - `export` : export entry points
//! - `error`  : export errors
pub mod conf;
pub mod error;
pub mod export;
pub mod frame;
pub mod record;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_XLSX_CONTENT_TYPE, EnumFmtKey, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX,
    N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL, derive_default_export_formats,
};
pub use error::{EnumExportOperation, ExportError};
pub use export::{ExportService, export_records, export_records_with_headers};
pub use frame::DataFrameTable;
pub use record::{CellText, FieldDescriptor, Record, RecordTable, TableSource};
pub use spec::{
    EnumAutofitColumnsRule, EnumHeaderMode, SpecAutofitCellsPolicy, SpecCellFormat,
    SpecExportArtifact, SpecExportFormats, SpecExportOptions,
};
pub use util::{derive_file_name, validate_sheet_name};
pub use writer::XlsxExporter;
