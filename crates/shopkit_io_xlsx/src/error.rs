//! Export error types.

use std::fmt;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Export entry point an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumExportOperation {
    /// Headers are the field names.
    Export,
    /// Headers are looked up in a caller mapping.
    ExportWithHeaders,
    /// Columns come from a DataFrame.
    ExportDataFrame,
}

impl fmt::Display for EnumExportOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Export => write!(f, "export"),
            Self::ExportWithHeaders => write!(f, "export with custom headers"),
            Self::ExportDataFrame => write!(f, "export dataframe"),
        }
    }
}

/// Failure of one export call. No bytes are produced when this is returned.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Caller input cannot be exported (bad sheet name, oversize table, bad policy).
    #[error("Error during {operation}: invalid argument: {message}")]
    InvalidArgument {
        /// Entry point that failed.
        operation: EnumExportOperation,
        /// What was wrong with the input.
        message: String,
    },

    /// The document writer could not build or serialize the workbook.
    #[error("Error generating Excel file during {operation}: {source}")]
    SerializationFailure {
        /// Entry point that failed.
        operation: EnumExportOperation,
        /// Underlying writer error.
        #[source]
        source: XlsxError,
    },
}

impl ExportError {
    /// Entry point that failed.
    pub fn operation(&self) -> EnumExportOperation {
        match self {
            Self::InvalidArgument { operation, .. }
            | Self::SerializationFailure { operation, .. } => *operation,
        }
    }

    /// Whether the failure was caused by caller input.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
