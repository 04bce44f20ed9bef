//! Export entry points: typed records, custom headers and DataFrames.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use tracing::info;

use crate::error::{EnumExportOperation, ExportError};
use crate::frame::DataFrameTable;
use crate::record::{Record, RecordTable, TableSource};
use crate::spec::{EnumHeaderMode, SpecExportArtifact, SpecExportOptions};
use crate::util::derive_file_name;
use crate::writer::XlsxExporter;

/// Tabular export contract consumed by services.
pub trait ExportService {
    /// Export `records` with field names as headers.
    ///
    /// Header cells use the `header` preset, data cells the `body` preset.
    fn export<R: Record>(
        &self,
        records: &[R],
        options: &SpecExportOptions,
    ) -> Result<Vec<u8>, ExportError>;

    /// Export `records`, taking header text from `dict_headers` keyed by field
    /// name. Fields without an entry keep their name.
    fn export_with_headers<R: Record>(
        &self,
        records: &[R],
        dict_headers: &HashMap<String, String>,
        sheet_name: &str,
    ) -> Result<Vec<u8>, ExportError>;
}

impl ExportService for XlsxExporter {
    fn export<R: Record>(
        &self,
        records: &[R],
        options: &SpecExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        let table = RecordTable::new(records);
        let v_bytes = self.write_table(
            &table,
            &options.sheet_name,
            EnumHeaderMode::FieldNames,
            EnumExportOperation::Export,
        )?;
        info!(
            sheet_name = %options.sheet_name,
            n_rows = table.height(),
            n_cols = table.fields().len(),
            "Exported records"
        );
        Ok(v_bytes)
    }

    fn export_with_headers<R: Record>(
        &self,
        records: &[R],
        dict_headers: &HashMap<String, String>,
        sheet_name: &str,
    ) -> Result<Vec<u8>, ExportError> {
        let table = RecordTable::new(records);
        let v_bytes = self.write_table(
            &table,
            sheet_name,
            EnumHeaderMode::Mapped(dict_headers),
            EnumExportOperation::ExportWithHeaders,
        )?;
        info!(
            sheet_name,
            n_rows = table.height(),
            n_cols = table.fields().len(),
            n_headers_mapped = dict_headers.len(),
            "Exported records with custom headers"
        );
        Ok(v_bytes)
    }
}

impl XlsxExporter {
    /// Export with field-name headers and package the bytes with their file name.
    pub fn export_artifact<R: Record>(
        &self,
        records: &[R],
        options: &SpecExportOptions,
    ) -> Result<SpecExportArtifact, ExportError> {
        let n_cols = RecordTable::new(records).fields().len();
        let bytes = self.export(records, options)?;
        Ok(SpecExportArtifact {
            bytes,
            file_name: derive_file_name(&options.file_name_hint),
            sheet_name: options.sheet_name.clone(),
            n_rows: records.len(),
            n_cols,
        })
    }

    /// Export a DataFrame with its column names as headers.
    pub fn export_dataframe(
        &self,
        df: &DataFrame,
        sheet_name: &str,
    ) -> Result<Vec<u8>, ExportError> {
        let table =
            DataFrameTable::try_new(df).map_err(|message| ExportError::InvalidArgument {
                operation: EnumExportOperation::ExportDataFrame,
                message,
            })?;
        self.export_table(&table, sheet_name)
    }

    /// Export a DataFrame received as Arrow IPC bytes.
    pub fn export_ipc_bytes(
        &self,
        v_ipc_df: &[u8],
        sheet_name: &str,
    ) -> Result<Vec<u8>, ExportError> {
        let table = DataFrameTable::try_from_ipc_bytes(v_ipc_df).map_err(|message| {
            ExportError::InvalidArgument {
                operation: EnumExportOperation::ExportDataFrame,
                message,
            }
        })?;
        self.export_table(&table, sheet_name)
    }

    fn export_table(&self, table: &DataFrameTable, sheet_name: &str) -> Result<Vec<u8>, ExportError> {
        let v_bytes = self.write_table(
            table,
            sheet_name,
            EnumHeaderMode::FieldNames,
            EnumExportOperation::ExportDataFrame,
        )?;
        info!(
            sheet_name,
            n_rows = table.height(),
            n_cols = table.column_names().len(),
            "Exported dataframe"
        );
        Ok(v_bytes)
    }
}

/// Export `records` with a default exporter.
pub fn export_records<R: Record>(
    records: &[R],
    options: &SpecExportOptions,
) -> Result<Vec<u8>, ExportError> {
    XlsxExporter::default().export(records, options)
}

/// Export `records` with mapped headers and a default exporter.
pub fn export_records_with_headers<R: Record>(
    records: &[R],
    dict_headers: &HashMap<String, String>,
    sheet_name: &str,
) -> Result<Vec<u8>, ExportError> {
    XlsxExporter::default().export_with_headers(records, dict_headers, sheet_name)
}
