//! XLSX writer kernel that turns a [`TableSource`] into workbook bytes.

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};
use tracing::{debug, error};

use crate::error::{EnumExportOperation, ExportError};
use crate::record::TableSource;
use crate::spec::{EnumHeaderMode, SpecAutofitCellsPolicy, SpecCellFormat, SpecExportFormats};
use crate::util::{
    estimate_unicode_string_width, plan_column_widths, validate_policy_autofit,
    validate_sheet_name, validate_table_extent,
};

/// Stateless workbook exporter.
///
/// Holds only presets; every call builds and discards its own workbook, so one
/// exporter can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct XlsxExporter {
    formats: SpecExportFormats,
    policy_autofit: SpecAutofitCellsPolicy,
}

impl XlsxExporter {
    /// Create an exporter with custom format presets and autofit policy.
    pub fn new(formats: SpecExportFormats, policy_autofit: SpecAutofitCellsPolicy) -> Self {
        Self {
            formats,
            policy_autofit,
        }
    }

    /// Format presets.
    pub fn formats(&self) -> &SpecExportFormats {
        &self.formats
    }

    /// Autofit policy.
    pub fn policy_autofit(&self) -> &SpecAutofitCellsPolicy {
        &self.policy_autofit
    }

    /// Write `source` as the single sheet `sheet_name` and return the workbook bytes.
    ///
    /// Pipeline: validate, write header, write rows, resize columns, serialize.
    /// Any failure aborts the call and no bytes are returned.
    pub fn write_table<S: TableSource + ?Sized>(
        &self,
        source: &S,
        sheet_name: &str,
        header_mode: EnumHeaderMode<'_>,
        operation: EnumExportOperation,
    ) -> Result<Vec<u8>, ExportError> {
        self.write_table_inner(source, sheet_name, header_mode, operation)
            .inspect(|v_bytes| {
                debug!(%operation, sheet_name, n_bytes = v_bytes.len(), "Workbook serialized");
            })
            .inspect_err(|err| {
                error!(%operation, sheet_name, error = %err, "Workbook export failed");
            })
    }

    fn write_table_inner<S: TableSource + ?Sized>(
        &self,
        source: &S,
        sheet_name: &str,
        header_mode: EnumHeaderMode<'_>,
        operation: EnumExportOperation,
    ) -> Result<Vec<u8>, ExportError> {
        let invalid = |message: String| ExportError::InvalidArgument { operation, message };
        let serialization =
            |source: XlsxError| ExportError::SerializationFailure { operation, source };

        validate_sheet_name(sheet_name).map_err(invalid)?;
        validate_policy_autofit(&self.policy_autofit).map_err(invalid)?;

        let l_colnames = source.column_names();
        let n_width = l_colnames.len();
        let n_height = source.height();
        validate_table_extent(n_height, n_width).map_err(invalid)?;

        debug!(%operation, sheet_name, n_rows = n_height, n_cols = n_width, "Writing sheet");

        let fmt_header = derive_rust_xlsx_format(self.formats.get(header_mode.header_fmt_key()));
        let fmt_body = derive_rust_xlsx_format(self.formats.get(header_mode.body_fmt_key()));

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name).map_err(serialization)?;

        let mut l_width_by_col_header = vec![0usize; n_width];
        let mut l_width_by_col_body = vec![0usize; n_width];

        for (n_idx_col, c_colname) in l_colnames.iter().enumerate() {
            let c_header = header_mode.resolve(c_colname);
            l_width_by_col_header[n_idx_col] = estimate_unicode_string_width(c_header);
            write_text_cell(worksheet, 0, n_idx_col, Some(c_header), &fmt_header)
                .map_err(serialization)?;
        }

        for n_idx_row in 0..n_height {
            for (n_idx_col, n_width_body) in l_width_by_col_body.iter_mut().enumerate() {
                let value = source.cell_text(n_idx_row, n_idx_col);
                if let Some(val) = &value {
                    *n_width_body = usize::max(*n_width_body, estimate_unicode_string_width(val));
                }
                write_text_cell(
                    worksheet,
                    n_idx_row + 1,
                    n_idx_col,
                    value.as_deref(),
                    &fmt_body,
                )
                .map_err(serialization)?;
            }
        }

        let l_widths = plan_column_widths(
            &l_width_by_col_header,
            &l_width_by_col_body,
            &self.policy_autofit,
        );
        for (n_idx_col, n_width_final) in l_widths.into_iter().enumerate() {
            worksheet
                .set_column_width(
                    cast_col_num(n_idx_col).map_err(serialization)?,
                    n_width_final as f64,
                )
                .map_err(serialization)?;
        }

        workbook.save_to_buffer().map_err(serialization)
    }
}

fn write_text_cell(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: Option<&str>,
    format: &Format,
) -> Result<(), XlsxError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    // Missing values are empty text cells; every record keeps its own row.
    worksheet.write_string_with_format(n_row, n_col, value.unwrap_or(""), format)?;
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }

    format
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        "center_across" => Some(FormatAlign::CenterAcross),
        "distributed" => Some(FormatAlign::Distributed),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        "vjustify" | "vertical_justify" => Some(FormatAlign::VerticalJustify),
        "vdistributed" | "vertical_distributed" => Some(FormatAlign::VerticalDistributed),
        _ => None,
    }
}

// Extents are validated before writing, so these only fail on a logic error.
fn cast_row_num(value: usize) -> Result<u32, XlsxError> {
    u32::try_from(value).map_err(|_| XlsxError::RowColumnLimitError)
}

fn cast_col_num(value: usize) -> Result<u16, XlsxError> {
    u16::try_from(value).map_err(|_| XlsxError::RowColumnLimitError)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::record::{FieldDescriptor, Record, RecordTable};

    struct Product {
        id: u32,
        name: String,
    }

    crate::export_record!(Product {
        id as "Id",
        name as "Name",
    });

    fn derive_products() -> Vec<Product> {
        vec![
            Product {
                id: 1,
                name: "Widget".to_string(),
            },
            Product {
                id: 2,
                name: "Gadget".to_string(),
            },
        ]
    }

    #[test]
    fn test_write_table_produces_zip_container() {
        let l_products = derive_products();
        let v_bytes = XlsxExporter::default()
            .write_table(
                &RecordTable::new(&l_products),
                "Sheet1",
                EnumHeaderMode::FieldNames,
                EnumExportOperation::Export,
            )
            .expect("export");

        assert!(v_bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_write_table_rejects_bad_sheet_name_before_writing() {
        let l_products = derive_products();
        let dict_headers = HashMap::new();
        let err = XlsxExporter::default()
            .write_table(
                &RecordTable::new(&l_products),
                "",
                EnumHeaderMode::Mapped(&dict_headers),
                EnumExportOperation::ExportWithHeaders,
            )
            .expect_err("empty sheet name must fail");

        assert!(err.is_invalid_argument());
        assert_eq!(err.operation(), EnumExportOperation::ExportWithHeaders);
    }

    #[test]
    fn test_write_table_rejects_bad_autofit_policy() {
        let exporter = XlsxExporter::new(
            SpecExportFormats::default(),
            SpecAutofitCellsPolicy {
                width_cell_min: 0,
                ..Default::default()
            },
        );
        let l_products = derive_products();
        let err = exporter
            .write_table(
                &RecordTable::new(&l_products),
                "Sheet1",
                EnumHeaderMode::FieldNames,
                EnumExportOperation::Export,
            )
            .expect_err("zero minimum width must fail");

        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_write_table_surfaces_writer_failure() {
        struct Note {
            body: String,
        }

        impl Record for Note {
            fn field_descriptors() -> Vec<FieldDescriptor<Self>> {
                vec![FieldDescriptor::new("Body", |note: &Self| {
                    Some(note.body.clone())
                })]
            }
        }

        // Excel caps cell text at 32,767 characters.
        let l_notes = vec![Note {
            body: "x".repeat(40_000),
        }];
        let err = XlsxExporter::default()
            .write_table(
                &RecordTable::new(&l_notes),
                "Sheet1",
                EnumHeaderMode::FieldNames,
                EnumExportOperation::Export,
            )
            .expect_err("oversize cell must fail");

        assert!(matches!(err, ExportError::SerializationFailure { .. }));
    }

    #[test]
    fn test_derive_format_align() {
        assert_eq!(derive_format_align(" Left "), Some(FormatAlign::Left));
        assert_eq!(derive_format_align("vcenter"), Some(FormatAlign::VerticalCenter));
        assert_eq!(derive_format_align("sideways"), None);
    }
}
