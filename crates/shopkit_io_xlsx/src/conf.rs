//! XLSX export constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecExportFormats};

/// Excel worksheet maximum row count (header row included).
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Excel column width upper bound, in character units.
pub const N_WIDTH_EXCEL_COLUMN_MAX: usize = 255;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];
/// Sheet name Excel keeps for its own change-tracking sheet.
pub const C_EXCEL_SHEET_NAME_RESERVED: &str = "History";

/// Sheet name used when the caller does not pick one.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";
/// File name hint used when the caller does not pick one.
pub const C_FILE_NAME_HINT_DEFAULT: &str = "Export";
/// Extension appended to file name hints.
pub const C_XLSX_EXTENSION: &str = ".xlsx";
/// MIME type of the produced document.
pub const C_XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Font color of header cells in field-name header mode.
pub const C_COLOR_HEADER_FONT: &str = "#000000";
/// Background fill of header cells in mapped header mode.
pub const C_COLOR_HEADER_FILL: &str = "#D3D3D3";
/// Font color of body cells in field-name header mode.
pub const C_COLOR_BODY_FONT: &str = "#A9A9A9";

/// Canonical format preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumFmtKey {
    /// Header cells when headers are the field names.
    Header,
    /// Header cells when headers come from a caller mapping.
    HeaderCustom,
    /// Body cells when headers are the field names.
    Body,
    /// Body cells when headers come from a caller mapping.
    BodyCustom,
}

/// Build default named format presets used by [`crate::writer::XlsxExporter`].
pub fn derive_default_export_formats() -> SpecExportFormats {
    let cfg_base_fmt_spec = SpecCellFormat {
        align: Some("left".to_string()),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    };

    SpecExportFormats {
        header: cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            font_color: Some(C_COLOR_HEADER_FONT.to_string()),
            ..Default::default()
        }),
        header_custom: cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            bg_color: Some(C_COLOR_HEADER_FILL.to_string()),
            ..Default::default()
        }),
        body: SpecCellFormat {
            font_color: Some(C_COLOR_BODY_FONT.to_string()),
            ..Default::default()
        },
        body_custom: SpecCellFormat::default(),
    }
}
