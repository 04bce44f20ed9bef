//! Shared XLSX export specification models.

use std::collections::HashMap;

use crate::conf::{
    C_FILE_NAME_HINT_DEFAULT, C_SHEET_NAME_DEFAULT, EnumFmtKey, N_WIDTH_EXCEL_COLUMN_MAX,
    derive_default_export_formats,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification, merged field by field before conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,

    /// Background fill color (`#RRGGBB`).
    pub bg_color: Option<String>,
    /// Font color (`#RRGGBB`).
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

/// The four format presets an export call picks from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportFormats {
    /// Header cells, field-name header mode.
    pub header: SpecCellFormat,
    /// Header cells, mapped header mode.
    pub header_custom: SpecCellFormat,
    /// Body cells, field-name header mode.
    pub body: SpecCellFormat,
    /// Body cells, mapped header mode.
    pub body_custom: SpecCellFormat,
}

impl SpecExportFormats {
    /// Look up one preset by key.
    pub fn get(&self, key: EnumFmtKey) -> &SpecCellFormat {
        match key {
            EnumFmtKey::Header => &self.header,
            EnumFmtKey::HeaderCustom => &self.header_custom,
            EnumFmtKey::Body => &self.body,
            EnumFmtKey::BodyCustom => &self.body_custom,
        }
    }
}

impl Default for SpecExportFormats {
    fn default() -> Self {
        derive_default_export_formats()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderSpecification

/// Where header row text comes from.
#[derive(Debug, Clone, Copy)]
pub enum EnumHeaderMode<'a> {
    /// Header text is the column (field) name.
    FieldNames,
    /// Header text is looked up by column name, falling back to the name.
    Mapped(&'a HashMap<String, String>),
}

impl EnumHeaderMode<'_> {
    /// Resolve the header text for one column name.
    pub fn resolve<'n>(&'n self, column_name: &'n str) -> &'n str {
        match self {
            Self::FieldNames => column_name,
            Self::Mapped(dict_headers) => dict_headers
                .get(column_name)
                .map_or(column_name, String::as_str),
        }
    }

    /// Format preset key for header cells.
    pub fn header_fmt_key(&self) -> EnumFmtKey {
        match self {
            Self::FieldNames => EnumFmtKey::Header,
            Self::Mapped(_) => EnumFmtKey::HeaderCustom,
        }
    }

    /// Format preset key for body cells.
    pub fn body_fmt_key(&self) -> EnumFmtKey {
        match self {
            Self::FieldNames => EnumFmtKey::Body,
            Self::Mapped(_) => EnumFmtKey::BodyCustom,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region AutofitSpecification

/// Autofit rule for column width inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumAutofitColumnsRule {
    /// Disable autofit.
    None,
    /// Infer width from header cells only.
    Header,
    /// Infer width from body cells only.
    Body,
    /// Infer width from both header and body cells (default).
    #[default]
    All,
}

/// Autofit policy applied once all rows are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Autofit width inference rule.
    pub rule_columns: EnumAutofitColumnsRule,
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            rule_columns: EnumAutofitColumnsRule::All,
            width_cell_min: 4,
            width_cell_max: N_WIDTH_EXCEL_COLUMN_MAX,
            width_cell_padding: 2,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ExportOptions

/// Per-call export options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportOptions {
    /// Name of the single worksheet.
    pub sheet_name: String,
    /// File name the caller may persist the bytes under. Not read by the writer.
    pub file_name_hint: String,
}

impl SpecExportOptions {
    /// Options with the given sheet name and the default file name hint.
    pub fn with_sheet_name(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            ..Default::default()
        }
    }

    /// Replace the file name hint.
    pub fn file_name_hint(mut self, file_name_hint: impl Into<String>) -> Self {
        self.file_name_hint = file_name_hint.into();
        self
    }
}

impl Default for SpecExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
            file_name_hint: C_FILE_NAME_HINT_DEFAULT.to_string(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ArtifactSpecification

/// Serialized workbook plus the metadata a caller needs to persist it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportArtifact {
    /// Workbook bytes.
    pub bytes: Vec<u8>,
    /// File name derived from the hint, always ending in `.xlsx`.
    pub file_name: String,
    /// Worksheet name.
    pub sheet_name: String,
    /// Number of data rows (header excluded).
    pub n_rows: usize,
    /// Number of columns.
    pub n_cols: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_right_side_values() {
        let base = SpecCellFormat {
            bold: Some(false),
            font_color: Some("#111111".to_string()),
            ..Default::default()
        };
        let merged = base.with_(SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        });

        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.font_color.as_deref(), Some("#111111"));
    }

    #[test]
    fn test_header_mode_mapped_falls_back_to_column_name() {
        let dict_headers = HashMap::from([("Id".to_string(), "Product ID".to_string())]);
        let mode = EnumHeaderMode::Mapped(&dict_headers);

        assert_eq!(mode.resolve("Id"), "Product ID");
        assert_eq!(mode.resolve("Name"), "Name");
        assert_eq!(EnumHeaderMode::FieldNames.resolve("Id"), "Id");
    }

    #[test]
    fn test_export_options_default() {
        let options = SpecExportOptions::default();
        assert_eq!(options.sheet_name, "Sheet1");
        assert_eq!(options.file_name_hint, "Export");

        let options = SpecExportOptions::with_sheet_name("Orders").file_name_hint("orders-q3");
        assert_eq!(options.sheet_name, "Orders");
        assert_eq!(options.file_name_hint, "orders-q3");
    }
}
