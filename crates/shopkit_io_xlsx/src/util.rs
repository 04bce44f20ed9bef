//! Stateless helper utilities used by the XLSX export kernel.

use crate::conf::{
    C_EXCEL_SHEET_NAME_RESERVED, C_FILE_NAME_HINT_DEFAULT, C_XLSX_EXTENSION,
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, N_WIDTH_EXCEL_COLUMN_MAX,
    TUP_EXCEL_ILLEGAL,
};
use crate::spec::{EnumAutofitColumnsRule, SpecAutofitCellsPolicy};

////////////////////////////////////////////////////////////////////////////////
// #region SheetValidation

/// Check that `name` is usable as an Excel sheet name.
///
/// Names are rejected rather than repaired: the caller gets back exactly the
/// sheet name it asked for, or an error.
pub fn validate_sheet_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Sheet name must not be empty.".to_string());
    }

    let n_len_name = name.chars().count();
    if n_len_name > N_LEN_EXCEL_SHEET_NAME_MAX {
        return Err(format!(
            "Sheet name {name:?} has {n_len_name} characters; at most {N_LEN_EXCEL_SHEET_NAME_MAX} allowed."
        ));
    }

    if let Some(c_illegal) = name.chars().find(|chr| TUP_EXCEL_ILLEGAL.contains(chr)) {
        return Err(format!(
            "Sheet name {name:?} contains illegal character {c_illegal:?}."
        ));
    }

    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(format!(
            "Sheet name {name:?} must not start or end with an apostrophe."
        ));
    }

    if name.eq_ignore_ascii_case(C_EXCEL_SHEET_NAME_RESERVED) {
        return Err(format!("Sheet name {name:?} is reserved by Excel."));
    }

    Ok(())
}

/// Check that `n_rows` data rows plus one header row and `n_cols` columns fit one worksheet.
pub fn validate_table_extent(n_rows: usize, n_cols: usize) -> Result<(), String> {
    let n_rows_data_max = N_NROWS_EXCEL_MAX - 1;
    if n_rows > n_rows_data_max {
        return Err(format!(
            "{n_rows} records exceed the worksheet limit of {n_rows_data_max} data rows."
        ));
    }
    if n_cols > N_NCOLS_EXCEL_MAX {
        return Err(format!(
            "{n_cols} fields exceed the worksheet limit of {N_NCOLS_EXCEL_MAX} columns."
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileNames

/// Derive the `.xlsx` file name a caller should persist the bytes under.
pub fn derive_file_name(file_name_hint: &str) -> String {
    let c_hint = file_name_hint.trim();
    let c_hint = if c_hint.is_empty() {
        C_FILE_NAME_HINT_DEFAULT
    } else {
        c_hint
    };

    if c_hint.to_ascii_lowercase().ends_with(C_XLSX_EXTENSION) {
        c_hint.to_string()
    } else {
        format!("{c_hint}{C_XLSX_EXTENSION}")
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnWidths

/// Estimate displayed width units for one rendered string.
///
/// Non-ASCII characters count 1.6 units each, rounded up over the string.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii * 8).div_ceil(5)
}

/// Validate autofit bounds.
pub fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> Result<(), String> {
    if policy_autofit.width_cell_min == 0 {
        return Err("policy_autofit.width_cell_min must be >= 1.".to_string());
    }
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min {
        return Err(
            "policy_autofit.width_cell_max must be >= policy_autofit.width_cell_min.".to_string(),
        );
    }
    Ok(())
}

/// Plan final column widths from the widest header and body text per column.
///
/// Returns an empty plan when autofit is disabled.
pub fn plan_column_widths(
    widths_header: &[usize],
    widths_body: &[usize],
    policy_autofit: &SpecAutofitCellsPolicy,
) -> Vec<usize> {
    if matches!(policy_autofit.rule_columns, EnumAutofitColumnsRule::None) {
        return vec![];
    }

    let n_min = usize::max(1, policy_autofit.width_cell_min);
    let n_max = usize::min(
        N_WIDTH_EXCEL_COLUMN_MAX,
        usize::max(n_min, policy_autofit.width_cell_max),
    );
    let n_pad = policy_autofit.width_cell_padding;

    widths_header
        .iter()
        .zip(widths_body.iter())
        .map(|(n_width_header, n_width_body)| {
            let n_width_recorded = match policy_autofit.rule_columns {
                EnumAutofitColumnsRule::Header => *n_width_header,
                EnumAutofitColumnsRule::Body => *n_width_body,
                EnumAutofitColumnsRule::All | EnumAutofitColumnsRule::None => {
                    usize::max(*n_width_header, *n_width_body)
                }
            };
            usize::min(n_max, usize::max(n_min, n_width_recorded + n_pad))
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
