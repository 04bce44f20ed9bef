//! DataFrame input for the export pipeline.

use std::io::Cursor;

use polars::prelude::{AnyValue, DataFrame, IpcReader, SerReader};

use crate::record::TableSource;

/// A DataFrame rendered to display text once, column names included.
#[derive(Debug, Clone)]
pub struct DataFrameTable {
    l_colnames: Vec<String>,
    l_grid: Vec<Vec<Option<String>>>,
}

impl DataFrameTable {
    /// Render every cell of `df` to its display text.
    pub fn try_new(df: &DataFrame) -> Result<Self, String> {
        let l_colnames = df
            .get_column_names_str()
            .into_iter()
            .map(str::to_string)
            .collect();

        let l_cols = df.get_columns();
        let mut l_grid = vec![vec![None; df.width()]; df.height()];
        for (idx_row, l_row) in l_grid.iter_mut().enumerate() {
            for (idx_col, cell) in l_row.iter_mut().enumerate() {
                let value = l_cols[idx_col]
                    .get(idx_row)
                    .map_err(|err| format!("Failed to read cell ({idx_row}, {idx_col}): {err}"))?;
                *cell = derive_cell_text_from_any_value(value);
            }
        }

        Ok(Self { l_colnames, l_grid })
    }

    /// Decode an Arrow IPC payload and render it.
    pub fn try_from_ipc_bytes(v_ipc_df: &[u8]) -> Result<Self, String> {
        let df = IpcReader::new(Cursor::new(v_ipc_df))
            .finish()
            .map_err(|err| format!("Failed to read IPC DataFrame bytes: {err}"))?;
        Self::try_new(&df)
    }
}

impl TableSource for DataFrameTable {
    fn column_names(&self) -> Vec<String> {
        self.l_colnames.clone()
    }

    fn height(&self) -> usize {
        self.l_grid.len()
    }

    fn cell_text(&self, idx_row: usize, idx_col: usize) -> Option<String> {
        self.l_grid.get(idx_row)?.get(idx_col)?.clone()
    }
}

// String values are taken raw; `AnyValue`'s own Display quotes them.
fn derive_cell_text_from_any_value(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(val) => Some(val.to_string()),
        AnyValue::StringOwned(val) => Some(val.to_string()),
        _ => Some(value.to_string()),
    }
}
