//! Record shapes, field descriptors and the table-source seam.
//!
//! A record type exposes its columns through [`Record::field_descriptors`],
//! usually generated with [`export_record!`](crate::export_record). The writer
//! never sees record types directly; it reads any [`TableSource`].

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use rust_decimal::Decimal;
use uuid::Uuid;

////////////////////////////////////////////////////////////////////////////////
// #region CellText

/// Natural display text of a field value, `None` for a missing value.
///
/// No locale or type-specific formatting is applied: the text is the value's
/// own `Display` output.
pub trait CellText {
    /// Render the value, or `None` when it is missing.
    fn to_cell_text(&self) -> Option<String>;
}

macro_rules! impl_cell_text_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CellText for $ty {
                fn to_cell_text(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

impl_cell_text_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
    str, String, Decimal, Uuid, NaiveDate, NaiveDateTime, NaiveTime,
);

impl<T: CellText> CellText for Option<T> {
    fn to_cell_text(&self) -> Option<String> {
        self.as_ref().and_then(CellText::to_cell_text)
    }
}

impl<T: CellText + ?Sized> CellText for &T {
    fn to_cell_text(&self) -> Option<String> {
        (**self).to_cell_text()
    }
}

impl<T: CellText + ?Sized> CellText for Box<T> {
    fn to_cell_text(&self) -> Option<String> {
        (**self).to_cell_text()
    }
}

impl CellText for Cow<'_, str> {
    fn to_cell_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl<Tz: TimeZone> CellText for DateTime<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn to_cell_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FieldDescriptor

/// One exposed field of a record type: its name and how to read it.
pub struct FieldDescriptor<R> {
    name: Cow<'static, str>,
    readable: bool,
    accessor: fn(&R) -> Option<String>,
}

impl<R> FieldDescriptor<R> {
    /// Readable field with the given accessor.
    pub fn new(name: impl Into<Cow<'static, str>>, accessor: fn(&R) -> Option<String>) -> Self {
        Self {
            name: name.into(),
            readable: true,
            accessor,
        }
    }

    /// Field that exists on the shape but cannot be read; excluded from exports.
    pub fn write_only(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            readable: false,
            accessor: |_| None,
        }
    }

    /// Field name, used as default header text and as the header-map key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the field takes part in exports.
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Read the field's display text from `record`.
    pub fn read(&self, record: &R) -> Option<String> {
        if !self.readable {
            return None;
        }
        (self.accessor)(record)
    }
}

impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            readable: self.readable,
            accessor: self.accessor,
        }
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("readable", &self.readable)
            .finish_non_exhaustive()
    }
}

/// A record shape that can describe its own fields.
pub trait Record {
    /// Field descriptors in column order.
    fn field_descriptors() -> Vec<FieldDescriptor<Self>>
    where
        Self: Sized;
}

/// Implement [`Record`] for a struct from a list of its fields.
///
/// Each field becomes one column, in the order listed. A field may be given a
/// display name with `as "Name"`; otherwise its identifier is used.
///
/// ```
/// use shopkit_io_xlsx::export_record;
///
/// struct Product {
///     id: u32,
///     name: String,
///     discontinued_on: Option<String>,
/// }
///
/// export_record!(Product {
///     id as "Id",
///     name as "Name",
///     discontinued_on,
/// });
/// ```
#[macro_export]
macro_rules! export_record {
    ($ty:ty { $($field:ident $(as $label:literal)?),* $(,)? }) => {
        impl $crate::record::Record for $ty {
            fn field_descriptors() -> ::std::vec::Vec<$crate::record::FieldDescriptor<Self>> {
                ::std::vec![
                    $(
                        $crate::record::FieldDescriptor::new(
                            $crate::__export_field_name!($field $(, $label)?),
                            |record: &Self| $crate::record::CellText::to_cell_text(&record.$field),
                        ),
                    )*
                ]
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __export_field_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $label:literal) => {
        $label
    };
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TableSource

/// Row-major tabular data the writer can export.
pub trait TableSource {
    /// Column names in output order.
    fn column_names(&self) -> Vec<String>;

    /// Number of data rows.
    fn height(&self) -> usize;

    /// Display text of one cell; `None` renders as an empty cell.
    fn cell_text(&self, idx_row: usize, idx_col: usize) -> Option<String>;
}

/// A record slice with its readable fields discovered once.
pub struct RecordTable<'a, R> {
    records: &'a [R],
    l_fields: Vec<FieldDescriptor<R>>,
}

impl<'a, R: Record> RecordTable<'a, R> {
    /// Discover the readable fields of `R` and bind them to `records`.
    pub fn new(records: &'a [R]) -> Self {
        let l_fields = R::field_descriptors()
            .into_iter()
            .filter(FieldDescriptor::is_readable)
            .collect();
        Self { records, l_fields }
    }
}

impl<R> RecordTable<'_, R> {
    /// Discovered fields in column order.
    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.l_fields
    }
}

impl<R> TableSource for RecordTable<'_, R> {
    fn column_names(&self) -> Vec<String> {
        self.l_fields
            .iter()
            .map(|field| field.name().to_string())
            .collect()
    }

    fn height(&self) -> usize {
        self.records.len()
    }

    fn cell_text(&self, idx_row: usize, idx_col: usize) -> Option<String> {
        let record = self.records.get(idx_row)?;
        self.l_fields.get(idx_col)?.read(record)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    struct Product {
        id: u32,
        name: String,
        price: Option<Decimal>,
    }

    crate::export_record!(Product {
        id as "Id",
        name as "Name",
        price,
    });

    struct Account {
        login: String,
    }

    impl Record for Account {
        fn field_descriptors() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::new("Login", |account: &Self| account.login.to_cell_text()),
                FieldDescriptor::write_only("Password"),
            ]
        }
    }

    struct Empty;

    impl Record for Empty {
        fn field_descriptors() -> Vec<FieldDescriptor<Self>> {
            vec![]
        }
    }

    fn derive_products() -> Vec<Product> {
        vec![
            Product {
                id: 1,
                name: "Widget".to_string(),
                price: Some(Decimal::new(1999, 2)),
            },
            Product {
                id: 2,
                name: "Gadget".to_string(),
                price: None,
            },
        ]
    }

    #[test]
    fn test_export_record_macro_keeps_declared_order_and_labels() {
        let l_names: Vec<String> = Product::field_descriptors()
            .iter()
            .map(|field| field.name().to_string())
            .collect();
        assert_eq!(l_names, vec!["Id", "Name", "price"]);
    }

    #[test]
    fn test_record_table_reads_cells_positionally() {
        let l_products = derive_products();
        let table = RecordTable::new(&l_products);

        assert_eq!(table.height(), 2);
        assert_eq!(table.cell_text(0, 0).as_deref(), Some("1"));
        assert_eq!(table.cell_text(0, 1).as_deref(), Some("Widget"));
        assert_eq!(table.cell_text(0, 2).as_deref(), Some("19.99"));
        assert_eq!(table.cell_text(1, 2), None);
        assert_eq!(table.cell_text(2, 0), None);
        assert_eq!(table.cell_text(0, 3), None);
    }

    #[test]
    fn test_record_table_skips_unreadable_fields() {
        let l_accounts = vec![Account {
            login: "ada".to_string(),
        }];
        let table = RecordTable::new(&l_accounts);

        assert_eq!(table.column_names(), vec!["Login"]);
        assert_eq!(table.fields().len(), 1);
        assert!(!FieldDescriptor::<Account>::write_only("Password").is_readable());
    }

    #[test]
    fn test_record_table_without_fields_is_valid() {
        let l_rows = vec![Empty, Empty];
        let table = RecordTable::new(&l_rows);

        assert!(table.column_names().is_empty());
        assert_eq!(table.height(), 2);
    }

    #[test]
    fn test_cell_text_uses_natural_display() {
        assert_eq!(42u8.to_cell_text().as_deref(), Some("42"));
        assert_eq!(1.5f64.to_cell_text().as_deref(), Some("1.5"));
        assert_eq!(true.to_cell_text().as_deref(), Some("true"));
        assert_eq!("abc".to_cell_text().as_deref(), Some("abc"));
        assert_eq!(None::<i32>.to_cell_text(), None);
        assert_eq!(Some(Some(7)).to_cell_text().as_deref(), Some("7"));
        assert_eq!(Box::new(3i64).to_cell_text().as_deref(), Some("3"));
        assert_eq!(
            NaiveDate::from_ymd_opt(2026, 10, 16)
                .expect("valid date")
                .to_cell_text()
                .as_deref(),
            Some("2026-10-16")
        );
        assert_eq!(Uuid::nil().to_cell_text().as_deref(), Some("00000000-0000-0000-0000-000000000000"));
    }
}
