//! Rules for the outputs table
//!
//! Same shape as the input rules without InputType or Default. Category is
//! not gated: outputs have no input type to gate it on, so any token is kept.

use super::{check_bound, check_len, check_name, Bound, Verdict};
use crate::catalog::DataType;
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::table::{Column, GridRow, OutputRow};

pub fn check_output_edit(
    row: &OutputRow,
    index: usize,
    names: &[String],
    column: Column,
    old: &str,
    new: &str,
    config: &SessionConfig,
) -> Result<Verdict> {
    let verdict = match column {
        Column::Name => check_name(names, index, old, new, config),
        Column::DataType => {
            let _: DataType = new.parse()?;
            Verdict::accept()
                .with_write(Column::Min, "")
                .with_write(Column::Max, "")
                .with_write(Column::Len, "")
        }
        Column::Min => check_bound(Bound::Min, row.data_type, &row.max, None, old, new),
        Column::Max => check_bound(Bound::Max, row.data_type, &row.min, None, old, new),
        Column::Len => check_len(row.data_type, old, new),
        Column::Description | Column::Category | Column::Unit | Column::Uri => Verdict::accept(),
        other => {
            return Err(Error::ColumnNotInTable {
                table: OutputRow::KIND,
                column: other,
            })
        }
    };
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rejection;
    use pretty_assertions::assert_eq;

    fn edit(row: &OutputRow, column: Column, old: &str, new: &str) -> Result<Verdict> {
        let names = vec![row.name.clone(), "other".to_string()];
        check_output_edit(row, 0, &names, column, old, new, &SessionConfig::default())
    }

    #[test]
    fn test_data_type_change_keeps_no_default() {
        let row = OutputRow {
            data_type: DataType::Int,
            min: "1".to_string(),
            ..OutputRow::default()
        };
        let v = edit(&row, Column::DataType, "INT", "INTARRAY").unwrap();
        assert_eq!(
            v.writes,
            vec![
                (Column::Min, String::new()),
                (Column::Max, String::new()),
                (Column::Len, String::new()),
            ]
        );
    }

    #[test]
    fn test_category_is_free() {
        let row = OutputRow::default();
        assert_eq!(
            edit(&row, Column::Category, "", "genotypic").unwrap(),
            Verdict::accept()
        );
    }

    #[test]
    fn test_bounds_without_default() {
        let row = OutputRow {
            data_type: DataType::Double,
            max: "2.0".to_string(),
            ..OutputRow::default()
        };
        assert_eq!(
            edit(&row, Column::Min, "", "1.").unwrap(),
            Verdict::accept().with_write(Column::Min, "1.0")
        );
        let v = edit(&row, Column::Min, "", "3.5").unwrap();
        assert_eq!(v.rejection, Some(Rejection::MinAboveMax));

        let row = OutputRow {
            data_type: DataType::Double,
            min: "2.0".to_string(),
            ..OutputRow::default()
        };
        let v = edit(&row, Column::Max, "4.0", "1.0").unwrap();
        assert_eq!(v.writes, vec![(Column::Max, "4.0".to_string())]);
        assert_eq!(v.rejection, Some(Rejection::MinAboveMax));
    }

    #[test]
    fn test_len_on_outputs() {
        let row = OutputRow {
            data_type: DataType::DateArray,
            ..OutputRow::default()
        };
        assert!(edit(&row, Column::Len, "", "12").unwrap().accepted);
        let row = OutputRow {
            data_type: DataType::Date,
            ..OutputRow::default()
        };
        let v = edit(&row, Column::Len, "", "12").unwrap();
        assert_eq!(v.rejection, Some(Rejection::LenRequiresArray));
    }

    #[test]
    fn test_duplicate_output_name() {
        let row = OutputRow::default();
        let v = edit(&row, Column::Name, "", "other").unwrap();
        assert_eq!(v.rejection, Some(Rejection::DuplicateName));
    }

    #[test]
    fn test_default_not_an_output_column() {
        let row = OutputRow::default();
        assert!(matches!(
            edit(&row, Column::Default, "", "1"),
            Err(Error::ColumnNotInTable { .. })
        ));
    }
}
