//! Rules for the inputs table

use super::{check_bound, check_len, check_name, existing, Bound, Rejection, Verdict};
use crate::catalog::DataType;
use crate::category::{allowed_categories, category_list, Category, InputType};
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::format;
use crate::table::{Column, GridRow, InputRow};

/// Decide an edit of `column` on input row `index`.
///
/// `row` is the row before the edit and `names` the Name column of the whole
/// table. Fails only on a DataType/InputType token outside the closed sets or
/// a column the inputs table does not have.
pub fn check_input_edit(
    row: &InputRow,
    index: usize,
    names: &[String],
    column: Column,
    old: &str,
    new: &str,
    config: &SessionConfig,
) -> Result<Verdict> {
    let verdict = match column {
        Column::Name => check_name(names, index, old, new, config),
        Column::InputType => {
            let input_type: InputType = new.parse()?;
            if input_type != row.input_type {
                Verdict::accept().with_write(Column::Category, "")
            } else {
                Verdict::accept()
            }
        }
        Column::Category => check_category(row.input_type, old, new),
        Column::DataType => {
            let data_type: DataType = new.parse()?;
            Verdict::accept()
                .with_write(Column::Min, "")
                .with_write(Column::Max, "")
                .with_write(Column::Len, "")
                .with_write(Column::Default, data_type.default_literal())
        }
        Column::Default => check_default(row, old, new),
        Column::Min => check_bound(
            Bound::Min,
            row.data_type,
            &row.max,
            Some(&row.default),
            old,
            new,
        ),
        Column::Max => check_bound(
            Bound::Max,
            row.data_type,
            &row.min,
            Some(&row.default),
            old,
            new,
        ),
        Column::Len => check_len(row.data_type, old, new),
        Column::Description | Column::Unit | Column::Uri => Verdict::accept(),
        other => {
            return Err(Error::ColumnNotInTable {
                table: InputRow::KIND,
                column: other,
            })
        }
    };
    Ok(verdict)
}

fn check_category(input_type: InputType, old: &str, new: &str) -> Verdict {
    if input_type.is_empty() {
        return Verdict::reset(Column::Category, Rejection::InputTypeRequired);
    }

    let allowed = allowed_categories(input_type);
    match Category::from_token(new) {
        Some(category) if allowed.contains(&category) => {
            Verdict::accept_as(Column::Category, new, category.as_str().to_string())
        }
        _ => Verdict::revert(
            Column::Category,
            old,
            Rejection::CategoryNotAllowed {
                input_type,
                allowed: category_list(allowed),
            },
        ),
    }
}

fn check_default(row: &InputRow, old: &str, new: &str) -> Verdict {
    if new.trim().is_empty() {
        return Verdict::accept_as(Column::Default, new, String::new());
    }
    if row.data_type.is_empty() {
        return Verdict::revert(Column::Default, old, Rejection::DataTypeRequired);
    }

    let stored = match format::canonicalize(row.data_type, new) {
        Ok(stored) => stored,
        Err(e) => return Verdict::revert(Column::Default, old, e),
    };

    if let Some(Ok(value)) = format::parse_number(row.data_type, &stored) {
        let below = existing(row.data_type, &row.min).is_some_and(|min| min > value);
        let above = existing(row.data_type, &row.max).is_some_and(|max| max < value);
        if below || above {
            return Verdict::revert(Column::Default, old, Rejection::DefaultOutOfRange);
        }
    }

    Verdict::accept_as(Column::Default, new, stored)
}
