//! Rule for the function table
//!
//! The function name is never typed: it is derived from the file name, which
//! must carry the configured source extension.

use super::{Rejection, Verdict};
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::table::{Column, FunctionRow, GridRow};

pub fn check_function_edit(
    column: Column,
    old: &str,
    new: &str,
    config: &SessionConfig,
) -> Result<Verdict> {
    match column {
        Column::FunctionName => Ok(Verdict::revert(
            Column::FunctionName,
            old,
            Rejection::FunctionNameReadOnly,
        )),
        Column::FileName => Ok(check_file_name(old, new, &config.function_extension)),
        other => Err(Error::ColumnNotInTable {
            table: FunctionRow::KIND,
            column: other,
        }),
    }
}

fn check_file_name(old: &str, new: &str, expected: &str) -> Verdict {
    let path = new.trim();
    let extension = path.rsplit_once('.').map(|(_, ext)| ext.to_lowercase());
    if extension.as_deref() != Some(expected.to_lowercase().as_str()) {
        return Verdict::revert(
            Column::FileName,
            old,
            Rejection::WrongExtension {
                expected: expected.to_string(),
            },
        );
    }
    Verdict::accept_as(Column::FileName, new, path.to_string())
        .with_write(Column::FunctionName, function_name(path))
}

/// Strip any directory prefix and the extension
pub fn function_name(file_name: &str) -> &str {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    base.rsplit_once('.').map_or(base, |(stem, _)| stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn edit(column: Column, old: &str, new: &str) -> Verdict {
        check_function_edit(column, old, new, &SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_file_name_derives_function() {
        assert_eq!(
            edit(Column::FileName, "", "model_core.pyx"),
            Verdict::accept().with_write(Column::FunctionName, "model_core")
        );
        assert_eq!(
            edit(Column::FileName, "", "algo/pyx/Phenology.PYX"),
            Verdict::accept().with_write(Column::FunctionName, "Phenology")
        );
    }

    #[test]
    fn test_wrong_extension_reverts_file_name() {
        let v = edit(Column::FileName, "model_core.pyx", "model_core.py");
        assert!(!v.accepted);
        assert_eq!(v.writes, vec![(Column::FileName, "model_core.pyx".to_string())]);
        assert!(matches!(v.rejection, Some(Rejection::WrongExtension { .. })));

        assert!(!edit(Column::FileName, "", "noextension").accepted);
    }

    #[test]
    fn test_function_name_is_read_only() {
        let v = edit(Column::FunctionName, "model_core", "other");
        assert_eq!(v.writes, vec![(Column::FunctionName, "model_core".to_string())]);
        assert_eq!(v.rejection, Some(Rejection::FunctionNameReadOnly));
    }

    #[test]
    fn test_configured_extension() {
        let config = SessionConfig {
            function_extension: "f90".to_string(),
            ..SessionConfig::default()
        };
        let v = check_function_edit(Column::FileName, "", "src\\growth.f90", &config).unwrap();
        assert_eq!(v.writes, vec![(Column::FunctionName, "growth".to_string())]);
    }

    #[test]
    fn test_padded_file_name_is_stored_trimmed() {
        assert_eq!(
            edit(Column::FileName, "", " growth.pyx "),
            Verdict::accept()
                .with_write(Column::FileName, "growth.pyx")
                .with_write(Column::FunctionName, "growth")
        );
    }

    #[test]
    fn test_function_name_helper() {
        assert_eq!(function_name("a/b/c.tar.pyx"), "c.tar");
        assert_eq!(function_name("plain"), "plain");
    }
}
