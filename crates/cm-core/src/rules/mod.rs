//! Per-column consistency rules
//!
//! A rule looks at the row as it stood before the edit, the literal the user
//! typed, and returns a [`Verdict`]: accept or reject, plus the corrective
//! writes that bring the row back to a consistent state. Rules are pure;
//! applying the writes is the dispatcher's job.

pub mod function;
pub mod input;
pub mod output;

use crate::catalog::DataType;
use crate::category::InputType;
use crate::config::SessionConfig;
use crate::format::{self, FormatError, Number};
use crate::table::Column;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Diagnostic families shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// Literal does not parse for the declared type
    Format,
    /// Min/Max/Default ordering violated
    Range,
    /// Field edited before its prerequisite field
    Dependency,
    /// Name collides with another row
    Uniqueness,
}

/// Why an edit was not accepted as typed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("this name is already defined.")]
    DuplicateName,

    #[error("a name cannot be empty.")]
    EmptyName,

    #[error("You must assign an input type before giving a category.")]
    InputTypeRequired,

    #[error("{input_type} category must be among the list {allowed}.")]
    CategoryNotAllowed {
        input_type: InputType,
        allowed: String,
    },

    #[error("you must assign a DataType before giving a default value.")]
    DataTypeRequired,

    #[error("{0}")]
    Format(#[from] FormatError),

    #[error("default value must be in between Min and Max.")]
    DefaultOutOfRange,

    #[error("this data type does not handle min and max, or is not defined yet.")]
    MinMaxUnsupported,

    #[error("Minimum > Maximum.")]
    MinAboveMax,

    #[error("Minimum > Default.")]
    MinAboveDefault,

    #[error("Maximum < Default.")]
    MaxBelowDefault,

    #[error("Len is exclusive to ARRAY type.")]
    LenRequiresArray,

    #[error("you must assign a DataType before giving a length.")]
    LenRequiresDataType,

    #[error("enter a file name, the function name is derived from it.")]
    FunctionNameReadOnly,

    #[error("wrong file extension, file must be .{expected} format.")]
    WrongExtension { expected: String },
}

impl Rejection {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Rejection::DuplicateName | Rejection::EmptyName => DiagnosticKind::Uniqueness,
            Rejection::CategoryNotAllowed { .. }
            | Rejection::Format(_)
            | Rejection::WrongExtension { .. } => DiagnosticKind::Format,
            Rejection::DefaultOutOfRange
            | Rejection::MinAboveMax
            | Rejection::MinAboveDefault
            | Rejection::MaxBelowDefault => DiagnosticKind::Range,
            Rejection::InputTypeRequired
            | Rejection::DataTypeRequired
            | Rejection::MinMaxUnsupported
            | Rejection::LenRequiresArray
            | Rejection::LenRequiresDataType
            | Rejection::FunctionNameReadOnly => DiagnosticKind::Dependency,
        }
    }

    /// Category membership and the read-only function name are warnings
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Rejection::CategoryNotAllowed { .. }
                | Rejection::InputTypeRequired
                | Rejection::FunctionNameReadOnly
        )
    }

    /// Line shown under the grid
    pub fn display_message(&self) -> String {
        let prefix = if self.is_warning() { "Warning" } else { "Error" };
        format!("{prefix} : {self}")
    }
}

impl Serialize for Rejection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Rejection", 2)?;
        s.serialize_field("kind", &self.kind())?;
        s.serialize_field("message", &self.display_message())?;
        s.end()
    }
}

/// Decision for one edit of one cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verdict {
    /// Whether the typed value (possibly canonicalized) stays in the cell
    pub accepted: bool,
    /// Corrective writes on the same row, applied in order
    pub writes: Vec<(Column, String)>,
    pub rejection: Option<Rejection>,
}

impl Verdict {
    pub fn accept() -> Self {
        Self {
            accepted: true,
            ..Self::default()
        }
    }

    /// Put the previous value back
    pub fn revert(column: Column, old: &str, rejection: impl Into<Rejection>) -> Self {
        Self {
            accepted: false,
            writes: vec![(column, old.to_string())],
            rejection: Some(rejection.into()),
        }
    }

    /// Blank the edited cell
    pub fn reset(column: Column, rejection: Rejection) -> Self {
        Self::revert(column, "", rejection)
    }

    pub fn with_write(mut self, column: Column, value: impl Into<String>) -> Self {
        self.writes.push((column, value.into()));
        self
    }

    /// Accept, storing `stored` if it differs from what was typed
    fn accept_as(column: Column, typed: &str, stored: String) -> Self {
        if stored == typed {
            Self::accept()
        } else {
            Self::accept().with_write(column, stored)
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.rejection, self.accepted) {
            (Some(r), _) => write!(f, "rejected: {r}"),
            (None, true) => f.write_str("accepted"),
            (None, false) => f.write_str("rejected"),
        }
    }
}

/// Name edits: reject a collision with any other row of the same table
pub(crate) fn check_name(
    names: &[String],
    row: usize,
    old: &str,
    new: &str,
    config: &SessionConfig,
) -> Verdict {
    if new.trim().is_empty() {
        if config.allow_empty_names {
            return Verdict::accept();
        }
        return Verdict::revert(Column::Name, old, Rejection::EmptyName);
    }

    let taken = names
        .iter()
        .enumerate()
        .any(|(i, name)| i != row && name == new);
    if taken {
        Verdict::revert(Column::Name, old, Rejection::DuplicateName)
    } else {
        Verdict::accept()
    }
}

/// Which bound of the [Min, Max] interval is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
    Min,
    Max,
}

impl Bound {
    fn column(self) -> Column {
        match self {
            Bound::Min => Column::Min,
            Bound::Max => Column::Max,
        }
    }
}

/// Parse an existing cell; absent or unparseable means unconstrained
fn existing(data_type: DataType, literal: &str) -> Option<Number> {
    format::stored_number(data_type, literal)
}

/// Min/Max edits shared by inputs (with a Default) and outputs (without).
///
/// A rejected edit always reverts to `old`; the trailing-zero DOUBLE form is
/// stored only when the edit is accepted.
pub(crate) fn check_bound(
    bound: Bound,
    data_type: DataType,
    opposite: &str,
    default: Option<&str>,
    old: &str,
    new: &str,
) -> Verdict {
    let column = bound.column();

    if new.trim().is_empty() {
        return Verdict::accept_as(column, new, String::new());
    }

    let value = match format::parse_number(data_type, new) {
        None => return Verdict::revert(column, old, Rejection::MinMaxUnsupported),
        Some(Err(e)) => return Verdict::revert(column, old, e),
        Some(Ok(v)) => v,
    };

    if let Some(other) = existing(data_type, opposite) {
        let crossed = match bound {
            Bound::Min => value > other,
            Bound::Max => value < other,
        };
        if crossed {
            return Verdict::revert(column, old, Rejection::MinAboveMax);
        }
    }

    if let Some(default) = default.and_then(|d| existing(data_type, d)) {
        match bound {
            Bound::Min if value > default => {
                return Verdict::revert(column, old, Rejection::MinAboveDefault)
            }
            Bound::Max if value < default => {
                return Verdict::revert(column, old, Rejection::MaxBelowDefault)
            }
            _ => {}
        }
    }

    Verdict::accept_as(column, new, format::canonical_number(data_type, new))
}

/// Len edits, identical for inputs and outputs
pub(crate) fn check_len(data_type: DataType, old: &str, new: &str) -> Verdict {
    if data_type.is_empty() {
        return Verdict::revert(Column::Len, old, Rejection::LenRequiresDataType);
    }
    if !data_type.takes_len() {
        return Verdict::reset(Column::Len, Rejection::LenRequiresArray);
    }
    match format::parse_int(new) {
        Ok(_) => Verdict::accept_as(Column::Len, new, new.trim().to_string()),
        Err(e) => Verdict::revert(Column::Len, old, e),
    }
}
