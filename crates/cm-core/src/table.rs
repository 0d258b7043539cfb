//! Row and table types for a unit model being edited
//!
//! Cells are exchanged with the grid as plain strings. Enumerated columns
//! (InputType, DataType) are stored typed, so a token outside the closed set
//! can never settle into a row.

use crate::catalog::DataType;
use crate::category::InputType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the four edited tables a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Inputs,
    Outputs,
    Algorithms,
    Functions,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Inputs,
        TableKind::Outputs,
        TableKind::Algorithms,
        TableKind::Functions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Inputs => "inputs",
            TableKind::Outputs => "outputs",
            TableKind::Algorithms => "algorithms",
            TableKind::Functions => "functions",
        }
    }

    /// Editable columns in grid order
    pub fn columns(&self) -> &'static [Column] {
        match self {
            TableKind::Inputs => InputRow::COLUMNS,
            TableKind::Outputs => OutputRow::COLUMNS,
            TableKind::Algorithms => AlgorithmRow::COLUMNS,
            TableKind::Functions => FunctionRow::COLUMNS,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TableKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown table '{s}' (expected inputs, outputs, algorithms or functions)"))
    }
}

/// A grid column header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Column {
    Name,
    Description,
    InputType,
    Category,
    DataType,
    Len,
    Default,
    Min,
    Max,
    Unit,
    Uri,
    Algorithm,
    FunctionName,
    FileName,
}

impl Column {
    const ALL: [Column; 14] = [
        Column::Name,
        Column::Description,
        Column::InputType,
        Column::Category,
        Column::DataType,
        Column::Len,
        Column::Default,
        Column::Min,
        Column::Max,
        Column::Unit,
        Column::Uri,
        Column::Algorithm,
        Column::FunctionName,
        Column::FileName,
    ];

    /// Header text as shown by the grid
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Description => "Description",
            Column::InputType => "InputType",
            Column::Category => "Category",
            Column::DataType => "DataType",
            Column::Len => "Len",
            Column::Default => "Default",
            Column::Min => "Min",
            Column::Max => "Max",
            Column::Unit => "Unit",
            Column::Uri => "Uri",
            Column::Algorithm => "Algorithm",
            Column::FunctionName => "Function name",
            Column::FileName => "File name",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let header = s.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(header))
            .ok_or_else(|| Error::UnknownColumnName(s.to_string()))
    }
}

impl TryFrom<String> for Column {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Column> for String {
    fn from(value: Column) -> Self {
        value.as_str().to_string()
    }
}

/// String-cell access shared by every row shape
pub trait GridRow: Default {
    const KIND: TableKind;
    const COLUMNS: &'static [Column];

    /// Current cell text, `None` if the column is not part of this row
    fn cell(&self, column: Column) -> Option<String>;

    /// Store a cell value
    fn set_cell(&mut self, column: Column, value: &str) -> Result<()>;
}

fn not_in_table(table: TableKind, column: Column) -> Error {
    Error::ColumnNotInTable { table, column }
}

/// One row of the inputs table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRow {
    pub name: String,
    pub description: String,
    pub input_type: InputType,
    pub category: String,
    pub data_type: DataType,
    pub len: String,
    pub default: String,
    pub min: String,
    pub max: String,
    pub unit: String,
    pub uri: String,
}

impl GridRow for InputRow {
    const KIND: TableKind = TableKind::Inputs;
    const COLUMNS: &'static [Column] = &[
        Column::Name,
        Column::Description,
        Column::InputType,
        Column::Category,
        Column::DataType,
        Column::Len,
        Column::Default,
        Column::Min,
        Column::Max,
        Column::Unit,
        Column::Uri,
    ];

    fn cell(&self, column: Column) -> Option<String> {
        let value = match column {
            Column::Name => &self.name,
            Column::Description => &self.description,
            Column::InputType => return Some(self.input_type.to_string()),
            Column::Category => &self.category,
            Column::DataType => return Some(self.data_type.to_string()),
            Column::Len => &self.len,
            Column::Default => &self.default,
            Column::Min => &self.min,
            Column::Max => &self.max,
            Column::Unit => &self.unit,
            Column::Uri => &self.uri,
            _ => return None,
        };
        Some(value.clone())
    }

    fn set_cell(&mut self, column: Column, value: &str) -> Result<()> {
        let slot = match column {
            Column::Name => &mut self.name,
            Column::Description => &mut self.description,
            Column::InputType => {
                self.input_type = value.parse()?;
                return Ok(());
            }
            Column::Category => &mut self.category,
            Column::DataType => {
                self.data_type = value.parse()?;
                return Ok(());
            }
            Column::Len => &mut self.len,
            Column::Default => &mut self.default,
            Column::Min => &mut self.min,
            Column::Max => &mut self.max,
            Column::Unit => &mut self.unit,
            Column::Uri => &mut self.uri,
            other => return Err(not_in_table(Self::KIND, other)),
        };
        *slot = value.to_string();
        Ok(())
    }
}

/// One row of the outputs table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    pub name: String,
    pub description: String,
    pub category: String,
    pub data_type: DataType,
    pub len: String,
    pub min: String,
    pub max: String,
    pub unit: String,
    pub uri: String,
}

impl GridRow for OutputRow {
    const KIND: TableKind = TableKind::Outputs;
    const COLUMNS: &'static [Column] = &[
        Column::Name,
        Column::Description,
        Column::Category,
        Column::DataType,
        Column::Len,
        Column::Min,
        Column::Max,
        Column::Unit,
        Column::Uri,
    ];

    fn cell(&self, column: Column) -> Option<String> {
        let value = match column {
            Column::Name => &self.name,
            Column::Description => &self.description,
            Column::Category => &self.category,
            Column::DataType => return Some(self.data_type.to_string()),
            Column::Len => &self.len,
            Column::Min => &self.min,
            Column::Max => &self.max,
            Column::Unit => &self.unit,
            Column::Uri => &self.uri,
            _ => return None,
        };
        Some(value.clone())
    }

    fn set_cell(&mut self, column: Column, value: &str) -> Result<()> {
        let slot = match column {
            Column::Name => &mut self.name,
            Column::Description => &mut self.description,
            Column::Category => &mut self.category,
            Column::DataType => {
                self.data_type = value.parse()?;
                return Ok(());
            }
            Column::Len => &mut self.len,
            Column::Min => &mut self.min,
            Column::Max => &mut self.max,
            Column::Unit => &mut self.unit,
            Column::Uri => &mut self.uri,
            // Some grids carry an InputType placeholder on outputs; it is
            // blanked on append and never stored.
            Column::InputType if value.is_empty() => return Ok(()),
            other => return Err(not_in_table(Self::KIND, other)),
        };
        *slot = value.to_string();
        Ok(())
    }
}

/// One row of the algorithms table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmRow {
    pub filename: String,
}

impl GridRow for AlgorithmRow {
    const KIND: TableKind = TableKind::Algorithms;
    const COLUMNS: &'static [Column] = &[Column::Algorithm];

    fn cell(&self, column: Column) -> Option<String> {
        (column == Column::Algorithm).then(|| self.filename.clone())
    }

    fn set_cell(&mut self, column: Column, value: &str) -> Result<()> {
        match column {
            Column::Algorithm => {
                self.filename = value.to_string();
                Ok(())
            }
            other => Err(not_in_table(Self::KIND, other)),
        }
    }
}

/// One row of the function table: display name derived from a source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionRow {
    pub name: String,
    pub filename: String,
}

impl GridRow for FunctionRow {
    const KIND: TableKind = TableKind::Functions;
    const COLUMNS: &'static [Column] = &[Column::FunctionName, Column::FileName];

    fn cell(&self, column: Column) -> Option<String> {
        match column {
            Column::FunctionName => Some(self.name.clone()),
            Column::FileName => Some(self.filename.clone()),
            _ => None,
        }
    }

    fn set_cell(&mut self, column: Column, value: &str) -> Result<()> {
        match column {
            Column::FunctionName => self.name = value.to_string(),
            Column::FileName => self.filename = value.to_string(),
            other => return Err(not_in_table(Self::KIND, other)),
        }
        Ok(())
    }
}

/// The four tables of one editing session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelTables {
    pub inputs: Vec<InputRow>,
    pub outputs: Vec<OutputRow>,
    pub algorithms: Vec<AlgorithmRow>,
    pub functions: Vec<FunctionRow>,
}

impl ModelTables {
    /// Get the number of rows in a table
    pub fn row_count(&self, table: TableKind) -> usize {
        match table {
            TableKind::Inputs => self.inputs.len(),
            TableKind::Outputs => self.outputs.len(),
            TableKind::Algorithms => self.algorithms.len(),
            TableKind::Functions => self.functions.len(),
        }
    }

    /// Read one cell
    pub fn cell(&self, table: TableKind, row: usize, column: Column) -> Result<String> {
        match table {
            TableKind::Inputs => read(&self.inputs, row, column),
            TableKind::Outputs => read(&self.outputs, row, column),
            TableKind::Algorithms => read(&self.algorithms, row, column),
            TableKind::Functions => read(&self.functions, row, column),
        }
    }

    /// Overwrite one cell without running any rule
    pub fn write(&mut self, table: TableKind, row: usize, column: Column, value: &str) -> Result<()> {
        match table {
            TableKind::Inputs => write(&mut self.inputs, row, column, value),
            TableKind::Outputs => write(&mut self.outputs, row, column, value),
            TableKind::Algorithms => write(&mut self.algorithms, row, column, value),
            TableKind::Functions => write(&mut self.functions, row, column, value),
        }
    }

    /// Append a default row and return its index
    pub fn push_row(&mut self, table: TableKind) -> usize {
        match table {
            TableKind::Inputs => push(&mut self.inputs),
            TableKind::Outputs => push(&mut self.outputs),
            TableKind::Algorithms => push(&mut self.algorithms),
            TableKind::Functions => push(&mut self.functions),
        }
    }
}

fn read<R: GridRow>(rows: &[R], row: usize, column: Column) -> Result<String> {
    let r = rows.get(row).ok_or(Error::RowOutOfRange {
        table: R::KIND,
        row,
        len: rows.len(),
    })?;
    r.cell(column).ok_or_else(|| not_in_table(R::KIND, column))
}

fn write<R: GridRow>(rows: &mut [R], row: usize, column: Column, value: &str) -> Result<()> {
    let len = rows.len();
    rows.get_mut(row)
        .ok_or(Error::RowOutOfRange {
            table: R::KIND,
            row,
            len,
        })?
        .set_cell(column, value)
}

fn push<R: GridRow>(rows: &mut Vec<R>) -> usize {
    rows.push(R::default());
    rows.len() - 1
}
