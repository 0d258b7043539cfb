//! Blank-row writes for freshly appended rows

use crate::dispatcher::CellWrite;
use crate::table::{Column, TableKind};

/// Writes that blank every editable cell of a new row.
///
/// Outputs also blank the InputType placeholder some grids carry.
pub fn blank_row_writes(table: TableKind, row: usize) -> Vec<CellWrite> {
    let mut writes: Vec<CellWrite> = table
        .columns()
        .iter()
        .map(|&column| CellWrite::new(row, column, ""))
        .collect();

    if table == TableKind::Outputs {
        writes.push(CellWrite::new(row, Column::InputType, ""));
    }

    writes
}
