//! Edit session: routes grid events to the rules and settles the row
//!
//! The session owns a mirror of the four tables for the lifetime of one
//! editing session. Each event is handled in two phases: the rule for the
//! edited column decides from the row as it stood, then the user's edit and
//! the queued corrective writes are drained into the mirror. Corrective
//! writes go straight to the tables and never back through the rules, so one
//! user edit yields exactly one settled row.

use crate::config::SessionConfig;
use crate::error::Result;
use crate::initializer::blank_row_writes;
use crate::rules::function::check_function_edit;
use crate::rules::input::check_input_edit;
use crate::rules::output::check_output_edit;
use crate::rules::{Rejection, Verdict};
use crate::table::{Column, GridRow, ModelTables, TableKind};
use serde::Serialize;
use std::collections::VecDeque;

/// An assignment the grid must mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellWrite {
    pub row: usize,
    pub column: Column,
    pub value: String,
}

impl CellWrite {
    pub fn new(row: usize, column: Column, value: impl Into<String>) -> Self {
        Self {
            row,
            column,
            value: value.into(),
        }
    }
}

/// Result of one cell-edit event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    /// Whether the typed value (possibly canonicalized) was kept
    pub accepted: bool,
    /// Corrective writes, including any revert of the edited cell
    pub writes: Vec<CellWrite>,
    /// Diagnostic to display, replacing any previous one
    pub message: Option<Rejection>,
}

/// One open editing session over a unit model's tables
#[derive(Debug, Clone)]
pub struct EditSession {
    tables: ModelTables,
    config: SessionConfig,
    last_message: Option<Rejection>,
    pending: VecDeque<CellWrite>,
}

impl EditSession {
    /// Start a session over loaded tables
    pub fn new(tables: ModelTables, config: SessionConfig) -> Self {
        Self {
            tables,
            config,
            last_message: None,
            pending: VecDeque::new(),
        }
    }

    pub fn tables(&self) -> &ModelTables {
        &self.tables
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// End the session, handing back the settled tables
    pub fn into_tables(self) -> ModelTables {
        self.tables
    }

    /// The diagnostic of the most recent event, if it produced one
    pub fn last_message(&self) -> Option<&Rejection> {
        self.last_message.as_ref()
    }

    /// Handle a cell edit the grid has already displayed.
    ///
    /// Errors only on contract violations: unknown row, a column the table
    /// does not have, or a DataType/InputType token outside the catalog.
    pub fn on_cell_edit(
        &mut self,
        table: TableKind,
        row: usize,
        column: Column,
        old: &str,
        new: &str,
    ) -> Result<EditOutcome> {
        self.last_message = None;

        let mirrored = self.tables.cell(table, row, column)?;
        if mirrored != old {
            log::warn!(
                "{table}[{row}].{column}: grid reports old value {old:?}, session holds {mirrored:?}"
            );
        }

        let verdict = self.decide(table, row, column, old, new)?;
        log::debug!("{table}[{row}].{column} = {new:?}: {verdict}");

        self.pending.push_back(CellWrite::new(row, column, new));
        let writes: Vec<CellWrite> = verdict
            .writes
            .into_iter()
            .map(|(column, value)| CellWrite::new(row, column, value))
            .collect();
        self.pending.extend(writes.iter().cloned());
        self.drain(table)?;

        self.last_message = verdict.rejection.clone();
        Ok(EditOutcome {
            accepted: verdict.accepted,
            writes,
            message: verdict.rejection,
        })
    }

    /// Handle a row the grid has just appended at index `row`.
    ///
    /// The mirror grows by one row if the grid is ahead of it.
    pub fn on_row_appended(&mut self, table: TableKind, row: usize) -> Result<Vec<CellWrite>> {
        if row == self.tables.row_count(table) {
            self.tables.push_row(table);
        }
        // validates the index against the mirror
        self.tables.cell(table, row, table.columns()[0])?;

        let writes = blank_row_writes(table, row);
        self.pending.extend(writes.iter().cloned());
        self.drain(table)?;
        log::debug!("{table}: row {row} appended");
        Ok(writes)
    }

    /// Append a row on behalf of the grid and blank it
    pub fn append_row(&mut self, table: TableKind) -> Result<(usize, Vec<CellWrite>)> {
        let row = self.tables.row_count(table);
        let writes = self.on_row_appended(table, row)?;
        Ok((row, writes))
    }

    fn decide(
        &self,
        table: TableKind,
        row: usize,
        column: Column,
        old: &str,
        new: &str,
    ) -> Result<Verdict> {
        let t = &self.tables;
        match table {
            TableKind::Inputs => {
                let names = names_of(&t.inputs);
                check_input_edit(&t.inputs[row], row, &names, column, old, new, &self.config)
            }
            TableKind::Outputs => {
                let names = names_of(&t.outputs);
                check_output_edit(&t.outputs[row], row, &names, column, old, new, &self.config)
            }
            TableKind::Functions => check_function_edit(column, old, new, &self.config),
            TableKind::Algorithms => Ok(Verdict::accept()),
        }
    }

    fn drain(&mut self, table: TableKind) -> Result<()> {
        while let Some(write) = self.pending.pop_front() {
            if let Err(e) = self.tables.write(table, write.row, write.column, &write.value) {
                self.pending.clear();
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(ModelTables::default(), SessionConfig::default())
    }
}

/// Name column of a table
pub fn names_of<R: GridRow>(rows: &[R]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.cell(Column::Name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;
    use crate::category::InputType;
    use crate::error::Error;
    use crate::rules::DiagnosticKind;
    use crate::format::stored_number;
    use crate::table::{FunctionRow, InputRow, OutputRow};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn session_with_inputs(rows: Vec<InputRow>) -> EditSession {
        EditSession::new(
            ModelTables {
                inputs: rows,
                ..ModelTables::default()
            },
            SessionConfig::default(),
        )
    }

    fn int_row(name: &str) -> InputRow {
        InputRow {
            name: name.to_string(),
            input_type: InputType::Parameter,
            data_type: DataType::Int,
            min: "0".to_string(),
            max: "10".to_string(),
            default: "1".to_string(),
            ..InputRow::default()
        }
    }

    #[test]
    fn test_default_range_scenario() {
        let mut session = session_with_inputs(vec![int_row("a")]);

        let out = session
            .on_cell_edit(TableKind::Inputs, 0, Column::Default, "1", "5")
            .unwrap();
        assert!(out.accepted);
        assert!(out.writes.is_empty());
        assert_eq!(session.tables().inputs[0].default, "5");

        let out = session
            .on_cell_edit(TableKind::Inputs, 0, Column::Default, "5", "15")
            .unwrap();
        assert!(!out.accepted);
        assert_eq!(session.tables().inputs[0].default, "5");
        assert_eq!(out.message.unwrap().kind(), DiagnosticKind::Range);
    }

    #[test]
    fn test_default_needs_data_type_scenario() {
        let mut session = session_with_inputs(vec![InputRow::default()]);
        let out = session
            .on_cell_edit(TableKind::Inputs, 0, Column::Default, "", "3")
            .unwrap();
        assert!(!out.accepted);
        assert_eq!(session.tables().inputs[0].default, "");
        assert_eq!(out.message, Some(Rejection::DataTypeRequired));
    }

    #[test]
    fn test_data_type_switch_scenario() {
        let mut row = int_row("a");
        row.len = "3".to_string();
        let mut session = session_with_inputs(vec![row]);
        session
            .on_cell_edit(TableKind::Inputs, 0, Column::DataType, "INT", "DOUBLE")
            .unwrap();
        let row = &session.tables().inputs[0];
        assert_eq!(row.data_type, DataType::Double);
        assert_eq!((row.min.as_str(), row.max.as_str(), row.len.as_str()), ("", "", ""));
        assert_eq!(row.default, "0.0");
    }

    #[test]
    fn test_name_collision_scenario() {
        let mut session = session_with_inputs(vec![int_row("A"), int_row("B")]);
        let out = session
            .on_cell_edit(TableKind::Inputs, 1, Column::Name, "B", "A")
            .unwrap();
        assert!(!out.accepted);
        assert_eq!(out.writes, vec![CellWrite::new(1, Column::Name, "B")]);
        assert_eq!(session.tables().inputs[1].name, "B");
        assert_eq!(
            session.last_message().map(|m| m.to_string()),
            Some("this name is already defined.".to_string())
        );
    }

    #[test]
    fn test_double_array_scenario() {
        let mut row = InputRow::default();
        row.data_type = DataType::DoubleArray;
        row.default = "[0.0]".to_string();
        let mut session = session_with_inputs(vec![row]);

        let out = session
            .on_cell_edit(TableKind::Inputs, 0, Column::Default, "[0.0]", "[1.0, 2.5,3]")
            .unwrap();
        assert!(out.accepted);
        assert_eq!(session.tables().inputs[0].default, "[1.0,2.5,3]");

        let out = session
            .on_cell_edit(TableKind::Inputs, 0, Column::Default, "[1.0,2.5,3]", "[1.0,x]")
            .unwrap();
        assert!(!out.accepted);
        assert_eq!(session.tables().inputs[0].default, "[1.0,2.5,3]");
        assert_eq!(out.message.unwrap().kind(), DiagnosticKind::Format);
    }

    #[test]
    fn test_function_file_scenario() {
        let mut session = EditSession::new(
            ModelTables {
                functions: vec![FunctionRow::default()],
                ..ModelTables::default()
            },
            SessionConfig::default(),
        );
        let out = session
            .on_cell_edit(TableKind::Functions, 0, Column::FileName, "", "model_core.pyx")
            .unwrap();
        assert!(out.accepted);
        assert_eq!(session.tables().functions[0].name, "model_core");

        let out = session
            .on_cell_edit(
                TableKind::Functions,
                0,
                Column::FileName,
                "model_core.pyx",
                "model_core.py",
            )
            .unwrap();
        assert!(!out.accepted);
        assert_eq!(session.tables().functions[0].filename, "model_core.pyx");
        assert_eq!(session.tables().functions[0].name, "model_core");
    }

    #[test]
    fn test_canonical_literal_is_idempotent() {
        let mut row = InputRow::default();
        row.data_type = DataType::Double;
        row.default = "1.0".to_string();
        let mut session = session_with_inputs(vec![row]);
        let out = session
            .on_cell_edit(TableKind::Inputs, 0, Column::Default, "1.0", "1.0")
            .unwrap();
        assert_eq!(
            out,
            EditOutcome {
                accepted: true,
                writes: vec![],
                message: None
            }
        );
    }

    #[test]
    fn test_message_replaced_by_next_event() {
        let mut session = session_with_inputs(vec![InputRow::default()]);
        session
            .on_cell_edit(TableKind::Inputs, 0, Column::Default, "", "3")
            .unwrap();
        assert!(session.last_message().is_some());
        session
            .on_cell_edit(TableKind::Inputs, 0, Column::Unit, "", "m")
            .unwrap();
        assert!(session.last_message().is_none());
    }

    #[test]
    fn test_row_append_blanks_new_row() {
        let mut session = EditSession::default();
        let (row, writes) = session.append_row(TableKind::Outputs).unwrap();
        assert_eq!(row, 0);
        assert_eq!(writes.len(), 10);
        assert_eq!(session.tables().outputs, vec![OutputRow::default()]);

        // grid already holds the row in the mirror: only blank it
        session.tables.outputs[0].name = "stale".to_string();
        session.on_row_appended(TableKind::Outputs, 0).unwrap();
        assert_eq!(session.tables().outputs[0].name, "");

        assert!(matches!(
            session.on_row_appended(TableKind::Outputs, 5),
            Err(Error::RowOutOfRange { .. })
        ));
    }

    #[test]
    fn test_invariants_hold_after_edit_sequence() {
        let mut session = session_with_inputs(vec![int_row("a")]);
        let steps = [
            (Column::Max, "10", "3"),
            (Column::Min, "0", "4"),
            (Column::Min, "0", "2"),
            (Column::Default, "1", "9"),
            (Column::Max, "10", "1"),
            (Column::DataType, "INT", "INTARRAY"),
            (Column::Len, "", "4"),
            (Column::DataType, "INTARRAY", "INT"),
        ];
        for (column, _, new) in steps {
            let old = session.tables().cell(TableKind::Inputs, 0, column).unwrap();
            session
                .on_cell_edit(TableKind::Inputs, 0, column, &old, new)
                .unwrap();

            let row = &session.tables().inputs[0];
            let parse = |s: &str| s.parse::<i64>().ok();
            if let (Some(min), Some(max)) = (parse(&row.min), parse(&row.max)) {
                assert!(min <= max);
            }
            if let (Some(min), Some(d)) = (parse(&row.min), parse(&row.default)) {
                assert!(min <= d);
            }
            if let (Some(d), Some(max)) = (parse(&row.default), parse(&row.max)) {
                assert!(d <= max);
            }
            assert!(row.len.is_empty() || row.data_type.takes_len());
        }
        assert_eq!(session.tables().inputs[0].len, "");
    }

    #[test]
    fn test_integer_written_double_bounds_constrain_edits() {
        let row = InputRow {
            name: "tbase".to_string(),
            data_type: DataType::Double,
            min: "0".to_string(),
            max: "10".to_string(),
            default: "5.0".to_string(),
            ..InputRow::default()
        };
        let mut session = session_with_inputs(vec![row]);

        let out = session
            .on_cell_edit(TableKind::Inputs, 0, Column::Default, "5.0", "-5.0")
            .unwrap();
        assert!(!out.accepted);
        assert_eq!(out.message, Some(Rejection::DefaultOutOfRange));
        assert_eq!(session.tables().inputs[0].default, "5.0");

        let out = session
            .on_cell_edit(TableKind::Inputs, 0, Column::Min, "0", "20.0")
            .unwrap();
        assert_eq!(out.message, Some(Rejection::MinAboveMax));
        assert_eq!(session.tables().inputs[0].min, "0");

        session
            .on_cell_edit(TableKind::Inputs, 0, Column::Default, "5.0", "")
            .unwrap();
        let out = session
            .on_cell_edit(TableKind::Inputs, 0, Column::Max, "10", "-1.")
            .unwrap();
        assert_eq!(out.message, Some(Rejection::MinAboveMax));

        let out = session
            .on_cell_edit(TableKind::Inputs, 0, Column::Default, "", "7.5")
            .unwrap();
        assert!(out.accepted);
        assert_eq!(session.tables().inputs[0].default, "7.5");
    }

    #[test]
    fn test_unknown_data_type_leaves_row_untouched() {
        let mut session = session_with_inputs(vec![int_row("a")]);
        let before = session.tables().clone();
        assert!(matches!(
            session.on_cell_edit(TableKind::Inputs, 0, Column::DataType, "INT", "LONG"),
            Err(Error::UnknownDataType(_))
        ));
        assert_eq!(session.tables(), &before);
    }

    #[test]
    fn test_names_of() {
        let rows = vec![int_row("a"), int_row("b")];
        assert_eq!(names_of(&rows), vec!["a".to_string(), "b".to_string()]);
    }

    fn seed_rows() -> Vec<InputRow> {
        let bounded = |data_type, min: &str, max: &str, default: &str| InputRow {
            name: "x".to_string(),
            input_type: InputType::Parameter,
            data_type,
            min: min.to_string(),
            max: max.to_string(),
            default: default.to_string(),
            ..InputRow::default()
        };
        vec![
            bounded(DataType::Double, "0", "10", "5.0"),
            bounded(DataType::Double, "-2.5", "1e2", ""),
            bounded(DataType::Int, "0", "10", "1"),
            InputRow {
                data_type: DataType::DoubleArray,
                len: "3".to_string(),
                default: "[0.0]".to_string(),
                ..InputRow::default()
            },
            InputRow::default(),
        ]
    }

    fn cell_edit() -> impl Strategy<Value = (Column, String)> {
        let value = prop_oneof![
            "-?[0-9]{1,2}",
            "-?[0-9]{1,2}\\.[0-9]?",
            Just(String::new()),
            "\\[[0-9](,[0-9])?\\]",
        ];
        let bounded = (
            prop::sample::select(vec![Column::Min, Column::Max, Column::Default, Column::Len]),
            value,
        );
        let retype = prop::sample::select(vec![
            DataType::Empty,
            DataType::Int,
            DataType::Double,
            DataType::IntArray,
            DataType::DoubleList,
            DataType::DoubleArray,
            DataType::String,
        ])
        .prop_map(|dt| (Column::DataType, dt.as_str().to_string()));
        prop_oneof![4 => bounded, 1 => retype]
    }

    fn assert_settled(row: &InputRow) {
        let read = |s: &str| stored_number(row.data_type, s);
        let (min, max, default) = (read(&row.min), read(&row.max), read(&row.default));
        if let (Some(min), Some(max)) = (min, max) {
            assert!(min <= max, "{row:?}");
        }
        if let (Some(min), Some(d)) = (min, default) {
            assert!(min <= d, "{row:?}");
        }
        if let (Some(d), Some(max)) = (default, max) {
            assert!(d <= max, "{row:?}");
        }
        assert!(row.len.is_empty() || row.data_type.takes_len(), "{row:?}");
    }

    proptest! {
        #[test]
        fn test_random_edits_keep_row_settled(
            seed in 0..5usize,
            edits in prop::collection::vec(cell_edit(), 1..24)
        ) {
            let mut session = session_with_inputs(vec![seed_rows().swap_remove(seed)]);
            for (column, value) in edits {
                let old = session.tables().cell(TableKind::Inputs, 0, column).unwrap();
                session
                    .on_cell_edit(TableKind::Inputs, 0, column, &old, &value)
                    .unwrap();
                assert_settled(&session.tables().inputs[0]);
            }
        }
    }
}
