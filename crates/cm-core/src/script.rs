//! Edit scripts: recorded grid events replayed against a session
//!
//! A script is the JSON form of what a grid would send: cell edits and row
//! appends, in order. Replaying routes each step through [`EditSession`] with
//! the old value taken from the session mirror.

use crate::dispatcher::{CellWrite, EditOutcome, EditSession};
use crate::error::{Error, Result};
use crate::table::{Column, TableKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One recorded grid event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// The user typed `value` into a cell
    Edit {
        table: TableKind,
        row: usize,
        column: Column,
        value: String,
    },
    /// The grid appended a row at the end of `table`
    Append { table: TableKind },
}

impl Step {
    pub fn edit(table: TableKind, row: usize, column: Column, value: impl Into<String>) -> Self {
        Step::Edit {
            table,
            row,
            column,
            value: value.into(),
        }
    }
}

/// A script of edits for one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditScript {
    /// Model the script applies to
    pub model: String,
    pub steps: Vec<Step>,
}

impl EditScript {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            steps: Vec::new(),
        }
    }

    pub fn add_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Load a script from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the script to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// What happened to one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "result")]
pub enum StepResult {
    Edited(EditOutcome),
    Appended { row: usize, writes: Vec<CellWrite> },
    /// The step violated the session contract; the session is unchanged
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    #[serde(flatten)]
    pub result: StepResult,
}

/// Result of replaying a script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub model: String,
    pub steps: Vec<StepReport>,
}

impl ReplayReport {
    /// Edits whose value was kept
    pub fn accepted(&self) -> usize {
        self.count(|r| matches!(r, StepResult::Edited(o) if o.accepted))
    }

    /// Edits the rules turned down
    pub fn rejected(&self) -> usize {
        self.count(|r| matches!(r, StepResult::Edited(o) if !o.accepted))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| matches!(r, StepResult::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&StepResult) -> bool) -> usize {
        self.steps.iter().filter(|s| pred(&s.result)).count()
    }
}

/// Replay every step of `script` against `session`
///
/// Contract violations fail the offending step only; replay carries on.
pub fn replay(session: &mut EditSession, script: &EditScript) -> ReplayReport {
    let mut report = ReplayReport {
        model: script.model.clone(),
        steps: Vec::with_capacity(script.steps.len()),
    };

    for step in &script.steps {
        let result = match run_step(session, step) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("step {step:?} failed: {e}");
                StepResult::Failed {
                    error: e.to_string(),
                }
            }
        };
        report.steps.push(StepReport {
            step: step.clone(),
            result,
        });
    }

    report
}

fn run_step(session: &mut EditSession, step: &Step) -> Result<StepResult> {
    match step {
        Step::Edit {
            table,
            row,
            column,
            value,
        } => {
            let old = session.tables().cell(*table, *row, *column)?;
            let outcome = session.on_cell_edit(*table, *row, *column, &old, value)?;
            Ok(StepResult::Edited(outcome))
        }
        Step::Append { table } => {
            let (row, writes) = session.append_row(*table)?;
            Ok(StepResult::Appended { row, writes })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;
    use crate::config::SessionConfig;
    use crate::table::ModelTables;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_script_json_shape() {
        let json = r#"{
            "model": "Leaf",
            "steps": [
                {"append": {"table": "inputs"}},
                {"edit": {"table": "inputs", "row": 0, "column": "DataType", "value": "INT"}}
            ]
        }"#;
        let script: EditScript = serde_json::from_str(json).unwrap();
        assert_eq!(script.model, "Leaf");
        assert_eq!(
            script.steps,
            vec![
                Step::Append {
                    table: TableKind::Inputs
                },
                Step::edit(TableKind::Inputs, 0, Column::DataType, "INT"),
            ]
        );
    }

    #[test]
    fn test_replay_routes_through_session() {
        let mut script = EditScript::new("Leaf");
        script.add_step(Step::Append {
            table: TableKind::Inputs,
        });
        script.add_step(Step::edit(TableKind::Inputs, 0, Column::DataType, "INT"));
        script.add_step(Step::edit(TableKind::Inputs, 0, Column::Default, "x"));
        script.add_step(Step::edit(TableKind::Inputs, 3, Column::Name, "far"));

        let mut session = EditSession::new(ModelTables::default(), SessionConfig::default());
        let report = replay(&mut session, &script);

        assert_eq!(report.steps.len(), 4);
        assert_eq!(report.accepted(), 1);
        assert_eq!(report.rejected(), 1);
        assert_eq!(report.failed(), 1);

        let row = &session.tables().inputs[0];
        assert_eq!(row.data_type, DataType::Int);
        assert_eq!(row.default, "0");
    }

    #[test]
    fn test_report_serializes_result_tag() {
        let mut session = EditSession::default();
        let mut script = EditScript::new("Leaf");
        script.add_step(Step::Append {
            table: TableKind::Algorithms,
        });
        let report = replay(&mut session, &script);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["steps"][0]["result"], "appended");
        assert_eq!(value["steps"][0]["row"], 0);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("cm_core_script_test.json");
        let mut script = EditScript::new("Leaf");
        script.add_step(Step::edit(TableKind::Functions, 0, Column::FileName, "a.pyx"));
        script.save(&path).unwrap();
        assert_eq!(EditScript::load(&path).unwrap(), script);
        let _ = fs::remove_file(&path);
    }
}
