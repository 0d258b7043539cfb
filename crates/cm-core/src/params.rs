//! Parameter sets and the parameter maps handed to downstream editors

use crate::category::InputType;
use crate::error::{Error, Result};
use crate::table::InputRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// (parameter name, value literal) pairs in input-row order
pub type ParameterMap = Vec<(String, String)>;

/// A named set of parameter values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// On-disk body of one set, keyed by set name in the file
#[derive(Deserialize)]
struct ParameterSetBody {
    #[serde(default)]
    description: String,
    #[serde(default)]
    params: BTreeMap<String, String>,
}

/// Load parameter sets from a `paramsets.json` file
///
/// The file is an object mapping set names to `{description, params}`.
pub fn load_parameter_sets<P: AsRef<Path>>(path: P) -> Result<Vec<ParameterSet>> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
        path: path.as_ref().to_path_buf(),
        source: e,
    })?;
    parse_parameter_sets(&content)
}

/// Parse parameter sets from JSON text
pub fn parse_parameter_sets(content: &str) -> Result<Vec<ParameterSet>> {
    let raw: BTreeMap<String, ParameterSetBody> = serde_json::from_str(content)?;
    Ok(raw
        .into_iter()
        .map(|(name, body)| ParameterSet {
            name,
            description: body.description,
            params: body.params,
        })
        .collect())
}

/// Every parameter input mapped to an empty value, in row order
pub fn parameter_map(inputs: &[InputRow]) -> ParameterMap {
    inputs
        .iter()
        .filter(|row| row.input_type == InputType::Parameter)
        .map(|row| (row.name.clone(), String::new()))
        .collect()
}

/// For every set: the parameter map overridden by the set's values, plus its description
///
/// Values for names that are not parameters of the model are dropped. Sets
/// are keyed by name; each map keeps input-row order.
pub fn parameter_set_map(
    inputs: &[InputRow],
    sets: &[ParameterSet],
) -> BTreeMap<String, (ParameterMap, String)> {
    let base = parameter_map(inputs);
    sets.iter()
        .map(|set| {
            let mut values = base.clone();
            for (name, value) in &set.params {
                match values.iter_mut().find(|(param, _)| param == name) {
                    Some((_, slot)) => *slot = value.clone(),
                    None => log::debug!("set '{}': '{name}' is not a parameter", set.name),
                }
            }
            (set.name.clone(), (values, set.description.clone()))
        })
        .collect()
}
