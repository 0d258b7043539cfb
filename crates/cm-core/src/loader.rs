//! CSV loader for unit model package tables
//!
//! Rows are taken as written: loading never runs the edit rules. Rows whose
//! DataType or InputType token is not recognized are skipped with a warning.

use crate::error::{Error, Result};
use crate::params::{load_parameter_sets, ParameterSet};
use crate::scanner::ModelPackage;
use crate::table::{AlgorithmRow, FunctionRow, InputRow, ModelTables, OutputRow, TableKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

/// Descriptive fields edited alongside the tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ModelHeader {
    pub title: String,
    pub authors: String,
    pub institution: String,
    pub reference: String,
    pub r#abstract: String,
}

impl ModelHeader {
    /// Load a `header.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }
}

/// A package loaded into session-ready tables
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub name: String,
    pub header: ModelHeader,
    pub tables: ModelTables,
    pub parameter_sets: Vec<ParameterSet>,
}

/// Load every table of a discovered package
pub fn load_package(package: &ModelPackage) -> Result<LoadedModel> {
    let required = |path: &Option<std::path::PathBuf>, table: TableKind| {
        path.clone().ok_or_else(|| Error::MissingPackageFile {
            model: package.name.clone(),
            table,
        })
    };

    let inputs_path = required(&package.inputs, TableKind::Inputs)?;
    let outputs_path = required(&package.outputs, TableKind::Outputs)?;
    let inputs = load_inputs(inputs_path)?;
    let outputs = load_outputs(outputs_path)?;

    let algorithms = match &package.algorithms {
        Some(path) => load_algorithms(path)?,
        None => Vec::new(),
    };

    let mut functions = match &package.functions {
        Some(path) => load_functions(path)?,
        None => Vec::new(),
    };
    // the function grid always shows at least one row
    if functions.is_empty() {
        functions.push(FunctionRow::default());
    }

    let header = match &package.header {
        Some(path) => ModelHeader::load(path)?,
        None => ModelHeader::default(),
    };

    let parameter_sets = match &package.paramsets {
        Some(path) => load_parameter_sets(path)?,
        None => Vec::new(),
    };

    Ok(LoadedModel {
        name: package.name.clone(),
        header,
        tables: ModelTables {
            inputs,
            outputs,
            algorithms,
            functions,
        },
        parameter_sets,
    })
}

/// Load the inputs table from a CSV file
pub fn load_inputs<P: AsRef<Path>>(path: P) -> Result<Vec<InputRow>> {
    let path = path.as_ref();
    parse_inputs(open(path)?, path)
}

/// Load the outputs table from a CSV file
pub fn load_outputs<P: AsRef<Path>>(path: P) -> Result<Vec<OutputRow>> {
    let path = path.as_ref();
    parse_outputs(open(path)?, path)
}

/// Load the algorithms table from a CSV file
pub fn load_algorithms<P: AsRef<Path>>(path: P) -> Result<Vec<AlgorithmRow>> {
    let path = path.as_ref();
    parse_algorithms(open(path)?, path)
}

/// Load the function table from a CSV file
pub fn load_functions<P: AsRef<Path>>(path: P) -> Result<Vec<FunctionRow>> {
    let path = path.as_ref();
    parse_functions(open(path)?, path)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufReader::new(file))
}

/// Header-indexed view of one CSV record
struct Fields<'a> {
    index: &'a HashMap<String, usize>,
    record: &'a csv::StringRecord,
}

impl Fields<'_> {
    /// Trimmed cell text, empty when the column is absent
    fn get(&self, key: &str) -> String {
        self.index
            .get(key)
            .and_then(|&i| self.record.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    /// First non-empty value among several header spellings
    fn first_of(&self, keys: &[&str]) -> String {
        keys.iter()
            .map(|k| self.get(k))
            .find(|v| !v.is_empty())
            .unwrap_or_default()
    }
}

/// Read all records, handing each to `row` with its 1-based line number
fn read_rows<R, T, F>(reader: R, path: &Path, required: &[&str], mut row: F) -> Result<Vec<T>>
where
    R: Read,
    F: FnMut(&Fields<'_>, usize) -> Result<Option<T>>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;

    let index: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_lowercase(), i))
        .collect();

    for key in required {
        if !index.contains_key(*key) {
            return Err(Error::CsvParse {
                path: path.to_path_buf(),
                message: format!("missing required column '{key}'"),
            });
        }
    }

    let mut rows = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        let fields = Fields {
            index: &index,
            record: &record,
        };
        if let Some(r) = row(&fields, i + 2)? {
            rows.push(r);
        }
    }
    Ok(rows)
}

/// Turn an unknown-token error into a skipped row
fn skip_malformed<T>(path: &Path, line: usize, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e @ (Error::UnknownDataType(_) | Error::UnknownInputType(_))) => {
            log::warn!("{}:{line}: skipping row: {e}", path.display());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn parse_inputs<R: Read>(reader: R, path: &Path) -> Result<Vec<InputRow>> {
    read_rows(reader, path, &["name", "datatype"], |f, line| {
        let row = (|| -> Result<InputRow> {
            Ok(InputRow {
                name: f.get("name"),
                description: f.get("description"),
                input_type: f.get("inputtype").parse()?,
                category: f.first_of(&["category", "variablecategory", "parametercategory"]),
                data_type: f.get("datatype").parse()?,
                len: f.get("len"),
                default: f.get("default"),
                min: f.get("min"),
                max: f.get("max"),
                unit: f.get("unit"),
                uri: f.get("uri"),
            })
        })();
        skip_malformed(path, line, row)
    })
}

fn parse_outputs<R: Read>(reader: R, path: &Path) -> Result<Vec<OutputRow>> {
    read_rows(reader, path, &["name", "datatype"], |f, line| {
        let row = f.get("datatype").parse().map(|data_type| OutputRow {
            name: f.get("name"),
            description: f.get("description"),
            category: f.first_of(&["category", "variablecategory"]),
            data_type,
            len: f.get("len"),
            min: f.get("min"),
            max: f.get("max"),
            unit: f.get("unit"),
            uri: f.get("uri"),
        });
        skip_malformed(path, line, row)
    })
}

fn parse_algorithms<R: Read>(reader: R, path: &Path) -> Result<Vec<AlgorithmRow>> {
    read_rows(reader, path, &["filename"], |f, _| {
        Ok(Some(AlgorithmRow {
            filename: f.get("filename"),
        }))
    })
}

fn parse_functions<R: Read>(reader: R, path: &Path) -> Result<Vec<FunctionRow>> {
    read_rows(reader, path, &["filename"], |f, _| {
        Ok(Some(FunctionRow {
            name: f.get("name"),
            filename: f.get("filename"),
        }))
    })
}

/// Parse an inputs CSV from a string (useful for testing)
pub fn parse_inputs_str(content: &str, source_name: &str) -> Result<Vec<InputRow>> {
    parse_inputs(content.as_bytes(), Path::new(source_name))
}

/// Parse an outputs CSV from a string (useful for testing)
pub fn parse_outputs_str(content: &str, source_name: &str) -> Result<Vec<OutputRow>> {
    parse_outputs(content.as_bytes(), Path::new(source_name))
}
