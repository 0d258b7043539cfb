//! Directory scanner for discovering unit model packages
//!
//! A package is the set of files named `unit.<Model>.<part>.<ext>` where
//! part is one of inputs, outputs, algorithms, functions (CSV) or header,
//! paramsets (JSON).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name prefix shared by unit model packages
const UNIT_PREFIX: &str = "unit.";

/// The files making up one unit model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelPackage {
    /// Model name (e.g., "Phenology")
    pub name: String,
    pub inputs: Option<PathBuf>,
    pub outputs: Option<PathBuf>,
    pub algorithms: Option<PathBuf>,
    pub functions: Option<PathBuf>,
    pub header: Option<PathBuf>,
    pub paramsets: Option<PathBuf>,
}

impl ModelPackage {
    /// Number of package files found
    pub fn file_count(&self) -> usize {
        [
            &self.inputs,
            &self.outputs,
            &self.algorithms,
            &self.functions,
            &self.header,
            &self.paramsets,
        ]
        .iter()
        .filter(|p| p.is_some())
        .count()
    }

    /// Inputs and outputs are present
    pub fn is_complete(&self) -> bool {
        self.inputs.is_some() && self.outputs.is_some()
    }

    fn slot(&mut self, part: Part) -> &mut Option<PathBuf> {
        match part {
            Part::Inputs => &mut self.inputs,
            Part::Outputs => &mut self.outputs,
            Part::Algorithms => &mut self.algorithms,
            Part::Functions => &mut self.functions,
            Part::Header => &mut self.header,
            Part::ParamSets => &mut self.paramsets,
        }
    }
}

/// Result of scanning directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root directories that were scanned
    pub roots: Vec<PathBuf>,
    /// Discovered packages, sorted by name
    pub models: Vec<ModelPackage>,
    /// Total number of package files found
    pub total_files: usize,
}

impl ScanResult {
    /// Find a model by name
    pub fn find_model(&self, name: &str) -> Option<&ModelPackage> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Find a model by name or fail
    pub fn require_model(&self, name: &str) -> Result<&ModelPackage> {
        self.find_model(name)
            .ok_or_else(|| Error::ModelNotFound(name.to_string()))
    }

    /// Get all model names
    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Inputs,
    Outputs,
    Algorithms,
    Functions,
    Header,
    ParamSets,
}

/// Scan one or more directories for unit model packages
pub fn scan_models<P: AsRef<Path>>(roots: &[P]) -> Result<ScanResult> {
    let mut packages: BTreeMap<String, ModelPackage> = BTreeMap::new();
    let mut total_files = 0;

    for root in roots {
        let root = root.as_ref();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some((model, part)) = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(classify)
            else {
                continue;
            };

            let package = packages.entry(model.clone()).or_insert_with(|| ModelPackage {
                name: model,
                ..ModelPackage::default()
            });
            let name = package.name.clone();
            match package.slot(part).replace(path.to_path_buf()) {
                Some(previous) => log::warn!(
                    "{} shadows {} for model '{name}'",
                    path.display(),
                    previous.display()
                ),
                None => total_files += 1,
            }
        }
    }

    Ok(ScanResult {
        roots: roots.iter().map(|r| r.as_ref().to_path_buf()).collect(),
        models: packages.into_values().collect(),
        total_files,
    })
}

/// Split a package file name into model name and part
///
/// Examples:
/// - "unit.Phenology.inputs.csv" -> ("Phenology", Inputs)
/// - "unit.Soil.Temp.paramsets.json" -> ("Soil.Temp", ParamSets)
/// - "composition.Wheat.xml" -> None
fn classify(file_name: &str) -> Option<(String, Part)> {
    let rest = file_name.strip_prefix(UNIT_PREFIX)?;
    let (stem, ext) = rest.rsplit_once('.')?;
    let (model, part) = stem.rsplit_once('.')?;
    if model.is_empty() {
        return None;
    }

    let part = match (part.to_lowercase().as_str(), ext.to_lowercase().as_str()) {
        ("inputs", "csv") => Part::Inputs,
        ("outputs", "csv") => Part::Outputs,
        ("algorithms", "csv") => Part::Algorithms,
        ("functions", "csv") => Part::Functions,
        ("header", "json") => Part::Header,
        ("paramsets", "json") => Part::ParamSets,
        _ => return None,
    };
    Some((model.to_string(), part))
}
