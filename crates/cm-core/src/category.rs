//! Input kinds and the category sets that depend on them

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether an input row is a variable or a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InputType {
    #[default]
    Empty,
    Variable,
    Parameter,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Empty => "",
            InputType::Variable => "variable",
            InputType::Parameter => "parameter",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, InputType::Empty)
    }
}

impl FromStr for InputType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Ok(InputType::Empty),
            "variable" => Ok(InputType::Variable),
            "parameter" => Ok(InputType::Parameter),
            _ => Err(Error::UnknownInputType(s.to_string())),
        }
    }
}

impl TryFrom<String> for InputType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<InputType> for String {
    fn from(value: InputType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every category token a row may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Empty,
    State,
    Rate,
    Auxiliary,
    Constant,
    Species,
    Genotypic,
    Soil,
    Private,
}

impl Category {
    pub const VARIABLE: &'static [Category] = &[
        Category::Empty,
        Category::State,
        Category::Rate,
        Category::Auxiliary,
    ];

    pub const PARAMETER: &'static [Category] = &[
        Category::Empty,
        Category::Constant,
        Category::Species,
        Category::Genotypic,
        Category::Soil,
        Category::Private,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Empty => "",
            Category::State => "state",
            Category::Rate => "rate",
            Category::Auxiliary => "auxiliary",
            Category::Constant => "constant",
            Category::Species => "species",
            Category::Genotypic => "genotypic",
            Category::Soil => "soil",
            Category::Private => "private",
        }
    }

    /// Look up a token, `None` if it names no category at all
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Category::VARIABLE
            .iter()
            .chain(Category::PARAMETER)
            .copied()
            .find(|c| c.as_str() == token)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories an input row may hold given its input type.
///
/// Output rows draw from the variable set.
pub fn allowed_categories(input_type: InputType) -> &'static [Category] {
    match input_type {
        InputType::Empty => &[Category::Empty],
        InputType::Variable => Category::VARIABLE,
        InputType::Parameter => Category::PARAMETER,
    }
}

/// Non-empty tokens of a category set, quoted, for diagnostics
pub fn category_list(set: &[Category]) -> String {
    let names: Vec<String> = set
        .iter()
        .filter(|c| **c != Category::Empty)
        .map(|c| format!("'{c}'"))
        .collect();
    format!("[{}]", names.join(","))
}
