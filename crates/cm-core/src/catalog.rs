//! Type catalog: the closed set of data types a model field may declare

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape family of a data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    List,
    Array,
}

/// Element kind shared by a scalar type and its list/array forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Double,
    Int,
    String,
    Boolean,
    Date,
}

/// A recognized DataType token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    #[default]
    Empty,
    Double,
    DoubleList,
    DoubleArray,
    Int,
    IntList,
    IntArray,
    String,
    StringList,
    StringArray,
    Boolean,
    Date,
    DateList,
    DateArray,
}

impl DataType {
    /// All tokens in grid display order
    pub const ALL: [DataType; 14] = [
        DataType::Empty,
        DataType::Double,
        DataType::DoubleList,
        DataType::DoubleArray,
        DataType::Int,
        DataType::IntList,
        DataType::IntArray,
        DataType::String,
        DataType::StringList,
        DataType::StringArray,
        DataType::Boolean,
        DataType::Date,
        DataType::DateList,
        DataType::DateArray,
    ];

    /// Token as it appears in the grid and in model files
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Empty => "",
            DataType::Double => "DOUBLE",
            DataType::DoubleList => "DOUBLELIST",
            DataType::DoubleArray => "DOUBLEARRAY",
            DataType::Int => "INT",
            DataType::IntList => "INTLIST",
            DataType::IntArray => "INTARRAY",
            DataType::String => "STRING",
            DataType::StringList => "STRINGLIST",
            DataType::StringArray => "STRINGARRAY",
            DataType::Boolean => "BOOLEAN",
            DataType::Date => "DATE",
            DataType::DateList => "DATELIST",
            DataType::DateArray => "DATEARRAY",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DataType::Empty)
    }

    /// Shape family, `None` for the empty type
    pub fn shape(&self) -> Option<Shape> {
        match self {
            DataType::Empty => None,
            DataType::Double
            | DataType::Int
            | DataType::String
            | DataType::Boolean
            | DataType::Date => Some(Shape::Scalar),
            DataType::DoubleList | DataType::IntList | DataType::StringList | DataType::DateList => {
                Some(Shape::List)
            }
            DataType::DoubleArray
            | DataType::IntArray
            | DataType::StringArray
            | DataType::DateArray => Some(Shape::Array),
        }
    }

    /// Element kind, `None` for the empty type
    pub fn element(&self) -> Option<ElementKind> {
        match self {
            DataType::Empty => None,
            DataType::Double | DataType::DoubleList | DataType::DoubleArray => {
                Some(ElementKind::Double)
            }
            DataType::Int | DataType::IntList | DataType::IntArray => Some(ElementKind::Int),
            DataType::String | DataType::StringList | DataType::StringArray => {
                Some(ElementKind::String)
            }
            DataType::Boolean => Some(ElementKind::Boolean),
            DataType::Date | DataType::DateList | DataType::DateArray => Some(ElementKind::Date),
        }
    }

    /// Whether Min/Max are meaningful (INT and DOUBLE only)
    pub fn takes_min_max(&self) -> bool {
        matches!(self, DataType::Int | DataType::Double)
    }

    /// Whether Len is meaningful (the four ARRAY types only)
    pub fn takes_len(&self) -> bool {
        self.shape() == Some(Shape::Array)
    }

    /// Literal written into Default when the row switches to this type
    pub fn default_literal(&self) -> &'static str {
        match self {
            DataType::Empty | DataType::String | DataType::Date => "",
            DataType::Double => "0.0",
            DataType::DoubleList | DataType::DoubleArray => "[0.0]",
            DataType::Int => "0",
            DataType::IntList | DataType::IntArray => "[0]",
            DataType::Boolean => "False",
            DataType::StringList
            | DataType::StringArray
            | DataType::DateList
            | DataType::DateArray => "[]",
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        DataType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == token)
            .ok_or_else(|| Error::UnknownDataType(s.to_string()))
    }
}

impl TryFrom<String> for DataType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
