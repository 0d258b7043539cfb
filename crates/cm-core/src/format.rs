//! Literal grammars for each data type family
//!
//! Every validator answers two questions about a literal typed into a cell:
//! does it parse for the declared type, and what is its stored (canonical)
//! form. Validators never touch row state.

use crate::catalog::{DataType, ElementKind, Shape};
use chrono::NaiveDate;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;
use thiserror::Error;

/// Earliest year a DATE literal may carry
const MIN_YEAR: i32 = 1600;

/// A literal that does not parse for its declared type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("bad INT format -> use -?[0-9]+ .")]
    Int,

    #[error("bad DOUBLE format -> use -?[0-9]+.[0-9]* .")]
    Double,

    #[error("bad DATE format -> use dd/mm/yyyy.")]
    Date,

    #[error("bad BOOLEAN format -> use True|False.")]
    Boolean,

    #[error("bad {data_type} format -> use [{{{element}}},*] .")]
    List {
        data_type: DataType,
        element: &'static str,
    },

    #[error("bad {0} format -> use ['',*] .")]
    StringList(DataType),
}

/// A parsed INT or DOUBLE value, compared in its own type's order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Double(f64),
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.partial_cmp(b),
            (Number::Double(a), Number::Double(b)) => a.partial_cmp(b),
            (Number::Int(a), Number::Double(b)) => (*a as f64).partial_cmp(b),
            (Number::Double(a), Number::Int(b)) => a.partial_cmp(&(*b as f64)),
        }
    }
}

fn int_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+$").expect("valid regex"))
}

fn double_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+\.\d*$").expect("valid regex"))
}

// List elements of a DOUBLE list may omit the fractional part.
fn double_element_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+(?:\.\d*)?$").expect("valid regex"))
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid regex"))
}

fn quoted_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^'[^\[\],']*'$").expect("valid regex"))
}

/// Parse an INT scalar literal
pub fn parse_int(literal: &str) -> Result<i64, FormatError> {
    let trimmed = literal.trim();
    if !int_re().is_match(trimmed) {
        return Err(FormatError::Int);
    }
    trimmed.parse().map_err(|_| FormatError::Int)
}

/// Parse a DOUBLE scalar literal (`12.` is accepted)
pub fn parse_double(literal: &str) -> Result<f64, FormatError> {
    let trimmed = literal.trim();
    if !double_re().is_match(trimmed) {
        return Err(FormatError::Double);
    }
    canonical_double(trimmed)
        .parse()
        .map_err(|_| FormatError::Double)
}

fn canonical_double(trimmed: &str) -> String {
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

/// Check a `dd/mm/yyyy` literal against the calendar
pub fn parse_date(literal: &str) -> Result<NaiveDate, FormatError> {
    let caps = date_re()
        .captures(literal.trim())
        .ok_or(FormatError::Date)?;
    let day: u32 = caps[1].parse().map_err(|_| FormatError::Date)?;
    let month: u32 = caps[2].parse().map_err(|_| FormatError::Date)?;
    let year: i32 = caps[3].parse().map_err(|_| FormatError::Date)?;
    if year < MIN_YEAR {
        return Err(FormatError::Date);
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or(FormatError::Date)
}

/// Parse a Min/Max/Default literal of an INT or DOUBLE field.
///
/// Returns `None` when the type carries no numeric order.
pub fn parse_number(data_type: DataType, literal: &str) -> Option<Result<Number, FormatError>> {
    match data_type {
        DataType::Int => Some(parse_int(literal).map(Number::Int)),
        DataType::Double => Some(parse_double(literal).map(Number::Double)),
        _ => None,
    }
}

/// Read a Min/Max/Default cell already held by a row.
///
/// Model files write DOUBLE bounds as `0` or `1e3` as often as `0.0`, so
/// DOUBLE cells take any finite float here; typed literals still go
/// through [`parse_number`].
pub fn stored_number(data_type: DataType, literal: &str) -> Option<Number> {
    let trimmed = literal.trim();
    match data_type {
        DataType::Int => parse_int(trimmed).ok().map(Number::Int),
        DataType::Double => trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Number::Double),
        _ => None,
    }
}

/// Stored form of an already-valid INT or DOUBLE bound
pub fn canonical_number(data_type: DataType, literal: &str) -> String {
    let trimmed = literal.trim();
    match data_type {
        DataType::Double => canonical_double(trimmed),
        _ => trimmed.to_string(),
    }
}

/// Validate a Default literal and return its stored form.
///
/// The empty type and STRING accept any literal unchanged.
pub fn canonicalize(data_type: DataType, literal: &str) -> Result<String, FormatError> {
    let (Some(shape), Some(element)) = (data_type.shape(), data_type.element()) else {
        return Ok(literal.to_string());
    };

    match (shape, element) {
        (Shape::Scalar, ElementKind::String) => Ok(literal.to_string()),
        (Shape::Scalar, ElementKind::Int) => {
            parse_int(literal)?;
            Ok(literal.trim().to_string())
        }
        (Shape::Scalar, ElementKind::Double) => {
            parse_double(literal)?;
            Ok(canonical_double(literal.trim()))
        }
        (Shape::Scalar, ElementKind::Date) => {
            parse_date(literal)?;
            Ok(literal.trim().to_string())
        }
        (Shape::Scalar, ElementKind::Boolean) => match literal.trim() {
            "True" | "False" => Ok(literal.trim().to_string()),
            _ => Err(FormatError::Boolean),
        },
        (_, ElementKind::String) => canonical_string_list(data_type, literal),
        (_, element) => canonical_list(data_type, element, literal),
    }
}

/// Numeric and date lists: every whitespace character is dropped
fn canonical_list(
    data_type: DataType,
    element: ElementKind,
    literal: &str,
) -> Result<String, FormatError> {
    let compact: String = literal.chars().filter(|c| !c.is_whitespace()).collect();
    let err = || FormatError::List {
        data_type,
        element: element_name(element),
    };

    let inner = compact
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(err)?;

    if !inner.is_empty() {
        for token in inner.split(',') {
            let ok = match element {
                ElementKind::Int => int_re().is_match(token) && token.parse::<i64>().is_ok(),
                ElementKind::Double => double_element_re().is_match(token),
                ElementKind::Date => parse_date(token).is_ok(),
                ElementKind::String | ElementKind::Boolean => false,
            };
            if !ok {
                return Err(err());
            }
        }
    }

    Ok(compact)
}

/// String lists: quoted tokens, trimmed and re-joined without padding
fn canonical_string_list(data_type: DataType, literal: &str) -> Result<String, FormatError> {
    let inner = literal
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or(FormatError::StringList(data_type))?;

    if inner.trim().is_empty() {
        return Ok("[]".to_string());
    }

    let mut tokens = Vec::new();
    for token in inner.split(',') {
        let token = token.trim();
        if !quoted_re().is_match(token) {
            return Err(FormatError::StringList(data_type));
        }
        tokens.push(token);
    }

    Ok(format!("[{}]", tokens.join(",")))
}

fn element_name(element: ElementKind) -> &'static str {
    match element {
        ElementKind::Double => "DOUBLE",
        ElementKind::Int => "INT",
        ElementKind::String => "STRING",
        ElementKind::Boolean => "BOOLEAN",
        ElementKind::Date => "DATE",
    }
}
