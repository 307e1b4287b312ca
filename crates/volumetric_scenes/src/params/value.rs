//! # Parameter Values
//!
//! A parameter is a number, a flag, or one of a fixed set of names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single parameter value as it arrives from the control surface.
///
/// Untagged, so JSON `1.5`, `true` and `"sine"` decode directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A real number.
    Number(f64),
    /// A flag.
    Bool(bool),
    /// An enumerated choice, by name.
    Choice(String),
}

impl ParamValue {
    /// The number, if this is one.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The flag, if this is one.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The choice name, if this is one.
    #[inline]
    #[must_use]
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's kind, for log messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::Choice(_) => "choice",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Choice(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Choice(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Choice(value)
    }
}

/// A parameter value known at compile time (scene declared defaults).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefaultValue {
    /// A real number.
    Number(f64),
    /// A flag.
    Bool(bool),
    /// An enumerated choice, by name.
    Choice(&'static str),
}

impl DefaultValue {
    /// Converts to an owned runtime value.
    #[must_use]
    pub fn to_value(self) -> ParamValue {
        match self {
            Self::Number(n) => ParamValue::Number(n),
            Self::Bool(b) => ParamValue::Bool(b),
            Self::Choice(s) => ParamValue::Choice(s.to_owned()),
        }
    }
}

/// Converts a camelCase name from the control surface to the snake_case
/// spelling used by the parameter records. Already snake_case names pass
/// through unchanged.
#[must_use]
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
