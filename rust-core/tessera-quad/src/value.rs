// SPDX-License-Identifier: MIT
//! Graph values and IRIs.
//!
//! `GraphValue` is the closed variant type stored in every quad
//! position. JSON property values coerce into it through
//! [`GraphValue::from_json`], which is total over the supported shapes
//! and rejects everything else instead of guessing.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A value could not be coerced into a graph value.
#[derive(Debug, Error)]
#[error("unsupported property value: {value}")]
pub struct CoercionError {
    /// Display form of the offending value.
    pub value: String,
}

/// An opaque identifier/reference value usable in any quad position.
///
/// Stored unescaped; the canonical text form wraps it in angle
/// brackets (`<iri>`).
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    /// Create an IRI from its unescaped text.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// The unescaped text of the IRI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty (unset) IRI.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The tagged variant value type stored in a quad position.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphValue {
    /// An IRI reference.
    Iri(Iri),
    /// A typed string literal.
    String(String),
    /// A floating point literal.
    Float(f64),
    /// A boolean literal.
    Bool(bool),
    /// A raw, untyped literal.
    Raw(String),
}

impl GraphValue {
    /// Coerce a decoded JSON value into a graph value.
    ///
    /// JSON strings become raw literals, numbers become floats and
    /// booleans become booleans. Nulls, arrays and objects have no
    /// graph-value representation and fail the coercion.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, CoercionError> {
        match value {
            serde_json::Value::String(s) => Ok(Self::Raw(s.clone())),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Self::Float)
                .ok_or_else(|| CoercionError { value: n.to_string() }),
            serde_json::Value::Bool(b) => Ok(Self::Bool(*b)),
            other => Err(CoercionError { value: other.to_string() }),
        }
    }

    /// Render this value back into its native JSON shape.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Iri(iri) => serde_json::Value::String(iri.as_str().to_string()),
            Self::String(s) | Self::Raw(s) => serde_json::Value::String(s.clone()),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Bool(b) => serde_json::Value::Bool(*b),
        }
    }

    /// The textual content of this value, when it has one.
    ///
    /// IRIs yield their unescaped text; string and raw literals yield
    /// their content; floats and booleans have no text form.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri.as_str()),
            Self::String(s) | Self::Raw(s) => Some(s),
            Self::Float(_) | Self::Bool(_) => None,
        }
    }

    /// The canonical text form, used for index keys and structural
    /// comparison across value kinds.
    ///
    /// IRIs render as `<iri>`, string literals as quoted text, floats
    /// and booleans in their plain form, raw literals verbatim.
    pub fn canonical(&self) -> String {
        match self {
            Self::Iri(iri) => format!("<{}>", iri.as_str()),
            Self::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Raw(s) => s.clone(),
        }
    }
}

impl From<Iri> for GraphValue {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

// Serialized as the native JSON shape; the tag is not part of the wire
// format.
impl Serialize for GraphValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_string_coerces_to_raw() {
        let v = GraphValue::from_json(&serde_json::json!("acedfs:process")).unwrap();
        assert_eq!(v, GraphValue::Raw("acedfs:process".to_string()));
    }

    #[test]
    fn json_number_coerces_to_float() {
        let v = GraphValue::from_json(&serde_json::json!(11.11)).unwrap();
        assert_eq!(v, GraphValue::Float(11.11));

        let v = GraphValue::from_json(&serde_json::json!(1946)).unwrap();
        assert_eq!(v, GraphValue::Float(1946.0));
    }

    #[test]
    fn json_bool_coerces_to_bool() {
        let v = GraphValue::from_json(&serde_json::json!(true)).unwrap();
        assert_eq!(v, GraphValue::Bool(true));
    }

    #[test]
    fn nested_shapes_are_rejected() {
        assert!(GraphValue::from_json(&serde_json::json!([1, 2])).is_err());
        assert!(GraphValue::from_json(&serde_json::json!({"a": 1})).is_err());
        assert!(GraphValue::from_json(&serde_json::Value::Null).is_err());
    }

    #[test]
    fn canonical_forms() {
        assert_eq!(GraphValue::Iri(Iri::new("a:b")).canonical(), "<a:b>");
        assert_eq!(GraphValue::String("x".into()).canonical(), "\"x\"");
        assert_eq!(
            GraphValue::String("say \"hi\"".into()).canonical(),
            "\"say \\\"hi\\\"\""
        );
        assert_eq!(GraphValue::Float(11.11).canonical(), "11.11");
        assert_eq!(GraphValue::Bool(false).canonical(), "false");
        assert_eq!(GraphValue::Raw("plain".into()).canonical(), "plain");
    }

    #[test]
    fn float_and_raw_are_distinct() {
        // value typing is significant: a float is never equal to its
        // textual rendering
        assert_ne!(
            GraphValue::Float(11.11),
            GraphValue::Raw("11.11".to_string())
        );
    }

    #[test]
    fn round_trips_through_json() {
        for v in [
            GraphValue::Raw("yellow".into()),
            GraphValue::Float(42.5),
            GraphValue::Bool(true),
        ] {
            let back = GraphValue::from_json(&v.to_json()).unwrap();
            // strings come back as raw literals; the rest round-trip
            // exactly
            match (&v, &back) {
                (GraphValue::Raw(a), GraphValue::Raw(b)) => assert_eq!(a, b),
                _ => assert_eq!(v, back),
            }
        }
    }

    #[test]
    fn empty_iri_is_detectable() {
        assert!(Iri::default().is_empty());
        assert!(!Iri::new("x").is_empty());
    }
}
