use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar value tracked in a story's state vector.
///
/// Values compare with strict, typed equality: `"1"` never equals `1`,
/// and `true` never equals `"true"`. This matters for choice conditions,
/// which require exact matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean flag.
    Bool(bool),
    /// A numeric value. Stories use JSON numbers, so a single float type.
    Number(f64),
    /// A text value.
    String(String),
}

impl Value {
    /// Parse a value from author-typed text.
    ///
    /// The inference order is boolean, then numeric, then string. This
    /// order is part of the authoring contract: it decides which stored
    /// type a condition will later compare against, so it must not change.
    pub fn parse(text: &str) -> Self {
        match text {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => match text.parse::<f64>() {
                Ok(n) if n.is_finite() => Value::Number(n),
                _ => Value::String(text.to_string()),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// The state vector: variable name to scalar value.
///
/// Created from a story's `initialState` when a playback session starts;
/// each applied `setState` is a shallow merge that adds or overwrites
/// keys and never deletes.
pub type StoryState = BTreeMap<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_infers_bool_first() {
        assert_eq!(Value::parse("true"), Value::Bool(true));
        assert_eq!(Value::parse("false"), Value::Bool(false));
    }

    #[test]
    fn parse_infers_number_second() {
        assert_eq!(Value::parse("42"), Value::Number(42.0));
        assert_eq!(Value::parse("-1.5"), Value::Number(-1.5));
    }

    #[test]
    fn parse_falls_back_to_string() {
        assert_eq!(Value::parse("hello"), Value::String("hello".to_string()));
        assert_eq!(Value::parse(""), Value::String(String::new()));
        assert_eq!(Value::parse(" 3 "), Value::String(" 3 ".to_string()));
    }

    #[test]
    fn equality_is_strictly_typed() {
        assert_ne!(Value::from("1"), Value::from(1));
        assert_ne!(Value::from(true), Value::from("true"));
        assert_eq!(Value::from(1), Value::Number(1.0));
    }

    #[test]
    fn json_round_trip_preserves_types() {
        let json = r#"{"hasKey":true,"gold":3,"name":"Ava"}"#;
        let state: StoryState = serde_json::from_str(json).unwrap();
        assert_eq!(state["hasKey"], Value::Bool(true));
        assert_eq!(state["gold"], Value::Number(3.0));
        assert_eq!(state["name"], Value::String("Ava".to_string()));

        let back: StoryState =
            serde_json::from_str(&serde_json::to_string(&state).unwrap()).unwrap();
        assert_eq!(back, state);
    }
}
