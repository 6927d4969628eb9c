//! Request payload shapes for translation.
//!
//! A JSON `text` field is converted once into a closed `TranslationInput`;
//! everything past that point matches on the variant instead of inspecting
//! JSON types.

use crate::error::TranslationError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Longest list accepted in one request.
pub const MAX_LIST_ITEMS: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum TranslationInput {
    Text(String),
    Object(Map<String, Value>),
    List(Vec<ListItem>),
}

/// Placed at the position of a list element that is neither string nor
/// object. The other elements are still translated.
pub const UNSUPPORTED_ELEMENT: &str = "unsupported_input_shape";

/// An element of a list payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    Text(String),
    Object(Map<String, Value>),
    /// Any other JSON value; holds a description of its type.
    Unsupported(&'static str),
}

impl TranslationInput {
    /// False for lists with no string or object element, which translate
    /// without any engine call.
    pub fn needs_engine(&self) -> bool {
        match self {
            TranslationInput::List(items) => items
                .iter()
                .any(|item| !matches!(item, ListItem::Unsupported(_))),
            _ => true,
        }
    }
}

/// Translation result, serialized in the same JSON shape as the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TranslationOutput {
    Text(String),
    Object(Map<String, Value>),
    List(Vec<TranslationOutput>),
}

impl TryFrom<Value> for TranslationInput {
    type Error = TranslationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(TranslationInput::Text(text)),
            Value::Object(map) => Ok(TranslationInput::Object(map)),
            Value::Array(items) => {
                if items.len() > MAX_LIST_ITEMS {
                    return Err(TranslationError::InputTooLarge {
                        len: items.len(),
                        max: MAX_LIST_ITEMS,
                    });
                }
                Ok(TranslationInput::List(
                    items
                        .into_iter()
                        .map(|item| match item {
                            Value::String(text) => ListItem::Text(text),
                            Value::Object(map) => ListItem::Object(map),
                            other => ListItem::Unsupported(kind(&other)),
                        })
                        .collect(),
                ))
            }
            other => Err(TranslationError::UnsupportedInputShape(format!(
                "expected string, object or list, got {}",
                kind(&other)
            ))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Text of an object field: strings as-is, anything else as its JSON form,
/// then lowercased with newlines flattened to spaces.
pub fn normalize_field(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    raw.to_lowercase().replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Conversion Tests ====================

    #[test]
    fn test_string_and_object_inputs() {
        assert_eq!(
            TranslationInput::try_from(json!("Hello")).unwrap(),
            TranslationInput::Text("Hello".to_string())
        );
        assert!(matches!(
            TranslationInput::try_from(json!({"a": "b"})).unwrap(),
            TranslationInput::Object(_)
        ));
    }

    #[test]
    fn test_list_at_limit_is_accepted() {
        let items: Vec<Value> = (0..MAX_LIST_ITEMS).map(|i| json!(format!("item {}", i))).collect();
        match TranslationInput::try_from(Value::Array(items)).unwrap() {
            TranslationInput::List(list) => assert_eq!(list.len(), MAX_LIST_ITEMS),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_list_over_limit_is_rejected() {
        let items: Vec<Value> = (0..=MAX_LIST_ITEMS).map(|_| json!("x")).collect();
        let err = TranslationInput::try_from(Value::Array(items)).unwrap_err();
        assert!(matches!(
            err,
            TranslationError::InputTooLarge { len: 51, max: 50 }
        ));
    }

    #[test]
    fn test_mixed_list_elements() {
        let input = TranslationInput::try_from(json!(["one", {"k": "two"}])).unwrap();
        assert_eq!(
            input,
            TranslationInput::List(vec![
                ListItem::Text("one".to_string()),
                ListItem::Object(json!({"k": "two"}).as_object().unwrap().clone()),
            ])
        );
    }

    #[test]
    fn test_bad_list_element_is_kept_in_place() {
        let input = TranslationInput::try_from(json!(["ok", 42, null, ["nested"]])).unwrap();
        assert_eq!(
            input,
            TranslationInput::List(vec![
                ListItem::Text("ok".to_string()),
                ListItem::Unsupported("a number"),
                ListItem::Unsupported("null"),
                ListItem::Unsupported("a list"),
            ])
        );
    }

    #[test]
    fn test_needs_engine() {
        assert!(TranslationInput::Text("a".to_string()).needs_engine());
        assert!(TranslationInput::Object(Map::new()).needs_engine());
        assert!(TranslationInput::try_from(json!([1, "a"])).unwrap().needs_engine());
        assert!(!TranslationInput::try_from(json!([1, true])).unwrap().needs_engine());
        assert!(!TranslationInput::try_from(json!([])).unwrap().needs_engine());
    }

    #[test]
    fn test_scalar_top_level_rejected() {
        for value in [json!(5), json!(null), json!(true)] {
            let err = TranslationInput::try_from(value).unwrap_err();
            assert_eq!(err.code(), "unsupported_input_shape");
        }
    }

    // ==================== Normalization Tests ====================

    #[test]
    fn test_normalize_field() {
        assert_eq!(normalize_field(&json!("Line One\nLine Two")), "line one line two");
        assert_eq!(normalize_field(&json!(42)), "42");
        assert_eq!(normalize_field(&json!(true)), "true");
    }

    // ==================== Output Tests ====================

    #[test]
    fn test_output_serializes_as_plain_json() {
        let output = TranslationOutput::List(vec![
            TranslationOutput::Text("hola".to_string()),
            TranslationOutput::Object(json!({"a": "b"}).as_object().unwrap().clone()),
        ]);
        assert_eq!(serde_json::to_value(&output).unwrap(), json!(["hola", {"a": "b"}]));
    }
}
