//! Row-level helpers: nested object flattening, tag expansion and numeric
//! coercion.

use serde_json::{Map, Number, Value};

/// Flatten nested objects into dotted keys (`{"a":{"b":1}}` -> `{"a.b":1}`).
///
/// Arrays, scalars and empty objects are kept as values.
pub fn flatten(object: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into("", object, &mut out);
    out
}

fn flatten_into(prefix: &str, object: &Map<String, Value>, out: &mut Map<String, Value>) {
    for (key, value) in object {
        let column = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => flatten_into(&column, nested, out),
            other => {
                out.insert(column, other.clone());
            }
        }
    }
}

/// Follow `keys` through nested objects.
pub fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.get(key))
}

/// Replace the row's `tags` list with one column per tag.
///
/// `label` picks the column name from a tag object; the cell is the first
/// entry of the tag's `list`. Tags with no label or an empty list are
/// skipped. Object-valued cells are flattened under the label.
pub fn expand_tags<F>(row: &mut Map<String, Value>, label: F)
where
    F: Fn(&Value) -> Option<&str>,
{
    let Some(Value::Array(tags)) = row.shift_remove("tags") else {
        return;
    };

    let mut expanded = Map::new();
    for tag in &tags {
        let Some(name) = label(tag) else {
            continue;
        };
        let Some(cell) = tag
            .get("list")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .and_then(|first| first.get("value"))
        else {
            continue;
        };
        expanded.insert(name.to_string(), cell.clone());
    }

    for (column, value) in flatten(&expanded) {
        row.insert(column, value);
    }
}

/// Tag label for job, course and scholarship catalogs.
pub fn descriptor_name(tag: &Value) -> Option<&str> {
    lookup(tag, &["descriptor", "name"]).and_then(Value::as_str)
}

/// Tag label for marketplace catalogs.
pub fn title(tag: &Value) -> Option<&str> {
    tag.get("title").and_then(Value::as_str)
}

/// Numbers pass through, numeric strings are parsed, everything else is null.
pub fn to_numeric(value: &Value) -> Value {
    match value {
        Value::Number(_) => value.clone(),
        Value::String(s) => parse_number(s.trim()).map_or(Value::Null, Value::Number),
        _ => Value::Null,
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(int) = s.parse::<i64>() {
        return Some(Number::from(int));
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}

/// Coerce `column` in place when the row has it.
pub fn coerce_numeric(row: &mut Map<String, Value>, column: &str) {
    if let Some(value) = row.get_mut(column) {
        *value = to_numeric(value);
    }
}

/// Move `from` to `to`, leaving `to` null when `from` is absent.
pub fn rename(row: &mut Map<String, Value>, from: &str, to: &str) {
    let value = row.shift_remove(from).unwrap_or(Value::Null);
    row.insert(to.to_string(), value);
}
