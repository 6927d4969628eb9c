//! Per-domain extraction of catalog documents into flat rows.
//!
//! Every extractor walks `providers[*].items[*]` and tolerates missing
//! branches: a document without the expected nesting yields no rows.

use crate::catalog::flatten::{
    coerce_numeric, descriptor_name, expand_tags, flatten, lookup, rename, title,
};
use crate::catalog::CatalogTable;
use serde_json::{Map, Value};

const CATALOG_PROVIDERS: &[&str] = &["message", "catalog", "providers"];
const COURSE_PROVIDERS: &[&str] = &["data", "course", "message", "catalog", "providers"];

pub fn jobs(document: &Value) -> CatalogTable {
    let rows = provider_items(document, CATALOG_PROVIDERS, |provider, item| {
        let mut row = flatten(item);
        add_provider_meta(&mut row, provider, &["name", "short_desc"], true);
        row.insert(
            "provider_images".to_string(),
            lookup(provider, &["descriptor", "images"])
                .and_then(|images| images.get(0))
                .and_then(|image| image.get("url"))
                .cloned()
                .unwrap_or(Value::Null),
        );
        expand_tags(&mut row, descriptor_name);
        coerce_numeric(&mut row, "quantity.available.count");
        coerce_numeric(&mut row, "Salary information");
        row
    });
    CatalogTable::from_rows(rows)
}

pub fn courses(document: &Value) -> CatalogTable {
    let rows = provider_items(document, COURSE_PROVIDERS, |provider, item| {
        let mut row = flatten(item);
        add_provider_meta(
            &mut row,
            provider,
            &["name", "short_desc", "long_desc", "images"],
            false,
        );
        rename(&mut row, "creator.descriptor.name", "creator.name");
        rename(&mut row, "creator.descriptor.short_desc", "creator.short_desc");
        rename(&mut row, "creator.descriptor.long_desc", "creator.long_desc");
        expand_tags(&mut row, descriptor_name);
        coerce_numeric(&mut row, "price.value");
        coerce_numeric(&mut row, "rating");
        row
    });
    CatalogTable::from_rows(rows)
}

pub fn scholarships(document: &Value) -> CatalogTable {
    let rows = provider_items(document, CATALOG_PROVIDERS, |_provider, item| {
        let mut row = flatten(item);
        for column in ["price.currency", "price.value"] {
            let text = match row.get(column) {
                Some(Value::String(s)) => s.clone(),
                _ => String::new(),
            };
            row.insert(column.to_string(), Value::String(text));
        }
        expand_tags(&mut row, descriptor_name);
        row
    });
    CatalogTable::from_rows(rows)
}

pub fn marketplace(document: &Value) -> CatalogTable {
    let rows = provider_items(document, CATALOG_PROVIDERS, |provider, item| {
        let mut row = flatten(item);
        add_provider_meta(
            &mut row,
            provider,
            &["name", "symbol", "short_desc", "long_desc", "images"],
            true,
        );
        rename(&mut row, "quantity.unitized.measure.unit", "quantity.unit");
        rename(&mut row, "quantity.unitized.measure.value", "quantity.value");
        rename(&mut row, "quantity.available.count", "quantity.available");
        rename(&mut row, "quantity.maximum.count", "quantity.maximum");
        expand_tags(&mut row, title);
        coerce_numeric(&mut row, "rating");
        row
    });
    CatalogTable::from_rows(rows)
}

/// Run `build_row` over every object item of every provider under `path`.
fn provider_items<F>(document: &Value, path: &[&str], build_row: F) -> Vec<Map<String, Value>>
where
    F: Fn(&Value, &Map<String, Value>) -> Map<String, Value>,
{
    let Some(providers) = lookup(document, path).and_then(Value::as_array) else {
        return Vec::new();
    };

    providers
        .iter()
        .flat_map(|provider| {
            provider
                .get("items")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_object)
                .map(move |item| (provider, item))
        })
        .map(|(provider, item)| build_row(provider, item))
        .collect()
}

/// Copy `provider.descriptor.<field>` into `provider_descriptor.<field>`
/// columns, plus `provider_id` when asked. Missing fields become null.
fn add_provider_meta(
    row: &mut Map<String, Value>,
    provider: &Value,
    descriptor_fields: &[&str],
    with_id: bool,
) {
    for field in descriptor_fields {
        let value = lookup(provider, &["descriptor", field])
            .cloned()
            .unwrap_or(Value::Null);
        row.insert(format!("provider_descriptor.{}", field), value);
    }
    if with_id {
        let id = provider.get("id").cloned().unwrap_or(Value::Null);
        row.insert("provider_id".to_string(), id);
    }
}
