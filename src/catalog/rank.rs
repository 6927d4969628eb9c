//! Domain-specific ordering of extracted catalog rows.
//!
//! Empty or non-numeric cells go last in both directions, so rows missing a
//! rating or salary never outrank rows that have one.

use crate::catalog::{CatalogTable, Domain};
use serde_json::{Map, Value};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: &'static str,
    pub direction: Direction,
}

const JOB_KEYS: &[SortKey] = &[
    SortKey {
        column: "Salary information",
        direction: Direction::Descending,
    },
    SortKey {
        column: "quantity.available.count",
        direction: Direction::Descending,
    },
];

const COURSE_KEYS: &[SortKey] = &[
    SortKey {
        column: "rating",
        direction: Direction::Descending,
    },
    SortKey {
        column: "price.value",
        direction: Direction::Ascending,
    },
];

const MARKETPLACE_KEYS: &[SortKey] = &[SortKey {
    column: "rating",
    direction: Direction::Descending,
}];

/// Sort keys in priority order. Scholarships keep source order.
pub fn sort_keys(domain: Domain) -> &'static [SortKey] {
    match domain {
        Domain::Job => JOB_KEYS,
        Domain::Course => COURSE_KEYS,
        Domain::Scholarship => &[],
        Domain::Ondc => MARKETPLACE_KEYS,
    }
}

/// Stable sort of `table` by `keys`. Null or non-numeric cells sort after
/// every number, whichever the direction.
pub fn rank(table: &mut CatalogTable, keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    table.rows.sort_by(|a, b| compare_rows(a, b, keys));
}

fn compare_rows(a: &Map<String, Value>, b: &Map<String, Value>, keys: &[SortKey]) -> Ordering {
    keys.iter()
        .map(|key| {
            let left = a.get(key.column).and_then(Value::as_f64);
            let right = b.get(key.column).and_then(Value::as_f64);
            compare_cells(left, right, key.direction)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn compare_cells(left: Option<f64>, right: Option<f64>, direction: Direction) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(l), Some(r)) => {
            let ordering = l.total_cmp(&r);
            match direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        }
    }
}
