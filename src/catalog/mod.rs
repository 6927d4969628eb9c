//! Catalog recommendations: flatten a nested catalog document into a table
//! and rank its rows for one of the known domains.

pub mod extract;
pub mod flatten;
pub mod rank;

use crate::error::CatalogError;
use crate::telemetry::Scope;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Job,
    Course,
    Scholarship,
    /// Retail marketplace listings
    Ondc,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Job => "job",
            Domain::Course => "course",
            Domain::Scholarship => "scholarship",
            Domain::Ondc => "ondc",
        }
    }

    /// Extract this domain's rows from `document`, unranked.
    pub fn extract(&self, document: &Value) -> CatalogTable {
        match self {
            Domain::Job => extract::jobs(document),
            Domain::Course => extract::courses(document),
            Domain::Scholarship => extract::scholarships(document),
            Domain::Ondc => extract::marketplace(document),
        }
    }
}

impl FromStr for Domain {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "job" => Ok(Domain::Job),
            "course" => Ok(Domain::Course),
            "scholarship" => Ok(Domain::Scholarship),
            "ondc" => Ok(Domain::Ondc),
            _ => Err(CatalogError::UnrecognizedDomain(s.to_string())),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rows sharing one column set. Every row has a cell for every column,
/// null where its source had nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTable {
    /// Union of row keys in first-seen order
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl CatalogTable {
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = rows
            .into_iter()
            .map(|mut row| {
                columns
                    .iter()
                    .map(|column| {
                        let cell = row.remove(column).unwrap_or(Value::Null);
                        (column.clone(), cell)
                    })
                    .collect::<Map<String, Value>>()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A ranked table ready to return to a caller.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub domain: Domain,
    pub count: usize,
    pub columns: Vec<String>,
    pub results: Vec<Map<String, Value>>,
}

/// Extract and rank `payload` for the domain named by `domain`.
pub fn recommend(payload: &Value, domain: &str) -> Result<Recommendation, CatalogError> {
    let scope = Scope::start("recommend");
    let result = domain.parse::<Domain>().map(|domain| {
        let mut table = domain.extract(payload);
        rank::rank(&mut table, rank::sort_keys(domain));
        info!("Ranked {} {} records", table.len(), domain);
        Recommendation {
            domain,
            count: table.len(),
            columns: table.columns,
            results: table.rows,
        }
    });
    scope.finish(&result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Domain Tests ====================

    #[test]
    fn test_domain_parsing() {
        assert_eq!("job".parse::<Domain>().unwrap(), Domain::Job);
        assert_eq!(" Course ".parse::<Domain>().unwrap(), Domain::Course);
        assert_eq!("ONDC".parse::<Domain>().unwrap(), Domain::Ondc);

        let err = "music".parse::<Domain>().unwrap_err();
        assert_eq!(err.code(), "unrecognized_domain");
        assert!(err.to_string().contains("music"));
    }

    #[test]
    fn test_domain_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Domain::Scholarship).unwrap(), json!("scholarship"));
        assert_eq!(Domain::Ondc.to_string(), "ondc");
    }

    // ==================== Table Tests ====================

    #[test]
    fn test_table_fills_missing_cells() {
        let rows = vec![
            json!({"a": 1, "b": 2}).as_object().cloned().unwrap(),
            json!({"c": 3, "a": 4}).as_object().cloned().unwrap(),
        ];
        let table = CatalogTable::from_rows(rows);

        assert_eq!(table.columns, vec!["a", "b", "c"]);
        assert_eq!(table.rows[0]["c"], Value::Null);
        assert_eq!(table.rows[1]["b"], Value::Null);
        let second: Vec<&String> = table.rows[1].keys().collect();
        assert_eq!(second, vec!["a", "b", "c"]);
    }

    // ==================== Recommend Tests ====================

    #[test]
    fn test_recommend_jobs() {
        let doc = json!({"message": {"catalog": {"providers": [{
            "id": "p",
            "descriptor": {"name": "Acme"},
            "items": [
                {"id": "five", "quantity": {"available": {"count": 5}},
                 "tags": [{"descriptor": {"name": "Salary information"}, "list": [{"value": "100"}]}]},
                {"id": "ten", "quantity": {"available": {"count": 10}},
                 "tags": [{"descriptor": {"name": "Salary information"}, "list": [{"value": "100"}]}]}
            ]
        }]}}});

        let recommendation = recommend(&doc, "job").unwrap();
        assert_eq!(recommendation.domain, Domain::Job);
        assert_eq!(recommendation.count, 2);
        assert_eq!(recommendation.results[0]["id"], json!("ten"));
        assert_eq!(recommendation.results[1]["id"], json!("five"));
    }

    #[test]
    fn test_recommend_courses() {
        let doc = json!({"data": {"course": {"message": {"catalog": {"providers": [{
            "items": [
                {"id": "low", "rating": "3.0", "price": {"value": "5"}},
                {"id": "high", "rating": "4.5", "price": {"value": "10"}}
            ]
        }]}}}}});

        let recommendation = recommend(&doc, "course").unwrap();
        assert_eq!(recommendation.results[0]["id"], json!("high"));
    }

    #[test]
    fn test_recommend_empty_document() {
        let recommendation = recommend(&json!({}), "ondc").unwrap();
        assert_eq!(recommendation.count, 0);
        assert!(recommendation.columns.is_empty());
    }

    #[test]
    fn test_recommend_unknown_domain() {
        let err = recommend(&json!({}), "housing").unwrap_err();
        assert!(matches!(err, CatalogError::UnrecognizedDomain(d) if d == "housing"));
    }
}
