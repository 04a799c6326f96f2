//! Record types returned by the balldontlie API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single NBA team as returned by `GET /v1/teams`.
///
/// Fields are passed through untouched. Anything the API adds beyond the
/// known columns lands in `extra` and is written back out verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    #[serde(default)]
    pub conference: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    pub name: String,
    pub full_name: String,
    pub abbreviation: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Team {
    /// Build a team with the standard columns and no extra fields.
    pub fn new(
        id: i64,
        conference: &str,
        division: &str,
        city: &str,
        name: &str,
        full_name: &str,
        abbreviation: &str,
    ) -> Self {
        Self {
            id,
            conference: Some(conference.to_string()),
            division: Some(division.to_string()),
            city: Some(city.to_string()),
            name: name.to_string(),
            full_name: full_name.to_string(),
            abbreviation: abbreviation.to_string(),
            extra: Map::new(),
        }
    }
}

/// Envelope of a list response: `{"data": [...], "meta": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<Value>,
}
