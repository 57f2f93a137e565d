use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, DefaultOnNull};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryOptions {
    pub query: String,
    pub num_results: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Echo the built query document to stdout before sending it.
    pub show: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub hits: Hits,
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub timed_out: bool,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hits {
    pub hits: Vec<Hit>,
    #[serde(default, deserialize_with = "deserialize_total")]
    pub total: u64,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub max_score: f64,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "_score", default)]
    pub score: f64,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
    #[serde(default)]
    pub highlight: BTreeMap<String, Vec<String>>,
}

impl Hit {
    /// Highlighted fragments as `(field, fragment)` pairs, fields in name order.
    pub fn fragments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.highlight.iter().flat_map(|(field, fragments)| {
            fragments
                .iter()
                .map(move |fragment| (field.as_str(), fragment.as_str()))
        })
    }
}

/// Older engines report `total` as a bare count, newer ones as `{"value": n, "relation": ".."}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

fn deserialize_total<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TotalHits::deserialize(deserializer)? {
        TotalHits::Count(value) | TotalHits::Object { value } => value,
    })
}
