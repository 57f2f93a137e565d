//! Request body for the `_search` endpoint: a filtered `query_string` query over a
//! `@timestamp` range, sorted by timestamp and highlighted on every field.

use crate::highlight::{HIGHLIGHT_POST_TAG, HIGHLIGHT_PRE_TAG};
use crate::models::QueryOptions;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub const FRAGMENT_SIZE: u32 = 32_000;
pub const NUMBER_OF_FRAGMENTS: u32 = 100;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchBody {
    pub size: usize,
    pub sort: TimestampSort,
    pub query: FilteredQuery,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimestampSort {
    #[serde(rename = "@timestamp")]
    pub timestamp: SortDirective,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SortDirective {
    pub order: &'static str,
    /// Lets the sort succeed on indices that have no timestamp mapping.
    pub unmapped_type: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FilteredQuery {
    pub filtered: Filtered,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Filtered {
    pub query: QueryStringClause,
    pub filter: RangeFilter,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryStringClause {
    pub query_string: QueryString,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryString {
    pub query: String,
    pub analyze_wildcard: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RangeFilter {
    pub range: TimestampRange,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimestampRange {
    #[serde(rename = "@timestamp")]
    pub timestamp: Bounds,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bounds {
    pub gte: DateTime<Utc>,
    pub lte: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Highlight {
    pub pre_tags: Vec<&'static str>,
    pub post_tags: Vec<&'static str>,
    pub fields: BTreeMap<&'static str, HighlightField>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HighlightField {
    pub force_source: bool,
    pub fragment_size: u32,
    pub number_of_fragments: u32,
}

pub fn build_query(options: &QueryOptions) -> SearchBody {
    let sort = TimestampSort {
        timestamp: SortDirective {
            order: "asc",
            unmapped_type: "long",
        },
    };

    let query = FilteredQuery {
        filtered: Filtered {
            query: QueryStringClause {
                query_string: QueryString {
                    query: options.query.clone(),
                    analyze_wildcard: "true",
                },
            },
            filter: RangeFilter {
                range: TimestampRange {
                    timestamp: Bounds {
                        gte: options.start_time,
                        lte: options.end_time,
                    },
                },
            },
        },
    };

    let mut fields = BTreeMap::new();
    fields.insert(
        "*",
        HighlightField {
            force_source: true,
            fragment_size: FRAGMENT_SIZE,
            number_of_fragments: NUMBER_OF_FRAGMENTS,
        },
    );

    SearchBody {
        size: options.num_results,
        sort,
        query,
        highlight: Highlight {
            pre_tags: vec![HIGHLIGHT_PRE_TAG],
            post_tags: vec![HIGHLIGHT_POST_TAG],
            fields,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn options(query: &str, num_results: usize) -> QueryOptions {
        QueryOptions {
            query: query.to_string(),
            num_results,
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 15).unwrap(),
            show: false,
        }
    }

    #[test]
    fn size_and_range_follow_options() {
        let options = options("error", 25);
        let body = build_query(&options);
        assert_eq!(body.size, 25);
        assert_eq!(body.query.filtered.filter.range.timestamp.gte, options.start_time);
        assert_eq!(body.query.filtered.filter.range.timestamp.lte, options.end_time);

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["size"], json!(25));
        assert_eq!(
            value["query"]["filtered"]["filter"]["range"]["@timestamp"],
            json!({"gte": "2024-03-01T08:00:00Z", "lte": "2024-03-01T09:30:15Z"})
        );
    }

    #[test]
    fn serialized_document_has_expected_shape() {
        let value = serde_json::to_value(build_query(&options("host:web-* AND 500", 10))).unwrap();

        assert_eq!(
            value,
            json!({
                "size": 10,
                "sort": {"@timestamp": {"order": "asc", "unmapped_type": "long"}},
                "query": {
                    "filtered": {
                        "query": {
                            "query_string": {"query": "host:web-* AND 500", "analyze_wildcard": "true"}
                        },
                        "filter": {
                            "range": {
                                "@timestamp": {"gte": "2024-03-01T08:00:00Z", "lte": "2024-03-01T09:30:15Z"}
                            }
                        }
                    }
                },
                "highlight": {
                    "pre_tags": ["@BEGIN-LOGSEARCH-HIGHLIGHT@"],
                    "post_tags": ["@END-LOGSEARCH-HIGHLIGHT@"],
                    "fields": {
                        "*": {"force_source": true, "fragment_size": 32000, "number_of_fragments": 100}
                    }
                }
            })
        );
    }

    #[test]
    fn sort_and_highlight_do_not_depend_on_input() {
        let first: Value = serde_json::to_value(build_query(&options("", 0))).unwrap();
        let second: Value = serde_json::to_value(build_query(&options("timeout OR refused", 500))).unwrap();

        assert_eq!(first["sort"], second["sort"]);
        assert_eq!(first["highlight"], second["highlight"]);
        assert_eq!(
            first["sort"],
            json!({"@timestamp": {"order": "asc", "unmapped_type": "long"}})
        );
        assert_eq!(first["highlight"]["fields"]["*"]["fragment_size"], json!(32000));
        assert_eq!(first["highlight"]["fields"]["*"]["number_of_fragments"], json!(100));
    }
}
