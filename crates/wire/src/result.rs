// SPDX-License-Identifier: MIT

//! `QueryResult`/`QueryOutcome` shaping (spec §3, §6.2). `data_json` is
//! always a syntactically valid JSON array; string escaping is delegated
//! to `serde_json`, which is RFC 8259-compliant by construction.

use serde_json::Value;

/// Result of one executed statement.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub success: bool,
    pub column_count: usize,
    pub row_count: usize,
    pub column_names: Vec<String>,
    pub data_json: String,
    pub affected_rows: u64,
}

/// Build a `QueryResult` from column names (possibly empty, i.e. unnamed)
/// and row data. An empty column name is rendered as `col_<index>`
/// (zero-based, per spec §6.2).
pub fn build_query_result(
    column_names: Vec<String>,
    rows: Vec<Vec<Value>>,
    affected_rows: u64,
) -> QueryResult {
    let column_names: Vec<String> = column_names
        .into_iter()
        .enumerate()
        .map(|(i, name)| if name.is_empty() { format!("col_{i}") } else { name })
        .collect();
    let row_count = rows.len();
    let data_json = serde_json::to_string(&Value::Array(
        rows.into_iter().map(Value::Array).collect(),
    ))
    .unwrap_or_else(|_| "[]".to_string());

    QueryResult {
        success: true,
        column_count: column_names.len(),
        row_count,
        column_names,
        data_json,
        affected_rows,
    }
}

/// A mutating statement (`INSERT`/`UPDATE`/`DELETE`) has no rows: `[]`
/// with `affected_rows` populated.
pub fn mutation_query_result(affected_rows: u64) -> QueryResult {
    QueryResult {
        success: true,
        column_count: 0,
        row_count: 0,
        column_names: Vec::new(),
        data_json: "[]".to_string(),
        affected_rows,
    }
}

/// Outcome delivered through the `PendingResultRegistry`'s one-shot slot.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Completed(QueryResult),
    ResultTimeout,
    ResultAborted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unnamed_columns_get_positional_names() {
        let result = build_query_result(
            vec!["id".to_string(), String::new()],
            vec![vec![json!(1), json!("x")]],
            0,
        );
        assert_eq!(result.column_names, vec!["id".to_string(), "col_1".to_string()]);
    }

    #[test]
    fn mutation_result_is_empty_array_with_affected_rows() {
        let result = mutation_query_result(7);
        assert_eq!(result.data_json, "[]");
        assert_eq!(result.affected_rows, 7);
        assert_eq!(result.row_count, 0);
    }

    #[test]
    fn string_values_are_rfc8259_escaped() {
        let result = build_query_result(
            vec!["note".to_string()],
            vec![vec![json!("line1\nline2\t\"quoted\"\\")]],
            0,
        );
        assert!(result.data_json.contains("\\n"));
        assert!(result.data_json.contains("\\t"));
        assert!(result.data_json.contains("\\\""));
        assert!(result.data_json.contains("\\\\"));
        // Always a syntactically valid JSON array.
        let parsed: Value = serde_json::from_str(&result.data_json).unwrap();
        assert!(parsed.is_array());
    }

    #[test]
    fn empty_rows_serialize_to_empty_array() {
        let result = build_query_result(vec!["id".to_string()], vec![], 0);
        assert_eq!(result.data_json, "[]");
    }
}
