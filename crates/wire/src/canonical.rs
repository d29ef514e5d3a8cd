// SPDX-License-Identifier: MIT

//! Named-to-positional parameter canonicalization (spec §6.2).

use hydrogen_core::DatabaseEngine;
use indexmap::IndexMap;

use crate::error::WireError;
use crate::params::ParamValue;

/// Rewrite every `:name` occurrence in `template` into `engine`'s
/// positional placeholder form, in the order the names occur. Returns the
/// rewritten SQL plus the ordered parameter list (duplicated occurrences
/// of the same name produce duplicated entries, preserving occurrence
/// count per spec §8 invariant 7).
pub fn convert_named_to_positional(
    template: &str,
    params: &IndexMap<String, ParamValue>,
    engine: DatabaseEngine,
) -> Result<(String, Vec<ParamValue>), WireError> {
    let mut sql = String::with_capacity(template.len());
    let mut ordered = Vec::new();
    let chars: Vec<char> = template.chars().collect();
    let mut i = 0;
    let mut positional_index = 0usize;

    while i < chars.len() {
        if chars[i] == ':' && i + 1 < chars.len() && is_ident_start(chars[i + 1]) {
            let start = i + 1;
            let mut end = start;
            while end < chars.len() && is_ident_continue(chars[end]) {
                end += 1;
            }
            let name: String = chars[start..end].iter().collect();
            let value = params
                .get(&name)
                .ok_or_else(|| WireError::ParameterNotFound(name.clone()))?;
            ordered.push(value.clone());
            positional_index += 1;
            sql.push_str(&placeholder(engine, positional_index));
            i = end;
        } else {
            sql.push(chars[i]);
            i += 1;
        }
    }

    Ok((sql, ordered))
}

fn placeholder(engine: DatabaseEngine, index: usize) -> String {
    match engine {
        DatabaseEngine::Postgres => format!("${index}"),
        DatabaseEngine::MySql | DatabaseEngine::Sqlite | DatabaseEngine::Db2 => "?".to_string(),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> IndexMap<String, ParamValue> {
        let mut m = IndexMap::new();
        m.insert("userId".to_string(), ParamValue::Integer(123));
        m.insert("username".to_string(), ParamValue::Text("johndoe".to_string()));
        m
    }

    #[test]
    fn s4_postgres_uses_dollar_positional() {
        let (sql, ordered) = convert_named_to_positional(
            "SELECT * FROM users WHERE user_id = :userId AND username = :username",
            &params(),
            DatabaseEngine::Postgres,
        )
        .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM users WHERE user_id = $1 AND username = $2"
        );
        assert_eq!(
            ordered,
            vec![
                ParamValue::Integer(123),
                ParamValue::Text("johndoe".to_string())
            ]
        );
    }

    #[test]
    fn s4_mysql_sqlite_db2_use_question_mark() {
        for engine in [DatabaseEngine::MySql, DatabaseEngine::Sqlite, DatabaseEngine::Db2] {
            let (sql, _) = convert_named_to_positional(
                "SELECT * FROM users WHERE user_id = :userId AND username = :username",
                &params(),
                engine,
            )
            .unwrap();
            assert_eq!(
                sql,
                "SELECT * FROM users WHERE user_id = ? AND username = ?"
            );
        }
    }

    #[test]
    fn missing_parameter_fails_without_dispatch() {
        let err = convert_named_to_positional(
            "SELECT :missing",
            &IndexMap::new(),
            DatabaseEngine::Postgres,
        )
        .unwrap_err();
        assert_eq!(err, WireError::ParameterNotFound("missing".to_string()));
    }

    #[test]
    fn repeated_name_produces_repeated_occurrence() {
        let (sql, ordered) = convert_named_to_positional(
            ":userId = :userId",
            &params(),
            DatabaseEngine::Postgres,
        )
        .unwrap();
        assert_eq!(sql, "$1 = $2");
        assert_eq!(ordered.len(), 2);
    }

    proptest::proptest! {
        #[test]
        fn occurrence_count_preserved(repeats in 1usize..6) {
            let template: String = std::iter::repeat(":userId ").take(repeats).collect();
            let (_, ordered) = convert_named_to_positional(&template, &params(), DatabaseEngine::Postgres).unwrap();
            prop_assert_eq!(ordered.len(), repeats);
        }
    }
}
