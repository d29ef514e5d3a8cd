// SPDX-License-Identifier: MIT

//! ID generation for query identifiers and connection/queue designators.
//!
//! Query ids and designators are short-lived, heap-allocated strings,
//! generated fresh per query rather than reused from a pool.

const ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Generate a fresh query id: used to key `PendingResult` entries.
pub fn generate_query_id() -> String {
    format!("q_{}", nanoid::nanoid!(16, &ALPHABET))
}

/// Generate a designator: a short, process-lifetime-unique tag naming a
/// specific connection or queue, used for logging and result scoping.
pub fn generate_designator(database_name: &str, queue_kind: &str, queue_number: u32) -> String {
    format!("{database_name}:{queue_kind}:{queue_number}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_ids_are_distinct() {
        let a = generate_query_id();
        let b = generate_query_id();
        assert_ne!(a, b);
        assert!(a.starts_with("q_"));
    }

    #[test]
    fn designator_is_stable_for_same_inputs() {
        let a = generate_designator("printerdb", "lead", 0);
        let b = generate_designator("printerdb", "lead", 0);
        assert_eq!(a, b);
        assert_eq!(a, "printerdb:lead:0");
    }
}
