// src/filter.rs
//
// Criteria filter for locally decoded rows.
//
// Rules:
// - Only name / location / technology are compared (email/phone never).
// - Both sides lowercased; a criterion matches when it is empty (wildcard)
//   or is a substring of the row value. "go" matches "Google" on purpose.
// - A row is kept only when all three criteria match.

use crate::lead::{Criteria, Field, RawRow};
use crate::normalize::HeaderStrategy;

/// Single-field rule.
pub fn field_matches(value: &str, criterion: &str) -> bool {
    let criterion = criterion.trim();
    criterion.is_empty() || value.to_lowercase().contains(&criterion.to_lowercase())
}

pub fn matches(row: &RawRow, criteria: &Criteria, strategy: &dyn HeaderStrategy) -> bool {
    Field::SEARCHABLE
        .iter()
        .all(|&f| field_matches(strategy.resolve(row, f), criteria.get(f)))
}

/// Borrowing filter over a decoded sheet, keeps row order.
pub fn filter_rows<'a>(
    rows: &'a [RawRow],
    criteria: &'a Criteria,
    strategy: &'a dyn HeaderStrategy,
) -> impl Iterator<Item = &'a RawRow> + 'a {
    rows.iter().filter(move |r| matches(r, criteria, strategy))
}
