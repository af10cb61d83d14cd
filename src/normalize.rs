// src/normalize.rs
//! Record normalization: spreadsheet headers → canonical lead fields.
//!
//! Spreadsheets in the wild name their columns however they like
//! ("Full Name", "City", "Skillset", "Mobile #"). A [`HeaderStrategy`]
//! decides which cell of a [`RawRow`] feeds each canonical [`Field`];
//! the filter and the normalizer both go through the same strategy, so the
//! row that was matched is the row that gets shown.
//!
//! ## Known limitation
//! [`SubstringHeaders`] is a best-effort heuristic. When several headers
//! contain the same token ("Name" and "Company Name"), the first one in the
//! row's column order wins. Synonyms outside the token list are not found.
//! Use [`ExplicitHeaders`] when the sheet layout is known.

use std::collections::HashMap;

use crate::config::options::HeaderOptions;
use crate::lead::{Field, LeadRecord, RawRow};

pub trait HeaderStrategy: Send + Sync {
    /// Cell value feeding `field`, or "" when no header applies.
    fn resolve<'r>(&self, row: &'r RawRow, field: Field) -> &'r str;
}

/// Case-insensitive substring scan over the row's headers.
/// Tokens are tried in priority order; within a token, column order decides.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubstringHeaders;

impl SubstringHeaders {
    pub fn tokens(field: Field) -> &'static [&'static str] {
        match field {
            Field::Name => &["name"],
            Field::Location => &["location", "city"],
            Field::Technology => &["tech", "skill"],
            Field::Email => &["email", "mail"],
            Field::Phone => &["phone", "mobile", "contact"],
        }
    }
}

impl HeaderStrategy for SubstringHeaders {
    fn resolve<'r>(&self, row: &'r RawRow, field: Field) -> &'r str {
        let lowered: Vec<(String, &str)> = row
            .iter()
            .map(|(h, v)| (h.to_lowercase(), v))
            .collect();

        for token in Self::tokens(field) {
            if let Some((_, v)) = lowered.iter().find(|(h, _)| h.contains(token)) {
                return *v;
            }
        }
        ""
    }
}

/// Exact header name per field (case-insensitive, surrounding whitespace ignored).
#[derive(Clone, Debug, Default)]
pub struct ExplicitHeaders {
    map: HashMap<Field, String>,
}

impl ExplicitHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field, header: &str) -> Self {
        self.map.insert(field, header.trim().to_lowercase());
        self
    }

    pub fn from_options(opts: &HeaderOptions) -> Self {
        Field::ALL
            .iter()
            .filter_map(|f| opts.get(*f).map(|h| (*f, h)))
            .fold(Self::new(), |acc, (f, h)| acc.with(f, h))
    }
}

impl HeaderStrategy for ExplicitHeaders {
    fn resolve<'r>(&self, row: &'r RawRow, field: Field) -> &'r str {
        let Some(want) = self.map.get(&field) else { return "" };
        row.iter()
            .find(|(h, _)| h.trim().to_lowercase() == *want)
            .map(|(_, v)| v)
            .unwrap_or("")
    }
}

/// Pick the strategy the options ask for.
pub fn strategy_for(headers: Option<&HeaderOptions>) -> Box<dyn HeaderStrategy> {
    match headers {
        Some(h) => {
            logf!("Headers: Using explicit mapping {:?}", h);
            Box::new(ExplicitHeaders::from_options(h))
        }
        None => Box::new(SubstringHeaders),
    }
}

/// Total: any row yields a record; unmatched fields are "".
pub fn normalize(row: &RawRow, strategy: &dyn HeaderStrategy) -> LeadRecord {
    let mut rec = LeadRecord::default();
    for field in Field::ALL {
        rec.set(field, strategy.resolve(row, field));
    }
    rec
}
