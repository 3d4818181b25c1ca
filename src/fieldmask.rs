//! Per-field match decoding from field-mask weights.
//!
//! Under [`crate::backend::RankingMode::FieldMask`] the daemon reports, in
//! place of a relevance score, a bitmask over the index's full-text fields:
//! bit `k` of a row's weight is set iff the field at position `k` of the
//! daemon-reported field list contributed to the match.

use std::collections::{BTreeMap, HashMap};

use crate::backend::{DocId, MatchRow, Weight};

/// Which fields matched for one row, keyed by field name.
pub type FieldMatches = BTreeMap<String, bool>;

/// Field-match maps for a whole result set, keyed by document id.
pub type FieldMatchMap = HashMap<DocId, FieldMatches>;

/// Decode field-mask weights into per-field match maps.
///
/// # Panics
///
/// Panics if the daemon reports more fields than the weight has bits; the
/// daemon's own ceiling (typically 32 fields) makes this unreachable against
/// a conforming backend.
#[must_use]
pub fn decode(fields: &[String], rows: &[MatchRow]) -> FieldMatchMap {
    assert!(
        fields.len() <= Weight::BITS as usize,
        "daemon reported {} full-text fields, more than a {}-bit weight can mask",
        fields.len(),
        Weight::BITS
    );

    rows.iter()
        .map(|row| {
            let matched = fields
                .iter()
                .enumerate()
                .map(|(bit, field)| (field.clone(), row.weight & (1 << bit) != 0))
                .collect();
            (row.id, matched)
        })
        .collect()
}
