//! Daemon session trait and wire-shaped value types.
//!
//! The search daemon is reached through a single stateful connection: match
//! mode, ranking mode, limits, filters, and the pending multi-query batch all
//! live on the daemon side of the session and persist from one call to the
//! next. [`SearchBackend`] models that session; implementations wrap the
//! actual protocol client, test doubles record calls instead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Daemon-assigned document identifier.
pub type DocId = u64;

/// Relevance weight in daemon units; higher is more relevant. Under
/// field-mask ranking the same value carries a per-field bitmask instead.
pub type Weight = u64;

/// Query matching mode selected on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    All,
    Any,
    Phrase,
    Boolean,
    Extended,
    FullScan,
    Extended2,
}

/// Ranking algorithm selected on the session. The algorithms themselves run
/// remotely and are opaque to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingMode {
    ProximityBm25,
    Bm25,
    None,
    WordCount,
    Proximity,
    MatchAny,
    /// Weight output is a bitmask of matched fields rather than a score.
    /// The daemon only honors this under [`MatchMode::Extended2`].
    FieldMask,
}

/// Per-query status reported by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QueryStatus {
    #[default]
    Ok,
    Error,
    Retry,
    Warning,
}

/// One matched row as returned by the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub id: DocId,
    pub weight: Weight,
    /// Attribute values keyed by attribute name.
    #[serde(default)]
    pub attrs: BTreeMap<String, Value>,
}

/// Raw result of a single query: the fetched page of matches plus totals and
/// the index's field list, in daemon-reported order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawResult {
    pub status: QueryStatus,
    /// Matched rows in relevance order.
    #[serde(default)]
    pub matches: Vec<MatchRow>,
    /// Full-text field names of the queried index, in bit-position order.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Matches actually retrieved into this page.
    #[serde(default)]
    pub total: u64,
    /// Total matches found across the index.
    #[serde(default)]
    pub total_found: u64,
    #[serde(default)]
    pub warning: Option<String>,
}

/// The daemon session consumed by [`crate::client::SearchClient`].
///
/// All mutating calls change shared session state that the next query reads;
/// at most one logical search may be in flight per session (callers serialize
/// access, see the crate docs).
pub trait SearchBackend: Send {
    /// Escape query-syntax metacharacters in a raw query string.
    fn escape(&self, raw: &str) -> String;

    fn set_match_mode(&mut self, mode: MatchMode);

    fn set_ranking_mode(&mut self, mode: RankingMode);

    /// Set the result window: seek past `offset` rows, return at most
    /// `limit`, retrieve at most `max_matches`, stop searching at `cutoff`
    /// (0 disables the latter two).
    fn set_limits(&mut self, offset: u32, limit: u32, max_matches: u32, cutoff: u32);

    fn set_field_weights(&mut self, weights: &BTreeMap<String, u32>);

    fn set_filter(&mut self, attribute: &str, values: &[i64], exclude: bool);

    fn reset_filters(&mut self);

    fn reset_group_by(&mut self);

    fn reset_overrides(&mut self);

    /// Execute one query against the space-separated physical index list.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure; daemon-level failures are
    /// reported through [`RawResult::status`] and [`SearchBackend::last_error`].
    fn run_query(&mut self, query: &str, index_names: &str) -> anyhow::Result<RawResult>;

    /// Append one query to the pending batch under the current session state.
    fn add_query(&mut self, query: &str, index_names: &str);

    /// Execute the pending batch in one round trip, returning per-query
    /// results in submission order.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure. Per-query daemon failures are
    /// left in each entry's own status field.
    fn run_queries(&mut self) -> anyhow::Result<Vec<RawResult>>;

    /// The daemon's error text for the most recent failed query.
    fn last_error(&self) -> String;
}
