//! Per-call search options and their validation.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::hydrate::EntityHydrator;

/// Default result window size when the caller does not narrow it.
pub const DEFAULT_RESULT_LIMIT: u32 = 100_000;

/// Errors raised by option validation, always before any daemon round trip.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("no search indexes were specified")]
    MissingIndexes,

    #[error("raw results and an entity hydrator cannot be combined")]
    RawResultsWithHydrator,

    #[error("no physical index is configured for any of: {}", .labels.join(", "))]
    UnknownIndexes { labels: Vec<String> },
}

/// Options for a single search call.
///
/// Offsets, limits, and weights are non-negative by construction; the two
/// invariants the type system cannot express — at least one index label, and
/// raw results being incompatible with a hydrator — are checked by
/// [`SearchOptions::validate`] once per call.
///
/// `E` is the domain-object type produced by the hydrator, `()` when no
/// hydrator is attached.
pub struct SearchOptions<'h, E = ()> {
    /// Logical index labels to search, in order. Labels with no configured
    /// physical index are dropped at resolution time.
    pub indexes: Vec<String>,
    /// Rows to seek past before the returned page.
    pub result_offset: u32,
    /// Maximum rows in the returned page.
    pub result_limit: u32,
    /// Escape query-syntax metacharacters before executing.
    pub escape_query: bool,
    /// Run the extra field-mask round trip and attach per-field match maps.
    pub include_field_matches: bool,
    /// Return only the daemon's total match count.
    pub total_only: bool,
    /// Return the daemon's result structure unmodified.
    pub raw_results: bool,
    /// Per-field relevance weights applied before the query.
    pub field_weights: Option<BTreeMap<String, u32>>,
    /// Bulk id-to-domain-object lookup, invoked at most once per search.
    pub hydrator: Option<&'h dyn EntityHydrator<Entity = E>>,
}

impl<E> Default for SearchOptions<'_, E> {
    fn default() -> Self {
        Self {
            indexes: Vec::new(),
            result_offset: 0,
            result_limit: DEFAULT_RESULT_LIMIT,
            escape_query: true,
            include_field_matches: false,
            total_only: false,
            raw_results: false,
            field_weights: None,
            hydrator: None,
        }
    }
}

impl SearchOptions<'static, ()> {
    /// Options for a single index label.
    #[must_use]
    pub fn for_index(label: impl Into<String>) -> Self {
        Self::for_indexes([label.into()])
    }

    /// Options for an ordered list of index labels.
    #[must_use]
    pub fn for_indexes<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            indexes: labels.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl<'h, E> SearchOptions<'h, E> {
    /// Attach a hydrator, converting the options to its entity type.
    #[must_use]
    pub fn hydrate_with<'h2, E2>(
        self,
        hydrator: &'h2 dyn EntityHydrator<Entity = E2>,
    ) -> SearchOptions<'h2, E2> {
        SearchOptions {
            indexes: self.indexes,
            result_offset: self.result_offset,
            result_limit: self.result_limit,
            escape_query: self.escape_query,
            include_field_matches: self.include_field_matches,
            total_only: self.total_only,
            raw_results: self.raw_results,
            field_weights: self.field_weights,
            hydrator: Some(hydrator),
        }
    }

    /// Check the invariants that must hold before any daemon interaction.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::MissingIndexes`] when no label was supplied,
    /// or [`OptionsError::RawResultsWithHydrator`] when both raw results and
    /// a hydrator were requested.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.indexes.is_empty() {
            return Err(OptionsError::MissingIndexes);
        }
        if self.raw_results && self.hydrator.is_some() {
            return Err(OptionsError::RawResultsWithHydrator);
        }
        Ok(())
    }
}

impl<E> fmt::Debug for SearchOptions<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchOptions")
            .field("indexes", &self.indexes)
            .field("result_offset", &self.result_offset)
            .field("result_limit", &self.result_limit)
            .field("escape_query", &self.escape_query)
            .field("include_field_matches", &self.include_field_matches)
            .field("total_only", &self.total_only)
            .field("raw_results", &self.raw_results)
            .field("field_weights", &self.field_weights)
            .field("hydrator", &self.hydrator.is_some())
            .finish()
    }
}
