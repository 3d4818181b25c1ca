//! The high-level search client.
//!
//! [`SearchClient`] owns one daemon session and orchestrates the full
//! pipeline for a search call: option validation, the optional field-mask
//! round trip, index label resolution, query execution, and result shaping.
//! It also exposes the session surface (modes, limits, filters, reset) and
//! the multi-query batching path.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::backend::{MatchMode, MatchRow, QueryStatus, RankingMode, RawResult, SearchBackend};
use crate::config::Config;
use crate::fieldmask::{self, FieldMatchMap};
use crate::hydrate::{self, SearchResult};
use crate::index::IndexMap;
use crate::options::{OptionsError, SearchOptions};

/// Errors raised by [`SearchClient`] operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Invalid or contradictory options, detected before any daemon call.
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// The daemon reported a failure for a query, or the round trip itself
    /// failed. Carries the index labels, the query, and the daemon's error.
    #[error("searching indexes \"{indexes}\" for \"{query}\" failed with error \"{message}\"")]
    Execution {
        indexes: String,
        query: String,
        message: String,
    },

    /// The caller-supplied hydrator failed.
    #[error("hydrating {count} matched ids failed")]
    Hydration {
        count: usize,
        #[source]
        source: anyhow::Error,
    },

    /// Running the pending multi-query batch failed in transit.
    #[error("running batched queries failed: {message}")]
    Batch { message: String },
}

impl SearchError {
    fn execution(labels: &[String], query: &str, message: impl Into<String>) -> Self {
        Self::Execution {
            indexes: labels.join(", "),
            query: query.to_string(),
            message: message.into(),
        }
    }
}

/// What a search call produced, shaped by the options.
#[derive(Debug)]
pub enum SearchOutput<E = ()> {
    /// Ranked results carrying raw daemon rows, in daemon order.
    Hits(Vec<SearchResult<MatchRow>>),
    /// Hydrated domain objects ordered by descending weight.
    Entities(Vec<SearchResult<E>>),
    /// The daemon's total match count (`total_only`).
    Total(u64),
    /// The unmodified daemon result (`raw_results`).
    Raw(RawResult),
}

/// High-level client over one stateful daemon session.
///
/// Session state (modes, filters, limits, the pending batch) is shared and
/// mutable on the daemon side: every call may change it and the next call
/// reads it. A client instance therefore supports at most one in-flight
/// logical search; concurrent callers must serialize access, which the
/// `&mut self` receivers enforce at the type level.
pub struct SearchClient<B> {
    backend: B,
    indexes: IndexMap,
    strict_indexes: bool,
}

impl<B: SearchBackend> SearchClient<B> {
    pub fn new(backend: B, indexes: IndexMap) -> Self {
        Self {
            backend,
            indexes,
            strict_indexes: false,
        }
    }

    /// Wire a client from loaded configuration.
    pub fn from_config(backend: B, config: &Config) -> Self {
        Self {
            backend,
            indexes: config.index_map(),
            strict_indexes: config.strict_indexes,
        }
    }

    /// Fail with [`OptionsError::UnknownIndexes`] instead of returning an
    /// empty result when no label resolves to a physical index.
    #[must_use]
    pub fn strict_indexes(mut self, strict: bool) -> Self {
        self.strict_indexes = strict;
        self
    }

    /// The underlying daemon session.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the session, for operations this client does not
    /// wrap (group-by, overrides, per-attribute filters beyond `set_filter`).
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // Session surface. These forward to the backend; state set here persists
    // until the next call that changes it, which the batching path relies on.

    #[must_use]
    pub fn escape_string(&self, raw: &str) -> String {
        self.backend.escape(raw)
    }

    pub fn set_match_mode(&mut self, mode: MatchMode) {
        self.backend.set_match_mode(mode);
    }

    /// Select the ranking mode.
    ///
    /// The daemon silently ignores field-mask ranking unless the match mode
    /// is simultaneously extended-2, so that coupling is enforced here: the
    /// match mode is set first whenever field-mask ranking is selected.
    pub fn set_ranking_mode(&mut self, mode: RankingMode) {
        if mode == RankingMode::FieldMask {
            self.set_match_mode(MatchMode::Extended2);
        }
        self.backend.set_ranking_mode(mode);
    }

    pub fn set_limits(&mut self, offset: u32, limit: u32, max_matches: u32, cutoff: u32) {
        self.backend.set_limits(offset, limit, max_matches, cutoff);
    }

    pub fn set_field_weights(&mut self, weights: &BTreeMap<String, u32>) {
        self.backend.set_field_weights(weights);
    }

    pub fn set_filter(&mut self, attribute: &str, values: &[i64], exclude: bool) {
        self.backend.set_filter(attribute, values, exclude);
    }

    pub fn reset_filters(&mut self) {
        self.backend.reset_filters();
    }

    /// Restore the session to its neutral defaults: no filters, group-by, or
    /// overrides; match mode `All`; ranking mode `ProximityBm25`.
    pub fn reset(&mut self) {
        self.backend.reset_filters();
        self.backend.reset_group_by();
        self.backend.reset_overrides();
        self.set_match_mode(MatchMode::All);
        self.set_ranking_mode(RankingMode::ProximityBm25);
    }

    /// Search for `query` across the labeled indexes.
    ///
    /// Runs the full pipeline: validation, the field-mask round trip when
    /// requested, the primary ranked query, and result shaping per the
    /// options. When no label resolves to a physical index, returns the
    /// empty value of the requested shape without contacting the daemon.
    ///
    /// # Errors
    ///
    /// [`SearchError::Options`] on invalid options (no daemon call is made),
    /// [`SearchError::Execution`] when the daemon reports a failure, and
    /// [`SearchError::Hydration`] when the supplied hydrator fails.
    pub fn search<E>(
        &mut self,
        query: &str,
        options: &SearchOptions<'_, E>,
    ) -> Result<SearchOutput<E>, SearchError> {
        options.validate()?;

        let field_matches = if options.include_field_matches && !options.total_only {
            Some(self.field_match_pass(query, options)?)
        } else {
            None
        };

        let Some(raw) = self.execute(query, options)? else {
            return Ok(Self::empty_output(options));
        };

        if options.total_only {
            return Ok(SearchOutput::Total(raw.total_found));
        }
        if options.raw_results {
            return Ok(SearchOutput::Raw(raw));
        }

        if let Some(hydrator) = options.hydrator {
            let results = hydrate::hydrate_rows(&raw.matches, hydrator, field_matches.as_ref())?;
            return Ok(SearchOutput::Entities(results));
        }

        Ok(SearchOutput::Hits(hydrate::rows_to_results(
            raw.matches,
            field_matches.as_ref(),
        )))
    }

    /// Append one query to the pending batch under the current session
    /// state. Labels that resolve to no physical index cause the query to be
    /// skipped, batch or not.
    pub fn add_query<S: AsRef<str>>(&mut self, query: &str, labels: &[S]) {
        let index_names = self.indexes.resolve(labels);
        if index_names.is_empty() {
            warn!(query, "no index label resolved, skipping batched query");
            return;
        }
        self.backend.add_query(query, &index_names);
    }

    /// Execute the pending batch in one round trip.
    ///
    /// Returns per-query results in submission order. Per-query daemon
    /// failures stay in each entry's own status field; no aggregate
    /// translation happens here.
    ///
    /// # Errors
    ///
    /// [`SearchError::Batch`] when the round trip itself fails.
    pub fn run_queries(&mut self) -> Result<Vec<RawResult>, SearchError> {
        debug!("running batched queries");
        self.backend
            .run_queries()
            .map_err(|err| SearchError::Batch {
                message: err.to_string(),
            })
    }

    /// Phase one of the field-match protocol: query under field-mask ranking
    /// (which forces extended-2 matching), decode the weights as bitmasks,
    /// then reset the session so the primary query starts neutral.
    fn field_match_pass<E>(
        &mut self,
        query: &str,
        options: &SearchOptions<'_, E>,
    ) -> Result<FieldMatchMap, SearchError> {
        debug!(query, "running field-mask pass");
        self.set_ranking_mode(RankingMode::FieldMask);
        let outcome = self.execute(query, options)?;
        self.reset();

        Ok(match outcome {
            Some(raw) => fieldmask::decode(&raw.fields, &raw.matches),
            None => FieldMatchMap::new(),
        })
    }

    /// Resolve indexes and run one query, or `None` when nothing resolved
    /// and the permissive policy applies.
    fn execute<E>(
        &mut self,
        query: &str,
        options: &SearchOptions<'_, E>,
    ) -> Result<Option<RawResult>, SearchError> {
        let index_names = self.indexes.resolve(&options.indexes);
        if index_names.is_empty() {
            if self.strict_indexes {
                return Err(OptionsError::UnknownIndexes {
                    labels: options.indexes.clone(),
                }
                .into());
            }
            warn!(
                labels = ?options.indexes,
                "no index label resolved, returning empty result"
            );
            return Ok(None);
        }

        self.backend
            .set_limits(options.result_offset, options.result_limit, 0, 0);
        if let Some(weights) = &options.field_weights {
            self.backend.set_field_weights(weights);
        }

        let query_text = if options.escape_query {
            self.backend.escape(query)
        } else {
            query.to_string()
        };

        debug!(indexes = %index_names, query = %query_text, "running query");
        let raw = self
            .backend
            .run_query(&query_text, &index_names)
            .map_err(|err| SearchError::execution(&options.indexes, query, err.to_string()))?;

        if raw.status != QueryStatus::Ok {
            return Err(SearchError::execution(
                &options.indexes,
                query,
                self.backend.last_error(),
            ));
        }

        debug!(
            total_found = raw.total_found,
            returned = raw.matches.len(),
            "query succeeded"
        );
        Ok(Some(raw))
    }

    /// The zero value of whichever output shape the options requested.
    fn empty_output<E>(options: &SearchOptions<'_, E>) -> SearchOutput<E> {
        if options.total_only {
            SearchOutput::Total(0)
        } else if options.raw_results {
            SearchOutput::Raw(RawResult::default())
        } else if options.hydrator.is_some() {
            SearchOutput::Entities(Vec::new())
        } else {
            SearchOutput::Hits(Vec::new())
        }
    }
}
