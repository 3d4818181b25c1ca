//! Shared test support: a scripted, recording daemon spy and hydrator
//! fixtures.

// Each test binary compiles this module separately and uses a subset of it.
#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use searchd_client::backend::{
    DocId, MatchMode, MatchRow, RankingMode, RawResult, SearchBackend, Weight,
};
use searchd_client::hydrate::EntityHydrator;

/// Every observable backend interaction, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Escape(String),
    SetMatchMode(MatchMode),
    SetRankingMode(RankingMode),
    SetLimits {
        offset: u32,
        limit: u32,
        max_matches: u32,
        cutoff: u32,
    },
    SetFieldWeights(BTreeMap<String, u32>),
    SetFilter {
        attribute: String,
        values: Vec<i64>,
        exclude: bool,
    },
    ResetFilters,
    ResetGroupBy,
    ResetOverrides,
    RunQuery {
        query: String,
        index_names: String,
    },
    AddQuery {
        query: String,
        index_names: String,
    },
    RunQueries,
}

/// Daemon session double: records every call and plays back scripted
/// responses. `run_query` pops responses in order and falls back to an empty
/// OK result when the script runs out.
#[derive(Default)]
pub struct SpyBackend {
    calls: Mutex<Vec<Call>>,
    responses: VecDeque<RawResult>,
    batch_responses: Vec<RawResult>,
    error_text: String,
    fail_transport: bool,
}

impl SpyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, result: RawResult) -> Self {
        self.responses.push_back(result);
        self
    }

    pub fn with_batch_response(mut self, result: RawResult) -> Self {
        self.batch_responses.push(result);
        self
    }

    pub fn with_error(mut self, text: &str) -> Self {
        self.error_text = text.to_string();
        self
    }

    pub fn with_transport_failure(mut self) -> Self {
        self.fail_transport = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::RunQuery { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl SearchBackend for SpyBackend {
    fn escape(&self, raw: &str) -> String {
        self.record(Call::Escape(raw.to_string()));
        let mut escaped = String::with_capacity(raw.len());
        for c in raw.chars() {
            if "()|-!@~\"&/^$=<".contains(c) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    fn set_match_mode(&mut self, mode: MatchMode) {
        self.record(Call::SetMatchMode(mode));
    }

    fn set_ranking_mode(&mut self, mode: RankingMode) {
        self.record(Call::SetRankingMode(mode));
    }

    fn set_limits(&mut self, offset: u32, limit: u32, max_matches: u32, cutoff: u32) {
        self.record(Call::SetLimits {
            offset,
            limit,
            max_matches,
            cutoff,
        });
    }

    fn set_field_weights(&mut self, weights: &BTreeMap<String, u32>) {
        self.record(Call::SetFieldWeights(weights.clone()));
    }

    fn set_filter(&mut self, attribute: &str, values: &[i64], exclude: bool) {
        self.record(Call::SetFilter {
            attribute: attribute.to_string(),
            values: values.to_vec(),
            exclude,
        });
    }

    fn reset_filters(&mut self) {
        self.record(Call::ResetFilters);
    }

    fn reset_group_by(&mut self) {
        self.record(Call::ResetGroupBy);
    }

    fn reset_overrides(&mut self) {
        self.record(Call::ResetOverrides);
    }

    fn run_query(&mut self, query: &str, index_names: &str) -> anyhow::Result<RawResult> {
        self.record(Call::RunQuery {
            query: query.to_string(),
            index_names: index_names.to_string(),
        });
        if self.fail_transport {
            anyhow::bail!("connection refused");
        }
        Ok(self.responses.pop_front().unwrap_or_default())
    }

    fn add_query(&mut self, query: &str, index_names: &str) {
        self.record(Call::AddQuery {
            query: query.to_string(),
            index_names: index_names.to_string(),
        });
    }

    fn run_queries(&mut self) -> anyhow::Result<Vec<RawResult>> {
        self.record(Call::RunQueries);
        Ok(std::mem::take(&mut self.batch_responses))
    }

    fn last_error(&self) -> String {
        self.error_text.clone()
    }
}

pub fn row(id: DocId, weight: Weight) -> MatchRow {
    MatchRow {
        id,
        weight,
        attrs: BTreeMap::new(),
    }
}

pub fn ok_result(matches: Vec<MatchRow>, fields: &[&str], total_found: u64) -> RawResult {
    RawResult {
        total: matches.len() as u64,
        matches,
        fields: fields.iter().map(ToString::to_string).collect(),
        total_found,
        ..RawResult::default()
    }
}

/// A domain object as an application would define it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: DocId,
    pub name: String,
}

/// Hydrator fixture: serves products from a fixed catalog, in catalog order,
/// and records every bulk lookup it receives.
pub struct ProductCatalog {
    products: Vec<Product>,
    pub hydrate_calls: Mutex<Vec<Vec<DocId>>>,
}

impl ProductCatalog {
    pub fn new(products: &[(DocId, &str)]) -> Self {
        Self {
            products: products
                .iter()
                .map(|(id, name)| Product {
                    id: *id,
                    name: (*name).to_string(),
                })
                .collect(),
            hydrate_calls: Mutex::new(Vec::new()),
        }
    }
}

impl EntityHydrator for ProductCatalog {
    type Entity = Product;

    fn hydrate(&self, ids: &[DocId]) -> anyhow::Result<Vec<Product>> {
        self.hydrate_calls.lock().unwrap().push(ids.to_vec());
        Ok(self
            .products
            .iter()
            .filter(|product| ids.contains(&product.id))
            .cloned()
            .collect())
    }

    fn entity_id(&self, entity: &Product) -> DocId {
        entity.id
    }
}
