//! Entity hydration and result ordering.
//!
//! Raw daemon rows carry ids and weights; most applications want their own
//! domain objects back. An [`EntityHydrator`] is the caller-supplied bulk
//! lookup that turns the matched ids into those objects — one call per
//! search, never one call per id.

use std::collections::HashMap;

use crate::backend::{DocId, MatchRow, Weight};
use crate::client::SearchError;
use crate::fieldmask::{FieldMatchMap, FieldMatches};

/// Bulk id-to-domain-object lookup.
pub trait EntityHydrator {
    type Entity;

    /// Convert matched document ids into domain objects, in any order.
    /// Invoked at most once per search with the full id set.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails; the search call fails with it.
    fn hydrate(&self, ids: &[DocId]) -> anyhow::Result<Vec<Self::Entity>>;

    /// The document id of a returned domain object.
    fn entity_id(&self, entity: &Self::Entity) -> DocId;
}

/// One ranked match.
///
/// `payload` is the raw [`MatchRow`] when no hydrator ran, or the hydrated
/// domain object otherwise. `field_matches` is attached only when the
/// field-match protocol ran; `None` is distinct from "no field matched".
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<P> {
    pub id: DocId,
    pub weight: Weight,
    pub payload: P,
    pub field_matches: Option<FieldMatches>,
}

fn matches_for(field_matches: Option<&FieldMatchMap>, id: DocId) -> Option<FieldMatches> {
    field_matches.and_then(|map| map.get(&id).cloned())
}

/// Build results straight from daemon rows, preserving daemon order (the
/// daemon already returns rows ranked by relevance).
pub(crate) fn rows_to_results(
    rows: Vec<MatchRow>,
    field_matches: Option<&FieldMatchMap>,
) -> Vec<SearchResult<MatchRow>> {
    rows.into_iter()
        .map(|row| SearchResult {
            id: row.id,
            weight: row.weight,
            field_matches: matches_for(field_matches, row.id),
            payload: row,
        })
        .collect()
}

/// Hydrate matched rows into domain objects ordered by descending weight.
///
/// The sort is stable: entities with equal weights keep the order the
/// hydrator returned them in. An entity whose id does not appear in the match
/// set is kept and sorts with weight 0.
pub(crate) fn hydrate_rows<E>(
    rows: &[MatchRow],
    hydrator: &dyn EntityHydrator<Entity = E>,
    field_matches: Option<&FieldMatchMap>,
) -> Result<Vec<SearchResult<E>>, SearchError> {
    let ids: Vec<DocId> = rows.iter().map(|row| row.id).collect();
    let weights: HashMap<DocId, Weight> = rows.iter().map(|row| (row.id, row.weight)).collect();

    let mut entities = hydrator
        .hydrate(&ids)
        .map_err(|source| SearchError::Hydration {
            count: ids.len(),
            source,
        })?;

    let weight_of =
        |entity: &E| -> Weight { weights.get(&hydrator.entity_id(entity)).copied().unwrap_or(0) };
    entities.sort_by(|a, b| weight_of(b).cmp(&weight_of(a)));

    Ok(entities
        .into_iter()
        .map(|entity| {
            let id = hydrator.entity_id(&entity);
            SearchResult {
                id,
                weight: weights.get(&id).copied().unwrap_or(0),
                field_matches: matches_for(field_matches, id),
                payload: entity,
            }
        })
        .collect())
}
