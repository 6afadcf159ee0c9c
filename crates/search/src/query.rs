//! Query planning
//!
//! A `SearchQuery` is what the caller asks for. `QueryPlanner::plan`
//! validates it against the schema and turns it into a `SearchPlan`:
//!
//! 1. no query string: the structural scope alone, unranked
//! 2. no `fields`: a ranked search over the index-entry table
//! 3. `fields`: a ranked search over an ad hoc vector of those live fields
//!
//! Plans run against any `Storage`, with offset/limit pushed down.

use crate::keywords::keyword_split;
use crate::weights::BoostWeights;
use ftindex_core::{
    ContentType, Error, FieldDescriptor, ObjectQuery, PrimaryKey, Result, Schema,
};
use ftindex_engine::{transliterate, TextEngine, TextQuery};
use ftindex_storage::{Page, RankedSearch, ResultOrder, Storage, TextSource};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Operators
// ============================================================================

/// How the terms of a query string combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    /// Every term must match
    And,
    /// Any term may match
    #[default]
    Or,
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(Operator::And),
            "or" => Ok(Operator::Or),
            _ => Err(Error::UnsupportedOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::And => f.write_str("and"),
            Operator::Or => f.write_str("or"),
        }
    }
}

/// Fold `queries` with `op`
///
/// # Errors
///
/// `EmptyCombination` if `queries` is empty: the fold has no identity.
pub fn combine(op: Operator, queries: impl IntoIterator<Item = TextQuery>) -> Result<TextQuery> {
    queries
        .into_iter()
        .reduce(|acc, q| match op {
            Operator::And => acc & q,
            Operator::Or => acc | q,
        })
        .ok_or(Error::EmptyCombination)
}

// ============================================================================
// SearchQuery
// ============================================================================

/// A search request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Caller's object scope: model, structural filter, ordering
    pub scope: ObjectQuery,
    /// Free text; `None` means no text filter
    pub query_string: Option<String>,
    /// Search these live fields instead of the index
    pub fields: Option<Vec<String>>,
    /// Term combinator
    pub operator: Operator,
    /// Order by rank (`true`) or by the scope's ordering
    pub order_by_relevance: bool,
}

impl SearchQuery {
    /// Search `scope` for `query_string`
    pub fn new(scope: ObjectQuery, query_string: Option<&str>) -> Self {
        SearchQuery {
            scope,
            query_string: query_string.map(str::to_string),
            fields: None,
            operator: Operator::default(),
            order_by_relevance: true,
        }
    }

    /// Builder: restrict the search to live fields
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Builder: set the term combinator
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    /// Builder: toggle relevance ordering
    pub fn order_by_relevance(mut self, enabled: bool) -> Self {
        self.order_by_relevance = enabled;
        self
    }
}

// ============================================================================
// SearchPlan
// ============================================================================

/// An executable search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPlan {
    /// Structural scope only, in scope order
    Unranked(ObjectQuery),
    /// Text search, ranked or in scope order
    Ranked(RankedSearch),
}

impl SearchPlan {
    /// Model the plan returns objects of
    pub fn model(&self) -> &ContentType {
        match self {
            SearchPlan::Unranked(scope) => &scope.model,
            SearchPlan::Ranked(search) => &search.scope.model,
        }
    }

    /// Primary keys of one page of results
    pub fn execute<S: Storage + ?Sized>(&self, store: &S, page: Page) -> Result<Vec<PrimaryKey>> {
        match self {
            SearchPlan::Unranked(scope) => store.query_objects(scope, page),
            SearchPlan::Ranked(search) => Ok(store
                .search(search, page)?
                .into_iter()
                .map(|hit| hit.pk)
                .collect()),
        }
    }

    /// Number of results, ignoring pagination
    pub fn count<S: Storage + ?Sized>(&self, store: &S) -> Result<usize> {
        match self {
            SearchPlan::Unranked(scope) => store.count_objects(scope),
            SearchPlan::Ranked(search) => store.count_matches(search),
        }
    }
}

// ============================================================================
// QueryPlanner
// ============================================================================

/// Turns search requests into plans
#[derive(Clone)]
pub struct QueryPlanner {
    schema: Arc<Schema>,
    engine: Arc<dyn TextEngine>,
    weights: Arc<BoostWeights>,
    config: String,
}

impl QueryPlanner {
    /// Planner parsing queries under `config`
    pub fn new(
        schema: Arc<Schema>,
        engine: Arc<dyn TextEngine>,
        weights: Arc<BoostWeights>,
        config: impl Into<String>,
    ) -> Self {
        QueryPlanner {
            schema,
            engine,
            weights,
            config: config.into(),
        }
    }

    /// Linguistic configuration queries are parsed under
    pub fn config(&self) -> &str {
        &self.config
    }

    /// Validate `query` and build its plan
    ///
    /// # Errors
    ///
    /// - `UnknownModel` for an unregistered scope model
    /// - `FilterField` if the filter or ordering names an undeclared field
    /// - `SearchField` if `fields` names anything but a search field
    pub fn plan(&self, query: &SearchQuery) -> Result<SearchPlan> {
        let model = self.schema.get(&query.scope.model)?;
        for field in query.scope.referenced_fields() {
            if !model.is_filterable(field) {
                return Err(Error::FilterField {
                    field: field.to_string(),
                    model: model.content_type.clone(),
                });
            }
        }

        let source = match &query.fields {
            None => TextSource::Index,
            Some(fields) => {
                let mut weighted = Vec::with_capacity(fields.len());
                for name in fields {
                    let boost = match model.search_field(name) {
                        Some(FieldDescriptor::Search { boost, .. }) => *boost,
                        _ => {
                            return Err(Error::SearchField {
                                field: name.clone(),
                                model: model.content_type.clone(),
                            })
                        }
                    };
                    weighted.push((name.clone(), self.weights.weight_for_boost(boost)));
                }
                TextSource::Fields(weighted)
            }
        };

        let query_string = match &query.query_string {
            Some(qs) => qs,
            None => return Ok(SearchPlan::Unranked(query.scope.clone())),
        };
        let terms = keyword_split(&transliterate(query_string));
        if terms.is_empty() {
            debug!(target: "ftindex::query", model = %model.content_type, "No search terms, filtering only");
            return Ok(SearchPlan::Unranked(query.scope.clone()));
        }

        let parsed = terms
            .iter()
            .map(|term| self.engine.parse_query(&self.config, term))
            .collect::<Result<Vec<_>>>()?;
        let text_query = combine(query.operator, parsed)?;

        debug!(
            target: "ftindex::query",
            model = %model.content_type,
            terms = terms.len(),
            operator = %query.operator,
            in_fields = query.fields.is_some(),
            query = %text_query,
            "Planned ranked search"
        );
        Ok(SearchPlan::Ranked(RankedSearch {
            scope: query.scope.clone(),
            config: self.config.clone(),
            query: text_query,
            source,
            weights: self.weights.values(),
            order: if query.order_by_relevance {
                ResultOrder::Relevance
            } else {
                ResultOrder::Scope
            },
        }))
    }
}

impl fmt::Debug for QueryPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryPlanner")
            .field("config", &self.config)
            .field("weights", &self.weights)
            .finish()
    }
}
