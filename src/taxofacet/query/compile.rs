use super::order::{order_for, reseed, OrderTerm};
use super::predicate::{Clause, Field, Predicate};
use super::DEFAULT_PAGE_SIZE;
use crate::model::FilterState;
use serde::Serialize;
use std::fmt;

/// Knobs the compiler takes from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub page_size: u32,
    pub shuffle_ties: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            shuffle_ties: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQuery {
    pub predicate: Predicate,
    pub order: Vec<OrderTerm>,
    pub limit: u32,
    pub offset: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountQuery {
    pub predicate: Predicate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub data: DataQuery,
    pub count: CountQuery,
}

impl CompiledQuery {
    /// Fix the seed of the random tie-break. Every page of one selection
    /// must use the same seed.
    pub fn with_tie_seed(mut self, tie_seed: u64) -> Self {
        reseed(&mut self.data.order, tie_seed);
        self
    }
}

impl fmt::Display for DataQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order: Vec<String> = self.order.iter().map(|t| t.to_string()).collect();
        write!(
            f,
            "SELECT * FROM listings WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
            self.predicate,
            order.join(", "),
            self.limit,
            self.offset
        )
    }
}

impl fmt::Display for CountQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT COUNT(*) FROM listings WHERE {}", self.predicate)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// The filtering half of a query, shared by data and count.
pub fn predicate_for(state: &FilterState) -> Predicate {
    let mut clauses = Vec::new();

    let levels = [Field::Category, Field::Subcategory, Field::Subsubcategory];
    for (field, name) in levels.into_iter().zip(state.path.segments()) {
        clauses.push(Clause::Eq {
            field,
            value: name.to_string(),
        });
    }

    if let Some(city) = non_blank(&state.city) {
        clauses.push(Clause::Contains {
            field: Field::Location,
            needle: city.to_string(),
        });
    }

    if let Some(min) = state.min_price {
        clauses.push(Clause::Gte {
            field: Field::Price,
            value: min,
        });
    }
    if let Some(max) = state.max_price {
        clauses.push(Clause::Lte {
            field: Field::Price,
            value: max,
        });
    }

    if let Some(text) = non_blank(&state.free_text) {
        clauses.push(Clause::AnyContains {
            fields: vec![Field::Title, Field::Description],
            needle: text.to_string(),
        });
    }

    for (name, value) in &state.attributes {
        if value.trim().is_empty() {
            continue;
        }
        clauses.push(Clause::AttrEq {
            name: name.clone(),
            value: value.clone(),
        });
    }

    Predicate::new(clauses)
}

/// Compile an applied filter state into data and count queries.
pub fn compile(state: &FilterState, options: &QueryOptions) -> CompiledQuery {
    let predicate = predicate_for(state);
    let page_size = options.page_size.max(1);
    let page = state.page.max(1);

    CompiledQuery {
        data: DataQuery {
            predicate: predicate.clone(),
            order: order_for(state.sort, options.shuffle_ties),
            limit: page_size,
            offset: u64::from(page - 1) * u64::from(page_size),
        },
        count: CountQuery { predicate },
    }
}
