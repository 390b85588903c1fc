//! Query compilation.
//!
//! [`compile`] turns an applied [`FilterState`](crate::model::FilterState)
//! into a backend-neutral [`CompiledQuery`]: a data query (predicate, order,
//! limit, offset) and a count query. Both halves share one predicate, so the
//! total can never disagree with the rows it counts.

mod compile;
pub mod order;
pub mod predicate;

pub use compile::{compile, predicate_for, CompiledQuery, CountQuery, DataQuery, QueryOptions};
pub use order::{order_for, reseed, sort_rows, tie_key, Direction, OrderTerm, SortField};
pub use predicate::{Clause, Field, Predicate};

/// Listings per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 12;
