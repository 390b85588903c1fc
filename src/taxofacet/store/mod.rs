//! # Listing Repository
//!
//! Search execution is abstracted behind [`ListingRepository`]. The query
//! compiler produces backend-neutral [`Predicate`]s and [`OrderTerm`]s; a
//! repository turns them into whatever its backend speaks (SQL, a search
//! index, or a plain scan).
//!
//! ## Implementations
//!
//! - [`memory::InMemoryRepository`]: evaluates queries over a vector of
//!   rows. Used by the CLI (with rows from a JSON file or the bundled
//!   [`sample`] set) and by tests.
//!
//! ## Contract
//!
//! - `execute_search` returns at most `limit` rows, skipping `offset`,
//!   ordered by `order`.
//! - `execute_count` counts every row `predicate` matches, ignoring paging.
//! - Timeouts and transport failures are reported as
//!   [`FacetError::Repository`](crate::error::FacetError::Repository); the
//!   caller keeps its previous results.

use crate::error::Result;
use crate::model::ListingRow;
use crate::query::{OrderTerm, Predicate};
use async_trait::async_trait;

pub mod memory;
pub mod sample;

pub use memory::InMemoryRepository;

#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Fetch one page of matching rows.
    async fn execute_search(
        &self,
        predicate: &Predicate,
        order: &[OrderTerm],
        limit: u32,
        offset: u64,
    ) -> Result<Vec<ListingRow>>;

    /// Count all matching rows.
    async fn execute_count(&self, predicate: &Predicate) -> Result<u64>;
}
