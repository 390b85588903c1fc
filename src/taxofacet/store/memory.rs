use super::ListingRepository;
use crate::error::{FacetError, Result};
use crate::model::ListingRow;
use crate::query::{sort_rows, OrderTerm, Predicate};
use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Repository over an in-memory vector of rows.
///
/// Ordering is a pure function of the query: the random tie-break is
/// seeded by the [`OrderTerm::Random`] term itself.
pub struct InMemoryRepository {
    rows: Vec<ListingRow>,
    unavailable: AtomicBool,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemoryRepository {
    pub fn new(rows: Vec<ListingRow>) -> Self {
        Self {
            rows,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Parse rows from a JSON array.
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<ListingRow> = serde_json::from_str(json)?;
        Ok(Self::new(rows))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn rows(&self) -> &[ListingRow] {
        &self.rows
    }

    /// Make every subsequent call fail (or succeed again), standing in for
    /// a backend outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(FacetError::Repository("listing backend unavailable".into()));
        }
        Ok(())
    }

    fn matching(&self, predicate: &Predicate) -> Vec<ListingRow> {
        self.rows
            .iter()
            .filter(|row| predicate.matches(row))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ListingRepository for InMemoryRepository {
    async fn execute_search(
        &self,
        predicate: &Predicate,
        order: &[OrderTerm],
        limit: u32,
        offset: u64,
    ) -> Result<Vec<ListingRow>> {
        self.check_available()?;
        let mut rows = self.matching(predicate);
        sort_rows(&mut rows, order);
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let page: Vec<ListingRow> = rows
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect();
        debug!(%predicate, offset, returned = page.len(), "executed search");
        Ok(page)
    }

    async fn execute_count(&self, predicate: &Predicate) -> Result<u64> {
        self.check_available()?;
        let count = self.rows.iter().filter(|row| predicate.matches(row)).count();
        Ok(count as u64)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::CategoryPath;
    use chrono::{Duration, Utc};

    #[derive(Default)]
    pub struct RepositoryFixture {
        rows: Vec<ListingRow>,
    }

    impl RepositoryFixture {
        pub fn new() -> Self {
            Self::default()
        }

        /// `count` plain listings under `path`, newest first by index.
        pub fn with_listings(mut self, count: usize, path: &[&str]) -> Self {
            let path = CategoryPath::from_segments(path.iter().copied());
            for i in 0..count {
                let title = format!("Ogłoszenie {}", i + 1);
                let mut row = ListingRow::new(title, 100.0 * (i + 1) as f64, &path);
                row.created_at = Utc::now() - Duration::hours(i as i64);
                self.rows.push(row);
            }
            self
        }

        pub fn with_row(mut self, row: ListingRow) -> Self {
            self.rows.push(row);
            self
        }

        pub fn with_promoted(mut self, title: &str, path: &[&str]) -> Self {
            let path = CategoryPath::from_segments(path.iter().copied());
            let mut row = ListingRow::new(title, 1.0, &path);
            row.promoted = true;
            self.rows.push(row);
            self
        }

        pub fn build(self) -> InMemoryRepository {
            InMemoryRepository::new(self.rows)
        }
    }
}
