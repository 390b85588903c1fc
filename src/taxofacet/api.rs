//! # API Facade
//!
//! [`SearchApi`] is the single entry point for UI clients. It bundles the
//! taxonomy, the query options and a repository, and delegates to the
//! modules that do the work:
//!
//! - schema lookup → [`crate::attributes`]
//! - URL encoding → [`crate::filter::url`]
//! - query compilation → [`crate::query`]
//! - execution and paging → [`crate::session`]
//!
//! The facade does no I/O of its own and returns data, not strings.
//!
//! ## Generic Over ListingRepository
//!
//! `SearchApi<R: ListingRepository>` works with any backend; the CLI and the
//! tests use [`crate::store::InMemoryRepository`].

use crate::attributes::{
    resolve_with_source, submission_pairs, validate_form, AttrValue, AttributeField, SchemaSource,
};
use crate::config::SearchConfig;
use crate::error::{FacetError, Result};
use crate::filter;
use crate::model::{CategoryPath, FilterState};
use crate::presenter::{paginate, present};
use crate::query::{compile, CompiledQuery, QueryOptions};
use crate::session::{fetch, BrowseSession, ResultSet};
use crate::store::ListingRepository;
use crate::taxonomy::{TaxonomyNode, TaxonomyTree};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct SearchApi<R: ListingRepository> {
    repo: R,
    tree: Arc<TaxonomyTree>,
    options: QueryOptions,
    shuffle_seed: Option<u64>,
}

impl<R: ListingRepository> SearchApi<R> {
    pub fn new(repo: R, tree: Arc<TaxonomyTree>, options: QueryOptions) -> Self {
        Self {
            repo,
            tree,
            options,
            shuffle_seed: None,
        }
    }

    pub fn from_config(repo: R, config: &SearchConfig) -> Result<Self> {
        let api = Self::new(repo, config.taxonomy()?, config.query_options());
        Ok(match config.shuffle_seed {
            Some(seed) => api.with_shuffle_seed(seed),
            None => api,
        })
    }

    /// Seed the tie-break of sessions and one-shot searches, for repeatable
    /// orderings.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    pub fn tree(&self) -> &TaxonomyTree {
        &self.tree
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    /// Options for the next cascading select under `path`.
    pub fn children(&self, path: &CategoryPath) -> &[TaxonomyNode] {
        self.tree.children(path)
    }

    pub fn schema(&self, path: &CategoryPath) -> (&[AttributeField], SchemaSource) {
        resolve_with_source(&self.tree, path)
    }

    pub fn compile(&self, state: &FilterState) -> CompiledQuery {
        compile(state, &self.options)
    }

    pub fn encode_url(&self, state: &FilterState) -> String {
        filter::encode_url(state)
    }

    pub fn decode_url(&self, url: &str) -> Result<FilterState> {
        filter::decode_url(url)
    }

    /// A fresh browsing session over this API's taxonomy and options.
    pub fn session(&self) -> BrowseSession {
        let tree = Arc::clone(&self.tree);
        match self.shuffle_seed {
            Some(seed) => BrowseSession::with_shuffle_seed(tree, self.options, seed),
            None => BrowseSession::new(tree, self.options),
        }
    }

    /// One-shot search: run `state` as applied filters and return the page
    /// it names.
    ///
    /// Each call draws its own tie-break seed unless one is configured, so
    /// paging through a selection belongs in a [`BrowseSession`].
    pub async fn search(&self, state: &FilterState) -> Result<ResultSet> {
        let tie_seed = self.shuffle_seed.unwrap_or_else(rand::random);
        let query = self.compile(state).with_tie_seed(tie_seed);
        let fetched = fetch(&self.repo, &query).await?;
        Ok(ResultSet {
            listings: present(fetched.rows),
            page_info: paginate(fetched.total, query.data.limit, state.page.max(1)),
        })
    }

    /// Validate a listing-creation form for `path` and return the flat
    /// pairs to submit.
    pub fn prepare_submission(
        &self,
        path: &CategoryPath,
        raw: &BTreeMap<String, String>,
    ) -> Result<Vec<(String, String)>> {
        let (fields, _) = self.schema(path);
        let values: BTreeMap<String, AttrValue> =
            validate_form(fields, raw).map_err(FacetError::Validation)?;
        Ok(submission_pairs(fields, &values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::FieldError;
    use crate::model::SortKey;
    use crate::store::memory::fixtures::RepositoryFixture;
    use crate::store::InMemoryRepository;
    use crate::taxonomy::shared_marketplace;

    fn api(repo: InMemoryRepository) -> SearchApi<InMemoryRepository> {
        let options = QueryOptions {
            page_size: 12,
            shuffle_ties: false,
        };
        SearchApi::new(repo, shared_marketplace(), options)
    }

    fn path(segments: &[&str]) -> CategoryPath {
        CategoryPath::from_segments(segments.iter().copied())
    }

    #[tokio::test]
    async fn test_search_returns_requested_page() {
        let api = api(RepositoryFixture::new().with_listings(30, &["Moda"]).build());
        let state = FilterState::default()
            .with_path(path(&["Moda"]))
            .with_sort(SortKey::Newest)
            .with_page(2);

        let results = api.search(&state).await.unwrap();
        assert_eq!(results.listings.len(), 12);
        assert_eq!(results.listings[0].title, "Ogłoszenie 13");
        assert_eq!(results.page_info.page, 2);
        assert!(results.page_info.has_more);
    }

    #[tokio::test]
    async fn test_search_surfaces_repository_errors() {
        let api = api(RepositoryFixture::new().build());
        api.repository().set_unavailable(true);
        let err = api.search(&FilterState::default()).await.unwrap_err();
        assert!(matches!(err, FacetError::Repository(_)));
    }

    #[test]
    fn test_submission_uses_resolved_schema() {
        let api = api(InMemoryRepository::default());
        let raw: BTreeMap<String, String> = [
            ("brand", "Samsung"),
            ("model", "Galaxy S23"),
            ("condition", "Nowy"),
            ("ignored", "x"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let pairs = api
            .prepare_submission(
                &path(&["Elektronika", "Telefony i Akcesoria", "Smartfony"]),
                &raw,
            )
            .unwrap();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["brand", "model", "condition", "dual_sim"]);
        assert_eq!(pairs[3].1, "false");
    }

    #[test]
    fn test_submission_reports_every_invalid_field() {
        let api = api(InMemoryRepository::default());
        let raw = BTreeMap::from([("storage".to_string(), "2 TB".to_string())]);
        let err = api
            .prepare_submission(
                &path(&["Elektronika", "Telefony i Akcesoria", "Smartfony"]),
                &raw,
            )
            .unwrap_err();
        let FacetError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = errors.iter().map(FieldError::field).collect();
        assert_eq!(fields, vec!["brand", "model", "storage", "condition"]);
    }

    #[test]
    fn test_children_lists_next_select_options() {
        let api = api(InMemoryRepository::default());
        let names: Vec<&str> = api
            .children(&path(&["Elektronika"]))
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert!(names.contains(&"Konsole/Gry"));
    }
}
