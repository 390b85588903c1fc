//! # Browse Session
//!
//! [`BrowseSession`] ties the pieces together for one browsing user: it owns
//! a [`FilterStateController`], the accumulated [`ResultSet`] and the last
//! fetch error.
//!
//! A fetch is split into three steps so the caller controls concurrency:
//!
//! 1. [`BrowseSession::apply`] / [`BrowseSession::load_more`] /
//!    [`BrowseSession::load_url`] produce a [`FetchRequest`] tagged with a
//!    generation.
//! 2. [`BrowseSession::execute`] runs it against a repository. It does not
//!    borrow the session, so several requests may be in flight at once.
//! 3. [`BrowseSession::complete`] folds the outcome back in. Only the
//!    latest generation is accepted; anything older is reported as
//!    [`Completion::Stale`] and changes nothing.
//!
//! On failure the previous results stay on screen and the error is kept
//! for display. The applied filters, URL and tie-break seed return to the
//! ones those results were fetched with, while the draft keeps the new
//! selection, so retrying is simply applying again and "load more" can only
//! extend the results already shown.

use crate::config::SearchConfig;
use crate::error::Result;
use crate::filter::{Applied, FilterStateController, Phase};
use crate::model::{FilterKind, Listing, ListingRow};
use crate::presenter::{paginate, present, PageInfo};
use crate::query::{compile, CompiledQuery, QueryOptions};
use crate::store::ListingRepository;
use crate::taxonomy::TaxonomyTree;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// A new selection: results replace what is shown.
    Replace,
    /// The next page of the current selection: results are appended.
    Append,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub generation: u64,
    pub mode: FetchMode,
    pub url: String,
    pub query: CompiledQuery,
}

/// Raw result of executing a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub rows: Vec<ListingRow>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// A newer request superseded this one.
    Stale,
    /// Results were updated; `shown` listings are now displayed.
    Applied { shown: usize },
    /// The fetch failed; previous results are kept.
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub listings: Vec<Listing>,
    pub page_info: PageInfo,
}

/// Run both halves of a compiled query concurrently.
pub async fn fetch<R>(repo: &R, query: &CompiledQuery) -> Result<Fetched>
where
    R: ListingRepository + ?Sized,
{
    let data = &query.data;
    let (rows, total) = tokio::try_join!(
        repo.execute_search(&data.predicate, &data.order, data.limit, data.offset),
        repo.execute_count(&query.count.predicate),
    )?;
    Ok(Fetched { rows, total })
}

pub struct BrowseSession {
    controller: FilterStateController,
    options: QueryOptions,
    results: ResultSet,
    error: Option<String>,
}

impl BrowseSession {
    pub fn new(tree: Arc<TaxonomyTree>, options: QueryOptions) -> Self {
        Self::with_controller(FilterStateController::new(tree), options)
    }

    /// A session whose tie-break seeds come from `seed`, for repeatable
    /// orderings.
    pub fn with_shuffle_seed(tree: Arc<TaxonomyTree>, options: QueryOptions, seed: u64) -> Self {
        Self::with_controller(FilterStateController::with_shuffle_seed(tree, seed), options)
    }

    fn with_controller(controller: FilterStateController, options: QueryOptions) -> Self {
        Self {
            controller,
            options: QueryOptions {
                page_size: options.page_size.max(1),
                ..options
            },
            results: ResultSet::default(),
            error: None,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let tree = config.taxonomy()?;
        let options = config.query_options();
        Ok(match config.shuffle_seed {
            Some(seed) => Self::with_shuffle_seed(tree, options, seed),
            None => Self::new(tree, options),
        })
    }

    pub fn controller(&self) -> &FilterStateController {
        &self.controller
    }

    /// Draft edits go through the controller directly.
    pub fn controller_mut(&mut self) -> &mut FilterStateController {
        &mut self.controller
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Message of the last failed fetch, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn apply(&mut self) -> FetchRequest {
        let ticket = self.controller.apply_draft();
        self.request(ticket, FetchMode::Replace)
    }

    pub fn remove_filter(&mut self, kind: FilterKind) -> FetchRequest {
        let ticket = self.controller.remove_filter(kind);
        self.request(ticket, FetchMode::Replace)
    }

    pub fn load_url(&mut self, url: &str) -> Result<FetchRequest> {
        let ticket = self.controller.load_url(url)?;
        Ok(self.request(ticket, FetchMode::Replace))
    }

    /// Request the next page. `None` unless the session is idle and more
    /// results exist.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        if self.phase() != Phase::Idle || !self.results.page_info.has_more {
            return None;
        }
        let ticket = self.controller.begin_append()?;
        Some(self.request(ticket, FetchMode::Append))
    }

    fn request(&self, ticket: Applied, mode: FetchMode) -> FetchRequest {
        let query =
            compile(self.controller.applied(), &self.options).with_tie_seed(ticket.tie_seed);
        debug!(generation = ticket.generation, ?mode, query = %query.data, "compiled");
        FetchRequest {
            generation: ticket.generation,
            mode,
            url: ticket.url,
            query,
        }
    }

    /// Run the data and count queries of `request` concurrently.
    pub async fn execute<R>(repo: &R, request: &FetchRequest) -> Result<Fetched>
    where
        R: ListingRepository + ?Sized,
    {
        fetch(repo, &request.query).await
    }

    /// Fold a fetch outcome into the session.
    pub fn complete(&mut self, request: &FetchRequest, outcome: Result<Fetched>) -> Completion {
        match outcome {
            Ok(fetched) => {
                if !self.controller.accept(request.generation) {
                    return Completion::Stale;
                }
                let listings = present(fetched.rows);
                let page = self.controller.applied().page;
                self.results.page_info = paginate(fetched.total, self.options.page_size, page);
                match request.mode {
                    FetchMode::Replace => self.results.listings = listings,
                    FetchMode::Append => self.results.listings.extend(listings),
                }
                self.error = None;
                info!(
                    generation = request.generation,
                    total = fetched.total,
                    shown = self.results.listings.len(),
                    "results updated"
                );
                Completion::Applied {
                    shown: self.results.listings.len(),
                }
            }
            Err(err) => {
                if !self.controller.fail(request.generation) {
                    return Completion::Stale;
                }
                let message = err.to_string();
                warn!(generation = request.generation, error = %message, "fetch failed");
                self.error = Some(message.clone());
                Completion::Failed(message)
            }
        }
    }

    /// Apply the draft and fetch in one step.
    pub async fn apply_and_fetch<R>(&mut self, repo: &R) -> Completion
    where
        R: ListingRepository + ?Sized,
    {
        let request = self.apply();
        let outcome = Self::execute(repo, &request).await;
        self.complete(&request, outcome)
    }

    /// Load the next page in one step. `None` when there is nothing to load.
    pub async fn load_more_and_fetch<R>(&mut self, repo: &R) -> Option<Completion>
    where
        R: ListingRepository + ?Sized,
    {
        let request = self.load_more()?;
        let outcome = Self::execute(repo, &request).await;
        Some(self.complete(&request, outcome))
    }
}
