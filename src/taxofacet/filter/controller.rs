//! Draft/applied filter state and request generations.
//!
//! The controller holds two [`FilterState`] slots. Edits go to the *draft*;
//! [`FilterStateController::apply_draft`] commits it to *applied*, bumps the
//! generation counter and hands back an [`Applied`] ticket. A response may
//! only be accepted for the latest ticket, so a slow fetch from an older
//! selection can never overwrite a newer one.
//!
//! The controller also remembers the *committed* state: the applied state
//! of the last successful fetch, which is what the displayed results
//! belong to. A failed fetch restores it, so appending pages never mixes
//! two selections. Each new selection also draws a fresh tie-break seed;
//! appended pages reuse it, so every page is cut from the same ordering.
//!
//! ```text
//! Idle --edit--> Editing --apply--> Applying --accept/fail--> Idle
//!  ^                                   |
//!  +---------------apply---------------+   (supersedes)
//! ```

use super::state::{reduce, FilterAction};
use super::url::{decode_url, encode_url};
use crate::attributes::{coerce, resolve, FieldError};
use crate::error::Result;
use crate::model::{FilterKind, FilterState, SortKey};
use crate::taxonomy::TaxonomyTree;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Draft matches applied and nothing is in flight.
    Idle,
    /// Draft has edits that have not been applied.
    Editing,
    /// A fetch for the latest generation is outstanding.
    Applying,
}

/// Ticket for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub generation: u64,
    pub url: String,
    /// Seed of the random tie-break; shared by every page of a selection.
    pub tie_seed: u64,
}

/// Applied state, URL and seed of the last successful fetch.
#[derive(Debug, Clone)]
struct Committed {
    state: FilterState,
    url: String,
    tie_seed: u64,
}

pub struct FilterStateController {
    tree: Arc<TaxonomyTree>,
    draft: FilterState,
    applied: FilterState,
    committed: Committed,
    generation: u64,
    in_flight: Option<u64>,
    url: String,
    tie_seed: u64,
    rng: StdRng,
}

impl FilterStateController {
    pub fn new(tree: Arc<TaxonomyTree>) -> Self {
        Self::with_rng(tree, StdRng::from_entropy())
    }

    /// Like [`FilterStateController::new`], with tie-break seeds drawn from a
    /// fixed seed so result orderings are repeatable.
    pub fn with_shuffle_seed(tree: Arc<TaxonomyTree>, seed: u64) -> Self {
        Self::with_rng(tree, StdRng::seed_from_u64(seed))
    }

    fn with_rng(tree: Arc<TaxonomyTree>, mut rng: StdRng) -> Self {
        let initial = FilterState::default();
        let url = encode_url(&initial);
        let tie_seed = rng.gen();
        Self {
            tree,
            draft: initial.clone(),
            applied: initial.clone(),
            committed: Committed {
                state: initial,
                url: url.clone(),
                tie_seed,
            },
            generation: 0,
            in_flight: None,
            url,
            tie_seed,
            rng,
        }
    }

    pub fn tree(&self) -> &TaxonomyTree {
        &self.tree
    }

    pub fn draft(&self) -> &FilterState {
        &self.draft
    }

    pub fn applied(&self) -> &FilterState {
        &self.applied
    }

    /// Latest issued generation; 0 before the first apply.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Canonical URL of the applied state.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Tie-break seed of the applied selection.
    pub fn tie_seed(&self) -> u64 {
        self.tie_seed
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Applying
        } else if !self.draft.same_filters(&self.applied) {
            Phase::Editing
        } else {
            Phase::Idle
        }
    }

    /// Run an arbitrary action against the draft.
    pub fn dispatch(&mut self, action: FilterAction) {
        self.draft = reduce(&self.draft, action);
    }

    pub fn set_draft_category(&mut self, name: Option<&str>) {
        self.dispatch(FilterAction::SetCategory(name.map(str::to_string)));
    }

    pub fn set_draft_subcategory(&mut self, name: Option<&str>) {
        self.dispatch(FilterAction::SetSubcategory(name.map(str::to_string)));
    }

    pub fn set_draft_subsubcategory(&mut self, name: Option<&str>) {
        self.dispatch(FilterAction::SetSubsubcategory(name.map(str::to_string)));
    }

    pub fn set_draft_city(&mut self, city: Option<&str>) {
        self.dispatch(FilterAction::SetCity(city.map(str::to_string)));
    }

    pub fn set_draft_price(&mut self, min: Option<f64>, max: Option<f64>) {
        self.dispatch(FilterAction::SetPriceRange { min, max });
    }

    pub fn set_draft_free_text(&mut self, text: Option<&str>) {
        self.dispatch(FilterAction::SetFreeText(text.map(str::to_string)));
    }

    pub fn set_draft_sort(&mut self, sort: SortKey) {
        self.dispatch(FilterAction::SetSort(sort));
    }

    /// Set or clear an attribute facet on the draft.
    ///
    /// The value is checked against the schema the draft path resolves to
    /// and stored in canonical form. Returns `Ok(false)` when the schema has
    /// no such field; the draft is left unchanged.
    pub fn set_draft_attribute(
        &mut self,
        name: &str,
        value: Option<&str>,
    ) -> std::result::Result<bool, FieldError> {
        let schema = resolve(&self.tree, &self.draft.path);
        let Some(field) = schema.iter().find(|f| f.name == name) else {
            debug!(name, path = %self.draft.path, "ignoring attribute outside the schema");
            return Ok(false);
        };

        let coerced = match value {
            Some(raw) => coerce(field, raw)?,
            None => None,
        };
        let action = FilterAction::SetAttribute {
            name: name.to_string(),
            value: coerced.map(|v| v.to_param()),
        };
        self.dispatch(action);
        Ok(true)
    }

    /// Commit the draft and start a new generation.
    pub fn apply_draft(&mut self) -> Applied {
        self.draft.page = 1;
        self.applied = self.draft.clone();
        self.issue(false)
    }

    /// Remove a filter from both slots and re-apply, as an "active filter"
    /// chip does. Pending draft edits to other facets stay pending.
    pub fn remove_filter(&mut self, kind: FilterKind) -> Applied {
        self.draft = reduce(&self.draft, FilterAction::Remove(kind.clone()));
        self.applied = reduce(&self.applied, FilterAction::Remove(kind));
        self.issue(false)
    }

    /// Replace both slots with the state a URL describes and apply it.
    pub fn load_url(&mut self, url: &str) -> Result<Applied> {
        let state = decode_url(url)?;
        let known = self.tree.normalize(&state.path);
        if known != state.path {
            debug!(path = %state.path, known = %known, "URL path is not fully in the taxonomy");
        }
        self.draft = state;
        Ok(self.apply_draft())
    }

    /// Advance the applied page for an append fetch. `None` while another
    /// fetch is in flight.
    pub fn begin_append(&mut self) -> Option<Applied> {
        if self.in_flight.is_some() {
            return None;
        }
        self.applied.page += 1;
        Some(self.issue(true))
    }

    /// Settle a successful fetch, committing the applied state. Returns
    /// `false`, changing nothing, unless `generation` is the one in flight.
    pub fn accept(&mut self, generation: u64) -> bool {
        if !self.settle(generation) {
            return false;
        }
        self.committed = Committed {
            state: self.applied.clone(),
            url: self.url.clone(),
            tie_seed: self.tie_seed,
        };
        self.in_flight = None;
        true
    }

    /// Settle a failed fetch. The applied state, URL and seed go back to the
    /// last committed ones; the draft keeps the user's edits, so a failed
    /// new selection leaves the controller `Editing` and a failed append
    /// simply loses its page. Returns `false` for stale generations.
    pub fn fail(&mut self, generation: u64) -> bool {
        if !self.settle(generation) {
            return false;
        }
        self.applied = self.committed.state.clone();
        self.url = self.committed.url.clone();
        self.tie_seed = self.committed.tie_seed;
        self.in_flight = None;
        debug!(generation, url = %self.url, "fetch failed; restored committed state");
        true
    }

    fn settle(&self, generation: u64) -> bool {
        match self.in_flight {
            Some(flight) if flight == generation => true,
            _ => {
                debug!(
                    generation,
                    latest = self.generation,
                    "discarding stale response"
                );
                false
            }
        }
    }

    fn issue(&mut self, append: bool) -> Applied {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        if !append {
            self.tie_seed = self.rng.gen();
        }
        self.url = encode_url(&self.applied);
        debug!(generation = self.generation, url = %self.url, append, "issuing fetch");
        Applied {
            generation: self.generation,
            url: self.url.clone(),
            tie_seed: self.tie_seed,
        }
    }
}
