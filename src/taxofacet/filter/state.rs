//! The filter reducer.
//!
//! All cascade rules live here, in one pure function. The controller never
//! edits a [`FilterState`] field by hand; it builds a [`FilterAction`] and
//! runs it through [`reduce`].

use crate::model::{FilterKind, FilterState, SortKey};

/// One user edit to a filter state.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    SetCategory(Option<String>),
    SetSubcategory(Option<String>),
    SetSubsubcategory(Option<String>),
    SetCity(Option<String>),
    SetPriceRange {
        min: Option<f64>,
        max: Option<f64>,
    },
    SetMinPrice(Option<f64>),
    SetMaxPrice(Option<f64>),
    SetFreeText(Option<String>),
    SetSort(SortKey),
    SetAttribute {
        name: String,
        value: Option<String>,
    },
    Remove(FilterKind),
    Reset,
}

/// Blank strings count as "not set".
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Apply `action` to `state`, returning the new state.
///
/// Taxonomy changes clear the deeper levels and every attribute facet, since
/// attributes belong to the schema of the old path. Every action returns to
/// page 1.
pub fn reduce(state: &FilterState, action: FilterAction) -> FilterState {
    let mut next = state.clone();
    match action {
        FilterAction::SetCategory(name) => {
            next.path = next.path.with_category(present(name));
            next.attributes.clear();
        }
        FilterAction::SetSubcategory(name) => {
            if next.path.category().is_some() {
                next.path = next.path.with_subcategory(present(name));
                next.attributes.clear();
            }
        }
        FilterAction::SetSubsubcategory(name) => {
            if next.path.subcategory().is_some() {
                next.path = next.path.with_subsubcategory(present(name));
                next.attributes.clear();
            }
        }
        FilterAction::SetCity(city) => next.city = present(city),
        FilterAction::SetPriceRange { min, max } => {
            next.min_price = min;
            next.max_price = max;
        }
        FilterAction::SetMinPrice(min) => next.min_price = min,
        FilterAction::SetMaxPrice(max) => next.max_price = max,
        FilterAction::SetFreeText(text) => next.free_text = present(text),
        FilterAction::SetSort(sort) => next.sort = sort,
        FilterAction::SetAttribute { name, value } => match present(value) {
            Some(value) => {
                next.attributes.insert(name, value);
            }
            None => {
                next.attributes.remove(&name);
            }
        },
        FilterAction::Remove(kind) => return reduce(state, removal(kind)),
        FilterAction::Reset => next = FilterState::default(),
    }
    next.page = 1;
    next
}

fn removal(kind: FilterKind) -> FilterAction {
    match kind {
        FilterKind::Category => FilterAction::SetCategory(None),
        FilterKind::Subcategory => FilterAction::SetSubcategory(None),
        FilterKind::Subsubcategory => FilterAction::SetSubsubcategory(None),
        FilterKind::City => FilterAction::SetCity(None),
        FilterKind::Price => FilterAction::SetPriceRange {
            min: None,
            max: None,
        },
        FilterKind::FreeText => FilterAction::SetFreeText(None),
        FilterKind::Sort => FilterAction::SetSort(SortKey::Newest),
        FilterKind::Attribute(name) => FilterAction::SetAttribute { name, value: None },
    }
}
