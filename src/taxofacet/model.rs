//! Core data types shared by every layer.
//!
//! - [`CategoryPath`]: a position in the taxonomy. Its fields are private so
//!   the "deeper level implies shallower level" invariant cannot be broken.
//! - [`FilterState`]: one complete set of facet selections (draft or applied).
//! - [`ListingRow`] / [`Listing`]: what the repository returns and what the
//!   presenter hands to the UI.

use crate::attributes::AttrValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Depth of a node in the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyLevel {
    Category,
    Subcategory,
    Subsubcategory,
}

impl TaxonomyLevel {
    /// Zero-based depth (category = 0).
    pub fn depth(self) -> usize {
        match self {
            TaxonomyLevel::Category => 0,
            TaxonomyLevel::Subcategory => 1,
            TaxonomyLevel::Subsubcategory => 2,
        }
    }

    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            0 => Some(TaxonomyLevel::Category),
            1 => Some(TaxonomyLevel::Subcategory),
            2 => Some(TaxonomyLevel::Subsubcategory),
            _ => None,
        }
    }

    pub fn child(self) -> Option<Self> {
        Self::from_depth(self.depth() + 1)
    }
}

impl fmt::Display for TaxonomyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaxonomyLevel::Category => "category",
            TaxonomyLevel::Subcategory => "subcategory",
            TaxonomyLevel::Subsubcategory => "subsubcategory",
        };
        f.write_str(name)
    }
}

/// Plain, unchecked form of a path. Only used to deserialize into
/// [`CategoryPath`], which normalizes it.
#[derive(Debug, Default, Deserialize)]
struct PathParts {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default)]
    subsubcategory: Option<String>,
}

impl From<PathParts> for CategoryPath {
    fn from(parts: PathParts) -> Self {
        CategoryPath::from_parts(parts.category, parts.subcategory, parts.subsubcategory)
    }
}

/// A (possibly partial) position in the three-level taxonomy.
///
/// Every constructor truncates at the first missing or empty level, so a
/// path with a subsubcategory always has a subcategory and a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "PathParts")]
pub struct CategoryPath {
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subsubcategory: Option<String>,
}

impl CategoryPath {
    /// The empty path (no category selected).
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from up to three segments. Extra segments are ignored and
    /// the path stops at the first empty one.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut levels = segments
            .into_iter()
            .map(Into::into)
            .take_while(|s: &String| !s.is_empty())
            .take(3);
        let category = levels.next();
        let subcategory = levels.next();
        let subsubcategory = levels.next();
        Self {
            category,
            subcategory,
            subsubcategory,
        }
    }

    pub fn from_parts(
        category: Option<String>,
        subcategory: Option<String>,
        subsubcategory: Option<String>,
    ) -> Self {
        let segments = [category, subcategory, subsubcategory];
        Self::from_segments(segments.into_iter().map_while(|s| s))
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn subcategory(&self) -> Option<&str> {
        self.subcategory.as_deref()
    }

    pub fn subsubcategory(&self) -> Option<&str> {
        self.subsubcategory.as_deref()
    }

    /// Number of selected levels (0..=3).
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
    }

    /// Selected levels, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        [
            self.category.as_deref(),
            self.subcategory.as_deref(),
            self.subsubcategory.as_deref(),
        ]
        .into_iter()
        .map_while(|s| s)
    }

    /// Keep only the first `depth` levels.
    pub fn truncated(&self, depth: usize) -> Self {
        Self::from_segments(self.segments().take(depth))
    }

    /// Select a category, clearing every deeper level. `None` or an empty
    /// name clears the whole path.
    pub fn with_category(&self, name: Option<String>) -> Self {
        Self::from_parts(name, None, None)
    }

    /// Select a subcategory, clearing the subsubcategory. A no-op when no
    /// category is selected.
    pub fn with_subcategory(&self, name: Option<String>) -> Self {
        if self.category.is_none() {
            return self.clone();
        }
        Self::from_parts(self.category.clone(), name, None)
    }

    /// Select a subsubcategory. A no-op when no subcategory is selected.
    pub fn with_subsubcategory(&self, name: Option<String>) -> Self {
        if self.subcategory.is_none() {
            return self.clone();
        }
        Self::from_parts(self.category.clone(), self.subcategory.clone(), name)
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(all categories)");
        }
        let joined = self.segments().collect::<Vec<_>>().join(" > ");
        f.write_str(&joined)
    }
}

/// Requested result ordering. Unknown names fall back to [`SortKey::Newest`]
/// through [`SortKey::parse_lenient`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    Popular,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::Popular,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::Popular => "popular",
        }
    }

    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown sort key: {}", s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn first_page() -> u32 {
    1
}

/// One complete set of facet selections.
///
/// Both the draft and the applied slot of the controller hold one of these.
/// `min_price > max_price` is representable on purpose: it compiles to a
/// query that matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub path: CategoryPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_text: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default = "first_page")]
    pub page: u32,
    /// Attribute facets, keyed by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            path: CategoryPath::root(),
            city: None,
            min_price: None,
            max_price: None,
            free_text: None,
            sort: SortKey::Newest,
            page: 1,
            attributes: BTreeMap::new(),
        }
    }
}

impl FilterState {
    pub fn with_path(mut self, path: CategoryPath) -> Self {
        self.path = path;
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_price(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_free_text(mut self, text: impl Into<String>) -> Self {
        self.free_text = Some(text.into());
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Pages are 1-based; 0 is clamped to 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// True when both states select the same listings, i.e. they differ at
    /// most in `page`.
    pub fn same_filters(&self, other: &FilterState) -> bool {
        self.path == other.path
            && self.city == other.city
            && self.min_price == other.min_price
            && self.max_price == other.max_price
            && self.free_text == other.free_text
            && self.sort == other.sort
            && self.attributes == other.attributes
    }
}

/// A removable filter, as shown on an "active filters" chip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Category,
    Subcategory,
    Subsubcategory,
    City,
    /// Min and max price, always together.
    Price,
    FreeText,
    Sort,
    Attribute(String),
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(FilterKind::Category),
            "subcategory" => Ok(FilterKind::Subcategory),
            "subsubcategory" => Ok(FilterKind::Subsubcategory),
            "city" => Ok(FilterKind::City),
            "price" => Ok(FilterKind::Price),
            "q" | "text" => Ok(FilterKind::FreeText),
            "sort" | "sortBy" => Ok(FilterKind::Sort),
            other => match other.strip_prefix("attr.") {
                Some(name) if !name.is_empty() => Ok(FilterKind::Attribute(name.to_string())),
                _ => Err(format!("Unknown filter kind: {}", s)),
            },
        }
    }
}

fn default_currency() -> String {
    "PLN".to_string()
}

/// A raw row as returned by a [`crate::store::ListingRepository`].
///
/// `attributes` is the serialized JSON object stored with the listing; it is
/// only decoded by the presenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRow {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub promoted: bool,
    pub created_at: DateTime<Utc>,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub subsubcategory: Option<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub attributes: Option<String>,
}

impl ListingRow {
    /// A minimal row, mostly useful for fixtures.
    pub fn new(title: impl Into<String>, price: f64, path: &CategoryPath) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            price,
            currency: default_currency(),
            location: String::new(),
            promoted: false,
            created_at: Utc::now(),
            category: path.category().unwrap_or_default().to_string(),
            subcategory: path.subcategory().map(str::to_string),
            subsubcategory: path.subsubcategory().map(str::to_string),
            views: 0,
            likes: 0,
            attributes: None,
        }
    }

    pub fn path(&self) -> CategoryPath {
        CategoryPath::from_parts(
            Some(self.category.clone()),
            self.subcategory.clone(),
            self.subsubcategory.clone(),
        )
    }
}

/// A listing as presented to the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub currency: String,
    pub location: String,
    pub promoted: bool,
    pub created_at: DateTime<Utc>,
    pub path: CategoryPath,
    pub attributes: BTreeMap<String, AttrValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_segments_truncates_at_first_empty_level() {
        let path = CategoryPath::from_segments(["A", "", "C"]);
        assert_eq!(path.category(), Some("A"));
        assert_eq!(path.subcategory(), None);
        assert_eq!(path.subsubcategory(), None);
    }

    #[test]
    fn test_from_parts_never_skips_a_level() {
        let path = CategoryPath::from_parts(Some("A".into()), None, Some("C".into()));
        assert_eq!(path.depth(), 1);
        assert_eq!(path.subsubcategory(), None);
    }

    #[test]
    fn test_from_segments_ignores_extra_levels() {
        let path = CategoryPath::from_segments(["A", "B", "C", "D"]);
        assert_eq!(path.depth(), 3);
        assert_eq!(path.subsubcategory(), Some("C"));
    }

    #[test]
    fn test_with_category_clears_deeper_levels() {
        let path = CategoryPath::from_segments(["A", "B", "C"]);
        let changed = path.with_category(Some("X".into()));
        assert_eq!(changed, CategoryPath::from_segments(["X"]));
    }

    #[test]
    fn test_with_subcategory_without_category_is_noop() {
        let path = CategoryPath::root();
        assert_eq!(path.with_subcategory(Some("B".into())), CategoryPath::root());
    }

    #[test]
    fn test_deserializing_normalizes_broken_paths() {
        let path: CategoryPath =
            serde_json::from_str(r#"{"subcategory":"B","subsubcategory":"C"}"#).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_sort_key_parses_lenient() {
        assert_eq!(SortKey::parse_lenient("price_desc"), SortKey::PriceDesc);
        assert_eq!(SortKey::parse_lenient("cheapest"), SortKey::Newest);
        assert_eq!(SortKey::parse_lenient(""), SortKey::Newest);
    }

    #[test]
    fn test_same_filters_ignores_page() {
        let a = FilterState::default().with_city("Kraków");
        let b = a.clone().with_page(4);
        assert!(a.same_filters(&b));
        assert!(!a.same_filters(&FilterState::default()));
    }

    #[test]
    fn test_with_page_clamps_to_one() {
        assert_eq!(FilterState::default().with_page(0).page, 1);
    }

    #[test]
    fn test_filter_kind_parses_attribute_names() {
        assert_eq!(
            "attr.brand".parse::<FilterKind>(),
            Ok(FilterKind::Attribute("brand".into()))
        );
        assert!("attr.".parse::<FilterKind>().is_err());
        assert_eq!("price".parse::<FilterKind>(), Ok(FilterKind::Price));
    }

    #[test]
    fn test_path_display_joins_levels() {
        let path = CategoryPath::from_segments(["Elektronika", "Komputery"]);
        assert_eq!(path.to_string(), "Elektronika > Komputery");
    }
}
