//! # Taxonomy
//!
//! The category tree that drives navigation, attribute schemas and query
//! predicates. It has exactly three levels:
//!
//! ```text
//! category            Elektronika
//! └── subcategory     Telefony i Akcesoria      (schema: brand, condition)
//!     └── subsub…     Smartfony                 (schema: brand, model, storage, …)
//! ```
//!
//! Only subcategory and subsubcategory nodes carry a schema; see
//! [`crate::attributes::resolve`] for how a path picks one.
//!
//! A [`TaxonomyTree`] is built once at process start and never mutated: the
//! built-in marketplace tree lives in [`catalog`], and
//! [`TaxonomyTree::load`] reads an alternative tree from a JSON file. Both are
//! validated by the same rules (see [`TaxonomyTree::new`]).

pub mod catalog;

use crate::attributes::{AttributeField, FieldVariant};
use crate::error::{FacetError, Result};
use crate::model::{CategoryPath, TaxonomyLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub use catalog::{marketplace, shared_marketplace};

/// A node of the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonomyNode {
    pub name: String,
    pub level: TaxonomyLevel,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaxonomyNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Vec<AttributeField>>,
}

impl TaxonomyNode {
    fn new(name: &str, level: TaxonomyLevel, children: Vec<TaxonomyNode>) -> Self {
        Self {
            name: name.to_string(),
            level,
            children,
            schema: None,
        }
    }

    pub fn category(name: &str, children: Vec<TaxonomyNode>) -> Self {
        Self::new(name, TaxonomyLevel::Category, children)
    }

    pub fn subcategory(name: &str, children: Vec<TaxonomyNode>) -> Self {
        Self::new(name, TaxonomyLevel::Subcategory, children)
    }

    pub fn subsubcategory(name: &str) -> Self {
        Self::new(name, TaxonomyLevel::Subsubcategory, Vec::new())
    }

    /// Attach an attribute schema to this node.
    pub fn with_schema(mut self, fields: Vec<AttributeField>) -> Self {
        self.schema = Some(fields);
        self
    }

    pub fn child(&self, name: &str) -> Option<&TaxonomyNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// On-disk form of a node. Levels are implied by depth.
#[derive(Debug, Deserialize)]
struct RawNode {
    name: String,
    #[serde(default)]
    children: Vec<RawNode>,
    #[serde(default)]
    schema: Option<Vec<AttributeField>>,
}

impl RawNode {
    fn into_node(self, depth: usize) -> Result<TaxonomyNode> {
        let level = TaxonomyLevel::from_depth(depth).ok_or_else(|| {
            FacetError::Taxonomy(format!(
                "'{}' is nested deeper than three levels",
                self.name
            ))
        })?;
        let children = self
            .children
            .into_iter()
            .map(|c| c.into_node(depth + 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(TaxonomyNode {
            name: self.name,
            level,
            children,
            schema: self.schema,
        })
    }
}

/// The immutable category tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TaxonomyTree {
    roots: Vec<TaxonomyNode>,
}

impl TaxonomyTree {
    /// Build a tree, validating that:
    /// - names are non-blank and unique among siblings
    /// - each node's level matches its depth (at most three levels)
    /// - category nodes carry no schema
    /// - schema field names are unique and select options non-empty and unique
    pub fn new(roots: Vec<TaxonomyNode>) -> Result<Self> {
        validate_siblings(&roots, 0, "")?;
        Ok(Self { roots })
    }

    /// Skip validation. Only for trees whose validity is covered by tests.
    pub(crate) fn new_unchecked(roots: Vec<TaxonomyNode>) -> Self {
        Self { roots }
    }

    /// Parse a tree from JSON: an array of `{name, children?, schema?}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawNode> = serde_json::from_str(json)?;
        let roots = raw
            .into_iter()
            .map(|r| r.into_node(0))
            .collect::<Result<Vec<_>>>()?;
        Self::new(roots)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn categories(&self) -> &[TaxonomyNode] {
        &self.roots
    }

    pub fn find_category(&self, category: &str) -> Option<&TaxonomyNode> {
        self.roots.iter().find(|n| n.name == category)
    }

    pub fn find_subcategory(&self, category: &str, subcategory: &str) -> Option<&TaxonomyNode> {
        self.find_category(category)?.child(subcategory)
    }

    pub fn find_subsubcategory(
        &self,
        category: &str,
        subcategory: &str,
        subsubcategory: &str,
    ) -> Option<&TaxonomyNode> {
        self.find_subcategory(category, subcategory)?
            .child(subsubcategory)
    }

    /// The deepest node of `path`, if every level of it exists.
    pub fn node(&self, path: &CategoryPath) -> Option<&TaxonomyNode> {
        let mut segments = path.segments();
        let mut node = self.find_category(segments.next()?)?;
        for segment in segments {
            node = node.child(segment)?;
        }
        Some(node)
    }

    pub fn contains(&self, path: &CategoryPath) -> bool {
        path.is_empty() || self.node(path).is_some()
    }

    /// Longest prefix of `path` that exists in the tree.
    pub fn normalize(&self, path: &CategoryPath) -> CategoryPath {
        (0..=path.depth())
            .rev()
            .map(|depth| path.truncated(depth))
            .find(|prefix| self.contains(prefix))
            .unwrap_or_default()
    }

    /// Options for the next cascading select below `path`: the categories
    /// for the empty path, the node's children for a known path, nothing for
    /// an unknown one.
    pub fn children(&self, path: &CategoryPath) -> &[TaxonomyNode] {
        if path.is_empty() {
            return &self.roots;
        }
        self.node(path).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Every node with its path, depth-first in declaration order.
    pub fn walk(&self) -> Vec<(CategoryPath, &TaxonomyNode)> {
        fn visit<'t>(
            node: &'t TaxonomyNode,
            prefix: &[&str],
            out: &mut Vec<(CategoryPath, &'t TaxonomyNode)>,
        ) {
            let mut segments = prefix.to_vec();
            segments.push(&node.name);
            out.push((CategoryPath::from_segments(segments.iter().copied()), node));
            for child in &node.children {
                visit(child, &segments, out);
            }
        }

        let mut out = Vec::new();
        for root in &self.roots {
            visit(root, &[], &mut out);
        }
        out
    }
}

fn validate_siblings(nodes: &[TaxonomyNode], depth: usize, parent: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for node in nodes {
        let location = if parent.is_empty() {
            node.name.clone()
        } else {
            format!("{} > {}", parent, node.name)
        };

        if node.name.trim().is_empty() {
            return Err(FacetError::Taxonomy(format!(
                "blank node name under '{}'",
                parent
            )));
        }
        if !seen.insert(node.name.as_str()) {
            return Err(FacetError::Taxonomy(format!(
                "duplicate node '{}'",
                location
            )));
        }
        if node.level.depth() != depth {
            return Err(FacetError::Taxonomy(format!(
                "'{}' is declared as {} but sits at depth {}",
                location,
                node.level,
                depth + 1
            )));
        }
        if node.level == TaxonomyLevel::Category && node.schema.is_some() {
            return Err(FacetError::Taxonomy(format!(
                "category '{}' cannot carry an attribute schema",
                location
            )));
        }
        if let Some(schema) = &node.schema {
            validate_schema(schema, &location)?;
        }
        if !node.children.is_empty() && node.level.child().is_none() {
            return Err(FacetError::Taxonomy(format!(
                "'{}' is nested deeper than three levels",
                location
            )));
        }
        validate_siblings(&node.children, depth + 1, &location)?;
    }
    Ok(())
}

fn validate_schema(fields: &[AttributeField], location: &str) -> Result<()> {
    let mut names = HashSet::new();
    for field in fields {
        if field.name.trim().is_empty() {
            return Err(FacetError::Taxonomy(format!(
                "blank field name in schema of '{}'",
                location
            )));
        }
        if !names.insert(field.name.as_str()) {
            return Err(FacetError::Taxonomy(format!(
                "duplicate field '{}' in schema of '{}'",
                field.name, location
            )));
        }
        if let FieldVariant::Select { options } = &field.variant {
            let unique: HashSet<_> = options.iter().collect();
            if options.is_empty() || unique.len() != options.len() {
                return Err(FacetError::Taxonomy(format!(
                    "select field '{}' in '{}' needs unique, non-empty options",
                    field.name, location
                )));
            }
        }
    }
    Ok(())
}
