//! Schema resolution.

use super::spec::AttributeField;
use crate::model::CategoryPath;
use crate::taxonomy::TaxonomyTree;
use tracing::debug;

/// Where a resolved schema came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSource {
    Subsubcategory,
    Subcategory,
    /// No schema applies; the field list is empty.
    Fallback,
}

/// Resolve the attribute fields governing `path`.
///
/// See the module docs for the precedence rules. Never fails; unknown
/// segments resolve to the best known prefix, or to an empty list.
pub fn resolve<'t>(tree: &'t TaxonomyTree, path: &CategoryPath) -> &'t [AttributeField] {
    resolve_with_source(tree, path).0
}

/// Like [`resolve`], also reporting which level supplied the schema.
pub fn resolve_with_source<'t>(
    tree: &'t TaxonomyTree,
    path: &CategoryPath,
) -> (&'t [AttributeField], SchemaSource) {
    let (Some(category), Some(subcategory)) = (path.category(), path.subcategory()) else {
        return (&[], SchemaSource::Fallback);
    };

    let Some(sub_node) = tree.find_subcategory(category, subcategory) else {
        debug!(%path, "no such subcategory; using empty schema");
        return (&[], SchemaSource::Fallback);
    };

    if let Some(subsubcategory) = path.subsubcategory() {
        match sub_node.child(subsubcategory) {
            Some(node) => {
                if let Some(schema) = &node.schema {
                    return (schema.as_slice(), SchemaSource::Subsubcategory);
                }
            }
            None => debug!(%path, "no such subsubcategory; falling back to subcategory"),
        }
    }

    match &sub_node.schema {
        Some(schema) => (schema.as_slice(), SchemaSource::Subcategory),
        None => (&[], SchemaSource::Fallback),
    }
}
