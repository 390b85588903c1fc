//! Turning repository rows into UI listings.

use crate::attributes::AttrValue;
use crate::model::{Listing, ListingRow};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Paging summary for one result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub total: u64,
    pub total_pages: u64,
    pub page: u32,
    pub has_more: bool,
}

pub fn paginate(total: u64, page_size: u32, page: u32) -> PageInfo {
    let size = u64::from(page_size.max(1));
    let total_pages = total.div_ceil(size);
    PageInfo {
        total,
        total_pages,
        page,
        has_more: u64::from(page) < total_pages,
    }
}

/// Decode a row's attribute blob. Malformed blobs yield an empty map.
///
/// Also the attribute view [`crate::query::Clause::AttrEq`] matches against.
pub fn decode_attributes(row: &ListingRow) -> BTreeMap<String, AttrValue> {
    let Some(blob) = row.attributes.as_deref() else {
        return BTreeMap::new();
    };

    let object = match serde_json::from_str::<Value>(blob) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            warn!(id = %row.id, kind = json_kind(&other), "attribute blob is not an object");
            return BTreeMap::new();
        }
        Err(err) => {
            warn!(id = %row.id, error = %err, "attribute blob is not valid JSON");
            return BTreeMap::new();
        }
    };

    let mut attributes = BTreeMap::new();
    for (name, value) in object {
        let typed = match value {
            Value::String(s) => AttrValue::Text(s),
            Value::Bool(b) => AttrValue::Bool(b),
            Value::Number(n) => match n.as_f64() {
                Some(n) => AttrValue::Number(n),
                None => continue,
            },
            other => {
                debug!(id = %row.id, name = %name, kind = json_kind(&other), "skipping attribute");
                continue;
            }
        };
        attributes.insert(name, typed);
    }
    attributes
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn present_row(row: ListingRow) -> Listing {
    let attributes = decode_attributes(&row);
    let path = row.path();
    Listing {
        id: row.id,
        title: row.title,
        price: row.price,
        currency: row.currency,
        location: row.location,
        promoted: row.promoted,
        created_at: row.created_at,
        path,
        attributes,
    }
}

/// Present a batch. One bad row never fails the batch.
pub fn present(rows: Vec<ListingRow>) -> Vec<Listing> {
    rows.into_iter().map(present_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryPath;

    fn row(blob: Option<&str>) -> ListingRow {
        let mut row = ListingRow::new(
            "Mieszkanie 2 pokoje",
            450000.0,
            &CategoryPath::from_segments(["Nieruchomości", "Mieszkania", "Sprzedaż"]),
        );
        row.attributes = blob.map(str::to_string);
        row
    }

    #[test]
    fn test_decodes_typed_values() {
        let listing = present_row(row(Some(
            r#"{"area": 48.5, "rooms": 2, "balcony": true, "market": "Wtórny"}"#,
        )));
        assert_eq!(listing.attributes["area"], AttrValue::Number(48.5));
        assert_eq!(listing.attributes["rooms"], AttrValue::Number(2.0));
        assert_eq!(listing.attributes["balcony"], AttrValue::Bool(true));
        assert_eq!(
            listing.attributes["market"],
            AttrValue::Text("Wtórny".into())
        );
        assert_eq!(listing.path.subsubcategory(), Some("Sprzedaż"));
    }

    #[test]
    fn test_skips_nested_and_null_entries() {
        let attrs = decode_attributes(&row(Some(r#"{"a": null, "b": [1], "c": {}, "d": "x"}"#)));
        assert_eq!(attrs.len(), 1);
        assert!(attrs.contains_key("d"));
    }

    #[test]
    fn test_malformed_blob_degrades_only_that_row() {
        let listings = present(vec![
            row(Some("{broken")),
            row(Some("[1, 2]")),
            row(Some(r#"{"rooms": 3}"#)),
            row(None),
        ]);
        assert_eq!(listings.len(), 4);
        assert!(listings[0].attributes.is_empty());
        assert!(listings[1].attributes.is_empty());
        assert_eq!(listings[2].attributes.len(), 1);
        assert!(listings[3].attributes.is_empty());
    }

    #[test]
    fn test_paginate_reports_has_more() {
        assert_eq!(
            paginate(30, 12, 1),
            PageInfo {
                total: 30,
                total_pages: 3,
                page: 1,
                has_more: true
            }
        );
        assert!(!paginate(30, 12, 3).has_more);
        assert!(!paginate(24, 12, 2).has_more);
    }

    #[test]
    fn test_paginate_empty_result() {
        let info = paginate(0, 12, 1);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_more);
    }
}
