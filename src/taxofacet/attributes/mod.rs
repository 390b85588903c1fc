//! # Attribute Schemas
//!
//! Listings carry dynamic attributes whose shape depends on where the listing
//! sits in the taxonomy: a car has a fuel type and a mileage, a flat has an
//! area and a room count. This module provides:
//!
//! - **Field definitions** ([`AttributeField`]): name, label, required flag and
//!   an explicit [`FieldVariant`] tag (text, number, select, checkbox)
//! - **Typed values** ([`AttrValue`]): what a field holds once coerced
//! - **Resolution** ([`resolve`]): which field list applies to a taxonomy path
//! - **Forms** ([`coerce`], [`validate_form`], [`submission_pairs`]): turning
//!   raw form input into typed values and back into flat submission pairs
//!
//! ## Resolution precedence
//!
//! | Path has a schema at… | Result |
//! |-----------------------|--------|
//! | category / subcategory / subsubcategory | that list, as-is |
//! | category / subcategory | the subcategory list |
//! | anything else | empty |
//!
//! Unknown segments never fail: stored URLs and old listings outlive
//! taxonomy edits, so resolution degrades to the longest known prefix.

mod form;
mod resolve;
mod spec;
mod value;

pub use form::{coerce, submission_pairs, validate_form, FieldError};
pub use resolve::{resolve, resolve_with_source, SchemaSource};
pub use spec::{AttributeField, FieldKind, FieldVariant};
pub use value::AttrValue;

pub(crate) use value::{format_number, parse_number};
