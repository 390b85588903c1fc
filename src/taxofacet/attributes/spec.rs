//! Attribute field definitions.
//!
//! A field describes one input of the listing-creation form and one
//! filterable attribute of the listings in its taxonomy node.

use serde::{Deserialize, Serialize};

/// Discriminant of a [`FieldVariant`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text (e.g. `model`)
    Text,
    /// Numeric value (e.g. `year`, `mileage`)
    Number,
    /// One value out of a closed set (e.g. `fuel_type`)
    Select,
    /// Yes/no flag (e.g. `damaged`)
    Checkbox,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Select => "select",
            FieldKind::Checkbox => "checkbox",
        }
    }
}

/// The type of input a field accepts.
///
/// Select options keep their declaration order; uniqueness is checked when
/// the taxonomy is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldVariant {
    Text,
    Number,
    Select { options: Vec<String> },
    Checkbox,
}

impl FieldVariant {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldVariant::Text => FieldKind::Text,
            FieldVariant::Number => FieldKind::Number,
            FieldVariant::Select { .. } => FieldKind::Select,
            FieldVariant::Checkbox => FieldKind::Checkbox,
        }
    }
}

/// One attribute of a taxonomy node's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeField {
    /// Key used in attribute blobs, form submissions and `attr.<name>` facets
    pub name: String,

    /// Human-readable label shown next to the input
    pub label: String,

    /// Whether the creation form must reject a listing without this value
    #[serde(default)]
    pub required: bool,

    #[serde(flatten)]
    pub variant: FieldVariant,
}

impl AttributeField {
    fn new(name: &str, label: &str, variant: FieldVariant) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            required: false,
            variant,
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldVariant::Text)
    }

    pub fn number(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldVariant::Number)
    }

    pub fn select(name: &str, label: &str, options: &[&str]) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        Self::new(name, label, FieldVariant::Select { options })
    }

    pub fn checkbox(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldVariant::Checkbox)
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.variant.kind()
    }

    /// Options of a select field; empty for every other kind.
    pub fn options(&self) -> &[String] {
        match &self.variant {
            FieldVariant::Select { options } => options,
            _ => &[],
        }
    }
}
