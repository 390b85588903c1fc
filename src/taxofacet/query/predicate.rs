//! Predicate AST.
//!
//! A [`Predicate`] is a conjunction of [`Clause`]s. It is plain data: the
//! repository decides how to execute it, and [`Predicate::matches`] gives the
//! reference semantics used by the in-memory repository.

use crate::model::ListingRow;
use crate::presenter::decode_attributes;
use serde::Serialize;
use std::fmt;

/// A listing column a clause can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Category,
    Subcategory,
    Subsubcategory,
    Location,
    Price,
    Title,
    Description,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Category => "category",
            Field::Subcategory => "subcategory",
            Field::Subsubcategory => "subsubcategory",
            Field::Location => "location",
            Field::Price => "price",
            Field::Title => "title",
            Field::Description => "description",
        }
    }

    fn text(self, row: &ListingRow) -> Option<&str> {
        match self {
            Field::Category => Some(&row.category),
            Field::Subcategory => row.subcategory.as_deref(),
            Field::Subsubcategory => row.subsubcategory.as_deref(),
            Field::Location => Some(&row.location),
            Field::Title => Some(&row.title),
            Field::Description => Some(&row.description),
            Field::Price => None,
        }
    }

    fn number(self, row: &ListingRow) -> Option<f64> {
        match self {
            Field::Price => Some(row.price),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One condition of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Clause {
    /// Exact equality on a text column.
    Eq { field: Field, value: String },
    /// Case-insensitive substring match on a text column.
    Contains { field: Field, needle: String },
    /// Numeric lower bound (inclusive).
    Gte { field: Field, value: f64 },
    /// Numeric upper bound (inclusive).
    Lte { field: Field, value: f64 },
    /// Case-insensitive substring match on any of the columns (the only
    /// disjunction).
    AnyContains { fields: Vec<Field>, needle: String },
    /// Equality on a dynamic attribute, compared through its string form.
    AttrEq { name: String, value: String },
}

impl Clause {
    pub fn matches(&self, row: &ListingRow) -> bool {
        match self {
            Clause::Eq { field, value } => field.text(row) == Some(value.as_str()),
            Clause::Contains { field, needle } => contains_ci(field.text(row), needle),
            Clause::Gte { field, value } => field.number(row).is_some_and(|n| n >= *value),
            Clause::Lte { field, value } => field.number(row).is_some_and(|n| n <= *value),
            Clause::AnyContains { fields, needle } => {
                fields.iter().any(|f| contains_ci(f.text(row), needle))
            }
            Clause::AttrEq { name, value } => decode_attributes(row)
                .get(name)
                .is_some_and(|v| v.matches_param(value)),
        }
    }
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn like(s: &str) -> String {
    quote(&format!("%{}%", s))
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Eq { field, value } => write!(f, "{} = {}", field, quote(value)),
            Clause::Contains { field, needle } => write!(f, "{} ILIKE {}", field, like(needle)),
            Clause::Gte { field, value } => write!(f, "{} >= {}", field, value),
            Clause::Lte { field, value } => write!(f, "{} <= {}", field, value),
            Clause::AnyContains { fields, needle } => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|field| format!("{} ILIKE {}", field, like(needle)))
                    .collect();
                write!(f, "({})", parts.join(" OR "))
            }
            Clause::AttrEq { name, value } => {
                write!(f, "attributes->>{} = {}", quote(name), quote(value))
            }
        }
    }
}

/// Conjunction of clauses. The empty predicate matches every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, row: &ListingRow) -> bool {
        self.clauses.iter().all(|c| c.matches(row))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return f.write_str("TRUE");
        }
        let parts: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join(" AND "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryPath;

    fn car() -> ListingRow {
        let mut row = ListingRow::new(
            "Skoda Octavia 2.0 TDI",
            42000.0,
            &CategoryPath::from_segments(["Motoryzacja", "Samochody osobowe"]),
        );
        row.location = "Warszawa, Mokotów".into();
        row.description = "Bezwypadkowa, serwisowana w ASO".into();
        row.attributes = Some(r#"{"brand":"Skoda","year":2017,"damaged":false}"#.into());
        row
    }

    #[test]
    fn test_eq_is_exact() {
        let clause = Clause::Eq {
            field: Field::Category,
            value: "Motoryzacja".into(),
        };
        assert!(clause.matches(&car()));
        let clause = Clause::Eq {
            field: Field::Category,
            value: "motoryzacja".into(),
        };
        assert!(!clause.matches(&car()));
    }

    #[test]
    fn test_eq_on_missing_level_never_matches() {
        let clause = Clause::Eq {
            field: Field::Subsubcategory,
            value: "Kombi".into(),
        };
        assert!(!clause.matches(&car()));
    }

    #[test]
    fn test_contains_ignores_case() {
        let clause = Clause::Contains {
            field: Field::Location,
            needle: "warszawa".into(),
        };
        assert!(clause.matches(&car()));
    }

    #[test]
    fn test_any_contains_checks_description() {
        let clause = Clause::AnyContains {
            fields: vec![Field::Title, Field::Description],
            needle: "aso".into(),
        };
        assert!(clause.matches(&car()));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let gte = Clause::Gte {
            field: Field::Price,
            value: 42000.0,
        };
        let lte = Clause::Lte {
            field: Field::Price,
            value: 42000.0,
        };
        assert!(gte.matches(&car()) && lte.matches(&car()));
    }

    #[test]
    fn test_attr_eq_compares_typed_values() {
        let year = Clause::AttrEq {
            name: "year".into(),
            value: "2017".into(),
        };
        let brand = Clause::AttrEq {
            name: "brand".into(),
            value: "skoda".into(),
        };
        let missing = Clause::AttrEq {
            name: "gearbox".into(),
            value: "Manualna".into(),
        };
        assert!(year.matches(&car()));
        assert!(brand.matches(&car()));
        assert!(!missing.matches(&car()));
    }

    #[test]
    fn test_attr_eq_on_malformed_blob_is_false() {
        let mut row = car();
        row.attributes = Some("{not json".into());
        let clause = Clause::AttrEq {
            name: "brand".into(),
            value: "Skoda".into(),
        };
        assert!(!clause.matches(&row));
    }

    #[test]
    fn test_attr_eq_on_non_object_blob_is_false() {
        let mut row = car();
        row.attributes = Some(r#"["Skoda", 2017]"#.into());
        let clause = Clause::AttrEq {
            name: "brand".into(),
            value: "Skoda".into(),
        };
        assert!(!clause.matches(&row));
    }

    #[test]
    fn test_empty_predicate_matches_everything() {
        assert!(Predicate::default().matches(&car()));
        assert_eq!(Predicate::default().to_string(), "TRUE");
    }

    #[test]
    fn test_display_renders_sql_like_text() {
        let predicate = Predicate::new(vec![
            Clause::Eq {
                field: Field::Category,
                value: "Dom i Ogród".into(),
            },
            Clause::AnyContains {
                fields: vec![Field::Title, Field::Description],
                needle: "d'Artagnan".into(),
            },
        ]);
        assert_eq!(
            predicate.to_string(),
            "category = 'Dom i Ogród' AND (title ILIKE '%d''Artagnan%' OR description ILIKE '%d''Artagnan%')"
        );
    }
}
