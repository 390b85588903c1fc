//! Result ordering.
//!
//! Every data query orders by, in this sequence:
//!
//! 1. promoted listings first
//! 2. a random tie-break, rotating exposure among equally ranked listings
//! 3. the requested [`SortKey`]
//!
//! The random term ranks each row by a key derived from a seed and the row
//! id. A new selection gets a new seed, so tied rows rotate between
//! searches, while all pages of one selection share the seed and are cut
//! from the same ordering. It can be disabled through
//! `QueryOptions::shuffle_ties`, in which case the sort key decides among
//! rows of equal promotion.

use crate::model::{ListingRow, SortKey};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    Price,
    Views,
    Likes,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Price => "price",
            SortField::Views => "views",
            SortField::Likes => "likes",
        }
    }

    fn compare(self, a: &ListingRow, b: &ListingRow) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Views => a.views.cmp(&b.views),
            SortField::Likes => a.likes.cmp(&b.likes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    Desc,
}

/// One term of an ORDER BY list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "term", rename_all = "snake_case")]
pub enum OrderTerm {
    PromotedFirst,
    Random { seed: u64 },
    By { field: SortField, direction: Direction },
}

impl OrderTerm {
    fn desc(field: SortField) -> Self {
        OrderTerm::By {
            field,
            direction: Direction::Desc,
        }
    }

    fn asc(field: SortField) -> Self {
        OrderTerm::By {
            field,
            direction: Direction::Asc,
        }
    }

    /// Compare two rows on this term. `Random` compares the tie keys
    /// computed for each row.
    fn compare(&self, a: (&ListingRow, u64), b: (&ListingRow, u64)) -> Ordering {
        match self {
            OrderTerm::PromotedFirst => b.0.promoted.cmp(&a.0.promoted),
            OrderTerm::Random { .. } => a.1.cmp(&b.1),
            OrderTerm::By { field, direction } => {
                let ord = field.compare(a.0, b.0);
                match direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            }
        }
    }
}

impl fmt::Display for OrderTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderTerm::PromotedFirst => f.write_str("promoted DESC"),
            OrderTerm::Random { seed } => write!(f, "RANDOM({})", seed),
            OrderTerm::By { field, direction } => {
                let dir = match direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                write!(f, "{} {}", field.as_str(), dir)
            }
        }
    }
}

/// Terms implementing a sort key, without the promotion and random prefix.
pub fn sort_terms(sort: SortKey) -> Vec<OrderTerm> {
    match sort {
        SortKey::Newest => vec![OrderTerm::desc(SortField::CreatedAt)],
        SortKey::Oldest => vec![OrderTerm::asc(SortField::CreatedAt)],
        SortKey::PriceAsc => vec![OrderTerm::asc(SortField::Price)],
        SortKey::PriceDesc => vec![OrderTerm::desc(SortField::Price)],
        SortKey::Popular => vec![
            OrderTerm::desc(SortField::Views),
            OrderTerm::desc(SortField::Likes),
        ],
    }
}

/// The full ORDER BY list for a sort key. The random term starts with seed
/// 0; see [`reseed`].
pub fn order_for(sort: SortKey, shuffle_ties: bool) -> Vec<OrderTerm> {
    let mut terms = vec![OrderTerm::PromotedFirst];
    if shuffle_ties {
        terms.push(OrderTerm::Random { seed: 0 });
    }
    terms.extend(sort_terms(sort));
    terms
}

/// Replace the seed of every random term in `order`.
pub fn reseed(order: &mut [OrderTerm], tie_seed: u64) {
    for term in order {
        if let OrderTerm::Random { seed } = term {
            *seed = tie_seed;
        }
    }
}

/// Rank of a row under a tie-break seed. Stable for a given seed and id.
pub fn tie_key(seed: u64, row: &ListingRow) -> u64 {
    let (hi, lo) = row.id.as_u64_pair();
    StdRng::seed_from_u64(seed ^ hi ^ lo.rotate_left(29)).gen()
}

/// Sort rows in place by `order`.
pub fn sort_rows(rows: &mut Vec<ListingRow>, order: &[OrderTerm]) {
    let seed = order.iter().find_map(|term| match term {
        OrderTerm::Random { seed } => Some(*seed),
        _ => None,
    });
    let mut keyed: Vec<(ListingRow, u64)> = rows
        .drain(..)
        .map(|r| {
            let key = seed.map_or(0, |seed| tie_key(seed, &r));
            (r, key)
        })
        .collect();
    keyed.sort_by(|(a, ka), (b, kb)| {
        order
            .iter()
            .map(|term| term.compare((a, *ka), (b, *kb)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    rows.extend(keyed.into_iter().map(|(r, _)| r));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryPath;
    use chrono::{Duration, Utc};

    fn row(title: &str, price: f64, promoted: bool, age_days: i64) -> ListingRow {
        let mut row = ListingRow::new(title, price, &CategoryPath::from_segments(["A"]));
        row.promoted = promoted;
        row.created_at = Utc::now() - Duration::days(age_days);
        row
    }

    fn titles(rows: &[ListingRow]) -> Vec<&str> {
        rows.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_order_for_puts_promotion_then_random_first() {
        let order = order_for(SortKey::Popular, true);
        assert_eq!(order[0], OrderTerm::PromotedFirst);
        assert_eq!(order[1], OrderTerm::Random { seed: 0 });
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn test_order_without_shuffle_has_no_random_term() {
        let order = order_for(SortKey::Newest, false);
        assert!(!order
            .iter()
            .any(|t| matches!(t, OrderTerm::Random { .. })));
    }

    #[test]
    fn test_sort_key_applies_when_ties_are_not_shuffled() {
        let mut rows = vec![
            row("cheap", 10.0, false, 1),
            row("pricey", 99.0, false, 2),
            row("mid", 50.0, false, 3),
        ];
        sort_rows(&mut rows, &order_for(SortKey::PriceDesc, false));
        assert_eq!(titles(&rows), vec!["pricey", "mid", "cheap"]);

        sort_rows(&mut rows, &order_for(SortKey::Oldest, false));
        assert_eq!(titles(&rows), vec!["mid", "pricey", "cheap"]);
    }

    #[test]
    fn test_promoted_rows_come_first_even_when_shuffled() {
        for (seed, sort) in SortKey::ALL.into_iter().enumerate() {
            let mut rows: Vec<ListingRow> = (0..20)
                .map(|i| row(&format!("r{}", i), i as f64, i % 3 == 0, i))
                .collect();
            let mut order = order_for(sort, true);
            reseed(&mut order, seed as u64 + 42);
            sort_rows(&mut rows, &order);
            let first_regular = rows.iter().position(|r| !r.promoted).unwrap();
            assert!(rows[first_regular..].iter().all(|r| !r.promoted));
        }
    }

    #[test]
    fn test_popular_breaks_view_ties_by_likes() {
        let mut a = row("a", 1.0, false, 0);
        a.views = 10;
        a.likes = 1;
        let mut b = row("b", 1.0, false, 0);
        b.views = 10;
        b.likes = 5;
        let mut rows = vec![a, b];
        sort_rows(&mut rows, &order_for(SortKey::Popular, false));
        assert_eq!(titles(&rows), vec!["b", "a"]);
    }

    #[test]
    fn test_same_seed_gives_same_order_and_new_seed_rotates() {
        let rows: Vec<ListingRow> = (0..20)
            .map(|i| row(&format!("r{}", i), 1.0, false, 0))
            .collect();
        let sorted = |seed: u64| {
            let mut order = order_for(SortKey::Newest, true);
            reseed(&mut order, seed);
            let mut rows = rows.clone();
            sort_rows(&mut rows, &order);
            rows.into_iter().map(|r| r.id).collect::<Vec<_>>()
        };

        assert_eq!(sorted(5), sorted(5));
        assert_ne!(sorted(5), sorted(6));
    }

    #[test]
    fn test_display_matches_sql_order_by() {
        let mut order = order_for(SortKey::Newest, true);
        reseed(&mut order, 17);
        let rendered: Vec<String> = order.iter().map(|t| t.to_string()).collect();
        assert_eq!(rendered, vec!["promoted DESC", "RANDOM(17)", "created_at DESC"]);
    }
}
