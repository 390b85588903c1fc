use proptest::prelude::*;
use taxofacet::filter::{decode_url, encode_url, escape_segment, unescape_segment};
use taxofacet::model::{CategoryPath, FilterState, SortKey};

fn non_blank(pattern: &'static str) -> impl Strategy<Value = String> {
    pattern.prop_filter("blank", |s| !s.trim().is_empty())
}

proptest! {
    #[test]
    fn test_any_segment_survives_escaping(name in "\\PC{0,24}") {
        prop_assert_eq!(unescape_segment(&escape_segment(&name)), name);
    }

    #[test]
    fn test_escape_heavy_segment_survives_escaping(name in "[~/s%a ]{1,12}") {
        let escaped = escape_segment(&name);
        prop_assert!(!escaped.contains('/'));
        prop_assert_eq!(unescape_segment(&escaped), name);
    }

    #[test]
    fn test_path_round_trips(segments in prop::collection::vec("\\PC{1,16}", 0..=3)) {
        let path = CategoryPath::from_segments(segments);
        let state = FilterState::default().with_path(path.clone());
        let decoded = decode_url(&encode_url(&state)).unwrap();
        prop_assert_eq!(decoded.path, path);
    }

    #[test]
    fn test_full_state_round_trips(
        segments in prop::collection::vec("[A-Za-zÀ-ž /~]{1,12}", 0..=3),
        city in prop::option::of(non_blank("\\PC{1,16}")),
        min in prop::option::of(-1e9f64..1e9),
        max in prop::option::of(-1e9f64..1e9),
        text in prop::option::of(non_blank("\\PC{1,16}")),
        sort in prop::sample::select(SortKey::ALL.to_vec()),
        attributes in prop::collection::btree_map("[a-z_]{1,8}", non_blank("\\PC{1,8}"), 0..3),
    ) {
        let state = FilterState {
            path: CategoryPath::from_segments(segments),
            city,
            min_price: min,
            max_price: max,
            free_text: text,
            sort,
            page: 1,
            attributes,
        };
        let decoded = decode_url(&encode_url(&state)).unwrap();
        prop_assert_eq!(decoded, state);
    }
}

#[test]
fn test_escape_scheme_examples() {
    assert_eq!(escape_segment("Konsole/Gry"), "Konsole~sGry");
    assert_eq!(escape_segment("a~s"), "a~~s");
    assert_eq!(unescape_segment("a~~s"), "a~s");
    assert_eq!(unescape_segment("Konsole~sGry"), "Konsole/Gry");
}
