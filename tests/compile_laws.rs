use proptest::prelude::*;
use taxofacet::model::{CategoryPath, FilterState, SortKey};
use taxofacet::query::{compile, OrderTerm, QueryOptions};

fn filter_state() -> impl Strategy<Value = FilterState> {
    (
        prop::collection::vec("\\PC{0,12}", 0..=3),
        prop::option::of("\\PC{0,12}"),
        prop::option::of(-1e9f64..1e9),
        prop::option::of(-1e9f64..1e9),
        prop::option::of("\\PC{0,12}"),
        prop::sample::select(SortKey::ALL.to_vec()),
        1u32..500,
        prop::collection::btree_map("[a-z_]{1,8}", "\\PC{0,8}", 0..3),
    )
        .prop_map(|(segments, city, min, max, text, sort, page, attributes)| FilterState {
            path: CategoryPath::from_segments(segments),
            city,
            min_price: min,
            max_price: max,
            free_text: text,
            sort,
            page,
            attributes,
        })
}

fn query_options() -> impl Strategy<Value = QueryOptions> {
    (1u32..100, any::<bool>()).prop_map(|(page_size, shuffle_ties)| QueryOptions {
        page_size,
        shuffle_ties,
    })
}

proptest! {
    #[test]
    fn test_count_predicate_mirrors_data_predicate(state in filter_state(), options in query_options()) {
        let query = compile(&state, &options);
        prop_assert_eq!(&query.data.predicate, &query.count.predicate);
    }

    #[test]
    fn test_page_window_follows_page_and_size(state in filter_state(), options in query_options()) {
        let query = compile(&state, &options);
        prop_assert_eq!(query.data.limit, options.page_size);
        prop_assert_eq!(
            query.data.offset,
            u64::from(state.page - 1) * u64::from(options.page_size)
        );
    }

    #[test]
    fn test_promotion_always_orders_first(
        state in filter_state(),
        options in query_options(),
        seed in any::<u64>(),
    ) {
        let query = compile(&state, &options).with_tie_seed(seed);
        prop_assert_eq!(query.data.order[0], OrderTerm::PromotedFirst);
        let has_random = query
            .data
            .order
            .iter()
            .any(|t| matches!(t, OrderTerm::Random { .. }));
        prop_assert_eq!(has_random, options.shuffle_ties);
    }

    #[test]
    fn test_path_levels_compile_to_leading_equalities(state in filter_state()) {
        let query = compile(&state, &QueryOptions::default());
        let depth = state.path.depth();
        prop_assert!(query.data.predicate.clauses().len() >= depth);
        let rendered = query.data.predicate.to_string();
        for segment in state.path.segments() {
            prop_assert!(rendered.contains(&segment.replace('\'', "''")));
        }
    }
}
