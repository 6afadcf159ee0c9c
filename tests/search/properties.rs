//! Window arithmetic of search results against the full result list

use crate::common::*;
use proptest::prelude::*;

fn window(all: &[i64], start: usize, stop: Option<usize>) -> Vec<i64> {
    let stop = stop.map_or(all.len(), |stop| stop.min(all.len()));
    all.get(start..stop.max(start)).map(<[i64]>::to_vec).unwrap_or_default()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A slice of the results is the same slice of the full key list.
    #[test]
    fn slice_matches_full_results(
        n in 0i64..12,
        start in 0usize..16,
        stop in proptest::option::of(0usize..16),
        text in any::<bool>(),
    ) {
        let t = TestBackend::new();
        let batch: Vec<Record> = (1..=n).map(|pk| post(pk, "common title", "shared body")).collect();
        t.publish(&batch);

        let query = SearchQuery::new(posts(), text.then_some("common"));
        let results = t.backend.search(&query).unwrap();
        let all = pk_ints(results.pks().unwrap());
        prop_assert_eq!(all.len(), n as usize);

        let page = results.slice(start, stop);
        let expected = window(&all, start, stop);
        prop_assert_eq!(page.count().unwrap(), expected.len());
        prop_assert_eq!(pk_ints(page.pks().unwrap()), expected);
    }

    /// Slicing twice equals slicing once with composed bounds.
    #[test]
    fn nested_slices_compose(
        outer in (0usize..12, 0usize..12),
        inner in (0usize..12, proptest::option::of(0usize..12)),
    ) {
        let t = TestBackend::new();
        let batch: Vec<Record> = (1..=10).map(|pk| post(pk, "t", "b")).collect();
        t.publish(&batch);

        let results = t.backend.search(&SearchQuery::new(posts(), None)).unwrap();
        let all = pk_ints(results.pks().unwrap());

        let (outer_start, outer_len) = outer;
        let outer_keys = window(&all, outer_start, Some(outer_start + outer_len));
        let (inner_start, inner_stop) = inner;
        let nested = results
            .slice(outer_start, Some(outer_start + outer_len))
            .slice(inner_start, inner_stop);
        prop_assert_eq!(pk_ints(nested.pks().unwrap()), window(&outer_keys, inner_start, inner_stop));
    }
}
