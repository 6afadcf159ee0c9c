//! Stale entries and dropped references

use crate::common::*;

#[test]
fn stale_sweep_removes_exactly_the_orphans() {
    for t in TestBackend::each_strategy() {
        t.publish(&[post(1, "a", "a"), post(2, "b", "b"), post(3, "c", "c")]);
        // bulk delete bypassing the index
        t.store.remove_object(&ct(POST), &PrimaryKey::Int(2)).unwrap();

        let rebuilder = t.backend.rebuilder(&ct(POST)).unwrap();
        rebuilder.start().unwrap().finish().unwrap();

        let post_ids: Vec<String> = t
            .entry_keys()
            .into_iter()
            .filter(|(ct, _)| ct == POST)
            .map(|(_, id)| id)
            .collect();
        assert_eq!(post_ids, vec!["1", "3"]);
    }
}

#[test]
fn rebuild_of_each_model_cleans_its_own_rows() {
    let t = TestBackend::new();
    t.publish(&[post(1, "a", "a"), post(2, "b", "b")]);
    t.store.remove_object(&ct(POST), &PrimaryKey::Int(2)).unwrap();

    for model in [POST, PAGE] {
        t.backend
            .rebuilder(&ct(model))
            .unwrap()
            .run(|_| Ok(()))
            .unwrap();
    }
    assert_eq!(
        t.entry_keys(),
        vec![
            (POST.to_string(), "1".to_string()),
            (PAGE.to_string(), "1".to_string()),
        ]
    );
}

#[test]
fn dropped_references_are_skipped_in_rank_order() {
    let t = TestBackend::new();
    t.publish(&[
        post(1, "rust", "rust rust"),
        post(2, "rust", "rust"),
        post(3, "other", "rust"),
    ]);
    // object gone, its entries still indexed
    t.store.remove_object(&ct(POST), &PrimaryKey::Int(1)).unwrap();

    let results = t
        .backend
        .search(&SearchQuery::new(posts(), Some("rust")))
        .unwrap();
    assert_eq!(pk_ints(results.pks().unwrap()), vec![2, 3]);
    assert_eq!(results.count().unwrap(), 2);
}

#[test]
fn hydration_tolerates_objects_deleted_after_search() {
    let t = TestBackend::new();
    t.publish(&[post(1, "rust", "a"), post(2, "rust", "b")]);
    let results = t
        .backend
        .search(&SearchQuery::new(posts(), Some("rust")))
        .unwrap();
    assert_eq!(results.pks().unwrap().len(), 2);

    t.store.remove_object(&ct(POST), &PrimaryKey::Int(1)).unwrap();
    let records = results.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pk(), &PrimaryKey::Int(2));
}
