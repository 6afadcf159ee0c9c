//! Indexing through the backend

use crate::common::*;
use ftindex::{extract, BoostWeights, Weight};

#[test]
fn boosted_fields_land_in_their_letter() {
    let model = ModelDef::new("a.Doc")
        .with_field(FieldDescriptor::boosted("title", 10.0))
        .with_field(FieldDescriptor::boosted("body", 1.0));
    let weights = BoostWeights::calibrate(&[10.0, 1.0]).unwrap();
    let record = Record::new(1).with_value("title", "X").with_value("body", "Y");

    assert_eq!(
        extract(&record, &model, &weights).unwrap(),
        vec![("X".to_string(), Weight::A), ("Y".to_string(), Weight::B)]
    );
}

#[test]
fn entries_materialized_for_every_ancestor() {
    for t in TestBackend::each_strategy() {
        t.publish(&[post(1, "Hello", "world")]);
        assert_eq!(
            t.entry_keys(),
            vec![
                (POST.to_string(), "1".to_string()),
                (PAGE.to_string(), "1".to_string()),
            ]
        );
    }
}

#[test]
fn reindexing_is_idempotent() {
    for t in TestBackend::each_strategy() {
        let batch = [post(1, "Hello", "world"), post(2, "Other", "text")];
        t.publish(&batch);
        let once = t.store.entries(&EntryScope::All).unwrap();

        t.backend.add_bulk(&ct(POST), &batch).unwrap();
        let twice = t.store.entries(&EntryScope::All).unwrap();
        assert_eq!(once, twice, "strategy {:?}", t.backend.strategy());
    }
}

#[test]
fn reindexing_replaces_content() {
    for t in TestBackend::each_strategy() {
        t.publish(&[post(1, "Hello", "old words")]);
        t.backend
            .add(&ct(POST), &post(1, "Hello", "new words"))
            .unwrap();

        assert!(t.search_pks(SearchQuery::new(posts(), Some("old"))).is_empty());
        assert_eq!(t.search_pks(SearchQuery::new(posts(), Some("new"))), vec![1]);
    }
}

#[test]
fn related_objects_are_searchable() {
    let t = TestBackend::new();
    let p = post(1, "Release notes", "what changed").with_related(
        "authors",
        vec![author(10, "Zoë Keating"), author(11, "Ada Lovelace")],
    );
    t.publish(&[p]);

    assert_eq!(t.search_pks(SearchQuery::new(posts(), Some("zoe"))), vec![1]);
    assert_eq!(t.search_pks(SearchQuery::new(posts(), Some("lovelace"))), vec![1]);
}

#[test]
fn failing_object_aborts_the_batch() {
    for t in TestBackend::each_strategy() {
        let broken = Record::new(2).with_value("title", "no body").with_accessor(
            "body",
            |_| Err(Error::MissingField("body".to_string())),
        );
        let err = t
            .backend
            .add_bulk(&ct(POST), &[post(1, "fine", "fine"), broken])
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { ref object_id, .. } if object_id == "2"));
        assert!(t.entry_keys().is_empty());
    }
}

#[test]
fn delete_removes_every_entry_of_the_object() {
    let t = TestBackend::new();
    t.publish(&[post(1, "a", "a"), post(2, "b", "b")]);
    assert_eq!(t.backend.delete(&ct(POST), &PrimaryKey::Int(1)).unwrap(), 2);
    assert_eq!(
        t.entry_keys(),
        vec![
            (POST.to_string(), "2".to_string()),
            (PAGE.to_string(), "2".to_string()),
        ]
    );
}

#[test]
fn delete_through_base_model_reaches_subtype_entries() {
    let t = TestBackend::new();
    t.publish(&[post(1, "a", "a"), post(2, "b", "b")]);
    assert_eq!(t.backend.delete(&ct(PAGE), &PrimaryKey::Int(1)).unwrap(), 2);
    assert_eq!(
        t.entry_keys(),
        vec![
            (POST.to_string(), "2".to_string()),
            (PAGE.to_string(), "2".to_string()),
        ]
    );
    assert!(t.search_pks(SearchQuery::new(posts(), Some("a"))).is_empty());
}

#[test]
fn reset_clears_everything() {
    let t = TestBackend::new();
    t.publish(&[post(1, "a", "a"), post(2, "b", "b")]);
    assert_eq!(t.backend.reset_index().unwrap(), 4);
    assert!(t.entry_keys().is_empty());
}

#[test]
fn configured_language_is_used_end_to_end() {
    let t = TestBackend::with_config(BackendConfig {
        search_config: "english".to_string(),
        ..BackendConfig::default()
    });
    t.publish(&[post(1, "Running shoes", "the runner runs")]);

    let entries = t.store.entries(&EntryScope::All).unwrap();
    assert!(entries.iter().all(|e| e.config == "english"));
    assert_eq!(t.search_pks(SearchQuery::new(posts(), Some("run"))), vec![1]);
    // stopwords are not indexed
    assert!(t.search_pks(SearchQuery::new(posts(), Some("the"))).is_empty());
}

#[test]
fn forcing_update_then_create_on_an_upsert_store() {
    let t = TestBackend::with_config(BackendConfig {
        write_strategy: WriteMode::UpdateThenCreate,
        ..BackendConfig::default()
    });
    assert_eq!(t.backend.strategy(), WriteStrategy::UpdateThenCreate);
    t.publish(&[post(1, "a", "b")]);
    t.publish(&[post(1, "c", "d")]);
    assert_eq!(t.entry_keys().len(), 2);
}
