//! Query planning and execution through the backend

use crate::common::*;
use ftindex::{keyword_split, Lookup};

fn ten_posts(t: &TestBackend) {
    let batch: Vec<Record> = (1..=10)
        .map(|i| post(i, &format!("Post {}", i), "shared words"))
        .collect();
    t.publish(&batch);
}

#[test]
fn keyword_split_examples() {
    assert_eq!(keyword_split(r#"Hello "a b" c"#), vec!["Hello", "a b", "c"]);
    assert_eq!(keyword_split(r#""a 'b c' d""#), vec!["a 'b c' d"]);
}

#[test]
fn no_query_string_returns_the_filtered_scope_sliced() {
    let t = TestBackend::new();
    ten_posts(&t);

    let scope = posts()
        .filter(Filter::lookup("rating", Lookup::Gt, 2))
        .order_by(OrderBy::desc("rating"));
    let results = t.backend.search(&SearchQuery::new(scope, None)).unwrap();
    assert_eq!(results.count().unwrap(), 8);

    let page = results.slice(2, Some(5));
    assert_eq!(page.count().unwrap(), 3);
    assert_eq!(pk_ints(page.pks().unwrap()), vec![8, 7, 6]);

    let tail = results.slice(6, None);
    assert_eq!(pk_ints(tail.pks().unwrap()), vec![4, 3]);
}

#[test]
fn and_requires_every_term_or_accepts_any() {
    for t in TestBackend::each_strategy() {
        t.publish(&[
            post(1, "foo", "alpha"),
            post(2, "bar", "beta"),
            post(3, "foo bar", "gamma"),
            post(4, "baz", "delta"),
        ]);

        let and = SearchQuery::new(posts(), Some("foo bar")).with_operator(Operator::And);
        assert_eq!(t.search_pks(and), vec![3]);

        let mut or = t.search_pks(SearchQuery::new(posts(), Some("foo bar")));
        or.sort();
        assert_eq!(or, vec![1, 2, 3]);
    }
}

#[test]
fn quoted_phrase_is_one_term() {
    let t = TestBackend::new();
    t.publish(&[post(1, "alpha beta", "x"), post(2, "alpha", "gamma")]);
    // one term whose lexemes must all occur
    let phrase = SearchQuery::new(posts(), Some(r#""alpha beta""#));
    assert_eq!(t.search_pks(phrase), vec![1]);
}

#[test]
fn title_matches_rank_above_body_matches() {
    let t = TestBackend::new();
    t.publish(&[
        post(1, "Gardening tips", "about rust on tools"),
        post(2, "Rust for beginners", "a language"),
    ]);
    assert_eq!(t.search_pks(SearchQuery::new(posts(), Some("rust"))), vec![2, 1]);

    // scope order when relevance is off
    let by_pk = SearchQuery::new(posts().order_by(OrderBy::asc("pk")), Some("rust"))
        .order_by_relevance(false);
    assert_eq!(t.search_pks(by_pk), vec![1, 2]);
}

#[test]
fn ranked_results_paginate() {
    let t = TestBackend::new();
    ten_posts(&t);
    let results = t
        .backend
        .search(&SearchQuery::new(posts(), Some("shared")))
        .unwrap();
    assert_eq!(results.count().unwrap(), 10);
    let page = results.slice(3, Some(6));
    assert_eq!(page.count().unwrap(), 3);
    // equal ranks keep scope order
    assert_eq!(pk_ints(page.pks().unwrap()), vec![4, 5, 6]);
}

#[test]
fn structural_filter_applies_to_text_search() {
    let t = TestBackend::new();
    t.publish(&[post(1, "news", "a"), post(2, "news", "b")]);
    let mut hidden = post(3, "news", "c");
    hidden.set_value("live", false);
    t.publish(&[hidden]);

    let live = posts().filter(Filter::eq("live", true));
    let mut pks = t.search_pks(SearchQuery::new(live, Some("news")));
    pks.sort();
    assert_eq!(pks, vec![1, 2]);
}

#[test]
fn field_search_reads_live_values() {
    let t = TestBackend::new();
    t.publish(&[post(1, "apples", "pears"), post(2, "pears", "apples")]);

    let in_title = SearchQuery::new(posts(), Some("pears")).with_fields(["title"]);
    assert_eq!(t.search_pks(in_title), vec![2]);

    // live fields are searched even without any index entry
    t.backend.reset_index().unwrap();
    let in_body = SearchQuery::new(posts(), Some("pears")).with_fields(["body"]);
    assert_eq!(t.search_pks(in_body), vec![1]);
    assert!(t.search_pks(SearchQuery::new(posts(), Some("pears"))).is_empty());
}

#[test]
fn base_type_scope_finds_subtype_objects() {
    let t = TestBackend::new();
    t.publish(&[post(1, "inherited", "x")]);
    let pages = ObjectQuery::all(PAGE);
    assert_eq!(t.search_pks(SearchQuery::new(pages, Some("inherited"))), vec![1]);
}

#[test]
fn transliterated_query_matches_folded_text() {
    let t = TestBackend::new();
    t.publish(&[post(1, "Café culture", "x")]);
    assert_eq!(t.search_pks(SearchQuery::new(posts(), Some("cafe"))), vec![1]);
    assert_eq!(t.search_pks(SearchQuery::new(posts(), Some("CAFÉ"))), vec![1]);
}

#[test]
fn field_search_folds_accents_like_the_index() {
    let t = TestBackend::new();
    t.publish(&[post(1, "Café society", "x"), post(2, "Cafeteria", "y")]);

    let indexed = SearchQuery::new(posts(), Some("café"));
    assert_eq!(t.search_pks(indexed), vec![1]);
    let in_title = SearchQuery::new(posts(), Some("café")).with_fields(["title"]);
    assert_eq!(t.search_pks(in_title), vec![1]);
    let unaccented = SearchQuery::new(posts(), Some("cafe")).with_fields(["title"]);
    assert_eq!(t.search_pks(unaccented), vec![1]);
}

#[test]
fn blank_query_filters_only() {
    let t = TestBackend::new();
    ten_posts(&t);
    let results = t.backend.search(&SearchQuery::new(posts(), Some("  "))).unwrap();
    assert_eq!(results.count().unwrap(), 10);
}

#[test]
fn invalid_requests_are_configuration_errors() {
    let t = TestBackend::new();
    let bad_field = SearchQuery::new(posts(), Some("x")).with_fields(["live"]);
    let err = t.backend.search(&bad_field).unwrap_err();
    assert!(matches!(err, Error::SearchField { .. }));
    assert!(err.is_configuration());

    let bad_filter = SearchQuery::new(posts().filter(Filter::eq("body", "x")), Some("x"));
    assert!(matches!(
        t.backend.search(&bad_filter).unwrap_err(),
        Error::FilterField { .. }
    ));

    assert!("xor".parse::<Operator>().unwrap_err().is_configuration());
}
