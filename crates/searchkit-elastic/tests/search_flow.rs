mod support;

use serde_json::json;

use searchkit_core::{Error, Item, Query, SearchEngine};
use searchkit_elastic::ElasticSearch;
use support::MemoryClient;

fn book(id: &str, title: &str) -> Item {
    Item::new(id).with("index", "books").with("type", "book").with("title", title)
}

#[tokio::test]
async fn added_items_come_back_from_search() {
    let es = ElasticSearch::new(MemoryClient::new());
    let item = Item::new("42").with("index", "i").with("type", "t").with("foo", "bar");
    es.add(vec![item]).await.expect("add");

    let results = es.search(Query::builder("i").build()).await.expect("search");
    assert_eq!(results.len(), 1);
    let hit = results.get(0).unwrap();
    assert_eq!(hit.id, "42");
    assert_eq!(hit.get("foo"), Some(&json!("bar")));
    assert_eq!(hit.get("_index"), Some(&json!("i")));
    assert!(hit.get("index").is_none(), "routing keys never come back");
    assert!(hit.get("type").is_none(), "routing keys never come back");
}

#[tokio::test]
async fn payload_without_type_fails_before_any_request() {
    let es = ElasticSearch::new(MemoryClient::new());
    let q = Query::builder("books").query_payload(json!({"title": "rust"})).build();
    let err = es.search(q).await.unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
    assert!(es.engine().searches().is_empty(), "nothing reached the engine");
}

#[tokio::test]
async fn pages_past_the_end_are_clamped() {
    let es = ElasticSearch::new(MemoryClient::new());
    let items: Vec<Item> = (0..12).map(|i| book(&format!("b{i}"), "t")).collect();
    es.add(items).await.unwrap();

    let results = es.search(Query::builder("books").page(5).count(10).build()).await.unwrap();
    assert_eq!(results.pager.page_count(), 2);
    assert_eq!(results.pager.current_page(), 2);
    assert_eq!(results.total(), 12);
    assert_eq!(es.engine().searches()[0].body["from"], json!(40));

    let second = es.search(Query::builder("books").page(2).count(10).build()).await.unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(second.get(0).unwrap().id, "b10");
}

#[tokio::test]
async fn empty_index_reports_page_one_of_zero() {
    let es = ElasticSearch::new(MemoryClient::new());
    let results = es.search(Query::builder("nothing").page(3).build()).await.unwrap();
    assert_eq!(results.pager.current_page(), 1);
    assert_eq!(results.pager.page_count(), 0);
    assert_eq!(results.pager.total_entries(), 0);
    assert!(results.items.is_empty());
}

#[tokio::test]
async fn request_carries_the_translated_query() {
    let es = ElasticSearch::new(MemoryClient::new());
    let q = Query::builder("books")
        .query("query_string", json!({"query": "rust"}))
        .filter("lang", json!({"term": {"lang": "en"}}))
        .facet("tags", json!({"terms": {"field": "tag"}}))
        .order(json!({"year": "asc"}))
        .build();
    es.search(q.clone()).await.unwrap();

    let sent = es.engine().searches();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].index, "books");
    assert_eq!(sent[0].body["query"], json!({"query_string": {"query": "rust"}}));
    assert_eq!(sent[0].body["facets"]["tags"]["facet_filter"], sent[0].body["filter"]);
    assert_eq!(sent[0].body["sort"], json!({"year": "asc"}));
}

#[tokio::test]
async fn result_keeps_the_originating_query() {
    let es = ElasticSearch::new(MemoryClient::new());
    let q = Query::builder("books").page(2).count(5).build();
    let results = es.search(q.clone()).await.unwrap();
    assert_eq!(results.query, q);
}

#[tokio::test]
async fn canned_facets_are_surfaced() {
    let client = MemoryClient::with_response(json!({
        "hits": {"total": 3, "hits": []},
        "facets": {"tags": {"_type": "terms", "terms": [{"term": "a", "count": 2}, {"term": "b", "count": 1}]}}
    }));
    let es = ElasticSearch::new(client);
    let q = Query::builder("books").facet("tags", json!({"terms": {"field": "tag"}})).debug(true).build();
    let results = es.search(q).await.unwrap();
    let tags = results.facet("tags").unwrap();
    assert_eq!(tags.iter().map(|f| f.count).collect::<Vec<_>>(), vec![2, 1]);
    assert!(results.raw.is_some());
    assert_eq!(es.engine().searches()[0].body["explain"], json!(true));
}

#[tokio::test]
async fn outage_propagates_from_search() {
    let client = MemoryClient::new();
    client.set_down(true);
    let es = ElasticSearch::new(client);
    let err = es.search(Query::builder("books").build()).await.unwrap_err();
    assert!(matches!(err, Error::EngineUnavailable(_)));
}

#[tokio::test]
async fn malformed_engine_answer_is_reported() {
    let es = ElasticSearch::new(MemoryClient::with_response(json!({"error": "oops"})));
    let err = es.search(Query::builder("books").build()).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn concurrent_searches_share_one_adapter() {
    let es = ElasticSearch::new(MemoryClient::new());
    es.add((0..30).map(|i| book(&format!("b{i}"), "t")).collect()).await.unwrap();

    let pages = futures::future::join_all(
        (1..=3).map(|page| es.search(Query::builder("books").page(page).count(10).build())),
    )
    .await;

    let mut seen = Vec::new();
    for (i, page) in pages.into_iter().enumerate() {
        let page = page.expect("search");
        assert_eq!(page.pager.current_page(), i as u64 + 1);
        assert_eq!(page.len(), 10);
        seen.extend(page.items.into_iter().map(|item| item.id));
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 30, "pages do not overlap");
}
