use super::*;
use crate::api::{ErrorKind, MockTransport, TransportError};
use crate::config::Config;
use chrono::NaiveDate;
use futures_util::StreamExt;
use serde_json::{Value, json};
use std::time::Duration;

fn keys(params: &QueryParams) -> Vec<&'static str> {
    params.iter().map(|(k, _)| *k).collect()
}

fn param<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}

fn hit(id: u64) -> Value {
    json!({
        "caseName": format!("Case {id}"),
        "court": "Supreme Court",
        "court_id": "scotus",
        "citation": [format!("{id} U.S. 1")],
        "citeCount": id,
        "absolute_url": format!("/opinion/{id}/case-{id}/"),
        "cluster_id": id,
        "docket_id": id + 1000,
        "opinions": [
            {"id": id * 10, "type": "010combined", "snippet": format!("snippet {id}"),
             "download_url": format!("https://example.org/{id}.pdf"), "cites": [1, 2]},
            {"id": id * 10 + 1, "snippet": "second opinion"}
        ],
        "meta": {"score": {"bm25": 12.5, "semantic": 0.81}, "timestamp": "2024-01-01"}
    })
}

fn page_json(ids: std::ops::Range<u64>, count: u64, next: Option<&str>) -> Value {
    json!({
        "count": count,
        "next": next,
        "previous": null,
        "results": ids.map(hit).collect::<Vec<_>>(),
    })
}

fn client(transport: MockTransport) -> CaseLawClient<MockTransport> {
    CaseLawClient::with_transport(Config::with_token("secret-key"), transport)
        .expect("valid config")
}

// -- parameters --------------------------------------------------------------

#[test]
fn test_page_size_is_clamped() {
    let zero = SearchRequest::new("foo", SearchMode::Keyword).page_size(0);
    assert_eq!(param(&zero.to_params(), "page_size"), Some("1"));

    let huge = SearchRequest::new("foo", SearchMode::Keyword).page_size(100);
    assert_eq!(param(&huge.to_params(), "page_size"), Some("20"));

    let normal = SearchRequest::new("foo", SearchMode::Keyword).page_size(7);
    assert_eq!(param(&normal.to_params(), "page_size"), Some("7"));
}

#[test]
fn test_status_flags() {
    let flags = |status: Option<StatusFilter>| {
        let mut request = SearchRequest::new("foo", SearchMode::Keyword);
        request.status = status;
        keys(&request.to_params())
            .into_iter()
            .filter(|k| k.starts_with("stat_"))
            .collect::<Vec<_>>()
    };

    assert_eq!(flags(StatusFilter::from_label("published")), vec!["stat_Published"]);
    assert_eq!(flags(StatusFilter::from_label("unpublished")), vec!["stat_Unpublished"]);
    assert_eq!(
        flags(StatusFilter::from_label("all")),
        vec!["stat_Published", "stat_Unpublished"]
    );
    assert!(flags(StatusFilter::from_label("precedential")).is_empty());
    assert!(flags(None).is_empty());
}

#[test]
fn test_empty_filters_are_absent() {
    let request = SearchRequest::new("foo", SearchMode::Keyword)
        .court("   ")
        .cursor(Cursor::replay(""));
    let params = request.to_params();

    for key in ["court", "filed_after", "filed_before", "cursor"] {
        assert!(!keys(&params).contains(&key), "{key} should be absent");
    }
    assert_eq!(
        keys(&params),
        vec!["q", "type", "page_size", "order_by", "highlight", "stat_Published"]
    );
}

#[test]
fn test_non_empty_filters_are_present() {
    let request = SearchRequest::new("foo", SearchMode::Keyword)
        .court("scotus ca9")
        .filed_after(NaiveDate::from_ymd_opt(2020, 1, 31).unwrap())
        .filed_before(NaiveDate::from_ymd_opt(2021, 12, 1).unwrap())
        .cursor(Cursor::replay("abc123"));
    let params = request.to_params();

    assert_eq!(param(&params, "court"), Some("scotus ca9"));
    assert_eq!(param(&params, "filed_after"), Some("01/31/2020"));
    assert_eq!(param(&params, "filed_before"), Some("12/01/2021"));
    assert_eq!(param(&params, "cursor"), Some("abc123"));
    assert_eq!(param(&params, "type"), Some("o"));
    assert_eq!(param(&params, "order_by"), Some("score desc"));
}

#[test]
fn test_highlight_flag() {
    let on = SearchRequest::new("foo", SearchMode::Keyword).highlight(true);
    assert_eq!(param(&on.to_params(), "highlight"), Some("on"));

    let off = SearchRequest::new("foo", SearchMode::Keyword).highlight(false);
    assert!(param(&off.to_params(), "highlight").is_none());
}

#[test]
fn test_semantic_flag_only_in_semantic_mode() {
    let semantic = SearchRequest::new("foo", SearchMode::Semantic);
    assert_eq!(param(&semantic.to_params(), "semantic"), Some("true"));

    let keyword = SearchRequest::new("foo", SearchMode::Keyword);
    assert!(param(&keyword.to_params(), "semantic").is_none());
}

#[test]
fn test_citation_bounds_fold_in_order() {
    assert_eq!(
        fold_citation_bounds("foo", Some(10), None),
        "(foo) AND citeCount:[10 TO *]"
    );
    assert_eq!(
        fold_citation_bounds("foo", None, Some(50)),
        "(foo) AND citeCount:[* TO 50]"
    );
    assert_eq!(
        fold_citation_bounds("foo", Some(10), Some(50)),
        "((foo) AND citeCount:[10 TO *]) AND citeCount:[* TO 50]"
    );

    let request = SearchRequest::new("foo", SearchMode::Keyword)
        .cited_gt(10)
        .cited_lt(50);
    assert_eq!(
        param(&request.to_params(), "q"),
        Some("((foo) AND citeCount:[10 TO *]) AND citeCount:[* TO 50]")
    );
}

#[test]
fn test_citation_bounds_ignored_in_semantic_mode() {
    // Semantic search never sees the citation bounds; kept as observed.
    let request = SearchRequest::new("foo", SearchMode::Semantic)
        .cited_gt(10)
        .cited_lt(50);
    assert_eq!(request.effective_query(), "foo");
    assert_eq!(param(&request.to_params(), "q"), Some("foo"));
}

#[test]
fn test_validate_rejects_blank_query_and_both_mode() {
    let err = SearchRequest::new("  \t", SearchMode::Keyword)
        .validate()
        .unwrap_err();
    assert_eq!(err.field(), Some("query"));

    let err = SearchRequest::new("foo", SearchMode::Both)
        .validate()
        .unwrap_err();
    assert_eq!(err.field(), Some("search_type"));
}

#[test]
fn test_search_mode_parsing() {
    assert_eq!("keyword".parse::<SearchMode>().unwrap(), SearchMode::Keyword);
    assert_eq!(" Semantic ".parse::<SearchMode>().unwrap(), SearchMode::Semantic);
    assert_eq!("both".parse::<SearchMode>().unwrap(), SearchMode::Both);

    let err = "fuzzy".parse::<SearchMode>().unwrap_err();
    assert_eq!(err.field(), Some("search_type"));
}

#[test]
fn test_parse_filed_date_formats() {
    let expected = NaiveDate::from_ymd_opt(2019, 3, 7).unwrap();
    assert_eq!(parse_filed_date("03/07/2019", "filed_after").unwrap(), Some(expected));
    assert_eq!(parse_filed_date("2019-03-07", "filed_after").unwrap(), Some(expected));
    assert_eq!(parse_filed_date("   ", "filed_after").unwrap(), None);

    let err = parse_filed_date("last spring", "filed_before").unwrap_err();
    assert_eq!(err.field(), Some("filed_before"));
}

// -- cursor ------------------------------------------------------------------

#[test]
fn test_extract_cursor() {
    let cursor = extract_cursor(Some("https://x/?cursor=abc123&foo=bar")).unwrap();
    assert_eq!(cursor.as_str(), "abc123");

    assert!(extract_cursor(None).is_none());
    assert!(extract_cursor(Some("")).is_none());
    assert!(extract_cursor(Some("https://x/?foo=bar")).is_none());
    assert!(extract_cursor(Some("https://x/?cursor=")).is_none());
}

#[test]
fn test_extract_cursor_from_relative_links() {
    let path = extract_cursor(Some("/api/rest/v4/search/?cursor=abc123&foo=bar")).unwrap();
    assert_eq!(path.as_str(), "abc123");

    let query_only = extract_cursor(Some("?cursor=abc123")).unwrap();
    assert_eq!(query_only.as_str(), "abc123");

    assert!(extract_cursor(Some("/api/rest/v4/search/?foo=bar")).is_none());
}

#[tokio::test]
async fn test_relative_next_link_keeps_pagination_going() {
    let transport = MockTransport::new();
    transport.push_json(200, page_json(0..2, 4, Some("/api/rest/v4/search/?cursor=p2&q=foo")));
    transport.push_json(200, page_json(2..4, 4, None));
    let client = client(transport);

    let request = SearchRequest::new("foo", SearchMode::Keyword);
    let all = client.search_all_pages(&request, 10).await.unwrap();

    assert_eq!(all.results_returned(), 4);
    assert_eq!(client.transport().requests()[1].param("cursor"), Some("p2"));
}

#[test]
fn test_extract_cursor_decodes_value() {
    let cursor = extract_cursor(Some("https://x/search/?cursor=cD0xMjM%3D&q=a")).unwrap();
    assert_eq!(cursor.as_str(), "cD0xMjM=");
}

// -- search ------------------------------------------------------------------

#[tokio::test]
async fn test_search_normalizes_page() {
    let transport = MockTransport::new();
    transport.push_json(
        200,
        page_json(1..3, 42, Some("https://www.courtlistener.com/api/rest/v4/search/?cursor=next1&q=foo")),
    );
    let client = client(transport);

    let request = SearchRequest::new("foo", SearchMode::Keyword);
    let page = client.search(&request).await.unwrap();

    assert_eq!(page.count, 42);
    assert_eq!(page.results_returned(), 2);
    assert!(page.has_more());
    assert_eq!(page.next_cursor().map(Cursor::as_str), Some("next1"));
    assert!(page.pagination.prev_cursor.is_none());
    assert_eq!(page.mode, SearchMode::Keyword);
    assert_eq!(page.query, "foo");
    assert!(page.api_url.starts_with("https://www.courtlistener.com/api/rest/v4/search/?q=foo"));

    let first = &page.results[0];
    assert_eq!(first.case_name.as_deref(), Some("Case 1"));
    assert_eq!(first.snippet, "snippet 1");
    assert_eq!(first.download_url, "https://example.org/1.pdf");
    assert_eq!(first.url, "https://www.courtlistener.com/opinion/1/case-1/");
    assert_eq!(first.score_bm25, Some(12.5));
    assert_eq!(first.score_semantic, Some(0.81));
    assert_eq!(first.meta["timestamp"], "2024-01-01");
    assert_eq!(first.opinions.len(), 2);
    assert_eq!(first.opinions[0].cites, vec![1, 2]);
    assert_eq!(first.opinions[0].opinion_type.as_deref(), Some("010combined"));
}

#[tokio::test]
async fn test_search_tolerates_sparse_items() {
    let transport = MockTransport::new();
    transport.push_json(
        200,
        json!({"count": 1, "next": null, "previous": null,
               "results": [{"caseName": "Bare", "citation": null, "opinions": []}]}),
    );
    let client = client(transport);

    let page = client
        .search(&SearchRequest::new("foo", SearchMode::Semantic))
        .await
        .unwrap();

    let only = &page.results[0];
    assert_eq!(only.snippet, "");
    assert_eq!(only.download_url, "");
    assert!(only.citation.is_empty());
    assert!(only.score_bm25.is_none());
    assert_eq!(only.url, "https://www.courtlistener.com");
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_search_sends_verbatim_credential_and_timeout() {
    let transport = MockTransport::new();
    transport.push_json(200, page_json(0..0, 0, None));
    let client = client(transport);

    client
        .search(&SearchRequest::new("foo", SearchMode::Keyword))
        .await
        .unwrap();

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://www.courtlistener.com/api/rest/v4/search/");
    assert_eq!(requests[0].authorization(), Some("secret-key"));
    assert_eq!(requests[0].timeout, Duration::from_secs(30));
}

#[tokio::test]
async fn test_search_validation_happens_before_network() {
    let client = client(MockTransport::new());

    let err = client
        .search(&SearchRequest::new("", SearchMode::Keyword))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidQuery);
    assert_eq!(client.transport().request_count(), 0);
}

#[tokio::test]
async fn test_search_surfaces_bad_request_field() {
    let transport = MockTransport::new();
    transport.push_json(400, json!({"court": "bad code"}));
    let client = client(transport);

    let err = client
        .search(&SearchRequest::new("foo", SearchMode::Keyword).court("nowhere"))
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("court"));
    assert_eq!(client.transport().request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_search_waits_out_rate_limit() {
    let transport = MockTransport::new();
    transport.push_with_headers(429, &[("retry-after", "5")], "{}");
    transport.push_json(200, page_json(1..2, 1, None));
    let client = client(transport);

    let start = tokio::time::Instant::now();
    let page = client
        .search(&SearchRequest::new("foo", SearchMode::Keyword))
        .await
        .unwrap();

    assert_eq!(page.results_returned(), 1);
    assert_eq!(client.transport().request_count(), 2);
    assert!(start.elapsed() >= Duration::from_secs(5));
    assert!(start.elapsed() < Duration::from_secs(6));
}

#[tokio::test]
async fn test_search_without_rate_limit_retry() {
    let transport = MockTransport::new();
    transport.push_with_headers(429, &[("retry-after", "5")], "{}");
    let client = client(transport);

    let request = SearchRequest::new("foo", SearchMode::Keyword).retry_on_rate_limit(false);
    let err = client.search(&request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RateLimited);
    assert_eq!(err.retry_after(), Some(Duration::from_secs(5)));
    assert_eq!(client.transport().request_count(), 1);
}

#[tokio::test]
async fn test_search_unclassified_transport_failure_fails_fast() {
    let transport = MockTransport::new();
    transport.push_failure(TransportError::Other {
        message: "tls handshake".to_string(),
    });
    let client = client(transport);

    let err = client
        .search(&SearchRequest::new("foo", SearchMode::Keyword))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(client.transport().request_count(), 1);
}

#[tokio::test]
async fn test_get_next_page_replays_cursor() {
    let transport = MockTransport::new();
    transport.push_json(200, page_json(1..3, 4, Some("https://x/?cursor=c2")));
    transport.push_json(200, page_json(3..5, 4, None));
    let client = client(transport);

    let request = SearchRequest::new("foo", SearchMode::Keyword).court("scotus");
    let first = client.search(&request).await.unwrap();
    let second = client
        .get_next_page(&first, &request)
        .await
        .unwrap()
        .expect("second page");
    assert_eq!(second.results[0].cluster_id, Some(3));

    let requests = client.transport().requests();
    assert_eq!(requests[1].param("cursor"), Some("c2"));
    assert_eq!(requests[1].param("court"), Some("scotus"));

    assert!(client.get_next_page(&second, &request).await.unwrap().is_none());
    assert_eq!(client.transport().request_count(), 2);
}

// -- aggregation -------------------------------------------------------------

#[tokio::test]
async fn test_search_all_pages_requests_remaining_budget() {
    let transport = MockTransport::new();
    transport.push_json(200, page_json(0..10, 100, Some("https://x/?cursor=p2")));
    transport.push_json(200, page_json(10..15, 100, Some("https://x/?cursor=p3")));
    let client = client(transport);

    let request = SearchRequest::new("foo", SearchMode::Keyword).page_size(10);
    let all = client.search_all_pages(&request, 15).await.unwrap();

    assert_eq!(all.results_returned(), 15);
    assert_eq!(all.count, 100);
    assert_eq!(all.max_results_requested, 15);
    assert!(all.all_results_fetched);

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].param("page_size"), Some("10"));
    assert!(!requests[0].has_param("cursor"));
    assert_eq!(requests[1].param("page_size"), Some("5"));
    assert_eq!(requests[1].param("cursor"), Some("p2"));
}

#[tokio::test]
async fn test_search_all_pages_defaults_to_largest_pages() {
    let transport = MockTransport::new();
    transport.push_json(200, page_json(0..20, 100, Some("https://x/?cursor=p2")));
    transport.push_json(200, page_json(20..30, 100, Some("https://x/?cursor=p3")));
    let client = client(transport);

    let request = SearchRequest::new("foo", SearchMode::Keyword);
    let all = client.search_all_pages(&request, 30).await.unwrap();
    assert_eq!(all.results_returned(), 30);

    let requests = client.transport().requests();
    assert_eq!(requests[0].param("page_size"), Some("20"));
    assert_eq!(requests[1].param("page_size"), Some("10"));

    // A single search keeps its own default.
    assert_eq!(
        param(&request.to_params(), "page_size"),
        Some("10")
    );
}

#[tokio::test]
async fn test_search_all_pages_stops_at_end_of_chain() {
    let transport = MockTransport::new();
    transport.push_json(200, page_json(0..20, 30, Some("https://x/?cursor=p2")));
    transport.push_json(200, page_json(20..25, 30, None));
    let client = client(transport);

    let request = SearchRequest::new("foo", SearchMode::Semantic).page_size(20);
    let all = client.search_all_pages(&request, 100).await.unwrap();

    assert_eq!(all.results_returned(), 25);
    assert!(!all.all_results_fetched);
    assert_eq!(client.transport().request_count(), 2);
}

#[tokio::test]
async fn test_search_all_pages_empty_first_page() {
    let transport = MockTransport::new();
    transport.push_json(200, page_json(0..0, 0, None));
    let client = client(transport);

    let all = client
        .search_all_pages(&SearchRequest::new("foo", SearchMode::Keyword), 50)
        .await
        .unwrap();

    assert!(all.results.is_empty());
    assert_eq!(all.count, 0);
    assert!(all.all_results_fetched);
}

#[tokio::test]
async fn test_search_all_pages_propagates_page_error() {
    let transport = MockTransport::new();
    transport.push_json(200, page_json(0..10, 40, Some("https://x/?cursor=p2")));
    transport.push_json(401, json!({"detail": "Invalid token."}));
    let client = client(transport);

    let err = client
        .search_all_pages(&SearchRequest::new("foo", SearchMode::Keyword), 40)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
}

// -- lazy traversal ----------------------------------------------------------

#[tokio::test]
async fn test_pager_walks_pages_lazily() {
    let transport = MockTransport::new();
    transport.push_json(200, page_json(0..2, 3, Some("https://x/?cursor=p2")));
    transport.push_json(200, page_json(2..3, 3, None));
    let client = client(transport);

    let mut pager = client.iterate_results(SearchRequest::new("foo", SearchMode::Keyword));

    let first = pager.next().await.unwrap().unwrap();
    assert_eq!(first.cluster_id, Some(0));
    assert_eq!(pager.pages_fetched(), 1);
    assert_eq!(client.transport().request_count(), 1);

    assert_eq!(pager.next().await.unwrap().unwrap().cluster_id, Some(1));
    assert_eq!(pager.next().await.unwrap().unwrap().cluster_id, Some(2));
    assert!(pager.next().await.unwrap().is_none());
    assert!(pager.is_finished());

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].param("page_size"), Some("20"));
    assert_eq!(requests[1].param("cursor"), Some("p2"));
}

#[tokio::test]
async fn test_pager_empty_first_page() {
    let transport = MockTransport::new();
    transport.push_json(200, page_json(0..0, 0, None));
    let client = client(transport);

    let mut pager = client.iterate_results(SearchRequest::new("foo", SearchMode::Keyword));
    assert!(pager.next().await.unwrap().is_none());
    assert!(pager.next_batch().await.unwrap().is_none());
    assert_eq!(client.transport().request_count(), 1);
}

#[tokio::test]
async fn test_pager_stream_ends_after_error() {
    let transport = MockTransport::new();
    transport.push_json(200, page_json(0..2, 10, Some("https://x/?cursor=p2")));
    transport.push_json(404, json!({"detail": "gone"}));
    let client = client(transport);

    let items: Vec<_> = client
        .iterate_results(SearchRequest::new("foo", SearchMode::Keyword))
        .into_stream()
        .collect()
        .await;

    assert_eq!(items.len(), 3);
    assert!(items[0].is_ok());
    assert!(items[1].is_ok());
    assert_eq!(items[2].as_ref().unwrap_err().kind(), ErrorKind::NotFound);
}
