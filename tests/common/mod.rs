//! Shared fixtures for integration tests.

#![allow(dead_code)]

use caselaw::api::{HttpRequest, MockTransport};
use caselaw::config::Config;
use caselaw::search::CaseLawClient;
use serde_json::{Value, json};

pub const TOKEN: &str = "integration-token";

pub fn client(transport: MockTransport) -> CaseLawClient<MockTransport> {
    CaseLawClient::with_transport(Config::with_token(TOKEN), transport)
        .expect("client should build")
}

pub fn hit(label: &str, id: u64) -> Value {
    json!({
        "caseName": format!("{label} case {id}"),
        "caseNameFull": format!("{label} case number {id}"),
        "court": "Court of Appeals for the Ninth Circuit",
        "court_id": "ca9",
        "citation": [format!("{id} F.3d 100")],
        "citeCount": id * 3,
        "dateFiled": "2019-05-01",
        "docketNumber": format!("19-{id:04}"),
        "absolute_url": format!("/opinion/{id}/{}-case-{id}/", label.to_lowercase()),
        "cluster_id": id,
        "docket_id": id + 500,
        "syllabus": "Holding on the scope of a warrantless search.",
        "opinions": [
            {"id": id * 10, "type": "020lead", "snippet": format!("{label} snippet {id}"),
             "download_url": format!("https://storage.example.org/{id}.pdf")}
        ],
        "meta": {"score": {"bm25": 4.2, "semantic": 0.66}}
    })
}

/// Page of hits `ids`; `next_cursor` becomes a full next link when present.
pub fn page(label: &str, ids: std::ops::Range<u64>, count: u64, next_cursor: Option<&str>) -> Value {
    let next = next_cursor.map(|cursor| {
        format!("https://www.courtlistener.com/api/rest/v4/search/?cursor={cursor}&q=test&type=o")
    });
    json!({
        "count": count,
        "next": next,
        "previous": null,
        "results": ids.map(|id| hit(label, id)).collect::<Vec<_>>(),
    })
}

pub fn cursor_is(expected: &'static str) -> impl Fn(&HttpRequest) -> bool + Send + Sync + 'static {
    move |request| request.param("cursor") == Some(expected)
}

pub fn first_page(request: &HttpRequest) -> bool {
    !request.has_param("cursor")
}

pub fn is_semantic(request: &HttpRequest) -> bool {
    request.has_param("semantic")
}
