use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use ninja_browse::{
    config::BrowseConfig,
    error::{BrowseError, Result},
    query::{GraphQuery, SharedQuery},
    server::build_router,
};
use tower::ServiceExt;

enum Canned {
    Text(&'static str),
    Unknown,
    Broken,
}

/// Stand-in for ninja that answers from a fixed table and remembers what it
/// was asked.
struct CannedQuery {
    answers: HashMap<&'static str, Canned>,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl GraphQuery for CannedQuery {
    async fn query(&self, target: &str) -> Result<String> {
        self.calls.lock().unwrap().push(target.to_string());
        match self.answers.get(target) {
            Some(Canned::Text(text)) => Ok(text.to_string()),
            Some(Canned::Broken) => Err(BrowseError::query_failure(
                target,
                "ninja exited with exit status: 1: ninja: error: loading 'build.ninja'",
            )),
            Some(Canned::Unknown) | None => Err(BrowseError::UnknownTarget(target.to_string())),
        }
    }
}

fn canned() -> Arc<CannedQuery> {
    let mut answers = HashMap::new();
    answers.insert(
        "foo.o",
        Canned::Text("foo.o:\n  input: cc\n    foo.c\n    foo.h\n  output: link\n    foo\n"),
    );
    answers.insert("bar.c", Canned::Text("bar.c:\n  output: cc\n    bar.o\n"));
    answers.insert(
        "dir name/x.o",
        Canned::Text("dir name/x.o:\n  input: cc\n    dir name/x.c\n"),
    );
    answers.insert("garbage", Canned::Text("this is not query output\n"));
    answers.insert("nope", Canned::Unknown);
    answers.insert("broken", Canned::Broken);
    Arc::new(CannedQuery {
        answers,
        calls: Mutex::new(vec![]),
    })
}

fn app(query: Arc<CannedQuery>) -> Router {
    let config = Arc::new(BrowseConfig::new("ninja", "foo.o"));
    let query: SharedQuery = query;
    build_router(config, query)
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, location, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_root_redirects_to_default_target() {
    let query = canned();
    let app = app(query.clone());

    let (status, location, _) = send(&app, "GET", "/").await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("?foo.o"));

    // An empty query string is still the root page.
    let (status, location, _) = send(&app, "GET", "/?").await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("?foo.o"));

    assert!(query.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_root_redirect_ignores_headers() {
    let app = app(canned());
    let request = Request::builder()
        .uri("/")
        .header(header::ACCEPT, "application/json")
        .header(header::COOKIE, "a=b")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "?foo.o");
}

#[tokio::test]
async fn test_node_page() {
    let query = canned();
    let app = app(query.clone());

    let (status, _, body) = send(&app, "GET", "/?foo.o").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1><tt>foo.o</tt></h1>"));
    assert!(body.contains(r#"<a href="?foo.c">foo.c</a>"#));
    assert!(body.contains(r#"<a href="?foo.h">foo.h</a>"#));
    assert!(body.contains("<tt>link</tt>"));
    assert!(body.contains(r#"<a href="?foo">foo</a>"#));

    let (status, _, body) = send(&app, "GET", "/?bar.c").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("no input rule"));

    assert_eq!(*query.calls.lock().unwrap(), vec!["foo.o", "bar.c"]);
}

#[tokio::test]
async fn test_node_page_content_type() {
    let app = app(canned());
    let request = Request::builder()
        .uri("/?foo.o")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
}

#[tokio::test]
async fn test_percent_encoded_target() {
    let query = canned();
    let app = app(query.clone());

    let (status, _, body) = send(&app, "GET", "/?dir%20name/x.o").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<a href="?dir%20name/x.c">dir name/x.c</a>"#));
    assert_eq!(*query.calls.lock().unwrap(), vec!["dir name/x.o"]);
}

#[tokio::test]
async fn test_other_paths_are_not_found() {
    let query = canned();
    let app = app(query.clone());

    for uri in ["/x", "/x?foo.o", "/foo.o", "/static/style.css"] {
        let (status, _, body) = send(&app, "GET", uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(body.is_empty(), "{}", uri);
    }

    let (status, _, body) = send(&app, "HEAD", "/x").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());

    assert!(query.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_methods_are_rejected() {
    let query = canned();
    let app = app(query.clone());

    for (method, uri) in [("POST", "/"), ("PUT", "/?foo.o"), ("DELETE", "/x")] {
        let (status, _, _) = send(&app, method, uri).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
    }
    assert!(query.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_output_is_scoped_to_the_request() {
    let app = app(canned());

    let (status, _, body) = send(&app, "GET", "/?garbage").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("could not understand the query output"));
    assert!(body.contains("line 1"));

    // The router keeps answering afterwards.
    let (status, _, _) = send(&app, "GET", "/?foo.o").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_target_page() {
    let app = app(canned());

    let (status, _, body) = send(&app, "GET", "/?nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("<h1><tt>nope</tt></h1>"));
    assert!(body.contains("unknown target"));
}

#[tokio::test]
async fn test_query_failure_page() {
    let app = app(canned());

    let (status, _, body) = send(&app, "GET", "/?broken").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("query failed"));
    assert!(body.contains("loading &#39;build.ninja&#39;"));
}

#[tokio::test]
async fn test_error_page_escapes_target() {
    let app = app(canned());

    let (status, _, body) = send(&app, "GET", "/?%3Cscript%3E").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!body.contains("<script>"));
    assert!(body.contains("&lt;script&gt;"));
}
