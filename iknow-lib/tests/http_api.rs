//! End-to-end tests against a local HTTP server speaking the IKnow API.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::Mutex;

use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Method;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::header::AUTHORIZATION;
use hyper::header::CONTENT_TYPE;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;

use iknow_lib::IKnowClient;
use iknow_lib::auth::NoToken;
use iknow_lib::auth::StaticTokenProvider;
use iknow_lib::model::Comment;
use iknow_lib::thread::CommentThread;
use iknow_lib::tree::Expansion;
use iknow_lib::tree::RenderOptions;
use iknow_lib::tree::TreeController;
use iknow_lib::tree::render_tree;

#[derive(Debug, Clone)]
struct Seen {
    line: String,
    authorization: Option<String>,
    body: Option<Value>,
}

#[derive(Default)]
struct Log {
    seen: Mutex<Vec<Seen>>,
}

impl Log {
    fn lines(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|s| s.line.clone()).collect()
    }

    fn count(&self, prefix: &str) -> usize {
        self.lines().iter().filter(|l| l.starts_with(prefix)).count()
    }

    fn all(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

fn schools(range: std::ops::RangeInclusive<u32>) -> Vec<Value> {
    range
        .map(|n| json!({"id": format!("s{n}"), "name": format!("School {n}"), "description": null}))
        .collect()
}

fn reply(id: &str) -> Value {
    json!({
        "id": id,
        "content": format!("reply {id}"),
        "user": {"id": "u9", "name": "Marta"},
        "likes": 1,
        "reply_count": 0
    })
}

fn route(method: &Method, path: &str, query: &str) -> (StatusCode, Value) {
    match (method.as_str(), path, query) {
        ("GET", "/universities/", _) => (
            StatusCode::OK,
            json!({"universities": [{"id": "u1", "name": "Test University"}]}),
        ),
        ("GET", "/schools/", "university_id=u1&page=1") => (
            StatusCode::OK,
            json!({"schools": schools(1..=20), "hasMore": true}),
        ),
        ("GET", "/schools/", "university_id=u1&page=2") => (
            StatusCode::OK,
            json!({"schools": schools(21..=25)}),
        ),
        ("GET", "/departments/tree/s1", _) => (
            StatusCode::OK,
            json!({"departments": [
                {"id": "d1", "name": "Software Engineering", "years": 2, "description": "SE"}
            ]}),
        ),
        ("GET", "/departments/tree/s2", _) => (StatusCode::OK, json!({"departments": []})),
        ("GET", "/departments/tree/s3", _) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "database unavailable"}),
        ),
        ("GET", "/exams/tree", "department_id=d1&year=2&semester=1") => (
            StatusCode::OK,
            json!({"exams": [{"id": "e1", "title": "Final 2021", "file": "http://files/e1.pdf"}]}),
        ),
        ("GET", "/exams/tree", _) => (StatusCode::OK, json!({"exams": null})),
        ("GET", "/posts/comments/reply", "comment_id=c1&page=1") => (
            StatusCode::OK,
            json!({"replies": [reply("r1"), reply("r2")], "hasMore": true, "page": 1}),
        ),
        ("GET", "/posts/comments/reply", "comment_id=c1&page=2") => (
            StatusCode::OK,
            json!({"replies": [reply("r3")], "hasMore": false, "page": 2}),
        ),
        ("POST", "/posts/comments/reply", _) => (StatusCode::CREATED, json!({"reply": reply("new")})),
        _ => (StatusCode::NOT_FOUND, json!({"error": "not found"})),
    }
}

async fn handle(req: Request<Incoming>, log: &Log) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or_default().to_string();
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = req
        .into_body()
        .collect()
        .await
        .map(|b| b.to_bytes())
        .unwrap_or_default();

    let line = if query.is_empty() {
        format!("{method} {path}")
    } else {
        format!("{method} {path}?{query}")
    };
    log.seen.lock().unwrap().push(Seen {
        line,
        authorization,
        body: serde_json::from_slice(&body).ok(),
    });

    let (status, json) = route(&method, &path, &query);
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(json.to_string())))
        .unwrap()
}

async fn spawn_server() -> (String, Arc<Log>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = Arc::new(Log::default());

    let server_log = log.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let log = server_log.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let log = log.clone();
                    async move { Ok::<_, Infallible>(handle(req, &log).await) }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    (format!("http://{addr}"), log)
}

async fn client_with_token() -> (IKnowClient, Arc<Log>) {
    let (url, log) = spawn_server().await;
    let client = IKnowClient::builder()
        .url(url)
        .token_provider(StaticTokenProvider::new("secret"))
        .build()
        .unwrap();
    (client, log)
}

async fn expand(tree: &TreeController, id: &str) -> Expansion {
    let node = tree.find(id).unwrap_or_else(|| panic!("node {id} not visible"));
    tree.expand(&node).await
}

#[tokio::test]
async fn test_roots_and_paged_schools() {
    let (client, log) = client_with_token().await;
    let tree = TreeController::new(client);

    assert_eq!(tree.initialize().await, 1);
    assert_eq!(tree.roots()[0].name, "Test University");

    assert_eq!(expand(&tree, "u1").await, Expansion::Expanded);
    let schools = tree.children("u1").unwrap();
    assert_eq!(schools.len(), 25);
    assert_eq!(schools[24].id, "s25");
    assert_eq!(log.count("GET /schools/"), 2);

    assert!(
        log.all()
            .iter()
            .all(|s| s.authorization.as_deref() == Some("Bearer secret"))
    );
}

#[tokio::test]
async fn test_collapse_and_reexpand_does_not_refetch() {
    let (client, log) = client_with_token().await;
    let tree = TreeController::new(client);
    tree.initialize().await;

    expand(&tree, "u1").await;
    assert_eq!(expand(&tree, "u1").await, Expansion::Collapsed);
    assert_eq!(expand(&tree, "u1").await, Expansion::Expanded);

    assert_eq!(log.count("GET /schools/"), 2);
}

#[tokio::test]
async fn test_walk_down_to_materials() {
    let (client, log) = client_with_token().await;
    let tree = TreeController::new(client);
    tree.initialize().await;

    expand(&tree, "u1").await;
    expand(&tree, "s1").await;
    expand(&tree, "d1").await;
    assert_eq!(tree.children("d1").unwrap().len(), 2);

    expand(&tree, "d1-year2").await;
    expand(&tree, "d1-year2-sem1").await;
    let materials = tree.children("d1-year2-sem1").unwrap();
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0].name, "Final 2021");
    assert_eq!(materials[0].url(), Some("http://files/e1.pdf"));
    assert_eq!(
        log.count("GET /exams/tree?department_id=d1&year=2&semester=1"),
        1
    );

    // year and semester levels are synthesized locally
    assert_eq!(log.count("GET /exams/tree"), 1);
    assert_eq!(log.count("GET /departments/"), 1);

    expand(&tree, "d1-year2-sem2").await;
    assert!(tree.children("d1-year2-sem2").unwrap().is_empty());
    assert!(!tree.state("d1-year2-sem2").children().unwrap().is_failed());

    let text = render_tree(&tree.snapshot(), &RenderOptions::default());
    assert!(text.contains("Final 2021  [download] [read] http://files/e1.pdf"));
}

#[tokio::test]
async fn test_empty_and_failed_departments() {
    let (client, _log) = client_with_token().await;
    let tree = TreeController::new(client);
    tree.initialize().await;
    expand(&tree, "u1").await;

    expand(&tree, "s2").await;
    let empty = tree.state("s2");
    assert!(empty.children().unwrap().is_empty());
    assert!(!empty.children().unwrap().is_failed());

    assert_eq!(expand(&tree, "s3").await, Expansion::Expanded);
    let failed = tree.state("s3");
    let children = failed.children().unwrap();
    assert!(children.is_empty());
    assert_eq!(children.error().unwrap().status_code(), Some(500));

    let text = render_tree(&tree.snapshot(), &RenderOptions::default());
    assert!(text.contains("School 3  (failed to load)"));
}

#[tokio::test]
async fn test_no_token_omits_header() {
    let (url, log) = spawn_server().await;
    let client = IKnowClient::builder()
        .url(url)
        .token_provider(NoToken)
        .build()
        .unwrap();

    let universities = client.universities().await.unwrap();
    assert_eq!(universities.len(), 1);
    assert_eq!(log.all()[0].authorization, None);
}

#[tokio::test]
async fn test_unreachable_server_yields_empty_tree() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = IKnowClient::builder()
        .url(format!("http://{addr}"))
        .token_provider(NoToken)
        .build()
        .unwrap();
    let tree = TreeController::new(client);

    assert_eq!(tree.initialize().await, 0);
    assert!(tree.is_initialized());
    assert_eq!(
        render_tree(&tree.snapshot(), &RenderOptions::default()),
        "No universities found.\n"
    );
}

#[tokio::test]
async fn test_reply_thread() {
    let (client, log) = client_with_token().await;
    let thread = CommentThread::new(client, "p1");
    let comment: Comment =
        serde_json::from_value(json!({"id": "c1", "content": "question", "reply_count": 3}))
            .unwrap();

    assert!(thread.toggle_replies(&comment).await);
    assert_eq!(thread.replies("c1").len(), 2);
    assert_eq!(thread.load_more(&comment).await, 3);
    assert!(!thread.state("c1").unwrap().has_more);

    thread.post_reply(&comment, "thanks").await.unwrap();
    let replies = thread.replies("c1");
    assert_eq!(replies[0].id, "new");
    assert_eq!(replies[0].author(), "Marta");
    assert_eq!(thread.state("c1").unwrap().reply_count, 4);

    let posted = log
        .all()
        .into_iter()
        .find(|s| s.line.starts_with("POST"))
        .and_then(|s| s.body)
        .unwrap();
    assert_eq!(
        posted,
        json!({"post_id": "p1", "parent_comment_id": "c1", "content": "thanks"})
    );
}
