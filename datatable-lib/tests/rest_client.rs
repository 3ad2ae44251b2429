//! End-to-end tests of `RestClient` and the list controller against a local
//! HTTP server.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use datatable_lib::RestClient;
use datatable_lib::ResourceService;
use datatable_lib::auth::StaticTokenProvider;
use datatable_lib::error::ApiError;
use datatable_lib::error::Error;
use datatable_lib::fetch::FetchOutcome;
use datatable_lib::fetch::ListController;
use datatable_lib::fetch::ListOptions;
use datatable_lib::model::Item;
use datatable_lib::transport::QueryParams;
use datatable_lib::transport::Transport;
use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Method;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;

const TOKEN: &str = "test-token";
const USERS: usize = 5;

/// Starts the fake API and returns its base URL.
async fn start_server() -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let service = service_fn(|req: Request<Incoming>| async move {
                    Ok::<_, Infallible>(handle(req).await)
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    format!("http://{addr}/api")
}

async fn handle(req: Request<Incoming>) -> Response<Full<Bytes>> {
    let authorized = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str());
    if !authorized {
        return reply(StatusCode::UNAUTHORIZED, json!({"message": "Unauthenticated"}));
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query: Vec<(String, String)> = url::form_urlencoded::parse(
        req.uri().query().unwrap_or_default().as_bytes(),
    )
    .into_owned()
    .collect();
    let param = |name: &str| {
        query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };

    match (method, path.as_str()) {
        (Method::GET, "/api/users") => {
            let page: usize = param("page").and_then(|p| p.parse().ok()).unwrap_or(1);
            let per_page: usize = param("per_page").and_then(|p| p.parse().ok()).unwrap_or(10);
            let last_page = USERS.div_ceil(per_page).max(1);
            let data: Vec<Value> = (1..=USERS)
                .skip((page - 1) * per_page)
                .take(per_page)
                .map(|id| json!({"id": id, "name": format!("user {id}"), "q": param("q")}))
                .collect();
            reply(
                StatusCode::OK,
                json!({
                    "data": data,
                    "meta": {
                        "current_page": page,
                        "per_page": per_page,
                        "total": USERS,
                        "last_page": last_page,
                    }
                }),
            )
        }
        (Method::GET, "/api/tags") => reply(StatusCode::OK, json!({"data": [{"name": "red"}]})),
        (Method::GET, "/api/broken") => reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"message": "Database down"}),
        ),
        (Method::GET, "/api/slow") => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            reply(StatusCode::OK, json!({"data": []}))
        }
        (Method::POST, "/api/users") => {
            let body = req.into_body().collect().await.unwrap().to_bytes();
            let mut record: Value = serde_json::from_slice(&body).unwrap();
            record["id"] = json!(42);
            reply(StatusCode::CREATED, json!({"data": record}))
        }
        (Method::DELETE, "/api/users/3") => Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(Full::new(Bytes::new()))
            .unwrap(),
        _ => reply(StatusCode::NOT_FOUND, json!({"error": "not found"})),
    }
}

fn reply(status: StatusCode, body: Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn client(base_url: &str) -> RestClient {
    RestClient::builder()
        .url(base_url)
        .token_provider(StaticTokenProvider::new(TOKEN))
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap()
}

fn ids(list: &ListController) -> Vec<i64> {
    list.items()
        .iter()
        .filter_map(|item| item.get_int("id").ok().flatten())
        .collect()
}

#[tokio::test]
async fn test_paging_through_a_list() {
    let base = start_server().await;
    let list = ListController::new(
        Arc::new(client(&base)),
        ListOptions::new("/users")
            .with_page_size(2)
            .with_auto_fetch(false),
    );

    assert_eq!(
        list.fetch(QueryParams::new()).await.unwrap(),
        FetchOutcome::Replaced { count: 2 }
    );
    let state = list.state();
    assert_eq!(state.page.total_pages, 3);
    assert_eq!(state.page.total_items, 5);
    assert!(state.has_more);

    list.load_more().await.unwrap();
    list.load_more().await.unwrap();
    assert_eq!(ids(&list), vec![1, 2, 3, 4, 5]);
    assert!(!list.state().has_more);
    assert_eq!(list.load_more().await.unwrap(), FetchOutcome::Skipped);

    list.set_page(2).await.unwrap();
    assert_eq!(ids(&list), vec![3, 4]);
    assert_eq!(list.set_page(9).await.unwrap(), FetchOutcome::Skipped);
}

#[tokio::test]
async fn test_query_params_reach_server() {
    let base = start_server().await;
    let list = ListController::new(
        Arc::new(client(&base)),
        ListOptions::new("users")
            .with_auto_fetch(false)
            .with_query_params(QueryParams::new().with("q", "static")),
    );

    list.fetch(QueryParams::new().with("q", "a b&c")).await.unwrap();
    let first = list.items()[0].clone();
    assert_eq!(first.get_string("q").unwrap(), Some("a b&c"));
}

#[tokio::test]
async fn test_unpaginated_list() {
    let base = start_server().await;
    let list = ListController::new(
        Arc::new(client(&base)),
        ListOptions::new("/tags").with_auto_fetch(false),
    );

    list.fetch(QueryParams::new()).await.unwrap();
    assert_eq!(list.items().len(), 1);
    assert!(!list.state().has_more);
}

#[tokio::test]
async fn test_error_message_from_body() {
    let base = start_server().await;
    let list = ListController::new(
        Arc::new(client(&base)),
        ListOptions::new("/broken").with_auto_fetch(false),
    );

    let err = list.fetch(QueryParams::new()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(list.state().error.as_deref(), Some("Database down"));
    assert!(!list.is_loading());
}

#[tokio::test]
async fn test_generic_error_without_message() {
    let base = start_server().await;
    let list = ListController::new(
        Arc::new(client(&base)),
        ListOptions::new("/nowhere").with_auto_fetch(false),
    );

    list.fetch(QueryParams::new()).await.unwrap_err();
    assert_eq!(list.state().error.as_deref(), Some("Failed to fetch data"));
}

#[tokio::test]
async fn test_unauthorized_without_token() {
    let base = start_server().await;
    let anonymous = RestClient::builder().url(&base).build().unwrap();

    let err = anonymous.get("/users", &QueryParams::new()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("Unauthenticated"));
}

#[tokio::test]
async fn test_timeout_clears_loading() {
    let base = start_server().await;
    let list = ListController::new(
        Arc::new(client(&base)),
        ListOptions::new("/slow").with_auto_fetch(false),
    );

    let err = list.fetch(QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::Timeout(_))));
    assert!(!list.is_loading());
    assert!(list.state().error.is_some());
}

#[tokio::test]
async fn test_resource_service_writes() {
    let base = start_server().await;
    let users = ResourceService::new(Arc::new(client(&base)), "users");

    let created = users
        .create(&Item::new().set("name", "Ada"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.get_int("id").unwrap(), Some(42));
    assert_eq!(created.get_string("name").unwrap(), Some("Ada"));

    users.delete(3).await.unwrap();
    assert!(users.delete(4).await.is_err());
}
