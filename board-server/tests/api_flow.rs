//! Router-level flows against the in-memory store

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use board_server::api::build_app;
use board_server::auth::create_token;
use board_server::db::MemoryStore;
use board_server::notify::LogNotifier;
use board_server::{AppState, Config};
use shared::live::LiveMessage;
use shared::models::{Board, Column, VisibleField};

const OWNER: &str = "owner-1";

struct TestApp {
    app: Router,
    state: AppState,
    token: String,
}

fn board(id: i64, is_public: bool) -> Board {
    Board {
        id,
        owner_id: OWNER.into(),
        name: format!("Board {id}"),
        is_public,
        visible_columns: vec![Column::Now, Column::Next, Column::Release],
        visible_fields: vec![VisibleField::Description, VisibleField::ThumbsUp],
        created_at: 0,
    }
}

fn setup() -> TestApp {
    let config = Config::default();
    let store = Arc::new(MemoryStore::new());
    store.insert_board(board(1, true));
    store.insert_board(board(2, false));

    let state = AppState::with_store(&config, store, Arc::new(LogNotifier));
    let token = create_token(OWNER, &config.jwt_secret, chrono::Duration::hours(1)).unwrap();
    TestApp {
        app: build_app(state.clone()),
        state,
        token,
    }
}

impl TestApp {
    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "198.51.100.20")
            .header("x-client-id", "tab-a");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn owner(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.call(method, uri, Some(self.token.as_str()), body).await
    }

    async fn create(&self, one_liner: &str, column: Option<&str>) -> Value {
        let mut body = json!({ "oneLiner": one_liner });
        if let Some(column) = column {
            body["column"] = json!(column);
        }
        let (status, json) = self.owner("POST", "/api/boards/1/ideas", Some(body)).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        json["data"].clone()
    }
}

#[tokio::test]
async fn health_is_public() {
    let app = setup();
    let (status, json) = app.call("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn create_on_empty_board_lands_in_parking_at_one() {
    let app = setup();
    let idea = app.create("Dark mode", None).await;
    assert_eq!(idea["column"], "parking");
    assert_eq!(idea["position"], 1);
    assert_eq!(idea["status"], "active");
    assert_eq!(idea["inProgress"], false);
}

#[tokio::test]
async fn owner_routes_require_a_token() {
    let app = setup();
    let (status, json) = app
        .call("POST", "/api/boards/1/ideas", None, Some(json!({ "oneLiner": "x" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], 1001);

    let (status, _) = app
        .call("GET", "/api/boards/1/ideas", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn other_users_get_permission_denied() {
    let app = setup();
    let idea = app.create("Dark mode", None).await;
    let stranger =
        create_token("someone-else", &Config::default().jwt_secret, chrono::Duration::hours(1))
            .unwrap();

    let uri = format!("/api/ideas/{}/position", idea["id"]);
    let (status, json) = app
        .call("PUT", &uri, Some(&stranger), Some(json!({ "column": "now", "position": 1 })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], 2001);
}

#[tokio::test]
async fn invalid_column_and_status_are_rejected() {
    let app = setup();
    let idea = app.create("Dark mode", None).await;

    let uri = format!("/api/ideas/{}/position", idea["id"]);
    let (status, json) = app
        .owner("PUT", &uri, Some(json!({ "column": "backlog", "position": 1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 4101);

    let uri = format!("/api/ideas/{}/status", idea["id"]);
    let (status, json) = app.owner("PUT", &uri, Some(json!({ "status": "paused" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 4102);
}

#[tokio::test]
async fn moving_to_parking_clears_in_progress() {
    let app = setup();
    let idea = app.create("Dark mode", Some("now")).await;
    let id = idea["id"].clone();

    let (_, json) = app
        .owner("PUT", &format!("/api/ideas/{id}/status"), Some(json!({ "inProgress": true })))
        .await;
    assert_eq!(json["data"]["inProgress"], true);

    let (status, json) = app
        .owner(
            "PUT",
            &format!("/api/ideas/{id}/position"),
            Some(json!({ "column": "parking", "position": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["column"], "parking");
    assert_eq!(json["data"]["inProgress"], false);
}

#[tokio::test]
async fn done_moves_to_release_and_broadcasts_once() {
    let app = setup();
    let idea = app.create("Dark mode", Some("now")).await;
    let id = idea["id"].as_i64().unwrap();
    app.owner("PUT", &format!("/api/ideas/{id}/status"), Some(json!({ "inProgress": true })))
        .await;

    let mut sub = app.state.hub.register(1).unwrap();
    let (status, json) = app
        .owner("PUT", &format!("/api/ideas/{id}/status"), Some(json!({ "status": "done" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["column"], "release");
    assert_eq!(json["data"]["status"], "done");
    assert_eq!(json["data"]["inProgress"], false);

    match sub.recv().await.unwrap() {
        LiveMessage::StatusUpdate(event) => {
            assert_eq!(event.idea_id, id);
            assert_eq!(event.column, Column::Release);
            assert_eq!(event.origin.as_deref(), Some("tab-a"));
        }
        other => panic!("unexpected {other:?}"),
    }
    // Nothing else was published for this change
    app.state.hub.publish(1, LiveMessage::Pong);
    assert_eq!(sub.recv().await.unwrap(), LiveMessage::Pong);
}

#[tokio::test]
async fn concurrent_drags_into_the_same_slot_both_succeed() {
    let app = setup();
    let a = app.create("A", None).await;
    let b = app.create("B", None).await;
    let body = json!({ "column": "next", "position": 1 });

    let uri_a = format!("/api/ideas/{}/position", a["id"]);
    let uri_b = format!("/api/ideas/{}/position", b["id"]);
    let ((sa, ja), (sb, jb)) = tokio::join!(
        app.owner("PUT", &uri_a, Some(body.clone())),
        app.owner("PUT", &uri_b, Some(body.clone())),
    );
    assert_eq!((sa, sb), (StatusCode::OK, StatusCode::OK));
    assert_eq!(ja["data"]["position"], 1);
    assert_eq!(jb["data"]["position"], 1);

    let (_, json) = app.owner("GET", "/api/boards/1/ideas", None).await;
    let next: Vec<&Value> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| i["column"] == "next")
        .collect();
    assert_eq!(next.len(), 2);
}

#[tokio::test]
async fn public_read_hides_columns_and_rice() {
    let app = setup();
    app.create("Parked", None).await;
    let shown = app.create("Shipping now", Some("now")).await;

    let (status, json) = app.call("GET", "/api/public/boards/1/ideas", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let ideas = json["data"].as_array().unwrap();
    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0]["id"], shown["id"]);
    assert_eq!(ideas[0]["oneLiner"], "Shipping now");
    assert!(ideas[0].get("riceScore").is_none());
    assert!(ideas[0].get("valueStatement").is_none());
    assert_eq!(ideas[0]["thumbsUp"], 0);

    let (status, json) = app.call("GET", "/api/public/boards/2/ideas", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], 4002);
}

#[tokio::test]
async fn public_feedback_is_throttled() {
    let app = setup();
    let idea = app.create("Dark mode", Some("now")).await;
    let id = &idea["id"];

    let uri = format!("/api/public/ideas/{id}/thumbs-up");
    let (status, json) = app.call("POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["thumbsUp"], 1);

    let (status, json) = app.call("POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["code"], 5002);

    let uri = format!("/api/public/ideas/{id}/reactions");
    let (status, json) = app.call("POST", &uri, None, Some(json!({ "emoji": "🦀" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 5001);

    let (status, json) = app.call("POST", &uri, None, Some(json!({ "emoji": "🚀" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], json!([{ "emoji": "🚀", "count": 1 }]));
}

#[tokio::test]
async fn public_feedback_only_reaches_visible_ideas() {
    let app = setup();
    let parked = app.create("Parked", None).await;
    let id = &parked["id"];

    let uri = format!("/api/public/ideas/{id}/thumbs-up");
    let (status, json) = app.call("POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], 4001);

    let uri = format!("/api/public/ideas/{id}/reactions");
    let (status, _) = app.call("POST", &uri, None, Some(json!({ "emoji": "🚀" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Moving it into view opens it, with no throttle charged by the misses
    app.owner(
        "PUT",
        &format!("/api/ideas/{id}/position"),
        Some(json!({ "column": "next", "position": 1 })),
    )
    .await;
    let uri = format!("/api/public/ideas/{id}/thumbs-up");
    let (status, json) = app.call("POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["thumbsUp"], 1);
}

#[tokio::test]
async fn delete_removes_the_idea() {
    let app = setup();
    let idea = app.create("Dark mode", None).await;
    let uri = format!("/api/ideas/{}", idea["id"]);

    let (status, _) = app.owner("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app.owner("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], 4001);
}
