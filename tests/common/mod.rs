use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use bookmarks_api::app::{app, AppContext};
use bookmarks_api::config::{AppConfig, DatabaseConfig, Environment, SecurityConfig, ServerConfig};
use bookmarks_api::database::bookmarks::{
    Bookmark, BookmarkPatch, BookmarkStore, NewBookmark,
};
use bookmarks_api::database::StoreError;

pub const TEST_TOKEN: &str = "test-api-token";

/// In-memory stand-in for the Postgres store so the router can be exercised
/// without a database.
pub struct MemoryStore {
    rows: Mutex<Vec<Bookmark>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn seeded(bookmarks: Vec<Bookmark>) -> Self {
        let next = bookmarks.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        Self {
            rows: Mutex::new(bookmarks),
            next_id: AtomicI64::new(next),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl BookmarkStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Bookmark>, StoreError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>, StoreError> {
        Ok(self.rows.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark, StoreError> {
        let stored = Bookmark {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: bookmark.title,
            url: bookmark.url,
            rating: bookmark.rating,
            description: bookmark.description,
        };
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| b.id != id);
        Ok((before - rows.len()) as u64)
    }

    async fn update_by_id(&self, id: i64, patch: BookmarkPatch) -> Result<u64, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|b| b.id == id) {
            Some(row) => {
                if let Some(title) = patch.title {
                    row.title = title;
                }
                if let Some(url) = patch.url {
                    row.url = url;
                }
                if let Some(rating) = patch.rating {
                    row.rating = rating;
                }
                if let Some(description) = patch.description {
                    row.description = description;
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub fn test_app() -> (Router, Arc<MemoryStore>) {
    test_app_with(MemoryStore::new())
}

pub fn test_app_with(store: MemoryStore) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(store);
    let config = AppConfig {
        environment: Environment::Development,
        server: ServerConfig { port: 0 },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            connect_timeout_secs: 1,
        },
        security: SecurityConfig {
            api_token: TEST_TOKEN.to_string(),
        },
    };
    let ctx = AppContext {
        config: Arc::new(config),
        store: store.clone(),
    };
    (app(ctx), store)
}

pub fn sample_bookmarks() -> Vec<Bookmark> {
    vec![
        Bookmark {
            id: 1,
            title: "Thinkful".to_string(),
            url: "https://www.thinkful.com".to_string(),
            rating: "5".to_string(),
            description: "Think outside the classroom".to_string(),
        },
        Bookmark {
            id: 2,
            title: "Google".to_string(),
            url: "https://www.google.com".to_string(),
            rating: "4".to_string(),
            description: "Where we find everything else".to_string(),
        },
        Bookmark {
            id: 3,
            title: "MDN".to_string(),
            url: "https://developer.mozilla.org".to_string(),
            rating: "5".to_string(),
            description: String::new(),
        },
    ]
}

fn authed(builder: axum::http::request::Builder) -> axum::http::request::Builder {
    builder.header(header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN))
}

pub fn get(path: &str) -> Request<Body> {
    authed(Request::builder().method("GET").uri(path))
        .body(Body::empty())
        .unwrap()
}

pub fn delete(path: &str) -> Request<Body> {
    authed(Request::builder().method("DELETE").uri(path))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(path: &str, body: Value) -> Request<Body> {
    authed(Request::builder().method("POST").uri(path))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn patch_json(path: &str, body: Value) -> Request<Body> {
    authed(Request::builder().method("PATCH").uri(path))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn unauthed(method: &str, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

pub fn unauthed_json(method: &str, path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
