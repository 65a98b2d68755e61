use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, QueryBuilder};

use super::StoreError;

/// The persisted bookmark record. `id` is assigned by the database and never
/// client-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub rating: String,
    pub description: String,
}

/// A validated bookmark ready for insertion.
#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub rating: String,
    pub description: String,
}

/// Partial update: only the fields present in the request body are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub rating: Option<String>,
    pub description: Option<String>,
}

impl BookmarkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.rating.is_none()
            && self.description.is_none()
    }

    /// At least one supplied field carries a non-empty value.
    pub fn has_truthy_field(&self) -> bool {
        [&self.title, &self.url, &self.rating, &self.description]
            .iter()
            .any(|field| field.as_deref().is_some_and(|value| !value.is_empty()))
    }
}

/// Operation set against the bookmarks table. Handlers only ever talk to this
/// trait, so tests can substitute an in-memory fake.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Bookmark>, StoreError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>, StoreError>;
    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark, StoreError>;
    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError>;
    async fn update_by_id(&self, id: i64, patch: BookmarkPatch) -> Result<u64, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS bookmarks (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    rating TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT ''
)";

/// Apply the bookmarks table schema if it is not present yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(SCHEMA).execute(pool).await?;
    Ok(())
}

pub struct PgBookmarkStore {
    pool: PgPool,
}

impl PgBookmarkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookmarkStore for PgBookmarkStore {
    async fn list_all(&self) -> Result<Vec<Bookmark>, StoreError> {
        let bookmarks =
            sqlx::query_as::<_, Bookmark>("SELECT id, title, url, rating, description FROM bookmarks")
                .fetch_all(&self.pool)
                .await?;
        Ok(bookmarks)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>, StoreError> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            "SELECT id, title, url, rating, description FROM bookmarks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(bookmark)
    }

    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark, StoreError> {
        let stored = sqlx::query_as::<_, Bookmark>(
            "INSERT INTO bookmarks (title, url, rating, description)
             VALUES ($1, $2, $3, $4)
             RETURNING id, title, url, rating, description",
        )
        .bind(&bookmark.title)
        .bind(&bookmark.url)
        .bind(&bookmark.rating)
        .bind(&bookmark.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_by_id(&self, id: i64, patch: BookmarkPatch) -> Result<u64, StoreError> {
        if patch.is_empty() {
            return Ok(0);
        }

        let mut query = QueryBuilder::new("UPDATE bookmarks SET ");
        {
            let mut fields = query.separated(", ");
            if let Some(title) = &patch.title {
                fields.push("title = ").push_bind_unseparated(title);
            }
            if let Some(url) = &patch.url {
                fields.push("url = ").push_bind_unseparated(url);
            }
            if let Some(rating) = &patch.rating {
                fields.push("rating = ").push_bind_unseparated(rating);
            }
            if let Some(description) = &patch.description {
                fields.push("description = ").push_bind_unseparated(description);
            }
        }
        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
