use axum::extract::{OriginalUri, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::app::AppContext;
use crate::database::bookmarks::{Bookmark, BookmarkPatch, NewBookmark};
use crate::error::ApiError;
use crate::sanitize::sanitize_bookmark;

const EXPECTED_RATINGS: [&str; 5] = ["1", "2", "3", "4", "5"];

/// Create request body. Required fields stay optional here so validation can
/// report exactly which one is missing.
#[derive(Debug, Deserialize)]
pub struct NewBookmarkBody {
    title: Option<String>,
    url: Option<String>,
    rating: Option<String>,
    description: Option<String>,
}

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/bookmarks", get(list).post(create))
        .route("/bookmarks/:id", get(show).delete(remove).patch(update))
}

/// GET /bookmarks - list every stored bookmark
async fn list(State(ctx): State<AppContext>) -> Result<Json<Vec<Bookmark>>, ApiError> {
    let bookmarks = ctx
        .store
        .list_all()
        .await
        .map_err(|e| ApiError::storage(e, &ctx.config.environment))?;
    Ok(Json(bookmarks.into_iter().map(sanitize_bookmark).collect()))
}

/// POST /bookmarks - create a bookmark, answering 201 with a Location header
/// pointing at the new record
async fn create(
    State(ctx): State<AppContext>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<NewBookmarkBody>,
) -> Result<Response, ApiError> {
    let draft = validate_new(body)?;

    let created = ctx
        .store
        .insert(draft)
        .await
        .map_err(|e| ApiError::storage(e, &ctx.config.environment))?;

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(sanitize_bookmark(created)),
    )
        .into_response())
}

/// GET /bookmarks/:id
async fn show(State(ctx): State<AppContext>, Path(id): Path<i64>) -> Result<Json<Bookmark>, ApiError> {
    let bookmark = resolve_bookmark(&ctx, id).await?;
    Ok(Json(sanitize_bookmark(bookmark)))
}

/// DELETE /bookmarks/:id
async fn remove(State(ctx): State<AppContext>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    resolve_bookmark(&ctx, id).await?;
    ctx.store
        .delete_by_id(id)
        .await
        .map_err(|e| ApiError::storage(e, &ctx.config.environment))?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /bookmarks/:id - apply the supplied subset of fields
async fn update(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
    Json(patch): Json<BookmarkPatch>,
) -> Result<StatusCode, ApiError> {
    resolve_bookmark(&ctx, id).await?;

    if !patch.has_truthy_field() {
        tracing::error!("empty patch for bookmark {}", id);
        return Err(ApiError::EmptyPatch);
    }

    ctx.store
        .update_by_id(id, patch)
        .await
        .map_err(|e| ApiError::storage(e, &ctx.config.environment))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Id-resolution step shared by every verb on /bookmarks/:id: look the record
/// up and short-circuit with 404 before any verb-specific logic runs.
async fn resolve_bookmark(ctx: &AppContext, id: i64) -> Result<Bookmark, ApiError> {
    let found = ctx
        .store
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::storage(e, &ctx.config.environment))?;
    found.ok_or_else(|| {
        tracing::error!("bookmark {} not found", id);
        ApiError::bookmark_not_found()
    })
}

fn validate_new(body: NewBookmarkBody) -> Result<NewBookmark, ApiError> {
    let NewBookmarkBody {
        title,
        url,
        rating,
        description,
    } = body;

    let title = require_field("title", title)?;
    let url = require_field("url", url)?;
    let rating = require_field("rating", rating)?;

    if !EXPECTED_RATINGS.contains(&rating.as_str()) {
        tracing::error!("invalid rating: {}", rating);
        return Err(ApiError::InvalidRating);
    }

    Ok(NewBookmark {
        title,
        url,
        rating,
        description: description.unwrap_or_default(),
    })
}

fn require_field(name: &'static str, value: Option<String>) -> Result<String, ApiError> {
    value.ok_or_else(|| {
        tracing::error!("{} is required", name);
        ApiError::MissingField(name)
    })
}
