//! Route table, handlers and error mapping.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bookhouse_store::{BranchBookCopies, BranchBookFaculties, CatalogError, CatalogStore};
use bookhouse_types::{
    Book, BookFields, BookId, Branch, BranchFields, BranchId, Faculty, FacultyId,
};
use serde_json::json;
use tracing::error;

/// Builds the HTTP API router over the given store.
pub fn build_router(store: CatalogStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/books", get(list_books).post(create_book))
        .route("/books/{book_id}", get(get_book).put(update_book))
        .route("/branches", get(list_branches).post(create_branch))
        .route("/branches/{branch_id}", get(get_branch).put(update_branch))
        .route("/faculties", get(list_faculties))
        .route(
            "/branches/{branch_id}/books/{book_id}/copies",
            get(get_copies),
        )
        .route(
            "/branches/{branch_id}/books/{book_id}/faculties",
            get(get_faculties),
        )
        .route(
            "/branches/{branch_id}/books/{book_id}/faculties/{faculty_id}",
            post(add_faculty_usage),
        )
        .with_state(store)
}

type ApiResult<T> = Result<T, ApiError>;

/// Catalog error carried through a handler, mapped to a status code at the
/// response boundary.
struct ApiError(CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => {
                error!(error = %self.0, "catalog operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

// ── Health ───────────────────────────────────────────────────────

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

// ── Books ────────────────────────────────────────────────────────

async fn list_books(State(store): State<CatalogStore>) -> ApiResult<Json<Vec<Book>>> {
    Ok(Json(store.list_books()?))
}

async fn get_book(
    State(store): State<CatalogStore>,
    Path(book_id): Path<BookId>,
) -> ApiResult<Json<Book>> {
    Ok(Json(store.get_book(book_id)?))
}

async fn create_book(
    State(store): State<CatalogStore>,
    Json(fields): Json<BookFields>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    Ok((StatusCode::CREATED, Json(store.create_book(&fields)?)))
}

async fn update_book(
    State(store): State<CatalogStore>,
    Path(book_id): Path<BookId>,
    Json(fields): Json<BookFields>,
) -> ApiResult<Json<Book>> {
    Ok(Json(store.update_book(book_id, &fields)?))
}

// ── Branches ─────────────────────────────────────────────────────

async fn list_branches(State(store): State<CatalogStore>) -> ApiResult<Json<Vec<Branch>>> {
    Ok(Json(store.list_branches()?))
}

async fn get_branch(
    State(store): State<CatalogStore>,
    Path(branch_id): Path<BranchId>,
) -> ApiResult<Json<Branch>> {
    Ok(Json(store.get_branch(branch_id)?))
}

async fn create_branch(
    State(store): State<CatalogStore>,
    Json(fields): Json<BranchFields>,
) -> ApiResult<(StatusCode, Json<Branch>)> {
    Ok((StatusCode::CREATED, Json(store.create_branch(&fields)?)))
}

async fn update_branch(
    State(store): State<CatalogStore>,
    Path(branch_id): Path<BranchId>,
    Json(fields): Json<BranchFields>,
) -> ApiResult<Json<Branch>> {
    Ok(Json(store.update_branch(branch_id, &fields)?))
}

// ── Faculties ────────────────────────────────────────────────────

async fn list_faculties(State(store): State<CatalogStore>) -> ApiResult<Json<Vec<Faculty>>> {
    Ok(Json(store.list_faculties()?))
}

// ── Catalog operations ───────────────────────────────────────────

async fn get_copies(
    State(store): State<CatalogStore>,
    Path((branch_id, book_id)): Path<(BranchId, BookId)>,
) -> ApiResult<Json<BranchBookCopies>> {
    Ok(Json(store.copies_of(branch_id, book_id)?))
}

async fn get_faculties(
    State(store): State<CatalogStore>,
    Path((branch_id, book_id)): Path<(BranchId, BookId)>,
) -> ApiResult<Json<BranchBookFaculties>> {
    Ok(Json(store.faculties_using(branch_id, book_id)?))
}

async fn add_faculty_usage(
    State(store): State<CatalogStore>,
    Path((branch_id, book_id, faculty_id)): Path<(BranchId, BookId, FacultyId)>,
) -> ApiResult<Json<BranchBookFaculties>> {
    Ok(Json(store.add_usage(branch_id, book_id, faculty_id)?))
}
