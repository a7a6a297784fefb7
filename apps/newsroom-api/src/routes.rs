use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use newsroom_domain::{Bookmark, InteractionKind};
use newsroom_service::{
	ArticleStoreSummary, DailyResponse, Error as ServiceError, QueryConfigView, QueryRequest,
	QueryResponse, RetentionReport, StoreArticleRequest, StoreArticleResponse,
};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
	pub input: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KeywordsResponse {
	pub keywords: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InteractionResponse {
	pub credited_tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InterestsResponse {
	pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddBookmarkRequest {
	#[serde(default)]
	pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookmarkAddResponse {
	pub added: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookmarksResponse {
	pub bookmarks: Vec<Bookmark>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
	pub deleted: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTagsRequest {
	pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
		Self { status, error_code, message: message.into() }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let message = err.to_string();

		match err {
			ServiceError::InvalidRequest { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			ServiceError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, "not_found", message),
			ServiceError::Protocol(_) => Self::new(StatusCode::BAD_GATEWAY, "protocol_error", message),
			ServiceError::CollaboratorUnavailable { .. } =>
				Self::new(StatusCode::BAD_GATEWAY, "collaborator_unavailable", message),
			ServiceError::Timeout { .. } =>
				Self::new(StatusCode::GATEWAY_TIMEOUT, "timeout", message),
			ServiceError::Storage { .. } => {
				tracing::error!(error = %message, "Storage failure.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code.to_string(), message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/query", post(query))
		.route("/api/daily_news/{user_id}/{workspace_id}", get(daily_news))
		.route("/api/keywords", post(keywords))
		.route("/api/click_article/{user_id}/{workspace_id}/{article_id}", post(click_article))
		.route("/api/interests", delete(clear_interests))
		.route("/api/interests/workspace/{workspace_id}", delete(reset_workspace_interests))
		.route("/api/interests/{user_id}/{workspace_id}", get(interests))
		.route("/api/bookmarks/{user_id}/{workspace_id}", get(list_bookmarks))
		.route("/api/bookmark/id/{bookmark_id}", delete(delete_bookmark))
		.route(
			"/api/bookmark/{user_id}/{workspace_id}/{article_id}",
			post(add_bookmark).delete(delete_bookmark_by_article),
		)
		.route("/api/bookmark/all/{user_id}/{workspace_id}", delete(delete_all_bookmarks))
		.route("/api/articles", post(store_article))
		.route("/api/articles/{article_id}/tags", put(update_article_tags))
		.route("/api/config", get(config))
		.route("/api/database/summary", get(database_summary))
		.route("/api/database/reset", post(reset_database))
		.route("/api/database/clear_old", post(clear_old_articles))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn query(
	State(state): State<AppState>,
	Json(payload): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
	let response = state.service.generate_response(payload).await?;

	Ok(Json(response))
}

async fn daily_news(
	State(state): State<AppState>,
	Path((user_id, workspace_id)): Path<(String, String)>,
) -> Result<Json<DailyResponse>, ApiError> {
	let response = state.service.daily_recommendation(&user_id, &workspace_id).await?;

	Ok(Json(response))
}

async fn keywords(
	State(state): State<AppState>,
	Json(payload): Json<KeywordsRequest>,
) -> Result<Json<KeywordsResponse>, ApiError> {
	if payload.input.trim().is_empty() {
		return Err(ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", "input is required."));
	}

	let keywords = state.service.generate_keywords(&payload.input).await;

	Ok(Json(KeywordsResponse { keywords }))
}

async fn click_article(
	State(state): State<AppState>,
	Path((user_id, workspace_id, article_id)): Path<(String, String, String)>,
) -> Result<Json<InteractionResponse>, ApiError> {
	let credited_tags = state
		.service
		.interact_with_article(&article_id, &user_id, &workspace_id, InteractionKind::Click)
		.await?;

	Ok(Json(InteractionResponse { credited_tags }))
}

async fn interests(
	State(state): State<AppState>,
	Path((user_id, workspace_id)): Path<(String, String)>,
) -> Result<Json<InterestsResponse>, ApiError> {
	let tags = state.service.interests(&user_id, &workspace_id).await?;

	Ok(Json(InterestsResponse { tags }))
}

async fn reset_workspace_interests(
	State(state): State<AppState>,
	Path(workspace_id): Path<String>,
) -> Result<StatusCode, ApiError> {
	state.service.reset_workspace_interests(&workspace_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn clear_interests(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
	state.service.clear_interests().await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn add_bookmark(
	State(state): State<AppState>,
	Path((user_id, workspace_id, article_id)): Path<(String, String, String)>,
	payload: Option<Json<AddBookmarkRequest>>,
) -> Result<Json<BookmarkAddResponse>, ApiError> {
	let note = payload.and_then(|Json(body)| body.note);
	let added = state
		.service
		.add_bookmark(&article_id, &user_id, &workspace_id, note.as_deref())
		.await?;

	Ok(Json(BookmarkAddResponse { added }))
}

async fn list_bookmarks(
	State(state): State<AppState>,
	Path((user_id, workspace_id)): Path<(String, String)>,
) -> Result<Json<BookmarksResponse>, ApiError> {
	let bookmarks = state.service.list_bookmarks(&user_id, &workspace_id).await?;

	Ok(Json(BookmarksResponse { bookmarks }))
}

async fn delete_bookmark(
	State(state): State<AppState>,
	Path(bookmark_id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
	let deleted = state.service.delete_bookmark(bookmark_id).await?;

	Ok(Json(DeleteResponse { deleted: u64::from(deleted) }))
}

async fn delete_bookmark_by_article(
	State(state): State<AppState>,
	Path((user_id, workspace_id, article_id)): Path<(String, String, String)>,
) -> Result<Json<DeleteResponse>, ApiError> {
	let deleted =
		state.service.delete_bookmark_by_article(&article_id, &user_id, &workspace_id).await?;

	Ok(Json(DeleteResponse { deleted: u64::from(deleted) }))
}

async fn delete_all_bookmarks(
	State(state): State<AppState>,
	Path((user_id, workspace_id)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>, ApiError> {
	let deleted = state.service.delete_all_bookmarks(&user_id, &workspace_id).await?;

	Ok(Json(DeleteResponse { deleted }))
}

async fn store_article(
	State(state): State<AppState>,
	Json(payload): Json<StoreArticleRequest>,
) -> Result<(StatusCode, Json<StoreArticleResponse>), ApiError> {
	let response = state.service.store_article(payload).await?;
	let status = if response.inserted { StatusCode::CREATED } else { StatusCode::OK };

	Ok((status, Json(response)))
}

async fn update_article_tags(
	State(state): State<AppState>,
	Path(article_id): Path<String>,
	Json(payload): Json<UpdateTagsRequest>,
) -> Result<StatusCode, ApiError> {
	state.service.update_article_tags(&article_id, payload.tags).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn config(State(state): State<AppState>) -> Json<QueryConfigView> {
	Json(state.service.query_config())
}

async fn database_summary(
	State(state): State<AppState>,
) -> Result<Json<ArticleStoreSummary>, ApiError> {
	Ok(Json(state.service.article_store_summary().await?))
}

async fn reset_database(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
	state.service.reset_article_store().await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn clear_old_articles(
	State(state): State<AppState>,
) -> Result<Json<RetentionReport>, ApiError> {
	Ok(Json(state.service.clear_old_articles().await?))
}
