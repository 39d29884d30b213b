use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use helpdesk_service::{
	AddKnowledgeRequest, AddKnowledgeResponse, CreateQueryRequest, CreateQueryResponse,
	Error as ServiceError, QueryRequestRecord, ResolvedQueriesResponse, SearchRequest,
	SearchResponse,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/knowledge/search-query", get(search_query))
		.route("/v1/knowledge/add-knowledge", post(add_knowledge))
		.route("/v1/knowledge/resolved-queries", get(resolved_queries))
		.route("/v1/requests/create-query", post(create_query))
		.route("/v1/requests/get-query", get(get_query))
		.route("/v1/requests/get-all-queries", get(get_all_queries))
		.route("/v1/requests/pending-query", get(pending_queries))
		.route("/v1/requests/resolve-query", post(resolve_query))
		.route("/v1/requests/delete-query", delete(delete_query))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Deserialize)]
struct SearchParams {
	#[serde(default)]
	query: String,
}

async fn search_query(
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(SearchRequest { query: params.query }).await?;

	Ok(Json(response))
}

async fn add_knowledge(
	State(state): State<AppState>,
	Json(payload): Json<AddKnowledgeRequest>,
) -> Result<(StatusCode, Json<AddKnowledgeResponse>), ApiError> {
	let response = state.service.add_knowledge(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn resolved_queries(
	State(state): State<AppState>,
) -> Result<Json<ResolvedQueriesResponse>, ApiError> {
	let response = state.service.resolved_queries().await?;

	Ok(Json(response))
}

async fn create_query(
	State(state): State<AppState>,
	Json(payload): Json<CreateQueryRequest>,
) -> Result<(StatusCode, Json<CreateQueryResponse>), ApiError> {
	let response = state.service.create_query(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Debug, Deserialize)]
struct QueryIdParams {
	query_id: Option<Uuid>,
}

async fn get_query(
	State(state): State<AppState>,
	Query(params): Query<QueryIdParams>,
) -> Result<Json<QueryRequestRecord>, ApiError> {
	let query_id = require_query_id(params)?;
	let response = state.service.get_query(query_id).await?;

	Ok(Json(response))
}

async fn get_all_queries(
	State(state): State<AppState>,
) -> Result<Json<Vec<QueryRequestRecord>>, ApiError> {
	let response = state.service.all_queries().await?;

	Ok(Json(response))
}

async fn pending_queries(
	State(state): State<AppState>,
) -> Result<Json<Vec<QueryRequestRecord>>, ApiError> {
	let response = state.service.pending_queries().await?;

	Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct ResolveQueryBody {
	query_id: Option<Uuid>,
}

async fn resolve_query(
	State(state): State<AppState>,
	Json(payload): Json<ResolveQueryBody>,
) -> Result<Json<QueryRequestRecord>, ApiError> {
	let Some(query_id) = payload.query_id else {
		return Err(ApiError::bad_request("Query ID is required."));
	};
	let response = state.service.resolve_query(query_id).await?;

	Ok(Json(response))
}

async fn delete_query(
	State(state): State<AppState>,
	Query(params): Query<QueryIdParams>,
) -> Result<StatusCode, ApiError> {
	let query_id = require_query_id(params)?;

	state.service.delete_query(query_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

fn require_query_id(params: QueryIdParams) -> Result<Uuid, ApiError> {
	params.query_id.ok_or_else(|| ApiError::bad_request("Query ID is required."))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
}
impl ApiError {
	fn bad_request(message: impl Into<String>) -> Self {
		Self { status: StatusCode::BAD_REQUEST, message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let status = match &err {
			ServiceError::InvalidRequest { .. } | ServiceError::Conflict { .. } =>
				StatusCode::BAD_REQUEST,
			ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
			ServiceError::Storage { .. } => {
				tracing::error!(error = %err, "Storage failure while handling a request.");

				StatusCode::INTERNAL_SERVER_ERROR
			},
		};

		Self { status, message: err.to_string() }
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { error: self.message })).into_response()
	}
}
