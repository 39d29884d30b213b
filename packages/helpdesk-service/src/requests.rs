use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, HelpdeskService, Result};
use helpdesk_domain::lifecycle::RequestStatus;
use helpdesk_notify::webhook;
use helpdesk_storage::{models::QueryRequest, queries};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateQueryRequest {
	pub user_id: Uuid,
	pub question: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateQueryResponse {
	pub id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryRequestRecord {
	pub id: Uuid,
	pub user_id: Uuid,
	pub question: String,
	pub status: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl From<QueryRequest> for QueryRequestRecord {
	fn from(request: QueryRequest) -> Self {
		Self {
			id: request.request_id,
			user_id: request.user_id,
			question: request.question,
			status: request.status,
			created_at: request.created_at,
			updated_at: request.updated_at,
		}
	}
}

impl HelpdeskService {
	/// Opens an escalation for a question the agent could not answer. Always
	/// starts pending; the supervisor webhook fires after the insert.
	pub async fn create_query(&self, req: CreateQueryRequest) -> Result<CreateQueryResponse> {
		if req.question.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "User ID and question are required.".to_string(),
			});
		}

		let user = queries::user_by_id(&self.db, req.user_id).await?.ok_or_else(|| {
			Error::InvalidRequest { message: format!("User {} does not exist.", req.user_id) }
		})?;
		let now = OffsetDateTime::now_utc();
		let request = QueryRequest {
			request_id: Uuid::new_v4(),
			user_id: user.user_id,
			question: req.question.clone(),
			status: RequestStatus::Pending.as_str().to_string(),
			created_at: now,
			updated_at: now,
		};

		queries::insert_request(&self.db, &request).await?;

		match webhook::supervisor_notification(
			request.request_id.to_string(),
			format!("New pending query: {}", request.question),
			now,
		) {
			Ok(notification) => self.dispatch_notification(notification),
			Err(err) => tracing::warn!(error = %err, "Failed to build supervisor notification."),
		}

		Ok(CreateQueryResponse { id: request.request_id })
	}

	pub async fn get_query(&self, request_id: Uuid) -> Result<QueryRequestRecord> {
		queries::request_by_id(&self.db, request_id)
			.await?
			.map(Into::into)
			.ok_or_else(|| Error::NotFound { message: "Query request not found.".to_string() })
	}

	pub async fn all_queries(&self) -> Result<Vec<QueryRequestRecord>> {
		let requests = queries::all_requests(&self.db).await?;

		Ok(requests.into_iter().map(Into::into).collect())
	}

	pub async fn pending_queries(&self) -> Result<Vec<QueryRequestRecord>> {
		let requests =
			queries::requests_by_status(&self.db, RequestStatus::Pending.as_str()).await?;

		Ok(requests.into_iter().map(Into::into).collect())
	}

	/// Marks a pending request resolved. Re-resolving is a no-op success so
	/// the supervisor dashboard can retry freely; a request already closed as
	/// unresolved stays closed.
	pub async fn resolve_query(&self, request_id: Uuid) -> Result<QueryRequestRecord> {
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let mut request = queries::request_by_id_tx(&mut tx, request_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Query request not found.".to_string() })?;
		let status = RequestStatus::parse(&request.status).map_err(|raw| Error::Storage {
			message: format!("Unknown request status: {raw}"),
		})?;

		match status {
			RequestStatus::Resolved => {
				tx.commit().await?;

				return Ok(request.into());
			},
			RequestStatus::Unresolved => {
				return Err(Error::Conflict {
					message: "Query request is already closed as unresolved.".to_string(),
				});
			},
			RequestStatus::Pending => {},
		}

		request.status = RequestStatus::Resolved.as_str().to_string();
		request.updated_at = now;

		queries::update_request_status_tx(&mut tx, request_id, &request.status, now).await?;

		tx.commit().await?;

		match webhook::customer_notification(
			request.user_id.to_string(),
			format!("Your question has been answered: {}", request.question),
			now,
		) {
			Ok(notification) => self.dispatch_notification(notification),
			Err(err) => tracing::warn!(error = %err, "Failed to build customer notification."),
		}

		Ok(request.into())
	}

	/// Deletes the request row; linked knowledge entries cascade with it.
	pub async fn delete_query(&self, request_id: Uuid) -> Result<()> {
		let deleted = queries::delete_request(&self.db, request_id).await?;

		if deleted == 0 {
			return Err(Error::NotFound { message: "Query request not found.".to_string() });
		}

		Ok(())
	}
}
