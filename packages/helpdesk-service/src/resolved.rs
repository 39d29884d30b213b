use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{HelpdeskService, Result};
use helpdesk_storage::queries;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolvedQuery {
	pub question: String,
	pub answer: String,
	#[serde(with = "time::serde::rfc3339")]
	pub resolved_at: OffsetDateTime,
	pub id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolvedQueriesResponse {
	pub resolved_queries: Vec<ResolvedQuery>,
}

impl HelpdeskService {
	/// Supervisor-sourced answers whose linked request reached resolved.
	pub async fn resolved_queries(&self) -> Result<ResolvedQueriesResponse> {
		let entries = queries::resolved_supervisor_entries(&self.db).await?;
		let resolved_queries = entries
			.into_iter()
			.map(|entry| ResolvedQuery {
				question: entry.question,
				answer: entry.answer,
				resolved_at: entry.updated_at,
				id: entry.entry_id,
			})
			.collect();

		Ok(ResolvedQueriesResponse { resolved_queries })
	}
}
