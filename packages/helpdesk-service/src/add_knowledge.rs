use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, HelpdeskService, Result};
use helpdesk_domain::lifecycle::{EntryKind, EntrySource, RequestStatus};
use helpdesk_storage::{models::KnowledgeEntry, queries};

/// Key used when an info entry is added without an explicit one.
const DEFAULT_DESCRIPTION_KEY: &str = "info";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddKnowledgeRequest {
	#[serde(default)]
	pub question: String,
	#[serde(default)]
	pub answer: String,
	#[serde(default = "default_source")]
	pub source: String,
	#[serde(rename = "type", default = "default_kind")]
	pub kind: String,
	#[serde(default)]
	pub description: Value,
	#[serde(default)]
	pub description_key: Option<String>,
	#[serde(default)]
	pub query_request_id: Option<Uuid>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddKnowledgeResponse {
	pub id: Uuid,
}

impl HelpdeskService {
	/// Find-or-update, scoped to one transaction. The matching row is locked
	/// `FOR UPDATE`, which serializes concurrent updates of the same entry;
	/// two concurrent inserts of a brand-new question can still race into a
	/// duplicate.
	pub async fn add_knowledge(&self, req: AddKnowledgeRequest) -> Result<AddKnowledgeResponse> {
		let kind = EntryKind::parse(&req.kind).map_err(|raw| Error::InvalidRequest {
			message: format!("Invalid knowledge type: {raw}"),
		})?;
		let source = EntrySource::parse(&req.source)
			.map_err(|raw| Error::InvalidRequest { message: format!("Invalid source: {raw}") })?;
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let id = match kind {
			EntryKind::Info => add_or_update_info(&mut tx, &req, source, now).await?,
			EntryKind::Query => add_or_update_query(&mut tx, &req, source, now).await?,
		};

		tx.commit().await?;

		Ok(AddKnowledgeResponse { id })
	}
}

async fn add_or_update_info(
	tx: &mut Transaction<'_, Postgres>,
	req: &AddKnowledgeRequest,
	source: EntrySource,
	now: OffsetDateTime,
) -> Result<Uuid> {
	let Value::Object(description) = &req.description else {
		return Err(Error::InvalidRequest {
			message: "Description is required for info entries.".to_string(),
		});
	};

	if description.is_empty() {
		return Err(Error::InvalidRequest {
			message: "Description is required for info entries.".to_string(),
		});
	}

	let key = req.description_key.as_deref().unwrap_or(DEFAULT_DESCRIPTION_KEY).trim();

	if key.is_empty() {
		return Err(Error::InvalidRequest {
			message: "Description key is required for info entries.".to_string(),
		});
	}

	let Some(value) = description.get(key) else {
		return Err(Error::InvalidRequest {
			message: format!("Description is missing the {key:?} key."),
		});
	};

	// An info entry is uniquely keyed by its description key: an existing
	// holder gets that key's value rewritten in place.
	if let Some(mut existing) =
		queries::info_entry_with_key_tx(tx, EntryKind::Info.as_str(), key).await?
	{
		match &mut existing.description {
			Value::Object(payload) => {
				payload.insert(key.to_string(), value.clone());
			},
			other => {
				*other = Value::Object(Map::from_iter([(key.to_string(), value.clone())]));
			},
		}

		queries::update_entry_description_tx(tx, existing.entry_id, &existing.description, now)
			.await?;

		return Ok(existing.entry_id);
	}

	let entry = KnowledgeEntry {
		entry_id: Uuid::new_v4(),
		kind: EntryKind::Info.as_str().to_string(),
		question: req.question.clone(),
		answer: req.answer.clone(),
		description: req.description.clone(),
		source: source.as_str().to_string(),
		query_request_id: None,
		created_at: now,
		updated_at: now,
	};

	queries::insert_entry_tx(tx, &entry).await?;

	Ok(entry.entry_id)
}

async fn add_or_update_query(
	tx: &mut Transaction<'_, Postgres>,
	req: &AddKnowledgeRequest,
	source: EntrySource,
	now: OffsetDateTime,
) -> Result<Uuid> {
	if req.question.trim().is_empty() {
		return Err(Error::InvalidRequest {
			message: "Question is required for query entries.".to_string(),
		});
	}
	if req.answer.trim().is_empty() {
		return Err(Error::InvalidRequest {
			message: "Answer is required for query entries.".to_string(),
		});
	}

	// Uniqueness is the exact question string; case variants are distinct
	// entries.
	if let Some(existing) =
		queries::entry_by_question_tx(tx, &req.question, EntryKind::Query.as_str()).await?
	{
		queries::update_entry_content_tx(tx, existing.entry_id, &req.answer, source.as_str(), now)
			.await?;

		return Ok(existing.entry_id);
	}

	let query_request_id = match req.query_request_id {
		Some(request_id) => {
			let request = queries::request_by_id_tx(tx, request_id).await?.ok_or_else(|| {
				Error::NotFound { message: format!("Query request {request_id} does not exist.") }
			})?;
			let status = RequestStatus::parse(&request.status).map_err(|raw| Error::Storage {
				message: format!("Unknown request status: {raw}"),
			})?;

			if status != RequestStatus::Resolved {
				return Err(Error::InvalidRequest {
					message: "Only resolved query requests can be linked to knowledge entries."
						.to_string(),
				});
			}

			Some(request_id)
		},
		None => None,
	};
	let description = match &req.description {
		Value::Null => Value::Object(Map::new()),
		other => other.clone(),
	};
	let entry = KnowledgeEntry {
		entry_id: Uuid::new_v4(),
		kind: EntryKind::Query.as_str().to_string(),
		question: req.question.clone(),
		answer: req.answer.clone(),
		description,
		source: source.as_str().to_string(),
		query_request_id,
		created_at: now,
		updated_at: now,
	};

	queries::insert_entry_tx(tx, &entry).await?;

	Ok(entry.entry_id)
}

fn default_source() -> String {
	EntrySource::Supervisor.as_str().to_string()
}

fn default_kind() -> String {
	EntryKind::Query.as_str().to_string()
}
