use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct KnowledgeEntry {
	pub entry_id: Uuid,
	pub kind: String,
	pub question: String,
	pub answer: String,
	/// Info entries: one top-level description key mapping to the fact
	/// payload. Query entries: auxiliary metadata, possibly `{}`.
	pub description: Value,
	pub source: String,
	pub query_request_id: Option<Uuid>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct QueryRequest {
	pub request_id: Uuid,
	pub user_id: Uuid,
	pub question: String,
	pub status: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct User {
	pub user_id: Uuid,
	pub name: String,
	pub email: String,
	pub password: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
