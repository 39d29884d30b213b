//! Query helpers over the helpdesk tables. Row-lock (`FOR UPDATE`) variants
//! exist for every lookup that feeds a find-or-update sequence; callers are
//! expected to hold them inside one transaction.

use serde_json::Value;
use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{KnowledgeEntry, QueryRequest, User},
};

pub async fn insert_entry_tx(
	tx: &mut Transaction<'_, Postgres>,
	entry: &KnowledgeEntry,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO knowledge_entries (
	entry_id,
	kind,
	question,
	answer,
	description,
	source,
	query_request_id,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
	)
	.bind(entry.entry_id)
	.bind(entry.kind.as_str())
	.bind(entry.question.as_str())
	.bind(entry.answer.as_str())
	.bind(&entry.description)
	.bind(entry.source.as_str())
	.bind(entry.query_request_id)
	.bind(entry.created_at)
	.bind(entry.updated_at)
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn update_entry_content_tx(
	tx: &mut Transaction<'_, Postgres>,
	entry_id: Uuid,
	answer: &str,
	source: &str,
	updated_at: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
UPDATE knowledge_entries
SET answer = $1, source = $2, updated_at = $3
WHERE entry_id = $4",
	)
	.bind(answer)
	.bind(source)
	.bind(updated_at)
	.bind(entry_id)
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn update_entry_description_tx(
	tx: &mut Transaction<'_, Postgres>,
	entry_id: Uuid,
	description: &Value,
	updated_at: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
UPDATE knowledge_entries
SET description = $1, updated_at = $2
WHERE entry_id = $3",
	)
	.bind(description)
	.bind(updated_at)
	.bind(entry_id)
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn entry_by_question_tx(
	tx: &mut Transaction<'_, Postgres>,
	question: &str,
	kind: &str,
) -> Result<Option<KnowledgeEntry>> {
	let entry = sqlx::query_as::<_, KnowledgeEntry>(
		"\
SELECT *
FROM knowledge_entries
WHERE question = $1 AND kind = $2
ORDER BY created_at
LIMIT 1
FOR UPDATE",
	)
	.bind(question)
	.bind(kind)
	.fetch_optional(&mut **tx)
	.await?;

	Ok(entry)
}

pub async fn info_entry_with_key_tx(
	tx: &mut Transaction<'_, Postgres>,
	kind: &str,
	description_key: &str,
) -> Result<Option<KnowledgeEntry>> {
	let entry = sqlx::query_as::<_, KnowledgeEntry>(
		"\
SELECT *
FROM knowledge_entries
WHERE kind = $1 AND jsonb_exists(description, $2)
ORDER BY created_at
LIMIT 1
FOR UPDATE",
	)
	.bind(kind)
	.bind(description_key)
	.fetch_optional(&mut **tx)
	.await?;

	Ok(entry)
}

/// All entries of one kind in retrieval order (oldest first). This is the
/// order ranking ties fall back to.
pub async fn entries_by_kind(db: &Db, kind: &str) -> Result<Vec<KnowledgeEntry>> {
	let entries = sqlx::query_as::<_, KnowledgeEntry>(
		"SELECT * FROM knowledge_entries WHERE kind = $1 ORDER BY created_at, entry_id",
	)
	.bind(kind)
	.fetch_all(&db.pool)
	.await?;

	Ok(entries)
}

pub async fn resolved_supervisor_entries(db: &Db) -> Result<Vec<KnowledgeEntry>> {
	let entries = sqlx::query_as::<_, KnowledgeEntry>(
		"\
SELECT e.*
FROM knowledge_entries e
JOIN query_requests r ON r.request_id = e.query_request_id
WHERE e.kind = 'query' AND e.source = 'supervisor' AND r.status = 'resolved'
ORDER BY e.created_at, e.entry_id",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(entries)
}

pub async fn insert_request(db: &Db, request: &QueryRequest) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO query_requests (request_id, user_id, question, status, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6)",
	)
	.bind(request.request_id)
	.bind(request.user_id)
	.bind(request.question.as_str())
	.bind(request.status.as_str())
	.bind(request.created_at)
	.bind(request.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn request_by_id(db: &Db, request_id: Uuid) -> Result<Option<QueryRequest>> {
	let request = sqlx::query_as::<_, QueryRequest>(
		"SELECT * FROM query_requests WHERE request_id = $1",
	)
	.bind(request_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(request)
}

pub async fn request_by_id_tx(
	tx: &mut Transaction<'_, Postgres>,
	request_id: Uuid,
) -> Result<Option<QueryRequest>> {
	let request = sqlx::query_as::<_, QueryRequest>(
		"SELECT * FROM query_requests WHERE request_id = $1 FOR UPDATE",
	)
	.bind(request_id)
	.fetch_optional(&mut **tx)
	.await?;

	Ok(request)
}

pub async fn all_requests(db: &Db) -> Result<Vec<QueryRequest>> {
	let requests = sqlx::query_as::<_, QueryRequest>(
		"SELECT * FROM query_requests ORDER BY created_at, request_id",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(requests)
}

pub async fn requests_by_status(db: &Db, status: &str) -> Result<Vec<QueryRequest>> {
	let requests = sqlx::query_as::<_, QueryRequest>(
		"SELECT * FROM query_requests WHERE status = $1 ORDER BY created_at, request_id",
	)
	.bind(status)
	.fetch_all(&db.pool)
	.await?;

	Ok(requests)
}

pub async fn update_request_status_tx(
	tx: &mut Transaction<'_, Postgres>,
	request_id: Uuid,
	status: &str,
	updated_at: OffsetDateTime,
) -> Result<()> {
	sqlx::query("UPDATE query_requests SET status = $1, updated_at = $2 WHERE request_id = $3")
		.bind(status)
		.bind(updated_at)
		.bind(request_id)
		.execute(&mut **tx)
		.await?;

	Ok(())
}

pub async fn delete_request(db: &Db, request_id: Uuid) -> Result<u64> {
	let result = sqlx::query("DELETE FROM query_requests WHERE request_id = $1")
		.bind(request_id)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected())
}

/// One atomic, row-filtered UPDATE. Re-running after a successful sweep
/// matches zero rows.
pub async fn expire_pending_requests(
	db: &Db,
	cutoff: OffsetDateTime,
	now: OffsetDateTime,
) -> Result<u64> {
	let result = sqlx::query(
		"\
UPDATE query_requests
SET status = 'unresolved', updated_at = $2
WHERE status = 'pending' AND updated_at <= $1",
	)
	.bind(cutoff)
	.bind(now)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected())
}

pub async fn user_by_id(db: &Db, user_id: Uuid) -> Result<Option<User>> {
	let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
		.bind(user_id)
		.fetch_optional(&db.pool)
		.await?;

	Ok(user)
}

pub async fn user_by_email(db: &Db, email: &str) -> Result<Option<User>> {
	let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
		.bind(email)
		.fetch_optional(&db.pool)
		.await?;

	Ok(user)
}

pub async fn insert_user(db: &Db, user: &User) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO users (user_id, name, email, password, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6)",
	)
	.bind(user.user_id)
	.bind(user.name.as_str())
	.bind(user.email.as_str())
	.bind(user.password.as_str())
	.bind(user.created_at)
	.bind(user.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}
