use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Error, HelpdeskService, Result};
use helpdesk_domain::{lifecycle::EntryKind, similarity};
use helpdesk_storage::{models::KnowledgeEntry, queries};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimilarEntry {
	pub question: String,
	pub answer: String,
	pub score: f32,
	pub id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
	pub similar_entries: Vec<SimilarEntry>,
	pub salon_information: Value,
}

impl HelpdeskService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		if req.query.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "Query parameter is required.".to_string(),
			});
		}

		let stored = queries::entries_by_kind(&self.db, EntryKind::Query.as_str()).await?;
		let similar_entries = rank_candidates(
			&stored,
			&req.query,
			self.cfg.search.score_threshold,
			self.cfg.search.top_k as usize,
		);
		let info_entries = queries::entries_by_kind(&self.db, EntryKind::Info.as_str()).await?;
		let salon_information = merge_descriptions(&info_entries);

		Ok(SearchResponse { similar_entries, salon_information })
	}
}

/// Scores every stored question against the incoming one and keeps the best
/// matches. Only scores strictly above the threshold survive; the sort is
/// stable, so equal scores keep retrieval order.
pub fn rank_candidates(
	entries: &[KnowledgeEntry],
	query: &str,
	threshold: f32,
	top_k: usize,
) -> Vec<SimilarEntry> {
	let mut candidates = Vec::new();

	for entry in entries {
		if entry.question.is_empty() {
			continue;
		}

		let score = similarity::score(&entry.question, query);

		if score > threshold {
			candidates.push(SimilarEntry {
				question: entry.question.clone(),
				answer: entry.answer.clone(),
				score,
				id: entry.entry_id,
			});
		}
	}

	candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
	candidates.truncate(top_k);

	candidates
}

/// Shallow merge of every info entry's description payload into one object.
/// Later entries win on key collisions; no info entries yields an empty
/// object.
pub fn merge_descriptions(entries: &[KnowledgeEntry]) -> Value {
	let mut merged = Map::new();

	for entry in entries {
		if let Value::Object(description) = &entry.description {
			for (key, value) in description {
				merged.insert(key.clone(), value.clone());
			}
		}
	}

	Value::Object(merged)
}
