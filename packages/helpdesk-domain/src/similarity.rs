//! Lexical similarity between a stored question and an incoming one.
//!
//! Word-overlap (Jaccard) over lower-cased whitespace tokens, plus a flat
//! bonus when the two strings are equal after lower-casing. This is a
//! heuristic: no stemming, no synonym awareness, no word-order sensitivity.

use std::collections::HashSet;

/// Added on top of the Jaccard ratio when both strings are equal after
/// lower-casing.
pub const EXACT_MATCH_BONUS: f32 = 0.3;

/// Scores two free-text strings into `[0.0, 1.0]`. Total function; an empty
/// word set on either side scores 0.0.
pub fn score(stored_text: &str, query_text: &str) -> f32 {
	let stored_lower = stored_text.to_lowercase();
	let query_lower = query_text.to_lowercase();
	let stored_words: HashSet<&str> = stored_lower.split_whitespace().collect();
	let query_words: HashSet<&str> = query_lower.split_whitespace().collect();

	if stored_words.is_empty() || query_words.is_empty() {
		return 0.0;
	}

	let intersection = stored_words.intersection(&query_words).count();
	let union = stored_words.union(&query_words).count();
	let jaccard = intersection as f32 / union as f32;
	let bonus = if stored_lower == query_lower { EXACT_MATCH_BONUS } else { 0.0 };

	(jaccard + bonus).min(1.0)
}
