use time::{Duration, OffsetDateTime};

/// Cutoff for the pending-request sweep: anything last updated at or before
/// this instant has outlived the expiry window.
pub fn sweep_cutoff(now: OffsetDateTime, window_hours: i64) -> OffsetDateTime {
	now - Duration::hours(window_hours)
}

pub fn is_expired(updated_at: OffsetDateTime, now: OffsetDateTime, window_hours: i64) -> bool {
	updated_at <= sweep_cutoff(now, window_hours)
}
