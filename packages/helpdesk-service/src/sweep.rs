use time::OffsetDateTime;

use crate::{HelpdeskService, Result};
use helpdesk_domain::expiry;
use helpdesk_storage::queries;

impl HelpdeskService {
	/// Flips every pending request that outlived the expiry window to
	/// unresolved and returns the affected count. Safe to re-run; a second
	/// sweep over the same instant matches nothing.
	pub async fn expire_stale(&self, now: OffsetDateTime) -> Result<u64> {
		let cutoff = expiry::sweep_cutoff(now, self.cfg.escalation.pending_expiry_hours);
		let expired = queries::expire_pending_requests(&self.db, cutoff, now).await?;

		if expired > 0 {
			tracing::info!(expired, "Marked stale pending queries as unresolved.");
		}

		Ok(expired)
	}
}
