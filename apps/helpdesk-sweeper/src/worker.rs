//! The expiry sweep. Runs on its own schedule, independent of HTTP traffic;
//! each pass is one idempotent UPDATE, so crashing between passes loses
//! nothing.

use std::time::Duration as StdDuration;

use time::OffsetDateTime;
use tokio::time as tokio_time;

use helpdesk_service::HelpdeskService;

pub async fn run_sweeper(service: HelpdeskService) {
	let interval = StdDuration::from_secs(service.cfg.escalation.sweep_interval_secs);

	tracing::info!(
		interval_secs = service.cfg.escalation.sweep_interval_secs,
		window_hours = service.cfg.escalation.pending_expiry_hours,
		"Expiry sweeper started."
	);

	loop {
		let now = OffsetDateTime::now_utc();

		match service.expire_stale(now).await {
			Ok(expired) =>
				if expired > 0 {
					tracing::info!(expired, "Expiry sweep finished.");
				},
			Err(err) => {
				tracing::error!(error = %err, "Expiry sweep failed.");
			},
		}

		tokio_time::sleep(interval).await;
	}
}
