//! Outbound webhook alerts for supervisors and customers. Delivery is
//! best-effort; callers decide whether a failure is worth more than a log
//! line.

// std
use std::time::Duration as StdDuration;

// crates.io
use reqwest::Client;
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::Result;

const SUPERVISOR_NOTIFICATION: &str = "supervisor_notification";
const CUSTOMER_NOTIFICATION: &str = "customer_notification";

#[derive(Clone, Debug, Serialize)]
pub struct Notification {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub request_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customer_id: Option<String>,
	pub message: String,
	pub timestamp: String,
}

pub fn supervisor_notification(
	request_id: String,
	message: String,
	now: OffsetDateTime,
) -> Result<Notification> {
	Ok(Notification {
		kind: SUPERVISOR_NOTIFICATION.to_string(),
		request_id: Some(request_id),
		customer_id: None,
		message,
		timestamp: now.format(&Rfc3339)?,
	})
}

pub fn customer_notification(
	customer_id: String,
	message: String,
	now: OffsetDateTime,
) -> Result<Notification> {
	Ok(Notification {
		kind: CUSTOMER_NOTIFICATION.to_string(),
		request_id: None,
		customer_id: Some(customer_id),
		message,
		timestamp: now.format(&Rfc3339)?,
	})
}

/// Posts the notification to the configured URL. A missing URL is not an
/// error; alerts are simply disabled.
pub async fn send(cfg: &helpdesk_config::Notify, notification: &Notification) -> Result<()> {
	let Some(url) = cfg.webhook_url.as_deref() else { return Ok(()) };
	let client = Client::builder().timeout(StdDuration::from_millis(cfg.timeout_ms)).build()?;
	let res = client.post(url).json(notification).send().await?;

	res.error_for_status()?;

	Ok(())
}
