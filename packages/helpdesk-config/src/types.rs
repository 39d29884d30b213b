use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub escalation: Escalation,
	#[serde(default)]
	pub notify: Notify,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Candidates must score strictly above this to be returned.
	pub score_threshold: f32,
	pub top_k: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { score_threshold: 0.3, top_k: 5 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Escalation {
	/// How long a request may sit pending before the sweep closes it.
	pub pending_expiry_hours: i64,
	pub sweep_interval_secs: u64,
}
impl Default for Escalation {
	fn default() -> Self {
		Self { pending_expiry_hours: 2, sweep_interval_secs: 60 }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Notify {
	/// Optional. Supervisor and customer alerts are skipped entirely when
	/// unset.
	pub webhook_url: Option<String>,
	pub timeout_ms: u64,
}
impl Default for Notify {
	fn default() -> Self {
		Self { webhook_url: None, timeout_ms: 5_000 }
	}
}
