mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Escalation, Notify, Postgres, Search, Service, Storage};

use std::{fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.parse::<SocketAddr>().is_err() {
		return Err(Error::Validation {
			message: "service.http_bind must be a socket address.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if !cfg.search.score_threshold.is_finite() {
		return Err(Error::Validation {
			message: "search.score_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.search.score_threshold) {
		return Err(Error::Validation {
			message: "search.score_threshold must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.search.top_k == 0 {
		return Err(Error::Validation {
			message: "search.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.escalation.pending_expiry_hours <= 0 {
		return Err(Error::Validation {
			message: "escalation.pending_expiry_hours must be greater than zero.".to_string(),
		});
	}
	if cfg.escalation.sweep_interval_secs == 0 {
		return Err(Error::Validation {
			message: "escalation.sweep_interval_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.notify.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "notify.timeout_ms must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.notify.webhook_url.as_deref().map(|url| url.trim().is_empty()).unwrap_or(false) {
		cfg.notify.webhook_url = None;
	}
}
