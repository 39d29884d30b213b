use std::sync::Arc;

use helpdesk_service::HelpdeskService;
use helpdesk_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<HelpdeskService>,
}
impl AppState {
	pub async fn new(config: helpdesk_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = HelpdeskService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
