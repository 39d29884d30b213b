pub mod add_knowledge;
pub mod requests;
pub mod resolved;
pub mod search;
pub mod sweep;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

pub use add_knowledge::{AddKnowledgeRequest, AddKnowledgeResponse};
pub use error::{Error, Result};
pub use requests::{CreateQueryRequest, CreateQueryResponse, QueryRequestRecord};
pub use resolved::{ResolvedQueriesResponse, ResolvedQuery};
pub use search::{SearchRequest, SearchResponse, SimilarEntry};

use helpdesk_config::Config;
use helpdesk_notify::webhook::{self, Notification};
use helpdesk_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Seam for the outbound webhook so tests can observe dispatches without a
/// listening endpoint.
pub trait NotifyProvider
where
	Self: Send + Sync,
{
	fn send<'a>(
		&'a self,
		cfg: &'a helpdesk_config::Notify,
		notification: &'a Notification,
	) -> BoxFuture<'a, helpdesk_notify::Result<()>>;
}

struct DefaultNotifier;
impl NotifyProvider for DefaultNotifier {
	fn send<'a>(
		&'a self,
		cfg: &'a helpdesk_config::Notify,
		notification: &'a Notification,
	) -> BoxFuture<'a, helpdesk_notify::Result<()>> {
		Box::pin(webhook::send(cfg, notification))
	}
}

pub struct HelpdeskService {
	pub cfg: Config,
	pub db: Db,
	pub notifier: Arc<dyn NotifyProvider>,
}

impl HelpdeskService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, notifier: Arc::new(DefaultNotifier) }
	}

	pub fn with_notifier(cfg: Config, db: Db, notifier: Arc<dyn NotifyProvider>) -> Self {
		Self { cfg, db, notifier }
	}

	/// Best-effort delivery on a detached task. Failures are logged and
	/// swallowed; the calling operation has already committed.
	pub(crate) fn dispatch_notification(&self, notification: Notification) {
		if self.cfg.notify.webhook_url.is_none() {
			return;
		}

		let notifier = self.notifier.clone();
		let cfg = self.cfg.notify.clone();

		tokio::spawn(async move {
			if let Err(err) = notifier.send(&cfg, &notification).await {
				tracing::warn!(error = %err, "Webhook notification failed.");
			}
		});
	}
}
