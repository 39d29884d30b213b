pub mod worker;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
	version = helpdesk_cli::VERSION,
	rename_all = "kebab",
	styles = helpdesk_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = helpdesk_config::load(&args.config)?;
	let filter = EnvFilter::new(config.service.log_level.clone());

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = helpdesk_storage::db::Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let service = helpdesk_service::HelpdeskService::new(config, db);

	worker::run_sweeper(service).await;

	Ok(())
}
