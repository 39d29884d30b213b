//! Seeds the knowledge base with the salon dataset: one info entry per
//! top-level section plus the common question/answer pairs. Everything goes
//! through `add_knowledge`, so re-running updates entries in place instead
//! of duplicating them.

use clap::Parser;
use serde::Deserialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use helpdesk_service::{AddKnowledgeRequest, HelpdeskService};
use helpdesk_storage::{db::Db, models::User, queries};

const SALON_DATA: &str = include_str!("../data/salon.json");
const DEMO_USER_EMAIL: &str = "demo@glamorasalon.com";

#[derive(Debug, Parser)]
#[command(
	version = helpdesk_cli::VERSION,
	rename_all = "kebab",
	styles = helpdesk_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
	/// Also create a demo user for exercising create-query locally.
	#[arg(long)]
	pub demo_user: bool,
}

#[derive(Debug, Deserialize)]
struct SeedData {
	information: Map<String, Value>,
	common_questions: Vec<SeedQuestion>,
}

#[derive(Debug, Deserialize)]
struct SeedQuestion {
	question: String,
	answer: String,
	topic: String,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = helpdesk_config::load(&args.config)?;
	let filter = EnvFilter::new(config.service.log_level.clone());

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let service = HelpdeskService::new(config, db);
	let data: SeedData = serde_json::from_str(SALON_DATA)?;

	for (key, value) in &data.information {
		let description = Value::Object(Map::from_iter([(key.clone(), value.clone())]));

		service
			.add_knowledge(AddKnowledgeRequest {
				question: String::new(),
				answer: String::new(),
				source: "initial".to_string(),
				kind: "info".to_string(),
				description,
				description_key: Some(key.clone()),
				query_request_id: None,
			})
			.await?;

		tracing::info!(%key, "Seeded info entry.");
	}

	for question in &data.common_questions {
		service
			.add_knowledge(AddKnowledgeRequest {
				question: question.question.clone(),
				answer: question.answer.clone(),
				source: "initial".to_string(),
				kind: "query".to_string(),
				description: serde_json::json!({ "topic": question.topic }),
				description_key: None,
				query_request_id: None,
			})
			.await?;

		tracing::info!(question = %question.question, "Seeded query entry.");
	}

	if args.demo_user {
		seed_demo_user(&service.db).await?;
	}

	tracing::info!("Seeding finished.");

	Ok(())
}

async fn seed_demo_user(db: &Db) -> color_eyre::Result<()> {
	if let Some(existing) = queries::user_by_email(db, DEMO_USER_EMAIL).await? {
		tracing::info!(user_id = %existing.user_id, "Demo user already exists.");

		return Ok(());
	}

	let now = OffsetDateTime::now_utc();
	let user = User {
		user_id: Uuid::new_v4(),
		name: "Demo Caller".to_string(),
		email: DEMO_USER_EMAIL.to_string(),
		password: "demo".to_string(),
		created_at: now,
		updated_at: now,
	};

	queries::insert_user(db, &user).await?;

	tracing::info!(user_id = %user.user_id, "Created demo user.");

	Ok(())
}
