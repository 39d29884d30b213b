use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use helpdesk_service::{CreateQueryRequest, Error};

async fn backdate_request(pool: &PgPool, request_id: Uuid, updated_at: OffsetDateTime) {
	sqlx::query("UPDATE query_requests SET updated_at = $1 WHERE request_id = $2")
		.bind(updated_at)
		.bind(request_id)
		.execute(pool)
		.await
		.expect("Failed to backdate request.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn create_query_starts_pending_and_notifies_the_supervisor() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping create_query_starts_pending_and_notifies_the_supervisor; set HELPDESK_PG_DSN.");

		return;
	};
	let spy = super::SpyNotifier::new();
	let service = super::build_service_with_notifier(
		super::test_config(test_db.dsn().to_string()),
		spy.clone(),
	)
	.await
	.expect("Failed to build service.");
	let user_id = super::seed_user(&service.db).await;
	let created = service
		.create_query(CreateQueryRequest {
			user_id,
			question: "Is threading available on Sundays?".to_string(),
		})
		.await
		.expect("Failed to create query request.");
	let record = service.get_query(created.id).await.expect("Failed to fetch request.");

	assert_eq!(record.status, "pending");
	assert_eq!(record.user_id, user_id);

	let sent = super::wait_for_notifications(&spy, 1).await;

	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].kind, "supervisor_notification");
	assert_eq!(sent[0].request_id.as_deref(), Some(created.id.to_string().as_str()));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn create_query_requires_a_known_user() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping create_query_requires_a_known_user; set HELPDESK_PG_DSN.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string()))
		.await
		.expect("Failed to build service.");
	let result = service
		.create_query(CreateQueryRequest {
			user_id: Uuid::new_v4(),
			question: "Anyone there?".to_string(),
		})
		.await;

	assert!(matches!(result, Err(Error::InvalidRequest { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn sweep_expires_only_requests_past_the_window() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping sweep_expires_only_requests_past_the_window; set HELPDESK_PG_DSN.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string()))
		.await
		.expect("Failed to build service.");
	let user_id = super::seed_user(&service.db).await;
	let stale = service
		.create_query(CreateQueryRequest {
			user_id,
			question: "Can I reschedule tomorrow's facial?".to_string(),
		})
		.await
		.expect("Failed to create query request.");
	let fresh = service
		.create_query(CreateQueryRequest {
			user_id,
			question: "Do you take walk-ins?".to_string(),
		})
		.await
		.expect("Failed to create query request.");
	let now = OffsetDateTime::now_utc();

	// Three hours old with a two-hour window: expired. One hour old: not.
	backdate_request(&service.db.pool, stale.id, now - Duration::hours(3)).await;
	backdate_request(&service.db.pool, fresh.id, now - Duration::hours(1)).await;

	let expired = service.expire_stale(now).await.expect("Sweep failed.");

	assert_eq!(expired, 1);
	assert_eq!(service.get_query(stale.id).await.expect("fetch").status, "unresolved");
	assert_eq!(service.get_query(fresh.id).await.expect("fetch").status, "pending");

	// Idempotent: nothing left to expire at the same instant.
	assert_eq!(service.expire_stale(now).await.expect("Sweep failed."), 0);

	let pending = service.pending_queries().await.expect("Failed to list pending.");

	assert_eq!(pending.len(), 1);
	assert_eq!(pending[0].id, fresh.id);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn resolve_is_idempotent_and_terminal_states_stay_closed() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping resolve_is_idempotent_and_terminal_states_stay_closed; set HELPDESK_PG_DSN.");

		return;
	};
	let spy = super::SpyNotifier::new();
	let service = super::build_service_with_notifier(
		super::test_config(test_db.dsn().to_string()),
		spy.clone(),
	)
	.await
	.expect("Failed to build service.");
	let user_id = super::seed_user(&service.db).await;
	let created = service
		.create_query(CreateQueryRequest {
			user_id,
			question: "How long does hair coloring take?".to_string(),
		})
		.await
		.expect("Failed to create query request.");
	let resolved = service.resolve_query(created.id).await.expect("First resolve failed.");

	assert_eq!(resolved.status, "resolved");

	// Second resolve is a no-op success.
	let again = service.resolve_query(created.id).await.expect("Second resolve failed.");

	assert_eq!(again.status, "resolved");

	// The customer alert fires once, on the actual transition.
	let sent = super::wait_for_notifications(&spy, 2).await;
	let customer_alerts =
		sent.iter().filter(|notification| notification.kind == "customer_notification").count();

	assert_eq!(customer_alerts, 1);

	// A resolved request is out of the sweep's reach even when stale.
	backdate_request(&service.db.pool, created.id, OffsetDateTime::now_utc() - Duration::hours(5))
		.await;

	assert_eq!(service.expire_stale(OffsetDateTime::now_utc()).await.expect("Sweep failed."), 0);

	// An unresolved request cannot be resolved afterwards.
	let expired = service
		.create_query(CreateQueryRequest {
			user_id,
			question: "Lost property from last week?".to_string(),
		})
		.await
		.expect("Failed to create query request.");

	backdate_request(&service.db.pool, expired.id, OffsetDateTime::now_utc() - Duration::hours(5))
		.await;
	service.expire_stale(OffsetDateTime::now_utc()).await.expect("Sweep failed.");

	assert!(matches!(service.resolve_query(expired.id).await, Err(Error::Conflict { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn delete_query_cascades_to_linked_entries() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping delete_query_cascades_to_linked_entries; set HELPDESK_PG_DSN.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string()))
		.await
		.expect("Failed to build service.");
	let user_id = super::seed_user(&service.db).await;
	let created = service
		.create_query(CreateQueryRequest {
			user_id,
			question: "Do you sell gift cards?".to_string(),
		})
		.await
		.expect("Failed to create query request.");

	service.resolve_query(created.id).await.expect("Failed to resolve.");
	service
		.add_knowledge(helpdesk_service::AddKnowledgeRequest {
			question: "Do you sell gift cards?".to_string(),
			answer: "Yes, at the front desk.".to_string(),
			source: "supervisor".to_string(),
			kind: "query".to_string(),
			description: serde_json::Value::Null,
			description_key: None,
			query_request_id: Some(created.id),
		})
		.await
		.expect("Failed to add knowledge.");

	assert_eq!(
		service.resolved_queries().await.expect("list").resolved_queries.len(),
		1
	);

	service.delete_query(created.id).await.expect("Failed to delete.");

	assert!(matches!(service.get_query(created.id).await, Err(Error::NotFound { .. })));
	assert!(matches!(service.delete_query(created.id).await, Err(Error::NotFound { .. })));
	assert!(
		service.resolved_queries().await.expect("list").resolved_queries.is_empty(),
		"linked entry should cascade away with the request"
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
