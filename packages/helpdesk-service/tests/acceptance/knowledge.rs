use serde_json::json;

use helpdesk_service::{AddKnowledgeRequest, Error, SearchRequest};

fn add_request(kind: &str) -> AddKnowledgeRequest {
	AddKnowledgeRequest {
		question: String::new(),
		answer: String::new(),
		source: "initial".to_string(),
		kind: kind.to_string(),
		description: serde_json::Value::Null,
		description_key: None,
		query_request_id: None,
	}
}

async fn entry_count(pool: &sqlx::PgPool, kind: &str) -> i64 {
	sqlx::query_scalar("SELECT COUNT(*) FROM knowledge_entries WHERE kind = $1")
		.bind(kind)
		.fetch_one(pool)
		.await
		.expect("Failed to count entries.")
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn info_entries_are_keyed_by_description_key() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping info_entries_are_keyed_by_description_key; set HELPDESK_PG_DSN.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string()))
		.await
		.expect("Failed to build service.");
	let mut req = add_request("info");

	req.description = json!({ "salon_info": { "name": "Glamora Salon & Spa" } });
	req.description_key = Some("salon_info".to_string());

	let first = service.add_knowledge(req.clone()).await.expect("First add failed.");

	req.description = json!({ "salon_info": { "name": "Glamora", "phone": "+1-555-123-4567" } });

	let second = service.add_knowledge(req).await.expect("Second add failed.");

	assert_eq!(first.id, second.id);
	assert_eq!(entry_count(&service.db.pool, "info").await, 1);

	let response = service
		.search(SearchRequest { query: "anything".to_string() })
		.await
		.expect("Search failed.");

	// The key's value reflects the latest write.
	assert_eq!(response.salon_information["salon_info"]["phone"], "+1-555-123-4567");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn info_entries_require_description_and_key() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping info_entries_require_description_and_key; set HELPDESK_PG_DSN.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string()))
		.await
		.expect("Failed to build service.");
	let missing_description = add_request("info");

	assert!(matches!(
		service.add_knowledge(missing_description).await,
		Err(Error::InvalidRequest { .. })
	));

	let mut missing_key = add_request("info");

	missing_key.description = json!({ "staff": [] });
	missing_key.description_key = Some("policies".to_string());

	assert!(matches!(
		service.add_knowledge(missing_key).await,
		Err(Error::InvalidRequest { .. })
	));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn query_entries_are_unique_by_exact_question() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping query_entries_are_unique_by_exact_question; set HELPDESK_PG_DSN.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string()))
		.await
		.expect("Failed to build service.");
	let mut req = add_request("query");

	req.question = "What are the salon's working hours?".to_string();
	req.answer = "Monday to Friday: 10:00 AM - 8:00 PM.".to_string();

	let first = service.add_knowledge(req.clone()).await.expect("First add failed.");

	assert_eq!(entry_count(&service.db.pool, "query").await, 1);

	req.answer = "We open at 10 on weekdays.".to_string();
	req.source = "supervisor".to_string();

	let second = service.add_knowledge(req.clone()).await.expect("Second add failed.");

	// Same question updates in place.
	assert_eq!(first.id, second.id);
	assert_eq!(entry_count(&service.db.pool, "query").await, 1);

	// A case variant is a different question.
	req.question = "WHAT ARE THE SALON'S WORKING HOURS?".to_string();

	let third = service.add_knowledge(req).await.expect("Third add failed.");

	assert_ne!(first.id, third.id);
	assert_eq!(entry_count(&service.db.pool, "query").await, 2);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn search_surfaces_paraphrased_questions() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping search_surfaces_paraphrased_questions; set HELPDESK_PG_DSN.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string()))
		.await
		.expect("Failed to build service.");
	let mut req = add_request("query");

	req.question = "What are the salon's working hours?".to_string();
	req.answer = "Monday to Friday: 10:00 AM - 8:00 PM.".to_string();

	service.add_knowledge(req).await.expect("Add failed.");

	let response = service
		.search(SearchRequest { query: "What are your hours?".to_string() })
		.await
		.expect("Search failed.");

	assert_eq!(response.similar_entries.len(), 1);
	assert!(response.similar_entries[0].score > 0.3);
	assert_eq!(response.similar_entries[0].question, "What are the salon's working hours?");
	// No info entries were seeded.
	assert_eq!(response.salon_information, json!({}));

	let unrelated = service
		.search(SearchRequest { query: "gift card balance".to_string() })
		.await
		.expect("Search failed.");

	assert!(unrelated.similar_entries.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn search_rejects_blank_queries() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping search_rejects_blank_queries; set HELPDESK_PG_DSN.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string()))
		.await
		.expect("Failed to build service.");

	assert!(matches!(
		service.search(SearchRequest { query: "   ".to_string() }).await,
		Err(Error::InvalidRequest { .. })
	));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn linking_requires_a_resolved_request() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping linking_requires_a_resolved_request; set HELPDESK_PG_DSN.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string()))
		.await
		.expect("Failed to build service.");
	let user_id = super::seed_user(&service.db).await;
	let created = service
		.create_query(helpdesk_service::CreateQueryRequest {
			user_id,
			question: "Do you do bridal makeup trials?".to_string(),
		})
		.await
		.expect("Failed to create query request.");
	let mut req = add_request("query");

	req.question = "Do you do bridal makeup trials?".to_string();
	req.answer = "Yes, by appointment.".to_string();
	req.source = "supervisor".to_string();
	req.query_request_id = Some(created.id);

	// Still pending: the link must be refused.
	assert!(matches!(
		service.add_knowledge(req.clone()).await,
		Err(Error::InvalidRequest { .. })
	));

	service.resolve_query(created.id).await.expect("Failed to resolve.");
	service.add_knowledge(req).await.expect("Add after resolve failed.");

	let resolved = service.resolved_queries().await.expect("Failed to list resolved queries.");

	assert_eq!(resolved.resolved_queries.len(), 1);
	assert_eq!(resolved.resolved_queries[0].question, "Do you do bridal makeup trials?");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
