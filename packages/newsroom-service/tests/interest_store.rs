use std::sync::Arc;

use newsroom_service::{InterestStore, MemoryInterestStore};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_key_updates_are_not_lost() {
	let store = Arc::new(MemoryInterestStore::new());
	let mut handles = Vec::new();

	for i in 0..64 {
		let store = store.clone();
		let delta = if i % 2 == 0 { 0.5 } else { -0.25 };

		handles.push(tokio::spawn(async move { store.add_score("ai", delta, "u1", "w1").await }));
	}
	for handle in handles {
		handle.await.expect("Task panicked.").expect("add_score failed.");
	}

	let score = store.get_score("u1", "ai", Some("w1")).await.expect("score");

	assert!((score - 8.0).abs() < 1e-9);
}

#[tokio::test]
async fn missing_records_score_zero() {
	let store = MemoryInterestStore::new();

	assert_eq!(store.get_score("u1", "ai", Some("w1")).await.expect("score"), 0.0);
	assert!(store.top_tags("u1", Some("w1"), 5).await.expect("top tags").is_empty());
}

#[tokio::test]
async fn top_tags_respect_the_workspace_filter() {
	let store = MemoryInterestStore::new();

	store.add_score("ai", 1.0, "u1", "w1").await.expect("add_score failed.");
	store.add_score("sports", 9.0, "u1", "w2").await.expect("add_score failed.");
	store.add_score("chips", 3.0, "u1", "w1").await.expect("add_score failed.");
	store.add_score("ai", 0.5, "u2", "w1").await.expect("add_score failed.");

	assert_eq!(store.top_tags("u1", Some("w1"), 5).await.expect("top tags"), vec!["chips", "ai"]);
	assert_eq!(store.top_tags("u1", Some("w1"), 1).await.expect("top tags"), vec!["chips"]);
	assert_eq!(store.top_tags("u1", None, 5).await.expect("top tags"), vec![
		"sports", "chips", "ai"
	]);

	let across = store.get_score("u1", "ai", None).await.expect("score");

	assert!((across - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn negative_deltas_are_not_clamped() {
	let store = MemoryInterestStore::new();

	store.add_score("ai", 1.0, "u1", "w1").await.expect("add_score failed.");
	store.add_score("ai", -3.0, "u1", "w1").await.expect("add_score failed.");

	assert!((store.get_score("u1", "ai", Some("w1")).await.expect("score") + 2.0).abs() < 1e-9);
}
