use newsroom_domain::{AnnotatedArticle, Article, InteractionKind, article_id_for_url};

#[test]
fn url_ids_are_stable_and_trim_whitespace() {
	let id = article_id_for_url("https://news.example/a");

	assert_eq!(id, article_id_for_url("  https://news.example/a\n"));
	assert_ne!(id, article_id_for_url("https://news.example/b"));
	assert_eq!(id.len(), 36);
}

#[test]
fn annotated_article_serializes_flat() {
	let payload = serde_json::json!({
		"id": "a1",
		"title": "Chips",
		"body": "GPU news",
		"metadata": {
			"url": "https://news.example/a1",
			"fetch_date": "2026-01-02T03:04:05Z",
			"source": "example"
		}
	});
	let article: Article = serde_json::from_value(payload).expect("Failed to parse article.");

	assert!(article.tags().is_empty());
	assert_eq!(article.metadata.publish_date, None);

	let annotated = AnnotatedArticle { article, bookmarked: true };
	let value = serde_json::to_value(&annotated).expect("Failed to serialize article.");

	assert_eq!(value["id"], "a1");
	assert_eq!(value["bookmarked"], true);
	assert_eq!(value["metadata"]["fetch_date"], "2026-01-02T03:04:05Z");
}

#[test]
fn interaction_kinds_use_snake_case() {
	let kind: InteractionKind = serde_json::from_str("\"bookmark\"").expect("Failed to parse kind.");

	assert_eq!(kind, InteractionKind::Bookmark);
	assert_eq!(InteractionKind::Click.as_str(), "click");
}
