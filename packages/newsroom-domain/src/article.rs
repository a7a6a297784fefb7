use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
	pub id: String,
	pub title: String,
	/// Summary or snippet used for display and prompting.
	pub body: String,
	pub metadata: ArticleMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleMetadata {
	pub url: String,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub fetch_date: OffsetDateTime,
	pub source: String,
	#[serde(default)]
	pub publish_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedArticle {
	#[serde(flatten)]
	pub article: Article,
	pub bookmarked: bool,
}

/// Stable id for articles that originate outside the content store, so repeated fetches of the
/// same URL collapse onto one candidate.
pub fn article_id_for_url(url: &str) -> String {
	Uuid::new_v5(&Uuid::NAMESPACE_URL, url.trim().as_bytes()).to_string()
}

impl Article {
	pub fn tags(&self) -> &[String] {
		&self.metadata.tags
	}
}
