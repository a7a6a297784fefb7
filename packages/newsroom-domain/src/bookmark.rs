use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A saved article. Title, body, and URL are copied at bookmark time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
	pub bookmark_id: Uuid,
	pub article_id: String,
	pub user_id: String,
	pub workspace_id: String,
	pub title: String,
	pub body: String,
	pub url: String,
	pub note: Option<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
