use time::OffsetDateTime;
use uuid::Uuid;

use newsroom_domain::{Article, ArticleMetadata, Bookmark};

use crate::{Error, Result};

#[derive(Debug, sqlx::FromRow)]
pub struct ArticleRow {
	pub article_id: String,
	pub title: String,
	pub body: String,
	pub url: String,
	/// JSON array text, e.g. `["ai","chips"]`.
	pub tags: String,
	pub source: String,
	pub publish_date: Option<String>,
	pub fetch_date: OffsetDateTime,
}
impl ArticleRow {
	pub fn into_article(self) -> Result<Article> {
		let tags = decode_tags(&self.tags)
			.ok_or_else(|| Error::CorruptTags { article_id: self.article_id.clone() })?;

		Ok(Article {
			id: self.article_id,
			title: self.title,
			body: self.body,
			metadata: ArticleMetadata {
				url: self.url,
				tags,
				fetch_date: self.fetch_date,
				source: self.source,
				publish_date: self.publish_date,
			},
		})
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct BookmarkRow {
	pub bookmark_id: Uuid,
	pub article_id: String,
	pub user_id: String,
	pub workspace_id: String,
	pub title: String,
	pub body: String,
	pub url: String,
	pub note: Option<String>,
	pub created_at: OffsetDateTime,
}
impl From<BookmarkRow> for Bookmark {
	fn from(row: BookmarkRow) -> Self {
		Self {
			bookmark_id: row.bookmark_id,
			article_id: row.article_id,
			user_id: row.user_id,
			workspace_id: row.workspace_id,
			title: row.title,
			body: row.body,
			url: row.url,
			note: row.note,
			created_at: row.created_at,
		}
	}
}

pub fn encode_tags(tags: &[String]) -> String {
	serde_json::Value::from(tags.to_vec()).to_string()
}

/// Blank text decodes to no tags.
pub fn decode_tags(raw: &str) -> Option<Vec<String>> {
	if raw.trim().is_empty() {
		return Some(Vec::new());
	}

	serde_json::from_str(raw).ok()
}
