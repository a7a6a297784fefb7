use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use newsroom_config::{Daily, Query, Tags};
use newsroom_domain::{ArticleMetadata, InteractionKind};

use crate::{Error, NewsroomService, Result};

pub const INTEREST_LIST_LIMIT: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreArticleRequest {
	pub title: String,
	pub body: String,
	pub url: String,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub source: String,
	#[serde(default)]
	pub publish_date: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreArticleResponse {
	pub article_id: Option<String>,
	pub inserted: bool,
}

/// Non-secret tuning knobs.
#[derive(Clone, Debug, Serialize)]
pub struct QueryConfigView {
	pub query: Query,
	pub tags: Tags,
	pub daily: Daily,
}

impl NewsroomService {
	/// Credits every tag of the article with the base score of `kind` and returns the credited
	/// tags. Unknown or untagged articles are a no-op.
	pub async fn interact_with_article(
		&self,
		article_id: &str,
		user_id: &str,
		workspace_id: &str,
		kind: InteractionKind,
	) -> Result<Vec<String>> {
		let (user_id, workspace_id) = crate::bookmarks::require_owner(user_id, workspace_id)?;
		let Some(article) = self.stores.content.get_by_id(article_id).await? else {
			tracing::debug!(article_id, kind = kind.as_str(), "Interaction on unknown article ignored.");

			return Ok(Vec::new());
		};
		let delta = match kind {
			InteractionKind::Click => self.cfg.tags.click_score,
			InteractionKind::Bookmark => self.cfg.tags.bookmark_score,
		};

		for tag in article.tags() {
			self.stores.interests.add_score(tag, delta, user_id, workspace_id).await?;
		}

		tracing::info!(
			article_id,
			user_id,
			workspace_id,
			kind = kind.as_str(),
			tags = article.tags().len(),
			"Interaction recorded."
		);

		Ok(article.metadata.tags)
	}

	pub async fn store_article(&self, req: StoreArticleRequest) -> Result<StoreArticleResponse> {
		let url = req.url.trim();

		if url.is_empty() || req.title.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "title and url are required.".to_string() });
		}
		if self.stores.content.exists(url).await? {
			tracing::debug!(url, "Article already stored.");

			return Ok(StoreArticleResponse { article_id: None, inserted: false });
		}

		let metadata = ArticleMetadata {
			url: url.to_string(),
			tags: clean_tags(req.tags),
			fetch_date: OffsetDateTime::now_utc(),
			source: req.source.trim().to_string(),
			publish_date: req.publish_date,
		};
		let article_id = self.stores.content.insert(req.title.trim(), &req.body, &metadata).await?;

		tracing::info!(%article_id, url, "Article stored.");

		Ok(StoreArticleResponse { article_id: Some(article_id), inserted: true })
	}

	pub async fn update_article_tags(&self, article_id: &str, tags: Vec<String>) -> Result<()> {
		let mut article = self
			.stores
			.content
			.get_by_id(article_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("article {article_id}") })?;

		article.metadata.tags = clean_tags(tags);

		self.stores.content.update_metadata(article_id, &article.metadata).await
	}

	pub async fn interests(&self, user_id: &str, workspace_id: &str) -> Result<Vec<String>> {
		let (user_id, workspace_id) = crate::bookmarks::require_owner(user_id, workspace_id)?;

		self.stores.interests.top_tags(user_id, Some(workspace_id), INTEREST_LIST_LIMIT).await
	}

	pub async fn reset_workspace_interests(&self, workspace_id: &str) -> Result<()> {
		let workspace_id = workspace_id.trim();

		if workspace_id.is_empty() {
			return Err(Error::InvalidRequest { message: "workspace_id is required.".to_string() });
		}

		self.stores.interests.reset_workspace(workspace_id).await
	}

	pub async fn clear_interests(&self) -> Result<()> {
		self.stores.interests.clear_all().await?;

		tracing::warn!("All interest profiles cleared.");

		Ok(())
	}

	pub fn query_config(&self) -> QueryConfigView {
		QueryConfigView {
			query: self.cfg.query.clone(),
			tags: self.cfg.tags.clone(),
			daily: self.cfg.daily.clone(),
		}
	}
}

/// Trims tags and drops blanks and repeats, keeping order.
fn clean_tags(tags: Vec<String>) -> Vec<String> {
	let mut out: Vec<String> = Vec::with_capacity(tags.len());

	for tag in tags {
		let tag = tag.trim();

		if !tag.is_empty() && !out.iter().any(|existing| existing == tag) {
			out.push(tag.to_string());
		}
	}

	out
}
