//! Article store housekeeping.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{NewsroomService, Result};

/// Articles fetched longer ago than this are removed by [`NewsroomService::clear_old_articles`].
pub const ARTICLE_RETENTION: Duration = Duration::days(7);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleStoreSummary {
	pub article_count: u64,
	pub size_bytes: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetentionReport {
	#[serde(with = "time::serde::rfc3339")]
	pub cutoff: OffsetDateTime,
	pub deleted_count: u64,
}

impl NewsroomService {
	pub async fn article_store_summary(&self) -> Result<ArticleStoreSummary> {
		self.stores.content.summary().await
	}

	/// Empties the article store. Bookmarks keep their snapshots; interest profiles are untouched.
	pub async fn reset_article_store(&self) -> Result<()> {
		self.stores.content.reset().await?;

		tracing::warn!("Article store reset.");

		Ok(())
	}

	pub async fn clear_old_articles(&self) -> Result<RetentionReport> {
		self.clear_articles_fetched_before(OffsetDateTime::now_utc() - ARTICLE_RETENTION).await
	}

	pub async fn clear_articles_fetched_before(
		&self,
		cutoff: OffsetDateTime,
	) -> Result<RetentionReport> {
		let deleted_count = self.stores.content.delete_fetched_before(cutoff).await?;

		tracing::info!(%cutoff, deleted_count, "Old articles cleared.");

		Ok(RetentionReport { cutoff, deleted_count })
	}
}
