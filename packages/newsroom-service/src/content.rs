use std::sync::Arc;

use time::OffsetDateTime;

use newsroom_domain::{Article, ArticleMetadata};
use newsroom_storage::{articles, db::Db};

use crate::{ArticleStoreSummary, BoxFuture, ContentStore, Result};

pub struct PgContentStore {
	db: Arc<Db>,
}
impl PgContentStore {
	pub fn new(db: Arc<Db>) -> Self {
		Self { db }
	}
}
impl ContentStore for PgContentStore {
	fn search<'a>(&'a self, query_text: &'a str, limit: u32) -> BoxFuture<'a, Result<Vec<Article>>> {
		Box::pin(async move { Ok(articles::search_articles(&self.db, query_text, limit).await?) })
	}

	fn exists<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move { Ok(articles::article_exists(&self.db, url).await?) })
	}

	fn get_by_id<'a>(&'a self, article_id: &'a str) -> BoxFuture<'a, Result<Option<Article>>> {
		Box::pin(async move { Ok(articles::get_article(&self.db, article_id).await?) })
	}

	fn insert<'a>(
		&'a self,
		title: &'a str,
		body: &'a str,
		metadata: &'a ArticleMetadata,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(articles::insert_article(&self.db, title, body, metadata).await?) })
	}

	fn update_metadata<'a>(
		&'a self,
		article_id: &'a str,
		metadata: &'a ArticleMetadata,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			Ok(articles::update_article_metadata(&self.db, article_id, metadata).await?)
		})
	}

	fn summary(&self) -> BoxFuture<'_, Result<ArticleStoreSummary>> {
		Box::pin(async move {
			let (article_count, size_bytes) = articles::article_summary(&self.db).await?;

			Ok(ArticleStoreSummary {
				article_count: u64::try_from(article_count).unwrap_or_default(),
				size_bytes: u64::try_from(size_bytes).unwrap_or_default(),
			})
		})
	}

	fn delete_fetched_before(&self, cutoff: OffsetDateTime) -> BoxFuture<'_, Result<u64>> {
		Box::pin(async move { Ok(articles::delete_articles_fetched_before(&self.db, cutoff).await?) })
	}

	fn reset(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move { Ok(articles::reset_articles(&self.db).await?) })
	}
}
