use std::sync::Arc;

use uuid::Uuid;

use newsroom_domain::{AnnotatedArticle, Article, Bookmark, InteractionKind};
use newsroom_storage::{bookmarks, db::Db};

use crate::{BookmarkStore, BoxFuture, Error, NewsroomService, Result};

pub struct PgBookmarkStore {
	db: Arc<Db>,
}
impl PgBookmarkStore {
	pub fn new(db: Arc<Db>) -> Self {
		Self { db }
	}
}
impl BookmarkStore for PgBookmarkStore {
	fn annotate<'a>(
		&'a self,
		articles: Vec<Article>,
		user_id: &'a str,
		workspace_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<AnnotatedArticle>>> {
		Box::pin(async move {
			let ids: Vec<String> = articles.iter().map(|article| article.id.clone()).collect();
			let marked =
				bookmarks::bookmarked_article_ids(&self.db, user_id, workspace_id, &ids).await?;

			Ok(articles
				.into_iter()
				.map(|article| {
					let bookmarked = marked.contains(&article.id);

					AnnotatedArticle { article, bookmarked }
				})
				.collect())
		})
	}

	fn add<'a>(
		&'a self,
		article: &'a Article,
		user_id: &'a str,
		workspace_id: &'a str,
		note: Option<&'a str>,
	) -> BoxFuture<'a, Result<Option<Uuid>>> {
		Box::pin(async move {
			Ok(bookmarks::insert_bookmark(&self.db, article, user_id, workspace_id, note).await?)
		})
	}

	fn list<'a>(
		&'a self,
		user_id: &'a str,
		workspace_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<Bookmark>>> {
		Box::pin(async move { Ok(bookmarks::list_bookmarks(&self.db, user_id, workspace_id).await?) })
	}

	fn delete(&self, bookmark_id: Uuid) -> BoxFuture<'_, Result<bool>> {
		Box::pin(async move { Ok(bookmarks::delete_bookmark(&self.db, bookmark_id).await?) })
	}

	fn delete_by_article<'a>(
		&'a self,
		article_id: &'a str,
		user_id: &'a str,
		workspace_id: &'a str,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move {
			Ok(bookmarks::delete_bookmark_by_article(&self.db, article_id, user_id, workspace_id)
				.await?)
		})
	}

	fn delete_all<'a>(
		&'a self,
		user_id: &'a str,
		workspace_id: &'a str,
	) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			Ok(bookmarks::delete_all_bookmarks(&self.db, user_id, workspace_id).await?)
		})
	}
}

impl NewsroomService {
	/// Bookmarks an article with an optional note and credits its tags with the bookmark score.
	/// Returns `false` when the article was already bookmarked, in which case no interest is
	/// credited. A failed credit removes the new bookmark again so the call can be retried.
	pub async fn add_bookmark(
		&self,
		article_id: &str,
		user_id: &str,
		workspace_id: &str,
		note: Option<&str>,
	) -> Result<bool> {
		let (user_id, workspace_id) = require_owner(user_id, workspace_id)?;
		let article = self
			.stores
			.content
			.get_by_id(article_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("article {article_id}") })?;
		let note = note.map(str::trim).filter(|note| !note.is_empty());
		let Some(bookmark_id) =
			self.stores.bookmarks.add(&article, user_id, workspace_id, note).await?
		else {
			tracing::debug!(article_id, user_id, workspace_id, "Article already bookmarked.");

			return Ok(false);
		};

		if let Err(err) = self
			.interact_with_article(article_id, user_id, workspace_id, InteractionKind::Bookmark)
			.await
		{
			tracing::warn!(error = %err, %bookmark_id, "Interest credit failed. Removing bookmark.");

			if let Err(rollback) = self.stores.bookmarks.delete(bookmark_id).await {
				tracing::error!(error = %rollback, %bookmark_id, "Bookmark rollback failed.");
			}

			return Err(err);
		}

		tracing::info!(%bookmark_id, article_id, user_id, workspace_id, "Bookmark added.");

		Ok(true)
	}

	pub async fn list_bookmarks(&self, user_id: &str, workspace_id: &str) -> Result<Vec<Bookmark>> {
		let (user_id, workspace_id) = require_owner(user_id, workspace_id)?;

		self.stores.bookmarks.list(user_id, workspace_id).await
	}

	pub async fn delete_bookmark(&self, bookmark_id: Uuid) -> Result<bool> {
		self.stores.bookmarks.delete(bookmark_id).await
	}

	pub async fn delete_bookmark_by_article(
		&self,
		article_id: &str,
		user_id: &str,
		workspace_id: &str,
	) -> Result<bool> {
		let (user_id, workspace_id) = require_owner(user_id, workspace_id)?;

		self.stores.bookmarks.delete_by_article(article_id, user_id, workspace_id).await
	}

	pub async fn delete_all_bookmarks(&self, user_id: &str, workspace_id: &str) -> Result<u64> {
		let (user_id, workspace_id) = require_owner(user_id, workspace_id)?;

		self.stores.bookmarks.delete_all(user_id, workspace_id).await
	}

	/// Sets the `bookmarked` flag. Without a workspace nothing can be bookmarked.
	pub(crate) async fn annotate(
		&self,
		articles: Vec<Article>,
		user_id: &str,
		workspace_id: Option<&str>,
	) -> Result<Vec<AnnotatedArticle>> {
		match workspace_id {
			Some(workspace_id) =>
				self.bounded(
					"annotate",
					self.stores.bookmarks.annotate(articles, user_id, workspace_id),
				)
				.await?,
			None => Ok(articles
				.into_iter()
				.map(|article| AnnotatedArticle { article, bookmarked: false })
				.collect()),
		}
	}
}

pub(crate) fn require_owner<'a>(
	user_id: &'a str,
	workspace_id: &'a str,
) -> Result<(&'a str, &'a str)> {
	let user_id = user_id.trim();
	let workspace_id = workspace_id.trim();

	if user_id.is_empty() || workspace_id.is_empty() {
		return Err(Error::InvalidRequest {
			message: "user_id and workspace_id are required.".to_string(),
		});
	}

	Ok((user_id, workspace_id))
}
