use std::collections::HashSet;

use uuid::Uuid;

use newsroom_domain::{Article, Bookmark};

use crate::{Result, db::Db, models::BookmarkRow};

/// Stores a bookmark snapshot of the article. Returns `None` when the user already bookmarked it
/// in this workspace.
pub async fn insert_bookmark(
	db: &Db,
	article: &Article,
	user_id: &str,
	workspace_id: &str,
	note: Option<&str>,
) -> Result<Option<Uuid>> {
	let bookmark_id: Option<Uuid> = sqlx::query_scalar(
		"\
INSERT INTO bookmarks (bookmark_id, article_id, user_id, workspace_id, title, body, url, note)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
ON CONFLICT (article_id, user_id, workspace_id) DO NOTHING
RETURNING bookmark_id",
	)
	.bind(Uuid::new_v4())
	.bind(article.id.as_str())
	.bind(user_id)
	.bind(workspace_id)
	.bind(article.title.as_str())
	.bind(article.body.as_str())
	.bind(article.metadata.url.as_str())
	.bind(note)
	.fetch_optional(&db.pool)
	.await?;

	Ok(bookmark_id)
}

/// Ids among `article_ids` that the user bookmarked in the workspace.
pub async fn bookmarked_article_ids(
	db: &Db,
	user_id: &str,
	workspace_id: &str,
	article_ids: &[String],
) -> Result<HashSet<String>> {
	if article_ids.is_empty() {
		return Ok(HashSet::new());
	}

	let ids: Vec<String> = sqlx::query_scalar(
		"\
SELECT article_id
FROM bookmarks
WHERE user_id = $1 AND workspace_id = $2 AND article_id = ANY($3)",
	)
	.bind(user_id)
	.bind(workspace_id)
	.bind(article_ids)
	.fetch_all(&db.pool)
	.await?;

	Ok(ids.into_iter().collect())
}

pub async fn list_bookmarks(db: &Db, user_id: &str, workspace_id: &str) -> Result<Vec<Bookmark>> {
	let rows: Vec<BookmarkRow> = sqlx::query_as(
		"\
SELECT bookmark_id, article_id, user_id, workspace_id, title, body, url, note, created_at
FROM bookmarks
WHERE user_id = $1 AND workspace_id = $2
ORDER BY created_at DESC, bookmark_id",
	)
	.bind(user_id)
	.bind(workspace_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows.into_iter().map(Bookmark::from).collect())
}

pub async fn delete_bookmark(db: &Db, bookmark_id: Uuid) -> Result<bool> {
	let result = sqlx::query("DELETE FROM bookmarks WHERE bookmark_id = $1")
		.bind(bookmark_id)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn delete_bookmark_by_article(
	db: &Db,
	article_id: &str,
	user_id: &str,
	workspace_id: &str,
) -> Result<bool> {
	let result = sqlx::query(
		"DELETE FROM bookmarks WHERE article_id = $1 AND user_id = $2 AND workspace_id = $3",
	)
	.bind(article_id)
	.bind(user_id)
	.bind(workspace_id)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn delete_all_bookmarks(db: &Db, user_id: &str, workspace_id: &str) -> Result<u64> {
	let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND workspace_id = $2")
		.bind(user_id)
		.bind(workspace_id)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected())
}
