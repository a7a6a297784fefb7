//! Interest score ledger keyed by (user, workspace, tag).

use crate::{Result, db::Db, schema};

/// Adds `delta` to the tag score, creating the record on first use. Concurrent writers to one key
/// are serialized by the row lock taken by the upsert.
pub async fn add_score(
	db: &Db,
	user_id: &str,
	workspace_id: &str,
	tag: &str,
	delta: f64,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO interest_scores (user_id, workspace_id, tag, score)
VALUES ($1, $2, $3, $4)
ON CONFLICT (user_id, workspace_id, tag)
DO UPDATE SET score = interest_scores.score + excluded.score, updated_at = now()",
	)
	.bind(user_id)
	.bind(workspace_id)
	.bind(tag)
	.bind(delta)
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Score of `tag` for the user. Without a workspace the scores of every workspace are summed.
pub async fn tag_score(
	db: &Db,
	user_id: &str,
	tag: &str,
	workspace_id: Option<&str>,
) -> Result<f64> {
	let score: f64 = sqlx::query_scalar(
		"\
SELECT COALESCE(SUM(score), 0)::double precision
FROM interest_scores
WHERE user_id = $1 AND tag = $2 AND ($3::text IS NULL OR workspace_id = $3)",
	)
	.bind(user_id)
	.bind(tag)
	.bind(workspace_id)
	.fetch_one(&db.pool)
	.await?;

	Ok(score)
}

/// Highest scoring tags, ties broken by first-seen order.
pub async fn top_tags(
	db: &Db,
	user_id: &str,
	workspace_id: Option<&str>,
	k: u32,
) -> Result<Vec<String>> {
	let tags: Vec<String> = sqlx::query_scalar(
		"\
SELECT tag
FROM interest_scores
WHERE user_id = $1 AND ($2::text IS NULL OR workspace_id = $2)
GROUP BY tag
ORDER BY SUM(score) DESC, MIN(seq) ASC
LIMIT $3",
	)
	.bind(user_id)
	.bind(workspace_id)
	.bind(i64::from(k))
	.fetch_all(&db.pool)
	.await?;

	Ok(tags)
}

/// Deletes every record scoped to the workspace and returns how many were removed.
pub async fn reset_workspace(db: &Db, workspace_id: &str) -> Result<u64> {
	let result = sqlx::query("DELETE FROM interest_scores WHERE workspace_id = $1")
		.bind(workspace_id)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected())
}

/// Drops and recreates the ledger.
pub async fn clear_all(db: &Db) -> Result<()> {
	let mut tx = db.pool.begin().await?;

	sqlx::query("DROP TABLE IF EXISTS interest_scores").execute(&mut *tx).await?;

	for statement in schema::statements(schema::interest_scores_table()) {
		sqlx::query(statement).execute(&mut *tx).await?;
	}

	tx.commit().await?;

	Ok(())
}
