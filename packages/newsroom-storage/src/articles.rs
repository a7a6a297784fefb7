//! Article content store.
//!
//! Search is a full-text match over title and body. Query text is reduced to plain terms that are
//! OR-ed together, so any shared term makes an article a candidate; `ts_rank` orders the matches
//! and fetch time breaks ties. A query without usable terms returns the most recent articles.

use time::OffsetDateTime;
use uuid::Uuid;

use newsroom_domain::{Article, ArticleMetadata};

use crate::{Error, Result, db::Db, models::ArticleRow, schema};

const ARTICLE_COLUMNS: &str =
	"article_id, title, body, url, tags, source, publish_date, fetch_date";

pub async fn search_articles(db: &Db, query_text: &str, limit: u32) -> Result<Vec<Article>> {
	let terms = search_terms(query_text);
	let rows: Vec<ArticleRow> = if terms.is_empty() {
		sqlx::query_as(&format!(
			"SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY fetch_date DESC LIMIT $1"
		))
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?
	} else {
		sqlx::query_as(&format!(
			"\
SELECT {ARTICLE_COLUMNS}
FROM articles
WHERE search_vec @@ websearch_to_tsquery('english', $1)
ORDER BY ts_rank(search_vec, websearch_to_tsquery('english', $1)) DESC, fetch_date DESC
LIMIT $2"
		))
		.bind(terms.join(" or "))
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?
	};

	rows.into_iter().map(ArticleRow::into_article).collect()
}

pub async fn article_exists(db: &Db, url: &str) -> Result<bool> {
	let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM articles WHERE url = $1)")
		.bind(url.trim())
		.fetch_one(&db.pool)
		.await?;

	Ok(exists)
}

pub async fn get_article(db: &Db, article_id: &str) -> Result<Option<Article>> {
	let row: Option<ArticleRow> =
		sqlx::query_as(&format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE article_id = $1"))
			.bind(article_id)
			.fetch_optional(&db.pool)
			.await?;

	row.map(ArticleRow::into_article).transpose()
}

/// Stores a new article under a fresh id and returns the id.
pub async fn insert_article(
	db: &Db,
	title: &str,
	body: &str,
	metadata: &ArticleMetadata,
) -> Result<String> {
	if metadata.url.trim().is_empty() {
		return Err(Error::InvalidArgument("Article URL must be non-empty.".to_string()));
	}

	let article_id = Uuid::new_v4().to_string();

	sqlx::query(
		"\
INSERT INTO articles (article_id, title, body, url, tags, source, publish_date, fetch_date)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
	)
	.bind(article_id.as_str())
	.bind(title)
	.bind(body)
	.bind(metadata.url.trim())
	.bind(crate::models::encode_tags(&metadata.tags))
	.bind(metadata.source.as_str())
	.bind(metadata.publish_date.as_deref())
	.bind(metadata.fetch_date)
	.execute(&db.pool)
	.await?;

	Ok(article_id)
}

pub async fn update_article_metadata(
	db: &Db,
	article_id: &str,
	metadata: &ArticleMetadata,
) -> Result<()> {
	let result = sqlx::query(
		"\
UPDATE articles
SET url = $2, tags = $3, source = $4, publish_date = $5, fetch_date = $6
WHERE article_id = $1",
	)
	.bind(article_id)
	.bind(metadata.url.trim())
	.bind(crate::models::encode_tags(&metadata.tags))
	.bind(metadata.source.as_str())
	.bind(metadata.publish_date.as_deref())
	.bind(metadata.fetch_date)
	.execute(&db.pool)
	.await?;

	if result.rows_affected() == 0 {
		return Err(Error::NotFound(format!("article {article_id}")));
	}

	Ok(())
}

/// Stored article count and the on-disk size of the table with its indexes.
pub async fn article_summary(db: &Db) -> Result<(i64, i64)> {
	let summary: (i64, i64) = sqlx::query_as(
		"SELECT (SELECT count(*) FROM articles), pg_total_relation_size('articles')",
	)
	.fetch_one(&db.pool)
	.await?;

	Ok(summary)
}

/// Deletes articles fetched before `cutoff` and returns how many were removed.
pub async fn delete_articles_fetched_before(db: &Db, cutoff: OffsetDateTime) -> Result<u64> {
	let result = sqlx::query("DELETE FROM articles WHERE fetch_date < $1")
		.bind(cutoff)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected())
}

/// Drops and recreates the article store.
pub async fn reset_articles(db: &Db) -> Result<()> {
	let mut tx = db.pool.begin().await?;

	sqlx::query("DROP TABLE IF EXISTS articles").execute(&mut *tx).await?;

	for statement in schema::statements(schema::articles_table()) {
		sqlx::query(statement).execute(&mut *tx).await?;
	}

	tx.commit().await?;

	Ok(())
}

/// Lowercased alphanumeric terms, deduplicated in first-seen order.
pub fn search_terms(query_text: &str) -> Vec<String> {
	let mut terms: Vec<String> = Vec::new();

	for raw in query_text.split(|c: char| !c.is_alphanumeric()) {
		if raw.is_empty() {
			continue;
		}

		let term = raw.to_lowercase();

		// `or` would be read as an operator by websearch_to_tsquery.
		if term == "or" || terms.contains(&term) {
			continue;
		}

		terms.push(term);
	}

	terms
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn terms_drop_operators_and_punctuation() {
		assert_eq!(
			search_terms("Latest AI-chip news, OR \"quotes\" -minus ai"),
			vec!["latest", "ai", "chip", "news", "quotes", "minus"]
		);
		assert!(search_terms("  ...  ").is_empty());
	}
}
