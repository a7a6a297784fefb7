use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;
use time::OffsetDateTime;

use newsroom_domain::{Article, ArticleMetadata, article_id_for_url};

/// Searches the news API for `phrase`. Results carry ids derived from their URLs.
pub async fn search(
	cfg: &newsroom_config::WebSearchProviderConfig,
	phrase: &str,
	limit: u32,
) -> Result<Vec<Article>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let limit_param = limit.to_string();
	let mut params = vec![
		("api_token", cfg.api_key.as_str()),
		("search", phrase),
		("language", cfg.language.as_str()),
		("limit", limit_param.as_str()),
	];

	if let Some(categories) = cfg.categories.as_deref() {
		params.push(("categories", categories));
	}

	let res = client
		.get(&url)
		.headers(crate::extra_headers(&cfg.default_headers)?)
		.query(&params)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_search_results(&json, OffsetDateTime::now_utc(), limit as usize)
}

/// At most `limit` articles, whatever the upstream returned.
fn parse_search_results(
	json: &Value,
	fetched_at: OffsetDateTime,
	limit: usize,
) -> Result<Vec<Article>> {
	let data = json
		.get("data")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Search response is missing data array."))?;
	let mut articles = Vec::with_capacity(data.len().min(limit));

	for item in data {
		if articles.len() == limit {
			break;
		}

		// Items without a URL cannot be given a stable id.
		let Some(url) = item.get("url").and_then(|v| v.as_str()).filter(|url| !url.is_empty())
		else {
			continue;
		};
		articles.push(Article {
			id: article_id_for_url(url),
			title: str_field(item, "title").to_string(),
			body: str_field(item, "description").to_string(),
			metadata: ArticleMetadata {
				url: url.to_string(),
				tags: Vec::new(),
				fetch_date: fetched_at,
				source: str_field(item, "source").to_string(),
				publish_date: item
					.get("published_at")
					.and_then(|v| v.as_str())
					.map(str::to_string),
			},
		});
	}

	Ok(articles)
}

fn str_field<'a>(item: &'a Value, key: &str) -> &'a str {
	item.get(key).and_then(|v| v.as_str()).unwrap_or_default()
}
