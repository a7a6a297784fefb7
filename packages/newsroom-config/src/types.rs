use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub query: Query,
	pub tags: Tags,
	#[serde(default)]
	pub daily: Daily,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub llm: LlmProviderConfig,
	pub web_search: WebSearchProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct WebSearchProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// Sent as the `api_token` query parameter.
	pub api_key: String,
	pub path: String,
	pub language: String,
	/// Optional comma-separated category filter, e.g. "tech,science".
	pub categories: Option<String>,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

/// Weights and sizes for the query pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Query {
	pub llm_weight: f64,
	pub interest_weight: f64,
	/// Articles returned per request.
	pub result_count: u32,
	/// Upper bound on the batch handed to the ranking step when supplementary results exist.
	pub candidate_count: u32,
	/// Articles requested from the content store.
	pub retrieve_count: u32,
	pub web_search_count: u32,
	/// Interest tags included in the query-plan prompt.
	#[serde(default = "default_plan_tag_count")]
	pub plan_tag_count: u32,
	/// Deadline applied to every collaborator call made by the pipeline.
	pub stage_timeout_ms: u64,
}

/// Interaction scoring. `time_scaling_factor`, `removal_threshold`, and `similar_tag_weight` are
/// accepted and validated but nothing applies them yet.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tags {
	pub click_score: f64,
	pub bookmark_score: f64,
	pub time_scaling_factor: f64,
	pub removal_threshold: f64,
	#[serde(default)]
	pub similar_tag_weight: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Daily {
	pub tag_count: u32,
	pub retrieve_count: u32,
	pub article_count: u32,
	pub greeting: String,
}
impl Default for Daily {
	fn default() -> Self {
		Self {
			tag_count: 10,
			retrieve_count: 10,
			article_count: 3,
			greeting: "Good news! Here are some articles you may like:".to_string(),
		}
	}
}

fn default_plan_tag_count() -> u32 {
	5
}
