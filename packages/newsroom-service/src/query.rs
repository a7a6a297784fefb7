//! Query Orchestrator.
//!
//! `generate_response` runs plan, retrieve, augment, rank, summarize, and annotate strictly in
//! sequence. Plan, retrieve, and summarize failures end the request; augment and ranking failures
//! degrade. `daily_recommendation` retrieves by the user's top tags and summarizes the first few
//! results without model re-ranking.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use newsroom_domain::{
	AnnotatedArticle, Article,
	protocol::{self, PlanContext, QueryPlan},
};

use crate::{Error, NewsroomService, RankingRequest, Result};

/// Summary used when nothing was selected, in place of a model call.
pub const EMPTY_SELECTION_SUMMARY: &str = "No matching articles were found.";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QueryRequest {
	pub query: String,
	pub user_id: String,
	#[serde(default)]
	pub workspace_id: Option<String>,
	/// Prior conversation, passed to the planner verbatim.
	#[serde(default)]
	pub context: Option<String>,
	/// Snippet of a previously shown article the user is referring to.
	#[serde(default)]
	pub quote: Option<String>,
	/// Articles already shown in this session.
	#[serde(default)]
	pub news_ids: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryResponse {
	pub articles: Vec<AnnotatedArticle>,
	pub summary: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailyResponse {
	pub articles: Vec<AnnotatedArticle>,
	pub summary: String,
}

impl NewsroomService {
	pub async fn generate_response(&self, req: QueryRequest) -> Result<QueryResponse> {
		let query = req.query.trim();
		let user_id = req.user_id.trim();

		if query.is_empty() || user_id.is_empty() {
			return Err(Error::InvalidRequest {
				message: "query and user_id are required.".to_string(),
			});
		}

		let workspace_id = req.workspace_id.as_deref().map(str::trim).filter(|id| !id.is_empty());
		let plan = self
			.plan(query, user_id, workspace_id, req.context.as_deref(), req.quote.as_deref())
			.await?;

		tracing::info!(
			user_id,
			workspace_id,
			web_search_required = plan.web_search_required,
			"Query planned."
		);

		let retrieved = self.retrieve(&plan.rag_query, self.cfg.query.retrieve_count).await?;
		let supplementary = if plan.web_search_required { self.augment(&plan).await } else { Vec::new() };
		let excluded: HashSet<String> = req.news_ids.into_iter().collect();
		let selected = self
			.select_articles(RankingRequest {
				query,
				user_id,
				workspace_id,
				retrieved,
				supplementary,
				excluded: &excluded,
			})
			.await?;
		let summary = if selected.is_empty() {
			EMPTY_SELECTION_SUMMARY.to_string()
		} else {
			let prompt = protocol::build_summary_prompt(query, &selected);

			protocol::parse_summary(&self.complete("summarize", &prompt).await?)?
		};
		let articles = self.annotate(selected, user_id, workspace_id).await?;

		tracing::info!(user_id, workspace_id, articles = articles.len(), "Query answered.");

		Ok(QueryResponse { articles, summary })
	}

	pub async fn daily_recommendation(
		&self,
		user_id: &str,
		workspace_id: &str,
	) -> Result<DailyResponse> {
		let (user_id, workspace_id) = crate::bookmarks::require_owner(user_id, workspace_id)?;
		let daily = &self.cfg.daily;
		let tags = self
			.stores
			.interests
			.top_tags(user_id, Some(workspace_id), daily.tag_count as usize)
			.await?;
		let mut selected = self.retrieve(&tags.join(" "), daily.retrieve_count).await?;

		selected.truncate(daily.article_count as usize);

		let summary = if selected.is_empty() {
			EMPTY_SELECTION_SUMMARY.to_string()
		} else {
			let prompt = protocol::build_digest_prompt(&selected);
			let digest = protocol::parse_summary(&self.complete("summarize", &prompt).await?)?;

			format!("{}\n{digest}", daily.greeting)
		};
		let articles = self.annotate(selected, user_id, Some(workspace_id)).await?;

		tracing::info!(
			user_id,
			workspace_id,
			tags = tags.len(),
			articles = articles.len(),
			"Daily recommendation built."
		);

		Ok(DailyResponse { articles, summary })
	}

	/// Keywords for `user_input`. Falls back to whitespace tokens when the model is unavailable or
	/// its reply is malformed.
	pub async fn generate_keywords(&self, user_input: &str) -> Vec<String> {
		let prompt = protocol::build_keyword_prompt(user_input);
		let parsed = match self.complete("keywords", &prompt).await {
			Ok(raw) => protocol::parse_keywords(&raw).map_err(Error::from),
			Err(err) => Err(err),
		};

		parsed.unwrap_or_else(|err| {
			tracing::warn!(error = %err, "Keyword extraction failed. Using whitespace tokens.");

			protocol::fallback_keywords(user_input)
		})
	}

	async fn plan(
		&self,
		query: &str,
		user_id: &str,
		workspace_id: Option<&str>,
		conversation_history: Option<&str>,
		quote: Option<&str>,
	) -> Result<QueryPlan> {
		let top_tags = match workspace_id {
			Some(workspace_id) => Some(
				self.stores
					.interests
					.top_tags(user_id, Some(workspace_id), self.cfg.query.plan_tag_count as usize)
					.await?,
			),
			None => None,
		};
		let prompt = protocol::build_query_plan_prompt(
			query,
			PlanContext {
				previous_snippet: quote,
				top_tags: top_tags.as_deref(),
				conversation_history,
			},
		);
		let raw = self.complete("plan", &prompt).await?;

		Ok(protocol::parse_query_plan(&raw)?)
	}

	async fn retrieve(&self, query_text: &str, limit: u32) -> Result<Vec<Article>> {
		self.bounded("retrieve", self.stores.content.search(query_text, limit)).await?.map_err(
			|err| match err {
				Error::Storage { message } => Error::unavailable("content_store", message),
				other => other,
			},
		)
	}

	/// Supplementary search. Failures and timeouts yield no results.
	async fn augment(&self, plan: &QueryPlan) -> Vec<Article> {
		let phrase = match plan.web_search_phrase.trim() {
			"" => plan.rag_query.as_str(),
			phrase => phrase,
		};
		let search = self.providers.web_search.search(
			&self.cfg.providers.web_search,
			phrase,
			self.cfg.query.web_search_count,
		);

		match self.bounded("augment", search).await {
			Ok(Ok(articles)) => {
				tracing::info!(phrase, found = articles.len(), "Supplementary search complete.");

				articles
			},
			Ok(Err(err)) => {
				tracing::warn!(error = %err, phrase, "Supplementary search failed. Continuing without it.");

				Vec::new()
			},
			Err(err) => {
				tracing::warn!(error = %err, phrase, "Supplementary search timed out. Continuing without it.");

				Vec::new()
			},
		}
	}
}
