//! Prompt construction and reply parsing for every model interaction the engine makes.
//!
//! Replies follow a small tag-delimited protocol. Structured payloads are wrapped in a single
//! `<response>` envelope (keywords use `<keywords>`), and fields inside the envelope are either
//! `key=value` pairs or a bracketed index list. Parsers never return partially decoded values:
//! a reply either yields the typed result or a [`ParseError`].

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::article::Article;

pub const MAX_KEYWORDS: usize = 5;

pub const KEYWORDS_REPLY_FORMAT: &str = "<keywords>keyword1, keyword2</keywords>";
pub const QUERY_PLAN_REPLY_FORMAT: &str = "<response>web_search_required=true/false, \
web_search_phrase='search phrase for news', rag_query='search query for the article database'</response>";
pub const RANKING_REPLY_FORMAT: &str = "<response>[index1, index2, ...]</response>";
pub const SUMMARY_REPLY_FORMAT: &str = "<response>short answer</response>";

const RESPONSE_TAG: &str = "response";
const KEYWORDS_TAG: &str = "keywords";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
	#[error("Reply is missing the <{tag}> envelope.")]
	MissingEnvelope { tag: &'static str },
	#[error("Reply is missing the {field} field.")]
	MissingField { field: &'static str },
	#[error("Reply field {field} is malformed.")]
	MalformedField { field: &'static str },
	#[error("Reply contains no {what}.")]
	Empty { what: &'static str },
}

/// Instructions plus the request-specific input. Adapters decide how the two are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
	pub instructions: Option<String>,
	pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
	pub web_search_required: bool,
	pub web_search_phrase: String,
	pub rag_query: String,
}

/// Optional context folded into the query-plan prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanContext<'a> {
	pub previous_snippet: Option<&'a str>,
	pub top_tags: Option<&'a [String]>,
	pub conversation_history: Option<&'a str>,
}

pub fn build_keyword_prompt(user_input: &str) -> Prompt {
	let input = format!(
		"You generate keywords for a news retrieval system. The user wrote: '{user_input}'. \
Return 1 to {MAX_KEYWORDS} specific, concise keywords that best represent the topics to search for. \
Avoid broad or irrelevant words and avoid synonyms of each other. \
Return them as a comma-separated list formatted exactly as '{KEYWORDS_REPLY_FORMAT}'. \
For example, for 'give me some cool AI startups' return '<keywords>AI, startups</keywords>'. \
Do not include explanations or any other text."
	);

	Prompt { instructions: None, input }
}

pub fn build_query_plan_prompt(user_input: &str, context: PlanContext<'_>) -> Prompt {
	let instructions = format!(
		"You are a news recommendation expert helping to find relevant news articles for a user. \
You receive the user's query, a snippet from a previously recommended article the user refers to \
(if any), the conversation history (if any), and the tags the user is most interested in (if any). \
You must:\n\
1a. Decide whether a web search for older news is necessary, i.e. whether the query needs \
historical context that news from the past week would not cover.\n\
1b. Formulate a web search phrase of one to three words for that search.\n\
2. Formulate a specific and effective search query for the article database.\n\
Reply exactly in this format:\n{QUERY_PLAN_REPLY_FORMAT}"
	);
	let mut input = format!(
		"user_query='{user_input}'. previous_article_snippet='{}'. ",
		context.previous_snippet.filter(|snippet| !snippet.trim().is_empty()).unwrap_or("none"),
	);

	if let Some(tags) = context.top_tags {
		input.push_str(&format!("top_tags=[{}]. ", quote_list(tags)));
	}
	if let Some(history) = context.conversation_history.filter(|history| !history.trim().is_empty())
	{
		input.push_str(&format!("conversation_history={history}. "));
	}

	Prompt { instructions: Some(instructions), input: input.trim_end().to_string() }
}

pub fn build_ranking_prompt(query: &str, candidates: &[Article]) -> Prompt {
	let count = candidates.len();
	let instructions = format!(
		"You are a news recommendation expert. You receive the user's query and a list of \
candidate articles. Rank all {count} articles from most to least relevant to the query. \
Every index must appear exactly once, in decreasing order of relevance. \
Reply exactly in this format:\n{RANKING_REPLY_FORMAT}"
	);
	let input = format!("user_query={query}\narticles:\n{}", enumerate_articles(candidates));

	Prompt { instructions: Some(instructions), input }
}

pub fn build_summary_prompt(query: &str, selected: &[Article]) -> Prompt {
	let count = selected.len();
	let instructions = format!(
		"You are a news recommendation expert curating news articles to answer the user's query. \
You receive the user's query and {count} articles. Write a short answer to the query that \
summarizes these articles. Reply exactly in this format:\n{SUMMARY_REPLY_FORMAT}"
	);
	let input = format!("user_query='{query}'.\narticles:\n{}", enumerate_articles(selected));

	Prompt { instructions: Some(instructions), input }
}

/// Prompt for the daily digest, which summarizes a fixed selection without a user query.
pub fn build_digest_prompt(articles: &[Article]) -> Prompt {
	let mut listing = String::new();

	for (index, article) in articles.iter().enumerate() {
		listing.push_str(&format!(
			"Article {index}:\n- Title: {}\n- Content: {}\n\n",
			article.title, article.body
		));
	}

	let input = format!(
		"Generate a short summary in 60 words for the following articles:\n\n{listing}\
Return your response as a single sentence formatted exactly as '{SUMMARY_REPLY_FORMAT}'."
	);

	Prompt { instructions: None, input }
}

pub fn parse_keywords(raw: &str) -> Result<Vec<String>, ParseError> {
	let body = envelope(raw, KEYWORDS_TAG)?;
	let keywords: Vec<String> = body
		.split(',')
		.map(str::trim)
		.filter(|keyword| !keyword.is_empty())
		.take(MAX_KEYWORDS)
		.map(str::to_string)
		.collect();

	if keywords.is_empty() {
		return Err(ParseError::Empty { what: "keywords" });
	}

	Ok(keywords)
}

/// Whitespace tokenization used when the model cannot produce keywords.
pub fn fallback_keywords(user_input: &str) -> Vec<String> {
	user_input.split_whitespace().map(str::to_string).collect()
}

pub fn parse_query_plan(raw: &str) -> Result<QueryPlan, ParseError> {
	let body = envelope(raw, RESPONSE_TAG)?;
	let web_search_required = match capture(r"(?i)web_search_required\s*=\s*(true|false)", body) {
		Some(flag) => flag.eq_ignore_ascii_case("true"),
		None => false,
	};
	let web_search_phrase = quoted_field(body, "web_search_phrase").unwrap_or_default();
	let rag_query = quoted_field(body, "rag_query")
		.filter(|query| !query.is_empty())
		.ok_or(ParseError::MissingField { field: "rag_query" })?;

	Ok(QueryPlan { web_search_required, web_search_phrase, rag_query })
}

/// Parses a ranking reply into candidate indices, most relevant first.
pub fn parse_ranking(raw: &str) -> Result<Vec<usize>, ParseError> {
	let list = capture(r"(?s)<response>\s*\[(.*?)\]\s*</response>", raw)
		.ok_or(ParseError::MissingField { field: "ranking" })?;
	let mut order = Vec::new();

	for item in list.split(',') {
		let item = item.trim();

		if item.is_empty() {
			continue;
		}

		let index = item.parse().map_err(|_| ParseError::MalformedField { field: "ranking" })?;

		order.push(index);
	}

	if order.is_empty() {
		return Err(ParseError::Empty { what: "ranking indices" });
	}

	Ok(order)
}

pub fn parse_summary(raw: &str) -> Result<String, ParseError> {
	let body = envelope(raw, RESPONSE_TAG)?.trim();

	if body.is_empty() {
		return Err(ParseError::Empty { what: "summary" });
	}

	Ok(body.to_string())
}

fn enumerate_articles(articles: &[Article]) -> String {
	let mut out = String::new();

	for (index, article) in articles.iter().enumerate() {
		out.push_str(&format!(
			"index={index}:\ntitle={}\ndescription/summary={}\n",
			article.title, article.body
		));
	}

	out
}

fn quote_list(values: &[String]) -> String {
	values.iter().map(|value| format!("'{value}'")).collect::<Vec<_>>().join(", ")
}

fn envelope<'a>(raw: &'a str, tag: &'static str) -> Result<&'a str, ParseError> {
	capture(&format!(r"(?s)<{tag}>(.*?)</{tag}>"), raw).ok_or(ParseError::MissingEnvelope { tag })
}

fn quoted_field(body: &str, field: &str) -> Option<String> {
	let pattern = format!(r#"{field}\s*=\s*(?:'([^']*)'|"([^"]*)")"#);
	let re = Regex::new(&pattern).ok()?;
	let captures = re.captures(body)?;
	let value = captures.get(1).or_else(|| captures.get(2))?;

	Some(value.as_str().trim().to_string())
}

fn capture<'a>(pattern: &str, haystack: &'a str) -> Option<&'a str> {
	let re = Regex::new(pattern).ok()?;

	re.captures(haystack).and_then(|captures| captures.get(1)).map(|value| value.as_str())
}
