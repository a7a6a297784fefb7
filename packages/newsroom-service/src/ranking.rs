//! Ranking Engine.
//!
//! Two signals are fused per candidate: the model's relevance order, scored `1 / rank`, and the
//! summed interest score of the candidate's tags. Each signal is normalized to sum to one across
//! the batch before weighting, so neither dominates through scale alone. Exclusions are applied
//! after sorting: excluded candidates are dropped first and only re-enter, in batch order, when
//! the remaining pool is smaller than the requested count.

use std::collections::{HashMap, HashSet};

use newsroom_domain::{Article, protocol};

use crate::{NewsroomService, Result};

pub struct RankingRequest<'a> {
	pub query: &'a str,
	pub user_id: &'a str,
	pub workspace_id: Option<&'a str>,
	pub retrieved: Vec<Article>,
	/// Supplementary-search results, placed ahead of `retrieved`.
	pub supplementary: Vec<Article>,
	pub excluded: &'a HashSet<String>,
}

impl NewsroomService {
	/// Selects up to `query.result_count` articles in final rank order.
	pub async fn select_articles(&self, req: RankingRequest<'_>) -> Result<Vec<Article>> {
		let candidate_count = self.cfg.query.candidate_count as usize;
		let result_count = self.cfg.query.result_count as usize;
		let candidates = merge_candidates(req.retrieved, req.supplementary, candidate_count);

		if candidates.is_empty() {
			return Ok(Vec::new());
		}

		let order = self.llm_order(req.query, &candidates).await;
		let mut llm = llm_rank_scores(&order, candidates.len());
		let mut interest = self.interest_sums(&candidates, req.user_id, req.workspace_id).await?;

		normalize(&mut llm);
		normalize(&mut interest);

		let totals: Vec<f64> = llm
			.iter()
			.zip(&interest)
			.map(|(llm, interest)| {
				llm * self.cfg.query.llm_weight + interest * self.cfg.query.interest_weight
			})
			.collect();
		let ranked = sort_by_total(&totals);
		let picked = apply_exclusions(&ranked, &candidates, req.excluded, result_count);

		tracing::debug!(
			candidates = candidates.len(),
			ranked_by_model = order.len(),
			selected = picked.len(),
			"Ranking complete."
		);

		let mut slots: Vec<Option<Article>> = candidates.into_iter().map(Some).collect();

		Ok(picked.into_iter().filter_map(|index| slots[index].take()).collect())
	}

	/// Model relevance order. Any failure degrades to an empty order.
	async fn llm_order(&self, query: &str, candidates: &[Article]) -> Vec<usize> {
		let prompt = protocol::build_ranking_prompt(query, candidates);

		match self.complete("rank", &prompt).await {
			Ok(raw) => protocol::parse_ranking(&raw).unwrap_or_else(|err| {
				tracing::warn!(error = %err, "Ranking reply unusable. Falling back to interest signal.");

				Vec::new()
			}),
			Err(err) => {
				tracing::warn!(error = %err, "Ranking call failed. Falling back to interest signal.");

				Vec::new()
			},
		}
	}

	async fn interest_sums(
		&self,
		candidates: &[Article],
		user_id: &str,
		workspace_id: Option<&str>,
	) -> Result<Vec<f64>> {
		let mut cache: HashMap<&str, f64> = HashMap::new();
		let mut sums = Vec::with_capacity(candidates.len());

		for article in candidates {
			let mut sum = 0.0;

			for tag in article.tags() {
				let score = match cache.get(tag.as_str()) {
					Some(score) => *score,
					None => {
						let score =
							self.stores.interests.get_score(user_id, tag, workspace_id).await?;

						cache.insert(tag.as_str(), score);

						score
					},
				};

				sum += score;
			}

			sums.push(sum);
		}

		Ok(sums)
	}
}

/// Puts `supplementary` ahead of `retrieved`, drops repeated ids (first occurrence wins), and caps
/// the batch at `candidate_count` when supplementary results are present.
pub fn merge_candidates(
	retrieved: Vec<Article>,
	supplementary: Vec<Article>,
	candidate_count: usize,
) -> Vec<Article> {
	let capped = !supplementary.is_empty();
	let mut seen = HashSet::new();
	let mut merged: Vec<Article> = supplementary
		.into_iter()
		.chain(retrieved)
		.filter(|article| seen.insert(article.id.clone()))
		.collect();

	if capped {
		merged.truncate(candidate_count);
	}

	merged
}

/// `1 / rank` per candidate from a model order. Out-of-range and repeated indices are ignored;
/// candidates the model omitted score zero.
pub fn llm_rank_scores(order: &[usize], len: usize) -> Vec<f64> {
	let mut scores = vec![0.0; len];
	let mut seen = HashSet::new();

	for (position, &index) in order.iter().enumerate() {
		if index >= len || !seen.insert(index) {
			continue;
		}

		scores[index] = 1.0 / (position as f64 + 1.0);
	}

	scores
}

/// Scales to a unit sum. Left untouched unless the sum is positive.
pub fn normalize(scores: &mut [f64]) {
	let sum: f64 = scores.iter().sum();

	if sum > 0.0 && sum.is_finite() {
		for score in scores.iter_mut() {
			*score /= sum;
		}
	}
}

/// Candidate indices by descending total. Equal totals keep batch order.
pub fn sort_by_total(totals: &[f64]) -> Vec<usize> {
	let mut order: Vec<usize> = (0..totals.len()).collect();

	order.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));

	order
}

/// Takes `result_count` indices from `ranked`, skipping excluded ids. When too few remain, excluded
/// candidates are appended in their original batch order.
pub fn apply_exclusions(
	ranked: &[usize],
	candidates: &[Article],
	excluded: &HashSet<String>,
	result_count: usize,
) -> Vec<usize> {
	let is_excluded = |index: usize| excluded.contains(&candidates[index].id);
	let mut picked: Vec<usize> =
		ranked.iter().copied().filter(|&index| !is_excluded(index)).take(result_count).collect();

	if picked.len() < result_count {
		let missing = result_count - picked.len();

		picked.extend((0..candidates.len()).filter(|&index| is_excluded(index)).take(missing));
	}

	picked
}

#[cfg(test)]
mod tests {
	use time::OffsetDateTime;

	use newsroom_domain::ArticleMetadata;

	use super::*;

	fn article(id: &str) -> Article {
		Article {
			id: id.to_string(),
			title: id.to_uppercase(),
			body: String::new(),
			metadata: ArticleMetadata {
				url: format!("https://news.example/{id}"),
				tags: Vec::new(),
				fetch_date: OffsetDateTime::UNIX_EPOCH,
				source: "example".to_string(),
				publish_date: None,
			},
		}
	}

	fn ids(articles: &[Article]) -> Vec<&str> {
		articles.iter().map(|article| article.id.as_str()).collect()
	}

	#[test]
	fn supplementary_results_lead_and_cap_the_batch() {
		let retrieved = vec![article("r1"), article("s1"), article("r2"), article("r3")];
		let supplementary = vec![article("s1"), article("s2")];
		let merged = merge_candidates(retrieved, supplementary, 4);

		assert_eq!(ids(&merged), vec!["s1", "s2", "r1", "r2"]);
	}

	#[test]
	fn retrieval_only_batch_is_not_capped() {
		let retrieved = vec![article("r1"), article("r2"), article("r1"), article("r3")];
		let merged = merge_candidates(retrieved, Vec::new(), 2);

		assert_eq!(ids(&merged), vec!["r1", "r2", "r3"]);
	}

	#[test]
	fn rank_scores_follow_reply_positions() {
		assert_eq!(llm_rank_scores(&[2, 0, 1], 3), vec![0.5, 1.0 / 3.0, 1.0]);
		assert_eq!(llm_rank_scores(&[1, 9, 1], 3), vec![0.0, 1.0, 0.0]);
		assert_eq!(llm_rank_scores(&[], 2), vec![0.0, 0.0]);
	}

	#[test]
	fn normalization_skips_zero_sums() {
		let mut zero = vec![0.0, 0.0];
		let mut scores = vec![1.0, 3.0];

		normalize(&mut zero);
		normalize(&mut scores);

		assert_eq!(zero, vec![0.0, 0.0]);
		assert_eq!(scores, vec![0.25, 0.75]);
	}

	#[test]
	fn sorting_is_stable_for_ties() {
		assert_eq!(sort_by_total(&[0.2, 0.5, 0.2, 0.5]), vec![1, 3, 0, 2]);
	}

	#[test]
	fn excluded_candidates_backfill_in_batch_order() {
		let candidates: Vec<Article> = ["a", "b", "c", "d", "e"].into_iter().map(article).collect();
		let excluded: HashSet<String> =
			["a", "b", "d", "e"].into_iter().map(str::to_string).collect();
		let ranked = vec![4, 3, 2, 1, 0];
		let picked = apply_exclusions(&ranked, &candidates, &excluded, 3);

		assert_eq!(picked, vec![2, 0, 1]);
	}

	#[test]
	fn exclusions_are_dropped_when_enough_remain() {
		let candidates: Vec<Article> = ["a", "b", "c", "d"].into_iter().map(article).collect();
		let excluded: HashSet<String> = ["a"].into_iter().map(str::to_string).collect();
		let picked = apply_exclusions(&[0, 1, 2, 3], &candidates, &excluded, 2);

		assert_eq!(picked, vec![1, 2]);
	}

	#[test]
	fn short_pools_return_everything_available() {
		let candidates: Vec<Article> = ["a", "b"].into_iter().map(article).collect();
		let excluded: HashSet<String> = ["b"].into_iter().map(str::to_string).collect();

		assert_eq!(apply_exclusions(&[1, 0], &candidates, &excluded, 5), vec![0, 1]);
	}
}
