//! Interest Score Store implementations.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use newsroom_storage::{db::Db, interests};

use crate::{BoxFuture, InterestStore, Result};

/// Process-local ledger. Records keep insertion order, which is the first-seen tie-break for
/// [`InterestStore::top_tags`]. All writes go through one lock, so same-key updates serialize.
#[derive(Default)]
pub struct MemoryInterestStore {
	ledger: RwLock<Ledger>,
}
impl MemoryInterestStore {
	pub fn new() -> Self {
		Self::default()
	}
}
impl InterestStore for MemoryInterestStore {
	fn add_score<'a>(
		&'a self,
		tag: &'a str,
		delta: f64,
		user_id: &'a str,
		workspace_id: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.ledger.write().await.add(user_id, workspace_id, tag, delta);

			Ok(())
		})
	}

	fn get_score<'a>(
		&'a self,
		user_id: &'a str,
		tag: &'a str,
		workspace_id: Option<&'a str>,
	) -> BoxFuture<'a, Result<f64>> {
		Box::pin(async move {
			let ledger = self.ledger.read().await;
			let score: f64 = ledger
				.matching(user_id, workspace_id)
				.filter(|record| record.tag == tag)
				.map(|record| record.score)
				.sum();

			Ok(score)
		})
	}

	fn top_tags<'a>(
		&'a self,
		user_id: &'a str,
		workspace_id: Option<&'a str>,
		k: usize,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(async move {
			let ledger = self.ledger.read().await;

			Ok(rank_tags(ledger.matching(user_id, workspace_id), k))
		})
	}

	fn reset_workspace<'a>(&'a self, workspace_id: &'a str) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.ledger.write().await.remove_workspace(workspace_id);

			Ok(())
		})
	}

	fn clear_all(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			*self.ledger.write().await = Ledger::default();

			Ok(())
		})
	}
}

pub struct PgInterestStore {
	db: Arc<Db>,
}
impl PgInterestStore {
	pub fn new(db: Arc<Db>) -> Self {
		Self { db }
	}
}
impl InterestStore for PgInterestStore {
	fn add_score<'a>(
		&'a self,
		tag: &'a str,
		delta: f64,
		user_id: &'a str,
		workspace_id: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			Ok(interests::add_score(&self.db, user_id, workspace_id, tag, delta).await?)
		})
	}

	fn get_score<'a>(
		&'a self,
		user_id: &'a str,
		tag: &'a str,
		workspace_id: Option<&'a str>,
	) -> BoxFuture<'a, Result<f64>> {
		Box::pin(async move { Ok(interests::tag_score(&self.db, user_id, tag, workspace_id).await?) })
	}

	fn top_tags<'a>(
		&'a self,
		user_id: &'a str,
		workspace_id: Option<&'a str>,
		k: usize,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		let k = u32::try_from(k).unwrap_or(u32::MAX);

		Box::pin(async move { Ok(interests::top_tags(&self.db, user_id, workspace_id, k).await?) })
	}

	fn reset_workspace<'a>(&'a self, workspace_id: &'a str) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let removed = interests::reset_workspace(&self.db, workspace_id).await?;

			tracing::info!(workspace_id, removed, "Interest profile reset.");

			Ok(())
		})
	}

	fn clear_all(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move { Ok(interests::clear_all(&self.db).await?) })
	}
}

#[derive(Debug, Clone)]
struct InterestRecord {
	user_id: String,
	workspace_id: String,
	tag: String,
	score: f64,
}

#[derive(Default)]
struct Ledger {
	records: Vec<InterestRecord>,
	index: HashMap<(String, String, String), usize>,
}
impl Ledger {
	fn add(&mut self, user_id: &str, workspace_id: &str, tag: &str, delta: f64) {
		let key = (user_id.to_string(), workspace_id.to_string(), tag.to_string());

		if let Some(&position) = self.index.get(&key) {
			self.records[position].score += delta;

			return;
		}

		self.index.insert(key, self.records.len());
		self.records.push(InterestRecord {
			user_id: user_id.to_string(),
			workspace_id: workspace_id.to_string(),
			tag: tag.to_string(),
			score: delta,
		});
	}

	fn matching<'a>(
		&'a self,
		user_id: &'a str,
		workspace_id: Option<&'a str>,
	) -> impl Iterator<Item = &'a InterestRecord> {
		self.records.iter().filter(move |record| {
			record.user_id == user_id
				&& workspace_id.is_none_or(|workspace_id| record.workspace_id == workspace_id)
		})
	}

	fn remove_workspace(&mut self, workspace_id: &str) {
		self.records.retain(|record| record.workspace_id != workspace_id);
		self.index = self
			.records
			.iter()
			.enumerate()
			.map(|(position, record)| {
				(
					(record.user_id.clone(), record.workspace_id.clone(), record.tag.clone()),
					position,
				)
			})
			.collect();
	}
}

/// Sums scores per tag in first-seen order, then stable-sorts descending.
fn rank_tags<'a>(records: impl Iterator<Item = &'a InterestRecord>, k: usize) -> Vec<String> {
	let mut totals: Vec<(&str, f64)> = Vec::new();
	let mut positions: HashMap<&str, usize> = HashMap::new();

	for record in records {
		match positions.get(record.tag.as_str()) {
			Some(&position) => totals[position].1 += record.score,
			None => {
				positions.insert(record.tag.as_str(), totals.len());
				totals.push((record.tag.as_str(), record.score));
			},
		}
	}

	totals.sort_by(|a, b| b.1.total_cmp(&a.1));

	totals.into_iter().take(k).map(|(tag, _)| tag.to_string()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(workspace_id: &str, tag: &str, score: f64) -> InterestRecord {
		InterestRecord {
			user_id: "u1".to_string(),
			workspace_id: workspace_id.to_string(),
			tag: tag.to_string(),
			score,
		}
	}

	#[test]
	fn ties_keep_first_seen_order() {
		let records = [record("w1", "b", 1.0), record("w1", "a", 1.0), record("w1", "c", 2.0)];

		assert_eq!(rank_tags(records.iter(), 3), vec!["c", "b", "a"]);
		assert_eq!(rank_tags(records.iter(), 1), vec!["c"]);
	}

	#[test]
	fn same_tag_across_workspaces_is_summed() {
		let records = [record("w1", "ai", 1.0), record("w2", "sports", 1.5), record("w2", "ai", 1.0)];

		assert_eq!(rank_tags(records.iter(), 5), vec!["ai", "sports"]);
	}

	#[test]
	fn removing_a_workspace_reindexes_the_rest() {
		let mut ledger = Ledger::default();

		ledger.add("u1", "w1", "ai", 1.0);
		ledger.add("u1", "w2", "ai", 2.0);
		ledger.add("u1", "w1", "chips", 1.0);
		ledger.remove_workspace("w1");
		ledger.add("u1", "w2", "ai", 0.5);

		assert_eq!(ledger.records.len(), 1);
		assert_eq!(ledger.records[0].score, 2.5);
	}
}
