pub mod bookmarks;
pub mod content;
pub mod interaction;
pub mod interest;
pub mod maintenance;
pub mod query;
pub mod ranking;

mod error;

pub use bookmarks::PgBookmarkStore;
pub use content::PgContentStore;
pub use error::{Error, Result};
pub use interaction::{QueryConfigView, StoreArticleRequest, StoreArticleResponse};
pub use interest::{MemoryInterestStore, PgInterestStore};
pub use maintenance::{ARTICLE_RETENTION, ArticleStoreSummary, RetentionReport};
pub use query::{DailyResponse, QueryRequest, QueryResponse};
pub use ranking::RankingRequest;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use time::OffsetDateTime;
use uuid::Uuid;

use newsroom_config::{Config, LlmProviderConfig, WebSearchProviderConfig};
use newsroom_domain::{AnnotatedArticle, Article, ArticleMetadata, Bookmark, protocol::Prompt};
use newsroom_providers::{llm, web_search};
use newsroom_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait LlmProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt: &'a Prompt,
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait WebSearchProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a WebSearchProviderConfig,
		phrase: &'a str,
		limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Article>>>;
}

/// Article retrieval and persistence.
pub trait ContentStore
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, query_text: &'a str, limit: u32) -> BoxFuture<'a, Result<Vec<Article>>>;

	fn exists<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<bool>>;

	fn get_by_id<'a>(&'a self, article_id: &'a str) -> BoxFuture<'a, Result<Option<Article>>>;

	fn insert<'a>(
		&'a self,
		title: &'a str,
		body: &'a str,
		metadata: &'a ArticleMetadata,
	) -> BoxFuture<'a, Result<String>>;

	fn update_metadata<'a>(
		&'a self,
		article_id: &'a str,
		metadata: &'a ArticleMetadata,
	) -> BoxFuture<'a, Result<()>>;

	fn summary(&self) -> BoxFuture<'_, Result<ArticleStoreSummary>>;

	/// Removes articles fetched before `cutoff`. Returns the number removed.
	fn delete_fetched_before(&self, cutoff: OffsetDateTime) -> BoxFuture<'_, Result<u64>>;

	/// Drops every article and recreates an empty store.
	fn reset(&self) -> BoxFuture<'_, Result<()>>;
}

/// Additive per-(user, workspace, tag) affinity ledger.
///
/// Implementations must not lose updates when `add_score` runs concurrently for one key. Reads may
/// observe a slightly stale view while writes are in flight.
pub trait InterestStore
where
	Self: Send + Sync,
{
	fn add_score<'a>(
		&'a self,
		tag: &'a str,
		delta: f64,
		user_id: &'a str,
		workspace_id: &'a str,
	) -> BoxFuture<'a, Result<()>>;

	/// Zero when no record exists. Without a workspace, scores across workspaces are summed.
	fn get_score<'a>(
		&'a self,
		user_id: &'a str,
		tag: &'a str,
		workspace_id: Option<&'a str>,
	) -> BoxFuture<'a, Result<f64>>;

	/// At most `k` tags by descending score, ties in first-seen order.
	fn top_tags<'a>(
		&'a self,
		user_id: &'a str,
		workspace_id: Option<&'a str>,
		k: usize,
	) -> BoxFuture<'a, Result<Vec<String>>>;

	fn reset_workspace<'a>(&'a self, workspace_id: &'a str) -> BoxFuture<'a, Result<()>>;

	fn clear_all(&self) -> BoxFuture<'_, Result<()>>;
}

pub trait BookmarkStore
where
	Self: Send + Sync,
{
	fn annotate<'a>(
		&'a self,
		articles: Vec<Article>,
		user_id: &'a str,
		workspace_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<AnnotatedArticle>>>;

	/// `None` when the article is already bookmarked for this user and workspace.
	fn add<'a>(
		&'a self,
		article: &'a Article,
		user_id: &'a str,
		workspace_id: &'a str,
		note: Option<&'a str>,
	) -> BoxFuture<'a, Result<Option<Uuid>>>;

	fn list<'a>(
		&'a self,
		user_id: &'a str,
		workspace_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<Bookmark>>>;

	fn delete(&self, bookmark_id: Uuid) -> BoxFuture<'_, Result<bool>>;

	fn delete_by_article<'a>(
		&'a self,
		article_id: &'a str,
		user_id: &'a str,
		workspace_id: &'a str,
	) -> BoxFuture<'a, Result<bool>>;

	fn delete_all<'a>(
		&'a self,
		user_id: &'a str,
		workspace_id: &'a str,
	) -> BoxFuture<'a, Result<u64>>;
}

#[derive(Clone)]
pub struct Providers {
	pub llm: Arc<dyn LlmProvider>,
	pub web_search: Arc<dyn WebSearchProvider>,
}
impl Providers {
	pub fn new(llm: Arc<dyn LlmProvider>, web_search: Arc<dyn WebSearchProvider>) -> Self {
		Self { llm, web_search }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { llm: provider.clone(), web_search: provider }
	}
}

#[derive(Clone)]
pub struct Stores {
	pub content: Arc<dyn ContentStore>,
	pub interests: Arc<dyn InterestStore>,
	pub bookmarks: Arc<dyn BookmarkStore>,
}
impl Stores {
	pub fn new(
		content: Arc<dyn ContentStore>,
		interests: Arc<dyn InterestStore>,
		bookmarks: Arc<dyn BookmarkStore>,
	) -> Self {
		Self { content, interests, bookmarks }
	}

	/// Every store backed by the same Postgres pool.
	pub fn postgres(db: Arc<Db>) -> Self {
		Self {
			content: Arc::new(PgContentStore::new(db.clone())),
			interests: Arc::new(PgInterestStore::new(db.clone())),
			bookmarks: Arc::new(PgBookmarkStore::new(db)),
		}
	}
}

pub struct NewsroomService {
	pub cfg: Config,
	pub stores: Stores,
	pub providers: Providers,
}
impl NewsroomService {
	pub fn new(cfg: Config, stores: Stores) -> Self {
		Self { cfg, stores, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, stores: Stores, providers: Providers) -> Self {
		Self { cfg, stores, providers }
	}

	fn stage_timeout(&self) -> Duration {
		Duration::from_millis(self.cfg.query.stage_timeout_ms)
	}

	/// Runs `fut` under the per-stage deadline.
	pub(crate) async fn bounded<T>(&self, stage: &str, fut: impl Future<Output = T>) -> Result<T> {
		tokio::time::timeout(self.stage_timeout(), fut)
			.await
			.map_err(|_| Error::Timeout { stage: stage.to_string() })
	}

	/// One model round trip under the stage deadline. Returns the raw reply text.
	pub(crate) async fn complete(&self, stage: &str, prompt: &Prompt) -> Result<String> {
		self.bounded(stage, self.providers.llm.complete(&self.cfg.providers.llm, prompt))
			.await?
			.map_err(|err| Error::unavailable("llm", err))
	}
}

struct DefaultProviders;
impl LlmProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt: &'a Prompt,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(llm::complete(cfg, prompt))
	}
}
impl WebSearchProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		cfg: &'a WebSearchProviderConfig,
		phrase: &'a str,
		limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Article>>> {
		Box::pin(web_search::search(cfg, phrase, limit))
	}
}
