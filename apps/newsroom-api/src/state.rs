use std::sync::Arc;

use newsroom_service::{NewsroomService, Stores};
use newsroom_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<NewsroomService>,
}
impl AppState {
	/// Connects Postgres, ensures the schema, and wires the HTTP-backed providers.
	pub async fn new(config: newsroom_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = NewsroomService::new(config, Stores::postgres(Arc::new(db)));

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: NewsroomService) -> Self {
		Self { service: Arc::new(service) }
	}
}
