//! Throwaway Postgres databases for storage tests.
//!
//! Tests opt in by setting `NEWSROOM_PG_DSN` to any reachable server. Every [`TestDatabase`] gets
//! its own freshly created database there, so tests can bootstrap the schema and clear the
//! interest ledger without seeing each other.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

pub const DSN_ENV: &str = "NEWSROOM_PG_DSN";

/// Database used for `CREATE DATABASE` and `DROP DATABASE`.
const MAINTENANCE_DATABASE: &str = "postgres";

pub struct TestDatabase {
	name: String,
	dsn: String,
	maintenance: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	/// `None` when `NEWSROOM_PG_DSN` is unset or blank.
	pub async fn from_env() -> Result<Option<Self>> {
		match env::var(DSN_ENV).ok().filter(|dsn| !dsn.trim().is_empty()) {
			Some(dsn) => Ok(Some(Self::create(&dsn).await?)),
			None => Ok(None),
		}
	}

	pub async fn create(server_dsn: &str) -> Result<Self> {
		let server = PgConnectOptions::from_str(server_dsn)
			.map_err(|source| Error::InvalidDsn { env: DSN_ENV, source })?;
		let maintenance = server.clone().database(MAINTENANCE_DATABASE);
		let name = format!("newsroom_test_{}", Uuid::new_v4().simple());
		let mut conn = PgConnection::connect_with(&maintenance)
			.await
			.map_err(|source| Error::Admin { action: "reach the maintenance database", source })?;

		sqlx::query(&format!(r#"CREATE DATABASE "{name}""#))
			.execute(&mut conn)
			.await
			.map_err(|source| Error::Admin { action: "create the test database", source })?;

		let dsn = server.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, maintenance, dropped: false })
	}

	/// Connection settings for `newsroom_storage::db::Db::connect`.
	pub fn postgres(&self, pool_max_conns: u32) -> newsroom_config::Postgres {
		newsroom_config::Postgres { dsn: self.dsn.clone(), pool_max_conns }
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.name, &self.maintenance).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let maintenance = self.maintenance.clone();
		// A panicking test may be tearing down the runtime that created us.
		let handle = thread::spawn(move || {
			let outcome = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| err.to_string())
				.and_then(|runtime| {
					runtime.block_on(drop_database(&name, &maintenance)).map_err(|err| err.to_string())
				});

			if let Err(err) = outcome {
				eprintln!("Leaked test database {name}: {err}");
			}
		});

		let _ = handle.join();
	}
}

async fn drop_database(name: &str, maintenance: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(maintenance)
		.await
		.map_err(|source| Error::Admin { action: "reach the maintenance database", source })?;

	sqlx::query(&format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#))
		.execute(&mut conn)
		.await
		.map_err(|source| Error::Admin { action: "drop the test database", source })?;

	Ok(())
}
