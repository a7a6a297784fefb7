pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{env} is not a valid Postgres DSN: {source}")]
	InvalidDsn { env: &'static str, source: sqlx::Error },
	#[error("Could not {action}: {source}")]
	Admin { action: &'static str, source: sqlx::Error },
}
