use newsroom_domain::protocol::ParseError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Malformed model reply: {0}")]
	Protocol(#[from] ParseError),
	#[error("{collaborator} is unavailable: {message}")]
	CollaboratorUnavailable { collaborator: String, message: String },
	#[error("Timed out during the {stage} stage.")]
	Timeout { stage: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn unavailable(collaborator: &str, err: impl std::fmt::Display) -> Self {
		Self::CollaboratorUnavailable {
			collaborator: collaborator.to_string(),
			message: err.to_string(),
		}
	}
}

impl From<newsroom_storage::Error> for Error {
	fn from(err: newsroom_storage::Error) -> Self {
		match err {
			newsroom_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			newsroom_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			newsroom_storage::Error::NotFound(message) => Self::NotFound { message },
			err @ newsroom_storage::Error::CorruptTags { .. } =>
				Self::Storage { message: err.to_string() },
		}
	}
}
