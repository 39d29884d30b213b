pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<helpdesk_storage::Error> for Error {
	fn from(err: helpdesk_storage::Error) -> Self {
		match err {
			helpdesk_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			helpdesk_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			helpdesk_storage::Error::NotFound(message) => Self::NotFound { message },
			helpdesk_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}
