use crate::{Segment, TokenError};

pub type Result<T> = std::result::Result<T, Error>;

/// Why a token could not be verified.
///
/// Everything except [`Error::SignatureInvalid`] means verification was never completed.
/// A [`Error::SignatureInvalid`] means the token was checked against a published key and rejected,
/// which callers usually want to log and alert on differently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("failed to fetch key set: {0}")]
	Transport(#[from] TransportError),

	#[error("failed to decode key set: {0}")]
	Decode(#[source] serde_json::Error),

	#[error("malformed token: {0}")]
	MalformedToken(#[from] TokenError),

	#[error("unsupported algorithm: {0}")]
	UnsupportedAlgorithm(String),

	#[error("missing key id")]
	MissingKeyId,

	#[error("key not found: {0}")]
	KeyNotFound(String),

	#[error("unsupported key type: kty={kty:?} crv={crv:?}")]
	UnsupportedKeyType { kty: Option<String>, crv: Option<String> },

	#[error("malformed key material: {0}")]
	MalformedKeyMaterial(#[from] KeyError),

	#[error("invalid signature")]
	SignatureInvalid,
}

/// The network fetch of the key set could not complete.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
	#[error("invalid url: {0}")]
	InvalidUrl(#[from] url::ParseError),

	#[error("request failed: {0}")]
	Request(#[source] reqwest::Error),

	#[error("unexpected status: {0}")]
	Status(reqwest::StatusCode),

	#[error("timed out")]
	Timeout,

	#[error("cancelled")]
	Cancelled,

	#[error("{0}")]
	Other(String),
}

impl From<reqwest::Error> for TransportError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() {
			return TransportError::Timeout;
		}

		match err.status() {
			Some(status) => TransportError::Status(status),
			None => TransportError::Request(err),
		}
	}
}

/// The published key material could not be turned into a public key.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KeyError {
	#[error("missing x parameter")]
	Missing,

	#[error("invalid hex: {0}")]
	Hex(#[from] hex::FromHexError),

	#[error("expected {expected} bytes, got {actual}")]
	Length { expected: usize, actual: usize },
}

/// A fieldless discriminant of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	Transport,
	Decode,
	MalformedToken,
	UnsupportedAlgorithm,
	MissingKeyId,
	KeyNotFound,
	UnsupportedKeyType,
	MalformedKeyMaterial,
	SignatureInvalid,
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::Transport(_) => ErrorKind::Transport,
			Error::Decode(_) => ErrorKind::Decode,
			Error::MalformedToken(_) => ErrorKind::MalformedToken,
			Error::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
			Error::MissingKeyId => ErrorKind::MissingKeyId,
			Error::KeyNotFound(_) => ErrorKind::KeyNotFound,
			Error::UnsupportedKeyType { .. } => ErrorKind::UnsupportedKeyType,
			Error::MalformedKeyMaterial(_) => ErrorKind::MalformedKeyMaterial,
			Error::SignatureInvalid => ErrorKind::SignatureInvalid,
		}
	}

	/// True if the token was cryptographically checked and rejected.
	pub fn is_rejected(&self) -> bool {
		matches!(self, Error::SignatureInvalid)
	}

	/// The token segment at fault, for malformed tokens.
	pub fn segment(&self) -> Option<Segment> {
		match self {
			Error::MalformedToken(err) => err.segment(),
			_ => None,
		}
	}
}
