//! Retrieval of the published key set.
//!
//! The verification pipeline doesn't depend on any particular HTTP client;
//! it performs its one request through a [`KeySetFetcher`].
//! [`HttpFetcher`] is the default implementation using `reqwest`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{KeySet, Result, TransportError};

/// The response body of a key-set request.
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = std::result::Result<Bytes, TransportError>> + Send + 'a>>;

/// Performs a single GET of a key-set document.
///
/// Implementations must not retry or cache; each call is exactly one request.
/// Any non-2xx response is a [`TransportError`], not a body.
pub trait KeySetFetcher: Send + Sync {
	fn fetch_bytes(&self, url: &Url) -> FetchFuture<'_>;
}

impl<F: KeySetFetcher + ?Sized> KeySetFetcher for Arc<F> {
	fn fetch_bytes(&self, url: &Url) -> FetchFuture<'_> {
		(**self).fetch_bytes(url)
	}
}

impl<F: KeySetFetcher + ?Sized> KeySetFetcher for &F {
	fn fetch_bytes(&self, url: &Url) -> FetchFuture<'_> {
		(**self).fetch_bytes(url)
	}
}

/// Fetch and decode the key set at `url`.
pub async fn fetch_key_set<F: KeySetFetcher + ?Sized>(fetcher: &F, url: &str) -> Result<KeySet> {
	let url = Url::parse(url).map_err(TransportError::from)?;

	tracing::debug!(%url, "fetching key set");
	let body = fetcher.fetch_bytes(&url).await?;

	let set = KeySet::decode(&body)?;
	tracing::debug!(%url, keys = set.keys().len(), "fetched key set");

	Ok(set)
}

/// Settings for [`HttpFetcher`].
#[derive(Args, Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct FetchConfig {
	/// Give up on the key-set request after this long.
	#[arg(
		long = "fetch-timeout",
		env = "JWKS_FETCH_TIMEOUT",
		default_value = "10s",
		value_parser = humantime::parse_duration
	)]
	#[serde(with = "humantime_serde")]
	pub timeout: Duration,

	/// The User-Agent sent with the key-set request.
	#[arg(long = "user-agent", default_value = DEFAULT_USER_AGENT)]
	pub user_agent: String,
}

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

impl Default for FetchConfig {
	fn default() -> Self {
		Self {
			timeout: Duration::from_secs(10),
			user_agent: DEFAULT_USER_AGENT.to_string(),
		}
	}
}

/// A [`KeySetFetcher`] backed by a `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
	client: reqwest::Client,
}

impl HttpFetcher {
	pub fn new(config: &FetchConfig) -> std::result::Result<Self, TransportError> {
		let client = reqwest::Client::builder()
			.user_agent(&config.user_agent)
			.timeout(config.timeout)
			.build()
			.map_err(TransportError::Request)?;

		Ok(Self { client })
	}

	/// Use an existing client, keeping whatever timeout it was built with.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self { client }
	}
}

impl KeySetFetcher for HttpFetcher {
	fn fetch_bytes(&self, url: &Url) -> FetchFuture<'_> {
		let url = url.clone();

		Box::pin(async move {
			let response = self.client.get(url).send().await?;

			// Redirects that weren't followed (300, 304, missing Location) are failures too.
			let status = response.status();
			if !status.is_success() {
				return Err(TransportError::Status(status));
			}

			Ok(response.bytes().await?)
		})
	}
}
