use std::future::Future;

use crate::{Claims, FetchConfig, HttpFetcher, KeySetFetcher, Result, Token, TransportError, fetch_key_set};

/// Verifies compact EdDSA tokens against a remote key set.
///
/// Every call fetches the key set exactly once and keeps nothing afterwards,
/// so a single verifier can be shared between concurrent verifications.
#[derive(Clone, Debug)]
pub struct Verifier<F = HttpFetcher> {
	fetcher: F,
}

impl Verifier<HttpFetcher> {
	/// A verifier that fetches key sets over HTTP.
	pub fn http(config: &FetchConfig) -> Result<Self> {
		Ok(Self::new(HttpFetcher::new(config)?))
	}
}

impl<F: KeySetFetcher> Verifier<F> {
	pub fn new(fetcher: F) -> Self {
		Self { fetcher }
	}

	/// Verify `token` against the key set published at `url`, returning its claims.
	///
	/// The header's algorithm and key id are checked before any network request is made.
	/// The claims are only decoded once the signature has been verified.
	pub async fn verify(&self, token: &str, url: &str) -> Result<Claims> {
		let token = Token::parse(token)?;

		let header = token.header()?;
		let alg = header.algorithm()?;
		let kid = header.key_id()?;

		let set = fetch_key_set(&self.fetcher, url).await?;
		let key = set.resolve(kid, alg)?;

		let signature = token.signature()?;
		if let Err(err) = key.verify(token.signing_input(), &signature) {
			tracing::debug!(%kid, "signature rejected");
			return Err(err);
		}

		let claims = token.claims()?;
		tracing::debug!(%kid, claims = claims.len(), "token verified");

		Ok(claims)
	}

	/// Like [`Verifier::verify`], but gives up once `cancel` resolves.
	///
	/// The in-flight request is dropped and the call fails with [`TransportError::Cancelled`].
	pub async fn verify_until<C>(&self, token: &str, url: &str, cancel: C) -> Result<Claims>
	where
		C: Future<Output = ()>,
	{
		tokio::select! {
			biased;
			_ = cancel => Err(TransportError::Cancelled.into()),
			res = self.verify(token, url) => res,
		}
	}
}

/// Verify `token` against the key set at `url` using a default HTTP fetcher.
pub async fn verify(token: &str, url: &str) -> Result<Claims> {
	Verifier::http(&FetchConfig::default())?.verify(token, url).await
}
