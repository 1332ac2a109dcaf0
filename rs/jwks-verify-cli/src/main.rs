//! Command-line tool for checking tokens against a published key set.

mod log;

use std::io::Read;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use jwks_verify::{FetchConfig, Segment, Token, Verifier};

#[derive(Parser, Clone)]
#[command(version, about)]
pub struct Cli {
	#[command(flatten)]
	log: log::Log,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Clone)]
pub enum Command {
	/// Verify a token against a key set and print its claims.
	Verify {
		/// The URL of the key-set document.
		#[arg(long, env = "JWKS_URL")]
		jwks_url: String,

		#[command(flatten)]
		fetch: FetchConfig,

		#[command(flatten)]
		input: TokenArgs,
	},

	/// Decode a token's header and payload WITHOUT verifying the signature.
	Inspect {
		#[command(flatten)]
		input: TokenArgs,
	},
}

#[derive(Args, Clone)]
pub struct TokenArgs {
	/// The compact token. Read from stdin when omitted.
	#[arg(long, env = "JWKS_TOKEN", hide_env_values = true)]
	token: Option<String>,
}

impl TokenArgs {
	fn read(self) -> anyhow::Result<String> {
		if let Some(token) = self.token {
			return Ok(token);
		}

		let mut token = String::new();
		std::io::stdin()
			.read_to_string(&mut token)
			.context("failed to read token from stdin")?;

		Ok(token.trim().to_string())
	}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	cli.log.init();

	match cli.command {
		Command::Verify { jwks_url, fetch, input } => verify(&jwks_url, &fetch, &input.read()?).await,
		Command::Inspect { input } => inspect(&input.read()?),
	}
}

async fn verify(url: &str, config: &FetchConfig, token: &str) -> anyhow::Result<()> {
	let verifier = Verifier::http(config).context("failed to build http client")?;

	let claims = match verifier.verify(token, url).await {
		Ok(claims) => claims,
		Err(err) if err.is_rejected() => {
			tracing::warn!(%url, "token rejected: {err}");
			return Err(err).context("token rejected");
		}
		Err(err) => {
			tracing::error!(%url, kind = ?err.kind(), "could not verify token: {err}");
			return Err(err).context("could not verify token");
		}
	};

	println!("{}", serde_json::to_string_pretty(&claims)?);

	Ok(())
}

fn inspect(token: &str) -> anyhow::Result<()> {
	let token = Token::parse(token)?;
	let header = token.header()?;
	let claims = token.claims()?;

	tracing::warn!("signature NOT verified");

	let output = serde_json::json!({
		"header": header.params,
		"payload": claims,
		"signature": token.encoded(Segment::Signature),
		"verified": false,
	});
	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}
