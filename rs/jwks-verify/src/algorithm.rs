use std::{fmt, str::FromStr};

/// The only signature algorithm accepted in a token header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
	/// Ed25519 signatures, as named by RFC 8037.
	EdDSA,
}

impl Algorithm {
	pub const fn as_str(&self) -> &'static str {
		match self {
			Algorithm::EdDSA => "EdDSA",
		}
	}

	/// The JWK `kty` a key must carry to be used with this algorithm.
	pub const fn key_type(&self) -> &'static str {
		match self {
			Algorithm::EdDSA => KEY_TYPE,
		}
	}

	/// The JWK `crv` a key must carry to be used with this algorithm.
	pub const fn curve(&self) -> &'static str {
		match self {
			Algorithm::EdDSA => CURVE,
		}
	}

	/// The exact length of a raw public key, in bytes.
	pub const fn public_key_len(&self) -> usize {
		match self {
			Algorithm::EdDSA => PUBLIC_KEY_LEN,
		}
	}
}

/// Octet key pair, the key type for Edwards-curve keys.
pub const KEY_TYPE: &str = "OKP";

pub const CURVE: &str = "Ed25519";

/// Length of an Ed25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
	type Err = UnknownAlgorithm;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"EdDSA" => Ok(Algorithm::EdDSA),
			other => Err(UnknownAlgorithm(other.to_string())),
		}
	}
}

impl fmt::Display for Algorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn parse() {
		assert_eq!("EdDSA".parse::<Algorithm>(), Ok(Algorithm::EdDSA));
		assert_eq!(Algorithm::EdDSA.to_string(), "EdDSA");
	}

	#[test]
	fn case_sensitive() {
		// Header values are compared byte-for-byte.
		assert!("eddsa".parse::<Algorithm>().is_err());
		assert!("ES256".parse::<Algorithm>().is_err());
		assert!("none".parse::<Algorithm>().is_err());
	}
}
