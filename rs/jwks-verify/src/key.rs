use std::fmt;

use aws_lc_rs::signature::{ED25519, UnparsedPublicKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Algorithm, Error, KeyError, PUBLIC_KEY_LEN, Result};

/// A single entry of a published key set.
///
/// Every field is optional so one odd entry doesn't prevent the rest of the set from loading.
/// Unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub kid: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub kty: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub alg: Option<String>,

	#[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
	pub usage: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub crv: Option<String>,

	/// The raw public key, hex encoded.
	///
	/// This is NOT the base64url encoding used by standard JWKs; the key-set provider publishes hex.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub x: Option<String>,
}

impl Key {
	/// Check the type tags and decode the key material for the given algorithm.
	pub fn public_key(&self, alg: Algorithm) -> Result<PublicKey> {
		if self.kty.as_deref() != Some(alg.key_type()) || self.crv.as_deref() != Some(alg.curve()) {
			return Err(Error::UnsupportedKeyType {
				kty: self.kty.clone(),
				crv: self.crv.clone(),
			});
		}

		let x = self.x.as_deref().ok_or(KeyError::Missing)?;
		let bytes = hex::decode(x).map_err(KeyError::from)?;

		let bytes: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|bytes: Vec<u8>| KeyError::Length {
			expected: alg.public_key_len(),
			actual: bytes.len(),
		})?;

		Ok(PublicKey(bytes))
	}
}

/// The decoded key-set document.
///
/// Built fresh from each fetch and never shared between verifications.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
	keys: Vec<Key>,
}

impl KeySet {
	pub fn new(keys: Vec<Key>) -> Self {
		Self { keys }
	}

	/// Decode a key-set document. The top-level `keys` array is required.
	///
	/// The document and every key must be JSON objects; serde would otherwise accept positional arrays.
	pub fn decode(body: &[u8]) -> Result<Self> {
		let value: Value = serde_json::from_slice(body).map_err(Error::Decode)?;

		let Value::Object(document) = &value else {
			return Err(Error::Decode(serde::de::Error::custom("key set is not a json object")));
		};

		if let Some(Value::Array(keys)) = document.get("keys") {
			if !keys.iter().all(Value::is_object) {
				return Err(Error::Decode(serde::de::Error::custom("key is not a json object")));
			}
		}

		serde_json::from_value(value).map_err(Error::Decode)
	}

	pub fn keys(&self) -> &[Key] {
		&self.keys
	}

	/// Returns the first key with the given identifier, in document order.
	pub fn find(&self, kid: &str) -> Option<&Key> {
		self.keys.iter().find(|key| key.kid.as_deref() == Some(kid))
	}

	/// Find the key named by `kid` and reconstruct its public key.
	///
	/// Duplicate identifiers are not rejected: the first entry wins, even if a later one would have been usable.
	pub fn resolve(&self, kid: &str, alg: Algorithm) -> Result<PublicKey> {
		let key = self.find(kid).ok_or_else(|| Error::KeyNotFound(kid.to_string()))?;

		let matches = self.keys.iter().filter(|key| key.kid.as_deref() == Some(kid)).count();
		if matches > 1 {
			tracing::warn!(%kid, count = matches, "duplicate key id in key set, using the first");
		}

		key.public_key(alg)
	}
}

/// An Ed25519 public key.
///
/// The bytes are only checked for length; whether they form a valid curve point is decided during verification.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
	pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
		Self(bytes)
	}

	pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
		&self.0
	}

	/// Verify an Ed25519 signature over `message`.
	pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
		UnparsedPublicKey::new(&ED25519, &self.0)
			.verify(message, signature)
			.map_err(|_| Error::SignatureInvalid)
	}
}

impl fmt::Debug for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "PublicKey({})", hex::encode(self.0))
	}
}
