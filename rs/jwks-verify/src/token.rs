use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Map, Value};

use crate::{Algorithm, Claims, Error, Result};

/// One of the three dot-separated parts of a compact token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
	Header,
	Payload,
	Signature,
}

impl fmt::Display for Segment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Segment::Header => "header",
			Segment::Payload => "payload",
			Segment::Signature => "signature",
		})
	}
}

/// A structural problem with a compact token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
	#[error("expected 3 segments, got {0}")]
	Segments(usize),

	#[error("invalid base64url in {segment}: {source}")]
	Base64 {
		segment: Segment,
		#[source]
		source: base64::DecodeError,
	},

	#[error("invalid json in {segment}: {source}")]
	Json {
		segment: Segment,
		#[source]
		source: serde_json::Error,
	},

	#[error("{0} is not a json object")]
	NotObject(Segment),
}

impl TokenError {
	pub fn segment(&self) -> Option<Segment> {
		match self {
			TokenError::Segments(_) => None,
			TokenError::Base64 { segment, .. } | TokenError::Json { segment, .. } | TokenError::NotObject(segment) => {
				Some(*segment)
			}
		}
	}
}

/// The decoded JOSE header.
///
/// Only `alg` and `kid` are interpreted; any other parameters are kept in `params`.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
	pub params: Map<String, Value>,
}

impl Header {
	/// Returns the declared algorithm if it is the one we accept.
	pub fn algorithm(&self) -> Result<Algorithm> {
		match self.params.get("alg") {
			Some(Value::String(alg)) => alg.parse().map_err(|_| Error::UnsupportedAlgorithm(alg.clone())),
			Some(other) => Err(Error::UnsupportedAlgorithm(other.to_string())),
			None => Err(Error::UnsupportedAlgorithm("<missing>".to_string())),
		}
	}

	pub fn key_id(&self) -> Result<&str> {
		match self.params.get("kid") {
			Some(Value::String(kid)) => Ok(kid),
			_ => Err(Error::MissingKeyId),
		}
	}
}

/// A compact token split into its still-encoded segments.
///
/// Nothing beyond the segment count is checked on parse.
/// Each segment is decoded on demand so the payload is never looked at before the signature is verified.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
	raw: &'a str,
	// Byte offsets of the two dots.
	first: usize,
	second: usize,
}

impl<'a> Token<'a> {
	pub fn parse(raw: &'a str) -> Result<Self> {
		let mut dots = raw.match_indices('.').map(|(index, _)| index);
		match (dots.next(), dots.next(), dots.next()) {
			(Some(first), Some(second), None) => Ok(Self { raw, first, second }),
			_ => Err(TokenError::Segments(raw.matches('.').count() + 1).into()),
		}
	}

	pub fn encoded(&self, segment: Segment) -> &'a str {
		match segment {
			Segment::Header => &self.raw[..self.first],
			Segment::Payload => &self.raw[self.first + 1..self.second],
			Segment::Signature => &self.raw[self.second + 1..],
		}
	}

	/// The bytes that were signed: the encoded header and payload joined by a dot, exactly as received.
	pub fn signing_input(&self) -> &'a [u8] {
		self.raw[..self.second].as_bytes()
	}

	pub fn header(&self) -> Result<Header> {
		Ok(Header {
			params: self.decode_object(Segment::Header)?,
		})
	}

	/// The raw signature bytes.
	pub fn signature(&self) -> Result<Vec<u8>> {
		self.decode(Segment::Signature)
	}

	/// Decode the payload without checking anything.
	///
	/// Only trust the result after the signature has been verified.
	pub fn claims(&self) -> Result<Claims> {
		Ok(Claims::from(self.decode_object(Segment::Payload)?))
	}

	fn decode(&self, segment: Segment) -> Result<Vec<u8>> {
		URL_SAFE_NO_PAD
			.decode(self.encoded(segment))
			.map_err(|source| TokenError::Base64 { segment, source }.into())
	}

	fn decode_object(&self, segment: Segment) -> Result<Map<String, Value>> {
		let bytes = self.decode(segment)?;
		let value: Value = serde_json::from_slice(&bytes).map_err(|source| TokenError::Json { segment, source })?;

		match value {
			Value::Object(map) => Ok(map),
			_ => Err(TokenError::NotObject(segment).into()),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn encode(json: &str) -> String {
		URL_SAFE_NO_PAD.encode(json)
	}

	#[test]
	fn segments() {
		for raw in ["", "a", "a.b", "a.b.c.d", "...."] {
			let err = Token::parse(raw).unwrap_err();
			assert!(
				matches!(err, Error::MalformedToken(TokenError::Segments(_))),
				"{raw:?}: {err}"
			);
		}

		let err = Token::parse(&".".repeat(100_000)).unwrap_err();
		assert!(matches!(err, Error::MalformedToken(TokenError::Segments(100_001))));

		// Empty segments still count.
		let token = Token::parse("..").unwrap();
		assert_eq!(token.encoded(Segment::Header), "");
		assert_eq!(token.encoded(Segment::Signature), "");
	}

	#[test]
	fn signing_input() {
		let header = encode(r#"{"alg":"EdDSA","kid":"k1"}"#);
		let payload = encode(r#"{"sub":"alice"}"#);
		let raw = format!("{header}.{payload}.c2ln");

		let token = Token::parse(&raw).unwrap();
		assert_eq!(token.signing_input(), format!("{header}.{payload}").as_bytes());
		assert_eq!(token.encoded(Segment::Header), header);
		assert_eq!(token.encoded(Segment::Payload), payload);
		assert_eq!(token.signature().unwrap(), b"sig");
	}

	#[test]
	fn header() {
		let raw = format!("{}.e30.", encode(r#"{"alg":"EdDSA","kid":"k1","typ":"JWT"}"#));
		let header = Token::parse(&raw).unwrap().header().unwrap();

		assert_eq!(header.algorithm().unwrap(), Algorithm::EdDSA);
		assert_eq!(header.key_id().unwrap(), "k1");
		assert_eq!(header.params.get("typ"), Some(&Value::from("JWT")));
	}

	#[test]
	fn header_algorithm() {
		for json in [r#"{"alg":"HS256"}"#, r#"{"alg":"none"}"#, r#"{"alg":7}"#, r#"{}"#] {
			let raw = format!("{}.e30.", encode(json));
			let header = Token::parse(&raw).unwrap().header().unwrap();
			assert!(matches!(header.algorithm(), Err(Error::UnsupportedAlgorithm(_))), "{json}");
		}
	}

	#[test]
	fn header_key_id() {
		for json in [r#"{"alg":"EdDSA"}"#, r#"{"alg":"EdDSA","kid":1}"#, r#"{"alg":"EdDSA","kid":null}"#] {
			let raw = format!("{}.e30.", encode(json));
			let header = Token::parse(&raw).unwrap().header().unwrap();
			assert!(matches!(header.key_id(), Err(Error::MissingKeyId)), "{json}");
		}
	}

	#[test]
	fn header_malformed() {
		// Padding is rejected.
		let raw = format!("{}=.e30.", encode(r#"{"alg":"EdDSA"}"#));
		let err = Token::parse(&raw).unwrap().header().unwrap_err();
		assert!(matches!(
			err,
			Error::MalformedToken(TokenError::Base64 {
				segment: Segment::Header,
				..
			})
		));

		let raw = format!("{}.e30.", encode("not json"));
		let err = Token::parse(&raw).unwrap().header().unwrap_err();
		assert!(matches!(
			err,
			Error::MalformedToken(TokenError::Json {
				segment: Segment::Header,
				..
			})
		));

		let raw = format!("{}.e30.", encode("[1,2]"));
		let err = Token::parse(&raw).unwrap().header().unwrap_err();
		assert_eq!(err.segment(), Some(Segment::Header));
	}

	#[test]
	fn claims() {
		let raw = format!("e30.{}.", encode(r#"{"sub":"alice","n":1,"nested":{"a":[true,null]}}"#));
		let claims = Token::parse(&raw).unwrap().claims().unwrap();

		assert_eq!(claims.get("sub"), Some(&Value::from("alice")));
		assert_eq!(claims.get("n"), Some(&Value::from(1)));
		assert_eq!(claims.len(), 3);

		let raw = format!("e30.{}.", encode("\"alice\""));
		let err = Token::parse(&raw).unwrap().claims().unwrap_err();
		assert!(matches!(err, Error::MalformedToken(TokenError::NotObject(Segment::Payload))));
	}
}
