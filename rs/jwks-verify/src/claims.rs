use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The claim set of a verified token.
///
/// The shape isn't known ahead of time, so claims stay as dynamic JSON values keyed by name.
/// Use [`Claims::deserialize_into`] to map them onto a concrete struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
	pub fn into_inner(self) -> Map<String, Value> {
		self.0
	}

	/// Returns the claim as a string, if present and a string.
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.0.get(name).and_then(Value::as_str)
	}

	pub fn deserialize_into<T: serde::de::DeserializeOwned>(self) -> serde_json::Result<T> {
		serde_json::from_value(Value::Object(self.0))
	}
}

impl Deref for Claims {
	type Target = Map<String, Value>;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<Map<String, Value>> for Claims {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

impl From<Claims> for Value {
	fn from(claims: Claims) -> Self {
		Value::Object(claims.0)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[derive(Deserialize, Debug, PartialEq)]
	struct Session {
		sub: String,
		exp: u64,
	}

	#[test]
	fn typed() {
		let claims: Claims = serde_json::from_str(r#"{"sub":"alice","exp":1700000000,"scope":"read"}"#).unwrap();
		assert_eq!(claims.get_str("sub"), Some("alice"));
		assert_eq!(claims.get_str("exp"), None);

		let session: Session = claims.deserialize_into().unwrap();
		assert_eq!(
			session,
			Session {
				sub: "alice".to_string(),
				exp: 1700000000
			}
		);
	}

	#[test]
	fn canonical() {
		let encoded = r#"{"a":1,"b":[true,null],"c":{"d":"e"}}"#;
		let claims: Claims = serde_json::from_str(encoded).unwrap();
		assert_eq!(serde_json::to_string(&claims).unwrap(), encoded);
	}
}
