use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Configuration keyed by name, as reported by a single source.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A configuration value as reported by a source.
///
/// Sources may report values the override channel cannot carry (floats,
/// lists). Those survive comparison but are never emitted into an
/// [`OverrideMap`](crate::OverrideMap); see [`OverrideValue::try_from`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
	/// Explicitly absent.
	Null,
	/// Boolean value.
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating point value (not carried by overrides).
	Float(f64),
	/// String value.
	String(String),
	/// List value (not carried by overrides).
	List(Vec<ConfigValue>),
}

impl ConfigValue {
	/// Returns true for the explicitly absent value.
	pub fn is_null(&self) -> bool {
		matches!(self, ConfigValue::Null)
	}

	/// Returns the tag of this value.
	pub fn value_type(&self) -> ValueType {
		match self {
			ConfigValue::Null => ValueType::Null,
			ConfigValue::Bool(_) => ValueType::Bool,
			ConfigValue::Int(_) => ValueType::Int,
			ConfigValue::Float(_) => ValueType::Float,
			ConfigValue::String(_) => ValueType::String,
			ConfigValue::List(_) => ValueType::List,
		}
	}
}

impl From<bool> for ConfigValue {
	fn from(v: bool) -> Self {
		ConfigValue::Bool(v)
	}
}

impl From<i64> for ConfigValue {
	fn from(v: i64) -> Self {
		ConfigValue::Int(v)
	}
}

impl From<i32> for ConfigValue {
	fn from(v: i32) -> Self {
		ConfigValue::Int(v.into())
	}
}

impl From<f64> for ConfigValue {
	fn from(v: f64) -> Self {
		ConfigValue::Float(v)
	}
}

impl From<String> for ConfigValue {
	fn from(v: String) -> Self {
		ConfigValue::String(v)
	}
}

impl From<&str> for ConfigValue {
	fn from(v: &str) -> Self {
		ConfigValue::String(v.to_string())
	}
}

impl From<OverrideValue> for ConfigValue {
	fn from(v: OverrideValue) -> Self {
		match v {
			OverrideValue::Null => ConfigValue::Null,
			OverrideValue::Bool(v) => ConfigValue::Bool(v),
			OverrideValue::Int(v) => ConfigValue::Int(v),
			OverrideValue::String(v) => ConfigValue::String(v),
		}
	}
}

/// Tag of a [`ConfigValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
	Null,
	Bool,
	Int,
	Float,
	String,
	List,
}

impl ValueType {
	/// Returns the lowercase name of this tag.
	pub fn name(self) -> &'static str {
		match self {
			ValueType::Null => "null",
			ValueType::Bool => "bool",
			ValueType::Int => "int",
			ValueType::Float => "float",
			ValueType::String => "string",
			ValueType::List => "list",
		}
	}
}

/// A value that can be carried by an override.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverrideValue {
	/// Explicitly absent; clears the system default.
	Null,
	/// Boolean value.
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// String value.
	String(String),
}

impl OverrideValue {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			OverrideValue::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			OverrideValue::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `String` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			OverrideValue::String(v) => Some(v),
			_ => None,
		}
	}
}

impl TryFrom<&ConfigValue> for OverrideValue {
	type Error = UnsupportedValue;

	fn try_from(value: &ConfigValue) -> Result<Self, Self::Error> {
		match value {
			ConfigValue::Null => Ok(OverrideValue::Null),
			ConfigValue::Bool(v) => Ok(OverrideValue::Bool(*v)),
			ConfigValue::Int(v) => Ok(OverrideValue::Int(*v)),
			ConfigValue::String(v) => Ok(OverrideValue::String(v.clone())),
			ConfigValue::Float(_) | ConfigValue::List(_) => Err(UnsupportedValue {
				found: value.value_type(),
			}),
		}
	}
}

/// A [`ConfigValue`] whose type cannot be carried by an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedValue {
	/// Tag of the rejected value.
	pub found: ValueType,
}

impl core::fmt::Display for UnsupportedValue {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(
			f,
			"{} values cannot be carried by an override (expected null, bool, int or string)",
			self.found.name()
		)
	}
}

impl std::error::Error for UnsupportedValue {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_equality_requires_same_tag() {
		assert_ne!(ConfigValue::Int(5), ConfigValue::Float(5.0));
		assert_ne!(ConfigValue::String("5".into()), ConfigValue::Int(5));
		assert_ne!(ConfigValue::Null, ConfigValue::Bool(false));
		assert_eq!(ConfigValue::from("x"), ConfigValue::String("x".to_string()));
	}

	#[test]
	fn test_override_conversion_rejects_floats_and_lists() {
		let err = OverrideValue::try_from(&ConfigValue::Float(1.5)).unwrap_err();
		assert_eq!(err.found, ValueType::Float);

		let list = ConfigValue::List(vec![ConfigValue::Int(1)]);
		assert!(OverrideValue::try_from(&list).is_err());

		assert_eq!(
			OverrideValue::try_from(&ConfigValue::Int(7)),
			Ok(OverrideValue::Int(7))
		);
		assert_eq!(
			OverrideValue::try_from(&ConfigValue::Null),
			Ok(OverrideValue::Null)
		);
	}

	#[test]
	fn test_deserialize_json_scalars() {
		let map: ConfigMap = serde_json::from_str(
			r#"{"a": null, "b": true, "c": 12, "d": 1.5, "e": "text", "f": [1, "x"]}"#,
		)
		.unwrap();

		assert_eq!(map["a"], ConfigValue::Null);
		assert_eq!(map["b"], ConfigValue::Bool(true));
		assert_eq!(map["c"], ConfigValue::Int(12));
		assert_eq!(map["d"], ConfigValue::Float(1.5));
		assert_eq!(map["e"], ConfigValue::String("text".into()));
		assert_eq!(
			map["f"],
			ConfigValue::List(vec![ConfigValue::Int(1), ConfigValue::String("x".into())])
		);
	}
}
