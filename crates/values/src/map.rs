use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::value::OverrideValue;

/// Entries to apply on top of the system defaults for one subscription.
///
/// Keys are kept sorted so that serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideMap {
	entries: BTreeMap<String, OverrideValue>,
}

impl OverrideMap {
	/// Creates an empty override map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a value, returning the one it replaced.
	pub fn insert(&mut self, key: impl Into<String>, value: OverrideValue) -> Option<OverrideValue> {
		self.entries.insert(key.into(), value)
	}

	pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.insert(key, OverrideValue::String(value.into()));
	}

	pub fn put_int(&mut self, key: impl Into<String>, value: i64) {
		self.insert(key, OverrideValue::Int(value));
	}

	pub fn put_bool(&mut self, key: impl Into<String>, value: bool) {
		self.insert(key, OverrideValue::Bool(value));
	}

	/// Records that the system default for `key` must be cleared.
	pub fn put_null(&mut self, key: impl Into<String>) {
		self.insert(key, OverrideValue::Null);
	}

	pub fn get(&self, key: &str) -> Option<&OverrideValue> {
		self.entries.get(key)
	}

	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.get(key).and_then(OverrideValue::as_str)
	}

	pub fn get_int(&self, key: &str) -> Option<i64> {
		self.get(key).and_then(OverrideValue::as_int)
	}

	pub fn get_bool(&self, key: &str) -> Option<bool> {
		self.get(key).and_then(OverrideValue::as_bool)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates entries in key order.
	pub fn iter(&self) -> btree_map::Iter<'_, String, OverrideValue> {
		self.entries.iter()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Copies every entry of `other` into this map; `other` wins on conflicts.
	pub fn merge(&mut self, other: &OverrideMap) {
		for (key, value) in other.iter() {
			self.entries.insert(key.clone(), value.clone());
		}
	}
}

impl FromIterator<(String, OverrideValue)> for OverrideMap {
	fn from_iter<I: IntoIterator<Item = (String, OverrideValue)>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().collect(),
		}
	}
}

impl<'a> IntoIterator for &'a OverrideMap {
	type Item = (&'a String, &'a OverrideValue);
	type IntoIter = btree_map::Iter<'a, String, OverrideValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

impl IntoIterator for OverrideMap {
	type Item = (String, OverrideValue);
	type IntoIter = btree_map::IntoIter<String, OverrideValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}
