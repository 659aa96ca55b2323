//! Pluggable sources of override values.
//!
//! Strategies and the system values supplier are invoked while the override
//! cache holds its lock. Implementations must not call back into the cache
//! and should return promptly.

use std::collections::BTreeMap;

use mmscfg_values::ConfigMap;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

use crate::error::BoxError;
use crate::identity::IdentityKey;

/// Override key carrying the user agent string.
pub const CONFIG_USER_AGENT: &str = "userAgent";
/// Override key carrying the user agent profile URL.
pub const CONFIG_UA_PROF_URL: &str = "uaProfUrl";

/// Supplies caller-side carrier configuration values.
pub trait ConfigValuesStrategy: Send + Sync {
	/// Returns the caller's values for `identity`, or `None` if the caller has none.
	fn config_values(&self, identity: IdentityKey) -> Result<Option<ConfigMap>, BoxError>;
}

/// Supplies the user agent identity sent with every message.
pub trait IdentityMetadataStrategy: Send + Sync {
	fn agent_info(&self) -> Result<AgentInfo, BoxError>;
}

/// Supplies the platform's default carrier configuration.
pub trait SystemValuesSupplier: Send + Sync {
	fn system_values(&self, identity: IdentityKey) -> Result<ConfigMap, BoxError>;
}

impl<F> SystemValuesSupplier for F
where
	F: Fn(IdentityKey) -> Result<ConfigMap, BoxError> + Send + Sync,
{
	fn system_values(&self, identity: IdentityKey) -> Result<ConfigMap, BoxError> {
		self(identity)
	}
}

/// User agent and user agent profile URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
	pub user_agent: String,
	pub ua_prof_url: String,
}

impl AgentInfo {
	pub fn new(user_agent: impl Into<String>, ua_prof_url: impl Into<String>) -> Self {
		Self {
			user_agent: user_agent.into(),
			ua_prof_url: ua_prof_url.into(),
		}
	}
}

/// Per-identity configuration tables with a shared fallback.
///
/// Used both as a [`ConfigValuesStrategy`] and as a [`SystemValuesSupplier`]
/// when values come from files rather than the platform.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigTable {
	/// Values for identities without their own table.
	#[serde(default)]
	pub default: Option<ConfigMap>,
	/// Values for specific identities. Keys are written as decimal table names (`[identities.2]`).
	#[serde(default, deserialize_with = "identity_tables")]
	pub identities: BTreeMap<IdentityKey, ConfigMap>,
}

impl ConfigTable {
	/// Sets the values for one identity.
	pub fn insert(&mut self, identity: IdentityKey, values: ConfigMap) {
		self.identities.insert(identity, values);
	}

	/// Returns the values for `identity`, falling back to the default table.
	pub fn lookup(&self, identity: IdentityKey) -> Option<&ConfigMap> {
		self.identities.get(&identity).or(self.default.as_ref())
	}
}

/// Parses string table keys into identities, rejecting anything a lookup could never match.
fn identity_tables<'de, D>(deserializer: D) -> Result<BTreeMap<IdentityKey, ConfigMap>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = BTreeMap::<String, ConfigMap>::deserialize(deserializer)?;
	raw.into_iter()
		.map(|(key, values)| {
			key.parse::<i32>()
				.ok()
				.filter(|id| id.to_string() == key)
				.map(IdentityKey)
				.filter(|identity| !identity.is_default())
				.map(|identity| (identity, values))
				.ok_or_else(|| {
					D::Error::custom(format_args!(
						"invalid identity `{key}`, expected a decimal subscription id"
					))
				})
		})
		.collect()
}

/// A [`ConfigValuesStrategy`] answering from an in-memory [`ConfigTable`].
#[derive(Debug, Clone, Default)]
pub struct StaticConfigValues {
	table: ConfigTable,
}

impl StaticConfigValues {
	pub fn new(table: ConfigTable) -> Self {
		Self { table }
	}
}

impl ConfigValuesStrategy for StaticConfigValues {
	fn config_values(&self, identity: IdentityKey) -> Result<Option<ConfigMap>, BoxError> {
		Ok(self.table.lookup(identity).cloned())
	}
}

/// A [`SystemValuesSupplier`] answering from an in-memory [`ConfigTable`].
///
/// Identities without values get an empty map.
#[derive(Debug, Clone, Default)]
pub struct StaticSystemValues {
	table: ConfigTable,
}

impl StaticSystemValues {
	pub fn new(table: ConfigTable) -> Self {
		Self { table }
	}
}

impl SystemValuesSupplier for StaticSystemValues {
	fn system_values(&self, identity: IdentityKey) -> Result<ConfigMap, BoxError> {
		Ok(self.table.lookup(identity).cloned().unwrap_or_default())
	}
}

/// An [`IdentityMetadataStrategy`] returning fixed agent info.
#[derive(Debug, Clone)]
pub struct StaticAgentInfo {
	info: AgentInfo,
}

impl StaticAgentInfo {
	pub fn new(info: AgentInfo) -> Self {
		Self { info }
	}
}

impl IdentityMetadataStrategy for StaticAgentInfo {
	fn agent_info(&self) -> Result<AgentInfo, BoxError> {
		Ok(self.info.clone())
	}
}

#[cfg(test)]
mod tests {
	use mmscfg_values::ConfigValue;

	use super::*;

	fn table() -> ConfigTable {
		let mut table = ConfigTable {
			default: Some(ConfigMap::from([("a".to_string(), ConfigValue::Int(1))])),
			..Default::default()
		};
		table.insert(
			IdentityKey(2),
			ConfigMap::from([("a".to_string(), ConfigValue::Int(2))]),
		);
		table
	}

	#[test]
	fn test_table_lookup_falls_back_to_default() {
		let table = table();

		assert_eq!(table.lookup(IdentityKey(2)).unwrap()["a"], ConfigValue::Int(2));
		assert_eq!(table.lookup(IdentityKey(9)).unwrap()["a"], ConfigValue::Int(1));
	}

	#[test]
	fn test_table_identity_keys_are_parsed() {
		let table: ConfigTable = toml::from_str(
			r#"
			[default]
			a = 1

			[identities.2]
			a = 2
			"#,
		)
		.unwrap();

		assert_eq!(table, self::table());
	}

	#[test]
	fn test_table_rejects_unmatchable_identity_keys() {
		for key in ["carrier", "02", "+2", "-1", "2.0"] {
			let input = format!("[identities.\"{key}\"]\na = 1\n");
			let err = toml::from_str::<ConfigTable>(&input).unwrap_err();

			assert!(err.to_string().contains("invalid identity"), "{key}: {err}");
		}
	}

	#[test]
	fn test_static_system_values_default_to_empty() {
		let supplier = StaticSystemValues::new(ConfigTable::default());

		assert!(supplier.system_values(IdentityKey(1)).unwrap().is_empty());
	}

	#[test]
	fn test_static_config_values_without_table_is_none() {
		let strategy = StaticConfigValues::default();

		assert!(strategy.config_values(IdentityKey(1)).unwrap().is_none());
	}
}
