//! File formats read by the CLI.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use mmscfg_overrides::{
	AgentInfo, ConfigTable, DispatchConfig, MessageTransport, OverrideCache, OverrideDispatcher,
	StaticAgentInfo, StaticConfigValues, StaticSystemValues,
};
use mmscfg_values::ConfigMap;
use serde::Deserialize;

/// System values, installed strategies, and dispatch settings for one run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
	pub dispatch: DispatchConfig,
	/// Platform defaults.
	pub system: ConfigTable,
	/// Installs a configuration values strategy when present.
	pub caller: Option<ConfigTable>,
	/// Installs an identity metadata strategy when present.
	pub agent: Option<AgentInfo>,
}

impl Profile {
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read profile {}", path.display()))?;
		Self::from_toml_str(&text).with_context(|| format!("invalid profile {}", path.display()))
	}

	pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Builds a cache with the profile's strategies installed.
	pub fn build_cache(&self) -> anyhow::Result<OverrideCache> {
		let cache = OverrideCache::new();
		if let Some(caller) = &self.caller {
			cache.set_config_values_strategy(Some(Arc::new(StaticConfigValues::new(
				caller.clone(),
			))))?;
		}
		if let Some(agent) = &self.agent {
			cache.set_identity_metadata_strategy(Some(Arc::new(StaticAgentInfo::new(
				agent.clone(),
			))))?;
		}
		Ok(cache)
	}

	/// Builds a dispatcher over the profile's cache and system values.
	pub fn build_dispatcher(
		&self,
		transport: Arc<dyn MessageTransport>,
	) -> anyhow::Result<OverrideDispatcher> {
		Ok(OverrideDispatcher::new(
			Arc::new(self.build_cache()?),
			Arc::new(StaticSystemValues::new(self.system.clone())),
			transport,
			self.dispatch.clone(),
		))
	}
}

/// Reads a configuration map from a `.json` or `.toml` file.
///
/// Only JSON can express explicitly absent (`null`) values.
pub fn load_config_map(path: &Path) -> anyhow::Result<ConfigMap> {
	let text = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read {}", path.display()))?;
	let map: ConfigMap = match path.extension().and_then(|ext| ext.to_str()) {
		Some("json") => serde_json::from_str(&text)
			.with_context(|| format!("invalid JSON in {}", path.display()))?,
		Some("toml") => {
			toml::from_str(&text).with_context(|| format!("invalid TOML in {}", path.display()))?
		}
		_ => bail!("{}: expected a .json or .toml file", path.display()),
	};
	Ok(map)
}
