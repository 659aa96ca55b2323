//! Currently installed override strategies.

use std::sync::Arc;

use crate::strategy::{ConfigValuesStrategy, IdentityMetadataStrategy};

/// Holds at most one strategy of each kind.
///
/// The registry itself is not synchronized. [`OverrideCache`] keeps it under
/// the same lock as its entries so that replacing a strategy and dropping the
/// entries computed with the old one happen together.
///
/// [`OverrideCache`]: crate::cache::OverrideCache
#[derive(Default, Clone)]
pub struct StrategyRegistry {
	config_values: Option<Arc<dyn ConfigValuesStrategy>>,
	identity_metadata: Option<Arc<dyn IdentityMetadataStrategy>>,
}

impl StrategyRegistry {
	/// Creates a registry with no strategies installed.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn config_values(&self) -> Option<&Arc<dyn ConfigValuesStrategy>> {
		self.config_values.as_ref()
	}

	pub fn identity_metadata(&self) -> Option<&Arc<dyn IdentityMetadataStrategy>> {
		self.identity_metadata.as_ref()
	}

	/// Installs a configuration values strategy, returning the one it replaced.
	pub fn replace_config_values(
		&mut self,
		strategy: Arc<dyn ConfigValuesStrategy>,
	) -> Option<Arc<dyn ConfigValuesStrategy>> {
		self.config_values.replace(strategy)
	}

	/// Installs an identity metadata strategy, returning the one it replaced.
	pub fn replace_identity_metadata(
		&mut self,
		strategy: Arc<dyn IdentityMetadataStrategy>,
	) -> Option<Arc<dyn IdentityMetadataStrategy>> {
		self.identity_metadata.replace(strategy)
	}
}

impl core::fmt::Debug for StrategyRegistry {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("StrategyRegistry")
			.field("config_values", &self.config_values.is_some())
			.field("identity_metadata", &self.identity_metadata.is_some())
			.finish()
	}
}
