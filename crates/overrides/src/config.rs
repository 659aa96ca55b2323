//! Dispatch configuration.

use serde::{Deserialize, Serialize};

use crate::identity::IdentityKey;

/// What the entry points do when overrides cannot be computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
	/// Return the error without calling the transport.
	#[default]
	FailFast,
	/// Log a warning and dispatch with no overrides.
	EmptyOverrides,
}

/// Settings for [`OverrideDispatcher`](crate::dispatch::OverrideDispatcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
	/// Policy applied when override computation fails.
	pub on_override_failure: FailurePolicy,
	/// Identity the default sentinel resolves to when no platform resolver is given.
	pub default_identity: IdentityKey,
}

impl Default for DispatchConfig {
	fn default() -> Self {
		Self {
			on_override_failure: FailurePolicy::default(),
			default_identity: IdentityKey(0),
		}
	}
}
