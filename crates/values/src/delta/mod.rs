//! Delta between system defaults and caller-supplied values.
//!
//! The delta is strictly caller-driven: only keys the caller reports are
//! considered, and a key is emitted when the caller's value differs from the
//! system's. A system value of [`ConfigValue::Null`] counts as absent.
//!
//! | caller  | system        | emitted |
//! |---------|---------------|---------|
//! | present | absent        | yes     |
//! | present | present, same | no      |
//! | present | present, diff | yes     |
//! | null    | present       | yes     |
//! | null    | absent        | no      |
//!
//! Emission preserves the caller's type. Values an override cannot carry
//! (floats, lists) are dropped.

use tracing::debug;

use crate::map::OverrideMap;
use crate::value::{ConfigMap, ConfigValue, OverrideValue};

#[cfg(test)]
mod tests;

/// Computes the overrides needed to turn `system` into `caller`.
pub fn config_delta(system: &ConfigMap, caller: &ConfigMap) -> OverrideMap {
	let mut delta = OverrideMap::new();
	config_delta_into(system, caller, &mut delta);
	delta
}

/// Like [`config_delta`], writing the differing entries into `delta`.
///
/// Existing entries of `delta` are replaced when the caller reports a
/// differing value for the same key, and left untouched otherwise.
pub fn config_delta_into(system: &ConfigMap, caller: &ConfigMap, delta: &mut OverrideMap) {
	for (key, caller_value) in caller {
		let system_value = system.get(key).filter(|v| !v.is_null());
		if !differs(caller_value, system_value) {
			continue;
		}

		match OverrideValue::try_from(caller_value) {
			Ok(value) => {
				delta.insert(key.clone(), value);
			}
			Err(unsupported) => {
				debug!(
					key = key.as_str(),
					found = unsupported.found.name(),
					"dropping caller value of unsupported type",
				);
			}
		}
	}
}

fn differs(caller: &ConfigValue, system: Option<&ConfigValue>) -> bool {
	match (caller.is_null(), system) {
		(false, Some(system)) => caller != system,
		(false, None) => true,
		(true, Some(_)) => true,
		(true, None) => false,
	}
}
