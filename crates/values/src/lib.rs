//! Typed carrier configuration values and the override deltas computed from them.
//!
//! A [`ConfigMap`] holds configuration as reported by some source (the platform
//! defaults, or a caller-supplied loader). An [`OverrideMap`] holds only the
//! entries that should replace the platform defaults for one subscription, and
//! is produced by [`config_delta`].

/// Delta computation between system defaults and caller values.
pub mod delta;
/// Override maps handed to the transport.
pub mod map;
/// Heterogeneous configuration values.
pub mod value;

pub use delta::{config_delta, config_delta_into};
pub use map::OverrideMap;
pub use value::{ConfigMap, ConfigValue, OverrideValue, UnsupportedValue, ValueType};
