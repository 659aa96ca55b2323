use serde::{Deserialize, Serialize};

/// Identifies the subscription (SIM) whose configuration is in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(pub i32);

impl IdentityKey {
	/// Sentinel meaning "the caller's default subscription".
	///
	/// Must be resolved through an [`IdentityResolver`] before it reaches the cache.
	pub const DEFAULT: IdentityKey = IdentityKey(-1);

	/// Returns true for the [`IdentityKey::DEFAULT`] sentinel.
	pub fn is_default(self) -> bool {
		self == Self::DEFAULT
	}
}

impl From<i32> for IdentityKey {
	fn from(v: i32) -> Self {
		IdentityKey(v)
	}
}

impl core::fmt::Display for IdentityKey {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		if self.is_default() {
			f.write_str("default")
		} else {
			write!(f, "{}", self.0)
		}
	}
}

/// Maps the [`IdentityKey::DEFAULT`] sentinel to a concrete identity.
///
/// Concrete keys must be returned unchanged.
pub trait IdentityResolver: Send + Sync {
	fn resolve(&self, identity: IdentityKey) -> IdentityKey;
}

impl<F> IdentityResolver for F
where
	F: Fn(IdentityKey) -> IdentityKey + Send + Sync,
{
	fn resolve(&self, identity: IdentityKey) -> IdentityKey {
		self(identity)
	}
}

/// Resolves the sentinel to a fixed identity.
#[derive(Debug, Clone, Copy)]
pub struct DefaultIdentityResolver {
	default: IdentityKey,
}

impl DefaultIdentityResolver {
	pub fn new(default: IdentityKey) -> Self {
		Self { default }
	}
}

impl IdentityResolver for DefaultIdentityResolver {
	fn resolve(&self, identity: IdentityKey) -> IdentityKey {
		if identity.is_default() {
			self.default
		} else {
			identity
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_resolver_only_maps_sentinel() {
		let resolver = DefaultIdentityResolver::new(IdentityKey(3));

		assert_eq!(resolver.resolve(IdentityKey::DEFAULT), IdentityKey(3));
		assert_eq!(resolver.resolve(IdentityKey(7)), IdentityKey(7));
	}

	#[test]
	fn test_display() {
		assert_eq!(IdentityKey::DEFAULT.to_string(), "default");
		assert_eq!(IdentityKey(2).to_string(), "2");
	}
}
