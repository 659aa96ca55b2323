//! Error types for override computation and dispatch.

use thiserror::Error;

use crate::identity::IdentityKey;

/// Error type returned by collaborators (strategies, suppliers, transports).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the override cache and the dispatch entry points.
#[derive(Debug, Error)]
pub enum OverrideError {
	/// A strategy install was attempted without a strategy.
	///
	/// Neither the installed strategies nor the cache are touched.
	#[error("invalid argument: {0}")]
	InvalidArgument(&'static str),

	/// The configuration values strategy failed for an identity.
	#[error("configuration values strategy failed for identity {identity}: {source}")]
	ConfigValues {
		/// Identity being computed.
		identity: IdentityKey,
		/// The strategy's error.
		#[source]
		source: BoxError,
	},

	/// The platform's system values could not be read for an identity.
	#[error("system values unavailable for identity {identity}: {source}")]
	SystemValues {
		/// Identity being computed.
		identity: IdentityKey,
		/// The supplier's error.
		#[source]
		source: BoxError,
	},

	/// The identity metadata strategy failed.
	#[error("identity metadata strategy failed: {source}")]
	IdentityMetadata {
		/// The strategy's error.
		#[source]
		source: BoxError,
	},

	/// The transport rejected a send or download.
	#[error("transport failed for identity {identity}: {source}")]
	Transport {
		/// Identity the message was dispatched for.
		identity: IdentityKey,
		/// The transport's error.
		#[source]
		source: BoxError,
	},
}

impl OverrideError {
	/// Returns true if the error came from a strategy or supplier while computing overrides.
	pub fn is_supplier_failure(&self) -> bool {
		matches!(
			self,
			OverrideError::ConfigValues { .. }
				| OverrideError::SystemValues { .. }
				| OverrideError::IdentityMetadata { .. }
		)
	}
}

/// Result type for override operations.
pub type Result<T> = std::result::Result<T, OverrideError>;
