//! Send and download entry points.
//!
//! Each call resolves the identity, looks up the overrides in the shared
//! [`OverrideCache`], and hands them with the request to the
//! [`MessageTransport`]. Retries are the transport's concern.

use std::sync::Arc;

use async_trait::async_trait;
use mmscfg_values::OverrideMap;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::cache::OverrideCache;
use crate::config::{DispatchConfig, FailurePolicy};
use crate::error::{BoxError, OverrideError, Result};
use crate::identity::{DefaultIdentityResolver, IdentityKey, IdentityResolver};
use crate::strategy::{ConfigValuesStrategy, IdentityMetadataStrategy, SystemValuesSupplier};


/// Outcome reported by the transport once a message has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
	Delivered,
	Failed { reason: String },
}

/// One-shot signal the transport fires when a request completes.
#[derive(Debug)]
pub struct Completion {
	tx: oneshot::Sender<DeliveryStatus>,
}

impl Completion {
	/// Creates a completion signal and the receiver that observes it.
	pub fn channel() -> (Self, oneshot::Receiver<DeliveryStatus>) {
		let (tx, rx) = oneshot::channel();
		(Self { tx }, rx)
	}

	/// Reports the outcome. A dropped receiver is ignored.
	pub fn complete(self, status: DeliveryStatus) {
		let _ = self.tx.send(status);
	}
}

/// Outgoing message.
#[derive(Debug)]
pub struct SendRequest {
	/// Location of the encoded message to send.
	pub content_uri: String,
	/// Optional server URL overriding the carrier's default.
	pub location_url: Option<String>,
	pub completion: Option<Completion>,
}

/// Incoming message to fetch.
#[derive(Debug)]
pub struct DownloadRequest {
	/// Server URL of the message.
	pub location_url: String,
	/// Where the downloaded message is written.
	pub content_uri: String,
	pub completion: Option<Completion>,
}

/// Platform transport that actually moves messages.
#[async_trait]
pub trait MessageTransport: Send + Sync {
	async fn send(
		&self,
		identity: IdentityKey,
		request: SendRequest,
		overrides: Arc<OverrideMap>,
	) -> std::result::Result<(), BoxError>;

	async fn download(
		&self,
		identity: IdentityKey,
		request: DownloadRequest,
		overrides: Arc<OverrideMap>,
	) -> std::result::Result<(), BoxError>;
}

/// Entry points for sending and downloading messages with computed overrides.
pub struct OverrideDispatcher {
	cache: Arc<OverrideCache>,
	resolver: Arc<dyn IdentityResolver>,
	system: Arc<dyn SystemValuesSupplier>,
	transport: Arc<dyn MessageTransport>,
	config: DispatchConfig,
}

impl OverrideDispatcher {
	/// Creates a dispatcher resolving the default identity to
	/// [`DispatchConfig::default_identity`].
	pub fn new(
		cache: Arc<OverrideCache>,
		system: Arc<dyn SystemValuesSupplier>,
		transport: Arc<dyn MessageTransport>,
		config: DispatchConfig,
	) -> Self {
		Self {
			cache,
			resolver: Arc::new(DefaultIdentityResolver::new(config.default_identity)),
			system,
			transport,
			config,
		}
	}

	/// Replaces the identity resolver, typically with one backed by the platform.
	pub fn with_resolver(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
		self.resolver = resolver;
		self
	}

	pub fn cache(&self) -> &Arc<OverrideCache> {
		&self.cache
	}

	pub fn config(&self) -> &DispatchConfig {
		&self.config
	}

	/// See [`OverrideCache::set_config_values_strategy`].
	pub fn set_config_values_strategy(
		&self,
		strategy: Option<Arc<dyn ConfigValuesStrategy>>,
	) -> Result<Option<Arc<dyn ConfigValuesStrategy>>> {
		self.cache.set_config_values_strategy(strategy)
	}

	/// See [`OverrideCache::set_identity_metadata_strategy`].
	pub fn set_identity_metadata_strategy(
		&self,
		strategy: Option<Arc<dyn IdentityMetadataStrategy>>,
	) -> Result<Option<Arc<dyn IdentityMetadataStrategy>>> {
		self.cache.set_identity_metadata_strategy(strategy)
	}

	/// Sends a message for `identity` (or the default identity).
	pub async fn send(&self, identity: IdentityKey, request: SendRequest) -> Result<()> {
		let (identity, overrides) = self.overrides_for(identity)?;
		debug!(%identity, overrides = overrides.len(), "dispatching send");
		self.transport
			.send(identity, request, overrides)
			.await
			.map_err(|source| OverrideError::Transport { identity, source })
	}

	/// Downloads a message for `identity` (or the default identity).
	pub async fn download(&self, identity: IdentityKey, request: DownloadRequest) -> Result<()> {
		let (identity, overrides) = self.overrides_for(identity)?;
		debug!(%identity, overrides = overrides.len(), "dispatching download");
		self.transport
			.download(identity, request, overrides)
			.await
			.map_err(|source| OverrideError::Transport { identity, source })
	}

	/// Resolves `identity` and looks up its overrides, applying the failure policy.
	pub fn overrides_for(&self, identity: IdentityKey) -> Result<(IdentityKey, Arc<OverrideMap>)> {
		let identity = self.resolver.resolve(identity);
		match self.cache.get(identity, &*self.system) {
			Ok(overrides) => Ok((identity, overrides)),
			Err(err) if err.is_supplier_failure() => match self.config.on_override_failure {
				FailurePolicy::FailFast => Err(err),
				FailurePolicy::EmptyOverrides => {
					warn!(%identity, error = %err, "override computation failed; dispatching without overrides");
					Ok((identity, Arc::new(OverrideMap::new())))
				}
			},
			Err(err) => Err(err),
		}
	}
}
