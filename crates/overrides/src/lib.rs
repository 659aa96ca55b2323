//! Per-subscription carrier configuration overrides.
//!
//! The platform reports default carrier configuration for each subscription.
//! Applications may install strategies that supply their own values and a
//! user agent identity; the [`OverrideCache`] turns those into the minimal set
//! of overrides for each subscription, computes it once, and hands it to the
//! [`OverrideDispatcher`] entry points on every send and download.
//!
//! Installing a strategy drops every cached entry atomically, so no lookup
//! issued after the install returns sees overrides computed with the previous
//! strategy.

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod registry;
pub mod strategy;

pub use cache::{CacheStats, OverrideCache};
pub use config::{DispatchConfig, FailurePolicy};
pub use dispatch::{
	Completion, DeliveryStatus, DownloadRequest, MessageTransport, OverrideDispatcher, SendRequest,
};
pub use error::{BoxError, OverrideError, Result};
pub use identity::{DefaultIdentityResolver, IdentityKey, IdentityResolver};
pub use mmscfg_values::{ConfigMap, ConfigValue, OverrideMap, OverrideValue};
pub use registry::StrategyRegistry;
pub use strategy::{
	AgentInfo, CONFIG_UA_PROF_URL, CONFIG_USER_AGENT, ConfigTable, ConfigValuesStrategy,
	IdentityMetadataStrategy, StaticAgentInfo, StaticConfigValues, StaticSystemValues,
	SystemValuesSupplier,
};
