//! Per-identity override cache.
//!
//! Entries are computed on first lookup and kept until a strategy is replaced
//! or [`OverrideCache::invalidate_all`] is called.
//!
//! # Locking
//!
//! One mutex guards both the installed strategies and the entries. Lookups
//! compute under that lock, so each identity is computed at most once even
//! when several callers miss concurrently. Contention is acceptable: the map
//! is small and lookups are rare next to transport latency. Replacing a
//! strategy clears every entry inside the same critical section, so no lookup
//! that starts after the install returns can observe an entry computed with
//! the old strategy.
//!
//! Strategies and the system values supplier run under the lock and must not
//! call back into the cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mmscfg_values::{OverrideMap, config_delta_into};
use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::error::{OverrideError, Result};
use crate::identity::IdentityKey;
use crate::registry::StrategyRegistry;
use crate::strategy::{
	CONFIG_UA_PROF_URL, CONFIG_USER_AGENT, ConfigValuesStrategy, IdentityMetadataStrategy,
	SystemValuesSupplier,
};


/// Strategies and computed entries, always updated together.
#[derive(Default)]
struct CacheState {
	strategies: StrategyRegistry,
	entries: HashMap<IdentityKey, Arc<OverrideMap>>,
}

impl CacheState {
	/// Drops every entry, returning how many were dropped.
	fn clear(&mut self) -> usize {
		let dropped = self.entries.len();
		self.entries.clear();
		dropped
	}
}

/// Lookup counters. Read with [`OverrideCache::stats`].
#[derive(Default)]
struct Counters {
	hits: AtomicU64,
	misses: AtomicU64,
	failures: AtomicU64,
	invalidations: AtomicU64,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
	/// Lookups answered from an existing entry.
	pub hits: u64,
	/// Lookups that computed a new entry (including failed computations).
	pub misses: u64,
	/// Computations that failed and left nothing cached.
	pub failures: u64,
	/// Full clears, from strategy installs or explicit invalidation.
	pub invalidations: u64,
}

/// Lazily computed carrier configuration overrides, keyed by identity.
///
/// Construct one per process and share it by [`Arc`].
#[derive(Default)]
pub struct OverrideCache {
	state: Mutex<CacheState>,
	counters: Counters,
}

impl OverrideCache {
	/// Creates an empty cache with no strategies installed.
	pub fn new() -> Self {
		Self::default()
	}

	/// Installs a configuration values strategy and drops every cached entry.
	///
	/// Returns the previously installed strategy. Fails with
	/// [`OverrideError::InvalidArgument`] when `strategy` is `None`, leaving the
	/// cache untouched.
	pub fn set_config_values_strategy(
		&self,
		strategy: Option<Arc<dyn ConfigValuesStrategy>>,
	) -> Result<Option<Arc<dyn ConfigValuesStrategy>>> {
		let strategy = strategy.ok_or(OverrideError::InvalidArgument(
			"configuration values strategy can not be empty",
		))?;

		let mut state = self.state.lock();
		let previous = state.strategies.replace_config_values(strategy);
		let dropped = state.clear();
		self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
		drop(state);

		info!(
			dropped,
			replaced = previous.is_some(),
			"installed configuration values strategy",
		);
		Ok(previous)
	}

	/// Installs an identity metadata strategy and drops every cached entry.
	///
	/// Same contract as [`Self::set_config_values_strategy`].
	pub fn set_identity_metadata_strategy(
		&self,
		strategy: Option<Arc<dyn IdentityMetadataStrategy>>,
	) -> Result<Option<Arc<dyn IdentityMetadataStrategy>>> {
		let strategy = strategy.ok_or(OverrideError::InvalidArgument(
			"identity metadata strategy can not be empty",
		))?;

		let mut state = self.state.lock();
		let previous = state.strategies.replace_identity_metadata(strategy);
		let dropped = state.clear();
		self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
		drop(state);

		info!(
			dropped,
			replaced = previous.is_some(),
			"installed identity metadata strategy",
		);
		Ok(previous)
	}

	/// Returns the installed configuration values strategy.
	///
	/// Shared pointer reads need synchronization, so this briefly takes the
	/// cache lock.
	pub fn config_values_strategy(&self) -> Option<Arc<dyn ConfigValuesStrategy>> {
		self.state.lock().strategies.config_values().cloned()
	}

	/// Returns the installed identity metadata strategy.
	pub fn identity_metadata_strategy(&self) -> Option<Arc<dyn IdentityMetadataStrategy>> {
		self.state.lock().strategies.identity_metadata().cloned()
	}

	/// Returns the overrides for `identity`, computing them on first lookup.
	///
	/// `system` is consulted only on a miss, and only when a configuration
	/// values strategy is installed. A failed computation caches nothing; the
	/// next lookup retries from scratch.
	///
	/// `identity` must be concrete; the [`IdentityKey::DEFAULT`] sentinel is
	/// rejected with [`OverrideError::InvalidArgument`].
	pub fn get<S>(&self, identity: IdentityKey, system: &S) -> Result<Arc<OverrideMap>>
	where
		S: SystemValuesSupplier + ?Sized,
	{
		if identity.is_default() {
			return Err(OverrideError::InvalidArgument(
				"identity must be resolved before override lookup",
			));
		}

		let mut state = self.state.lock();
		if let Some(entry) = state.entries.get(&identity) {
			self.counters.hits.fetch_add(1, Ordering::Relaxed);
			trace!(%identity, "override cache hit");
			return Ok(Arc::clone(entry));
		}

		self.counters.misses.fetch_add(1, Ordering::Relaxed);
		let overrides = match compute_overrides(&state.strategies, identity, system) {
			Ok(overrides) => Arc::new(overrides),
			Err(err) => {
				self.counters.failures.fetch_add(1, Ordering::Relaxed);
				debug!(%identity, error = %err, "override computation failed");
				return Err(err);
			}
		};
		state.entries.insert(identity, Arc::clone(&overrides));
		debug!(%identity, count = overrides.len(), "computed overrides");
		Ok(overrides)
	}

	/// Drops every cached entry without touching the strategies.
	///
	/// Returns how many entries were dropped.
	pub fn invalidate_all(&self) -> usize {
		let dropped = self.state.lock().clear();
		self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
		debug!(dropped, "override cache invalidated");
		dropped
	}

	/// Returns true if overrides are cached for `identity`.
	pub fn contains(&self, identity: IdentityKey) -> bool {
		self.state.lock().entries.contains_key(&identity)
	}

	pub fn len(&self) -> usize {
		self.state.lock().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.state.lock().entries.is_empty()
	}

	pub fn stats(&self) -> CacheStats {
		CacheStats {
			hits: self.counters.hits.load(Ordering::Relaxed),
			misses: self.counters.misses.load(Ordering::Relaxed),
			failures: self.counters.failures.load(Ordering::Relaxed),
			invalidations: self.counters.invalidations.load(Ordering::Relaxed),
		}
	}
}

impl core::fmt::Debug for OverrideCache {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let state = self.state.lock();
		f.debug_struct("OverrideCache")
			.field("strategies", &state.strategies)
			.field("entries", &state.entries.len())
			.field("stats", &self.stats())
			.finish()
	}
}

/// Builds the overrides for one identity from the installed strategies.
///
/// The caller's configuration values are diffed against the system values.
/// Identity metadata is applied afterwards and always wins: it is never diffed.
fn compute_overrides<S>(
	strategies: &StrategyRegistry,
	identity: IdentityKey,
	system: &S,
) -> Result<OverrideMap>
where
	S: SystemValuesSupplier + ?Sized,
{
	let mut overrides = OverrideMap::new();

	if let Some(strategy) = strategies.config_values() {
		let system_values = system
			.system_values(identity)
			.map_err(|source| OverrideError::SystemValues { identity, source })?;
		let caller_values = strategy
			.config_values(identity)
			.map_err(|source| OverrideError::ConfigValues { identity, source })?;
		if let Some(caller_values) = caller_values {
			config_delta_into(&system_values, &caller_values, &mut overrides);
		}
	}

	if let Some(strategy) = strategies.identity_metadata() {
		let info = strategy
			.agent_info()
			.map_err(|source| OverrideError::IdentityMetadata { source })?;
		overrides.put_string(CONFIG_USER_AGENT, info.user_agent);
		overrides.put_string(CONFIG_UA_PROF_URL, info.ua_prof_url);
	}

	Ok(overrides)
}
