//! `mmscfg`: inspect carrier configuration deltas and per-subscription overrides.

mod cli;
mod profile;
#[cfg(test)]
mod tests;
mod transport;

use std::collections::BTreeMap;
use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command};
use mmscfg_overrides::{DownloadRequest, IdentityKey, OverrideMap, SendRequest};
use profile::{Profile, load_config_map};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use transport::DryRunTransport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match cli.command {
		Command::Delta { system, caller } => {
			let system = load_config_map(&system)?;
			let caller = load_config_map(&caller)?;
			let delta = mmscfg_values::config_delta(&system, &caller);
			debug!(entries = delta.len(), "computed delta");
			println!("{}", serde_json::to_string_pretty(&delta)?);
		}
		Command::Resolve {
			profile,
			identities,
		} => {
			let profile = Profile::load(&profile)?;
			let resolved = resolve(&profile, &identities)?;
			println!("{}", serde_json::to_string_pretty(&resolved)?);
		}
		Command::Send {
			profile,
			identity,
			content_uri,
			location_url,
		} => {
			let dispatcher = Profile::load(&profile)?.build_dispatcher(Arc::new(DryRunTransport))?;
			let request = SendRequest {
				content_uri,
				location_url,
				completion: None,
			};
			dispatcher.send(identity_or_default(identity), request).await?;
		}
		Command::Download {
			profile,
			identity,
			location_url,
			content_uri,
		} => {
			let dispatcher = Profile::load(&profile)?.build_dispatcher(Arc::new(DryRunTransport))?;
			let request = DownloadRequest {
				location_url,
				content_uri,
				completion: None,
			};
			dispatcher
				.download(identity_or_default(identity), request)
				.await?;
		}
	}

	Ok(())
}

fn init_tracing(verbose: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn identity_or_default(identity: Option<i32>) -> IdentityKey {
	identity.map(IdentityKey).unwrap_or(IdentityKey::DEFAULT)
}

/// Resolves overrides for each requested identity, keyed by the concrete identity.
fn resolve(profile: &Profile, identities: &[i32]) -> anyhow::Result<BTreeMap<String, OverrideMap>> {
	let dispatcher = profile.build_dispatcher(Arc::new(DryRunTransport))?;
	let requested: Vec<IdentityKey> = if identities.is_empty() {
		vec![IdentityKey::DEFAULT]
	} else {
		identities.iter().copied().map(IdentityKey).collect()
	};

	let mut resolved = BTreeMap::new();
	for identity in requested {
		let (identity, overrides) = dispatcher.overrides_for(identity)?;
		resolved.insert(identity.to_string(), OverrideMap::clone(&overrides));
	}
	Ok(resolved)
}
