use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mmscfg")]
#[command(about = "Inspect carrier configuration deltas and per-subscription overrides")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the overrides that turn the system values into the caller values
	Delta {
		/// System default values (JSON or TOML)
		#[arg(long, value_name = "FILE")]
		system: PathBuf,

		/// Caller values (JSON or TOML)
		#[arg(long, value_name = "FILE")]
		caller: PathBuf,
	},
	/// Print the cached overrides for one or more subscriptions
	Resolve {
		/// Profile describing system values and installed strategies
		#[arg(long, short, value_name = "FILE")]
		profile: PathBuf,

		/// Subscription to resolve (defaults to the profile's default identity)
		#[arg(long = "identity", short, value_name = "ID", allow_negative_numbers = true)]
		identities: Vec<i32>,
	},
	/// Dry-run a send and print what the transport would receive
	Send {
		#[arg(long, short, value_name = "FILE")]
		profile: PathBuf,

		#[arg(long, short, value_name = "ID", allow_negative_numbers = true)]
		identity: Option<i32>,

		/// Location of the encoded message
		#[arg(long, value_name = "URI")]
		content_uri: String,

		/// Server URL overriding the carrier default
		#[arg(long, value_name = "URL")]
		location_url: Option<String>,
	},
	/// Dry-run a download and print what the transport would receive
	Download {
		#[arg(long, short, value_name = "FILE")]
		profile: PathBuf,

		#[arg(long, short, value_name = "ID", allow_negative_numbers = true)]
		identity: Option<i32>,

		/// Server URL of the message
		#[arg(long, value_name = "URL")]
		location_url: String,

		/// Where the message would be written
		#[arg(long, value_name = "URI")]
		content_uri: String,
	},
}
