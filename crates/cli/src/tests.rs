use std::io::Write;

use clap::CommandFactory;
use mmscfg_overrides::{CONFIG_UA_PROF_URL, CONFIG_USER_AGENT, FailurePolicy, OverrideValue};
use mmscfg_values::ConfigValue;
use pretty_assertions::assert_eq;

use super::*;

const PROFILE: &str = r#"
[dispatch]
on_override_failure = "empty_overrides"
default_identity = 1

[system.default]
enabledMMS = true
maxMessageSize = 307200
userAgent = "Platform/1.0"

[system.identities.2]
enabledMMS = false
maxMessageSize = 307200

[caller.default]
enabledMMS = true
maxMessageSize = 614400
httpSocketTimeout = 60000

[agent]
user_agent = "UA/1.0"
ua_prof_url = "http://prof"
"#;

#[test]
fn test_cli_definition_is_valid() {
	Cli::command().debug_assert();
}

#[test]
fn test_profile_parses_all_sections() {
	let profile = Profile::from_toml_str(PROFILE).unwrap();

	assert_eq!(profile.dispatch.on_override_failure, FailurePolicy::EmptyOverrides);
	assert_eq!(profile.dispatch.default_identity, IdentityKey(1));
	assert_eq!(
		profile.system.lookup(IdentityKey(2)).unwrap()["enabledMMS"],
		ConfigValue::Bool(false)
	);
	assert!(profile.caller.is_some());
	assert_eq!(profile.agent.unwrap().user_agent, "UA/1.0");
}

#[test]
fn test_empty_profile_has_no_strategies() {
	let profile = Profile::from_toml_str("").unwrap();
	let cache = profile.build_cache().unwrap();

	assert!(cache.config_values_strategy().is_none());
	assert!(cache.identity_metadata_strategy().is_none());
}

#[test]
fn test_unknown_profile_section_is_rejected() {
	assert!(Profile::from_toml_str("[carrier]\nname = \"x\"").is_err());
}

#[test]
fn test_misspelled_identity_table_is_rejected() {
	let err = Profile::from_toml_str("[caller.identities.02]\nenabledMMS = false\n").unwrap_err();

	assert!(format!("{err:#}").contains("invalid identity `02`"), "{err:#}");
}

#[test]
fn test_resolve_per_identity() {
	let profile = Profile::from_toml_str(PROFILE).unwrap();

	let resolved = resolve(&profile, &[]).unwrap();
	let default = &resolved["1"];
	assert_eq!(default.get_int("maxMessageSize"), Some(614_400));
	assert_eq!(default.get_int("httpSocketTimeout"), Some(60_000));
	assert!(!default.contains_key("enabledMMS"));
	assert_eq!(default.get_str(CONFIG_USER_AGENT), Some("UA/1.0"));
	assert_eq!(default.get_str(CONFIG_UA_PROF_URL), Some("http://prof"));

	let resolved = resolve(&profile, &[2]).unwrap();
	assert_eq!(resolved["2"].get("enabledMMS"), Some(&OverrideValue::Bool(true)));
}

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
	let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
	file.write_all(contents.as_bytes()).unwrap();
	file
}

#[test]
fn test_load_config_map_json_and_toml() {
	let json = write_temp(".json", r#"{"a": null, "b": 5}"#);
	let toml = write_temp(".toml", "a = \"x\"\nb = 5\n");

	let caller = load_config_map(json.path()).unwrap();
	let system = load_config_map(toml.path()).unwrap();
	assert_eq!(caller["a"], ConfigValue::Null);

	let delta = mmscfg_values::config_delta(&system, &caller);
	assert_eq!(delta.len(), 1);
	assert_eq!(delta.get("a"), Some(&OverrideValue::Null));
}

#[test]
fn test_load_config_map_rejects_unknown_extension() {
	let file = write_temp(".yaml", "a: 1");

	let err = load_config_map(file.path()).unwrap_err();
	assert!(err.to_string().contains("expected a .json or .toml file"));
}
