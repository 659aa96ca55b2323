use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn map<const N: usize>(entries: [(&str, ConfigValue); N]) -> ConfigMap {
	entries
		.into_iter()
		.map(|(k, v)| (k.to_string(), v))
		.collect()
}

#[test]
fn test_differing_and_new_keys_are_emitted() {
	let system = map([("a", "x".into()), ("b", 5.into())]);
	let caller = map([("a", "y".into()), ("b", 5.into()), ("c", true.into())]);

	let delta = config_delta(&system, &caller);

	let mut expected = OverrideMap::new();
	expected.put_string("a", "y");
	expected.put_bool("c", true);
	assert_eq!(delta, expected);
}

#[test]
fn test_null_caller_value_clears_system_default() {
	let system = map([("a", "x".into())]);
	let caller = map([("a", ConfigValue::Null)]);

	let delta = config_delta(&system, &caller);

	assert_eq!(delta.len(), 1);
	assert_eq!(delta.get("a"), Some(&OverrideValue::Null));
}

#[test]
fn test_null_against_missing_or_null_is_not_a_difference() {
	let system = map([("both_null", ConfigValue::Null)]);
	let caller = map([("both_null", ConfigValue::Null), ("missing", ConfigValue::Null)]);

	assert!(config_delta(&system, &caller).is_empty());
}

#[test]
fn test_system_null_counts_as_absent() {
	let system = map([("a", ConfigValue::Null)]);
	let caller = map([("a", 3.into())]);

	assert_eq!(config_delta(&system, &caller).get_int("a"), Some(3));
}

#[test]
fn test_system_only_keys_are_ignored() {
	let system = map([("only_system", 1.into()), ("shared", "v".into())]);
	let caller = map([("shared", "v".into())]);

	assert!(config_delta(&system, &caller).is_empty());
}

#[test]
fn test_empty_system_emits_every_supported_caller_value() {
	let caller = map([("s", "v".into()), ("i", 1.into()), ("b", false.into())]);

	let delta = config_delta(&ConfigMap::new(), &caller);

	assert_eq!(delta.len(), 3);
	assert_eq!(delta.get_bool("b"), Some(false));
}

#[test]
fn test_type_change_is_a_difference() {
	let system = map([("size", "300".into())]);
	let caller = map([("size", 300.into())]);

	assert_eq!(config_delta(&system, &caller).get_int("size"), Some(300));
}

#[test]
fn test_unsupported_types_are_dropped() {
	let system = map([("ratio", 1.0.into())]);
	let caller = map([
		("ratio", 2.5.into()),
		("list", ConfigValue::List(vec![1.into()])),
		("kept", "yes".into()),
	]);

	let delta = config_delta(&system, &caller);

	assert_eq!(delta.keys().collect::<Vec<_>>(), vec!["kept"]);
}

#[test]
fn test_delta_into_keeps_unrelated_entries() {
	let mut delta = OverrideMap::new();
	delta.put_string("userAgent", "UA/1.0");

	let caller = map([("httpSocketTimeout", 60_000.into())]);
	config_delta_into(&ConfigMap::new(), &caller, &mut delta);

	assert_eq!(delta.get_str("userAgent"), Some("UA/1.0"));
	assert_eq!(delta.get_int("httpSocketTimeout"), Some(60_000));
}

fn arb_scalar() -> impl Strategy<Value = ConfigValue> {
	prop_oneof![
		Just(ConfigValue::Null),
		any::<bool>().prop_map(ConfigValue::Bool),
		(-3i64..3).prop_map(ConfigValue::Int),
		"[ab]{0,2}".prop_map(ConfigValue::String),
	]
}

fn arb_map() -> impl Strategy<Value = ConfigMap> {
	prop::collection::btree_map("[a-e]", arb_scalar(), 0..5)
}

proptest! {
	/// No emitted entry equals the system default, and every emitted key came from the caller.
	#[test]
	fn prop_delta_only_holds_differences(system in arb_map(), caller in arb_map()) {
		let delta = config_delta(&system, &caller);

		for (key, value) in &delta {
			prop_assert!(caller.contains_key(key));
			let value = ConfigValue::from(value.clone());
			prop_assert_eq!(&value, &caller[key]);
			let system_value = system.get(key).filter(|v| !v.is_null());
			prop_assert_ne!(Some(&value), system_value);
		}
	}

	/// Applying the delta on top of the system map reproduces every caller value.
	#[test]
	fn prop_delta_applied_matches_caller(system in arb_map(), caller in arb_map()) {
		let delta = config_delta(&system, &caller);

		for (key, caller_value) in &caller {
			let effective = match delta.get(key) {
				Some(v) => ConfigValue::from(v.clone()),
				None => system.get(key).cloned().unwrap_or(ConfigValue::Null),
			};
			prop_assert_eq!(&effective, caller_value);
		}
	}
}
