//! The one shallow-merge utility.
//!
//! Precedence, everywhere in the crate: local explicit values >
//! remote/session defaults > hardcoded baseline. Merges are one level deep;
//! arrays and scalars are replaced wholesale, never merged.

use std::collections::BTreeMap;

use serde_json::Value;

/// Overwrite merge: every key of `incoming` wins over `base`, one level deep.
///
/// Used for user imports, where the imported file is authoritative per key.
/// No-op when either side is not a JSON object.
pub fn shallow_overwrite(base: &mut Value, incoming: &Value) {
    let (Some(base), Some(incoming)) = (base.as_object_mut(), incoming.as_object()) else {
        return;
    };
    for (key, value) in incoming {
        base.insert(key.clone(), value.clone());
    }
}

/// Defaults underlay: keys of `defaults` are copied only where `base` has no
/// entry. Existing local values always win.
///
/// Used for the updates-manifest overlay. No-op when either side is not a
/// JSON object.
pub fn shallow_underlay(base: &mut Value, defaults: &Value) {
    let (Some(base), Some(defaults)) = (base.as_object_mut(), defaults.as_object()) else {
        return;
    };
    for (key, value) in defaults {
        base.entry(key.clone()).or_insert_with(|| value.clone());
    }
}

/// Typed underlay for language-pack mappings: remote entries fill holes,
/// locally-defined entries win on key collision.
pub fn underlay_map(local: &mut BTreeMap<String, Value>, remote: &serde_json::Map<String, Value>) {
    for (key, value) in remote {
        local.entry(key.clone()).or_insert_with(|| value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overwrite_wins_per_key_one_level_deep() {
        let mut base = json!({"accent": "#111111", "radius": 10, "nested": {"a": 1, "b": 2}});
        let incoming = json!({"radius": 20, "nested": {"a": 9}});
        shallow_overwrite(&mut base, &incoming);
        assert_eq!(base["accent"], "#111111");
        assert_eq!(base["radius"], 20);
        // one level only: nested object replaced wholesale
        assert_eq!(base["nested"], json!({"a": 9}));
    }

    #[test]
    fn underlay_never_touches_existing_keys() {
        let mut base = json!({"accent": "#111111"});
        let defaults = json!({"accent": "#ff0000", "radius": 20});
        shallow_underlay(&mut base, &defaults);
        assert_eq!(base["accent"], "#111111");
        assert_eq!(base["radius"], 20);
    }

    #[test]
    fn non_objects_are_ignored() {
        let mut base = json!([1, 2, 3]);
        shallow_overwrite(&mut base, &json!({"a": 1}));
        assert_eq!(base, json!([1, 2, 3]));

        let mut base = json!({"a": 1});
        shallow_underlay(&mut base, &json!("nope"));
        assert_eq!(base, json!({"a": 1}));
    }

    #[test]
    fn underlay_map_keeps_local_entries() {
        let mut local = BTreeMap::new();
        local.insert("glass".to_string(), json!("local"));
        let mut remote = serde_json::Map::new();
        remote.insert("glass".to_string(), json!("remote"));
        remote.insert("neon".to_string(), json!("remote"));
        underlay_map(&mut local, &remote);
        assert_eq!(local["glass"], json!("local"));
        assert_eq!(local["neon"], json!("remote"));
    }
}
