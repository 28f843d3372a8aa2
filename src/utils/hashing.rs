use sha2::{Digest, Sha256};

/// Computes the SHA-256 integrity hash of a JSON value.
///
/// The value is serialized to canonical JSON first (sorted keys, no
/// whitespace) so that logically equal content hashes identically.
pub fn compute_content_hash(data: &serde_json::Value) -> String {
    let canonical = to_canonical_json(data);
    let digest = Sha256::digest(canonical.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn to_canonical_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|k| {
                    format!(
                        "{}:{}",
                        serde_json::to_string(k).expect("string serializes"),
                        to_canonical_json(&map[k])
                    )
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        serde_json::Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(to_canonical_json).collect();
            format!("[{}]", rendered.join(","))
        }
        other => serde_json::to_string(other).expect("scalar serializes"),
    }
}
