use sha2::{Digest, Sha256};

/// Hex SHA-256 of a JSON value, independent of object key order.
///
/// Values are fed tag- and length-prefixed, objects with sorted keys, so structurally
/// equal documents always hash alike and distinct ones cannot collide by concatenation.
pub fn content_hash(value: &serde_json::Value) -> String {
    let mut hasher = Sha256::new();
    write_json_value(&mut hasher, value);
    to_hex(&hasher.finalize())
}

fn write_json_value(h: &mut Sha256, v: &serde_json::Value) {
    match v {
        serde_json::Value::Null => h.update([0u8]),
        serde_json::Value::Bool(x) => {
            h.update([1u8]);
            h.update([u8::from(*x)]);
        }
        serde_json::Value::Number(n) => {
            h.update([2u8]);
            write_str(h, &n.to_string());
        }
        serde_json::Value::String(s) => {
            h.update([3u8]);
            write_str(h, s);
        }
        serde_json::Value::Array(items) => {
            h.update([4u8]);
            h.update((items.len() as u64).to_le_bytes());
            for item in items {
                write_json_value(h, item);
            }
        }
        serde_json::Value::Object(map) => {
            h.update([5u8]);
            let mut keys = map.keys().collect::<Vec<_>>();
            keys.sort();
            h.update((keys.len() as u64).to_le_bytes());
            for k in keys {
                write_str(h, k);
                write_json_value(h, &map[k]);
            }
        }
    }
}

fn write_str(h: &mut Sha256, s: &str) {
    h.update((s.len() as u64).to_le_bytes());
    h.update(s.as_bytes());
}

/// Lowercase hex SHA-256 of raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    to_hex(&Sha256::digest(bytes))
}

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_matter() {
        let a: serde_json::Value = serde_json::from_str(r#"{"a": 1, "b": [true, null]}"#).unwrap();
        let b: serde_json::Value = serde_json::from_str(r#"{"b": [true, null], "a": 1}"#).unwrap();
        assert_eq!(content_hash(&a), content_hash(&b));
        assert_eq!(content_hash(&a).len(), 64);
    }

    #[test]
    fn raw_digest_is_lowercase_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn structure_changes_the_hash() {
        assert_ne!(content_hash(&json!(["ab", "c"])), content_hash(&json!(["a", "bc"])));
        assert_ne!(content_hash(&json!({"x": 1})), content_hash(&json!({"x": 2})));
        assert_ne!(content_hash(&json!("1")), content_hash(&json!(1)));
    }
}
