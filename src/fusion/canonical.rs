//! Canonical document keys.
//!
//! A document is first lowered to a `serde_json::Value` and then written as
//! compact JSON with object keys sorted bytewise at every depth. The result
//! is only ever used for equality and hashing; callers keep the original
//! value for output.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::error::Result;
use super::finite::ensure_finite_floats;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase hex SHA-256 of the key bytes.
    pub fn sha256_hex(&self) -> String {
        format!("{:x}", Sha256::digest(self.0.as_bytes()))
    }
}

/// Derive the canonical key of `document`.
///
/// Integers and floats keep their own spellings, so `1` and `1.0` are
/// different documents. NaN and infinite floats have no key.
pub fn canonical_key<T: Serialize + ?Sized>(document: &T) -> Result<CanonicalKey> {
    ensure_finite_floats(document)?;
    let value = serde_json::to_value(document)?;
    let mut out = String::new();
    write_canonical(&value, &mut out)?;
    Ok(CanonicalKey(out))
}

fn write_canonical(value: &Value, out: &mut String) -> Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::Number(number) => out.push_str(&number.to_string()),
        Value::String(text) => out.push_str(&serde_json::to_string(text)?),
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries = map.iter().collect::<Vec<(&String, &Value)>>();
            entries.sort_by(|left, right| left.0.cmp(right.0));

            out.push('{');
            for (index, (key, item)) in entries.into_iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key)?);
                out.push(':');
                write_canonical(item, out)?;
            }
            out.push('}');
        }
    }

    Ok(())
}
