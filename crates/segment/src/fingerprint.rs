//! Content fingerprinting for segment identity and audit.
//!
//! The fingerprint is a SHA-256 digest over the ordered concatenation of
//! every document's `key || ':' || sha256(body)`, sorted by key. Two
//! segments built from the same documents (in any scan order) always
//! produce the same fingerprint; a single changed byte in any document's
//! body changes it.

use sha2::{Digest, Sha256};

pub fn hash_body(body: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    hasher.finalize().into()
}

/// Accumulates `(key, body_hash)` pairs during a build pass and finalizes
/// them into a single content fingerprint once every document has been seen.
#[derive(Default)]
pub struct FingerprintAccumulator {
    entries: Vec<(String, [u8; 32])>,
}

impl FingerprintAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, body: &str) {
        self.entries.push((key.to_string(), hash_body(body)));
    }

    pub fn finalize(mut self) -> String {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        let mut hasher = Sha256::new();
        for (key, body_hash) in &self.entries {
            hasher.update(key.as_bytes());
            hasher.update(b":");
            hasher.update(body_hash);
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_independent_of_insertion_order() {
        let mut a = FingerprintAccumulator::new();
        a.push("b", "body-b");
        a.push("a", "body-a");

        let mut b = FingerprintAccumulator::new();
        b.push("a", "body-a");
        b.push("b", "body-b");

        assert_eq!(a.finalize(), b.finalize());
    }

    #[test]
    fn fingerprint_changes_when_a_body_changes() {
        let mut a = FingerprintAccumulator::new();
        a.push("a", "body-a");
        let fp_a = a.finalize();

        let mut b = FingerprintAccumulator::new();
        b.push("a", "body-a-edited");
        let fp_b = b.finalize();

        assert_ne!(fp_a, fp_b);
    }
}
