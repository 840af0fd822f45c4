//! Golden vectors for revocation index keys.
//!
//! The revocable keeper indexes each extent element by its canonical CBOR
//! bytes. A change in those bytes would orphan index entries written under
//! the old form, so the expected encodings are pinned here.

use serde_json::json;

use rights_kernel_configs::{Pixel, SeatDescriptor};
use rights_kernel_keeper::{ElementKey, KeeperError};

/// A golden element-key vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Produces the key under test.
    pub encode: fn() -> Result<ElementKey, KeeperError>,
    /// Expected key bytes (hex).
    pub expected_hex: &'static str,
}

/// Get all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "small unsigned integer",
            encode: || ElementKey::encode(&7u64),
            expected_hex: "07",
        },
        GoldenVector {
            name: "text item",
            encode: || ElementKey::encode(&"hello"),
            expected_hex: "6568656c6c6f",
        },
        GoldenVector {
            name: "tuple item",
            encode: || ElementKey::encode(&(1u32, 4u32)),
            expected_hex: "820104",
        },
        GoldenVector {
            name: "pixel",
            encode: || ElementKey::encode(&Pixel::new(1, 4)),
            expected_hex: "a2617801617904",
        },
        GoldenVector {
            name: "seat without terms",
            encode: || ElementKey::encode(&SeatDescriptor::new(1, "buyer")),
            expected_hex: "a367736561745f69640164726f6c65656275796572657465726d73a0",
        },
        GoldenVector {
            name: "invitation record",
            encode: || ElementKey::encode(&json!({"instance": 9})),
            expected_hex: "a168696e7374616e636509",
        },
    ]
}

/// Encode every vector: `(name, matches, actual hex)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let actual = match (v.encode)() {
                Ok(key) => hex::encode(key.as_bytes()),
                Err(err) => format!("error: {err}"),
            };
            (v.name.to_string(), actual == v.expected_hex, actual)
        })
        .collect()
}
