//! Invitations: records that must be comparable plain data.
//!
//! Invitations are issued by a contract host and redeemed by unwrapping.
//! The record itself is arbitrary JSON as long as it is a comparable
//! record: an object built only from plain data.

use std::cmp::Ordering;

use serde_json::Value;

use rights_kernel_core::ItemPolicy;

use crate::use_rights::{UseObjectMaker, UseRightsConfig};

const MAX_DEPTH: usize = 32;

/// Is `value` a record that can be compared by content?
pub fn is_comparable(value: &Value) -> bool {
    value.is_object() && is_plain(value, 0)
}

fn is_plain(value: &Value, depth: usize) -> bool {
    if depth > MAX_DEPTH {
        return false;
    }
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => true,
        Value::Number(n) => n.as_f64().map_or(false, f64::is_finite),
        Value::Array(items) => items.iter().all(|v| is_plain(v, depth + 1)),
        Value::Object(map) => map.values().all(|v| is_plain(v, depth + 1)),
    }
}

/// Key-sorted JSON text, independent of map ordering.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Accepts comparable records; orders them by canonical text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparablePolicy;

impl ItemPolicy<Value> for ComparablePolicy {
    fn insist_item(&self, item: &Value) -> Result<(), String> {
        if !is_comparable(item) {
            return Err("invitation must be a comparable record".to_string());
        }
        Ok(())
    }

    fn compare(&self, left: &Value, right: &Value) -> Ordering {
        canonical_json(left).cmp(&canonical_json(right))
    }
}

pub type InviteConfig<M> = UseRightsConfig<Value, ComparablePolicy, M>;

pub fn invite_config<M: UseObjectMaker<Value>>(maker: M) -> InviteConfig<M> {
    UseRightsConfig::new(ComparablePolicy, maker)
}
