//! Field access helpers shared by every reader of Open Library documents.
//!
//! The typed readers, [`get_or_default`] and [`require`], treat an explicit `null` like an
//! absent key. The verbatim readers, [`require_value`] and [`value_or_empty_list`], only look
//! at key presence and hand back whatever value is stored, `null` included.

use crate::domain::model::Record;
use crate::utils::error::{EtlError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn lookup<'a>(record: &'a Record, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|value| !value.is_null())
}

fn decode<T: DeserializeOwned>(value: &Value, key: &str, context: &str) -> Result<T> {
    T::deserialize(value).map_err(|e| EtlError::InvalidField {
        field: key.to_string(),
        context: context.to_string(),
        message: e.to_string(),
    })
}

/// Reads `key` from `record`, falling back to `T::default()` when it is absent.
pub fn get_or_default<T>(record: &Record, key: &str, context: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match lookup(record, key) {
        Some(value) => decode(value, key, context),
        None => Ok(T::default()),
    }
}

/// Reads `key` from `record`, failing when it is absent.
pub fn require<T: DeserializeOwned>(record: &Record, key: &str, context: &str) -> Result<T> {
    let value = lookup(record, key).ok_or_else(|| EtlError::MissingField {
        field: key.to_string(),
        context: context.to_string(),
    })?;
    decode(value, key, context)
}

/// Copies `key` verbatim, failing only when the key is absent.
pub fn require_value(record: &Record, key: &str, context: &str) -> Result<Value> {
    record
        .get(key)
        .cloned()
        .ok_or_else(|| EtlError::MissingField {
            field: key.to_string(),
            context: context.to_string(),
        })
}

/// Copies `key` verbatim, or an empty JSON array when the key is absent.
pub fn value_or_empty_list(record: &Record, key: &str) -> Value {
    record
        .get(key)
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()))
}
