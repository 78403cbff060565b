//! Ordered key/value annotation stores for credentials and keys.

use serde::{Deserialize, Serialize};

use crate::{IdentityError, IdentityResult};

/// A value stored in an [`ApplicationData`] entry.
///
/// A closed tagged-variant set with explicit kind-checked accessors on the
/// containing store; no schema is enforced beyond caller convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataValue {
    /// A boolean flag.
    Boolean(bool),
    /// A signed 64-bit number.
    Number(i64),
    /// A UTF-8 string.
    String(String),
    /// An opaque byte sequence.
    Bytes(Vec<u8>),
}

impl DataValue {
    /// Returns the kind name used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
        }
    }
}

/// An ordered key/value annotation store attached to a credential or to an
/// individual key record.
///
/// Keys are arbitrary caller-chosen strings; insertion order is preserved and
/// re-setting an existing key keeps its position. The credential core itself
/// only ever uses it as a passive tag (e.g. the rotation domain marker).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationData {
    entries: Vec<(String, DataValue)>,
}

impl ApplicationData {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Stores `value` under `key`, replacing any existing value in place.
    pub fn set(&mut self, key: &str, value: DataValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
    }

    /// Stores a boolean under `key`.
    pub fn set_boolean(&mut self, key: &str, value: bool) {
        self.set(key, DataValue::Boolean(value));
    }

    /// Stores a number under `key`.
    pub fn set_number(&mut self, key: &str, value: i64) {
        self.set(key, DataValue::Number(value));
    }

    /// Stores a string under `key`.
    pub fn set_string(&mut self, key: &str, value: &str) {
        self.set(key, DataValue::String(value.to_string()));
    }

    /// Stores a byte sequence under `key`.
    pub fn set_data(&mut self, key: &str, value: &[u8]) {
        self.set(key, DataValue::Bytes(value.to_vec()));
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    fn get_required(&self, key: &str) -> IdentityResult<&DataValue> {
        self.get(key).ok_or_else(|| IdentityError::DataNotFound {
            key: key.to_string(),
        })
    }

    /// Returns the boolean stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::DataNotFound`] if `key` is absent, or
    /// [`IdentityError::TypeMismatch`] if a different kind is stored.
    pub fn get_boolean(&self, key: &str) -> IdentityResult<bool> {
        match self.get_required(key)? {
            DataValue::Boolean(v) => Ok(*v),
            other => Err(mismatch(key, "boolean", other)),
        }
    }

    /// Returns the number stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::DataNotFound`] if `key` is absent, or
    /// [`IdentityError::TypeMismatch`] if a different kind is stored.
    pub fn get_number(&self, key: &str) -> IdentityResult<i64> {
        match self.get_required(key)? {
            DataValue::Number(v) => Ok(*v),
            other => Err(mismatch(key, "number", other)),
        }
    }

    /// Returns the string stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::DataNotFound`] if `key` is absent, or
    /// [`IdentityError::TypeMismatch`] if a different kind is stored.
    pub fn get_string(&self, key: &str) -> IdentityResult<&str> {
        match self.get_required(key)? {
            DataValue::String(v) => Ok(v),
            other => Err(mismatch(key, "string", other)),
        }
    }

    /// Returns the byte sequence stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::DataNotFound`] if `key` is absent, or
    /// [`IdentityError::TypeMismatch`] if a different kind is stored.
    pub fn get_data(&self, key: &str) -> IdentityResult<&[u8]> {
        match self.get_required(key)? {
            DataValue::Bytes(v) => Ok(v),
            other => Err(mismatch(key, "bytes", other)),
        }
    }

    /// Returns the boolean stored under `key`, or `default` if `key` is
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::TypeMismatch`] if a different kind is stored.
    pub fn get_boolean_or(&self, key: &str, default: bool) -> IdentityResult<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(DataValue::Boolean(v)) => Ok(*v),
            Some(other) => Err(mismatch(key, "boolean", other)),
        }
    }

    /// Removes the value stored under `key`, returning whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != key);
        self.entries.len() != before
    }

    /// Returns whether a value is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn mismatch(key: &str, expected: &'static str, found: &DataValue) -> IdentityError {
    IdentityError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_round_trip() {
        let mut data = ApplicationData::new();
        data.set_boolean("flag", true);
        data.set_number("count", -7);
        data.set_string("domain", "mso");
        data.set_data("blob", &[1, 2, 3]);

        assert!(data.get_boolean("flag").unwrap());
        assert_eq!(data.get_number("count").unwrap(), -7);
        assert_eq!(data.get_string("domain").unwrap(), "mso");
        assert_eq!(data.get_data("blob").unwrap(), &[1, 2, 3]);
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_missing_and_mismatched() {
        let mut data = ApplicationData::new();
        data.set_data("blob", &[0xBE, 0xEF]);

        assert!(matches!(
            data.get_boolean("absent"),
            Err(IdentityError::DataNotFound { .. })
        ));
        assert!(matches!(
            data.get_boolean("blob"),
            Err(IdentityError::TypeMismatch {
                expected: "boolean",
                found: "bytes",
                ..
            })
        ));
        assert!(data.get_boolean_or("absent", true).unwrap());
        assert!(data.get_boolean_or("blob", true).is_err());
    }

    #[test]
    fn test_order_preserved_on_overwrite() {
        let mut data = ApplicationData::new();
        data.set_number("a", 1);
        data.set_number("b", 2);
        data.set_number("c", 3);
        data.set_number("a", 10);

        let keys: Vec<&str> = data.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(data.get_number("a").unwrap(), 10);
    }

    #[test]
    fn test_delete() {
        let mut data = ApplicationData::new();
        data.set_boolean("flag", false);
        assert!(data.contains_key("flag"));
        assert!(data.delete("flag"));
        assert!(!data.delete("flag"));
        assert!(data.is_empty());
    }
}
