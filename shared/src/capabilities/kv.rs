use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::AppState;

pub const MAX_KEY_LENGTH: usize = 512;
pub const MAX_VALUE_SIZE: usize = 1024 * 1024;

/// Validated key of the single persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> Result<Self, StoreError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(key: &str) -> Result<(), StoreError> {
        let invalid = |reason: &str| {
            Err(StoreError::InvalidKey {
                key: key.chars().take(50).collect(),
                reason: reason.to_string(),
            })
        };

        if key.trim().is_empty() {
            return invalid("key cannot be empty");
        }
        if key.len() > MAX_KEY_LENGTH {
            return invalid(&format!("key exceeds maximum length of {MAX_KEY_LENGTH} bytes"));
        }
        if key.contains("..") {
            return invalid("key cannot contain path traversal sequences");
        }
        if key.starts_with('/') || key.starts_with('\\') {
            return invalid("key cannot start with path separator");
        }
        if key.chars().any(char::is_control) {
            return invalid("key contains control characters");
        }
        Ok(())
    }
}

impl Default for StorageKey {
    fn default() -> Self {
        Self(crate::STORAGE_KEY.to_string())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("value too large: {size} bytes exceeds maximum of {max} bytes")]
    ValueTooLarge { size: usize, max: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub fn encode_state(state: &AppState) -> Result<Vec<u8>, StoreError> {
    let data = serde_json::to_vec(state).map_err(|e| StoreError::Serialization(e.to_string()))?;
    if data.len() > MAX_VALUE_SIZE {
        return Err(StoreError::ValueTooLarge {
            size: data.len(),
            max: MAX_VALUE_SIZE,
        });
    }
    Ok(data)
}

pub fn decode_state(data: &[u8]) -> Result<AppState, StoreError> {
    if data.len() > MAX_VALUE_SIZE {
        return Err(StoreError::ValueTooLarge {
            size: data.len(),
            max: MAX_VALUE_SIZE,
        });
    }
    serde_json::from_slice(data).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FriendRegistry;

    #[test]
    fn test_key_validation_empty() {
        assert!(matches!(StorageKey::new(""), Err(StoreError::InvalidKey { .. })));
        assert!(StorageKey::new("   ").is_err());
    }

    #[test]
    fn test_key_validation_path_traversal() {
        assert!(StorageKey::new("../etc/passwd").is_err());
        assert!(StorageKey::new("/abs").is_err());
    }

    #[test]
    fn test_key_validation_control_chars() {
        assert!(StorageKey::new("key\0value").is_err());
        assert!(StorageKey::new("key\x01value").is_err());
    }

    #[test]
    fn test_key_validation_too_long() {
        assert!(StorageKey::new("a".repeat(MAX_KEY_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_default_key() {
        assert_eq!(StorageKey::default().as_str(), "global_friends_clock_v2");
        assert!(StorageKey::new(crate::STORAGE_KEY).is_ok());
    }

    #[test]
    fn test_state_document_shape() {
        let bytes = encode_state(FriendRegistry::new(8).state()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            r#"{"friends":[{"id":"1","name":"Taiwan","cityName":"Taiwan","timezone":"Asia/Taipei"}],"selectedId":"1","showWorkMode":false}"#
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_state(b"[1,2"), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let big = vec![b' '; MAX_VALUE_SIZE + 1];
        assert!(matches!(decode_state(&big), Err(StoreError::ValueTooLarge { .. })));
    }
}
