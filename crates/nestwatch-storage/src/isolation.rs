//! The isolation key is the sole cross-tenant partitioning mechanism: every
//! persisted artifact is addressed as `nest:<nestId>:<dataType>:<key>`.

use crate::error::StorageError;

const MAX_NEST_ID_LEN: usize = 64;

/// Validates a nest id: lowercase alphanumeric plus `-`/`_`, `<= 64` chars.
pub fn validate_nest_id(nest_id: &str) -> Result<(), StorageError> {
    if nest_id.is_empty() || nest_id.len() > MAX_NEST_ID_LEN {
        return Err(StorageError::InvalidNestId(nest_id.to_string()));
    }
    let valid = nest_id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(StorageError::InvalidNestId(nest_id.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IsolationKey {
    pub nest_id: String,
    pub data_type: String,
    pub key: String,
}

impl IsolationKey {
    pub fn new(nest_id: impl Into<String>, data_type: impl Into<String>, key: Option<&str>) -> Result<Self, StorageError> {
        let nest_id = nest_id.into();
        validate_nest_id(&nest_id)?;
        let data_type = data_type.into();
        if data_type.is_empty() {
            return Err(StorageError::InvalidDataType(data_type));
        }
        Ok(Self {
            nest_id,
            data_type,
            key: key.unwrap_or("default").to_string(),
        })
    }

    /// `nest:<nestId>:<dataType>:<key>`.
    pub fn as_string(&self) -> String {
        format!("nest:{}:{}:{}", self.nest_id, self.data_type, self.key)
    }

    /// Prefix matching every key under `(nest_id, data_type)`, used by
    /// `getByType`.
    pub fn type_prefix(nest_id: &str, data_type: &str) -> String {
        format!("nest:{}:{}:", nest_id, data_type)
    }

    /// Parses a persisted key back out, rejecting malformed input.
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let mut parts = raw.splitn(4, ':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("nest"), Some(nest_id), Some(data_type), Some(key)) => {
                Self::new(nest_id, data_type, Some(key))
            }
            _ => Err(StorageError::MalformedKey(raw.to_string())),
        }
    }

    /// Rejects a key whose embedded nest id doesn't match the caller's.
    pub fn assert_owned_by(&self, nest_id: &str) -> Result<(), StorageError> {
        if self.nest_id != nest_id {
            return Err(StorageError::CrossTenantAccess {
                expected: nest_id.to_string(),
                found: self.nest_id.clone(),
            });
        }
        Ok(())
    }
}
