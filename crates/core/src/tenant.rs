//! Tenant partition identifiers.
//!
//! Every tenant's data lives in its own PostgreSQL schema. A
//! [`TenantPartition`] wraps a validated schema name so the repository
//! layer can interpolate it into schema-qualified queries, and so no code
//! path can address tenant data without naming the partition explicitly.

use serde::Serialize;

use crate::error::CoreError;

/// Schema holding shared infrastructure (tenant registry, ping-job queue).
/// It is never a tenant partition and is excluded from the directory.
pub const CONTROL_SCHEMA: &str = "public";

/// PostgreSQL identifier length limit.
const MAX_SCHEMA_LEN: usize = 63;

/// A validated reference to one tenant's isolated data partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TenantPartition(String);

impl TenantPartition {
    /// Validate and wrap a schema name.
    ///
    /// Rules:
    /// - Must not be empty and must not exceed 63 characters.
    /// - Must start with a lowercase letter or underscore; remaining
    ///   characters may be lowercase alphanumeric or underscore.
    /// - Must not be the control schema or a `pg_`-reserved name.
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();

        if name.is_empty() {
            return Err(CoreError::Validation(
                "Partition name must not be empty".to_string(),
            ));
        }
        if name.len() > MAX_SCHEMA_LEN {
            return Err(CoreError::Validation(format!(
                "Partition name must not exceed {MAX_SCHEMA_LEN} characters"
            )));
        }

        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_lowercase() || first == '_' => {}
            _ => {
                return Err(CoreError::Validation(format!(
                    "Partition name \"{name}\" must start with a lowercase letter or underscore"
                )));
            }
        }
        if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(CoreError::Validation(format!(
                "Partition name \"{name}\" may only contain lowercase alphanumeric or underscore characters"
            )));
        }

        if name == CONTROL_SCHEMA {
            return Err(CoreError::Validation(format!(
                "\"{CONTROL_SCHEMA}\" is the control schema, not a tenant partition"
            )));
        }
        if name.starts_with("pg_") {
            return Err(CoreError::Validation(format!(
                "Partition name \"{name}\" collides with a reserved PostgreSQL prefix"
            )));
        }

        Ok(Self(name))
    }

    /// The underlying schema name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantPartition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
