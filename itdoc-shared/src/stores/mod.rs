/// Validated, store-backed operations
///
/// The models layer is plain SQL. The stores sit on top of it and own the
/// business rules: input validation, hashing, conflict detection and the
/// mapping of low-level database failures onto tagged error enums.
///
/// Each store holds an explicit `SqlitePool` handle; there is no global
/// connection.

pub mod credentials;
pub mod organizations;

pub use credentials::{CredentialError, CredentialStore, NewUser};
pub use organizations::{MembershipError, NewOrganization, OrganizationError, OrganizationStore};

/// True if `err` is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

/// True if `err` is a FOREIGN KEY constraint violation
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_foreign_key_violation())
        .unwrap_or(false)
}
