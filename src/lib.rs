//! Data-expiration policy parsing and validation for managed tables.
//!
//! The crate covers two things:
//! - parsing an [`expire::ExpirationPolicy`] from a flat table-property bag
//!   (`data-expire.*` keys), and
//! - deciding whether a parsed policy is well-formed and enabled for a
//!   given table schema.
//!
//! Scanning, planning, and deleting expired data are external collaborators
//! and out of scope; so are scheduling and configuration persistence. The
//! only schema dependency is the [`schema::SchemaResolver`] lookup seam.

pub mod expire;
pub mod schema;

// Re-export commonly used types
pub use expire::{ExpirationPolicy, ExpireConfigError, ExpireLevel, Since};
pub use schema::{FieldDescriptor, FieldType, SchemaResolver};
