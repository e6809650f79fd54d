//! Data-expiration policy for managed tables.
//!
//! This module provides the configuration and validation logic for
//! age-based expiration of table data. A policy names a schema field that
//! carries each row's age, a retention window, the granularity expiration
//! is evaluated at (partition or file), and the reference point age is
//! measured from (latest snapshot or current wall clock).
//!
//! Validation is deliberately soft-failing: a policy that references a
//! missing or unsupported field logs a warning and reports itself invalid,
//! so the owning service skips expiration for that table rather than
//! failing the run.
//!
//! ## Usage
//!
//! ```
//! use table_expire::expire::ExpirationPolicy;
//! use table_expire::schema::{FieldDescriptor, FieldType};
//!
//! let policy = ExpirationPolicy::default()
//!     .with_enabled(true)
//!     .with_expiration_field(Some("event_ts".to_string()))
//!     .with_retention_time(86_400_000);
//!
//! let field = FieldDescriptor::new("event_ts", FieldType::Timestamp);
//! assert!(policy.is_valid(Some(&field), "db.events"));
//! ```

pub mod config;

// Re-export commonly used types
pub use config::{ExpirationPolicy, ExpireConfigError, ExpireLevel, Since};
