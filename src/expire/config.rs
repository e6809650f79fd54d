//! Data-expiration policy configuration for managed tables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::schema::{FieldDescriptor, FieldType};

/// Table property key enabling data expiration.
pub const EXPIRE_ENABLED: &str = "data-expire.enabled";
/// Table property key naming the schema field used to compute age.
pub const EXPIRE_FIELD: &str = "data-expire.field";
/// Table property key selecting the expiration granularity.
pub const EXPIRE_LEVEL: &str = "data-expire.level";
/// Table property key for the retention window (humantime string, e.g. "90d").
pub const EXPIRE_RETENTION_TIME: &str = "data-expire.retention-time";
/// Table property key for parsing string-typed expiration fields.
pub const EXPIRE_DATETIME_STRING_PATTERN: &str = "data-expire.datetime-string-pattern";
/// Table property key for interpreting numeric-typed expiration fields.
pub const EXPIRE_DATETIME_NUMBER_FORMAT: &str = "data-expire.datetime-number-format";
/// Table property key selecting the reference point age is measured from.
pub const EXPIRE_SINCE: &str = "data-expire.since";

/// Default strftime pattern for string-typed expiration fields.
pub const DEFAULT_DATETIME_STRING_PATTERN: &str = "%Y-%m-%d %H:%M:%S";
/// Default interpretation of numeric expiration fields (epoch milliseconds).
pub const DEFAULT_DATETIME_NUMBER_FORMAT: &str = "TIMESTAMP_MS";

/// Field types usable as an expiration field.
pub const SUPPORTED_FIELD_TYPES: [FieldType; 3] =
    [FieldType::Timestamp, FieldType::String, FieldType::Long];

/// Granularity at which expiration is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpireLevel {
    /// Expire whole partitions once every row in them is past retention.
    #[default]
    Partition,
    /// Expire individual data files.
    File,
}

impl ExpireLevel {
    /// Parse a level token case-insensitively. `None` and unrecognized
    /// tokens are rejected; there is no silent default at this layer.
    pub fn parse(level: Option<&str>) -> Result<Self, ExpireConfigError> {
        let level = level.ok_or(ExpireConfigError::MissingLevel)?;
        match level.to_uppercase().as_str() {
            "PARTITION" => Ok(ExpireLevel::Partition),
            "FILE" => Ok(ExpireLevel::File),
            _ => Err(ExpireConfigError::InvalidLevel(level.to_string())),
        }
    }

    /// Canonical token for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpireLevel::Partition => "PARTITION",
            ExpireLevel::File => "FILE",
        }
    }
}

impl FromStr for ExpireLevel {
    type Err = ExpireConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(Some(s))
    }
}

impl fmt::Display for ExpireLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference point age is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Since {
    /// Measure age relative to the latest committed snapshot's timestamp.
    #[default]
    LatestSnapshot,
    /// Measure age relative to the current wall-clock time.
    CurrentTimestamp,
}

impl Since {
    /// Parse a since token case-insensitively. `None` and unrecognized
    /// tokens are rejected; there is no silent default at this layer.
    pub fn parse(since: Option<&str>) -> Result<Self, ExpireConfigError> {
        let since = since.ok_or(ExpireConfigError::MissingSince)?;
        match since.to_uppercase().as_str() {
            "LATEST_SNAPSHOT" => Ok(Since::LatestSnapshot),
            "CURRENT_TIMESTAMP" => Ok(Since::CurrentTimestamp),
            _ => Err(ExpireConfigError::InvalidSince(since.to_string())),
        }
    }

    /// Canonical token for this reference point.
    pub fn as_str(&self) -> &'static str {
        match self {
            Since::LatestSnapshot => "LATEST_SNAPSHOT",
            Since::CurrentTimestamp => "CURRENT_TIMESTAMP",
        }
    }
}

impl FromStr for Since {
    type Err = ExpireConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(Some(s))
    }
}

impl fmt::Display for Since {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur while parsing expiration configuration.
#[derive(Error, Debug)]
pub enum ExpireConfigError {
    /// No level token supplied.
    #[error("Invalid level type: null")]
    MissingLevel,

    /// Unrecognized level token.
    #[error("Invalid level type: {0}")]
    InvalidLevel(String),

    /// No since token supplied.
    #[error("data-expire.since is invalid: null")]
    MissingSince,

    /// Unrecognized since token.
    #[error("Unable to expire data since: {0}")]
    InvalidSince(String),

    /// A property value failed to parse.
    #[error("Invalid value '{value}' for {key}: {source}")]
    InvalidProperty {
        key: &'static str,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Declarative data-expiration policy for a single table.
///
/// A policy is a plain value object: it carries no schema reference and no
/// live resources, so it can be serialized, compared across config reloads,
/// and shared freely once construction is done. Schema-dependent checks take
/// the resolved [`FieldDescriptor`] as an argument at validation time.
///
/// Setters perform no validation; invalid intermediate states are legal
/// until [`ExpirationPolicy::is_valid`] is consulted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpirationPolicy {
    enabled: bool,
    expiration_field: Option<String>,
    expiration_level: ExpireLevel,
    retention_time: i64,
    date_time_pattern: Option<String>,
    number_date_format: Option<String>,
    since: Since,
}

impl ExpirationPolicy {
    /// All-fields constructor.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        enabled: bool,
        expiration_field: Option<String>,
        expiration_level: ExpireLevel,
        retention_time: i64,
        date_time_pattern: Option<String>,
        number_date_format: Option<String>,
        since: Since,
    ) -> Self {
        Self {
            enabled,
            expiration_field,
            expiration_level,
            retention_time,
            date_time_pattern,
            number_date_format,
            since,
        }
    }

    /// Build a policy from a flat table-property bag.
    ///
    /// Only the `data-expire.*` keys are consumed; all other keys are
    /// ignored for forward compatibility. Absent keys take the loader
    /// defaults (disabled, partition level, latest-snapshot basis, zero
    /// retention). The retention window is a human-readable duration
    /// string such as `"90d"` or `"12h 30m"`, stored as milliseconds.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self, ExpireConfigError> {
        let mut policy = Self::default();

        if let Some(raw) = properties.get(EXPIRE_ENABLED) {
            policy.enabled = raw
                .trim()
                .to_ascii_lowercase()
                .parse::<bool>()
                .map_err(|e| ExpireConfigError::InvalidProperty {
                    key: EXPIRE_ENABLED,
                    value: raw.clone(),
                    source: Box::new(e),
                })?;
        }

        policy.expiration_field = properties.get(EXPIRE_FIELD).cloned();

        if let Some(raw) = properties.get(EXPIRE_LEVEL) {
            policy.expiration_level = ExpireLevel::parse(Some(raw))?;
        }

        if let Some(raw) = properties.get(EXPIRE_RETENTION_TIME) {
            // A bare number is milliseconds; otherwise a humantime string
            // such as "90d".
            policy.retention_time = match raw.trim().parse::<i64>() {
                Ok(millis) => millis,
                Err(_) => {
                    let duration = humantime::parse_duration(raw.trim()).map_err(|e| {
                        ExpireConfigError::InvalidProperty {
                            key: EXPIRE_RETENTION_TIME,
                            value: raw.clone(),
                            source: Box::new(e),
                        }
                    })?;
                    i64::try_from(duration.as_millis()).map_err(|e| {
                        ExpireConfigError::InvalidProperty {
                            key: EXPIRE_RETENTION_TIME,
                            value: raw.clone(),
                            source: Box::new(e),
                        }
                    })?
                }
            };
        }

        policy.date_time_pattern = Some(
            properties
                .get(EXPIRE_DATETIME_STRING_PATTERN)
                .cloned()
                .unwrap_or_else(|| DEFAULT_DATETIME_STRING_PATTERN.to_string()),
        );

        policy.number_date_format = Some(
            properties
                .get(EXPIRE_DATETIME_NUMBER_FORMAT)
                .cloned()
                .unwrap_or_else(|| DEFAULT_DATETIME_NUMBER_FORMAT.to_string()),
        );

        if let Some(raw) = properties.get(EXPIRE_SINCE) {
            policy.since = Since::parse(Some(raw))?;
        }

        Ok(policy)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn expiration_field(&self) -> Option<&str> {
        self.expiration_field.as_deref()
    }

    pub fn with_expiration_field(mut self, expiration_field: Option<String>) -> Self {
        self.expiration_field = expiration_field;
        self
    }

    pub fn expiration_level(&self) -> ExpireLevel {
        self.expiration_level
    }

    pub fn with_expiration_level(mut self, expiration_level: ExpireLevel) -> Self {
        self.expiration_level = expiration_level;
        self
    }

    pub fn retention_time(&self) -> i64 {
        self.retention_time
    }

    pub fn with_retention_time(mut self, retention_time: i64) -> Self {
        self.retention_time = retention_time;
        self
    }

    pub fn date_time_pattern(&self) -> Option<&str> {
        self.date_time_pattern.as_deref()
    }

    pub fn with_date_time_pattern(mut self, date_time_pattern: Option<String>) -> Self {
        self.date_time_pattern = date_time_pattern;
        self
    }

    pub fn number_date_format(&self) -> Option<&str> {
        self.number_date_format.as_deref()
    }

    pub fn with_number_date_format(mut self, number_date_format: Option<String>) -> Self {
        self.number_date_format = number_date_format;
        self
    }

    pub fn since(&self) -> Since {
        self.since
    }

    pub fn with_since(mut self, since: Since) -> Self {
        self.since = since;
        self
    }

    /// Retention window as a [`Duration`], or `None` when the configured
    /// window is not strictly positive.
    pub fn retention(&self) -> Option<Duration> {
        u64::try_from(self.retention_time)
            .ok()
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
    }

    /// Decide whether this policy is well-formed and enabled for a table.
    ///
    /// `field` is the schema descriptor resolved for
    /// [`expiration_field`](Self::expiration_field), or `None` when the
    /// field does not exist in the table's schema. `table_name` is used only
    /// in diagnostics.
    ///
    /// Ineligibility is a soft failure: the field-related rejection paths
    /// log a warning and the method returns `false`, so callers skip
    /// expiration for the table instead of failing the run.
    pub fn is_valid(&self, field: Option<&FieldDescriptor>, table_name: &str) -> bool {
        self.enabled && self.retention_time > 0 && self.validate_expiration_field(field, table_name)
    }

    fn validate_expiration_field(
        &self,
        field: Option<&FieldDescriptor>,
        table_name: &str,
    ) -> bool {
        let field_name = self.expiration_field.as_deref().unwrap_or_default();

        let descriptor = match field {
            Some(descriptor) if !field_name.trim().is_empty() => descriptor,
            _ => {
                warn!(
                    table = %table_name,
                    field = %field_name,
                    "Field used to determine data expiration is illegal for table"
                );
                return false;
            }
        };

        if !SUPPORTED_FIELD_TYPES.contains(&descriptor.field_type) {
            let supported = SUPPORTED_FIELD_TYPES
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            warn!(
                table = %table_name,
                field = %field_name,
                field_type = %descriptor.field_type,
                supported = %supported,
                "Field type is not supported for data expiration"
            );
            return false;
        }

        true
    }
}
