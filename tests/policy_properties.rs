//! End-to-end flow: property bag -> policy -> resolver-backed validation.

use std::collections::HashMap;

use table_expire::schema::{FieldDescriptor, FieldType, SchemaResolver};
use table_expire::{ExpirationPolicy, ExpireLevel, Since};

/// In-memory schema catalog backing the validation flow.
struct FixtureSchema {
    fields: HashMap<&'static str, FieldType>,
}

impl FixtureSchema {
    fn events() -> Self {
        Self {
            fields: HashMap::from([
                ("event_ts", FieldType::Timestamp),
                ("ingested_at", FieldType::Long),
                ("day", FieldType::String),
                ("is_deleted", FieldType::Boolean),
            ]),
        }
    }
}

impl SchemaResolver for FixtureSchema {
    fn resolve_field(&self, _table_name: &str, field_name: &str) -> Option<FieldDescriptor> {
        self.fields
            .get(field_name)
            .map(|field_type| FieldDescriptor::new(field_name, *field_type))
    }
}

fn expire_properties(field: &str) -> HashMap<String, String> {
    HashMap::from([
        ("data-expire.enabled".to_string(), "true".to_string()),
        ("data-expire.field".to_string(), field.to_string()),
        ("data-expire.level".to_string(), "partition".to_string()),
        ("data-expire.retention-time".to_string(), "7d".to_string()),
        (
            "data-expire.since".to_string(),
            "latest_snapshot".to_string(),
        ),
        // Unrelated table properties ride along in the same bag.
        ("write.format.default".to_string(), "parquet".to_string()),
    ])
}

fn validate(policy: &ExpirationPolicy, schema: &impl SchemaResolver, table: &str) -> bool {
    let field = policy
        .expiration_field()
        .and_then(|name| schema.resolve_field(table, name));
    policy.is_valid(field.as_ref(), table)
}

#[test]
fn test_valid_policy_flows_through_resolver() {
    let schema = FixtureSchema::events();
    let policy = ExpirationPolicy::from_properties(&expire_properties("event_ts")).unwrap();

    assert_eq!(policy.expiration_level(), ExpireLevel::Partition);
    assert_eq!(policy.since(), Since::LatestSnapshot);
    assert_eq!(policy.retention_time(), 7 * 24 * 3600 * 1000);
    assert!(validate(&policy, &schema, "db.events"));
}

#[test]
fn test_all_supported_field_types_validate() {
    let schema = FixtureSchema::events();
    for field in ["event_ts", "ingested_at", "day"] {
        let policy = ExpirationPolicy::from_properties(&expire_properties(field)).unwrap();
        assert!(
            validate(&policy, &schema, "db.events"),
            "field {field} should be eligible"
        );
    }
}

#[test]
fn test_unresolvable_field_is_skipped_not_fatal() {
    let schema = FixtureSchema::events();
    let policy = ExpirationPolicy::from_properties(&expire_properties("no_such_field")).unwrap();
    assert!(!validate(&policy, &schema, "db.events"));
}

#[test]
fn test_unsupported_field_type_is_skipped_not_fatal() {
    let schema = FixtureSchema::events();
    let policy = ExpirationPolicy::from_properties(&expire_properties("is_deleted")).unwrap();
    assert!(!validate(&policy, &schema, "db.events"));
}

#[test]
fn test_policy_unchanged_detection_across_reload() {
    let first = ExpirationPolicy::from_properties(&expire_properties("event_ts")).unwrap();
    let second = ExpirationPolicy::from_properties(&expire_properties("event_ts")).unwrap();
    assert_eq!(first, second);

    let mut changed = expire_properties("event_ts");
    changed.insert("data-expire.retention-time".to_string(), "30d".to_string());
    let third = ExpirationPolicy::from_properties(&changed).unwrap();
    assert_ne!(first, third);
}
