use serde::{Deserialize, Serialize};
use serde_json::Value;

// NOTE: Why an opaque record (not a typed schema)?
//
// - Session logs are written by a tool whose schema evolves without notice
// - A typed decode would reject records that merely lack an optional field
// - Classification must be total: unknown shapes become invisible, never errors
// - Trade-off: field access is by path, so every accessor returns Option

/// One decoded log record.
///
/// Any JSON value is a valid `Event`; whether it means anything is decided by
/// the classifier, not at construction time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(Value);

impl Event {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Underlying decoded record
    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn into_raw(self) -> Value {
        self.0
    }

    /// Top-level kind tag (`type` field)
    pub fn tag(&self) -> Option<&str> {
        self.str_at("/type")
    }

    /// Look up a nested value by JSON pointer (e.g. `/message/content`)
    pub fn at(&self, pointer: &str) -> Option<&Value> {
        self.0.pointer(pointer).filter(|v| !v.is_null())
    }

    pub fn str_at(&self, pointer: &str) -> Option<&str> {
        self.at(pointer).and_then(Value::as_str)
    }

    pub fn u64_at(&self, pointer: &str) -> Option<u64> {
        self.at(pointer).and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        })
    }

    /// Boolean flag; absent or non-boolean values read as `false`
    pub fn flag(&self, pointer: &str) -> bool {
        self.at(pointer).and_then(Value::as_bool).unwrap_or(false)
    }
}

impl From<Value> for Event {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors_default_on_missing_fields() {
        let event = Event::new(json!({"type": "user", "isMeta": "yes"}));

        assert_eq!(event.tag(), Some("user"));
        assert_eq!(event.str_at("/message/content"), None);
        assert!(!event.flag("/isMeta"));
        assert!(!event.flag("/isSidechain"));
        assert_eq!(event.u64_at("/durationMs"), None);
    }

    #[test]
    fn test_null_reads_as_absent() {
        let event = Event::new(json!({"type": null, "durationMs": 1500.0}));

        assert_eq!(event.tag(), None);
        assert!(event.at("/type").is_none());
        assert_eq!(event.u64_at("/durationMs"), Some(1500));
    }

    #[test]
    fn test_non_object_is_still_an_event() {
        let event = Event::from(json!([1, 2, 3]));
        assert_eq!(event.tag(), None);
        assert_eq!(event.raw(), &json!([1, 2, 3]));
    }
}
