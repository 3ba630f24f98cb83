use indexmap::IndexMap;
use serde::Serialize;

/// A synthesized example payload. Serializes as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExampleValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Object(IndexMap<String, ExampleValue>),
    /// Holds at most one representative item.
    Array(Vec<ExampleValue>),
    Null,
}

impl ExampleValue {
    pub fn empty_object() -> Self {
        ExampleValue::Object(IndexMap::new())
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, ExampleValue>> {
        match self {
            ExampleValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ExampleValue]> {
        match self {
            ExampleValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExampleValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Pretty-printed JSON text of this value.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&str> for ExampleValue {
    fn from(value: &str) -> Self {
        ExampleValue::String(value.to_string())
    }
}

impl From<String> for ExampleValue {
    fn from(value: String) -> Self {
        ExampleValue::String(value)
    }
}

impl From<i64> for ExampleValue {
    fn from(value: i64) -> Self {
        ExampleValue::Integer(value)
    }
}

impl From<bool> for ExampleValue {
    fn from(value: bool) -> Self {
        ExampleValue::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_json_in_declared_order() {
        let mut fields = IndexMap::new();
        fields.insert("zeta".to_string(), ExampleValue::from(""));
        fields.insert("alpha".to_string(), ExampleValue::from(3i64));
        fields.insert(
            "tags".to_string(),
            ExampleValue::Array(vec![ExampleValue::from(true)]),
        );
        fields.insert("missing".to_string(), ExampleValue::Null);
        let json = serde_json::to_string(&ExampleValue::Object(fields)).unwrap();
        assert_eq!(
            json,
            r#"{"zeta":"","alpha":3,"tags":[true],"missing":null}"#
        );
    }
}
