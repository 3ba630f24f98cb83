use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// Registry key of a `$ref`: its final `/`-separated segment.
///
/// `#/definitions/Pet` and `#/components/schemas/Pet` both yield `Pet`.
pub fn reference_name(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or(ref_path)
}

/// Response code keys arrive as strings in JSON but as integers in
/// unquoted YAML (`200:`).
#[derive(Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
enum StatusKey {
    Text(String),
    Code(u64),
}

/// Deserialize a response map whose keys may be YAML integers.
pub(crate) fn status_keyed<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let raw: IndexMap<StatusKey, V> = IndexMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let key = match key {
                StatusKey::Text(text) => text,
                StatusKey::Code(code) => code.to_string(),
            };
            (key, value)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_name() {
        assert_eq!(reference_name("#/definitions/Pet"), "Pet");
        assert_eq!(reference_name("#/components/schemas/Order"), "Order");
        assert_eq!(reference_name("Plain"), "Plain");
        assert_eq!(reference_name("#/components/schemas/"), "");
    }

    #[derive(Deserialize)]
    struct Responses {
        #[serde(deserialize_with = "status_keyed")]
        codes: IndexMap<String, String>,
    }

    #[test]
    fn test_status_keys_accept_integers_and_strings() {
        let yaml = "codes:\n  200: ok\n  '404': missing\n  default: other\n";
        let parsed: Responses = serde_yaml_ng::from_str(yaml).unwrap();
        let keys: Vec<&str> = parsed.codes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["200", "404", "default"]);
    }
}
