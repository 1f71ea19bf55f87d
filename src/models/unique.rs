//! Serde helper for id lists that behave as sets.
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;

/// Deserializes a list of ids, dropping repeats and keeping first-seen order.
pub fn deserialize_unique<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<String>::deserialize(deserializer)?;
    let mut seen = HashSet::new();
    Ok(items.into_iter().filter(|item| seen.insert(item.clone())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Ids {
        #[serde(deserialize_with = "deserialize_unique")]
        ids: Vec<String>,
    }

    #[test]
    fn test_repeats_are_dropped_in_order() {
        let parsed: Ids = serde_json::from_str(r#"{"ids": ["b", "a", "b", "c", "a"]}"#).unwrap();
        assert_eq!(parsed.ids, vec!["b", "a", "c"]);
    }
}
