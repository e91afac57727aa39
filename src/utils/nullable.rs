//! Campos "nullable" en actualizaciones parciales
//!
//! Distingue entre campo ausente (`None`), `null` explícito (`Some(None)`)
//! y valor (`Some(Some(v))`). Se usa con
//! `#[serde(default, deserialize_with = "deserialize_nullable")]`.

use serde::{Deserialize, Deserializer};

pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_nullable")]
        value: Option<Option<i64>>,
    }

    #[test]
    fn test_absent_null_and_value() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.value, None);

        let null: Patch = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(null.value, Some(None));

        let set: Patch = serde_json::from_str(r#"{"value": 5}"#).unwrap();
        assert_eq!(set.value, Some(Some(5)));
    }
}
