//! Database ID type definition.

use serde::{Deserialize, Deserializer};

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// Deserialize an optional ID from an HTML select, treating the empty string
/// as no selection.
pub(crate) fn deserialize_optional_id<'de, D>(
    deserializer: D,
) -> Result<Option<DatabaseId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;

    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(raw_id) => raw_id
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid ID {raw_id}"))),
    }
}

#[cfg(test)]
mod deserialize_optional_id_tests {
    use serde::Deserialize;

    use super::{DatabaseId, deserialize_optional_id};

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestForm {
        #[serde(default, deserialize_with = "deserialize_optional_id")]
        category_id: Option<DatabaseId>,
    }

    #[test]
    fn empty_string_is_none() {
        let form: TestForm = serde_urlencoded::from_str("category_id=").unwrap();

        assert_eq!(form.category_id, None);
    }

    #[test]
    fn missing_field_is_none() {
        let form: TestForm = serde_urlencoded::from_str("").unwrap();

        assert_eq!(form.category_id, None);
    }

    #[test]
    fn number_is_some() {
        let form: TestForm = serde_urlencoded::from_str("category_id=42").unwrap();

        assert_eq!(form.category_id, Some(42));
    }
}
