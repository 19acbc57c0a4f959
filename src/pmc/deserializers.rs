//! Custom serde deserializers for ID converter JSON
//!
//! The converter is not consistent about scalar types: `pmid` arrives as a string
//! in some records and as a bare number in others.

use serde::Deserializer;
use std::fmt;
use std::result;

/// Deserialize an optional identifier given either as a JSON string or number
///
/// # Behavior
///
/// * `"23193287"` → `Some("23193287")`
/// * `23193287` → `Some("23193287")`
/// * `null` or `""` → `None`
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct StringOrNumberVisitor;

    impl<'de> Visitor<'de> for StringOrNumberVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or number identifier")
        }

        fn visit_str<E>(self, value: &str) -> result::Result<Option<String>, E>
        where
            E: de::Error,
        {
            let value = value.trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> result::Result<Option<String>, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> result::Result<Option<String>, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_unit<E>(self) -> result::Result<Option<String>, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> result::Result<Option<String>, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}
