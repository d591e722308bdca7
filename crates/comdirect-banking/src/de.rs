//! Lenient deserializers for fields the API encodes inconsistently.

use std::fmt;

use chrono::NaiveDate;
use serde::{de, Deserializer};

struct CountVisitor;

impl de::Visitor<'_> for CountVisitor {
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "a non-negative number or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, val: u64) -> Result<Self::Value, E> {
        Ok(val)
    }

    fn visit_i64<E: de::Error>(self, val: i64) -> Result<Self::Value, E> {
        u64::try_from(val).map_err(|_| E::invalid_value(de::Unexpected::Signed(val), &self))
    }

    fn visit_str<E: de::Error>(self, val: &str) -> Result<Self::Value, E> {
        if val.is_empty() {
            return Ok(0);
        }
        val.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(val), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(0)
    }
}

/// A count given either as a JSON number or as a string; `null` and `""` are zero.
pub(crate) fn count<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    de.deserialize_any(CountVisitor)
}

struct OptDateVisitor;

impl de::Visitor<'_> for OptDateVisitor {
    type Value = Option<NaiveDate>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "a YYYY-MM-DD date, an empty string or null")
    }

    fn visit_str<E: de::Error>(self, val: &str) -> Result<Self::Value, E> {
        if val.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(val, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(val), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

/// An optional date; unbooked transactions carry `null` or `""`.
pub(crate) fn optional_date<'de, D>(de: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    de.deserialize_any(OptDateVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "count")]
        count: u64,
        #[serde(default, deserialize_with = "optional_date")]
        date: Option<NaiveDate>,
    }

    fn parse(json: &str) -> Result<Sample, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn counts_accept_numbers_and_strings() {
        assert_eq!(parse(r#"{"count": 45}"#).unwrap().count, 45);
        assert_eq!(parse(r#"{"count": "45"}"#).unwrap().count, 45);
        assert_eq!(parse(r#"{"count": ""}"#).unwrap().count, 0);
        assert!(parse(r#"{"count": "many"}"#).is_err());
        assert!(parse(r#"{"count": -1}"#).is_err());
    }

    #[test]
    fn dates_may_be_missing() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 31);

        assert_eq!(parse(r#"{"count": 0, "date": "2024-03-31"}"#).unwrap().date, date);
        assert_eq!(parse(r#"{"count": 0, "date": ""}"#).unwrap().date, None);
        assert_eq!(parse(r#"{"count": 0, "date": null}"#).unwrap().date, None);
        assert_eq!(parse(r#"{"count": 0}"#).unwrap().date, None);
        assert!(parse(r#"{"count": 0, "date": "31.03.2024"}"#).is_err());
    }
}
