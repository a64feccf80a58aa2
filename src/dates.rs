//! Serde support for calendar dates as `YYYY-MM-DD` strings.
//!
//! `time::Date` serializes to an internal representation by default; the
//! API wants the ISO form the clients send and render.

use serde::{Deserialize, Deserializer, Serializer};
use time::{format_description::FormatItem, macros::format_description, Date};

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
    let out = date.format(&ISO_DATE).map_err(serde::ser::Error::custom)?;
    s.serialize_str(&out)
}

pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
    let raw = String::deserialize(d)?;
    Date::parse(&raw, &ISO_DATE).map_err(serde::de::Error::custom)
}

/// Same encoding for `Option<Date>` fields (partial updates).
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => super::serialize(d, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|r| Date::parse(&r, &super::ISO_DATE).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use time::macros::date;

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "crate::dates")]
        date: Date,
    }

    #[test]
    fn serializes_as_iso_string() {
        let w = Wrapper {
            date: date!(2024 - 01 - 05),
        };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"date":"2024-01-05"}"#);
    }

    #[test]
    fn deserializes_iso_string() {
        let w: Wrapper = serde_json::from_str(r#"{"date":"2024-02-01"}"#).unwrap();
        assert_eq!(w.date, date!(2024 - 02 - 01));
    }

    #[test]
    fn rejects_garbage() {
        let res: Result<Wrapper, _> = serde_json::from_str(r#"{"date":"not-a-date"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn serializes_with_zero_padding() {
        let w = Wrapper {
            date: date!(2024 - 03 - 07),
        };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"date":"2024-03-07"}"#);
    }

    #[derive(Serialize, Deserialize)]
    struct OptWrapper {
        #[serde(default, with = "crate::dates::option")]
        date: Option<Date>,
    }

    #[test]
    fn optional_date_roundtrip_and_absence() {
        let w: OptWrapper = serde_json::from_str(r#"{"date":"2024-12-31"}"#).unwrap();
        assert_eq!(w.date, Some(date!(2024 - 12 - 31)));
        let w: OptWrapper = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(w.date, None);
    }
}
