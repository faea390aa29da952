//! Lenient deserializers for form fields
//!
//! Clients send amounts as numbers or strings, phone numbers as a string or a list and dates with
//! or without a time part. These are normalized here, so handlers only see one representation.

use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error as _;
use serde_json::Value;

/// Amount as number or numeric string
///
/// `null` (or an absent field, with `#[serde(default)]`) is `None`, anything that is not numeric
/// becomes 0
pub fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    Ok(match value {
        Value::Null => None,
        Value::Number(number) => Some(parse_decimal(&number.to_string())),
        Value::String(string) => Some(parse_decimal(&string)),
        _ => Some(Decimal::ZERO),
    })
}

fn parse_decimal(value: &str) -> Decimal {
    let value = value.trim();

    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .unwrap_or(Decimal::ZERO)
}

/// Phone numbers as a single string or a list of strings, lists are joined with `;`
pub fn tel<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tel {
        Single(String),
        Multiple(Vec<String>),
    }

    let tel = Option::<Tel>::deserialize(deserializer)?;

    Ok(match tel {
        Some(Tel::Single(tel)) => Some(tel),
        Some(Tel::Multiple(tels)) if tels.is_empty() => None,
        Some(Tel::Multiple(tels)) => Some(tels.join(";")),
        None => None,
    })
}

/// Calendar date, `YYYY-MM-DD` or a full RFC 3339 timestamp of which only the date is kept
///
/// Empty strings are treated as no date
pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let date = Option::<String>::deserialize(deserializer)?;

    match date.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(date) => parse_date(date)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date `{date}`"))),
    }
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(date)
            .ok()
            .map(|date_time| date_time.date_naive())
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "decimal")]
        amount: Option<Decimal>,

        #[serde(default, deserialize_with = "tel")]
        tel: Option<String>,

        #[serde(default, deserialize_with = "date")]
        date: Option<NaiveDate>,
    }

    fn parse(json: &str) -> Fields {
        serde_json::from_str::<Fields>(json).unwrap()
    }

    #[test]
    fn test_decimal() {
        assert_eq!(Some(Decimal::new(500, 0)), parse(r#"{"amount":500}"#).amount);
        assert_eq!(Some(Decimal::new(1250, 2)), parse(r#"{"amount":12.5}"#).amount);
        assert_eq!(Some(Decimal::new(120, 0)), parse(r#"{"amount":"120"}"#).amount);
        assert_eq!(Some(Decimal::ZERO), parse(r#"{"amount":"lots"}"#).amount);
        assert_eq!(Some(Decimal::ZERO), parse(r#"{"amount":true}"#).amount);
        assert_eq!(None, parse(r#"{"amount":null}"#).amount);
        assert_eq!(None, parse("{}").amount);
    }

    #[test]
    fn test_tel() {
        assert_eq!(Some("010-1234".to_string()), parse(r#"{"tel":"010-1234"}"#).tel);
        assert_eq!(
            Some("010-1234;010-5678".to_string()),
            parse(r#"{"tel":["010-1234","010-5678"]}"#).tel
        );
        assert_eq!(None, parse(r#"{"tel":[]}"#).tel);
        assert_eq!(None, parse(r#"{"tel":null}"#).tel);
    }

    #[test]
    fn test_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 4, 1);

        assert_eq!(expected, parse(r#"{"date":"2025-04-01"}"#).date);
        assert_eq!(expected, parse(r#"{"date":"2025-04-01T08:30:00Z"}"#).date);
        assert_eq!(None, parse(r#"{"date":""}"#).date);
        assert_eq!(None, parse(r#"{"date":null}"#).date);
        assert!(serde_json::from_str::<Fields>(r#"{"date":"tomorrow"}"#).is_err());
    }
}
