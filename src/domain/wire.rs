// src/domain/wire.rs
//
// The API serializes decimal columns as strings ("1950.00"). Clients written
// against other backends send plain numbers, so inputs accept both.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

impl TextOrNumber {
    fn into_text(self) -> String {
        match self {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Int(n) => n.to_string(),
            TextOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// `"1950.00"` or `1950` → `"1950.00"` / `"1950"`.
pub fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    TextOrNumber::deserialize(deserializer).map(TextOrNumber::into_text)
}

pub fn opt_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<TextOrNumber>::deserialize(deserializer).map(|v| v.map(TextOrNumber::into_text))
}

/// With `#[serde(default)]`, keeps "sent as null" (`Some(None)`) apart from
/// "not sent" (`None`).
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub fn nullable_text_or_number<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    opt_text_or_number(deserializer).map(Some)
}

/// Parse a decimal field; blank and garbage both yield `None`.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_coordinate(value: f64) -> String {
    format!("{value:.6}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Decimals {
        #[serde(deserialize_with = "text_or_number")]
        price: String,
        #[serde(default, deserialize_with = "opt_text_or_number")]
        lat: Option<String>,
    }

    #[test]
    fn accepts_strings_and_numbers() {
        let a: Decimals = serde_json::from_str(r#"{"price": "1950.00", "lat": 34.5}"#).unwrap();
        assert_eq!(a.price, "1950.00");
        assert_eq!(a.lat.as_deref(), Some("34.5"));

        let b: Decimals = serde_json::from_str(r#"{"price": 1200}"#).unwrap();
        assert_eq!(b.price, "1200");
        assert_eq!(b.lat, None);
    }

    #[test]
    fn parse_decimal_rejects_garbage() {
        assert_eq!(parse_decimal(" 34.223000 "), Some(34.223));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal(""), None);
    }
}
