use serde::{Deserialize, Deserializer, de::Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Deserializer for quote values that upstream APIs send either as JSON
/// numbers or as decimal strings ("1234.5", "1234,5")
///
/// # Example
/// ```
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Quote {
///     #[serde(deserialize_with = "dolar_be::utils::serde::decimal")]
///     pub compra: f64,
/// }
/// ```
pub fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => parse_decimal(&s).map_err(D::Error::custom),
    }
}

/// Parses a decimal string, accepting `,` as the decimal separator
///
/// A comma is only read as a decimal separator when it appears once, is
/// followed by one or two digits and the string has no `.`. Anything else
/// with a comma ("1,234", "1,234.50") is rejected rather than guessed.
pub fn parse_decimal(raw: &str) -> Result<f64, String> {
    let invalid = || format!("invalid decimal value: {:?}", raw);
    let trimmed = raw.trim();

    let normalized = match trimmed.split_once(',') {
        None => trimmed.to_string(),
        Some((int, frac))
            if !int.contains('.')
                && (1..=2).contains(&frac.len())
                && frac.bytes().all(|b| b.is_ascii_digit()) =>
        {
            format!("{}.{}", int, frac)
        }
        Some(_) => return Err(invalid()),
    };

    match normalized.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(invalid()),
    }
}
