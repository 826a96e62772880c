use serde::Deserializer;
use serde_derive::{Serialize, Deserialize};
use serde_json::{Map, Value};

/// One country entry of the upstream `/countries` response.
///
/// Only the fields the map needs are typed. Everything else the API sends is
/// kept in `extra` so it can be forwarded as feature properties untouched.
/// Typed fields never reject a value: anything unusable reads as missing.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct CountryRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) country: String,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub(crate) cases: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub(crate) deaths: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub(crate) recovered: Option<u64>,
    /// Milliseconds since the epoch.
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub(crate) updated: Option<i64>,
    #[serde(rename = "countryInfo", default, skip_serializing_if = "Option::is_none")]
    pub(crate) country_info: Option<CountryInfo>,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct CountryInfo {
    #[serde(default, deserialize_with = "lenient_coordinate", skip_serializing_if = "Option::is_none")]
    pub(crate) lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate", skip_serializing_if = "Option::is_none")]
    pub(crate) long: Option<f64>,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>
}

const TYPED_FIELDS: [&str; 6] = ["country", "cases", "deaths", "recovered", "updated", "countryInfo"];

fn any_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
    <Value as serde::Deserialize>::deserialize(deserializer)
}

/// `null` reads as empty, other non-strings as their JSON text.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match any_value(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string()
    })
}

/// Whole, non-negative numbers only; `5.0` counts, `-1` and `"5"` do not.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = any_value(deserializer)?;
    Ok(value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
            .map(|n| n as u64)
    }))
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = any_value(deserializer)?;
    Ok(value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && n.fract() == 0.0 && n.abs() <= i64::MAX as f64)
            .map(|n| n as i64)
    }))
}

fn lenient_coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(any_value(deserializer)?.as_f64().filter(|n| n.is_finite()))
}

impl CountryRecord {
    /// `[longitude, latitude]`, or `None` when either coordinate is missing.
    pub(crate) fn coordinates(&self) -> Option<[f64; 2]> {
        let info = self.country_info.as_ref()?;
        Some([info.long?, info.lat?])
    }

    /// Decodes one array element. An element that still cannot be read (not
    /// an object, or a `countryInfo` that is not one) becomes an empty record
    /// that keeps the element's untyped keys.
    fn from_element(element: Value) -> CountryRecord {
        match serde_json::from_value(element.clone()) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("Unreadable country record ({}): {}", e, element);
                let extra = match element {
                    Value::Object(mut fields) => {
                        fields.retain(|key, _| !TYPED_FIELDS.contains(&key.as_str()));
                        fields
                    }
                    _ => Map::new()
                };
                CountryRecord { extra, ..Default::default() }
            }
        }
    }
}

/// Turns a response body into records, one per array element.
///
/// A body that is not a JSON array yields no records. Only a body that is not
/// JSON at all is an error.
pub(crate) fn parse_countries(body: &[u8]) -> Result<Vec<CountryRecord>, serde_json::Error> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Array(items) => Ok(items.into_iter().map(CountryRecord::from_element).collect()),
        _ => Ok(vec!())
    }
}
