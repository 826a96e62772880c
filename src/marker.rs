use chrono::{TimeZone, Utc};
use html_escape::encode_text;
use serde_derive::{Serialize, Deserialize};

use crate::covid::CountryRecord;

const MISSING: &str = "n/a";

/// How a single country is drawn on the map.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct MarkerSpec {
    /// `[lat, lng]`, Leaflet order. `None` when the record has no coordinates.
    pub(crate) position: Option<[f64; 2]>,
    pub(crate) html: String,
    pub(crate) label: String,
    pub(crate) class_name: String,
    pub(crate) rise_on_hover: bool
}

impl MarkerSpec {
    pub(crate) fn for_record(record: &CountryRecord, date_format: &str) -> MarkerSpec {
        let label = case_label(record.cases);
        // 0 is the upstream's "never updated", not 1970
        let updated = record
            .updated
            .filter(|updated| *updated != 0)
            .and_then(|updated| format_updated(updated, date_format));

        MarkerSpec {
            position: record.coordinates().map(|[lng, lat]| [lat, lng]),
            html: tooltip_html(record, &label, updated.as_deref()),
            label,
            class_name: "icon".to_string(),
            rise_on_hover: true
        }
    }
}

/// Shortens counts above 1000 by cutting the last three digits: 12345 -> "12k+".
pub(crate) fn abbreviate_cases(cases: u64) -> String {
    let cases_string = cases.to_string();
    if cases > 1000 {
        format!("{}k+", &cases_string[..cases_string.len() - 3])
    } else {
        cases_string
    }
}

pub(crate) fn case_label(cases: Option<u64>) -> String {
    cases.map_or_else(|| MISSING.to_string(), abbreviate_cases)
}

/// Calendar date of a millisecond timestamp, without the time of day.
pub(crate) fn format_updated(updated: i64, date_format: &str) -> Option<String> {
    let date = Utc.timestamp_millis_opt(updated).single()?;
    Some(date.format(date_format).to_string())
}

fn count(value: Option<u64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |value| value.to_string())
}

pub(crate) fn tooltip_html(record: &CountryRecord, label: &str, updated: Option<&str>) -> String {
    let last_update = updated
        .map(|updated| format!("\n      <li><strong>Last Update:</strong> {}</li>", encode_text(updated)))
        .unwrap_or_default();

    format!(
        r#"<span class="icon-marker">
  <span class="icon-marker-tooltip">
    <h2>{country}</h2>
    <ul>
      <li><strong>Confirmed:</strong> {cases}</li>
      <li><strong>Deaths:</strong> {deaths}</li>
      <li><strong>Recovered</strong> {recovered}</li>{last_update}
    </ul>
  </span>
  {label}
</span>"#,
        country = encode_text(&record.country),
        cases = count(record.cases),
        deaths = count(record.deaths),
        recovered = count(record.recovered),
        last_update = last_update,
        label = label
    )
}
