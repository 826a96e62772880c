use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::covid::CountryRecord;

/// Point feature for one record, carrying the whole record as properties.
///
/// Records without both coordinates get a `null` geometry.
pub(crate) fn country_feature(record: &CountryRecord) -> Feature {
    let properties = match serde_json::to_value(record) {
        Ok(serde_json::Value::Object(properties)) => properties,
        _ => JsonObject::new(),
    };

    Feature {
        bbox: None,
        geometry: record
            .coordinates()
            .map(|[lng, lat]| Geometry::new(Value::Point(vec![lng, lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub(crate) fn countries_to_feature_collection(records: &[CountryRecord]) -> FeatureCollection {
    records.iter().map(country_feature).collect()
}

#[cfg(test)]
mod tests {
    use geojson::GeoJson;

    use super::*;
    use crate::covid::parse_countries;

    const BODY: &[u8] = br#"[
        {"country": "Italy", "countryInfo": {"iso2": "IT", "lat": 42.8333, "long": 12.8333}, "cases": 15113, "deaths": 1016, "recovered": 1258, "updated": 1584057600000},
        {"country": "Iceland", "countryInfo": {"lat": 65, "long": -18}, "cases": 117, "deaths": 0, "recovered": 0},
        {"country": "Diamond Princess", "cases": 696, "deaths": 7, "recovered": 325}
    ]"#;

    #[test]
    fn one_feature_per_record() {
        let records = parse_countries(BODY).unwrap();
        let collection = countries_to_feature_collection(&records);
        assert_eq!(collection.features.len(), records.len());
    }

    #[test]
    fn geometry_is_lng_lat() {
        let records = parse_countries(BODY).unwrap();
        let collection = countries_to_feature_collection(&records);

        let italy = &collection.features[0];
        assert_eq!(
            italy.geometry.as_ref().map(|geometry| &geometry.value),
            Some(&Value::Point(vec![12.8333, 42.8333]))
        );
        assert_eq!(collection.features[2].geometry, None);
    }

    #[test]
    fn properties_carry_the_record() {
        let records = parse_countries(BODY).unwrap();
        let italy = country_feature(&records[0]);

        let properties = italy.properties.unwrap();
        assert_eq!(properties["country"], "Italy");
        assert_eq!(properties["cases"], 15113);
        assert_eq!(properties["updated"], 1584057600000u64);
        assert_eq!(properties["countryInfo"]["iso2"], "IT");
    }

    #[test]
    fn survives_a_geojson_round_trip() {
        let records = parse_countries(BODY).unwrap();
        let collection = countries_to_feature_collection(&records);

        let parsed = match collection.to_string().parse::<GeoJson>().unwrap() {
            GeoJson::FeatureCollection(parsed) => parsed,
            other => panic!("expected a feature collection, got {other:?}"),
        };

        assert_eq!(parsed, collection);
        for (feature, record) in parsed.features.iter().zip(&records) {
            let back: CountryRecord =
                serde_json::from_value(serde_json::Value::Object(feature.properties.clone().unwrap())).unwrap();
            assert_eq!(&back, record);
        }
    }
}
