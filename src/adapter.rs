use crate::client::{CountrySource, FetchError};
use crate::geo;
use crate::map::{MapEffect, MapHandle, MapInstance, MarkerLayer};
use crate::marker::MarkerSpec;

/// Fetches the country list and attaches one marker layer to `map`.
///
/// A failed fetch is logged and returned; nothing is attached. An empty list
/// returns `Ok(())` without touching the map.
pub(crate) async fn add_country_layer<S, M>(source: &S, map: &mut M) -> Result<(), FetchError>
where
    S: CountrySource + Sync,
    M: MapHandle + Send
{
    let countries = match source.fetch_countries().await {
        Ok(countries) => countries,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to fetch countries: {}", e);
            return Err(e);
        }
    };

    if countries.is_empty() {
        return Ok(());
    }

    let features = geo::countries_to_feature_collection(&countries);

    tracing::debug!(countries = countries.len(), "API response: {:?}", countries);
    tracing::debug!("geoJson object: {}", features);

    let date_format = map.settings().date_format.clone();
    let markers = countries
        .iter()
        .map(|country| MarkerSpec::for_record(country, &date_format))
        .collect();

    map.add_layer(MarkerLayer { features, markers });

    Ok(())
}

/// The map effect that loads the country layer from `source`.
pub(crate) struct CountryLayerEffect<'a, S> {
    source: &'a S
}

impl<'a, S> CountryLayerEffect<'a, S> {
    pub(crate) fn new(source: &'a S) -> Self {
        CountryLayerEffect { source }
    }
}

impl<'a, S: CountrySource + Sync> MapEffect for CountryLayerEffect<'a, S> {
    async fn apply(&self, map: &mut MapInstance) -> Result<(), FetchError> {
        add_country_layer(self.source, map).await
    }
}

#[cfg(test)]
mod tests {
    use hyper::StatusCode;

    use super::*;
    use crate::config::MapSettings;
    use crate::covid::{parse_countries, CountryRecord};

    struct StaticSource(Vec<CountryRecord>);

    impl CountrySource for StaticSource {
        async fn fetch_countries(&self) -> Result<Vec<CountryRecord>, FetchError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl CountrySource for FailingSource {
        async fn fetch_countries(&self) -> Result<Vec<CountryRecord>, FetchError> {
            Err(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    #[derive(Default)]
    struct RecordingMap {
        settings: MapSettings,
        layers: Vec<MarkerLayer>,
        attach_calls: usize
    }

    impl MapHandle for RecordingMap {
        fn settings(&self) -> &MapSettings {
            &self.settings
        }

        fn add_layer(&mut self, layer: MarkerLayer) {
            self.attach_calls += 1;
            self.layers.push(layer);
        }

        fn layers(&self) -> &[MarkerLayer] {
            &self.layers
        }
    }

    fn countries() -> Vec<CountryRecord> {
        parse_countries(crate::client::tests::FIXTURE.as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn one_marker_per_record() {
        let records = countries();
        let mut map = RecordingMap::default();

        add_country_layer(&StaticSource(records.clone()), &mut map).await.unwrap();

        assert_eq!(map.attach_calls, 1);
        let layer = &map.layers()[0];
        assert_eq!(layer.markers.len(), records.len());
        assert_eq!(layer.features.features.len(), records.len());
        assert!(layer.markers.iter().all(|marker| marker.rise_on_hover));

        let labels: Vec<&str> = layer.markers.iter().map(|marker| marker.label.as_str()).collect();
        assert_eq!(labels, ["80k+", "15k+", "117"]);
    }

    #[tokio::test]
    async fn uses_the_map_date_format() {
        let mut map = RecordingMap::default();
        map.settings.date_format = "%Y-%m-%d".to_string();

        add_country_layer(&StaticSource(countries()), &mut map).await.unwrap();

        assert!(map.layers()[0].markers[0].html.contains("2020-03-13"));
    }

    #[tokio::test]
    async fn malformed_record_still_gets_a_marker() {
        let records = parse_countries(
            br#"[{"country": "Italy", "cases": 10}, {"country": null, "cases": 5.0}]"#
        ).unwrap();
        let mut map = RecordingMap::default();

        add_country_layer(&StaticSource(records), &mut map).await.unwrap();

        let markers = &map.layers()[0].markers;
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].label, "10");
        assert_eq!(markers[1].label, "5");
    }

    #[tokio::test]
    async fn empty_list_attaches_nothing() {
        let mut map = RecordingMap::default();

        add_country_layer(&StaticSource(vec!()), &mut map).await.unwrap();

        assert_eq!(map.attach_calls, 0);
    }

    #[tokio::test]
    async fn fetch_failure_is_returned_not_attached() {
        let mut map = RecordingMap::default();

        let result = add_country_layer(&FailingSource, &mut map).await;

        assert!(matches!(result, Err(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE))));
        assert_eq!(map.attach_calls, 0);
    }

    #[tokio::test]
    async fn effect_initialises_map_with_layer() {
        let source = StaticSource(countries());
        let map = MapInstance::initialize(MapSettings::default(), &CountryLayerEffect::new(&source)).await;

        assert_eq!(map.layers().len(), 1);
        assert_eq!(map.layers()[0].markers.len(), 3);
    }

    #[tokio::test]
    async fn effect_swallows_fetch_failure() {
        let map = MapInstance::initialize(MapSettings::default(), &CountryLayerEffect::new(&FailingSource)).await;
        assert!(map.layers().is_empty());
    }
}
