use std::future::Future;

use geojson::FeatureCollection;
use serde_derive::{Serialize, Deserialize};

use crate::client::FetchError;
use crate::config::MapSettings;
use crate::marker::MarkerSpec;

/// A feature collection together with the markers drawn for it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct MarkerLayer {
    pub(crate) features: FeatureCollection,
    pub(crate) markers: Vec<MarkerSpec>
}

pub(crate) trait MapHandle {
    fn settings(&self) -> &MapSettings;
    fn add_layer(&mut self, layer: MarkerLayer);
    fn layers(&self) -> &[MarkerLayer];
}

/// Runs once against a freshly initialised map.
pub(crate) trait MapEffect {
    fn apply(&self, map: &mut MapInstance) -> impl Future<Output = Result<(), FetchError>> + Send;
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct MapInstance {
    settings: MapSettings,
    layers: Vec<MarkerLayer>
}

impl MapInstance {
    /// Creates the map and hands it to `effect`. The effect's error has
    /// already been logged by the effect itself, so it is dropped here.
    pub(crate) async fn initialize<E: MapEffect>(settings: MapSettings, effect: &E) -> MapInstance {
        let mut map = MapInstance { settings, layers: vec!() };
        let _ = effect.apply(&mut map).await;
        map
    }
}

impl MapHandle for MapInstance {
    fn settings(&self) -> &MapSettings {
        &self.settings
    }

    fn add_layer(&mut self, layer: MarkerLayer) {
        self.layers.push(layer);
    }

    fn layers(&self) -> &[MarkerLayer] {
        &self.layers
    }
}
