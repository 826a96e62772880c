use std::collections::HashMap;
use once_cell::sync::Lazy;

pub(crate) struct Location {
    pub(crate) lat: f64,
    pub(crate) lng: f64
}

pub(crate) const LOCATION: Location = Location { lat: 0.0, lng: 0.0 };
pub(crate) const CENTER: [f64; 2] = [LOCATION.lat, LOCATION.lng];
pub(crate) const DEFAULT_ZOOM: u8 = 2;

pub(crate) const DEFAULT_ADDR: &str = "0.0.0.0:4000";
pub(crate) const COUNTRIES_URL: &str = "https://corona.lmao.ninja/countries";
pub(crate) const DEFAULT_BASE_MAP: &str = "OpenStreetMap";
// Matches the en-US toLocaleDateString rendering, e.g. 3/13/2020
pub(crate) const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

pub(crate) struct BaseMap {
    pub(crate) url: &'static str,
    pub(crate) attribution: &'static str
}

pub(crate) static BASE_MAPS: Lazy<HashMap<&str, BaseMap>> = Lazy::new(||
    HashMap::from([
        ("OpenStreetMap", BaseMap {
            url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
        }),
        ("OpenTopoMap", BaseMap {
            url: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
            attribution: "Map data: &copy; OpenStreetMap contributors, SRTM | Map style: &copy; OpenTopoMap (CC-BY-SA)"
        }),
    ])
);
