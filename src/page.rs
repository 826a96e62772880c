use crate::config::MapSettings;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Home Page</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
  <style>
    html, body { margin: 0; height: 100%; font-family: sans-serif; }
    #map { height: 100vh; }
    .icon-marker { display: flex; align-items: center; justify-content: center; position: relative;
      width: 3.6em; height: 3.6em; margin: -1.8em 0 0 -1.8em; border-radius: 50%;
      color: white; font-weight: bold; background: rgba(200, 0, 0, .8); }
    .icon-marker-tooltip { display: none; position: absolute; bottom: 100%; width: 16em;
      padding: .8em; color: #333; font-weight: normal; background: white; border-radius: .4em;
      box-shadow: 0 2px 6px rgba(0, 0, 0, .3); }
    .icon-marker-tooltip h2 { margin: 0 0 .4em; font-size: 1.2em; }
    .icon-marker-tooltip ul { margin: 0; padding: 0; list-style: none; }
    .icon-marker:hover .icon-marker-tooltip { display: block; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <script>
    const settings = __SETTINGS__;
    const map = L.map('map').setView(settings.center, settings.zoom);
    L.tileLayer(settings.tiles.url, { attribution: settings.tiles.attribution }).addTo(map);

    fetch('/api/layers')
      .then((resp) => resp.json())
      .then(({ layers }) => {
        for (const layer of layers) {
          const group = L.layerGroup();
          for (const marker of layer.markers) {
            if (!marker.position) continue;
            L.marker(marker.position, {
              icon: L.divIcon({ className: marker.class_name, html: marker.html }),
              riseOnHover: marker.rise_on_hover
            }).addTo(group);
          }
          group.addTo(map);
        }
      })
      .catch((e) => console.log(`Failed to load layers: ${e.message}`, e));
  </script>
</body>
</html>
"#;

/// The page shell with `settings` inlined for the loader script.
pub(crate) fn render(settings: &MapSettings) -> Result<String, serde_json::Error> {
    // "</" would end the script element early
    let settings_json = serde_json::to_string(settings)?.replace("</", "<\\/");
    Ok(TEMPLATE.replace("__SETTINGS__", &settings_json))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inlines_settings() {
        let html = render(&MapSettings::default()).unwrap();

        assert!(html.contains("<title>Home Page</title>"));
        assert!(html.contains(r#""center":[0.0,0.0]"#));
        assert!(html.contains(r#""zoom":2"#));
        assert!(html.contains(r#""default_base_map":"OpenStreetMap""#));
        assert!(!html.contains("__SETTINGS__"));
    }

    #[test]
    fn settings_cannot_close_the_script() {
        let mut settings = MapSettings::default();
        settings.tiles.attribution = "</script><script>alert(1)</script>".to_string();

        let html = render(&settings).unwrap();
        assert!(!html.contains("</script><script>alert(1)"));
    }
}
