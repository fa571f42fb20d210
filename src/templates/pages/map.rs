use crate::services::map::{MapData, MapVm};
use crate::templates::desktop_layout;
use maud::{html, Markup, PreEscaped};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const BAND_COLORS: [&str; 5] = ["#2e7d32", "#f9a825", "#c62828", "#6a1b9a", "#1565c0"];

fn band_label(seconds: u32) -> String {
    if seconds % 60 == 0 {
        format!("{} min", seconds / 60)
    } else {
        format!("{seconds} s")
    }
}

fn band_color(index: usize) -> &'static str {
    BAND_COLORS[index % BAND_COLORS.len()]
}

/// Serialized map data, safe to drop inside a `<script>` element.
pub fn map_data_json(data: &MapData) -> String {
    serde_json::to_string(data)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/")
}

pub fn map_page(vm: &MapVm) -> Markup {
    let head = html! {
        link rel="stylesheet" href=(LEAFLET_CSS);
        script src=(LEAFLET_JS) defer {}
    };

    desktop_layout(
        "Map",
        Some(&vm.group_name),
        head,
        html! {
            main class="map-page" {
                div class="map-toolbar" {
                    span { "Signed in as " strong { (vm.username) } }
                    span class="members" {
                        "Members: "
                        @for (i, member) in vm.members.iter().enumerate() {
                            @if i > 0 { ", " }
                            (member)
                        }
                    }
                    span class="legend" {
                        @for (i, band) in vm.data.bands.iter().enumerate() {
                            span class="band"
                                data-band=(band)
                                data-color=(band_color(i))
                                style=(format!("background: {}", band_color(i))) {
                                (band_label(*band))
                            }
                        }
                    }
                }
                div id="map" style="height: calc(100vh - 8rem);" {}
                script type="application/json" id="map-data" {
                    (PreEscaped(map_data_json(&vm.data)))
                }
                script { (PreEscaped(MAP_SCRIPT)) }
            }
        },
    )
}

const MAP_SCRIPT: &str = r##"
window.addEventListener("load", function () {
  var data = JSON.parse(document.getElementById("map-data").textContent);
  var map = L.map("map").setView([data.center.lat, data.center.lon], 14);
  L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
    maxZoom: 19,
    attribution: "&copy; OpenStreetMap contributors"
  }).addTo(map);

  var colors = {};
  document.querySelectorAll(".legend .band").forEach(function (el) {
    colors[el.dataset.band] = el.dataset.color;
  });
  data.overlays.forEach(function (overlay) {
    var features = overlay.polygons.features.slice().sort(function (a, b) {
      return b.properties.value - a.properties.value;
    });
    features.forEach(function (feature) {
      var color = colors[feature.properties.value] || "#1565c0";
      L.geoJSON(feature, {
        style: { color: color, weight: 1, fillOpacity: 0.15 }
      }).addTo(map);
    });
  });

  data.stations.forEach(function (s) {
    L.circleMarker([s.lat, s.lon], { radius: 6, color: "#37474f" })
      .bindTooltip(s.name)
      .addTo(map);
  });

  function escapeHtml(text) {
    var div = document.createElement("div");
    div.textContent = text;
    return div.innerHTML;
  }

  data.properties.forEach(function (p) {
    var status = p.is_matched
      ? "<strong>Match!</strong>"
      : "Likes: " + p.liked_usernames.length;
    var likedBy = p.liked_usernames.length
      ? "<br>Liked by " + p.liked_usernames.map(escapeHtml).join(", ")
      : "";
    var html =
      "<b>" + escapeHtml(p.name) + "</b><br>" +
      escapeHtml(p.address) + "<br>" +
      escapeHtml(p.rent) + "<br>" + status + likedBy +
      "<br><button class='like' data-id='" + p.id + "'>" +
      (p.liked_by_me ? "Unlike" : "Like") + "</button>";
    var marker = L.marker([p.lat, p.lon]).addTo(map);
    if (p.is_matched) {
      marker.setOpacity(1.0);
    } else {
      marker.setOpacity(0.7);
    }
    marker.bindPopup(html);
  });

  map.on("popupopen", function (e) {
    var button = e.popup.getElement().querySelector("button.like");
    if (!button) { return; }
    button.addEventListener("click", function () {
      button.disabled = true;
      fetch("/like/" + button.dataset.id, { method: "POST", credentials: "same-origin" })
        .then(function (res) {
          if (!res.ok) { throw new Error("like failed: " + res.status); }
          window.location.reload();
        })
        .catch(function () { button.disabled = false; });
    });
  });
});
"##;
