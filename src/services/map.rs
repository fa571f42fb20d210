// src/services/map.rs
use serde::Serialize;

use crate::app::App;
use crate::db::{stations, users};
use crate::domain::models::{Coordinates, Group, StationId, User};
use crate::errors::ServerError;
use crate::isochrone::PolygonSet;
use crate::services::properties::{property_views, PropertyView};

/// Map opens over Shinjuku when the group has nothing placed yet.
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 35.6909,
    lon: 139.7005,
};

#[derive(Debug, Clone, Serialize)]
pub struct StationMarker {
    pub id: StationId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overlay {
    pub station_id: StationId,
    pub station_name: String,
    pub polygons: PolygonSet,
}

/// Data handed to the map surface.
#[derive(Debug, Clone, Serialize)]
pub struct MapData {
    pub center: Coordinates,
    /// Walk-time bands in seconds, smallest first.
    pub bands: Vec<u32>,
    pub stations: Vec<StationMarker>,
    pub properties: Vec<PropertyView>,
    pub overlays: Vec<Overlay>,
}

#[derive(Debug, Clone)]
pub struct MapVm {
    pub username: String,
    pub group_name: String,
    pub members: Vec<String>,
    pub data: MapData,
}

/// Assemble the group's map. Stations whose isochrone is unavailable are
/// still shown, just without an overlay.
pub fn build_map(app: &App, user: &User, group: &Group, now: i64) -> Result<MapVm, ServerError> {
    let (station_list, members) = app.db.with_conn(|conn| {
        Ok((
            stations::list_stations(conn, group.id)?,
            users::member_usernames(conn, group.id)?,
        ))
    })?;
    let properties = property_views(&app.db, app.match_policy, user, group)?;

    let overlays: Vec<Overlay> = station_list
        .iter()
        .filter_map(|station| {
            app.isochrones
                .polygons_for(station, now)
                .map(|polygons| Overlay {
                    station_id: station.id,
                    station_name: station.name.clone(),
                    polygons,
                })
        })
        .collect();

    let center = properties
        .first()
        .map(|p| Coordinates::new(p.lat, p.lon))
        .or_else(|| station_list.first().map(|s| s.location))
        .unwrap_or(DEFAULT_CENTER);

    let stations = station_list
        .into_iter()
        .map(|s| StationMarker {
            id: s.id,
            name: s.name,
            lat: s.location.lat,
            lon: s.location.lon,
        })
        .collect();

    Ok(MapVm {
        username: user.username.clone(),
        group_name: group.name.clone(),
        members,
        data: MapData {
            center,
            bands: app.isochrones.policy().bands.clone(),
            stations,
            properties,
            overlays,
        },
    })
}
