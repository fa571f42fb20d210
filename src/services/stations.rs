// src/services/stations.rs
use rusqlite::Connection;

use crate::app::App;
use crate::db::connection::Database;
use crate::db::{catalog, stations};
use crate::domain::models::{Coordinates, Group, Station, StationId};
use crate::errors::ServerError;

/// Query sent to the geocoder: the name plus the station marker, unless
/// the user already typed it.
pub fn station_query(name: &str, suffix: &str) -> String {
    if suffix.is_empty() || name.ends_with(suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

/// Resolve a station name and add it to the group, then pre-warm its
/// isochrone.
///
/// Names found in the imported catalog skip the geocoder. Otherwise an
/// empty geocoder answer is `NotFound` and a provider failure is
/// `GeocodeFailed`.
pub fn add_station(app: &App, group: &Group, name: &str, now: i64) -> Result<Station, ServerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServerError::BadRequest("station name is required".into()));
    }

    let location = resolve_location(app, name)?;

    let station = app
        .db
        .with_conn(|conn| stations::insert_station(conn, group.id, name, location, now))?;
    tracing::info!(station_id = station.id, station = %station.name, group = %group.name, "station added");

    app.isochrones.prewarm(&station, now);
    Ok(station)
}

/// Catalog position for a station name, typed with or without the suffix.
fn catalog_location(
    conn: &Connection,
    name: &str,
    suffix: &str,
) -> Result<Option<Coordinates>, ServerError> {
    let bare = name.strip_suffix(suffix).unwrap_or(name);
    match catalog::find_catalog_station(conn, name)? {
        Some(found) => Ok(Some(found)),
        None if bare != name => catalog::find_catalog_station(conn, bare),
        None => Ok(None),
    }
}

fn resolve_location(app: &App, name: &str) -> Result<Coordinates, ServerError> {
    let from_catalog = app
        .db
        .with_conn(|conn| catalog_location(conn, name, &app.station_suffix))?;
    if let Some(location) = from_catalog {
        return Ok(location);
    }

    let query = station_query(name, &app.station_suffix);
    match app.geocoder.lookup(&query) {
        Ok(Some(location)) => Ok(location),
        Ok(None) => {
            tracing::info!(query = %query, "station not found");
            Err(ServerError::NotFound)
        }
        Err(e) => {
            tracing::warn!(query = %query, error = %e, "station geocoding failed");
            Err(ServerError::GeocodeFailed(
                "The location lookup service is unavailable. Please try again.".into(),
            ))
        }
    }
}

pub fn remove_station(app: &App, group: &Group, station_id: StationId) -> Result<(), ServerError> {
    let removed = app.db.with_conn(|conn| {
        let Some(station) = stations::find_station(conn, group.id, station_id)? else {
            return Ok(None);
        };
        stations::delete_station(conn, group.id, station_id)?;
        Ok(Some(station))
    })?;
    let Some(station) = removed else {
        return Err(ServerError::NotFound);
    };
    tracing::info!(station_id, station = %station.name, group = %group.name, "station removed");
    Ok(())
}

/// Move every station whose name is in the imported catalog onto the
/// catalog position. Moved stations lose their cached isochrone.
pub fn refresh_from_catalog(db: &Database, suffix: &str) -> Result<usize, ServerError> {
    db.with_conn(|conn| {
        let mut moved = 0;
        for station in stations::all_stations(conn)? {
            let Some(location) = catalog_location(conn, &station.name, suffix)? else {
                continue;
            };
            if location != station.location && stations::relocate_station(conn, station.id, location)? {
                tracing::info!(station_id = station.id, station = %station.name, "station moved to catalog position");
                moved += 1;
            }
        }
        Ok(moved)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogLine, CatalogStation};
    use crate::db::catalog::replace_catalog;
    use crate::db::users::ensure_user;
    use crate::services::groups::create_group;
    use crate::tests::utils::{test_app, FakeGeocoder};

    fn group(app: &App) -> Group {
        let user = app.db.with_conn(|c| ensure_user(c, "sato", 0)).unwrap();
        create_group(&app.db, &user, "G", "abc", 0).unwrap()
    }

    #[test]
    fn query_gets_the_station_marker_once() {
        assert_eq!(station_query("新宿", "駅"), "新宿駅");
        assert_eq!(station_query("新宿駅", "駅"), "新宿駅");
        assert_eq!(station_query("Shinjuku", ""), "Shinjuku");
    }

    #[test]
    fn added_station_is_geocoded_with_suffix_and_prewarmed() {
        let t = test_app(FakeGeocoder::found(Coordinates::new(35.6909, 139.7005)));
        let g = group(&t.app);

        let station = add_station(&t.app, &g, " 新宿 ", 100).unwrap();
        assert_eq!(station.name, "新宿");
        assert_eq!(t.geocoder_queries(), vec!["新宿駅".to_string()]);
        assert_eq!(t.isochrone_calls(), 1);
        assert!(t.app.isochrones.cache().get(station.id, 101).unwrap().is_some());
    }

    #[test]
    fn prewarm_failure_still_adds_the_station() {
        let t = test_app(FakeGeocoder::found(Coordinates::new(35.0, 139.0)));
        t.fail_isochrones(true);
        let g = group(&t.app);

        let station = add_station(&t.app, &g, "Shinjuku", 1).unwrap();
        let listed = t
            .app
            .db
            .with_conn(|c| stations::list_stations(c, g.id))
            .unwrap();
        assert_eq!(listed, vec![station]);
    }

    #[test]
    fn unknown_station_is_not_found_and_outage_is_geocode_failed() {
        let t = test_app(FakeGeocoder::not_found());
        let g = group(&t.app);
        assert!(matches!(add_station(&t.app, &g, "Atlantis", 1), Err(ServerError::NotFound)));

        let t = test_app(FakeGeocoder::failing());
        let g = group(&t.app);
        assert!(matches!(
            add_station(&t.app, &g, "Shinjuku", 1),
            Err(ServerError::GeocodeFailed(_))
        ));
        assert_eq!(t.isochrone_calls(), 0);
    }

    #[test]
    fn catalog_names_skip_the_geocoder() {
        let t = test_app(FakeGeocoder::failing());
        let g = group(&t.app);
        t.app
            .db
            .with_conn(|c| {
                replace_catalog(
                    c,
                    &[CatalogLine {
                        name: "JR山手線".into(),
                        stations: vec![CatalogStation {
                            name: "新宿".into(),
                            location: Coordinates::new(35.689729, 139.700464),
                        }],
                    }],
                )
            })
            .unwrap();

        let station = add_station(&t.app, &g, "新宿駅", 1).unwrap();
        assert_eq!(station.location, Coordinates::new(35.689729, 139.700464));
        assert!(t.geocoder_queries().is_empty());
    }

    #[test]
    fn remove_is_scoped_to_the_group() {
        let t = test_app(FakeGeocoder::found(Coordinates::new(35.0, 139.0)));
        let g = group(&t.app);
        let other = {
            let u = t.app.db.with_conn(|c| ensure_user(c, "other", 0)).unwrap();
            create_group(&t.app.db, &u, "Other", "abc", 0).unwrap()
        };
        let station = add_station(&t.app, &g, "Shinjuku", 1).unwrap();

        assert!(matches!(
            remove_station(&t.app, &other, station.id),
            Err(ServerError::NotFound)
        ));
        remove_station(&t.app, &g, station.id).unwrap();
        assert!(t.app.isochrones.cache().get(station.id, 2).unwrap().is_none());
    }

    #[test]
    fn catalog_refresh_moves_geocoded_stations() {
        let t = test_app(FakeGeocoder::found(Coordinates::new(35.0, 139.0)));
        let g = group(&t.app);
        let shinjuku = add_station(&t.app, &g, "新宿駅", 1).unwrap();
        let elsewhere = add_station(&t.app, &g, "Atlantis", 1).unwrap();
        assert!(t.app.isochrones.cache().get(shinjuku.id, 2).unwrap().is_some());

        t.app
            .db
            .with_conn(|c| {
                replace_catalog(
                    c,
                    &[CatalogLine {
                        name: "JR山手線".into(),
                        stations: vec![CatalogStation {
                            name: "新宿".into(),
                            location: Coordinates::new(35.689729, 139.700464),
                        }],
                    }],
                )
            })
            .unwrap();

        assert_eq!(refresh_from_catalog(&t.app.db, "駅").unwrap(), 1);
        assert_eq!(refresh_from_catalog(&t.app.db, "駅").unwrap(), 0);

        let listed = t.app.db.with_conn(|c| stations::list_stations(c, g.id)).unwrap();
        assert_eq!(listed[0].location, Coordinates::new(35.689729, 139.700464));
        assert_eq!(listed[1], elsewhere);
        assert!(t.app.isochrones.cache().get(shinjuku.id, 2).unwrap().is_none());
        assert!(t.app.isochrones.cache().get(elsewhere.id, 2).unwrap().is_some());
    }
}
