// src/db/stations.rs
use crate::domain::models::{Coordinates, GroupId, Station, StationId};
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension, Row};

fn station_from_row(row: &Row<'_>) -> rusqlite::Result<Station> {
    Ok(Station {
        id: row.get(0)?,
        group_id: row.get(1)?,
        name: row.get(2)?,
        location: Coordinates::new(row.get(3)?, row.get(4)?),
    })
}

pub fn insert_station(
    conn: &Connection,
    group_id: GroupId,
    name: &str,
    location: Coordinates,
    now: i64,
) -> Result<Station, ServerError> {
    conn.execute(
        "insert into stations (group_id, name, latitude, longitude, created_at) values (?, ?, ?, ?, ?)",
        params![group_id, name, location.lat, location.lon, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert station failed: {e}")))?;

    Ok(Station {
        id: conn.last_insert_rowid(),
        group_id,
        name: name.to_string(),
        location,
    })
}

pub fn list_stations(conn: &Connection, group_id: GroupId) -> Result<Vec<Station>, ServerError> {
    let mut stmt = conn
        .prepare(
            "select id, group_id, name, latitude, longitude from stations where group_id = ? order by id",
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![group_id], station_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut stations = Vec::new();
    for r in rows {
        stations.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(stations)
}

/// Stations of every group, for catalog maintenance.
pub fn all_stations(conn: &Connection) -> Result<Vec<Station>, ServerError> {
    let mut stmt = conn
        .prepare("select id, group_id, name, latitude, longitude from stations order by id")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], station_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut stations = Vec::new();
    for r in rows {
        stations.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(stations)
}

pub fn find_station(
    conn: &Connection,
    group_id: GroupId,
    station_id: StationId,
) -> Result<Option<Station>, ServerError> {
    conn.query_row(
        "select id, group_id, name, latitude, longitude from stations where id = ? and group_id = ?",
        params![station_id, group_id],
        station_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select station failed: {e}")))
}

/// Deletes a station of the group. Its cached isochrone goes with it
/// (foreign key cascade).
pub fn delete_station(
    conn: &Connection,
    group_id: GroupId,
    station_id: StationId,
) -> Result<bool, ServerError> {
    let deleted = conn
        .execute(
            "delete from stations where id = ? and group_id = ?",
            params![station_id, group_id],
        )
        .map_err(|e| ServerError::DbError(format!("delete station failed: {e}")))?;
    Ok(deleted == 1)
}

/// Moves a station and drops its cached isochrone in the same transaction,
/// so the next map view fetches polygons for the new position.
pub fn relocate_station(
    conn: &mut Connection,
    station_id: StationId,
    location: Coordinates,
) -> Result<bool, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let updated = tx
        .execute(
            "update stations set latitude = ?, longitude = ? where id = ?",
            params![location.lat, location.lon, station_id],
        )
        .map_err(|e| ServerError::DbError(format!("update station failed: {e}")))?;

    if updated != 1 {
        tx.rollback().ok();
        return Ok(false);
    }

    tx.execute(
        "delete from isochrone_cache where station_id = ?",
        params![station_id],
    )
    .map_err(|e| ServerError::DbError(format!("drop cached isochrone failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    Ok(true)
}
