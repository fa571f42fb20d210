// src/db/isochrones.rs
use crate::domain::models::StationId;
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

/// Live cached polygon JSON for the station. An expired row is deleted
/// on the way out and reported as a miss.
pub fn get_cached(
    conn: &Connection,
    station_id: StationId,
    now: i64,
) -> Result<Option<String>, ServerError> {
    let row: Option<(String, i64)> = conn
        .query_row(
            "select polygon_json, expires_at from isochrone_cache where station_id = ?",
            params![station_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select cached isochrone failed: {e}")))?;

    match row {
        Some((json, expires_at)) if expires_at > now => Ok(Some(json)),
        Some(_) => {
            conn.execute(
                "delete from isochrone_cache where station_id = ? and expires_at <= ?",
                params![station_id, now],
            )
            .map_err(|e| ServerError::DbError(format!("expire cached isochrone failed: {e}")))?;
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Atomic upsert. A live entry is never overwritten; the return value says
/// whether this call stored anything.
pub fn put_cached(
    conn: &Connection,
    station_id: StationId,
    polygon_json: &str,
    now: i64,
    expires_at: i64,
) -> Result<bool, ServerError> {
    let changed = conn
        .execute(
            r#"
            insert into isochrone_cache (station_id, polygon_json, fetched_at, expires_at)
            values (?, ?, ?, ?)
            on conflict(station_id) do update set
                polygon_json = excluded.polygon_json,
                fetched_at = excluded.fetched_at,
                expires_at = excluded.expires_at
            where isochrone_cache.expires_at <= excluded.fetched_at
            "#,
            params![station_id, polygon_json, now, expires_at],
        )
        .map_err(|e| ServerError::DbError(format!("upsert cached isochrone failed: {e}")))?;
    Ok(changed == 1)
}

pub fn purge_expired(conn: &Connection, now: i64) -> Result<usize, ServerError> {
    conn.execute(
        "delete from isochrone_cache where expires_at <= ?",
        params![now],
    )
    .map_err(|e| ServerError::DbError(format!("purge cached isochrones failed: {e}")))
}
