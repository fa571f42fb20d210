// isochrone/cache.rs
use std::time::Duration;

use crate::db::connection::Database;
use crate::db::isochrones;
use crate::domain::models::StationId;
use crate::errors::ServerError;
use crate::isochrone::PolygonSet;

/// Station id -> polygon set, persisted in SQLite with an expiry.
///
/// Expiry is checked at read time. Entries are write-once inside their
/// TTL window: a `put` over a live entry keeps the existing polygons.
#[derive(Clone)]
pub struct IsochroneCache {
    db: Database,
}

impl IsochroneCache {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn get(&self, station_id: StationId, now: i64) -> Result<Option<PolygonSet>, ServerError> {
        let Some(json) = self
            .db
            .with_conn(|conn| isochrones::get_cached(conn, station_id, now))?
        else {
            return Ok(None);
        };

        match PolygonSet::from_json(&json) {
            Ok(set) => Ok(Some(set)),
            Err(e) => {
                // Unreadable rows are treated as a miss and get replaced on the next put.
                tracing::warn!(station_id, error = %e, "discarding unreadable cached isochrone");
                self.db.with_conn(|conn| {
                    conn.execute(
                        "delete from isochrone_cache where station_id = ?",
                        rusqlite::params![station_id],
                    )
                    .map_err(|e| ServerError::DbError(format!("drop cached isochrone failed: {e}")))
                })?;
                Ok(None)
            }
        }
    }

    /// Returns whether the entry was stored (false when a live one exists).
    pub fn put(
        &self,
        station_id: StationId,
        set: &PolygonSet,
        ttl: Duration,
        now: i64,
    ) -> Result<bool, ServerError> {
        let json = set
            .to_json()
            .map_err(|e| ServerError::DbError(format!("encode isochrone failed: {e}")))?;
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires_at = now.saturating_add(ttl_secs);

        self.db
            .with_conn(|conn| isochrones::put_cached(conn, station_id, &json, now, expires_at))
    }

    pub fn purge_expired(&self, now: i64) -> Result<usize, ServerError> {
        self.db.with_conn(|conn| isochrones::purge_expired(conn, now))
    }
}
