// src/db/catalog.rs
use crate::catalog::CatalogLine;
use crate::domain::models::Coordinates;
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

/// Replace the whole catalog in one transaction. Lines and stations keep
/// their list position as sort order. Returns the number of stations saved.
pub fn replace_catalog(conn: &mut Connection, lines: &[CatalogLine]) -> Result<usize, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    tx.execute("delete from catalog_lines", [])
        .map_err(|e| ServerError::DbError(format!("clear catalog failed: {e}")))?;

    let mut saved = 0;
    for (i, line) in lines.iter().enumerate() {
        tx.execute(
            "insert into catalog_lines (name, sort_order) values (?, ?)",
            params![line.name, i as i64],
        )
        .map_err(|e| ServerError::DbError(format!("insert line failed: {e}")))?;
        let line_id = tx.last_insert_rowid();

        for (j, st) in line.stations.iter().enumerate() {
            tx.execute(
                r#"
                insert into catalog_stations (line_id, name, latitude, longitude, sort_order)
                values (?, ?, ?, ?, ?)
                "#,
                params![line_id, st.name, st.location.lat, st.location.lon, j as i64],
            )
            .map_err(|e| ServerError::DbError(format!("insert catalog station failed: {e}")))?;
            saved += 1;
        }
    }

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    Ok(saved)
}

/// Coordinates of the first catalog station with exactly this name,
/// in line order.
pub fn find_catalog_station(conn: &Connection, name: &str) -> Result<Option<Coordinates>, ServerError> {
    conn.query_row(
        r#"
        select s.latitude, s.longitude
        from catalog_stations s
        join catalog_lines l on l.id = s.line_id
        where s.name = ?
        order by l.sort_order, s.sort_order
        limit 1
        "#,
        params![name],
        |r| Ok(Coordinates::new(r.get(0)?, r.get(1)?)),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select catalog station failed: {e}")))
}

/// Distinct station names for form suggestions.
pub fn catalog_station_names(conn: &Connection, limit: usize) -> Result<Vec<String>, ServerError> {
    let mut stmt = conn
        .prepare("select distinct name from catalog_stations order by name limit ?")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![limit as i64], |row| row.get::<_, String>(0))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut names = Vec::new();
    for r in rows {
        names.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(names)
}
