// src/db/properties.rs
use std::collections::{BTreeSet, HashMap};

use crate::domain::models::{Coordinates, GroupId, NewProperty, Property, PropertyId, UserId};
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension, Row};

const PROPERTY_COLUMNS: &str =
    "id, group_id, name, address, rent, latitude, longitude, created_at";

fn property_from_row(row: &Row<'_>) -> rusqlite::Result<Property> {
    Ok(Property {
        id: row.get(0)?,
        group_id: row.get(1)?,
        name: row.get(2)?,
        address: row.get(3)?,
        rent: row.get(4)?,
        location: Coordinates::new(row.get(5)?, row.get(6)?),
        created_at: row.get(7)?,
    })
}

/// Persist a property. Coordinates are required: a property is only ever
/// stored after its address resolved.
pub fn insert_property(
    conn: &Connection,
    group_id: GroupId,
    input: &NewProperty,
    location: Coordinates,
    now: i64,
) -> Result<Property, ServerError> {
    conn.execute(
        r#"
        insert into properties (group_id, name, address, rent, latitude, longitude, created_at)
        values (?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            group_id,
            input.name,
            input.address,
            input.rent,
            location.lat,
            location.lon,
            now
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert property failed: {e}")))?;

    Ok(Property {
        id: conn.last_insert_rowid(),
        group_id,
        name: input.name.clone(),
        address: input.address.clone(),
        rent: input.rent.clone(),
        location,
        created_at: now,
    })
}

/// Newest first.
pub fn list_properties(conn: &Connection, group_id: GroupId) -> Result<Vec<Property>, ServerError> {
    let sql = format!(
        "select {PROPERTY_COLUMNS} from properties where group_id = ? order by created_at desc, id desc"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![group_id], property_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut props = Vec::new();
    for r in rows {
        props.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(props)
}

pub fn find_property(
    conn: &Connection,
    group_id: GroupId,
    property_id: PropertyId,
) -> Result<Option<Property>, ServerError> {
    let sql = format!("select {PROPERTY_COLUMNS} from properties where id = ? and group_id = ?");
    conn.query_row(&sql, params![property_id, group_id], property_from_row)
        .optional()
        .map_err(|e| ServerError::DbError(format!("select property failed: {e}")))
}

/// Who liked each property of the group, as (user id, username) pairs.
/// Properties nobody liked are absent from the map.
pub fn likers_for_group(
    conn: &Connection,
    group_id: GroupId,
) -> Result<HashMap<PropertyId, Vec<(UserId, String)>>, ServerError> {
    let mut stmt = conn
        .prepare(
            r#"
            select l.property_id, u.id, u.username
            from property_likes l
            join properties p on p.id = l.property_id
            join users u on u.id = l.user_id
            where p.group_id = ?
            order by l.property_id, u.username
            "#,
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![group_id], |row| {
            Ok((
                row.get::<_, PropertyId>(0)?,
                row.get::<_, UserId>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut likers: HashMap<PropertyId, Vec<(UserId, String)>> = HashMap::new();
    for r in rows {
        let (property_id, user_id, username) =
            r.map_err(|e| ServerError::DbError(e.to_string()))?;
        likers
            .entry(property_id)
            .or_default()
            .push((user_id, username));
    }
    Ok(likers)
}

pub fn liker_ids(conn: &Connection, property_id: PropertyId) -> Result<BTreeSet<UserId>, ServerError> {
    let mut stmt = conn
        .prepare("select user_id from property_likes where property_id = ?")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![property_id], |row| row.get::<_, UserId>(0))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut ids = BTreeSet::new();
    for r in rows {
        ids.insert(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(ids)
}
