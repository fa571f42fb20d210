// src/db/users.rs
use std::collections::BTreeSet;

use crate::domain::models::{Group, GroupId, Membership, User, UserId};
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

/// Register the user on first sight and return them with their membership.
/// New users start out unassigned.
pub fn ensure_user(conn: &Connection, username: &str, now: i64) -> Result<User, ServerError> {
    conn.execute(
        "insert or ignore into users (username, group_id, created_at) values (?, null, ?)",
        params![username, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert user failed: {e}")))?;

    let id: i64 = conn
        .query_row(
            "select id from users where username = ?",
            params![username],
            |row| row.get(0),
        )
        .map_err(|e| ServerError::DbError(format!("select user id failed: {e}")))?;

    load_user(conn, id)?.ok_or(ServerError::InternalError)
}

pub fn load_user(conn: &Connection, user_id: UserId) -> Result<Option<User>, ServerError> {
    conn.query_row(
        r#"
        select u.id, u.username, g.id, g.name
        from users u
        left join map_groups g on g.id = u.group_id
        where u.id = ?
        "#,
        params![user_id],
        |row| {
            let group_id: Option<GroupId> = row.get(2)?;
            let group_name: Option<String> = row.get(3)?;
            let membership = match (group_id, group_name) {
                (Some(id), Some(name)) => Membership::Member(Group { id, name }),
                _ => Membership::Unassigned,
            };
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                membership,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("load user failed: {e}")))
}

pub fn set_group(conn: &Connection, user_id: UserId, group_id: GroupId) -> Result<(), ServerError> {
    conn.execute(
        "update users set group_id = ? where id = ?",
        params![group_id, user_id],
    )
    .map_err(|e| ServerError::DbError(format!("set user group failed: {e}")))?;
    Ok(())
}

/// Returns true when the user had a group to leave.
pub fn clear_group(conn: &Connection, user_id: UserId) -> Result<bool, ServerError> {
    let changed = conn
        .execute(
            "update users set group_id = null where id = ? and group_id is not null",
            params![user_id],
        )
        .map_err(|e| ServerError::DbError(format!("clear user group failed: {e}")))?;
    Ok(changed == 1)
}

pub fn member_ids(conn: &Connection, group_id: GroupId) -> Result<BTreeSet<UserId>, ServerError> {
    let mut stmt = conn
        .prepare("select id from users where group_id = ?")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![group_id], |row| row.get::<_, i64>(0))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut ids = BTreeSet::new();
    for r in rows {
        ids.insert(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(ids)
}

pub fn member_usernames(conn: &Connection, group_id: GroupId) -> Result<Vec<String>, ServerError> {
    let mut stmt = conn
        .prepare("select username from users where group_id = ? order by username")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![group_id], |row| row.get::<_, String>(0))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut names = Vec::new();
    for r in rows {
        names.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(names)
}
