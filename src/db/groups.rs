// src/db/groups.rs
use crate::auth::secret::HashedSecret;
use crate::domain::models::Group;
use crate::errors::ServerError;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

/// Insert a group. A taken name is reported as `Conflict`.
pub fn insert_group(
    conn: &Connection,
    name: &str,
    secret: &HashedSecret,
    now: i64,
) -> Result<Group, ServerError> {
    let inserted = conn.execute(
        "insert into map_groups (name, secret_salt, secret_hash, created_at) values (?, ?, ?, ?)",
        params![name, secret.salt, secret.hash, now],
    );

    match inserted {
        Ok(_) => Ok(Group {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        }),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation =>
        {
            Err(ServerError::Conflict(format!("group name \"{name}\" is taken")))
        }
        Err(e) => Err(ServerError::DbError(format!("insert group failed: {e}"))),
    }
}

/// Group plus its stored secret, looked up by exact name.
pub fn find_group_with_secret(
    conn: &Connection,
    name: &str,
) -> Result<Option<(Group, HashedSecret)>, ServerError> {
    conn.query_row(
        "select id, name, secret_salt, secret_hash from map_groups where name = ?",
        params![name],
        |row| {
            Ok((
                Group {
                    id: row.get(0)?,
                    name: row.get(1)?,
                },
                HashedSecret {
                    salt: row.get(2)?,
                    hash: row.get(3)?,
                },
            ))
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select group failed: {e}")))
}
