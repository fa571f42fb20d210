// src/services/groups.rs
use crate::auth::secret::{hash_new_secret, verify_secret};
use crate::db::connection::Database;
use crate::db::{groups, users};
use crate::domain::models::{Group, User};
use crate::errors::ServerError;

pub const MAX_GROUP_NAME_LEN: usize = 100;
pub const MAX_SECRET_LEN: usize = 100;

fn validate(name: &str, secret: &str) -> Result<(), ServerError> {
    if name.is_empty() || secret.is_empty() {
        return Err(ServerError::BadRequest(
            "group name and secret are both required".into(),
        ));
    }
    if name.chars().count() > MAX_GROUP_NAME_LEN || secret.chars().count() > MAX_SECRET_LEN {
        return Err(ServerError::BadRequest(
            "group name and secret must be at most 100 characters".into(),
        ));
    }
    Ok(())
}

/// Create a group and make the user its first member. A user already in a
/// group moves to the new one.
pub fn create_group(
    db: &Database,
    user: &User,
    name: &str,
    secret: &str,
    now: i64,
) -> Result<Group, ServerError> {
    let name = name.trim();
    validate(name, secret)?;
    let hashed = hash_new_secret(secret);

    let group = db.with_conn(|conn| {
        let tx = conn
            .transaction()
            .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;
        let group = groups::insert_group(&tx, name, &hashed, now)?;
        users::set_group(&tx, user.id, group.id)?;
        tx.commit()
            .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;
        Ok(group)
    })?;

    tracing::info!(user = %user.username, group = %group.name, "group created");
    Ok(group)
}

/// Join an existing group by name and shared secret. Unknown names and
/// wrong secrets look the same to the caller.
pub fn join_group(
    db: &Database,
    user: &User,
    name: &str,
    secret: &str,
) -> Result<Group, ServerError> {
    let name = name.trim();
    if name.is_empty() || secret.is_empty() {
        return Err(ServerError::InvalidCredentials);
    }

    let group = db.with_conn(|conn| {
        let Some((group, stored)) = groups::find_group_with_secret(conn, name)? else {
            return Err(ServerError::InvalidCredentials);
        };
        if !verify_secret(&stored, secret) {
            return Err(ServerError::InvalidCredentials);
        }
        users::set_group(conn, user.id, group.id)?;
        Ok(group)
    });

    match &group {
        Ok(g) => tracing::info!(user = %user.username, group = %g.name, "joined group"),
        Err(ServerError::InvalidCredentials) => {
            tracing::info!(user = %user.username, "group join refused")
        }
        Err(_) => {}
    }
    group
}

/// Clear the user's group link. The group and its data stay.
pub fn leave_group(db: &Database, user: &User) -> Result<(), ServerError> {
    let left = db.with_conn(|conn| users::clear_group(conn, user.id))?;
    if left {
        tracing::info!(user = %user.username, "left group");
    }
    Ok(())
}
