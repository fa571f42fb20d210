// src/db/likes.rs
use crate::domain::models::{PropertyId, UserId};
use crate::errors::ServerError;
use rusqlite::{params, Connection, TransactionBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Liked,
    Unliked,
}

impl LikeState {
    pub fn as_str(self) -> &'static str {
        match self {
            LikeState::Liked => "liked",
            LikeState::Unliked => "unliked",
        }
    }
}

/// Flip the user's like on a property.
///
/// Runs as an IMMEDIATE transaction: concurrent toggles are serialized.
pub fn toggle_like(
    conn: &mut Connection,
    user_id: UserId,
    property_id: PropertyId,
    now: i64,
) -> Result<LikeState, ServerError> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let removed = tx
        .execute(
            "delete from property_likes where user_id = ? and property_id = ?",
            params![user_id, property_id],
        )
        .map_err(|e| ServerError::DbError(format!("delete like failed: {e}")))?;

    let state = if removed > 0 {
        LikeState::Unliked
    } else {
        tx.execute(
            "insert into property_likes (user_id, property_id, created_at) values (?, ?, ?)",
            params![user_id, property_id, now],
        )
        .map_err(|e| ServerError::DbError(format!("insert like failed: {e}")))?;
        LikeState::Liked
    };

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    Ok(state)
}
