// src/db/test_support.rs
use rusqlite::Connection;

/// In-memory connection carrying the production schema.
pub fn memory_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(include_str!("../../sql/schema.sql"))
        .unwrap();
    conn
}

pub fn insert_group(conn: &Connection, name: &str) -> i64 {
    conn.execute(
        "insert into map_groups (name, secret_salt, secret_hash, created_at) values (?, 's', 'h', 0)",
        [name],
    )
    .unwrap();
    conn.last_insert_rowid()
}
