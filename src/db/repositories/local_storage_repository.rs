use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

/// One key of the origin-scoped key/value store.
#[derive(Debug, Clone)]
pub struct LocalStorageRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

impl TryFrom<&Row<'_>> for LocalStorageRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            key: row.get("key")?,
            value: row.get("value")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Raw SQL access to `local_storage`. Errors are returned as `rusqlite::Error` so the
/// storage layer can classify them (quota, unavailable) before they become `AppError`s.
pub struct LocalStorageRepository;

impl LocalStorageRepository {
    pub fn get(conn: &Connection, key: &str) -> rusqlite::Result<Option<LocalStorageRow>> {
        let mut stmt =
            conn.prepare("SELECT key, value, updated_at FROM local_storage WHERE key = ?1")?;

        stmt.query_row([key], |row| LocalStorageRow::try_from(row))
            .optional()
    }

    pub fn upsert(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
        conn.execute(
            r#"
                INSERT INTO local_storage (key, value)
                VALUES (:key, :value)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = CURRENT_TIMESTAMP
            "#,
            named_params! {":key": key, ":value": value},
        )?;

        Ok(())
    }

    pub fn delete(conn: &Connection, key: &str) -> rusqlite::Result<usize> {
        conn.execute("DELETE FROM local_storage WHERE key = ?1", [key])
    }

    /// Bytes held by every key except `excluding`, counted as key + value length.
    pub fn usage_bytes_excluding(conn: &Connection, excluding: &str) -> rusqlite::Result<u64> {
        let total: i64 = conn.query_row(
            r#"
                SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
                FROM local_storage
                WHERE key <> :key
            "#,
            named_params! {":key": excluding},
            |row| row.get(0),
        )?;

        Ok(total.max(0) as u64)
    }
}
