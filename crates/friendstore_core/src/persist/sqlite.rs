//! SQLite record source.
//!
//! # Responsibility
//! - Map the record mapping onto `users` + `user_friends` rows.
//!
//! # Invariants
//! - `user_friends.position` preserves friend order and duplicates.
//! - `save_all` replaces every row inside one transaction.
//! - Read paths reject rows that fail record format checks.

use crate::db::{open_db, open_db_in_memory};
use crate::model::record::{Record, RecordId};
use crate::persist::{PersistError, PersistResult, RecordSource};
use crate::store::document_store::RecordMap;
use rusqlite::{params, Connection};
use std::path::Path;

/// Record source backed by a migrated SQLite connection.
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Opens (or creates) a database file and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> PersistResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Underlying connection, for inspection in tests and tooling.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RecordSource for SqliteSource {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn load_all(&mut self) -> PersistResult<RecordMap> {
        let mut records = RecordMap::new();

        let mut users = self
            .conn
            .prepare("SELECT id, name, email, age FROM users ORDER BY id ASC;")?;
        let mut rows = users.query([])?;
        while let Some(row) = rows.next()? {
            let id: String = row.get("id")?;
            let age = match row.get::<_, Option<i64>>("age")? {
                Some(value) => Some(u64::try_from(value).map_err(|_| {
                    PersistError::InvalidData(format!("negative age `{value}` in users.age"))
                })?),
                None => None,
            };
            let record = Record {
                name: row.get("name")?,
                email: row.get("email")?,
                age,
                friends: Vec::new(),
            };
            record
                .check_format()
                .map_err(|source| PersistError::InvalidRecord {
                    id: id.clone(),
                    source,
                })?;
            records.insert(RecordId::new(id), record);
        }

        let mut friends = self.conn.prepare(
            "SELECT user_id, friend_id FROM user_friends ORDER BY user_id ASC, position ASC;",
        )?;
        let mut rows = friends.query([])?;
        while let Some(row) = rows.next()? {
            let user_id: String = row.get("user_id")?;
            let friend_id: String = row.get("friend_id")?;
            let owner = records.get_mut(user_id.as_str()).ok_or_else(|| {
                PersistError::InvalidData(format!(
                    "user_friends row references unknown user `{user_id}`"
                ))
            })?;
            owner.friends.push(RecordId::new(friend_id));
        }

        Ok(records)
    }

    fn save_all(&mut self, records: &RecordMap) -> PersistResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM user_friends;", [])?;
        tx.execute("DELETE FROM users;", [])?;

        {
            let mut insert_user =
                tx.prepare("INSERT INTO users (id, name, email, age) VALUES (?1, ?2, ?3, ?4);")?;
            let mut insert_friend = tx.prepare(
                "INSERT INTO user_friends (user_id, position, friend_id) VALUES (?1, ?2, ?3);",
            )?;

            for (id, record) in records {
                let age = record
                    .age
                    .map(i64::try_from)
                    .transpose()
                    .map_err(|_| PersistError::InvalidData(format!("age out of range for `{id}`")))?;
                insert_user.execute(params![
                    id.as_str(),
                    record.name.as_str(),
                    record.email.as_str(),
                    age
                ])?;

                for (position, friend) in record.friends.iter().enumerate() {
                    let position = i64::try_from(position).map_err(|_| {
                        PersistError::InvalidData(format!("friends list too long for `{id}`"))
                    })?;
                    insert_friend.execute(params![id.as_str(), position, friend.as_str()])?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }
}
