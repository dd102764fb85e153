//! Phonebook entry repository.
//!
//! Entry rows only hold the description. Member numbers are loaded from the
//! phone number table, which owns the link column.

use super::{CrudRepository, DbError, PhoneNumberRepository, Sort};
use crate::domain::{Entity, PhoneNumber, PhonebookEntry};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Repository for phonebook entry operations.
pub struct PhonebookEntryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PhonebookEntryRepository<'a> {
    /// Create a new phonebook entry repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Id -> member numbers, for every entry that has at least one.
    async fn members_by_entry(&self) -> Result<HashMap<i64, Vec<PhoneNumber>>, DbError> {
        let rows = sqlx::query_as::<_, (i64, String, i64)>(
            r#"
            SELECT id, number, phonebook_entry_id
            FROM phone_number
            WHERE phonebook_entry_id IS NOT NULL
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        let mut members: HashMap<i64, Vec<PhoneNumber>> = HashMap::new();
        for (id, number, entry_id) in rows {
            members
                .entry(entry_id)
                .or_default()
                .push(PhoneNumber::new(number).with_id(id));
        }
        Ok(members)
    }
}

fn assemble(id: i64, description: String, members: Vec<PhoneNumber>) -> PhonebookEntry {
    let mut entry = PhonebookEntry::new(description).with_id(id);
    entry.set_phone_numbers(members);
    entry
}

#[async_trait]
impl<'a> CrudRepository for PhonebookEntryRepository<'a> {
    type Entity = PhonebookEntry;

    const SORT_COLUMNS: &'static [(&'static str, &'static str)] =
        &[("id", "id"), ("description", "description")];

    async fn save(&self, entry: PhonebookEntry) -> Result<PhonebookEntry, DbError> {
        let id = match entry.id() {
            Some(id) => {
                let result = sqlx::query("UPDATE phonebook_entry SET description = ? WHERE id = ?")
                    .bind(entry.description())
                    .bind(id)
                    .execute(self.pool)
                    .await?;

                if result.rows_affected() == 0 {
                    return Err(DbError::NotFound {
                        entity: PhonebookEntry::ENTITY_NAME,
                        id,
                    });
                }
                id
            }
            None => {
                let result = sqlx::query("INSERT INTO phonebook_entry (description) VALUES (?)")
                    .bind(entry.description())
                    .execute(self.pool)
                    .await?;
                result.last_insert_rowid()
            }
        };

        // Membership is stored on the number side; report what storage holds.
        self.find_by_id(id).await?.ok_or(DbError::NotFound {
            entity: PhonebookEntry::ENTITY_NAME,
            id,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PhonebookEntry>, DbError> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, description FROM phonebook_entry WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some((id, description)) = row else {
            return Ok(None);
        };

        let members = PhoneNumberRepository::new(self.pool)
            .find_by_entry(id)
            .await?;
        Ok(Some(assemble(id, description, members)))
    }

    async fn find_all(&self, sort: &Sort) -> Result<Vec<PhonebookEntry>, DbError> {
        let rows = sqlx::query_as::<_, (i64, String)>(&format!(
            "SELECT e.id, e.description FROM phonebook_entry e {}",
            sort.order_by("e")
        ))
        .fetch_all(self.pool)
        .await?;

        let mut members = self.members_by_entry().await?;
        Ok(rows
            .into_iter()
            .map(|(id, description)| {
                assemble(id, description, members.remove(&id).unwrap_or_default())
            })
            .collect())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, DbError> {
        let matches: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM phonebook_entry WHERE id = ?")
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(matches > 0)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DbError> {
        // Member numbers are unlinked via ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM phonebook_entry WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM phonebook_entry")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
