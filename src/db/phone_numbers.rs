//! Phone number repository.

use super::{CrudRepository, DbError, Sort};
use crate::domain::{Entity, PhoneNumber, PhonebookEntryRef};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Row shape: number id, number, linked entry id, linked entry description.
type PhoneNumberRow = (i64, String, Option<i64>, Option<String>);

const SELECT_PHONE_NUMBER: &str = r#"
    SELECT n.id, n.number, e.id, e.description
    FROM phone_number n
    LEFT JOIN phonebook_entry e ON e.id = n.phonebook_entry_id
"#;

fn from_row((id, number, entry_id, entry_description): PhoneNumberRow) -> PhoneNumber {
    let entry = entry_id.map(|entry_id| PhonebookEntryRef {
        id: Some(entry_id),
        description: entry_description,
    });
    PhoneNumber::new(number).with_id(id).with_phonebook_entry(entry)
}

/// Repository for phone number operations.
pub struct PhoneNumberRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PhoneNumberRepository<'a> {
    /// Create a new phone number repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Numbers linked to the given entry, by id.
    pub async fn find_by_entry(&self, entry_id: i64) -> Result<Vec<PhoneNumber>, DbError> {
        let rows = sqlx::query_as::<_, PhoneNumberRow>(&format!(
            "{SELECT_PHONE_NUMBER} WHERE n.phonebook_entry_id = ? ORDER BY n.id ASC"
        ))
        .bind(entry_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn insert(&self, number: &PhoneNumber) -> Result<i64, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO phone_number (number, phonebook_entry_id)
            VALUES (?, ?)
            "#,
        )
        .bind(number.number())
        .bind(number.phonebook_entry_id())
        .execute(self.pool)
        .await
        .map_err(|e| DbError::on_write(PhoneNumber::ENTITY_NAME, e))?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, number: &PhoneNumber) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE phone_number
            SET number = ?, phonebook_entry_id = ?
            WHERE id = ?
            "#,
        )
        .bind(number.number())
        .bind(number.phonebook_entry_id())
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| DbError::on_write(PhoneNumber::ENTITY_NAME, e))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                entity: PhoneNumber::ENTITY_NAME,
                id,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<'a> CrudRepository for PhoneNumberRepository<'a> {
    type Entity = PhoneNumber;

    const SORT_COLUMNS: &'static [(&'static str, &'static str)] =
        &[("id", "id"), ("number", "number")];

    async fn save(&self, number: PhoneNumber) -> Result<PhoneNumber, DbError> {
        let id = match number.id() {
            Some(id) => {
                self.update(id, &number).await?;
                id
            }
            None => self.insert(&number).await?,
        };

        // Re-read so the entry reference carries its description.
        self.find_by_id(id).await?.ok_or(DbError::NotFound {
            entity: PhoneNumber::ENTITY_NAME,
            id,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PhoneNumber>, DbError> {
        let row =
            sqlx::query_as::<_, PhoneNumberRow>(&format!("{SELECT_PHONE_NUMBER} WHERE n.id = ?"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(from_row))
    }

    async fn find_all(&self, sort: &Sort) -> Result<Vec<PhoneNumber>, DbError> {
        let rows = sqlx::query_as::<_, PhoneNumberRow>(&format!(
            "{SELECT_PHONE_NUMBER} {}",
            sort.order_by("n")
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, DbError> {
        let matches: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM phone_number WHERE id = ?")
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(matches > 0)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM phone_number WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM phone_number")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
