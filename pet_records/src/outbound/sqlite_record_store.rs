//! Implementation of RecordStore using the sqlite petstore database.

#[cfg(test)]
mod test;

use std::str::FromStr;

use anyhow::Context;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::domain::{
    model::{Flag, Owner, OwnerFields, OwnerId, Pet, PetFields, PetId, PetWithOwner},
    ports::{RecordStore, RecordTx},
};

/// The SqliteRecordStore struct is a wrapper around sqlx::SqlitePool.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    /// The underlying sqlx::SqlitePool
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Creates a new instance of SqliteRecordStore
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RecordStore for SqliteRecordStore {
    type Tx = SqliteRecordTx;

    async fn begin(&self) -> anyhow::Result<SqliteRecordTx> {
        // take the write lock up front, a deferred read lock cannot be upgraded under WAL
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .context("could not open a transaction")?;
        Ok(SqliteRecordTx { tx })
    }
}

/// An open sqlite transaction. Rolled back on drop unless committed.
pub struct SqliteRecordTx {
    tx: Transaction<'static, Sqlite>,
}

#[derive(sqlx::FromRow)]
struct OwnerRow {
    id: i64,
    name: String,
    phone: String,
}

impl From<OwnerRow> for Owner {
    fn from(row: OwnerRow) -> Self {
        Owner {
            id: OwnerId(row.id),
            name: row.name,
            phone: row.phone,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PetRow {
    id: i64,
    name: String,
    breed: String,
    color: String,
    allergic: String,
    special_attention: String,
    observations: String,
    owner_id: i64,
}

fn parse_flag(column: &str, value: &str) -> anyhow::Result<Flag> {
    Flag::from_str(value).with_context(|| format!("invalid {column} value {value:?}"))
}

impl TryFrom<PetRow> for Pet {
    type Error = anyhow::Error;

    fn try_from(row: PetRow) -> Result<Self, Self::Error> {
        Ok(Pet {
            id: PetId(row.id),
            allergic: parse_flag("allergic", &row.allergic)?,
            special_attention: parse_flag("special_attention", &row.special_attention)?,
            name: row.name,
            breed: row.breed,
            color: row.color,
            observations: row.observations,
            owner_id: OwnerId(row.owner_id),
        })
    }
}

#[derive(sqlx::FromRow)]
struct PetWithOwnerRow {
    #[sqlx(flatten)]
    pet: PetRow,
    owner_name: String,
    owner_phone: String,
}

impl TryFrom<PetWithOwnerRow> for PetWithOwner {
    type Error = anyhow::Error;

    fn try_from(row: PetWithOwnerRow) -> Result<Self, Self::Error> {
        let owner = Owner {
            id: OwnerId(row.pet.owner_id),
            name: row.owner_name,
            phone: row.owner_phone,
        };
        Ok(PetWithOwner {
            pet: row.pet.try_into()?,
            owner,
        })
    }
}

impl RecordTx for SqliteRecordTx {
    async fn insert_owner(&mut self, fields: OwnerFields) -> anyhow::Result<Owner> {
        let row = sqlx::query_as::<_, OwnerRow>(
            r#"
            INSERT INTO owners (name, phone)
            VALUES (?, ?)
            RETURNING id, name, phone
            "#,
        )
        .bind(fields.name)
        .bind(fields.phone)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row.into())
    }

    async fn find_owner(&mut self, id: OwnerId) -> anyhow::Result<Option<Owner>> {
        let row = sqlx::query_as::<_, OwnerRow>(
            r#"
            SELECT id, name, phone
            FROM owners
            WHERE id = ?
            "#,
        )
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Owner::from))
    }

    async fn update_owner(&mut self, owner: Owner) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE owners
            SET name = ?, phone = ?
            WHERE id = ?
            "#,
        )
        .bind(owner.name)
        .bind(owner.phone)
        .bind(owner.id.0)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn delete_owner(&mut self, id: OwnerId) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM owners WHERE id = ?")
            .bind(id.0)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_owners(&mut self) -> anyhow::Result<Vec<Owner>> {
        let rows = sqlx::query_as::<_, OwnerRow>(
            r#"
            SELECT id, name, phone
            FROM owners
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(rows.into_iter().map(Owner::from).collect())
    }

    async fn insert_pet(&mut self, fields: PetFields, owner_id: OwnerId) -> anyhow::Result<Pet> {
        let row = sqlx::query_as::<_, PetRow>(
            r#"
            INSERT INTO pets (name, breed, color, allergic, special_attention, observations, owner_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, breed, color, allergic, special_attention, observations, owner_id
            "#,
        )
        .bind(fields.name)
        .bind(fields.breed)
        .bind(fields.color)
        .bind(fields.allergic.to_string())
        .bind(fields.special_attention.to_string())
        .bind(fields.observations)
        .bind(owner_id.0)
        .fetch_one(&mut *self.tx)
        .await?;

        row.try_into()
    }

    async fn find_pet(&mut self, id: PetId) -> anyhow::Result<Option<Pet>> {
        let row = sqlx::query_as::<_, PetRow>(
            r#"
            SELECT id, name, breed, color, allergic, special_attention, observations, owner_id
            FROM pets
            WHERE id = ?
            "#,
        )
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;

        row.map(Pet::try_from).transpose()
    }

    async fn update_pet(&mut self, pet: Pet) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE pets
            SET name = ?, breed = ?, color = ?, allergic = ?, special_attention = ?, observations = ?
            WHERE id = ?
            "#,
        )
        .bind(pet.name)
        .bind(pet.breed)
        .bind(pet.color)
        .bind(pet.allergic.to_string())
        .bind(pet.special_attention.to_string())
        .bind(pet.observations)
        .bind(pet.id.0)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn delete_pet(&mut self, id: PetId) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM pets WHERE id = ?")
            .bind(id.0)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_pets(&mut self) -> anyhow::Result<Vec<PetWithOwner>> {
        let rows = sqlx::query_as::<_, PetWithOwnerRow>(
            r#"
            SELECT
                p.id,
                p.name,
                p.breed,
                p.color,
                p.allergic,
                p.special_attention,
                p.observations,
                p.owner_id,
                o.name AS owner_name,
                o.phone AS owner_phone
            FROM pets p
            JOIN owners o ON o.id = p.owner_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;

        rows.into_iter().map(PetWithOwner::try_from).collect()
    }

    async fn count_pets_by_owner(&mut self, owner_id: OwnerId) -> anyhow::Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pets WHERE owner_id = ?")
            .bind(owner_id.0)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(u64::try_from(count)?)
    }

    async fn commit(self) -> anyhow::Result<()> {
        self.tx
            .commit()
            .await
            .context("could not commit transaction")
    }
}
