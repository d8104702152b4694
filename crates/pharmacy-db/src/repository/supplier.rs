//! # Supplier Repository
//!
//! CRUD for suppliers. Patches follow the same lock-read-merge-write
//! sequence as medicines.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pharmacy_core::{NewSupplier, Supplier, SupplierPatch};

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists every supplier, newest first.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact_person, phone, email, address, created_at, updated_at
            FROM suppliers
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = suppliers.len(), "Listed suppliers");
        Ok(suppliers)
    }

    /// Gets a supplier by its ID, `None` when absent.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        debug!(id = %id, "Getting supplier by ID");

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact_person, phone, email, address, created_at, updated_at
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Gets a supplier by its ID, failing with `NotFound` when absent.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Supplier> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))
    }

    /// Inserts a new supplier and returns the stored row.
    pub async fn create(&self, new: &NewSupplier) -> DbResult<Supplier> {
        new.validate()?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, name = %new.name, "Inserting supplier");

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (
                id, name, contact_person, phone, email, address, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            RETURNING id, name, contact_person, phone, email, address, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(new.name.trim())
        .bind(&new.contact_person)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.address)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(id = %supplier.id, name = %supplier.name, "Supplier created");
        Ok(supplier)
    }

    /// Merges a patch onto the stored supplier and writes the result.
    pub async fn update(&self, id: &str, patch: &SupplierPatch) -> DbResult<Supplier> {
        patch.validate()?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE suppliers SET updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        if touched.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        let mut supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact_person, phone, email, address, created_at, updated_at
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        patch.apply_to(&mut supplier);

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers SET
                name = ?2,
                contact_person = ?3,
                phone = ?4,
                email = ?5,
                address = ?6,
                updated_at = ?7
            WHERE id = ?1
            RETURNING id, name, contact_person, phone, email, address, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&supplier.name)
        .bind(&supplier.contact_person)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(&supplier.address)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %id, "Supplier updated");
        Ok(supplier)
    }

    /// Deletes a supplier that no purchase references.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::ForeignKeyViolation { .. } => DbError::InUse {
                    entity: "Supplier".to_string(),
                    id: id.to_string(),
                },
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        info!(id = %id, "Supplier deleted");
        Ok(())
    }

    /// Counts suppliers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{memory_db, supplier};

    #[tokio::test]
    async fn test_create_get_list() {
        let db = memory_db().await;
        let created = supplier(&db).await;

        let fetched = db.suppliers().get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.contact_person.as_deref(), Some("Dana Reyes"));

        let listed = db.suppliers().list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(db.suppliers().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_untouched_fields() {
        let db = memory_db().await;
        let created = supplier(&db).await;

        let patch = SupplierPatch {
            address: Some("12 Harbour Road".to_string()),
            ..Default::default()
        };
        let updated = db.suppliers().update(&created.id, &patch).await.unwrap();

        assert_eq!(updated.address.as_deref(), Some("12 Harbour Road"));
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.email, created.email);
    }

    #[tokio::test]
    async fn test_missing_supplier() {
        let db = memory_db().await;

        assert!(db.suppliers().find_by_id("nope").await.unwrap().is_none());

        let patch = SupplierPatch {
            phone: Some("1".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            db.suppliers().update("nope", &patch).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            db.suppliers().delete("nope").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
