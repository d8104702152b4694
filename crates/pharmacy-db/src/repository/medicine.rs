//! # Medicine Repository
//!
//! CRUD for medicines. Stock only changes here through an explicit patch;
//! purchases and sales move it in their own repositories.
//!
//! ## Patch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── UPDATE medicines SET updated_at = now WHERE id = ?   (write lock) │
//! │   │      0 rows → NotFound                                              │
//! │   ├── SELECT * FROM medicines WHERE id = ?                              │
//! │   ├── patch.apply_to(&mut row)                     (pharmacy-core)      │
//! │   └── UPDATE medicines SET <every column> RETURNING *                   │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The read happens under the write lock, so a concurrent sale cannot    │
//! │  slip in between read and write and have its decrement overwritten.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pharmacy_core::{Medicine, MedicinePatch, NewMedicine};

/// Repository for medicine database operations.
#[derive(Debug, Clone)]
pub struct MedicineRepository {
    pool: SqlitePool,
}

impl MedicineRepository {
    /// Creates a new MedicineRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MedicineRepository { pool }
    }

    /// Lists every medicine, newest first.
    pub async fn list(&self) -> DbResult<Vec<Medicine>> {
        let medicines = sqlx::query_as::<_, Medicine>(
            r#"
            SELECT id, name, description, manufacturer, category, price_cents,
                   quantity, expiry_date, requires_prescription, created_at, updated_at
            FROM medicines
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = medicines.len(), "Listed medicines");
        Ok(medicines)
    }

    /// Gets a medicine by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Medicine))` - Medicine found
    /// * `Ok(None)` - Medicine not found
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Medicine>> {
        debug!(id = %id, "Getting medicine by ID");

        let medicine = sqlx::query_as::<_, Medicine>(
            r#"
            SELECT id, name, description, manufacturer, category, price_cents,
                   quantity, expiry_date, requires_prescription, created_at, updated_at
            FROM medicines
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(medicine)
    }

    /// Gets a medicine by its ID, failing with `NotFound` when absent.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Medicine> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Medicine", id))
    }

    /// Inserts a new medicine and returns the stored row.
    ///
    /// The caller is expected to have run `NewMedicine::validate`; it is run
    /// again here so no unvalidated row reaches the table.
    pub async fn create(&self, new: &NewMedicine) -> DbResult<Medicine> {
        new.validate()?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, name = %new.name, "Inserting medicine");

        let medicine = sqlx::query_as::<_, Medicine>(
            r#"
            INSERT INTO medicines (
                id, name, description, manufacturer, category, price_cents,
                quantity, expiry_date, requires_prescription, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            RETURNING id, name, description, manufacturer, category, price_cents,
                      quantity, expiry_date, requires_prescription, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(new.name.trim())
        .bind(&new.description)
        .bind(&new.manufacturer)
        .bind(&new.category)
        .bind(new.price.cents())
        .bind(new.quantity)
        .bind(new.expiry_date)
        .bind(new.requires_prescription)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(id = %medicine.id, name = %medicine.name, "Medicine created");
        Ok(medicine)
    }

    /// Merges a patch onto the stored medicine and writes the result.
    ///
    /// ## Errors
    /// * `Domain(Validation(EmptyPatch))` - Patch carries no fields
    /// * `NotFound` - No medicine with that ID
    pub async fn update(&self, id: &str, patch: &MedicinePatch) -> DbResult<Medicine> {
        patch.validate()?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE medicines SET updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        if touched.rows_affected() == 0 {
            return Err(DbError::not_found("Medicine", id));
        }

        let mut medicine = sqlx::query_as::<_, Medicine>(
            r#"
            SELECT id, name, description, manufacturer, category, price_cents,
                   quantity, expiry_date, requires_prescription, created_at, updated_at
            FROM medicines
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        patch.apply_to(&mut medicine);

        let medicine = sqlx::query_as::<_, Medicine>(
            r#"
            UPDATE medicines SET
                name = ?2,
                description = ?3,
                manufacturer = ?4,
                category = ?5,
                price_cents = ?6,
                quantity = ?7,
                expiry_date = ?8,
                requires_prescription = ?9,
                updated_at = ?10
            WHERE id = ?1
            RETURNING id, name, description, manufacturer, category, price_cents,
                      quantity, expiry_date, requires_prescription, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&medicine.name)
        .bind(&medicine.description)
        .bind(&medicine.manufacturer)
        .bind(&medicine.category)
        .bind(medicine.price_cents)
        .bind(medicine.quantity)
        .bind(medicine.expiry_date)
        .bind(medicine.requires_prescription)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %id, "Medicine updated");
        Ok(medicine)
    }

    /// Deletes a medicine that no purchase or sale references.
    ///
    /// ## Errors
    /// * `NotFound` - No medicine with that ID
    /// * `InUse` - Ledger lines reference the medicine
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM medicines WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::ForeignKeyViolation { .. } => DbError::InUse {
                    entity: "Medicine".to_string(),
                    id: id.to_string(),
                },
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Medicine", id));
        }

        info!(id = %id, "Medicine deleted");
        Ok(())
    }

    /// Counts medicines.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medicines")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
