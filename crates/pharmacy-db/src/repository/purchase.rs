//! # Purchase Repository
//!
//! Purchase-Intake: book stock received from a supplier.
//!
//! ## Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        record(&NewPurchase)                             │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── UPDATE medicines SET quantity = quantity + q       (write lock)   │
//! │   │     WHERE quantity <= MAX_STOCK_LEVEL - q                           │
//! │   │      0 rows ──► MedicineNotFound or StockLimitExceeded, rollback    │
//! │   ├── SELECT EXISTS(supplier)                                           │
//! │   │      false  ──► SupplierNotFound, rollback                          │
//! │   ├── INSERT INTO purchases (..., total = q × unit price) RETURNING *   │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Every early return drops the transaction, which rolls it back.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pharmacy_core::{CoreError, NewPurchase, Purchase, ValidationError, MAX_STOCK_LEVEL};

/// Repository for purchases.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Records a purchase and adds its quantity to the medicine's stock.
    ///
    /// Both writes commit together or not at all. The purchase row and the
    /// medicine's `updated_at` share one timestamp.
    ///
    /// ## Errors
    /// * `Domain(MedicineNotFound)` - Unknown medicine
    /// * `Domain(Validation(StockLimitExceeded))` - Stock would pass `MAX_STOCK_LEVEL`
    /// * `Domain(SupplierNotFound)` - Unknown supplier
    /// * `TransactionFailed` - Commit failed
    pub async fn record(&self, purchase: &NewPurchase) -> DbResult<Purchase> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(
            medicine_id = %purchase.medicine_id(),
            supplier_id = %purchase.supplier_id(),
            quantity = purchase.quantity(),
            "Recording purchase"
        );

        let mut tx = self.pool.begin().await?;

        // A write first, so the transaction holds the write lock from here on
        let stocked = sqlx::query(
            r#"
            UPDATE medicines
            SET quantity = quantity + ?1, updated_at = ?2
            WHERE id = ?3 AND quantity <= ?4 - ?1
            "#,
        )
        .bind(purchase.quantity())
        .bind(now)
        .bind(purchase.medicine_id())
        .bind(MAX_STOCK_LEVEL)
        .execute(&mut *tx)
        .await?;

        if stocked.rows_affected() == 0 {
            let current: Option<i64> =
                sqlx::query_scalar("SELECT quantity FROM medicines WHERE id = ?1")
                    .bind(purchase.medicine_id())
                    .fetch_optional(&mut *tx)
                    .await?;

            let err = match current {
                None => CoreError::MedicineNotFound(purchase.medicine_id().to_string()),
                Some(current) => CoreError::Validation(ValidationError::StockLimitExceeded {
                    current,
                    adding: purchase.quantity(),
                    max: MAX_STOCK_LEVEL,
                }),
            };

            debug!(error = %err, "Purchase rejected");
            return Err(err.into());
        }

        let supplier_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = ?1)")
                .bind(purchase.supplier_id())
                .fetch_one(&mut *tx)
                .await?;

        if !supplier_exists {
            return Err(CoreError::SupplierNotFound(purchase.supplier_id().to_string()).into());
        }

        let row = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (
                id, medicine_id, supplier_id, quantity, unit_price_cents, total_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, medicine_id, supplier_id, quantity, unit_price_cents, total_cents, created_at
            "#,
        )
        .bind(&id)
        .bind(purchase.medicine_id())
        .bind(purchase.supplier_id())
        .bind(purchase.quantity())
        .bind(purchase.unit_price().cents())
        .bind(purchase.total().cents())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            purchase_id = %row.id,
            medicine_id = %row.medicine_id,
            quantity = row.quantity,
            total = %row.total(),
            "Purchase recorded"
        );

        Ok(row)
    }

    /// Lists every purchase, newest first.
    pub async fn list(&self) -> DbResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, medicine_id, supplier_id, quantity, unit_price_cents, total_cents, created_at
            FROM purchases
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    /// Gets a purchase by ID, failing with `NotFound` when absent.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Purchase> {
        sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, medicine_id, supplier_id, quantity, unit_price_cents, total_cents, created_at
            FROM purchases
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Purchase", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{medicine, memory_db, supplier};
    use pharmacy_core::Money;

    const UNKNOWN_ID: &str = "00000000-0000-4000-8000-000000000000";

    fn purchase_of(medicine_id: &str, supplier_id: &str, qty: i64, unit_cents: i64) -> NewPurchase {
        NewPurchase::new(
            Some(medicine_id.to_string()),
            Some(supplier_id.to_string()),
            Some(qty),
            Some(unit_cents),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_purchase_increments_stock() {
        let db = memory_db().await;
        let med = medicine(&db, 500, 10).await;
        let sup = supplier(&db).await;

        let row = db
            .purchases()
            .record(&purchase_of(&med.id, &sup.id, 5, 400))
            .await
            .unwrap();

        assert_eq!(row.quantity, 5);
        assert_eq!(row.unit_price_cents, 400);
        assert_eq!(row.total(), Money::from_cents(2000));

        let after = db.medicines().get_by_id(&med.id).await.unwrap();
        assert_eq!(after.quantity, 15);
        assert_eq!(after.updated_at, row.created_at);
    }

    #[tokio::test]
    async fn test_unknown_medicine_changes_nothing() {
        let db = memory_db().await;
        let sup = supplier(&db).await;

        let result = db
            .purchases()
            .record(&purchase_of(UNKNOWN_ID, &sup.id, 5, 400))
            .await;

        assert!(matches!(
            result,
            Err(DbError::Domain(CoreError::MedicineNotFound(_)))
        ));
        assert!(db.purchases().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_supplier_rolls_back_stock() {
        let db = memory_db().await;
        let med = medicine(&db, 500, 10).await;

        let result = db
            .purchases()
            .record(&purchase_of(&med.id, UNKNOWN_ID, 5, 400))
            .await;

        assert!(matches!(
            result,
            Err(DbError::Domain(CoreError::SupplierNotFound(_)))
        ));

        // The increment ran first and must have been rolled back
        let after = db.medicines().get_by_id(&med.id).await.unwrap();
        assert_eq!(after.quantity, 10);
        assert_eq!(after.updated_at, med.updated_at);
        assert!(db.purchases().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purchase_past_stock_ceiling_is_refused() {
        let db = memory_db().await;
        let med = medicine(&db, 500, MAX_STOCK_LEVEL - 3).await;
        let sup = supplier(&db).await;

        let result = db
            .purchases()
            .record(&purchase_of(&med.id, &sup.id, 5, 100))
            .await;

        assert!(matches!(
            result,
            Err(DbError::Domain(CoreError::Validation(
                ValidationError::StockLimitExceeded { current, adding: 5, .. }
            ))) if current == MAX_STOCK_LEVEL - 3
        ));

        // Row is untouched and still readable through the typed listing
        let after = db.medicines().get_by_id(&med.id).await.unwrap();
        assert_eq!(after.quantity, MAX_STOCK_LEVEL - 3);
        assert_eq!(db.medicines().list().await.unwrap().len(), 1);
        assert!(db.purchases().list().await.unwrap().is_empty());

        // Filling up to the ceiling exactly is allowed
        db.purchases()
            .record(&purchase_of(&med.id, &sup.id, 3, 100))
            .await
            .unwrap();
        let full = db.medicines().get_by_id(&med.id).await.unwrap();
        assert_eq!(full.quantity, MAX_STOCK_LEVEL);
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let db = memory_db().await;
        let med = medicine(&db, 500, 0).await;
        let sup = supplier(&db).await;

        let first = db
            .purchases()
            .record(&purchase_of(&med.id, &sup.id, 1, 100))
            .await
            .unwrap();
        let second = db
            .purchases()
            .record(&purchase_of(&med.id, &sup.id, 2, 100))
            .await
            .unwrap();

        let listed = db.purchases().list().await.unwrap();
        assert_eq!(listed, vec![second, first.clone()]);

        assert_eq!(db.purchases().get_by_id(&first.id).await.unwrap(), first);
        assert!(matches!(
            db.purchases().get_by_id(UNKNOWN_ID).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_referenced_medicine_and_supplier_cannot_be_deleted() {
        let db = memory_db().await;
        let med = medicine(&db, 500, 0).await;
        let sup = supplier(&db).await;

        db.purchases()
            .record(&purchase_of(&med.id, &sup.id, 1, 100))
            .await
            .unwrap();

        assert!(matches!(
            db.medicines().delete(&med.id).await,
            Err(DbError::InUse { .. })
        ));
        assert!(matches!(
            db.suppliers().delete(&sup.id).await,
            Err(DbError::InUse { .. })
        ));
    }
}
