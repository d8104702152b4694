//! # Sale Repository
//!
//! Sale-Checkout: take stock off the shelf at the medicine's current price.
//!
//! ## Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     checkout(&NewSale, user_id)                         │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── UPDATE medicines                                                  │
//! │   │     SET quantity = quantity - q                                     │
//! │   │   WHERE id = ? AND quantity >= q                                    │
//! │   │   RETURNING price_cents                              (write lock)   │
//! │   │                                                                     │
//! │   │   no row ──► SELECT quantity                                        │
//! │   │               ├── no medicine ──► MedicineNotFound, rollback        │
//! │   │               └── quantity    ──► InsufficientStock, rollback       │
//! │   │                                                                     │
//! │   ├── total = q × price_cents                       (checked, core)     │
//! │   └── INSERT INTO sales (..., unit_price = snapshot) RETURNING *        │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The availability check and the decrement are one statement, and it is the
//! first statement of the transaction. Two checkouts racing for the last unit
//! serialize on SQLite's write lock: the second one re-evaluates
//! `quantity >= q` against the committed stock and matches no row.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pharmacy_core::{CoreError, Money, NewSale, Sale};

/// Repository for sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Sells `sale.quantity()` units of a medicine on behalf of `user_id`.
    ///
    /// ## Arguments
    /// * `sale` - Validated sale command
    /// * `user_id` - Authenticated user ringing up the sale
    ///
    /// ## Returns
    /// The stored sale line, priced at the medicine's price when the stock
    /// was taken.
    ///
    /// ## Errors
    /// * `Domain(MedicineNotFound)` - Unknown medicine
    /// * `Domain(InsufficientStock)` - Not enough units; nothing written
    /// * `Domain(Validation(TotalOverflow))` - Total does not fit; rolled back
    /// * `TransactionFailed` - Commit failed
    pub async fn checkout(&self, sale: &NewSale, user_id: &str) -> DbResult<Sale> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(
            medicine_id = %sale.medicine_id(),
            user_id = %user_id,
            quantity = sale.quantity(),
            "Checking out sale"
        );

        let mut tx = self.pool.begin().await?;

        let price_cents: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE medicines
            SET quantity = quantity - ?1, updated_at = ?2
            WHERE id = ?3 AND quantity >= ?1
            RETURNING price_cents
            "#,
        )
        .bind(sale.quantity())
        .bind(now)
        .bind(sale.medicine_id())
        .fetch_optional(&mut *tx)
        .await?;

        let unit_price = match price_cents {
            Some(cents) => Money::from_cents(cents),
            None => {
                let available: Option<i64> =
                    sqlx::query_scalar("SELECT quantity FROM medicines WHERE id = ?1")
                        .bind(sale.medicine_id())
                        .fetch_optional(&mut *tx)
                        .await?;

                let err = match available {
                    None => CoreError::MedicineNotFound(sale.medicine_id().to_string()),
                    Some(available) => CoreError::InsufficientStock {
                        medicine_id: sale.medicine_id().to_string(),
                        available,
                        requested: sale.quantity(),
                    },
                };

                debug!(error = %err, "Sale rejected");
                return Err(err.into());
            }
        };

        let total = sale.total_at(unit_price)?;

        let row = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (
                id, medicine_id, user_id, quantity, unit_price_cents, total_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, medicine_id, user_id, quantity, unit_price_cents, total_cents, created_at
            "#,
        )
        .bind(&id)
        .bind(sale.medicine_id())
        .bind(user_id)
        .bind(sale.quantity())
        .bind(unit_price.cents())
        .bind(total.cents())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id = %row.id,
            medicine_id = %row.medicine_id,
            quantity = row.quantity,
            total = %row.total(),
            "Sale completed"
        );

        Ok(row)
    }

    /// Lists every sale, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, medicine_id, user_id, quantity, unit_price_cents, total_cents, created_at
            FROM sales
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets a sale by ID, failing with `NotFound` when absent.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Sale> {
        sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, medicine_id, user_id, quantity, unit_price_cents, total_cents, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::test_support::{medicine, memory_db, supplier, user};
    use pharmacy_core::{MedicinePatch, NewPurchase};

    const UNKNOWN_ID: &str = "00000000-0000-4000-8000-000000000000";

    fn sale_of(medicine_id: &str, qty: i64) -> NewSale {
        NewSale::new(Some(medicine_id.to_string()), Some(qty)).unwrap()
    }

    #[tokio::test]
    async fn test_checkout_decrements_stock_at_current_price() {
        let db = memory_db().await;
        let med = medicine(&db, 500, 10).await;
        let clerk = user(&db, "clerk").await;

        let row = db
            .sales()
            .checkout(&sale_of(&med.id, 3), &clerk.id)
            .await
            .unwrap();

        assert_eq!(row.unit_price_cents, 500);
        assert_eq!(row.total_cents, 1500);
        assert_eq!(row.user_id, clerk.id);

        let after = db.medicines().get_by_id(&med.id).await.unwrap();
        assert_eq!(after.quantity, 7);
        assert_eq!(after.updated_at, row.created_at);
    }

    #[tokio::test]
    async fn test_checkout_can_empty_the_shelf() {
        let db = memory_db().await;
        let med = medicine(&db, 500, 4).await;
        let clerk = user(&db, "clerk").await;

        db.sales()
            .checkout(&sale_of(&med.id, 4), &clerk.id)
            .await
            .unwrap();

        assert_eq!(db.medicines().get_by_id(&med.id).await.unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn test_insufficient_stock_is_repeatable_and_has_no_effect() {
        let db = memory_db().await;
        let med = medicine(&db, 500, 12).await;
        let clerk = user(&db, "clerk").await;

        for _ in 0..2 {
            let result = db.sales().checkout(&sale_of(&med.id, 20), &clerk.id).await;
            match result {
                Err(DbError::Domain(CoreError::InsufficientStock {
                    available,
                    requested,
                    ..
                })) => {
                    assert_eq!(available, 12);
                    assert_eq!(requested, 20);
                }
                other => panic!("expected InsufficientStock, got {:?}", other),
            }
        }

        let after = db.medicines().get_by_id(&med.id).await.unwrap();
        assert_eq!(after.quantity, 12);
        assert_eq!(after.updated_at, med.updated_at);
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_medicine() {
        let db = memory_db().await;
        let clerk = user(&db, "clerk").await;

        let result = db.sales().checkout(&sale_of(UNKNOWN_ID, 1), &clerk.id).await;
        assert!(matches!(
            result,
            Err(DbError::Domain(CoreError::MedicineNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_unknown_user_rolls_back_decrement() {
        let db = memory_db().await;
        let med = medicine(&db, 500, 10).await;

        let result = db.sales().checkout(&sale_of(&med.id, 2), UNKNOWN_ID).await;
        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));

        assert_eq!(db.medicines().get_by_id(&med.id).await.unwrap().quantity, 10);
    }

    #[tokio::test]
    async fn test_sale_uses_price_at_time_of_sale() {
        let db = memory_db().await;
        let med = medicine(&db, 500, 10).await;
        let clerk = user(&db, "clerk").await;

        let before = db.sales().checkout(&sale_of(&med.id, 1), &clerk.id).await.unwrap();

        let repriced = MedicinePatch {
            price_cents: Some(650),
            ..Default::default()
        };
        db.medicines().update(&med.id, &repriced).await.unwrap();

        let after = db.sales().checkout(&sale_of(&med.id, 1), &clerk.id).await.unwrap();

        assert_eq!(before.unit_price_cents, 500);
        assert_eq!(after.unit_price_cents, 650);
        assert_eq!(db.sales().get_by_id(&before.id).await.unwrap().unit_price_cents, 500);
    }

    /// Stock 10 @ $5.00; buy 5 @ $4.00; sell 3; try to sell 20.
    #[tokio::test]
    async fn test_purchase_then_sales_scenario() {
        let db = memory_db().await;
        let med = medicine(&db, 500, 10).await;
        let sup = supplier(&db).await;
        let clerk = user(&db, "clerk").await;

        let purchase = NewPurchase::new(
            Some(med.id.clone()),
            Some(sup.id.clone()),
            Some(5),
            Some(400),
        )
        .unwrap();
        let bought = db.purchases().record(&purchase).await.unwrap();
        assert_eq!(bought.total_cents, 2000);
        assert_eq!(db.medicines().get_by_id(&med.id).await.unwrap().quantity, 15);

        let sold = db.sales().checkout(&sale_of(&med.id, 3), &clerk.id).await.unwrap();
        assert_eq!(sold.unit_price_cents, 500);
        assert_eq!(sold.total_cents, 1500);
        assert_eq!(db.medicines().get_by_id(&med.id).await.unwrap().quantity, 12);

        let rejected = db.sales().checkout(&sale_of(&med.id, 20), &clerk.id).await;
        assert!(matches!(
            rejected,
            Err(DbError::Domain(CoreError::InsufficientStock { available: 12, .. }))
        ));
        assert_eq!(db.medicines().get_by_id(&med.id).await.unwrap().quantity, 12);
    }

    /// N concurrent single-unit sales against stock S < N on a file-backed
    /// WAL database with a real multi-connection pool.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checkouts_never_oversell() {
        const STOCK: i64 = 5;
        const BUYERS: usize = 20;

        let dir = std::env::temp_dir().join(format!("pharmacy-sales-{}", Uuid::new_v4()));
        let config = DbConfig::new(dir.join("race.db"))
            .max_connections(8)
            .busy_timeout(std::time::Duration::from_secs(30));
        let db = Database::new(config).await.unwrap();

        let med = medicine(&db, 500, STOCK).await;
        let clerk = user(&db, "clerk").await;

        let mut handles = Vec::with_capacity(BUYERS);
        for _ in 0..BUYERS {
            let db = db.clone();
            let sale = sale_of(&med.id, 1);
            let user_id = clerk.id.clone();
            handles.push(tokio::spawn(async move {
                db.sales().checkout(&sale, &user_id).await
            }));
        }

        let mut sold = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => sold += 1,
                Err(DbError::Domain(CoreError::InsufficientStock { .. })) => refused += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(sold, STOCK as usize);
        assert_eq!(refused, BUYERS - STOCK as usize);
        assert_eq!(db.medicines().get_by_id(&med.id).await.unwrap().quantity, 0);
        assert_eq!(db.sales().list().await.unwrap().len(), STOCK as usize);

        db.close().await;
        let _ = std::fs::remove_dir_all(dir);
    }
}
