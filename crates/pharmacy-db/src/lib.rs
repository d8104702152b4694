//! # pharmacy-db: Database Layer for the Pharmacy Backend
//!
//! SQLite storage through sqlx, plus the two transactional ledger
//! operations that move stock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Pharmacy Backend Data Flow                         │
//! │                                                                         │
//! │  HTTP handler (POST /api/sales)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    pharmacy-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ MedicineRepo   │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SupplierRepo   │   │ 001_initial  │  │   │
//! │  │   │ WAL, FKs on   │    │ UserRepo       │   │   _schema    │  │   │
//! │  │   │ busy_timeout  │    │ PurchaseRepo ★ │   │              │  │   │
//! │  │   │               │    │ SaleRepo     ★ │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ★ = stock-moving transactions (Purchase-Intake, Sale-Checkout)│   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./data/pharmacy.db                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pharmacy_core::NewSale;
//! use pharmacy_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./data/pharmacy.db")).await?;
//!
//! let sale = NewSale::new(Some(medicine_id), Some(3))?;
//! let line = db.sales().checkout(&sale, &user_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::medicine::MedicineRepository;
pub use repository::purchase::PurchaseRepository;
pub use repository::sale::SaleRepository;
pub use repository::supplier::SupplierRepository;
pub use repository::user::UserRepository;
