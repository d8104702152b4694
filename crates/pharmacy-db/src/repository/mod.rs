//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.sales().checkout(&sale, &user.user_id)               │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── checkout(&self, sale, user_id)   one transaction                  │
//! │  ├── get_by_id(&self, id)                                              │
//! │  └── list(&self)                                                       │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MedicineRepository`](medicine::MedicineRepository) - Medicine CRUD and patching
//! - [`SupplierRepository`](supplier::SupplierRepository) - Supplier CRUD and patching
//! - [`UserRepository`](user::UserRepository) - Accounts for authentication
//! - [`PurchaseRepository`](purchase::PurchaseRepository) - Purchase-Intake and purchase ledger
//! - [`SaleRepository`](sale::SaleRepository) - Sale-Checkout and sale ledger

pub mod medicine;
pub mod purchase;
pub mod sale;
pub mod supplier;
pub mod user;
