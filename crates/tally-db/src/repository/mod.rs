//! # Repository Module
//!
//! Database repository implementations for Tally.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP Handler                                                           │
//! │       │                                                                 │
//! │       │  db.inventory().update_stock(42, 15)                            │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                    │
//! │  ├── update_stock(&self, product_id, new_stock)                         │
//! │  └── changes_for_product(&self, product_id)                             │
//! │       │                                                                 │
//! │       │  SQL (one transaction where multi-row invariants apply)         │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog: create, lookup, low-stock listing
//! - [`inventory::InventoryRepository`] - Stock mutation + audit trail
//! - [`sale::SaleRepository`] - Append-only sales ledger with filtered listing
//! - [`revenue::RevenueRepository`] - Period reports and two-period comparison

pub mod inventory;
pub mod product;
pub mod revenue;
pub mod sale;
