//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront session                                                    │
//! │       │                                                                 │
//! │       │  db.session().set("cartItems", json)                           │
//! │       │  db.catalog().list_products()                                  │
//! │       ▼                                                                 │
//! │  SessionRepository            CatalogRepository                        │
//! │  ├── get / set / remove       ├── list_products / get_product          │
//! │  └── clear                    ├── upsert_product                       │
//! │                               └── list_currencies / upsert_currency    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`session::SessionRepository`] - Persisted session blobs
//! - [`catalog::CatalogRepository`] - Product documents and currencies

pub mod catalog;
pub mod session;
