//! # enquire-store
//!
//! SQLite persistence for accounts, sessions, newsletter subscriptions and
//! contact inquiries.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for every domain
//! model. It also answers the validators' existence lookups by implementing
//! [`enquire_shared::Directory`].

pub mod database;
pub mod directory;
pub mod inquiries;
pub mod migrations;
pub mod models;
pub mod subscriptions;
pub mod users;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
