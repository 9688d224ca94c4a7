//! # Quote Database Crate
//!
//! This crate is the application-specific interface to the PostgreSQL
//! database that holds every quote. It is the service's only durable state.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. The rest of the application talks to
//!   `QuoteRepository` and never sees a statement.
//! - **Parameterized:** Every statement binds its values with PostgreSQL's
//!   native `$n` placeholders; nothing untrusted is interpolated into SQL text.
//! - **Asynchronous & Pooled:** All operations are asynchronous and run over a
//!   shared `PgPool`, so concurrent requests never serialize on one connection.
//!
//! ## Public API
//!
//! - `connect` / `ensure_schema`: build the pool and create the `quotes` table.
//! - `QuoteStore`: the statement-level accessor, implemented by `PgQuoteStore`
//!   and the in-process `MemoryQuoteStore`.
//! - `QuoteRepository`: the domain operations (list, get, random, create,
//!   partial update, delete).
//! - `DbError`: the error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, ensure_schema};
pub use error::DbError;
pub use memory::MemoryQuoteStore;
pub use repository::QuoteRepository;
pub use store::{PgQuoteStore, QuoteStore};
